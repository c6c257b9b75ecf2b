//! Core domain types for optical prescriptions.
//!
//! This module defines the values that flow through validation and
//! conversion:
//! - Raw field input (numbers or numeric strings)
//! - Eyeglass prescription records and their formatted form
//! - Contact-lens conversion input and results

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Field Input
// ============================================================================

/// Identifies one field of a prescription
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Sphere,
    Cylinder,
    Axis,
    Addition,
    PupillaryDistance,
    SegmentHeight,
    VertexDistance,
}

impl Field {
    /// Short clinical label (SPH, CYL, ...)
    pub fn label(self) -> &'static str {
        match self {
            Field::Sphere => "SPH",
            Field::Cylinder => "CYL",
            Field::Axis => "AXIS",
            Field::Addition => "ADD",
            Field::PupillaryDistance => "PD",
            Field::SegmentHeight => "SG",
            Field::VertexDistance => "BV",
        }
    }

    /// Fixed message reported when this field fails validation
    pub fn message(self) -> &'static str {
        match self {
            Field::Sphere => "SPH must be a multiple of 0.25 between -60.00 and +60.00",
            Field::Cylinder => "CYL must be a multiple of 0.25 between -15.00 and +15.00",
            Field::Axis => "AXIS must be between 0 and 180 degrees",
            Field::Addition => "ADD must be a multiple of 0.25 between +0.25 and +6.00",
            Field::PupillaryDistance => "PD must be between 19 and 85 mm",
            Field::SegmentHeight => "SG must be between 7 and 50 mm",
            Field::VertexDistance => "BV must be between 10 and 15 mm",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A field value as supplied by the caller: a number or numeric text
///
/// Text is trimmed before parsing. Blank text counts as an absent field.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl FieldValue {
    /// True for text that is empty after trimming
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Number(_) => false,
            FieldValue::Text(s) => s.trim().is_empty(),
        }
    }

    /// Read the value as a finite number
    ///
    /// Returns None for blank or non-numeric text and for NaN/infinity.
    pub fn to_number(&self) -> Option<f64> {
        let n = match self {
            FieldValue::Number(n) => *n,
            FieldValue::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        n.is_finite().then_some(n)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

impl From<i32> for FieldValue {
    fn from(n: i32) -> Self {
        FieldValue::Number(f64::from(n))
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

/// Returns the value only if it is present and not blank
pub(crate) fn present(value: &Option<FieldValue>) -> Option<&FieldValue> {
    value.as_ref().filter(|v| !v.is_blank())
}

// ============================================================================
// Eyeglass Prescription
// ============================================================================

/// An eyeglass prescription for one eye, every field optional
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct Prescription {
    #[serde(default)]
    pub sphere: Option<FieldValue>,
    #[serde(default)]
    pub cylinder: Option<FieldValue>,
    #[serde(default)]
    pub axis: Option<FieldValue>,
    #[serde(default)]
    pub add: Option<FieldValue>,
    #[serde(default)]
    pub pd: Option<FieldValue>,
    #[serde(default)]
    pub segment_height: Option<FieldValue>,
    #[serde(default)]
    pub vertex_distance: Option<FieldValue>,
}

/// Fields of a prescription that passed validation, in display form
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct FormattedPrescription {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sphere: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cylinder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axis: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub add: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pd: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segment_height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertex_distance: Option<f64>,
}

impl FormattedPrescription {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Outcome of validating a whole prescription
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
    pub formatted: FormattedPrescription,
}

/// A plus-cylinder prescription rewritten in minus-cylinder form
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Transposition {
    pub sph: String,
    pub cyl: String,
    pub axis: i64,
}

// ============================================================================
// Contact Lens Conversion
// ============================================================================

/// Eyeglass values fed to the contact-lens converter
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct ContactLensInput {
    #[serde(rename = "SPH", default)]
    pub sph: Option<FieldValue>,
    #[serde(rename = "CY", default)]
    pub cy: Option<FieldValue>,
    #[serde(rename = "AX", default)]
    pub ax: Option<FieldValue>,
    #[serde(rename = "BV", default)]
    pub bv: Option<FieldValue>,
    #[serde(rename = "ADD", default)]
    pub add: Option<FieldValue>,
}

impl ContactLensInput {
    /// Build converter input from an already validated eyeglass prescription
    pub fn from_formatted(formatted: &FormattedPrescription) -> Self {
        Self {
            sph: formatted.sphere.clone().map(FieldValue::Text),
            cy: formatted.cylinder.clone().map(FieldValue::Text),
            ax: formatted.axis.map(|a| FieldValue::Number(a as f64)),
            bv: formatted.vertex_distance.map(FieldValue::Number),
            add: formatted.add.clone().map(FieldValue::Text),
        }
    }
}

/// A spherical contact-lens prescription
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SphericLens {
    #[serde(rename = "SPH")]
    pub sph: String,
    #[serde(rename = "ADD")]
    pub add: String,
    #[serde(rename = "AX")]
    pub ax: String,
    #[serde(rename = "BV")]
    pub bv: f64,
    #[serde(rename = "Exact SPH")]
    pub exact_sph: String,
}

/// A toric contact-lens prescription
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ToricLens {
    #[serde(rename = "SPH")]
    pub sph: String,
    #[serde(rename = "CY")]
    pub cy: String,
    #[serde(rename = "AX")]
    pub ax: String,
    #[serde(rename = "ADD")]
    pub add: String,
    #[serde(rename = "BV")]
    pub bv: f64,
    #[serde(rename = "Exact SPH")]
    pub exact_sph: String,
    #[serde(rename = "Exact CY")]
    pub exact_cy: String,
}
