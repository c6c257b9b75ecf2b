//! Eyeglass prescription validation and transposition.
//!
//! Per-field validators return the display form of a valid value and
//! `None` otherwise. [`validate_prescription`] checks the sphere/cylinder/axis
//! combination first, then every present field, collecting one message per
//! failing field.

use crate::numeric::{format_power, is_multiple_of_quarter};
use crate::types::present;
use crate::{Error, Field, FieldValue, FormattedPrescription, Prescription, Transposition, ValidationReport};
use std::ops::RangeInclusive;

pub const SPHERE_RANGE: RangeInclusive<f64> = -60.0..=60.0;
pub const CYLINDER_RANGE: RangeInclusive<f64> = -15.0..=15.0;
pub const AXIS_RANGE: RangeInclusive<f64> = 0.0..=180.0;
pub const ADDITION_RANGE: RangeInclusive<f64> = 0.25..=6.0;
pub const PD_RANGE: RangeInclusive<f64> = 19.0..=85.0;
pub const SEGMENT_HEIGHT_RANGE: RangeInclusive<f64> = 7.0..=50.0;
pub const VERTEX_DISTANCE_RANGE: RangeInclusive<f64> = 10.0..=15.0;

pub(crate) const COMBINATION_MESSAGE: &str =
    "SPH, CYL and AXIS combination is invalid: CYL and AXIS must be given together";

fn validate_power(value: f64, range: RangeInclusive<f64>) -> Option<String> {
    (is_multiple_of_quarter(value) && range.contains(&value)).then(|| format_power(value))
}

/// Validate a sphere power; returns the formatted power
pub fn validate_sph(value: f64) -> Option<String> {
    validate_power(value, SPHERE_RANGE)
}

/// Validate a cylinder power; returns the formatted power
pub fn validate_cyl(value: f64) -> Option<String> {
    validate_power(value, CYLINDER_RANGE)
}

/// Validate an addition power; returns the formatted power
pub fn validate_add(value: f64) -> Option<String> {
    validate_power(value, ADDITION_RANGE)
}

/// Validate an axis in degrees; returns it rounded to a whole degree
pub fn validate_axis(value: f64) -> Option<i64> {
    AXIS_RANGE.contains(&value).then(|| value.round() as i64)
}

/// Validate a pupillary distance in mm; returns it rounded to a whole mm
pub fn validate_pd(value: impl Into<FieldValue>) -> Option<i64> {
    let n = value.into().to_number()?;
    PD_RANGE.contains(&n).then(|| n.round() as i64)
}

/// Validate a segment height in mm
pub fn validate_sg(value: impl Into<FieldValue>) -> Option<f64> {
    let n = value.into().to_number()?;
    SEGMENT_HEIGHT_RANGE.contains(&n).then_some(n)
}

/// Validate a vertex distance in mm
pub fn validate_vertex_distance(value: impl Into<FieldValue>) -> Option<f64> {
    let n = value.into().to_number()?;
    VERTEX_DISTANCE_RANGE.contains(&n).then_some(n)
}

/// Check which of sphere, cylinder and axis are present
///
/// Allowed: sphere alone, all three, or cylinder with axis. Everything
/// else fails, including all three absent.
pub fn check_sph_cyl_axis_combo(sphere: bool, cylinder: bool, axis: bool) -> bool {
    matches!(
        (sphere, cylinder, axis),
        (true, false, false) | (true, true, true) | (false, true, true)
    )
}

/// Validate a whole prescription
///
/// A failing combination short-circuits with a single error and nothing
/// formatted. Otherwise absent fields are skipped and present ones are
/// validated independently.
pub fn validate_prescription(rx: &Prescription) -> ValidationReport {
    let sphere = present(&rx.sphere);
    let cylinder = present(&rx.cylinder);
    let axis = present(&rx.axis);

    if !check_sph_cyl_axis_combo(sphere.is_some(), cylinder.is_some(), axis.is_some()) {
        tracing::debug!("Rejecting prescription: {}", Error::InvalidCombination);
        return ValidationReport {
            valid: false,
            errors: vec![Error::InvalidCombination.to_string()],
            formatted: FormattedPrescription::default(),
        };
    }

    let mut errors = Vec::new();
    let mut formatted = FormattedPrescription::default();

    formatted.sphere = check(sphere, Field::Sphere, &mut errors, validate_sph);
    formatted.cylinder = check(cylinder, Field::Cylinder, &mut errors, validate_cyl);
    formatted.axis = check(axis, Field::Axis, &mut errors, validate_axis);
    formatted.add = check(present(&rx.add), Field::Addition, &mut errors, validate_add);
    formatted.pd = check(present(&rx.pd), Field::PupillaryDistance, &mut errors, |n| {
        validate_pd(n)
    });
    formatted.segment_height = check(
        present(&rx.segment_height),
        Field::SegmentHeight,
        &mut errors,
        |n| validate_sg(n),
    );
    formatted.vertex_distance = check(
        present(&rx.vertex_distance),
        Field::VertexDistance,
        &mut errors,
        |n| validate_vertex_distance(n),
    );

    tracing::debug!("Validated prescription with {} error(s)", errors.len());

    ValidationReport {
        valid: errors.is_empty(),
        errors,
        formatted,
    }
}

/// Run one field through its validator, recording the message on failure
fn check<T>(
    value: Option<&FieldValue>,
    field: Field,
    errors: &mut Vec<String>,
    validate: impl FnOnce(f64) -> Option<T>,
) -> Option<T> {
    let value = value?;
    let result = value.to_number().and_then(validate);
    if result.is_none() {
        tracing::debug!("{} rejected: {}", field, value);
        errors.push(field.message().to_string());
    }
    result
}

/// Transpose a plus-cylinder prescription into minus-cylinder form
///
/// Only a strictly positive cylinder is accepted. The new axis is turned
/// by 90 degrees and must land inside 0..=180.
pub fn transform_sph_cyl_axis(sph: f64, cyl: f64, axis: f64) -> Option<Transposition> {
    if !(sph.is_finite() && cyl.is_finite()) || cyl <= 0.0 {
        return None;
    }

    let new_sph = sph + cyl;
    let new_cyl = -cyl.abs();
    let turned = if axis <= 90.0 { axis + 90.0 } else { axis - 90.0 };
    let new_axis = validate_axis(turned)?;

    Some(Transposition {
        sph: format_power(new_sph),
        cyl: format_power(new_cyl),
        axis: new_axis,
    })
}
