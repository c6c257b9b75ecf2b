//! Eyeglass to contact-lens conversion.
//!
//! A spectacle lens sits a vertex distance in front of the cornea, so its
//! effective power at the cornea differs from its labelled power:
//!
//! ```text
//! Dc = D / (1 - d * D)      d = vertex distance in metres
//! ```
//!
//! Spherical conversion collapses the prescription to its spherical
//! equivalent and compensates only above the configured threshold. Toric
//! conversion compensates both principal meridians separately so the
//! astigmatic correction survives.

use crate::numeric::{
    format_power, format_quarter_or_blank, round_to_hundredths, round_to_nearest_quarter,
};
use crate::types::present;
use crate::{ContactLensInput, ConversionConfig, Error, Field, FieldValue, Result, SphericLens, ToricLens};

/// Values below this are treated as a zero denominator
const DENOMINATOR_EPSILON: f64 = 1e-12;

/// Sphere plus half the cylinder, rounded to hundredths
pub fn spherical_equivalent(sph: f64, cyl: f64) -> f64 {
    round_to_hundredths(sph + cyl / 2.0)
}

/// Effective power at the cornea of a lens of `power` worn `vertex_distance_mm` away
///
/// Returns None when the formula has no finite result.
pub fn vertex_compensate(power: f64, vertex_distance_mm: f64) -> Option<f64> {
    let denominator = 1.0 - (vertex_distance_mm / 1000.0) * power;
    if denominator.abs() < DENOMINATOR_EPSILON {
        return None;
    }
    let compensated = power / denominator;
    compensated.is_finite().then_some(compensated)
}

/// Conversion input with defaults applied and every field numeric
#[derive(Clone, Copy, Debug, PartialEq)]
struct ParsedInput {
    sph: f64,
    cyl: f64,
    axis: f64,
    bv: f64,
    add: f64,
}

impl ParsedInput {
    fn parse(input: &ContactLensInput, config: &ConversionConfig) -> Result<Self> {
        Ok(Self {
            sph: read_field(&input.sph, Field::Sphere, 0.0)?,
            cyl: read_field(&input.cy, Field::Cylinder, config.default_cylinder)?,
            axis: read_field(&input.ax, Field::Axis, config.default_axis)?,
            bv: read_field(
                &input.bv,
                Field::VertexDistance,
                config.default_vertex_distance_mm,
            )?,
            add: read_field(&input.add, Field::Addition, config.default_addition)?,
        })
    }
}

fn read_field(value: &Option<FieldValue>, field: Field, default: f64) -> Result<f64> {
    match present(value) {
        None => Ok(default),
        Some(v) => v.to_number().ok_or_else(|| Error::InvalidValue {
            field,
            value: v.to_string(),
        }),
    }
}

fn compensate(power: f64, vertex_distance_mm: f64) -> Result<f64> {
    vertex_compensate(power, vertex_distance_mm).ok_or(Error::DegenerateVertex {
        power,
        vertex_distance_mm,
    })
}

/// Convert to a spherical contact lens using default settings
pub fn convert_to_spheric(input: &ContactLensInput) -> Result<SphericLens> {
    convert_to_spheric_with(input, &ConversionConfig::default())
}

/// Convert to a spherical contact lens
pub fn convert_to_spheric_with(
    input: &ContactLensInput,
    config: &ConversionConfig,
) -> Result<SphericLens> {
    let p = ParsedInput::parse(input, config)?;

    let total = if p.cyl != 0.0 {
        spherical_equivalent(p.sph, p.cyl)
    } else {
        p.sph
    };

    let exact = if total.abs() > config.compensation_threshold {
        compensate(total, p.bv)?
    } else {
        total
    };
    let rounded = round_to_nearest_quarter(exact);

    tracing::debug!(
        "Spheric conversion: total {:.3} D, compensated {:.3} D at {} mm, rounded {:.2} D",
        total,
        exact,
        p.bv,
        rounded
    );

    Ok(SphericLens {
        sph: format_quarter_or_blank(rounded),
        add: format_quarter_or_blank(p.add),
        ax: String::new(),
        bv: p.bv,
        exact_sph: format_power(exact),
    })
}

/// Convert to a toric contact lens using default settings
pub fn convert_to_toric(input: &ContactLensInput) -> Result<ToricLens> {
    convert_to_toric_with(input, &ConversionConfig::default())
}

/// Convert to a toric contact lens
pub fn convert_to_toric_with(
    input: &ContactLensInput,
    config: &ConversionConfig,
) -> Result<ToricLens> {
    let p = ParsedInput::parse(input, config)?;

    let sphere_power = compensate(p.sph, p.bv)?;
    let cylinder_power = compensate(p.sph + p.cyl, p.bv)? - sphere_power;

    let sph = round_to_nearest_quarter(sphere_power);
    let cyl = round_to_nearest_quarter(cylinder_power);

    tracing::debug!(
        "Toric conversion: sphere {:.3} D, cylinder {:.3} D at {} mm",
        sphere_power,
        cylinder_power,
        p.bv
    );

    Ok(ToricLens {
        sph: format_quarter_or_blank(sph),
        cy: format_quarter_or_blank(cyl),
        ax: format!("{}", p.axis.round() as i64),
        add: format_quarter_or_blank(p.add),
        bv: p.bv,
        exact_sph: format_power(sphere_power),
        exact_cy: format_power(cylinder_power),
    })
}
