//! Numeric helpers shared by the validator and the converter.
//!
//! Quarter-diopter checks work on values scaled to hundredths so that
//! binary floating-point error never decides whether a power is valid.

/// True if `value` is an exact multiple of 0.25 D
pub fn is_multiple_of_quarter(value: f64) -> bool {
    if !value.is_finite() {
        return false;
    }
    let hundredths = (value * 100.0).round() as i64;
    hundredths % 25 == 0
}

/// Render a power as a signed, zero-padded two-decimal string
///
/// `5.5` becomes `+05.50`, `-0.75` becomes `-00.75`. Zero, and anything
/// that rounds to zero hundredths, is `+00.00`. Magnitudes of 100 or more
/// keep every integer digit (`214.3` becomes `+214.30`); no valid eyeglass
/// power reaches them, but exact contact-lens values of extreme inputs can.
pub fn format_power(value: f64) -> String {
    // Round half away from zero on the magnitude, independent of float formatting
    let hundredths = (value.abs() * 100.0).round() as u64;
    let sign = if value < 0.0 && hundredths > 0 { '-' } else { '+' };
    format!("{}{:02}.{:02}", sign, hundredths / 100, hundredths % 100)
}

/// Round to the nearest 0.25 D, halves away from zero
pub fn round_to_nearest_quarter(value: f64) -> f64 {
    (value * 4.0).round() / 4.0
}

/// Round to two decimal places, halves away from zero
pub fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Format the value if it is a quarter multiple, otherwise blank
///
/// Used for the addition power on contact-lens output.
pub fn format_quarter_or_blank(value: f64) -> String {
    if is_multiple_of_quarter(value) {
        format_power(value)
    } else {
        String::new()
    }
}
