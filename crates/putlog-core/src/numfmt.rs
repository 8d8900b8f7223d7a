//! Number rendering shared by the message formatters
//!
//! Floating point values are rendered the way C's `%.<p>g` conversion does:
//! `p` significant digits, fixed notation for moderate exponents, scientific
//! notation otherwise, trailing zeros removed.

/// Significant digits used for the plain text format
pub const PLAIN_PRECISION: usize = 6;

/// Significant digits needed to round-trip an `f32`
pub const F32_ROUND_TRIP_PRECISION: usize = 9;

/// Significant digits needed to round-trip an `f64`
pub const F64_ROUND_TRIP_PRECISION: usize = 17;

/// Render `value` with `precision` significant digits in `%g` style.
///
/// Non-finite values render as `nan`, `inf` and `-inf`.
pub fn format_general(value: f64, precision: usize) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let precision = precision.max(1);
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    // The exponent has to be taken after rounding to `precision` digits,
    // 9.9999996 at 6 digits is 10, not 9.99999.
    let scientific = format!("{:.*e}", precision - 1, value);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (scientific.as_str(), 0),
    };

    if exponent < -4 || exponent >= precision as i32 {
        let mantissa = strip_fraction_zeros(mantissa);
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", mantissa, sign, exponent.unsigned_abs())
    } else {
        let decimals = (precision as i32 - 1 - exponent).max(0) as usize;
        strip_fraction_zeros(&format!("{:.*}", decimals, value)).to_string()
    }
}

/// Render a float for the structured format.
///
/// Uses the round-trip precision for the width and appends `.0` when the
/// result would otherwise read as an integer, so the receiver keeps the type.
pub fn format_round_trip(value: f64, precision: usize) -> String {
    let mut text = format_general(value, precision);
    if !text.is_empty() && text.chars().all(|c| c.is_ascii_digit() || c == '-') {
        text.push_str(".0");
    }
    text
}

fn strip_fraction_zeros(text: &str) -> &str {
    if !text.contains('.') {
        return text;
    }
    text.trim_end_matches('0').trim_end_matches('.')
}
