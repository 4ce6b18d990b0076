//! Canonical display form of a computed value.

use super::evaluation::Number;

/// Decimal places kept for real results unless configured otherwise.
pub const DEFAULT_PRECISION: u32 = 10;

/// Largest precision accepted; beyond this `f64` digits are noise.
pub const MAX_PRECISION: u32 = 15;

/// Format a value for the display.
///
/// Integers print as-is. Reals are rounded to `precision` decimal places to
/// hide binary floating point noise (`0.1+0.2` shows `0.3`), and print
/// without a fractional part when the rounded value is integral.
pub fn normalize(value: Number, precision: u32) -> String {
    match value {
        Number::Integer(i) => i.to_string(),
        Number::Real(r) => {
            let places = precision.min(MAX_PRECISION) as usize;
            let formatted = format!("{:.*}", places, r);
            let trimmed = if formatted.contains('.') {
                formatted.trim_end_matches('0').trim_end_matches('.')
            } else {
                formatted.as_str()
            };

            // Tiny negatives round to "-0".
            if trimmed == "-0" {
                "0".to_string()
            } else {
                trimmed.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integers() {
        assert_eq!(normalize(Number::Integer(42), DEFAULT_PRECISION), "42");
        assert_eq!(normalize(Number::Integer(-7), DEFAULT_PRECISION), "-7");
        assert_eq!(normalize(Number::Integer(0), DEFAULT_PRECISION), "0");
    }

    #[test]
    fn test_integral_reals_collapse() {
        assert_eq!(normalize(Number::Real(3.0), DEFAULT_PRECISION), "3");
        assert_eq!(normalize(Number::Real(-12.0), DEFAULT_PRECISION), "-12");
        assert_eq!(normalize(Number::Real(1e20), DEFAULT_PRECISION), "100000000000000000000");
        assert_eq!(normalize(Number::Real(2.99999999999999), DEFAULT_PRECISION), "3");
    }

    #[test]
    fn test_float_noise_suppressed() {
        assert_eq!(normalize(Number::Real(0.1 + 0.2), DEFAULT_PRECISION), "0.3");
        assert_eq!(normalize(Number::Real(1.0 / 3.0), DEFAULT_PRECISION), "0.3333333333");
        assert_eq!(normalize(Number::Real(0.5), DEFAULT_PRECISION), "0.5");
    }

    #[test]
    fn test_negative_zero() {
        assert_eq!(normalize(Number::Real(-0.0), DEFAULT_PRECISION), "0");
        assert_eq!(normalize(Number::Real(-1e-12), DEFAULT_PRECISION), "0");
    }

    #[test]
    fn test_custom_precision() {
        assert_eq!(normalize(Number::Real(2.0 / 3.0), 2), "0.67");
        assert_eq!(normalize(Number::Real(2.4), 0), "2");
        assert_eq!(normalize(Number::Integer(5), 0), "5");
    }
}
