//! Shared complex-number helpers used by the kernels and filter engines.

use num_complex::Complex32;

/// Magnitude of a complex sample.
pub fn modulus(c: Complex32) -> f32 {
    (c.re * c.re + c.im * c.im).sqrt()
}

/// Phase angle of a complex sample, in radians in (-PI, PI].
pub fn argument(c: Complex32) -> f32 {
    c.im.atan2(c.re)
}

/// Divides a complex sample by a real scalar.
///
/// A zero divisor propagates Inf/NaN, it is not special-cased.
pub fn divide(c: Complex32, f: f32) -> Complex32 {
    let b = 1.0 / f;
    Complex32::new(c.re * b, c.im * b)
}

/// Scales a complex sample to unit magnitude.
///
/// A zero-magnitude input propagates NaN, it is not special-cased.
pub fn normalize(c: Complex32) -> Complex32 {
    divide(c, modulus(c))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::PI;

    #[test]
    fn test_modulus() {
        assert_relative_eq!(modulus(Complex32::new(3.0, 4.0)), 5.0);
        assert_relative_eq!(modulus(Complex32::new(0.0, 0.0)), 0.0);
    }

    #[test]
    fn test_argument() {
        assert_relative_eq!(argument(Complex32::new(1.0, 0.0)), 0.0);
        assert_relative_eq!(argument(Complex32::new(0.0, 1.0)), PI / 2.0);
        assert_relative_eq!(argument(Complex32::new(-1.0, 0.0)), PI);
    }

    #[test]
    fn test_divide() {
        let res = divide(Complex32::new(2.0, -4.0), 2.0);
        assert_relative_eq!(res.re, 1.0);
        assert_relative_eq!(res.im, -2.0);
    }

    #[test]
    fn test_normalize() {
        let res = normalize(Complex32::new(3.0, 4.0));
        assert_relative_eq!(modulus(res), 1.0, epsilon = 1e-6);
        assert_relative_eq!(argument(res), argument(Complex32::new(3.0, 4.0)));
    }

    #[test]
    fn test_normalize_zero_propagates_nan() {
        let res = normalize(Complex32::new(0.0, 0.0));
        assert!(res.re.is_nan());
        assert!(res.im.is_nan());
    }
}
