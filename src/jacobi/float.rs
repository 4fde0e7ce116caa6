//! Arithmetic of the Jacobi evaluator.
//!
//! Recurrences are written once, generic over [`JacobiFloat`], and run
//! either in `f64` or, with the `xprec` feature, in double-double
//! arithmetic provided by `twofloat`.
use std::fmt::Debug;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Minimal float interface of the polynomial recurrences
pub trait JacobiFloat:
    Copy
    + Debug
    + PartialOrd
    + From<f64>
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
{
    /// Round to `f64`
    fn to_f64(self) -> f64;

    /// Absolute value
    fn abs_val(self) -> Self;

    /// Shorthand for `Self::from(1.)`
    fn one() -> Self {
        Self::from(1.)
    }

    /// Shorthand for `Self::from(0.)`
    fn zero() -> Self {
        Self::from(0.)
    }

    /// Integer power
    fn powi_(self, n: usize) -> Self {
        let mut p = Self::one();
        for _ in 0..n {
            p = p * self;
        }
        p
    }
}

impl JacobiFloat for f64 {
    fn to_f64(self) -> f64 {
        self
    }

    fn abs_val(self) -> Self {
        self.abs()
    }
}

#[cfg(feature = "xprec")]
impl JacobiFloat for twofloat::TwoFloat {
    fn to_f64(self) -> f64 {
        self.into()
    }

    fn abs_val(self) -> Self {
        self.abs()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_powi() {
        assert!((JacobiFloat::powi_(2.0_f64, 10) - 1024.).abs() < 1e-12);
        assert!((JacobiFloat::powi_(-0.5_f64, 0) - 1.).abs() < 1e-12);
    }

    #[cfg(feature = "xprec")]
    #[test]
    fn test_twofloat_roundtrip() {
        let x = twofloat::TwoFloat::from(0.1);
        let y = (x * twofloat::TwoFloat::from(3.)) / twofloat::TwoFloat::from(3.);
        assert!((y.to_f64() - 0.1).abs() < 1e-16);
    }
}
