//! Number types used throughout the crate
use num_complex::Complex;
use num_traits::{Float, FloatConst, One, Zero};
use std::fmt::Debug;
use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub, SubAssign};

/// Floating point type of basis arithmetic
pub type Real = f64;

/// Complex counterpart of [`Real`]
pub type Complex64 = Complex<Real>;

/// Element type of an array in physical or spectral space
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dtype {
    /// Real valued
    Real,
    /// Complex valued
    Complex,
}

impl std::fmt::Display for Dtype {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            Dtype::Real => write!(f, "real"),
            Dtype::Complex => write!(f, "complex"),
        }
    }
}

/// Generic scalar, either real or complex
pub trait Scalar:
    Copy
    + Clone
    + Debug
    + PartialEq
    + Zero
    + One
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + AddAssign
    + SubAssign
    + MulAssign
    + Add<Real, Output = Self>
    + Sub<Real, Output = Self>
    + Mul<Real, Output = Self>
    + Div<Real, Output = Self>
    + Send
    + Sync
    + 'static
{
    /// Element type tag
    const DTYPE: Dtype;

    /// Promote to complex
    fn to_complex(self) -> Complex64;

    /// Demote from complex, real types drop the imaginary part
    fn from_complex(value: Complex64) -> Self;
}

impl Scalar for Real {
    const DTYPE: Dtype = Dtype::Real;

    fn to_complex(self) -> Complex64 {
        Complex::new(self, 0.)
    }

    fn from_complex(value: Complex64) -> Self {
        value.re
    }
}

impl Scalar for Complex64 {
    const DTYPE: Dtype = Dtype::Complex;

    fn to_complex(self) -> Complex64 {
        self
    }

    fn from_complex(value: Complex64) -> Self {
        value
    }
}

/// Real floating point numbers used for stencils and solvers
pub trait FloatNum: Float + FloatConst + Scalar + From<Real> {
    /// Convert from [`Real`]
    fn from_real(value: Real) -> Self {
        <Self as From<Real>>::from(value)
    }
}

impl<T> FloatNum for T where T: Float + FloatConst + Scalar + From<Real> {}
