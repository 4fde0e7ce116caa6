//! Enums of basis kinds, families and boundary conditions, plus the
//! collective enum [`Base`] which binds all bases and can be used to put
//! them in a single array.
//!
//! Real-to-complex bases store only non-negative wavenumbers.
#![allow(unused_imports)]
use crate::error::Result;
use crate::fourier::{FourierC2c, FourierR2c};
use crate::jacobi::{CompositeJacobi, Jacobi};
use crate::traits::{BaseBasics, BaseSize, FromOrtho, Refine, Transform};
use crate::types::{Complex64, Dtype, Real};
use ndarray::{Array1, Array2, ArrayD, ArrayView1};
use std::ops::Range;

/// Enum with all available bases
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BaseKind {
    /// Jacobi polynomials (orthogonal)
    Jacobi,
    /// Jacobi dirichlet base
    JacobiDirichlet,
    /// Legendre neumann base
    LegendreNeumann,
    /// Jacobi biharmonic base
    JacobiBiharmonic,
    /// Jacobi base with 6 homogeneous boundary conditions
    JacobiOrder6,
    /// Fourier real to complex
    FourierR2c,
    /// Fourier complex to complex
    FourierC2c,
}

impl std::fmt::Display for BaseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            BaseKind::Jacobi => write!(f, "Jacobi"),
            BaseKind::JacobiDirichlet => write!(f, "JacobiDirichlet"),
            BaseKind::LegendreNeumann => write!(f, "LegendreNeumann"),
            BaseKind::JacobiBiharmonic => write!(f, "JacobiBiharmonic"),
            BaseKind::JacobiOrder6 => write!(f, "JacobiOrder6"),
            BaseKind::FourierR2c => write!(f, "FourierR2c"),
            BaseKind::FourierC2c => write!(f, "FourierC2c"),
        }
    }
}

/// Homogeneous boundary conditions of composite Jacobi bases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BcKind {
    /// $u(\pm 1) = 0$
    Dirichlet,
    /// $u'(\pm 1) = 0$
    Neumann,
    /// $u(\pm 1) = u'(\pm 1) = 0$
    Biharmonic,
    /// $u = u' = u'' = 0$ at $\pm 1$
    Order6,
}

impl BcKind {
    /// Number of constraints
    pub fn num_constraints(&self) -> usize {
        match self {
            BcKind::Dirichlet | BcKind::Neumann => 2,
            BcKind::Biharmonic => 4,
            BcKind::Order6 => 6,
        }
    }

    /// Name accepted in place of a tuple of zeros
    pub fn tag(&self) -> &'static str {
        match self {
            BcKind::Dirichlet => "dirichlet",
            BcKind::Neumann => "neumann",
            BcKind::Biharmonic => "biharmonic",
            BcKind::Order6 => "6th order",
        }
    }
}

impl std::fmt::Display for BcKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// Boundary condition as given by the user, a name or a tuple of values
#[derive(Debug, Clone, PartialEq)]
pub enum BcSpec {
    /// Named condition, e.g. `"dirichlet"`
    Named(String),
    /// Boundary values
    Values(Vec<Real>),
}

impl From<&str> for BcSpec {
    fn from(name: &str) -> Self {
        BcSpec::Named(name.to_string())
    }
}

impl From<Vec<Real>> for BcSpec {
    fn from(values: Vec<Real>) -> Self {
        BcSpec::Values(values)
    }
}

impl From<(Real, Real)> for BcSpec {
    fn from(values: (Real, Real)) -> Self {
        BcSpec::Values(vec![values.0, values.1])
    }
}

impl From<(Real, Real, Real, Real)> for BcSpec {
    fn from(v: (Real, Real, Real, Real)) -> Self {
        BcSpec::Values(vec![v.0, v.1, v.2, v.3])
    }
}

/// Polynomial or trigonometric family of a basis
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Family {
    /// Jacobi polynomials with parameters alpha, beta
    Jacobi { alpha: Real, beta: Real },
    /// Jacobi with alpha = beta = 0
    Legendre,
    /// Jacobi with alpha = beta = -1/2
    Chebyshev,
    /// Complex exponentials
    Fourier,
    /// Laguerre functions
    Laguerre,
    /// Hermite functions
    Hermite,
}

#[allow(clippy::large_enum_variant)]
#[enum_dispatch(BaseSize, BaseBasics, Transform, FromOrtho, Refine)]
#[derive(Clone, Debug)]
/// All bases
pub enum Base {
    /// Jacobi polynomials (orthogonal)
    Jacobi(Jacobi),
    /// Jacobi polynomials (composite)
    CompositeJacobi(CompositeJacobi),
    /// Fourier, real to complex
    FourierR2c(FourierR2c),
    /// Fourier, complex to complex
    FourierC2c(FourierC2c),
}

impl Base {
    /// True for real-to-complex bases
    pub fn is_r2c(&self) -> bool {
        matches!(self, Base::FourierR2c(_))
    }

    /// True for periodic bases
    pub fn is_periodic(&self) -> bool {
        matches!(self, Base::FourierR2c(_) | Base::FourierC2c(_))
    }

    /// Index of the last mode which has a conjugate partner for
    /// real-to-complex bases. Modes in `1..last_conj_index` are doubled
    /// when summing.
    pub fn last_conj_index(&self) -> usize {
        let n = self.len_phys();
        let m = self.len_spec();
        if n % 2 == 0 {
            m - 1
        } else {
            m
        }
    }
}
