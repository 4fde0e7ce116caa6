//! # Funspace forms
//! <img align="right" src="https://rustacean.net/assets/cuddlyferris.png" width="80">
//!
//! Function spaces for spectral Galerkin methods and a small language
//! for the linear forms built on them.
//!
//! ## Bases
//! - Orthogonal Jacobi polynomials $P_k^{(\alpha,\beta)}$ with Gauss-Jacobi
//!   quadrature, see [`jacobi::Jacobi`]
//! - Composite bases which satisfy homogeneous boundary conditions,
//!   see [`jacobi::CompositeJacobi`]
//! - Fourier bases, see [`fourier::FourierR2c`] and [`fourier::FourierC2c`]
//!
//! All bases are collected in [`enums::Base`]. The factory [`basis`]
//! picks the right one from a family, a boundary condition and a dtype.
//!
//! ## Spaces and forms
//! Bases combine into tensor product spaces ([`space::Space`]). Test and
//! trial functions on a space ([`forms::BasisFunction`]) lift to
//! expressions ([`forms::Expr`]) which support sums, scaling and the
//! operators in [`forms::operators`]. Expressions of known functions can
//! be evaluated at arbitrary points.
//!
//! ## Example
//! ```
//! use funspace_forms::forms::{grad, div, BasisFunction, Expr};
//! use funspace_forms::space::Space;
//! use funspace_forms::{dirichlet, fourier_r2c};
//!
//! let space = Space::tensor(vec![dirichlet(12).unwrap(), fourier_r2c(16)]).unwrap();
//! let v = BasisFunction::test(&space);
//! let laplace = div(&grad(&Expr::from(&v)).unwrap()).unwrap();
//! assert_eq!(laplace.num_terms(), 2);
//! ```
//!
//! ## Precision
//! Quadrature and basis evaluation of the Jacobi family can run in
//! double-double arithmetic (feature `xprec`), see [`config::JacobiConfig`].
#![allow(clippy::module_name_repetitions)]
#[macro_use]
extern crate enum_dispatch;
pub mod types;
pub mod error;
pub mod config;
pub mod utils;
pub mod traits;
pub mod enums;
pub mod jacobi;
pub mod fourier;
pub mod space;
pub mod forms;
pub mod array;

pub use array::{Array, Function};
pub use config::{JacobiConfig, Precision};
pub use enums::{Base, BaseKind, BcKind, BcSpec, Family};
pub use error::{FunspaceError, Result};
pub use traits::{BaseBasics, BaseSize, FromOrtho, Refine, Transform};
pub use types::{Complex64, Dtype, Real, Scalar};

use fourier::{FourierC2c, FourierR2c};
use jacobi::{CompositeJacobi, Jacobi};
use log::debug;

/// Build a basis from its family, an optional boundary condition and the
/// dtype of physical values.
///
/// Polynomial families with a boundary condition yield a composite
/// basis: tuples of two zeros select Dirichlet, tuples of four zeros
/// select Biharmonic, six zeros the 6th order basis, names select the
/// condition of that name. Fourier bases are real-to-complex for
/// [`Dtype::Real`].
///
/// # Errors
/// Invalid boundary condition, or a family / boundary condition pair
/// which is not implemented.
///
/// # Example
/// ```
/// use funspace_forms::{basis, BaseBasics, BaseKind, Dtype, Family};
/// let b = basis(8, Family::Legendre, Some((0., 0.).into()), Dtype::Real).unwrap();
/// assert_eq!(b.base_kind(), BaseKind::JacobiDirichlet);
/// assert!(basis(8, Family::Legendre, Some((1., 0.).into()), Dtype::Real).is_err());
/// ```
pub fn basis(n: usize, family: Family, bc: Option<BcSpec>, dtype: Dtype) -> Result<Base> {
    debug!("basis factory: n={} family={:?} bc={:?} dtype={}", n, family, bc, dtype);
    match (family, bc) {
        (Family::Laguerre | Family::Hermite, _) => Err(FunspaceError::NotImplemented(format!(
            "{:?} family",
            family
        ))),
        (Family::Fourier, Some(bc)) => Err(FunspaceError::BoundaryCondition(format!(
            "fourier bases are periodic, got {:?}",
            bc
        ))),
        (Family::Fourier, None) => Ok(match dtype {
            Dtype::Real => fourier_r2c(n),
            Dtype::Complex => fourier_c2c(n),
        }),
        (Family::Chebyshev, None) => Ok(Jacobi::chebyshev(n)?.into()),
        (Family::Chebyshev, Some(_)) => Err(FunspaceError::NotImplemented(
            "chebyshev bases with boundary conditions".to_string(),
        )),
        (Family::Legendre, None) => legendre(n),
        (Family::Jacobi { alpha, beta }, None) => jacobi(n, alpha, beta),
        (Family::Legendre | Family::Jacobi { .. }, Some(spec)) => {
            let kind = bc_kind(&spec)?;
            Ok(CompositeJacobi::new(n, kind, &spec)?.into())
        }
    }
}

/// Condition selected by a name or by the arity of a tuple
fn bc_kind(spec: &BcSpec) -> Result<BcKind> {
    let kinds = [
        BcKind::Dirichlet,
        BcKind::Neumann,
        BcKind::Biharmonic,
        BcKind::Order6,
    ];
    match spec {
        BcSpec::Named(name) => kinds
            .into_iter()
            .find(|k| k.tag() == name.trim().to_lowercase())
            .ok_or_else(|| FunspaceError::BoundaryCondition(format!("unknown name '{}'", name))),
        BcSpec::Values(values) => match values.len() {
            2 => Ok(BcKind::Dirichlet),
            4 => Ok(BcKind::Biharmonic),
            6 => Ok(BcKind::Order6),
            len => Err(FunspaceError::BoundaryCondition(format!(
                "no condition with {} values",
                len
            ))),
        },
    }
}

/// Function space: Jacobi polynomials
///
/// # Errors
/// `alpha` or `beta` not larger than -1.
pub fn jacobi(n: usize, alpha: Real, beta: Real) -> Result<Base> {
    Ok(Jacobi::new(n, alpha, beta)?.into())
}

/// Function space: Legendre polynomials
///
/// # Errors
/// `n` is zero.
pub fn legendre(n: usize) -> Result<Base> {
    Ok(Jacobi::legendre(n)?.into())
}

/// Function space: Chebyshev polynomials
///
/// # Errors
/// `n` is zero.
pub fn chebyshev(n: usize) -> Result<Base> {
    Ok(Jacobi::chebyshev(n)?.into())
}

/// Function space with Dirichlet boundary conditions
/// $$
/// \phi_k = (1 - x^2) P_k^{(1,1)}
/// $$
///
/// # Errors
/// Too few points.
pub fn dirichlet(n: usize) -> Result<Base> {
    Ok(CompositeJacobi::dirichlet(n)?.into())
}

/// Function space with Neumann boundary conditions
///
/// # Errors
/// Too few points.
pub fn neumann(n: usize) -> Result<Base> {
    Ok(CompositeJacobi::neumann(n)?.into())
}

/// Function space with biharmonic boundary conditions
/// $$
/// \phi_k = (1 - x^2)^2 P_k^{(2,2)}
/// $$
///
/// # Errors
/// Too few points.
pub fn biharmonic(n: usize) -> Result<Base> {
    Ok(CompositeJacobi::biharmonic(n)?.into())
}

/// Function space with three homogeneous conditions on each side
///
/// # Errors
/// Too few points.
pub fn order6(n: usize) -> Result<Base> {
    Ok(CompositeJacobi::order6(n)?.into())
}

/// Function space for real valued periodic functions
pub fn fourier_r2c(n: usize) -> Base {
    FourierR2c::new(n).into()
}

/// Function space for complex valued periodic functions
pub fn fourier_c2c(n: usize) -> Base {
    FourierC2c::new(n).into()
}
