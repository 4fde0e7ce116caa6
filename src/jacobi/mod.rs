//! # Jacobi family
//!
//! Orthogonal Jacobi polynomials $P_k^{(\alpha,\beta)}$ (Legendre and
//! Chebyshev are special cases) and composite bases which satisfy
//! homogeneous boundary conditions.
pub mod composite;
pub mod float;
pub mod linalg;
pub mod ortho;
pub mod polynomial;
pub mod quadrature;
pub use composite::CompositeJacobi;
pub use ortho::Jacobi;
