//! # Forms
//!
//! Symbolic algebra over test, trial and known functions.
//!
//! ```
//! use funspace_forms::forms::{dx, x, BasisFunction, Expr};
//! use funspace_forms::space::Space;
//! use funspace_forms::dirichlet;
//!
//! let space = Space::line(dirichlet(10).unwrap()).unwrap();
//! let u = BasisFunction::trial(&space);
//! let e = dx(&Expr::from(&u), 0, 2).unwrap() + &u * x();
//! assert_eq!(e.num_terms(), 2);
//! assert_eq!(e.argument().tag(), 1);
//! ```
pub mod arguments;
pub mod eval;
pub mod expr;
pub mod operators;
pub mod scale;
pub use arguments::{Argument, BasisFunction, LeafId};
pub use expr::Expr;
pub use operators::{div, dx, grad, laplace};
pub use scale::{x, y, z, Scale};
