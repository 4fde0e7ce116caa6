//! Symbolic multipliers of expression terms
//!
//! A [`Scale`] is either a number or a small expression tree in the
//! coordinates `x`, `y`, `z`. The constructors simplify eagerly, so
//! cancelling terms collapse to an exact `Const(0.)`.
use crate::error::{FunspaceError, Result};
use crate::types::Real;
use ndarray::{Array1, Array2};
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Coordinate dependent scale factor
#[derive(Clone, Debug, PartialEq)]
pub enum Scale {
    /// Number
    Const(Real),
    /// Cartesian coordinate along axis
    Coord(usize),
    /// Sum
    Add(Box<Scale>, Box<Scale>),
    /// Product
    Mul(Box<Scale>, Box<Scale>),
    /// Quotient
    Div(Box<Scale>, Box<Scale>),
    /// Negation
    Neg(Box<Scale>),
    /// Integer power
    Pow(Box<Scale>, i32),
    /// Sine
    Sin(Box<Scale>),
    /// Cosine
    Cos(Box<Scale>),
    /// Exponential
    Exp(Box<Scale>),
}

impl Default for Scale {
    fn default() -> Self {
        Scale::Const(1.)
    }
}

impl From<Real> for Scale {
    fn from(value: Real) -> Self {
        Scale::Const(value)
    }
}

/// First coordinate
pub fn x() -> Scale {
    Scale::Coord(0)
}

/// Second coordinate
pub fn y() -> Scale {
    Scale::Coord(1)
}

/// Third coordinate
pub fn z() -> Scale {
    Scale::Coord(2)
}

impl Scale {
    /// Constant value, if the scale does not depend on coordinates
    pub fn as_const(&self) -> Option<Real> {
        match self {
            Scale::Const(c) => Some(*c),
            _ => None,
        }
    }

    /// Exactly zero
    pub fn is_zero(&self) -> bool {
        self.as_const() == Some(0.)
    }

    /// Exactly one
    pub fn is_one(&self) -> bool {
        self.as_const() == Some(1.)
    }

    /// True if the scale is the negation of `other`
    fn cancels(&self, other: &Scale) -> bool {
        match (self, other) {
            (Scale::Neg(a), b) | (b, Scale::Neg(a)) => **a == *b,
            _ => false,
        }
    }

    /// Simplifying sum
    pub fn sum(a: Scale, b: Scale) -> Scale {
        match (a.as_const(), b.as_const()) {
            (Some(p), Some(q)) => Scale::Const(p + q),
            (Some(p), _) if p == 0. => b,
            (_, Some(q)) if q == 0. => a,
            _ if a.cancels(&b) => Scale::Const(0.),
            _ => Scale::Add(Box::new(a), Box::new(b)),
        }
    }

    /// Simplifying product
    pub fn product(a: Scale, b: Scale) -> Scale {
        match (a.as_const(), b.as_const()) {
            (Some(p), Some(q)) => Scale::Const(p * q),
            (Some(p), _) | (_, Some(p)) if p == 0. => Scale::Const(0.),
            (Some(p), _) if p == 1. => b,
            (_, Some(q)) if q == 1. => a,
            (Some(p), _) if p == -1. => Scale::negate(b),
            (_, Some(q)) if q == -1. => Scale::negate(a),
            _ => Scale::Mul(Box::new(a), Box::new(b)),
        }
    }

    /// Simplifying quotient
    ///
    /// # Panics
    /// Division by exact zero.
    pub fn quotient(a: Scale, b: Scale) -> Scale {
        assert!(!b.is_zero(), "division of scale by zero");
        match (a.as_const(), b.as_const()) {
            (Some(p), Some(q)) => Scale::Const(p / q),
            (Some(p), _) if p == 0. => Scale::Const(0.),
            (_, Some(q)) if q == 1. => a,
            _ => Scale::Div(Box::new(a), Box::new(b)),
        }
    }

    /// Simplifying negation, $-(-e) = e$
    pub fn negate(a: Scale) -> Scale {
        match a {
            Scale::Const(c) => Scale::Const(-c),
            Scale::Neg(e) => *e,
            e => Scale::Neg(Box::new(e)),
        }
    }

    /// Integer power
    pub fn powi(self, n: i32) -> Scale {
        match (self.as_const(), n) {
            (Some(c), _) => Scale::Const(c.powi(n)),
            (_, 0) => Scale::Const(1.),
            (_, 1) => self,
            _ => Scale::Pow(Box::new(self), n),
        }
    }

    /// Sine
    pub fn sin(self) -> Scale {
        match self.as_const() {
            Some(c) => Scale::Const(c.sin()),
            None => Scale::Sin(Box::new(self)),
        }
    }

    /// Cosine
    pub fn cos(self) -> Scale {
        match self.as_const() {
            Some(c) => Scale::Const(c.cos()),
            None => Scale::Cos(Box::new(self)),
        }
    }

    /// Exponential
    pub fn exp(self) -> Scale {
        match self.as_const() {
            Some(c) => Scale::Const(c.exp()),
            None => Scale::Exp(Box::new(self)),
        }
    }

    /// Highest coordinate axis the scale depends on, plus one
    pub fn num_coords(&self) -> usize {
        match self {
            Scale::Const(_) => 0,
            Scale::Coord(axis) => axis + 1,
            Scale::Add(a, b) | Scale::Mul(a, b) | Scale::Div(a, b) => {
                a.num_coords().max(b.num_coords())
            }
            Scale::Neg(a) | Scale::Pow(a, _) | Scale::Sin(a) | Scale::Cos(a) | Scale::Exp(a) => {
                a.num_coords()
            }
        }
    }

    /// Evaluate at `points` of shape (dimensions, number of points)
    ///
    /// # Errors
    /// The scale uses a coordinate beyond the number of rows of `points`.
    pub fn eval(&self, points: &Array2<Real>) -> Result<Array1<Real>> {
        let dim = points.nrows();
        if self.num_coords() > dim {
            return Err(FunspaceError::Index {
                index: self.num_coords() - 1,
                len: dim,
            });
        }
        Ok(self.eval_unchecked(points))
    }

    fn eval_unchecked(&self, points: &Array2<Real>) -> Array1<Real> {
        match self {
            Scale::Const(c) => Array1::from_elem(points.ncols(), *c),
            Scale::Coord(axis) => points.row(*axis).to_owned(),
            Scale::Add(a, b) => a.eval_unchecked(points) + b.eval_unchecked(points),
            Scale::Mul(a, b) => a.eval_unchecked(points) * b.eval_unchecked(points),
            Scale::Div(a, b) => a.eval_unchecked(points) / b.eval_unchecked(points),
            Scale::Neg(a) => -a.eval_unchecked(points),
            Scale::Pow(a, n) => a.eval_unchecked(points).mapv(|v| v.powi(*n)),
            Scale::Sin(a) => a.eval_unchecked(points).mapv(Real::sin),
            Scale::Cos(a) => a.eval_unchecked(points).mapv(Real::cos),
            Scale::Exp(a) => a.eval_unchecked(points).mapv(Real::exp),
        }
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scale::Const(c) => write!(f, "{}", c),
            Scale::Coord(axis) => match axis {
                0 => write!(f, "x"),
                1 => write!(f, "y"),
                2 => write!(f, "z"),
                _ => write!(f, "x{}", axis),
            },
            Scale::Add(a, b) => write!(f, "({} + {})", a, b),
            Scale::Mul(a, b) => write!(f, "{}*{}", a, b),
            Scale::Div(a, b) => write!(f, "{}/{}", a, b),
            Scale::Neg(a) => write!(f, "-{}", a),
            Scale::Pow(a, n) => write!(f, "{}**{}", a, n),
            Scale::Sin(a) => write!(f, "sin({})", a),
            Scale::Cos(a) => write!(f, "cos({})", a),
            Scale::Exp(a) => write!(f, "exp({})", a),
        }
    }
}

impl Add for Scale {
    type Output = Scale;
    fn add(self, rhs: Scale) -> Scale {
        Scale::sum(self, rhs)
    }
}

impl Sub for Scale {
    type Output = Scale;
    fn sub(self, rhs: Scale) -> Scale {
        Scale::sum(self, Scale::negate(rhs))
    }
}

impl Mul for Scale {
    type Output = Scale;
    fn mul(self, rhs: Scale) -> Scale {
        Scale::product(self, rhs)
    }
}

impl Mul<Real> for Scale {
    type Output = Scale;
    fn mul(self, rhs: Real) -> Scale {
        Scale::product(self, Scale::Const(rhs))
    }
}

impl Mul<Scale> for Real {
    type Output = Scale;
    fn mul(self, rhs: Scale) -> Scale {
        Scale::product(Scale::Const(self), rhs)
    }
}

impl Div for Scale {
    type Output = Scale;
    fn div(self, rhs: Scale) -> Scale {
        Scale::quotient(self, rhs)
    }
}

impl Neg for Scale {
    type Output = Scale;
    fn neg(self) -> Scale {
        Scale::negate(self)
    }
}
