//! # Expressions
//!
//! An [`Expr`] is a sum of derivatives of one leaf. For every component
//! of the expression it holds a list of terms, each term being
//! - the derivative order along every axis (`terms`),
//! - a symbolic multiplier (`scales`),
//! - the scalar component of the leaf's base space it acts on (`indices`).
//!
//! Sums are kept in a canonical form: like terms merge, terms with an
//! exact zero scale are dropped, and ragged components are padded with
//! zero terms.
use super::arguments::{Argument, BasisFunction};
use super::scale::Scale;
use crate::error::{FunspaceError, Result};
use crate::space::Space;
use crate::types::Real;
use ndarray::{Array2, Array3, ArrayView2, ArrayView3, Axis};
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

/// One term: derivative orders, component index, scale
pub(crate) type Term = (Vec<usize>, usize, Scale);

/// Linear combination of derivatives of a [`BasisFunction`]
#[derive(Debug, Clone)]
pub struct Expr {
    terms: Array3<usize>,
    scales: Array2<Scale>,
    indices: Array2<usize>,
    basis: BasisFunction,
}

impl From<&BasisFunction> for Expr {
    fn from(basis: &BasisFunction) -> Self {
        let num_components = basis.num_components();
        let dim = basis.dimensions();
        Self {
            terms: Array3::zeros((num_components, 1, dim)),
            scales: Array2::from_elem((num_components, 1), Scale::Const(1.)),
            indices: Array2::from_shape_fn((num_components, 1), |(c, _)| basis.offset() + c),
            basis: basis.clone(),
        }
    }
}

impl From<BasisFunction> for Expr {
    fn from(basis: BasisFunction) -> Self {
        Self::from(&basis)
    }
}

impl Expr {
    /// Build from terms listed per component
    pub(crate) fn from_components(components: Vec<Vec<Term>>, basis: BasisFunction) -> Self {
        let dim = basis.dimensions();
        let components: Vec<Vec<Term>> = components.into_iter().map(canonical).collect();
        let num_components = components.len();
        let num_terms = components.iter().map(Vec::len).max().unwrap_or(1).max(1);
        let mut terms = Array3::zeros((num_components, num_terms, dim));
        let mut scales = Array2::from_elem((num_components, num_terms), Scale::Const(0.));
        let mut indices = Array2::zeros((num_components, num_terms));
        for (c, component) in components.iter().enumerate() {
            for (t, (orders, index, scale)) in component.iter().enumerate() {
                for (axis, k) in orders.iter().enumerate() {
                    terms[[c, t, axis]] = *k;
                }
                indices[[c, t]] = *index;
                scales[[c, t]] = scale.clone();
            }
            // padding terms act on the same component
            let first = component.first().map_or(basis.offset() + c, |term| term.1);
            for t in component.len()..num_terms {
                indices[[c, t]] = first;
            }
        }
        Self {
            terms,
            scales,
            indices,
            basis,
        }
    }

    /// Terms listed per component
    pub(crate) fn components(&self) -> Vec<Vec<Term>> {
        (0..self.num_components()).map(|c| self.component(c)).collect()
    }

    fn component(&self, c: usize) -> Vec<Term> {
        (0..self.num_terms())
            .map(|t| {
                (
                    self.terms.index_axis(Axis(0), c).row(t).to_vec(),
                    self.indices[[c, t]],
                    self.scales[[c, t]].clone(),
                )
            })
            .collect()
    }

    /// Derivative orders, shape (components, terms, dimensions)
    pub fn terms(&self) -> ArrayView3<'_, usize> {
        self.terms.view()
    }

    /// Multipliers, shape (components, terms)
    pub fn scales(&self) -> ArrayView2<'_, Scale> {
        self.scales.view()
    }

    /// Scalar component of the base space, shape (components, terms)
    pub fn indices(&self) -> ArrayView2<'_, usize> {
        self.indices.view()
    }

    /// Number of components
    pub fn num_components(&self) -> usize {
        self.terms.shape()[0]
    }

    /// Number of terms per component
    pub fn num_terms(&self) -> usize {
        self.terms.shape()[1]
    }

    /// Number of spatial dimensions
    pub fn dimensions(&self) -> usize {
        self.terms.shape()[2]
    }

    /// Leaf the expression acts on
    pub fn basis(&self) -> &BasisFunction {
        &self.basis
    }

    /// Root leaf
    pub fn base(&self) -> BasisFunction {
        self.basis.base()
    }

    /// Test, trial or known
    pub fn argument(&self) -> Argument {
        self.basis.argument()
    }

    /// Space of the leaf
    pub fn function_space(&self) -> &Space {
        self.basis.function_space()
    }

    /// Tensor rank of the expression
    ///
    /// # Errors
    /// Component count that is not 1, dim or dim².
    pub fn expr_rank(&self) -> Result<usize> {
        let num_components = self.num_components();
        let dim = self.dimensions();
        let rank = if dim == 1 {
            match num_components {
                1 => Some(0),
                2 => Some(1),
                _ => None,
            }
        } else if num_components == 1 {
            Some(0)
        } else if num_components == dim {
            Some(1)
        } else if num_components == dim * dim {
            Some(2)
        } else {
            None
        };
        rank.ok_or(FunspaceError::UnsupportedRank {
            num_components,
            dimensions: dim,
        })
    }

    /// Component `i` of a rank 1 expression, or row `i` of a rank 2
    /// expression
    ///
    /// # Errors
    /// Rank 0 expression, or index out of range.
    pub fn get(&self, i: usize) -> Result<Expr> {
        let dim = self.dimensions();
        let range = match self.expr_rank()? {
            1 => i..i + 1,
            2 => i * dim..(i + 1) * dim,
            _ => return Err(FunspaceError::NotComposite),
        };
        if range.end > self.num_components() {
            return Err(FunspaceError::Index {
                index: i,
                len: self.num_components() / range.len(),
            });
        }
        let basis = if self.basis.rank() > 0 {
            self.basis.get(i)?
        } else {
            self.basis.clone()
        };
        let components = range.map(|c| self.component(c)).collect();
        Ok(Expr::from_components(components, basis))
    }

    fn check_combine(&self, other: &Expr, same_space: bool) -> Result<()> {
        if self.num_components() != other.num_components() {
            return Err(FunspaceError::Structure(format!(
                "cannot combine expressions with {} and {} components",
                self.num_components(),
                other.num_components()
            )));
        }
        if self.argument() != other.argument() {
            return Err(FunspaceError::Structure(format!(
                "cannot combine {} and {} expressions",
                self.argument(),
                other.argument()
            )));
        }
        if same_space && self.function_space() != other.function_space() {
            return Err(FunspaceError::Structure(
                "cannot add expressions on different spaces".to_string(),
            ));
        }
        if !self.basis.shares_base(&other.basis) {
            return Err(FunspaceError::Structure(
                "cannot combine expressions of different functions".to_string(),
            ));
        }
        Ok(())
    }

    /// Leaf of a sum or difference: the shared leaf, else the root
    fn combined_basis(&self, other: &Expr) -> BasisFunction {
        if self.basis == other.basis {
            self.basis.clone()
        } else {
            self.basis.base()
        }
    }

    fn concatenate(&self, other: &Expr, sign: Real, basis: BasisFunction) -> Expr {
        let components = self
            .components()
            .into_iter()
            .zip(other.components())
            .map(|(mut lhs, rhs)| {
                lhs.extend(
                    rhs.into_iter()
                        .map(|(orders, index, scale)| (orders, index, scale * sign)),
                );
                lhs
            })
            .collect();
        Expr::from_components(components, basis)
    }

    /// Sum of two expressions of the same root leaf on the same space
    ///
    /// # Errors
    /// Different component counts, arguments, spaces or root leaves.
    pub fn try_add(&self, other: &Expr) -> Result<Expr> {
        self.check_combine(other, true)?;
        Ok(self.concatenate(other, 1., self.combined_basis(other)))
    }

    /// Difference of two expressions of the same root leaf
    ///
    /// # Errors
    /// Different component counts, arguments or root leaves.
    pub fn try_sub(&self, other: &Expr) -> Result<Expr> {
        self.check_combine(other, false)?;
        Ok(self.concatenate(other, -1., self.combined_basis(other)))
    }

    /// Multiply every term by `scale`
    pub fn scaled(&self, scale: &Scale) -> Expr {
        let mut out = self.clone();
        out.scales.mapv_inplace(|s| s * scale.clone());
        out
    }

    /// Multiply component `c` by `scales[c]`
    ///
    /// # Errors
    /// Number of scales differs from the number of components.
    pub fn scaled_components(&self, scales: &[Scale]) -> Result<Expr> {
        if scales.len() != self.num_components() {
            return Err(FunspaceError::Structure(format!(
                "expected {} scales, got {}",
                self.num_components(),
                scales.len()
            )));
        }
        let mut out = self.clone();
        for (mut row, scale) in out.scales.outer_iter_mut().zip(scales) {
            row.mapv_inplace(|s| s * scale.clone());
        }
        Ok(out)
    }
}

/// Merge like terms and drop zero terms of one component
fn canonical(component: Vec<Term>) -> Vec<Term> {
    let mut merged: Vec<Term> = Vec::with_capacity(component.len());
    for (orders, index, scale) in component {
        match merged
            .iter_mut()
            .find(|(o, i, _)| *o == orders && *i == index)
        {
            Some(term) => term.2 = term.2.clone() + scale,
            None => merged.push((orders, index, scale)),
        }
    }
    merged.retain(|term| !term.2.is_zero());
    merged
}

impl PartialEq for Expr {
    /// Same leaf and identical term, scale and index arrays
    fn eq(&self, other: &Self) -> bool {
        self.basis == other.basis
            && self.terms == other.terms
            && self.scales == other.scales
            && self.indices == other.indices
    }
}

fn unwrap_or_panic(result: Result<Expr>) -> Expr {
    match result {
        Ok(expr) => expr,
        Err(e) => panic!("{}", e),
    }
}

impl Add<Expr> for Expr {
    type Output = Expr;
    fn add(self, rhs: Expr) -> Expr {
        unwrap_or_panic(self.try_add(&rhs))
    }
}

impl Add<&BasisFunction> for Expr {
    type Output = Expr;
    fn add(self, rhs: &BasisFunction) -> Expr {
        unwrap_or_panic(self.try_add(&rhs.into()))
    }
}

impl Sub<Expr> for Expr {
    type Output = Expr;
    fn sub(self, rhs: Expr) -> Expr {
        unwrap_or_panic(self.try_sub(&rhs))
    }
}

impl Sub<&BasisFunction> for Expr {
    type Output = Expr;
    fn sub(self, rhs: &BasisFunction) -> Expr {
        unwrap_or_panic(self.try_sub(&rhs.into()))
    }
}

impl AddAssign<Expr> for Expr {
    fn add_assign(&mut self, rhs: Expr) {
        *self = unwrap_or_panic(self.try_add(&rhs));
    }
}

impl SubAssign<Expr> for Expr {
    fn sub_assign(&mut self, rhs: Expr) {
        *self = unwrap_or_panic(self.try_sub(&rhs));
    }
}

impl Neg for Expr {
    type Output = Expr;
    fn neg(self) -> Expr {
        self.scaled(&Scale::Const(-1.))
    }
}

impl Neg for &Expr {
    type Output = Expr;
    fn neg(self) -> Expr {
        self.scaled(&Scale::Const(-1.))
    }
}

impl Neg for &BasisFunction {
    type Output = Expr;
    fn neg(self) -> Expr {
        -Expr::from(self)
    }
}

impl Mul<Real> for Expr {
    type Output = Expr;
    fn mul(self, rhs: Real) -> Expr {
        self.scaled(&Scale::Const(rhs))
    }
}

impl Mul<Scale> for Expr {
    type Output = Expr;
    fn mul(self, rhs: Scale) -> Expr {
        self.scaled(&rhs)
    }
}

impl Mul<Vec<Scale>> for Expr {
    type Output = Expr;
    fn mul(self, rhs: Vec<Scale>) -> Expr {
        unwrap_or_panic(self.scaled_components(&rhs))
    }
}

impl Mul<Expr> for Real {
    type Output = Expr;
    fn mul(self, rhs: Expr) -> Expr {
        rhs * self
    }
}

impl Mul<Expr> for Scale {
    type Output = Expr;
    fn mul(self, rhs: Expr) -> Expr {
        rhs * self
    }
}

impl Mul<Real> for &BasisFunction {
    type Output = Expr;
    fn mul(self, rhs: Real) -> Expr {
        Expr::from(self) * rhs
    }
}

impl Mul<Scale> for &BasisFunction {
    type Output = Expr;
    fn mul(self, rhs: Scale) -> Expr {
        Expr::from(self) * rhs
    }
}

impl Mul<Vec<Scale>> for &BasisFunction {
    type Output = Expr;
    fn mul(self, rhs: Vec<Scale>) -> Expr {
        Expr::from(self) * rhs
    }
}

impl MulAssign<Real> for Expr {
    fn mul_assign(&mut self, rhs: Real) {
        *self = self.scaled(&Scale::Const(rhs));
    }
}

impl MulAssign<Scale> for Expr {
    fn mul_assign(&mut self, rhs: Scale) {
        *self = self.scaled(&rhs);
    }
}
