//! Transformation stencils from composite Jacobi space to orthogonal
//! Legendre space
//! $$
//! p = S c
//! $$
//! where $S$ is a banded (n x m) transform matrix with nonzero bands at
//! offsets $0, -2$ and possibly $-4$.
use super::biharmonic::StencilBiharmonic;
use super::dirichlet::StencilDirichlet;
use super::neumann::StencilNeumann;
use crate::types::{FloatNum, Scalar};
use ndarray::prelude::*;
use std::ops::{Add, Div, Mul, Sub};

#[enum_dispatch(Stencil<A>)]
#[derive(Clone, Debug)]
pub enum StencilJacobi<A: FloatNum> {
    StencilDirichlet(StencilDirichlet<A>),
    StencilNeumann(StencilNeumann<A>),
    StencilBiharmonic(StencilBiharmonic<A>),
}

/// Elementary methods for stencils
#[enum_dispatch]
pub trait Stencil<A> {
    /// Multiply stencil with a 1d array
    fn multiply_vec<S, T>(&self, composite_coeff: &ArrayBase<S, Ix1>) -> Array1<T>
    where
        S: ndarray::Data<Elem = T>,
        T: Scalar
            + Add<A, Output = T>
            + Mul<A, Output = T>
            + Div<A, Output = T>
            + Sub<A, Output = T>;

    /// Multiply stencil with a 1d array (output must be supplied)
    fn multiply_vec_inplace<S1, S2, T>(
        &self,
        composite_coeff: &ArrayBase<S1, Ix1>,
        orthonorm_coeff: &mut ArrayBase<S2, Ix1>,
    ) where
        S1: ndarray::Data<Elem = T>,
        S2: ndarray::Data<Elem = T> + ndarray::DataMut,
        T: Scalar
            + Add<A, Output = T>
            + Mul<A, Output = T>
            + Div<A, Output = T>
            + Sub<A, Output = T>;

    /// Solve linear system $A c = p$, where stencil is matrix $A$.
    fn solve_vec<S, T>(&self, orthonorm_coeff: &ArrayBase<S, Ix1>) -> Array1<T>
    where
        S: ndarray::Data<Elem = T>,
        T: Scalar
            + Add<A, Output = T>
            + Mul<A, Output = T>
            + Div<A, Output = T>
            + Sub<A, Output = T>;

    /// Solve linear system $A c = p$, where stencil is matrix $A$ (output must be supplied)
    fn solve_vec_inplace<S1, S2, T>(
        &self,
        orthonorm_coeff: &ArrayBase<S1, Ix1>,
        composite_coeff: &mut ArrayBase<S2, Ix1>,
    ) where
        S1: ndarray::Data<Elem = T>,
        S2: ndarray::Data<Elem = T> + ndarray::DataMut,
        T: Scalar
            + Add<A, Output = T>
            + Mul<A, Output = T>
            + Div<A, Output = T>
            + Sub<A, Output = T>;

    /// Return stencil as 2d array
    fn to_array(&self) -> Array2<A>;

    /// Number of coefficients in orthogonal space
    fn len_orth(&self) -> usize;

    /// Number of coefficients in composite space
    fn len_comp(&self) -> usize;
}

/// Apply bands `(offset, values)` of a stencil,
/// `orthonorm[k + offset] += composite[k] * values[k]`
pub(super) fn multiply_bands<S1, S2, T, A>(
    bands: &[(usize, &Array1<A>)],
    composite_coeff: &ArrayBase<S1, Ix1>,
    orthonorm_coeff: &mut ArrayBase<S2, Ix1>,
) where
    S1: ndarray::Data<Elem = T>,
    S2: ndarray::Data<Elem = T> + ndarray::DataMut,
    A: FloatNum,
    T: Scalar + Mul<A, Output = T>,
{
    orthonorm_coeff.fill(T::zero());
    for (offset, values) in bands {
        for (k, v) in values.iter().enumerate() {
            orthonorm_coeff[k + offset] += composite_coeff[k] * *v;
        }
    }
}

/// Dense stencil from bands
pub(super) fn bands_to_array<A: FloatNum>(n: usize, m: usize, bands: &[(usize, &Array1<A>)]) -> Array2<A> {
    let mut mat = Array2::<A>::zeros((n, m).f());
    for (offset, values) in bands {
        for (k, v) in values.iter().enumerate() {
            mat[[k + offset, k]] = *v;
        }
    }
    mat
}
