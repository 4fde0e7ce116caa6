//! Legendre stencil with Neumann boundary conditions
use super::stencil::{bands_to_array, multiply_bands, Stencil};
use crate::jacobi::linalg::tdma;
use crate::types::{FloatNum, Scalar};
use ndarray::{Array, Array1, Array2, ArrayBase, Ix1};
use std::ops::{Add, Div, Mul, Sub};

/// Container for Legendre stencil with Neumann boundary conditions
#[derive(Clone, Debug)]
pub struct StencilNeumann<A> {
    /// Number of coefficients in orthonormal space
    n: usize,
    /// Number of coefficients in composite space
    m: usize,
    /// Main diagonal
    diag: Array1<A>,
    /// Subdiagonal offset -2
    low2: Array1<A>,
    /// For tdma (diagonal)
    tdma_diag: Array1<A>,
    /// For tdma (off-diagonal)
    tdma_off2: Array1<A>,
}

impl<A: FloatNum> StencilNeumann<A> {
    /// Return stencil of the Legendre Neumann space
    /// $$
    ///  \phi_k = L_k - \frac{k(k+1)}{(k+2)(k+3)} L_{k+2}
    /// $$
    ///
    /// The derivative vanishes at both ends since $L_k'(\pm 1) = (\pm 1)^{k+1} k(k+1)/2$.
    pub fn new(n: usize) -> Self {
        let m = n.saturating_sub(2);
        let diag = Array::from_elem(m, A::one());
        let low2 = Array::from_shape_fn(m, |k| {
            let k = k as f64;
            A::from_real(-k * (k + 1.) / ((k + 2.) * (k + 3.)))
        });
        let tdma_diag = Array::from_shape_fn(m, |i| diag[i] * diag[i] + low2[i] * low2[i]);
        let tdma_off2 = Array::from_shape_fn(m.saturating_sub(2), |i| diag[i + 2] * low2[i]);
        Self {
            n,
            m,
            diag,
            low2,
            tdma_diag,
            tdma_off2,
        }
    }
}

impl<A: FloatNum> Stencil<A> for StencilNeumann<A> {
    fn to_array(&self) -> Array2<A> {
        bands_to_array(self.n, self.m, &[(0, &self.diag), (2, &self.low2)])
    }

    fn multiply_vec<S, T>(&self, composite_coeff: &ArrayBase<S, Ix1>) -> Array1<T>
    where
        S: ndarray::Data<Elem = T>,
        T: Scalar
            + Add<A, Output = T>
            + Mul<A, Output = T>
            + Div<A, Output = T>
            + Sub<A, Output = T>,
    {
        let mut orthonorm_coeff = Array1::<T>::zeros(self.n);
        self.multiply_vec_inplace(composite_coeff, &mut orthonorm_coeff);
        orthonorm_coeff
    }

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
            + Sub<A, Output = T>,
    {
        multiply_bands(
            &[(0, &self.diag), (2, &self.low2)],
            composite_coeff,
            orthonorm_coeff,
        );
    }

    fn solve_vec<S, T>(&self, orthonorm_coeff: &ArrayBase<S, Ix1>) -> Array1<T>
    where
        S: ndarray::Data<Elem = T>,
        T: Scalar
            + Add<A, Output = T>
            + Mul<A, Output = T>
            + Div<A, Output = T>
            + Sub<A, Output = T>,
    {
        let mut composite_coeff = Array1::<T>::zeros(self.m);
        self.solve_vec_inplace(orthonorm_coeff, &mut composite_coeff);
        composite_coeff
    }

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
            + Sub<A, Output = T>,
    {
        for i in 0..self.m {
            composite_coeff[i] =
                orthonorm_coeff[i] * self.diag[i] + orthonorm_coeff[i + 2] * self.low2[i];
        }
        tdma(
            &self.tdma_off2.view(),
            &self.tdma_diag.view(),
            &self.tdma_off2.view(),
            composite_coeff,
        );
    }

    fn len_orth(&self) -> usize {
        self.n
    }

    fn len_comp(&self) -> usize {
        self.m
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::utils::approx_eq;
    use ndarray::array;

    #[test]
    fn test_stencil_neumann() {
        let stencil = StencilNeumann::<f64>::new(6);
        let orthonorm = stencil.multiply_vec(&array![0., 0., 1., 0.]);
        // phi_2 = L_2 - 6/20 L_4
        approx_eq(&orthonorm, &array![0., 0., 1., 0., -0.3, 0.]);
        approx_eq(&stencil.solve_vec(&orthonorm), &array![0., 0., 1., 0.]);
    }
}
