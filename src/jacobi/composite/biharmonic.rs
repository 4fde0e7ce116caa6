//! Legendre stencil with biharmonic boundary conditions
use super::stencil::{bands_to_array, multiply_bands, Stencil};
use crate::jacobi::linalg::pdma_even_odd;
use crate::types::{FloatNum, Scalar};
use ndarray::{Array, Array1, Array2, ArrayBase, Ix1};
use std::ops::{Add, Div, Mul, Sub};

/// Container for Legendre stencil with clamped boundary conditions
/// $u(\pm 1) = u'(\pm 1) = 0$
#[derive(Clone, Debug)]
pub struct StencilBiharmonic<A> {
    /// Number of coefficients in orthonormal space
    n: usize,
    /// Number of coefficients in composite space
    m: usize,
    /// Main diagonal
    diag: Array1<A>,
    /// Subdiagonal offset -2
    low2: Array1<A>,
    /// Subdiagonal offset -4
    low4: Array1<A>,
    /// Normal equations, diagonal
    ata_diag: Array1<A>,
    /// Normal equations, offset 2
    ata_off2: Array1<A>,
    /// Normal equations, offset 4
    ata_off4: Array1<A>,
}

impl<A: FloatNum> StencilBiharmonic<A> {
    /// Return stencil of the Jacobi biharmonic space
    /// $$
    ///  \phi_k = (1-x^2)^2 P_k^{(2,2)} = f_0 (L_k + f_1 L_{k+2} + f_2 L_{k+4})
    /// $$
    /// with
    /// $f_0 = 4(k+2)(k+1)/((2k+5)(2k+3))$,
    /// $f_1 = -2(2k+5)/(2k+7)$,
    /// $f_2 = (2k+3)/(2k+7)$.
    pub fn new(n: usize) -> Self {
        let m = n.saturating_sub(4);
        let (mut diag, mut low2, mut low4) = (
            Array1::<A>::zeros(m),
            Array1::<A>::zeros(m),
            Array1::<A>::zeros(m),
        );
        for k in 0..m {
            let (f0, f1, f2) = Self::coefficients(k);
            diag[k] = A::from_real(f0);
            low2[k] = A::from_real(f0 * f1);
            low4[k] = A::from_real(f0 * f2);
        }
        let at = |v: &Array1<A>, i: usize| if i < m { v[i] } else { A::zero() };
        let ata_diag =
            Array::from_shape_fn(m, |i| diag[i] * diag[i] + low2[i] * low2[i] + low4[i] * low4[i]);
        let ata_off2 = Array::from_shape_fn(m, |i| {
            low2[i] * at(&diag, i + 2) + low4[i] * at(&low2, i + 2)
        });
        let ata_off4 = Array::from_shape_fn(m, |i| low4[i] * at(&diag, i + 4));
        Self {
            n,
            m,
            diag,
            low2,
            low4,
            ata_diag,
            ata_off2,
            ata_off4,
        }
    }

    /// Recurrence coefficients $(f_0, f_1, f_2)$ of mode `k`
    pub fn coefficients(k: usize) -> (f64, f64, f64) {
        let k = k as f64;
        let f0 = 4. * (k + 2.) * (k + 1.) / ((2. * k + 5.) * (2. * k + 3.));
        let f1 = -2. * (2. * k + 5.) / (2. * k + 7.);
        let f2 = (2. * k + 3.) / (2. * k + 7.);
        (f0, f1, f2)
    }
}

impl<A: FloatNum> Stencil<A> for StencilBiharmonic<A> {
    fn to_array(&self) -> Array2<A> {
        bands_to_array(
            self.n,
            self.m,
            &[(0, &self.diag), (2, &self.low2), (4, &self.low4)],
        )
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

    /// Each composite mode spreads to orthogonal modes $k$, $k+2$ and $k+4$
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
            &[(0, &self.diag), (2, &self.low2), (4, &self.low4)],
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

    /// Solve $S^T S c = S^T p$, even and odd modes decouple
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
            composite_coeff[i] = orthonorm_coeff[i] * self.diag[i]
                + orthonorm_coeff[i + 2] * self.low2[i]
                + orthonorm_coeff[i + 4] * self.low4[i];
        }
        pdma_even_odd(
            &self.ata_diag.view(),
            &self.ata_off2.view(),
            &self.ata_off4.view(),
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
