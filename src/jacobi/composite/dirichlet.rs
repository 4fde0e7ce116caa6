//! Legendre stencil with Dirichlet boundary conditions
use super::stencil::{bands_to_array, multiply_bands, Stencil};
use crate::jacobi::linalg::tdma;
use crate::types::{FloatNum, Scalar};
use ndarray::{Array, Array1, Array2, ArrayBase, ArrayView1, Ix1};
use std::ops::{Add, Div, Mul, Sub};

/// Container for Legendre stencil with Dirichlet boundary conditions
#[derive(Clone, Debug)]
pub struct StencilDirichlet<A> {
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

impl<A: FloatNum> StencilDirichlet<A> {
    /// Return stencil of the Jacobi Dirichlet space
    /// $$
    ///  \phi_k = (1-x^2) P_k^{(1,1)} = c_k (L_k - L_{k+2}),
    ///  \quad c_k = \frac{2(k+1)}{2k+3}
    /// $$
    ///
    /// Reference:
    /// J. Shen: Efficient Spectral-Galerkin Method I.
    pub fn new(n: usize) -> Self {
        let m = Self::get_m(n);
        let diag = Array::from_shape_fn(m, |k| A::from_real(Self::coefficient(k)));
        let low2 = diag.mapv(|d| -d);
        let (tdma_diag, tdma_off2) = Self::get_tdma_diags(&diag.view(), &low2.view());
        Self {
            n,
            m,
            diag,
            low2,
            tdma_diag,
            tdma_off2,
        }
    }

    /// Scaling of mode `k`, $2(k+1)/(2k+3)$
    pub fn coefficient(k: usize) -> f64 {
        let k = k as f64;
        2. * (k + 1.) / (2. * k + 3.)
    }

    /// Get main diagonal and off diagonal of $S^T S$
    fn get_tdma_diags(diag: &ArrayView1<A>, low2: &ArrayView1<A>) -> (Array1<A>, Array1<A>) {
        let m = diag.len();
        let tdma_diag = Array::from_shape_fn(m, |i| diag[i] * diag[i] + low2[i] * low2[i]);
        let tdma_off2 = Array::from_shape_fn(m.saturating_sub(2), |i| diag[i + 2] * low2[i]);
        (tdma_diag, tdma_off2)
    }

    /// Composite spaces are smaller than its orthonormal counterpart
    pub fn get_m(n: usize) -> usize {
        n.saturating_sub(2)
    }
}

impl<A: FloatNum> Stencil<A> for StencilDirichlet<A> {
    fn to_array(&self) -> Array2<A> {
        bands_to_array(self.n, self.m, &[(0, &self.diag), (2, &self.low2)])
    }

    /// Multiply stencil with a 1d array (transforms to orthonorm coefficents)
    /// input and output array do usually differ in size.
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

    /// Orthogonal mode $k$ receives $c_k u_k$, mode $k+2$ receives $-c_k u_k$
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

    /// Solve $S^T S c = S^T p$ for the composite coefficients $c$.
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

    /// See [`StencilDirichlet::solve_vec`]
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
        // Multiply right hand side
        for i in 0..self.m {
            composite_coeff[i] =
                orthonorm_coeff[i] * self.diag[i] + orthonorm_coeff[i + 2] * self.low2[i];
        }
        // Solve tridiagonal system
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
    use crate::utils::{approx_eq, approx_eq_complex};
    use ndarray::array;
    use num_complex::Complex;

    #[test]
    fn test_stencil_dirichlet() {
        // phi_0 = 2/3 (L_0 - L_2), phi_1 = 4/5 (L_1 - L_3)
        let stencil = StencilDirichlet::<f64>::new(5);
        let composite = array![1., 1., 1.];
        let orthonorm = stencil.multiply_vec(&composite);
        let c = [2. / 3., 4. / 5., 6. / 7.];
        approx_eq(&orthonorm, &array![c[0], c[1], c[2] - c[0], -c[1], -c[2]]);

        let composite = stencil.solve_vec(&orthonorm);
        approx_eq(&composite, &array![1., 1., 1.]);
    }

    #[test]
    fn test_stencil_dirichlet_complex() {
        let stencil = StencilDirichlet::<f64>::new(6);
        let composite = array![2., 0.7, -1., 0.3].mapv(|x| Complex::new(x, -x));
        let orthonorm = stencil.multiply_vec(&composite);
        let back = stencil.solve_vec(&orthonorm);
        approx_eq_complex(&back, &composite);
    }
}
