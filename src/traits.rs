//! Common traits of all bases
use crate::enums::{Base, BaseKind};
use crate::error::Result;
use crate::types::{Complex64, Dtype, Real};
use crate::utils::apply_along_axis;
use log::trace;
use ndarray::{Array1, Array2, ArrayD, ArrayView1};
use std::ops::Range;

/// Size of a basis in physical and spectral space
#[enum_dispatch]
pub trait BaseSize {
    /// Number of points in physical space
    fn len_phys(&self) -> usize;

    /// Number of stored coefficients in spectral space
    fn len_spec(&self) -> usize;

    /// Number of coefficients of the orthogonal parent space
    fn len_orth(&self) -> usize;
}

/// Geometry, quadrature and point evaluation of a basis
#[enum_dispatch]
pub trait BaseBasics {
    /// Kind of basis
    fn base_kind(&self) -> BaseKind;

    /// Physical domain
    fn domain(&self) -> (Real, Real);

    /// Domain on which the basis functions are defined
    fn reference_domain(&self) -> (Real, Real);

    /// Quadrature points (reference domain) and weights
    fn points_and_weights(&self) -> (Array1<Real>, Array1<Real>);

    /// Range of coefficients which are not structurally zero
    fn slice(&self) -> Range<usize>;

    /// Number of boundary constraints built into the basis
    fn num_constraints(&self) -> usize {
        0
    }

    /// True if the basis is the orthogonal parent of itself
    fn is_orthogonal(&self) -> bool;

    /// Use an FFT based transform instead of matrix products
    fn use_fast_transform(&self) -> bool;

    /// Padding factor for dealiased transforms
    fn padding_factor(&self) -> Real;

    /// Element type in physical space
    fn physical_dtype(&self) -> Dtype;

    /// Element type in spectral space
    fn spectral_dtype(&self) -> Dtype;

    /// Matrix (points x coefficients) of the $k$-th derivative of all
    /// basis functions with respect to the reference coordinate
    fn vandermonde_derivative(&self, x: &Array1<Real>, k: usize) -> Array2<Complex64>;

    /// Scaling of derivatives from reference to physical domain
    fn domain_factor(&self) -> Real {
        let (a, b) = self.domain();
        let (c, d) = self.reference_domain();
        (d - c) / (b - a)
    }

    /// Map points from the physical to the reference domain
    fn map_reference_domain(&self, x: &Array1<Real>) -> Array1<Real> {
        let (a, _) = self.domain();
        let (c, _) = self.reference_domain();
        let f = self.domain_factor();
        x.mapv(|x| c + (x - a) * f)
    }

    /// Map points from the reference to the physical domain
    fn map_true_domain(&self, x: &Array1<Real>) -> Array1<Real> {
        let (a, _) = self.domain();
        let (c, _) = self.reference_domain();
        let f = self.domain_factor();
        x.mapv(|x| a + (x - c) / f)
    }

    /// Quadrature points in the physical domain
    fn mesh(&self) -> Array1<Real> {
        self.map_true_domain(&self.points_and_weights().0)
    }
}

/// Transform between physical values and spectral coefficients
#[enum_dispatch]
pub trait Transform: BaseSize + BaseBasics {
    /// Physical values at the mesh to coefficients
    fn forward_vec(&self, values: &ArrayView1<Complex64>) -> Result<Array1<Complex64>>;

    /// Coefficients to physical values at the mesh
    fn backward_vec(&self, coeffs: &ArrayView1<Complex64>) -> Result<Array1<Complex64>>;

    /// Forward transform of a whole array along `axis` by FFT
    fn forward_fast(&self, data: &ArrayD<Complex64>, axis: usize) -> Result<ArrayD<Complex64>> {
        apply_along_axis(data, axis, self.len_spec(), |v| self.forward_vec(v))
    }

    /// Backward transform of a whole array along `axis` by FFT
    fn backward_fast(&self, data: &ArrayD<Complex64>, axis: usize) -> Result<ArrayD<Complex64>> {
        apply_along_axis(data, axis, self.len_phys(), |v| self.backward_vec(v))
    }

    /// Forward transform along `axis`
    fn forward_axis(&self, data: &ArrayD<Complex64>, axis: usize) -> Result<ArrayD<Complex64>> {
        trace!("forward {} along axis {}", self.base_kind(), axis);
        if self.use_fast_transform() {
            self.forward_fast(data, axis)
        } else {
            apply_along_axis(data, axis, self.len_spec(), |v| self.forward_vec(v))
        }
    }

    /// Backward transform along `axis`
    fn backward_axis(&self, data: &ArrayD<Complex64>, axis: usize) -> Result<ArrayD<Complex64>> {
        trace!("backward {} along axis {}", self.base_kind(), axis);
        if self.use_fast_transform() {
            self.backward_fast(data, axis)
        } else {
            apply_along_axis(data, axis, self.len_phys(), |v| self.backward_vec(v))
        }
    }
}

/// Change of basis between a composite basis and its orthogonal parent
#[enum_dispatch]
pub trait FromOrtho {
    /// Coefficients of this basis to coefficients of the orthogonal parent
    fn to_ortho_vec(&self, coeffs: &ArrayView1<Complex64>) -> Result<Array1<Complex64>>;

    /// Coefficients of the orthogonal parent to coefficients of this basis
    fn from_ortho_vec(&self, coeffs: &ArrayView1<Complex64>) -> Result<Array1<Complex64>>;

    /// Orthogonal parent basis on the same domain
    fn get_orthogonal(&self) -> Base;

    /// [`FromOrtho::to_ortho_vec`] along `axis`
    fn to_ortho_axis(&self, data: &ArrayD<Complex64>, axis: usize) -> Result<ArrayD<Complex64>> {
        let n = data.shape()[axis];
        apply_along_axis(data, axis, n, |v| self.to_ortho_vec(v))
    }
}

/// Change of resolution
#[enum_dispatch]
pub trait Refine {
    /// Same basis with `n` points in physical space
    fn get_refined(&self, n: usize) -> Result<Base>;

    /// Same basis with `n * padding_factor` points in physical space
    fn get_dealiased(&self) -> Result<Base>;

    /// Pad (`n` larger) or truncate (`n` smaller) coefficients to the
    /// basis with `n` physical points
    fn resize_vec(&self, coeffs: &ArrayView1<Complex64>, n: usize) -> Array1<Complex64>;
}
