//! # Fourier bases
//!
//! Complex exponentials $e^{i k x}$ on $[0, 2\pi)$. Transforms use
//! `ndrustfft`, the forward transform is scaled by $1/n$ such that
//! $$
//! u(x) = \sum_k \hat u_k e^{i k x}.
//! $$
pub mod c2c;
pub mod r2c;
use crate::types::{Complex64, Real};
use ndarray::{Array1, Array2, ArrayD};
use ndrustfft::{ndfft, FftHandler};
use std::f64::consts::PI;
use std::sync::Mutex;

pub use c2c::FourierC2c;
pub use r2c::FourierR2c;

/// Fft plan, created at first use and reused afterwards
pub(crate) struct FftPlan {
    n: usize,
    handler: Mutex<Option<FftHandler<Real>>>,
}

impl FftPlan {
    pub(crate) fn new(n: usize) -> Self {
        Self {
            n,
            handler: Mutex::new(None),
        }
    }

    /// Unscaled forward fft along `axis`
    pub(crate) fn fft(&self, data: &ArrayD<Complex64>, axis: usize) -> ArrayD<Complex64> {
        let mut guard = self
            .handler
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let n = self.n;
        let handler = guard.get_or_insert_with(|| {
            log::trace!("plan fft of size {}", n);
            FftHandler::new(n)
        });
        let mut input = data.clone();
        let mut output = ArrayD::<Complex64>::zeros(data.raw_dim());
        ndfft(&mut input, &mut output, handler, axis);
        output
    }

    /// Unscaled backward fft along `axis`, $\overline{fft(\bar c)}$
    pub(crate) fn ifft(&self, data: &ArrayD<Complex64>, axis: usize) -> ArrayD<Complex64> {
        self.fft(&data.mapv(|c| c.conj()), axis)
            .mapv(|c| c.conj())
    }
}

impl Clone for FftPlan {
    fn clone(&self) -> Self {
        Self::new(self.n)
    }
}

impl std::fmt::Debug for FftPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "FftPlan({})", self.n)
    }
}

/// Equispaced points $2\pi j / n$
pub(crate) fn fourier_points(n: usize) -> Array1<Real> {
    Array1::from_shape_fn(n, |j| 2. * PI * j as Real / n as Real)
}

/// Matrix $(i k)^d e^{i k x}$ (points x wavenumbers)
pub(crate) fn exponentials(x: &Array1<Real>, k: &Array1<Real>, d: usize) -> Array2<Complex64> {
    let mut v = Array2::<Complex64>::zeros((x.len(), k.len()));
    for (mut row, xi) in v.outer_iter_mut().zip(x.iter()) {
        for (r, kj) in row.iter_mut().zip(k.iter()) {
            let ik = Complex64::new(0., *kj);
            *r = ik.powu(d as u32) * Complex64::new(0., kj * xi).exp();
        }
    }
    v
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::utils::approx_eq_complex;
    use ndarray::array;

    #[test]
    fn test_fft_plan() {
        let plan = FftPlan::new(4);
        let data = array![1., 2., 3., 4.].mapv(|v| Complex64::new(v, 0.)).into_dyn();
        let spec = plan.fft(&data, 0);
        let expected = array![
            Complex64::new(10., 0.),
            Complex64::new(-2., 2.),
            Complex64::new(-2., 0.),
            Complex64::new(-2., -2.)
        ]
        .into_dyn();
        approx_eq_complex(&spec, &expected);
        let back = plan.ifft(&spec, 0).mapv(|c| c / 4.);
        approx_eq_complex(&back, &data);
        // plan is reused
        let _ = plan.clone().fft(&data, 0);
    }
}
