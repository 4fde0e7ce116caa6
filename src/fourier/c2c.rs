//! Fourier basis, complex-to-complex
use super::{exponentials, fourier_points, FftPlan};
use crate::enums::{Base, BaseKind};
use crate::error::Result;
use crate::traits::{BaseBasics, BaseSize, FromOrtho, Refine, Transform};
use crate::types::{Complex64, Dtype, Real};
use log::debug;
use ndarray::{s, Array1, Array2, ArrayD, ArrayView1};
use std::f64::consts::PI;
use std::ops::Range;

/// # Fourier basis with all wavenumbers
///
/// Coefficients are stored in fft order, $0, 1, \dots, -2, -1$.
#[derive(Clone, Debug)]
pub struct FourierC2c {
    /// Number of coefficients in physical space
    pub n: usize,
    /// Wavenumbers
    pub k: Array1<Real>,
    domain: (Real, Real),
    padding_factor: Real,
    plan: FftPlan,
}

impl FourierC2c {
    /// Fourier basis with `n` points on $[0, 2\pi)$
    ///
    /// # Example
    /// ```
    /// use funspace_forms::fourier::FourierC2c;
    /// let fo = FourierC2c::new(6);
    /// assert_eq!(fo.k[4], -2.);
    /// ```
    pub fn new(n: usize) -> Self {
        debug!("fourier c2c basis n={}", n);
        Self {
            n,
            k: Self::wavenumber(n),
            domain: (0., 2. * PI),
            padding_factor: 1.,
            plan: FftPlan::new(n),
        }
    }

    /// Same basis on physical domain `(a, b)`
    #[must_use]
    pub fn with_domain(mut self, domain: (Real, Real)) -> Self {
        self.domain = domain;
        self
    }

    /// Same basis with dealiasing factor
    #[must_use]
    pub fn with_padding_factor(mut self, padding_factor: Real) -> Self {
        self.padding_factor = padding_factor;
        self
    }

    /// Wavenumbers in fft order
    pub fn wavenumber(n: usize) -> Array1<Real> {
        Array1::from_shape_fn(n, |i| {
            if i <= n.saturating_sub(1) / 2 {
                i as Real
            } else {
                i as Real - n as Real
            }
        })
    }
}

/// Pad or truncate coefficients in fft order. On padding the Nyquist
/// mode is split in halves between $\pm n/2$, on truncation the two
/// halves are added.
pub(crate) fn resize_fft_order(coeffs: &ArrayView1<Complex64>, n_new: usize) -> Array1<Complex64> {
    let n_old = coeffs.len();
    let mut out = Array1::<Complex64>::zeros(n_new);
    let n_min = n_old.min(n_new);
    if n_min == 0 {
        return out;
    }
    let pos = (n_min + 1) / 2;
    let neg = (n_min - 1) / 2;
    out.slice_mut(s![..pos]).assign(&coeffs.slice(s![..pos]));
    out.slice_mut(s![n_new - neg..])
        .assign(&coeffs.slice(s![n_old - neg..]));
    if n_min % 2 == 0 {
        let nyq = n_min / 2;
        if n_new > n_old {
            let half = coeffs[nyq] * 0.5;
            out[nyq] = half;
            out[n_new - nyq] = half;
        } else if n_new < n_old {
            out[nyq] = coeffs[nyq] + coeffs[n_old - nyq];
        } else {
            out[nyq] = coeffs[nyq];
        }
    }
    out
}

impl BaseSize for FourierC2c {
    fn len_phys(&self) -> usize {
        self.n
    }

    fn len_spec(&self) -> usize {
        self.n
    }

    fn len_orth(&self) -> usize {
        self.n
    }
}

impl BaseBasics for FourierC2c {
    fn base_kind(&self) -> BaseKind {
        BaseKind::FourierC2c
    }

    fn domain(&self) -> (Real, Real) {
        self.domain
    }

    fn reference_domain(&self) -> (Real, Real) {
        (0., 2. * PI)
    }

    fn points_and_weights(&self) -> (Array1<Real>, Array1<Real>) {
        let w = 2. * PI / self.n as Real;
        (fourier_points(self.n), Array1::from_elem(self.n, w))
    }

    fn slice(&self) -> Range<usize> {
        0..self.n
    }

    fn is_orthogonal(&self) -> bool {
        true
    }

    fn use_fast_transform(&self) -> bool {
        true
    }

    fn padding_factor(&self) -> Real {
        self.padding_factor
    }

    fn physical_dtype(&self) -> Dtype {
        Dtype::Complex
    }

    fn spectral_dtype(&self) -> Dtype {
        Dtype::Complex
    }

    fn vandermonde_derivative(&self, x: &Array1<Real>, k: usize) -> Array2<Complex64> {
        exponentials(x, &self.k, k)
    }
}

impl Transform for FourierC2c {
    fn forward_vec(&self, values: &ArrayView1<Complex64>) -> Result<Array1<Complex64>> {
        let spec = self.forward_fast(&values.to_owned().into_dyn(), 0)?;
        Ok(spec.into_dimensionality()?)
    }

    fn backward_vec(&self, coeffs: &ArrayView1<Complex64>) -> Result<Array1<Complex64>> {
        let phys = self.backward_fast(&coeffs.to_owned().into_dyn(), 0)?;
        Ok(phys.into_dimensionality()?)
    }

    fn forward_fast(&self, data: &ArrayD<Complex64>, axis: usize) -> Result<ArrayD<Complex64>> {
        let scale = 1. / self.n as Real;
        Ok(self.plan.fft(data, axis).mapv(|c| c * scale))
    }

    fn backward_fast(&self, data: &ArrayD<Complex64>, axis: usize) -> Result<ArrayD<Complex64>> {
        Ok(self.plan.ifft(data, axis))
    }
}

impl FromOrtho for FourierC2c {
    fn to_ortho_vec(&self, coeffs: &ArrayView1<Complex64>) -> Result<Array1<Complex64>> {
        Ok(coeffs.to_owned())
    }

    fn from_ortho_vec(&self, coeffs: &ArrayView1<Complex64>) -> Result<Array1<Complex64>> {
        Ok(coeffs.to_owned())
    }

    fn get_orthogonal(&self) -> Base {
        Base::FourierC2c(self.clone())
    }
}

impl Refine for FourierC2c {
    fn get_refined(&self, n: usize) -> Result<Base> {
        Ok(Base::FourierC2c(
            Self::new(n)
                .with_domain(self.domain)
                .with_padding_factor(self.padding_factor),
        ))
    }

    fn get_dealiased(&self) -> Result<Base> {
        let n = (self.n as Real * self.padding_factor).floor() as usize;
        Ok(Base::FourierC2c(Self::new(n).with_domain(self.domain)))
    }

    fn resize_vec(&self, coeffs: &ArrayView1<Complex64>, n: usize) -> Array1<Complex64> {
        resize_fft_order(coeffs, n)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::utils::approx_eq_complex;
    use ndarray::array;

    #[test]
    fn test_wavenumber() {
        assert_eq!(FourierC2c::wavenumber(4), array![0., 1., -2., -1.]);
        assert_eq!(FourierC2c::wavenumber(5), array![0., 1., 2., -2., -1.]);
    }

    #[test]
    fn test_forward_matches_series() {
        let fo = FourierC2c::new(8);
        let x = fo.mesh();
        let values = x.mapv(|x| Complex64::new(0., 2. * x).exp() + Complex64::new(3. * x.cos(), 0.));
        let coeffs = fo.forward_vec(&values.view()).unwrap();
        let mut expected = Array1::<Complex64>::zeros(8);
        expected[2] = Complex64::new(1., 0.);
        expected[1] = Complex64::new(1.5, 0.);
        expected[7] = Complex64::new(1.5, 0.);
        approx_eq_complex(&coeffs, &expected);
        let back = fo.backward_vec(&coeffs.view()).unwrap();
        approx_eq_complex(&back, &values);
        // series evaluation agrees with fft
        let v = fo.vandermonde_derivative(&x, 0);
        approx_eq_complex(&v.dot(&coeffs), &values);
    }

    #[test]
    fn test_resize_roundtrip() {
        let c = array![1., 2., 3., 4., 5., 6.].mapv(|v| Complex64::new(v, -v));
        let padded = resize_fft_order(&c.view(), 10);
        assert_eq!(padded[3], c[3] * 0.5);
        assert_eq!(padded[7], c[3] * 0.5);
        assert_eq!(padded[9], c[5]);
        let back = resize_fft_order(&padded.view(), 6);
        approx_eq_complex(&back, &c);
    }
}
