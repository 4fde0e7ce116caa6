//! Fourier basis, real-to-complex
use super::{exponentials, fourier_points, FftPlan};
use crate::enums::{Base, BaseKind};
use crate::error::Result;
use crate::traits::{BaseBasics, BaseSize, FromOrtho, Refine, Transform};
use crate::types::{Complex64, Dtype, Real};
use crate::utils::apply_along_axis;
use log::debug;
use ndarray::{Array1, Array2, ArrayD, ArrayView1, Axis, Slice};
use std::f64::consts::PI;
use std::ops::Range;

/// # Fourier basis for real valued functions
///
/// Only the non-negative wavenumbers $0, \dots, n/2$ are stored, the
/// others follow from $\hat u_{-k} = \overline{\hat u_k}$.
#[derive(Clone, Debug)]
pub struct FourierR2c {
    /// Number of coefficients in physical space
    pub n: usize,
    /// Number of coefficients in spectral space
    pub m: usize,
    /// Wavenumbers
    pub k: Array1<Real>,
    domain: (Real, Real),
    padding_factor: Real,
    plan: FftPlan,
}

impl FourierR2c {
    /// Fourier basis with `n` points on $[0, 2\pi)$
    ///
    /// # Example
    /// ```
    /// use funspace_forms::fourier::FourierR2c;
    /// let fo = FourierR2c::new(6);
    /// assert_eq!(fo.m, 4);
    /// ```
    pub fn new(n: usize) -> Self {
        let m = n / 2 + 1;
        debug!("fourier r2c basis n={} m={}", n, m);
        Self {
            n,
            m,
            k: Array1::from_shape_fn(m, |i| i as Real),
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

    /// Complete the spectrum from the non-negative wavenumbers
    fn expand_hermitian(&self, coeffs: &ArrayView1<Complex64>) -> Array1<Complex64> {
        let mut full = Array1::<Complex64>::zeros(self.n);
        for (i, c) in coeffs.iter().enumerate() {
            full[i] = *c;
            let j = self.n - i;
            if i > 0 && j >= self.m {
                full[j] = c.conj();
            }
        }
        full
    }
}

impl BaseSize for FourierR2c {
    fn len_phys(&self) -> usize {
        self.n
    }

    fn len_spec(&self) -> usize {
        self.m
    }

    fn len_orth(&self) -> usize {
        self.m
    }
}

impl BaseBasics for FourierR2c {
    fn base_kind(&self) -> BaseKind {
        BaseKind::FourierR2c
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
        0..self.m
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
        Dtype::Real
    }

    fn spectral_dtype(&self) -> Dtype {
        Dtype::Complex
    }

    fn vandermonde_derivative(&self, x: &Array1<Real>, k: usize) -> Array2<Complex64> {
        exponentials(x, &self.k, k)
    }
}

impl Transform for FourierR2c {
    fn forward_vec(&self, values: &ArrayView1<Complex64>) -> Result<Array1<Complex64>> {
        let spec = self.forward_fast(&values.to_owned().into_dyn(), 0)?;
        Ok(spec.into_dimensionality()?)
    }

    fn backward_vec(&self, coeffs: &ArrayView1<Complex64>) -> Result<Array1<Complex64>> {
        let phys = self.backward_fast(&coeffs.to_owned().into_dyn(), 0)?;
        Ok(phys.into_dimensionality()?)
    }

    /// Imaginary parts of the input are discarded
    fn forward_fast(&self, data: &ArrayD<Complex64>, axis: usize) -> Result<ArrayD<Complex64>> {
        let scale = 1. / self.n as Real;
        let real = data.mapv(|c| Complex64::new(c.re, 0.));
        let full = self.plan.fft(&real, axis);
        Ok(full
            .slice_axis(Axis(axis), Slice::from(0..self.m))
            .mapv(|c| c * scale))
    }

    fn backward_fast(&self, data: &ArrayD<Complex64>, axis: usize) -> Result<ArrayD<Complex64>> {
        let full = apply_along_axis(data, axis, self.n, |c| Ok(self.expand_hermitian(c)))?;
        Ok(self
            .plan
            .ifft(&full, axis)
            .mapv(|c| Complex64::new(c.re, 0.)))
    }
}

impl FromOrtho for FourierR2c {
    fn to_ortho_vec(&self, coeffs: &ArrayView1<Complex64>) -> Result<Array1<Complex64>> {
        Ok(coeffs.to_owned())
    }

    fn from_ortho_vec(&self, coeffs: &ArrayView1<Complex64>) -> Result<Array1<Complex64>> {
        Ok(coeffs.to_owned())
    }

    fn get_orthogonal(&self) -> Base {
        Base::FourierR2c(self.clone())
    }
}

impl Refine for FourierR2c {
    fn get_refined(&self, n: usize) -> Result<Base> {
        Ok(Base::FourierR2c(
            Self::new(n)
                .with_domain(self.domain)
                .with_padding_factor(self.padding_factor),
        ))
    }

    /// Physical size $\lfloor (2m - 2) f \rfloor$ for even $n$, the
    /// spectral size follows as $n/2 + 1$
    fn get_dealiased(&self) -> Result<Base> {
        let n_old = if self.n % 2 == 0 { 2 * self.m - 2 } else { self.n };
        let n = (n_old as Real * self.padding_factor).floor() as usize;
        Ok(Base::FourierR2c(Self::new(n).with_domain(self.domain)))
    }

    /// On padding the Nyquist mode is halved, on truncation the new
    /// Nyquist mode is doubled
    fn resize_vec(&self, coeffs: &ArrayView1<Complex64>, n: usize) -> Array1<Complex64> {
        let m_new = n / 2 + 1;
        let mut out = Array1::<Complex64>::zeros(m_new);
        let len = self.m.min(m_new);
        for i in 0..len {
            out[i] = coeffs[i];
        }
        if n > self.n && self.n % 2 == 0 {
            out[self.n / 2] = out[self.n / 2] * 0.5;
        } else if n < self.n && n % 2 == 0 {
            out[n / 2] = out[n / 2] * 2.;
        }
        out
    }
}
