//! # Orthogonal Jacobi polynomials
//!
//! Forward transform by Gauss-Jacobi quadrature,
//! $$
//! \hat u_k = \frac{1}{h_k} \sum_j w_j P_k(x_j) u(x_j), \quad
//! h_k = \sum_j w_j P_k(x_j)^2,
//! $$
//! backward transform by summation of the series.
use super::polynomial::{jacobi_derivative_all, jacobi_derivative_vandermonde_with};
use super::quadrature::gauss_jacobi_with;
use crate::config::JacobiConfig;
use crate::enums::{Base, BaseKind};
use crate::error::Result;
use crate::traits::{BaseBasics, BaseSize, FromOrtho, Refine, Transform};
use crate::types::{Complex64, Dtype, Real};
use crate::utils::matvec;
use log::debug;
use ndarray::{Array1, Array2, ArrayView1};
use std::ops::Range;

/// # Orthonormal set of basis functions: Jacobi polynomials $P_k^{(\alpha,\beta)}$
#[derive(Clone, Debug)]
pub struct Jacobi {
    /// Number of coefficients
    pub n: usize,
    /// Parameter of the weight $(1-x)^\alpha$
    pub alpha: Real,
    /// Parameter of the weight $(1+x)^\beta$
    pub beta: Real,
    domain: (Real, Real),
    padding_factor: Real,
    config: JacobiConfig,
    /// Quadrature points on $[-1, 1]$
    points: Array1<Real>,
    /// Quadrature weights
    weights: Array1<Real>,
    /// $P_k(x_j)$ (points x modes)
    vandermonde: Array2<Real>,
    /// Squared norms $h_k$
    norms: Array1<Real>,
}

impl Jacobi {
    /// Jacobi basis with `n` modes on $[-1, 1]$.
    ///
    /// # Errors
    /// $\alpha, \beta \le -1$ or `n == 0`.
    ///
    /// # Example
    /// ```
    /// use funspace_forms::jacobi::Jacobi;
    /// let legendre = Jacobi::new(10, 0., 0.).unwrap();
    /// assert_eq!(legendre.n, 10);
    /// ```
    pub fn new(n: usize, alpha: Real, beta: Real) -> Result<Self> {
        Self::with_parameters(n, alpha, beta, (-1., 1.), 1., JacobiConfig::default())
    }

    /// Legendre polynomials, $\alpha = \beta = 0$
    ///
    /// # Errors
    /// `n == 0`
    pub fn legendre(n: usize) -> Result<Self> {
        Self::new(n, 0., 0.)
    }

    /// Chebyshev polynomials (Jacobi normalization), $\alpha = \beta = -1/2$
    ///
    /// # Errors
    /// `n == 0`
    pub fn chebyshev(n: usize) -> Result<Self> {
        Self::new(n, -0.5, -0.5)
    }

    pub(crate) fn with_parameters(
        n: usize,
        alpha: Real,
        beta: Real,
        domain: (Real, Real),
        padding_factor: Real,
        config: JacobiConfig,
    ) -> Result<Self> {
        let (points, weights) = gauss_jacobi_with(n, alpha, beta, &config)?;
        let vandermonde = jacobi_derivative_vandermonde_with(&points, alpha, beta, n, 0, &config);
        let norms = vandermonde
            .map(|v| v * v)
            .t()
            .dot(&weights);
        debug!(
            "jacobi basis n={} alpha={} beta={} precision={:?}",
            n,
            alpha,
            beta,
            config.effective_precision()
        );
        Ok(Self {
            n,
            alpha,
            beta,
            domain,
            padding_factor,
            config,
            points,
            weights,
            vandermonde,
            norms,
        })
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

    /// Same basis computed with `config`
    ///
    /// # Errors
    /// See [`Jacobi::new`]
    pub fn with_config(self, config: JacobiConfig) -> Result<Self> {
        Self::with_parameters(
            self.n,
            self.alpha,
            self.beta,
            self.domain,
            self.padding_factor,
            config,
        )
    }

    /// Configuration of the polynomial evaluator
    pub fn config(&self) -> &JacobiConfig {
        &self.config
    }

    /// Value of $P_i$ at `x` (reference domain)
    pub fn evaluate_basis(&self, i: usize, x: Real) -> Real {
        self.evaluate_basis_derivative(i, x, 0)
    }

    /// $k$-th derivative of $P_i$ at `x` (reference domain)
    pub fn evaluate_basis_derivative(&self, i: usize, x: Real, k: usize) -> Real {
        jacobi_derivative_all(i + 1, self.alpha, self.beta, k, x)[i]
    }

    /// Matrix of all basis functions at `x` (points x modes)
    pub fn evaluate_basis_all(&self, x: &Array1<Real>) -> Array2<Real> {
        self.evaluate_basis_derivative_all(x, 0)
    }

    /// Matrix of $k$-th derivatives of all basis functions at `x`
    pub fn evaluate_basis_derivative_all(&self, x: &Array1<Real>, k: usize) -> Array2<Real> {
        jacobi_derivative_vandermonde_with(x, self.alpha, self.beta, self.n, k, &self.config)
    }

    /// Squared norms $h_k$ of the polynomials under the quadrature
    pub fn norms(&self) -> &Array1<Real> {
        &self.norms
    }

    /// Weighted inner products $\sum_j w_j P_k(x_j) u_j$ with all modes
    pub fn vandermonde_scalar_product(&self, values: &ArrayView1<Complex64>) -> Array1<Complex64> {
        let weighted = values * &self.weights.mapv(|w| Complex64::new(w, 0.));
        matvec(&self.vandermonde.t().to_owned(), &weighted.view())
    }
}

impl BaseSize for Jacobi {
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

impl BaseBasics for Jacobi {
    fn base_kind(&self) -> BaseKind {
        BaseKind::Jacobi
    }

    fn domain(&self) -> (Real, Real) {
        self.domain
    }

    fn reference_domain(&self) -> (Real, Real) {
        (-1., 1.)
    }

    fn points_and_weights(&self) -> (Array1<Real>, Array1<Real>) {
        (self.points.clone(), self.weights.clone())
    }

    fn slice(&self) -> Range<usize> {
        0..self.n
    }

    fn is_orthogonal(&self) -> bool {
        true
    }

    fn use_fast_transform(&self) -> bool {
        false
    }

    fn padding_factor(&self) -> Real {
        self.padding_factor
    }

    fn physical_dtype(&self) -> Dtype {
        Dtype::Real
    }

    fn spectral_dtype(&self) -> Dtype {
        Dtype::Real
    }

    fn vandermonde_derivative(&self, x: &Array1<Real>, k: usize) -> Array2<Complex64> {
        self.evaluate_basis_derivative_all(x, k)
            .mapv(|v| Complex64::new(v, 0.))
    }
}

impl Transform for Jacobi {
    fn forward_vec(&self, values: &ArrayView1<Complex64>) -> Result<Array1<Complex64>> {
        let mut coeffs = self.vandermonde_scalar_product(values);
        for (c, h) in coeffs.iter_mut().zip(self.norms.iter()) {
            *c = *c / *h;
        }
        Ok(coeffs)
    }

    fn backward_vec(&self, coeffs: &ArrayView1<Complex64>) -> Result<Array1<Complex64>> {
        Ok(matvec(&self.vandermonde, coeffs))
    }
}

impl FromOrtho for Jacobi {
    fn to_ortho_vec(&self, coeffs: &ArrayView1<Complex64>) -> Result<Array1<Complex64>> {
        Ok(coeffs.to_owned())
    }

    fn from_ortho_vec(&self, coeffs: &ArrayView1<Complex64>) -> Result<Array1<Complex64>> {
        Ok(coeffs.to_owned())
    }

    fn get_orthogonal(&self) -> Base {
        Base::Jacobi(self.clone())
    }
}

impl Refine for Jacobi {
    fn get_refined(&self, n: usize) -> Result<Base> {
        Ok(Base::Jacobi(Self::with_parameters(
            n,
            self.alpha,
            self.beta,
            self.domain,
            self.padding_factor,
            self.config,
        )?))
    }

    fn get_dealiased(&self) -> Result<Base> {
        let n = (self.n as Real * self.padding_factor).floor() as usize;
        Ok(Base::Jacobi(Self::with_parameters(
            n,
            self.alpha,
            self.beta,
            self.domain,
            1.,
            self.config,
        )?))
    }

    fn resize_vec(&self, coeffs: &ArrayView1<Complex64>, n: usize) -> Array1<Complex64> {
        let mut out = Array1::<Complex64>::zeros(n);
        let len = n.min(coeffs.len());
        for i in 0..len {
            out[i] = coeffs[i];
        }
        out
    }
}
