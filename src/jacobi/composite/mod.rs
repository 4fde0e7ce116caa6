//! # Composite Jacobi bases
//!
//! Bases with homogeneous boundary conditions built from Jacobi
//! polynomials. Dirichlet, biharmonic and 6th order bases are generalized
//! Jacobi functions
//! $$
//! \phi_k = (1-x^2)^m P_k^{(m,m)}, \quad m = 1, 2, 3,
//! $$
//! which vanish with their first $m-1$ derivatives at $\pm 1$. The Neumann
//! basis is a combination of Legendre polynomials.
//!
//! All composite bases have Legendre polynomials as orthogonal parent and
//! share the Legendre quadrature.
pub mod biharmonic;
pub mod dirichlet;
pub mod neumann;
pub mod stencil;
use super::float::JacobiFloat;
use super::linalg::lu_solve;
use super::ortho::Jacobi;
use super::polynomial::jacobi_derivative_all;
use crate::config::JacobiConfig;
use crate::enums::{Base, BaseKind, BcKind, BcSpec};
use crate::error::{FunspaceError, Result};
use crate::traits::{BaseBasics, BaseSize, FromOrtho, Refine, Transform};
use crate::types::{Complex64, Dtype, Real};
use crate::utils::{binomial, matvec};
pub use biharmonic::StencilBiharmonic;
pub use dirichlet::StencilDirichlet;
use log::debug;
use ndarray::{s, Array1, Array2, ArrayView1, Axis};
pub use neumann::StencilNeumann;
pub use stencil::{Stencil, StencilJacobi};
use std::ops::Range;

/// Tolerance below which a boundary value counts as homogeneous
const BC_TOL: Real = 1e-12;

/// Composite basis of Jacobi type with homogeneous boundary conditions
#[derive(Clone, Debug)]
pub struct CompositeJacobi {
    /// Number of points in physical space
    pub n: usize,
    /// Number of free coefficients
    pub m: usize,
    bc: BcKind,
    /// Orthogonal parent (Legendre)
    ortho: Jacobi,
    /// Transform stencil to the parent, if a closed form is known
    stencil: Option<StencilJacobi<Real>>,
    /// Basis functions at the quadrature points (points x n)
    vandermonde: Array2<Real>,
    /// $L^2$ projection onto the free modes (m x points)
    projection: Array2<Real>,
}

impl CompositeJacobi {
    /// Composite basis with `n` points and boundary condition `bc`.
    ///
    /// `spec` must be the name of the condition or a tuple of zeros of
    /// the matching arity.
    ///
    /// # Errors
    /// Non-homogeneous or wrong-arity boundary values, unknown names, or
    /// too few points.
    ///
    /// # Example
    /// ```
    /// use funspace_forms::enums::{BcKind, BcSpec};
    /// use funspace_forms::jacobi::CompositeJacobi;
    /// assert!(CompositeJacobi::new(8, BcKind::Dirichlet, &(0., 0.).into()).is_ok());
    /// assert!(CompositeJacobi::new(8, BcKind::Dirichlet, &(1., 0.).into()).is_err());
    /// ```
    pub fn new(n: usize, bc: BcKind, spec: &BcSpec) -> Result<Self> {
        Self::check_bc(bc, spec)?;
        Self::with_parameters(n, bc, (-1., 1.), 1., JacobiConfig::default())
    }

    /// Dirichlet basis $\phi_k = (1-x^2) P_k^{(1,1)}$
    ///
    /// # Errors
    /// `n < 3`
    pub fn dirichlet(n: usize) -> Result<Self> {
        Self::new(n, BcKind::Dirichlet, &BcKind::Dirichlet.tag().into())
    }

    /// Neumann basis $\phi_k = L_k - k(k+1)/((k+2)(k+3)) L_{k+2}$
    ///
    /// # Errors
    /// `n < 3`
    pub fn neumann(n: usize) -> Result<Self> {
        Self::new(n, BcKind::Neumann, &BcKind::Neumann.tag().into())
    }

    /// Biharmonic basis $\phi_k = (1-x^2)^2 P_k^{(2,2)}$
    ///
    /// # Errors
    /// `n < 5`
    pub fn biharmonic(n: usize) -> Result<Self> {
        Self::new(n, BcKind::Biharmonic, &BcKind::Biharmonic.tag().into())
    }

    /// 6th order basis $\phi_k = (1-x^2)^3 P_k^{(3,3)}$
    ///
    /// # Errors
    /// `n < 7`
    pub fn order6(n: usize) -> Result<Self> {
        Self::new(n, BcKind::Order6, &BcKind::Order6.tag().into())
    }

    /// Accept only the name of `bc` or zeros of the matching arity
    fn check_bc(bc: BcKind, spec: &BcSpec) -> Result<()> {
        match spec {
            BcSpec::Named(name) => {
                if name.trim().to_lowercase() == bc.tag() {
                    Ok(())
                } else {
                    Err(FunspaceError::BoundaryCondition(format!(
                        "expected '{}', got '{}'",
                        bc.tag(),
                        name
                    )))
                }
            }
            BcSpec::Values(values) => {
                if values.len() != bc.num_constraints() {
                    return Err(FunspaceError::BoundaryCondition(format!(
                        "{} needs {} values, got {}",
                        bc,
                        bc.num_constraints(),
                        values.len()
                    )));
                }
                if values.iter().any(|v| v.abs() > BC_TOL) {
                    return Err(FunspaceError::BoundaryCondition(format!(
                        "only homogeneous {} conditions are supported, got {:?}",
                        bc, values
                    )));
                }
                Ok(())
            }
        }
    }

    fn with_parameters(
        n: usize,
        bc: BcKind,
        domain: (Real, Real),
        padding_factor: Real,
        config: JacobiConfig,
    ) -> Result<Self> {
        if n <= bc.num_constraints() {
            return Err(FunspaceError::Parameter(format!(
                "{} basis needs more than {} points, got {}",
                bc,
                bc.num_constraints(),
                n
            )));
        }
        let m = n - bc.num_constraints();
        let ortho = Jacobi::with_parameters(n, 0., 0., domain, padding_factor, config)?;
        let stencil: Option<StencilJacobi<Real>> = match bc {
            BcKind::Dirichlet => Some(StencilDirichlet::new(n).into()),
            BcKind::Neumann => Some(StencilNeumann::new(n).into()),
            BcKind::Biharmonic => Some(StencilBiharmonic::new(n).into()),
            BcKind::Order6 => None,
        };
        let mut base = Self {
            n,
            m,
            bc,
            ortho,
            stencil,
            vandermonde: Array2::zeros((n, n)),
            projection: Array2::zeros((m, n)),
        };
        let (points, weights) = base.ortho.points_and_weights();
        base.vandermonde = base.evaluate_basis_all(&points);
        // Galerkin projection: (B^T W B) c = B^T W u
        let free = base.vandermonde.slice(s![.., ..m]);
        let btw = &free.t() * &weights.view().insert_axis(Axis(0));
        let mass = btw.dot(&free);
        base.projection = lu_solve(&mass, &btw)?;
        debug!(
            "composite jacobi basis {} n={} m={} precision={:?}",
            bc,
            n,
            m,
            config.effective_precision()
        );
        Ok(base)
    }

    /// Same basis on physical domain `(a, b)`
    #[must_use]
    pub fn with_domain(mut self, domain: (Real, Real)) -> Self {
        self.ortho = self.ortho.with_domain(domain);
        self
    }

    /// Same basis with dealiasing factor
    #[must_use]
    pub fn with_padding_factor(mut self, padding_factor: Real) -> Self {
        self.ortho = self.ortho.with_padding_factor(padding_factor);
        self
    }

    /// Same basis computed with `config`
    ///
    /// # Errors
    /// See [`CompositeJacobi::new`]
    pub fn with_config(self, config: JacobiConfig) -> Result<Self> {
        Self::with_parameters(
            self.n,
            self.bc,
            self.ortho.domain(),
            self.ortho.padding_factor(),
            config,
        )
    }

    /// Boundary condition of the basis
    pub fn bc(&self) -> BcKind {
        self.bc
    }

    /// Transform stencil to the orthogonal parent
    pub fn stencil(&self) -> Option<&StencilJacobi<Real>> {
        self.stencil.as_ref()
    }

    /// Jacobi parameters $(\alpha, \beta)$ of the generalized Jacobi
    /// functions, $-m$ for envelope $(1-x^2)^m$ and $0$ for Neumann
    pub fn parameters(&self) -> (Real, Real) {
        match self.envelope_power() {
            Some(p) => (-(p as Real), -(p as Real)),
            None => (0., 0.),
        }
    }

    /// Power $m$ of the envelope $(1-x^2)^m$
    fn envelope_power(&self) -> Option<usize> {
        match self.bc {
            BcKind::Dirichlet => Some(1),
            BcKind::Biharmonic => Some(2),
            BcKind::Order6 => Some(3),
            BcKind::Neumann => None,
        }
    }

    /// Value of basis function `i` at `x` (reference domain).
    ///
    /// Modes outside [`BaseBasics::slice`] are zero.
    pub fn evaluate_basis(&self, i: usize, x: Real) -> Real {
        self.evaluate_basis_derivative(i, x, 0)
    }

    /// $k$-th derivative of basis function `i` at `x` (reference domain)
    pub fn evaluate_basis_derivative(&self, i: usize, x: Real, k: usize) -> Real {
        if i >= self.m {
            return 0.;
        }
        self.derivative_all_at(x, k)[i]
    }

    /// Matrix of all basis functions at `x` (points x n), constrained
    /// trailing columns are zero
    pub fn evaluate_basis_all(&self, x: &Array1<Real>) -> Array2<Real> {
        self.evaluate_basis_derivative_all(x, 0)
    }

    /// Matrix of $k$-th derivatives of all basis functions at `x`
    pub fn evaluate_basis_derivative_all(&self, x: &Array1<Real>, k: usize) -> Array2<Real> {
        let mut v = Array2::<Real>::zeros((x.len(), self.n));
        for (mut row, xi) in v.outer_iter_mut().zip(x.iter()) {
            let d = self.derivative_all_at_with_config(*xi, k);
            for (r, dj) in row.iter_mut().zip(d.into_iter()) {
                *r = dj;
            }
        }
        v
    }

    fn derivative_all_at_with_config(&self, x: Real, k: usize) -> Vec<Real> {
        #[cfg(feature = "xprec")]
        if self.ortho.config().is_extended() {
            return self
                .derivative_all_at(twofloat::TwoFloat::from(x), k)
                .into_iter()
                .map(JacobiFloat::to_f64)
                .collect();
        }
        self.derivative_all_at(x, k)
    }

    /// $k$-th derivatives of the `m` free basis functions at one point
    fn derivative_all_at<F: JacobiFloat>(&self, x: F, k: usize) -> Vec<F> {
        let mut out = vec![F::zero(); self.m];
        match self.envelope_power() {
            Some(p) => {
                let a = p as Real;
                // Leibniz rule on envelope times Jacobi polynomial
                for l in 0..=k.min(2 * p) {
                    let e = F::from(binomial(k, l)) * envelope_derivative(p, l, x);
                    let d = jacobi_derivative_all(self.m, a, a, k - l, x);
                    for (o, dj) in out.iter_mut().zip(d.into_iter()) {
                        *o = *o + e * dj;
                    }
                }
            }
            None => {
                let d = jacobi_derivative_all(self.n, 0., 0., k, x);
                for (i, o) in out.iter_mut().enumerate() {
                    let (_, low2) = neumann_coefficients(i);
                    *o = d[i] + F::from(low2) * d[i + 2];
                }
            }
        }
        out
    }

    /// Weighted inner products of `values` with all basis functions.
    /// The last `num_constraints` entries are zero.
    pub fn vandermonde_scalar_product(&self, values: &ArrayView1<Complex64>) -> Array1<Complex64> {
        let (_, weights) = self.ortho.points_and_weights();
        let weighted = values * &weights.mapv(|w| Complex64::new(w, 0.));
        let mut out = matvec(&self.vandermonde.t().to_owned(), &weighted.view());
        out.slice_mut(s![self.m..]).fill(Complex64::new(0., 0.));
        out
    }

    /// Composite coefficients (length `n`) to Legendre coefficients.
    ///
    /// # Errors
    /// The 6th order basis has no closed form recurrence.
    pub fn to_ortho(&self, coeffs: &ArrayView1<Complex64>) -> Result<Array1<Complex64>> {
        if self.bc == BcKind::Dirichlet {
            let (alpha, beta) = self.parameters();
            if alpha != -1. || beta != -1. {
                return Err(FunspaceError::Structure(format!(
                    "dirichlet recurrence requires alpha = beta = -1, got ({}, {})",
                    alpha, beta
                )));
            }
        }
        let stencil = self.stencil_or_err()?;
        Ok(stencil.multiply_vec(&coeffs.slice(s![..self.m])))
    }

    /// Legendre coefficients to composite coefficients (length `n`), the
    /// least squares inverse of [`CompositeJacobi::to_ortho`]
    ///
    /// # Errors
    /// The 6th order basis has no closed form recurrence.
    pub fn from_ortho(&self, coeffs: &ArrayView1<Complex64>) -> Result<Array1<Complex64>> {
        let stencil = self.stencil_or_err()?;
        let mut out = Array1::<Complex64>::zeros(self.n);
        out.slice_mut(s![..self.m]).assign(&stencil.solve_vec(coeffs));
        Ok(out)
    }

    fn stencil_or_err(&self) -> Result<&StencilJacobi<Real>> {
        self.stencil.as_ref().ok_or_else(|| {
            FunspaceError::NotImplemented(format!("to_ortho of the {} basis", self.bc))
        })
    }
}

/// Coefficients $(1, -k(k+1)/((k+2)(k+3)))$ of the Neumann basis
fn neumann_coefficients(k: usize) -> (Real, Real) {
    let k = k as Real;
    (1., -k * (k + 1.) / ((k + 2.) * (k + 3.)))
}

/// $l$-th derivative of $(1-x^2)^p$
fn envelope_derivative<F: JacobiFloat>(p: usize, l: usize, x: F) -> F {
    if l == 0 {
        return (F::one() - x * x).powi_(p);
    }
    let mut acc = F::zero();
    for j in 0..=p {
        if 2 * j < l {
            continue;
        }
        let mut c = binomial(p, j) * if j % 2 == 0 { 1. } else { -1. };
        for t in 0..l {
            c *= (2 * j - t) as Real;
        }
        acc = acc + F::from(c) * x.powi_(2 * j - l);
    }
    acc
}

impl BaseSize for CompositeJacobi {
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

impl BaseBasics for CompositeJacobi {
    fn base_kind(&self) -> BaseKind {
        match self.bc {
            BcKind::Dirichlet => BaseKind::JacobiDirichlet,
            BcKind::Neumann => BaseKind::LegendreNeumann,
            BcKind::Biharmonic => BaseKind::JacobiBiharmonic,
            BcKind::Order6 => BaseKind::JacobiOrder6,
        }
    }

    fn domain(&self) -> (Real, Real) {
        self.ortho.domain()
    }

    fn reference_domain(&self) -> (Real, Real) {
        (-1., 1.)
    }

    fn points_and_weights(&self) -> (Array1<Real>, Array1<Real>) {
        self.ortho.points_and_weights()
    }

    fn slice(&self) -> Range<usize> {
        0..self.m
    }

    fn num_constraints(&self) -> usize {
        self.bc.num_constraints()
    }

    fn is_orthogonal(&self) -> bool {
        false
    }

    fn use_fast_transform(&self) -> bool {
        false
    }

    fn padding_factor(&self) -> Real {
        self.ortho.padding_factor()
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

impl Transform for CompositeJacobi {
    fn forward_vec(&self, values: &ArrayView1<Complex64>) -> Result<Array1<Complex64>> {
        let mut coeffs = Array1::<Complex64>::zeros(self.n);
        coeffs
            .slice_mut(s![..self.m])
            .assign(&matvec(&self.projection, values));
        Ok(coeffs)
    }

    fn backward_vec(&self, coeffs: &ArrayView1<Complex64>) -> Result<Array1<Complex64>> {
        Ok(matvec(&self.vandermonde, coeffs))
    }
}

impl FromOrtho for CompositeJacobi {
    fn to_ortho_vec(&self, coeffs: &ArrayView1<Complex64>) -> Result<Array1<Complex64>> {
        self.to_ortho(coeffs)
    }

    fn from_ortho_vec(&self, coeffs: &ArrayView1<Complex64>) -> Result<Array1<Complex64>> {
        self.from_ortho(coeffs)
    }

    fn get_orthogonal(&self) -> Base {
        Base::Jacobi(self.ortho.clone())
    }
}

impl Refine for CompositeJacobi {
    fn get_refined(&self, n: usize) -> Result<Base> {
        Ok(Base::CompositeJacobi(Self::with_parameters(
            n,
            self.bc,
            self.domain(),
            self.padding_factor(),
            *self.ortho.config(),
        )?))
    }

    fn get_dealiased(&self) -> Result<Base> {
        let n = (self.n as Real * self.padding_factor()).floor() as usize;
        Ok(Base::CompositeJacobi(Self::with_parameters(
            n,
            self.bc,
            self.domain(),
            1.,
            *self.ortho.config(),
        )?))
    }

    fn resize_vec(&self, coeffs: &ArrayView1<Complex64>, n: usize) -> Array1<Complex64> {
        let mut out = Array1::<Complex64>::zeros(n);
        let m_new = n.saturating_sub(self.num_constraints());
        let len = self.m.min(m_new);
        out.slice_mut(s![..len]).assign(&coeffs.slice(s![..len]));
        out
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::jacobi::polynomial::jacobi;
    use crate::utils::{approx_eq_complex, approx_eq_tol};
    use ndarray::array;

    fn all_bases(n: usize) -> Vec<CompositeJacobi> {
        vec![
            CompositeJacobi::dirichlet(n).unwrap(),
            CompositeJacobi::neumann(n).unwrap(),
            CompositeJacobi::biharmonic(n).unwrap(),
            CompositeJacobi::order6(n).unwrap(),
        ]
    }

    #[test]
    fn test_boundary_condition_checks() {
        let bc = BcKind::Dirichlet;
        assert!(CompositeJacobi::new(8, bc, &(0., 0.).into()).is_ok());
        assert!(CompositeJacobi::new(8, bc, &"Dirichlet".into()).is_ok());
        assert!(CompositeJacobi::new(8, bc, &(1., 0.).into()).is_err());
        assert!(CompositeJacobi::new(8, bc, &(0., 0., 0., 0.).into()).is_err());
        assert!(CompositeJacobi::new(8, bc, &"neumann".into()).is_err());
        let bc = BcKind::Biharmonic;
        assert!(CompositeJacobi::new(8, bc, &(0., 0., 0., 0.).into()).is_ok());
        assert!(CompositeJacobi::new(8, bc, &(0., 0., 0., 1.).into()).is_err());
        assert!(CompositeJacobi::new(4, bc, &"biharmonic".into()).is_err());
        let bc = BcKind::Order6;
        assert!(CompositeJacobi::new(10, bc, &vec![0.; 6].into()).is_ok());
        assert!(CompositeJacobi::new(10, bc, &"6th order".into()).is_ok());
    }

    #[test]
    fn test_to_ortho_reproduces_values() {
        let x = array![-1., -0.7, -0.1, 0.25, 0.8, 1.];
        for base in all_bases(12).iter().take(3) {
            let composite = base.evaluate_basis_all(&x);
            let legendre = base.ortho.evaluate_basis_all(&x);
            for i in base.slice() {
                let mut c = Array1::<Complex64>::zeros(base.n);
                c[i] = Complex64::new(1., 0.);
                let p = base.to_ortho(&c.view()).unwrap().mapv(|v| v.re);
                approx_eq_tol(&legendre.dot(&p), &composite.column(i).to_owned(), 1e-10);
            }
        }
    }

    #[test]
    fn test_boundary_values_vanish() {
        let x = array![-1., 1.];
        for base in all_bases(14).iter() {
            let orders: Vec<usize> = match base.bc() {
                BcKind::Dirichlet => vec![0],
                BcKind::Neumann => vec![1],
                BcKind::Biharmonic => vec![0, 1],
                BcKind::Order6 => vec![0, 1, 2],
            };
            for k in orders {
                let v = base.evaluate_basis_derivative_all(&x, k);
                for i in base.slice() {
                    assert!(v[[0, i]].abs() < 1e-9, "{} k={} i={}", base.bc(), k, i);
                    assert!(v[[1, i]].abs() < 1e-9, "{} k={} i={}", base.bc(), k, i);
                }
            }
        }
    }

    #[test]
    fn test_biharmonic_first_mode() {
        let base = CompositeJacobi::biharmonic(32).unwrap();
        let (x, _) = base.points_and_weights();
        let v = base.evaluate_basis_all(&x);
        let expected = x.mapv(|x| (1. - x * x).powi(2) * jacobi(0, 2., 2., x));
        approx_eq_tol(&v.column(0).to_owned(), &expected, 1e-12);
        assert!(base.evaluate_basis(0, 1.).abs() < 1e-14);
        assert!(base.evaluate_basis(0, -1.).abs() < 1e-14);
    }

    #[test]
    fn test_derivative_matches_finite_difference() {
        let h = 1e-5;
        for base in all_bases(10).iter() {
            for i in base.slice() {
                let x = 0.3;
                let fd = (base.evaluate_basis(i, x + h) - base.evaluate_basis(i, x - h)) / (2. * h);
                let d = base.evaluate_basis_derivative(i, x, 1);
                assert!((fd - d).abs() < 1e-5 * d.abs().max(1.));
            }
        }
    }

    #[test]
    fn test_forward_backward() {
        for base in all_bases(16).iter() {
            let x = base.mesh();
            let mut c = Array1::<Complex64>::zeros(base.n);
            for i in base.slice() {
                c[i] = Complex64::new(1. / (i as f64 + 1.), 0.);
            }
            let values = base.backward_vec(&c.view()).unwrap();
            assert_eq!(values.len(), x.len());
            let back = base.forward_vec(&values.view()).unwrap();
            approx_eq_complex(&back, &c);
        }
    }

    #[test]
    fn test_from_ortho_inverts_to_ortho() {
        for base in all_bases(13).iter().take(3) {
            let mut c = Array1::<Complex64>::zeros(base.n);
            for i in base.slice() {
                c[i] = Complex64::new((i as f64).sin(), (i as f64).cos());
            }
            let p = base.to_ortho(&c.view()).unwrap();
            approx_eq_complex(&base.from_ortho(&p.view()).unwrap(), &c);
        }
    }

    #[test]
    fn test_order6_to_ortho_not_implemented() {
        let base = CompositeJacobi::order6(10).unwrap();
        let c = Array1::<Complex64>::zeros(10);
        assert!(matches!(
            base.to_ortho(&c.view()),
            Err(FunspaceError::NotImplemented(_))
        ));
    }

    #[test]
    fn test_scalar_product_zeroes_tail() {
        let base = CompositeJacobi::biharmonic(10).unwrap();
        let u = base.mesh().mapv(|x| Complex64::new(x.cos(), 0.));
        let sp = base.vandermonde_scalar_product(&u.view());
        for v in sp.iter().skip(6) {
            assert_eq!(*v, Complex64::new(0., 0.));
        }
        assert!(sp[0].norm() > 0.);
    }

    #[test]
    fn test_parameters() {
        assert_eq!(CompositeJacobi::dirichlet(6).unwrap().parameters(), (-1., -1.));
        assert_eq!(CompositeJacobi::biharmonic(6).unwrap().parameters(), (-2., -2.));
        assert_eq!(CompositeJacobi::order6(8).unwrap().parameters(), (-3., -3.));
    }
}
