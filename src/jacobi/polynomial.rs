//! # Jacobi polynomials
//!
//! Values and derivatives of $P_n^{(\alpha,\beta)}$ via the three-term
//! recurrence. The $k$-th derivative uses
//! $$
//! \frac{d^k}{dx^k} P_n^{(\alpha,\beta)} = \frac{\prod_{i=0}^{k-1}(n+\alpha+\beta+1+i)}{2^k}
//!  P_{n-k}^{(\alpha+k,\beta+k)},
//! $$
//! with the factor evaluated as a finite product.
use super::float::JacobiFloat;
use crate::config::JacobiConfig;
use ndarray::{Array1, Array2};

/// Values $P_0, \dots, P_{n-1}$ at a single point
pub fn jacobi_all<F: JacobiFloat>(n: usize, alpha: f64, beta: f64, x: F) -> Vec<F> {
    let mut p = Vec::with_capacity(n);
    if n == 0 {
        return p;
    }
    let (a, b) = (F::from(alpha), F::from(beta));
    let one = F::one();
    let two = F::from(2.);
    p.push(one);
    if n == 1 {
        return p;
    }
    p.push((a + one) + (a + b + two) * (x - one) / two);
    for k in 1..n - 1 {
        let kf = k as f64;
        let s = 2. * kf + alpha + beta;
        let a1 = F::from(2. * (kf + 1.) * (kf + alpha + beta + 1.) * s);
        let a2 = F::from((s + 1.) * (alpha * alpha - beta * beta));
        let a3 = F::from(s * (s + 1.) * (s + 2.));
        let a4 = F::from(2. * (kf + alpha) * (kf + beta) * (s + 2.));
        let next = ((a2 + a3 * x) * p[k] - a4 * p[k - 1]) / a1;
        p.push(next);
    }
    p
}

/// Value of $P_n^{(\alpha,\beta)}(x)$
pub fn jacobi<F: JacobiFloat>(n: usize, alpha: f64, beta: f64, x: F) -> F {
    jacobi_all(n + 1, alpha, beta, x)[n]
}

/// Derivative scaling $\prod_{i<k}(n+\alpha+\beta+1+i)/2^k$
pub fn derivative_factor(n: usize, alpha: f64, beta: f64, k: usize) -> f64 {
    let mut f = 1.;
    for i in 0..k {
        f *= (n as f64 + alpha + beta + 1. + i as f64) / 2.;
    }
    f
}

/// $k$-th derivative of $P_n^{(\alpha,\beta)}$ at $x$.
///
/// Returns exactly zero if $n < k$.
pub fn jacobi_derivative<F: JacobiFloat>(n: usize, alpha: f64, beta: f64, k: usize, x: F) -> F {
    if k == 0 {
        return jacobi(n, alpha, beta, x);
    }
    if n < k {
        return F::zero();
    }
    let kf = k as f64;
    F::from(derivative_factor(n, alpha, beta, k)) * jacobi(n - k, alpha + kf, beta + kf, x)
}

/// $k$-th derivatives of $P_0, \dots, P_{n-1}$ at a single point
pub fn jacobi_derivative_all<F: JacobiFloat>(
    n: usize,
    alpha: f64,
    beta: f64,
    k: usize,
    x: F,
) -> Vec<F> {
    let mut d = vec![F::zero(); n];
    if k >= n {
        return d;
    }
    let kf = k as f64;
    let p = jacobi_all(n - k, alpha + kf, beta + kf, x);
    for (j, pj) in p.into_iter().enumerate() {
        d[j + k] = F::from(derivative_factor(j + k, alpha, beta, k)) * pj;
    }
    d
}

/// Vandermonde matrix of $P_j^{(\alpha,\beta)}(x_i)$ (points x modes)
pub fn jacobi_vandermonde(x: &Array1<f64>, alpha: f64, beta: f64, n: usize) -> Array2<f64> {
    jacobi_derivative_vandermonde(x, alpha, beta, n, 0)
}

/// Matrix of $k$-th derivatives $\partial^k P_j^{(\alpha,\beta)}(x_i)$ (points x modes)
pub fn jacobi_derivative_vandermonde(
    x: &Array1<f64>,
    alpha: f64,
    beta: f64,
    n: usize,
    k: usize,
) -> Array2<f64> {
    derivative_vandermonde_in::<f64>(x, alpha, beta, n, k)
}

/// Same as [`jacobi_derivative_vandermonde`], evaluated in the arithmetic
/// selected by `config` and rounded to `f64`
pub fn jacobi_derivative_vandermonde_with(
    x: &Array1<f64>,
    alpha: f64,
    beta: f64,
    n: usize,
    k: usize,
    config: &JacobiConfig,
) -> Array2<f64> {
    #[cfg(feature = "xprec")]
    if config.is_extended() {
        return derivative_vandermonde_in::<twofloat::TwoFloat>(x, alpha, beta, n, k);
    }
    #[cfg(not(feature = "xprec"))]
    let _ = config;
    derivative_vandermonde_in::<f64>(x, alpha, beta, n, k)
}

fn derivative_vandermonde_in<F: JacobiFloat>(
    x: &Array1<f64>,
    alpha: f64,
    beta: f64,
    n: usize,
    k: usize,
) -> Array2<f64> {
    let mut v = Array2::<f64>::zeros((x.len(), n));
    for (mut row, xi) in v.outer_iter_mut().zip(x.iter()) {
        let d = jacobi_derivative_all(n, alpha, beta, k, F::from(*xi));
        for (r, dj) in row.iter_mut().zip(d.into_iter()) {
            *r = dj.to_f64();
        }
    }
    v
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::utils::approx_eq;
    use ndarray::array;

    #[test]
    fn test_legendre_values() {
        let x = array![-1., -0.5, 0., 0.3, 1.];
        let v = jacobi_vandermonde(&x, 0., 0., 4);
        let p2 = x.mapv(|x| 1.5 * x * x - 0.5);
        let p3 = x.mapv(|x| 2.5 * x * x * x - 1.5 * x);
        approx_eq(&v.column(0).to_owned(), &Array1::ones(5));
        approx_eq(&v.column(1).to_owned(), &x);
        approx_eq(&v.column(2).to_owned(), &p2);
        approx_eq(&v.column(3).to_owned(), &p3);
    }

    #[test]
    fn test_chebyshev_normalization() {
        // P_1^{(-1/2,-1/2)} = x / 2
        let y = jacobi(1, -0.5, -0.5, 0.8);
        assert!((y - 0.4).abs() < 1e-14);
    }

    #[test]
    fn test_derivative() {
        // d/dx P_3 = 7.5 x^2 - 1.5, d2/dx2 P_3 = 15 x
        let x = 0.7;
        let d1 = jacobi_derivative(3, 0., 0., 1, x);
        let d2 = jacobi_derivative(3, 0., 0., 2, x);
        assert!((d1 - (7.5 * x * x - 1.5)).abs() < 1e-12);
        assert!((d2 - 15. * x).abs() < 1e-12);
        assert!(jacobi_derivative(1, 0., 0., 2, x) == 0.);
    }

    #[test]
    fn test_derivative_vandermonde_matches_pointwise() {
        let x = array![-0.9, 0.1, 0.6];
        let v = jacobi_derivative_vandermonde(&x, 1., 1., 6, 2);
        for (i, xi) in x.iter().enumerate() {
            for j in 0..6 {
                let d = jacobi_derivative(j, 1., 1., 2, *xi);
                assert!((v[[i, j]] - d).abs() < 1e-10);
            }
        }
        assert!(v.column(0).iter().all(|v| *v == 0.));
        assert!(v.column(1).iter().all(|v| *v == 0.));
    }

    #[test]
    fn test_vandermonde_with_config() {
        let x = array![-0.4, 0.2, 0.95];
        let v0 = jacobi_derivative_vandermonde(&x, 2., 2., 12, 3);
        let v1 = jacobi_derivative_vandermonde_with(&x, 2., 2., 12, 3, &JacobiConfig::with_digits(30));
        crate::utils::approx_eq_tol(&v0, &v1, 1e-8);
    }

    #[cfg(feature = "xprec")]
    #[test]
    fn test_extended_matches_standard() {
        use twofloat::TwoFloat;
        let x = 0.3;
        let p = jacobi(20, 2., 2., x);
        let q: f64 = jacobi(20, 2., 2., TwoFloat::from(x)).to_f64();
        assert!((p - q).abs() < 1e-10 * p.abs().max(1.));
    }
}
