//! # Gauss-Jacobi quadrature
//!
//! Nodes and weights for $\int_{-1}^1 (1-x)^\alpha (1+x)^\beta f(x) dx$,
//! found by Newton iteration on $P_n^{(\alpha,\beta)}$ with asymptotic
//! initial guesses.
//!
//! Reference:
//! W. H. Press et al.: Numerical Recipes, section 4.5 (gaujac)
use super::float::JacobiFloat;
use crate::config::{JacobiConfig, Precision};
use crate::error::{FunspaceError, Result};
use log::trace;
use ndarray::Array1;

const MAXIT: usize = 100;
const EPS: f64 = 3e-15;

/// Value of $P_n$, its derivative and $P_{n-1}$ at $z$
fn newton_terms<F: JacobiFloat>(n: usize, alpha: f64, beta: f64, z: F) -> (F, F, F) {
    let alfbet = alpha + beta;
    let one = F::one();
    let mut temp = 2. + alfbet;
    let mut p1 = (F::from(alpha - beta) + F::from(temp) * z) / F::from(2.);
    let mut p2 = one;
    for j in 2..=n {
        let jf = j as f64;
        let p3 = p2;
        p2 = p1;
        temp = 2. * jf + alfbet;
        let a = F::from(2. * jf * (jf + alfbet) * (temp - 2.));
        let b = F::from(temp - 1.) * (F::from(alpha * alpha - beta * beta) + F::from(temp * (temp - 2.)) * z);
        let c = F::from(2. * (jf - 1. + alpha) * (jf - 1. + beta) * temp);
        p1 = (b * p2 - c * p3) / a;
    }
    let nf = n as f64;
    let pp = (F::from(nf) * (F::from(alpha - beta) - F::from(temp) * z) * p1
        + F::from(2. * (nf + alpha) * (nf + beta)) * p2)
        / (F::from(temp) * (one - z * z));
    (p1, pp, p2)
}

/// Newton iteration for a root of $P_n$ starting at `z`
fn newton<F: JacobiFloat>(n: usize, alpha: f64, beta: f64, mut z: F, eps: f64) -> (F, F, F) {
    let mut terms = newton_terms(n, alpha, beta, z);
    for _ in 0..MAXIT {
        let z1 = z;
        z = z1 - terms.0 / terms.1;
        terms = newton_terms(n, alpha, beta, z);
        if (z - z1).abs_val() <= F::from(eps) {
            break;
        }
    }
    (z, terms.1, terms.2)
}

/// Initial guess of the `i`-th root, roots sorted in descending order
#[allow(clippy::many_single_char_names)]
fn initial_guess(i: usize, n: usize, alpha: f64, beta: f64, x: &[f64]) -> f64 {
    let nf = n as f64;
    match i {
        0 => {
            let an = alpha / nf;
            let bn = beta / nf;
            let r1 = (1. + alpha) * (2.78 / (4. + nf * nf) + 0.768 * an / nf);
            let r2 = 1. + 1.48 * an + 0.96 * bn + 0.452 * an * an + 0.83 * an * bn;
            1. - r1 / r2
        }
        1 => {
            let z = x[0];
            let r1 = (4.1 + alpha) / ((1. + alpha) * (1. + 0.156 * alpha));
            let r2 = 1. + 0.06 * (nf - 8.) * (1. + 0.12 * alpha) / nf;
            let r3 = 1. + 0.012 * beta * (1. + 0.25 * alpha.abs()) / nf;
            z - (1. - z) * r1 * r2 * r3
        }
        2 => {
            let z = x[1];
            let r1 = (1.67 + 0.28 * alpha) / (1. + 0.37 * alpha);
            let r2 = 1. + 0.22 * (nf - 8.) / nf;
            let r3 = 1. + 8. * beta / ((6.28 + beta) * nf * nf);
            z - (x[0] - z) * r1 * r2 * r3
        }
        i if i == n - 2 => {
            let z = x[i - 1];
            let r1 = (1. + 0.235 * beta) / (0.766 + 0.119 * beta);
            let r2 = 1. / (1. + 0.639 * (nf - 4.) / (1. + 0.71 * (nf - 4.)));
            let r3 = 1. / (1. + 20. * alpha / ((7.5 + alpha) * nf * nf));
            z + (z - x[n - 4]) * r1 * r2 * r3
        }
        i if i == n - 1 => {
            let z = x[i - 1];
            let r1 = (1. + 0.37 * beta) / (1.67 + 0.28 * beta);
            let r2 = 1. / (1. + 0.22 * (nf - 8.) / nf);
            let r3 = 1. / (1. + 8. * alpha / ((6.28 + alpha) * nf * nf));
            z + (z - x[n - 3]) * r1 * r2 * r3
        }
        i => 3. * x[i - 1] - 3. * x[i - 2] + x[i - 3],
    }
}

/// Weight prefactor $\Gamma(\alpha+n)\Gamma(\beta+n) / (\Gamma(n+1)\Gamma(n+\alpha+\beta+1))
/// (2n+\alpha+\beta) 2^{\alpha+\beta}$
fn weight_prefactor(n: usize, alpha: f64, beta: f64) -> f64 {
    let nf = n as f64;
    let alfbet = alpha + beta;
    let lg = libm::lgamma(alpha + nf) + libm::lgamma(beta + nf)
        - libm::lgamma(nf + 1.)
        - libm::lgamma(nf + alfbet + 1.);
    lg.exp() * (2. * nf + alfbet) * 2f64.powf(alfbet)
}

fn check_parameters(n: usize, alpha: f64, beta: f64) -> Result<()> {
    if n == 0 {
        return Err(FunspaceError::Parameter(
            "quadrature needs at least one point".to_string(),
        ));
    }
    if alpha <= -1. || beta <= -1. {
        return Err(FunspaceError::Parameter(format!(
            "Gauss-Jacobi quadrature requires alpha, beta > -1, got ({}, {})",
            alpha, beta
        )));
    }
    Ok(())
}

/// Gauss-Jacobi nodes (ascending) and weights in `f64`
///
/// # Errors
/// `n == 0` or $\alpha, \beta \le -1$.
pub fn gauss_jacobi(n: usize, alpha: f64, beta: f64) -> Result<(Array1<f64>, Array1<f64>)> {
    check_parameters(n, alpha, beta)?;
    let prefactor = weight_prefactor(n, alpha, beta);
    let mut x = vec![0.; n];
    let mut w = vec![0.; n];
    for i in 0..n {
        let guess = initial_guess(i, n, alpha, beta, &x);
        let (z, pp, p2) = newton(n, alpha, beta, guess, EPS);
        x[i] = z;
        w[i] = prefactor / (pp * p2);
    }
    x.reverse();
    w.reverse();
    Ok((Array1::from_vec(x), Array1::from_vec(w)))
}

/// Gauss-Jacobi nodes and weights, refined in double-double arithmetic
/// and truncated to `f64`.
///
/// Without the `xprec` feature this is [`gauss_jacobi`].
///
/// # Errors
/// See [`gauss_jacobi`].
pub fn gauss_jacobi_extended(
    n: usize,
    alpha: f64,
    beta: f64,
) -> Result<(Array1<f64>, Array1<f64>)> {
    #[cfg(feature = "xprec")]
    {
        use twofloat::TwoFloat;
        let (x, _) = gauss_jacobi(n, alpha, beta)?;
        let prefactor = TwoFloat::from(weight_prefactor(n, alpha, beta));
        let mut xe = Array1::<f64>::zeros(n);
        let mut we = Array1::<f64>::zeros(n);
        for (i, xi) in x.iter().enumerate() {
            let (z, pp, p2) = newton(n, alpha, beta, TwoFloat::from(*xi), 1e-30);
            xe[i] = z.to_f64();
            we[i] = (prefactor / (pp * p2)).to_f64();
        }
        Ok((xe, we))
    }
    #[cfg(not(feature = "xprec"))]
    {
        gauss_jacobi(n, alpha, beta)
    }
}

/// Quadrature with the arithmetic selected in `config`
///
/// # Errors
/// See [`gauss_jacobi`].
pub fn gauss_jacobi_with(
    n: usize,
    alpha: f64,
    beta: f64,
    config: &JacobiConfig,
) -> Result<(Array1<f64>, Array1<f64>)> {
    match config.effective_precision() {
        Precision::Standard => gauss_jacobi(n, alpha, beta),
        Precision::Extended => {
            trace!("gauss-jacobi n={} in extended precision", n);
            gauss_jacobi_extended(n, alpha, beta)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::jacobi::polynomial::jacobi;
    use crate::utils::approx_eq;
    use ndarray::array;

    #[test]
    fn test_gauss_legendre_small() {
        let (x, w) = gauss_jacobi(1, 0., 0.).unwrap();
        approx_eq(&x, &array![0.]);
        approx_eq(&w, &array![2.]);

        let (x, w) = gauss_jacobi(2, 0., 0.).unwrap();
        let r = 1. / 3f64.sqrt();
        approx_eq(&x, &array![-r, r]);
        approx_eq(&w, &array![1., 1.]);

        let (x, w) = gauss_jacobi(3, 0., 0.).unwrap();
        let r = (0.6f64).sqrt();
        approx_eq(&x, &array![-r, 0., r]);
        approx_eq(&w, &array![5. / 9., 8. / 9., 5. / 9.]);
    }

    #[test]
    fn test_nodes_are_roots_and_ascending() {
        for &(n, a, b) in &[(8, 0., 0.), (17, 1., 1.), (12, -0.5, -0.5), (20, 2., 0.5)] {
            let (x, _) = gauss_jacobi(n, a, b).unwrap();
            for i in 1..n {
                assert!(x[i] > x[i - 1]);
            }
            for xi in x.iter() {
                assert!(jacobi(n, a, b, *xi).abs() < 1e-8);
            }
        }
    }

    #[test]
    fn test_weights_integrate_polynomials() {
        // int (1-x)(1+x) x^2 dx = 4/15
        let (x, w) = gauss_jacobi(6, 1., 1.).unwrap();
        let integral: f64 = x.iter().zip(w.iter()).map(|(x, w)| w * x * x).sum();
        assert!((integral - 4. / 15.).abs() < 1e-12);
        // chebyshev weight integrates to pi
        let (_, w) = gauss_jacobi(10, -0.5, -0.5).unwrap();
        assert!((w.sum() - std::f64::consts::PI).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(gauss_jacobi(0, 0., 0.).is_err());
        assert!(gauss_jacobi(4, -1., 0.).is_err());
    }

    #[test]
    fn test_extended_agrees() {
        let (x0, w0) = gauss_jacobi(40, 2., 2.).unwrap();
        let (x1, w1) = gauss_jacobi_extended(40, 2., 2.).unwrap();
        crate::utils::approx_eq_tol(&x0, &x1, 1e-13);
        crate::utils::approx_eq_tol(&w0, &w1, 1e-12);
    }
}
