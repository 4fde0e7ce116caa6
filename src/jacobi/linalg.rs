//! # Banded solvers for the normal equations of Jacobi stencils
//!
//! A stencil $S$ maps composite to orthogonal coefficients, $p = S c$.
//! The inverse map solves $S^T S c = S^T p$. Stencils with bands at
//! $0, -2$ give tridiagonal systems in offsets $-2, 0, 2$; stencils with
//! bands at $0, -2, -4$ give systems in offsets $-4, \dots, 4$ which
//! decouple into two pentadiagonal systems for even and odd indices.
use crate::error::{FunspaceError, Result};
use crate::types::Scalar;
use ndarray::prelude::*;
use std::ops::{Add, Div, Mul, Sub};

/// Tridiagonal matrix solver
///     Ax = d
/// where A is banded with diagonals in offsets -2, 0, 2
///
/// a: sub-diagonal (-2)
/// b: main-diagonal
/// c: sub-diagonal (+2)
#[allow(clippy::many_single_char_names)]
pub fn tdma<S1, S2, T1, T2>(
    a: &ArrayBase<S1, Ix1>,
    b: &ArrayBase<S1, Ix1>,
    c: &ArrayBase<S1, Ix1>,
    d: &mut ArrayBase<S2, Ix1>,
) where
    S1: ndarray::Data<Elem = T1>,
    S2: ndarray::Data<Elem = T2> + ndarray::DataMut,
    T1: Scalar,
    T2: Scalar
        + Add<T1, Output = T2>
        + Mul<T1, Output = T2>
        + Div<T1, Output = T2>
        + Sub<T1, Output = T2>,
{
    let n = d.len();
    // No coupling below three unknowns
    if n < 3 {
        for i in 0..n {
            d[i] = d[i] / b[i];
        }
        return;
    }
    let mut x = Array1::<T2>::zeros(n);
    let mut w = Array1::<T1>::zeros(n - 2);
    let mut g = Array1::<T2>::zeros(n);

    // Forward sweep
    w[0] = c[0] / b[0];
    g[0] = d[0] / b[0];
    if c.len() > 1 {
        w[1] = c[1] / b[1];
    }
    g[1] = d[1] / b[1];

    for i in 2..n - 2 {
        w[i] = c[i] / (b[i] - a[i - 2] * w[i - 2]);
    }
    for i in 2..n {
        g[i] = (d[i] - g[i - 2] * a[i - 2]) / (b[i] - a[i - 2] * w[i - 2]);
    }

    // Back substitution
    x[n - 1] = g[n - 1];
    x[n - 2] = g[n - 2];
    for i in (1..n - 1).rev() {
        x[i - 1] = g[i - 1] - x[i + 1] * w[i - 1];
    }

    d.assign(&x);
}

/// Pentadiagonal matrix solver
///     Ax = rhs
/// where A is banded with diagonals in offsets -2,-1,0,1,2
///
/// l2: sub-diagonal (-2)
/// l1: sub-diagonal (-1)
/// d0: main-diagonal
/// u1: sub-diagonal (+1)
/// u2: sub-diagonal (+2)
/// rhs: rhs (input), returns solution
///
/// Systems with less than four unknowns are solved by dense elimination.
///
/// ## Reference
/// `https://www.hindawi.com/journals/mpe/2015/232456/`
#[allow(clippy::many_single_char_names)]
pub fn pdma<S1, S2, T1, T2>(
    l2: &ArrayBase<S1, Ix1>,
    l1: &ArrayBase<S1, Ix1>,
    d0: &ArrayBase<S1, Ix1>,
    u1: &ArrayBase<S1, Ix1>,
    u2: &ArrayBase<S1, Ix1>,
    rhs: &mut ArrayBase<S2, Ix1>,
) where
    S1: ndarray::Data<Elem = T1>,
    S2: ndarray::Data<Elem = T2> + ndarray::DataMut,
    T1: Scalar,
    T2: Scalar
        + Add<T1, Output = T2>
        + Mul<T1, Output = T2>
        + Div<T1, Output = T2>
        + Sub<T1, Output = T2>,
{
    let n = rhs.len();
    if n < 4 {
        let mut mat = Array2::<T1>::zeros((n, n));
        for i in 0..n {
            mat[[i, i]] = d0[i];
            if i + 1 < n {
                mat[[i, i + 1]] = u1[i];
                mat[[i + 1, i]] = l1[i];
            }
            if i + 2 < n {
                mat[[i, i + 2]] = u2[i];
                mat[[i + 2, i]] = l2[i];
            }
        }
        dense_solve(&mut mat, rhs);
        return;
    }

    let mut al = Array1::<T1>::zeros(n);
    let mut be = Array1::<T1>::zeros(n);
    let mut ze = Array1::<T2>::zeros(n);
    let mut ga = Array1::<T1>::zeros(n);
    let mut mu = Array1::<T1>::zeros(n);

    mu[0] = d0[0];
    al[0] = u1[0] / mu[0];
    be[0] = u2[0] / mu[0];
    ze[0] = rhs[0] / mu[0];

    ga[1] = l1[0];
    mu[1] = d0[1] - al[0] * ga[1];
    al[1] = (u1[1] - be[0] * ga[1]) / mu[1];
    be[1] = u2[1] / mu[1];
    ze[1] = (rhs[1] - ze[0] * ga[1]) / mu[1];

    for i in 2..n - 2 {
        ga[i] = l1[i - 1] - al[i - 2] * l2[i - 2];
        mu[i] = d0[i] - be[i - 2] * l2[i - 2] - al[i - 1] * ga[i];
        al[i] = (u1[i] - be[i - 1] * ga[i]) / mu[i];
        be[i] = u2[i] / mu[i];
        ze[i] = (rhs[i] - ze[i - 2] * l2[i - 2] - ze[i - 1] * ga[i]) / mu[i];
    }

    ga[n - 2] = l1[n - 3] - al[n - 4] * l2[n - 4];
    mu[n - 2] = d0[n - 2] - be[n - 4] * l2[n - 4] - al[n - 3] * ga[n - 2];
    al[n - 2] = (u1[n - 2] - be[n - 3] * ga[n - 2]) / mu[n - 2];

    ga[n - 1] = l1[n - 2] - al[n - 3] * l2[n - 3];
    mu[n - 1] = d0[n - 1] - be[n - 3] * l2[n - 3] - al[n - 2] * ga[n - 1];

    ze[n - 2] = (rhs[n - 2] - ze[n - 4] * l2[n - 4] - ze[n - 3] * ga[n - 2]) / mu[n - 2];
    ze[n - 1] = (rhs[n - 1] - ze[n - 3] * l2[n - 3] - ze[n - 2] * ga[n - 1]) / mu[n - 1];

    // Backward substitution
    rhs[n - 1] = ze[n - 1];
    rhs[n - 2] = ze[n - 2] - rhs[n - 1] * al[n - 2];

    for i in (0..n - 2).rev() {
        rhs[i] = ze[i] - rhs[i + 1] * al[i] - rhs[i + 2] * be[i];
    }
}

/// Symmetric solver for diagonals in offsets -4, -2, 0, 2, 4.
///
/// Even and odd unknowns decouple, each half is solved with [`pdma`].
///
/// d0: main-diagonal
/// off2: sub/super-diagonal (2)
/// off4: sub/super-diagonal (4)
pub fn pdma_even_odd<S1, S2, T1, T2>(
    d0: &ArrayBase<S1, Ix1>,
    off2: &ArrayBase<S1, Ix1>,
    off4: &ArrayBase<S1, Ix1>,
    rhs: &mut ArrayBase<S2, Ix1>,
) where
    S1: ndarray::Data<Elem = T1>,
    S2: ndarray::Data<Elem = T2> + ndarray::DataMut,
    T1: Scalar,
    T2: Scalar
        + Add<T1, Output = T2>
        + Mul<T1, Output = T2>
        + Div<T1, Output = T2>
        + Sub<T1, Output = T2>,
{
    for parity in 0..2 {
        let d = d0.slice(s![parity..;2]).to_owned();
        let o1 = off2.slice(s![parity..;2]).to_owned();
        let o2 = off4.slice(s![parity..;2]).to_owned();
        let mut r = rhs.slice(s![parity..;2]).to_owned();
        pdma(&o2, &o1, &d, &o1, &o2, &mut r);
        rhs.slice_mut(s![parity..;2]).assign(&r);
    }
}

/// Gaussian elimination without pivoting, for small symmetric positive
/// definite systems
fn dense_solve<S2, T1, T2>(mat: &mut Array2<T1>, rhs: &mut ArrayBase<S2, Ix1>)
where
    S2: ndarray::Data<Elem = T2> + ndarray::DataMut,
    T1: Scalar,
    T2: Scalar
        + Add<T1, Output = T2>
        + Mul<T1, Output = T2>
        + Div<T1, Output = T2>
        + Sub<T1, Output = T2>,
{
    let n = rhs.len();
    for k in 0..n {
        for i in k + 1..n {
            let f = mat[[i, k]] / mat[[k, k]];
            for j in k..n {
                let v = mat[[k, j]];
                mat[[i, j]] = mat[[i, j]] - f * v;
            }
            let r = rhs[k];
            rhs[i] = rhs[i] - r * f;
        }
    }
    for k in (0..n).rev() {
        let mut acc = rhs[k];
        for j in k + 1..n {
            acc = acc - rhs[j] * mat[[k, j]];
        }
        rhs[k] = acc / mat[[k, k]];
    }
}

/// Solve $A X = B$ for a dense square $A$ by Gaussian elimination with
/// partial pivoting
///
/// # Errors
/// Singular matrix or mismatching shapes.
pub fn lu_solve(a: &Array2<f64>, b: &Array2<f64>) -> Result<Array2<f64>> {
    let n = a.nrows();
    if a.ncols() != n || b.nrows() != n {
        return Err(FunspaceError::Shape {
            expected: vec![n, n],
            got: vec![a.nrows(), a.ncols(), b.nrows()],
        });
    }
    let mut a = a.to_owned();
    let mut x = b.to_owned();
    for k in 0..n {
        let mut piv = k;
        for i in k + 1..n {
            if a[[i, k]].abs() > a[[piv, k]].abs() {
                piv = i;
            }
        }
        if a[[piv, k]].abs() < f64::MIN_POSITIVE {
            return Err(FunspaceError::Parameter(format!(
                "singular matrix in column {}",
                k
            )));
        }
        if piv != k {
            for j in 0..n {
                a.swap([k, j], [piv, j]);
            }
            for j in 0..x.ncols() {
                x.swap([k, j], [piv, j]);
            }
        }
        for i in k + 1..n {
            let f = a[[i, k]] / a[[k, k]];
            if f == 0. {
                continue;
            }
            for j in k..n {
                let akj = a[[k, j]];
                a[[i, j]] -= f * akj;
            }
            for j in 0..x.ncols() {
                let xkj = x[[k, j]];
                x[[i, j]] -= f * xkj;
            }
        }
    }
    for k in (0..n).rev() {
        for j in 0..x.ncols() {
            let mut acc = x[[k, j]];
            for l in k + 1..n {
                acc -= a[[k, l]] * x[[l, j]];
            }
            x[[k, j]] = acc / a[[k, k]];
        }
    }
    Ok(x)
}
