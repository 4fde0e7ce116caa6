//! Collection of helper functions
use crate::error::Result;
use crate::types::{Complex64, Real};
use ndarray::{Array1, Array2, ArrayBase, ArrayD, ArrayView1, Axis, Data, Dimension};

/// Apply a function to every lane of `data` along `axis`.
///
/// The function maps a lane to a new lane of length `len_out`.
pub fn apply_along_axis<F>(
    data: &ArrayD<Complex64>,
    axis: usize,
    len_out: usize,
    mut function: F,
) -> Result<ArrayD<Complex64>>
where
    F: FnMut(&ArrayView1<Complex64>) -> Result<Array1<Complex64>>,
{
    let mut shape = data.shape().to_vec();
    shape[axis] = len_out;
    let mut output = ArrayD::<Complex64>::zeros(shape);
    for (lane_in, mut lane_out) in data
        .lanes(Axis(axis))
        .into_iter()
        .zip(output.lanes_mut(Axis(axis)))
    {
        lane_out.assign(&function(&lane_in)?);
    }
    Ok(output)
}

/// Real matrix times complex vector
pub fn matvec(mat: &Array2<Real>, vec: &ArrayView1<Complex64>) -> Array1<Complex64> {
    let mut out = Array1::<Complex64>::zeros(mat.nrows());
    for (o, row) in out.iter_mut().zip(mat.outer_iter()) {
        for (m, v) in row.iter().zip(vec.iter()) {
            *o += *v * *m;
        }
    }
    out
}

/// Binomial coefficient as float
pub fn binomial(n: usize, k: usize) -> Real {
    if k > n {
        return 0.;
    }
    let mut b = 1.;
    for i in 0..k.min(n - k) {
        b = b * (n - i) as Real / (i + 1) as Real;
    }
    b
}

/// Test approx equality of two arrays element-wise
///
/// # Panics
/// Panics when difference is larger than 1e-3.
pub fn approx_eq<S1, S2, D>(result: &ArrayBase<S1, D>, expected: &ArrayBase<S2, D>)
where
    S1: Data<Elem = Real>,
    S2: Data<Elem = Real>,
    D: Dimension,
{
    let dif = 1e-3;
    assert_eq!(result.shape(), expected.shape(), "shape mismatch");
    for (a, b) in expected.iter().zip(result.iter()) {
        if (a - b).abs() > dif {
            panic!(
                "Large difference of values, got {} expected {}.",
                b, a
            )
        }
    }
}

/// Test approx equality of two arrays element-wise with custom tolerance
///
/// # Panics
/// Panics when difference is larger than `tol`.
pub fn approx_eq_tol<S1, S2, D>(result: &ArrayBase<S1, D>, expected: &ArrayBase<S2, D>, tol: Real)
where
    S1: Data<Elem = Real>,
    S2: Data<Elem = Real>,
    D: Dimension,
{
    assert_eq!(result.shape(), expected.shape(), "shape mismatch");
    for (a, b) in expected.iter().zip(result.iter()) {
        if (a - b).abs() > tol {
            panic!(
                "Large difference of values, got {} expected {} (tol {}).",
                b, a, tol
            )
        }
    }
}

/// Test approx equality of two complex arrays element-wise
///
/// # Panics
/// Panics when difference is larger than 1e-3.
pub fn approx_eq_complex<S1, S2, D>(result: &ArrayBase<S1, D>, expected: &ArrayBase<S2, D>)
where
    S1: Data<Elem = Complex64>,
    S2: Data<Elem = Complex64>,
    D: Dimension,
{
    let dif = 1e-3;
    assert_eq!(result.shape(), expected.shape(), "shape mismatch");
    for (a, b) in expected.iter().zip(result.iter()) {
        if (a.re - b.re).abs() > dif || (a.im - b.im).abs() > dif {
            panic!(
                "Large difference of values, got {} expected {}.",
                b, a
            )
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_binomial() {
        assert!((binomial(5, 2) - 10.).abs() < 1e-12);
        assert!((binomial(3, 0) - 1.).abs() < 1e-12);
        assert!(binomial(2, 3).abs() < 1e-12);
    }

    #[test]
    fn test_apply_along_axis() {
        let data = array![[1., 2.], [3., 4.], [5., 6.]]
            .mapv(|x| Complex64::new(x, 0.))
            .into_dyn();
        let summed = apply_along_axis(&data, 0, 1, |lane| {
            Ok(Array1::from_elem(1, lane.sum()))
        })
        .unwrap();
        assert_eq!(summed.shape(), &[1, 2]);
        approx_eq(
            &summed.mapv(|c| c.re),
            &array![[9., 12.]].into_dyn(),
        );
    }
}
