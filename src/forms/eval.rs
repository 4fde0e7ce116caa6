//! Point evaluation of expressions of known functions
use super::expr::Expr;
use crate::enums::Base;
use crate::error::{FunspaceError, Result};
use crate::space::Space;
use crate::traits::BaseBasics;
use crate::types::{Complex64, Real, Scalar};
use ndarray::{s, Array1, Array2, ArrayViewD, Axis, Ix1};
use std::ops::Range;

impl Expr {
    /// Evaluate at `points` of shape (dimensions, number of points).
    ///
    /// The contributions of all components and terms are summed. The
    /// element type must match the physical dtype of the space.
    ///
    /// # Errors
    /// Test or trial expression, wrong dtype, wrong point dimensions.
    pub fn eval<T: Scalar>(&self, points: &Array2<Real>) -> Result<Array1<T>> {
        let coeffs = self
            .basis()
            .coefficients()
            .ok_or(FunspaceError::NoCoefficients)?;
        let expected = self.function_space().physical_dtype();
        if T::DTYPE != expected {
            return Err(FunspaceError::Dtype {
                expected,
                got: T::DTYPE,
            });
        }
        let dim = self.dimensions();
        if points.nrows() != dim {
            return Err(FunspaceError::Shape {
                expected: vec![dim, points.ncols()],
                got: points.shape().to_vec(),
            });
        }
        let base_space = self.basis().base_space();
        let flat = base_space.flatten();
        let mut output = Array1::<Complex64>::zeros(points.ncols());
        for component in self.components() {
            for (orders, index, scale) in component {
                if scale.is_zero() {
                    continue;
                }
                let (space, local) = if base_space.is_composite() {
                    let space = flat.get(index).ok_or(FunspaceError::Index {
                        index,
                        len: flat.len(),
                    })?;
                    (space, coeffs.index_axis(Axis(0), index))
                } else {
                    (&base_space, coeffs.view())
                };
                let work = evaluate_term(space, &local, &orders, points)?;
                let sc = scale.eval(points)?;
                for ((o, w), s) in output.iter_mut().zip(work.iter()).zip(sc.iter()) {
                    *o += *w * *s;
                }
            }
        }
        Ok(output.mapv(T::from_complex))
    }
}

/// Basis derivative matrix of one axis at physical points, columns
/// restricted to `range`. Real-to-complex modes with a conjugate partner
/// count twice.
fn axis_matrix(base: &Base, x: &Array1<Real>, k: usize, range: &Range<usize>) -> Array2<Complex64> {
    let xr = base.map_reference_domain(x);
    let mut p = base.vandermonde_derivative(&xr, k);
    let factor = base.domain_factor();
    if (factor - 1.).abs() > Real::EPSILON {
        let scale = factor.powi(k as i32);
        p.mapv_inplace(|v| v * scale);
    }
    let mut p = p.slice(s![.., range.clone()]).to_owned();
    if base.is_r2c() {
        let last_conj_index = base.last_conj_index();
        for (j, mut column) in p.axis_iter_mut(Axis(1)).enumerate() {
            let global = j + range.start;
            if global > 0 && global < last_conj_index {
                column.mapv_inplace(|v| v * 2.);
            }
        }
    }
    p
}

fn evaluate_term(
    space: &Space,
    coeffs: &ArrayViewD<Complex64>,
    orders: &[usize],
    points: &Array2<Real>,
) -> Result<Array1<Complex64>> {
    let slices = space.local_slice(true);
    let matrices: Vec<Array2<Complex64>> = space
        .bases()
        .iter()
        .enumerate()
        .map(|(axis, base)| {
            axis_matrix(base, &points.row(axis).to_owned(), orders[axis], &slices[axis])
        })
        .collect();
    if matrices.len() == 1 {
        let c = coeffs.view().into_dimensionality::<Ix1>()?;
        return Ok(matrices[0].dot(&c));
    }
    let mut output = Array1::<Complex64>::zeros(points.ncols());
    for (p, value) in output.iter_mut().enumerate() {
        let mut v = coeffs.to_owned();
        for axis in (0..matrices.len()).rev() {
            let row = matrices[axis].row(p);
            v = v.map_axis(Axis(axis), |lane| lane.dot(&row));
        }
        *value = v.sum();
    }
    Ok(output)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::array::Function;
    use crate::forms::arguments::BasisFunction;
    use crate::forms::operators::{dx, grad};
    use crate::forms::scale::x;
    use crate::fourier::{FourierC2c, FourierR2c};
    use crate::jacobi::{CompositeJacobi, Jacobi};
    use crate::utils::{approx_eq, approx_eq_complex};
    use ndarray::{array, ArrayD};
    use std::f64::consts::PI;

    #[test]
    fn test_eval_1d_legendre() {
        // u = P_2 = (3x^2 - 1) / 2
        let space = Space::line(Jacobi::legendre(5).unwrap().into()).unwrap();
        let mut coeffs = ArrayD::zeros(vec![5]);
        coeffs[[2]] = Complex64::new(1., 0.);
        let u = BasisFunction::known(&space, coeffs).unwrap();
        let points: Array2<f64> = array![[-0.5, 0.1, 0.9]];
        let value = Expr::from(&u).eval::<f64>(&points).unwrap();
        approx_eq(&value, &points.row(0).mapv(|x| (3. * x * x - 1.) / 2.));
        let deriv = (dx(&Expr::from(&u), 0, 1).unwrap() * x()).eval::<f64>(&points).unwrap();
        approx_eq(&deriv, &points.row(0).mapv(|x| 3. * x * x));
    }

    #[test]
    fn test_eval_domain_factor() {
        let base = CompositeJacobi::dirichlet(8).unwrap().with_domain((0., 2.));
        let space = Space::line(base.into()).unwrap();
        // (1 - s^2) with s = x - 1 is the first Dirichlet function
        let mut coeffs = ArrayD::zeros(vec![8]);
        coeffs[[0]] = Complex64::new(1., 0.);
        let u = BasisFunction::known(&space, coeffs).unwrap();
        let points: Array2<f64> = array![[0.5, 1.0, 1.5]];
        let du = dx(&Expr::from(&u), 0, 1).unwrap().eval::<f64>(&points).unwrap();
        approx_eq(&du, &points.row(0).mapv(|x| -2. * (x - 1.)));
    }

    #[test]
    fn test_eval_2d_r2c() {
        let space = Space::tensor(vec![
            Jacobi::legendre(6).unwrap().into(),
            FourierR2c::new(8).into(),
        ])
        .unwrap();
        let mesh = space.mesh();
        let values = ndarray::Array2::from_shape_fn((6, 8), |(i, j)| {
            let (x, y) = (mesh[0][i], mesh[1][j]);
            Complex64::new(x * x * (2. * y).cos() + x * y.sin(), 0.)
        })
        .into_dyn();
        let coeffs = space.forward(&values).unwrap();
        let u = BasisFunction::known(&space, coeffs).unwrap();
        let points: Array2<f64> = array![[0.3, -0.7, 0.1], [1.0, 2.5, 5.9]];
        let expected = Array1::from_shape_fn(3, |p| {
            let (x, y) = (points[[0, p]], points[[1, p]]);
            x * x * (2. * y).cos() + x * y.sin()
        });
        approx_eq(&Expr::from(&u).eval::<f64>(&points).unwrap(), &expected);
        let uy = dx(&Expr::from(&u), 1, 1).unwrap();
        let expected_y = Array1::from_shape_fn(3, |p| {
            let (x, y) = (points[[0, p]], points[[1, p]]);
            -2. * x * x * (2. * y).sin() + x * y.cos()
        });
        approx_eq(&uy.eval::<f64>(&points).unwrap(), &expected_y);
        assert!(Expr::from(&u).eval::<Complex64>(&points).is_err());
    }

    #[test]
    fn test_eval_c2c_and_vector() {
        let space = Space::tensor(vec![FourierC2c::new(8).into(), FourierC2c::new(6).into()]).unwrap();
        let vector = Space::vector(&space);
        assert_eq!(vector.num_components(), 2);
        let mesh = space.mesh();
        let wave = |x: f64, y: f64| Complex64::new(0., 3. * x + 2. * y).exp();
        let values = Array2::from_shape_fn((8, 6), |(i, j)| wave(mesh[0][i], mesh[1][j])).into_dyn();
        let coeffs = space.forward(&values).unwrap();
        let mut f = Function::<Complex64>::new(&vector).unwrap();
        f.v.index_axis_mut(Axis(0), 0).assign(&coeffs);
        let u = f.as_basis_function().unwrap();
        let points: Array2<f64> = array![[0.4, 1.7 * PI], [1.1, 0.2]];
        let expected = Array1::from_shape_fn(2, |p| wave(points[[0, p]], points[[1, p]]));
        let first = Expr::from(&u.get(0).unwrap());
        approx_eq_complex(&first.eval::<Complex64>(&points).unwrap(), &expected);
        let second = Expr::from(&u.get(1).unwrap());
        approx_eq_complex(
            &second.eval::<Complex64>(&points).unwrap(),
            &Array1::<Complex64>::zeros(2),
        );
        assert_eq!(grad(&first).unwrap().num_components(), 2);
        assert!(u.get(2).is_err());
    }

    #[test]
    fn test_eval_requires_known() {
        let space = Space::line(Jacobi::legendre(4).unwrap().into()).unwrap();
        let v = BasisFunction::test(&space);
        let points: Array2<f64> = array![[0.]];
        assert!(matches!(
            Expr::from(&v).eval::<f64>(&points),
            Err(FunspaceError::NoCoefficients)
        ));
    }
}
