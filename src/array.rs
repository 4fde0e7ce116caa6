//! # Coefficient and value arrays bound to a space
//!
//! [`Function`] holds spectral coefficients, [`Array`] holds values at the
//! physical mesh. Both check shape and element type against the space.
//! Composite spaces store their scalar components along a leading axis.
use crate::error::{FunspaceError, Result};
use crate::forms::arguments::BasisFunction;
use crate::forms::expr::Expr;
use crate::forms::scale::Scale;
use crate::space::{Redistribute, Serial, Space};
use crate::traits::{BaseSize, Refine};
use crate::types::{Complex64, Dtype, Real, Scalar};
use crate::utils::apply_along_axis;
use log::trace;
use ndarray::{Array2, ArrayD, Axis, Slice};

fn check_dtype<T: Scalar>(expected: Dtype) -> Result<()> {
    if T::DTYPE == expected {
        Ok(())
    } else {
        Err(FunspaceError::Dtype {
            expected,
            got: T::DTYPE,
        })
    }
}

fn from_complex<T: Scalar>(data: &ArrayD<Complex64>) -> ArrayD<T> {
    data.mapv(T::from_complex)
}

/// Spectral coefficients on a space
#[derive(Debug, Clone)]
pub struct Function<T: Scalar> {
    space: Space,
    /// Coefficients
    pub v: ArrayD<T>,
}

/// Physical values on a space
#[derive(Debug, Clone)]
pub struct Array<T: Scalar> {
    space: Space,
    /// Values at the mesh
    pub v: ArrayD<T>,
}

impl<T: Scalar> Function<T> {
    /// Zero coefficients on `space`
    ///
    /// # Errors
    /// `T` is not the spectral dtype of `space`.
    pub fn new(space: &Space) -> Result<Self> {
        Self::from_array(space, ArrayD::zeros(space.shape(true)))
    }

    /// Wrap coefficients
    ///
    /// # Errors
    /// Wrong shape or dtype.
    pub fn from_array(space: &Space, v: ArrayD<T>) -> Result<Self> {
        check_dtype::<T>(space.spectral_dtype())?;
        space.check_shape(v.shape(), true)?;
        Ok(Self {
            space: space.clone(),
            v,
        })
    }

    /// Space of the function
    pub fn space(&self) -> &Space {
        &self.space
    }

    fn to_complex(&self) -> ArrayD<Complex64> {
        self.v.mapv(Scalar::to_complex)
    }

    /// Values at the physical mesh
    ///
    /// # Errors
    /// `P` is not the physical dtype of the space.
    pub fn backward<P: Scalar>(&self) -> Result<Array<P>> {
        let values = self.space.backward(&self.to_complex())?;
        Array::from_array(&self.space, from_complex(&values))
    }

    /// Values at the mesh of the dealiased space
    ///
    /// # Errors
    /// See [`Function::backward`].
    pub fn backward_dealiased<P: Scalar>(&self) -> Result<Array<P>> {
        let padded = self.refined_space(&self.space.get_dealiased()?, &Serial)?;
        padded.backward()
    }

    /// Coefficients in the orthogonal parent space
    ///
    /// # Errors
    /// A basis without closed form change of basis.
    pub fn to_ortho(&self) -> Result<Function<T>> {
        let coeffs = self.space.to_ortho(&self.to_complex())?;
        Function::from_array(&self.space.get_orthogonal(), from_complex(&coeffs))
    }

    /// Same function with `n[i]` physical points along axis `i`. Modes
    /// are zero padded or truncated.
    ///
    /// # Errors
    /// Wrong number of sizes.
    pub fn refine(&self, n: &[usize]) -> Result<Function<T>> {
        self.refine_with(n, &Serial)
    }

    /// [`Function::refine`] on distributed data
    ///
    /// # Errors
    /// Wrong number of sizes, or failed redistribution.
    pub fn refine_with(&self, n: &[usize], redistribute: &dyn Redistribute) -> Result<Function<T>> {
        let target = self.space.get_refined(n)?;
        self.refined_space(&target, redistribute)
    }

    fn refined_space(&self, target: &Space, redistribute: &dyn Redistribute) -> Result<Function<T>> {
        let coeffs = resize(&self.space, target, self.to_complex(), redistribute)?;
        Function::from_array(target, from_complex(&coeffs))
    }

    /// Copy of subspace `i`
    ///
    /// # Errors
    /// Scalar space or index out of range.
    pub fn get(&self, i: usize) -> Result<Function<T>> {
        let sub = self.space.get(i)?;
        let offset: usize = (0..i)
            .map(|j| self.space.get(j).map(|s| s.num_components()))
            .sum::<Result<usize>>()?;
        let v = if sub.is_composite() {
            self.v
                .slice_axis(Axis(0), Slice::from(offset..offset + sub.num_components()))
                .to_owned()
        } else {
            self.v.index_axis(Axis(0), offset).to_owned()
        };
        Function::from_array(&sub, v)
    }

    /// Known leaf for the expression algebra
    ///
    /// # Errors
    /// Never for a consistent function.
    pub fn as_basis_function(&self) -> Result<BasisFunction> {
        BasisFunction::known(&self.space, self.to_complex())
    }

    /// Values at `points` (dimensions x number of points), one row per
    /// scalar component
    ///
    /// # Errors
    /// `P` is not the physical dtype, or wrong point dimensions.
    pub fn eval<P: Scalar>(&self, points: &Array2<Real>) -> Result<Array2<P>> {
        let leaf = self.as_basis_function()?;
        let dim = self.space.dimensions();
        let num_components = self.space.num_components();
        let mut out = Array2::zeros((num_components, points.ncols()));
        for (c, mut row) in out.outer_iter_mut().enumerate() {
            let term = (vec![0; dim], c, Scale::Const(1.));
            let expr = Expr::from_components(vec![vec![term]], leaf.clone());
            row.assign(&expr.eval::<P>(points)?);
        }
        Ok(out)
    }
}

impl<T: Scalar> Array<T> {
    /// Zero values on `space`
    ///
    /// # Errors
    /// `T` is not the physical dtype of `space`.
    pub fn new(space: &Space) -> Result<Self> {
        Self::from_array(space, ArrayD::zeros(space.shape(false)))
    }

    /// Wrap values
    ///
    /// # Errors
    /// Wrong shape or dtype.
    pub fn from_array(space: &Space, v: ArrayD<T>) -> Result<Self> {
        check_dtype::<T>(space.physical_dtype())?;
        space.check_shape(v.shape(), false)?;
        Ok(Self {
            space: space.clone(),
            v,
        })
    }

    /// Space of the values
    pub fn space(&self) -> &Space {
        &self.space
    }

    /// Coefficients of the values
    ///
    /// # Errors
    /// `S` is not the spectral dtype of the space.
    pub fn forward<S: Scalar>(&self) -> Result<Function<S>> {
        let coeffs = self.space.forward(&self.v.mapv(Scalar::to_complex))?;
        Function::from_array(&self.space, from_complex(&coeffs))
    }

    /// Coefficients on `target` of values on a padded version of it,
    /// the highest modes are dropped
    ///
    /// # Errors
    /// `target` has a different structure, or wrong dtype.
    pub fn forward_dealiased<S: Scalar>(&self, target: &Space) -> Result<Function<S>> {
        let coeffs = self.space.forward(&self.v.mapv(Scalar::to_complex))?;
        let coeffs = resize(&self.space, target, coeffs, &Serial)?;
        Function::from_array(target, from_complex(&coeffs))
    }
}

/// Pad or truncate coefficients on `from` to the sizes of `to`, one axis
/// at a time. Each axis is made local before it is resized, afterwards
/// the layout is restored in reverse order.
fn resize(
    from: &Space,
    to: &Space,
    data: ArrayD<Complex64>,
    redistribute: &dyn Redistribute,
) -> Result<ArrayD<Complex64>> {
    if from.num_components() != to.num_components() || from.dimensions() != to.dimensions() {
        return Err(FunspaceError::Structure(
            "cannot resize between spaces of different structure".to_string(),
        ));
    }
    let targets = to.flatten();
    from.per_component(&data, |i, space, v| {
        let target = &targets[i];
        let mut out = v.clone();
        for (axis, (old, new)) in space.bases().iter().zip(target.bases()).enumerate() {
            trace!(
                "{} axis {}: {} -> {}",
                if new.len_spec() < old.len_spec() { "truncate" } else { "pad" },
                axis,
                old.len_spec(),
                new.len_spec()
            );
            out = redistribute.align(out, axis)?;
            out = apply_along_axis(&out, axis, new.len_spec(), |lane| {
                Ok(old.resize_vec(lane, new.len_phys()))
            })?;
        }
        for axis in (0..space.dimensions()).rev() {
            out = redistribute.restore(out, axis)?;
        }
        Ok(out)
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::fourier::{FourierC2c, FourierR2c};
    use crate::jacobi::{CompositeJacobi, Jacobi};
    use crate::utils::{approx_eq, approx_eq_complex};
    use ndarray::{array, s};

    #[test]
    fn test_dtype_and_shape_checks() {
        let space = Space::line(FourierR2c::new(8).into()).unwrap();
        assert!(Function::<f64>::new(&space).is_err());
        assert!(Function::<Complex64>::new(&space).is_ok());
        assert!(Array::<f64>::new(&space).is_ok());
        assert!(Array::<f64>::from_array(&space, ArrayD::zeros(vec![5])).is_err());
    }

    #[test]
    fn test_forward_backward() {
        let space = Space::line(CompositeJacobi::biharmonic(12).unwrap().into()).unwrap();
        let x = space.mesh()[0].clone();
        let values = x.mapv(|x| (1. - x * x).powi(2) * (1. + x)).into_dyn();
        let u = Array::<f64>::from_array(&space, values.clone()).unwrap();
        let f = u.forward::<f64>().unwrap();
        approx_eq(&f.backward::<f64>().unwrap().v, &values);
    }

    #[test]
    fn test_refine_roundtrip_1d() {
        let space = Space::line(CompositeJacobi::dirichlet(8).unwrap().into()).unwrap();
        let mut f = Function::<f64>::new(&space).unwrap();
        for i in 0..6 {
            f.v[[i]] = (i + 1) as f64;
        }
        let large = f.refine(&[14]).unwrap();
        assert_eq!(large.v.shape(), &[14]);
        assert!(large.v.slice(s![6..]).iter().all(|v| *v == 0.));
        let back = large.refine(&[8]).unwrap();
        assert_eq!(back.v, f.v);
    }

    #[test]
    fn test_refine_r2c() {
        let space = Space::tensor(vec![
            FourierC2c::new(6).into(),
            FourierR2c::new(8).into(),
        ])
        .unwrap();
        let mesh = space.mesh();
        let values = Array2::from_shape_fn((6, 8), |(i, j)| {
            (mesh[0][i]).sin() * (2. * mesh[1][j]).cos()
        })
        .into_dyn();
        let u = Array::<f64>::from_array(&space, values).unwrap();
        let f = u.forward::<Complex64>().unwrap();
        let fine = f.refine(&[10, 12]).unwrap();
        assert_eq!(fine.v.shape(), &[10, 7]);
        let points: Array2<f64> = array![[0.3, 2.], [1.1, 4.]];
        let expected = array![[0.3_f64.sin() * 2.2_f64.cos(), 2_f64.sin() * 8_f64.cos()]];
        approx_eq(&fine.eval::<f64>(&points).unwrap(), &expected);
        approx_eq(&f.eval::<f64>(&points).unwrap(), &expected);
        let back = fine.refine(&[6, 8]).unwrap();
        approx_eq_complex(&back.v, &f.v);
    }

    #[test]
    fn test_dealiased() {
        let base = FourierR2c::new(8).with_padding_factor(1.5);
        let space = Space::line(base.into()).unwrap();
        let x = space.mesh()[0].clone();
        let u = Array::<f64>::from_array(&space, x.mapv(|x| (3. * x).cos()).into_dyn()).unwrap();
        let f = u.forward::<Complex64>().unwrap();
        let padded = f.backward_dealiased::<f64>().unwrap();
        assert_eq!(padded.v.shape(), &[12]);
        let fine_x = padded.space().mesh()[0].clone();
        approx_eq(&padded.v, &fine_x.mapv(|x| (3. * x).cos()).into_dyn());
        let g = padded.forward_dealiased::<Complex64>(&space).unwrap();
        approx_eq_complex(&g.v, &f.v);
    }

    #[test]
    fn test_to_ortho_and_components() {
        let scalar = Space::tensor(vec![
            CompositeJacobi::dirichlet(6).unwrap().into(),
            Jacobi::legendre(4).unwrap().into(),
        ])
        .unwrap();
        let space = Space::vector(&scalar);
        let mut f = Function::<f64>::new(&space).unwrap();
        f.v[[1, 0, 2]] = 1.;
        let ortho = f.to_ortho().unwrap();
        assert_eq!(ortho.v.shape(), &[2, 6, 4]);
        // phi_0 = 2/3 (L_0 - L_2)
        assert!((ortho.v[[1, 0, 2]] - 2. / 3.).abs() < 1e-12);
        assert!((ortho.v[[1, 2, 2]] + 2. / 3.).abs() < 1e-12);
        assert!(ortho.v.slice(s![0, .., ..]).iter().all(|v| *v == 0.));
        let second = f.get(1).unwrap();
        assert_eq!(second.v.shape(), &[6, 4]);
        assert_eq!(second.v[[0, 2]], 1.);
        let points: Array2<f64> = array![[0.5], [0.2]];
        let values = f.eval::<f64>(&points).unwrap();
        let p2 = (3. * 0.2_f64.powi(2) - 1.) / 2.;
        approx_eq(&values, &array![[0.], [(1. - 0.25) * p2]]);
    }
}
