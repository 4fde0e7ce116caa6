//! # Function spaces
//!
//! Tensor products of one dimensional bases, and composite spaces of
//! several scalar spaces (vector spaces, mixed spaces).
//!
//! A [`Space`] is a cheap handle. Each constructed space carries a unique
//! [`SpaceId`]; two handles are the same space if their ids agree.
pub mod redistribute;
use crate::enums::Base;
use crate::error::{FunspaceError, Result};
use crate::traits::{BaseBasics, BaseSize, FromOrtho, Refine, Transform};
use crate::types::{Complex64, Dtype, Real};
use log::debug;
use ndarray::{Array1, ArrayD, Axis};
pub use redistribute::{Redistribute, Serial};
use std::ops::Range;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Unique key of a constructed space
pub type SpaceId = usize;

static NEXT_SPACE_ID: AtomicUsize = AtomicUsize::new(0);

fn next_id() -> SpaceId {
    NEXT_SPACE_ID.fetch_add(1, Ordering::Relaxed)
}

#[derive(Debug)]
enum SpaceKind {
    /// Scalar tensor product space, one basis per axis
    Tensor(Vec<Base>),
    /// `copies` times the same space
    Vector(Space, usize),
    /// Collection of spaces
    Mixed(Vec<Space>),
}

#[derive(Debug)]
struct SpaceInner {
    id: SpaceId,
    kind: SpaceKind,
}

/// Handle to a function space
#[derive(Debug, Clone)]
pub struct Space(Arc<SpaceInner>);

impl PartialEq for Space {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for Space {}

impl Space {
    fn from_kind(kind: SpaceKind) -> Self {
        Space(Arc::new(SpaceInner {
            id: next_id(),
            kind,
        }))
    }

    /// Tensor product space of `bases`, one per axis.
    ///
    /// # Errors
    /// No bases, or more than one real-to-complex basis.
    pub fn tensor(bases: Vec<Base>) -> Result<Self> {
        if bases.is_empty() {
            return Err(FunspaceError::Structure(
                "a tensor product space needs at least one basis".to_string(),
            ));
        }
        if bases.iter().filter(|b| b.is_r2c()).count() > 1 {
            return Err(FunspaceError::Structure(
                "at most one real-to-complex basis per space".to_string(),
            ));
        }
        let space = Self::from_kind(SpaceKind::Tensor(bases));
        debug!(
            "space {} with bases [{}]",
            space.id(),
            space
                .bases()
                .iter()
                .map(|b| b.base_kind().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );
        Ok(space)
    }

    /// One dimensional space
    ///
    /// # Errors
    /// See [`Space::tensor`]
    pub fn line(base: Base) -> Result<Self> {
        Self::tensor(vec![base])
    }

    /// Vector space with one copy of `space` per dimension
    pub fn vector(space: &Space) -> Self {
        let copies = space.dimensions();
        Self::from_kind(SpaceKind::Vector(space.clone(), copies))
    }

    /// Mixed space of several spaces with equal dimensions and shapes
    ///
    /// # Errors
    /// Empty list, or spaces which do not fit together.
    pub fn mixed(spaces: Vec<Space>) -> Result<Self> {
        let first = spaces.first().ok_or_else(|| {
            FunspaceError::Structure("a mixed space needs at least one space".to_string())
        })?;
        let shape = first.scalar_shape(true);
        for s in spaces.iter() {
            if s.dimensions() != first.dimensions() {
                return Err(FunspaceError::Structure(format!(
                    "mixed space of {}D and {}D spaces",
                    first.dimensions(),
                    s.dimensions()
                )));
            }
            if s.scalar_shape(true) != shape || s.scalar_shape(false) != first.scalar_shape(false) {
                return Err(FunspaceError::Shape {
                    expected: shape,
                    got: s.scalar_shape(true),
                });
            }
        }
        Ok(Self::from_kind(SpaceKind::Mixed(spaces)))
    }

    /// Unique key of the space
    pub fn id(&self) -> SpaceId {
        self.0.id
    }

    /// Number of spatial dimensions
    pub fn dimensions(&self) -> usize {
        match &self.0.kind {
            SpaceKind::Tensor(bases) => bases.len(),
            SpaceKind::Vector(space, _) => space.dimensions(),
            SpaceKind::Mixed(spaces) => spaces[0].dimensions(),
        }
    }

    /// Number of scalar components
    pub fn num_components(&self) -> usize {
        match &self.0.kind {
            SpaceKind::Tensor(_) => 1,
            SpaceKind::Vector(space, copies) => copies * space.num_components(),
            SpaceKind::Mixed(spaces) => spaces.iter().map(Space::num_components).sum(),
        }
    }

    /// Tensor rank, 0 for scalar spaces
    pub fn rank(&self) -> usize {
        match &self.0.kind {
            SpaceKind::Tensor(_) => 0,
            SpaceKind::Vector(space, _) => 1 + space.rank(),
            SpaceKind::Mixed(_) => 1,
        }
    }

    /// True for vector and mixed spaces
    pub fn is_composite(&self) -> bool {
        !matches!(self.0.kind, SpaceKind::Tensor(_))
    }

    /// Number of direct subspaces
    pub fn len(&self) -> usize {
        match &self.0.kind {
            SpaceKind::Tensor(_) => 1,
            SpaceKind::Vector(_, copies) => *copies,
            SpaceKind::Mixed(spaces) => spaces.len(),
        }
    }

    /// Subspace `i` of a composite space
    ///
    /// # Errors
    /// Scalar space or index out of range.
    pub fn get(&self, i: usize) -> Result<Space> {
        let len = self.len();
        match &self.0.kind {
            SpaceKind::Tensor(_) => Err(FunspaceError::NotComposite),
            _ if i >= len => Err(FunspaceError::Index { index: i, len }),
            SpaceKind::Vector(space, _) => Ok(space.clone()),
            SpaceKind::Mixed(spaces) => Ok(spaces[i].clone()),
        }
    }

    /// All scalar component spaces in order
    pub fn flatten(&self) -> Vec<Space> {
        match &self.0.kind {
            SpaceKind::Tensor(_) => vec![self.clone()],
            SpaceKind::Vector(space, copies) => {
                let inner = space.flatten();
                (0..*copies).flat_map(|_| inner.clone()).collect()
            }
            SpaceKind::Mixed(spaces) => spaces.iter().flat_map(Space::flatten).collect(),
        }
    }

    /// Bases of a scalar space. Composite spaces return the bases of
    /// their first component.
    pub fn bases(&self) -> &[Base] {
        match &self.0.kind {
            SpaceKind::Tensor(bases) => bases,
            SpaceKind::Vector(space, _) => space.bases(),
            SpaceKind::Mixed(spaces) => spaces[0].bases(),
        }
    }

    /// Shape of one scalar component in spectral or physical space
    pub fn scalar_shape(&self, spectral: bool) -> Vec<usize> {
        self.bases()
            .iter()
            .map(|b| if spectral { b.len_spec() } else { b.len_phys() })
            .collect()
    }

    /// Shape of arrays on the space. Composite spaces have a leading
    /// component axis.
    pub fn shape(&self, spectral: bool) -> Vec<usize> {
        let mut shape = self.scalar_shape(spectral);
        if self.is_composite() {
            shape.insert(0, self.num_components());
        }
        shape
    }

    /// Local index range of each axis of a scalar component
    pub fn local_slice(&self, spectral: bool) -> Vec<Range<usize>> {
        Serial.local_slice(&self.scalar_shape(spectral))
    }

    /// Axis with a real-to-complex basis
    pub fn r2c_axis(&self) -> Option<usize> {
        self.bases().iter().position(Base::is_r2c)
    }

    /// Element type of arrays in physical space, real whenever a
    /// real-to-complex axis is present
    pub fn physical_dtype(&self) -> Dtype {
        if self.r2c_axis().is_some() {
            return Dtype::Real;
        }
        self.merge_dtypes(|b| b.physical_dtype())
    }

    /// Element type of arrays in spectral space
    pub fn spectral_dtype(&self) -> Dtype {
        self.merge_dtypes(|b| b.spectral_dtype())
    }

    fn merge_dtypes<F: Fn(&Base) -> Dtype>(&self, f: F) -> Dtype {
        let complex = self
            .flatten()
            .iter()
            .flat_map(|s| s.bases().to_vec())
            .any(|b| f(&b) == Dtype::Complex);
        if complex {
            Dtype::Complex
        } else {
            Dtype::Real
        }
    }

    /// Physical points along each axis
    pub fn mesh(&self) -> Vec<Array1<Real>> {
        self.bases().iter().map(BaseBasics::mesh).collect()
    }

    /// Same space structure with orthogonal bases
    pub fn get_orthogonal(&self) -> Space {
        match &self.0.kind {
            SpaceKind::Tensor(bases) => {
                Self::from_kind(SpaceKind::Tensor(bases.iter().map(FromOrtho::get_orthogonal).collect()))
            }
            SpaceKind::Vector(space, copies) => {
                Self::from_kind(SpaceKind::Vector(space.get_orthogonal(), *copies))
            }
            SpaceKind::Mixed(spaces) => {
                Self::from_kind(SpaceKind::Mixed(spaces.iter().map(Space::get_orthogonal).collect()))
            }
        }
    }

    /// Same space structure with `n[i]` physical points along axis `i`
    ///
    /// # Errors
    /// Wrong number of sizes, or a basis that cannot be built.
    pub fn get_refined(&self, n: &[usize]) -> Result<Space> {
        self.map_bases(&|b: &Base, axis: usize| b.get_refined(n[axis]), Some(n.len()))
    }

    /// Same space structure with padded bases
    ///
    /// # Errors
    /// A basis that cannot be built.
    pub fn get_dealiased(&self) -> Result<Space> {
        self.map_bases(&|b: &Base, _| b.get_dealiased(), None)
    }

    fn map_bases(
        &self,
        f: &dyn Fn(&Base, usize) -> Result<Base>,
        expected_len: Option<usize>,
    ) -> Result<Space> {
        if let Some(len) = expected_len {
            if len != self.dimensions() {
                return Err(FunspaceError::Structure(format!(
                    "expected {} sizes, got {}",
                    self.dimensions(),
                    len
                )));
            }
        }
        Ok(match &self.0.kind {
            SpaceKind::Tensor(bases) => Self::tensor(
                bases
                    .iter()
                    .enumerate()
                    .map(|(axis, b)| f(b, axis))
                    .collect::<Result<Vec<_>>>()?,
            )?,
            SpaceKind::Vector(space, copies) => {
                Self::from_kind(SpaceKind::Vector(space.map_bases(f, expected_len)?, *copies))
            }
            SpaceKind::Mixed(spaces) => Self::mixed(
                spaces
                    .iter()
                    .map(|s| s.map_bases(f, expected_len))
                    .collect::<Result<Vec<_>>>()?,
            )?,
        })
    }

    /// Check the shape of an array on this space
    ///
    /// # Errors
    /// Shapes differ.
    pub fn check_shape(&self, shape: &[usize], spectral: bool) -> Result<()> {
        let expected = self.shape(spectral);
        if expected.as_slice() == shape {
            Ok(())
        } else {
            Err(FunspaceError::Shape {
                expected,
                got: shape.to_vec(),
            })
        }
    }

    /// Forward transform, physical values to coefficients.
    ///
    /// The real-to-complex axis is transformed first.
    ///
    /// # Errors
    /// Shape mismatch or transform failure.
    pub fn forward(&self, data: &ArrayD<Complex64>) -> Result<ArrayD<Complex64>> {
        self.check_shape(data.shape(), false)?;
        self.per_component(data, |_, space, v| space.forward_scalar(v))
    }

    /// Backward transform, coefficients to physical values.
    ///
    /// The real-to-complex axis is transformed last.
    ///
    /// # Errors
    /// Shape mismatch or transform failure.
    pub fn backward(&self, data: &ArrayD<Complex64>) -> Result<ArrayD<Complex64>> {
        self.check_shape(data.shape(), true)?;
        self.per_component(data, |_, space, v| space.backward_scalar(v))
    }

    /// Change of basis to the orthogonal space, axis by axis
    ///
    /// # Errors
    /// A basis without closed form recurrence.
    pub fn to_ortho(&self, data: &ArrayD<Complex64>) -> Result<ArrayD<Complex64>> {
        self.check_shape(data.shape(), true)?;
        self.per_component(data, |_, space, v| {
            let mut out = v.clone();
            for (axis, base) in space.bases().iter().enumerate() {
                if !base.is_orthogonal() && !base.is_periodic() {
                    out = base.to_ortho_axis(&out, axis)?;
                }
            }
            Ok(out)
        })
    }

    /// Apply `f` to every scalar component of `data`
    pub(crate) fn per_component<F>(&self, data: &ArrayD<Complex64>, f: F) -> Result<ArrayD<Complex64>>
    where
        F: Fn(usize, &Space, &ArrayD<Complex64>) -> Result<ArrayD<Complex64>>,
    {
        if !self.is_composite() {
            return f(0, self, data);
        }
        let parts = self
            .flatten()
            .iter()
            .zip(data.axis_iter(Axis(0)))
            .enumerate()
            .map(|(i, (space, v))| f(i, space, &v.to_owned()))
            .collect::<Result<Vec<_>>>()?;
        let views: Vec<_> = parts.iter().map(|p| p.view().insert_axis(Axis(0))).collect();
        Ok(ndarray::concatenate(Axis(0), &views)?)
    }

    fn forward_scalar(&self, data: &ArrayD<Complex64>) -> Result<ArrayD<Complex64>> {
        let bases = self.bases();
        let mut out = data.clone();
        if let Some(axis) = self.r2c_axis() {
            out = bases[axis].forward_axis(&out, axis)?;
        }
        for (axis, base) in bases.iter().enumerate() {
            if !base.is_r2c() {
                out = base.forward_axis(&out, axis)?;
            }
        }
        Ok(out)
    }

    fn backward_scalar(&self, data: &ArrayD<Complex64>) -> Result<ArrayD<Complex64>> {
        let bases = self.bases();
        let mut out = data.clone();
        for (axis, base) in bases.iter().enumerate().rev() {
            if !base.is_r2c() {
                out = base.backward_axis(&out, axis)?;
            }
        }
        if let Some(axis) = self.r2c_axis() {
            out = bases[axis].backward_axis(&out, axis)?;
        }
        Ok(out)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::fourier::{FourierC2c, FourierR2c};
    use crate::jacobi::{CompositeJacobi, Jacobi};
    use crate::utils::approx_eq_complex;
    use ndarray::Array;

    fn space_2d() -> Space {
        Space::tensor(vec![
            CompositeJacobi::dirichlet(8).unwrap().into(),
            FourierR2c::new(6).into(),
        ])
        .unwrap()
    }

    #[test]
    fn test_shapes_and_dtypes() {
        let space = space_2d();
        assert_eq!(space.dimensions(), 2);
        assert_eq!(space.shape(false), vec![8, 6]);
        assert_eq!(space.shape(true), vec![8, 4]);
        assert_eq!(space.physical_dtype(), Dtype::Real);
        assert_eq!(space.spectral_dtype(), Dtype::Complex);
        assert_eq!(space.r2c_axis(), Some(1));
        let vector = Space::vector(&space);
        assert_eq!(vector.num_components(), 2);
        assert_eq!(vector.rank(), 1);
        assert_eq!(vector.shape(true), vec![2, 8, 4]);
        assert_eq!(vector.get(1).unwrap(), space);
        assert!(space.get(0).is_err());
        assert!(vector.get(2).is_err());
    }

    #[test]
    fn test_two_r2c_axes_rejected() {
        let bases: Vec<Base> = vec![FourierR2c::new(4).into(), FourierR2c::new(4).into()];
        assert!(Space::tensor(bases).is_err());
    }

    #[test]
    fn test_forward_backward_2d() {
        let space = space_2d();
        let mesh = space.mesh();
        let values = Array::from_shape_fn((8, 6), |(i, j)| {
            let (x, y) = (mesh[0][i], mesh[1][j]);
            Complex64::new((1. - x * x) * x * (1. + y.cos()), 0.)
        })
        .into_dyn();
        let coeffs = space.forward(&values).unwrap();
        assert_eq!(coeffs.shape(), &[8, 4]);
        let back = space.backward(&coeffs).unwrap();
        approx_eq_complex(&back, &values);
    }

    #[test]
    fn test_mixed_space() {
        let a = Space::line(CompositeJacobi::dirichlet(6).unwrap().into()).unwrap();
        let b = Space::line(Jacobi::legendre(6).unwrap().into()).unwrap();
        let mixed = Space::mixed(vec![a.clone(), b.clone()]).unwrap();
        assert_eq!(mixed.num_components(), 2);
        assert_eq!(mixed.flatten(), vec![a, b]);
        let c = Space::line(FourierC2c::new(5).into()).unwrap();
        assert!(Space::mixed(vec![mixed, c]).is_err());
    }

    #[test]
    fn test_refined_space() {
        let space = space_2d();
        let refined = space.get_refined(&[10, 8]).unwrap();
        assert_eq!(refined.shape(true), vec![10, 5]);
        assert!(space.get_refined(&[10]).is_err());
        let ortho = space.get_orthogonal();
        assert!(ortho.bases()[0].is_orthogonal());
        assert_ne!(ortho, space);
    }
}
