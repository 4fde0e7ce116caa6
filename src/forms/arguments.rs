//! Leaves of the expression algebra: test, trial and known functions
use crate::error::Result;
use crate::space::Space;
use crate::types::Complex64;
use ndarray::ArrayD;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Unique key of a constructed leaf
pub type LeafId = usize;

static NEXT_LEAF_ID: AtomicUsize = AtomicUsize::new(0);

/// Role of a leaf in a bilinear form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Argument {
    /// Test function
    Test = 0,
    /// Trial function
    Trial = 1,
    /// Function with known coefficients
    Known = 2,
}

impl Argument {
    /// Integer tag 0, 1 or 2
    pub fn tag(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Argument::Test => write!(f, "test"),
            Argument::Trial => write!(f, "trial"),
            Argument::Known => write!(f, "known"),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) enum LeafKind {
    Test,
    Trial,
    /// Spectral coefficients on the base space
    Known(Arc<ArrayD<Complex64>>),
}

#[derive(Debug)]
struct LeafInner {
    id: LeafId,
    kind: LeafKind,
    space: Space,
    index: Option<usize>,
    offset: usize,
    base: Option<BasisFunction>,
}

/// Test, trial or known function on a space.
///
/// Indexing a leaf on a composite space with [`BasisFunction::get`]
/// yields a leaf on the subspace which remembers the undifferentiated
/// leaf it came from ([`BasisFunction::base`]). Clones share identity.
#[derive(Debug, Clone)]
pub struct BasisFunction(Arc<LeafInner>);

impl BasisFunction {
    fn build(
        kind: LeafKind,
        space: Space,
        index: Option<usize>,
        offset: usize,
        base: Option<BasisFunction>,
    ) -> Self {
        BasisFunction(Arc::new(LeafInner {
            id: NEXT_LEAF_ID.fetch_add(1, Ordering::Relaxed),
            kind,
            space,
            index,
            offset,
            base,
        }))
    }

    /// Test function on `space`
    pub fn test(space: &Space) -> Self {
        Self::build(LeafKind::Test, space.clone(), None, 0, None)
    }

    /// Trial function on `space`
    pub fn trial(space: &Space) -> Self {
        Self::build(LeafKind::Trial, space.clone(), None, 0, None)
    }

    /// Known function with spectral `coeffs` on `space`
    ///
    /// # Errors
    /// Shape of `coeffs` differs from the spectral shape of `space`.
    pub fn known(space: &Space, coeffs: ArrayD<Complex64>) -> Result<Self> {
        space.check_shape(coeffs.shape(), true)?;
        Ok(Self::build(
            LeafKind::Known(Arc::new(coeffs)),
            space.clone(),
            None,
            0,
            None,
        ))
    }

    /// Unique key
    pub fn id(&self) -> LeafId {
        self.0.id
    }

    /// Test, trial or known
    pub fn argument(&self) -> Argument {
        match self.0.kind {
            LeafKind::Test => Argument::Test,
            LeafKind::Trial => Argument::Trial,
            LeafKind::Known(_) => Argument::Known,
        }
    }

    /// Space of the leaf
    pub fn function_space(&self) -> &Space {
        &self.0.space
    }

    /// Component index in the parent space
    pub fn index(&self) -> Option<usize> {
        self.0.index
    }

    /// Number of scalar components preceding this leaf in its base space
    pub fn offset(&self) -> usize {
        self.0.offset
    }

    /// Number of spatial dimensions
    pub fn dimensions(&self) -> usize {
        self.0.space.dimensions()
    }

    /// Number of scalar components
    pub fn num_components(&self) -> usize {
        self.0.space.num_components()
    }

    /// Tensor rank of the space
    pub fn rank(&self) -> usize {
        self.0.space.rank()
    }

    /// Undifferentiated leaf this one was indexed from, itself for roots
    pub fn base(&self) -> BasisFunction {
        match &self.0.base {
            Some(base) => base.clone(),
            None => self.clone(),
        }
    }

    /// Space of [`BasisFunction::base`]
    pub fn base_space(&self) -> Space {
        self.base().0.space.clone()
    }

    /// True if both leaves were indexed from the same root leaf
    pub fn shares_base(&self, other: &BasisFunction) -> bool {
        self.base().id() == other.base().id()
    }

    /// Coefficients on the base space of a known function
    pub fn coefficients(&self) -> Option<&ArrayD<Complex64>> {
        match &self.0.kind {
            LeafKind::Known(coeffs) => Some(coeffs),
            _ => None,
        }
    }

    /// Leaf on subspace `i`
    ///
    /// # Errors
    /// Rank 0 leaf, or index out of range.
    pub fn get(&self, i: usize) -> Result<BasisFunction> {
        let space = self.0.space.get(i)?;
        let mut offset = self.0.offset;
        for j in 0..i {
            offset += self.0.space.get(j)?.num_components();
        }
        Ok(Self::build(
            self.0.kind.clone(),
            space,
            Some(i),
            offset,
            Some(self.base()),
        ))
    }
}

impl PartialEq for BasisFunction {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::FunspaceError;
    use crate::jacobi::{CompositeJacobi, Jacobi};

    fn scalar() -> Space {
        Space::tensor(vec![
            CompositeJacobi::dirichlet(6).unwrap().into(),
            Jacobi::legendre(5).unwrap().into(),
        ])
        .unwrap()
    }

    #[test]
    fn test_arguments() {
        let v = scalar();
        assert_eq!(BasisFunction::test(&v).argument().tag(), 0);
        assert_eq!(BasisFunction::trial(&v).argument().tag(), 1);
        let coeffs = ArrayD::zeros(vec![6, 5]);
        let f = BasisFunction::known(&v, coeffs).unwrap();
        assert_eq!(f.argument().tag(), 2);
        assert!(f.coefficients().is_some());
        assert!(BasisFunction::known(&v, ArrayD::zeros(vec![5, 5])).is_err());
    }

    #[test]
    fn test_indexing() {
        let v = scalar();
        let w = Space::vector(&v);
        let mixed = Space::mixed(vec![w.clone(), v.clone()]).unwrap();
        let u = BasisFunction::trial(&mixed);
        assert_eq!(u.num_components(), 3);
        let u1 = u.get(1).unwrap();
        assert_eq!(u1.offset(), 2);
        assert_eq!(u1.index(), Some(1));
        assert_eq!(u1.argument(), Argument::Trial);
        assert_eq!(u1.base(), u);
        let u01 = u.get(0).unwrap().get(1).unwrap();
        assert_eq!(u01.offset(), 1);
        assert!(u01.shares_base(&u1));
        assert_eq!(u01.base_space(), mixed);
        assert!(matches!(u01.get(0), Err(FunspaceError::NotComposite)));
        assert!(u.get(2).is_err());
        assert!(!u.shares_base(&BasisFunction::trial(&mixed)));
    }
}
