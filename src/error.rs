//! Error type of the crate
use thiserror::Error;

/// Result alias with [`FunspaceError`]
pub type Result<T> = std::result::Result<T, FunspaceError>;

/// Errors raised while building bases, spaces and forms
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FunspaceError {
    /// Boundary condition tuple of wrong arity, non-homogeneous or unknown tag
    #[error("invalid boundary condition: {0}")]
    BoundaryCondition(String),

    /// Combination of family, boundary condition or rank which is not supported
    #[error("not implemented: {0}")]
    NotImplemented(String),

    /// Operands of an algebraic operation do not fit together
    #[error("structural mismatch: {0}")]
    Structure(String),

    /// Tensor rank that cannot be represented
    #[error("no tensor rank for {num_components} components in {dimensions}D")]
    UnsupportedRank {
        num_components: usize,
        dimensions: usize,
    },

    /// Indexing a leaf or expression on a scalar space
    #[error("cannot index a rank 0 object")]
    NotComposite,

    /// Index outside the number of components
    #[error("index {index} out of bounds for {len} components")]
    Index { index: usize, len: usize },

    /// Array shape does not match the space
    #[error("shape mismatch: expected {expected:?}, got {got:?}")]
    Shape {
        expected: Vec<usize>,
        got: Vec<usize>,
    },

    /// Element type does not match the space
    #[error("dtype mismatch: expected {expected}, got {got}")]
    Dtype {
        expected: crate::types::Dtype,
        got: crate::types::Dtype,
    },

    /// Evaluation of an expression whose leaf holds no coefficients
    #[error("expression has no coefficients, only known functions can be evaluated")]
    NoCoefficients,

    /// Shape error raised by ndarray
    #[error("ndarray: {0}")]
    Ndarray(String),

    /// Invalid numerical parameter
    #[error("invalid parameter: {0}")]
    Parameter(String),
}

impl From<ndarray::ShapeError> for FunspaceError {
    fn from(err: ndarray::ShapeError) -> Self {
        FunspaceError::Ndarray(err.to_string())
    }
}
