//! Data layout across processes.
//!
//! Operations along one axis need that axis to be local. A
//! [`Redistribute`] implementation moves data into such a layout and back.
//! [`Serial`] holds all data in one process and never moves anything.
use crate::error::Result;
use crate::types::Complex64;
use ndarray::ArrayD;

/// Move array data between layouts
pub trait Redistribute {
    /// Return `data` in a layout where `axis` is not distributed
    ///
    /// # Errors
    /// Communication failure.
    fn align(&self, data: ArrayD<Complex64>, axis: usize) -> Result<ArrayD<Complex64>>;

    /// Undo [`Redistribute::align`] for `axis`
    ///
    /// # Errors
    /// Communication failure.
    fn restore(&self, data: ArrayD<Complex64>, axis: usize) -> Result<ArrayD<Complex64>>;

    /// Local range of each axis for a global `shape`
    fn local_slice(&self, shape: &[usize]) -> Vec<std::ops::Range<usize>>;
}

/// Single process layout
#[derive(Debug, Clone, Copy, Default)]
pub struct Serial;

impl Redistribute for Serial {
    fn align(&self, data: ArrayD<Complex64>, _axis: usize) -> Result<ArrayD<Complex64>> {
        Ok(data)
    }

    fn restore(&self, data: ArrayD<Complex64>, _axis: usize) -> Result<ArrayD<Complex64>> {
        Ok(data)
    }

    fn local_slice(&self, shape: &[usize]) -> Vec<std::ops::Range<usize>> {
        shape.iter().map(|n| 0..*n).collect()
    }
}
