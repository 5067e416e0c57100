//! Image types.
//!
//! This module provides the tensor-backed grids a phantom is made of:
//! real-valued images, integer label maps and boolean tissue masks.

pub mod image;
pub mod label;
pub mod mask;

pub use image::Image;
pub use label::LabelMap;
pub use mask::TissueMask;

use crate::error::{PhantomError, Result};

/// Check that `len` values exactly fill a non-empty grid of `shape`.
pub(crate) fn validate_buffer(shape: &[usize], len: usize) -> Result<()> {
    if shape.iter().any(|&dim| dim == 0) {
        return Err(PhantomError::invalid_grid(format!(
            "grid dimensions must be non-zero, got {:?}",
            shape
        )));
    }
    let expected: usize = shape.iter().product();
    if expected != len {
        return Err(PhantomError::invalid_grid(format!(
            "shape {:?} needs {} values, got {}",
            shape, expected, len
        )));
    }
    Ok(())
}
