//! Error types for phantom operations.
//!
//! Every failure in this crate is detected eagerly and surfaced to the caller
//! through [`PhantomError`]. Non-positive relaxation times are not errors: they
//! flow through the signal equation as IEEE infinities or NaNs.

use thiserror::Error;

use crate::quantity::Quantity;

/// Main error type for phantom operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PhantomError {
    /// Two grids that must be co-registered have different shapes.
    #[error("Shape mismatch for {field}: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        field: String,
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    /// A mask selects no pixels, so a regional mean is undefined.
    #[error("Empty region: mask selects no pixels, mean {quantity} is undefined")]
    EmptyRegion { quantity: Quantity },

    /// A tissue code outside CSF (1), GM (2) and WM (3) was requested.
    #[error("Unsupported tissue code {0}: expected 1 (CSF), 2 (GM) or 3 (WM)")]
    UnsupportedTissueCode(i64),

    /// Sequence timing outside its physical domain.
    #[error("Invalid sequence parameter: {0}")]
    InvalidSequenceParameter(String),

    /// A raw buffer does not describe a valid grid.
    #[error("Invalid grid: {0}")]
    InvalidGrid(String),
}

/// Result type for phantom operations.
pub type Result<T> = std::result::Result<T, PhantomError>;

impl PhantomError {
    /// Create a shape mismatch error for the named field.
    pub fn shape_mismatch(field: impl Into<String>, expected: &[usize], actual: &[usize]) -> Self {
        Self::ShapeMismatch {
            field: field.into(),
            expected: expected.to_vec(),
            actual: actual.to_vec(),
        }
    }

    /// Create an invalid sequence parameter error.
    pub fn invalid_sequence(msg: impl Into<String>) -> Self {
        Self::InvalidSequenceParameter(msg.into())
    }

    /// Create an invalid grid error.
    pub fn invalid_grid(msg: impl Into<String>) -> Self {
        Self::InvalidGrid(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_mismatch_display() {
        let err = PhantomError::shape_mismatch("T2", &[128, 128], &[64, 128]);
        assert_eq!(
            err.to_string(),
            "Shape mismatch for T2: expected [128, 128], got [64, 128]"
        );
    }

    #[test]
    fn test_empty_region_names_quantity() {
        let err = PhantomError::EmptyRegion { quantity: Quantity::T1 };
        assert!(err.to_string().contains("T1"));
    }

    #[test]
    fn test_unsupported_code_display() {
        let err = PhantomError::UnsupportedTissueCode(4);
        assert!(err.to_string().starts_with("Unsupported tissue code 4"));
    }

    #[test]
    fn test_helper_constructors() {
        assert!(matches!(
            PhantomError::invalid_sequence("TR"),
            PhantomError::InvalidSequenceParameter(_)
        ));
        assert!(matches!(
            PhantomError::invalid_grid("empty"),
            PhantomError::InvalidGrid(_)
        ));
    }
}
