use burn::tensor::backend::Backend;
use burn::tensor::{Bool, ElementConversion, Int, Shape, Tensor, TensorData};

use super::validate_buffer;
use crate::error::Result;

/// Binary mask selecting the pixels of one region.
///
/// Masks are boolean tensors, so a pixel is either selected (1) or not (0);
/// there are no intermediate values.
#[derive(Debug, Clone)]
pub struct TissueMask<B: Backend> {
    mask: Tensor<B, 2, Bool>,
}

impl<B: Backend> TissueMask<B> {
    pub fn new(mask: Tensor<B, 2, Bool>) -> Self {
        Self { mask }
    }

    /// Build a mask from row-major flags.
    pub fn from_vec(flags: Vec<bool>, shape: [usize; 2], device: &B::Device) -> Result<Self> {
        validate_buffer(&shape, flags.len())?;
        let data = TensorData::new(flags, Shape::new(shape));
        Ok(Self::new(Tensor::from_data(data, device)))
    }

    pub fn data(&self) -> &Tensor<B, 2, Bool> {
        &self.mask
    }

    pub fn shape(&self) -> [usize; 2] {
        self.mask.dims()
    }

    /// Number of selected pixels.
    pub fn count(&self) -> usize {
        self.mask.clone().int().sum().into_scalar().elem::<i64>() as usize
    }

    /// True if no pixel is selected.
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// The mask as a 0/1 integer grid.
    pub fn to_binary(&self) -> Tensor<B, 2, Int> {
        self.mask.clone().int()
    }

    /// Copy the mask to host memory as row-major 0/1 values.
    pub fn to_vec(&self) -> Vec<u8> {
        self.to_binary()
            .into_data()
            .iter::<i64>()
            .map(|v| v as u8)
            .collect()
    }
}
