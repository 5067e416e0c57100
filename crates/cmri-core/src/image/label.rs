use burn::tensor::backend::Backend;
use burn::tensor::{Int, Shape, Tensor, TensorData};

use super::{validate_buffer, TissueMask};
use crate::error::Result;

/// Integer tissue label per pixel.
///
/// Codes follow [`Tissue::code`](crate::Tissue::code); values outside the
/// known codes are kept as-is and simply never match a tissue mask.
#[derive(Debug, Clone)]
pub struct LabelMap<B: Backend> {
    labels: Tensor<B, 2, Int>,
}

impl<B: Backend> LabelMap<B> {
    pub fn new(labels: Tensor<B, 2, Int>) -> Self {
        Self { labels }
    }

    /// Build a label map from row-major codes.
    pub fn from_vec(codes: Vec<i64>, shape: [usize; 2], device: &B::Device) -> Result<Self> {
        validate_buffer(&shape, codes.len())?;
        let data = TensorData::new(codes, Shape::new(shape));
        Ok(Self::new(Tensor::from_data(data, device)))
    }

    pub fn data(&self) -> &Tensor<B, 2, Int> {
        &self.labels
    }

    pub fn shape(&self) -> [usize; 2] {
        self.labels.dims()
    }

    /// Mask of the pixels whose label equals `code`.
    pub fn select(&self, code: i64) -> TissueMask<B> {
        TissueMask::new(self.labels.clone().equal_elem(code))
    }

    /// Number of pixels carrying `code`.
    pub fn count(&self, code: i64) -> usize {
        self.select(code).count()
    }

    /// Copy the codes to host memory in row-major order.
    pub fn to_vec(&self) -> Vec<i64> {
        self.labels.clone().into_data().iter::<i64>().collect()
    }
}
