//! Real-valued image type.
//!
//! This module provides the Image struct which holds one physical quantity
//! (T1, T2, proton density, or a simulated signal) per pixel.

use burn::tensor::backend::Backend;
use burn::tensor::{ElementConversion, Shape, Tensor, TensorData};

use super::validate_buffer;
use crate::error::Result;

/// Real-valued image over a fixed grid.
///
/// Pixel data lives in a burn tensor so that per-pixel arithmetic runs as
/// whole-tensor operations on whichever backend `B` provides.
///
/// # Type Parameters
/// * `B` - The backend (CPU or GPU) for tensor operations
/// * `D` - The dimensionality of the image
///
/// # Examples
/// ```rust
/// use cmri_core::Image;
/// use burn_ndarray::NdArray;
///
/// type Backend = NdArray<f32>;
///
/// let device = Default::default();
/// let image = Image::<Backend, 2>::from_vec(vec![1.0, 2.0, 3.0, 4.0], [2, 2], &device).unwrap();
/// assert_eq!(image.shape(), [2, 2]);
/// ```
#[derive(Debug, Clone)]
pub struct Image<B: Backend, const D: usize> {
    /// The pixel data, potentially on GPU.
    data: Tensor<B, D>,
}

impl<B: Backend, const D: usize> Image<B, D> {
    /// Wrap an existing tensor.
    pub fn new(data: Tensor<B, D>) -> Self {
        Self { data }
    }

    /// Build an image from row-major values.
    ///
    /// # Errors
    /// Returns [`PhantomError::InvalidGrid`](crate::PhantomError::InvalidGrid)
    /// if `values` does not exactly fill `shape`.
    pub fn from_vec(values: Vec<f32>, shape: [usize; D], device: &B::Device) -> Result<Self> {
        validate_buffer(&shape, values.len())?;
        let data = TensorData::new(values, Shape::new(shape));
        Ok(Self::new(Tensor::from_data(data, device)))
    }

    /// Image with every pixel set to `value`.
    pub fn filled(value: f32, shape: [usize; D], device: &B::Device) -> Self {
        Self::new(Tensor::full(shape, value, device))
    }

    /// Get the image data tensor.
    pub fn data(&self) -> &Tensor<B, D> {
        &self.data
    }

    /// Take ownership of the image data tensor.
    pub fn into_data(self) -> Tensor<B, D> {
        self.data
    }

    /// Get the image shape as an array.
    pub fn shape(&self) -> [usize; D] {
        self.data.dims()
    }

    /// Total number of pixels.
    pub fn num_pixels(&self) -> usize {
        self.shape().iter().product()
    }

    /// Copy the pixel values to host memory in row-major order.
    pub fn to_vec(&self) -> Vec<f32> {
        self.data.clone().into_data().iter::<f32>().collect()
    }

    /// Arithmetic mean over all pixels.
    pub fn mean(&self) -> f64 {
        self.data.clone().mean().into_scalar().elem::<f64>()
    }

    /// Smallest pixel value.
    pub fn min(&self) -> f64 {
        self.data.clone().min().into_scalar().elem::<f64>()
    }

    /// Largest pixel value.
    pub fn max(&self) -> f64 {
        self.data.clone().max().into_scalar().elem::<f64>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PhantomError;
    use burn_ndarray::NdArray;

    type Backend = NdArray<f32>;

    #[test]
    fn test_image_creation() {
        let device = Default::default();
        let image = Image::<Backend, 2>::from_vec((0..12).map(|v| v as f32).collect(), [3, 4], &device)
            .unwrap();

        assert_eq!(image.shape(), [3, 4]);
        assert_eq!(image.num_pixels(), 12);
        // Row-major: pixel (1, 2) is the 7th value.
        assert_eq!(image.to_vec()[1 * 4 + 2], 6.0);
    }

    #[test]
    fn test_buffer_length_checked() {
        let device = Default::default();
        let result = Image::<Backend, 2>::from_vec(vec![0.0; 5], [2, 3], &device);
        assert!(matches!(result, Err(PhantomError::InvalidGrid(_))));
    }

    #[test]
    fn test_zero_dimension_rejected() {
        let device = Default::default();
        let result = Image::<Backend, 2>::from_vec(Vec::new(), [0, 3], &device);
        assert!(matches!(result, Err(PhantomError::InvalidGrid(_))));
    }

    #[test]
    fn test_summary_statistics() {
        let device = Default::default();
        let image = Image::<Backend, 2>::from_vec(vec![1.0, -2.0, 3.0, 6.0], [2, 2], &device).unwrap();

        assert!((image.mean() - 2.0).abs() < 1e-6);
        assert_eq!(image.min(), -2.0);
        assert_eq!(image.max(), 6.0);
    }

    #[test]
    fn test_filled() {
        let device = Default::default();
        let image = Image::<Backend, 2>::filled(0.5, [4, 4], &device);
        assert!(image.to_vec().iter().all(|&v| v == 0.5));
    }
}
