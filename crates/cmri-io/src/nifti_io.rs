use std::path::Path;

use anyhow::{bail, Context, Result};
use burn::tensor::backend::Backend;
use cmri_core::{Image, LabelMap};
use ndarray::{Array2, IxDyn};
use nifti::writer::WriterOptions;
use nifti::{IntoNdArray, NiftiObject, ReaderOptions};

/// Row-major pixel values of one 2D map, before they reach a tensor.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    pub values: Vec<f32>,
    /// `[rows, cols]`
    pub shape: [usize; 2],
}

/// Read a 2D NIfTI file (or 3D with a single slice) into host memory.
///
/// NIfTI stores `[X, Y(, 1)]`; the returned plane is `[rows = Y, cols = X]`.
pub fn read_plane<P: AsRef<Path>>(path: P) -> Result<Plane> {
    let path = path.as_ref();
    let obj = ReaderOptions::new()
        .read_file(path)
        .with_context(|| format!("Failed to read NIfTI file {}", path.display()))?;

    let volume = obj
        .into_volume()
        .into_ndarray::<f32>()
        .context("Failed to convert volume to ndarray")?;

    let dims = volume.shape().to_vec();
    let (nx, ny) = match dims.as_slice() {
        [nx, ny] | [nx, ny, 1] => (*nx, *ny),
        other => bail!("Expected a 2D NIfTI slice, found shape {:?}", other),
    };

    let mut values = Vec::with_capacity(nx * ny);
    for y in 0..ny {
        for x in 0..nx {
            let value = if dims.len() == 2 {
                volume[IxDyn(&[x, y])]
            } else {
                volume[IxDyn(&[x, y, 0])]
            };
            values.push(value);
        }
    }

    Ok(Plane { values, shape: [ny, nx] })
}

/// Read a 2D NIfTI file as a real-valued image.
pub fn read_nifti_2d<B: Backend, P: AsRef<Path>>(path: P, device: &B::Device) -> Result<Image<B, 2>> {
    let plane = read_plane(path)?;
    Ok(Image::from_vec(plane.values, plane.shape, device)?)
}

/// Read a 2D NIfTI file as a label map, rounding stored values to codes.
pub fn read_label_nifti<B: Backend, P: AsRef<Path>>(path: P, device: &B::Device) -> Result<LabelMap<B>> {
    let plane = read_plane(path)?;
    Ok(labels_from_plane(plane, device)?)
}

pub(crate) fn labels_from_plane<B: Backend>(plane: Plane, device: &B::Device) -> cmri_core::Result<LabelMap<B>> {
    let codes = plane.values.iter().map(|v| v.round() as i64).collect();
    LabelMap::from_vec(codes, plane.shape, device)
}

/// Write a 2D image to a NIfTI file.
///
/// # Arguments
/// * `path` - Path to write the NIfTI file
/// * `image` - The image to write
pub fn write_nifti_2d<B: Backend, P: AsRef<Path>>(path: P, image: &Image<B, 2>) -> Result<()> {
    let [rows, cols] = image.shape();
    let values = image.to_vec();
    // NIfTI convention is [X, Y]
    let array = Array2::from_shape_fn((cols, rows), |(x, y)| values[y * cols + x]);

    let path = path.as_ref();
    WriterOptions::new(path)
        .write_nifti(&array)
        .map_err(|e| anyhow::anyhow!("Failed to write NIfTI file {}: {}", path.display(), e))?;
    Ok(())
}

/// Write a label map to a NIfTI file with integer voxels.
pub fn write_label_nifti<B: Backend, P: AsRef<Path>>(path: P, labels: &LabelMap<B>) -> Result<()> {
    let [rows, cols] = labels.shape();
    let codes = labels.to_vec();
    let array = Array2::from_shape_fn((cols, rows), |(x, y)| codes[y * cols + x] as i32);

    let path = path.as_ref();
    WriterOptions::new(path)
        .write_nifti(&array)
        .map_err(|e| anyhow::anyhow!("Failed to write NIfTI file {}: {}", path.display(), e))?;
    Ok(())
}
