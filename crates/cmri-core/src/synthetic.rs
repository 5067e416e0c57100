//! Synthetic digital brain phantom.
//!
//! Generates a single axial slice: an elliptical brain with a thin CSF rim,
//! a gray matter cortex, a white matter core and two CSF-filled lateral
//! ventricles. Tissue properties are typical 1.5 T values.

use burn::tensor::backend::Backend;

use crate::error::{PhantomError, Result};
use crate::image::{Image, LabelMap};
use crate::phantom::Phantom;
use crate::tissue::{Tissue, BACKGROUND_CODE};

/// Smallest accepted grid edge.
pub const MIN_SIZE: usize = 8;

/// Relaxation times (ms) and proton density of a tissue.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TissueProperties {
    pub t1: f32,
    pub t2: f32,
    pub pd: f32,
}

impl TissueProperties {
    /// Reference properties used to fill the synthetic phantom.
    pub fn reference(tissue: Tissue) -> Self {
        match tissue {
            Tissue::Csf => Self { t1: 2569.0, t2: 329.0, pd: 1.0 },
            Tissue::GrayMatter => Self { t1: 833.0, t2: 83.0, pd: 0.86 },
            Tissue::WhiteMatter => Self { t1: 500.0, t2: 70.0, pd: 0.77 },
        }
    }

    /// Background carries no protons. Unit relaxation times keep its
    /// simulated signal at exactly zero.
    pub fn background() -> Self {
        Self { t1: 1.0, t2: 1.0, pd: 0.0 }
    }
}

/// Label code of pixel `(row, col)` on a `size` x `size` grid.
fn label_at(row: usize, col: usize, size: usize) -> i64 {
    let center = (size as f64 - 1.0) / 2.0;
    let half = size as f64 / 2.0;
    let u = (col as f64 - center) / half;
    let v = (row as f64 - center) / half;

    let r = ((u / 0.80).powi(2) + (v / 0.92).powi(2)).sqrt();
    if r > 1.0 {
        return BACKGROUND_CODE;
    }
    if r > 0.94 {
        return Tissue::Csf.code();
    }
    if r > 0.76 {
        return Tissue::GrayMatter.code();
    }

    let in_ventricle = |cu: f64| ((u - cu) / 0.07).powi(2) + ((v + 0.05) / 0.22).powi(2) <= 1.0;
    if in_ventricle(-0.12) || in_ventricle(0.12) {
        return Tissue::Csf.code();
    }
    Tissue::WhiteMatter.code()
}

/// Build a `size` x `size` synthetic brain phantom.
///
/// # Errors
/// Returns [`PhantomError::InvalidGrid`] if `size` is below [`MIN_SIZE`].
pub fn brain_phantom<B: Backend>(size: usize, device: &B::Device) -> Result<Phantom<B>> {
    if size < MIN_SIZE {
        return Err(PhantomError::invalid_grid(format!(
            "synthetic phantom needs at least {}x{} pixels, got {}",
            MIN_SIZE, MIN_SIZE, size
        )));
    }

    let total = size * size;
    let mut labels = Vec::with_capacity(total);
    let mut t1 = Vec::with_capacity(total);
    let mut t2 = Vec::with_capacity(total);
    let mut pd = Vec::with_capacity(total);

    for row in 0..size {
        for col in 0..size {
            let code = label_at(row, col, size);
            let props = match Tissue::try_from(code) {
                Ok(tissue) => TissueProperties::reference(tissue),
                Err(_) => TissueProperties::background(),
            };
            labels.push(code);
            t1.push(props.t1);
            t2.push(props.t2);
            pd.push(props.pd);
        }
    }

    let shape = [size, size];
    Phantom::new(
        LabelMap::from_vec(labels, shape, device)?,
        Image::from_vec(t1, shape, device)?,
        Image::from_vec(t2, shape, device)?,
        Image::from_vec(pd, shape, device)?,
    )
}
