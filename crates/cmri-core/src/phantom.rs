//! The digital brain phantom model.
//!
//! A [`Phantom`] holds four co-registered grids (label, T1, T2, proton
//! density). It derives tissue masks from the label map, computes regional
//! means of the physical fields and simulates spin-echo images. A `Phantom`
//! only exists once all four grids have been supplied with matching shapes;
//! everything it exposes afterwards is a pure read or computation.

use burn::tensor::backend::Backend;
use burn::tensor::{ElementConversion, Tensor};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{PhantomError, Result};
use crate::image::{Image, LabelMap, TissueMask};
use crate::quantity::Quantity;
use crate::sequence::SpinEchoParams;
use crate::tissue::Tissue;

/// Digital brain phantom with per-pixel tissue properties.
#[derive(Debug, Clone)]
pub struct Phantom<B: Backend> {
    label: LabelMap<B>,
    t1: Image<B, 2>,
    t2: Image<B, 2>,
    pd: Image<B, 2>,
}

/// Mean properties of one tissue class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TissueStatistics {
    pub tissue: Tissue,
    /// Number of pixels carrying the tissue label.
    pub pixel_count: usize,
    /// Mean T1 in ms.
    pub mean_t1: f64,
    /// Mean T2 in ms.
    pub mean_t2: f64,
    /// Mean proton density.
    pub mean_pd: f64,
}

impl TissueStatistics {
    /// Spin-echo signal predicted from the tissue's mean properties.
    pub fn signal(&self, params: &SpinEchoParams) -> f64 {
        params.signal(self.mean_pd, self.mean_t1, self.mean_t2)
    }
}

impl<B: Backend> Phantom<B> {
    /// Assemble a phantom from its four grids.
    ///
    /// # Errors
    /// Returns [`PhantomError::ShapeMismatch`] if T1, T2 or PD differ in shape
    /// from the label map.
    pub fn new(label: LabelMap<B>, t1: Image<B, 2>, t2: Image<B, 2>, pd: Image<B, 2>) -> Result<Self> {
        let expected = label.shape();
        for (name, field) in [("T1", &t1), ("T2", &t2), ("PD", &pd)] {
            let actual = field.shape();
            if actual != expected {
                return Err(PhantomError::shape_mismatch(name, &expected, &actual));
            }
        }
        debug!("Phantom grid {}x{}", expected[0], expected[1]);

        Ok(Self { label, t1, t2, pd })
    }

    /// Grid shape `[rows, cols]` shared by all fields.
    pub fn shape(&self) -> [usize; 2] {
        self.label.shape()
    }

    pub fn label(&self) -> &LabelMap<B> {
        &self.label
    }

    pub fn t1_map(&self) -> &Image<B, 2> {
        &self.t1
    }

    pub fn t2_map(&self) -> &Image<B, 2> {
        &self.t2
    }

    pub fn pd_map(&self) -> &Image<B, 2> {
        &self.pd
    }

    /// The stored grid of a physical quantity.
    pub fn field(&self, quantity: Quantity) -> &Image<B, 2> {
        match quantity {
            Quantity::T1 => &self.t1,
            Quantity::T2 => &self.t2,
            Quantity::ProtonDensity => &self.pd,
        }
    }

    /// Mask of the pixels labelled as `tissue`.
    pub fn tissue_mask(&self, tissue: Tissue) -> TissueMask<B> {
        self.label.select(tissue.code())
    }

    /// Mask for a raw label code.
    ///
    /// # Errors
    /// Returns [`PhantomError::UnsupportedTissueCode`] for codes other than
    /// 1 (CSF), 2 (GM) and 3 (WM).
    pub fn mask_for_code(&self, code: i64) -> Result<TissueMask<B>> {
        Tissue::try_from(code).map(|tissue| self.tissue_mask(tissue))
    }

    /// Cerebrospinal fluid mask.
    pub fn csf_mask(&self) -> TissueMask<B> {
        self.tissue_mask(Tissue::Csf)
    }

    /// Gray matter mask.
    pub fn gm_mask(&self) -> TissueMask<B> {
        self.tissue_mask(Tissue::GrayMatter)
    }

    /// White matter mask.
    pub fn wm_mask(&self) -> TissueMask<B> {
        self.tissue_mask(Tissue::WhiteMatter)
    }

    /// Arithmetic mean of `quantity` over the pixels selected by `mask`.
    ///
    /// # Errors
    /// * [`PhantomError::ShapeMismatch`] if the mask does not cover the grid.
    /// * [`PhantomError::EmptyRegion`] if the mask selects no pixel.
    pub fn region_mean(&self, quantity: Quantity, mask: &TissueMask<B>) -> Result<f64> {
        let field = self.field(quantity);
        if mask.shape() != field.shape() {
            return Err(PhantomError::shape_mismatch("mask", &field.shape(), &mask.shape()));
        }

        let count = mask.count();
        if count == 0 {
            return Err(PhantomError::EmptyRegion { quantity });
        }

        let outside = mask.data().clone().bool_not();
        let sum = field
            .data()
            .clone()
            .mask_fill(outside, 0.0)
            .sum()
            .into_scalar()
            .elem::<f64>();

        Ok(sum / count as f64)
    }

    /// Mean T1 (ms) over the masked region.
    pub fn mean_t1(&self, mask: &TissueMask<B>) -> Result<f64> {
        self.region_mean(Quantity::T1, mask)
    }

    /// Mean T2 (ms) over the masked region.
    pub fn mean_t2(&self, mask: &TissueMask<B>) -> Result<f64> {
        self.region_mean(Quantity::T2, mask)
    }

    /// Mean proton density over the masked region.
    pub fn mean_pd(&self, mask: &TissueMask<B>) -> Result<f64> {
        self.region_mean(Quantity::ProtonDensity, mask)
    }

    /// Mean properties of one tissue.
    pub fn tissue_statistics(&self, tissue: Tissue) -> Result<TissueStatistics> {
        let mask = self.tissue_mask(tissue);
        Ok(TissueStatistics {
            tissue,
            pixel_count: mask.count(),
            mean_t1: self.mean_t1(&mask)?,
            mean_t2: self.mean_t2(&mask)?,
            mean_pd: self.mean_pd(&mask)?,
        })
    }

    /// Statistics of every tissue present in the label map.
    ///
    /// Tissues with no labelled pixel are skipped.
    pub fn tissue_summary(&self) -> Result<Vec<TissueStatistics>> {
        let mut summary = Vec::with_capacity(Tissue::ALL.len());
        for tissue in Tissue::ALL {
            match self.tissue_statistics(tissue) {
                Ok(stats) => summary.push(stats),
                Err(PhantomError::EmptyRegion { .. }) => {
                    debug!("No {} pixels in label map", tissue);
                }
                Err(err) => return Err(err),
            }
        }
        Ok(summary)
    }

    /// Absolute signal difference between two tissues under `params`,
    /// predicted from their mean properties.
    pub fn tissue_contrast(&self, params: &SpinEchoParams, a: Tissue, b: Tissue) -> Result<f64> {
        let signal_a = self.tissue_statistics(a)?.signal(params);
        let signal_b = self.tissue_statistics(b)?.signal(params);
        Ok((signal_a - signal_b).abs())
    }

    /// Simulate a spin-echo image with the given timing (ms).
    ///
    /// # Errors
    /// Returns [`PhantomError::InvalidSequenceParameter`] if TR is not
    /// positive or TE is negative.
    pub fn spin_echo(&self, tr: f64, te: f64) -> Result<Image<B, 2>> {
        let params = SpinEchoParams::new(tr, te)?;
        Ok(self.simulate(&params))
    }

    /// Simulate a spin-echo image.
    ///
    /// Each pixel is `PD * (1 - exp(-TR/T1)) * exp(-TE/T2)`. The raw signal is
    /// returned without normalization or clipping. Pixels with zero or
    /// negative T1/T2 produce infinities or NaNs.
    pub fn simulate(&self, params: &SpinEchoParams) -> Image<B, 2> {
        debug!("Simulating spin echo with {}", params);

        let shape = self.shape();
        let device = self.pd.data().device();

        let neg_tr = Tensor::<B, 2>::full(shape, -params.tr(), &device);
        let recovery = (neg_tr / self.t1.data().clone()).exp().neg().add_scalar(1.0);

        let neg_te = Tensor::<B, 2>::full(shape, -params.te(), &device);
        let decay = (neg_te / self.t2.data().clone()).exp();

        Image::new(self.pd.data().clone() * recovery * decay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn_ndarray::NdArray;

    type Backend = NdArray<f32>;

    /// 2x3 phantom:
    /// ```text
    /// label  0 1 2      T1  100  2000 900     T2  10 300 90    PD 0.0 1.0 0.8
    ///        3 1 9          600  2400 800         70 200 80       0.7 0.9 0.8
    /// ```
    fn small_phantom() -> Phantom<Backend> {
        let device = Default::default();
        let shape = [2, 3];
        let label = LabelMap::from_vec(vec![0, 1, 2, 3, 1, 9], shape, &device).unwrap();
        let t1 = Image::from_vec(vec![100.0, 2000.0, 900.0, 600.0, 2400.0, 800.0], shape, &device).unwrap();
        let t2 = Image::from_vec(vec![10.0, 300.0, 90.0, 70.0, 200.0, 80.0], shape, &device).unwrap();
        let pd = Image::from_vec(vec![0.0, 1.0, 0.8, 0.7, 0.9, 0.8], shape, &device).unwrap();
        Phantom::new(label, t1, t2, pd).unwrap()
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let device = Default::default();
        let label = LabelMap::<Backend>::from_vec(vec![0; 4], [2, 2], &device).unwrap();
        let good = Image::filled(1.0, [2, 2], &device);
        let bad = Image::filled(1.0, [2, 3], &device);

        let err = Phantom::new(label, good.clone(), bad, good).unwrap_err();
        assert_eq!(err, PhantomError::shape_mismatch("T2", &[2, 2], &[2, 3]));
    }

    #[test]
    fn test_named_masks() {
        let phantom = small_phantom();
        assert_eq!(phantom.csf_mask().to_vec(), vec![0, 1, 0, 0, 1, 0]);
        assert_eq!(phantom.gm_mask().to_vec(), vec![0, 0, 1, 0, 0, 0]);
        assert_eq!(phantom.wm_mask().to_vec(), vec![0, 0, 0, 1, 0, 0]);
    }

    #[test]
    fn test_mask_for_code() {
        let phantom = small_phantom();
        assert_eq!(phantom.mask_for_code(1).unwrap().to_vec(), phantom.csf_mask().to_vec());
        assert!(matches!(
            phantom.mask_for_code(4),
            Err(PhantomError::UnsupportedTissueCode(4))
        ));
        assert!(matches!(
            phantom.mask_for_code(9),
            Err(PhantomError::UnsupportedTissueCode(9))
        ));
    }

    #[test]
    fn test_region_means() {
        let phantom = small_phantom();
        let csf = phantom.csf_mask();

        assert!((phantom.mean_t1(&csf).unwrap() - 2200.0).abs() < 1e-3);
        assert!((phantom.mean_t2(&csf).unwrap() - 250.0).abs() < 1e-3);
        assert!((phantom.mean_pd(&csf).unwrap() - 0.95).abs() < 1e-6);
    }

    #[test]
    fn test_empty_region() {
        let device = Default::default();
        let phantom = small_phantom();
        let empty = TissueMask::from_vec(vec![false; 6], [2, 3], &device).unwrap();

        assert_eq!(
            phantom.mean_pd(&empty),
            Err(PhantomError::EmptyRegion { quantity: Quantity::ProtonDensity })
        );
    }

    #[test]
    fn test_mask_shape_checked() {
        let device = Default::default();
        let phantom = small_phantom();
        let mask = TissueMask::from_vec(vec![true; 4], [2, 2], &device).unwrap();

        assert!(matches!(
            phantom.mean_t1(&mask),
            Err(PhantomError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_simulate_matches_scalar_model() {
        let phantom = small_phantom();
        let params = SpinEchoParams::new(800.0, 30.0).unwrap();
        let image = phantom.simulate(&params).to_vec();

        let t1 = phantom.t1_map().to_vec();
        let t2 = phantom.t2_map().to_vec();
        let pd = phantom.pd_map().to_vec();
        for i in 0..image.len() {
            let expected = params.signal(pd[i] as f64, t1[i] as f64, t2[i] as f64);
            assert!(
                (image[i] as f64 - expected).abs() < 1e-6,
                "pixel {}: {} vs {}",
                i,
                image[i],
                expected
            );
        }
    }

    #[test]
    fn test_spin_echo_rejects_invalid_timing() {
        let phantom = small_phantom();
        assert!(matches!(
            phantom.spin_echo(0.0, 10.0),
            Err(PhantomError::InvalidSequenceParameter(_))
        ));
    }

    #[test]
    fn test_summary_skips_absent_tissue() {
        let device = Default::default();
        let label = LabelMap::<Backend>::from_vec(vec![1, 1, 3, 0], [2, 2], &device).unwrap();
        let ones = Image::filled(1.0, [2, 2], &device);
        let phantom = Phantom::new(label, ones.clone(), ones.clone(), ones).unwrap();

        let summary = phantom.tissue_summary().unwrap();
        let tissues: Vec<Tissue> = summary.iter().map(|s| s.tissue).collect();
        assert_eq!(tissues, vec![Tissue::Csf, Tissue::WhiteMatter]);
        assert_eq!(summary[0].pixel_count, 2);
    }

    #[test]
    fn test_tissue_contrast() {
        let phantom = small_phantom();
        let params = SpinEchoParams::new(500.0, 15.0).unwrap();

        let csf = phantom.tissue_statistics(Tissue::Csf).unwrap().signal(&params);
        let wm = phantom.tissue_statistics(Tissue::WhiteMatter).unwrap().signal(&params);
        let contrast = phantom
            .tissue_contrast(&params, Tissue::Csf, Tissue::WhiteMatter)
            .unwrap();

        assert!((contrast - (csf - wm).abs()).abs() < 1e-12);
        // Short TR favours the short-T1 white matter over CSF.
        assert!(wm > csf);
    }
}
