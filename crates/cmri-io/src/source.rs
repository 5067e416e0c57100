//! Phantom data sources.
//!
//! A phantom on disk is four co-registered 2D NIfTI files. [`PhantomSource`]
//! names them, either by convention inside one directory or through a JSON
//! manifest:
//!
//! ```json
//! {
//!   "label": "label.nii",
//!   "t1": "t1.nii",
//!   "t2": "t2.nii",
//!   "pd": "pd.nii"
//! }
//! ```
//!
//! Relative paths in a manifest resolve against the manifest's directory.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use burn::tensor::backend::Backend;
use cmri_core::{Image, Phantom};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::nifti_io::{labels_from_plane, read_plane, write_label_nifti, write_nifti_2d, Plane};

/// File name of the manifest inside a phantom directory.
pub const MANIFEST_FILE: &str = "phantom.json";

/// Locations of the four maps that make up a phantom.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhantomSource {
    pub label: PathBuf,
    pub t1: PathBuf,
    pub t2: PathBuf,
    pub pd: PathBuf,
}

impl PhantomSource {
    /// Default file names inside `dir`.
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        Self {
            label: dir.join("label.nii"),
            t1: dir.join("t1.nii"),
            t2: dir.join("t2.nii"),
            pd: dir.join("pd.nii"),
        }
    }

    /// Read a JSON manifest.
    pub fn from_manifest<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest {}", path.display()))?;
        let source: Self = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse manifest {}", path.display()))?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Ok(source.resolved_against(base))
    }

    /// Resolve a path given on the command line: a manifest file, a directory
    /// holding a manifest, or a directory with default file names.
    pub fn discover<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.is_file() {
            return Self::from_manifest(path);
        }
        let manifest = path.join(MANIFEST_FILE);
        if manifest.is_file() {
            return Self::from_manifest(manifest);
        }
        Ok(Self::from_dir(path))
    }

    /// Write this source as a JSON manifest.
    pub fn write_manifest<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text).with_context(|| format!("Failed to write manifest {}", path.display()))
    }

    fn resolved_against(self, base: &Path) -> Self {
        let resolve = |p: PathBuf| if p.is_relative() { base.join(p) } else { p };
        Self {
            label: resolve(self.label),
            t1: resolve(self.t1),
            t2: resolve(self.t2),
            pd: resolve(self.pd),
        }
    }

    fn paths(&self) -> [&Path; 4] {
        [&self.label, &self.t1, &self.t2, &self.pd]
    }
}

/// Load a phantom from its four maps.
///
/// Files are read concurrently; shapes are checked when the phantom is
/// assembled.
pub fn load_phantom<B: Backend>(source: &PhantomSource, device: &B::Device) -> Result<Phantom<B>> {
    let planes = source
        .paths()
        .par_iter()
        .map(|path| {
            info!("Reading {}", path.display());
            read_plane(path)
        })
        .collect::<Result<Vec<Plane>>>()?;

    let [label, t1, t2, pd]: [Plane; 4] = planes
        .try_into()
        .map_err(|_| anyhow::anyhow!("Expected four phantom maps"))?;

    let phantom = Phantom::new(
        labels_from_plane(label, device)?,
        Image::from_vec(t1.values, t1.shape, device)?,
        Image::from_vec(t2.values, t2.shape, device)?,
        Image::from_vec(pd.values, pd.shape, device)?,
    )
    .context("Phantom maps are not co-registered")?;

    let [rows, cols] = phantom.shape();
    info!("Loaded {}x{} phantom", rows, cols);
    Ok(phantom)
}

/// Write a phantom as four NIfTI files plus a manifest in `dir`.
pub fn save_phantom<B: Backend, P: AsRef<Path>>(phantom: &Phantom<B>, dir: P) -> Result<PhantomSource> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;

    let source = PhantomSource::from_dir(dir);
    write_label_nifti(&source.label, phantom.label())?;
    write_nifti_2d(&source.t1, phantom.t1_map())?;
    write_nifti_2d(&source.t2, phantom.t2_map())?;
    write_nifti_2d(&source.pd, phantom.pd_map())?;

    // Manifest entries stay relative so the directory can be moved.
    let relative = PhantomSource::from_dir("");
    relative.write_manifest(dir.join(MANIFEST_FILE))?;

    info!("Saved phantom to {}", dir.display());
    Ok(source)
}
