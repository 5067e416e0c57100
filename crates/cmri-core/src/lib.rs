//! cmri-core: MRI contrast simulation over a digital brain phantom.
//!
//! # Modules
//! - `image`: tensor-backed images, label maps and tissue masks
//! - `phantom`: the phantom model (masks, regional means, spin-echo simulation)
//! - `sequence`: spin-echo timing, weighting presets and the scalar signal model
//! - `synthetic`: a generated brain slice for tools and tests

pub mod error;
pub mod image;
pub mod phantom;
pub mod quantity;
pub mod sequence;
pub mod synthetic;
pub mod tissue;

pub use error::{PhantomError, Result};
pub use image::{Image, LabelMap, TissueMask};
pub use phantom::{Phantom, TissueStatistics};
pub use quantity::Quantity;
pub use sequence::{spin_echo_signal, SpinEchoParams, Weighting};
pub use tissue::Tissue;
