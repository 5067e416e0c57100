pub mod nifti_io;
pub mod source;

pub use nifti_io::{read_label_nifti, read_nifti_2d, write_label_nifti, write_nifti_2d};
pub use source::{load_phantom, save_phantom, PhantomSource};
