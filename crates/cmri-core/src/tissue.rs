//! Tissue classes of the digital brain phantom.
//!
//! The label map encodes one tissue class per pixel:
//! `0` background, `1` cerebrospinal fluid, `2` gray matter, `3` white matter.
//! Any other code is treated as "none of the named tissues".

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::PhantomError;

/// Label code of background pixels.
pub const BACKGROUND_CODE: i64 = 0;

/// A named tissue class with a fixed label code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tissue {
    /// Cerebrospinal fluid, label 1.
    Csf,
    /// Gray matter, label 2.
    GrayMatter,
    /// White matter, label 3.
    WhiteMatter,
}

impl Tissue {
    pub const ALL: [Tissue; 3] = [Tissue::Csf, Tissue::GrayMatter, Tissue::WhiteMatter];

    /// Label code of this tissue in the label map.
    pub fn code(self) -> i64 {
        match self {
            Tissue::Csf => 1,
            Tissue::GrayMatter => 2,
            Tissue::WhiteMatter => 3,
        }
    }

    /// Conventional abbreviation.
    pub fn abbreviation(self) -> &'static str {
        match self {
            Tissue::Csf => "CSF",
            Tissue::GrayMatter => "GM",
            Tissue::WhiteMatter => "WM",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Tissue::Csf => "Cerebrospinal fluid",
            Tissue::GrayMatter => "Gray matter",
            Tissue::WhiteMatter => "White matter",
        }
    }
}

impl TryFrom<i64> for Tissue {
    type Error = PhantomError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        Tissue::ALL
            .into_iter()
            .find(|tissue| tissue.code() == code)
            .ok_or(PhantomError::UnsupportedTissueCode(code))
    }
}

impl fmt::Display for Tissue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.abbreviation())
    }
}
