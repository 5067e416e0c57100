use std::fmt;

use serde::{Deserialize, Serialize};

/// Physical quantity stored per pixel in a phantom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quantity {
    /// Longitudinal relaxation time.
    T1,
    /// Transverse relaxation time.
    T2,
    /// Proton density.
    ProtonDensity,
}

impl Quantity {
    pub const ALL: [Quantity; 3] = [Quantity::T1, Quantity::T2, Quantity::ProtonDensity];

    /// Short label used in tables and log lines.
    pub fn label(self) -> &'static str {
        match self {
            Quantity::T1 => "T1",
            Quantity::T2 => "T2",
            Quantity::ProtonDensity => "PD",
        }
    }

    /// Unit of the quantity; proton density is dimensionless.
    pub fn unit(self) -> Option<&'static str> {
        match self {
            Quantity::T1 | Quantity::T2 => Some("ms"),
            Quantity::ProtonDensity => None,
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}
