//! Spin-echo sequence parameters and signal model.
//!
//! The spin-echo signal of a pixel is
//!
//! ```text
//! S = PD * (1 - exp(-TR / T1)) * exp(-TE / T2)
//! ```
//!
//! with all times in milliseconds. The first factor is the longitudinal
//! recovery reached within one repetition time, the second the transverse
//! decay at the echo.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PhantomError, Result};

/// Spin-echo signal for a single set of tissue properties.
///
/// Non-positive `t1` or `t2` are not checked and yield IEEE special values.
pub fn spin_echo_signal(pd: f64, t1: f64, t2: f64, tr: f64, te: f64) -> f64 {
    pd * recovery_factor(tr, t1) * decay_factor(te, t2)
}

/// `1 - exp(-TR / T1)`
pub fn recovery_factor(tr: f64, t1: f64) -> f64 {
    1.0 - (-tr / t1).exp()
}

/// `exp(-TE / T2)`
pub fn decay_factor(te: f64, t2: f64) -> f64 {
    (-te / t2).exp()
}

/// Timing of a spin-echo acquisition, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpinEchoParams {
    tr: f64,
    te: f64,
}

impl SpinEchoParams {
    /// Validated timing pair.
    ///
    /// # Errors
    /// TR must be finite and positive, TE finite and non-negative.
    pub fn new(tr: f64, te: f64) -> Result<Self> {
        if !tr.is_finite() || tr <= 0.0 {
            return Err(PhantomError::invalid_sequence(format!(
                "repetition time must be positive and finite, got {} ms",
                tr
            )));
        }
        if !te.is_finite() || te < 0.0 {
            return Err(PhantomError::invalid_sequence(format!(
                "echo time must be non-negative and finite, got {} ms",
                te
            )));
        }
        Ok(Self { tr, te })
    }

    /// Repetition time in ms.
    pub fn tr(&self) -> f64 {
        self.tr
    }

    /// Echo time in ms.
    pub fn te(&self) -> f64 {
        self.te
    }

    /// Signal of a tissue with the given properties under this timing.
    pub fn signal(&self, pd: f64, t1: f64, t2: f64) -> f64 {
        spin_echo_signal(pd, t1, t2, self.tr, self.te)
    }
}

impl fmt::Display for SpinEchoParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TR={} ms, TE={} ms", self.tr, self.te)
    }
}

/// Standard contrast weightings and the timing that produces them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Weighting {
    /// Long TR, short TE: contrast follows proton density.
    ProtonDensity,
    /// Short TR, short TE: contrast follows T1.
    T1,
    /// Long TR, long TE: contrast follows T2.
    T2,
}

impl Weighting {
    pub const ALL: [Weighting; 3] = [Weighting::ProtonDensity, Weighting::T1, Weighting::T2];

    /// Preset timing for this weighting.
    pub fn params(self) -> SpinEchoParams {
        let (tr, te) = match self {
            Weighting::ProtonDensity => (4000.0, 15.0),
            Weighting::T1 => (500.0, 15.0),
            Weighting::T2 => (4000.0, 100.0),
        };
        SpinEchoParams { tr, te }
    }

    pub fn label(self) -> &'static str {
        match self {
            Weighting::ProtonDensity => "pdw",
            Weighting::T1 => "t1w",
            Weighting::T2 => "t2w",
        }
    }
}

impl fmt::Display for Weighting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

impl FromStr for Weighting {
    type Err = PhantomError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "pd" | "pdw" => Ok(Weighting::ProtonDensity),
            "t1" | "t1w" => Ok(Weighting::T1),
            "t2" | "t2w" => Ok(Weighting::T2),
            other => Err(PhantomError::invalid_sequence(format!(
                "unknown weighting '{}', expected pdw, t1w or t2w",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_signal() {
        let signal = spin_echo_signal(1.0, 1000.0, 100.0, 500.0, 20.0);
        let expected = (1.0 - (-0.5f64).exp()) * (-0.2f64).exp();
        assert!((signal - expected).abs() < 1e-12);
        assert!((signal - 0.3222).abs() < 1e-4);
    }

    #[test]
    fn test_zero_echo_time_has_no_decay() {
        assert_eq!(decay_factor(0.0, 80.0), 1.0);
    }

    #[test]
    fn test_long_repetition_recovers_fully() {
        assert!((recovery_factor(1e6, 1000.0) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_relaxation_time_is_not_intercepted() {
        // exp(-TE / 0) underflows to zero.
        assert_eq!(decay_factor(10.0, 0.0), 0.0);
        assert!(decay_factor(0.0, 0.0).is_nan());
    }

    #[test]
    fn test_params_validation() {
        assert!(SpinEchoParams::new(500.0, 0.0).is_ok());
        assert!(SpinEchoParams::new(0.0, 10.0).is_err());
        assert!(SpinEchoParams::new(-1.0, 10.0).is_err());
        assert!(SpinEchoParams::new(500.0, -1.0).is_err());
        assert!(SpinEchoParams::new(f64::NAN, 10.0).is_err());
        assert!(SpinEchoParams::new(500.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_weighting_presets_are_valid() {
        for weighting in Weighting::ALL {
            let params = weighting.params();
            assert!(SpinEchoParams::new(params.tr(), params.te()).is_ok());
            assert!(params.te() < params.tr());
        }
    }

    #[test]
    fn test_weighting_parse() {
        assert_eq!("T1w".parse::<Weighting>(), Ok(Weighting::T1));
        assert_eq!("pd".parse::<Weighting>(), Ok(Weighting::ProtonDensity));
        assert!("flair".parse::<Weighting>().is_err());
    }
}
