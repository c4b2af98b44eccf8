//! Score-decay policies for soft-NMS.

use crate::util::{Element, NmsError};
use std::fmt;
use std::str::FromStr;

/// How soft-NMS rescales a candidate that overlaps the selected one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DecayMethod {
    /// `score · (1 - iou)` when `iou > iou_thr`, unchanged otherwise.
    #[default]
    Linear,
    /// `score · exp(-iou² / sigma)`, with no threshold gate.
    Gaussian,
}

impl DecayMethod {
    /// Multiplicative weight for an overlap of `iou`.
    #[inline]
    pub fn weight<T: Element>(self, iou: T, iou_thr: T, sigma: T) -> T {
        match self {
            DecayMethod::Linear => {
                if iou > iou_thr {
                    T::one() - iou
                } else {
                    T::one()
                }
            }
            DecayMethod::Gaussian => (-(iou * iou) / sigma).exp(),
        }
    }

    /// Configuration name of the method.
    pub fn as_str(self) -> &'static str {
        match self {
            DecayMethod::Linear => "linear",
            DecayMethod::Gaussian => "gaussian",
        }
    }
}

impl FromStr for DecayMethod {
    type Err = NmsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "linear" => Ok(DecayMethod::Linear),
            "gaussian" => Ok(DecayMethod::Gaussian),
            other => Err(NmsError::UnknownDecayMethod(other.to_owned())),
        }
    }
}

impl fmt::Display for DecayMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::DecayMethod;
    use crate::util::NmsError;

    #[test]
    fn linear_is_gated_by_threshold() {
        let m = DecayMethod::Linear;
        assert_eq!(m.weight(0.3f64, 0.5, 0.5), 1.0);
        assert_eq!(m.weight(0.5f64, 0.5, 0.5), 1.0);
        assert!((m.weight(0.8f64, 0.5, 0.5) - 0.2).abs() < 1e-12);
    }

    #[test]
    fn gaussian_ignores_threshold() {
        let m = DecayMethod::Gaussian;
        let w = m.weight(0.5f64, 0.9, 0.5);
        assert!((w - (-0.5f64).exp()).abs() < 1e-12);
        assert_eq!(m.weight(0.0f64, 0.9, 0.5), 1.0);
    }

    #[test]
    fn names_parse_exactly() {
        assert_eq!("linear".parse::<DecayMethod>(), Ok(DecayMethod::Linear));
        assert_eq!("gaussian".parse::<DecayMethod>(), Ok(DecayMethod::Gaussian));
        assert_eq!(
            "Gaussian".parse::<DecayMethod>(),
            Err(NmsError::UnknownDecayMethod("Gaussian".to_owned()))
        );
        assert_eq!(DecayMethod::Gaussian.to_string(), "gaussian");
    }
}
