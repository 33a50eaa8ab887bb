//! Alpha metric selectors

use std::fmt;
use std::str::FromStr;

use ecodive_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Default rare/abundant boundary for ACE
pub const DEFAULT_ACE_CUTOFF: f64 = 10.0;

/// Default rounding precision for Fisher's alpha
pub const DEFAULT_FISHER_DIGITS: u32 = 3;

/// Largest supported Fisher precision
pub const MAX_FISHER_DIGITS: u32 = 15;

/// Per-sample diversity index
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AlphaMetric {
    Observed,
    Shannon,
    Simpson,
    InverseSimpson,
    Chao1,
    BergerParker,
    Brillouin,
    Margalef,
    Menhinick,
    McIntosh,
    Squares,
    /// Abundance-based coverage estimator
    Ace { cutoff: f64 },
    /// Fisher's log-series alpha, rounded to `digits` decimals
    FisherAlpha { digits: u32 },
}

impl AlphaMetric {
    /// Every metric, with default parameters
    pub const ALL: [AlphaMetric; 13] = [
        AlphaMetric::Observed,
        AlphaMetric::Shannon,
        AlphaMetric::Simpson,
        AlphaMetric::InverseSimpson,
        AlphaMetric::Chao1,
        AlphaMetric::BergerParker,
        AlphaMetric::Brillouin,
        AlphaMetric::Margalef,
        AlphaMetric::Menhinick,
        AlphaMetric::McIntosh,
        AlphaMetric::Squares,
        AlphaMetric::Ace {
            cutoff: DEFAULT_ACE_CUTOFF,
        },
        AlphaMetric::FisherAlpha {
            digits: DEFAULT_FISHER_DIGITS,
        },
    ];

    /// ACE with the default cutoff
    pub fn ace() -> Self {
        AlphaMetric::Ace {
            cutoff: DEFAULT_ACE_CUTOFF,
        }
    }

    /// Fisher's alpha with the default precision
    pub fn fisher() -> Self {
        AlphaMetric::FisherAlpha {
            digits: DEFAULT_FISHER_DIGITS,
        }
    }

    /// Resolve a numeric selector, with an optional extra parameter for
    /// ACE (cutoff) and Fisher's alpha (digits).
    pub fn from_id(id: u8, extra: Option<f64>) -> Result<Self> {
        let metric = match id {
            1 => AlphaMetric::Chao1,
            2 => AlphaMetric::InverseSimpson,
            3 => AlphaMetric::Shannon,
            4 => AlphaMetric::Simpson,
            5 => AlphaMetric::Observed,
            6 => AlphaMetric::BergerParker,
            7 => AlphaMetric::Brillouin,
            8 => AlphaMetric::Margalef,
            9 => AlphaMetric::Menhinick,
            10 => AlphaMetric::McIntosh,
            11 => AlphaMetric::Squares,
            12 => AlphaMetric::Ace {
                cutoff: extra.unwrap_or(DEFAULT_ACE_CUTOFF),
            },
            13 => {
                let digits = match extra {
                    Some(d) if d >= 0.0 && d.fract() == 0.0 => d as u32,
                    Some(d) => {
                        return Err(Error::InvalidParameter(format!(
                            "Fisher digits must be a non-negative integer, got {d}"
                        )))
                    }
                    None => DEFAULT_FISHER_DIGITS,
                };
                AlphaMetric::FisherAlpha { digits }
            }
            other => return Err(Error::unknown_selector("alpha metric", other)),
        };
        metric.validate()?;
        Ok(metric)
    }

    /// Short identifier, as accepted by `FromStr`
    pub fn name(&self) -> &'static str {
        match self {
            AlphaMetric::Observed => "observed",
            AlphaMetric::Shannon => "shannon",
            AlphaMetric::Simpson => "simpson",
            AlphaMetric::InverseSimpson => "inv_simpson",
            AlphaMetric::Chao1 => "chao1",
            AlphaMetric::BergerParker => "berger",
            AlphaMetric::Brillouin => "brillouin",
            AlphaMetric::Margalef => "margalef",
            AlphaMetric::Menhinick => "menhinick",
            AlphaMetric::McIntosh => "mcintosh",
            AlphaMetric::Squares => "squares",
            AlphaMetric::Ace { .. } => "ace",
            AlphaMetric::FisherAlpha { .. } => "fisher",
        }
    }

    /// Check the extra parameter
    pub fn validate(&self) -> Result<()> {
        match *self {
            AlphaMetric::Ace { cutoff } if !(cutoff.is_finite() && cutoff > 0.0) => {
                Err(Error::InvalidParameter(format!(
                    "ACE cutoff must be positive and finite, got {cutoff}"
                )))
            }
            AlphaMetric::FisherAlpha { digits } if digits > MAX_FISHER_DIGITS => {
                Err(Error::InvalidParameter(format!(
                    "Fisher digits must be at most {MAX_FISHER_DIGITS}, got {digits}"
                )))
            }
            _ => Ok(()),
        }
    }
}

impl fmt::Display for AlphaMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AlphaMetric {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let metric = match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "observed" | "richness" => AlphaMetric::Observed,
            "shannon" => AlphaMetric::Shannon,
            "simpson" => AlphaMetric::Simpson,
            "inv_simpson" | "inverse_simpson" => AlphaMetric::InverseSimpson,
            "chao1" => AlphaMetric::Chao1,
            "berger" | "berger_parker" => AlphaMetric::BergerParker,
            "brillouin" => AlphaMetric::Brillouin,
            "margalef" => AlphaMetric::Margalef,
            "menhinick" => AlphaMetric::Menhinick,
            "mcintosh" => AlphaMetric::McIntosh,
            "squares" => AlphaMetric::Squares,
            "ace" => AlphaMetric::ace(),
            "fisher" | "fisher_alpha" => AlphaMetric::fisher(),
            other => return Err(Error::unknown_selector("alpha metric", other)),
        };
        Ok(metric)
    }
}

impl TryFrom<u8> for AlphaMetric {
    type Error = Error;

    fn try_from(id: u8) -> Result<Self> {
        AlphaMetric::from_id(id, None)
    }
}
