//! UniFrac variant selectors

use std::fmt;
use std::str::FromStr;

use ecodive_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Default branch-weight exponent for generalized UniFrac
pub const DEFAULT_GENERALIZED_ALPHA: f64 = 0.5;

/// Member of the UniFrac family
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum UnifracVariant {
    /// Fraction of branch length not shared between the two samples
    Unweighted,
    /// Branch-length weighted difference in relative abundance
    Weighted,
    /// Weighted, divided by the summed per-sample totals
    Normalized,
    /// Generalized UniFrac with exponent `alpha`
    Generalized { alpha: f64 },
    /// Variance adjusted weighted UniFrac
    VarianceAdjusted,
}

impl UnifracVariant {
    /// Every variant, with default parameters
    pub const ALL: [UnifracVariant; 5] = [
        UnifracVariant::Unweighted,
        UnifracVariant::Weighted,
        UnifracVariant::Normalized,
        UnifracVariant::Generalized {
            alpha: DEFAULT_GENERALIZED_ALPHA,
        },
        UnifracVariant::VarianceAdjusted,
    ];

    /// Resolve a numeric selector, with an optional generalized exponent
    pub fn from_id(id: u8, alpha: Option<f64>) -> Result<Self> {
        let variant = match id {
            1 => UnifracVariant::Unweighted,
            2 => UnifracVariant::Weighted,
            3 => UnifracVariant::Normalized,
            4 => UnifracVariant::Generalized {
                alpha: alpha.unwrap_or(DEFAULT_GENERALIZED_ALPHA),
            },
            5 => UnifracVariant::VarianceAdjusted,
            other => return Err(Error::unknown_selector("unifrac variant", other)),
        };
        variant.validate()?;
        Ok(variant)
    }

    pub fn name(&self) -> &'static str {
        match self {
            UnifracVariant::Unweighted => "unweighted",
            UnifracVariant::Weighted => "weighted",
            UnifracVariant::Normalized => "normalized",
            UnifracVariant::Generalized { .. } => "generalized",
            UnifracVariant::VarianceAdjusted => "variance_adjusted",
        }
    }

    pub fn validate(&self) -> Result<()> {
        match *self {
            UnifracVariant::Generalized { alpha } if !alpha.is_finite() => Err(
                Error::InvalidParameter(format!("generalized UniFrac alpha must be finite, got {alpha}")),
            ),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for UnifracVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for UnifracVariant {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let variant = match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "unweighted" | "u_unifrac" => UnifracVariant::Unweighted,
            "weighted" | "w_unifrac" => UnifracVariant::Weighted,
            "normalized" | "n_unifrac" => UnifracVariant::Normalized,
            "generalized" | "g_unifrac" => UnifracVariant::Generalized {
                alpha: DEFAULT_GENERALIZED_ALPHA,
            },
            "variance_adjusted" | "va_unifrac" => UnifracVariant::VarianceAdjusted,
            other => return Err(Error::unknown_selector("unifrac variant", other)),
        };
        Ok(variant)
    }
}

impl TryFrom<u8> for UnifracVariant {
    type Error = Error;

    fn try_from(id: u8) -> Result<Self> {
        UnifracVariant::from_id(id, None)
    }
}
