//! Beta metric selectors

use std::fmt;
use std::str::FromStr;

use ecodive_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Default exponent for the Minkowski distance
pub const DEFAULT_MINKOWSKI_POWER: f64 = 1.5;

/// Whether abundances or only presence/absence enter the distance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Weighting {
    #[default]
    Weighted,
    Unweighted,
}

impl Weighting {
    pub fn from_flag(weighted: bool) -> Self {
        if weighted {
            Weighting::Weighted
        } else {
            Weighting::Unweighted
        }
    }
}

/// Pairwise dissimilarity between two samples
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BetaMetric {
    BrayCurtis,
    Canberra,
    Euclidean,
    Manhattan,
    Minkowski { power: f64 },
    Chebyshev,
    Jaccard,
    Kulczynski,
    /// Horn-Morisita overlap on raw counts
    Horn,
    /// Morisita overlap; `d(x, x)` is not zero in general
    Morisita,
    Soergel,
    /// `Σmax / Σ(x + y)`; `d(x, x)` is one half
    Motyka,
    /// Range-normalized Manhattan distance over min-max rescaled features
    Gower,
    Hamming,
    Lorentzian,
    Bhattacharyya,
    JensenShannon,
    Clark,
    Divergence,
    WaveHedges,
    SquaredChiSquared,
    SquaredChord,
}

impl BetaMetric {
    /// Every metric, with default parameters
    pub const ALL: [BetaMetric; 22] = [
        BetaMetric::BrayCurtis,
        BetaMetric::Canberra,
        BetaMetric::Euclidean,
        BetaMetric::Manhattan,
        BetaMetric::Minkowski {
            power: DEFAULT_MINKOWSKI_POWER,
        },
        BetaMetric::Chebyshev,
        BetaMetric::Jaccard,
        BetaMetric::Kulczynski,
        BetaMetric::Horn,
        BetaMetric::Morisita,
        BetaMetric::Soergel,
        BetaMetric::Motyka,
        BetaMetric::Gower,
        BetaMetric::Hamming,
        BetaMetric::Lorentzian,
        BetaMetric::Bhattacharyya,
        BetaMetric::JensenShannon,
        BetaMetric::Clark,
        BetaMetric::Divergence,
        BetaMetric::WaveHedges,
        BetaMetric::SquaredChiSquared,
        BetaMetric::SquaredChord,
    ];

    /// Resolve a numeric selector, with an optional Minkowski power
    pub fn from_id(id: u8, extra: Option<f64>) -> Result<Self> {
        let metric = match id {
            1 => BetaMetric::BrayCurtis,
            2 => BetaMetric::Canberra,
            3 => BetaMetric::Euclidean,
            4 => BetaMetric::Jaccard,
            5 => BetaMetric::Kulczynski,
            6 => BetaMetric::Manhattan,
            7 => BetaMetric::Minkowski {
                power: extra.unwrap_or(DEFAULT_MINKOWSKI_POWER),
            },
            8 => BetaMetric::Chebyshev,
            9 => BetaMetric::Horn,
            10 => BetaMetric::Morisita,
            11 => BetaMetric::Soergel,
            12 => BetaMetric::Motyka,
            13 => BetaMetric::Gower,
            14 => BetaMetric::Hamming,
            15 => BetaMetric::Lorentzian,
            16 => BetaMetric::Bhattacharyya,
            17 => BetaMetric::JensenShannon,
            18 => BetaMetric::Clark,
            19 => BetaMetric::Divergence,
            20 => BetaMetric::WaveHedges,
            21 => BetaMetric::SquaredChiSquared,
            22 => BetaMetric::SquaredChord,
            other => return Err(Error::unknown_selector("beta metric", other)),
        };
        metric.validate()?;
        Ok(metric)
    }

    pub fn name(&self) -> &'static str {
        match self {
            BetaMetric::BrayCurtis => "bray",
            BetaMetric::Canberra => "canberra",
            BetaMetric::Euclidean => "euclidean",
            BetaMetric::Manhattan => "manhattan",
            BetaMetric::Minkowski { .. } => "minkowski",
            BetaMetric::Chebyshev => "chebyshev",
            BetaMetric::Jaccard => "jaccard",
            BetaMetric::Kulczynski => "kulczynski",
            BetaMetric::Horn => "horn",
            BetaMetric::Morisita => "morisita",
            BetaMetric::Soergel => "soergel",
            BetaMetric::Motyka => "motyka",
            BetaMetric::Gower => "gower",
            BetaMetric::Hamming => "hamming",
            BetaMetric::Lorentzian => "lorentzian",
            BetaMetric::Bhattacharyya => "bhattacharyya",
            BetaMetric::JensenShannon => "jsd",
            BetaMetric::Clark => "clark",
            BetaMetric::Divergence => "divergence",
            BetaMetric::WaveHedges => "wave_hedges",
            BetaMetric::SquaredChiSquared => "squared_chi_squared",
            BetaMetric::SquaredChord => "squared_chord",
        }
    }

    /// Whether a presence/absence form exists
    pub fn supports_unweighted(&self) -> bool {
        matches!(
            self,
            BetaMetric::BrayCurtis
                | BetaMetric::Canberra
                | BetaMetric::Euclidean
                | BetaMetric::Manhattan
                | BetaMetric::Jaccard
                | BetaMetric::Kulczynski
                | BetaMetric::Hamming
                | BetaMetric::Gower
        )
    }

    /// Check the extra parameter
    pub fn validate(&self) -> Result<()> {
        match *self {
            BetaMetric::Minkowski { power } if !(power.is_finite() && power > 0.0) => {
                Err(Error::InvalidParameter(format!(
                    "Minkowski power must be positive and finite, got {power}"
                )))
            }
            _ => Ok(()),
        }
    }

    /// Check the metric can be evaluated with `weighting`
    pub fn validate_for(&self, weighting: Weighting) -> Result<()> {
        self.validate()?;
        if weighting == Weighting::Unweighted && !self.supports_unweighted() {
            return Err(Error::InvalidParameter(format!(
                "{self} has no unweighted form"
            )));
        }
        Ok(())
    }
}

impl fmt::Display for BetaMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BetaMetric {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let metric = match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "bray" | "bray_curtis" => BetaMetric::BrayCurtis,
            "canberra" => BetaMetric::Canberra,
            "euclidean" => BetaMetric::Euclidean,
            "manhattan" => BetaMetric::Manhattan,
            "minkowski" => BetaMetric::Minkowski {
                power: DEFAULT_MINKOWSKI_POWER,
            },
            "chebyshev" => BetaMetric::Chebyshev,
            "jaccard" => BetaMetric::Jaccard,
            "kulczynski" => BetaMetric::Kulczynski,
            "horn" => BetaMetric::Horn,
            "morisita" => BetaMetric::Morisita,
            "soergel" => BetaMetric::Soergel,
            "motyka" => BetaMetric::Motyka,
            "gower" => BetaMetric::Gower,
            "hamming" => BetaMetric::Hamming,
            "lorentzian" => BetaMetric::Lorentzian,
            "bhattacharyya" => BetaMetric::Bhattacharyya,
            "jsd" | "jensen_shannon" => BetaMetric::JensenShannon,
            "clark" => BetaMetric::Clark,
            "divergence" => BetaMetric::Divergence,
            "wave_hedges" => BetaMetric::WaveHedges,
            "squared_chi_squared" => BetaMetric::SquaredChiSquared,
            "squared_chord" => BetaMetric::SquaredChord,
            other => return Err(Error::unknown_selector("beta metric", other)),
        };
        Ok(metric)
    }
}

impl TryFrom<u8> for BetaMetric {
    type Error = Error;

    fn try_from(id: u8) -> Result<Self> {
        BetaMetric::from_id(id, None)
    }
}
