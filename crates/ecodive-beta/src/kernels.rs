//! Pairwise distance formulas
//!
//! Weighted kernels take two aligned feature vectors. Terms whose denominator
//! would be zero because both abundances are zero are skipped; every other
//! degenerate case follows IEEE arithmetic.

use ecodive_core::{DiversityKernel, Overlap, PairKernel};

use crate::metric::BetaMetric;

#[inline]
fn pairs<'a>(x: &'a [f64], y: &'a [f64]) -> impl Iterator<Item = (f64, f64)> + 'a {
    x.iter().copied().zip(y.iter().copied())
}

#[inline]
fn total(x: &[f64]) -> f64 {
    x.iter().sum()
}

pub fn bray_curtis(x: &[f64], y: &[f64]) -> f64 {
    let (mut diff, mut sum) = (0.0, 0.0);
    for (a, b) in pairs(x, y) {
        diff += (a - b).abs();
        sum += a + b;
    }
    diff / sum
}

/// Mean of `|x - y| / (x + y)` over features present in either sample
pub fn canberra(x: &[f64], y: &[f64]) -> f64 {
    let (mut acc, mut nnz) = (0.0, 0usize);
    for (a, b) in pairs(x, y) {
        if a > 0.0 || b > 0.0 {
            acc += (a - b).abs() / (a + b);
            nnz += 1;
        }
    }
    acc / nnz as f64
}

pub fn euclidean(x: &[f64], y: &[f64]) -> f64 {
    pairs(x, y).map(|(a, b)| (a - b) * (a - b)).sum::<f64>().sqrt()
}

pub fn manhattan(x: &[f64], y: &[f64]) -> f64 {
    pairs(x, y).map(|(a, b)| (a - b).abs()).sum()
}

pub fn minkowski(x: &[f64], y: &[f64], power: f64) -> f64 {
    pairs(x, y)
        .map(|(a, b)| (a - b).abs().powf(power))
        .sum::<f64>()
        .powf(1.0 / power)
}

pub fn chebyshev(x: &[f64], y: &[f64]) -> f64 {
    pairs(x, y).map(|(a, b)| (a - b).abs()).fold(0.0, f64::max)
}

/// `2B / (1 + B)` with `B` the Bray-Curtis dissimilarity
pub fn jaccard(x: &[f64], y: &[f64]) -> f64 {
    let b = bray_curtis(x, y);
    2.0 * b / (1.0 + b)
}

pub fn kulczynski(x: &[f64], y: &[f64]) -> f64 {
    let shared: f64 = pairs(x, y).map(|(a, b)| a.min(b)).sum();
    1.0 - (shared / total(x) + shared / total(y)) / 2.0
}

pub fn horn(x: &[f64], y: &[f64]) -> f64 {
    let (nx, ny) = (total(x), total(y));
    let lx = x.iter().map(|a| a * a).sum::<f64>() / (nx * nx);
    let ly = y.iter().map(|b| b * b).sum::<f64>() / (ny * ny);
    let cross: f64 = pairs(x, y).map(|(a, b)| a * b).sum();
    1.0 - 2.0 * cross / ((lx + ly) * nx * ny)
}

pub fn morisita(x: &[f64], y: &[f64]) -> f64 {
    let (nx, ny) = (total(x), total(y));
    let dx = x.iter().map(|a| a * (a - 1.0)).sum::<f64>() / (nx * (nx - 1.0));
    let dy = y.iter().map(|b| b * (b - 1.0)).sum::<f64>() / (ny * (ny - 1.0));
    let cross: f64 = pairs(x, y).map(|(a, b)| a * b).sum();
    1.0 - 2.0 * cross / ((dx + dy) * nx * ny)
}

pub fn soergel(x: &[f64], y: &[f64]) -> f64 {
    let (mut diff, mut max) = (0.0, 0.0);
    for (a, b) in pairs(x, y) {
        diff += (a - b).abs();
        max += a.max(b);
    }
    diff / max
}

pub fn motyka(x: &[f64], y: &[f64]) -> f64 {
    let (mut max, mut sum) = (0.0, 0.0);
    for (a, b) in pairs(x, y) {
        max += a.max(b);
        sum += a + b;
    }
    max / sum
}

/// Number of features whose abundances differ
pub fn hamming(x: &[f64], y: &[f64]) -> f64 {
    pairs(x, y).filter(|(a, b)| a != b).count() as f64
}

pub fn lorentzian(x: &[f64], y: &[f64]) -> f64 {
    pairs(x, y).map(|(a, b)| (a - b).abs().ln_1p()).sum()
}

/// `-ln Σ √(p q)` over relative abundances
pub fn bhattacharyya(x: &[f64], y: &[f64]) -> f64 {
    let (nx, ny) = (total(x), total(y));
    let coefficient: f64 = pairs(x, y).map(|(a, b)| (a / nx * b / ny).sqrt()).sum();
    -coefficient.ln()
}

/// Jensen-Shannon divergence (natural log) over relative abundances
pub fn jensen_shannon(x: &[f64], y: &[f64]) -> f64 {
    let (nx, ny) = (total(x), total(y));
    let mut acc = 0.0;
    for (a, b) in pairs(x, y) {
        let (p, q) = (a / nx, b / ny);
        let m = (p + q) / 2.0;
        if p > 0.0 {
            acc += p * (p / m).ln();
        }
        if q > 0.0 {
            acc += q * (q / m).ln();
        }
    }
    acc / 2.0
}

pub fn clark(x: &[f64], y: &[f64]) -> f64 {
    pairs(x, y)
        .filter(|(a, b)| a + b > 0.0)
        .map(|(a, b)| ((a - b) / (a + b)).powi(2))
        .sum::<f64>()
        .sqrt()
}

pub fn divergence(x: &[f64], y: &[f64]) -> f64 {
    2.0 * pairs(x, y)
        .filter(|(a, b)| a + b > 0.0)
        .map(|(a, b)| (a - b).powi(2) / (a + b).powi(2))
        .sum::<f64>()
}

pub fn wave_hedges(x: &[f64], y: &[f64]) -> f64 {
    pairs(x, y)
        .filter(|(a, b)| a.max(*b) > 0.0)
        .map(|(a, b)| (a - b).abs() / a.max(b))
        .sum()
}

pub fn squared_chi_squared(x: &[f64], y: &[f64]) -> f64 {
    pairs(x, y)
        .filter(|(a, b)| a + b > 0.0)
        .map(|(a, b)| (a - b).powi(2) / (a + b))
        .sum()
}

pub fn squared_chord(x: &[f64], y: &[f64]) -> f64 {
    pairs(x, y).map(|(a, b)| (a.sqrt() - b.sqrt()).powi(2)).sum()
}

/// Mean absolute difference of rescaled features
pub fn gower(x: &[f64], y: &[f64]) -> f64 {
    manhattan(x, y) / x.len() as f64
}

/// Presence/absence form of `metric`, or `None` when it has none.
///
/// `n_features` is only used by Gower.
pub fn unweighted(metric: BetaMetric, overlap: Overlap, n_features: usize) -> Option<f64> {
    let a = overlap.a as f64;
    let b = overlap.b as f64;
    let j = overlap.shared as f64;
    let unshared = overlap.unshared() as f64;
    let value = match metric {
        BetaMetric::BrayCurtis => unshared / (a + b),
        BetaMetric::Canberra => unshared / (a + b - j),
        BetaMetric::Euclidean => unshared.sqrt(),
        BetaMetric::Manhattan | BetaMetric::Hamming => unshared,
        BetaMetric::Jaccard => {
            let d = unshared / (a + b);
            2.0 * d / (1.0 + d)
        }
        BetaMetric::Kulczynski => 1.0 - (j / a + j / b) / 2.0,
        BetaMetric::Gower => unshared / n_features as f64,
        _ => return None,
    };
    Some(value)
}

impl DiversityKernel for BetaMetric {
    fn name(&self) -> &'static str {
        BetaMetric::name(self)
    }
}

impl PairKernel for BetaMetric {
    fn evaluate(&self, x: &[f64], y: &[f64]) -> f64 {
        match *self {
            BetaMetric::BrayCurtis => bray_curtis(x, y),
            BetaMetric::Canberra => canberra(x, y),
            BetaMetric::Euclidean => euclidean(x, y),
            BetaMetric::Manhattan => manhattan(x, y),
            BetaMetric::Minkowski { power } => minkowski(x, y, power),
            BetaMetric::Chebyshev => chebyshev(x, y),
            BetaMetric::Jaccard => jaccard(x, y),
            BetaMetric::Kulczynski => kulczynski(x, y),
            BetaMetric::Horn => horn(x, y),
            BetaMetric::Morisita => morisita(x, y),
            BetaMetric::Soergel => soergel(x, y),
            BetaMetric::Motyka => motyka(x, y),
            BetaMetric::Gower => gower(x, y),
            BetaMetric::Hamming => hamming(x, y),
            BetaMetric::Lorentzian => lorentzian(x, y),
            BetaMetric::Bhattacharyya => bhattacharyya(x, y),
            BetaMetric::JensenShannon => jensen_shannon(x, y),
            BetaMetric::Clark => clark(x, y),
            BetaMetric::Divergence => divergence(x, y),
            BetaMetric::WaveHedges => wave_hedges(x, y),
            BetaMetric::SquaredChiSquared => squared_chi_squared(x, y),
            BetaMetric::SquaredChord => squared_chord(x, y),
        }
    }
}
