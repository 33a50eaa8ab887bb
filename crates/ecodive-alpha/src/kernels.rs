//! Alpha diversity formulas
//!
//! Every function takes the positive abundances of one sample. Degenerate
//! samples (empty, a single feature, no doubletons) are not special-cased and
//! produce whatever IEEE arithmetic yields.

use ecodive_core::{DiversityKernel, SampleKernel};
use statrs::function::gamma::ln_gamma;

use crate::fisher::fisher_alpha;
use crate::metric::AlphaMetric;

#[inline]
fn depth(x: &[f64]) -> f64 {
    x.iter().sum()
}

#[inline]
fn sum_of_squares(x: &[f64]) -> f64 {
    x.iter().map(|v| v * v).sum()
}

/// Abundances in `(0, 1]`
#[inline]
fn singletons(x: &[f64]) -> f64 {
    x.iter().filter(|&&v| v <= 1.0).count() as f64
}

/// Abundances in `(1, 2]`
#[inline]
fn doubletons(x: &[f64]) -> f64 {
    x.iter().filter(|&&v| v > 1.0 && v <= 2.0).count() as f64
}

fn simpson_sum(x: &[f64]) -> f64 {
    let n = depth(x);
    x.iter().map(|v| (v / n) * (v / n)).sum()
}

pub fn observed(x: &[f64]) -> f64 {
    x.len() as f64
}

pub fn shannon(x: &[f64]) -> f64 {
    let n = depth(x);
    x.iter()
        .map(|&v| {
            let p = v / n;
            -p * p.ln()
        })
        .sum()
}

pub fn simpson(x: &[f64]) -> f64 {
    1.0 - simpson_sum(x)
}

pub fn inverse_simpson(x: &[f64]) -> f64 {
    let d = simpson_sum(x);
    if d == 0.0 {
        0.0
    } else {
        1.0 / d
    }
}

pub fn chao1(x: &[f64]) -> f64 {
    let f1 = singletons(x);
    let f2 = doubletons(x);
    x.len() as f64 + (f1 * f1) / (2.0 * f2)
}

pub fn berger_parker(x: &[f64]) -> f64 {
    let max = x.iter().copied().fold(0.0, f64::max);
    max / depth(x)
}

pub fn brillouin(x: &[f64]) -> f64 {
    let n = depth(x);
    let log_factorials: f64 = x.iter().map(|&v| ln_gamma(v + 1.0)).sum();
    (ln_gamma(n + 1.0) - log_factorials) / n
}

pub fn margalef(x: &[f64]) -> f64 {
    (x.len() as f64 - 1.0) / depth(x).ln()
}

pub fn menhinick(x: &[f64]) -> f64 {
    x.len() as f64 / depth(x).sqrt()
}

pub fn mcintosh(x: &[f64]) -> f64 {
    let n = depth(x);
    (n - sum_of_squares(x).sqrt()) / (n - n.sqrt())
}

pub fn squares(x: &[f64]) -> f64 {
    let n = depth(x);
    let s = x.len() as f64;
    let f1 = singletons(x);
    s + sum_of_squares(x) * f1 * f1 / (n * n - f1 * s)
}

/// Abundance-based coverage estimator
pub fn ace(x: &[f64], cutoff: f64) -> f64 {
    let mut s_abund = 0.0;
    let mut s_rare = 0.0;
    let mut n_rare = 0.0;
    let mut f1 = 0.0;
    let mut pair_sum = 0.0;

    for &v in x {
        if v < cutoff {
            s_rare += 1.0;
            n_rare += v;
            pair_sum += v * (v - 1.0);
            if v <= 1.0 {
                f1 += 1.0;
            }
        } else {
            s_abund += 1.0;
        }
    }

    let coverage = 1.0 - f1 / n_rare;
    let gamma_sq = (s_rare / coverage * pair_sum / (n_rare * (n_rare - 1.0)) - 1.0).max(0.0);
    s_abund + s_rare / coverage + f1 / coverage * gamma_sq
}

impl DiversityKernel for AlphaMetric {
    fn name(&self) -> &'static str {
        AlphaMetric::name(self)
    }
}

impl SampleKernel for AlphaMetric {
    fn evaluate(&self, counts: &[f64]) -> f64 {
        match *self {
            AlphaMetric::Observed => observed(counts),
            AlphaMetric::Shannon => shannon(counts),
            AlphaMetric::Simpson => simpson(counts),
            AlphaMetric::InverseSimpson => inverse_simpson(counts),
            AlphaMetric::Chao1 => chao1(counts),
            AlphaMetric::BergerParker => berger_parker(counts),
            AlphaMetric::Brillouin => brillouin(counts),
            AlphaMetric::Margalef => margalef(counts),
            AlphaMetric::Menhinick => menhinick(counts),
            AlphaMetric::McIntosh => mcintosh(counts),
            AlphaMetric::Squares => squares(counts),
            AlphaMetric::Ace { cutoff } => ace(counts, cutoff),
            AlphaMetric::FisherAlpha { digits } => {
                fisher_alpha(counts.len() as f64, depth(counts), digits)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_simple_sample() {
        let x = [1.0, 3.0];
        assert_eq!(observed(&x), 2.0);
        assert_relative_eq!(simpson(&x), 0.375, epsilon = 1e-12);
        assert_relative_eq!(inverse_simpson(&x), 1.6, epsilon = 1e-12);
        assert_relative_eq!(
            shannon(&x),
            -(0.25f64 * 0.25f64.ln() + 0.75 * 0.75f64.ln()),
            epsilon = 1e-12
        );
        assert_relative_eq!(berger_parker(&x), 0.75, epsilon = 1e-12);
        assert_relative_eq!(menhinick(&x), 1.0, epsilon = 1e-12);
        assert_relative_eq!(margalef(&x), 1.0 / 4f64.ln(), epsilon = 1e-12);
    }

    #[test]
    fn test_single_feature() {
        let x = [5.0];
        assert_eq!(shannon(&x), 0.0);
        assert_eq!(simpson(&x), 0.0);
        assert_eq!(inverse_simpson(&x), 1.0);
    }

    #[test]
    fn test_chao1() {
        // two singletons, one doubleton
        let x = [1.0, 1.0, 2.0, 7.0];
        assert_relative_eq!(chao1(&x), 4.0 + 4.0 / 2.0, epsilon = 1e-12);

        // no doubletons: IEEE division
        assert!(chao1(&[1.0, 5.0]).is_infinite());
        assert!(chao1(&[3.0, 5.0]).is_nan());
    }

    #[test]
    fn test_brillouin() {
        // N = 4: ln(4!) - ln(1!) - ln(3!) = ln 4
        let x = [1.0, 3.0];
        assert_relative_eq!(brillouin(&x), 4f64.ln() / 4.0, epsilon = 1e-10);
    }

    #[test]
    fn test_mcintosh_and_squares() {
        let x = [1.0, 3.0];
        let n: f64 = 4.0;
        assert_relative_eq!(
            mcintosh(&x),
            (n - 10f64.sqrt()) / (n - n.sqrt()),
            epsilon = 1e-12
        );
        // S + Σx²·F1² / (N² − F1·S) = 2 + 10 / 14
        assert_relative_eq!(squares(&x), 2.0 + 10.0 / 14.0, epsilon = 1e-12);
    }

    #[test]
    fn test_ace_all_abundant() {
        let x = [12.0, 40.0, 10.0];
        // no rare features leaves the coverage undefined
        assert!(ace(&x, 10.0).is_nan());
    }

    #[test]
    fn test_ace_mixed() {
        let x = [1.0, 2.0, 3.0, 20.0];
        // rare: 1, 2, 3 -> S_rare 3, N_rare 6, F1 1, Σx(x-1) = 0 + 2 + 6 = 8
        let coverage: f64 = 1.0 - 1.0 / 6.0;
        let gamma_sq: f64 = (3.0 / coverage * 8.0 / 30.0 - 1.0).max(0.0);
        let expected = 1.0 + 3.0 / coverage + 1.0 / coverage * gamma_sq;
        assert_relative_eq!(ace(&x, 10.0), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_kernel_dispatch() {
        let x = [1.0, 3.0];
        assert_eq!(AlphaMetric::Observed.evaluate(&x), 2.0);
        assert_eq!(SampleKernel::evaluate(&AlphaMetric::Simpson, &x), simpson(&x));
        assert_eq!(DiversityKernel::name(&AlphaMetric::Chao1), "chao1");
    }
}
