//! Pairwise UniFrac distances over accumulated edge weights

use ecodive_core::{AbundanceView, Dispatcher, Error, PairList, Result};
use tracing::{debug, instrument};

use crate::tree::PhyloTree;
use crate::variant::UnifracVariant;
use crate::weights::EdgeWeights;

/// Unshared over total branch length of edges present in either sample
pub fn unweighted(x: &[f64], y: &[f64], lengths: &[f64]) -> f64 {
    let (mut distinct, mut shared) = (0.0, 0.0);
    for ((&a, &b), &length) in x.iter().zip(y).zip(lengths) {
        match (a > 0.0, b > 0.0) {
            (true, true) => shared += length,
            (true, false) | (false, true) => distinct += length,
            (false, false) => {}
        }
    }
    distinct / (distinct + shared)
}

pub fn weighted(x: &[f64], y: &[f64]) -> f64 {
    x.iter().zip(y).map(|(a, b)| (a - b).abs()).sum()
}

pub fn normalized(x: &[f64], y: &[f64], total_x: f64, total_y: f64) -> f64 {
    weighted(x, y) / (total_x + total_y)
}

pub fn generalized(x: &[f64], y: &[f64], lengths: &[f64], alpha: f64) -> f64 {
    let (mut distance, mut denominator) = (0.0, 0.0);
    for ((&a, &b), &length) in x.iter().zip(y).zip(lengths) {
        let sum = a + b;
        if sum > 0.0 {
            let norm = length * sum.powf(alpha);
            distance += norm * ((a - b) / sum).abs();
            denominator += norm;
        }
    }
    distance / denominator
}

/// Edge terms are scaled by `length / √((x + y)(T_x + T_y − x − y))` on raw
/// counts before converting to proportions.
pub fn variance_adjusted(x: &[f64], y: &[f64], lengths: &[f64], total_x: f64, total_y: f64) -> f64 {
    let (mut distance, mut denominator) = (0.0, 0.0);
    for ((&a, &b), &length) in x.iter().zip(y).zip(lengths) {
        let variance = (a + b) * (total_x + total_y - a - b);
        if variance > 0.0 {
            let norm = length / variance.sqrt();
            let (p, q) = (a / total_x, b / total_y);
            distance += (p - q).abs() * norm;
            denominator += (p + q) * norm;
        }
    }
    distance / denominator
}

fn pair_distance(
    weights: &EdgeWeights,
    lengths: &[f64],
    variant: UnifracVariant,
    i: usize,
    j: usize,
) -> f64 {
    let (x, y) = (weights.row(i), weights.row(j));
    match variant {
        UnifracVariant::Unweighted => unweighted(x, y, lengths),
        UnifracVariant::Weighted => weighted(x, y),
        UnifracVariant::Normalized => normalized(x, y, weights.total(i), weights.total(j)),
        UnifracVariant::Generalized { alpha } => generalized(x, y, lengths, alpha),
        UnifracVariant::VarianceAdjusted => {
            variance_adjusted(x, y, lengths, weights.total(i), weights.total(j))
        }
    }
}

/// Compute `variant` for every pair in `pairs`, writing into `out`.
///
/// Edge weights for all samples are accumulated first; pairs are only
/// evaluated once that pass has joined.
#[instrument(skip(matrix, tree, pairs, dispatcher, out), fields(variant = variant.name(), n_pairs = pairs.len()))]
pub fn unifrac_into<V>(
    matrix: &V,
    tree: &PhyloTree,
    variant: UnifracVariant,
    pairs: &PairList,
    dispatcher: &Dispatcher,
    out: &mut [f64],
) -> Result<()>
where
    V: AbundanceView + ?Sized,
{
    variant.validate()?;
    if tree.n_leaves() != matrix.n_features() {
        return Err(Error::invalid_tree(format!(
            "tree has {} leaves but the matrix has {} features",
            tree.n_leaves(),
            matrix.n_features()
        )));
    }
    if pairs.n_samples() != matrix.n_samples() {
        return Err(Error::size_mismatch(matrix.n_samples(), pairs.n_samples(), "pair list samples"));
    }
    if out.len() != pairs.len() {
        return Err(Error::size_mismatch(pairs.len(), out.len(), "distance output"));
    }

    let weights = EdgeWeights::accumulate(matrix, tree, variant, dispatcher)?;
    let lengths = tree.lengths();
    dispatcher.for_each_unit(out, |slot, distance| {
        let (i, j) = pairs.pair(slot);
        *distance = pair_distance(&weights, lengths, variant, i, j);
    });
    debug!("Computed {} UniFrac for {} pairs", variant, out.len());
    Ok(())
}

/// Compute `variant` for every pair in `pairs`
pub fn unifrac<V>(
    matrix: &V,
    tree: &PhyloTree,
    variant: UnifracVariant,
    pairs: &PairList,
    dispatcher: &Dispatcher,
) -> Result<Vec<f64>>
where
    V: AbundanceView + ?Sized,
{
    let mut out = ecodive_core::error::try_zeroed(pairs.len(), "distance output")?;
    unifrac_into(matrix, tree, variant, pairs, dispatcher, &mut out)?;
    Ok(out)
}
