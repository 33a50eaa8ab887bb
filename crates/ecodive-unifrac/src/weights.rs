//! Per-sample edge weights
//!
//! First phase of every UniFrac variant: each sample's leaf abundances are
//! pushed up the tree into one weight per edge. Samples are dispatched as
//! units, so one worker owns a sample's whole row.

use ecodive_core::{error::try_zeroed, AbundanceView, Dispatcher, Error, Result};
use tracing::debug;

use crate::tree::PhyloTree;
use crate::variant::UnifracVariant;

/// Sample-major `n_samples × n_edges` weights plus one total per sample
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeWeights {
    weights: Vec<f64>,
    totals: Vec<f64>,
    n_edges: usize,
}

impl EdgeWeights {
    /// Accumulate edge weights for every sample of `matrix`.
    ///
    /// What is added per edge depends on the variant:
    ///
    /// | Variant | Edge weight | Total |
    /// |---------|-------------|-------|
    /// | unweighted | 1 if any descendant leaf is present | - |
    /// | weighted | Σ length · x / N | - |
    /// | normalized | Σ length · x / N | Σ over all edges |
    /// | generalized | Σ x / N | - |
    /// | variance adjusted | Σ x | N |
    pub fn accumulate<V>(
        matrix: &V,
        tree: &PhyloTree,
        variant: UnifracVariant,
        dispatcher: &Dispatcher,
    ) -> Result<Self>
    where
        V: AbundanceView + ?Sized,
    {
        let n_samples = matrix.n_samples();
        let n_edges = tree.n_edges();
        let len = n_samples
            .checked_mul(n_edges)
            .ok_or_else(|| Error::allocation("edge weights", usize::MAX))?;
        let mut weights: Vec<f64> = try_zeroed(len, "edge weights")?;
        let mut totals: Vec<f64> = try_zeroed(n_samples, "sample totals")?;

        let mut rows: Vec<(&mut [f64], &mut f64)> =
            weights.chunks_mut(n_edges).zip(totals.iter_mut()).collect();
        dispatcher.for_each_unit(&mut rows, |sample, slot| {
            let (row, total) = slot;
            accumulate_sample(matrix, tree, variant, sample, row, total);
        });
        drop(rows);

        debug!(
            "Accumulated {} edge weights for {} samples",
            n_edges, n_samples
        );
        Ok(Self {
            weights,
            totals,
            n_edges,
        })
    }

    pub fn n_samples(&self) -> usize {
        self.totals.len()
    }

    pub fn n_edges(&self) -> usize {
        self.n_edges
    }

    /// Edge weights of one sample
    pub fn row(&self, sample: usize) -> &[f64] {
        &self.weights[sample * self.n_edges..(sample + 1) * self.n_edges]
    }

    /// Per-sample total (normalized and variance adjusted only)
    pub fn total(&self, sample: usize) -> f64 {
        self.totals[sample]
    }
}

fn accumulate_sample<V>(
    matrix: &V,
    tree: &PhyloTree,
    variant: UnifracVariant,
    sample: usize,
    row: &mut [f64],
    total: &mut f64,
) where
    V: AbundanceView + ?Sized,
{
    let present = matrix.sample_entries(sample).filter(|&(_, x)| x > 0.0);
    match variant {
        UnifracVariant::Unweighted => {
            for (leaf, _) in present {
                for incoming in tree.path_to_root(leaf) {
                    // everything above was marked by an earlier leaf
                    if row[incoming.edge] > 0.0 {
                        break;
                    }
                    row[incoming.edge] = 1.0;
                }
            }
        }
        UnifracVariant::Weighted | UnifracVariant::Normalized => {
            let depth = matrix.depth(sample);
            let normalized = variant == UnifracVariant::Normalized;
            for (leaf, x) in present {
                let relative = x / depth;
                for incoming in tree.path_to_root(leaf) {
                    let weighted = incoming.length * relative;
                    row[incoming.edge] += weighted;
                    if normalized {
                        *total += weighted;
                    }
                }
            }
        }
        UnifracVariant::Generalized { .. } => {
            let depth = matrix.depth(sample);
            for (leaf, x) in present {
                let relative = x / depth;
                for incoming in tree.path_to_root(leaf) {
                    row[incoming.edge] += relative;
                }
            }
        }
        UnifracVariant::VarianceAdjusted => {
            let mut depth = 0.0;
            for (leaf, x) in present {
                depth += x;
                for incoming in tree.path_to_root(leaf) {
                    row[incoming.edge] += x;
                }
            }
            *total = depth;
        }
    }
}
