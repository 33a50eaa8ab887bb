//! Rarefaction drivers for each matrix representation
//!
//! Samples are the units of work. Each sample owns its own generator stream,
//! so the output for a given `(seed, sample, target)` is identical for any
//! thread count.

use ecodive_core::{
    deal, error::try_zeroed, sample_major, Abundance, AbundanceView, CsMatrix, DenseMatrix,
    Dispatcher, Layout, Result, TripletMatrix,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::selection::{observation_depth, observations, Selection};

/// Target depth and seed of a rarefaction pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rarefaction {
    /// Observations kept per sample
    pub target: u32,
    /// Base seed; the sample index selects the stream
    #[serde(default)]
    pub seed: u64,
}

impl Rarefaction {
    pub fn new(target: u32) -> Self {
        Self { target, seed: 0 }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Rarefy any representation, returning the same representation
    pub fn apply(&self, matrix: &Abundance, dispatcher: &Dispatcher) -> Result<Abundance> {
        Ok(match matrix {
            Abundance::Dense(m) => self.apply_dense(m, dispatcher)?.into(),
            Abundance::Compressed(m) => self.apply_compressed(m, dispatcher)?.into(),
            Abundance::Triplet(m) => self.apply_triplet(m, dispatcher)?.into(),
        })
    }

    /// Rarefy a dense matrix, keeping its layout.
    ///
    /// Observations are walked feature by feature, then by repeat count.
    #[instrument(skip(self, matrix, dispatcher), fields(target = self.target, n_samples = matrix.n_samples()))]
    pub fn apply_dense(&self, matrix: &DenseMatrix, dispatcher: &Dispatcher) -> Result<DenseMatrix> {
        let rows = sample_major(matrix)?;
        let (n, m) = (rows.n_samples(), rows.n_features());
        let source = rows.data();
        let mut out: Vec<f64> = try_zeroed(n * m, "rarefied matrix")?;

        dispatcher.for_each_chunk(&mut out, m, |sample, row| {
            let src = &source[sample * m..(sample + 1) * m];
            let depth = observation_depth(src.iter().copied());
            match Selection::begin(self.seed, sample, depth, self.target) {
                Some(mut selection) => {
                    for (dst, &x) in row.iter_mut().zip(src) {
                        *dst = f64::from(selection.take(observations(x)));
                    }
                }
                None => row.copy_from_slice(src),
            }
        });
        debug!("Rarefied {} samples to depth {}", n, self.target);

        let rarefied = DenseMatrix::from_parts(out, n, m, Layout::SampleMajor)?;
        Ok(match matrix.layout() {
            Layout::SampleMajor => rarefied,
            layout => rarefied.to_layout(layout)?,
        })
    }

    /// Rarefy a compressed matrix; entries that drop to zero are removed.
    #[instrument(skip(self, matrix, dispatcher), fields(target = self.target, nnz = matrix.nnz()))]
    pub fn apply_compressed(&self, matrix: &CsMatrix, dispatcher: &Dispatcher) -> Result<CsMatrix> {
        let mut rarefied = matrix.clone();
        let mut runs = rarefied.sample_values_mut();
        dispatcher.for_each_unit(&mut runs, |sample, run| {
            let (_, src) = matrix.sample(sample);
            let depth = observation_depth(src.iter().copied());
            if let Some(mut selection) = Selection::begin(self.seed, sample, depth, self.target) {
                for (dst, &x) in run.iter_mut().zip(src) {
                    *dst = f64::from(selection.take(observations(x)));
                }
            }
        });
        drop(runs);

        let before = rarefied.nnz();
        rarefied.compact();
        debug!(
            "Rarefied to depth {}; compaction dropped {} entries",
            self.target,
            before - rarefied.nnz()
        );
        Ok(rarefied)
    }

    /// Rarefy a triplet matrix; entries that drop to zero are removed.
    ///
    /// Entries are dealt to the worker owning their sample and visited in
    /// stored order, together with that worker's per-sample selection states.
    #[instrument(skip(self, matrix, dispatcher), fields(target = self.target, nnz = matrix.nnz()))]
    pub fn apply_triplet(&self, matrix: &TripletMatrix, dispatcher: &Dispatcher) -> Result<TripletMatrix> {
        let n_samples = matrix.n_samples();
        let samples = matrix.samples();
        let workers = dispatcher.workers_for(n_samples);

        let depths = dispatcher.map_units(n_samples, |s| {
            observation_depth(matrix.sample_entries(s).map(|(_, x)| x))
        })?;
        let mut states: Vec<Option<Selection>> = depths
            .iter()
            .enumerate()
            .map(|(s, &depth)| Selection::begin(self.seed, s, depth, self.target))
            .collect();
        let mut values: Vec<f64> = try_zeroed(matrix.nnz(), "rarefied values")?;
        values.copy_from_slice(matrix.values());

        let entry_lanes = deal(values.iter_mut().enumerate(), workers, |(k, _)| samples[*k]);
        let state_lanes = deal(states.iter_mut().enumerate(), workers, |(s, _)| *s);
        let lanes: Vec<_> = entry_lanes.into_iter().zip(state_lanes).collect();
        dispatcher.run_lanes(lanes, |worker, (entries, mut owned)| {
            for (k, value) in entries {
                // lane holds samples worker.index, worker.index + count, ...
                let (_, state) = &mut owned[samples[k] / worker.count];
                if let Some(selection) = state.as_mut() {
                    *value = f64::from(selection.take(observations(*value)));
                }
            }
        });

        let mut rarefied = matrix.with_values(values)?;
        let before = rarefied.nnz();
        rarefied.compact();
        debug!(
            "Rarefied {} samples to depth {}; compaction dropped {} entries",
            n_samples,
            self.target,
            before - rarefied.nnz()
        );
        Ok(rarefied)
    }
}

/// Rarefy `matrix` to `target` observations per sample.
///
/// Abundances are read as whole observations: each entry is truncated to an
/// integer count and a sample's depth is the sum of those counts. A sample of
/// fractional abundances whose truncated depth is at or below `target` is
/// copied unchanged even when its real-valued total exceeds `target`, so
/// `[2.5, 2.5]` at target 4 stays `[2.5, 2.5]`.
pub fn rarefy(matrix: &Abundance, target: u32, seed: u64, dispatcher: &Dispatcher) -> Result<Abundance> {
    Rarefaction::new(target).with_seed(seed).apply(matrix, dispatcher)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn depths<V: AbundanceView>(m: &V) -> Vec<f64> {
        (0..m.n_samples()).map(|s| m.depth(s)).collect()
    }

    #[test]
    fn test_dense_depths() {
        let m = DenseMatrix::from_rows(&[
            vec![10.0, 5.0, 0.0, 5.0],
            vec![1.0, 2.0, 0.0, 0.0],
            vec![0.0, 0.0, 40.0, 2.0],
        ])
        .unwrap();
        let r = Rarefaction::new(8).with_seed(7).apply_dense(&m, &Dispatcher::sequential()).unwrap();
        assert_eq!(depths(&r), vec![8.0, 3.0, 8.0]);
        assert_eq!(r.row(1).unwrap(), m.row(1).unwrap());
        // absent features stay absent
        assert_eq!(r.get(0, 2), 0.0);
        assert_eq!(r.get(2, 0), 0.0);
    }

    #[test]
    fn test_feature_major_layout_kept() {
        let m = DenseMatrix::from_rows(&[vec![6.0, 6.0], vec![3.0, 9.0]]).unwrap();
        let fm = m.to_layout(Layout::FeatureMajor).unwrap();
        let d = Dispatcher::sequential();
        let plan = Rarefaction::new(5).with_seed(1);
        let a = plan.apply_dense(&m, &d).unwrap();
        let b = plan.apply_dense(&fm, &d).unwrap();
        assert_eq!(b.layout(), Layout::FeatureMajor);
        assert_eq!(a.to_layout(Layout::FeatureMajor).unwrap(), b);
    }

    #[test]
    fn test_sparse_matches_dense() {
        let m = DenseMatrix::from_rows(&[vec![4.0, 0.0, 9.0, 1.0], vec![0.0, 3.0, 3.0, 0.0]]).unwrap();
        let d = Dispatcher::sequential();
        let plan = Rarefaction::new(4).with_seed(99);
        let dense = plan.apply_dense(&m, &d).unwrap();
        let cs = plan.apply_compressed(&CsMatrix::from_dense(&m), &d).unwrap();
        assert_eq!(cs, CsMatrix::from_dense(&dense));
        assert!(cs.values().iter().all(|&x| x > 0.0));
    }

    #[test]
    fn test_fractional_depth_truncated() {
        let d = Dispatcher::sequential();
        let m = DenseMatrix::from_rows(&[vec![2.5, 2.5], vec![2.5, 3.7]]).unwrap();
        let r = rarefy(&Abundance::from(m.clone()), 4, 1, &d).unwrap();
        let Abundance::Dense(r) = r else {
            panic!("dense input must stay dense");
        };
        // truncated depth 4 is not above the target
        assert_eq!(r.row(0).unwrap(), m.row(0).unwrap());
        // truncated depth 5 is rarefied to whole counts summing to 4
        assert_eq!(r.depth(1), 4.0);
        assert!(r.row(1).unwrap().iter().all(|x| x.fract() == 0.0));
    }

    #[test]
    fn test_config_serde() {
        let plan: Rarefaction = serde_json::from_str(r#"{"target": 1000}"#).unwrap();
        assert_eq!(plan, Rarefaction::new(1000));
    }
}
