//! Per-sample abundance transforms
//!
//! Each transform is two passes over the matrix: a per-sample statistic
//! (depth, log-mean or norm) followed by an elementwise rewrite. Both passes
//! are dispatched, the first per sample and the second per contiguous run of
//! the storage layout.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::try_zeroed;
use crate::execution::Dispatcher;
use crate::matrix::{AbundanceView, CsMatrix, DenseMatrix, Layout};
use crate::{Error, Result};

/// Tolerance used to recognise matrices that already hold proportions
pub const PERCENT_TOLERANCE: f64 = 1e-6;

/// Sample-wise abundance transform
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Transform {
    /// `x / Σx`
    Percent,
    /// Centered log-ratio `ln((x + c) / exp(mean ln(x + c)))`
    Clr { pseudocount: f64 },
    /// `x / √Σx²`
    Chord,
    /// Presence/absence
    Binary,
}

impl Transform {
    /// CLR with a pseudocount of one
    pub fn clr() -> Self {
        Transform::Clr { pseudocount: 1.0 }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Transform::Percent => "percent",
            Transform::Clr { .. } => "clr",
            Transform::Chord => "chord",
            Transform::Binary => "binary",
        }
    }

    fn validate(&self) -> Result<()> {
        if let Transform::Clr { pseudocount } = *self {
            if !pseudocount.is_finite() || pseudocount < 0.0 {
                return Err(Error::InvalidParameter(format!(
                    "CLR pseudocount must be finite and non-negative, got {pseudocount}"
                )));
            }
        }
        Ok(())
    }

    /// Per-sample statistic from stored values plus `implicit_zeros` absent features
    fn statistic(&self, values: impl Iterator<Item = f64>, n_features: usize, implicit_zeros: usize) -> f64 {
        match *self {
            Transform::Percent => values.sum(),
            Transform::Chord => values.map(|x| x * x).sum::<f64>().sqrt(),
            Transform::Clr { pseudocount } => {
                let logsum: f64 = values.map(|x| (x + pseudocount).ln()).sum::<f64>()
                    + pseudocount.ln() * implicit_zeros as f64;
                logsum / n_features as f64
            }
            Transform::Binary => 0.0,
        }
    }

    #[inline]
    fn apply(&self, x: f64, stat: f64) -> f64 {
        match *self {
            Transform::Percent | Transform::Chord => x / stat,
            Transform::Clr { pseudocount } => (x + pseudocount).ln() - stat,
            Transform::Binary => {
                if x > 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }
}

impl FromStr for Transform {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "percent" | "pct" => Ok(Transform::Percent),
            "clr" => Ok(Transform::clr()),
            "chord" => Ok(Transform::Chord),
            "binary" => Ok(Transform::Binary),
            other => Err(Error::unknown_selector("transform", other)),
        }
    }
}

/// Whether every sample holds proportions in `[0, 1]` summing to one
pub fn is_percent_normalized<V: AbundanceView + ?Sized>(matrix: &V, dispatcher: &Dispatcher) -> Result<bool> {
    let flags = dispatcher.map_units(matrix.n_samples(), |s| {
        let mut depth = 0.0;
        for (_, x) in matrix.sample_entries(s) {
            if !(0.0..=1.0).contains(&x) {
                return false;
            }
            depth += x;
        }
        (depth - 1.0).abs() <= PERCENT_TOLERANCE
    })?;
    Ok(flags.into_iter().all(|ok| ok))
}

/// Transform a dense matrix in place
#[instrument(skip(matrix, dispatcher), fields(transform = transform.name(), n_samples = matrix.n_samples()))]
pub fn transform_dense(matrix: &mut DenseMatrix, transform: Transform, dispatcher: &Dispatcher) -> Result<()> {
    transform.validate()?;
    if transform == Transform::Percent && is_percent_normalized(&*matrix, dispatcher)? {
        debug!("Matrix already percent-normalized, skipping");
        return Ok(());
    }

    let (n, m) = (matrix.n_samples(), matrix.n_features());
    let stats = {
        let view = &*matrix;
        dispatcher.map_units(n, |s| {
            transform.statistic(view.sample_entries(s).map(|(_, x)| x), m, 0)
        })?
    };

    match matrix.layout() {
        Layout::SampleMajor => dispatcher.for_each_chunk(matrix.data_mut(), m, |s, row| {
            row.iter_mut().for_each(|x| *x = transform.apply(*x, stats[s]));
        }),
        Layout::FeatureMajor => dispatcher.for_each_chunk(matrix.data_mut(), n, |_, column| {
            for (s, x) in column.iter_mut().enumerate() {
                *x = transform.apply(*x, stats[s]);
            }
        }),
    }
    Ok(())
}

/// Transform the stored entries of a compressed matrix in place.
///
/// For CLR the value an absent feature would take in each sample is
/// returned, since implicit zeros cannot be rewritten in sparse storage.
#[instrument(skip(matrix, dispatcher), fields(transform = transform.name(), nnz = matrix.nnz()))]
pub fn transform_compressed(
    matrix: &mut CsMatrix,
    transform: Transform,
    dispatcher: &Dispatcher,
) -> Result<Option<Vec<f64>>> {
    transform.validate()?;
    if transform == Transform::Percent && is_percent_normalized(&*matrix, dispatcher)? {
        debug!("Matrix already percent-normalized, skipping");
        return Ok(None);
    }

    let m = matrix.n_features();
    let mut runs = matrix.sample_values_mut();
    let mut stats: Vec<f64> = try_zeroed(runs.len(), "sample statistics")?;
    {
        let mut slots: Vec<(&mut [f64], &mut f64)> =
            runs.iter_mut().map(|r| &mut **r).zip(stats.iter_mut()).collect();
        dispatcher.for_each_unit(&mut slots, |_, (run, stat)| {
            let stored = run.len();
            **stat = transform.statistic(run.iter().copied(), m, m - stored);
            run.iter_mut().for_each(|x| *x = transform.apply(*x, **stat));
        });
    }

    Ok(match transform {
        Transform::Clr { .. } => Some(stats.iter().map(|&g| transform.apply(0.0, g)).collect()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn example() -> DenseMatrix {
        DenseMatrix::from_rows(&[vec![0.0, 2.0, 0.0], vec![1.0, 0.0, 3.0]]).unwrap()
    }

    #[test]
    fn test_percent_dense() {
        let mut m = example();
        transform_dense(&mut m, Transform::Percent, &Dispatcher::sequential()).unwrap();
        assert_eq!(m.data(), &[0.0, 1.0, 0.0, 0.25, 0.0, 0.75]);
    }

    #[test]
    fn test_chord_feature_major_matches() {
        let mut rows = example();
        let mut cols = example().to_layout(Layout::FeatureMajor).unwrap();
        let d = Dispatcher::sequential();
        transform_dense(&mut rows, Transform::Chord, &d).unwrap();
        transform_dense(&mut cols, Transform::Chord, &d).unwrap();
        assert_eq!(cols.to_layout(Layout::SampleMajor).unwrap(), rows);
    }

    #[test]
    fn test_percent_noop_when_normalized() {
        let mut m = DenseMatrix::from_rows(&[vec![0.5, 0.5], vec![0.2, 0.8]]).unwrap();
        let before = m.clone();
        transform_dense(&mut m, Transform::Percent, &Dispatcher::sequential()).unwrap();
        assert_eq!(m, before);
    }

    #[test]
    fn test_clr_rows_sum_to_zero() {
        let mut m = example();
        transform_dense(&mut m, Transform::clr(), &Dispatcher::sequential()).unwrap();
        for s in 0..2 {
            let sum: f64 = m.row(s).unwrap().iter().sum();
            assert_relative_eq!(sum, 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_clr_compressed_matches_dense() {
        let d = Dispatcher::sequential();
        let mut dense = example();
        transform_dense(&mut dense, Transform::clr(), &d).unwrap();

        let mut sparse = CsMatrix::from_dense(&example());
        let zeros = transform_compressed(&mut sparse, Transform::clr(), &d)
            .unwrap()
            .unwrap();
        assert_relative_eq!(sparse.values()[0], dense.get(0, 1), epsilon = 1e-12);
        assert_relative_eq!(sparse.values()[2], dense.get(1, 2), epsilon = 1e-12);
        assert_relative_eq!(zeros[0], dense.get(0, 0), epsilon = 1e-12);
        assert_relative_eq!(zeros[1], dense.get(1, 1), epsilon = 1e-12);
    }

    #[test]
    fn test_binary_and_chord_compressed() {
        let d = Dispatcher::sequential();
        let mut m = CsMatrix::from_dense(&example());
        assert!(transform_compressed(&mut m, Transform::Binary, &d).unwrap().is_none());
        assert_eq!(m.values(), &[1.0, 1.0, 1.0]);

        let mut m = CsMatrix::from_dense(&example());
        transform_compressed(&mut m, Transform::Chord, &d).unwrap();
        assert_relative_eq!(m.values()[1], 1.0 / 10f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_parse_and_validate() {
        assert_eq!("CLR".parse::<Transform>().unwrap(), Transform::clr());
        assert!(matches!("log".parse::<Transform>(), Err(Error::InvalidSelector(_))));

        let mut m = example();
        let bad = Transform::Clr { pseudocount: -1.0 };
        assert!(transform_dense(&mut m, bad, &Dispatcher::sequential()).is_err());
    }
}
