//! Min-max feature rescaling for the Gower distance

use ecodive_core::{error::try_zeroed, sample_major, AbundanceView, DenseMatrix, Dispatcher, Layout, Result};
use tracing::debug;

/// Rescale every feature to `[0, 1]` across samples.
///
/// Features are dispatched as units. A feature whose values are all equal is
/// left at zero. The result is feature-major so that each feature is one
/// contiguous run written by a single worker.
pub fn rescale_features<V>(matrix: &V, dispatcher: &Dispatcher) -> Result<DenseMatrix>
where
    V: AbundanceView + ?Sized,
{
    let rows = sample_major(matrix)?;
    let (n, m) = (rows.n_samples(), rows.n_features());
    let data = rows.data();
    let mut rescaled: Vec<f64> = try_zeroed(n * m, "gower rescale")?;

    dispatcher.for_each_chunk(&mut rescaled, n, |feature, column| {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for s in 0..n {
            let x = data[s * m + feature];
            min = min.min(x);
            max = max.max(x);
        }
        if max > min {
            let range = max - min;
            for (s, out) in column.iter_mut().enumerate() {
                *out = (data[s * m + feature] - min) / range;
            }
        }
    });
    debug!("Rescaled {} features over {} samples", m, n);
    DenseMatrix::from_parts(rescaled, n, m, Layout::FeatureMajor)
}
