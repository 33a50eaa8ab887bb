//! Pairwise driver

use ecodive_core::{
    sample_major, AbundanceView, DenseMatrix, Dispatcher, Error, Layout, Overlap, PairKernel,
    PairList, Result,
};
use tracing::{debug, instrument};

use crate::gower::rescale_features;
use crate::kernels::unweighted;
use crate::metric::{BetaMetric, Weighting};

/// Evaluate `metric` for every pair in `pairs`, writing into `out`.
///
/// Input of any representation is first brought to dense sample-major form.
/// Gower runs a per-feature rescaling pass to completion before the pairwise
/// pass starts.
#[instrument(skip(matrix, pairs, dispatcher, out), fields(metric = metric.name(), n_pairs = pairs.len()))]
pub fn beta_diversity_into<V>(
    matrix: &V,
    metric: BetaMetric,
    weighting: Weighting,
    pairs: &PairList,
    dispatcher: &Dispatcher,
    out: &mut [f64],
) -> Result<()>
where
    V: AbundanceView + ?Sized,
{
    metric.validate_for(weighting)?;
    if pairs.n_samples() != matrix.n_samples() {
        return Err(Error::size_mismatch(matrix.n_samples(), pairs.n_samples(), "pair list samples"));
    }
    if out.len() != pairs.len() {
        return Err(Error::size_mismatch(pairs.len(), out.len(), "distance output"));
    }

    let rescaled;
    let rows = if metric == BetaMetric::Gower {
        rescaled = rescale_features(matrix, dispatcher)?.to_layout(Layout::SampleMajor)?;
        std::borrow::Cow::Borrowed(&rescaled)
    } else {
        sample_major(matrix)?
    };
    let n_features = rows.n_features();
    let row = |s: usize| row_slice(&rows, s, n_features);

    match weighting {
        Weighting::Weighted => dispatcher.for_each_unit(out, |slot, distance| {
            let (i, j) = pairs.pair(slot);
            *distance = metric.evaluate(row(i), row(j));
        }),
        Weighting::Unweighted => dispatcher.for_each_unit(out, |slot, distance| {
            let (i, j) = pairs.pair(slot);
            let overlap = Overlap::of(row(i), row(j));
            *distance = unweighted(metric, overlap, n_features).unwrap_or(f64::NAN);
        }),
    }
    debug!("Computed {} {:?} distances", metric, weighting);
    Ok(())
}

#[inline]
fn row_slice(rows: &DenseMatrix, sample: usize, n_features: usize) -> &[f64] {
    &rows.data()[sample * n_features..(sample + 1) * n_features]
}

/// Evaluate `metric` for every pair in `pairs`
pub fn beta_diversity<V>(
    matrix: &V,
    metric: BetaMetric,
    weighting: Weighting,
    pairs: &PairList,
    dispatcher: &Dispatcher,
) -> Result<Vec<f64>>
where
    V: AbundanceView + ?Sized,
{
    let mut out = ecodive_core::error::try_zeroed(pairs.len(), "distance output")?;
    beta_diversity_into(matrix, metric, weighting, pairs, dispatcher, &mut out)?;
    Ok(out)
}

/// Weighted `metric` over all sample pairs, in upper-triangle order
pub fn distance_matrix<V>(matrix: &V, metric: BetaMetric, dispatcher: &Dispatcher) -> Result<Vec<f64>>
where
    V: AbundanceView + ?Sized,
{
    let pairs = PairList::all(matrix.n_samples())?;
    beta_diversity(matrix, metric, Weighting::Weighted, &pairs, dispatcher)
}
