//! Per-sample driver

use ecodive_core::{AbundanceView, Dispatcher, Error, Result, SampleKernel};
use tracing::{debug, instrument};

use crate::metric::AlphaMetric;

/// Evaluate `metric` for every sample, writing into `out`.
///
/// `out` must hold exactly one slot per sample. Each worker gathers a
/// sample's positive abundances into its own scratch buffer.
#[instrument(skip(matrix, dispatcher, out), fields(metric = metric.name(), n_samples = matrix.n_samples()))]
pub fn alpha_diversity_into<V>(
    matrix: &V,
    metric: AlphaMetric,
    dispatcher: &Dispatcher,
    out: &mut [f64],
) -> Result<()>
where
    V: AbundanceView + ?Sized,
{
    metric.validate()?;
    if out.len() != matrix.n_samples() {
        return Err(Error::size_mismatch(matrix.n_samples(), out.len(), "alpha output"));
    }

    dispatcher.for_each_unit_with(out, Vec::new, |scratch: &mut Vec<f64>, sample, slot| {
        scratch.clear();
        scratch.extend(
            matrix
                .sample_entries(sample)
                .filter_map(|(_, x)| (x > 0.0).then_some(x)),
        );
        *slot = metric.evaluate(scratch.as_slice());
    });
    debug!("Computed {} for {} samples", metric, out.len());
    Ok(())
}

/// Evaluate `metric` for every sample
pub fn alpha_diversity<V>(matrix: &V, metric: AlphaMetric, dispatcher: &Dispatcher) -> Result<Vec<f64>>
where
    V: AbundanceView + ?Sized,
{
    let mut out = ecodive_core::error::try_zeroed(matrix.n_samples(), "alpha output")?;
    alpha_diversity_into(matrix, metric, dispatcher, &mut out)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ecodive_core::DenseMatrix;

    #[test]
    fn test_observed_and_simpson() {
        let m = DenseMatrix::from_rows(&[vec![0.0, 2.0, 0.0], vec![1.0, 0.0, 3.0]]).unwrap();
        let d = Dispatcher::sequential();
        assert_eq!(alpha_diversity(&m, AlphaMetric::Observed, &d).unwrap(), vec![1.0, 2.0]);
        let simpson = alpha_diversity(&m, AlphaMetric::Simpson, &d).unwrap();
        assert_relative_eq!(simpson[0], 0.0);
        assert_relative_eq!(simpson[1], 0.375, epsilon = 1e-12);
    }

    #[test]
    fn test_output_length_checked() {
        let m = DenseMatrix::from_rows(&[vec![1.0], vec![2.0]]).unwrap();
        let mut out = vec![0.0; 3];
        let err = alpha_diversity_into(&m, AlphaMetric::Shannon, &Dispatcher::sequential(), &mut out)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert_eq!(out, vec![0.0; 3]);
    }

    #[test]
    fn test_invalid_parameter_rejected_before_writing() {
        let m = DenseMatrix::from_rows(&[vec![1.0]]).unwrap();
        let mut out = vec![-1.0];
        let metric = AlphaMetric::Ace { cutoff: 0.0 };
        assert!(alpha_diversity_into(&m, metric, &Dispatcher::sequential(), &mut out).is_err());
        assert_eq!(out, vec![-1.0]);
    }
}
