//! Coordinate (triplet) sparse matrices

use super::{check_features, check_values, AbundanceView, SampleEntries};
use crate::error::try_zeroed;
use crate::{Error, Result};

/// Sparse matrix of `(sample, feature, value)` entries in arbitrary order.
///
/// A stable per-sample index is built on construction, so a sample's entries
/// are visited in stored order without scanning the whole entry array.
#[derive(Debug, Clone)]
pub struct TripletMatrix {
    samples: Vec<usize>,
    features: Vec<usize>,
    values: Vec<f64>,
    n_samples: usize,
    n_features: usize,
    offsets: Vec<usize>,
    order: Vec<usize>,
}

impl PartialEq for TripletMatrix {
    fn eq(&self, other: &Self) -> bool {
        self.samples == other.samples
            && self.features == other.features
            && self.values == other.values
            && self.n_samples == other.n_samples
            && self.n_features == other.n_features
    }
}

impl TripletMatrix {
    /// Validate and index triplet storage
    pub fn new(
        samples: Vec<usize>,
        features: Vec<usize>,
        values: Vec<f64>,
        n_samples: usize,
        n_features: usize,
    ) -> Result<Self> {
        if samples.len() != values.len() {
            return Err(Error::size_mismatch(values.len(), samples.len(), "sample indices"));
        }
        if features.len() != values.len() {
            return Err(Error::size_mismatch(values.len(), features.len(), "feature indices"));
        }
        if let Some(&bad) = samples.iter().find(|&&s| s >= n_samples) {
            return Err(Error::InvalidInput(format!(
                "sample index {bad} out of range for {n_samples} samples"
            )));
        }
        check_features(&features, n_features)?;
        check_values(&values, "abundance matrix")?;

        let mut offsets = try_zeroed(n_samples + 1, "triplet sample offsets")?;
        let mut order = try_zeroed(samples.len(), "triplet sample index")?;
        index_by_sample(&samples, &mut offsets, &mut order);
        Ok(Self {
            samples,
            features,
            values,
            n_samples,
            n_features,
            offsets,
            order,
        })
    }

    pub fn samples(&self) -> &[usize] {
        &self.samples
    }

    pub fn features(&self) -> &[usize] {
        &self.features
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Replace the stored values, keeping coordinates
    pub fn with_values(&self, values: Vec<f64>) -> Result<Self> {
        if values.len() != self.values.len() {
            return Err(Error::size_mismatch(self.values.len(), values.len(), "triplet values"));
        }
        check_values(&values, "abundance matrix")?;
        Ok(Self {
            values,
            ..self.clone()
        })
    }

    /// Drop stored zeros, preserving the order of the remaining entries
    pub fn compact(&mut self) {
        let mut write = 0;
        for read in 0..self.values.len() {
            if self.values[read] != 0.0 {
                self.samples[write] = self.samples[read];
                self.features[write] = self.features[read];
                self.values[write] = self.values[read];
                write += 1;
            }
        }
        self.samples.truncate(write);
        self.features.truncate(write);
        self.values.truncate(write);
        self.order.truncate(write);
        index_by_sample(&self.samples, &mut self.offsets, &mut self.order);
    }
}

/// Stable counting sort of entry positions by sample, in place.
///
/// `offsets` has `n_samples + 1` slots and `order` one slot per entry.
fn index_by_sample(samples: &[usize], offsets: &mut [usize], order: &mut [usize]) {
    offsets.fill(0);
    for &s in samples {
        offsets[s + 1] += 1;
    }
    for s in 1..offsets.len() {
        offsets[s] += offsets[s - 1];
    }
    // offsets[s] doubles as the write cursor of sample s
    for (k, &s) in samples.iter().enumerate() {
        order[offsets[s]] = k;
        offsets[s] += 1;
    }
    // each cursor now sits at the next sample's start
    offsets.copy_within(..offsets.len() - 1, 1);
    offsets[0] = 0;
}

impl AbundanceView for TripletMatrix {
    fn n_samples(&self) -> usize {
        self.n_samples
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn sample_entries(&self, sample: usize) -> SampleEntries<'_> {
        SampleEntries::Indexed {
            order: &self.order[self.offsets[sample]..self.offsets[sample + 1]],
            features: &self.features,
            values: &self.values,
            next: 0,
        }
    }
}
