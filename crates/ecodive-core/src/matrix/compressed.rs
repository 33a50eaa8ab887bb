//! Compressed-by-sample sparse matrices

use super::{check_features, check_values, AbundanceView, DenseMatrix, SampleEntries};
use crate::{Error, Result};

/// Sparse matrix storing each sample's entries as one contiguous run.
///
/// Sample `s` owns `features[pos[s]..pos[s + 1]]` and the matching values.
#[derive(Debug, Clone, PartialEq)]
pub struct CsMatrix {
    pos: Vec<usize>,
    features: Vec<usize>,
    values: Vec<f64>,
    n_features: usize,
}

impl CsMatrix {
    /// Validate and wrap compressed storage
    pub fn new(
        pos: Vec<usize>,
        features: Vec<usize>,
        values: Vec<f64>,
        n_features: usize,
    ) -> Result<Self> {
        if pos.first() != Some(&0) {
            return Err(Error::InvalidInput(
                "pos must start with 0 and have n_samples + 1 entries".to_string(),
            ));
        }
        if pos.windows(2).any(|w| w[0] > w[1]) {
            return Err(Error::InvalidInput("pos must be non-decreasing".to_string()));
        }
        if features.len() != values.len() {
            return Err(Error::size_mismatch(
                values.len(),
                features.len(),
                "feature indices",
            ));
        }
        let nnz = pos[pos.len() - 1];
        if nnz != values.len() {
            return Err(Error::size_mismatch(nnz, values.len(), "compressed values"));
        }
        check_features(&features, n_features)?;
        check_values(&values, "abundance matrix")?;
        Ok(Self {
            pos,
            features,
            values,
            n_features,
        })
    }

    /// Compress the non-zero entries of a dense matrix
    pub fn from_dense(dense: &DenseMatrix) -> Self {
        let n = dense.n_samples();
        let mut pos = Vec::with_capacity(n + 1);
        let mut features = Vec::new();
        let mut values = Vec::new();
        pos.push(0);
        for s in 0..n {
            for (f, x) in dense.sample_entries(s) {
                if x != 0.0 {
                    features.push(f);
                    values.push(x);
                }
            }
            pos.push(values.len());
        }
        Self {
            pos,
            features,
            values,
            n_features: dense.n_features(),
        }
    }

    pub fn pos(&self) -> &[usize] {
        &self.pos
    }

    pub fn features(&self) -> &[usize] {
        &self.features
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of stored entries
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Stored `(features, values)` of one sample
    pub fn sample(&self, sample: usize) -> (&[usize], &[f64]) {
        let range = self.pos[sample]..self.pos[sample + 1];
        (&self.features[range.clone()], &self.values[range])
    }

    /// Split the value array into one mutable run per sample
    pub fn sample_values_mut(&mut self) -> Vec<&mut [f64]> {
        let mut runs = Vec::with_capacity(self.pos.len() - 1);
        let mut rest: &mut [f64] = &mut self.values;
        for w in self.pos.windows(2) {
            let (run, tail) = std::mem::take(&mut rest).split_at_mut(w[1] - w[0]);
            runs.push(run);
            rest = tail;
        }
        runs
    }

    /// Replace the stored values, keeping the sparsity pattern
    pub fn with_values(&self, values: Vec<f64>) -> Result<Self> {
        Self::new(
            self.pos.clone(),
            self.features.clone(),
            values,
            self.n_features,
        )
    }

    /// Drop stored zeros and rebuild `pos`
    pub fn compact(&mut self) {
        let mut write = 0;
        let mut start = 0;
        for s in 0..self.pos.len() - 1 {
            let end = self.pos[s + 1];
            for read in start..end {
                if self.values[read] != 0.0 {
                    self.values[write] = self.values[read];
                    self.features[write] = self.features[read];
                    write += 1;
                }
            }
            start = end;
            self.pos[s + 1] = write;
        }
        self.values.truncate(write);
        self.features.truncate(write);
    }
}

impl AbundanceView for CsMatrix {
    fn n_samples(&self) -> usize {
        self.pos.len() - 1
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn sample_entries(&self, sample: usize) -> SampleEntries<'_> {
        let (features, values) = self.sample(sample);
        SampleEntries::Run {
            features,
            values,
            next: 0,
        }
    }
}
