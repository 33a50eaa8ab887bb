//! Dense abundance matrices

use serde::{Deserialize, Serialize};

use super::{check_values, AbundanceView, SampleEntries};
use crate::error::try_zeroed;
use crate::{Error, Result};

/// Storage order of a dense matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Layout {
    /// Row-major: one sample's features are contiguous
    SampleMajor,
    /// Column-major: one feature's samples are contiguous
    FeatureMajor,
}

/// Dense `n_samples × n_features` matrix of non-negative abundances
#[derive(Debug, Clone, PartialEq)]
pub struct DenseMatrix {
    data: Vec<f64>,
    n_samples: usize,
    n_features: usize,
    layout: Layout,
}

impl DenseMatrix {
    /// Wrap a buffer, validating its length and contents
    pub fn from_parts(
        data: Vec<f64>,
        n_samples: usize,
        n_features: usize,
        layout: Layout,
    ) -> Result<Self> {
        let expected = n_samples.checked_mul(n_features).ok_or_else(|| {
            Error::InvalidInput(format!("{n_samples} x {n_features} matrix overflows"))
        })?;
        if data.len() != expected {
            return Err(Error::size_mismatch(expected, data.len(), "dense matrix"));
        }
        check_values(&data, "abundance matrix")?;
        Ok(Self {
            data,
            n_samples,
            n_features,
            layout,
        })
    }

    /// Wrap a buffer whose length is already known to match
    pub(crate) fn from_parts_unchecked(
        data: Vec<f64>,
        n_samples: usize,
        n_features: usize,
        layout: Layout,
    ) -> Self {
        debug_assert_eq!(data.len(), n_samples * n_features);
        Self {
            data,
            n_samples,
            n_features,
            layout,
        }
    }

    /// Build a sample-major matrix from one vector per sample
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let n_features = rows.first().map_or(0, Vec::len);
        let len = rows.len() * n_features;
        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|_| Error::allocation("dense rows", len))?;
        for (s, row) in rows.iter().enumerate() {
            if row.len() != n_features {
                return Err(Error::size_mismatch(
                    n_features,
                    row.len(),
                    &format!("row {s}"),
                ));
            }
            data.extend_from_slice(row);
        }
        Self::from_parts(data, rows.len(), n_features, Layout::SampleMajor)
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }

    pub fn into_data(self) -> Vec<f64> {
        self.data
    }

    /// `(offset, stride)` addressing one sample's features
    #[inline]
    pub fn sample_stride(&self, sample: usize) -> (usize, usize) {
        match self.layout {
            Layout::SampleMajor => (sample * self.n_features, 1),
            Layout::FeatureMajor => (sample, self.n_samples),
        }
    }

    /// Value at `(sample, feature)`
    #[inline]
    pub fn get(&self, sample: usize, feature: usize) -> f64 {
        let (offset, stride) = self.sample_stride(sample);
        self.data[offset + feature * stride]
    }

    /// Contiguous row of a sample-major matrix
    pub fn row(&self, sample: usize) -> Option<&[f64]> {
        match self.layout {
            Layout::SampleMajor => {
                let start = sample * self.n_features;
                self.data.get(start..start + self.n_features)
            }
            Layout::FeatureMajor => None,
        }
    }

    /// Copy into the requested layout
    pub fn to_layout(&self, layout: Layout) -> Result<DenseMatrix> {
        let (n, m) = (self.n_samples, self.n_features);
        let mut data: Vec<f64> = try_zeroed(self.data.len(), "dense matrix")?;
        if layout == self.layout {
            data.copy_from_slice(&self.data);
            return Ok(DenseMatrix::from_parts_unchecked(data, n, m, layout));
        }
        for s in 0..n {
            for f in 0..m {
                let x = self.get(s, f);
                match layout {
                    Layout::SampleMajor => data[s * m + f] = x,
                    Layout::FeatureMajor => data[f * n + s] = x,
                }
            }
        }
        Ok(DenseMatrix::from_parts_unchecked(data, n, m, layout))
    }
}

impl AbundanceView for DenseMatrix {
    fn n_samples(&self) -> usize {
        self.n_samples
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn sample_entries(&self, sample: usize) -> SampleEntries<'_> {
        let (offset, stride) = self.sample_stride(sample);
        SampleEntries::Strided {
            data: &self.data,
            offset,
            stride,
            feature: 0,
            n_features: self.n_features,
        }
    }

    fn as_sample_major(&self) -> Option<&DenseMatrix> {
        (self.layout == Layout::SampleMajor).then_some(self)
    }

    fn to_sample_major(&self) -> Result<DenseMatrix> {
        self.to_layout(Layout::SampleMajor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_addressing() {
        let rows = DenseMatrix::from_rows(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
        let cols = rows.to_layout(Layout::FeatureMajor).unwrap();
        assert_eq!(cols.data(), &[1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
        for s in 0..2 {
            for f in 0..3 {
                assert_eq!(rows.get(s, f), cols.get(s, f));
            }
        }
        assert_eq!(rows.row(1), Some(&[4.0, 5.0, 6.0][..]));
        assert_eq!(cols.row(1), None);
        assert_eq!(cols.to_layout(Layout::SampleMajor).unwrap(), rows);
    }

    #[test]
    fn test_to_layout_same_layout_copies() {
        let cols = DenseMatrix::from_parts(vec![1.0, 4.0, 2.0, 5.0], 2, 2, Layout::FeatureMajor).unwrap();
        let copy = cols.to_layout(Layout::FeatureMajor).unwrap();
        assert_eq!(copy, cols);
        assert_eq!(copy.layout(), Layout::FeatureMajor);
        assert_eq!(copy.to_sample_major().unwrap().data(), &[1.0, 2.0, 4.0, 5.0]);
    }

    #[test]
    fn test_strided_entries() {
        let cols = DenseMatrix::from_parts(
            vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0],
            2,
            3,
            Layout::FeatureMajor,
        )
        .unwrap();
        let entries: Vec<_> = cols.sample_entries(1).collect();
        assert_eq!(entries, vec![(0, 4.0), (1, 5.0), (2, 6.0)]);
    }

    #[test]
    fn test_validation() {
        assert!(DenseMatrix::from_parts(vec![1.0; 5], 2, 3, Layout::SampleMajor).is_err());
        assert!(DenseMatrix::from_rows(&[vec![1.0, 2.0], vec![1.0]]).is_err());
        assert!(DenseMatrix::from_rows(&[vec![1.0, -2.0]]).is_err());

        let empty = DenseMatrix::from_rows(&[]).unwrap();
        assert_eq!(empty.n_samples(), 0);
        assert_eq!(empty.n_features(), 0);
    }
}
