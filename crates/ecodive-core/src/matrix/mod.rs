//! Abundance matrix representations
//!
//! Kernels read samples through the [`AbundanceView`] trait, which hides the
//! physical layout:
//!
//! | Type | Layout | Per-sample access |
//! |------|--------|-------------------|
//! | [`DenseMatrix`] | sample-major or feature-major | strided walk over every feature |
//! | [`CsMatrix`] | compressed by sample (`pos` runs) | contiguous slice |
//! | [`TripletMatrix`] | unordered `(sample, feature, value)` | stable per-sample index |
//!
//! Dense views yield zero entries; sparse views yield whatever is stored.
//! Kernels that only care about presence skip values `<= 0`.

mod compressed;
mod dense;
mod triplet;

pub use compressed::CsMatrix;
pub use dense::{DenseMatrix, Layout};
pub use triplet::TripletMatrix;

use std::borrow::Cow;

use crate::{Error, Result};

/// Uniform per-sample read access over any abundance representation
pub trait AbundanceView: Send + Sync {
    /// Number of samples (rows of the logical matrix)
    fn n_samples(&self) -> usize;

    /// Number of features (columns of the logical matrix)
    fn n_features(&self) -> usize;

    /// Lazily iterate `(feature, value)` for one sample
    fn sample_entries(&self, sample: usize) -> SampleEntries<'_>;

    /// Sum of all entries of a sample
    fn depth(&self, sample: usize) -> f64 {
        self.sample_entries(sample).map(|(_, x)| x).sum()
    }

    /// Borrow as a dense sample-major matrix when already stored that way
    fn as_sample_major(&self) -> Option<&DenseMatrix> {
        None
    }

    /// Copy into the canonical dense sample-major form
    fn to_sample_major(&self) -> Result<DenseMatrix> {
        let (n, m) = (self.n_samples(), self.n_features());
        let len = n
            .checked_mul(m)
            .ok_or_else(|| Error::allocation("dense matrix", usize::MAX))?;
        let mut data: Vec<f64> = crate::error::try_zeroed(len, "dense matrix")?;
        for s in 0..n {
            let row = &mut data[s * m..(s + 1) * m];
            for (f, x) in self.sample_entries(s) {
                row[f] += x;
            }
        }
        Ok(DenseMatrix::from_parts_unchecked(data, n, m, Layout::SampleMajor))
    }
}

/// Iterator over the `(feature, value)` entries of a single sample
#[derive(Debug, Clone)]
pub enum SampleEntries<'a> {
    /// Every feature of a dense sample, read with a fixed stride
    Strided {
        data: &'a [f64],
        offset: usize,
        stride: usize,
        feature: usize,
        n_features: usize,
    },
    /// A contiguous run of stored entries
    Run {
        features: &'a [usize],
        values: &'a [f64],
        next: usize,
    },
    /// Stored entries addressed through an index
    Indexed {
        order: &'a [usize],
        features: &'a [usize],
        values: &'a [f64],
        next: usize,
    },
}

impl Iterator for SampleEntries<'_> {
    type Item = (usize, f64);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        match self {
            SampleEntries::Strided {
                data,
                offset,
                stride,
                feature,
                n_features,
            } => {
                if *feature == *n_features {
                    return None;
                }
                let item = (*feature, data[*offset + *feature * *stride]);
                *feature += 1;
                Some(item)
            }
            SampleEntries::Run {
                features,
                values,
                next,
            } => {
                let i = *next;
                if i == values.len() {
                    return None;
                }
                *next += 1;
                Some((features[i], values[i]))
            }
            SampleEntries::Indexed {
                order,
                features,
                values,
                next,
            } => {
                let k = *order.get(*next)?;
                *next += 1;
                Some((features[k], values[k]))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = match self {
            SampleEntries::Strided {
                feature,
                n_features,
                ..
            } => n_features - feature,
            SampleEntries::Run { values, next, .. } => values.len() - next,
            SampleEntries::Indexed { order, next, .. } => order.len() - next,
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for SampleEntries<'_> {}

/// Any supported abundance representation
#[derive(Debug, Clone, PartialEq)]
pub enum Abundance {
    Dense(DenseMatrix),
    Compressed(CsMatrix),
    Triplet(TripletMatrix),
}

impl Abundance {
    /// Short name of the representation, for logging
    pub fn kind(&self) -> &'static str {
        match self {
            Abundance::Dense(m) => match m.layout() {
                Layout::SampleMajor => "dense/sample-major",
                Layout::FeatureMajor => "dense/feature-major",
            },
            Abundance::Compressed(_) => "compressed",
            Abundance::Triplet(_) => "triplet",
        }
    }

    fn view(&self) -> &dyn AbundanceView {
        match self {
            Abundance::Dense(m) => m,
            Abundance::Compressed(m) => m,
            Abundance::Triplet(m) => m,
        }
    }

    /// Drop explicit zero entries from sparse representations
    pub fn compact(&mut self) {
        match self {
            Abundance::Dense(_) => {}
            Abundance::Compressed(m) => m.compact(),
            Abundance::Triplet(m) => m.compact(),
        }
    }
}

/// Canonical sample-major form of any view, borrowed when possible
pub fn sample_major<V: AbundanceView + ?Sized>(matrix: &V) -> Result<Cow<'_, DenseMatrix>> {
    match matrix.as_sample_major() {
        Some(dense) => Ok(Cow::Borrowed(dense)),
        None => matrix.to_sample_major().map(Cow::Owned),
    }
}

impl AbundanceView for Abundance {
    fn n_samples(&self) -> usize {
        self.view().n_samples()
    }

    fn n_features(&self) -> usize {
        self.view().n_features()
    }

    fn sample_entries(&self, sample: usize) -> SampleEntries<'_> {
        self.view().sample_entries(sample)
    }

    fn as_sample_major(&self) -> Option<&DenseMatrix> {
        self.view().as_sample_major()
    }

    fn to_sample_major(&self) -> Result<DenseMatrix> {
        self.view().to_sample_major()
    }
}

impl From<DenseMatrix> for Abundance {
    fn from(m: DenseMatrix) -> Self {
        Abundance::Dense(m)
    }
}

impl From<CsMatrix> for Abundance {
    fn from(m: CsMatrix) -> Self {
        Abundance::Compressed(m)
    }
}

impl From<TripletMatrix> for Abundance {
    fn from(m: TripletMatrix) -> Self {
        Abundance::Triplet(m)
    }
}

/// Reject NaN, infinite and negative abundances
pub(crate) fn check_values(values: &[f64], context: &str) -> Result<()> {
    if values.iter().any(|&x| !x.is_finite() || x < 0.0) {
        return Err(Error::non_finite(context));
    }
    Ok(())
}

/// Reject feature indices outside `0..n_features`
pub(crate) fn check_features(features: &[usize], n_features: usize) -> Result<()> {
    if let Some(&bad) = features.iter().find(|&&f| f >= n_features) {
        return Err(Error::InvalidInput(format!(
            "feature index {bad} out of range for {n_features} features"
        )));
    }
    Ok(())
}
