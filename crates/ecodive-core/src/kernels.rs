//! Kernel trait definitions
//!
//! Metric crates implement these traits on their selector enums. A selector is
//! resolved once per call and then evaluated per unit by the dispatcher.

/// Base trait for all diversity kernels
pub trait DiversityKernel: Clone + Send + Sync {
    /// Name of this kernel for debugging/logging
    fn name(&self) -> &'static str;
}

/// Per-sample scalar reducer
pub trait SampleKernel: DiversityKernel {
    /// Evaluate over a sample's positive abundances
    fn evaluate(&self, counts: &[f64]) -> f64;
}

/// Per-pair scalar reducer over aligned feature vectors
pub trait PairKernel: DiversityKernel {
    /// Evaluate over two samples' full feature vectors
    fn evaluate(&self, x: &[f64], y: &[f64]) -> f64;
}

/// Presence/absence tallies of a sample pair
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Overlap {
    /// Features present in the first sample
    pub a: usize,
    /// Features present in the second sample
    pub b: usize,
    /// Features present in both
    pub shared: usize,
}

impl Overlap {
    /// Tally presence over aligned vectors, treating values `> 0` as present
    pub fn of(x: &[f64], y: &[f64]) -> Self {
        let mut overlap = Overlap::default();
        for (&xi, &yi) in x.iter().zip(y) {
            let (px, py) = (xi > 0.0, yi > 0.0);
            overlap.a += px as usize;
            overlap.b += py as usize;
            overlap.shared += (px && py) as usize;
        }
        overlap
    }

    /// Features present in exactly one sample
    #[inline]
    pub fn unshared(&self) -> usize {
        self.a + self.b - 2 * self.shared
    }
}
