//! Beta (between-sample) dissimilarity metrics
//!
//! Every metric maps two abundance vectors of equal length to a scalar and is
//! evaluated for each pair of a [`PairList`](ecodive_core::PairList). Results
//! follow the pair list order, so with all pairs the output is the condensed
//! upper triangle of the distance matrix.
//!
//! Most metrics read raw abundances. [`BetaMetric::Gower`] first rescales each
//! feature to `[0, 1]` across samples. A subset of metrics also has an
//! unweighted form that only looks at presence/absence:
//!
//! | Metric | Unweighted form (A, B present in x, y; J shared; M features) |
//! |--------|---------------------------------------------------------------|
//! | Bray-Curtis | (A + B − 2J) / (A + B) |
//! | Canberra | (A + B − 2J) / (A + B − J) |
//! | Euclidean | √(A + B − 2J) |
//! | Manhattan, Hamming | A + B − 2J |
//! | Jaccard | 1 − J / (A + B − J) |
//! | Kulczynski | 1 − (J/A + J/B) / 2 |
//! | Gower | (A + B − 2J) / M |
//!
//! # Example
//!
//! ```rust
//! use ecodive_beta::{distance_matrix, BetaMetric};
//! use ecodive_core::{DenseMatrix, Dispatcher};
//!
//! let counts = DenseMatrix::from_rows(&[vec![0.0, 2.0, 0.0], vec![1.0, 0.0, 3.0]]).unwrap();
//! let d = distance_matrix(&counts, BetaMetric::BrayCurtis, &Dispatcher::sequential()).unwrap();
//! assert_eq!(d, vec![1.0]);
//! ```

pub mod distance;
pub mod gower;
pub mod kernels;
pub mod metric;

pub use distance::{beta_diversity, beta_diversity_into, distance_matrix};
pub use gower::rescale_features;
pub use metric::{BetaMetric, Weighting, DEFAULT_MINKOWSKI_POWER};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{beta_diversity, beta_diversity_into, distance_matrix, BetaMetric, Weighting};
}
