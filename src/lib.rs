//! # ecodive
//!
//! Parallel ecological diversity statistics over sample × feature abundance
//! matrices.
//!
//! The workspace is split into focused crates, all re-exported here:
//!
//! - [`core`]: matrix views (dense, compressed, triplet), the round-robin
//!   [`Dispatcher`](core::Dispatcher), pair lists, transforms and errors
//! - [`alpha`]: per-sample indices (Shannon, Simpson, Chao1, Fisher's α, ...)
//! - [`beta`]: pairwise dissimilarities (Bray-Curtis, Jaccard, Gower, ...)
//! - [`unifrac`]: phylogenetic UniFrac distances
//! - [`rarefy`]: seeded, thread-count independent rarefaction
//!
//! Every kernel accepts any [`AbundanceView`](core::AbundanceView) and a
//! [`Dispatcher`](core::Dispatcher). Results are bit-identical for any thread
//! count.
//!
//! # Example
//!
//! ```rust
//! use ecodive::prelude::*;
//!
//! let counts = DenseMatrix::from_rows(&[vec![0.0, 2.0, 0.0], vec![1.0, 0.0, 3.0]]).unwrap();
//! let dispatcher = Dispatcher::new(DispatchConfig::default());
//!
//! let richness = alpha_diversity(&counts, AlphaMetric::Observed, &dispatcher).unwrap();
//! assert_eq!(richness, vec![1.0, 2.0]);
//!
//! let bray = distance_matrix(&counts, BetaMetric::BrayCurtis, &dispatcher).unwrap();
//! assert_eq!(bray, vec![1.0]);
//! ```

pub use ecodive_alpha as alpha;
pub use ecodive_beta as beta;
pub use ecodive_core as core;
pub use ecodive_rarefy as rarefy;
pub use ecodive_unifrac as unifrac;

pub use ecodive_core::{Error, Result};

/// Prelude for convenient imports
pub mod prelude {
    pub use ecodive_alpha::prelude::*;
    pub use ecodive_beta::prelude::*;
    pub use ecodive_core::prelude::*;
    pub use ecodive_rarefy::prelude::*;
    pub use ecodive_unifrac::prelude::*;
}
