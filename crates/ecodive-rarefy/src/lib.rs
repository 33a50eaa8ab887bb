//! Rarefaction: random subsampling of every sample to a common depth
//!
//! Each sample with more than `target` observations is reduced to exactly
//! `target` by selection sampling without replacement. Samples at or below
//! the target are copied unchanged. Abundances are read as whole observation
//! counts, truncating any fractional part.
//!
//! Every sample draws from its own PCG32 stream, seeded with `seed` and
//! selecting the stream by sample index, with one 32-bit draw per observation.
//! Results are reproducible and do not depend on how many threads run the
//! pass.
//!
//! # Example
//!
//! ```rust
//! use ecodive_core::{AbundanceView, DenseMatrix, Dispatcher};
//! use ecodive_rarefy::Rarefaction;
//!
//! let counts = DenseMatrix::from_rows(&[vec![12.0, 3.0, 5.0], vec![1.0, 0.0, 2.0]]).unwrap();
//! let rarefied = Rarefaction::new(10)
//!     .with_seed(42)
//!     .apply_dense(&counts, &Dispatcher::sequential())
//!     .unwrap();
//! assert_eq!(rarefied.depth(0), 10.0);
//! assert_eq!(rarefied.depth(1), 3.0);
//! ```

pub mod driver;
pub mod selection;

pub use driver::{rarefy, Rarefaction};
pub use selection::{sample_rng, Selection};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{rarefy, Rarefaction};
}
