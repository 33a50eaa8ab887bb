//! Alpha (within-sample) diversity indices
//!
//! This crate evaluates one scalar per sample over any abundance matrix
//! representation:
//!
//! | Metric | Formula (x = positive abundances, N = Σx, S = #x) |
//! |--------|----------------------------------------------------|
//! | Observed | S |
//! | Shannon | −Σ p ln p |
//! | Simpson | 1 − Σp² |
//! | Inverse Simpson | 1 / Σp² |
//! | Chao1 | S + F1² / 2F2 |
//! | Berger-Parker | max x / N |
//! | Brillouin | (ln N! − Σ ln x!) / N |
//! | Margalef | (S − 1) / ln N |
//! | Menhinick | S / √N |
//! | McIntosh | (N − √Σx²) / (N − √N) |
//! | Squares | S + Σx² F1² / (N² − F1 S) |
//! | ACE | coverage estimate with a rare/abundant cutoff |
//! | Fisher's α | root of S = α ln(1 + N/α) |
//!
//! Degenerate samples are not errors: the formulas are evaluated as written
//! and may yield `NaN` or infinities.
//!
//! # Example
//!
//! ```rust
//! use ecodive_alpha::{alpha_diversity, AlphaMetric};
//! use ecodive_core::{DenseMatrix, Dispatcher};
//!
//! let counts = DenseMatrix::from_rows(&[vec![0.0, 2.0, 0.0], vec![1.0, 0.0, 3.0]]).unwrap();
//! let richness = alpha_diversity(&counts, AlphaMetric::Observed, &Dispatcher::sequential()).unwrap();
//! assert_eq!(richness, vec![1.0, 2.0]);
//! ```

pub mod diversity;
pub mod fisher;
pub mod kernels;
pub mod metric;

pub use diversity::{alpha_diversity, alpha_diversity_into};
pub use fisher::fisher_alpha;
pub use metric::{AlphaMetric, DEFAULT_ACE_CUTOFF, DEFAULT_FISHER_DIGITS};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{alpha_diversity, alpha_diversity_into, AlphaMetric};
}
