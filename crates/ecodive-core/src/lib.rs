//! Core types for ecological diversity computations
//!
//! This crate provides the pieces every diversity kernel is built on:
//!
//! - **Matrix views**: dense (sample- or feature-major), compressed-by-sample
//!   and triplet abundance matrices behind one [`AbundanceView`] trait
//! - **Dispatch**: a round-robin [`Dispatcher`] that runs per-unit kernels
//!   on a short-lived worker pool with a single-threaded fallback
//! - **Pair lists**: upper-triangle enumeration of sample pairs
//! - **Transforms**: percent, CLR, chord and binary rescaling
//! - **Errors**: the shared [`Error`] type
//!
//! # Example
//!
//! ```rust
//! use ecodive_core::{AbundanceView, DenseMatrix, Dispatcher};
//!
//! let counts = DenseMatrix::from_rows(&[vec![0.0, 2.0, 0.0], vec![1.0, 0.0, 3.0]]).unwrap();
//! let depths = Dispatcher::sequential()
//!     .map_units(counts.n_samples(), |s| counts.depth(s))
//!     .unwrap();
//! assert_eq!(depths, vec![2.0, 4.0]);
//! ```

pub mod config;
pub mod error;
pub mod execution;
pub mod kernels;
pub mod matrix;
pub mod pairs;
pub mod transform;

pub use config::{available_parallelism, DispatchConfig, Parallelism};
pub use error::{Error, Result};
pub use execution::{deal, Dispatcher, Worker};
pub use kernels::{DiversityKernel, Overlap, PairKernel, SampleKernel};
pub use matrix::{
    sample_major, Abundance, AbundanceView, CsMatrix, DenseMatrix, Layout, SampleEntries,
    TripletMatrix,
};
pub use pairs::{condensed_index, total_pairs, PairList};
pub use transform::{transform_compressed, transform_dense, Transform};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        Abundance, AbundanceView, CsMatrix, DenseMatrix, DispatchConfig, Dispatcher, Error,
        Layout, PairList, Result, Transform, TripletMatrix,
    };
}
