//! Phylogenetic UniFrac distances
//!
//! UniFrac compares two samples by how much evolutionary history, measured as
//! branch length on a rooted tree, they share. Computation runs in two
//! phases:
//!
//! 1. **Accumulate**: every sample's leaf abundances are pushed up to the root
//!    into an edge-weight vector ([`EdgeWeights`]). Samples are the units of
//!    work.
//! 2. **Compare**: each requested pair reduces its two edge-weight vectors to
//!    a distance. Pairs are the units of work.
//!
//! The first phase completes on all workers before the second starts.
//!
//! # Example
//!
//! ```rust
//! use ecodive_core::{DenseMatrix, Dispatcher, PairList};
//! use ecodive_unifrac::{unifrac, PhyloTree, UnifracVariant};
//!
//! // two leaves joined at root 2
//! let tree = PhyloTree::from_edges(2, &[(2, 0), (2, 1)], &[1.0, 1.0]).unwrap();
//! let counts = DenseMatrix::from_rows(&[vec![5.0, 0.0], vec![0.0, 5.0]]).unwrap();
//! let pairs = PairList::all(2).unwrap();
//! let d = unifrac(&counts, &tree, UnifracVariant::Unweighted, &pairs, &Dispatcher::sequential()).unwrap();
//! assert_eq!(d, vec![1.0]);
//! ```

pub mod distance;
pub mod tree;
pub mod variant;
pub mod weights;

pub use distance::{unifrac, unifrac_into};
pub use tree::{Incoming, Node, PhyloTree};
pub use variant::{UnifracVariant, DEFAULT_GENERALIZED_ALPHA};
pub use weights::EdgeWeights;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{unifrac, unifrac_into, PhyloTree, UnifracVariant};
}
