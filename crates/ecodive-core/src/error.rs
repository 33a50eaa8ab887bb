//! Error types for diversity computations
//!
//! Provides a unified error type for all ecodive crates.

use thiserror::Error;

/// Core error type for diversity operations
#[derive(Error, Debug)]
pub enum Error {
    /// Unknown algorithm name or id
    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    /// Invalid parameter provided to a function
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Malformed phylogenetic tree
    #[error("Invalid tree: {0}")]
    InvalidTree(String),

    /// Memory allocation failure for a required buffer
    #[error("Memory error: {0}")]
    Memory(String),

    /// Threading or parallelization error
    #[error("Execution error: {0}")]
    Execution(String),

    /// Other errors
    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

// Helper functions for common error patterns

impl Error {
    /// Create an error for size mismatch
    pub fn size_mismatch(expected: usize, actual: usize, context: &str) -> Self {
        Self::InvalidInput(format!(
            "Size mismatch in {context}: expected {expected}, got {actual}"
        ))
    }

    /// Create an error for NaN/Inf or negative abundances
    pub fn non_finite(context: &str) -> Self {
        Self::InvalidInput(format!(
            "{context} contains NaN, infinite or negative values"
        ))
    }

    /// Create an error for an unknown selector
    pub fn unknown_selector(kind: &str, value: impl std::fmt::Display) -> Self {
        Self::InvalidSelector(format!("unknown {kind} '{value}'"))
    }

    /// Create an error for a malformed tree
    pub fn invalid_tree(reason: impl Into<String>) -> Self {
        Self::InvalidTree(reason.into())
    }

    /// Create an error for a failed buffer reservation
    pub fn allocation(what: &str, len: usize) -> Self {
        Self::Memory(format!("unable to allocate {len} elements for {what}"))
    }
}

/// Reserve a zero-filled buffer, surfacing allocation failure as [`Error::Memory`].
pub fn try_zeroed<T: Clone + Default>(len: usize, what: &str) -> Result<Vec<T>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| Error::allocation(what, len))?;
    buf.resize(len, T::default());
    Ok(buf)
}
