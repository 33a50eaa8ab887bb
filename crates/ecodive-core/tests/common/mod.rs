//! Shared utilities for integration tests

#![allow(dead_code)]

pub use approx::assert_relative_eq;

use ecodive_core::{AbundanceView, CsMatrix, DenseMatrix, TripletMatrix};

pub const EPSILON: f64 = 1e-12;

/// Deterministic pseudo-random sparse counts
pub fn synthetic_rows(n_samples: usize, n_features: usize) -> Vec<Vec<f64>> {
    (0..n_samples)
        .map(|s| {
            (0..n_features)
                .map(|f| {
                    let h = (s * 31 + f * 17 + s * f) % 11;
                    if h < 4 {
                        0.0
                    } else {
                        h as f64
                    }
                })
                .collect()
        })
        .collect()
}

/// Triplet copy of a dense matrix with entries in reversed order
pub fn reversed_triplet(dense: &DenseMatrix) -> TripletMatrix {
    let cs = CsMatrix::from_dense(dense);
    let mut samples = Vec::new();
    for s in 0..cs.pos().len() - 1 {
        samples.extend(std::iter::repeat(s).take(cs.pos()[s + 1] - cs.pos()[s]));
    }
    let mut features = cs.features().to_vec();
    let mut values = cs.values().to_vec();
    samples.reverse();
    features.reverse();
    values.reverse();
    TripletMatrix::new(samples, features, values, dense.n_samples(), dense.n_features())
        .expect("valid triplet")
}
