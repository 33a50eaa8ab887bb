mod common;

use common::*;
use ecodive_core::prelude::*;
use ecodive_core::transform::is_percent_normalized;
use proptest::prelude::*;

#[test]
fn test_views_agree_on_depth() {
    let rows = synthetic_rows(40, 25);
    let dense = DenseMatrix::from_rows(&rows).unwrap();
    let views: Vec<Abundance> = vec![
        dense.clone().into(),
        dense.to_layout(Layout::FeatureMajor).unwrap().into(),
        CsMatrix::from_dense(&dense).into(),
        reversed_triplet(&dense).into(),
    ];

    for view in &views {
        for (s, row) in rows.iter().enumerate() {
            let expected: f64 = row.iter().sum();
            assert_relative_eq!(view.depth(s), expected, epsilon = EPSILON);
        }
        assert_eq!(view.to_sample_major().unwrap(), dense, "{}", view.kind());
    }
}

#[test]
fn test_percent_then_detected() {
    let mut dense = DenseMatrix::from_rows(&synthetic_rows(120, 10)).unwrap();
    let dispatcher = Dispatcher::with_threads(4);
    assert!(!is_percent_normalized(&dense, &dispatcher).unwrap());

    ecodive_core::transform_dense(&mut dense, Transform::Percent, &dispatcher).unwrap();
    let zero_rows = (0..dense.n_samples()).any(|s| dense.depth(s).is_nan());
    if !zero_rows {
        assert!(is_percent_normalized(&dense, &dispatcher).unwrap());
    }
}

#[test]
fn test_transform_thread_independent() {
    let base = DenseMatrix::from_rows(&synthetic_rows(300, 12)).unwrap();
    let mut reference = base.clone();
    ecodive_core::transform_dense(&mut reference, Transform::clr(), &Dispatcher::sequential())
        .unwrap();

    for threads in [2, 8] {
        let mut m = base.clone();
        ecodive_core::transform_dense(&mut m, Transform::clr(), &Dispatcher::with_threads(threads))
            .unwrap();
        assert_eq!(m, reference);
    }
}

proptest! {
    #[test]
    fn prop_compact_preserves_dense(
        values in prop::collection::vec(prop_oneof![Just(0.0), 0.5f64..20.0], 1..60)
    ) {
        let n_features = 6;
        let n_samples = values.len().div_ceil(n_features);
        let mut padded = values.clone();
        padded.resize(n_samples * n_features, 0.0);
        let dense = DenseMatrix::from_parts(padded.clone(), n_samples, n_features, Layout::SampleMajor).unwrap();

        let all: Vec<usize> = (0..padded.len()).collect();
        let mut cs = CsMatrix::new(
            (0..=n_samples).map(|s| s * n_features).collect(),
            all.iter().map(|k| k % n_features).collect(),
            padded,
            n_features,
        ).unwrap();
        cs.compact();

        prop_assert!(cs.values().iter().all(|&x| x != 0.0));
        prop_assert_eq!(cs.to_sample_major().unwrap(), dense);
    }

    #[test]
    fn prop_pair_subset_matches_all(n in 2usize..30, stride in 1usize..7) {
        let all = PairList::all(n).unwrap();
        let picks: Vec<usize> = (0..all.len()).step_by(stride).collect();
        let subset = PairList::from_indices(n, &picks).unwrap();
        prop_assert_eq!(subset.len(), picks.len());
        for (slot, &k) in picks.iter().enumerate() {
            prop_assert_eq!(subset.pair(slot), all.pair(k));
        }
    }
}
