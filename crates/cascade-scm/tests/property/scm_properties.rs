//! Property tests for normalization statistics and structural functions.

use proptest::prelude::*;

use cascade_core::dataset::Dataset;
use cascade_scm::stats::{compute_stats, NodeStats};
use cascade_scm::StructuralFunction;

// =============================================================================
// Property: standardize and destandardize are inverse maps
// =============================================================================
proptest! {
    #[test]
    fn standardization_roundtrips(
        mean in -100.0..100.0f64,
        std in 0.1..50.0f64,
        value in -1000.0..1000.0f64,
    ) {
        let stats = NodeStats { mean, std };
        let back = stats.destandardize(stats.standardize(value));
        let tolerance = 1e-9 * (1.0 + value.abs());
        prop_assert!((back - value).abs() < tolerance, "{} came back as {}", value, back);
    }
}

// =============================================================================
// Property: computed stats always standardize safely
// =============================================================================
proptest! {
    #[test]
    fn computed_stats_are_always_usable(
        values in prop::collection::vec(-1e3..1e3f64, 0..100),
        nan_every in 1usize..5,
    ) {
        let mut column = values;
        for i in (0..column.len()).step_by(nan_every) {
            column[i] = f64::NAN;
        }
        let data = Dataset::from_columns([("x", column)]).unwrap();
        let stats = compute_stats(&data, &["x"]);
        let x = stats["x"];

        prop_assert!(x.mean.is_finite());
        prop_assert!(x.std.is_finite());
        prop_assert!(x.std > 0.0, "std must stay positive, got {}", x.std);
        // Whatever the column, standardizing a finite value stays finite.
        prop_assert!(x.standardize(1.0).is_finite());
    }
}

// =============================================================================
// Property: paired ReLUs realize exact linear maps
// =============================================================================
proptest! {
    #[test]
    fn relu_pair_realizes_linear_map(
        slope in -5.0..5.0f64,
        intercept in -5.0..5.0f64,
        x in -100.0..100.0f64,
    ) {
        let f = StructuralFunction::from_weights(
            vec![vec![1.0], vec![-1.0]],
            vec![0.0, 0.0],
            vec![slope, -slope],
            intercept,
        )
        .unwrap();
        let expected = slope * x + intercept;
        let got = f.forward(&[x]);
        let tolerance = 1e-9 * (1.0 + expected.abs());
        prop_assert!((got - expected).abs() < tolerance, "f({}) = {}, expected {}", x, got, expected);
    }
}
