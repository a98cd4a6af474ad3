//! Assertion functions for testing feature extraction outputs.

use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::hash::{BuildHasher, Hash};

/// Assert that two sequences of feature vectors are exactly equal,
/// including the bit pattern of any `NaN` sentinel holes (a `NaN` only
/// ever matches another `NaN` at the same position; everything else uses
/// ordinary `==`).
///
/// # Panics
/// Panics if the sequences differ in shape or content.
pub fn assert_feature_vectors_equal(actual: &[Vec<f64>], expected: &[Vec<f64>]) {
    assert_feature_vectors_close(actual, expected, 0.0);
}

/// Assert that two sequences of feature vectors are equal within `epsilon`
/// per cell. A `NaN` sentinel only matches another `NaN` at the same
/// position, regardless of `epsilon`.
///
/// # Panics
/// Panics if the sequences differ in shape, or any cell differs by more
/// than `epsilon` (with the `NaN` exception above).
pub fn assert_feature_vectors_close(actual: &[Vec<f64>], expected: &[Vec<f64>], epsilon: f64) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "Record count mismatch:\n  Expected: {}\n  Actual: {}",
        expected.len(),
        actual.len()
    );
    for (row, (a, e)) in actual.iter().zip(expected).enumerate() {
        assert_eq!(
            a.len(),
            e.len(),
            "Row {row} width mismatch:\n  Expected: {e:?}\n  Actual: {a:?}"
        );
        for (col, (av, ev)) in a.iter().zip(e).enumerate() {
            let ok = if ev.is_nan() {
                av.is_nan()
            } else {
                (av - ev).abs() <= epsilon
            };
            assert!(
                ok,
                "Mismatch at row {row}, column {col}:\n  Expected: {ev}\n  Actual: {av}\n  Full expected row: {e:?}\n  Full actual row: {a:?}"
            );
        }
    }
}

/// Assert that a feature name list matches exactly, in order.
///
/// # Panics
/// Panics if the name lists differ.
pub fn assert_feature_names_equal(actual: &[String], expected: &[&str]) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "Feature name count mismatch:\n  Expected: {expected:?}\n  Actual: {actual:?}"
    );
    for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
        assert_eq!(
            a, e,
            "Feature name mismatch at index {i}:\n  Expected: {e:?}\n  Actual: {a:?}"
        );
    }
}

/// Assert that two collections are equal in order and content.
///
/// # Panics
/// Panics if the collections differ in length or content.
pub fn assert_collections_equal<T: Debug + PartialEq>(actual: &[T], expected: &[T]) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "Collection length mismatch:\n  Expected: {expected:?}\n  Actual: {actual:?}"
    );
    for (i, (a, e)) in actual.iter().zip(expected.iter()).enumerate() {
        assert_eq!(
            a, e,
            "Collection mismatch at index {i}:\n  Expected: {e:?}\n  Actual: {a:?}"
        );
    }
}

/// Assert that two collections contain the same elements, ignoring order.
///
/// # Panics
/// Panics if the collections differ in content (ignoring order).
pub fn assert_collections_unordered_equal<T: Debug + Eq + Hash>(actual: &[T], expected: &[T]) {
    let actual_set: HashSet<_> = actual.iter().collect();
    let expected_set: HashSet<_> = expected.iter().collect();
    assert_eq!(
        actual.len(),
        expected.len(),
        "Collection length mismatch:\n  Expected: {expected:?}\n  Actual: {actual:?}"
    );
    if actual_set != expected_set {
        let missing: Vec<_> = expected_set.difference(&actual_set).collect();
        let extra: Vec<_> = actual_set.difference(&expected_set).collect();
        panic!("Collection content mismatch:\n  Missing: {missing:?}\n  Extra: {extra:?}");
    }
}

/// Assert that a collection has the expected size.
///
/// # Panics
/// Panics if the collection size doesn't match.
pub fn assert_collection_size<T>(collection: &[T], expected_size: usize) {
    assert_eq!(
        collection.len(),
        expected_size,
        "Collection size mismatch:\n  Expected: {expected_size}\n  Actual: {}",
        collection.len()
    );
}

/// Assert that two hashmaps are equal.
///
/// # Panics
/// Panics if the hashmaps differ in keys or values.
pub fn assert_maps_equal<K, V, S: BuildHasher>(actual: &HashMap<K, V, S>, expected: &HashMap<K, V, S>)
where
    K: Debug + Eq + Hash,
    V: Debug + PartialEq,
{
    assert_eq!(
        actual.len(),
        expected.len(),
        "HashMap size mismatch:\n  Expected: {expected:?}\n  Actual: {actual:?}"
    );
    for (key, expected_value) in expected {
        match actual.get(key) {
            Some(actual_value) if actual_value == expected_value => {}
            Some(actual_value) => {
                panic!("HashMap value mismatch for key {key:?}:\n  Expected: {expected_value:?}\n  Actual: {actual_value:?}");
            }
            None => panic!("HashMap missing key: {key:?}"),
        }
    }
}
