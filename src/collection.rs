//! The collection capability: the contract a host dataset runtime
//! must satisfy for the engine to run against it — `map`, `reduce`,
//! `cross`, `pure`. The engine itself is driver-agnostic: it contains no
//! threads and issues no blocking calls, expressing all heavy work as
//! calls through this trait.
//!
//! Two implementations ship here: [`VecCollection`] (sequential, in-memory)
//! and [`RayonCollection`] (data-parallel, via `rayon`). A host wiring in a
//! distributed dataset runtime implements the same trait; [`ExtractionMode`]
//! is the one execution knob the engine exposes, selecting between the two
//! built-in capabilities rather than reading a config file or environment
//! variable.

use rayon::prelude::*;

/// A data-parallel capability over elements of type `T`.
///
/// `map` and `reduce` are the two operations the extraction engine actually
/// drives; `cross` (zip with a broadcast singleton) and `pure` (lift a
/// value into the collection) round out the contract for hosts that wire
/// in a real distributed runtime, even though the engine's own
/// reduce/present pipeline doesn't need them.
///
/// `reduce`'s `semigroup` must be associative; the engine never assumes
/// commutativity.
pub trait Collection<T: Send> {
    fn map<U: Send>(&self, items: Vec<T>, f: impl Fn(&T) -> U + Send + Sync) -> Vec<U>;

    fn reduce(&self, items: Vec<T>, semigroup: impl Fn(T, T) -> T + Send + Sync) -> Option<T>;

    fn cross<U: Clone + Send>(&self, items: Vec<T>, singleton: U) -> Vec<(T, U)>
    where
        T: Clone,
    {
        self.map(items, move |t: &T| (t.clone(), singleton.clone()))
    }

    fn pure(&self, x: T) -> Vec<T> {
        vec![x]
    }
}

/// Sequential, single-threaded, in-memory collection capability. The
/// default [`ExtractionMode`].
#[derive(Debug, Clone, Copy, Default)]
pub struct VecCollection;

impl<T: Send> Collection<T> for VecCollection {
    fn map<U: Send>(&self, items: Vec<T>, f: impl Fn(&T) -> U + Send + Sync) -> Vec<U> {
        items.iter().map(f).collect()
    }

    fn reduce(&self, items: Vec<T>, semigroup: impl Fn(T, T) -> T + Send + Sync) -> Option<T> {
        items.into_iter().reduce(semigroup)
    }
}

/// Data-parallel collection capability backed by `rayon`'s global thread
/// pool. `map` requires `T: Sync` (shared references cross worker
/// threads); `reduce` only requires `T: Send` (partial accumulators move,
/// never alias).
#[derive(Debug, Clone, Copy, Default)]
pub struct RayonCollection;

impl<T: Send + Sync> Collection<T> for RayonCollection {
    fn map<U: Send>(&self, items: Vec<T>, f: impl Fn(&T) -> U + Send + Sync) -> Vec<U> {
        items.par_iter().map(f).collect()
    }

    fn reduce(&self, items: Vec<T>, semigroup: impl Fn(T, T) -> T + Send + Sync) -> Option<T> {
        items.into_par_iter().reduce_with(semigroup)
    }
}

/// Selects which built-in [`Collection`] capability an [`crate::extractor::Extractor`]
/// drives its prepare/reduce/present pass through. Not a config file or env
/// var — just a constructor argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtractionMode {
    #[default]
    Sequential,
    Parallel,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec_collection_reduce_is_sum() {
        let items = vec![1, 2, 3, 4];
        let sum = VecCollection.reduce(items, |a, b| a + b);
        assert_eq!(sum, Some(10));
    }

    #[test]
    fn rayon_collection_agrees_with_vec_collection() {
        let items: Vec<i64> = (1..=100).collect();
        let seq = VecCollection.reduce(items.clone(), |a, b| a + b);
        let par = RayonCollection.reduce(items, |a, b| a + b);
        assert_eq!(seq, par);
    }

    #[test]
    fn reduce_over_empty_is_none() {
        let items: Vec<i32> = Vec::new();
        assert_eq!(VecCollection.reduce(items, |a, b| a + b), None);
    }

    #[test]
    fn cross_pairs_every_item_with_the_singleton() {
        let items = vec![1, 2, 3];
        let crossed = VecCollection.cross(items, "tag".to_string());
        assert_eq!(
            crossed,
            vec![
                (1, "tag".to_string()),
                (2, "tag".to_string()),
                (3, "tag".to_string())
            ]
        );
    }
}
