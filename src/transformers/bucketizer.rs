//! Quantile bucketizer: learns `n_buckets - 1` cut points from the observed
//! distribution (via a t-digest) and emits a one-hot block over which
//! bucket a value falls into. `B` is the running digest; `C` is the frozen,
//! ascending list of cut points.
//!
//! The digest implementation below follows Ted Dunning's "Computing
//! Extremely Accurate Quantiles Using t-Digests", kept here as a
//! self-contained accumulator rather than a streaming combiner.

use std::collections::BTreeMap;

use ordered_float::OrderedFloat;

use crate::aggregator::Aggregator;
use crate::builder::FeatureBuilder;
use crate::transformer::Transformer;

use super::{decode_f64_list, encode_f64_list};

#[derive(Clone, Debug)]
struct Centroid {
    mean: f64,
    weight: f64,
}

/// A t-digest accumulator: bounded-memory approximate quantiles.
#[derive(Clone, Debug)]
pub struct TDigest {
    compression: f64,
    centroids: Vec<Centroid>,
    total_weight: f64,
    min: f64,
    max: f64,
}

impl TDigest {
    #[must_use]
    pub const fn new(compression: f64) -> Self {
        Self {
            compression,
            centroids: Vec::new(),
            total_weight: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    pub fn add(&mut self, value: f64) {
        if !value.is_finite() {
            return;
        }
        self.min = self.min.min(value);
        self.max = self.max.max(value);
        self.centroids.push(Centroid { mean: value, weight: 1.0 });
        self.total_weight += 1.0;
        if self.centroids.len() as f64 > self.compression * 2.0 {
            self.compress();
        }
    }

    pub fn merge(&mut self, other: &Self) {
        if other.total_weight == 0.0 {
            return;
        }
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
        self.centroids.extend(other.centroids.iter().cloned());
        self.total_weight += other.total_weight;
        self.compress();
    }

    fn compress(&mut self) {
        if self.centroids.is_empty() {
            return;
        }
        self.centroids.sort_by_key(|c| OrderedFloat(c.mean));

        let mut compressed = Vec::new();
        let mut cumulative_weight = 0.0;
        let mut current = self.centroids[0].clone();

        for centroid in self.centroids.iter().skip(1) {
            let proposed_weight = current.weight + centroid.weight;
            let q0 = cumulative_weight / self.total_weight;
            let q1 = (cumulative_weight + proposed_weight) / self.total_weight;
            let k_limit = self.k_size(q0).min(self.k_size(q1));

            if proposed_weight <= k_limit {
                current.mean = current.mean.mul_add(current.weight, centroid.mean * centroid.weight)
                    / proposed_weight;
                current.weight = proposed_weight;
            } else {
                cumulative_weight += current.weight;
                compressed.push(current);
                current = centroid.clone();
            }
        }
        compressed.push(current);
        self.centroids = compressed;
    }

    fn k_size(&self, q: f64) -> f64 {
        let q = q.clamp(0.0, 1.0);
        (self.compression * q * (1.0 - q) / 2.0).max(1.0)
    }

    #[must_use]
    pub fn quantile(&self, q: f64) -> f64 {
        if self.centroids.is_empty() {
            return f64::NAN;
        }
        let q = q.clamp(0.0, 1.0);
        if (q - 0.0).abs() <= f64::EPSILON || self.centroids.len() == 1 {
            return self.min;
        }
        if (q - 1.0).abs() <= f64::EPSILON {
            return self.max;
        }
        let target = q * self.total_weight;
        let mut cumulative = 0.0;
        for i in 0..self.centroids.len() {
            let c = &self.centroids[i];
            let next_cumulative = cumulative + c.weight;
            if next_cumulative >= target {
                if (next_cumulative - cumulative).abs() < f64::EPSILON {
                    return c.mean;
                }
                let fraction = (target - cumulative) / c.weight;
                let left = if i == 0 { self.min } else { self.centroids[i - 1].mean };
                let right = if i == self.centroids.len() - 1 {
                    self.max
                } else {
                    self.centroids[i + 1].mean
                };
                return left + fraction * (right - left);
            }
            cumulative = next_cumulative;
        }
        self.max
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total_weight == 0.0
    }
}

/// Bucketizer (quantile binning). `n_buckets` must be at least 1; it learns
/// `n_buckets - 1` ascending cut points and emits an `n_buckets`-wide
/// one-hot row per record.
#[derive(Clone)]
pub struct Bucketizer {
    name: String,
    n_buckets: usize,
    aggregator: Aggregator<f64, TDigest, Vec<f64>>,
}

impl Bucketizer {
    /// # Panics
    /// Panics if `n_buckets` is zero.
    #[must_use]
    pub fn new(name: impl Into<String>, n_buckets: usize) -> Self {
        assert!(n_buckets > 0, "Bucketizer needs at least one bucket");
        let buckets = n_buckets;
        Self {
            name: name.into(),
            n_buckets,
            aggregator: Aggregator::new(
                |x: &f64| {
                    let mut digest = TDigest::new(100.0);
                    digest.add(*x);
                    digest
                },
                |mut a: TDigest, b: TDigest| {
                    a.merge(&b);
                    a
                },
                move |digest: TDigest| {
                    anyhow::ensure!(!digest.is_empty(), "Bucketizer presented with an empty digest");
                    let cuts: Vec<f64> = (1..buckets)
                        .map(|i| digest.quantile(i as f64 / buckets as f64))
                        .collect();
                    Ok(cuts)
                },
            ),
        }
    }
}

impl Transformer<f64, TDigest, Vec<f64>> for Bucketizer {
    fn name(&self) -> &str {
        &self.name
    }

    fn aggregator(&self) -> &Aggregator<f64, TDigest, Vec<f64>> {
        &self.aggregator
    }

    fn feature_dimension(&self, _c: &Vec<f64>) -> usize {
        self.n_buckets
    }

    fn feature_names(&self, _c: &Vec<f64>) -> Vec<String> {
        (0..self.n_buckets).map(|i| format!("{}_bucket{i}", self.name)).collect()
    }

    fn build_features(&self, a: Option<&f64>, c: &Vec<f64>, sink: &mut dyn FeatureBuilder) {
        match a {
            None => sink.skip_n(self.n_buckets),
            Some(x) => {
                let bucket = c.partition_point(|cut| *cut <= *x);
                for i in 0..self.n_buckets {
                    sink.add(&format!("{}_bucket{i}", self.name), if i == bucket { 1.0 } else { 0.0 });
                }
            }
        }
    }

    fn encode_aggregator(&self, c: &Vec<f64>) -> String {
        encode_f64_list(c)
    }

    fn decode_aggregator(&self, s: &str) -> anyhow::Result<Vec<f64>> {
        decode_f64_list(s)
    }

    fn params(&self) -> BTreeMap<String, String> {
        let mut params = BTreeMap::new();
        params.insert("n_buckets".to_string(), self.n_buckets.to_string());
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn learns_cut_points_that_split_a_uniform_sample_into_even_buckets() {
        let t = Bucketizer::new("x", 4);
        let agg = t.aggregator();
        let combined = (1..=100)
            .map(|i| agg.prepare(&f64::from(i)))
            .reduce(|a, b| agg.combine(a, b))
            .unwrap();
        let cuts = agg.present(combined).unwrap();
        assert_eq!(cuts.len(), 3);
        for window in cuts.windows(2) {
            assert!(window[0] <= window[1]);
        }
    }

    #[test]
    fn emits_a_one_hot_row_for_the_matching_bucket() {
        let t = Bucketizer::new("x", 3);
        let cuts = vec![10.0, 20.0];
        struct Collector(Vec<f64>);
        impl crate::builder::FeatureBuilder for Collector {
            fn init(&mut self, _n: usize) {}
            fn prepare(&mut self, _name: &str) {}
            fn add(&mut self, _name: &str, value: f64) {
                self.0.push(value);
            }
            fn skip(&mut self) {
                self.0.push(f64::NAN);
            }
        }
        let mut sink = Collector(Vec::new());
        t.build_features(Some(&25.0), &cuts, &mut sink);
        assert_eq!(sink.0, vec![0.0, 0.0, 1.0]);
    }

    #[test]
    fn missing_value_skips_the_whole_block() {
        let t = Bucketizer::new("x", 3);
        assert_eq!(t.feature_dimension(&vec![10.0, 20.0]), 3);
    }
}
