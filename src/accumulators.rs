//! Small accumulators the analyzer builds its statistics from.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::statistics::Points;

/// Rounds `value` to `digits` decimal places.
///
/// Values that can't be scaled without losing integer precision, as well as `NaN` and the
/// infinities, are returned unchanged. Rounding an already rounded value is a no-op.
///
/// # Examples
///
/// ```
/// use netanalyzer::accumulators::round_to;
///
/// assert_eq!(round_to(2.0 / 3.0, 8), 0.66666667);
/// assert_eq!(round_to(round_to(2.0 / 3.0, 8), 8), 0.66666667);
/// ```
pub fn round_to(value: f64, digits: u32) -> f64 {
    // 2^53, past this every f64 is already an integer.
    const EXACT: f64 = 9_007_199_254_740_992.0;

    if !value.is_finite() {
        return value;
    }

    let factor = 10f64.powi(digits as i32);
    let scaled = value * factor;
    if !scaled.is_finite() || scaled.abs() >= EXACT {
        return value;
    }

    scaled.round() / factor
}

/// An online `(sum, count)` accumulator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct SumCountPair {
    sum: f64,
    count: u64,
}

impl SumCountPair {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    pub fn sum(&self) -> f64 {
        self.sum
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    /// The mean of the values added so far, `0.0` if none were.
    pub fn average(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }
}

/// `SumCountPair`s bucketed by an integer key, typically a node's neighbour count.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Buckets {
    buckets: BTreeMap<usize, SumCountPair>,
}

impl Buckets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, key: usize, value: f64) {
        self.buckets.entry(key).or_default().add(value);
    }

    pub fn merge(&mut self, other: &Self) {
        for (&key, pair) in &other.buckets {
            let entry = self.buckets.entry(key).or_default();
            entry.sum += pair.sum;
            entry.count += pair.count;
        }
    }

    /// The number of distinct keys.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Maps each key to the rounded mean of its bucket.
    pub fn to_points(&self, digits: u32) -> Points {
        self.buckets
            .iter()
            .map(|(&key, pair)| (key as f64, round_to(pair.average(), digits)))
            .collect()
    }
}

/// Frequencies of small non-negative integer values, indexed by the value itself.
///
/// The range grows when a larger value is recorded.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Histogram {
    counts: Vec<u64>,
}

impl Histogram {
    pub fn increment(&mut self, value: usize) {
        self.add(value, 1);
    }

    pub fn add(&mut self, value: usize, count: u64) {
        if value >= self.counts.len() {
            self.counts.resize(value + 1, 0);
        }
        self.counts[value] += count;
    }

    /// The count recorded for `value`.
    pub fn get(&self, value: usize) -> u64 {
        self.counts.get(value).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Adds the other histogram's counts to this one.
    pub fn merge(&mut self, other: &Self) {
        for (value, &count) in other.counts.iter().enumerate() {
            if count > 0 {
                self.add(value, count);
            }
        }
    }

    /// The sparse `(value, count)` pairs for every nonzero count.
    ///
    /// # Examples
    ///
    /// ```
    /// use netanalyzer::accumulators::Histogram;
    ///
    /// let mut histogram = Histogram::default();
    /// histogram.increment(1);
    /// histogram.increment(3);
    /// histogram.increment(3);
    ///
    /// assert_eq!(histogram.to_points(), vec![(1.0, 1.0), (3.0, 2.0)]);
    /// ```
    pub fn to_points(&self) -> Points {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, &count)| count > 0)
            .map(|(value, &count)| (value as f64, count as f64))
            .collect()
    }
}

/// Frequencies of possibly very large non-negative values, grouped into power-of-two bins.
///
/// Bin `0` holds the value `0`, bin `i > 0` holds the values in `[2^(i-1), 2^i)`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LogHistogram {
    bins: Vec<u64>,
}

impl LogHistogram {
    pub fn new() -> Self {
        Self::default()
    }

    /// The bin a value falls into.
    pub fn bin_of(value: u64) -> usize {
        (u64::BITS - value.leading_zeros()) as usize
    }

    /// The smallest value held by a bin.
    pub fn lower_bound(bin: usize) -> u64 {
        if bin == 0 {
            0
        } else {
            1 << (bin - 1)
        }
    }

    pub fn increment(&mut self, value: u64) {
        self.add(value, 1);
    }

    pub fn add(&mut self, value: u64, count: u64) {
        let bin = Self::bin_of(value);
        if bin >= self.bins.len() {
            self.bins.resize(bin + 1, 0);
        }
        self.bins[bin] += count;
    }

    pub fn total(&self) -> u64 {
        self.bins.iter().sum()
    }

    pub fn merge(&mut self, other: &Self) {
        if other.bins.len() > self.bins.len() {
            self.bins.resize(other.bins.len(), 0);
        }
        for (bin, &count) in other.bins.iter().enumerate() {
            self.bins[bin] += count;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// The sparse `(lower bound, count)` pairs for every nonzero bin.
    pub fn to_points(&self) -> Points {
        self.bins
            .iter()
            .enumerate()
            .filter(|(_, &count)| count > 0)
            .map(|(bin, &count)| (Self::lower_bound(bin) as f64, count as f64))
            .collect()
    }
}

/// Running aggregate of the shortest path lengths found from a single source.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PathLengthData {
    count: u64,
    total: u64,
    max: usize,
}

impl PathLengthData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, length: usize) {
        self.count += 1;
        self.total += length as u64;
        self.max = self.max.max(length);
    }

    /// The number of nodes reached.
    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// The longest distance recorded, the source's eccentricity.
    pub fn max(&self) -> usize {
        self.max
    }

    /// The mean distance to the reached nodes, `0.0` if none were reached.
    pub fn average(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total as f64 / self.count as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding() {
        assert_eq!(round_to(0.123456789, 8), 0.12345679);
        assert_eq!(round_to(1.0, 8), 1.0);
        assert_eq!(round_to(-0.5, 0), -1.0);
        assert!(round_to(f64::NAN, 8).is_nan());
        assert_eq!(round_to(f64::INFINITY, 8), f64::INFINITY);

        // Too large to scale, returned as is.
        assert_eq!(round_to(1e300, 8), 1e300);
    }

    #[test]
    fn rounding_is_idempotent() {
        for value in [1.0 / 3.0, 2.0 / 7.0, 0.1 + 0.2, 12345.678901234, 1e-9, -7.000000005] {
            let once = round_to(value, 8);
            assert_eq!(round_to(once, 8), once);
        }
    }

    #[test]
    fn sum_count_pair() {
        let mut pair = SumCountPair::new();
        assert_eq!(pair.average(), 0.0);

        pair.add(1.0);
        pair.add(2.0);

        assert_eq!(pair.sum(), 3.0);
        assert_eq!(pair.count(), 2);
        assert_eq!(pair.average(), 1.5);
    }

    #[test]
    fn buckets() {
        let mut buckets = Buckets::new();
        buckets.add(2, 1.0);
        buckets.add(2, 0.0);
        buckets.add(3, 1.0 / 3.0);

        let mut other = Buckets::new();
        other.add(3, 1.0 / 3.0);
        buckets.merge(&other);

        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets.to_points(8), vec![(2.0, 0.5), (3.0, 0.33333333)]);
    }

    #[test]
    fn histogram() {
        let mut histogram = Histogram::default();
        assert!(histogram.is_empty());

        histogram.increment(0);
        histogram.increment(5);

        assert_eq!(histogram.get(5), 1);
        assert_eq!(histogram.get(9), 0);
        assert_eq!(histogram.total(), 2);

        let mut other = Histogram::default();
        other.add(5, 2);
        histogram.merge(&other);

        assert_eq!(histogram.to_points(), vec![(0.0, 1.0), (5.0, 3.0)]);
    }

    #[test]
    fn log_histogram() {
        assert_eq!(LogHistogram::bin_of(0), 0);
        assert_eq!(LogHistogram::bin_of(1), 1);
        assert_eq!(LogHistogram::bin_of(2), 2);
        assert_eq!(LogHistogram::bin_of(3), 2);
        assert_eq!(LogHistogram::bin_of(4), 3);
        assert_eq!(LogHistogram::lower_bound(3), 4);

        let mut histogram = LogHistogram::new();
        for value in [0, 1, 2, 3, 1000] {
            histogram.increment(value);
        }

        assert_eq!(
            histogram.to_points(),
            vec![(0.0, 1.0), (1.0, 1.0), (2.0, 2.0), (512.0, 1.0)]
        );
    }

    #[test]
    fn path_length_data() {
        let mut data = PathLengthData::new();
        assert_eq!(data.average(), 0.0);
        assert_eq!(data.max(), 0);

        data.add(1);
        data.add(1);
        data.add(2);

        assert_eq!(data.count(), 3);
        assert_eq!(data.total(), 4);
        assert_eq!(data.max(), 2);
        assert_eq!(data.average(), 4.0 / 3.0);
    }
}
