//! The sink the network-wide results are emitted into.

use serde::Serialize;

use crate::accumulators::{Histogram, LogHistogram};

/// A 2-D point cloud, sorted by `x`.
pub type Points = Vec<(f64, f64)>;

/// A single emitted statistic.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum StatValue {
    Integer(i64),
    Scalar(f64),
    Histogram(Histogram),
    LogHistogram(LogHistogram),
    Points(Points),
}

impl StatValue {
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Self::Scalar(value) => Some(*value),
            Self::Integer(value) => Some(*value as f64),
            _ => None,
        }
    }

    pub fn as_histogram(&self) -> Option<&Histogram> {
        match self {
            Self::Histogram(histogram) => Some(histogram),
            _ => None,
        }
    }

    pub fn as_points(&self) -> Option<&Points> {
        match self {
            Self::Points(points) => Some(points),
            _ => None,
        }
    }
}

/// An ordered, write-once collection of named statistics.
///
/// The names are a stable contract with the reporting and plotting code consuming them.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Statistics {
    entries: Vec<(String, StatValue)>,
}

impl Statistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a statistic, returns `false` and leaves the existing value untouched if the name
    /// was already recorded.
    ///
    /// # Examples
    ///
    /// ```
    /// use netanalyzer::statistics::{StatValue, Statistics};
    ///
    /// let mut stats = Statistics::new();
    ///
    /// assert!(stats.set("diameter", StatValue::Integer(2)));
    /// assert!(!stats.set("diameter", StatValue::Integer(3)));
    /// assert_eq!(stats.integer("diameter"), Some(2));
    /// ```
    pub fn set(&mut self, name: &str, value: StatValue) -> bool {
        if self.contains(name) {
            return false;
        }

        self.entries.push((name.to_string(), value));
        true
    }

    pub fn set_integer(&mut self, name: &str, value: i64) -> bool {
        self.set(name, StatValue::Integer(value))
    }

    pub fn set_scalar(&mut self, name: &str, value: f64) -> bool {
        self.set(name, StatValue::Scalar(value))
    }

    pub fn get(&self, name: &str) -> Option<&StatValue> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn integer(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(StatValue::as_integer)
    }

    pub fn scalar(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(StatValue::as_scalar)
    }

    pub fn histogram(&self, name: &str) -> Option<&Histogram> {
        self.get(name).and_then(StatValue::as_histogram)
    }

    pub fn points(&self, name: &str) -> Option<&Points> {
        self.get(name).and_then(StatValue::as_points)
    }

    /// The statistic names in emission order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StatValue)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serializes the statistics to JSON, keeping the emission order.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_once() {
        let mut stats = Statistics::new();

        assert!(stats.set_scalar("cc", 0.5));
        assert!(!stats.set_scalar("cc", 1.0));
        assert_eq!(stats.scalar("cc"), Some(0.5));
        assert_eq!(stats.len(), 1);
    }

    #[test]
    fn typed_lookups() {
        let mut stats = Statistics::new();
        let mut histogram = Histogram::default();
        histogram.increment(1);

        stats.set_integer("ncc", 2);
        stats.set("degreeDist", StatValue::Histogram(histogram.clone()));
        stats.set("cksDist", StatValue::Points(vec![(2.0, 1.0)]));

        assert_eq!(stats.integer("ncc"), Some(2));
        assert_eq!(stats.scalar("ncc"), Some(2.0));
        assert_eq!(stats.integer("degreeDist"), None);
        assert_eq!(stats.histogram("degreeDist"), Some(&histogram));
        assert_eq!(stats.points("cksDist"), Some(&vec![(2.0, 1.0)]));
        assert_eq!(stats.get("radius"), None);

        assert_eq!(
            stats.names().collect::<Vec<_>>(),
            vec!["ncc", "degreeDist", "cksDist"]
        );
    }

    #[test]
    fn json_keeps_order() {
        let mut stats = Statistics::new();
        stats.set_integer("nodeCount", 3);
        stats.set_scalar("cc", 0.25);

        assert_eq!(
            stats.to_json().unwrap(),
            r#"[["nodeCount",{"type":"integer","value":3}],["cc",{"type":"scalar","value":0.25}]]"#
        );
    }
}
