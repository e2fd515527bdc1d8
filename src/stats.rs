//! Per-country row counts accumulated over a run, with a merge helper.

use std::collections::BTreeMap;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Statistics {
    counts: BTreeMap<String, u64>,
}

impl Statistics {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn record(&mut self, country: &str) {
        *self.counts.entry(country.to_string()).or_insert(0) += 1;
    }

    pub fn get(&self, country: &str) -> u64 {
        self.counts.get(country).copied().unwrap_or(0)
    }

    /// Sum over all countries; equals the number of data rows written.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Countries in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn merge(&mut self, other: &Statistics) {
        for (k, v) in &other.counts {
            *self.counts.entry(k.clone()).or_insert(0) += v;
        }
    }
}
