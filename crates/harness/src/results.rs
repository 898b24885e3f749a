//! Raw timing samples collected by a sweep

use std::collections::BTreeMap;

use serde::Serialize;

use crate::mode::ExecutionMode;

/// Raw timing samples for one execution mode
///
/// Serializes to the bare JSON map stored in the result artifact: trial index to
/// seconds for sequential runs, thread count to per-trial seconds otherwise.
/// Deserialization is mode-directed, see [`crate::store::ResultStore::read`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RawResultSet {
    /// Trial index (0-based) to elapsed seconds
    Sequential(BTreeMap<u32, f64>),
    /// Thread count to elapsed seconds, one entry per trial in trial order
    Threaded(BTreeMap<u32, Vec<f64>>),
}

impl RawResultSet {
    /// Empty result set shaped for `mode`
    pub fn empty(mode: ExecutionMode) -> Self {
        if mode.is_threaded() {
            Self::Threaded(BTreeMap::new())
        } else {
            Self::Sequential(BTreeMap::new())
        }
    }

    /// Whether this set has the shape `mode` produces
    pub fn matches_mode(&self, mode: ExecutionMode) -> bool {
        matches!(
            (self, mode.is_threaded()),
            (Self::Sequential(_), false) | (Self::Threaded(_), true)
        )
    }

    /// Record one sample
    ///
    /// For sequential sets `key` is the trial index; for threaded sets it is the
    /// thread count and the sample is appended after earlier trials.
    pub fn record(&mut self, key: u32, seconds: f64) {
        match self {
            Self::Sequential(samples) => {
                samples.insert(key, seconds);
            }
            Self::Threaded(samples) => samples.entry(key).or_default().push(seconds),
        }
    }

    /// Number of keys (trials or thread counts)
    pub fn len(&self) -> usize {
        match self {
            Self::Sequential(samples) => samples.len(),
            Self::Threaded(samples) => samples.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total number of timing samples across all keys
    pub fn sample_count(&self) -> usize {
        match self {
            Self::Sequential(samples) => samples.len(),
            Self::Threaded(samples) => samples.values().map(Vec::len).sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_threaded_keeps_trial_order() {
        let mut set = RawResultSet::empty(ExecutionMode::Parallel);
        set.record(4, 2.0);
        set.record(2, 5.0);
        set.record(4, 2.5);

        let RawResultSet::Threaded(samples) = &set else {
            panic!("expected threaded set");
        };
        assert_eq!(samples[&4], vec![2.0, 2.5]);
        assert_eq!(samples[&2], vec![5.0]);
        assert_eq!(set.len(), 2);
        assert_eq!(set.sample_count(), 3);
    }

    #[test]
    fn test_matches_mode() {
        let seq = RawResultSet::empty(ExecutionMode::Sequential);
        assert!(seq.matches_mode(ExecutionMode::Sequential));
        assert!(!seq.matches_mode(ExecutionMode::WorkStealing));

        let ws = RawResultSet::empty(ExecutionMode::WorkStealing);
        assert!(ws.matches_mode(ExecutionMode::Parallel));
        assert!(ws.is_empty());
    }

    #[test]
    fn test_serializes_keys_as_text() {
        let mut set = RawResultSet::empty(ExecutionMode::Sequential);
        set.record(0, 10.0);
        set.record(1, 11.5);

        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"{"0":10.0,"1":11.5}"#);
    }
}
