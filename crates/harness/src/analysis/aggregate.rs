//! Reduction of raw samples into per-configuration means

use std::collections::BTreeMap;

use serde::Serialize;

use super::AnalysisError;
use crate::results::RawResultSet;

/// Mean elapsed seconds per key (trial index or thread count)
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AggregatedResult(BTreeMap<u32, f64>);

impl AggregatedResult {
    pub fn get(&self, key: u32) -> Option<f64> {
        self.0.get(&key).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries in ascending key order
    pub fn iter(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }

    pub fn into_inner(self) -> BTreeMap<u32, f64> {
        self.0
    }
}

impl FromIterator<(u32, f64)> for AggregatedResult {
    fn from_iter<I: IntoIterator<Item = (u32, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<BTreeMap<u32, f64>> for AggregatedResult {
    fn from(map: BTreeMap<u32, f64>) -> Self {
        Self(map)
    }
}

/// Reduce a raw result set to one mean per key
///
/// Sequential sets map each trial to its own sample. Threaded sets map each
/// thread count to the mean of the trials collected for it, however many that is.
pub fn aggregate(results: &RawResultSet) -> Result<AggregatedResult, AnalysisError> {
    if results.is_empty() {
        return Err(AnalysisError::NoSamples { key: None });
    }

    match results {
        RawResultSet::Sequential(samples) => samples
            .iter()
            .map(|(&trial, &seconds)| -> Result<(u32, f64), AnalysisError> {
                check_sample(trial, seconds)?;
                Ok((trial, seconds))
            })
            .collect(),
        RawResultSet::Threaded(samples) => samples
            .iter()
            .map(|(&threads, trials)| -> Result<(u32, f64), AnalysisError> {
                for &seconds in trials {
                    check_sample(threads, seconds)?;
                }
                let average = mean(trials).ok_or(AnalysisError::NoSamples {
                    key: Some(threads),
                })?;
                Ok((threads, average))
            })
            .collect(),
    }
}

/// Arithmetic mean over every sample in the set
///
/// For a sequential set this is the baseline the speedups are measured against.
pub fn baseline_mean(results: &RawResultSet) -> Result<f64, AnalysisError> {
    let samples: Vec<f64> = match results {
        RawResultSet::Sequential(samples) => {
            for (&trial, &seconds) in samples {
                check_sample(trial, seconds)?;
            }
            samples.values().copied().collect()
        }
        RawResultSet::Threaded(samples) => {
            for (&threads, trials) in samples {
                for &seconds in trials {
                    check_sample(threads, seconds)?;
                }
            }
            samples.values().flatten().copied().collect()
        }
    };

    mean(&samples).ok_or(AnalysisError::NoSamples { key: None })
}

/// Execution times must be strictly positive and finite
fn check_sample(key: u32, seconds: f64) -> Result<(), AnalysisError> {
    if seconds.is_finite() && seconds > 0.0 {
        Ok(())
    } else {
        Err(AnalysisError::InvalidTiming {
            key: Some(key),
            value: seconds,
        })
    }
}

fn mean(samples: &[f64]) -> Option<f64> {
    if samples.is_empty() {
        None
    } else {
        Some(samples.iter().sum::<f64>() / samples.len() as f64)
    }
}
