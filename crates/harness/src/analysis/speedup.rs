//! Speedup relative to the sequential baseline

use serde::Serialize;

use super::{AggregatedResult, AnalysisError};

/// Speedup measured at one thread count
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpeedupPoint {
    pub threads: u32,
    pub speedup: f64,
}

/// Speedup per thread count, ascending by thread count
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SpeedupCurve(Vec<SpeedupPoint>);

impl SpeedupCurve {
    pub fn points(&self) -> &[SpeedupPoint] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Speedup at `threads`, if measured
    pub fn at(&self, threads: u32) -> Option<f64> {
        self.0
            .iter()
            .find(|p| p.threads == threads)
            .map(|p| p.speedup)
    }

    pub fn max_speedup(&self) -> Option<f64> {
        self.0.iter().map(|p| p.speedup).reduce(f64::max)
    }

    /// Smallest and largest thread count on the curve
    pub fn thread_range(&self) -> Option<(u32, u32)> {
        Some((self.0.first()?.threads, self.0.last()?.threads))
    }
}

/// Speedup of each configuration: `baseline / mean`
///
/// Both the baseline and every mean must be strictly positive.
pub fn speedup(baseline: f64, means: &AggregatedResult) -> Result<SpeedupCurve, AnalysisError> {
    if !(baseline.is_finite() && baseline > 0.0) {
        return Err(AnalysisError::InvalidTiming {
            key: None,
            value: baseline,
        });
    }

    let mut points = means
        .iter()
        .map(|(threads, mean)| {
            if mean.is_finite() && mean > 0.0 {
                Ok(SpeedupPoint {
                    threads,
                    speedup: baseline / mean,
                })
            } else {
                Err(AnalysisError::InvalidTiming {
                    key: Some(threads),
                    value: mean,
                })
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    // Chart x-axis order must not depend on map iteration order
    points.sort_by_key(|p| p.threads);

    Ok(SpeedupCurve(points))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speedup_pairs() {
        let means: AggregatedResult = [(4, 2.5), (2, 5.0)].into_iter().collect();
        let curve = speedup(10.0, &means).unwrap();

        assert_eq!(
            curve.points(),
            &[
                SpeedupPoint {
                    threads: 2,
                    speedup: 2.0
                },
                SpeedupPoint {
                    threads: 4,
                    speedup: 4.0
                },
            ]
        );
        assert_eq!(curve.thread_range(), Some((2, 4)));
        assert_eq!(curve.max_speedup(), Some(4.0));
    }

    #[test]
    fn test_one_pair_per_configuration() {
        let means: AggregatedResult = [(2, 7.1), (4, 3.3), (6, 2.9), (8, 2.2), (12, 1.9)]
            .into_iter()
            .collect();
        let baseline = 12.4;
        let curve = speedup(baseline, &means).unwrap();

        assert_eq!(curve.len(), means.len());
        for (threads, mean) in means.iter() {
            assert_eq!(curve.at(threads), Some(baseline / mean));
        }
    }

    #[test]
    fn test_smaller_mean_means_larger_speedup() {
        let means: AggregatedResult = [(2, 6.0), (4, 3.0), (8, 4.5)].into_iter().collect();
        let curve = speedup(9.0, &means).unwrap();

        let mut by_mean: Vec<(f64, f64)> = means
            .iter()
            .map(|(t, m)| (m, curve.at(t).unwrap()))
            .collect();
        by_mean.sort_by(|a, b| a.0.total_cmp(&b.0));
        for pair in by_mean.windows(2) {
            assert!(pair[0].1 > pair[1].1);
        }
    }

    #[test]
    fn test_zero_baseline_is_invalid() {
        let means: AggregatedResult = [(2, 5.0)].into_iter().collect();
        assert!(matches!(
            speedup(0.0, &means),
            Err(AnalysisError::InvalidTiming { key: None, .. })
        ));
        assert!(speedup(-1.0, &means).is_err());
        assert!(speedup(f64::NAN, &means).is_err());
    }

    #[test]
    fn test_non_positive_mean_is_invalid() {
        let means: AggregatedResult = [(2, 5.0), (4, 0.0)].into_iter().collect();
        assert!(matches!(
            speedup(10.0, &means),
            Err(AnalysisError::InvalidTiming { key: Some(4), .. })
        ));

        let means: AggregatedResult = [(8, -2.0)].into_iter().collect();
        assert!(speedup(10.0, &means).is_err());
    }

    #[test]
    fn test_empty_means_give_empty_curve() {
        let curve = speedup(10.0, &AggregatedResult::default()).unwrap();
        assert!(curve.is_empty());
        assert_eq!(curve.thread_range(), None);
    }
}
