// ---------------------------------------------------------------------------
// Summary statistics shared by the aggregator and the boxplots
// ---------------------------------------------------------------------------

/// max / min / mean / sample standard deviation of one pollutant in one group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PollutantStats {
    /// Number of non-missing values the statistics were computed from.
    pub samples: usize,
    pub max: f64,
    pub min: f64,
    pub mean: f64,
    /// Sample standard deviation (n − 1), `None` below two samples.
    pub std_dev: Option<f64>,
}

impl PollutantStats {
    /// `None` when `values` is empty.
    pub fn compute(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let n = values.len();
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let mean = values.iter().sum::<f64>() / n as f64;
        let std_dev = (n >= 2).then(|| {
            let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
            (ss / (n - 1) as f64).sqrt()
        });
        Some(PollutantStats {
            samples: n,
            max,
            min,
            mean,
            std_dev,
        })
    }
}

/// Linear-interpolated quantile of an ascending slice, `q` in `[0, 1]`.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

pub fn sort_values(values: &mut [f64]) {
    values.sort_by(|a, b| a.total_cmp(b));
}

// ---------------------------------------------------------------------------
// Box-and-whisker summary
// ---------------------------------------------------------------------------

/// Tukey box: quartiles plus whiskers at 1.5 × IQR.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxSummary {
    pub count: usize,
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
    /// Values beyond the whiskers, ascending.
    pub outliers: Vec<f64>,
}

impl BoxSummary {
    pub fn compute(values: &[f64]) -> Option<Self> {
        let mut sorted = values.to_vec();
        sort_values(&mut sorted);

        let q1 = quantile_sorted(&sorted, 0.25)?;
        let median = quantile_sorted(&sorted, 0.5)?;
        let q3 = quantile_sorted(&sorted, 0.75)?;
        let iqr = q3 - q1;
        let low_fence = q1 - 1.5 * iqr;
        let high_fence = q3 + 1.5 * iqr;

        // Whiskers end at the most extreme points still inside the fences.
        let lower_whisker = sorted
            .iter()
            .copied()
            .find(|v| *v >= low_fence)
            .unwrap_or(q1);
        let upper_whisker = sorted
            .iter()
            .rev()
            .copied()
            .find(|v| *v <= high_fence)
            .unwrap_or(q3);
        let outliers = sorted
            .iter()
            .copied()
            .filter(|v| *v < low_fence || *v > high_fence)
            .collect();

        Some(BoxSummary {
            count: sorted.len(),
            lower_whisker,
            q1,
            median,
            q3,
            upper_whisker,
            outliers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_sample_statistics() {
        let stats = PollutantStats::compute(&[800.0, 1200.0]).unwrap();
        assert_eq!(stats.samples, 2);
        assert_eq!(stats.max, 1200.0);
        assert_eq!(stats.min, 800.0);
        assert_eq!(stats.mean, 1000.0);
        assert!((stats.std_dev.unwrap() - 282.842_712).abs() < 0.01);
    }

    #[test]
    fn single_sample_has_no_std_dev() {
        let stats = PollutantStats::compute(&[42.0]).unwrap();
        assert_eq!(stats.mean, 42.0);
        assert_eq!(stats.std_dev, None);
        assert!(PollutantStats::compute(&[]).is_none());
    }

    #[test]
    fn quantiles_interpolate_linearly() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile_sorted(&sorted, 0.0), Some(1.0));
        assert_eq!(quantile_sorted(&sorted, 0.5), Some(2.5));
        assert_eq!(quantile_sorted(&sorted, 0.25), Some(1.75));
        assert_eq!(quantile_sorted(&sorted, 1.0), Some(4.0));
        assert_eq!(quantile_sorted(&[], 0.5), None);
    }

    #[test]
    fn box_summary_separates_outliers() {
        let mut values: Vec<f64> = (1..=9).map(|v| v as f64).collect();
        values.push(100.0);
        let summary = BoxSummary::compute(&values).unwrap();
        assert_eq!(summary.count, 10);
        assert_eq!(summary.median, 5.5);
        assert_eq!(summary.q1, 3.25);
        assert_eq!(summary.q3, 7.75);
        assert_eq!(summary.lower_whisker, 1.0);
        assert_eq!(summary.upper_whisker, 9.0);
        assert_eq!(summary.outliers, vec![100.0]);
    }

    #[test]
    fn box_summary_of_nothing_is_none() {
        assert!(BoxSummary::compute(&[]).is_none());
    }
}
