use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::stats::PollutantStats;
use crate::data::model::{Dataset, Pollutant, Record};
use crate::data::range::DateInterval;

// ---------------------------------------------------------------------------
// Per-year aggregation for one station
// ---------------------------------------------------------------------------

/// Summary of one station's rows within one calendar year.
#[derive(Debug, Clone, PartialEq)]
pub struct YearStats {
    pub year: i32,
    pub rows: usize,
    /// Count of distinct `No` identifiers.
    pub distinct_ids: usize,
    /// Pollutants without any non-missing value this year are absent.
    pub pollutants: BTreeMap<Pollutant, PollutantStats>,
}

/// Year → statistics for one station over one interval.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregationResult {
    pub station: String,
    pub years: BTreeMap<i32, YearStats>,
}

impl AggregationResult {
    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }
}

/// Group `station`'s rows inside `interval` (or all rows when `None`) by year.
///
/// Missing pollutant values are left out of that pollutant's statistics.
pub fn aggregate(
    dataset: &Dataset,
    interval: Option<&DateInterval>,
    station: &str,
    pollutants: &[Pollutant],
) -> AggregationResult {
    let mut groups: BTreeMap<i32, Vec<&Record>> = BTreeMap::new();
    for record in &dataset.records {
        if record.station != station {
            continue;
        }
        if let Some(interval) = interval {
            if !interval.contains(&record.timestamp) {
                continue;
            }
        }
        groups.entry(record.year()).or_default().push(record);
    }

    let years = groups
        .into_iter()
        .map(|(year, rows)| {
            let distinct_ids = rows.iter().map(|r| r.no).collect::<BTreeSet<_>>().len();
            let pollutants = pollutants
                .iter()
                .filter_map(|&p| {
                    let values: Vec<f64> =
                        rows.iter().filter_map(|r| r.measurements.get(p)).collect();
                    PollutantStats::compute(&values).map(|s| (p, s))
                })
                .collect();
            let stats = YearStats {
                year,
                rows: rows.len(),
                distinct_ids,
                pollutants,
            };
            (year, stats)
        })
        .collect();

    AggregationResult {
        station: station.to_string(),
        years,
    }
}

// ---------------------------------------------------------------------------
// Chart statistics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measure {
    Max,
    Min,
    Mean,
    StdDev,
}

impl Measure {
    pub const ALL: [Measure; 4] = [Measure::Max, Measure::Min, Measure::Mean, Measure::StdDev];

    fn name(self) -> &'static str {
        match self {
            Measure::Max => "max",
            Measure::Min => "min",
            Measure::Mean => "mean",
            Measure::StdDev => "std",
        }
    }
}

/// One aggregated column, charted as a line per station.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Statistic {
    DistinctCount,
    Pollutant(Pollutant, Measure),
}

impl Statistic {
    /// Distinct count first, then max/min/mean/std for each pollutant in order.
    pub fn for_pollutants(pollutants: &[Pollutant]) -> Vec<Statistic> {
        std::iter::once(Statistic::DistinctCount)
            .chain(pollutants.iter().flat_map(|&p| {
                Measure::ALL
                    .into_iter()
                    .map(move |m| Statistic::Pollutant(p, m))
            }))
            .collect()
    }

    pub fn value(&self, stats: &YearStats) -> Option<f64> {
        match *self {
            Statistic::DistinctCount => Some(stats.distinct_ids as f64),
            Statistic::Pollutant(p, measure) => {
                let s = stats.pollutants.get(&p)?;
                match measure {
                    Measure::Max => Some(s.max),
                    Measure::Min => Some(s.min),
                    Measure::Mean => Some(s.mean),
                    Measure::StdDev => s.std_dev,
                }
            }
        }
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statistic::DistinctCount => write!(f, "No (distinct)"),
            Statistic::Pollutant(p, m) => write!(f, "{p} {}", m.name()),
        }
    }
}

// ---------------------------------------------------------------------------
// Station comparison
// ---------------------------------------------------------------------------

/// The same aggregation run for each station of interest.
#[derive(Debug, Clone, PartialEq)]
pub struct StationComparison {
    pub statistics: Vec<Statistic>,
    pub results: Vec<AggregationResult>,
}

impl StationComparison {
    /// `[year, value]` points for one station, undefined values skipped.
    pub fn series(&self, statistic: Statistic, result: &AggregationResult) -> Vec<[f64; 2]> {
        result
            .years
            .values()
            .filter_map(|y| statistic.value(y).map(|v| [y.year as f64, v]))
            .collect()
    }

    /// Stations with no rows in the interval.
    pub fn empty_stations(&self) -> impl Iterator<Item = &str> {
        self.results
            .iter()
            .filter(|r| r.is_empty())
            .map(|r| r.station.as_str())
    }
}

pub fn compare_stations(
    dataset: &Dataset,
    interval: Option<&DateInterval>,
    stations: &[String],
    pollutants: &[Pollutant],
) -> StationComparison {
    let results = stations
        .iter()
        .map(|s| aggregate(dataset, interval, s, pollutants))
        .collect();
    StationComparison {
        statistics: Statistic::for_pollutants(pollutants),
        results,
    }
}
