use std::collections::BTreeMap;

use super::isolation::IsolationForest;
use super::stats::BoxSummary;
use crate::data::model::{Dataset, Pollutant};
use crate::data::range::DateInterval;
use crate::error::DashboardError;

/// All stations within an interval, with anomalous readings removed.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredComparison {
    pub pollutant: Pollutant,
    /// Indices into `Dataset::records` kept after filtering.
    pub retained: Vec<usize>,
    /// Indices the detector flagged.
    pub flagged: Vec<usize>,
    /// Rows in the interval whose value was missing, never fitted.
    pub missing: usize,
    /// Distribution of retained values per (year, station).
    pub groups: BTreeMap<(i32, String), BoxSummary>,
}

impl FilteredComparison {
    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.groups.keys().map(|(y, _)| *y).collect();
        years.dedup();
        years
    }
}

/// Fit a fresh detector on `pollutant` within `interval` and drop what it flags.
///
/// Rows without a value for `pollutant` are counted in `missing` and left out.
pub fn filter_outliers(
    dataset: &Dataset,
    interval: &DateInterval,
    pollutant: Pollutant,
    detector: &IsolationForest,
) -> Result<FilteredComparison, DashboardError> {
    let mut missing = 0;
    let mut rows = Vec::new();
    let mut values = Vec::new();
    for (idx, record) in dataset.records.iter().enumerate() {
        if !interval.contains(&record.timestamp) {
            continue;
        }
        match record.measurements.get(pollutant) {
            Some(v) => {
                rows.push(idx);
                values.push(v);
            }
            None => missing += 1,
        }
    }

    let forest = detector
        .fit(&values)
        .ok_or_else(|| DashboardError::EmptyGroup {
            what: pollutant.to_string(),
            group: format!("any station between {interval}"),
        })?;

    let mut retained = Vec::with_capacity(rows.len());
    let mut flagged = Vec::new();
    let mut grouped: BTreeMap<(i32, String), Vec<f64>> = BTreeMap::new();
    for ((&idx, &value), anomalous) in rows.iter().zip(&values).zip(forest.training_anomalies()) {
        if anomalous {
            flagged.push(idx);
            continue;
        }
        retained.push(idx);
        let record = &dataset.records[idx];
        grouped
            .entry((record.year(), record.station.clone()))
            .or_default()
            .push(value);
    }

    log::info!(
        "{pollutant}: kept {} of {} readings in {interval} ({} flagged, {missing} missing)",
        retained.len(),
        rows.len(),
        flagged.len()
    );

    let groups = grouped
        .into_iter()
        .filter_map(|(key, vals)| BoxSummary::compute(&vals).map(|b| (key, b)))
        .collect();

    Ok(FilteredComparison {
        pollutant,
        retained,
        flagged,
        missing,
        groups,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::record;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn detector() -> IsolationForest {
        IsolationForest {
            seed: Some(11),
            ..IsolationForest::default()
        }
    }

    fn dataset() -> Dataset {
        let mut records = Vec::new();
        let mut no = 0;
        for (station, base) in [("Guanyuan", 60.0), ("Dongsi", 90.0)] {
            for year in [2014, 2015] {
                for day in 1..=28 {
                    for hour in [0, 6, 12, 18] {
                        no += 1;
                        let wobble = ((no * 37) % 41) as f64;
                        records.push(record(
                            no,
                            station,
                            (year, 2, day, hour),
                            None,
                            Some(base + wobble),
                        ));
                    }
                }
            }
        }
        no += 1;
        records.push(record(no, "Dongsi", (2015, 2, 14, 3), None, Some(9000.0)));
        no += 1;
        records.push(record(no, "Dongsi", (2015, 2, 14, 4), None, None));
        Dataset::from_records(records, Vec::new(), "memory").unwrap()
    }

    #[test]
    fn removes_spike_and_groups_by_year_and_station() {
        let ds = dataset();
        let interval = DateInterval::new(date(2014, 1, 1), date(2015, 12, 31)).unwrap();
        let result = filter_outliers(&ds, &interval, Pollutant::Pm10, &detector()).unwrap();

        let spike = ds.len() - 2;
        assert!(result.flagged.contains(&spike));
        assert!(!result.retained.contains(&spike));
        assert_eq!(result.missing, 1);
        assert_eq!(result.retained.len() + result.flagged.len(), ds.len() - 1);

        let retained_share = result.retained.len() as f64 / (ds.len() - 1) as f64;
        assert!(retained_share >= 0.98);

        assert_eq!(result.years(), vec![2014, 2015]);
        assert_eq!(result.groups.len(), 4);
        let dongsi = &result.groups[&(2015, "Dongsi".to_string())];
        assert!(dongsi.upper_whisker < 9000.0);
    }

    #[test]
    fn interval_restricts_rows() {
        let ds = dataset();
        let interval = DateInterval::single_day(date(2014, 2, 1));
        let result = filter_outliers(&ds, &interval, Pollutant::Pm10, &detector()).unwrap();
        assert_eq!(result.retained.len() + result.flagged.len(), 8);
        assert_eq!(result.years(), vec![2014]);
    }

    #[test]
    fn empty_interval_is_an_empty_group() {
        let ds = dataset();
        let interval = DateInterval::single_day(date(2016, 2, 1));
        let err = filter_outliers(&ds, &interval, Pollutant::Pm10, &detector()).unwrap_err();
        assert!(matches!(err, DashboardError::EmptyGroup { .. }));
    }

    #[test]
    fn extreme_finite_readings_are_filtered_without_panicking() {
        let text = "No,year,month,day,hour,PM10,SO2,NO2,CO,station\n\
                    1,2014,1,1,0,1e308,4,7,300,Guanyuan\n\
                    2,2014,1,1,1,-1e308,4,7,300,Guanyuan\n\
                    3,2014,1,1,2,50,4,7,300,Dongsi\n";
        let ds = crate::data::loader::read_csv(text.as_bytes(), "inline").unwrap();
        let interval = DateInterval::new(date(2014, 1, 1), date(2014, 1, 1)).unwrap();
        let detector = IsolationForest {
            seed: Some(1),
            ..IsolationForest::default()
        };
        let result = filter_outliers(&ds, &interval, Pollutant::Pm10, &detector).unwrap();
        assert_eq!(result.retained.len() + result.flagged.len(), 3);
        assert_eq!(result.missing, 0);
    }
}
