use crate::analysis::aggregate::{StationComparison, compare_stations};
use crate::analysis::outliers::{FilteredComparison, filter_outliers};
use crate::config::DashboardConfig;
use crate::data::model::Dataset;
use crate::data::range::DateInterval;
use crate::error::DashboardError;

/// Everything the central panel draws for one selected interval.
#[derive(Debug, Clone)]
pub struct DashboardReport {
    pub interval: DateInterval,
    pub comparison: StationComparison,
    /// `None` when the outlier stage had nothing to work with.
    pub pollution: Option<FilteredComparison>,
    /// Non-fatal problems to show next to the charts.
    pub notices: Vec<DashboardError>,
}

/// Run the aggregation and outlier stages from scratch.
///
/// Stage errors end up in `notices`; this never fails.
pub fn run(dataset: &Dataset, interval: DateInterval, config: &DashboardConfig) -> DashboardReport {
    let mut notices = Vec::new();

    let comparison = compare_stations(
        dataset,
        Some(&interval),
        &config.stations,
        &config.pollutants,
    );
    for station in comparison.empty_stations() {
        notices.push(DashboardError::EmptyGroup {
            what: "station".to_string(),
            group: format!("{station} between {interval}"),
        });
    }

    let pollution = match filter_outliers(
        dataset,
        &interval,
        config.outlier_pollutant,
        &config.detector.forest(),
    ) {
        Ok(filtered) => Some(filtered),
        Err(e) => {
            notices.push(e);
            None
        }
    };

    for notice in &notices {
        log::warn!("{notice}");
    }

    DashboardReport {
        interval,
        comparison,
        pollution,
        notices,
    }
}
