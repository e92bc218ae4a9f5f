use chrono::NaiveDate;
use thiserror::Error;

/// Everything that can go wrong between fetching the dataset and drawing it.
///
/// Only `DataUnavailable`, `MissingColumn` and `Malformed` abort a load.
/// The rest are collected as notices and shown next to the charts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DashboardError {
    #[error("data source {locator} is unavailable: {reason}")]
    DataUnavailable { locator: String, reason: String },

    #[error("data source is missing the required column '{column}'")]
    MissingColumn { column: String },

    #[error("row {row}: {reason}")]
    Malformed { row: usize, reason: String },

    #[error("row {row}: {year}-{month:02}-{day:02} {hour:02}h is not a valid date-time")]
    InvalidDate {
        row: usize,
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
    },

    #[error("invalid date range {start} – {end}: {reason}")]
    InvalidRange {
        start: NaiveDate,
        end: NaiveDate,
        reason: String,
    },

    #[error("no {what} rows for {group}")]
    EmptyGroup { what: String, group: String },
}

impl DashboardError {
    pub fn unavailable(locator: impl Into<String>, reason: impl ToString) -> Self {
        DashboardError::DataUnavailable {
            locator: locator.into(),
            reason: reason.to_string(),
        }
    }

    /// Whether the session can keep going after this error.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            DashboardError::DataUnavailable { .. }
                | DashboardError::MissingColumn { .. }
                | DashboardError::Malformed { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_date_message_names_the_row() {
        let err = DashboardError::InvalidDate {
            row: 7,
            year: 2013,
            month: 3,
            day: 1,
            hour: 24,
        };
        assert_eq!(
            err.to_string(),
            "row 7: 2013-03-01 24h is not a valid date-time"
        );
        assert!(!err.is_fatal());
    }

    #[test]
    fn fetch_failures_are_fatal() {
        let err = DashboardError::unavailable("https://example.invalid/a.csv", "timeout");
        assert!(err.is_fatal());
        assert!(err.to_string().contains("timeout"));
    }
}
