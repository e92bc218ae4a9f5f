use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};

use super::model::Dataset;
use crate::error::DashboardError;

// ---------------------------------------------------------------------------
// DateInterval – the user's selection
// ---------------------------------------------------------------------------

/// An inclusive range of calendar days, `start <= end` always holds.
///
/// A timestamp belongs to the interval when its *date* falls inside it, so
/// every hour of the end day is included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateInterval {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateInterval {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DashboardError> {
        if start > end {
            return Err(DashboardError::InvalidRange {
                start,
                end,
                reason: "start date is after end date".to_string(),
            });
        }
        Ok(DateInterval { start, end })
    }

    #[cfg(test)]
    pub fn single_day(day: NaiveDate) -> Self {
        DateInterval {
            start: day,
            end: day,
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, timestamp: &NaiveDateTime) -> bool {
        let date = timestamp.date();
        self.start <= date && date <= self.end
    }
}

impl fmt::Display for DateInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} – {}", self.start, self.end)
    }
}

// ---------------------------------------------------------------------------
// RangeSelector – bounds for the date pickers
// ---------------------------------------------------------------------------

/// Selection bounds derived from a loaded dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeSelector {
    pub min_date: NaiveDate,
    pub max_date: NaiveDate,
}

impl RangeSelector {
    pub fn new(dataset: &Dataset) -> Self {
        RangeSelector {
            min_date: dataset.min_timestamp.date(),
            max_date: dataset.max_timestamp.date(),
        }
    }

    /// The whole observed range.
    pub fn full(&self) -> DateInterval {
        DateInterval {
            start: self.min_date,
            end: self.max_date,
        }
    }

    /// Turn the picker values into an interval.
    ///
    /// Unset endpoints default to the bounds. An inverted pair is rejected
    /// as-is, never swapped. Endpoints outside the bounds are clamped, and
    /// a selection that misses the bounds entirely is rejected.
    pub fn select(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<DateInterval, DashboardError> {
        let start = start.unwrap_or(self.min_date);
        let end = end.unwrap_or(self.max_date);

        DateInterval::new(start, end)?;

        if end < self.min_date || start > self.max_date {
            return Err(DashboardError::InvalidRange {
                start,
                end,
                reason: format!(
                    "data is only available from {} to {}",
                    self.min_date, self.max_date
                ),
            });
        }

        let clamped = DateInterval {
            start: start.max(self.min_date),
            end: end.min(self.max_date),
        };
        if clamped.start != start || clamped.end != end {
            log::info!("Clamped selection {start} – {end} to {clamped}");
        }
        Ok(clamped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn selector() -> RangeSelector {
        RangeSelector {
            min_date: date(2013, 3, 1),
            max_date: date(2017, 2, 28),
        }
    }

    #[test]
    fn defaults_to_full_bounds() {
        let interval = selector().select(None, None).unwrap();
        assert_eq!(interval, selector().full());
        let half = selector().select(Some(date(2015, 1, 1)), None).unwrap();
        assert_eq!(half.end(), date(2017, 2, 28));
    }

    #[test]
    fn inverted_range_is_rejected_not_swapped() {
        let err = selector()
            .select(Some(date(2016, 1, 2)), Some(date(2016, 1, 1)))
            .unwrap_err();
        assert!(matches!(err, DashboardError::InvalidRange { .. }));
        assert!(DateInterval::new(date(2016, 1, 2), date(2016, 1, 1)).is_err());
    }

    #[test]
    fn out_of_bounds_endpoints_are_clamped() {
        let interval = selector()
            .select(Some(date(2010, 1, 1)), Some(date(2020, 1, 1)))
            .unwrap();
        assert_eq!(interval, selector().full());
    }

    #[test]
    fn disjoint_range_is_rejected() {
        let err = selector()
            .select(Some(date(2018, 1, 1)), Some(date(2018, 6, 1)))
            .unwrap_err();
        assert!(matches!(err, DashboardError::InvalidRange { .. }));
    }

    #[test]
    fn end_day_is_inclusive() {
        let interval = DateInterval::single_day(date(2014, 7, 4));
        let late = date(2014, 7, 4).and_hms_opt(23, 0, 0).unwrap();
        let next = date(2014, 7, 5).and_hms_opt(0, 0, 0).unwrap();
        assert!(interval.contains(&late));
        assert!(!interval.contains(&next));
    }
}
