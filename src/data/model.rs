use std::collections::BTreeSet;
use std::fmt;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::Deserialize;

use crate::error::DashboardError;

// ---------------------------------------------------------------------------
// Pollutant – a measured concentration column
// ---------------------------------------------------------------------------

/// The pollutant columns of the hourly air-quality table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
pub enum Pollutant {
    #[serde(rename = "PM2.5")]
    Pm25,
    #[serde(rename = "PM10")]
    Pm10,
    #[serde(rename = "SO2")]
    So2,
    #[serde(rename = "NO2")]
    No2,
    #[serde(rename = "CO")]
    Co,
    #[serde(rename = "O3")]
    O3,
}

impl Pollutant {
    pub const ALL: [Pollutant; 6] = [
        Pollutant::Pm25,
        Pollutant::Pm10,
        Pollutant::So2,
        Pollutant::No2,
        Pollutant::Co,
        Pollutant::O3,
    ];

    /// Header name in the source table.
    pub fn column(self) -> &'static str {
        match self {
            Pollutant::Pm25 => "PM2.5",
            Pollutant::Pm10 => "PM10",
            Pollutant::So2 => "SO2",
            Pollutant::No2 => "NO2",
            Pollutant::Co => "CO",
            Pollutant::O3 => "O3",
        }
    }

    /// Whether a source without this column is rejected at load time.
    pub fn is_required(self) -> bool {
        !matches!(self, Pollutant::Pm25 | Pollutant::O3)
    }
}

impl fmt::Display for Pollutant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

// ---------------------------------------------------------------------------
// Record – one station-hour
// ---------------------------------------------------------------------------

/// Concentrations measured during one hour. `None` marks a missing cell.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Measurements {
    pub pm25: Option<f64>,
    pub pm10: Option<f64>,
    pub so2: Option<f64>,
    pub no2: Option<f64>,
    pub co: Option<f64>,
    pub o3: Option<f64>,
}

impl Measurements {
    pub fn get(&self, pollutant: Pollutant) -> Option<f64> {
        match pollutant {
            Pollutant::Pm25 => self.pm25,
            Pollutant::Pm10 => self.pm10,
            Pollutant::So2 => self.so2,
            Pollutant::No2 => self.no2,
            Pollutant::Co => self.co,
            Pollutant::O3 => self.o3,
        }
    }

    pub fn set(&mut self, pollutant: Pollutant, value: Option<f64>) {
        let slot = match pollutant {
            Pollutant::Pm25 => &mut self.pm25,
            Pollutant::Pm10 => &mut self.pm10,
            Pollutant::So2 => &mut self.so2,
            Pollutant::No2 => &mut self.no2,
            Pollutant::Co => &mut self.co,
            Pollutant::O3 => &mut self.o3,
        };
        *slot = value;
    }
}

/// One hourly observation at one station.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Row identifier from the source, only used for distinct counts.
    pub no: i64,
    pub station: String,
    pub timestamp: NaiveDateTime,
    pub measurements: Measurements,
}

/// Un-validated calendar fields as they appear in the source table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawDateTime {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
}

impl RawDateTime {
    /// Combine the four fields into a timestamp, `row` is only used for the error.
    pub fn to_timestamp(self, row: usize) -> Result<NaiveDateTime, DashboardError> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
            .and_then(|date| date.and_hms_opt(self.hour, 0, 0))
            .ok_or(DashboardError::InvalidDate {
                row,
                year: self.year,
                month: self.month,
                day: self.day,
                hour: self.hour,
            })
    }
}

impl Record {
    pub fn year(&self) -> i32 {
        self.timestamp.year()
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed table. Never mutated after load.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// All valid rows in source order.
    pub records: Vec<Record>,
    pub min_timestamp: NaiveDateTime,
    pub max_timestamp: NaiveDateTime,
    /// Sorted distinct station names.
    pub stations: BTreeSet<String>,
    /// Rows dropped because their date fields do not form a valid date-time.
    pub rejected: Vec<DashboardError>,
}

impl Dataset {
    /// Build bounds and the station index. Fails when no valid row is left.
    pub fn from_records(
        records: Vec<Record>,
        rejected: Vec<DashboardError>,
        locator: &str,
    ) -> Result<Self, DashboardError> {
        let (Some(min_timestamp), Some(max_timestamp)) = (
            records.iter().map(|r| r.timestamp).min(),
            records.iter().map(|r| r.timestamp).max(),
        ) else {
            return Err(DashboardError::unavailable(
                locator,
                format!("no valid rows ({} rejected)", rejected.len()),
            ));
        };

        let stations = records.iter().map(|r| r.station.clone()).collect();

        Ok(Dataset {
            records,
            min_timestamp,
            max_timestamp,
            stations,
            rejected,
        })
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }
}
