use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{
    Array, Float32Array, Float64Array, Int32Array, Int64Array, LargeStringArray, StringArray,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{Dataset, Measurements, Pollutant, RawDateTime, Record};
use crate::error::DashboardError;

/// Non-pollutant columns every source must provide.
const KEY_COLUMNS: [&str; 6] = ["No", "year", "month", "day", "hour", "station"];

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load the dataset from a URL or a local file path.
///
/// `http://` and `https://` locators are downloaded and parsed as CSV,
/// anything else is treated as a path and dispatched by extension.
pub fn load_source(locator: &str) -> Result<Dataset, DashboardError> {
    if locator.starts_with("http://") || locator.starts_with("https://") {
        let body = fetch_remote(locator)?;
        read_csv(body.as_bytes(), locator)
    } else {
        load_file(Path::new(locator))
    }
}

/// Load a local snapshot.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – the published table, one row per station-hour
/// * `.parquet` – same columns, integer/float/string typed
/// * `.json`    – `[{ "No": 1, "year": 2013, ..., "PM10": 4.0 }, ...]`
pub fn load_file(path: &Path) -> Result<Dataset, DashboardError> {
    let locator = path.display().to_string();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => {
            let file = std::fs::File::open(path)
                .map_err(|e| DashboardError::unavailable(&locator, e))?;
            read_csv(file, &locator)
        }
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        other => Err(DashboardError::unavailable(
            locator,
            format!("unsupported file extension: .{other}"),
        )),
    }
}

// ---------------------------------------------------------------------------
// Remote fetch
// ---------------------------------------------------------------------------

fn fetch_remote(url: &str) -> Result<String, DashboardError> {
    log::info!("Fetching dataset from {url}");
    let response = reqwest::blocking::get(url).map_err(|e| DashboardError::unavailable(url, e))?;

    if !response.status().is_success() {
        return Err(DashboardError::unavailable(
            url,
            format!("HTTP status {}", response.status()),
        ));
    }

    response.text().map_err(|e| DashboardError::unavailable(url, e))
}

// ---------------------------------------------------------------------------
// Shared row handling
// ---------------------------------------------------------------------------

/// Positions of the known columns inside a header row.
#[derive(Debug, Clone)]
struct ColumnIndex {
    no: usize,
    year: usize,
    month: usize,
    day: usize,
    hour: usize,
    station: usize,
    pollutants: Vec<(Pollutant, usize)>,
}

impl ColumnIndex {
    fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, DashboardError> {
        let find = |column: &str| -> Result<usize, DashboardError> {
            names
                .iter()
                .position(|n| n.as_ref().trim() == column)
                .ok_or_else(|| DashboardError::MissingColumn {
                    column: column.to_string(),
                })
        };

        let [no, year, month, day, hour, station] = KEY_COLUMNS.map(&find);

        let mut pollutants = Vec::new();
        for pollutant in Pollutant::ALL {
            match find(pollutant.column()) {
                Ok(idx) => pollutants.push((pollutant, idx)),
                Err(e) if pollutant.is_required() => return Err(e),
                Err(_) => {}
            }
        }

        Ok(ColumnIndex {
            no: no?,
            year: year?,
            month: month?,
            day: day?,
            hour: hour?,
            station: station?,
            pollutants,
        })
    }
}

/// Accumulates valid records and rejected rows while a source is read.
#[derive(Default)]
struct Collector {
    records: Vec<Record>,
    rejected: Vec<DashboardError>,
}

impl Collector {
    fn push(
        &mut self,
        row: usize,
        no: i64,
        station: String,
        when: RawDateTime,
        measurements: Measurements,
    ) {
        match when.to_timestamp(row) {
            Ok(timestamp) => self.records.push(Record {
                no,
                station,
                timestamp,
                measurements,
            }),
            Err(e) => {
                log::warn!("Skipping row: {e}");
                self.rejected.push(e);
            }
        }
    }

    fn finish(self, locator: &str) -> Result<Dataset, DashboardError> {
        if !self.rejected.is_empty() {
            log::warn!(
                "{} rows of {locator} have invalid date fields and were skipped",
                self.rejected.len()
            );
        }
        let dataset = Dataset::from_records(self.records, self.rejected, locator)?;
        log::info!(
            "Loaded {} records from {locator} ({} – {}, {} stations)",
            dataset.len(),
            dataset.min_timestamp,
            dataset.max_timestamp,
            dataset.stations.len()
        );
        Ok(dataset)
    }
}

fn is_missing(s: &str) -> bool {
    matches!(s, "" | "NA" | "N/A" | "NaN" | "nan" | "null")
}

fn parse_int(s: &str, row: usize, column: &str) -> Result<i64, DashboardError> {
    s.trim().parse::<i64>().map_err(|_| DashboardError::Malformed {
        row,
        reason: format!("'{column}' value '{s}' is not an integer"),
    })
}

fn parse_measurement(s: &str, row: usize, column: &str) -> Result<Option<f64>, DashboardError> {
    let s = s.trim();
    if is_missing(s) {
        return Ok(None);
    }
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Some(v)),
        Ok(_) => Ok(None),
        Err(_) => Err(DashboardError::Malformed {
            row,
            reason: format!("'{column}' value '{s}' is not a number"),
        }),
    }
}

fn to_u32(value: i64, row: usize, column: &str) -> Result<u32, DashboardError> {
    u32::try_from(value).map_err(|_| DashboardError::Malformed {
        row,
        reason: format!("'{column}' value {value} is out of range"),
    })
}

fn to_i32(value: i64, row: usize, column: &str) -> Result<i32, DashboardError> {
    i32::try_from(value).map_err(|_| DashboardError::Malformed {
        row,
        reason: format!("'{column}' value {value} is out of range"),
    })
}

fn raw_date_time(
    year: i64,
    month: i64,
    day: i64,
    hour: i64,
    row: usize,
) -> Result<RawDateTime, DashboardError> {
    Ok(RawDateTime {
        year: to_i32(year, row, "year")?,
        month: to_u32(month, row, "month")?,
        day: to_u32(day, row, "day")?,
        hour: to_u32(hour, row, "hour")?,
    })
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one station-hour per row.
/// Pollutant cells may be empty or `NA`; rows are numbered from 1.
pub fn read_csv<R: Read>(source: R, locator: &str) -> Result<Dataset, DashboardError> {
    let mut reader = csv::Reader::from_reader(source);
    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| DashboardError::unavailable(locator, e))?
        .iter()
        .map(|h| h.to_string())
        .collect();
    let index = ColumnIndex::from_names(&headers)?;

    let mut collector = Collector::default();

    for (i, result) in reader.records().enumerate() {
        let row = i + 1;
        let record = result.map_err(|e| DashboardError::Malformed {
            row,
            reason: e.to_string(),
        })?;
        let cell = |idx: usize| record.get(idx).unwrap_or("");

        let no = parse_int(cell(index.no), row, "No")?;
        let when = raw_date_time(
            parse_int(cell(index.year), row, "year")?,
            parse_int(cell(index.month), row, "month")?,
            parse_int(cell(index.day), row, "day")?,
            parse_int(cell(index.hour), row, "hour")?,
            row,
        )?;

        let mut measurements = Measurements::default();
        for &(pollutant, idx) in &index.pollutants {
            measurements.set(
                pollutant,
                parse_measurement(cell(idx), row, pollutant.column())?,
            );
        }

        collector.push(
            row,
            no,
            cell(index.station).trim().to_string(),
            when,
            measurements,
        );
    }

    collector.finish(locator)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "No": 1, "year": 2013, "month": 3, "day": 1, "hour": 0,
///     "station": "Guanyuan", "PM10": 4.0, "CO": 300.0, "NO2": 7.0, "SO2": 4.0 },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Dataset, DashboardError> {
    let locator = path.display().to_string();
    let text =
        std::fs::read_to_string(path).map_err(|e| DashboardError::unavailable(&locator, e))?;
    read_json(&text, &locator)
}

fn read_json(text: &str, locator: &str) -> Result<Dataset, DashboardError> {
    let root: JsonValue =
        serde_json::from_str(text).map_err(|e| DashboardError::unavailable(locator, e))?;
    let rows = root
        .as_array()
        .ok_or_else(|| DashboardError::unavailable(locator, "expected a top-level JSON array"))?;

    if let Some(first) = rows.first().and_then(|r| r.as_object()) {
        let keys: Vec<&String> = first.keys().collect();
        ColumnIndex::from_names(&keys)?;
    }

    let mut collector = Collector::default();

    for (i, value) in rows.iter().enumerate() {
        let row = i + 1;
        let obj = value.as_object().ok_or_else(|| DashboardError::Malformed {
            row,
            reason: "not a JSON object".to_string(),
        })?;

        let int = |column: &str| -> Result<i64, DashboardError> {
            match obj.get(column) {
                Some(JsonValue::Number(n)) => n.as_i64().ok_or_else(|| DashboardError::Malformed {
                    row,
                    reason: format!("'{column}' value {n} is not an integer"),
                }),
                Some(JsonValue::String(s)) => parse_int(s, row, column),
                _ => Err(DashboardError::Malformed {
                    row,
                    reason: format!("missing '{column}'"),
                }),
            }
        };

        let no = int("No")?;
        let when = raw_date_time(int("year")?, int("month")?, int("day")?, int("hour")?, row)?;
        let station = match obj.get("station") {
            Some(JsonValue::String(s)) => s.trim().to_string(),
            _ => {
                return Err(DashboardError::Malformed {
                    row,
                    reason: "missing 'station'".to_string(),
                })
            }
        };

        let mut measurements = Measurements::default();
        for pollutant in Pollutant::ALL {
            let value = match obj.get(pollutant.column()) {
                Some(JsonValue::Number(n)) => n.as_f64().filter(|v| v.is_finite()),
                Some(JsonValue::String(s)) => parse_measurement(s, row, pollutant.column())?,
                _ => None,
            };
            measurements.set(pollutant, value);
        }

        collector.push(row, no, station, when, measurements);
    }

    collector.finish(locator)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet snapshot with the same columns as the CSV.
///
/// Integer columns may be Int32 or Int64, pollutant columns Float64,
/// Float32 or integer, `station` Utf8 or LargeUtf8. Nulls are missing values.
fn load_parquet(path: &Path) -> Result<Dataset, DashboardError> {
    let locator = path.display().to_string();
    let file =
        std::fs::File::open(path).map_err(|e| DashboardError::unavailable(&locator, e))?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .map_err(|e| DashboardError::unavailable(&locator, e))?;
    let reader = builder
        .build()
        .map_err(|e| DashboardError::unavailable(&locator, e))?;

    let mut collector = Collector::default();
    let mut row = 0;

    for batch_result in reader {
        let batch = batch_result.map_err(|e| DashboardError::unavailable(&locator, e))?;
        let schema = batch.schema();
        let names: Vec<&String> = schema.fields().iter().map(|f| f.name()).collect();
        let index = ColumnIndex::from_names(&names)?;

        for i in 0..batch.num_rows() {
            row += 1;
            let int = |idx: usize, column: &str| extract_i64(batch.column(idx), i, row, column);

            let no = int(index.no, "No")?;
            let when = raw_date_time(
                int(index.year, "year")?,
                int(index.month, "month")?,
                int(index.day, "day")?,
                int(index.hour, "hour")?,
                row,
            )?;
            let station = extract_string(batch.column(index.station), i, row)?;

            let mut measurements = Measurements::default();
            for &(pollutant, idx) in &index.pollutants {
                measurements.set(pollutant, extract_f64(batch.column(idx), i));
            }

            collector.push(row, no, station, when, measurements);
        }
    }

    collector.finish(&locator)
}

// -- Parquet / Arrow helpers --

fn extract_i64(
    col: &Arc<dyn Array>,
    i: usize,
    row: usize,
    column: &str,
) -> Result<i64, DashboardError> {
    let malformed = |reason: String| DashboardError::Malformed { row, reason };
    if col.is_null(i) {
        return Err(malformed(format!("'{column}' is null")));
    }
    match col.data_type() {
        DataType::Int32 => col
            .as_any()
            .downcast_ref::<Int32Array>()
            .map(|a| a.value(i) as i64),
        DataType::Int64 => col.as_any().downcast_ref::<Int64Array>().map(|a| a.value(i)),
        _ => None,
    }
    .ok_or_else(|| {
        malformed(format!(
            "'{column}' has type {:?}, expected an integer",
            col.data_type()
        ))
    })
}

fn extract_string(col: &Arc<dyn Array>, i: usize, row: usize) -> Result<String, DashboardError> {
    if col.is_null(i) {
        return Err(DashboardError::Malformed {
            row,
            reason: "'station' is null".to_string(),
        });
    }
    match col.data_type() {
        DataType::Utf8 => col
            .as_any()
            .downcast_ref::<StringArray>()
            .map(|a| a.value(i).trim().to_string()),
        DataType::LargeUtf8 => col
            .as_any()
            .downcast_ref::<LargeStringArray>()
            .map(|a| a.value(i).trim().to_string()),
        _ => None,
    }
    .ok_or_else(|| DashboardError::Malformed {
        row,
        reason: format!("'station' has type {:?}, expected a string", col.data_type()),
    })
}

/// Numeric cell as `f64`; nulls, NaN and non-numeric types are missing.
fn extract_f64(col: &Arc<dyn Array>, i: usize) -> Option<f64> {
    if col.is_null(i) {
        return None;
    }
    let any = col.as_any();
    let value = match col.data_type() {
        DataType::Float64 => any.downcast_ref::<Float64Array>().map(|a| a.value(i)),
        DataType::Float32 => any.downcast_ref::<Float32Array>().map(|a| a.value(i) as f64),
        DataType::Int64 => any.downcast_ref::<Int64Array>().map(|a| a.value(i) as f64),
        DataType::Int32 => any.downcast_ref::<Int32Array>().map(|a| a.value(i) as f64),
        _ => None,
    };
    value.filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{ArrayRef, LargeStringArray};
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    const HEADER: &str = "No,year,month,day,hour,PM2.5,PM10,SO2,NO2,CO,O3,TEMP,station\n";

    fn csv(rows: &[&str]) -> String {
        let mut s = HEADER.to_string();
        for r in rows {
            s.push_str(r);
            s.push('\n');
        }
        s
    }

    #[test]
    fn parses_rows_and_missing_values() {
        let text = csv(&[
            "1,2013,3,1,0,4,4,4,7,300,77,-0.7,Guanyuan",
            "2,2013,3,1,1,NA,,3,NA,300,80,-1.1,Guanyuan",
        ]);
        let ds = read_csv(text.as_bytes(), "inline").unwrap();
        assert_eq!(ds.len(), 2);
        let first = &ds.records[0];
        assert_eq!(first.no, 1);
        assert_eq!(first.station, "Guanyuan");
        assert_eq!(first.measurements.co, Some(300.0));
        assert_eq!(first.measurements.o3, Some(77.0));
        let second = &ds.records[1];
        assert_eq!(second.measurements.pm25, None);
        assert_eq!(second.measurements.pm10, None);
        assert_eq!(second.measurements.no2, None);
        assert_eq!(second.timestamp.to_string(), "2013-03-01 01:00:00");
    }

    #[test]
    fn missing_required_column_fails_fast() {
        let text = "No,year,month,day,hour,PM10,SO2,CO,station\n1,2013,3,1,0,4,4,300,Guanyuan\n";
        let err = read_csv(text.as_bytes(), "inline").unwrap_err();
        assert_eq!(
            err,
            DashboardError::MissingColumn {
                column: "NO2".to_string()
            }
        );
    }

    #[test]
    fn optional_pollutant_columns_may_be_absent() {
        let text =
            "No,year,month,day,hour,PM10,SO2,NO2,CO,station\n1,2013,3,1,0,4,4,7,300,Dongsi\n";
        let ds = read_csv(text.as_bytes(), "inline").unwrap();
        assert_eq!(ds.records[0].measurements.pm25, None);
        assert_eq!(ds.records[0].measurements.o3, None);
    }

    #[test]
    fn invalid_dates_are_skipped_and_reported() {
        let text = csv(&[
            "1,2013,3,1,0,4,4,4,7,300,77,0,Guanyuan",
            "2,2013,3,1,24,4,4,4,7,300,77,0,Guanyuan",
            "3,2013,2,30,5,4,4,4,7,300,77,0,Guanyuan",
        ]);
        let ds = read_csv(text.as_bytes(), "inline").unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.rejected.len(), 2);
        assert!(matches!(
            ds.rejected[0],
            DashboardError::InvalidDate { row: 2, hour: 24, .. }
        ));
    }

    #[test]
    fn non_numeric_key_fields_are_malformed() {
        let text = csv(&["1,twenty,3,1,0,4,4,4,7,300,77,0,Guanyuan"]);
        let err = read_csv(text.as_bytes(), "inline").unwrap_err();
        assert!(matches!(err, DashboardError::Malformed { row: 1, .. }));
    }

    #[test]
    fn all_rows_invalid_means_no_data() {
        let text = csv(&["1,2013,13,1,0,4,4,4,7,300,77,0,Guanyuan"]);
        let err = read_csv(text.as_bytes(), "inline").unwrap_err();
        assert!(matches!(err, DashboardError::DataUnavailable { .. }));
    }

    #[test]
    fn json_records_are_loaded() {
        let text = r#"[
            {"No": 1, "year": 2014, "month": 5, "day": 2, "hour": 7, "station": "Aotizhongxin",
             "PM10": 33.0, "SO2": 2, "NO2": "NA", "CO": 500.0},
            {"No": 2, "year": 2014, "month": 5, "day": 2, "hour": 8, "station": "Aotizhongxin",
             "PM10": null, "SO2": 3, "NO2": 10, "CO": "600"}
        ]"#;
        let ds = read_json(text, "inline.json").unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[0].measurements.no2, None);
        assert_eq!(ds.records[0].measurements.so2, Some(2.0));
        assert_eq!(ds.records[1].measurements.pm10, None);
        assert_eq!(ds.records[1].measurements.co, Some(600.0));
    }

    #[test]
    fn unknown_extension_is_unavailable() {
        let err = load_file(Path::new("data/air.xlsx")).unwrap_err();
        assert!(matches!(err, DashboardError::DataUnavailable { .. }));
    }

    #[test]
    fn missing_local_file_is_unavailable() {
        let err = load_source("/definitely/not/here.csv").unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn csv_file_round_trips_through_load_file() {
        let path = std::env::temp_dir().join(format!(
            "air-quality-loader-{}.csv",
            std::process::id()
        ));
        std::fs::write(&path, csv(&["9,2016,12,31,23,4,4,4,7,300,77,0,Guanyuan"])).unwrap();
        let ds = load_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(ds.records[0].no, 9);
        assert_eq!(ds.max_timestamp.to_string(), "2016-12-31 23:00:00");
    }

    fn write_parquet(name: &str, columns: Vec<(&str, ArrayRef)>) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!(
            "air-quality-{name}-{}.parquet",
            std::process::id()
        ));
        let fields: Vec<Field> = columns
            .iter()
            .map(|(n, a)| Field::new(*n, a.data_type().clone(), true))
            .collect();
        let schema = Arc::new(Schema::new(fields));
        let batch =
            RecordBatch::try_new(schema.clone(), columns.into_iter().map(|(_, a)| a).collect())
                .unwrap();
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();
        path
    }

    fn key_columns(years: Vec<i32>) -> Vec<(&'static str, ArrayRef)> {
        let n = years.len();
        let no: Vec<i64> = (1..=n as i64).collect();
        vec![
            ("No", Arc::new(Int64Array::from(no)) as ArrayRef),
            ("year", Arc::new(Int32Array::from(years)) as ArrayRef),
            ("month", Arc::new(Int64Array::from(vec![3; n])) as ArrayRef),
            ("day", Arc::new(Int64Array::from(vec![1; n])) as ArrayRef),
            ("hour", Arc::new(Int32Array::from((0..n as i32).collect::<Vec<_>>())) as ArrayRef),
        ]
    }

    #[test]
    fn parquet_columns_of_mixed_types_are_loaded() {
        let mut columns = key_columns(vec![2013, 2013, 2014]);
        columns.extend([
            (
                "PM10",
                Arc::new(Float64Array::from(vec![Some(4.0), None, Some(18.5)])) as ArrayRef,
            ),
            ("SO2", Arc::new(Int32Array::from(vec![4, 3, 5])) as ArrayRef),
            ("NO2", Arc::new(Float32Array::from(vec![7.5, 8.0, 9.25])) as ArrayRef),
            ("CO", Arc::new(Float64Array::from(vec![300.0, f64::NAN, 500.0])) as ArrayRef),
            (
                "station",
                Arc::new(LargeStringArray::from(vec![
                    "Guanyuan ",
                    "Guanyuan",
                    "Wanshouxigong",
                ])) as ArrayRef,
            ),
        ]);
        let path = write_parquet("mixed", columns);
        let ds = load_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(ds.len(), 3);
        let first = &ds.records[0];
        assert_eq!(first.no, 1);
        assert_eq!(first.station, "Guanyuan");
        assert_eq!(first.timestamp.to_string(), "2013-03-01 00:00:00");
        assert_eq!(first.measurements.pm10, Some(4.0));
        assert_eq!(first.measurements.so2, Some(4.0));
        assert_eq!(first.measurements.no2, Some(7.5));
        assert_eq!(first.measurements.pm25, None);

        let second = &ds.records[1];
        assert_eq!(second.measurements.pm10, None);
        assert_eq!(second.measurements.co, None);
        assert_eq!(second.timestamp.to_string(), "2013-03-01 01:00:00");

        assert_eq!(ds.records[2].year(), 2014);
        assert_eq!(ds.records[2].measurements.no2, Some(9.25));
        assert_eq!(ds.stations.len(), 2);
    }

    #[test]
    fn parquet_null_key_is_malformed() {
        let mut columns = key_columns(vec![2013, 2013]);
        columns[3] = ("day", Arc::new(Int64Array::from(vec![Some(1), None])) as ArrayRef);
        columns.extend([
            ("PM10", Arc::new(Float64Array::from(vec![4.0, 5.0])) as ArrayRef),
            ("SO2", Arc::new(Float64Array::from(vec![4.0, 5.0])) as ArrayRef),
            ("NO2", Arc::new(Float64Array::from(vec![7.0, 8.0])) as ArrayRef),
            ("CO", Arc::new(Float64Array::from(vec![300.0, 400.0])) as ArrayRef),
            ("station", Arc::new(StringArray::from(vec!["Dongsi", "Dongsi"])) as ArrayRef),
        ]);
        let path = write_parquet("null-key", columns);
        let err = load_file(&path).unwrap_err();
        std::fs::remove_file(&path).ok();

        match err {
            DashboardError::Malformed { row, reason } => {
                assert_eq!(row, 2);
                assert!(reason.contains("'day' is null"), "{reason}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn parquet_without_required_column_fails_fast() {
        let mut columns = key_columns(vec![2015]);
        columns.extend([
            ("PM10", Arc::new(Float64Array::from(vec![4.0])) as ArrayRef),
            ("NO2", Arc::new(Float64Array::from(vec![7.0])) as ArrayRef),
            ("CO", Arc::new(Float64Array::from(vec![300.0])) as ArrayRef),
            ("station", Arc::new(StringArray::from(vec!["Dongsi"])) as ArrayRef),
        ]);
        let path = write_parquet("no-so2", columns);
        let err = load_file(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert_eq!(
            err,
            DashboardError::MissingColumn {
                column: "SO2".to_string()
            }
        );
    }
}
