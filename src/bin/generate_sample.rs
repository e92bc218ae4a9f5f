//! Write a synthetic hourly air-quality table for offline use.
//!
//! Usage: `generate_sample [output.csv|output.parquet] [seed]`

use std::f64::consts::TAU;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Timelike};
use parquet::arrow::ArrowWriter;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const POLLUTANTS: [&str; 6] = ["PM2.5", "PM10", "SO2", "NO2", "CO", "O3"];

/// Station name and a multiplier for its overall pollution level.
const STATIONS: [(&str, f64); 4] = [
    ("Guanyuan", 1.0),
    ("Wanshouxigong", 1.1),
    ("Dongsi", 1.05),
    ("Dingling", 0.7),
];

/// Typical hourly concentration per pollutant (µg/m³).
const BASELINE: [f64; 6] = [80.0, 105.0, 16.0, 50.0, 1200.0, 58.0];

const MISSING_RATE: f64 = 0.02;
const SPIKE_RATE: f64 = 0.002;

struct Row {
    no: i64,
    year: i64,
    month: i64,
    day: i64,
    hour: i64,
    station: &'static str,
    values: [Option<f64>; 6],
}

/// Box-Muller transform for normal distribution
fn gauss(rng: &mut StdRng, mean: f64, std_dev: f64) -> f64 {
    let u1 = rng.gen::<f64>().max(1e-15);
    let u2 = rng.gen::<f64>();
    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    mean + std_dev * z
}

fn generate(rng: &mut StdRng, start: NaiveDateTime) -> Vec<Row> {
    let hours = 4 * 365 * 24;

    let mut rows = Vec::with_capacity(hours * STATIONS.len());
    for &(station, level) in &STATIONS {
        // `No` restarts for every station, as in the published files.
        for h in 0..hours {
            let ts = start + Duration::hours(h as i64);
            // Winter heating season and evening traffic push levels up.
            let season = 1.0 + 0.4 * (TAU * ts.ordinal() as f64 / 365.0).cos();
            let daily = 1.0 + 0.2 * (TAU * (ts.hour() as f64 - 19.0) / 24.0).cos();

            let mut values = [None; 6];
            for (slot, base) in values.iter_mut().zip(BASELINE) {
                if rng.gen_bool(MISSING_RATE) {
                    continue;
                }
                let mean = base * level * season * daily;
                let mut v = gauss(rng, mean, mean * 0.35).max(base * 0.02);
                if rng.gen_bool(SPIKE_RATE) {
                    v *= 6.0;
                }
                *slot = Some((v * 10.0).round() / 10.0);
            }

            rows.push(Row {
                no: h as i64 + 1,
                year: ts.year() as i64,
                month: ts.month() as i64,
                day: ts.day() as i64,
                hour: ts.hour() as i64,
                station,
                values,
            });
        }
    }
    rows
}

fn write_csv(rows: &[Row], path: &str) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV")?;
    let mut header = vec!["No", "year", "month", "day", "hour"];
    header.extend(POLLUTANTS);
    header.push("station");
    writer.write_record(&header)?;

    for row in rows {
        let mut record = vec![
            row.no.to_string(),
            row.year.to_string(),
            row.month.to_string(),
            row.day.to_string(),
            row.hour.to_string(),
        ];
        record.extend(
            row.values
                .iter()
                .map(|v| v.map(|v| v.to_string()).unwrap_or_else(|| "NA".to_string())),
        );
        record.push(row.station.to_string());
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

fn int_column(rows: &[Row], f: fn(&Row) -> i64) -> ArrayRef {
    Arc::new(Int64Array::from(rows.iter().map(f).collect::<Vec<_>>()))
}

fn write_parquet(rows: &[Row], path: &str) -> Result<()> {
    let mut fields = vec![
        Field::new("No", DataType::Int64, false),
        Field::new("year", DataType::Int64, false),
        Field::new("month", DataType::Int64, false),
        Field::new("day", DataType::Int64, false),
        Field::new("hour", DataType::Int64, false),
    ];
    let mut columns: Vec<ArrayRef> = vec![
        int_column(rows, |r| r.no),
        int_column(rows, |r| r.year),
        int_column(rows, |r| r.month),
        int_column(rows, |r| r.day),
        int_column(rows, |r| r.hour),
    ];
    for (i, name) in POLLUTANTS.iter().enumerate() {
        fields.push(Field::new(*name, DataType::Float64, true));
        columns.push(Arc::new(Float64Array::from(
            rows.iter().map(|r| r.values[i]).collect::<Vec<_>>(),
        )));
    }
    fields.push(Field::new("station", DataType::Utf8, false));
    columns.push(Arc::new(StringArray::from(
        rows.iter().map(|r| r.station).collect::<Vec<_>>(),
    )));

    let schema = Arc::new(Schema::new(fields));
    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;

    let file = std::fs::File::create(path).context("creating output file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating writer")?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let output = args.next().unwrap_or_else(|| "sample_air_quality.csv".to_string());
    let seed = match args.next() {
        Some(s) => s.parse().context("seed must be an unsigned integer")?,
        None => 42,
    };

    let start = NaiveDate::from_ymd_opt(2013, 3, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .context("invalid start date")?;
    let mut rng = StdRng::seed_from_u64(seed);
    let rows = generate(&mut rng, start);

    if output.ends_with(".parquet") || output.ends_with(".pq") {
        write_parquet(&rows, &output)?;
    } else {
        write_csv(&rows, &output)?;
    }

    println!(
        "Wrote {} hourly rows for {} stations to {output}",
        rows.len(),
        STATIONS.len()
    );
    Ok(())
}
