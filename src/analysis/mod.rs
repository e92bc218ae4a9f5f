/// Analysis layer: everything computed from a `Dataset` and a `DateInterval`.
///
/// - `stats`    : summary statistics, quantiles and box summaries.
/// - `aggregate`: per-station, per-year pollutant statistics.
/// - `isolation`: seedable one-dimensional isolation forest.
/// - `outliers` : interval filter + forest + per-(year, station) boxes.

pub mod aggregate;
pub mod isolation;
pub mod outliers;
pub mod stats;
