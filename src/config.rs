use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::analysis::isolation::IsolationForest;
use crate::data::model::Pollutant;

/// Published hourly readings of the Beijing multi-site air-quality dataset.
pub const DEFAULT_SOURCE: &str = "https://docs.google.com/spreadsheets/d/e/2PACX-1vQTcwsuCjwd0SPQzb1ks6K9Gh26MOhhY_m-2yyQ0JeE_SOeEGT2F1wgiFVEdX50C3sIQY9r4wbpIQ7u/pub?gid=1662792157&single=true&output=csv";

pub const CONFIG_PATH_ENV: &str = "AIR_QUALITY_CONFIG";
pub const SOURCE_ENV: &str = "AIR_QUALITY_SOURCE";
const DEFAULT_CONFIG_FILE: &str = "dashboard.json";

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DetectorConfig {
    pub n_trees: usize,
    pub sample_size: usize,
    pub contamination: f64,
    pub seed: Option<u64>,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        let forest = IsolationForest::default();
        DetectorConfig {
            n_trees: forest.n_trees,
            sample_size: forest.sample_size,
            contamination: forest.contamination,
            seed: forest.seed,
        }
    }
}

impl DetectorConfig {
    pub fn forest(&self) -> IsolationForest {
        IsolationForest {
            n_trees: self.n_trees,
            sample_size: self.sample_size,
            contamination: self.contamination,
            seed: self.seed,
        }
    }
}

/// Everything the dashboard can be told from outside. Every field is optional
/// in the JSON file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    /// URL or local path of the hourly table.
    pub source: String,
    /// Stations compared in the line charts.
    pub stations: Vec<String>,
    /// Pollutants aggregated per year.
    pub pollutants: Vec<Pollutant>,
    /// Column the outlier filter and boxplot use.
    pub outlier_pollutant: Pollutant,
    pub detector: DetectorConfig,
    pub title: String,
    pub caption: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            source: DEFAULT_SOURCE.to_string(),
            stations: vec!["Guanyuan".to_string(), "Wanshouxigong".to_string()],
            pollutants: vec![Pollutant::Co, Pollutant::No2, Pollutant::So2],
            outlier_pollutant: Pollutant::Pm10,
            detector: DetectorConfig::default(),
            title: "Air Quality Dashboard ☁".to_string(),
            caption: "Data: Beijing Multi-Site Air-Quality dataset (UCI). Copyright (c) 2023"
                .to_string(),
        }
    }
}

impl DashboardConfig {
    /// Read the JSON file named by `AIR_QUALITY_CONFIG`, else `dashboard.json`
    /// when it exists, else defaults. `AIR_QUALITY_SOURCE` then overrides the source.
    pub fn load() -> Result<Self> {
        let explicit = std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from);
        let mut config = match explicit {
            Some(path) => Self::from_file(&path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => DashboardConfig::default(),
        };

        if let Ok(source) = std::env::var(SOURCE_ENV) {
            if !source.trim().is_empty() {
                config.source = source.trim().to_string();
            }
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: DashboardConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.stations.is_empty() {
            bail!("at least one station must be configured");
        }
        if self.pollutants.is_empty() {
            bail!("at least one pollutant must be aggregated");
        }
        let c = self.detector.contamination;
        if !(c > 0.0 && c <= 0.5) {
            bail!("detector contamination must lie in (0, 0.5], got {c}");
        }
        if self.detector.n_trees == 0 || self.detector.sample_size == 0 {
            bail!("detector needs at least one tree and a non-empty sample");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_compare_two_stations() {
        let config = DashboardConfig::default();
        assert_eq!(config.stations, vec!["Guanyuan", "Wanshouxigong"]);
        assert_eq!(config.outlier_pollutant, Pollutant::Pm10);
        assert_eq!(config.detector.contamination, 0.01);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = DashboardConfig::from_json(
            r#"{ "stations": ["Dongsi", "Tiantan"], "pollutants": ["PM2.5", "O3"],
                 "detector": { "seed": 42 } }"#,
        )
        .unwrap();
        assert_eq!(config.stations, vec!["Dongsi", "Tiantan"]);
        assert_eq!(config.pollutants, vec![Pollutant::Pm25, Pollutant::O3]);
        assert_eq!(config.detector.seed, Some(42));
        assert_eq!(config.detector.n_trees, 100);
        assert_eq!(config.source, DEFAULT_SOURCE);
    }

    #[test]
    fn rejects_bad_contamination_and_unknown_keys() {
        assert!(DashboardConfig::from_json(r#"{ "detector": { "contamination": 0.9 } }"#).is_err());
        assert!(DashboardConfig::from_json(r#"{ "stations": [] }"#).is_err());
        assert!(DashboardConfig::from_json(r#"{ "colour": "red" }"#).is_err());
    }

    #[test]
    fn environment_overrides_source() {
        let path = std::env::temp_dir()
            .join(format!("air-quality-config-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "source": "from-file.csv", "title": "Test" }"#).unwrap();

        temp_env::with_vars(
            [
                (CONFIG_PATH_ENV, Some(path.to_str().unwrap())),
                (SOURCE_ENV, Some("https://example.org/air.csv")),
            ],
            || {
                let config = DashboardConfig::load().unwrap();
                assert_eq!(config.title, "Test");
                assert_eq!(config.source, "https://example.org/air.csv");
            },
        );

        temp_env::with_vars(
            [
                (CONFIG_PATH_ENV, Some(path.to_str().unwrap())),
                (SOURCE_ENV, None),
            ],
            || {
                let config = DashboardConfig::load().unwrap();
                assert_eq!(config.source, "from-file.csv");
            },
        );
        std::fs::remove_file(&path).ok();
    }
}
