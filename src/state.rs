use std::path::Path;

use chrono::NaiveDate;

use crate::color::ColorMap;
use crate::config::DashboardConfig;
use crate::data::loader;
use crate::data::model::Dataset;
use crate::data::range::RangeSelector;
use crate::error::DashboardError;
use crate::pipeline::{self, DashboardReport};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Loaded dataset (None until a source loads successfully).
    pub dataset: Option<Dataset>,

    /// Bounds of the loaded dataset for the date pickers.
    pub selector: Option<RangeSelector>,

    /// Date picker values, bound directly to the widgets.
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,

    /// Charts for the last accepted selection (cached until the dates change).
    pub report: Option<DashboardReport>,

    /// Colour per station.
    pub color_map: Option<ColorMap>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether a loading operation is in progress.
    pub loading: bool,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            dataset: None,
            selector: None,
            start_date: NaiveDate::default(),
            end_date: NaiveDate::default(),
            report: None,
            color_map: None,
            status_message: None,
            loading: false,
        }
    }

    /// Load the configured source.
    pub fn load_configured_source(&mut self) {
        let source = self.config.source.clone();
        self.load(|| loader::load_source(&source));
    }

    /// Load a local snapshot picked by the user.
    pub fn load_path(&mut self, path: &Path) {
        self.load(|| loader::load_file(path));
    }

    fn load(&mut self, load: impl FnOnce() -> Result<Dataset, DashboardError>) {
        self.loading = true;
        match load() {
            Ok(dataset) => self.set_dataset(dataset),
            Err(e) => {
                if e.is_fatal() {
                    log::error!("Failed to load dataset: {e}");
                } else {
                    log::warn!("Dataset loaded with problems: {e}");
                }
                self.status_message = Some(format!("Error: {e}"));
                self.loading = false;
            }
        }
    }

    /// Ingest a newly loaded dataset and select its full range.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        let selector = RangeSelector::new(&dataset);
        self.start_date = selector.min_date;
        self.end_date = selector.max_date;
        self.selector = Some(selector);
        self.color_map = Some(ColorMap::new(&dataset.stations));

        self.dataset = Some(dataset);
        self.status_message = None;
        self.loading = false;
        self.apply_range();
    }

    /// Recompute the report for the current picker values.
    ///
    /// A rejected selection clears the charts and sets the status message.
    pub fn apply_range(&mut self) {
        let (Some(dataset), Some(selector)) = (&self.dataset, &self.selector) else {
            return;
        };

        match selector.select(Some(self.start_date), Some(self.end_date)) {
            Ok(interval) => {
                log::info!("Selected {interval}");
                // Clamping shows up in the pickers too.
                self.start_date = interval.start();
                self.end_date = interval.end();
                self.report = Some(pipeline::run(dataset, interval, &self.config));
                self.status_message = None;
            }
            Err(e) => {
                log::warn!("{e}");
                self.report = None;
                self.status_message = Some(e.to_string());
            }
        }
    }

    /// Go back to the whole observed range.
    pub fn reset_range(&mut self) {
        if let Some(selector) = self.selector {
            self.start_date = selector.min_date;
            self.end_date = selector.max_date;
            self.apply_range();
        }
    }
}
