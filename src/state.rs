use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::color::ColorMap;
use crate::config::DashboardConfig;
use crate::data::aggregate::{summarize, Summary};
use crate::data::cache::DatasetCache;
use crate::data::filter::{filter, FilterCriteria, FilteredView};
use crate::data::model::SalesDataset;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Load-once holder for the current sales file.
    cache: DatasetCache,

    /// Loaded dataset (None until a load succeeds).
    pub dataset: Option<Arc<SalesDataset>>,

    /// Current filter selection (None until a dataset is loaded).
    pub criteria: Option<FilterCriteria>,

    /// Rows passing the current filters (cached between interactions).
    pub visible_indices: Vec<usize>,

    /// KPIs and groupings of the visible rows.
    pub summary: Summary,

    /// Stable bar colours for the two charts.
    pub city_colors: ColorMap,
    pub item_colors: ColorMap,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Build the state and load the configured sales file.
    pub fn new(config: DashboardConfig) -> Self {
        let cache = DatasetCache::new(config.data_path.clone());
        let mut state = Self {
            config,
            cache,
            dataset: None,
            criteria: None,
            visible_indices: Vec::new(),
            summary: Summary::default(),
            city_colors: ColorMap::default(),
            item_colors: ColorMap::default(),
            status_message: None,
        };
        state.load();
        state
    }

    /// Fetch the dataset from the cache, parsing the file if needed.
    pub fn load(&mut self) {
        match self.cache.get_or_load() {
            Ok(dataset) => self.set_dataset(dataset),
            Err(e) => {
                log::error!("Failed to load {}: {e}", self.cache.source().display());
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Switch to another sales file. The previous table is kept on screen
    /// if the new one fails to load. Re-opening the current file is a no-op.
    pub fn open_path(&mut self, path: PathBuf) {
        if self.cache.is_loaded() && self.cache.source() == path.as_path() {
            log::debug!("{} is already loaded", path.display());
            return;
        }
        self.cache.replace_source(path);
        self.load();
    }

    /// Ingest a newly loaded dataset, reset filters and colours.
    pub fn set_dataset(&mut self, dataset: Arc<SalesDataset>) {
        if dataset.is_empty() {
            log::warn!("{} contains no transactions", self.cache.source().display());
        }
        self.criteria = Some(FilterCriteria::for_dataset(&dataset));
        self.city_colors = ColorMap::new(&dataset.cities);
        self.item_colors = ColorMap::new(&dataset.items);
        self.dataset = Some(dataset);
        self.status_message = None;
        self.refresh();
    }

    /// Recompute the visible rows and summary after a filter change.
    pub fn refresh(&mut self) {
        let (Some(ds), Some(criteria)) = (&self.dataset, &self.criteria) else {
            return;
        };
        let view = filter(ds, criteria);
        self.summary = summarize(&view);
        self.visible_indices = view.indices().to_vec();
        log::debug!(
            "Filter {}..={} cities={:?}: {} of {} rows",
            criteria.start_date,
            criteria.end_date,
            criteria.cities,
            self.visible_indices.len(),
            ds.len()
        );
    }

    /// The rows currently on screen.
    pub fn view(&self) -> Option<FilteredView<'_>> {
        let ds = self.dataset.as_deref()?;
        Some(FilteredView::from_indices(ds, &self.visible_indices))
    }

    /// Set the start of the date window, clamped to the dataset's range.
    pub fn set_start_date(&mut self, date: NaiveDate) {
        let date = self.clamp_to_bounds(date);
        if let Some(c) = &mut self.criteria {
            if c.start_date != date {
                c.start_date = date;
                self.refresh();
            }
        }
    }

    /// Set the end of the date window, clamped to the dataset's range.
    pub fn set_end_date(&mut self, date: NaiveDate) {
        let date = self.clamp_to_bounds(date);
        if let Some(c) = &mut self.criteria {
            if c.end_date != date {
                c.end_date = date;
                self.refresh();
            }
        }
    }

    fn clamp_to_bounds(&self, date: NaiveDate) -> NaiveDate {
        match self.dataset.as_ref().and_then(|ds| ds.date_bounds) {
            Some((lo, hi)) => date.clamp(lo, hi),
            None => date,
        }
    }

    /// Add or remove one city from the selection.
    pub fn toggle_city(&mut self, city: &str) {
        if let Some(c) = &mut self.criteria {
            if !c.cities.remove(city) {
                c.cities.insert(city.to_string());
            }
            self.refresh();
        }
    }

    /// Empty the city selection, which shows every city again.
    pub fn clear_cities(&mut self) {
        if let Some(c) = &mut self.criteria {
            c.cities.clear();
            self.refresh();
        }
    }

    /// Back to the full date range and no city restriction.
    pub fn reset_filters(&mut self) {
        if let Some(ds) = &self.dataset {
            self.criteria = Some(FilterCriteria::for_dataset(ds));
            self.refresh();
        }
    }

    /// Warning text for an upside-down date window. The filter still runs
    /// and yields nothing; this only makes the reason visible.
    pub fn range_warning(&self) -> Option<String> {
        let c = self.criteria.as_ref()?;
        c.is_inverted().then(|| {
            format!(
                "Start date {} is after end date {}; no rows can match.",
                c.start_date, c.end_date
            )
        })
    }
}
