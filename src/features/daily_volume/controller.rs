//! Daily Volume Controller
//!
//! Owns one multi-farm volume chart: fetches the volumes for the selected
//! company and date, turns them into a dataset, drives the chart handle and
//! keeps the loading/error/ready panels and farm toggles in step.
//!
//! ```text
//!  Initializing ──► Loading ──► Ready
//!                      ▲  └───► Error
//!                      └──── refresh ────┘
//! ```
//!
//! Every load takes a sequence number. A response whose number is no longer
//! the latest is dropped without touching the chart or the panels.

use ahash::{AHashMap, AHashSet};
use chrono::{Local, NaiveDate};
use futures::future::BoxFuture;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::chart::{ChartFamily, ChartHandle, ChartOptions, ChartRenderer, volume_title};
use crate::constants::{DEBUG_LOG_CAPACITY, UNIT_SELECT_ID};
use crate::domain::chart_type::ChartType;
use crate::domain::farm::{ChartDataset, FarmSeries, FarmVolumeRecord, FarmVolumesRequest};
use crate::domain::unit::VolumeUnit;
use crate::error::Result;
use crate::eventing::{DashboardEvent, EventSender};
use crate::helpers::ColorRegistry;
use crate::page::SharedDocument;
use crate::page::context::{resolve_company_id, selected_date, selected_unit};
use crate::services::{FarmDataSource, RefreshHook};
use crate::state::chart_state::{ChartState, ControllerState, FarmToggle, UiState};
use crate::state::log_state::LogLevel;

/// Supplies the date to load, ahead of the page's date input
pub type DateProvider = Arc<dyn Fn() -> Option<NaiveDate> + Send + Sync>;

/// Construction options
#[derive(Debug, Clone)]
pub struct DailyVolumeOptions {
    /// Id of the chart container element
    pub container_id: String,
    pub chart_type: ChartType,
    pub unit: VolumeUnit,
    /// Debug panel capacity; `None` builds the chart without a debug panel
    pub debug_log_capacity: Option<usize>,
}

impl Default for DailyVolumeOptions {
    fn default() -> Self {
        Self {
            container_id: "dailyVolumeChart".to_string(),
            chart_type: ChartType::Column,
            unit: VolumeUnit::default(),
            debug_log_capacity: Some(DEBUG_LOG_CAPACITY),
        }
    }
}

struct ChartInner {
    view: ChartState,
    dataset: ChartDataset,
    colors: ColorRegistry,
    chart: Option<Box<dyn ChartHandle>>,
    options: ChartOptions,
    /// Farm id -> series index in the current chart
    series_index: AHashMap<String, usize>,
    unit: VolumeUnit,
    date: Option<NaiveDate>,
}

impl ChartInner {
    fn push_options(&mut self) {
        if let Some(chart) = self.chart.as_mut() {
            chart.update(self.options.clone());
        }
    }

    fn refresh_title(&mut self) {
        if let Some(date) = self.date {
            self.options.title = volume_title(date, self.dataset.total_volume(), self.unit);
        }
    }
}

/// Controller of one daily volume chart
pub struct DailyVolumeController<S: FarmDataSource> {
    container_id: String,
    source: Arc<S>,
    renderer: Arc<dyn ChartRenderer>,
    document: SharedDocument,
    date_provider: Option<DateProvider>,
    events: Option<EventSender>,
    latest_request: AtomicU64,
    inner: Mutex<ChartInner>,
}

impl<S: FarmDataSource> DailyVolumeController<S> {
    pub fn new(
        options: DailyVolumeOptions,
        source: Arc<S>,
        renderer: Arc<dyn ChartRenderer>,
        document: SharedDocument,
    ) -> Self {
        let view = match options.debug_log_capacity {
            Some(capacity) => ChartState::with_debug_panel(capacity),
            None => ChartState::new(),
        };
        Self {
            container_id: options.container_id,
            source,
            renderer,
            document,
            date_provider: None,
            events: None,
            latest_request: AtomicU64::new(0),
            inner: Mutex::new(ChartInner {
                view,
                dataset: ChartDataset::default(),
                colors: ColorRegistry::new(),
                chart: None,
                options: ChartOptions::new(options.chart_type, options.unit),
                series_index: AHashMap::new(),
                unit: options.unit,
                date: None,
            }),
        }
    }

    /// Prefer dates from `provider` over the page's date input
    pub fn with_date_provider(mut self, provider: DateProvider) -> Self {
        self.date_provider = Some(provider);
        self
    }

    /// Publish state changes on `events`
    pub fn with_events(mut self, events: EventSender) -> Self {
        self.events = Some(events);
        self
    }

    pub fn container_id(&self) -> &str {
        &self.container_id
    }

    // ==================== Loading ====================

    /// First load after construction
    pub async fn load_initial_data(&self) -> Result<()> {
        tracing::info!(chart_id = %self.container_id, "Loading initial chart data");
        self.refresh_data().await
    }

    /// Fetch, transform and render the volumes for the current company and date.
    ///
    /// Failures end in the error state and are returned to the caller. A
    /// response overtaken by a newer load is discarded and reported as `Ok`.
    pub async fn refresh_data(&self) -> Result<()> {
        let seq = self.latest_request.fetch_add(1, Ordering::SeqCst) + 1;
        self.show_loading();

        let outcome = self.fetch_records().await;

        if self.latest_request.load(Ordering::SeqCst) != seq {
            tracing::debug!(chart_id = %self.container_id, seq, "Discarding stale response");
            return Ok(());
        }

        match outcome {
            Ok((date, records)) => {
                self.apply_records(date, records);
                Ok(())
            }
            Err(e) => {
                let online = self.document.read().online;
                tracing::error!(chart_id = %self.container_id, error = %e, "Chart data load failed");
                self.show_error(e.user_message(online));
                Err(e)
            }
        }
    }

    async fn fetch_records(&self) -> Result<(NaiveDate, Vec<FarmVolumeRecord>)> {
        let (company_id, date) = {
            let page = self.document.read();
            let date = self
                .date_provider
                .as_ref()
                .and_then(|provider| provider())
                .or_else(|| selected_date(&page))
                .unwrap_or_else(|| Local::now().date_naive());
            (resolve_company_id(&page), date)
        };
        let request = FarmVolumesRequest {
            company_id: company_id?,
            date,
        };

        self.log(LogLevel::Info, format!("Fetching farm volumes for {date}"));
        let response = self.source.fetch_farm_volumes(&request).await?;
        Ok((date, response.into_records()?))
    }

    /// Colors are assigned here, once the response is known to be current
    fn apply_records(&self, date: NaiveDate, records: Vec<FarmVolumeRecord>) {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        let farms = records
            .into_iter()
            .map(|record| {
                let color = inner.colors.color_for(&record.farm_id);
                FarmSeries::from_record(record, date, color)
            })
            .collect();
        let dataset = ChartDataset { farms };

        inner.view.rebuild_toggles(&dataset);
        let active: AHashSet<String> = inner
            .view
            .active_farm_ids()
            .into_iter()
            .map(str::to_string)
            .collect();

        inner.options.apply_dataset(&dataset, |id| active.contains(id));
        inner.series_index = dataset
            .farms
            .iter()
            .enumerate()
            .map(|(index, farm)| (farm.id.clone(), index))
            .collect();
        inner.dataset = dataset;
        inner.date = Some(date);
        inner.refresh_title();

        match inner.chart.as_mut() {
            Some(chart) => chart.update(inner.options.clone()),
            None => {
                inner.chart = Some(self.renderer.render(&self.container_id, inner.options.clone()))
            }
        }

        let family = inner.options.family();
        inner.view.set_ready();
        inner.view.log(
            LogLevel::Info,
            format!(
                "Rendered {} farms as {:?} chart",
                inner.dataset.len(),
                family
            ),
        );
        drop(guard);

        tracing::info!(chart_id = %self.container_id, ?family, "Chart rendered");
        self.emit_state(ControllerState::Ready, None);
    }

    // ==================== Panels ====================

    pub fn show_loading(&self) {
        self.inner.lock().view.show_loading();
        self.emit_state(ControllerState::Loading, None);
    }

    /// Hide the spinner; the state stays as it is
    pub fn hide_loading(&self) {
        self.inner.lock().view.hide_loading();
    }

    /// Enter the error state with a user-facing message
    pub fn show_error(&self, message: impl Into<String>) {
        let message = message.into();
        self.inner.lock().view.show_error(message.clone());
        self.emit_state(ControllerState::Error, Some(message));
    }

    // ==================== Series visibility ====================

    /// Show or hide one farm's series; false for unknown farms
    pub fn toggle_farm_visibility(&self, farm_id: &str, visible: bool) -> bool {
        let mut inner = self.inner.lock();
        let Some(&index) = inner.series_index.get(farm_id) else {
            tracing::debug!(farm_id, "Toggle for unknown farm ignored");
            return false;
        };

        if let Some(chart) = inner.chart.as_mut() {
            if visible {
                chart.show_series(index);
            } else {
                chart.hide_series(index);
            }
        }
        if let Some(series) = inner.options.series.get_mut(index) {
            series.visible = visible;
        }
        inner.view.set_toggle_active(farm_id, visible)
    }

    /// Show or hide every series, in one step
    pub fn toggle_all_farms(&self, visible: bool) {
        let mut inner = self.inner.lock();
        let inner = &mut *inner;
        for series in &mut inner.options.series {
            series.visible = visible;
        }
        if let Some(chart) = inner.chart.as_mut() {
            for &index in inner.series_index.values() {
                if visible {
                    chart.show_series(index);
                } else {
                    chart.hide_series(index);
                }
            }
        }
        inner.view.set_all_toggles(visible);
    }

    // ==================== Presentation ====================

    /// Re-read the unit select and rewrite axis, tooltip and title
    pub fn update_units(&self) {
        let selected = selected_unit(&self.document.read());
        let unit = selected.unwrap_or_else(|| self.unit());
        self.apply_unit(unit);
    }

    /// Select `unit` on the page, then apply it
    pub fn set_unit(&self, unit: VolumeUnit) {
        self.document
            .write()
            .set_input_value(UNIT_SELECT_ID, unit.as_str());
        self.apply_unit(unit);
    }

    fn apply_unit(&self, unit: VolumeUnit) {
        let mut inner = self.inner.lock();
        inner.unit = unit;
        inner.options.apply_unit(unit);
        inner.refresh_title();
        inner.push_options();
        tracing::debug!(chart_id = %self.container_id, %unit, "Units updated");
    }

    /// Switch every series to `chart_type`
    pub fn set_chart_type(&self, chart_type: ChartType) {
        let mut inner = self.inner.lock();
        if inner.options.chart_type == chart_type {
            return;
        }
        inner.options.set_chart_type(chart_type);
        inner.push_options();
        inner
            .view
            .log(LogLevel::Info, format!("Chart type set to {chart_type}"));
    }

    // ==================== Accessors ====================

    pub fn state(&self) -> ControllerState {
        self.inner.lock().view.state()
    }

    pub fn ui_state(&self) -> UiState {
        self.inner.lock().view.ui_state()
    }

    /// Snapshot of the panel and toggle state
    pub fn view(&self) -> ChartState {
        self.inner.lock().view.clone()
    }

    pub fn toggles(&self) -> Vec<FarmToggle> {
        self.inner.lock().view.toggles().to_vec()
    }

    pub fn dataset(&self) -> ChartDataset {
        self.inner.lock().dataset.clone()
    }

    /// Options as last handed to the chart
    pub fn chart_options(&self) -> ChartOptions {
        self.inner.lock().options.clone()
    }

    pub fn chart_title(&self) -> String {
        self.inner.lock().options.title.clone()
    }

    pub fn unit(&self) -> VolumeUnit {
        self.inner.lock().unit
    }

    pub fn chart_type(&self) -> ChartType {
        self.inner.lock().options.chart_type
    }

    pub fn color_of(&self, farm_id: &str) -> Option<String> {
        self.inner.lock().colors.get(farm_id).map(str::to_string)
    }

    pub fn has_chart(&self) -> bool {
        self.inner.lock().chart.is_some()
    }

    pub fn set_debug_visible(&self, visible: bool) {
        self.inner.lock().view.set_debug_visible(visible);
    }

    /// Human-readable summary of the controller for the debug panel
    pub fn diagnostics(&self) -> Vec<String> {
        let inner = self.inner.lock();
        let family = match inner.options.family() {
            ChartFamily::TimeSeries => "time series",
            ChartFamily::Categorical => "categorical",
        };
        let mut lines = vec![
            format!("Chart: {}", self.container_id),
            format!("State: {:?}", inner.view.state()),
            format!("Chart constructed: {}", inner.chart.is_some()),
            format!("Chart type: {}", inner.options.chart_type),
            format!("Family: {family}"),
            format!("Unit: {}", inner.unit.label()),
            format!(
                "Date: {}",
                inner
                    .date
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "-".to_string())
            ),
            format!("Farms: {}", inner.dataset.len()),
            format!(
                "Multiple dates per farm: {}",
                inner.dataset.has_multiple_dates_per_farm()
            ),
        ];
        for farm in &inner.dataset.farms {
            lines.push(format!(
                "  {} ({}) {} samples, color {}",
                farm.name,
                farm.id,
                farm.volumes.len(),
                farm.color
            ));
        }
        if let Some(message) = inner.view.error_message() {
            lines.push(format!("Last error: {message}"));
        }
        lines
    }

    // ==================== Internals ====================

    fn log(&self, level: LogLevel, message: String) {
        self.inner.lock().view.log(level, message);
    }

    fn emit_state(&self, state: ControllerState, message: Option<String>) {
        if let Some(tx) = &self.events {
            let _ = tx.send(DashboardEvent::ChartStateChanged {
                chart_id: self.container_id.clone(),
                state,
                message,
            });
        }
    }
}

/// True when any farm in `dataset` carries more than one dated sample
pub fn has_multiple_dates_per_farm(dataset: &ChartDataset) -> bool {
    dataset.has_multiple_dates_per_farm()
}

impl<S: FarmDataSource + 'static> RefreshHook for DailyVolumeController<S> {
    fn refresh(&self) -> BoxFuture<'_, Result<()>> {
        Box::pin(self.refresh_data())
    }
}

impl<S: FarmDataSource> std::fmt::Debug for DailyVolumeController<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DailyVolumeController")
            .field("container_id", &self.container_id)
            .field("state", &self.state())
            .finish()
    }
}
