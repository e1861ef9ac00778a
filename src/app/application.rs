//! Application - Dashboard Bootstrap
//!
//! Builds the page model from configuration and wires the daily volume chart,
//! the hook registry, chart type selectors and the refresh scheduler.

use chrono::Local;
use parking_lot::Mutex;
use std::sync::Arc;
use std::thread::JoinHandle;

use crate::chart::{ChartRenderer, RecordingRenderer};
use crate::constants::{
    CHART_TYPE_SELECTOR_CLASS, COMPANY_CONTAINER_ID, COMPANY_ID_ATTRIBUTE, DATE_INPUT_ID,
    UNIT_SELECT_ID,
};
use crate::domain::config::{DashboardConfig, PageConfig};
use crate::domain::page_type::PageType;
use crate::domain::unit::VolumeUnit;
use crate::error::Result;
use crate::eventing::{DashboardEvent, EventReceiver, EventSender};
use crate::features::chart_type::dispatch::DAILY_VOLUME_SELECTOR;
use crate::features::chart_type::{ChartTypeDispatch, ChartTypeSelector, initialize_chart_type_selectors};
use crate::features::daily_volume::{DailyVolumeController, DailyVolumeOptions};
use crate::page::context::COMPANY_NAME_ATTRIBUTE;
use crate::page::{Document, Element, SharedDocument, classify};
use crate::services::{
    FarmDataSource, HookRegistry, HttpDataClient, RefreshConfig, RefreshScheduler, ReportViewer,
    standard_strategies,
};
use crate::state::log_state::LogLevel;

/// Page model for the configured production page
pub fn page_document(page: &PageConfig, unit: VolumeUnit) -> Document {
    let mut company = Element::new("div").with_id(COMPANY_CONTAINER_ID);
    if let Some(id) = &page.company_id {
        company = company.with_attr(COMPANY_ID_ATTRIBUTE, id.as_str());
    }
    if let Some(name) = &page.company_name {
        company = company.with_attr(COMPANY_NAME_ATTRIBUTE, name.as_str());
    }
    let date = page.date.unwrap_or_else(|| Local::now().date_naive());

    Document::new(page.path.as_str())
        .with_element(company)
        .with_element(
            Element::new("input")
                .with_id(DATE_INPUT_ID)
                .with_value(date.format("%Y-%m-%d").to_string()),
        )
        .with_element(
            Element::new("select")
                .with_id(UNIT_SELECT_ID)
                .with_value(unit.as_str()),
        )
        .with_element(Element::new("div").with_id(DailyVolumeOptions::default().container_id))
        .with_element(
            Element::new("div")
                .with_id(DAILY_VOLUME_SELECTOR)
                .with_class(CHART_TYPE_SELECTOR_CLASS),
        )
}

/// A running dashboard page
pub struct DashboardApp<S: FarmDataSource + 'static> {
    document: SharedDocument,
    hooks: Arc<HookRegistry>,
    controller: Arc<DailyVolumeController<S>>,
    selectors: Vec<ChartTypeSelector>,
    scheduler: RefreshScheduler,
    page_type: PageType,
    events: EventSender,
}

impl DashboardApp<HttpDataClient> {
    /// Wire the dashboard against the configured HTTP server
    pub fn build(config: &DashboardConfig, events: EventSender) -> Result<Self> {
        let source = Arc::new(HttpDataClient::new(&config.server)?);
        Self::build_with(config, source, Arc::new(RecordingRenderer::new()), events)
    }
}

impl<S: FarmDataSource + 'static> DashboardApp<S> {
    pub fn build_with(
        config: &DashboardConfig,
        source: Arc<S>,
        renderer: Arc<dyn ChartRenderer>,
        events: EventSender,
    ) -> Result<Self> {
        config.validate()?;

        let document = page_document(&config.page, config.display.unit).into_shared();
        let page_type = classify(&document.read());

        let controller = Arc::new(
            DailyVolumeController::new(
                DailyVolumeOptions {
                    unit: config.display.unit,
                    debug_log_capacity: Some(config.display.debug_log_capacity),
                    ..Default::default()
                },
                source.clone(),
                renderer,
                document.clone(),
            )
            .with_events(events.clone()),
        );

        let hooks = Arc::new(HookRegistry::new());
        hooks.set_production_reload(controller.clone());
        hooks.register_chart_update(controller.container_id(), controller.clone());

        let dispatch = Arc::new(ChartTypeDispatch::new());
        let chart = controller.clone();
        dispatch.register(
            DAILY_VOLUME_SELECTOR,
            Arc::new(move |chart_type| chart.set_chart_type(chart_type)),
        );
        let selectors =
            initialize_chart_type_selectors(&document.read(), dispatch, Some(events.clone()));

        let strategies = standard_strategies(
            hooks.clone(),
            source,
            document.clone(),
            Arc::new(Mutex::new(ReportViewer::new())),
        );
        let scheduler = RefreshScheduler::create(
            RefreshConfig::from_settings(&config.refresh, page_type)?,
            strategies,
            Some(events.clone()),
        );

        tracing::info!(%page_type, path = %config.page.path, "Dashboard wired");
        Ok(Self {
            document,
            hooks,
            controller,
            selectors,
            scheduler,
            page_type,
            events,
        })
    }

    /// Load the chart once, then start auto-refresh.
    ///
    /// A failed first load leaves the chart in its error state; refreshing still starts.
    pub async fn start(&self) {
        if let Err(e) = self.controller.load_initial_data().await {
            tracing::warn!(error = %e, "Initial chart load failed");
            let _ = self
                .events
                .send(DashboardEvent::warn(format!("Initial load failed: {e}")));
        }
        self.scheduler.start();
    }

    pub fn shutdown(&self) {
        self.scheduler.stop();
        tracing::info!("Dashboard stopped");
    }

    pub fn document(&self) -> &SharedDocument {
        &self.document
    }

    pub fn hooks(&self) -> &Arc<HookRegistry> {
        &self.hooks
    }

    pub fn controller(&self) -> &Arc<DailyVolumeController<S>> {
        &self.controller
    }

    pub fn selectors_mut(&mut self) -> &mut [ChartTypeSelector] {
        &mut self.selectors
    }

    pub fn scheduler(&self) -> &RefreshScheduler {
        &self.scheduler
    }

    pub fn page_type(&self) -> PageType {
        self.page_type
    }
}

/// Forward dashboard events to the log until every sender is gone
pub fn spawn_event_logger(events: EventReceiver) -> std::io::Result<JoinHandle<()>> {
    std::thread::Builder::new()
        .name("dashboard-events".to_string())
        .spawn(move || {
            for event in events.iter() {
                match event {
                    DashboardEvent::Log { level, message, .. } => match level {
                        LogLevel::Error => tracing::error!("{message}"),
                        LogLevel::Warn => tracing::warn!("{message}"),
                        LogLevel::Info => tracing::info!("{message}"),
                        LogLevel::Debug => tracing::debug!("{message}"),
                    },
                    DashboardEvent::ChartTypeChanged {
                        chart_type,
                        container_id,
                    } => tracing::info!(%chart_type, container_id, "Chart type changed"),
                    DashboardEvent::ChartStateChanged {
                        chart_id,
                        state,
                        message,
                    } => tracing::debug!(chart_id, ?state, ?message, "Chart state changed"),
                    DashboardEvent::RefreshCompleted { page_type, at, ok } => {
                        tracing::debug!(%page_type, %at, ok, "Refresh completed")
                    }
                }
            }
        })
}
