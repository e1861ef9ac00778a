//! Refresh Strategies
//!
//! One strategy per page type. The scheduler looks up the strategy for the
//! classified page on every tick; page types without one are no-ops.

use ahash::AHashMap;
use chrono::NaiveDate;
use futures::future::BoxFuture;
use parking_lot::Mutex;
use std::sync::Arc;

use crate::constants::{AUTO_REFRESH_CLASS, REFRESH_FUNCTION_ATTRIBUTE};
use crate::domain::page_type::PageType;
use crate::error::{Error, Result};
use crate::page::SharedDocument;
use crate::page::context::{company_name, resolve_company_id, selected_date};
use crate::services::client::{FarmDataSource, ReportRequest};
use crate::services::hooks::{HookRegistry, RefreshHook};
use crate::services::report::{ReportViewer, validate_report};

/// A page-type specific refresh routine
pub trait RefreshStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn refresh(&self) -> BoxFuture<'_, Result<()>>;
}

/// Strategies keyed by page type
pub type StrategyTable = AHashMap<PageType, Arc<dyn RefreshStrategy>>;

/// Run hooks one after another; every hook runs even if an earlier one fails.
///
/// Returns the first failure, annotated with how many hooks failed.
async fn run_hooks(hooks: Vec<(String, Arc<dyn RefreshHook>)>) -> Result<()> {
    let mut first_error = None;
    let mut failed = 0usize;
    let total = hooks.len();

    for (key, hook) in hooks {
        if let Err(e) = hook.refresh().await {
            tracing::warn!(hook = %key, error = %e, "Refresh hook failed");
            failed += 1;
            first_error.get_or_insert(e);
        }
    }

    match first_error {
        None => Ok(()),
        Some(e) if total == 1 => Err(e),
        Some(e) => Err(Error::Invalid {
            message: format!("{failed} of {total} refresh hooks failed; first: {e}"),
        }),
    }
}

// ==================== Production ====================

/// Delegates to the production chart's reload hook, if one is registered
pub struct ProductionStrategy {
    hooks: Arc<HookRegistry>,
}

impl ProductionStrategy {
    pub fn new(hooks: Arc<HookRegistry>) -> Self {
        Self { hooks }
    }
}

impl RefreshStrategy for ProductionStrategy {
    fn name(&self) -> &'static str {
        "production"
    }

    fn refresh(&self) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            match self.hooks.production_reload() {
                Some(hook) => hook.refresh().await,
                None => {
                    tracing::debug!("No production reload hook registered");
                    Ok(())
                }
            }
        })
    }
}

// ==================== Chart ====================

/// Calls every registered chart update hook
pub struct ChartStrategy {
    hooks: Arc<HookRegistry>,
}

impl ChartStrategy {
    pub fn new(hooks: Arc<HookRegistry>) -> Self {
        Self { hooks }
    }
}

impl RefreshStrategy for ChartStrategy {
    fn name(&self) -> &'static str {
        "chart"
    }

    fn refresh(&self) -> BoxFuture<'_, Result<()>> {
        Box::pin(run_hooks(self.hooks.chart_updates()))
    }
}

// ==================== Report ====================

/// Refetches the daily report for the selected date and swaps the viewer
pub struct ReportStrategy<S: FarmDataSource> {
    source: Arc<S>,
    document: SharedDocument,
    viewer: Arc<Mutex<ReportViewer>>,
}

impl<S: FarmDataSource> ReportStrategy<S> {
    pub fn new(source: Arc<S>, document: SharedDocument, viewer: Arc<Mutex<ReportViewer>>) -> Self {
        Self {
            source,
            document,
            viewer,
        }
    }

    fn build_request(&self) -> Result<ReportRequest> {
        let page = self.document.read();
        let date: NaiveDate = selected_date(&page).ok_or_else(|| Error::Invalid {
            message: "No report date selected".to_string(),
        })?;
        let company_id = resolve_company_id(&page)?;
        let company_name = company_name(&page).unwrap_or_else(|| company_id.clone());
        Ok(ReportRequest {
            company_name,
            company_id,
            date,
        })
    }

    async fn reload(&self) -> Result<()> {
        let request = self.build_request()?;
        let report = self.source.fetch_daily_report(&request).await?;
        validate_report(&report)?;

        let mut page = self.document.write();
        let loaded = self.viewer.lock().swap(report, request.date, &mut page).source.clone();
        tracing::info!(date = %request.date, source = %loaded, "Report refreshed");
        Ok(())
    }
}

impl<S: FarmDataSource + 'static> RefreshStrategy for ReportStrategy<S> {
    fn name(&self) -> &'static str {
        "report"
    }

    fn refresh(&self) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            let result = self.reload().await;
            if let Err(e) = &result {
                tracing::error!(error = %e, "Report refresh failed, keeping previous document");
            }
            result
        })
    }
}

// ==================== Dashboard ====================

/// Runs the chart strategy, then every auto-refresh widget named in the page
pub struct DashboardStrategy {
    charts: ChartStrategy,
    hooks: Arc<HookRegistry>,
    document: SharedDocument,
}

impl DashboardStrategy {
    pub fn new(hooks: Arc<HookRegistry>, document: SharedDocument) -> Self {
        Self {
            charts: ChartStrategy::new(hooks.clone()),
            hooks,
            document,
        }
    }

    /// Widget hooks named by auto-refresh elements that have a registered function
    fn widget_hooks(&self) -> Vec<(String, Arc<dyn RefreshHook>)> {
        let page = self.document.read();
        page.elements_with_class(AUTO_REFRESH_CLASS)
            .filter_map(|e| e.attr(REFRESH_FUNCTION_ATTRIBUTE))
            .filter_map(|name| {
                let hook = self.hooks.widget(name);
                if hook.is_none() {
                    tracing::debug!(function = name, "Auto-refresh function not registered");
                }
                hook.map(|h| (name.to_string(), h))
            })
            .collect()
    }
}

impl RefreshStrategy for DashboardStrategy {
    fn name(&self) -> &'static str {
        "dashboard"
    }

    fn refresh(&self) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            let charts = self.charts.refresh().await;
            let widgets = run_hooks(self.widget_hooks()).await;
            charts.and(widgets)
        })
    }
}

/// Standard table: production, chart, report and dashboard strategies.
///
/// `Unknown` has no entry, so ticks on unclassified pages do nothing.
pub fn standard_strategies<S: FarmDataSource + 'static>(
    hooks: Arc<HookRegistry>,
    source: Arc<S>,
    document: SharedDocument,
    viewer: Arc<Mutex<ReportViewer>>,
) -> StrategyTable {
    let mut table: StrategyTable = AHashMap::new();
    table.insert(
        PageType::Production,
        Arc::new(ProductionStrategy::new(hooks.clone())),
    );
    table.insert(PageType::Chart, Arc::new(ChartStrategy::new(hooks.clone())));
    table.insert(
        PageType::Report,
        Arc::new(ReportStrategy::new(source, document.clone(), viewer)),
    );
    table.insert(
        PageType::Dashboard,
        Arc::new(DashboardStrategy::new(hooks, document)),
    );
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{COMPANY_CONTAINER_ID, COMPANY_ID_ATTRIBUTE, DATE_INPUT_ID};
    use crate::domain::farm::{FarmVolumesRequest, FarmVolumesResponse};
    use crate::page::{Document, Element};
    use crate::services::client::ReportDocument;
    use crate::services::hooks::hook_fn;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Serves queued report results
    struct ReportSource {
        reports: Mutex<Vec<Result<ReportDocument>>>,
        requests: Mutex<Vec<ReportRequest>>,
    }

    impl ReportSource {
        fn new(reports: Vec<Result<ReportDocument>>) -> Self {
            Self {
                reports: Mutex::new(reports),
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    impl FarmDataSource for ReportSource {
        fn fetch_farm_volumes<'a>(
            &'a self,
            _request: &'a FarmVolumesRequest,
        ) -> BoxFuture<'a, Result<FarmVolumesResponse>> {
            Box::pin(async { Err(Error::EmptyResult) })
        }

        fn fetch_daily_report<'a>(
            &'a self,
            request: &'a ReportRequest,
        ) -> BoxFuture<'a, Result<ReportDocument>> {
            self.requests.lock().push(request.clone());
            let next = self.reports.lock().remove(0);
            Box::pin(async move { next })
        }
    }

    fn report_page() -> SharedDocument {
        Document::new("/reports")
            .with_element(
                Element::new("div")
                    .with_id(COMPANY_CONTAINER_ID)
                    .with_attr(COMPANY_ID_ATTRIBUTE, "7")
                    .with_attr("data-company-name", "Green Acres"),
            )
            .with_element(Element::new("input").with_id(DATE_INPUT_ID).with_value("2024-04-01"))
            .with_element(
                Element::new("iframe")
                    .with_id("pdfViewer")
                    .with_class("pdf-viewer")
                    .with_attr("src", "about:blank"),
            )
            .into_shared()
    }

    fn counting_hook(counter: Arc<AtomicUsize>, fail: bool) -> Arc<dyn RefreshHook> {
        hook_fn(move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                if fail {
                    Err(Error::Invalid {
                        message: "hook failed".into(),
                    })
                } else {
                    Ok(())
                }
            }
        })
    }

    #[tokio::test]
    async fn test_report_failure_keeps_previous_view() {
        let document = report_page();
        let viewer = Arc::new(Mutex::new(ReportViewer::new()));
        let source = Arc::new(ReportSource::new(vec![
            Ok(ReportDocument {
                content_type: "application/pdf".into(),
                bytes: b"%PDF-1.4".to_vec(),
            }),
            Err(Error::Http {
                status: 500,
                message: "boom".into(),
            }),
        ]));
        let strategy = ReportStrategy::new(source.clone(), document.clone(), viewer.clone());

        strategy.refresh().await.expect("first refresh");
        let first_src = document
            .read()
            .attribute("pdfViewer", "src")
            .map(str::to_string)
            .expect("src");
        assert!(first_src.starts_with("blob:report-"));

        assert!(strategy.refresh().await.is_err());
        assert_eq!(
            document.read().attribute("pdfViewer", "src"),
            Some(first_src.as_str())
        );
        assert_eq!(viewer.lock().swaps(), 1);

        let requests = source.requests.lock();
        assert_eq!(requests[0].company_name, "Green Acres");
        assert_eq!(requests[0].company_id, "7");
    }

    #[tokio::test]
    async fn test_chart_strategy_runs_all_hooks_despite_failure() {
        let hooks = Arc::new(HookRegistry::new());
        let counter = Arc::new(AtomicUsize::new(0));
        hooks.register_chart_update("a", counting_hook(counter.clone(), true));
        hooks.register_chart_update("b", counting_hook(counter.clone(), false));

        let strategy = ChartStrategy::new(hooks);
        assert!(strategy.refresh().await.is_err());
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_production_without_hook_is_noop() {
        let strategy = ProductionStrategy::new(Arc::new(HookRegistry::new()));
        assert!(strategy.refresh().await.is_ok());
    }

    #[tokio::test]
    async fn test_dashboard_runs_charts_then_named_widgets() {
        let hooks = Arc::new(HookRegistry::new());
        let charts = Arc::new(AtomicUsize::new(0));
        let widgets = Arc::new(AtomicUsize::new(0));
        hooks.register_chart_update("daily", counting_hook(charts.clone(), false));
        hooks.register_widget("refreshStats", counting_hook(widgets.clone(), false));

        let document = Document::new("/")
            .with_element(Element::new("div").with_class("dashboard-card"))
            .with_element(
                Element::new("div")
                    .with_class(AUTO_REFRESH_CLASS)
                    .with_attr(REFRESH_FUNCTION_ATTRIBUTE, "refreshStats"),
            )
            .with_element(
                Element::new("div")
                    .with_class(AUTO_REFRESH_CLASS)
                    .with_attr(REFRESH_FUNCTION_ATTRIBUTE, "notRegistered"),
            )
            .with_element(Element::new("div").with_class(AUTO_REFRESH_CLASS))
            .into_shared();

        let strategy = DashboardStrategy::new(hooks, document);
        strategy.refresh().await.expect("refresh");
        assert_eq!(charts.load(Ordering::SeqCst), 1);
        assert_eq!(widgets.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_standard_table_has_no_unknown_entry() {
        let table = standard_strategies(
            Arc::new(HookRegistry::new()),
            Arc::new(ReportSource::new(Vec::new())),
            report_page(),
            Arc::new(Mutex::new(ReportViewer::new())),
        );
        assert_eq!(table.len(), 4);
        assert!(!table.contains_key(&PageType::Unknown));
    }
}
