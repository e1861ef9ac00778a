//! Dashboard Constants
//!
//! Centralized constants shared by the refresh orchestration and chart control layers.

/// Default auto-refresh interval
pub const DEFAULT_REFRESH_INTERVAL_MS: u64 = 30_000;

/// Data endpoint for per-farm daily volumes
pub const FARM_VOLUMES_ENDPOINT: &str = "/api/charts/multi-farm/farm-volumes-for-date";

/// Report endpoint prefix, followed by the company name
pub const DAILY_REPORT_ENDPOINT: &str = "/api/reports/daily-pdf";

/// Element carrying the active company id
pub const COMPANY_CONTAINER_ID: &str = "dailyVolumeContainer";
pub const COMPANY_ID_ATTRIBUTE: &str = "data-company-id";

/// Date input control
pub const DATE_INPUT_ID: &str = "dateSelector";

/// Unit select control
pub const UNIT_SELECT_ID: &str = "volumeUnit";

/// Placeholder company ids rendered when no company is selected
pub const COMPANY_ID_SENTINELS: [&str; 2] = ["default", "null"];

/// Chart containers whose presence marks a chart page
pub const CHART_CONTAINER_IDS: [&str; 5] = [
    "dailyVolumeChart",
    "monthlyVolumeChart",
    "multiFarmChart",
    "lagoonLevelChart",
    "productionTrendChart",
];

/// Report viewer markers
pub const REPORT_VIEWER_CLASSES: [&str; 2] = ["pdf-viewer", "pdf-container"];

/// Dashboard widget markers
pub const DASHBOARD_CLASSES: [&str; 2] = ["dashboard-card", "dashboard-widget"];

/// Elements refreshed on dashboard ticks
pub const AUTO_REFRESH_CLASS: &str = "auto-refresh";
pub const REFRESH_FUNCTION_ATTRIBUTE: &str = "data-refresh-function";

/// Chart type selector markers
pub const CHART_TYPE_SELECTOR_CLASS: &str = "chart-type-selector";

/// Visibility toggles for chart panels
pub const LOADING_STATE_CLASS: &str = "chart-loading-state";
pub const ERROR_STATE_CLASS: &str = "chart-error-state";
pub const HIDDEN_CLASS: &str = "d-none";

/// Litres per US gallon
pub const GALLONS_TO_LITERS: f64 = 3.78541;

/// Diagnostic log capacity for a chart's debug panel
pub const DEBUG_LOG_CAPACITY: usize = 200;
