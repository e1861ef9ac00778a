//! Chart Type Dispatch
//!
//! Maps selector container ids to the reload callback of the chart they
//! control. Ids without an entry are tolerated and ignored.

use ahash::AHashMap;
use parking_lot::RwLock;
use std::sync::Arc;

use crate::constants::CHART_TYPE_SELECTOR_CLASS;
use crate::domain::chart_type::ChartType;
use crate::eventing::EventSender;
use crate::features::chart_type::selector::{ChartTypeSelector, SelectorOptions};
use crate::page::Document;

/// Well-known selector containers
pub const DAILY_VOLUME_SELECTOR: &str = "dailyVolumeChartType";
pub const MONTHLY_VOLUME_SELECTOR: &str = "monthlyVolumeChartType";
pub const MULTI_FARM_SELECTOR: &str = "multiFarmChartType";
pub const LAGOON_LEVEL_SELECTOR: &str = "lagoonLevelChartType";

/// Attribute naming a selector's initial type
pub const DEFAULT_TYPE_ATTRIBUTE: &str = "data-default-type";

/// Reloads a chart with a new type
pub type ReloadCallback = Arc<dyn Fn(ChartType) + Send + Sync>;

#[derive(Default)]
pub struct ChartTypeDispatch {
    routes: RwLock<AHashMap<String, ReloadCallback>>,
}

impl ChartTypeDispatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, container_id: impl Into<String>, callback: ReloadCallback) {
        self.routes.write().insert(container_id.into(), callback);
    }

    pub fn contains(&self, container_id: &str) -> bool {
        self.routes.read().contains_key(container_id)
    }

    /// Run the callback for `container_id`; false when none is registered
    pub fn dispatch(&self, container_id: &str, chart_type: ChartType) -> bool {
        let callback = self.routes.read().get(container_id).cloned();
        match callback {
            Some(callback) => {
                callback(chart_type);
                true
            }
            None => {
                tracing::debug!(container_id, %chart_type, "No chart bound to selector");
                false
            }
        }
    }
}

impl std::fmt::Debug for ChartTypeDispatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let routes = self.routes.read();
        f.debug_struct("ChartTypeDispatch")
            .field("routes", &routes.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Build and initialise a selector for every selector element with an id
pub fn initialize_chart_type_selectors(
    document: &Document,
    dispatch: Arc<ChartTypeDispatch>,
    events: Option<EventSender>,
) -> Vec<ChartTypeSelector> {
    let targets: Vec<(String, Option<ChartType>)> = document
        .elements_with_class(CHART_TYPE_SELECTOR_CLASS)
        .filter_map(|element| {
            let id = element.id.as_deref().filter(|id| !id.is_empty())?;
            let default_type = element
                .attr(DEFAULT_TYPE_ATTRIBUTE)
                .and_then(|v| v.parse().ok());
            Some((id.to_string(), default_type))
        })
        .collect();

    let selectors: Vec<_> = targets
        .into_iter()
        .map(|(container_id, default_type)| {
            let dispatch = dispatch.clone();
            let options = SelectorOptions {
                enabled_types: ChartType::enabled_for_container(&container_id),
                default_type,
                on_type_change: Some(Arc::new(move |chart_type, id: &str| {
                    dispatch.dispatch(id, chart_type);
                })),
            };
            let mut selector = ChartTypeSelector::new(container_id, options, document);
            if let Some(tx) = &events {
                selector = selector.with_events(tx.clone());
            }
            selector.init();
            selector
        })
        .collect();

    tracing::info!(count = selectors.len(), "Chart type selectors initialized");
    selectors
}
