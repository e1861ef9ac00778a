//! Chart Type Selector
//!
//! Button group holding the selected chart type of one container. Selection
//! changes are reported to an optional callback and as a
//! [`DashboardEvent::ChartTypeChanged`] for any other listener.
//!
//! Rendering replaces the buttons, which drops their click bindings. Every
//! render therefore bumps a generation counter and clicks only reach buttons
//! whose listeners were attached for the current generation.

use std::sync::Arc;

use crate::domain::chart_type::ChartType;
use crate::error::{Error, Result};
use crate::eventing::{DashboardEvent, EventSender};
use crate::page::Document;

/// Called with the new type and the container id
pub type TypeChangeCallback = Arc<dyn Fn(ChartType, &str) + Send + Sync>;

#[derive(Clone)]
pub struct SelectorOptions {
    /// Offered types, in button order
    pub enabled_types: Vec<ChartType>,
    /// Initial selection; falls back to the first enabled type
    pub default_type: Option<ChartType>,
    pub on_type_change: Option<TypeChangeCallback>,
}

impl Default for SelectorOptions {
    fn default() -> Self {
        Self {
            enabled_types: ChartType::ALL.to_vec(),
            default_type: None,
            on_type_change: None,
        }
    }
}

/// One rendered button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorButton {
    pub chart_type: ChartType,
    pub label: &'static str,
    pub icon: &'static str,
    pub active: bool,
}

pub struct ChartTypeSelector {
    container_id: String,
    /// False when the container was missing at construction
    mounted: bool,
    enabled_types: Vec<ChartType>,
    selected: ChartType,
    buttons: Vec<SelectorButton>,
    render_generation: u64,
    listeners: Option<u64>,
    on_type_change: Option<TypeChangeCallback>,
    events: Option<EventSender>,
}

impl ChartTypeSelector {
    /// Bind to `container_id` in `document`.
    ///
    /// A missing container yields an inert selector rather than an error.
    pub fn new(container_id: impl Into<String>, options: SelectorOptions, document: &Document) -> Self {
        let container_id = container_id.into();
        let mounted = document.contains_id(&container_id);
        if !mounted {
            tracing::warn!(container_id, "Chart type selector container not found");
        }

        let mut enabled_types = dedup(options.enabled_types);
        if enabled_types.is_empty() {
            enabled_types = ChartType::ALL.to_vec();
        }
        let selected = options
            .default_type
            .filter(|t| enabled_types.contains(t))
            .unwrap_or(enabled_types[0]);

        Self {
            container_id,
            mounted,
            enabled_types,
            selected,
            buttons: Vec::new(),
            render_generation: 0,
            listeners: None,
            on_type_change: options.on_type_change,
            events: None,
        }
    }

    /// Publish selection changes on `events`
    pub fn with_events(mut self, events: EventSender) -> Self {
        self.events = Some(events);
        self
    }

    /// Render the buttons and bind their listeners; no-op when inert
    pub fn init(&mut self) {
        if !self.mounted {
            return;
        }
        self.render();
        self.attach_listeners();
    }

    fn render(&mut self) {
        let selected = self.selected;
        self.buttons = self
            .enabled_types
            .iter()
            .map(|&chart_type| SelectorButton {
                chart_type,
                label: chart_type.label(),
                icon: chart_type.icon(),
                active: chart_type == selected,
            })
            .collect();
        self.render_generation += 1;
    }

    fn attach_listeners(&mut self) {
        self.listeners = Some(self.render_generation);
    }

    fn mark_selected(&mut self) {
        for button in &mut self.buttons {
            button.active = button.chart_type == self.selected;
        }
    }

    /// Select `chart_type`.
    ///
    /// Returns `Ok(false)` when it is already selected; nothing is re-rendered
    /// or announced in that case.
    pub fn select_type(&mut self, chart_type: ChartType) -> Result<bool> {
        if chart_type == self.selected {
            return Ok(false);
        }
        if !self.enabled_types.contains(&chart_type) {
            return Err(Error::Invalid {
                message: format!(
                    "chart type {chart_type} is not enabled for {}",
                    self.container_id
                ),
            });
        }

        self.selected = chart_type;
        self.mark_selected();
        tracing::debug!(container_id = %self.container_id, %chart_type, "Chart type selected");

        if let Some(callback) = &self.on_type_change {
            callback(chart_type, &self.container_id);
        }
        if let Some(tx) = &self.events {
            let _ = tx.send(DashboardEvent::ChartTypeChanged {
                chart_type,
                container_id: self.container_id.clone(),
            });
        }
        Ok(true)
    }

    /// Replace the offered types and re-render.
    ///
    /// The selection moves to the first new type when it is no longer offered.
    pub fn set_enabled_types(&mut self, types: Vec<ChartType>) -> Result<()> {
        let types = dedup(types);
        if types.is_empty() {
            return Err(Error::Invalid {
                message: "a chart type selector needs at least one type".to_string(),
            });
        }
        if !types.contains(&self.selected) {
            self.selected = types[0];
        }
        self.enabled_types = types;

        if self.mounted {
            self.render();
            self.attach_listeners();
        }
        Ok(())
    }

    /// Click the button at `index`; ignored without live listeners
    pub fn click(&mut self, index: usize) -> Result<bool> {
        if self.listeners != Some(self.render_generation) {
            return Ok(false);
        }
        let Some(button) = self.buttons.get(index) else {
            return Ok(false);
        };
        let chart_type = button.chart_type;
        self.select_type(chart_type)
    }

    /// Clear rendered content and unbind listeners
    pub fn destroy(&mut self) {
        self.buttons.clear();
        self.listeners = None;
    }

    pub fn container_id(&self) -> &str {
        &self.container_id
    }

    pub fn is_inert(&self) -> bool {
        !self.mounted
    }

    pub fn selected_type(&self) -> ChartType {
        self.selected
    }

    pub fn enabled_types(&self) -> &[ChartType] {
        &self.enabled_types
    }

    pub fn buttons(&self) -> &[SelectorButton] {
        &self.buttons
    }

    pub fn render_generation(&self) -> u64 {
        self.render_generation
    }
}

impl std::fmt::Debug for ChartTypeSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChartTypeSelector")
            .field("container_id", &self.container_id)
            .field("mounted", &self.mounted)
            .field("selected", &self.selected)
            .field("enabled_types", &self.enabled_types)
            .finish()
    }
}

fn dedup(types: Vec<ChartType>) -> Vec<ChartType> {
    let mut out = Vec::with_capacity(types.len());
    for t in types {
        if !out.contains(&t) {
            out.push(t);
        }
    }
    out
}
