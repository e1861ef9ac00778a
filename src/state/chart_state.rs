//! ChartState - Loading/Error/Ready Panels, Farm Toggles and Debug Log of a Chart Region

use crate::constants::{ERROR_STATE_CLASS, HIDDEN_CLASS, LOADING_STATE_CLASS};
use crate::domain::farm::ChartDataset;
use crate::helpers::hex_to_rgba;
use crate::state::log_state::{LogLevel, LogState};

/// Lifecycle of a chart controller. There is no terminal state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ControllerState {
    #[default]
    Initializing,
    Loading,
    Ready,
    Error,
}

/// What the chart region shows; exactly one holds at a time
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiState {
    Loading,
    Error(String),
    Ready,
}

/// Per-farm visibility button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FarmToggle {
    pub farm_id: String,
    pub name: String,
    pub color: String,
    /// Translucent fill derived from `color`
    pub background: String,
    pub active: bool,
}

/// Diagnostic panel, shown on demand and forced open on errors
#[derive(Debug, Clone, Default)]
pub struct DebugPanel {
    pub visible: bool,
    pub log: LogState,
}

impl DebugPanel {
    pub fn new(capacity: usize) -> Self {
        Self {
            visible: false,
            log: LogState::new(capacity),
        }
    }
}

/// View state of one chart region
#[derive(Debug, Clone, Default)]
pub struct ChartState {
    state: ControllerState,
    error_message: Option<String>,
    loading_visible: bool,
    error_visible: bool,
    toggles: Vec<FarmToggle>,
    debug: Option<DebugPanel>,
}

impl ChartState {
    /// Chart region without a debug panel
    pub fn new() -> Self {
        Self::default()
    }

    /// Chart region with a debug panel holding up to `capacity` lines
    pub fn with_debug_panel(capacity: usize) -> Self {
        Self {
            debug: Some(DebugPanel::new(capacity)),
            ..Default::default()
        }
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn ui_state(&self) -> UiState {
        match self.state {
            ControllerState::Initializing | ControllerState::Loading => UiState::Loading,
            ControllerState::Error => {
                UiState::Error(self.error_message.clone().unwrap_or_default())
            }
            ControllerState::Ready => UiState::Ready,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    // ==================== Panel transitions ====================

    /// Enter loading: show spinner, clear and hide any error
    pub fn show_loading(&mut self) {
        self.state = ControllerState::Loading;
        self.loading_visible = true;
        self.error_visible = false;
        self.error_message = None;
    }

    /// Hide the spinner panel only.
    ///
    /// The controller state is untouched, so a load still in flight keeps
    /// reporting `Loading` until [`set_ready`](Self::set_ready) or
    /// [`show_error`](Self::show_error) settles it.
    pub fn hide_loading(&mut self) {
        self.loading_visible = false;
    }

    /// Enter error: show message, hide spinner, force the debug panel open
    pub fn show_error(&mut self, message: impl Into<String>) {
        let message = message.into();
        self.state = ControllerState::Error;
        self.loading_visible = false;
        self.error_visible = true;
        if let Some(debug) = self.debug.as_mut() {
            debug.visible = true;
            if debug.log.last().map(|e| e.message.as_str()) != Some(message.as_str()) {
                debug.log.push(LogLevel::Error, message.clone());
            }
        }
        self.error_message = Some(message);
    }

    /// Enter ready: hide both panels
    pub fn set_ready(&mut self) {
        self.state = ControllerState::Ready;
        self.loading_visible = false;
        self.error_visible = false;
        self.error_message = None;
    }

    pub fn is_loading_visible(&self) -> bool {
        self.loading_visible
    }

    pub fn is_error_visible(&self) -> bool {
        self.error_visible
    }

    /// Class list of the loading panel element
    pub fn loading_classes(&self) -> Vec<&'static str> {
        panel_classes(LOADING_STATE_CLASS, self.loading_visible)
    }

    /// Class list of the error panel element
    pub fn error_classes(&self) -> Vec<&'static str> {
        panel_classes(ERROR_STATE_CLASS, self.error_visible)
    }

    // ==================== Farm toggles ====================

    /// Rebuild toggles for `dataset`, keeping the active flag of known farms
    pub fn rebuild_toggles(&mut self, dataset: &ChartDataset) {
        let previous = std::mem::take(&mut self.toggles);
        self.toggles = dataset
            .farms
            .iter()
            .map(|farm| FarmToggle {
                farm_id: farm.id.clone(),
                name: farm.name.clone(),
                color: farm.color.clone(),
                background: hex_to_rgba(&farm.color, 0.2).unwrap_or_else(|_| farm.color.clone()),
                active: previous
                    .iter()
                    .find(|t| t.farm_id == farm.id)
                    .map(|t| t.active)
                    .unwrap_or(true),
            })
            .collect();
    }

    pub fn toggles(&self) -> &[FarmToggle] {
        &self.toggles
    }

    pub fn set_toggle_active(&mut self, farm_id: &str, active: bool) -> bool {
        match self.toggles.iter_mut().find(|t| t.farm_id == farm_id) {
            Some(toggle) => {
                toggle.active = active;
                true
            }
            None => false,
        }
    }

    pub fn set_all_toggles(&mut self, active: bool) {
        for toggle in &mut self.toggles {
            toggle.active = active;
        }
    }

    pub fn active_farm_ids(&self) -> Vec<&str> {
        self.toggles
            .iter()
            .filter(|t| t.active)
            .map(|t| t.farm_id.as_str())
            .collect()
    }

    // ==================== Debug panel ====================

    pub fn debug_panel(&self) -> Option<&DebugPanel> {
        self.debug.as_ref()
    }

    pub fn set_debug_visible(&mut self, visible: bool) {
        if let Some(debug) = self.debug.as_mut() {
            debug.visible = visible;
        }
    }

    /// Append a diagnostic line to the debug panel, if present
    pub fn log(&mut self, level: LogLevel, message: impl Into<String>) {
        if let Some(debug) = self.debug.as_mut() {
            debug.log.push(level, message);
        }
    }
}

fn panel_classes(base: &'static str, visible: bool) -> Vec<&'static str> {
    if visible {
        vec![base]
    } else {
        vec![base, HIDDEN_CLASS]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_forces_debug_panel_visible() {
        let mut state = ChartState::with_debug_panel(10);
        state.show_loading();
        state.show_error("boom");
        state.show_error("boom");

        assert_eq!(state.ui_state(), UiState::Error("boom".into()));
        assert_eq!(state.error_classes(), vec![ERROR_STATE_CLASS]);
        assert_eq!(state.loading_classes(), vec![LOADING_STATE_CLASS, HIDDEN_CLASS]);
        let debug = state.debug_panel().expect("debug panel");
        assert!(debug.visible);
        assert_eq!(debug.log.len(), 1);
    }

    #[test]
    fn test_hide_loading_only_touches_spinner() {
        let mut state = ChartState::new();
        state.show_loading();
        state.hide_loading();
        state.hide_loading();

        assert!(!state.is_loading_visible());
        assert!(!state.is_error_visible());
        assert_eq!(state.state(), ControllerState::Loading);
        assert_eq!(state.ui_state(), UiState::Loading);

        state.set_ready();
        state.hide_loading();
        assert_eq!(state.ui_state(), UiState::Ready);
    }

    #[test]
    fn test_toggles_keep_active_flag() {
        use crate::domain::farm::{FarmSeries, VolumeSample};

        let farm = |id: &str| FarmSeries {
            id: id.into(),
            name: id.to_uppercase(),
            volumes: vec![VolumeSample {
                date: chrono::NaiveDate::from_ymd_opt(2024, 1, 1).expect("date"),
                value: 1.0,
            }],
            color: "#FF0000".into(),
        };
        let mut state = ChartState::new();
        state.rebuild_toggles(&ChartDataset {
            farms: vec![farm("a"), farm("b")],
        });
        assert!(state.set_toggle_active("a", false));
        assert_eq!(state.toggles()[0].background, "rgba(255, 0, 0, 0.2)");

        state.rebuild_toggles(&ChartDataset {
            farms: vec![farm("a"), farm("c")],
        });
        assert_eq!(state.active_farm_ids(), vec!["c"]);
    }

    #[test]
    fn test_loading_clears_error() {
        let mut state = ChartState::new();
        state.show_error("old");
        state.show_loading();
        assert_eq!(state.ui_state(), UiState::Loading);
        assert!(state.error_message().is_none());
        assert!(!state.is_error_visible());
    }
}
