//! Chart Type Feature
//!
//! Per-container chart type selectors and the table routing their changes to charts.

pub mod dispatch;
pub mod selector;

pub use dispatch::{ChartTypeDispatch, ReloadCallback, initialize_chart_type_selectors};
pub use selector::{ChartTypeSelector, SelectorButton, SelectorOptions, TypeChangeCallback};
