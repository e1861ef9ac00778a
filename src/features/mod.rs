//! Features - Vertical Feature Slices
//!
//! Each feature owns its controller or widget and the wiring it needs.

pub mod chart_type;
pub mod daily_volume;
