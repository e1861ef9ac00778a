//! Daily Volume Feature
//!
//! Multi-farm daily volume chart and its controller.

pub mod controller;

pub use controller::{DailyVolumeController, DailyVolumeOptions, DateProvider, has_multiple_dates_per_farm};
