//! Farm Dashboard Client Library
//!
//! Headless core of the farm production dashboard: page-type aware
//! auto-refresh, the daily volume chart controller and chart type selectors.

pub mod app;
pub mod chart;
pub mod constants;
pub mod domain;
pub mod error;
pub mod eventing;
pub mod features;
pub mod helpers;
pub mod page;
pub mod services;
pub mod state;
pub mod utils;

#[cfg(test)]
mod testing;
