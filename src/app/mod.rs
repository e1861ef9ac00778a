//! Application Layer
//!
//! Page bootstrap and wiring of controllers, selectors and the scheduler.

pub mod application;

pub use application::{DashboardApp, page_document, spawn_event_logger};
