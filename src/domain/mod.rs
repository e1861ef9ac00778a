//! Domain - Pure Data Structures and Protocol Types
//!
//! These types carry no I/O and represent the dashboard's business domain.

pub mod chart_type;
pub mod config;
pub mod farm;
pub mod page_type;
pub mod unit;
