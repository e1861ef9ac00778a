//! Eventing - Notification Channel Types

pub mod app_event;

pub use app_event::{DashboardEvent, EventReceiver, EventSender, event_channel};
