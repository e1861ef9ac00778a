//! DashboardEvent - Notifications Emitted by the Dashboard Core
//!
//! Components never share mutable state; they publish value copies of what
//! changed on a channel any listener may drain.

use chrono::{DateTime, Local};

use crate::domain::chart_type::ChartType;
use crate::domain::page_type::PageType;
use crate::state::chart_state::ControllerState;
use crate::state::log_state::LogLevel;

/// Sender half used by publishers
pub type EventSender = crossbeam_channel::Sender<DashboardEvent>;

/// Receiver half used by listeners
pub type EventReceiver = crossbeam_channel::Receiver<DashboardEvent>;

/// Create an unbounded event channel
pub fn event_channel() -> (EventSender, EventReceiver) {
    crossbeam_channel::unbounded()
}

/// Events for core -> UI/listener communication
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardEvent {
    /// Log message
    Log {
        level: LogLevel,
        message: String,
        timestamp: DateTime<Local>,
    },

    /// A selector changed its chart type (`chartTypeChanged`)
    ChartTypeChanged {
        chart_type: ChartType,
        container_id: String,
    },

    /// A chart controller changed lifecycle state
    ChartStateChanged {
        chart_id: String,
        state: ControllerState,
        message: Option<String>,
    },

    /// A refresh cycle finished, successfully or not
    RefreshCompleted {
        page_type: PageType,
        at: DateTime<Local>,
        ok: bool,
    },
}

impl DashboardEvent {
    /// Create a log event with current timestamp
    pub fn log(level: LogLevel, message: impl Into<String>) -> Self {
        Self::Log {
            level,
            message: message.into(),
            timestamp: Local::now(),
        }
    }

    /// Create a warning log event
    pub fn warn(message: impl Into<String>) -> Self {
        Self::log(LogLevel::Warn, message)
    }

    /// Create an error log event
    pub fn error(message: impl Into<String>) -> Self {
        Self::log(LogLevel::Error, message)
    }
}
