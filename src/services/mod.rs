//! Service Layer
//!
//! HTTP access, hook registry, refresh strategies and the refresh scheduler.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     RefreshScheduler                          │
//! │   timer ──► StrategyTable[page type] ──► RefreshStrategy      │
//! └──────────────────────────────────────────────────────────────┘
//!                            │
//!                            ▼ hooks by key
//! ┌──────────────────────────────────────────────────────────────┐
//! │  HookRegistry   (chart controllers, widgets, production)      │
//! └──────────────────────────────────────────────────────────────┘
//!                            │
//!                            ▼ FarmDataSource
//! ┌──────────────────────────────────────────────────────────────┐
//! │  HttpDataClient (reqwest)                                     │
//! └──────────────────────────────────────────────────────────────┘
//! ```

mod client;
mod hooks;
mod report;
mod runtime;
mod scheduler;
mod strategies;

pub use client::*;
pub use hooks::*;
pub use report::*;
pub use runtime::*;
pub use scheduler::*;
pub use strategies::*;
