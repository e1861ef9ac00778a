//! State - View State Modules
//!
//! Plain state owned by exactly one controller; other components only see copies.

pub mod chart_state;
pub mod log_state;
