//! Page - DOM Contract Snapshot and Page Classification
//!
//! The dashboard never touches a real browser DOM. It reads and writes the
//! handful of elements it depends on through an in-memory [`Document`].

pub mod classifier;
pub mod context;
pub mod document;

pub use classifier::classify;
pub use document::{Document, Element, SharedDocument};
