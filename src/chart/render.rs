//! Rendering Facade
//!
//! The chart-drawing library sits behind [`ChartRenderer`] and [`ChartHandle`].
//! [`RecordingRenderer`] keeps the last options in memory instead of drawing,
//! which is all the headless client and the tests need.

use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::chart::options::ChartOptions;

/// Handle to a constructed chart
pub trait ChartHandle: Send {
    /// Replace the chart's options in place and redraw
    fn update(&mut self, options: ChartOptions);

    /// Show series `index`; false when out of range
    fn show_series(&mut self, index: usize) -> bool;

    /// Hide series `index`; false when out of range
    fn hide_series(&mut self, index: usize) -> bool;
}

/// Factory for chart handles
pub trait ChartRenderer: Send + Sync {
    fn render(&self, container_id: &str, options: ChartOptions) -> Box<dyn ChartHandle>;
}

/// Counters shared between a [`RecordingRenderer`] and its handles
#[derive(Debug, Default)]
pub struct RenderStats {
    pub constructed: AtomicUsize,
    pub updates: AtomicUsize,
}

/// Renderer that records what would have been drawn
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    stats: Arc<RenderStats>,
    last: Arc<Mutex<Option<ChartOptions>>>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of charts constructed from scratch
    pub fn constructed(&self) -> usize {
        self.stats.constructed.load(Ordering::SeqCst)
    }

    /// Number of in-place updates across all handles
    pub fn updates(&self) -> usize {
        self.stats.updates.load(Ordering::SeqCst)
    }

    /// Options most recently drawn by any handle
    pub fn last_options(&self) -> Option<ChartOptions> {
        self.last.lock().clone()
    }
}

impl ChartRenderer for RecordingRenderer {
    fn render(&self, container_id: &str, options: ChartOptions) -> Box<dyn ChartHandle> {
        tracing::debug!(container_id, series = options.series.len(), "Constructing chart");
        self.stats.constructed.fetch_add(1, Ordering::SeqCst);
        *self.last.lock() = Some(options.clone());
        Box::new(RecordedChart {
            options,
            stats: self.stats.clone(),
            last: self.last.clone(),
        })
    }
}

/// Handle produced by [`RecordingRenderer`]
#[derive(Debug)]
pub struct RecordedChart {
    options: ChartOptions,
    stats: Arc<RenderStats>,
    last: Arc<Mutex<Option<ChartOptions>>>,
}

impl RecordedChart {
    fn publish(&self) {
        *self.last.lock() = Some(self.options.clone());
    }

    fn set_visible(&mut self, index: usize, visible: bool) -> bool {
        let Some(series) = self.options.series.get_mut(index) else {
            return false;
        };
        series.visible = visible;
        self.publish();
        true
    }
}

impl ChartHandle for RecordedChart {
    fn update(&mut self, options: ChartOptions) {
        self.options = options;
        self.stats.updates.fetch_add(1, Ordering::SeqCst);
        self.publish();
    }

    fn show_series(&mut self, index: usize) -> bool {
        self.set_visible(index, true)
    }

    fn hide_series(&mut self, index: usize) -> bool {
        self.set_visible(index, false)
    }
}
