//! Chart - Declarative Options and the Rendering Facade

pub mod options;
pub mod render;

pub use options::{ChartFamily, ChartOptions, SeriesOptions, ValueFormat, volume_title};
pub use render::{ChartHandle, ChartRenderer, RecordingRenderer};
