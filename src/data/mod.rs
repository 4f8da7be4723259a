//! Measurement data: records, loading and statistics

pub mod boxplot;
pub mod record;
pub mod source;
pub mod stats;

pub use boxplot::{BoxPlotGroup, BoxPlotStats, box_plot_groups, combined_extent};
pub use record::{MeasurementRecord, numeric_extent, time_extent, unique_values};
pub use source::DataSource;
pub use stats::Stats;
