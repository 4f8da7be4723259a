//! SPC Oxide: scale, zoom and statistics engine for SPC measurement charts
//!
//! The crate computes everything a rendering host needs to draw a timeline
//! view and a variability (box plot) view of process measurements. It does
//! no drawing itself.

pub mod chart;
pub mod config;
pub mod constants;
pub mod data;
pub mod error;
pub mod scale;
pub mod spc;
pub mod state;
pub mod summary;
pub mod visible;

pub use chart::{TimelineChart, VariabilityChart};
pub use config::ChartConfig;
pub use error::{ChartError, Result};
pub use scale::{AxisDomain, AxisScale, AxisValue, BandScale, LinearScale, TimeScale};
pub use state::{Axis, ChartLayout, ZoomController, ZoomEvent};
pub use visible::VisibleDataFilter;
