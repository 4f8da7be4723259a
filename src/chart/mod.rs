//! Chart orchestration
//!
//! Each chart keeps its unzoomed extents and a zoom controller, and rebuilds
//! its scales from them on demand. Drawing is left to the host.

mod timeline;
mod variability;

pub use timeline::{TimelineChart, TimelineScales, x_extent};
pub use variability::{VariabilityChart, VariabilityScales};

use serde::Serialize;

use crate::error::{ChartError, Result};
use crate::scale::{AxisDomain, LinearScale, relabel};
use crate::state::Axis;

/// Zoom level of each axis; 1 means unzoomed
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ZoomLevels {
    pub x: f64,
    pub y: f64,
    pub y2: Option<f64>,
}

/// Niced linear scale for a value axis
fn numeric_scale(domain: AxisDomain, range: [f64; 2], axis: Axis) -> Result<LinearScale> {
    match domain {
        AxisDomain::Numeric { low, high } => {
            LinearScale::new([low, high], range).map_err(|e| relabel(e, axis))
        }
        AxisDomain::Time { .. } => Err(ChartError::domain(axis, "value axes take numbers, not dates")),
    }
}
