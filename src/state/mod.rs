//! Chart interaction state
//!
//! Each chart owns one [`ZoomController`]; the layout it was built with
//! decides which wheel events reach it.

mod layout;
mod zoom;

pub use layout::{ChartLayout, Margin, PointerRegion};
pub use zoom::{
    AxisExtents, WheelOutcome, WheelPlan, ZoomController, ZoomEvent, ZoomLimits, ZoomRequest,
    ZoomState,
};

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the three zoomable axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Y2,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Y2 => "y2",
        };
        f.write_str(name)
    }
}
