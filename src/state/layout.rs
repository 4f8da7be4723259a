//! Plot area geometry and pointer hit-testing

use serde::{Deserialize, Serialize};

use crate::constants::layout::*;

/// Outer margins around the plotted rectangle, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margin {
    pub fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    pub fn timeline() -> Self {
        Self::new(
            TIMELINE_MARGIN_TOP,
            TIMELINE_MARGIN_RIGHT,
            TIMELINE_MARGIN_BOTTOM,
            TIMELINE_MARGIN_LEFT,
        )
    }

    pub fn variability() -> Self {
        Self::new(
            VARIABILITY_MARGIN_TOP,
            VARIABILITY_MARGIN_RIGHT,
            VARIABILITY_MARGIN_BOTTOM,
            VARIABILITY_MARGIN_LEFT,
        )
    }
}

impl Default for Margin {
    fn default() -> Self {
        Self::timeline()
    }
}

/// Where a pointer sits relative to the plotted rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerRegion {
    /// Strip under the plot holding the X axis
    BelowXAxis,
    /// Strip left of the plot holding the Y axis
    LeftOfYAxis,
    /// Strip right of the plot holding the secondary Y axis
    RightOfY2Axis,
    Inside,
    Elsewhere,
}

impl PointerRegion {
    /// Whether a wheel event here belongs to the chart rather than the page
    pub fn is_axis(&self) -> bool {
        matches!(
            self,
            PointerRegion::BelowXAxis | PointerRegion::LeftOfYAxis | PointerRegion::RightOfY2Axis
        )
    }
}

/// Outer size of a chart and where its plot sits inside it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartLayout {
    pub width: f64,
    pub height: f64,
    pub margin: Margin,
    /// Whether a secondary Y axis is drawn on the right
    pub has_y2: bool,
}

impl ChartLayout {
    pub fn new(width: f64, height: f64, margin: Margin) -> Self {
        Self {
            width,
            height,
            margin,
            has_y2: false,
        }
    }

    pub fn with_y2(mut self, has_y2: bool) -> Self {
        self.has_y2 = has_y2;
        self
    }

    pub fn inner_width(&self) -> f64 {
        (self.width - self.margin.left - self.margin.right).max(0.0)
    }

    pub fn inner_height(&self) -> f64 {
        (self.height - self.margin.top - self.margin.bottom).max(0.0)
    }

    /// Classify a pointer position given relative to the chart's top-left corner.
    ///
    /// Axis strips are closed intervals; where two touch, X wins over Y and
    /// Y over Y2.
    pub fn classify(&self, x: f64, y: f64) -> PointerRegion {
        let left = self.margin.left;
        let top = self.margin.top;
        let right = left + self.inner_width();
        let bottom = top + self.inner_height();

        let in_x_band = x >= left && x <= right;
        let in_y_band = y >= top && y <= bottom;

        if in_x_band && y >= bottom && y <= self.height {
            PointerRegion::BelowXAxis
        } else if in_y_band && x >= 0.0 && x <= left {
            PointerRegion::LeftOfYAxis
        } else if self.has_y2 && in_y_band && x >= right && x <= right + Y2_ZOOM_WIDTH {
            PointerRegion::RightOfY2Axis
        } else if in_x_band && in_y_band {
            PointerRegion::Inside
        } else {
            PointerRegion::Elsewhere
        }
    }
}
