//! Variability view: one box plot per entity

use super::numeric_scale;
use crate::config::ChartConfig;
use crate::data::{BoxPlotGroup, box_plot_groups, combined_extent};
use crate::error::Result;
use crate::scale::{AxisDomain, BandScale, LinearScale};
use crate::state::{
    Axis, AxisExtents, ChartLayout, PointerRegion, WheelOutcome, ZoomController, ZoomEvent,
};

#[derive(Debug, Clone)]
pub struct VariabilityScales {
    pub x: BandScale,
    pub y: LinearScale,
}

/// Box-plot groups plus a Y-only zoom controller
#[derive(Debug, Clone)]
pub struct VariabilityChart {
    groups: Vec<BoxPlotGroup>,
    zoom: ZoomController,
    y_extent: AxisDomain,
    band_padding: f64,
}

impl VariabilityChart {
    pub fn new(groups: Vec<BoxPlotGroup>, width: f64, height: f64, config: &ChartConfig) -> Self {
        let [low, high] = combined_extent(&groups);
        let layout = ChartLayout::new(width, height, config.variability_margin);
        Self {
            groups,
            zoom: ZoomController::new(layout).with_limits(config.zoom_limits),
            y_extent: AxisDomain::numeric(low, high),
            band_padding: config.band_padding,
        }
    }

    /// Group `records` and build the chart in one step
    pub fn from_records<R, G, V>(records: &[R], group_fn: G, value_fn: V, width: f64, height: f64, config: &ChartConfig) -> Self
    where
        G: Fn(&R) -> String,
        V: Fn(&R) -> Option<f64>,
    {
        let groups = box_plot_groups(records, group_fn, value_fn, config.outlier_multiplier);
        Self::new(groups, width, height, config)
    }

    /// Share a Y extent with another chart, e.g. the SPC domain of the timeline
    pub fn with_y_extent(mut self, extent: [f64; 2]) -> Self {
        self.y_extent = AxisDomain::numeric(extent[0], extent[1]);
        self
    }

    pub fn groups(&self) -> &[BoxPlotGroup] {
        &self.groups
    }

    pub fn y_extent(&self) -> AxisDomain {
        self.y_extent
    }

    pub fn layout(&self) -> &ChartLayout {
        self.zoom.layout()
    }

    pub fn scales(&self) -> Result<VariabilityScales> {
        let layout = self.zoom.layout();
        let categories = self.groups.iter().map(|g| g.entity.clone()).collect();
        let x = BandScale::new(categories, [0.0, layout.inner_width()], self.band_padding);
        let y_domain = self.zoom.effective_domain(Axis::Y, self.y_extent);
        let y = numeric_scale(y_domain, [layout.inner_height(), 0.0], Axis::Y)?;
        Ok(VariabilityScales { x, y })
    }

    /// Wheel over the Y axis zooms it; every other region is left to the page
    pub fn handle_wheel(&mut self, x: f64, y: f64, delta_y: f64) -> WheelOutcome {
        if self.zoom.layout().classify(x, y) != PointerRegion::LeftOfYAxis {
            return WheelOutcome {
                consumed: false,
                event: None,
            };
        }
        let extents = AxisExtents {
            x: AxisDomain::numeric(0.0, 1.0),
            y: self.y_extent,
            y2: None,
        };
        self.zoom.handle_wheel(x, y, delta_y, &extents)
    }

    /// Apply a Y domain chosen by a linked chart
    pub fn set_y_zoom(&mut self, domain: Option<AxisDomain>) -> ZoomEvent {
        self.zoom.set_domain(Axis::Y, domain)
    }

    pub fn reset_zoom(&mut self) -> ZoomEvent {
        self.zoom.reset()
    }

    pub fn y_zoom_level(&self) -> f64 {
        self.zoom.zoom_level(Axis::Y, self.y_extent)
    }
}
