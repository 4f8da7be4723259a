//! Timeline view: measurements over time with optional secondary axis

use chrono::{DateTime, Utc};

use super::{ZoomLevels, numeric_scale};
use crate::config::ChartConfig;
use crate::data::{numeric_extent, time_extent};
use crate::error::Result;
use crate::scale::{AxisDomain, AxisScale, AxisValue, LinearScale};
use crate::spc::{SpcDomainConfig, SpcLimits, validate_domain};
use crate::state::{
    Axis, AxisExtents, ChartLayout, WheelOutcome, WheelPlan, ZoomController, ZoomEvent,
    ZoomRequest,
};
use crate::visible::VisibleDataFilter;

/// Scales of one timeline frame
#[derive(Debug, Clone, Copy)]
pub struct TimelineScales {
    /// X axis line, spanning the full plot width
    pub x_axis: AxisScale,
    /// X positions of data points, inset by the data margin
    pub x_data: AxisScale,
    pub y: LinearScale,
    pub y2: Option<LinearScale>,
}

/// X extent of a timeline: timestamps when the records carry them
pub fn x_extent<R, FT, FN>(records: &[R], time_fn: FT, number_fn: FN) -> AxisDomain
where
    FT: Fn(&R) -> Option<DateTime<Utc>>,
    FN: Fn(&R) -> Option<f64>,
{
    match time_extent(records, time_fn) {
        Some([start, end]) => AxisDomain::time(start, end),
        None => {
            let [low, high] = numeric_extent(records, number_fn);
            AxisDomain::numeric(low, high)
        }
    }
}

/// Zoom state and scale wiring for one timeline chart
#[derive(Debug, Clone)]
pub struct TimelineChart {
    name: String,
    zoom: ZoomController,
    extents: AxisExtents,
    data_margin: f64,
}

impl TimelineChart {
    /// `extents` are the unzoomed domains; a Y2 extent enables the secondary axis
    pub fn new(name: impl Into<String>, width: f64, height: f64, extents: AxisExtents, config: &ChartConfig) -> Self {
        let layout = ChartLayout::new(width, height, config.timeline_margin).with_y2(extents.y2.is_some());
        Self {
            name: name.into(),
            zoom: ZoomController::new(layout).with_limits(config.zoom_limits),
            extents,
            data_margin: config.data_margin,
        }
    }

    /// Replace the Y extent with the SPC-aware domain around the data extent
    pub fn with_spc_limits(mut self, limits: Option<&SpcLimits>, all_entity_std_dev: Option<f64>, config: &SpcDomainConfig) -> Self {
        let data_extent = self.extents.y.bounds();
        let domain = validate_domain(config.domain(data_extent, limits, all_entity_std_dev), &self.name);
        self.extents.y = AxisDomain::numeric(domain[0], domain[1]);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn layout(&self) -> &ChartLayout {
        self.zoom.layout()
    }

    pub fn extents(&self) -> &AxisExtents {
        &self.extents
    }

    pub fn zoom(&self) -> &ZoomController {
        &self.zoom
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        let layout = ChartLayout {
            width,
            height,
            ..*self.zoom.layout()
        };
        self.zoom.set_layout(layout);
    }

    /// Build the scales for the current zoom state
    pub fn scales(&self) -> Result<TimelineScales> {
        let layout = self.zoom.layout();
        let inner_width = layout.inner_width();
        let inner_height = layout.inner_height();

        let x_domain = self.zoom.effective_domain(Axis::X, self.extents.x);
        let x_axis = AxisScale::nice(x_domain, [0.0, inner_width], Axis::X)?;
        let x_data = AxisScale::nice(
            x_domain,
            [self.data_margin, inner_width - self.data_margin],
            Axis::X,
        )?;

        let y_domain = self.zoom.effective_domain(Axis::Y, self.extents.y);
        let y = numeric_scale(y_domain, [inner_height, 0.0], Axis::Y)?;

        let y2 = match self.extents.y2 {
            Some(original) => {
                let domain = self.zoom.effective_domain(Axis::Y2, original);
                Some(numeric_scale(domain, [inner_height, 0.0], Axis::Y2)?)
            }
            None => None,
        };

        Ok(TimelineScales {
            x_axis,
            x_data,
            y,
            y2,
        })
    }

    /// Records whose points land inside the plot for the given scales
    pub fn visible<'r, R, FX, FY, FY2>(
        &self,
        scales: &TimelineScales,
        records: &'r [R],
        x_fn: FX,
        y_fn: FY,
        y2_fn: FY2,
    ) -> Vec<&'r R>
    where
        FX: Fn(&R) -> Option<AxisValue>,
        FY: Fn(&R) -> Option<f64>,
        FY2: Fn(&R) -> Option<f64>,
    {
        let layout = self.zoom.layout();
        VisibleDataFilter::new(&scales.x_data, &scales.y, layout.inner_width(), layout.inner_height())
            .with_y2(scales.y2.as_ref())
            .with_margin(self.data_margin)
            .filter(records, x_fn, y_fn, y2_fn)
    }

    pub fn handle_wheel(&mut self, x: f64, y: f64, delta_y: f64) -> WheelOutcome {
        self.zoom.handle_wheel(x, y, delta_y, &self.extents)
    }

    pub fn plan_wheel(&self, x: f64, y: f64, delta_y: f64) -> WheelPlan {
        self.zoom.plan_wheel(x, y, delta_y, &self.extents)
    }

    pub fn commit(&mut self, request: ZoomRequest) -> Result<ZoomEvent> {
        self.zoom.commit(request)
    }

    pub fn set_zoom(&mut self, axis: Axis, domain: Option<AxisDomain>) -> ZoomEvent {
        self.zoom.set_domain(axis, domain)
    }

    pub fn reset_zoom(&mut self) -> ZoomEvent {
        self.zoom.reset()
    }

    pub fn zoom_levels(&self) -> ZoomLevels {
        ZoomLevels {
            x: self.zoom.zoom_level(Axis::X, self.extents.x),
            y: self.zoom.zoom_level(Axis::Y, self.extents.y),
            y2: self.extents.y2.map(|original| self.zoom.zoom_level(Axis::Y2, original)),
        }
    }
}
