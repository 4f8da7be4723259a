//! Windowing of records by projected pixel position
//!
//! A record is visible when its X pixel falls inside the data band
//! `[margin, inner_width - margin]` and at least one of its configured Y
//! pixels falls inside `[0, inner_height]`. The filter is recomputed from
//! the current scales on every call; nothing is cached.

use crate::constants::layout::DATA_MARGIN;
use crate::scale::{AxisScale, AxisValue, LinearScale};

#[derive(Debug, Clone, Copy)]
pub struct VisibleDataFilter<'s> {
    x: &'s AxisScale,
    y: &'s LinearScale,
    y2: Option<&'s LinearScale>,
    inner_width: f64,
    inner_height: f64,
    margin: f64,
}

impl<'s> VisibleDataFilter<'s> {
    pub fn new(x: &'s AxisScale, y: &'s LinearScale, inner_width: f64, inner_height: f64) -> Self {
        Self {
            x,
            y,
            y2: None,
            inner_width,
            inner_height,
            margin: DATA_MARGIN,
        }
    }

    pub fn with_y2(mut self, y2: Option<&'s LinearScale>) -> Self {
        self.y2 = y2;
        self
    }

    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    /// Visibility of a single point. `y2` is ignored without a secondary scale.
    pub fn is_visible(&self, x: Option<AxisValue>, y: Option<f64>, y2: Option<f64>) -> bool {
        let Some(x) = x else {
            return false;
        };
        let px = self.x.apply(x);
        if !(px >= self.margin && px <= self.inner_width - self.margin) {
            return false;
        }

        let in_height = |py: f64| py >= 0.0 && py <= self.inner_height;
        let y_visible = y.is_some_and(|v| in_height(self.y.apply(v)));
        let y2_visible = match self.y2 {
            Some(scale) => y2.is_some_and(|v| in_height(scale.apply(v))),
            None => false,
        };
        y_visible || y2_visible
    }

    /// Records that would be drawn, in input order
    pub fn filter<'r, R, FX, FY, FY2>(&self, records: &'r [R], x_fn: FX, y_fn: FY, y2_fn: FY2) -> Vec<&'r R>
    where
        FX: Fn(&R) -> Option<AxisValue>,
        FY: Fn(&R) -> Option<f64>,
        FY2: Fn(&R) -> Option<f64>,
    {
        profiling::scope!("VisibleDataFilter::filter");

        records
            .iter()
            .filter(|r| self.is_visible(x_fn(r), y_fn(r), y2_fn(r)))
            .collect()
    }
}
