//! Per-axis zoom state machine
//!
//! A controller tracks an optional domain override for each of X, Y and Y2.
//! `None` means the axis shows its original extent. Wheel events are routed
//! by [`ChartLayout::classify`]; only the three axis strips zoom.

use serde::{Deserialize, Serialize};

use super::{Axis, ChartLayout, PointerRegion};
use crate::constants::zoom::*;
use crate::error::{ChartError, Result};
use crate::scale::AxisDomain;

/// Committed domain overrides
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ZoomState {
    pub x: Option<AxisDomain>,
    pub y: Option<AxisDomain>,
    pub y2: Option<AxisDomain>,
}

impl ZoomState {
    pub fn get(&self, axis: Axis) -> Option<AxisDomain> {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Y2 => self.y2,
        }
    }

    fn slot(&mut self, axis: Axis) -> &mut Option<AxisDomain> {
        match axis {
            Axis::X => &mut self.x,
            Axis::Y => &mut self.y,
            Axis::Y2 => &mut self.y2,
        }
    }

    pub fn is_zoomed(&self) -> bool {
        self.x.is_some() || self.y.is_some() || self.y2.is_some()
    }
}

/// Original (unzoomed) extent of each axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisExtents {
    pub x: AxisDomain,
    pub y: AxisDomain,
    pub y2: Option<AxisDomain>,
}

impl AxisExtents {
    pub fn get(&self, axis: Axis) -> Option<AxisDomain> {
        match axis {
            Axis::X => Some(self.x),
            Axis::Y => Some(self.y),
            Axis::Y2 => self.y2,
        }
    }
}

/// Bounds on the zoom level a controller accepts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomLimits {
    pub min: f64,
    pub max: f64,
}

impl Default for ZoomLimits {
    fn default() -> Self {
        Self {
            min: MIN_ZOOM,
            max: MAX_ZOOM,
        }
    }
}

impl ZoomLimits {
    pub fn allows(&self, level: f64) -> bool {
        level >= self.min && level <= self.max
    }
}

/// Notification emitted to the host after a state change
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "domain")]
pub enum ZoomEvent {
    XZoomChanged(Option<AxisDomain>),
    YZoomChanged(Option<AxisDomain>),
    Y2ZoomChanged(Option<AxisDomain>),
    ResetZoom,
}

impl ZoomEvent {
    pub fn changed(axis: Axis, domain: Option<AxisDomain>) -> Self {
        match axis {
            Axis::X => ZoomEvent::XZoomChanged(domain),
            Axis::Y => ZoomEvent::YZoomChanged(domain),
            Axis::Y2 => ZoomEvent::Y2ZoomChanged(domain),
        }
    }
}

/// A zoom computed against one revision of the controller
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomRequest {
    pub axis: Axis,
    pub domain: AxisDomain,
    pub revision: u64,
}

/// What a wheel event would do
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WheelPlan {
    /// Not over an axis strip; the host lets the page scroll
    Ignored,
    /// Over an axis strip but nothing changes
    Consumed,
    Zoom(ZoomRequest),
}

/// Result of handling a wheel event
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelOutcome {
    /// Host must suppress the default scroll
    pub consumed: bool,
    pub event: Option<ZoomEvent>,
}

impl WheelOutcome {
    fn ignored() -> Self {
        Self {
            consumed: false,
            event: None,
        }
    }

    fn consumed(event: Option<ZoomEvent>) -> Self {
        Self {
            consumed: true,
            event,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ZoomController {
    state: ZoomState,
    layout: ChartLayout,
    limits: Option<ZoomLimits>,
    revision: u64,
}

impl ZoomController {
    pub fn new(layout: ChartLayout) -> Self {
        Self {
            state: ZoomState::default(),
            layout,
            limits: None,
            revision: 0,
        }
    }

    pub fn with_limits(mut self, limits: Option<ZoomLimits>) -> Self {
        self.limits = limits;
        self
    }

    pub fn state(&self) -> &ZoomState {
        &self.state
    }

    pub fn layout(&self) -> &ChartLayout {
        &self.layout
    }

    /// Replace the layout after a resize; committed domains are kept
    pub fn set_layout(&mut self, layout: ChartLayout) {
        self.layout = layout;
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Committed override for an axis
    pub fn domain(&self, axis: Axis) -> Option<AxisDomain> {
        self.state.get(axis)
    }

    /// Domain an axis currently shows
    pub fn effective_domain(&self, axis: Axis, original: AxisDomain) -> AxisDomain {
        self.state.get(axis).unwrap_or(original)
    }

    /// `original span / current span`; exactly 1 when the axis is not zoomed
    pub fn zoom_level(&self, axis: Axis, original: AxisDomain) -> f64 {
        match self.state.get(axis) {
            None => 1.0,
            Some(current) => original.span() / current.span(),
        }
    }

    /// Work out what a wheel event at `(x, y)` would do, without changing state
    pub fn plan_wheel(&self, x: f64, y: f64, delta_y: f64, extents: &AxisExtents) -> WheelPlan {
        let axis = match self.layout.classify(x, y) {
            PointerRegion::BelowXAxis => Axis::X,
            PointerRegion::LeftOfYAxis => Axis::Y,
            PointerRegion::RightOfY2Axis => Axis::Y2,
            PointerRegion::Inside | PointerRegion::Elsewhere => return WheelPlan::Ignored,
        };

        let factor = if delta_y < 0.0 {
            WHEEL_FACTOR
        } else if delta_y > 0.0 {
            1.0 / WHEEL_FACTOR
        } else {
            return WheelPlan::Consumed;
        };

        let Some(original) = extents.get(axis) else {
            return WheelPlan::Consumed;
        };
        let current = self.effective_domain(axis, original);
        let [low, high] = current.bounds();
        let center = low + (high - low) / 2.0;
        let new_range = (high - low) / factor;

        let Some(domain) = current.with_bounds(center - new_range / 2.0, center + new_range / 2.0)
        else {
            tracing::debug!(%axis, "zoom leaves the representable time range");
            return WheelPlan::Consumed;
        };

        if let Some(limits) = self.limits {
            let level = original.span() / domain.span();
            if !limits.allows(level) {
                tracing::debug!(%axis, level, "zoom rejected by limits");
                return WheelPlan::Consumed;
            }
        }

        WheelPlan::Zoom(ZoomRequest {
            axis,
            domain,
            revision: self.revision,
        })
    }

    /// Commit a planned zoom if nothing has changed since it was planned
    pub fn commit(&mut self, request: ZoomRequest) -> Result<ZoomEvent> {
        if request.revision != self.revision {
            tracing::debug!(
                requested = request.revision,
                current = self.revision,
                "stale zoom request"
            );
            return Err(ChartError::StaleZoomRequest {
                requested: request.revision,
                current: self.revision,
            });
        }
        Ok(self.store(request.axis, Some(request.domain)))
    }

    /// Plan and commit a wheel event in one step
    pub fn handle_wheel(&mut self, x: f64, y: f64, delta_y: f64, extents: &AxisExtents) -> WheelOutcome {
        match self.plan_wheel(x, y, delta_y, extents) {
            WheelPlan::Ignored => WheelOutcome::ignored(),
            WheelPlan::Consumed => WheelOutcome::consumed(None),
            WheelPlan::Zoom(request) => {
                WheelOutcome::consumed(Some(self.store(request.axis, Some(request.domain))))
            }
        }
    }

    /// Restore a domain, e.g. from persisted host state
    pub fn set_domain(&mut self, axis: Axis, domain: Option<AxisDomain>) -> ZoomEvent {
        self.store(axis, domain)
    }

    /// Clear every override
    pub fn reset(&mut self) -> ZoomEvent {
        self.state = ZoomState::default();
        self.revision += 1;
        tracing::debug!(revision = self.revision, "zoom reset");
        ZoomEvent::ResetZoom
    }

    fn store(&mut self, axis: Axis, domain: Option<AxisDomain>) -> ZoomEvent {
        *self.state.slot(axis) = domain;
        self.revision += 1;
        tracing::debug!(%axis, ?domain, revision = self.revision, "zoom committed");
        ZoomEvent::changed(axis, domain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Margin;
    use chrono::{TimeZone, Utc};

    // Plot spans x in [70, 730], y in [60, 340]; Y2 strip x in [730, 815]
    const BELOW_X: (f64, f64) = (400.0, 370.0);
    const LEFT_OF_Y: (f64, f64) = (30.0, 200.0);
    const RIGHT_OF_Y2: (f64, f64) = (780.0, 200.0);
    const INSIDE: (f64, f64) = (400.0, 200.0);

    fn controller(has_y2: bool) -> ZoomController {
        ZoomController::new(ChartLayout::new(930.0, 400.0, Margin::timeline()).with_y2(has_y2))
    }

    fn extents() -> AxisExtents {
        AxisExtents {
            x: AxisDomain::numeric(0.0, 100.0),
            y: AxisDomain::numeric(0.0, 100.0),
            y2: Some(AxisDomain::numeric(-10.0, 10.0)),
        }
    }

    fn assert_bounds(domain: AxisDomain, expected: [f64; 2]) {
        let [low, high] = domain.bounds();
        assert!((low - expected[0]).abs() < 1e-9, "{} != {}", low, expected[0]);
        assert!((high - expected[1]).abs() < 1e-9, "{} != {}", high, expected[1]);
    }

    #[test]
    fn test_zoom_in_on_y_axis() {
        let mut zoom = controller(false);
        let (x, y) = LEFT_OF_Y;
        let outcome = zoom.handle_wheel(x, y, -100.0, &extents());

        assert!(outcome.consumed);
        let Some(ZoomEvent::YZoomChanged(Some(domain))) = outcome.event else {
            panic!("expected a Y zoom event, got {:?}", outcome.event);
        };
        // range 100 / 1.2 = 83.333 centred on 50
        assert_bounds(domain, [8.333333333333336, 91.66666666666666]);
        assert_eq!(zoom.domain(Axis::X), None);
        assert_eq!(zoom.domain(Axis::Y2), None);
        assert!((zoom.zoom_level(Axis::Y, extents().y) - 1.2).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_out_then_in_round_trips() {
        let mut zoom = controller(false);
        let (x, y) = BELOW_X;
        zoom.handle_wheel(x, y, 100.0, &extents());
        let out = zoom.domain(Axis::X).unwrap();
        assert_bounds(out, [-10.0, 110.0]);

        zoom.handle_wheel(x, y, -100.0, &extents());
        assert_bounds(zoom.domain(Axis::X).unwrap(), [0.0, 100.0]);
    }

    #[test]
    fn test_zooming_one_axis_leaves_others_untouched() {
        let mut zoom = controller(true);
        zoom.set_domain(Axis::X, Some(AxisDomain::numeric(1.0 / 3.0, 2.0 / 3.0)));
        let x_before = zoom.domain(Axis::X);

        let (x, y) = RIGHT_OF_Y2;
        let outcome = zoom.handle_wheel(x, y, -1.0, &extents());
        assert!(matches!(outcome.event, Some(ZoomEvent::Y2ZoomChanged(Some(_)))));
        assert_eq!(zoom.domain(Axis::X), x_before);
        assert_eq!(zoom.domain(Axis::Y), None);
    }

    #[test]
    fn test_zooming_x_leaves_y_axes_untouched() {
        let mut zoom = controller(true);
        zoom.set_domain(Axis::Y, Some(AxisDomain::numeric(20.0, 80.0)));
        zoom.set_domain(Axis::Y2, Some(AxisDomain::numeric(-5.0, 5.0)));
        let y_before = zoom.domain(Axis::Y);
        let y2_before = zoom.domain(Axis::Y2);

        let (x, y) = BELOW_X;
        let outcome = zoom.handle_wheel(x, y, 1.0, &extents());
        assert!(matches!(outcome.event, Some(ZoomEvent::XZoomChanged(Some(_)))));
        assert_eq!(zoom.domain(Axis::Y), y_before);
        assert_eq!(zoom.domain(Axis::Y2), y2_before);
        assert!((zoom.zoom_level(Axis::X, extents().x) - 1.0 / 1.2).abs() < 1e-9);
    }

    #[test]
    fn test_inside_and_elsewhere_are_not_consumed() {
        let mut zoom = controller(true);
        let (x, y) = INSIDE;
        let outcome = zoom.handle_wheel(x, y, -100.0, &extents());
        assert!(!outcome.consumed);
        assert_eq!(outcome.event, None);

        let outcome = zoom.handle_wheel(900.0, 10.0, -100.0, &extents());
        assert!(!outcome.consumed);
        assert!(!zoom.state().is_zoomed());
        assert_eq!(zoom.revision(), 0);
    }

    #[test]
    fn test_y2_strip_without_secondary_axis() {
        let mut zoom = controller(false);
        let (x, y) = RIGHT_OF_Y2;
        let outcome = zoom.handle_wheel(x, y, -100.0, &extents());
        assert!(!outcome.consumed);
        assert_eq!(zoom.domain(Axis::Y2), None);
    }

    #[test]
    fn test_zero_delta_is_consumed_without_change() {
        let mut zoom = controller(false);
        let (x, y) = BELOW_X;
        let outcome = zoom.handle_wheel(x, y, 0.0, &extents());
        assert!(outcome.consumed);
        assert_eq!(outcome.event, None);
        assert_eq!(zoom.domain(Axis::X), None);
    }

    #[test]
    fn test_reset_clears_all_axes() {
        let mut zoom = controller(true);
        let (x, y) = BELOW_X;
        zoom.handle_wheel(x, y, -1.0, &extents());
        let (x, y) = LEFT_OF_Y;
        zoom.handle_wheel(x, y, -1.0, &extents());
        let (x, y) = RIGHT_OF_Y2;
        zoom.handle_wheel(x, y, 1.0, &extents());

        assert_eq!(zoom.reset(), ZoomEvent::ResetZoom);
        assert_eq!(*zoom.state(), ZoomState::default());
        let extents = extents();
        assert_eq!(zoom.zoom_level(Axis::X, extents.x), 1.0);
        assert_eq!(zoom.zoom_level(Axis::Y, extents.y), 1.0);
        assert_eq!(zoom.zoom_level(Axis::Y2, extents.y2.unwrap()), 1.0);
    }

    #[test]
    fn test_time_axis_zoom() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 1, 11, 0, 0, 0).unwrap();
        let extents = AxisExtents {
            x: AxisDomain::time(start, end),
            ..extents()
        };

        let mut zoom = controller(false);
        let (x, y) = BELOW_X;
        zoom.handle_wheel(x, y, 50.0, &extents);

        // Ten days zoomed out to twelve, centred on Jan 6
        let domain = zoom.domain(Axis::X).unwrap();
        assert!(domain.is_time());
        assert_eq!(domain, AxisDomain::time(
            Utc.with_ymd_and_hms(2023, 12, 31, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 12, 0, 0, 0).unwrap(),
        ));
    }

    #[test]
    fn test_stale_request_rejected() {
        let mut zoom = controller(false);
        let (x, y) = BELOW_X;
        let WheelPlan::Zoom(first) = zoom.plan_wheel(x, y, -1.0, &extents()) else {
            panic!("expected a zoom plan");
        };
        let WheelPlan::Zoom(second) = zoom.plan_wheel(x, y, -1.0, &extents()) else {
            panic!("expected a zoom plan");
        };

        assert!(zoom.commit(first).is_ok());
        let err = zoom.commit(second).unwrap_err();
        assert!(matches!(
            err,
            ChartError::StaleZoomRequest {
                requested: 0,
                current: 1
            }
        ));
        assert_eq!(zoom.domain(Axis::X), Some(first.domain));
    }

    #[test]
    fn test_limits_reject_without_changing_state() {
        let mut zoom = controller(false).with_limits(Some(ZoomLimits { min: 0.5, max: 1.3 }));
        let (x, y) = LEFT_OF_Y;

        // 1.2 is allowed, 1.44 is not
        assert!(zoom.handle_wheel(x, y, -1.0, &extents()).event.is_some());
        let before = *zoom.state();
        let outcome = zoom.handle_wheel(x, y, -1.0, &extents());
        assert!(outcome.consumed);
        assert_eq!(outcome.event, None);
        assert_eq!(*zoom.state(), before);
    }

    #[test]
    fn test_event_serialization() {
        let event = ZoomEvent::XZoomChanged(Some(AxisDomain::numeric(1.0, 2.0)));
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(
            json,
            r#"{"type":"XZoomChanged","domain":{"kind":"numeric","low":1.0,"high":2.0}}"#
        );
        let back: ZoomEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
