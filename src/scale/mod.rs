//! Scale construction
//!
//! Linear and time scales map a domain onto a pixel range with an affine
//! function over the domain's linear representation. Both round their domain
//! outward to "nice" values on construction. Nothing is clamped: values
//! outside the domain extrapolate, which whisker and outlier placement rely on.

mod band;
mod domain;
mod linear;
mod time;

pub use band::BandScale;
pub use domain::{AxisDomain, AxisValue, datetime_to_millis, millis_to_datetime};
pub use linear::LinearScale;
pub use time::TimeScale;

use crate::error::{ChartError, Result};
use crate::state::Axis;

/// Affine mapping shared by the continuous scales
pub trait ContinuousScale {
    /// Domain bounds in linear representation
    fn bounds(&self) -> [f64; 2];

    /// Pixel range
    fn range(&self) -> [f64; 2];

    /// Map a linear domain value to a pixel position
    fn map(&self, value: f64) -> f64 {
        let [d0, d1] = self.bounds();
        let [r0, r1] = self.range();
        let span = d1 - d0;
        if span == 0.0 {
            return r0 + (r1 - r0) * 0.5;
        }
        r0 + (value - d0) / span * (r1 - r0)
    }

    /// Map a pixel position back to a linear domain value
    fn unmap(&self, pixel: f64) -> f64 {
        let [d0, d1] = self.bounds();
        let [r0, r1] = self.range();
        let extent = r1 - r0;
        if extent == 0.0 {
            return d0;
        }
        d0 + (pixel - r0) / extent * (d1 - d0)
    }
}

/// A scale for an axis whose kind is only known at runtime (the timeline X axis)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AxisScale {
    Linear(LinearScale),
    Time(TimeScale),
}

impl AxisScale {
    /// Build a niced scale of the domain's kind
    pub fn nice(domain: AxisDomain, range: [f64; 2], axis: Axis) -> Result<Self> {
        match domain {
            AxisDomain::Numeric { low, high } => {
                LinearScale::new([low, high], range).map(AxisScale::Linear)
            }
            AxisDomain::Time { start, end } => {
                TimeScale::new([start, end], range).map(AxisScale::Time)
            }
        }
        .map_err(|e| relabel(e, axis))
    }

    /// Project an axis value to a pixel position
    pub fn apply(&self, value: AxisValue) -> f64 {
        self.map(value.linear())
    }

    /// Domain after nice rounding
    pub fn domain(&self) -> AxisDomain {
        match self {
            AxisScale::Linear(s) => s.domain(),
            AxisScale::Time(s) => s.domain(),
        }
    }
}

impl ContinuousScale for AxisScale {
    fn bounds(&self) -> [f64; 2] {
        match self {
            AxisScale::Linear(s) => s.bounds(),
            AxisScale::Time(s) => s.bounds(),
        }
    }

    fn range(&self) -> [f64; 2] {
        match self {
            AxisScale::Linear(s) => s.range(),
            AxisScale::Time(s) => s.range(),
        }
    }
}

/// Reject non-finite pixel ranges
pub(crate) fn check_range(range: [f64; 2], axis: Axis) -> Result<()> {
    if range.iter().all(|r| r.is_finite()) {
        Ok(())
    } else {
        Err(ChartError::domain(axis, format!("pixel range {:?} is not finite", range)))
    }
}

/// Put the axis the caller is building on a domain error raised by a scale constructor
pub(crate) fn relabel(err: ChartError, axis: Axis) -> ChartError {
    match err {
        ChartError::Domain { reason, .. } => ChartError::Domain { axis, reason },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_axis_scale_dispatch() {
        let linear = AxisScale::nice(AxisDomain::numeric(3.0, 97.0), [0.0, 100.0], Axis::X).unwrap();
        assert_eq!(linear.domain(), AxisDomain::numeric(0.0, 100.0));
        assert_eq!(linear.apply(AxisValue::Number(50.0)), 50.0);

        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 1, 11, 0, 0, 0).unwrap();
        let time = AxisScale::nice(AxisDomain::time(start, end), [0.0, 1000.0], Axis::X).unwrap();
        assert!(time.domain().is_time());
        assert_eq!(time.apply(AxisValue::Time(start)), 0.0);
        assert_eq!(time.apply(AxisValue::Time(end)), 1000.0);
    }

    #[test]
    fn test_domain_error_names_axis() {
        let err = AxisScale::nice(AxisDomain::numeric(f64::NAN, 1.0), [0.0, 1.0], Axis::Y2).unwrap_err();
        assert!(matches!(err, ChartError::Domain { axis: Axis::Y2, .. }));
    }

    #[test]
    fn test_monotonic_for_inverted_range() {
        let scale = LinearScale::new([0.0, 100.0], [400.0, 0.0]).unwrap();
        let mut last = f64::INFINITY;
        for i in -10..=110 {
            let px = scale.apply(i as f64);
            assert!(px <= last);
            last = px;
        }
    }
}
