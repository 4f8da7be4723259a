//! Axis domains and the values that live on them

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A value positioned on an axis: either a plain number or a timestamp.
///
/// Both kinds share a linear representation (`f64`, epoch milliseconds for
/// timestamps) that every scale and zoom computation works in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AxisValue {
    Number(f64),
    Time(DateTime<Utc>),
}

impl AxisValue {
    /// Linear representation of the value
    pub fn linear(&self) -> f64 {
        match self {
            AxisValue::Number(v) => *v,
            AxisValue::Time(t) => datetime_to_millis(*t),
        }
    }
}

impl From<f64> for AxisValue {
    fn from(value: f64) -> Self {
        AxisValue::Number(value)
    }
}

impl From<DateTime<Utc>> for AxisValue {
    fn from(value: DateTime<Utc>) -> Self {
        AxisValue::Time(value)
    }
}

/// An ordered pair of bounds on one axis. The two kinds never mix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AxisDomain {
    Numeric { low: f64, high: f64 },
    Time { start: DateTime<Utc>, end: DateTime<Utc> },
}

impl AxisDomain {
    pub fn numeric(low: f64, high: f64) -> Self {
        AxisDomain::Numeric { low, high }
    }

    pub fn time(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        AxisDomain::Time { start, end }
    }

    /// Bounds in linear representation
    pub fn bounds(&self) -> [f64; 2] {
        match self {
            AxisDomain::Numeric { low, high } => [*low, *high],
            AxisDomain::Time { start, end } => [datetime_to_millis(*start), datetime_to_millis(*end)],
        }
    }

    /// Width of the domain in linear units
    pub fn span(&self) -> f64 {
        let [low, high] = self.bounds();
        high - low
    }

    pub fn is_time(&self) -> bool {
        matches!(self, AxisDomain::Time { .. })
    }

    /// Domain of the same kind with new linear bounds.
    ///
    /// Returns `None` when a time bound falls outside the representable range.
    pub fn with_bounds(&self, low: f64, high: f64) -> Option<Self> {
        match self {
            AxisDomain::Numeric { .. } => Some(AxisDomain::Numeric { low, high }),
            AxisDomain::Time { .. } => Some(AxisDomain::Time {
                start: millis_to_datetime(low)?,
                end: millis_to_datetime(high)?,
            }),
        }
    }
}

/// Epoch milliseconds of a timestamp
pub fn datetime_to_millis(t: DateTime<Utc>) -> f64 {
    t.timestamp_millis() as f64
}

/// Timestamp at the given epoch milliseconds, rounded to the nearest millisecond
pub fn millis_to_datetime(ms: f64) -> Option<DateTime<Utc>> {
    if !ms.is_finite() {
        return None;
    }
    let rounded = ms.round();
    if rounded < i64::MIN as f64 || rounded > i64::MAX as f64 {
        return None;
    }
    DateTime::<Utc>::from_timestamp_millis(rounded as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_time_domain_bounds_are_epoch_millis() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        let domain = AxisDomain::time(start, end);

        assert_eq!(domain.bounds(), [1_704_067_200_000.0, 1_704_153_600_000.0]);
        assert_eq!(domain.span(), 86_400_000.0);
        assert!(domain.is_time());
    }

    #[test]
    fn test_with_bounds_keeps_kind() {
        let numeric = AxisDomain::numeric(0.0, 10.0);
        assert_eq!(numeric.with_bounds(2.0, 4.0), Some(AxisDomain::numeric(2.0, 4.0)));

        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let time = AxisDomain::time(start, start);
        let shifted = time.with_bounds(0.0, 1_000.0).unwrap();
        assert!(shifted.is_time());
        assert_eq!(shifted.bounds(), [0.0, 1_000.0]);

        assert_eq!(time.with_bounds(f64::NAN, 0.0), None);
        assert_eq!(time.with_bounds(0.0, 1e30), None);
    }

    #[test]
    fn test_axis_value_linear() {
        let t = Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 1).unwrap();
        assert_eq!(AxisValue::from(t).linear(), 1_000.0);
        assert_eq!(AxisValue::from(2.5).linear(), 2.5);
    }
}
