use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, NaiveDateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use super::linear::tick_step;
use super::{AxisDomain, ContinuousScale, check_range, datetime_to_millis, millis_to_datetime};
use crate::constants::duration;
use crate::constants::scale::{DEFAULT_TICK_COUNT, DEGENERATE_TIME_PADDING_MS};
use crate::error::{ChartError, Result};
use crate::state::Axis;

/// Affine scale from a time interval onto a pixel range.
///
/// Calendar arithmetic is done in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeScale {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    range: [f64; 2],
}

impl TimeScale {
    /// Build a scale whose domain is `domain` rounded outward to calendar units
    pub fn new(domain: [DateTime<Utc>; 2], range: [f64; 2]) -> Result<Self> {
        check_range(range, Axis::X)?;
        let [start, end] = ordered(domain);
        let [start, end] = if start == end {
            let pad = Duration::milliseconds(DEGENERATE_TIME_PADDING_MS);
            match (start.checked_sub_signed(pad), end.checked_add_signed(pad)) {
                (Some(s), Some(e)) => [s, e],
                _ => return Err(ChartError::domain(Axis::X, "timestamp at the edge of the calendar")),
            }
        } else {
            [start, end]
        };
        let [start, end] = nice_time(start, end, DEFAULT_TICK_COUNT).unwrap_or([start, end]);
        Ok(Self { start, end, range })
    }

    /// Build a niced scale from epoch-millisecond bounds
    pub fn from_millis(domain: [f64; 2], range: [f64; 2]) -> Result<Self> {
        Self::new(checked_millis(domain)?, range)
    }

    /// Build a scale over `domain` exactly as given, without rounding
    pub fn raw(domain: [DateTime<Utc>; 2], range: [f64; 2]) -> Result<Self> {
        check_range(range, Axis::X)?;
        let [start, end] = ordered(domain);
        Ok(Self { start, end, range })
    }

    /// Pixel position of a timestamp
    pub fn apply(&self, t: DateTime<Utc>) -> f64 {
        self.map(datetime_to_millis(t))
    }

    /// Timestamp at a pixel position, if representable
    pub fn invert(&self, pixel: f64) -> Option<DateTime<Utc>> {
        millis_to_datetime(self.unmap(pixel))
    }

    pub fn domain(&self) -> AxisDomain {
        AxisDomain::time(self.start, self.end)
    }
}

impl ContinuousScale for TimeScale {
    fn bounds(&self) -> [f64; 2] {
        [datetime_to_millis(self.start), datetime_to_millis(self.end)]
    }

    fn range(&self) -> [f64; 2] {
        self.range
    }
}

fn ordered([a, b]: [DateTime<Utc>; 2]) -> [DateTime<Utc>; 2] {
    if a <= b { [a, b] } else { [b, a] }
}

fn checked_millis(domain: [f64; 2]) -> Result<[DateTime<Utc>; 2]> {
    let convert = |ms: f64| {
        millis_to_datetime(ms)
            .ok_or_else(|| ChartError::domain(Axis::X, format!("{} is not a valid timestamp", ms)))
    };
    Ok([convert(domain[0])?, convert(domain[1])?])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimeUnit {
    Millisecond,
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

/// A calendar unit taken `step` at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TimeInterval {
    unit: TimeUnit,
    step: i64,
}

const fn interval(unit: TimeUnit, step: i64) -> TimeInterval {
    TimeInterval { unit, step }
}

/// Candidate intervals, ordered by approximate duration
const TICK_INTERVALS: [(TimeInterval, f64); 18] = [
    (interval(TimeUnit::Second, 1), duration::SECOND),
    (interval(TimeUnit::Second, 5), 5.0 * duration::SECOND),
    (interval(TimeUnit::Second, 15), 15.0 * duration::SECOND),
    (interval(TimeUnit::Second, 30), 30.0 * duration::SECOND),
    (interval(TimeUnit::Minute, 1), duration::MINUTE),
    (interval(TimeUnit::Minute, 5), 5.0 * duration::MINUTE),
    (interval(TimeUnit::Minute, 15), 15.0 * duration::MINUTE),
    (interval(TimeUnit::Minute, 30), 30.0 * duration::MINUTE),
    (interval(TimeUnit::Hour, 1), duration::HOUR),
    (interval(TimeUnit::Hour, 3), 3.0 * duration::HOUR),
    (interval(TimeUnit::Hour, 6), 6.0 * duration::HOUR),
    (interval(TimeUnit::Hour, 12), 12.0 * duration::HOUR),
    (interval(TimeUnit::Day, 1), duration::DAY),
    (interval(TimeUnit::Day, 2), 2.0 * duration::DAY),
    (interval(TimeUnit::Week, 1), duration::WEEK),
    (interval(TimeUnit::Month, 1), duration::MONTH),
    (interval(TimeUnit::Month, 3), 3.0 * duration::MONTH),
    (interval(TimeUnit::Year, 1), duration::YEAR),
];

/// Pick the interval whose duration best matches `span / count`
fn tick_interval(start: f64, stop: f64, count: usize) -> TimeInterval {
    let target = (stop - start).abs() / count.max(1) as f64;
    let i = TICK_INTERVALS.partition_point(|(_, d)| *d <= target);
    if i == TICK_INTERVALS.len() {
        let years = tick_step(start / duration::YEAR, stop / duration::YEAR, count);
        return interval(TimeUnit::Year, (years.abs().round() as i64).max(1));
    }
    if i == 0 {
        let millis = tick_step(start, stop, count);
        return interval(TimeUnit::Millisecond, (millis.abs().round() as i64).max(1));
    }
    let (below, below_duration) = TICK_INTERVALS[i - 1];
    let (above, above_duration) = TICK_INTERVALS[i];
    if target / below_duration < above_duration / target {
        below
    } else {
        above
    }
}

/// Round `[start, end]` outward to the interval chosen for its span
fn nice_time(start: DateTime<Utc>, end: DateTime<Utc>, count: usize) -> Option<[DateTime<Utc>; 2]> {
    profiling::scope!("nice_time");

    let chosen = tick_interval(datetime_to_millis(start), datetime_to_millis(end), count);
    let floor = chosen.floor(start.naive_utc())?;
    let ceil = chosen.ceil(end.naive_utc())?;
    Some([floor.and_utc(), ceil.and_utc()])
}

impl TimeInterval {
    /// Latest boundary at or before `t`
    fn floor(&self, t: NaiveDateTime) -> Option<NaiveDateTime> {
        match self.unit {
            TimeUnit::Millisecond => {
                let ms = t.and_utc().timestamp_millis();
                let floored = ms.div_euclid(self.step) * self.step;
                DateTime::<Utc>::from_timestamp_millis(floored).map(|d| d.naive_utc())
            }
            TimeUnit::Year => {
                let year = t.year().div_euclid(self.step as i32) * self.step as i32;
                NaiveDate::from_ymd_opt(year, 1, 1)?.and_hms_opt(0, 0, 0)
            }
            _ => {
                let mut d = floor_unit(self.unit, t)?;
                while !self.accepts(d) {
                    d = floor_unit(self.unit, d.checked_sub_signed(Duration::milliseconds(1))?)?;
                }
                Some(d)
            }
        }
    }

    /// Earliest boundary at or after `t`
    fn ceil(&self, t: NaiveDateTime) -> Option<NaiveDateTime> {
        let before = self.floor(t.checked_sub_signed(Duration::milliseconds(1))?)?;
        let next = self.advance(before)?;
        self.floor(next)
    }

    /// Next boundary after the boundary `t`
    fn advance(&self, t: NaiveDateTime) -> Option<NaiveDateTime> {
        match self.unit {
            TimeUnit::Millisecond => t.checked_add_signed(Duration::milliseconds(self.step)),
            TimeUnit::Year => t.checked_add_months(Months::new(12 * self.step as u32)),
            _ => {
                let mut d = offset_unit(self.unit, t)?;
                while !self.accepts(d) {
                    d = offset_unit(self.unit, d)?;
                }
                Some(d)
            }
        }
    }

    /// Whether a unit boundary is also a boundary of this stepped interval
    fn accepts(&self, t: NaiveDateTime) -> bool {
        let field = match self.unit {
            TimeUnit::Second => t.second() as i64,
            TimeUnit::Minute => t.minute() as i64,
            TimeUnit::Hour => t.hour() as i64,
            TimeUnit::Day => t.day0() as i64,
            TimeUnit::Month => t.month0() as i64,
            TimeUnit::Week | TimeUnit::Millisecond | TimeUnit::Year => return true,
        };
        field % self.step == 0
    }
}

fn floor_unit(unit: TimeUnit, t: NaiveDateTime) -> Option<NaiveDateTime> {
    let midnight = t.date().and_hms_opt(0, 0, 0)?;
    match unit {
        TimeUnit::Millisecond => Some(t),
        TimeUnit::Second => t.with_nanosecond(0),
        TimeUnit::Minute => t.with_nanosecond(0)?.with_second(0),
        TimeUnit::Hour => t.with_nanosecond(0)?.with_second(0)?.with_minute(0),
        TimeUnit::Day => Some(midnight),
        TimeUnit::Week => {
            let back = t.weekday().num_days_from_sunday() as i64;
            midnight.checked_sub_signed(Duration::days(back))
        }
        TimeUnit::Month => midnight.with_day(1),
        TimeUnit::Year => midnight.with_day(1)?.with_month(1),
    }
}

fn offset_unit(unit: TimeUnit, t: NaiveDateTime) -> Option<NaiveDateTime> {
    match unit {
        TimeUnit::Millisecond => t.checked_add_signed(Duration::milliseconds(1)),
        TimeUnit::Second => t.checked_add_signed(Duration::seconds(1)),
        TimeUnit::Minute => t.checked_add_signed(Duration::minutes(1)),
        TimeUnit::Hour => t.checked_add_signed(Duration::hours(1)),
        TimeUnit::Day => t.checked_add_signed(Duration::days(1)),
        TimeUnit::Week => t.checked_add_signed(Duration::weeks(1)),
        TimeUnit::Month => t.checked_add_months(Months::new(1)),
        TimeUnit::Year => t.checked_add_months(Months::new(12)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn test_nice_to_days() {
        let scale = TimeScale::new(
            [utc(2024, 1, 1, 6, 30, 0), utc(2024, 1, 9, 17, 0, 0)],
            [0.0, 800.0],
        )
        .unwrap();
        assert_eq!(scale.domain(), AxisDomain::time(utc(2024, 1, 1, 0, 0, 0), utc(2024, 1, 10, 0, 0, 0)));
    }

    #[test]
    fn test_nice_to_hours() {
        // 10 hour span -> one hour ticks
        let scale = TimeScale::new(
            [utc(2024, 3, 5, 8, 12, 0), utc(2024, 3, 5, 18, 5, 0)],
            [0.0, 800.0],
        )
        .unwrap();
        assert_eq!(scale.domain(), AxisDomain::time(utc(2024, 3, 5, 8, 0, 0), utc(2024, 3, 5, 19, 0, 0)));
    }

    #[test]
    fn test_nice_to_months() {
        // Roughly ten months -> monthly ticks
        let scale = TimeScale::new(
            [utc(2023, 2, 14, 0, 0, 0), utc(2023, 12, 3, 0, 0, 0)],
            [0.0, 800.0],
        )
        .unwrap();
        assert_eq!(scale.domain(), AxisDomain::time(utc(2023, 2, 1, 0, 0, 0), utc(2024, 1, 1, 0, 0, 0)));
    }

    #[test]
    fn test_nice_to_quarters() {
        // A little over three years -> quarterly ticks, not whole years
        let scale = TimeScale::new(
            [utc(2020, 5, 15, 0, 0, 0), utc(2023, 8, 10, 0, 0, 0)],
            [0.0, 1.0],
        )
        .unwrap();
        assert_eq!(scale.domain(), AxisDomain::time(utc(2020, 4, 1, 0, 0, 0), utc(2023, 10, 1, 0, 0, 0)));
    }

    #[test]
    fn test_nice_to_years() {
        let scale = TimeScale::new(
            [utc(2001, 6, 1, 0, 0, 0), utc(2019, 6, 1, 0, 0, 0)],
            [0.0, 800.0],
        )
        .unwrap();
        assert_eq!(scale.domain(), AxisDomain::time(utc(2000, 1, 1, 0, 0, 0), utc(2020, 1, 1, 0, 0, 0)));
    }

    #[test]
    fn test_nice_contains_input() {
        let cases = [
            (utc(2024, 1, 1, 0, 0, 1), utc(2024, 1, 1, 0, 0, 4)),
            (utc(2024, 2, 28, 23, 59, 0), utc(2024, 3, 1, 0, 1, 0)),
            (utc(2020, 5, 5, 5, 5, 5), utc(2020, 8, 9, 10, 11, 12)),
            (utc(1999, 12, 31, 12, 0, 0), utc(2031, 1, 1, 0, 0, 0)),
        ];
        for (start, end) in cases {
            let scale = TimeScale::new([start, end], [0.0, 1.0]).unwrap();
            let [lo, hi] = scale.bounds();
            assert!(lo <= datetime_to_millis(start));
            assert!(hi >= datetime_to_millis(end));
        }
    }

    #[test]
    fn test_degenerate_time_domain_is_padded() {
        let t = utc(2024, 1, 1, 12, 0, 0);
        let scale = TimeScale::new([t, t], [0.0, 100.0]).unwrap();
        let [lo, hi] = scale.bounds();
        assert!(lo < datetime_to_millis(t));
        assert!(hi > datetime_to_millis(t));
    }

    #[test]
    fn test_degenerate_domain_at_calendar_edge_rejected() {
        let t = DateTime::<Utc>::MAX_UTC;
        assert!(TimeScale::new([t, t], [0.0, 100.0]).is_err());
    }

    #[test]
    fn test_invalid_millis_rejected() {
        assert!(TimeScale::from_millis([f64::NAN, 0.0], [0.0, 1.0]).is_err());
        assert!(TimeScale::from_millis([0.0, f64::INFINITY], [0.0, 1.0]).is_err());
        assert!(TimeScale::from_millis([0.0, 1e30], [0.0, 1.0]).is_err());
    }

    #[test]
    fn test_apply_and_invert() {
        let start = utc(2024, 1, 1, 0, 0, 0);
        let end = utc(2024, 1, 2, 0, 0, 0);
        let scale = TimeScale::raw([start, end], [0.0, 240.0]).unwrap();
        assert_eq!(scale.apply(utc(2024, 1, 1, 12, 0, 0)), 120.0);
        assert_eq!(scale.invert(60.0), Some(utc(2024, 1, 1, 6, 0, 0)));
        // Extrapolates
        assert_eq!(scale.apply(utc(2024, 1, 3, 0, 0, 0)), 480.0);
    }
}
