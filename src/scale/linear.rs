use serde::{Deserialize, Serialize};

use super::{AxisDomain, ContinuousScale, check_range};
use crate::constants::scale::*;
use crate::error::{ChartError, Result};
use crate::state::Axis;

// Thresholds between the 1/2/5/10 step ladder (geometric midpoints).
const E10: f64 = 7.0710678118654755; // sqrt(50)
const E5: f64 = 3.1622776601683795; // sqrt(10)
const E2: f64 = 1.4142135623730951; // sqrt(2)

/// Affine scale between two real intervals
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    domain: [f64; 2],
    range: [f64; 2],
}

impl LinearScale {
    /// Build a scale whose domain is `domain` rounded outward to nice values.
    ///
    /// Endpoints are ordered first; a zero-width domain is padded
    /// symmetrically before rounding so the result always has a span.
    pub fn new(domain: [f64; 2], range: [f64; 2]) -> Result<Self> {
        let [low, high] = checked_domain(domain)?;
        check_range(range, Axis::Y)?;
        let [low, high] = pad_degenerate(low, high);
        Ok(Self {
            domain: nice_linear(low, high, DEFAULT_TICK_COUNT),
            range,
        })
    }

    /// Build a scale over `domain` exactly as given, without rounding
    pub fn raw(domain: [f64; 2], range: [f64; 2]) -> Result<Self> {
        let domain = checked_domain(domain)?;
        check_range(range, Axis::Y)?;
        Ok(Self { domain, range })
    }

    /// Pixel position of a domain value
    pub fn apply(&self, value: f64) -> f64 {
        self.map(value)
    }

    /// Domain value at a pixel position
    pub fn invert(&self, pixel: f64) -> f64 {
        self.unmap(pixel)
    }

    pub fn domain(&self) -> AxisDomain {
        AxisDomain::numeric(self.domain[0], self.domain[1])
    }
}

impl ContinuousScale for LinearScale {
    fn bounds(&self) -> [f64; 2] {
        self.domain
    }

    fn range(&self) -> [f64; 2] {
        self.range
    }
}

fn checked_domain(domain: [f64; 2]) -> Result<[f64; 2]> {
    if let Some(bad) = domain.iter().find(|v| !v.is_finite()) {
        return Err(ChartError::domain(Axis::Y, format!("bound {} is not finite", bad)));
    }
    let [a, b] = domain;
    Ok(if a <= b { [a, b] } else { [b, a] })
}

fn pad_degenerate(low: f64, high: f64) -> [f64; 2] {
    if low != high {
        return [low, high];
    }
    let pad = (low.abs() * DEGENERATE_PADDING_RATIO).max(DEGENERATE_MIN_PADDING);
    [low - pad, high + pad]
}

/// Step between nice ticks covering `[start, stop]` with about `count` ticks.
///
/// Positive results are the step itself; negative results encode a
/// fractional step as the negated reciprocal, which keeps the rounding exact.
pub(crate) fn tick_increment(start: f64, stop: f64, count: usize) -> f64 {
    let step = (stop - start) / count.max(1) as f64;
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };
    if power >= 0.0 {
        factor * 10f64.powf(power)
    } else {
        -10f64.powf(-power) / factor
    }
}

/// Signed nice step for a span, as a plain number
pub(crate) fn tick_step(start: f64, stop: f64, count: usize) -> f64 {
    let step0 = (stop - start).abs() / count.max(1) as f64;
    let mut step1 = 10f64.powf(step0.log10().floor());
    let error = step0 / step1;
    if error >= E10 {
        step1 *= 10.0;
    } else if error >= E5 {
        step1 *= 5.0;
    } else if error >= E2 {
        step1 *= 2.0;
    }
    if stop < start { -step1 } else { step1 }
}

/// Round `[low, high]` outward to multiples of a nice step.
///
/// Iterates until the step is stable, since widening the domain can change
/// the step. The result always contains the input.
pub(crate) fn nice_linear(low: f64, high: f64, count: usize) -> [f64; 2] {
    profiling::scope!("nice_linear");

    let (mut start, mut stop) = (low, high);
    let mut previous: Option<f64> = None;
    for _ in 0..MAX_NICE_ITERATIONS {
        let step = tick_increment(start, stop, count);
        if previous == Some(step) {
            break;
        }
        if step > 0.0 {
            start = (start / step).floor() * step;
            stop = (stop / step).ceil() * step;
        } else if step < 0.0 {
            start = (start * step).ceil() / step;
            stop = (stop * step).floor() / step;
        } else {
            break;
        }
        previous = Some(step);
    }

    if start.is_finite() && stop.is_finite() {
        [start.min(low), stop.max(high)]
    } else {
        [low, high]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nice_rounds_outward() {
        let scale = LinearScale::new([3.0, 97.0], [0.0, 500.0]).unwrap();
        assert_eq!(scale.domain(), AxisDomain::numeric(0.0, 100.0));
    }

    #[test]
    fn test_nice_fractional_steps() {
        assert_eq!(nice_linear(0.23, 0.87, 10), [0.2, 0.9]);
        assert_eq!(nice_linear(45.0, 55.0, 10), [45.0, 55.0]);
        assert_eq!(nice_linear(-13.0, 127.0, 10), [-20.0, 140.0]);
    }

    #[test]
    fn test_nice_contains_input() {
        let samples = [
            (0.001, 0.0093),
            (-5.5, 3.2),
            (1234.5, 98765.4),
            (-1e-7, 3e-7),
            (42.0, 42.5),
            (-1e12, 7.3e12),
            (0.1, 0.7),
        ];
        for (lo, hi) in samples {
            let [nlo, nhi] = nice_linear(lo, hi, DEFAULT_TICK_COUNT);
            assert!(nlo <= lo, "{} > {}", nlo, lo);
            assert!(nhi >= hi, "{} < {}", nhi, hi);
        }
    }

    #[test]
    fn test_degenerate_domain_is_padded() {
        let scale = LinearScale::new([50.0, 50.0], [0.0, 100.0]).unwrap();
        let [low, high] = scale.bounds();
        assert!(low < 50.0 && high > 50.0);
        assert_eq!(low, 45.0);
        assert_eq!(high, 55.0);

        let zero = LinearScale::new([0.0, 0.0], [0.0, 100.0]).unwrap();
        assert_eq!(zero.bounds(), [-1.0, 1.0]);
    }

    #[test]
    fn test_reversed_domain_is_ordered() {
        let scale = LinearScale::new([97.0, 3.0], [0.0, 100.0]).unwrap();
        assert_eq!(scale.bounds(), [0.0, 100.0]);
    }

    #[test]
    fn test_non_finite_domain_rejected() {
        assert!(LinearScale::new([f64::NAN, 1.0], [0.0, 1.0]).is_err());
        assert!(LinearScale::new([0.0, f64::INFINITY], [0.0, 1.0]).is_err());
        assert!(LinearScale::raw([f64::NEG_INFINITY, 0.0], [0.0, 1.0]).is_err());
        assert!(LinearScale::new([0.0, 1.0], [0.0, f64::NAN]).is_err());
    }

    #[test]
    fn test_apply_and_invert() {
        let scale = LinearScale::raw([0.0, 10.0], [300.0, 0.0]).unwrap();
        assert_eq!(scale.apply(0.0), 300.0);
        assert_eq!(scale.apply(10.0), 0.0);
        assert_eq!(scale.apply(5.0), 150.0);
        assert_eq!(scale.invert(150.0), 5.0);

        // Extrapolates past the domain
        assert_eq!(scale.apply(20.0), -300.0);
        assert_eq!(scale.apply(-10.0), 600.0);
    }

    #[test]
    fn test_tick_step_sign() {
        assert_eq!(tick_step(0.0, 100.0, 10), 10.0);
        assert_eq!(tick_step(100.0, 0.0, 10), -10.0);
        assert!((tick_step(0.0, 3.0, 10) - 0.2).abs() < 1e-12);
    }
}
