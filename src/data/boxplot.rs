//! Box-plot statistics per group
//!
//! Quartiles use linear interpolation between closest ranks. A value is an
//! outlier only when it lies strictly outside the whisker bounds, so values
//! sitting exactly on a bound are drawn inside the whisker.

use serde::Serialize;
use std::collections::BTreeMap;

use super::stats::{mean, quantile_sorted, sample_std_dev};
use crate::constants::scale::EMPTY_EXTENT;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxPlotStats {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub iqr: f64,
    /// `q1 - multiplier * iqr`; the outlier cutoff, not a data value
    pub lower_whisker: f64,
    /// `q3 + multiplier * iqr`
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
    /// Smallest value inside the whiskers, `q1` when there is none
    pub min_non_outlier: f64,
    /// Largest value inside the whiskers, `q3` when there is none
    pub max_non_outlier: f64,
    pub mean: f64,
    /// Sample standard deviation
    pub std_dev: f64,
    pub count: usize,
    pub is_single_point: bool,
}

impl BoxPlotStats {
    /// Statistics of ascending, finite `sorted` values. `None` when empty.
    pub fn from_sorted(sorted: &[f64], multiplier: f64) -> Option<Self> {
        let q1 = quantile_sorted(sorted, 0.25)?;
        let median = quantile_sorted(sorted, 0.5)?;
        let q3 = quantile_sorted(sorted, 0.75)?;
        let iqr = q3 - q1;
        let lower_whisker = q1 - multiplier * iqr;
        let upper_whisker = q3 + multiplier * iqr;

        let (inside, outliers): (Vec<f64>, Vec<f64>) = sorted
            .iter()
            .partition(|&&v| v >= lower_whisker && v <= upper_whisker);

        Some(Self {
            q1,
            median,
            q3,
            iqr,
            lower_whisker,
            upper_whisker,
            outliers,
            min_non_outlier: inside.first().copied().unwrap_or(q1),
            max_non_outlier: inside.last().copied().unwrap_or(q3),
            mean: mean(sorted)?,
            std_dev: sample_std_dev(sorted),
            count: sorted.len(),
            is_single_point: sorted.len() == 1,
        })
    }

    /// Statistics of arbitrary values; NaN and infinities are dropped
    pub fn from_values(values: &[f64], multiplier: f64) -> Option<Self> {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        sorted.sort_by(f64::total_cmp);
        Self::from_sorted(&sorted, multiplier)
    }
}

/// One box in the variability view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxPlotGroup {
    pub entity: String,
    /// Valid values, ascending
    pub values: Vec<f64>,
    #[serde(flatten)]
    pub stats: BoxPlotStats,
}

/// Group records by key and compute box-plot statistics for each group.
///
/// Missing and non-finite values are skipped; groups left empty are
/// omitted. Groups come back sorted by key.
pub fn box_plot_groups<R, G, V>(records: &[R], group_fn: G, value_fn: V, multiplier: f64) -> Vec<BoxPlotGroup>
where
    G: Fn(&R) -> String,
    V: Fn(&R) -> Option<f64>,
{
    profiling::scope!("box_plot_groups");

    let mut grouped: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for record in records {
        if let Some(value) = value_fn(record).filter(|v| v.is_finite()) {
            grouped.entry(group_fn(record)).or_default().push(value);
        }
    }

    grouped
        .into_iter()
        .filter_map(|(entity, mut values)| {
            values.sort_by(f64::total_cmp);
            let stats = BoxPlotStats::from_sorted(&values, multiplier)?;
            Some(BoxPlotGroup {
                entity,
                values,
                stats,
            })
        })
        .collect()
}

/// `[min, max]` over every value in every group, `[0, 1]` when there are none
pub fn combined_extent(groups: &[BoxPlotGroup]) -> [f64; 2] {
    let low = groups.iter().filter_map(|g| g.values.first()).copied().reduce(f64::min);
    let high = groups.iter().filter_map(|g| g.values.last()).copied().reduce(f64::max);
    match (low, high) {
        (Some(low), Some(high)) => [low, high],
        _ => EMPTY_EXTENT,
    }
}
