//! Chart summaries for the command line

use polars::prelude::{NamedFrom, Series};
use serde::Serialize;

use crate::chart::{TimelineChart, VariabilityChart, x_extent};
use crate::config::ChartConfig;
use crate::data::stats::{Stats, calculate_stats};
use crate::data::{BoxPlotGroup, MeasurementRecord, numeric_extent};
use crate::error::Result;
use crate::scale::AxisDomain;
use crate::spc::{SpcLimitRecord, SpcLimits, latest_for_chart, population_std_dev};
use crate::state::AxisExtents;

/// Nominal canvas used to nice the reported domains
const SUMMARY_WIDTH: f64 = 1200.0;
const SUMMARY_HEIGHT: f64 = 500.0;

/// What to summarize
#[derive(Debug, Clone)]
pub struct SummaryRequest<'a> {
    /// Column the box plots group by
    pub group: &'a str,
    /// Numeric column on the Y axis
    pub value: &'a str,
    /// Chart name for limit lookup; defaults to the value column
    pub chart: Option<&'a str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub chart: String,
    pub records: usize,
    pub data_extent: [f64; 2],
    /// Mean, median and spread of the value column across all entities
    pub value_stats: Stats,
    pub all_entity_std_dev: f64,
    pub limits: Option<SpcLimits>,
    /// Y domain before nice rounding
    pub spc_domain: [f64; 2],
    pub x_domain: AxisDomain,
    pub y_domain: AxisDomain,
    pub groups: Vec<BoxPlotGroup>,
}

pub fn summarize(
    records: &[MeasurementRecord],
    limit_records: &[SpcLimitRecord],
    request: &SummaryRequest<'_>,
    config: &ChartConfig,
) -> Result<Summary> {
    profiling::scope!("summarize");

    let chart_name = request.chart.unwrap_or(request.value).to_string();
    let value_fn = |r: &MeasurementRecord| r.value(request.value);

    let data_extent = numeric_extent(records, value_fn);
    let values: Vec<f64> = records.iter().filter_map(value_fn).collect();
    let value_stats = calculate_stats(&Series::new(request.value.into(), values));
    let std_dev = population_std_dev(records, value_fn);
    let limits = latest_for_chart(limit_records, &chart_name);
    if limits.is_none() && !limit_records.is_empty() {
        tracing::warn!(chart = %chart_name, "no control limits for chart");
    }

    let extents = AxisExtents {
        x: x_extent(records, |r| r.date_process, |_| None),
        y: AxisDomain::numeric(data_extent[0], data_extent[1]),
        y2: None,
    };
    let timeline = TimelineChart::new(chart_name.clone(), SUMMARY_WIDTH, SUMMARY_HEIGHT, extents, config)
        .with_spc_limits(limits.as_ref(), Some(std_dev), &config.spc);
    let spc_domain = timeline.extents().y.bounds();
    let scales = timeline.scales()?;

    let variability = VariabilityChart::from_records(
        records,
        |r| r.key(request.group).unwrap_or_default(),
        value_fn,
        SUMMARY_WIDTH,
        SUMMARY_HEIGHT,
        config,
    )
    .with_y_extent(spc_domain);

    tracing::info!(
        chart = %chart_name,
        groups = variability.groups().len(),
        "summary computed"
    );

    Ok(Summary {
        chart: chart_name,
        records: records.len(),
        data_extent,
        value_stats,
        all_entity_std_dev: std_dev,
        limits,
        spc_domain,
        x_domain: scales.x_axis.domain(),
        y_domain: scales.y.domain(),
        groups: variability.groups().to_vec(),
    })
}
