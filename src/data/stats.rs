use polars::prelude::*;
use serde::Serialize;

/// Summary of one numeric column
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct Stats {
    pub mean: f64,
    pub std_dev: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    /// Non-null values counted
    pub count: usize,
}

/// Summarize a Series with polars aggregations (sample std dev)
pub fn calculate_stats(series: &Series) -> Stats {
    let Ok(cast) = series.cast(&DataType::Float64) else {
        return Stats::default();
    };
    let Ok(values) = cast.f64() else {
        return Stats::default();
    };

    let count = values.len() - values.null_count();
    if count == 0 {
        return Stats::default();
    }

    Stats {
        mean: values.mean().unwrap_or(0.0),
        std_dev: values.std(1).unwrap_or(0.0),
        median: values.median().unwrap_or(0.0),
        min: values.min().unwrap_or(0.0),
        max: values.max().unwrap_or(0.0),
        count,
    }
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Standard deviation dividing by N
pub fn population_std_dev(values: &[f64]) -> f64 {
    let Some(m) = mean(values) else {
        return 0.0;
    };
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Standard deviation dividing by N - 1; zero below two values
pub fn sample_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values).unwrap_or(0.0);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

/// Quantile of ascending `sorted` values with linear interpolation between
/// closest ranks (`rank = p * (n - 1)`, Hyndman-Fan type 7)
pub fn quantile_sorted(sorted: &[f64], p: f64) -> Option<f64> {
    let n = sorted.len();
    if n == 0 {
        return None;
    }
    let rank = p.clamp(0.0, 1.0) * (n - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}
