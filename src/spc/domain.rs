//! Y-domain derivation from control limits
//!
//! The domain is centred on the control line and reaches twice the distance
//! to each limit. A missing limit falls back to a multiple of the standard
//! deviation across all entities, then to the data extent. The result always
//! contains the data extent so no point is clipped.

use serde::{Deserialize, Serialize};

use super::SpcLimits;
use crate::constants::spc::*;
use crate::data::stats;

/// Multipliers applied to limit distances and to the standard deviation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpcDomainConfig {
    pub limit_multiplier: f64,
    pub std_dev_multiplier: f64,
}

impl Default for SpcDomainConfig {
    fn default() -> Self {
        Self {
            limit_multiplier: LIMIT_MULTIPLIER,
            std_dev_multiplier: STD_DEV_MULTIPLIER,
        }
    }
}

impl SpcDomainConfig {
    pub fn domain(&self, data_extent: [f64; 2], limits: Option<&SpcLimits>, all_entity_std_dev: Option<f64>) -> [f64; 2] {
        let Some(limits) = limits else {
            return data_extent;
        };
        let Some(cl) = limits.cl else {
            return data_extent;
        };

        let y_max = match (limits.ucl, all_entity_std_dev) {
            (Some(ucl), _) => cl + (ucl - cl).abs() * self.limit_multiplier,
            (None, Some(sd)) => cl + sd.abs() * self.std_dev_multiplier,
            (None, None) => data_extent[1],
        };
        let y_min = match (limits.lcl, all_entity_std_dev) {
            (Some(lcl), _) => cl - (lcl - cl).abs() * self.limit_multiplier,
            (None, Some(sd)) => cl - sd.abs() * self.std_dev_multiplier,
            (None, None) => data_extent[0],
        };

        [y_min.min(data_extent[0]), y_max.max(data_extent[1])]
    }
}

/// SPC-aware Y domain with the default multipliers
pub fn spc_domain(data_extent: [f64; 2], limits: Option<&SpcLimits>, all_entity_std_dev: Option<f64>) -> [f64; 2] {
    SpcDomainConfig::default().domain(data_extent, limits, all_entity_std_dev)
}

/// Repair a domain before it reaches a scale.
///
/// A collapsed or inverted domain is recentred with 10% padding (at least 1
/// unit). A non-finite domain becomes `[0, 1]`.
pub fn validate_domain(domain: [f64; 2], chart_name: &str) -> [f64; 2] {
    let [mut low, mut high] = domain;

    if high <= low {
        let center = (low + high) / 2.0;
        let padding = (center.abs() * REPAIR_PADDING_RATIO).max(REPAIR_MIN_PADDING);
        low = center - padding;
        high = center + padding;
    }

    if !low.is_finite() || !high.is_finite() {
        tracing::warn!(chart = chart_name, ?domain, "invalid SPC domain, using fallback");
        return FALLBACK_DOMAIN;
    }

    [low, high]
}

/// Population standard deviation of the valid values across all records
pub fn population_std_dev<R, F>(records: &[R], value_fn: F) -> f64
where
    F: Fn(&R) -> Option<f64>,
{
    let values: Vec<f64> = records
        .iter()
        .filter_map(|r| value_fn(r).filter(|v| !v.is_nan()))
        .collect();
    stats::population_std_dev(&values)
}
