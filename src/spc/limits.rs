use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

use crate::data::source::parse_datetime;
use crate::error::Result;

/// Control limits of one chart
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SpcLimits {
    pub cl: Option<f64>,
    pub lcl: Option<f64>,
    pub ucl: Option<f64>,
}

impl SpcLimits {
    pub fn new(cl: f64, lcl: Option<f64>, ucl: Option<f64>) -> Self {
        Self { cl: Some(cl), lcl, ucl }
    }
}

/// A control-limit row as stored by the limits service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpcLimitRecord {
    #[serde(default)]
    pub process_type: Option<String>,
    #[serde(default)]
    pub product_type: Option<String>,
    #[serde(default)]
    pub spc_monitor_name: Option<String>,
    #[serde(alias = "chart_name")]
    pub spc_chart_name: String,
    #[serde(default)]
    pub cl: Option<f64>,
    #[serde(default)]
    pub lcl: Option<f64>,
    #[serde(default)]
    pub ucl: Option<f64>,
    #[serde(deserialize_with = "deserialize_effective_date")]
    pub effective_date: DateTime<Utc>,
}

impl SpcLimitRecord {
    pub fn limits(&self) -> SpcLimits {
        SpcLimits {
            cl: self.cl,
            lcl: self.lcl,
            ucl: self.ucl,
        }
    }
}

/// Accepts RFC 3339 timestamps as well as bare `YYYY-MM-DD` dates
fn deserialize_effective_date<'de, D>(deserializer: D) -> std::result::Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_datetime(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid effective_date '{}'", raw)))
}

/// Limits of the most recently effective record for a chart.
///
/// When two records share the latest date the one later in the list wins.
pub fn latest_for_chart(records: &[SpcLimitRecord], chart_name: &str) -> Option<SpcLimits> {
    records
        .iter()
        .filter(|r| r.spc_chart_name == chart_name)
        .max_by_key(|r| r.effective_date)
        .map(SpcLimitRecord::limits)
}

/// Read a JSON array of limit records
pub fn load_limits(path: &Path) -> Result<Vec<SpcLimitRecord>> {
    let content = std::fs::read_to_string(path)?;
    let records: Vec<SpcLimitRecord> = serde_json::from_str(&content)?;
    tracing::debug!(path = %path.display(), count = records.len(), "loaded control limits");
    Ok(records)
}
