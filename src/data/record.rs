use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::constants::scale::EMPTY_EXTENT;

/// One measurement row loaded from a file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeasurementRecord {
    /// Tool or chamber the measurement was taken on
    pub entity: String,
    pub date_process: Option<DateTime<Utc>>,
    /// Numeric columns by name
    pub values: BTreeMap<String, f64>,
    /// Categorical columns by name
    pub labels: BTreeMap<String, String>,
}

impl MeasurementRecord {
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            ..Default::default()
        }
    }

    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.date_process = Some(date);
        self
    }

    pub fn with_value(mut self, column: impl Into<String>, value: f64) -> Self {
        self.values.insert(column.into(), value);
        self
    }

    pub fn with_label(mut self, column: impl Into<String>, label: impl Into<String>) -> Self {
        self.labels.insert(column.into(), label.into());
        self
    }

    /// Finite value of a numeric column
    pub fn value(&self, column: &str) -> Option<f64> {
        self.values.get(column).copied().filter(|v| v.is_finite())
    }

    pub fn label(&self, column: &str) -> Option<&str> {
        self.labels.get(column).map(String::as_str)
    }

    /// Grouping key for a column: `entity` itself, a label, or a stringified value
    pub fn key(&self, column: &str) -> Option<String> {
        if column == "entity" {
            return Some(self.entity.clone());
        }
        self.label(column)
            .map(str::to_string)
            .or_else(|| self.values.get(column).map(|v| v.to_string()))
    }
}

/// `[min, max]` of the finite values, or `[0, 1]` when there are none
pub fn numeric_extent<R, F>(records: &[R], value_fn: F) -> [f64; 2]
where
    F: Fn(&R) -> Option<f64>,
{
    records
        .iter()
        .filter_map(|r| value_fn(r).filter(|v| v.is_finite()))
        .fold(None, |acc: Option<[f64; 2]>, v| match acc {
            None => Some([v, v]),
            Some([lo, hi]) => Some([lo.min(v), hi.max(v)]),
        })
        .unwrap_or(EMPTY_EXTENT)
}

/// Earliest and latest timestamp, or `None` when there are none
pub fn time_extent<R, F>(records: &[R], time_fn: F) -> Option<[DateTime<Utc>; 2]>
where
    F: Fn(&R) -> Option<DateTime<Utc>>,
{
    records
        .iter()
        .filter_map(time_fn)
        .fold(None, |acc, t| match acc {
            None => Some([t, t]),
            Some([lo, hi]) => Some([lo.min(t), hi.max(t)]),
        })
}

/// Distinct keys in first-seen order
pub fn unique_values<R, F>(records: &[R], key_fn: F) -> Vec<String>
where
    F: Fn(&R) -> String,
{
    let mut seen = HashSet::new();
    records
        .iter()
        .map(key_fn)
        .filter(|k| seen.insert(k.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn records() -> Vec<MeasurementRecord> {
        vec![
            MeasurementRecord::new("FAKE_TOOL2").with_value("cd_att", 12.5),
            MeasurementRecord::new("FAKE_TOOL1").with_value("cd_att", f64::NAN),
            MeasurementRecord::new("FAKE_TOOL2").with_value("cd_att", -3.0),
            MeasurementRecord::new("FAKE_TOOL3"),
        ]
    }

    #[test]
    fn test_numeric_extent_skips_invalid() {
        assert_eq!(numeric_extent(&records(), |r| r.value("cd_att")), [-3.0, 12.5]);
        assert_eq!(numeric_extent(&records(), |r| r.value("missing")), [0.0, 1.0]);
    }

    #[test]
    fn test_time_extent() {
        let t1 = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        let t2 = Utc.with_ymd_and_hms(2024, 2, 1, 8, 0, 0).unwrap();
        let data = vec![
            MeasurementRecord::new("A").with_date(t1),
            MeasurementRecord::new("B"),
            MeasurementRecord::new("C").with_date(t2),
        ];
        assert_eq!(time_extent(&data, |r| r.date_process), Some([t2, t1]));
        assert_eq!(time_extent(&data[1..2], |r| r.date_process), None);
    }

    #[test]
    fn test_unique_values_keep_first_seen_order() {
        let keys = unique_values(&records(), |r| r.entity.clone());
        assert_eq!(keys, vec!["FAKE_TOOL2", "FAKE_TOOL1", "FAKE_TOOL3"]);
    }

    #[test]
    fn test_key_lookup() {
        let r = MeasurementRecord::new("T1")
            .with_label("product", "XLY1")
            .with_value("lot", 7.0);
        assert_eq!(r.key("entity").as_deref(), Some("T1"));
        assert_eq!(r.key("product").as_deref(), Some("XLY1"));
        assert_eq!(r.key("lot").as_deref(), Some("7"));
        assert_eq!(r.key("nope"), None);
    }
}
