use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;

use super::record::MeasurementRecord;
use crate::error::{ChartError, Result};

/// Column holding the tool or chamber name
pub const ENTITY_COLUMN: &str = "entity";

/// Column holding the process timestamp
pub const DATE_COLUMN: &str = "date_process";

/// A loaded measurement file backed by a polars DataFrame
pub struct DataSource {
    materialized: DataFrame,
}

impl DataSource {
    /// Load data from a file (CSV or Parquet)
    pub fn load(path: &Path) -> Result<Self> {
        profiling::scope!("DataSource::load");

        let extension = path
            .extension()
            .and_then(|s| s.to_str())
            .ok_or_else(|| ChartError::UnsupportedFormat {
                extension: String::new(),
            })?;

        let lazy = match extension.to_lowercase().as_str() {
            "parquet" => LazyFrame::scan_parquet(path, Default::default())?,
            "csv" => LazyCsvReader::new(path)
                .with_has_header(true)
                .with_infer_schema_length(Some(100))
                .with_try_parse_dates(true)
                .finish()?,
            ext => {
                return Err(ChartError::UnsupportedFormat {
                    extension: ext.to_string(),
                });
            }
        };

        let materialized = lazy.collect()?;
        tracing::info!(
            path = %path.display(),
            rows = materialized.height(),
            columns = materialized.width(),
            "loaded data file"
        );

        Ok(Self { materialized })
    }

    pub fn column_names(&self) -> Vec<String> {
        self.materialized
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    pub fn height(&self) -> usize {
        self.materialized.height()
    }

    pub fn width(&self) -> usize {
        self.materialized.width()
    }

    pub fn has_column(&self, col: &str) -> bool {
        self.materialized.column(col).is_ok()
    }

    pub fn column_values(&self, col: &str) -> Result<Series> {
        self.materialized
            .column(col)
            .map(|c| c.as_materialized_series().clone())
            .map_err(|_| ChartError::ColumnNotFound {
                column: col.to_string(),
            })
    }

    /// Numeric view of a column; nulls and unparseable strings become NaN
    pub fn column_as_f64(&self, col: &str) -> Result<Vec<f64>> {
        let series = self.column_values(col)?;

        if let Ok(strings) = series.str() {
            return Ok(strings
                .into_iter()
                .map(|opt| opt.and_then(|s| s.trim().parse::<f64>().ok()).unwrap_or(f64::NAN))
                .collect());
        }

        let cast = series.cast(&DataType::Float64)?;
        Ok(cast.f64()?.into_iter().map(|opt| opt.unwrap_or(f64::NAN)).collect())
    }

    /// Timestamps of a date, datetime or ISO-8601 string column
    pub fn column_as_datetime(&self, col: &str) -> Result<Vec<Option<DateTime<Utc>>>> {
        let series = self.column_values(col)?;

        match series.dtype() {
            DataType::Datetime(unit, _) => {
                let unit = *unit;
                Ok(series
                    .datetime()?
                    .into_iter()
                    .map(|opt| opt.and_then(|v| timestamp_to_datetime(v, unit)))
                    .collect())
            }
            DataType::Date => Ok(series
                .date()?
                .into_iter()
                .map(|opt| opt.and_then(|days| DateTime::from_timestamp(i64::from(days) * 86_400, 0)))
                .collect()),
            DataType::String => Ok(series
                .str()?
                .into_iter()
                .map(|opt| opt.and_then(parse_datetime))
                .collect()),
            other => Err(ChartError::Config(format!(
                "column '{}' has type {} and cannot be read as dates",
                col, other
            ))),
        }
    }

    /// Text view of a column; nulls stay `None`
    pub fn column_as_string(&self, col: &str) -> Result<Vec<Option<String>>> {
        let series = self.column_values(col)?;
        let strings = series.cast(&DataType::String)?;
        Ok(strings
            .str()?
            .into_iter()
            .map(|opt| opt.map(str::to_string))
            .collect())
    }

    /// Convert every row to a [`MeasurementRecord`].
    ///
    /// Requires an `entity` column; `date_process` is optional. Other numeric
    /// columns become values and text columns become labels. Rows without
    /// an entity are skipped.
    pub fn records(&self) -> Result<Vec<MeasurementRecord>> {
        profiling::scope!("DataSource::records");

        let entities = self.column_as_string(ENTITY_COLUMN)?;
        let dates = if self.has_column(DATE_COLUMN) {
            Some(self.column_as_datetime(DATE_COLUMN)?)
        } else {
            None
        };

        let mut numeric: Vec<(String, Vec<f64>)> = Vec::new();
        let mut text: Vec<(String, Vec<Option<String>>)> = Vec::new();
        for column in self.materialized.get_columns() {
            let name = column.name().to_string();
            if name == ENTITY_COLUMN || name == DATE_COLUMN {
                continue;
            }
            let dtype = column.dtype();
            if dtype.is_float() || dtype.is_integer() {
                numeric.push((name.clone(), self.column_as_f64(&name)?));
            } else if matches!(dtype, DataType::String | DataType::Boolean) {
                text.push((name.clone(), self.column_as_string(&name)?));
            }
        }

        let mut records = Vec::with_capacity(self.height());
        let mut skipped = 0usize;
        for (row, entity) in entities.into_iter().enumerate() {
            let Some(entity) = entity else {
                skipped += 1;
                continue;
            };
            let mut record = MeasurementRecord::new(entity);
            record.date_process = dates.as_ref().and_then(|d| d.get(row).copied().flatten());
            for (name, values) in &numeric {
                if let Some(v) = values.get(row).copied().filter(|v| v.is_finite()) {
                    record.values.insert(name.clone(), v);
                }
            }
            for (name, labels) in &text {
                if let Some(Some(label)) = labels.get(row) {
                    record.labels.insert(name.clone(), label.clone());
                }
            }
            records.push(record);
        }

        if skipped > 0 {
            tracing::warn!(skipped, "rows without an entity were skipped");
        }
        Ok(records)
    }

    /// Write the data to a Parquet file
    pub fn write_parquet(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        let mut df = self.materialized.clone();
        ParquetWriter::new(file).finish(&mut df)?;
        Ok(())
    }
}

fn timestamp_to_datetime(value: i64, unit: TimeUnit) -> Option<DateTime<Utc>> {
    match unit {
        TimeUnit::Nanoseconds => Some(DateTime::from_timestamp_nanos(value)),
        TimeUnit::Microseconds => DateTime::from_timestamp_micros(value),
        TimeUnit::Milliseconds => DateTime::from_timestamp_millis(value),
    }
}

/// RFC 3339, then naive `YYYY-MM-DD[ T]HH:MM:SS` read as UTC, then a bare date
pub(crate) fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Some(t.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(t) = NaiveDateTime::parse_from_str(s, format) {
            return Some(t.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|t| t.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::io::Write;
    use tempfile::Builder;

    fn write_csv(lines: &[&str]) -> tempfile::NamedTempFile {
        let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_csv_loading() {
        let file = write_csv(&["x,y,z", "1,2,3", "4,5,6", "7,8,9"]);
        let ds = DataSource::load(file.path()).unwrap();

        assert_eq!(ds.height(), 3);
        assert_eq!(ds.width(), 3);
        assert_eq!(ds.column_names(), vec!["x", "y", "z"]);
        assert_eq!(ds.column_as_f64("y").unwrap(), vec![2.0, 5.0, 8.0]);
    }

    #[test]
    fn test_measurement_records() {
        let file = write_csv(&[
            "entity,date_process,cd_att,product_id",
            "FAKE_TOOL1,2024-01-01 08:00:00,31.5,XLY1",
            "FAKE_TOOL2,2024-01-02 09:30:00,,XLY2",
            ",2024-01-03 10:00:00,29.0,XLY1",
        ]);
        let ds = DataSource::load(file.path()).unwrap();
        let records = ds.records().unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].entity, "FAKE_TOOL1");
        assert_eq!(
            records[0].date_process,
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap())
        );
        assert_eq!(records[0].value("cd_att"), Some(31.5));
        assert_eq!(records[0].label("product_id"), Some("XLY1"));
        assert_eq!(records[1].value("cd_att"), None);
    }

    #[test]
    fn test_missing_entity_column() {
        let file = write_csv(&["a,b", "1,2"]);
        let ds = DataSource::load(file.path()).unwrap();
        let err = ds.records().unwrap_err();
        assert!(matches!(err, ChartError::ColumnNotFound { ref column } if column == "entity"));
    }

    #[test]
    fn test_unsupported_extension() {
        let file = Builder::new().suffix(".xlsx").tempfile().unwrap();
        let err = DataSource::load(file.path()).err().unwrap();
        assert!(matches!(err, ChartError::UnsupportedFormat { ref extension } if extension == "xlsx"));
    }

    #[test]
    fn test_parquet_round_trip() {
        let file = write_csv(&["entity,cd_att", "T1,1.5", "T2,2.5"]);
        let ds = DataSource::load(file.path()).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("measurements.parquet");
        ds.write_parquet(&out).unwrap();

        let reloaded = DataSource::load(&out).unwrap();
        assert_eq!(reloaded.height(), 2);
        let records = reloaded.records().unwrap();
        assert_eq!(records[1].entity, "T2");
        assert_eq!(records[1].value("cd_att"), Some(2.5));
    }

    #[test]
    fn test_parse_datetime_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap();
        assert_eq!(parse_datetime("2024-05-06T07:08:09Z"), Some(expected));
        assert_eq!(parse_datetime("2024-05-06T09:08:09+02:00"), Some(expected));
        assert_eq!(parse_datetime("2024-05-06 07:08:09"), Some(expected));
        assert_eq!(
            parse_datetime("2024-05-06"),
            Some(Utc.with_ymd_and_hms(2024, 5, 6, 0, 0, 0).unwrap())
        );
        assert_eq!(parse_datetime("yesterday"), None);
    }
}
