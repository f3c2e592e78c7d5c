//! Offline bulk import of readings from CSV.
//!
//! Expected format (header required, column order free, names
//! case-insensitive):
//! ```text
//! Timestamp,Value,Unit
//! 2024-05-01T12:00:00Z,101.2,L/min
//! 1714564801,99.8,L/min
//! ```
//! Timestamps may be RFC 3339, a naive `YYYY-MM-DD HH:MM:SS` (UTC), or a
//! Unix epoch in seconds or milliseconds. A malformed row is reported and
//! skipped; the rest of the file still loads.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use thiserror::Error;

use crate::engine::history;
use crate::types::{MetricSeries, Reading};

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Failed to read {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Missing required column '{0}' in CSV header")]
    MissingColumn(&'static str),

    #[error("Malformed record on line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },
}

/// Outcome of an import: every good row plus one error per bad row
#[derive(Debug, Default)]
pub struct ImportReport {
    pub readings: Vec<Reading>,
    pub errors: Vec<ImportError>,
}

impl ImportReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// The newest `window` readings as a bounded series.
    pub fn into_series(self, window: usize) -> MetricSeries {
        self.readings
            .into_iter()
            .fold(MetricSeries::new(), |series, reading| {
                history::append_bounded(&series, reading, window)
            })
    }
}

struct Columns {
    timestamp: usize,
    value: usize,
    unit: usize,
}

impl Columns {
    fn from_header(header: &str) -> Result<Self, ImportError> {
        let names: Vec<String> = header
            .split(',')
            .map(|h| unquote(h).to_ascii_lowercase())
            .collect();
        let find = |name: &'static str| {
            names
                .iter()
                .position(|n| n == name)
                .ok_or(ImportError::MissingColumn(name))
        };
        Ok(Self {
            timestamp: find("timestamp")?,
            value: find("value")?,
            unit: find("unit")?,
        })
    }
}

/// Read and parse a CSV file. Fails only if the file cannot be read or the
/// header is unusable.
pub fn import_csv(path: impl AsRef<Path>) -> Result<ImportReport, ImportError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| ImportError::Io(path.to_path_buf(), e))?;
    let report = parse_csv(BufReader::new(file), path)?;

    tracing::info!(
        path = %path.display(),
        count = report.readings.len(),
        rejected = report.errors.len(),
        "Imported readings from CSV"
    );
    Ok(report)
}

/// Parse CSV from any buffered reader. `source` is only used in errors.
pub fn parse_csv<R: BufRead>(reader: R, source: &Path) -> Result<ImportReport, ImportError> {
    let mut report = ImportReport::default();
    let mut columns: Option<Columns> = None;

    for (idx, line_result) in reader.lines().enumerate() {
        let line_num = idx + 1;
        let line = line_result.map_err(|e| ImportError::Io(source.to_path_buf(), e))?;

        if line.trim().is_empty() {
            continue;
        }

        let Some(cols) = columns.as_ref() else {
            columns = Some(Columns::from_header(&line)?);
            continue;
        };

        match parse_row(&line, cols) {
            Ok(reading) => report.readings.push(reading),
            Err(reason) => {
                tracing::warn!(line = line_num, error = %reason, "Skipping malformed CSV row");
                report.errors.push(ImportError::MalformedRecord {
                    line: line_num,
                    reason,
                });
            }
        }
    }

    Ok(report)
}

fn parse_row(line: &str, cols: &Columns) -> Result<Reading, String> {
    let fields: Vec<&str> = line.split(',').collect();
    let field = |idx: usize, name: &str| {
        fields
            .get(idx)
            .map(|f| unquote(f))
            .ok_or_else(|| format!("missing {} field (got {} fields)", name, fields.len()))
    };

    let timestamp = parse_timestamp(field(cols.timestamp, "Timestamp")?)?;
    let raw_value = field(cols.value, "Value")?;
    let value = raw_value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| format!("non-numeric value '{}'", raw_value))?;
    let unit = field(cols.unit, "Unit")?;

    Ok(Reading::new(timestamp, value, unit))
}

fn unquote(s: &str) -> &str {
    s.trim().trim_matches('"').trim()
}

/// Parse RFC 3339, naive UTC datetimes, or epoch seconds/milliseconds.
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, String> {
    let s = unquote(s);
    if s.is_empty() {
        return Err("empty timestamp".to_string());
    }

    if let Ok(epoch) = s.parse::<i64>() {
        let parsed = if epoch.abs() > 10_000_000_000 {
            Utc.timestamp_millis_opt(epoch).single()
        } else {
            Utc.timestamp_opt(epoch, 0).single()
        };
        return parsed.ok_or_else(|| format!("epoch out of range: '{}'", s));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt.and_utc());
        }
    }

    Err(format!("cannot parse timestamp '{}'", s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    fn parse(text: &str) -> Result<ImportReport, ImportError> {
        parse_csv(Cursor::new(text), Path::new("test.csv"))
    }

    #[test]
    fn test_parse_valid_rows() {
        let report = parse(
            "Timestamp,Value,Unit\n\
             2024-05-01T12:00:00Z,101.25,L/min\n\
             1714564801,99.5,L/min\n\
             1714564802000,98.0,L/min\n",
        )
        .unwrap();

        assert!(report.is_clean());
        assert_eq!(report.readings.len(), 3);
        assert_eq!(report.readings[0].formatted(), "101.25 L/min");
        assert_eq!(report.readings[1].timestamp.timestamp(), 1_714_564_801);
        assert_eq!(report.readings[2].timestamp.timestamp(), 1_714_564_802);
    }

    #[test]
    fn test_malformed_rows_reported_and_skipped() {
        let report = parse(
            "Timestamp,Value,Unit\n\
             2024-05-01T12:00:00Z,50.1,PSI\n\
             not-a-date,50.2,PSI\n\
             2024-05-01T12:00:02Z,abc,PSI\n\
             2024-05-01T12:00:03Z\n\
             2024-05-01T12:00:04Z,50.5,PSI\n",
        )
        .unwrap();

        assert_eq!(report.readings.len(), 2);
        let lines: Vec<usize> = report
            .errors
            .iter()
            .map(|e| match e {
                ImportError::MalformedRecord { line, .. } => *line,
                other => panic!("unexpected error {other}"),
            })
            .collect();
        assert_eq!(lines, vec![3, 4, 5]);
    }

    #[test]
    fn test_header_order_and_case_free() {
        let report = parse("unit,\"VALUE\",timestamp\n°C,20.4,2024-05-01 08:00:00\n").unwrap();
        assert_eq!(report.readings[0].unit, "°C");
        assert_eq!(report.readings[0].value, 20.4);
    }

    #[test]
    fn test_missing_column_is_fatal() {
        let err = parse("Timestamp,Value\n1714564801,1.0\n").unwrap_err();
        assert!(matches!(err, ImportError::MissingColumn("unit")));
    }

    #[test]
    fn test_blank_lines_ignored() {
        let report = parse("\nTimestamp,Value,Unit\n\n1714564801,1.0,%\n\n").unwrap();
        assert_eq!(report.readings.len(), 1);
        assert!(report.is_clean());
    }

    #[test]
    fn test_non_finite_value_rejected() {
        let report = parse("Timestamp,Value,Unit\n1714564801,NaN,%\n").unwrap();
        assert!(report.readings.is_empty());
        assert_eq!(report.errors.len(), 1);
    }

    #[test]
    fn test_into_series_keeps_newest() {
        let mut text = String::from("Timestamp,Value,Unit\n");
        for i in 0..15 {
            text.push_str(&format!("{},{}.0,L/min\n", 1_714_564_800 + i, i));
        }
        let series = parse(&text).unwrap().into_series(10);
        assert_eq!(series.len(), 10);
        assert_eq!(series.latest().map(|r| r.value), Some(14.0));
    }

    #[test]
    fn test_import_csv_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Timestamp,Value,Unit").unwrap();
        writeln!(file, "2024-05-01T12:00:00+02:00,0.011,%").unwrap();
        let report = import_csv(file.path()).unwrap();
        assert_eq!(report.readings[0].timestamp.to_rfc3339(), "2024-05-01T10:00:00+00:00");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = import_csv("/definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, ImportError::Io(..)));
    }

    #[test]
    fn test_parse_timestamp_formats() {
        assert!(parse_timestamp("2024-05-01T12:00:00.250").is_ok());
        assert!(parse_timestamp("\"2024-05-01T12:00:00Z\"").is_ok());
        assert!(parse_timestamp("").is_err());
        assert!(parse_timestamp("yesterday").is_err());
    }
}
