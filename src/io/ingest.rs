//! MSD CSV ingest.
//!
//! Turns a two-column `(lag time, MSD)` CSV produced by an upstream tracking
//! pipeline into a validated [`Curve`].
//!
//! - Header names are case-insensitive; a few common aliases are accepted.
//! - Rows that fail to parse are skipped and reported in `row_errors`.
//! - Parsed values are *not* filtered: a zero or negative MSD is a domain
//!   error of the curve, not something to drop quietly.

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use csv::StringRecord;

use crate::domain::Curve;
use crate::error::AppError;

const LAG_COLUMNS: [&str; 5] = ["t", "lagt", "lag", "lag_time", "tau"];
const MSD_COLUMNS: [&str; 3] = ["msd", "r2", "msd_um2"];

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct IngestedMsd {
    pub curve: Curve,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    pub rows_used: usize,
}

/// Load an MSD curve from a CSV file.
pub fn read_msd_csv(path: &Path) -> Result<IngestedMsd, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);

    let lag_idx = find_column(&header_map, &LAG_COLUMNS).ok_or_else(|| {
        AppError::new(
            2,
            format!("Missing lag-time column (one of: {}).", LAG_COLUMNS.join(", ")),
        )
    })?;
    let msd_idx = find_column(&header_map, &MSD_COLUMNS).ok_or_else(|| {
        AppError::new(
            2,
            format!("Missing MSD column (one of: {}).", MSD_COLUMNS.join(", ")),
        )
    })?;

    let mut t = Vec::new();
    let mut r2 = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2: records() starts after the header and CSV lines are 1-based.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match (parse_f64(&record, lag_idx), parse_f64(&record, msd_idx)) {
            (Ok(ti), Ok(ri)) => {
                t.push(ti);
                r2.push(ri);
            }
            (Err(message), _) | (_, Err(message)) => row_errors.push(RowError { line, message }),
        }
    }

    let rows_used = t.len();
    let curve = Curve::labeled(t, r2, "t", "msd").map_err(|e| {
        AppError::new(2, format!("Invalid MSD curve in '{}': {e}", path.display()))
    })?;

    Ok(IngestedMsd {
        curve,
        row_errors,
        rows_read,
        rows_used,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Strip a UTF-8 BOM on the first header.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn find_column(header_map: &HashMap<String, usize>, aliases: &[&str]) -> Option<usize> {
    aliases.iter().find_map(|name| header_map.get(*name).copied())
}

fn parse_f64(record: &StringRecord, idx: usize) -> Result<f64, String> {
    let raw = record
        .get(idx)
        .ok_or_else(|| format!("Missing field in column {}", idx + 1))?;
    let v = raw
        .parse::<f64>()
        .map_err(|_| format!("Invalid number '{raw}' in column {}", idx + 1))?;
    if v.is_finite() {
        Ok(v)
    } else {
        Err(format!("Non-finite number '{raw}' in column {}", idx + 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("msd_rheology_{}_{name}", std::process::id()));
        let mut file = File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn reads_aliased_columns_and_skips_bad_rows() {
        let path = write_temp(
            "aliased.csv",
            "\u{feff}LagT, Extra, R2\n0.1, x, 0.04\n0.2, y, oops\n0.4, z, 0.16\n0.8, w, 0.32\n",
        );
        let ingest = read_msd_csv(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(ingest.rows_read, 4);
        assert_eq!(ingest.rows_used, 3);
        assert_eq!(ingest.row_errors.len(), 1);
        assert_eq!(ingest.row_errors[0].line, 3);
        assert_eq!(ingest.curve.x(), &[0.1, 0.4, 0.8]);
        assert_eq!(ingest.curve.f(), &[0.04, 0.16, 0.32]);
    }

    #[test]
    fn non_positive_msd_is_an_error() {
        let path = write_temp("zero.csv", "t,msd\n0.1,0.0\n0.2,0.1\n0.3,0.2\n");
        let err = read_msd_csv(&path).unwrap_err();
        std::fs::remove_file(&path).ok();

        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("msd[0]"));
    }

    #[test]
    fn missing_columns_are_reported() {
        let path = write_temp("nocol.csv", "time,value\n1,2\n");
        let err = read_msd_csv(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(err.to_string().contains("lag-time"));
    }
}
