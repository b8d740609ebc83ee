use std::path::Path;

use chrono::NaiveDate;

use crate::error::MetricsError;
use crate::models::{PositivityPoint, ZipTotals, ZipWeeklySnapshot};

const END_DATE_COLUMN: &str = "End date";
const END_DATE_FORMAT: &str = "%m/%d/%Y";

/// Cumulative totals reference table, loaded once and never mutated.
#[derive(Debug)]
pub struct TotalsTable {
    rows: Vec<ZipTotals>,
}

impl TotalsTable {
    pub fn load(path: &Path) -> Result<Self, MetricsError> {
        let mut reader = csv::Reader::from_path(path)?;
        let mut rows = Vec::new();
        for result in reader.deserialize::<ZipTotals>() {
            rows.push(result?);
        }
        Ok(Self { rows })
    }

    /// Resolves the single row for a ZIP code. Zero matches is a lookup
    /// failure, more than one a data-integrity failure.
    pub fn find(&self, zip_code: i64) -> Result<&ZipTotals, MetricsError> {
        find_unique(
            self.rows.iter().filter(|r| r.zip_code == zip_code),
            zip_code,
            "totals",
        )
    }
}

/// Last-seven-days snapshot reference table.
#[derive(Debug)]
pub struct WeeklyTable {
    rows: Vec<ZipWeeklySnapshot>,
}

impl WeeklyTable {
    pub fn load(path: &Path) -> Result<Self, MetricsError> {
        let mut reader = csv::Reader::from_path(path)?;
        let mut rows = Vec::new();
        for result in reader.deserialize::<ZipWeeklySnapshot>() {
            rows.push(result?);
        }
        Ok(Self { rows })
    }

    pub fn find(&self, zip_code: i64) -> Result<&ZipWeeklySnapshot, MetricsError> {
        find_unique(
            self.rows.iter().filter(|r| r.zip_code == zip_code),
            zip_code,
            "weekly snapshot",
        )
    }
}

fn find_unique<'a, T>(
    mut matches: impl Iterator<Item = &'a T>,
    zip: i64,
    table: &'static str,
) -> Result<&'a T, MetricsError> {
    let first = matches.next().ok_or(MetricsError::ZipNotFound { zip, table })?;
    let extras = matches.count();
    if extras > 0 {
        return Err(MetricsError::DuplicateZipRows {
            zip,
            table,
            count: extras + 1,
        });
    }
    Ok(first)
}

/// The wide positivity table: an `End date` column plus one column per ZIP
/// code. Rows are kept sorted by date; blank cells become `None`.
#[derive(Debug)]
pub struct PositivityTable {
    zip_columns: Vec<String>,
    rows: Vec<PositivityRow>,
}

#[derive(Debug)]
struct PositivityRow {
    date: NaiveDate,
    values: Vec<Option<f64>>,
}

impl PositivityTable {
    pub fn load(path: &Path) -> Result<Self, MetricsError> {
        let mut reader = csv::Reader::from_path(path)?;
        let headers = reader.headers()?.clone();
        let date_idx = headers
            .iter()
            .position(|h| h == END_DATE_COLUMN)
            .ok_or(MetricsError::MissingColumn {
                column: END_DATE_COLUMN,
                table: "positivity",
            })?;
        let zip_columns: Vec<String> = headers
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != date_idx)
            .map(|(_, h)| h.to_string())
            .collect();

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            let date_raw = record.get(date_idx).unwrap_or_default();
            let date = NaiveDate::parse_from_str(date_raw, END_DATE_FORMAT).map_err(|source| {
                MetricsError::DateParse {
                    segment: date_raw.to_string(),
                    source,
                }
            })?;

            let mut values = Vec::with_capacity(zip_columns.len());
            for (i, field) in record.iter().enumerate() {
                if i == date_idx {
                    continue;
                }
                values.push(parse_cell(&headers[i], field)?);
            }
            rows.push(PositivityRow { date, values });
        }
        rows.sort_by_key(|r| r.date);

        Ok(Self { zip_columns, rows })
    }

    /// Extracts the date-ordered positivity series for one ZIP code column.
    pub fn series(&self, zip: &str) -> Result<Vec<PositivityPoint>, MetricsError> {
        let idx = self
            .zip_columns
            .iter()
            .position(|c| c == zip)
            .ok_or_else(|| MetricsError::ZipColumnNotFound {
                zip: zip.to_string(),
            })?;
        Ok(self
            .rows
            .iter()
            .map(|r| PositivityPoint {
                date: r.date,
                rate: r.values[idx],
            })
            .collect())
    }
}

fn parse_cell(column: &str, raw: &str) -> Result<Option<f64>, MetricsError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<f64>()
        .map(Some)
        .map_err(|_| MetricsError::NumberParse {
            column: column.to_string(),
            value: trimmed.to_string(),
        })
}
