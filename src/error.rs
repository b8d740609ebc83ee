use thiserror::Error;

/// Error type for table lookups, date parsing, and derived-metric failures.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("ZIP code column '{zip}' not found in the positivity table")]
    ZipColumnNotFound { zip: String },
    #[error("ZIP code {zip} not found in the {table} table")]
    ZipNotFound { zip: i64, table: &'static str },
    #[error("{count} rows matched ZIP code {zip} in the {table} table, expected exactly one")]
    DuplicateZipRows {
        zip: i64,
        table: &'static str,
        count: usize,
    },
    #[error("expected column '{column}' in the {table} table")]
    MissingColumn {
        column: &'static str,
        table: &'static str,
    },
    #[error("date range '{value}' must split into exactly two segments on '-'")]
    DateRangeFormat { value: String },
    #[error("could not parse date '{segment}': {source}")]
    DateParse {
        segment: String,
        #[source]
        source: chrono::ParseError,
    },
    #[error("could not parse '{value}' in column '{column}' as a number")]
    NumberParse { column: String, value: String },
    #[error("population for ZIP code {zip} is not positive; case rates are undefined")]
    ZeroPopulation { zip: i64 },
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
