use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One observation from the wide positivity table: the seven-day-average
/// test positivity percentage for a single ZIP code on a reporting date.
/// A blank source cell becomes `None`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositivityPoint {
    pub date: NaiveDate,
    pub rate: Option<f64>,
}

/// Microcluster severity tier, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SeverityTier {
    None,
    Yellow,
    Orange,
    Red,
}

impl SeverityTier {
    pub fn label(self) -> &'static str {
        match self {
            SeverityTier::None => "NONE",
            SeverityTier::Yellow => "YELLOW",
            SeverityTier::Orange => "ORANGE",
            SeverityTier::Red => "RED",
        }
    }
}

impl fmt::Display for SeverityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-tier consecutive-day counters over the ten-day streak window.
/// A RED day counts toward all three tiers; a day strictly below a tier
/// resets that tier's counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ZoneStreak {
    pub yellow_days: u32,
    pub orange_days: u32,
    pub red_days: u32,
}

/// Outcome of classifying one ZIP code's ten-day positivity window.
#[derive(Debug, Clone, Serialize)]
pub struct ZoneReport {
    pub zip_code: String,
    pub qualifying_tier: SeverityTier,
    pub day_tiers: Vec<SeverityTier>,
    pub streak: ZoneStreak,
}

/// A contiguous seven-day reporting interval parsed from a string like
/// "Dec 25-Jan 1".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Cumulative per-ZIP totals from the data-by-modzcta table. The serde
/// renames are the field mapping onto the published column names.
#[derive(Debug, Clone, Deserialize)]
pub struct ZipTotals {
    #[serde(rename = "MODIFIED_ZCTA")]
    pub zip_code: i64,
    #[serde(rename = "NEIGHBORHOOD_NAME")]
    pub neighborhood_name: String,
    #[serde(rename = "BOROUGH_GROUP")]
    pub borough: String,
    #[serde(rename = "COVID_CASE_COUNT")]
    pub total_case_count: i64,
    #[serde(rename = "COVID_CASE_RATE")]
    pub total_case_rate: f64,
    #[serde(rename = "POP_DENOMINATOR")]
    pub population: f64,
    #[serde(rename = "COVID_DEATH_COUNT")]
    pub total_deaths: i64,
    #[serde(rename = "COVID_DEATH_RATE")]
    pub total_death_rate: f64,
    #[serde(rename = "PERCENT_POSITIVE")]
    pub pct_pos_total: f64,
    #[serde(rename = "TOTAL_COVID_TESTS")]
    pub total_tests: i64,
}

/// Last-seven-days per-ZIP snapshot from the last7days-by-modzcta table.
#[derive(Debug, Clone, Deserialize)]
pub struct ZipWeeklySnapshot {
    #[serde(rename = "modzcta")]
    pub zip_code: i64,
    #[serde(rename = "modzcta_name")]
    pub neighborhood_name: String,
    #[serde(rename = "percentpositivity_7day")]
    pub pct_pos_7_days: f64,
    #[serde(rename = "people_tested")]
    pub people_tested_7_days: i64,
    #[serde(rename = "people_positive")]
    pub people_positive_7_days: i64,
    #[serde(rename = "median_daily_test_rate")]
    pub median_daily_test_rate_7_days: f64,
    #[serde(rename = "adequately_tested")]
    pub adequately_tested_7_days: String,
    #[serde(rename = "daterange")]
    pub daterange_7_days_str: String,
}
