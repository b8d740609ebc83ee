use chrono::{Datelike, Local, NaiveDate};

use crate::error::MetricsError;
use crate::models::{DateRange, ZipTotals, ZipWeeklySnapshot};
use crate::tables::{TotalsTable, WeeklyTable};

// NYS cluster metric thresholds.
pub const AVG_NEW_DAILY_CASES_PER_100K_THRESHOLD: f64 = 10.0;
pub const POP_THRESHOLD: f64 = 10_000.0;
pub const AVG_NEW_DAILY_CASES_THRESHOLD: f64 = 5.0;

const DATE_SEGMENT_FORMAT: &str = "%b %d %Y";

/// Validated per-ZIP view over both reference tables, with derived 7-day
/// case-rate metrics. Construction fails fast on missing or duplicated
/// rows; no partial objects.
#[derive(Debug, Clone)]
pub struct ZipCodeInfo {
    pub zip_code: i64,
    pub totals: ZipTotals,
    pub weekly: ZipWeeklySnapshot,
    pub date_range_7_days: DateRange,
}

impl ZipCodeInfo {
    pub fn resolve(
        totals: &TotalsTable,
        weekly: &WeeklyTable,
        zip_code: i64,
    ) -> Result<Self, MetricsError> {
        let totals_row = totals.find(zip_code)?.clone();
        let weekly_row = weekly.find(zip_code)?.clone();
        let current_year = Local::now().year();
        let date_range_7_days =
            parse_date_range(&weekly_row.daterange_7_days_str, current_year)?;
        Ok(Self {
            zip_code,
            totals: totals_row,
            weekly: weekly_row,
            date_range_7_days,
        })
    }

    /// New cases per 100,000 residents over the last seven days.
    pub fn case_rate_7_days(&self) -> Result<f64, MetricsError> {
        if self.totals.population <= 0.0 {
            return Err(MetricsError::ZeroPopulation { zip: self.zip_code });
        }
        Ok(self.weekly.people_positive_7_days as f64 / self.totals.population * 100_000.0)
    }

    pub fn case_rate_7_days_daily_avg(&self) -> Result<f64, MetricsError> {
        Ok(self.case_rate_7_days()? / 7.0)
    }

    pub fn avg_case_nums_7_days(&self) -> f64 {
        self.weekly.people_positive_7_days as f64 / 7.0
    }

    /// True iff the daily average case rate exceeds 10 per 100k, strictly.
    pub fn case_rate_over_threshold(&self) -> Result<bool, MetricsError> {
        Ok(self.case_rate_7_days_daily_avg()? > AVG_NEW_DAILY_CASES_PER_100K_THRESHOLD)
    }

    /// True iff the population exceeds 10,000 and the average daily case
    /// count exceeds 5. Small-population ZIPs are always false.
    pub fn case_nums_over_threshold(&self) -> bool {
        if self.totals.population > POP_THRESHOLD {
            return self.avg_case_nums_7_days() > AVG_NEW_DAILY_CASES_THRESHOLD;
        }
        false
    }
}

/// Parses a weekly date-range string like "Dec 25-Jan 1" into concrete
/// dates. Intervals are contiguous seven-day spans; the start year rolls
/// back one year only when the range crosses December into January.
pub fn parse_date_range(raw: &str, current_year: i32) -> Result<DateRange, MetricsError> {
    let segments: Vec<&str> = raw.split('-').collect();
    if segments.len() != 2 {
        return Err(MetricsError::DateRangeFormat {
            value: raw.to_string(),
        });
    }
    let start_str = segments[0].trim();
    let end_str = segments[1].trim();

    let wraps_year = start_str.to_lowercase().contains("dec")
        && end_str.to_lowercase().contains("jan");
    let start_year = if wraps_year {
        current_year - 1
    } else {
        current_year
    };

    let start = parse_segment(start_str, start_year)?;
    let end = parse_segment(end_str, current_year)?;
    Ok(DateRange { start, end })
}

fn parse_segment(segment: &str, year: i32) -> Result<NaiveDate, MetricsError> {
    NaiveDate::parse_from_str(&format!("{segment} {year}"), DATE_SEGMENT_FORMAT).map_err(
        |source| MetricsError::DateParse {
            segment: segment.to_string(),
            source,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_totals(population: f64) -> ZipTotals {
        ZipTotals {
            zip_code: 11204,
            neighborhood_name: "Bensonhurst".to_string(),
            borough: "Brooklyn".to_string(),
            total_case_count: 7000,
            total_case_rate: 8500.0,
            population,
            total_deaths: 200,
            total_death_rate: 240.0,
            pct_pos_total: 11.0,
            total_tests: 60000,
        }
    }

    fn sample_weekly(people_positive: i64) -> ZipWeeklySnapshot {
        ZipWeeklySnapshot {
            zip_code: 11204,
            neighborhood_name: "Bensonhurst".to_string(),
            pct_pos_7_days: 4.25,
            people_tested_7_days: 2100,
            people_positive_7_days: people_positive,
            median_daily_test_rate_7_days: 260.5,
            adequately_tested_7_days: "Yes".to_string(),
            daterange_7_days_str: "Dec 25-Jan 1".to_string(),
        }
    }

    fn sample_info(population: f64, people_positive: i64) -> ZipCodeInfo {
        ZipCodeInfo {
            zip_code: 11204,
            totals: sample_totals(population),
            weekly: sample_weekly(people_positive),
            date_range_7_days: parse_date_range("Dec 25-Jan 1", 2021).unwrap(),
        }
    }

    #[test]
    fn december_to_january_rolls_the_start_year_back() {
        let range = parse_date_range("Dec 28-Jan 3", 2021).expect("parse");
        assert_eq!(range.start, NaiveDate::from_ymd_opt(2020, 12, 28).unwrap());
        assert_eq!(range.end, NaiveDate::from_ymd_opt(2021, 1, 3).unwrap());
    }

    #[test]
    fn mid_year_range_uses_current_year_for_both() {
        let range = parse_date_range("Jun 1-Jun 7", 2021).expect("parse");
        assert_eq!(range.start, NaiveDate::from_ymd_opt(2021, 6, 1).unwrap());
        assert_eq!(range.end, NaiveDate::from_ymd_opt(2021, 6, 7).unwrap());
    }

    #[test]
    fn december_to_december_stays_in_current_year() {
        let range = parse_date_range("Dec 18-Dec 24", 2021).expect("parse");
        assert_eq!(range.start, NaiveDate::from_ymd_opt(2021, 12, 18).unwrap());
        assert_eq!(range.end, NaiveDate::from_ymd_opt(2021, 12, 24).unwrap());
    }

    #[test]
    fn wrong_segment_count_is_a_format_error() {
        assert!(matches!(
            parse_date_range("Dec 25", 2021),
            Err(MetricsError::DateRangeFormat { .. })
        ));
        assert!(matches!(
            parse_date_range("Dec 25-Jan 1-Jan 8", 2021),
            Err(MetricsError::DateRangeFormat { .. })
        ));
    }

    #[test]
    fn garbage_segment_is_a_parse_error() {
        assert!(matches!(
            parse_date_range("Foo 99-Jan 1", 2021),
            Err(MetricsError::DateParse { .. })
        ));
    }

    #[test]
    fn case_rate_at_threshold_boundary_is_not_over() {
        let info = sample_info(100_000.0, 70);
        assert!((info.case_rate_7_days().unwrap() - 70.0).abs() < 1e-9);
        assert!((info.case_rate_7_days_daily_avg().unwrap() - 10.0).abs() < 1e-9);
        // Exactly at the threshold: the comparison is strict.
        assert!(!info.case_rate_over_threshold().unwrap());
    }

    #[test]
    fn case_rate_over_threshold_when_strictly_above() {
        let info = sample_info(100_000.0, 71);
        assert!(info.case_rate_over_threshold().unwrap());
    }

    #[test]
    fn small_population_never_trips_case_nums_threshold() {
        let info = sample_info(5_000.0, 700);
        assert!(!info.case_nums_over_threshold());
    }

    #[test]
    fn case_nums_threshold_needs_population_and_volume() {
        let info = sample_info(20_000.0, 42);
        assert!((info.avg_case_nums_7_days() - 6.0).abs() < 1e-9);
        assert!(info.case_nums_over_threshold());
    }

    #[test]
    fn zero_population_is_a_defined_error() {
        let info = sample_info(0.0, 70);
        assert!(matches!(
            info.case_rate_7_days(),
            Err(MetricsError::ZeroPopulation { zip: 11204 })
        ));
        assert!(matches!(
            info.case_rate_over_threshold(),
            Err(MetricsError::ZeroPopulation { .. })
        ));
    }
}
