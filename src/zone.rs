use chrono::Duration;

use crate::error::MetricsError;
use crate::models::{PositivityPoint, SeverityTier, ZoneReport, ZoneStreak};
use crate::tables::PositivityTable;

// NYS microcluster zone positivity thresholds, strict comparisons.
pub const POS_YELLOW: f64 = 2.5;
pub const POS_ORANGE: f64 = 3.0;
pub const POS_RED: f64 = 4.0;

pub const LOOKBACK_WINDOW_DAYS: i64 = 20;
pub const STREAK_WINDOW_DAYS: i64 = 10;
const TENTATIVE_WINDOW_DAYS: i64 = 3;
// The established trace drops the final two observations; the last
// reporting days are still subject to revision.
const ESTABLISHED_TRIM: usize = 2;

/// Consecutive days at or above a tier required to qualify for it.
pub const STREAK_TARGET: u32 = 10;

/// Classifies a tier from a single positivity value. Highest tier wins;
/// all comparisons are strictly greater-than.
pub fn classify(rate: f64) -> SeverityTier {
    if rate > POS_RED {
        SeverityTier::Red
    } else if rate > POS_ORANGE {
        SeverityTier::Orange
    } else if rate > POS_YELLOW {
        SeverityTier::Yellow
    } else {
        SeverityTier::None
    }
}

/// Zone classification over one ZIP code's positivity series. Windows are
/// cut by calendar day relative to the latest observation, not by row count.
#[derive(Debug)]
pub struct ZoneClassifier {
    zip_code: String,
    window_10: Vec<PositivityPoint>,
    window_20: Vec<PositivityPoint>,
    established: Vec<PositivityPoint>,
    tentative: Vec<PositivityPoint>,
}

impl ZoneClassifier {
    pub fn new(table: &PositivityTable, zip_code: &str) -> Result<Self, MetricsError> {
        let series = table.series(zip_code)?;
        Ok(Self::from_series(zip_code, series))
    }

    /// Builds the classifier from an already-extracted series. The series
    /// must be sorted by date (as `PositivityTable::series` returns it).
    pub fn from_series(zip_code: &str, series: Vec<PositivityPoint>) -> Self {
        let window_10 = last_days(&series, STREAK_WINDOW_DAYS);
        let window_20 = last_days(&series, LOOKBACK_WINDOW_DAYS);
        let tentative = last_days(&window_20, TENTATIVE_WINDOW_DAYS);
        let established = if window_20.len() > ESTABLISHED_TRIM {
            window_20[..window_20.len() - ESTABLISHED_TRIM].to_vec()
        } else {
            Vec::new()
        };
        Self {
            zip_code: zip_code.to_string(),
            window_10,
            window_20,
            established,
            tentative,
        }
    }

    pub fn zip_code(&self) -> &str {
        &self.zip_code
    }

    pub fn window_10(&self) -> &[PositivityPoint] {
        &self.window_10
    }

    pub fn window_20(&self) -> &[PositivityPoint] {
        &self.window_20
    }

    pub fn established(&self) -> &[PositivityPoint] {
        &self.established
    }

    pub fn tentative(&self) -> &[PositivityPoint] {
        &self.tentative
    }

    /// Runs the streak counters over the ten-day window and reports the
    /// qualifying zone.
    ///
    /// A RED day increments all three counters since RED implies meeting
    /// the lower tiers. An ORANGE day resets red, a YELLOW day resets red
    /// and orange. Days with no qualifying tier (rate <= 2.5) and days with
    /// a missing rate are skipped without touching the counters, matching
    /// the upstream metric definition. A tier qualifies only when its
    /// counter reaches exactly ten.
    pub fn zone_metrics(&self) -> ZoneReport {
        let mut streak = ZoneStreak::default();
        let mut day_tiers = Vec::new();

        for point in &self.window_10 {
            let Some(rate) = point.rate else {
                continue;
            };
            let tier = classify(rate);
            match tier {
                SeverityTier::Red => {
                    streak.red_days += 1;
                    streak.orange_days += 1;
                    streak.yellow_days += 1;
                }
                SeverityTier::Orange => {
                    streak.red_days = 0;
                    streak.orange_days += 1;
                    streak.yellow_days += 1;
                }
                SeverityTier::Yellow => {
                    streak.red_days = 0;
                    streak.orange_days = 0;
                    streak.yellow_days += 1;
                }
                SeverityTier::None => continue,
            }
            day_tiers.push(tier);
        }

        let qualifying_tier = if streak.red_days == STREAK_TARGET {
            SeverityTier::Red
        } else if streak.orange_days == STREAK_TARGET {
            SeverityTier::Orange
        } else if streak.yellow_days == STREAK_TARGET {
            SeverityTier::Yellow
        } else {
            SeverityTier::None
        };

        ZoneReport {
            zip_code: self.zip_code.clone(),
            qualifying_tier,
            day_tiers,
            streak,
        }
    }
}

/// Points within the trailing `days` calendar days of the series' latest
/// date, exclusive at the far end: kept iff date > latest - days.
fn last_days(series: &[PositivityPoint], days: i64) -> Vec<PositivityPoint> {
    let Some(latest) = series.last().map(|p| p.date) else {
        return Vec::new();
    };
    let cutoff = latest - Duration::days(days);
    series.iter().filter(|p| p.date > cutoff).copied().collect()
}
