use std::fmt::Write;

use crate::error::MetricsError;
use crate::info::ZipCodeInfo;
use crate::models::ZoneReport;

pub const ZONE_DISCLAIMER: &str = "NOTE: this only takes into account qualification metrics for areas that \
have not yet been designated as microclusters, or those that might qualify \
for a stricter/more severe designation. It does NOT take into account exit \
metrics for areas *already* designated as microcluster red/orange/yellow \
zones!";

pub fn build_zone_report(report: &ZoneReport) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "{ZONE_DISCLAIMER}");
    let _ = writeln!(output);
    let _ = writeln!(
        output,
        "*** ZIP code {} currently meets quantitative metrics for zone: {}",
        report.zip_code, report.qualifying_tier
    );

    let tiers: Vec<&str> = report.day_tiers.iter().map(|t| t.label()).collect();
    let _ = writeln!(
        output,
        "Assuming case numbers are high enough, positivity rates suggest that \
         over the last ten days, this ZIP code has met criteria for the \
         following zones: [{}]",
        tiers.join(", ")
    );
    let _ = writeln!(
        output,
        "If an area records ten consecutive days of a more severe color than \
         its current rating (e.g. orange -> red), it meets the quantitative \
         metrics for the new color."
    );

    output
}

pub fn build_info_report(info: &ZipCodeInfo) -> Result<String, MetricsError> {
    let mut output = String::new();

    let _ = writeln!(
        output,
        "# ZIP code {} - {} ({})",
        info.zip_code, info.totals.neighborhood_name, info.totals.borough
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Cumulative totals");
    let _ = writeln!(
        output,
        "- Cases: {} ({:.1} per 100k)",
        info.totals.total_case_count, info.totals.total_case_rate
    );
    let _ = writeln!(
        output,
        "- Deaths: {} ({:.1} per 100k)",
        info.totals.total_deaths, info.totals.total_death_rate
    );
    let _ = writeln!(
        output,
        "- Tests: {} ({:.1}% positive)",
        info.totals.total_tests, info.totals.pct_pos_total
    );
    let _ = writeln!(output, "- Population: {:.0}", info.totals.population);

    let _ = writeln!(output);
    let _ = writeln!(
        output,
        "## Last seven days ({} to {})",
        info.date_range_7_days.start, info.date_range_7_days.end
    );
    let _ = writeln!(
        output,
        "- Neighborhood: {}",
        info.weekly.neighborhood_name
    );
    let _ = writeln!(
        output,
        "- Percent positivity: {:.2}%",
        info.weekly.pct_pos_7_days
    );
    let _ = writeln!(
        output,
        "- People tested: {}, positive: {}",
        info.weekly.people_tested_7_days, info.weekly.people_positive_7_days
    );
    let _ = writeln!(
        output,
        "- Median daily test rate: {:.1}",
        info.weekly.median_daily_test_rate_7_days
    );
    let _ = writeln!(
        output,
        "- Adequately tested: {}",
        info.weekly.adequately_tested_7_days
    );

    let _ = writeln!(output);
    let _ = writeln!(output, "## Microcluster case metrics");
    let _ = writeln!(
        output,
        "- 7-day case rate: {:.1} per 100k ({:.2} per day)",
        info.case_rate_7_days()?,
        info.case_rate_7_days_daily_avg()?
    );
    let _ = writeln!(
        output,
        "- Average daily new cases: {:.1}",
        info.avg_case_nums_7_days()
    );
    let _ = writeln!(
        output,
        "- Daily case rate over 10 per 100k: {}",
        yes_no(info.case_rate_over_threshold()?)
    );
    let _ = writeln!(
        output,
        "- Case counts over threshold (population > 10,000 and > 5 cases/day): {}",
        yes_no(info.case_nums_over_threshold())
    );

    Ok(output)
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}
