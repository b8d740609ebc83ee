//! Positivity trend chart rendering with Plotters.

use std::path::Path;

use chrono::{Duration, NaiveDate};
use plotters::prelude::*;

use crate::models::PositivityPoint;
use crate::zone::{ZoneClassifier, POS_ORANGE, POS_RED, POS_YELLOW};

// Zone band colors.
const RED_BAND: RGBColor = RGBColor(0xff, 0x82, 0x82);
const ORANGE_BAND: RGBColor = RGBColor(0xff, 0xbc, 0x82);
const YELLOW_BAND: RGBColor = RGBColor(0xff, 0xf0, 0x82);
const BG_OPACITY: f64 = 0.5;
const GRID_COLOR: RGBColor = RGBColor(0xd3, 0xd3, 0xd3);
const LINE_COLOR: RGBColor = BLUE;

// The red band is capped at a fixed ceiling rather than scaling to the data.
pub const RED_BAND_TOP: f64 = 6.0;

const X_TITLE: &str = "Date";
const Y_TITLE: &str = "Positivity rate, seven-day average";
const FIG_TITLE_STUB: &str = "COVID-19 test positivity rate, seven-day average, ZIP code: ";

/// Renders the 20-day positivity chart as a PNG: solid line for the
/// established segment, dashed line for the tentative final days, value
/// labels over the ten-day streak window, and colored zone bands behind
/// the traces.
pub fn render_positivity_chart(
    classifier: &ZoneClassifier,
    output_path: &Path,
) -> anyhow::Result<()> {
    let window = classifier.window_20();
    let (Some(first), Some(last)) = (window.first(), window.last()) else {
        anyhow::bail!(
            "no positivity data to chart for ZIP code {}",
            classifier.zip_code()
        );
    };
    let x_start = first.date;
    let mut x_end = last.date;
    if x_end == x_start {
        x_end = x_end + Duration::days(1);
    }

    let root = BitMapBackend::new(output_path, (1000, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("{FIG_TITLE_STUB}{}", classifier.zip_code()),
            ("sans-serif", 24),
        )
        .margin(10)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(x_start..x_end, 0f64..RED_BAND_TOP)?;

    chart
        .configure_mesh()
        .bold_line_style(GRID_COLOR)
        .x_desc(X_TITLE)
        .y_desc(Y_TITLE)
        .axis_desc_style(("sans-serif", 15))
        .draw()?;

    // Zone bands, drawn first so the traces sit on top. Each band spans
    // from its threshold up to the next tier's threshold.
    let bands = [
        (POS_YELLOW, POS_ORANGE, YELLOW_BAND),
        (POS_ORANGE, POS_RED, ORANGE_BAND),
        (POS_RED, RED_BAND_TOP, RED_BAND),
    ];
    for (y0, y1, color) in bands {
        chart.draw_series(std::iter::once(Rectangle::new(
            [(x_start, y0), (x_end, y1)],
            color.mix(BG_OPACITY).filled(),
        )))?;
    }

    let established = observed(classifier.established());
    chart.draw_series(LineSeries::new(
        established.iter().copied(),
        LINE_COLOR.stroke_width(2),
    ))?;
    chart.draw_series(
        established
            .iter()
            .map(|&(date, rate)| Circle::new((date, rate), 3, LINE_COLOR.filled())),
    )?;

    let tentative = observed(classifier.tentative());
    chart.draw_series(DashedLineSeries::new(
        tentative.iter().copied(),
        6,
        4,
        LINE_COLOR.stroke_width(2),
    ))?;
    chart.draw_series(
        tentative
            .iter()
            .map(|&(date, rate)| Circle::new((date, rate), 3, LINE_COLOR.filled())),
    )?;

    // Value labels above each point of the ten-day window.
    chart.draw_series(observed(classifier.window_10()).into_iter().map(
        |(date, rate)| {
            EmptyElement::at((date, rate))
                + Text::new(
                    format!("{rate:.2}"),
                    (-10, -18),
                    ("sans-serif", 13).into_font(),
                )
        },
    ))?;

    root.present()?;
    Ok(())
}

fn observed(points: &[PositivityPoint]) -> Vec<(NaiveDate, f64)> {
    points
        .iter()
        .filter_map(|p| p.rate.map(|rate| (p.date, rate)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_classifier() -> ZoneClassifier {
        let start = NaiveDate::from_ymd_opt(2020, 11, 1).unwrap();
        let series = (0..20)
            .map(|i| PositivityPoint {
                date: start + Duration::days(i),
                rate: Some(2.0 + 0.15 * i as f64),
            })
            .collect();
        ZoneClassifier::from_series("11204", series)
    }

    #[test]
    fn renders_chart_to_png() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("positivity.png");
        render_positivity_chart(&sample_classifier(), &path).expect("render");
        assert!(path.exists());
    }

    #[test]
    fn empty_series_is_an_error() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("positivity.png");
        let classifier = ZoneClassifier::from_series("11204", Vec::new());
        assert!(render_positivity_chart(&classifier, &path).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn skips_missing_observations() {
        let start = NaiveDate::from_ymd_opt(2020, 11, 1).unwrap();
        let series = (0..20)
            .map(|i| PositivityPoint {
                date: start + Duration::days(i),
                rate: if i % 5 == 0 { None } else { Some(3.0) },
            })
            .collect();
        let classifier = ZoneClassifier::from_series("11204", series);
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("positivity.png");
        render_positivity_chart(&classifier, &path).expect("render");
        assert!(path.exists());
    }
}
