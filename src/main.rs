use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

mod chart;
mod error;
mod info;
mod models;
mod report;
mod tables;
mod zone;

#[derive(Parser)]
#[command(name = "zcta-positivity")]
#[command(
    about = "COVID-19 test positivity metrics and microcluster zone classification by ZIP code",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a ZIP code against microcluster zone thresholds and chart
    /// its positivity trend
    Zone {
        #[arg(long)]
        zip: String,
        #[arg(long, default_value = "latest/pp-by-modzcta.csv")]
        positivity: PathBuf,
        #[arg(long, default_value = "positivity.png")]
        out: PathBuf,
        /// Skip chart rendering
        #[arg(long)]
        no_chart: bool,
        /// Emit the zone report as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Look up cumulative and last-seven-day metrics for a ZIP code
    Info {
        #[arg(long)]
        zip: i64,
        #[arg(long, default_value = "totals/data-by-modzcta.csv")]
        totals: PathBuf,
        #[arg(long, default_value = "latest/last7days-by-modzcta.csv")]
        latest: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Zone {
            zip,
            positivity,
            out,
            no_chart,
            json,
        } => {
            let table = tables::PositivityTable::load(&positivity).with_context(|| {
                format!("failed to load positivity table from {}", positivity.display())
            })?;
            let classifier = zone::ZoneClassifier::new(&table, &zip)?;
            let zone_report = classifier.zone_metrics();

            if json {
                println!("{}", serde_json::to_string_pretty(&zone_report)?);
            } else {
                print!("{}", report::build_zone_report(&zone_report));
            }

            if !no_chart {
                chart::render_positivity_chart(&classifier, &out)?;
                println!("Chart written to {}.", out.display());
            }
        }
        Commands::Info {
            zip,
            totals,
            latest,
        } => {
            let totals_table = tables::TotalsTable::load(&totals).with_context(|| {
                format!("failed to load totals table from {}", totals.display())
            })?;
            let weekly_table = tables::WeeklyTable::load(&latest).with_context(|| {
                format!("failed to load weekly snapshot table from {}", latest.display())
            })?;
            let info = info::ZipCodeInfo::resolve(&totals_table, &weekly_table, zip)?;
            print!("{}", report::build_info_report(&info)?);
        }
    }

    Ok(())
}
