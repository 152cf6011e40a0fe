//! # beam-report
//!
//! Command-line front end: reads a beam force spreadsheet and writes
//! `<output>.typ`, `<output>.pdf` and `<output>.log` to the working
//! directory (or wherever `--output` points).
//!
//! ```bash
//! beam-report -e beam_forces.xlsx -i beam.png -o girder_report
//! ```

mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use beam_core::report::{generate_report, ReportOutcome, ReportRequest};
use beam_core::settings::ReportSettings;
use beam_core::units::{KiloNewtonMeters, KiloNewtons, Meters};
use beam_core::ReportError;
use clap::Parser;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(
    name = "beam-report",
    version,
    about = "Generate a beam force analysis report (PDF) from spreadsheet data"
)]
struct Cli {
    /// Spreadsheet with position, shear force and bending moment columns
    #[arg(short = 'e', long = "excel", visible_alias = "data", value_name = "PATH")]
    excel: PathBuf,

    /// Beam image to include in the introduction
    #[arg(short, long, value_name = "PATH")]
    image: Option<PathBuf>,

    /// Output file name without extension
    #[arg(short, long, value_name = "NAME", default_value = "beam_analysis_report")]
    output: PathBuf,
}

impl Cli {
    fn into_request(self, settings: ReportSettings) -> ReportRequest {
        ReportRequest {
            data_path: self.excel,
            image_path: self.image,
            output_base: self.output,
            settings,
        }
    }
}

fn main() -> ExitCode {
    logging::init();
    let cli = Cli::parse();

    println!("Beam Report Generator");
    println!("=====================");
    println!();

    match run(cli) {
        Ok(outcome) => {
            print_outcome(&outcome);
            ExitCode::SUCCESS
        }
        Err(err) => {
            report_error(&err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ReportOutcome, ReportError> {
    let settings = ReportSettings::load()?;
    debug!(?settings, "resolved settings");

    println!("Reading data from: {}", cli.excel.display());
    if let Some(image) = &cli.image {
        if image.is_file() {
            println!("Including image:   {}", image.display());
        } else {
            println!("Image not found:   {} (continuing without it)", image.display());
        }
    }
    println!("Generating report: {}.pdf", cli.output.display());
    println!();

    generate_report(&cli.into_request(settings))
}

fn print_outcome(outcome: &ReportOutcome) {
    let (shear, shear_at) = outcome.shear.peak_abs();
    let (moment, moment_at) = outcome.moment.peak_abs();

    println!("Loaded {} data points over {}", outcome.rows, outcome.span);
    println!("  Max |V| = {} at x = {}", KiloNewtons(shear), Meters(shear_at));
    println!("  Max |M| = {} at x = {}", KiloNewtonMeters(moment), Meters(moment_at));
    println!();
    println!("Report written:");
    println!("  PDF:    {}", outcome.artifacts.pdf_path.display());
    println!("  Source: {}", outcome.artifacts.source_path.display());
    println!("  Log:    {}", outcome.artifacts.log_path.display());
}

fn report_error(err: &ReportError) {
    eprintln!("Error during {}: {}", err.stage(), err);
    if let Ok(json) = serde_json::to_string(err) {
        eprintln!("{}", json);
    }
}
