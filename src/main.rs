use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use well_log_analyzer::data::{filter, loader};
use well_log_analyzer::petro::Outcome;
use well_log_analyzer::{AnalyzerConfig, WellAnalysis};

#[derive(Parser)]
#[command(
    name = "well-log-analyzer",
    about = "Derive porosity, shale volume and pay zones from a well-log export",
    version
)]
struct Cli {
    /// Curve table exported from a LAS file (.csv, .json or .parquet)
    file: PathBuf,

    /// TOML file with [params] and [aliases] sections
    #[arg(long)]
    config: Option<PathBuf>,

    /// Matrix density ρma (g/cc)
    #[arg(long)]
    matrix_density: Option<f64>,

    /// Fluid density ρf (g/cc)
    #[arg(long)]
    fluid_density: Option<f64>,

    /// Gamma-ray pay cutoff (API)
    #[arg(long)]
    gr_cutoff: Option<f64>,

    /// Neutron-porosity pay cutoff (fraction)
    #[arg(long)]
    nphi_cutoff: Option<f64>,

    /// Keep rows with missing samples instead of dropping them
    #[arg(long)]
    keep_incomplete: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AnalyzerConfig::load(path)?,
        None => AnalyzerConfig::default(),
    };
    let params = &mut config.params;
    if let Some(v) = cli.matrix_density {
        params.matrix_density = v;
    }
    if let Some(v) = cli.fluid_density {
        params.fluid_density = v;
    }
    if let Some(v) = cli.gr_cutoff {
        params.gr_cutoff = v;
    }
    if let Some(v) = cli.nphi_cutoff {
        params.nphi_cutoff = v;
    }
    for warning in params.validate() {
        log::warn!("{warning}");
    }

    let mut table = loader::load_file(&cli.file)?;
    log::info!(
        "Loaded {} rows with curves {:?}",
        table.len(),
        table.curve_names()
    );
    if !cli.keep_incomplete {
        table = filter::drop_incomplete_rows(&table, &[]).context("dropping incomplete rows")?;
    }
    if table.is_empty() {
        log::warn!("No usable curve data in {}", cli.file.display());
    }

    let analysis = WellAnalysis::run(table, &config).context("running analysis")?;

    if cli.json {
        let text = serde_json::to_string_pretty(&analysis.report())?;
        println!("{text}");
    } else {
        print_report(&analysis);
    }
    Ok(())
}

fn print_report(analysis: &WellAnalysis) {
    let table = &analysis.table;
    println!("Rows: {}", table.len());
    println!("Curves:");
    for curve in table.curves() {
        println!("  - {curve}");
    }

    println!("Derivations:");
    for (kind, outcome) in &analysis.outcomes {
        match outcome {
            Outcome::Computed { curve } => println!("  {kind}: computed ({curve})"),
            Outcome::Unavailable { missing } => {
                let names: Vec<&str> = missing.iter().map(|r| r.as_str()).collect();
                println!("  {kind}: unavailable, missing {}", names.join(", "));
            }
            Outcome::Failed { reason } => println!("  {kind}: failed, {reason}"),
        }
    }

    let missing = analysis.missing_display_roles();
    if !missing.is_empty() {
        let names: Vec<&str> = missing.iter().map(|r| r.as_str()).collect();
        println!("Triple-combo tracks incomplete, missing {}", names.join(", "));
    }

    if let Some(summary) = &analysis.summary {
        println!("Pay zones: {}", summary.zone_count);
        println!(
            "  {:>10} {:>10} {:>7} {:>10}",
            "top", "bottom", "count", "thickness"
        );
        for zone in &analysis.zones {
            println!(
                "  {:>10.2} {:>10.2} {:>7} {:>10.2}",
                zone.top_depth, zone.bottom_depth, zone.sample_count, zone.thickness
            );
        }
        print!("Net pay {:.2} over gross {:.2}", summary.net_pay, summary.gross_interval);
        match summary.net_to_gross {
            Some(ntg) => println!(" (N/G {ntg:.3})"),
            None => println!(),
        }
    }
}
