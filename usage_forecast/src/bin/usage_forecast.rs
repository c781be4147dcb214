//! Command line entry point for the usage forecasting pipelines.
//!
//! `usage-forecast [OPTIONS] <DATA_FILE> <OUTPUT_FILE> <PARAMETER_FILE>`

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use usage_forecast::{resolve_parameters, run_algorithm, Algorithm, DataLoader};

#[derive(Parser)]
#[command(name = "usage-forecast")]
#[command(version, long_about = None)]
#[command(about = "Forecast yearly utility usage per municipality or usage type")]
struct Cli {
    /// Usage records, JSON array or CSV (by extension)
    #[arg(required_unless_present_any = ["parameters", "description", "list_algorithms"])]
    data_file: Option<PathBuf>,

    /// Where the forecast document is written
    #[arg(required_unless_present_any = ["parameters", "description", "list_algorithms"])]
    output_file: Option<PathBuf>,

    /// JSON object overriding default parameters; may be missing
    #[arg(required_unless_present_any = ["parameters", "description", "list_algorithms"])]
    parameter_file: Option<PathBuf>,

    /// Forecasting algorithm (linear, cubic, logarithmic, prophet)
    #[arg(short, long, default_value = "linear")]
    algorithm: Algorithm,

    /// Print the algorithm's default parameters and exit
    #[arg(long)]
    parameters: bool,

    /// Print the algorithm's description and exit
    #[arg(long)]
    description: bool,

    /// Print every available algorithm and exit
    #[arg(long)]
    list_algorithms: bool,

    /// Write compact instead of pretty-printed JSON
    #[arg(long)]
    compact: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries introspection output
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if cli.list_algorithms {
        let catalogue: Vec<_> = Algorithm::ALL.iter().map(Algorithm::information).collect();
        println!("{}", serde_json::to_string_pretty(&catalogue)?);
        return Ok(());
    }

    if cli.parameters {
        println!(
            "{}",
            serde_json::to_string_pretty(&cli.algorithm.default_parameters_json())?
        );
        return Ok(());
    }

    if cli.description {
        println!("{}", cli.algorithm.description());
        return Ok(());
    }

    let (Some(data_file), Some(output_file), Some(parameter_file)) =
        (cli.data_file, cli.output_file, cli.parameter_file)
    else {
        anyhow::bail!("DATA_FILE, OUTPUT_FILE and PARAMETER_FILE are required");
    };

    let parameters = resolve_parameters(&cli.algorithm.default_parameters(), &parameter_file);

    let records = DataLoader::from_path(&data_file)
        .with_context(|| format!("failed to load usage data from {}", data_file.display()))?;

    let document = run_algorithm(cli.algorithm, &parameters, &records)
        .with_context(|| format!("{} forecast failed", cli.algorithm))?;

    document
        .write_to_file(&output_file, !cli.compact)
        .with_context(|| format!("failed to write forecast to {}", output_file.display()))?;

    info!(
        algorithm = %cli.algorithm,
        groups = document.meta.len(),
        points = document.data.len(),
        output = %output_file.display(),
        "forecast written"
    );

    Ok(())
}
