//! Command-line entry point for the preprocessing pipeline.
//!
//! All semantics live in the library; this binary only assembles a
//! configuration (from a TOML file plus flag overrides) and runs it.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use market_preprocessor::{Pipeline, PreprocessConfig};

#[derive(Parser, Debug)]
#[command(
    name = "preprocess",
    about = "Build lag features and a chronological train/holdout split from raw Parquet market data"
)]
struct Args {
    /// Path to the raw dataset (a Parquet file or a directory of them).
    #[arg(long)]
    input: PathBuf,

    /// Optional TOML configuration file; defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the output directory.
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Override the holdout ratio.
    #[arg(long)]
    val_ratio: Option<f64>,

    /// Override the start-date cutoff.
    #[arg(long)]
    start_date: Option<i64>,

    /// Skip lag construction and merging.
    #[arg(long)]
    no_lags: bool,

    /// Run leakage and uniqueness checks after writing.
    #[arg(long)]
    validate: bool,
}

fn run(args: Args) -> market_preprocessor::Result<()> {
    let mut config = match &args.config {
        Some(path) => PreprocessConfig::load_toml(path)?,
        None => PreprocessConfig::default(),
    };

    if let Some(dir) = args.output_dir {
        config = config.with_output_dir(dir);
    }
    if let Some(ratio) = args.val_ratio {
        config = config.with_val_ratio(ratio);
    }
    if let Some(start_dt) = args.start_date {
        config = config.with_start_date(start_dt);
    }
    if args.no_lags {
        config = config.without_lags();
    }
    if args.validate {
        config = config.with_output_validation();
    }

    let pipeline = Pipeline::new(config)?;
    let output = pipeline.run(&args.input)?;

    println!(
        "preprocessing done: {} rows -> {} training / {} holdout (cutoff date {})",
        output.total_rows, output.train_rows, output.holdout_rows, output.cutoff_date
    );
    println!(
        "wrote {} and {}",
        output.train_path.display(),
        output.holdout_path.display()
    );
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
