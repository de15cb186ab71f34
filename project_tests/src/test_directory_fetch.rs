//! # Directory Fetch Live Test
//!
//! Runs one fetch + join against the real upstream listings via lib_partners and
//! prints the counts and a sample joined record.

use anyhow::Result;
use clap::Parser;
use lib_partners::loggers::setup_logging;
use lib_partners::{PipelineSettings, RefreshPipeline};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "test_directory_fetch", about = "Live smoke test of the partner directory pipeline")]
struct Args {
    /// Override the upstream base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Records per batch
    #[arg(long)]
    batch_size: Option<usize>,

    /// Directory for the JSON log file
    #[arg(long, default_value = "./logs")]
    log_dir: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let _guard = setup_logging(&args.log_dir, "info", "test_directory_fetch")?;

    let defaults = PipelineSettings::default();
    let settings = PipelineSettings {
        base_url: args.base_url.unwrap_or(defaults.base_url.clone()),
        batch_size: args.batch_size.unwrap_or(defaults.batch_size),
        ..defaults
    };

    // // Statement: Build the same pipeline the server uses
    let pipeline = RefreshPipeline::from_settings(&settings)?;

    println!("[*] Fetching partners and solutions from {} ...", settings.base_url);
    let started = Instant::now();
    let joined = pipeline.run().await;
    let elapsed = started.elapsed();

    let with_solutions = joined.iter().filter(|p| p.has_solutions()).count();
    let solutions: usize = joined.iter().map(|p| p.solutions.len()).sum();

    println!("\n[RESULT] Fetch + join finished in {:?}", elapsed);
    println!("-----------------------------------------------");
    println!("Partners:                {}", joined.len());
    println!("Partners with solutions: {}", with_solutions);
    println!("Matched solutions:       {}", solutions);
    println!("-----------------------------------------------");

    // // Statement: Prefer a sample that actually carries solutions
    match joined.iter().find(|p| p.has_solutions()).or(joined.first()) {
        Some(sample) => {
            println!("[SAMPLE]");
            println!("{}", serde_json::to_string_pretty(sample)?);
        }
        None => {
            eprintln!("\n[ERROR] Upstream returned no partners.");
            std::process::exit(1);
        }
    }

    Ok(())
}
