//! StudioMate E2E runner entry point

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use studiomate_e2e::output::{self, OutputFormat};
use studiomate_e2e::runner::write_results;
use studiomate_e2e::{HarnessConfig, TestRunner};

#[derive(Parser, Debug)]
#[command(name = "studiomate-e2e")]
#[command(about = "End-to-end API test runner for the StudioMate backend")]
#[command(version)]
struct Args {
    /// Configuration file (TOML); missing file means defaults
    #[arg(short, long, default_value = "studiomate-e2e.toml")]
    config: PathBuf,

    /// API base URL, including the /api prefix
    #[arg(long, env = "STUDIOMATE_BASE_URL")]
    base_url: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Number of chunks for the chunked upload
    #[arg(long)]
    upload_chunks: Option<u32>,

    /// Summary format
    #[arg(long, default_value = "table")]
    format: OutputFormat,

    /// Directory to write test-results.json into
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the run order and exit
    #[arg(long)]
    list: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)),
        )
        .with_target(false)
        .init();

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: failed to create tokio runtime: {}", e);
            std::process::exit(2);
        }
    };

    match rt.block_on(async_main(args)) {
        Ok(true) => std::process::exit(0),
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(2);
        }
    }
}

async fn async_main(args: Args) -> anyhow::Result<bool> {
    let mut config = HarnessConfig::load(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    if let Some(base_url) = args.base_url {
        config.base_url = base_url;
    }
    if let Some(timeout_secs) = args.timeout_secs {
        config.timeout_secs = timeout_secs;
    }
    if let Some(upload_chunks) = args.upload_chunks {
        config.upload_chunks = upload_chunks;
    }
    if let Some(output) = args.output {
        config.results_dir = Some(output);
    }
    let results_dir = config.results_dir.clone();

    let mut runner = TestRunner::new(config)?;

    if args.list {
        println!("{}", output::render_plan(runner.groups()));
        return Ok(true);
    }

    let results = runner.run_all().await;
    println!("{}", output::render(&results, args.format));

    if let Some(dir) = results_dir {
        write_results(&results, &dir)?;
    }

    Ok(results.all_passed())
}
