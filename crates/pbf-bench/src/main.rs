//! Command-line driver for the writer benchmark.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use pbf_bench::{runner, BenchConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(name = "pbf-bench")]
#[clap(about = "Encode a fixed nested protobuf message shape and time it")]
struct Cli {
    /// TOML file with benchmark settings
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Outer messages per iteration
    #[clap(short, long)]
    messages: Option<usize>,

    /// Number of timed iterations
    #[clap(short, long)]
    iterations: Option<usize>,

    /// Output buffer size in bytes
    #[clap(long)]
    output_capacity: Option<usize>,

    /// Write minimal length prefixes (shifts content on close)
    #[clap(long)]
    compact: bool,

    /// Print the report as JSON
    #[clap(long)]
    json: bool,

    /// Enable debug logging
    #[clap(short, long)]
    debug: bool,
}

impl Cli {
    fn apply(&self, config: &mut BenchConfig) {
        if let Some(messages) = self.messages {
            config.messages = messages;
        }
        if let Some(iterations) = self.iterations {
            config.iterations = iterations;
        }
        if let Some(capacity) = self.output_capacity {
            config.output_capacity = capacity;
        }
        if self.compact {
            config.compact = true;
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut config = BenchConfig::load(cli.config.as_deref()).context("loading configuration")?;
    cli.apply(&mut config);

    let report = runner::run(&config)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report);
    }

    Ok(())
}
