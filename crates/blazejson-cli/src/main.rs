//! BlazeJson CLI - Command-line JSON minifier
//!
//! # Usage
//!
//! ```bash
//! # Minify a file
//! blazejson minify input.json -o output.json
//!
//! # Maximum throughput mode
//! blazejson minify --mode turbo large.json -o min.json
//!
//! # Pipe usage
//! cat data.json | blazejson minify
//!
//! # Validate structure only
//! blazejson validate data.json
//!
//! # Show detected hardware capabilities
//! blazejson info
//! ```

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use tracing::info;

use blazejson_core::{EngineConfig, MinifyEngine, OptimizationLevel};

/// BlazeJson - High-performance JSON minifier
#[derive(Parser)]
#[command(name = "blazejson")]
#[command(about = "High-performance JSON minification")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

/// Processing mode, ordered by how hard the engine is allowed to work
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    /// Scalar only, minimal memory
    Eco,
    /// Single-threaded with the widest vector kernel (default)
    Sport,
    /// Vectorized and parallel
    Turbo,
    /// Re-evaluate per input
    Auto,
}

impl Mode {
    fn level(self) -> OptimizationLevel {
        match self {
            Mode::Eco => OptimizationLevel::Basic,
            Mode::Sport => OptimizationLevel::Aggressive,
            Mode::Turbo => OptimizationLevel::Extreme,
            Mode::Auto => OptimizationLevel::Automatic,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Minify a JSON document
    Minify {
        /// Input file (stdin if not provided)
        input: Option<PathBuf>,

        /// Output file (stdout if not provided)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Processing mode
        #[arg(short, long, value_enum, default_value_t = Mode::Sport)]
        mode: Mode,

        /// Worker threads for parallel execution (0 = logical cores)
        #[arg(long, default_value = "0")]
        threads: usize,

        /// Disable vector kernels
        #[arg(long)]
        no_simd: bool,

        /// Print performance statistics to stderr
        #[arg(long)]
        stats: bool,

        /// Statistics format (text, json)
        #[arg(long, default_value = "text", requires = "stats")]
        format: String,
    },

    /// Check the structural shape of a JSON document
    Validate {
        /// Input file (stdin if not provided)
        input: Option<PathBuf>,
    },

    /// Show detected hardware capabilities
    Info,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Commands::Minify {
            input,
            output,
            mode,
            threads,
            no_simd,
            stats,
            format,
        } => cmd_minify(input, output, mode, threads, no_simd, stats, &format),
        Commands::Validate { input } => cmd_validate(input),
        Commands::Info => cmd_info(),
    }
}

fn read_input(input: Option<&PathBuf>) -> Result<Vec<u8>> {
    match input {
        Some(path) => {
            fs::read(path).with_context(|| format!("failed to read {}", path.display()))
        }
        None => {
            let mut buffer = Vec::new();
            io::stdin()
                .read_to_end(&mut buffer)
                .context("failed to read stdin")?;
            Ok(buffer)
        }
    }
}

fn cmd_minify(
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    mode: Mode,
    threads: usize,
    no_simd: bool,
    stats: bool,
    format: &str,
) -> Result<()> {
    let data = read_input(input.as_ref())?;

    let config = EngineConfig::builder()
        .optimization_level(mode.level())
        .worker_threads(threads)
        .enable_simd(!no_simd)
        .build();
    let engine = MinifyEngine::new(config).context("failed to initialize engine")?;

    info!(
        input_bytes = data.len(),
        mode = ?mode,
        backend = ?engine.capabilities().backend_type,
        "minifying"
    );

    let (minified, call_stats) = engine
        .minify_with_stats(&data)
        .context("minification failed")?;

    match output {
        Some(path) => fs::write(&path, &minified)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => io::stdout()
            .write_all(&minified)
            .context("failed to write stdout")?,
    }

    if stats {
        match format {
            "json" => {
                let report = serde_json::json!({
                    "input_bytes": call_stats.input_bytes,
                    "output_bytes": call_stats.output_bytes,
                    "bytes_saved": call_stats.bytes_saved(),
                    "compression_ratio": call_stats.compression_ratio(),
                    "strategy": format!("{:?}", call_stats.strategy),
                    "chunks": call_stats.chunks,
                    "throughput_mbps": call_stats.throughput_mbps(),
                    "duration_us": call_stats.duration.as_micros() as u64,
                });
                eprintln!("{}", serde_json::to_string_pretty(&report)?);
            }
            _ => {
                eprintln!(
                    "{} {} -> {} bytes ({:.1}% saved)",
                    "minified:".green().bold(),
                    call_stats.input_bytes,
                    call_stats.output_bytes,
                    (1.0 - call_stats.compression_ratio()) * 100.0
                );
                eprintln!(
                    "{} {:?} across {} chunk(s), {:.0} MB/s",
                    "strategy:".cyan().bold(),
                    call_stats.strategy,
                    call_stats.chunks,
                    call_stats.throughput_mbps()
                );
            }
        }
    }

    Ok(())
}

fn cmd_validate(input: Option<PathBuf>) -> Result<()> {
    let data = read_input(input.as_ref())?;

    match blazejson_core::validate(&data) {
        Ok(()) => {
            println!("{}", "valid".green().bold());
            Ok(())
        }
        Err(err) => {
            println!("{} {}", "invalid:".red().bold(), err);
            std::process::exit(1);
        }
    }
}

fn cmd_info() -> Result<()> {
    let engine = MinifyEngine::with_defaults().context("failed to initialize engine")?;
    let caps = engine.capabilities();

    println!("{}", "BlazeJson hardware capabilities".bold());
    println!("  backend:    {:?}", caps.backend_type);
    println!("  lane width: {} bytes", caps.lane_width());
    println!("  avx512:     {}", caps.has_avx512());
    println!("  avx2:       {}", caps.has_avx2());
    println!("  neon:       {}", caps.has_neon());
    println!("  workers:    {}", engine.worker_count());
    Ok(())
}
