//! perfref CLI - Main Entry Point
//!
//! Runs performance reftest manifests against a browser and reports which
//! test pages meet their timing expectation relative to their reference.

use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{check, profiles, run};

/// Exit status when at least one entry did not pass
const EXIT_FAILURES: i32 = 1;
/// Exit status when the run could not complete
const EXIT_FATAL: i32 = 2;

/// perfref - performance reftest harness
#[derive(Parser)]
#[command(name = "perfref")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Output format
    #[arg(long, value_enum, default_value = "table", global = true)]
    format: output::OutputFormat,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every entry of a manifest and compare timings
    Run(run::RunArgs),

    /// Parse a manifest and list its entries without running them
    Check(check::CheckArgs),

    /// Show the built-in comparison profiles
    Profiles,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Run(args) => run::execute(args, cli.format).await,
        Commands::Check(args) => check::execute(args, cli.format).await,
        Commands::Profiles => profiles::execute(cli.format),
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(EXIT_FAILURES),
        Err(e) => {
            output::print_error(&e.to_string());
            std::process::exit(EXIT_FATAL);
        }
    }
}
