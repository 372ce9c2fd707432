//! Command-line interface for nb-init
//!
//! Parses flags (with environment fallbacks), sets up logging and hands over
//! to the initialization run.

use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod init;

pub use init::InitArgs;

/// Populate a NetBox instance from netbox-initializers YAML files
#[derive(Parser)]
#[command(name = "nb-init")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    args: InitArgs,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long)]
    verbose: bool,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG in the environment always takes precedence; --verbose falls back to DEBUG.
    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    init::run(cli.args)
}
