//! Folio CLI - turn a stack of photos into a single paginated PDF.
//!
//! Each photo becomes one page, scaled to fit the chosen page format with a
//! fixed margin. Photos that cannot be decoded are skipped.
//!
//! # Usage
//!
//! ```bash
//! # Render two photos and a folder into one A4 PDF
//! folio render front.jpg back.jpg ./receipts/
//!
//! # Landscape Letter, standard quality, sharpened, with a JSON summary
//! folio render ./scans -f letter --orientation landscape -q standard -e sharpen --json
//!
//! # View configuration
//! folio config show
//!
//! # Guided mode
//! folio
//! ```

use clap::{CommandFactory, Parser, Subcommand};
use std::io::IsTerminal;

mod cli;
mod logging;

/// Folio - turn a stack of photos into a single paginated PDF.
#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Render images into a PDF, one image per page
    Render(cli::render::RenderArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so config warnings go through eprintln.
    let config = match folio_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `folio config path`."
            );
            folio_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Folio v{}", folio_core::VERSION);

    match cli.command {
        Some(Commands::Render(args)) => cli::render::execute(args).await,
        Some(Commands::Config(args)) => cli::config::execute(args).await,
        None if std::io::stdin().is_terminal() && std::io::stderr().is_terminal() => {
            cli::interactive::run(&config).await
        }
        None => {
            Cli::command().print_help()?;
            anyhow::bail!("No command given and not running in a terminal")
        }
    }
}
