//! The `folio config` command: inspect or create the config file.

use clap::{Args, Subcommand};
use folio_core::Config;
use std::path::Path;

/// Arguments for the `config` command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Subcommands for configuration management.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the effective configuration as TOML
    Show,

    /// Print where the config file is read from
    Path,

    /// Write a config file with default [limits], [render], [output] and [logging]
    Init {
        /// Replace an existing config file
        #[arg(long)]
        force: bool,
    },
}

/// Execute the config command.
pub async fn execute(args: ConfigArgs) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show => {
            println!("{}", Config::load()?.to_toml()?);
        }

        ConfigCommand::Path => {
            let path = Config::default_path();
            if !path.exists() {
                eprintln!("(not created yet; run `folio config init`)");
            }
            println!("{}", path.display());
        }

        ConfigCommand::Init { force } => {
            let path = Config::default_path();
            let config = write_default_config(&path, force)?;
            tracing::info!("Config file created at: {}", path.display());
            println!("Configuration initialized at: {}", path.display());
            for line in describe(&config) {
                println!("  {line}");
            }
        }
    }

    Ok(())
}

/// Write the default configuration to `path`, refusing to overwrite unless `force`.
fn write_default_config(path: &Path, force: bool) -> anyhow::Result<Config> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists at: {}\nUse --force to overwrite.",
            path.display()
        );
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let config = Config::default();
    std::fs::write(path, config.to_toml()?)?;
    Ok(config)
}

/// One line per section, echoed after `init`.
fn describe(config: &Config) -> Vec<String> {
    let limits = &config.limits;
    vec![
        format!(
            "limits: {} photos per user, {} MB per photo, {}px max side, {} ms render budget",
            limits.max_photos,
            limits.max_file_size_mb,
            limits.max_image_dimension,
            limits.render_timeout_ms
        ),
        format!("render: {}", config.render.to_render_config()),
        format!(
            "output: {} ({}_YYYYMMDD_HHMMSS.pdf)",
            config.output_dir().display(),
            config.output.file_prefix
        ),
        format!(
            "logging: {} ({})",
            config.logging.level, config.logging.format
        ),
    ]
}
