//! Interactive mode: guided experience for bare `folio` invocation.
//!
//! When `folio` is invoked with no subcommand on a TTY, photos are collected
//! into a session queue through a menu and rendered with the same code path
//! as `folio render`.

pub mod render;
pub mod theme;

use console::Style;
use dialoguer::Select;
use folio_core::{Config, FolioService};

use crate::cli::render::LOCAL_USER;

/// Convert a dialoguer result into `Ok(Some(value))` on success, `Ok(None)` on
/// interrupt (Ctrl+C / terminal disconnect), and `Err` for other I/O failures.
fn handle_interrupt<T>(result: dialoguer::Result<T>) -> anyhow::Result<Option<T>> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(dialoguer::Error::IO(e)) if e.kind() == std::io::ErrorKind::Interrupted => Ok(None),
        Err(e) => Err(e.into()),
    }
}

const MENU_ITEMS: &[&str] = &[
    "Add photos",
    "Create PDF",
    "Clear queued photos",
    "Show settings",
    "Exit",
];

/// Entry point for interactive mode.
pub async fn run(config: &Config) -> anyhow::Result<()> {
    theme::print_banner();

    let theme = theme::folio_theme();
    let service = FolioService::new(config);

    loop {
        let status = service.status(LOCAL_USER);
        let dim = Style::new().for_stderr().dim();
        eprintln!(
            "  {}",
            dim.apply_to(format!(
                "{}/{} photo(s) queued",
                status.count, status.max_photos
            ))
        );

        let selection = Select::with_theme(&theme)
            .with_prompt("What would you like to do?")
            .items(MENU_ITEMS)
            .default(if status.count == 0 { 0 } else { 1 })
            .interact_opt()?;

        match selection {
            Some(0) => render::add_photos(&service).await?,
            Some(1) => render::guided_render(config, &service).await?,
            Some(2) => {
                service.clear_photos(LOCAL_USER);
                let green = Style::new().for_stderr().green();
                eprintln!("  {}", green.apply_to("Queue cleared."));
            }
            Some(3) => show_config(config)?,
            Some(4) | None => break,
            _ => unreachable!(),
        }
    }

    Ok(())
}

/// Print a summary of the loaded settings, optionally followed by the full TOML.
fn show_config(config: &Config) -> anyhow::Result<()> {
    let theme = theme::folio_theme();
    let dim = Style::new().for_stderr().dim();
    let cyan = Style::new().for_stderr().cyan();
    let label = Style::new().for_stderr().bold();

    loop {
        eprintln!();
        eprintln!("  {}", cyan.apply_to("Current configuration:"));
        eprintln!();

        let config_path = Config::default_path();
        let path_note = if config_path.exists() {
            "(exists)"
        } else {
            "(using defaults)"
        };

        eprintln!(
            "    {:<20} {} {}",
            label.apply_to("Config file:"),
            config_path.display(),
            dim.apply_to(path_note)
        );
        eprintln!(
            "    {:<20} {} photos, {} MB each",
            label.apply_to("Queue limits:"),
            config.limits.max_photos,
            config.limits.max_file_size_mb
        );
        eprintln!(
            "    {:<20} {}px",
            label.apply_to("Max dimension:"),
            config.limits.max_image_dimension
        );
        eprintln!(
            "    {:<20} {}",
            label.apply_to("Render defaults:"),
            config.render.to_render_config()
        );
        eprintln!(
            "    {:<20} {}",
            label.apply_to("Output dir:"),
            config.output_dir().display()
        );
        eprintln!(
            "    {:<20} {}",
            label.apply_to("Log level:"),
            config.logging.level
        );
        eprintln!();

        let items = &["View full config (TOML)", "Show config file path", "Back"];
        let selection = Select::with_theme(&theme)
            .with_prompt("Configuration")
            .items(items)
            .default(0)
            .interact_opt()?;

        match selection {
            Some(0) => match config.to_toml() {
                Ok(toml) => {
                    eprintln!();
                    eprintln!("{}", dim.apply_to("─".repeat(50)));
                    eprintln!("{toml}");
                    eprintln!("{}", dim.apply_to("─".repeat(50)));
                    eprintln!();
                }
                Err(e) => {
                    let err = Style::new().for_stderr().red();
                    eprintln!("  {} Failed to serialize config: {e}", err.apply_to("✗"));
                    eprintln!();
                }
            },
            Some(1) => {
                eprintln!();
                eprintln!("  {}", config_path.display());
                eprintln!();
            }
            Some(2) | None => break,
            _ => unreachable!(),
        }
    }

    Ok(())
}
