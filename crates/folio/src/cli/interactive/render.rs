//! Guided photo intake and PDF creation.
//!
//! Mirrors the selection order of a render request: page format, then
//! orientation, then quality, then enhancement. Cancelling any step returns
//! to the main menu with the queue untouched.

use console::Style;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Select};
use folio_core::{
    Config, Enhancement, FileDiscovery, FolioError, FolioService, Orientation, PageFormat, Quality,
    RenderConfig, RenderError,
};
use std::path::PathBuf;

use super::theme::folio_theme;
use crate::cli::render::{queue_files, render_to_dir, RenderSummary, LOCAL_USER};

/// Prompt for image paths until the user enters an empty line.
pub async fn add_photos(service: &FolioService) -> anyhow::Result<()> {
    let theme = folio_theme();
    let dim = Style::new().for_stderr().dim();
    let warn = Style::new().for_stderr().yellow();

    loop {
        let status = service.status(LOCAL_USER);
        if !status.has_room() {
            eprintln!(
                "  {}",
                warn.apply_to(format!(
                    "Queue is full ({} photos). Create the PDF or clear the queue.",
                    status.max_photos
                ))
            );
            return Ok(());
        }

        let Some(raw_path) = super::handle_interrupt(
            Input::<String>::with_theme(&theme)
                .with_prompt("Path to image or folder (empty to finish)")
                .allow_empty(true)
                .interact_text(),
        )?
        else {
            return Ok(());
        };
        if raw_path.trim().is_empty() {
            return Ok(());
        }

        let path = PathBuf::from(shellexpand::tilde(raw_path.trim()).into_owned());
        if !path.exists() {
            eprintln!(
                "  {}",
                warn.apply_to(format!("Path not found: {}", path.display()))
            );
            continue;
        }

        let files = FileDiscovery.discover(&path);
        if files.is_empty() {
            eprintln!(
                "  {}",
                warn.apply_to("No supported images found at that path.")
            );
            continue;
        }

        let report = queue_files(service, LOCAL_USER, files).await;
        for (path, reason) in &report.rejected {
            eprintln!(
                "  {}",
                warn.apply_to(format!("Skipped {}: {reason}", path.display()))
            );
        }
        for (path, err) in &report.unreadable {
            eprintln!(
                "  {}",
                warn.apply_to(format!("Could not read {}: {err}", path.display()))
            );
        }

        let status = service.status(LOCAL_USER);
        eprintln!(
            "  {}",
            dim.apply_to(format!(
                "Added {} photo(s), {}/{} queued",
                report.accepted.len(),
                status.count,
                status.max_photos
            ))
        );
    }
}

/// Walk the user through the render selections and write the PDF.
pub async fn guided_render(config: &Config, service: &FolioService) -> anyhow::Result<()> {
    let theme = folio_theme();
    let warn = Style::new().for_stderr().yellow();

    let queued = service.status(LOCAL_USER).count;
    if queued == 0 {
        eprintln!("  {}", warn.apply_to("No photos queued. Add some first."));
        return Ok(());
    }

    let Some(render_config) = select_render_config(&theme, &config.render.to_render_config())?
    else {
        return Ok(());
    };

    let Some(raw_dir) = super::handle_interrupt(
        Input::<String>::with_theme(&theme)
            .with_prompt("Output directory")
            .default(config.output_dir().display().to_string())
            .interact_text(),
    )?
    else {
        return Ok(());
    };
    let output_dir = PathBuf::from(shellexpand::tilde(&raw_dir).into_owned());

    eprintln!();
    let bold = Style::new().for_stderr().bold();
    let dim = Style::new().for_stderr().dim();
    eprintln!(
        "  {}",
        bold.apply_to(format!("Ready to render {queued} photo(s)"))
    );
    eprintln!("  {}", dim.apply_to(render_config.to_string()));
    eprintln!();

    let confirm = Confirm::with_theme(&theme)
        .with_prompt("Create PDF?")
        .default(true)
        .interact_opt()?;
    if !matches!(confirm, Some(true)) {
        return Ok(());
    }

    match render_to_dir(service, LOCAL_USER, render_config, &output_dir).await {
        Ok((path, artifact)) => {
            let summary = RenderSummary::new(path, &artifact, &[]);
            for skipped in &summary.skipped {
                eprintln!(
                    "  {}",
                    warn.apply_to(format!(
                        "Photo #{} skipped: {}",
                        skipped.index + 1,
                        skipped.reason
                    ))
                );
            }
            let green = Style::new().for_stderr().green();
            eprintln!(
                "  {} {} ({} page(s))",
                green.apply_to("✓"),
                summary.file.display(),
                summary.pages_rendered
            );
        }
        Err(e) => {
            let err = Style::new().for_stderr().red();
            eprintln!("  {} {e}", err.apply_to("✗"));
            if matches!(
                e.downcast_ref::<FolioError>(),
                Some(FolioError::Render(RenderError::NoValidImages { .. }))
            ) {
                eprintln!(
                    "  {}",
                    dim.apply_to("The queue was kept; clear it and add different photos.")
                );
            }
        }
    }

    Ok(())
}

/// Format → orientation → quality → enhancement. `None` if any step is cancelled.
fn select_render_config(
    theme: &ColorfulTheme,
    defaults: &RenderConfig,
) -> anyhow::Result<Option<RenderConfig>> {
    let Some(page_format) = select_option(
        theme,
        "Page format",
        PageFormat::ALL,
        defaults.page_format,
        format_label,
    )?
    else {
        return Ok(None);
    };
    let Some(orientation) = select_option(
        theme,
        "Orientation",
        Orientation::ALL,
        defaults.orientation,
        orientation_label,
    )?
    else {
        return Ok(None);
    };
    let Some(quality) = select_option(
        theme,
        "Quality",
        Quality::ALL,
        defaults.quality,
        quality_label,
    )?
    else {
        return Ok(None);
    };
    let Some(enhancement) = select_option(
        theme,
        "Enhancement",
        Enhancement::ALL,
        defaults.enhancement,
        enhancement_label,
    )?
    else {
        return Ok(None);
    };

    Ok(Some(
        RenderConfig::builder()
            .page_format(page_format)
            .orientation(orientation)
            .quality(quality)
            .enhancement(enhancement)
            .build(),
    ))
}

fn select_option<T: Copy + PartialEq>(
    theme: &ColorfulTheme,
    prompt: &str,
    options: &[T],
    current: T,
    label: fn(T) -> &'static str,
) -> anyhow::Result<Option<T>> {
    let items: Vec<&str> = options.iter().map(|o| label(*o)).collect();
    let default = options.iter().position(|o| *o == current).unwrap_or(0);

    let choice = Select::with_theme(theme)
        .with_prompt(prompt)
        .items(&items)
        .default(default)
        .interact_opt()?;

    Ok(choice.and_then(|i| options.get(i).copied()))
}

fn format_label(format: PageFormat) -> &'static str {
    match format {
        PageFormat::A4 => "A4 (210 × 297 mm)",
        PageFormat::A3 => "A3 (297 × 420 mm)",
        PageFormat::Letter => "Letter (216 × 279 mm)",
    }
}

fn orientation_label(orientation: Orientation) -> &'static str {
    match orientation {
        Orientation::Portrait => "Portrait",
        Orientation::Landscape => "Landscape",
    }
}

fn quality_label(quality: Quality) -> &'static str {
    match quality {
        Quality::High => "High (smoother resampling, JPEG 95)",
        Quality::Standard => "Standard (smaller file, JPEG 75)",
    }
}

fn enhancement_label(enhancement: Enhancement) -> &'static str {
    match enhancement {
        Enhancement::None => "None",
        Enhancement::Sharpen => "Sharpen",
        Enhancement::Brightness => "Brightness",
        Enhancement::Contrast => "Contrast",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_option_has_a_distinct_label() {
        let formats: Vec<_> = PageFormat::ALL.iter().map(|f| format_label(*f)).collect();
        assert_eq!(formats.len(), 3);
        assert!(formats[0].starts_with("A4"));

        let mut enhancements: Vec<_> = Enhancement::ALL
            .iter()
            .map(|e| enhancement_label(*e))
            .collect();
        enhancements.dedup();
        assert_eq!(enhancements.len(), Enhancement::ALL.len());
    }
}
