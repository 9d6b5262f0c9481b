//! The `folio render` command: queue files, render them, write the PDF.

mod deliver;
mod intake;
pub mod types;

pub use deliver::{render_to_dir, RenderSummary};
pub use intake::{queue_files, IntakeReport};
pub use types::{EnhanceArg, OrientationArg, PageFormatArg, QualityArg};

use clap::Args;
use folio_core::{Config, FileDiscovery, FolioService, RenderConfig, UserId};
use std::path::PathBuf;

/// Queue owner for documents rendered from the command line.
pub const LOCAL_USER: UserId = UserId(0);

/// Arguments for the `render` command.
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Image files or directories, in page order
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Directory to write the PDF into (defaults to output.directory from config)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Page format
    #[arg(short = 'f', long, value_enum)]
    pub page_format: Option<PageFormatArg>,

    /// Page orientation
    #[arg(long, value_enum)]
    pub orientation: Option<OrientationArg>,

    /// Output quality
    #[arg(short, long, value_enum)]
    pub quality: Option<QualityArg>,

    /// Enhancement filter applied to every image
    #[arg(short, long, value_enum)]
    pub enhance: Option<EnhanceArg>,

    /// Print a JSON summary to stdout
    #[arg(long)]
    pub json: bool,
}

impl RenderArgs {
    /// Merge the flags over the configured defaults.
    pub fn render_config(&self, defaults: &RenderConfig) -> RenderConfig {
        let mut builder = RenderConfig::builder();
        if let Some(format) = self.page_format {
            builder = builder.page_format(format.into());
        }
        if let Some(orientation) = self.orientation {
            builder = builder.orientation(orientation.into());
        }
        if let Some(quality) = self.quality {
            builder = builder.quality(quality.into());
        }
        if let Some(enhance) = self.enhance {
            builder = builder.enhancement(enhance.into());
        }
        builder.build_with(defaults)
    }
}

/// Execute the render command.
pub async fn execute(args: RenderArgs) -> anyhow::Result<()> {
    let config = Config::load()?;
    let service = FolioService::new(&config);

    let files = FileDiscovery.discover_all(&args.inputs);
    if files.is_empty() {
        anyhow::bail!(
            "No image files found in {:?}\n\n  Hint: pass image files or directories containing images.",
            args.inputs
        );
    }
    tracing::info!(
        "Found {} file(s) ({:.1} MB)",
        files.len(),
        FileDiscovery::total_size(&files) as f64 / 1_000_000.0
    );

    let report = queue_files(&service, LOCAL_USER, files).await;
    for (path, reason) in &report.rejected {
        tracing::warn!("Not queued {:?}: {}", path, reason);
    }
    for (path, err) in &report.unreadable {
        tracing::warn!("Could not read {:?}: {}", path, err);
    }
    if report.is_empty() {
        anyhow::bail!("None of the input files could be queued");
    }

    let render_config = args.render_config(&config.render.to_render_config());
    let output_dir = args.output_dir.clone().unwrap_or_else(|| config.output_dir());
    let (path, artifact) = render_to_dir(&service, LOCAL_USER, render_config, &output_dir).await?;

    let summary = RenderSummary::new(path, &artifact, &report.accepted);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        for skipped in &summary.skipped {
            let source = skipped
                .path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| format!("#{}", skipped.index));
            eprintln!("Skipped {}: {}", source, skipped.reason);
        }
        println!(
            "{} ({} of {} image(s), {})",
            summary.file.display(),
            summary.pages_rendered,
            summary.images_queued,
            render_config
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::{Enhancement, Orientation, PageFormat, Quality};

    fn args() -> RenderArgs {
        RenderArgs {
            inputs: vec![PathBuf::from("a.jpg")],
            output_dir: None,
            page_format: None,
            orientation: None,
            quality: None,
            enhance: None,
            json: false,
        }
    }

    #[test]
    fn test_render_config_uses_defaults_when_unset() {
        let defaults = RenderConfig {
            page_format: PageFormat::Letter,
            orientation: Orientation::Landscape,
            quality: Quality::Standard,
            enhancement: Enhancement::Sharpen,
        };
        assert_eq!(args().render_config(&defaults), defaults);
    }

    #[test]
    fn test_render_config_flags_override() {
        let args = RenderArgs {
            page_format: Some(PageFormatArg::A3),
            enhance: Some(EnhanceArg::Contrast),
            ..args()
        };
        let config = args.render_config(&RenderConfig::default());
        assert_eq!(config.page_format, PageFormat::A3);
        assert_eq!(config.orientation, Orientation::Portrait);
        assert_eq!(config.enhancement, Enhancement::Contrast);
    }
}
