//! Rendering the queue and writing the document to disk.

use folio_core::{DocumentArtifact, FolioService, RenderConfig, UserId};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Machine-readable result of a render, printed with `--json`.
#[derive(Debug, Serialize)]
pub struct RenderSummary {
    pub file: PathBuf,
    pub pages_rendered: usize,
    pub images_queued: usize,
    pub page_format: String,
    pub orientation: String,
    pub quality: String,
    pub enhancement: String,
    pub skipped: Vec<SkippedImage>,
}

/// An image that did not make it into the document.
#[derive(Debug, Serialize)]
pub struct SkippedImage {
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    pub reason: String,
}

impl RenderSummary {
    /// Build a summary, mapping skipped queue positions back to file paths.
    pub fn new(file: PathBuf, artifact: &DocumentArtifact, sources: &[PathBuf]) -> Self {
        Self {
            file,
            pages_rendered: artifact.pages_rendered,
            images_queued: artifact.images_queued,
            page_format: artifact.config.page_format.to_string(),
            orientation: artifact.config.orientation.to_string(),
            quality: artifact.config.quality.to_string(),
            enhancement: artifact.config.enhancement.to_string(),
            skipped: artifact
                .skipped
                .iter()
                .map(|(index, reason)| SkippedImage {
                    index: *index,
                    path: sources.get(*index).cloned(),
                    reason: reason.to_string(),
                })
                .collect(),
        }
    }
}

/// Render `user`'s queue, write the PDF into `output_dir`, and confirm
/// delivery so the rendered photos leave the queue.
///
/// If writing fails the queue is left as it was.
pub async fn render_to_dir(
    service: &FolioService,
    user: UserId,
    config: RenderConfig,
    output_dir: &Path,
) -> anyhow::Result<(PathBuf, DocumentArtifact)> {
    let artifact = service.request_render(user, config).await?;

    tokio::fs::create_dir_all(output_dir).await?;
    let path = output_dir.join(&artifact.file_name);
    tokio::fs::write(&path, &artifact.bytes).await?;
    tracing::info!(
        "Wrote {} page(s) to {:?} ({} bytes)",
        artifact.pages_rendered,
        path,
        artifact.bytes.len()
    );

    service.confirm_delivery(user, &artifact);
    Ok((path, artifact))
}
