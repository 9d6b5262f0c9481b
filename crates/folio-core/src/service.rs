//! The boundary a transport talks to: admission, render requests, delivery
//! confirmation and status.
//!
//! The service owns no transport state. A caller (chat bot, CLI, HTTP handler)
//! adds photos as they arrive, asks for a render with a complete
//! [`RenderConfig`], hands the resulting [`DocumentArtifact`] to the user, and
//! then calls [`FolioService::confirm_delivery`] so the delivered photos are
//! dropped from the queue.

use bytes::Bytes;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::error::{QueueError, RenderError, Result, SkipReason};
use crate::queue::PhotoQueue;
use crate::render::{DocumentRenderer, RenderedDocument};
use crate::types::{QueueStatus, RenderConfig, UserId};

/// Result of an accepted photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddOutcome {
    /// Photos now queued for the user
    pub count: usize,
}

/// A rendered document ready to hand to the user.
#[derive(Debug, Clone)]
pub struct DocumentArtifact {
    /// Suggested file name, `<prefix>_YYYYMMDD_HHMMSS.pdf`
    pub file_name: String,
    /// The PDF
    pub bytes: Vec<u8>,
    /// Images that made it onto a page
    pub pages_rendered: usize,
    /// Images in the snapshot that was rendered
    pub images_queued: usize,
    /// Images that were left out, with the reason
    pub skipped: Vec<(usize, SkipReason)>,
    /// Selection the document was rendered with
    pub config: RenderConfig,
    /// Queue sequence number of the last rendered photo
    pub delivered_through: u64,
}

/// Per-user photo queue plus renderer, with the admission and delivery rules.
#[derive(Clone)]
pub struct FolioService {
    queue: Arc<PhotoQueue>,
    renderer: Arc<DocumentRenderer>,
    render_timeout: Duration,
    file_prefix: String,
    max_file_size_mb: u64,
}

impl FolioService {
    /// Create a service with a fresh queue and the built-in renderer.
    pub fn new(config: &Config) -> Self {
        Self::with_parts(
            Arc::new(PhotoQueue::new(&config.limits)),
            Arc::new(DocumentRenderer::new(&config.limits)),
            config,
        )
    }

    /// Create a service around an existing queue and renderer.
    pub fn with_parts(
        queue: Arc<PhotoQueue>,
        renderer: Arc<DocumentRenderer>,
        config: &Config,
    ) -> Self {
        Self {
            queue,
            renderer,
            render_timeout: Duration::from_millis(config.limits.render_timeout_ms),
            file_prefix: config.output.file_prefix.clone(),
            max_file_size_mb: config.limits.max_file_size_mb,
        }
    }

    /// The underlying queue.
    pub fn queue(&self) -> &Arc<PhotoQueue> {
        &self.queue
    }

    /// Admit a photo for `user`.
    ///
    /// A full queue is reported before the size is looked at. `declared_size`
    /// is the size the transport announced before download, when known; the
    /// payload's real length is checked as well.
    pub fn add_photo(
        &self,
        user: UserId,
        photo: impl Into<Bytes>,
        declared_size: Option<u64>,
    ) -> std::result::Result<AddOutcome, QueueError> {
        let max_photos = self.queue.max_photos();
        if self.queue.count(user) >= max_photos {
            tracing::debug!("User {} hit the photo limit ({})", user, max_photos);
            return Err(QueueError::CapacityExceeded { max: max_photos });
        }

        let max_bytes = self.queue.max_file_size();
        if let Some(size) = declared_size.filter(|size| *size > max_bytes) {
            return Err(QueueError::FileTooLarge {
                size_bytes: size,
                max_bytes,
            });
        }

        let count = self.queue.add(user, photo)?;
        tracing::debug!("User {} queued photo #{}", user, count);
        Ok(AddOutcome { count })
    }

    /// Render the user's current queue with `config`.
    ///
    /// The queue is snapshotted when the call starts and is never modified
    /// here; call [`confirm_delivery`](Self::confirm_delivery) once the
    /// artifact reached the user.
    pub async fn request_render(
        &self,
        user: UserId,
        config: RenderConfig,
    ) -> Result<DocumentArtifact> {
        let snapshot = self.queue.snapshot(user);
        let Some(through) = snapshot.through else {
            return Err(RenderError::EmptyInput.into());
        };
        let images_queued = snapshot.len();
        tracing::info!(
            "Rendering {} photo(s) for user {} ({})",
            images_queued,
            user,
            config
        );

        let renderer = self.renderer.clone();
        let task = tokio::task::spawn_blocking(move || renderer.render(&snapshot.photos, &config));
        let document = match tokio::time::timeout(self.render_timeout, task).await {
            Ok(Ok(result)) => result?,
            Ok(Err(e)) => return Err(RenderError::Task(e.to_string()).into()),
            Err(_) => {
                tracing::warn!("Render for user {} exceeded {:?}", user, self.render_timeout);
                return Err(RenderError::Timeout {
                    timeout_ms: self.render_timeout.as_millis() as u64,
                }
                .into());
            }
        };

        if document.page_count() == 0 {
            tracing::warn!(
                "No valid images for user {}; keeping {} queued photo(s)",
                user,
                images_queued
            );
            return Err(RenderError::NoValidImages {
                queued: images_queued,
            }
            .into());
        }

        Ok(self.artifact(document, images_queued, through, config))
    }

    /// Drop the photos that went into `artifact` from the user's queue.
    ///
    /// Only photos that were in the render snapshot are removed. Photos added
    /// later stay queued, even across a `clear_photos`. Confirming twice is a
    /// no-op.
    pub fn confirm_delivery(&self, user: UserId, artifact: &DocumentArtifact) {
        let removed = self.queue.drain_through(user, artifact.delivered_through);
        tracing::debug!(
            "Delivered {} for user {}; dropped {}, {} photo(s) still queued",
            artifact.file_name,
            user,
            removed,
            self.queue.count(user)
        );
    }

    /// Remove everything queued for the user.
    pub fn clear_photos(&self, user: UserId) {
        self.queue.clear(user);
    }

    /// Current queue size and limits for the user.
    pub fn status(&self, user: UserId) -> QueueStatus {
        QueueStatus {
            count: self.queue.count(user),
            max_photos: self.queue.max_photos(),
            max_file_size_mb: self.max_file_size_mb,
        }
    }

    fn artifact(
        &self,
        document: RenderedDocument,
        images_queued: usize,
        delivered_through: u64,
        config: RenderConfig,
    ) -> DocumentArtifact {
        let skipped = document
            .skipped()
            .map(|(index, reason)| (index, reason.clone()))
            .collect();
        DocumentArtifact {
            file_name: timestamped_file_name(&self.file_prefix, chrono::Local::now()),
            pages_rendered: document.page_count(),
            images_queued,
            skipped,
            config,
            delivered_through,
            bytes: document.bytes,
        }
    }
}

/// `<prefix>_YYYYMMDD_HHMMSS.pdf`
pub fn timestamped_file_name<Tz>(prefix: &str, at: chrono::DateTime<Tz>) -> String
where
    Tz: chrono::TimeZone,
    Tz::Offset: std::fmt::Display,
{
    format!("{}_{}.pdf", prefix, at.format("%Y%m%d_%H%M%S"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LimitsConfig;
    use crate::error::{EnhanceError, FolioError};
    use crate::render::Enhancer;
    use crate::types::Enhancement;
    use chrono::TimeZone;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    const USER: UserId = UserId(7);

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([1, 2, 3])));
        let mut buffer = Cursor::new(Vec::new());
        img.write_to(&mut buffer, ImageFormat::Png).unwrap();
        buffer.into_inner()
    }

    fn service() -> FolioService {
        FolioService::new(&Config::default())
    }

    fn quick() -> RenderConfig {
        RenderConfig::builder()
            .quality(crate::types::Quality::Standard)
            .build()
    }

    #[test]
    fn test_timestamped_file_name() {
        let at = chrono::Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        assert_eq!(
            timestamped_file_name("photos_to_pdf", at),
            "photos_to_pdf_20240309_140507.pdf"
        );
    }

    #[test]
    fn test_add_photo_counts_and_status() {
        let service = service();
        assert_eq!(service.add_photo(USER, png(4, 4), None).unwrap().count, 1);
        assert_eq!(service.add_photo(USER, png(4, 4), Some(10)).unwrap().count, 2);

        let status = service.status(USER);
        assert_eq!(status.count, 2);
        assert_eq!(status.max_photos, 50);
        assert_eq!(status.max_file_size_mb, 20);
    }

    #[test]
    fn test_declared_size_over_limit_is_rejected() {
        let service = service();
        let err = service
            .add_photo(USER, vec![0u8; 8], Some(21 * 1024 * 1024))
            .unwrap_err();
        assert!(matches!(err, QueueError::FileTooLarge { .. }));
        assert_eq!(service.status(USER).count, 0);
    }

    #[test]
    fn test_full_queue_reports_capacity_before_size() {
        let mut config = Config::default();
        config.limits = LimitsConfig {
            max_photos: 2,
            ..LimitsConfig::default()
        };
        let service = FolioService::new(&config);
        service.add_photo(USER, vec![1u8], None).unwrap();
        service.add_photo(USER, vec![2u8], None).unwrap();

        let err = service
            .add_photo(USER, vec![3u8], Some(u64::MAX))
            .unwrap_err();
        assert_eq!(err, QueueError::CapacityExceeded { max: 2 });
        assert_eq!(service.status(USER).count, 2);
    }

    #[tokio::test]
    async fn test_render_empty_queue() {
        let err = service().request_render(USER, quick()).await.unwrap_err();
        assert!(matches!(err, FolioError::Render(RenderError::EmptyInput)));
    }

    #[tokio::test]
    async fn test_render_then_confirm_clears_queue() {
        let service = service();
        service.add_photo(USER, png(20, 10), None).unwrap();
        service.add_photo(USER, png(10, 20), None).unwrap();

        let artifact = service.request_render(USER, quick()).await.unwrap();
        assert_eq!(artifact.pages_rendered, 2);
        assert_eq!(artifact.images_queued, 2);
        assert!(artifact.file_name.starts_with("photos_to_pdf_"));
        assert!(artifact.file_name.ends_with(".pdf"));
        assert!(artifact.bytes.starts_with(b"%PDF"));

        // Rendering alone does not touch the queue.
        assert_eq!(service.status(USER).count, 2);
        service.confirm_delivery(USER, &artifact);
        assert_eq!(service.status(USER).count, 0);
    }

    #[tokio::test]
    async fn test_photos_added_after_snapshot_survive_delivery() {
        let service = service();
        service.add_photo(USER, png(8, 8), None).unwrap();
        let artifact = service.request_render(USER, quick()).await.unwrap();

        service.add_photo(USER, png(8, 8), None).unwrap();
        service.confirm_delivery(USER, &artifact);
        assert_eq!(service.status(USER).count, 1);
    }

    #[tokio::test]
    async fn test_confirm_after_clear_keeps_new_photos() {
        let service = service();
        service.add_photo(USER, png(8, 8), None).unwrap();
        let artifact = service.request_render(USER, quick()).await.unwrap();

        service.clear_photos(USER);
        service.add_photo(USER, b"added after clear".to_vec(), None).unwrap();
        service.confirm_delivery(USER, &artifact);

        assert_eq!(service.status(USER).count, 1);
        assert_eq!(
            service.queue().snapshot(USER).photos[0].as_ref(),
            b"added after clear"
        );
    }

    #[tokio::test]
    async fn test_overlapping_renders_confirm_only_their_photos() {
        let service = service();
        service.add_photo(USER, png(8, 8), None).unwrap();
        let first = service.request_render(USER, quick()).await.unwrap();
        service.add_photo(USER, png(8, 8), None).unwrap();
        let second = service.request_render(USER, quick()).await.unwrap();
        service.add_photo(USER, png(8, 8), None).unwrap();

        service.confirm_delivery(USER, &first);
        assert_eq!(service.status(USER).count, 2);
        service.confirm_delivery(USER, &second);
        assert_eq!(service.status(USER).count, 1);
        // Repeating a confirmation is harmless.
        service.confirm_delivery(USER, &second);
        assert_eq!(service.status(USER).count, 1);
    }

    struct SlowEnhancer;

    impl Enhancer for SlowEnhancer {
        fn apply(
            &self,
            image: &DynamicImage,
            _enhancement: Enhancement,
        ) -> std::result::Result<DynamicImage, EnhanceError> {
            std::thread::sleep(Duration::from_millis(300));
            Ok(image.clone())
        }
    }

    struct PanickingEnhancer;

    impl Enhancer for PanickingEnhancer {
        fn apply(
            &self,
            _image: &DynamicImage,
            _enhancement: Enhancement,
        ) -> std::result::Result<DynamicImage, EnhanceError> {
            panic!("filter blew up");
        }
    }

    fn service_with_enhancer(enhancer: Arc<dyn Enhancer>, timeout_ms: u64) -> FolioService {
        let mut config = Config::default();
        config.limits.render_timeout_ms = timeout_ms;
        let renderer = DocumentRenderer::new(&config.limits).with_enhancer(enhancer);
        FolioService::with_parts(
            Arc::new(PhotoQueue::new(&config.limits)),
            Arc::new(renderer),
            &config,
        )
    }

    fn sharpened() -> RenderConfig {
        RenderConfig::builder()
            .quality(crate::types::Quality::Standard)
            .enhancement(Enhancement::Sharpen)
            .build()
    }

    #[tokio::test]
    async fn test_render_timeout_keeps_queue() {
        let service = service_with_enhancer(Arc::new(SlowEnhancer), 1);
        service.add_photo(USER, png(8, 8), None).unwrap();
        service.add_photo(USER, png(8, 8), None).unwrap();

        let err = service.request_render(USER, sharpened()).await.unwrap_err();
        assert!(matches!(
            err,
            FolioError::Render(RenderError::Timeout { timeout_ms: 1 })
        ));
        assert_eq!(service.status(USER).count, 2);
    }

    #[tokio::test]
    async fn test_render_task_panic_is_reported() {
        let service = service_with_enhancer(Arc::new(PanickingEnhancer), 60_000);
        service.add_photo(USER, png(8, 8), None).unwrap();

        let err = service.request_render(USER, sharpened()).await.unwrap_err();
        assert!(matches!(err, FolioError::Render(RenderError::Task(_))));
        assert_eq!(service.status(USER).count, 1);
    }

    #[tokio::test]
    async fn test_all_invalid_keeps_queue() {
        let service = service();
        service.add_photo(USER, b"junk".to_vec(), None).unwrap();
        service.add_photo(USER, b"more junk".to_vec(), None).unwrap();

        let err = service.request_render(USER, quick()).await.unwrap_err();
        assert!(matches!(
            err,
            FolioError::Render(RenderError::NoValidImages { queued: 2 })
        ));
        assert_eq!(service.status(USER).count, 2);
    }

    #[tokio::test]
    async fn test_partial_success_reports_skips() {
        let service = service();
        service.add_photo(USER, b"corrupt".to_vec(), None).unwrap();
        service.add_photo(USER, png(16, 9), None).unwrap();

        let artifact = service.request_render(USER, quick()).await.unwrap();
        assert_eq!(artifact.pages_rendered, 1);
        assert_eq!(artifact.images_queued, 2);
        assert_eq!(artifact.skipped.len(), 1);
        assert_eq!(artifact.skipped[0].0, 0);
    }

    #[tokio::test]
    async fn test_clear_photos() {
        let service = service();
        service.add_photo(USER, png(4, 4), None).unwrap();
        service.clear_photos(USER);
        assert_eq!(service.status(USER).count, 0);
        service.clear_photos(USER);
        assert_eq!(service.status(USER).count, 0);
    }
}
