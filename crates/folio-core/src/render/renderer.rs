//! Render orchestration: queued payloads in, one PDF out.

use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

use crate::config::LimitsConfig;
use crate::error::{RenderError, RenderResult, SkipReason};
use crate::types::{Enhancement, RenderConfig};

use super::decode::{format_to_string, ImageDecoder};
use super::document::PdfBuilder;
use super::encode::{normalize_rgb, resample_and_encode, EncodedJpeg};
use super::enhance::{BuiltinEnhancer, Enhancer};
use super::geometry::{PageSize, Placement};

/// Where one source image ended up in the document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PagePlacement {
    /// Position of the source image in the input sequence
    pub source_index: usize,
    /// Source image dimensions in pixels
    pub source_size: (u32, u32),
    /// Placement on the page, in millimetres
    pub placement: Placement,
    /// Dimensions of the embedded raster in pixels
    pub pixel_size: (u32, u32),
}

/// Per-image result, in input order.
#[derive(Debug, Clone, PartialEq)]
pub enum PageOutcome {
    Rendered(PagePlacement),
    Skipped { index: usize, reason: SkipReason },
}

/// A rendered PDF together with what happened to each input image.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    /// The serialized PDF
    pub bytes: Vec<u8>,
    /// Size shared by every page
    pub page_size: PageSize,
    /// One entry per input image, in input order
    pub outcomes: Vec<PageOutcome>,
}

impl RenderedDocument {
    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.pages().count()
    }

    /// Placements of the rendered pages, in page order.
    pub fn pages(&self) -> impl Iterator<Item = &PagePlacement> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            PageOutcome::Rendered(page) => Some(page),
            PageOutcome::Skipped { .. } => None,
        })
    }

    /// Images left out of the document, with the reason.
    pub fn skipped(&self) -> impl Iterator<Item = (usize, &SkipReason)> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            PageOutcome::Skipped { index, reason } => Some((*index, reason)),
            PageOutcome::Rendered(_) => None,
        })
    }
}

/// Turns a sequence of encoded images into a paginated PDF.
///
/// Rendering is synchronous and CPU-bound; async callers should run it on a
/// blocking thread.
#[derive(Clone)]
pub struct DocumentRenderer {
    decoder: ImageDecoder,
    enhancer: Arc<dyn Enhancer>,
}

impl DocumentRenderer {
    /// Create a renderer with the built-in enhancement filters.
    pub fn new(limits: &LimitsConfig) -> Self {
        Self {
            decoder: ImageDecoder::new(limits.max_image_dimension),
            enhancer: Arc::new(BuiltinEnhancer),
        }
    }

    /// Replace the enhancement implementation.
    pub fn with_enhancer(mut self, enhancer: Arc<dyn Enhancer>) -> Self {
        self.enhancer = enhancer;
        self
    }

    /// Render `images` in order, one page per image that survives decoding.
    ///
    /// Undecodable images are skipped and reported in the outcomes. A document
    /// with zero pages is still returned; only empty input is an error.
    pub fn render<B: AsRef<[u8]>>(
        &self,
        images: &[B],
        config: &RenderConfig,
    ) -> RenderResult<RenderedDocument> {
        if images.is_empty() {
            return Err(RenderError::EmptyInput);
        }

        let start = Instant::now();
        let page_size = PageSize::new(config.page_format, config.orientation);
        let mut pdf = PdfBuilder::new();
        let mut outcomes = Vec::with_capacity(images.len());

        for (index, bytes) in images.iter().enumerate() {
            match self.prepare_page(index, bytes.as_ref(), config, &page_size) {
                Ok((page, jpeg)) => {
                    pdf.add_image_page(&page_size, &page.placement, &jpeg)?;
                    outcomes.push(PageOutcome::Rendered(page));
                }
                Err(reason) => {
                    tracing::warn!("Skipping image {}: {}", index, reason);
                    outcomes.push(PageOutcome::Skipped { index, reason });
                }
            }
        }

        let rendered = pdf.page_count();
        let bytes = pdf.finish()?;
        tracing::info!(
            "Rendered {}/{} image(s) as {} in {:?} ({} bytes)",
            rendered,
            images.len(),
            config,
            start.elapsed(),
            bytes.len()
        );

        Ok(RenderedDocument {
            bytes,
            page_size,
            outcomes,
        })
    }

    /// Decode, enhance, normalize, fit and encode a single image.
    fn prepare_page(
        &self,
        index: usize,
        bytes: &[u8],
        config: &RenderConfig,
        page_size: &PageSize,
    ) -> Result<(PagePlacement, EncodedJpeg), SkipReason> {
        let decode_start = Instant::now();
        let decoded = self.decoder.decode(bytes)?;
        tracing::trace!(
            "  Decode #{}: {} {}x{} in {:?}",
            index,
            format_to_string(decoded.format),
            decoded.width,
            decoded.height,
            decode_start.elapsed()
        );

        let image = match config.enhancement {
            Enhancement::None => decoded.image,
            enhancement => match self.enhancer.apply(&decoded.image, enhancement) {
                Ok(enhanced) => enhanced,
                Err(e) => {
                    tracing::warn!("Image {}: {}; using original", index, e);
                    decoded.image
                }
            },
        };

        let rgb = normalize_rgb(image);
        let placement = page_size.fit(rgb.width(), rgb.height());
        let (pixel_w, pixel_h) = placement.pixel_size();

        let encode_start = Instant::now();
        let jpeg = resample_and_encode(&rgb, pixel_w, pixel_h, config.quality)?;
        tracing::trace!(
            "  Encode #{}: {}x{} -> {} bytes in {:?}",
            index,
            pixel_w,
            pixel_h,
            jpeg.data.len(),
            encode_start.elapsed()
        );

        Ok((
            PagePlacement {
                source_index: index,
                source_size: (decoded.width, decoded.height),
                placement,
                pixel_size: (pixel_w, pixel_h),
            },
            jpeg,
        ))
    }
}

impl Default for DocumentRenderer {
    fn default() -> Self {
        Self::new(&LimitsConfig::default())
    }
}
