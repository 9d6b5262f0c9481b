//! Image-to-page rendering pipeline.
//!
//! Stages, applied to each queued image in order:
//! - **decode**: detect the format from content and decode to a raster
//! - **enhance**: optional sharpen / brightness / contrast filter
//! - **geometry**: fit into the margin-reduced content box, center on the page
//! - **encode**: normalize to RGB, resample at print density, re-encode as JPEG
//! - **document**: append one PDF page per image
//! - **renderer**: orchestrates the stages and collects per-image outcomes

pub mod decode;
pub mod document;
pub mod encode;
pub mod enhance;
pub mod geometry;
pub mod renderer;

// Re-exports for convenient access
pub use decode::{DecodedImage, ImageDecoder};
pub use document::PdfBuilder;
pub use encode::EncodedJpeg;
pub use enhance::{BuiltinEnhancer, Enhancer};
pub use geometry::{PageSize, Placement};
pub use renderer::{DocumentRenderer, PageOutcome, PagePlacement, RenderedDocument};
