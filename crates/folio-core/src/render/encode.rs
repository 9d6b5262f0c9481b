//! Resampling and JPEG re-encoding of page images.

use image::codecs::jpeg::JpegEncoder;
use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbImage};

use crate::error::SkipReason;
use crate::types::Quality;

/// JPEG quality for [`Quality::High`].
pub const JPEG_QUALITY_HIGH: u8 = 95;

/// JPEG quality for [`Quality::Standard`].
pub const JPEG_QUALITY_STANDARD: u8 = 75;

/// A baseline JPEG ready to be embedded as a DCT-encoded image.
#[derive(Debug, Clone)]
pub struct EncodedJpeg {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Resampling filter for a quality level.
pub fn filter_for(quality: Quality) -> FilterType {
    match quality {
        Quality::High => FilterType::Lanczos3,
        Quality::Standard => FilterType::Triangle,
    }
}

/// JPEG quality level for a quality setting.
pub fn jpeg_quality_for(quality: Quality) -> u8 {
    match quality {
        Quality::High => JPEG_QUALITY_HIGH,
        Quality::Standard => JPEG_QUALITY_STANDARD,
    }
}

/// Collapse any channel layout (alpha, greyscale, 16-bit, float) to 8-bit RGB.
///
/// Alpha is dropped, not composited.
pub fn normalize_rgb(image: DynamicImage) -> RgbImage {
    match image {
        DynamicImage::ImageRgb8(rgb) => rgb,
        other => other.to_rgb8(),
    }
}

/// Resample to exactly `width`×`height` and encode as JPEG.
pub fn resample_and_encode(
    image: &RgbImage,
    width: u32,
    height: u32,
    quality: Quality,
) -> Result<EncodedJpeg, SkipReason> {
    let resized = imageops::resize(image, width, height, filter_for(quality));

    let mut data = Vec::new();
    JpegEncoder::new_with_quality(&mut data, jpeg_quality_for(quality))
        .encode_image(&resized)
        .map_err(|e| SkipReason::Encode(e.to_string()))?;

    Ok(EncodedJpeg {
        data,
        width,
        height,
    })
}
