//! Image decoding from in-memory payloads with content-based format detection.

use image::{DynamicImage, GenericImageView, ImageFormat};
use std::io::Cursor;

use crate::error::SkipReason;

/// Result of decoding a queued payload.
#[derive(Debug)]
pub struct DecodedImage {
    /// The decoded image data
    pub image: DynamicImage,
    /// Detected image format
    pub format: ImageFormat,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
}

/// Decodes payloads, rejecting images larger than a dimension limit.
#[derive(Debug, Clone, Copy)]
pub struct ImageDecoder {
    max_dimension: u32,
}

impl ImageDecoder {
    /// Create a decoder that rejects images wider or taller than `max_dimension`.
    pub fn new(max_dimension: u32) -> Self {
        Self { max_dimension }
    }

    /// Decode a payload. The format is guessed from its magic bytes, so
    /// payloads need no file name or declared type.
    pub fn decode(&self, bytes: &[u8]) -> Result<DecodedImage, SkipReason> {
        let reader = image::ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| SkipReason::Decode(format!("cannot detect image format: {e}")))?;
        let format = reader
            .format()
            .ok_or_else(|| SkipReason::Decode("unrecognized image format".to_string()))?;
        let image = reader
            .decode()
            .map_err(|e| SkipReason::Decode(e.to_string()))?;

        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(SkipReason::Decode(format!(
                "image has no pixels ({width}x{height})"
            )));
        }
        if width > self.max_dimension || height > self.max_dimension {
            return Err(SkipReason::TooLarge {
                width,
                height,
                max_dim: self.max_dimension,
            });
        }

        Ok(DecodedImage {
            image,
            format,
            width,
            height,
        })
    }
}

/// Lowercase name of a decoded format, for logs.
pub fn format_to_string(format: ImageFormat) -> &'static str {
    match format {
        ImageFormat::Jpeg => "jpeg",
        ImageFormat::Png => "png",
        ImageFormat::WebP => "webp",
        ImageFormat::Gif => "gif",
        ImageFormat::Tiff => "tiff",
        ImageFormat::Bmp => "bmp",
        _ => "other",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::new(width, height));
        let mut buffer = Cursor::new(Vec::new());
        img.write_to(&mut buffer, ImageFormat::Png).unwrap();
        buffer.into_inner()
    }

    #[test]
    fn test_format_to_string() {
        assert_eq!(format_to_string(ImageFormat::Jpeg), "jpeg");
        assert_eq!(format_to_string(ImageFormat::Png), "png");
        assert_eq!(format_to_string(ImageFormat::WebP), "webp");
    }

    #[test]
    fn test_decode_detects_format_from_content() {
        let decoded = ImageDecoder::new(1000).decode(&png_bytes(30, 20)).unwrap();
        assert_eq!(decoded.format, ImageFormat::Png);
        assert_eq!((decoded.width, decoded.height), (30, 20));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let err = ImageDecoder::new(1000)
            .decode(b"definitely not an image")
            .unwrap_err();
        assert!(matches!(err, SkipReason::Decode(_)));
    }

    #[test]
    fn test_decode_rejects_truncated_png() {
        let mut bytes = png_bytes(64, 64);
        bytes.truncate(40);
        let err = ImageDecoder::new(1000).decode(&bytes).unwrap_err();
        assert!(matches!(err, SkipReason::Decode(_)));
    }

    #[test]
    fn test_decode_enforces_dimension_limit() {
        let err = ImageDecoder::new(50).decode(&png_bytes(60, 10)).unwrap_err();
        assert_eq!(
            err,
            SkipReason::TooLarge {
                width: 60,
                height: 10,
                max_dim: 50
            }
        );
    }
}
