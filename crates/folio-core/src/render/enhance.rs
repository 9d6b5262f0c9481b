//! Per-image enhancement filters.
//!
//! The renderer talks to filters through the [`Enhancer`] trait so a caller
//! can plug in its own implementation. [`BuiltinEnhancer`] provides the
//! standard sharpen, brightness and contrast adjustments.

use image::{DynamicImage, GenericImageView, Rgba, RgbaImage};

use crate::error::EnhanceError;
use crate::types::Enhancement;

/// Multiplier applied to every color channel by [`Enhancement::Brightness`].
pub const BRIGHTNESS_FACTOR: f32 = 1.2;

/// Contrast multiplier around mean luminance for [`Enhancement::Contrast`].
pub const CONTRAST_FACTOR: f32 = 1.1;

/// 3×3 sharpening kernel, `[-2 -2 -2; -2 32 -2; -2 -2 -2] / 16`.
pub const SHARPEN_KERNEL: [f32; 9] = [
    -0.125, -0.125, -0.125, //
    -0.125, 2.0, -0.125, //
    -0.125, -0.125, -0.125,
];

/// A pluggable image enhancement capability.
///
/// Implementations must not mutate the input; on error the renderer keeps
/// using it unmodified.
pub trait Enhancer: Send + Sync {
    fn apply(
        &self,
        image: &DynamicImage,
        enhancement: Enhancement,
    ) -> Result<DynamicImage, EnhanceError>;
}

/// Fixed-parameter filters.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinEnhancer;

impl Enhancer for BuiltinEnhancer {
    fn apply(
        &self,
        image: &DynamicImage,
        enhancement: Enhancement,
    ) -> Result<DynamicImage, EnhanceError> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(EnhanceError {
                filter: enhancement.to_string(),
                message: "image has no pixels".to_string(),
            });
        }

        Ok(match enhancement {
            Enhancement::None => image.clone(),
            Enhancement::Sharpen => DynamicImage::ImageRgba8(sharpen(&image.to_rgba8())),
            Enhancement::Brightness => {
                DynamicImage::ImageRgba8(brighten(image.to_rgba8(), BRIGHTNESS_FACTOR))
            }
            Enhancement::Contrast => {
                DynamicImage::ImageRgba8(contrast(image.to_rgba8(), CONTRAST_FACTOR))
            }
        })
    }
}

fn clamp_channel(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// Convolve color channels with [`SHARPEN_KERNEL`].
///
/// The one-pixel border has no full neighbourhood and is copied unchanged.
fn sharpen(source: &RgbaImage) -> RgbaImage {
    let (width, height) = source.dimensions();
    let mut out = source.clone();
    if width < 3 || height < 3 {
        return out;
    }

    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let mut acc = [0.0f32; 3];
            for (i, weight) in SHARPEN_KERNEL.iter().enumerate() {
                let sx = x + (i as u32 % 3) - 1;
                let sy = y + (i as u32 / 3) - 1;
                let Rgba(px) = source.get_pixel(sx, sy);
                for (sum, value) in acc.iter_mut().zip(px) {
                    *sum += f32::from(*value) * weight;
                }
            }
            let Rgba(dst) = out.get_pixel_mut(x, y);
            for (channel, value) in dst.iter_mut().zip(acc) {
                *channel = clamp_channel(value);
            }
        }
    }
    out
}

/// Scale color channels by `factor`, leaving alpha untouched.
fn brighten(mut pixels: RgbaImage, factor: f32) -> RgbaImage {
    for Rgba([r, g, b, _]) in pixels.pixels_mut() {
        for channel in [r, g, b] {
            *channel = clamp_channel(f32::from(*channel) * factor);
        }
    }
    pixels
}

/// Push color channels away from the image's mean luminance by `factor`.
fn contrast(mut pixels: RgbaImage, factor: f32) -> RgbaImage {
    let count = u64::from(pixels.width()) * u64::from(pixels.height());
    let luma_sum: u64 = pixels
        .pixels()
        .map(|Rgba([r, g, b, _])| {
            (u64::from(*r) * 299 + u64::from(*g) * 587 + u64::from(*b) * 114) / 1000
        })
        .sum();
    let mean = (luma_sum as f32 / count as f32).round();

    for Rgba([r, g, b, _]) in pixels.pixels_mut() {
        for channel in [r, g, b] {
            *channel = clamp_channel(mean + (f32::from(*channel) - mean) * factor);
        }
    }
    pixels
}
