//! Page geometry: paper sizes, the margin-reduced content box, and fitting an
//! image into it.
//!
//! All lengths are millimetres with a top-left origin unless noted.

use serde::Serialize;

use crate::types::{Orientation, PageFormat};

/// Uniform margin on every side of the page.
pub const MARGIN_MM: f64 = 10.0;

/// Pixels per millimetre of rendered size (300 DPI print target vs. 72 DPI
/// baseline).
pub const DPI_FACTOR: f64 = 3.779;

/// PDF user-space points per millimetre.
pub const POINTS_PER_MM: f64 = 72.0 / 25.4;

/// Full page dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageSize {
    pub width_mm: f64,
    pub height_mm: f64,
}

impl PageSize {
    /// Look up the page size for a format and orientation.
    pub fn new(format: PageFormat, orientation: Orientation) -> Self {
        let (short, long) = match format {
            PageFormat::A4 => (210.0, 297.0),
            PageFormat::A3 => (297.0, 420.0),
            PageFormat::Letter => (216.0, 279.0),
        };
        let (width_mm, height_mm) = match orientation {
            Orientation::Portrait => (short, long),
            Orientation::Landscape => (long, short),
        };
        Self {
            width_mm,
            height_mm,
        }
    }

    /// Width and height left after subtracting the margin on both sides.
    pub fn content_box(&self) -> (f64, f64) {
        (
            self.width_mm - 2.0 * MARGIN_MM,
            self.height_mm - 2.0 * MARGIN_MM,
        )
    }

    /// Inscribe an image of `width`×`height` pixels into the content box and
    /// center it on the full page.
    ///
    /// The result keeps the image's aspect ratio and touches the content box
    /// on at least one axis.
    pub fn fit(&self, width: u32, height: u32) -> Placement {
        let (content_w, content_h) = self.content_box();
        let image_ratio = f64::from(width) / f64::from(height);
        let box_ratio = content_w / content_h;

        let (width_mm, height_mm) = if image_ratio > box_ratio {
            (content_w, content_w / image_ratio)
        } else {
            (content_h * image_ratio, content_h)
        };

        Placement {
            x_mm: (self.width_mm - width_mm) / 2.0,
            y_mm: (self.height_mm - height_mm) / 2.0,
            width_mm,
            height_mm,
        }
    }

    /// `[0 0 w h]` media box in PDF points.
    pub fn media_box_pt(&self) -> [f32; 4] {
        [
            0.0,
            0.0,
            (self.width_mm * POINTS_PER_MM) as f32,
            (self.height_mm * POINTS_PER_MM) as f32,
        ]
    }
}

/// Where an image lands on its page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Placement {
    /// Distance from the left page edge
    pub x_mm: f64,
    /// Distance from the top page edge
    pub y_mm: f64,
    /// Rendered width
    pub width_mm: f64,
    /// Rendered height
    pub height_mm: f64,
}

impl Placement {
    /// Pixel dimensions of the embedded raster at print density.
    ///
    /// Truncates toward zero, but never below one pixel per axis.
    pub fn pixel_size(&self) -> (u32, u32) {
        let px = |mm: f64| ((mm * DPI_FACTOR) as u32).max(1);
        (px(self.width_mm), px(self.height_mm))
    }

    /// `[w 0 0 h x y]` image transform in PDF points, bottom-left origin.
    pub fn transform_pt(&self, page: &PageSize) -> [f32; 6] {
        let bottom_mm = page.height_mm - self.y_mm - self.height_mm;
        [
            (self.width_mm * POINTS_PER_MM) as f32,
            0.0,
            0.0,
            (self.height_mm * POINTS_PER_MM) as f32,
            (self.x_mm * POINTS_PER_MM) as f32,
            (bottom_mm * POINTS_PER_MM) as f32,
        ]
    }
}
