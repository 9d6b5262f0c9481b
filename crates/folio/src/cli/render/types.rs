//! CLI enum types for the render command: page format, orientation, quality,
//! enhancement.

use clap::ValueEnum;
use folio_core::{Enhancement, Orientation, PageFormat, Quality};

/// Page size.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum PageFormatArg {
    /// 210 x 297 mm
    A4,
    /// 297 x 420 mm
    A3,
    /// 216 x 279 mm
    Letter,
}

impl From<PageFormatArg> for PageFormat {
    fn from(arg: PageFormatArg) -> Self {
        match arg {
            PageFormatArg::A4 => PageFormat::A4,
            PageFormatArg::A3 => PageFormat::A3,
            PageFormatArg::Letter => PageFormat::Letter,
        }
    }
}

/// Page orientation.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OrientationArg {
    Portrait,
    Landscape,
}

impl From<OrientationArg> for Orientation {
    fn from(arg: OrientationArg) -> Self {
        match arg {
            OrientationArg::Portrait => Orientation::Portrait,
            OrientationArg::Landscape => Orientation::Landscape,
        }
    }
}

/// Output quality preset.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum QualityArg {
    /// Lanczos resampling, JPEG quality 95
    High,
    /// Bilinear resampling, JPEG quality 75 (smaller files)
    Standard,
}

impl From<QualityArg> for Quality {
    fn from(arg: QualityArg) -> Self {
        match arg {
            QualityArg::High => Quality::High,
            QualityArg::Standard => Quality::Standard,
        }
    }
}

/// Per-image enhancement filter.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum EnhanceArg {
    None,
    Sharpen,
    /// Brighten by 20%
    Brightness,
    /// Raise contrast by 10%
    Contrast,
}

impl From<EnhanceArg> for Enhancement {
    fn from(arg: EnhanceArg) -> Self {
        match arg {
            EnhanceArg::None => Enhancement::None,
            EnhanceArg::Sharpen => Enhancement::Sharpen,
            EnhanceArg::Brightness => Enhancement::Brightness,
            EnhanceArg::Contrast => Enhancement::Contrast,
        }
    }
}
