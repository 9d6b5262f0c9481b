//! Core data types shared by the queue, renderer, and service.
//!
//! [`RenderConfig`] is the whole per-request rendering selection. It is built
//! once by the caller (directly or through [`RenderConfigBuilder`]) and never
//! mutated by the core.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Opaque identifier of the user owning a photo queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned when parsing one of the render option enums from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptionError {
    kind: &'static str,
    value: String,
}

impl fmt::Display for ParseOptionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} '{}'", self.kind, self.value)
    }
}

impl std::error::Error for ParseOptionError {}

/// Generates `Display`, `FromStr`, `ALL` and `as_str` for a fieldless option enum.
macro_rules! render_option {
    ($name:ident, $kind:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            /// Every variant, in menu order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Lowercase name used in config files and on the command line.
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseOptionError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $($text => Ok($name::$variant),)+
                    _ => Err(ParseOptionError {
                        kind: $kind,
                        value: s.to_string(),
                    }),
                }
            }
        }
    };
}

/// Paper size of every page in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageFormat {
    #[default]
    A4,
    A3,
    Letter,
}

render_option!(PageFormat, "page format", { A4 => "a4", A3 => "a3", Letter => "letter" });

/// Page orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

render_option!(Orientation, "orientation", { Portrait => "portrait", Landscape => "landscape" });

/// Output quality: drives the resampling filter and JPEG quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    #[default]
    High,
    Standard,
}

render_option!(Quality, "quality", { High => "high", Standard => "standard" });

/// Optional per-image filter applied before layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Enhancement {
    #[default]
    None,
    Sharpen,
    Brightness,
    Contrast,
}

render_option!(Enhancement, "enhancement", {
    None => "none",
    Sharpen => "sharpen",
    Brightness => "brightness",
    Contrast => "contrast",
});

/// Complete rendering selection for one render call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub page_format: PageFormat,
    pub orientation: Orientation,
    pub quality: Quality,
    pub enhancement: Enhancement,
}

impl RenderConfig {
    /// Start a step-wise selection (format, orientation, quality, enhancement).
    pub fn builder() -> RenderConfigBuilder {
        RenderConfigBuilder::default()
    }
}

impl fmt::Display for RenderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} quality={} enhancement={}",
            self.page_format, self.orientation, self.quality, self.enhancement
        )
    }
}

/// Accumulates a [`RenderConfig`] one choice at a time.
///
/// Unset fields fall back to the supplied defaults in [`build_with`], or to the
/// type defaults in [`build`].
///
/// [`build_with`]: RenderConfigBuilder::build_with
/// [`build`]: RenderConfigBuilder::build
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderConfigBuilder {
    page_format: Option<PageFormat>,
    orientation: Option<Orientation>,
    quality: Option<Quality>,
    enhancement: Option<Enhancement>,
}

impl RenderConfigBuilder {
    pub fn page_format(mut self, page_format: PageFormat) -> Self {
        self.page_format = Some(page_format);
        self
    }

    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = Some(orientation);
        self
    }

    pub fn quality(mut self, quality: Quality) -> Self {
        self.quality = Some(quality);
        self
    }

    pub fn enhancement(mut self, enhancement: Enhancement) -> Self {
        self.enhancement = Some(enhancement);
        self
    }

    /// Finish, filling unset choices from `defaults`.
    pub fn build_with(self, defaults: &RenderConfig) -> RenderConfig {
        RenderConfig {
            page_format: self.page_format.unwrap_or(defaults.page_format),
            orientation: self.orientation.unwrap_or(defaults.orientation),
            quality: self.quality.unwrap_or(defaults.quality),
            enhancement: self.enhancement.unwrap_or(defaults.enhancement),
        }
    }

    /// Finish, filling unset choices from the type defaults.
    pub fn build(self) -> RenderConfig {
        self.build_with(&RenderConfig::default())
    }
}

/// Snapshot of a user's queue, as reported by a status request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueStatus {
    /// Photos currently queued for the user
    pub count: usize,
    /// Maximum photos allowed per user
    pub max_photos: usize,
    /// Maximum size of a single photo, in megabytes
    pub max_file_size_mb: u64,
}

impl QueueStatus {
    /// Whether another photo can still be added.
    pub fn has_room(&self) -> bool {
        self.count < self.max_photos
    }
}
