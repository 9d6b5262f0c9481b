//! Sub-configuration structs with their defaults.

use serde::{Deserialize, Serialize};

use crate::types::{Enhancement, Orientation, PageFormat, Quality, RenderConfig};

/// Queue and render limits that protect against problematic inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum photos queued per user
    pub max_photos: usize,

    /// Maximum size of a single photo in megabytes
    pub max_file_size_mb: u64,

    /// Maximum decoded image dimension (width or height)
    pub max_image_dimension: u32,

    /// Wall-clock budget for one render call in milliseconds
    pub render_timeout_ms: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_photos: 50,
            max_file_size_mb: 20,
            max_image_dimension: 12000,
            render_timeout_ms: 120_000,
        }
    }
}

impl LimitsConfig {
    /// Maximum size of a single photo in bytes.
    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_mb * 1024 * 1024
    }
}

/// Default render selection, used when the caller leaves a choice unset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderDefaults {
    /// Page format: "a4", "a3" or "letter"
    pub page_format: PageFormat,

    /// Orientation: "portrait" or "landscape"
    pub orientation: Orientation,

    /// Quality: "high" or "standard"
    pub quality: Quality,

    /// Enhancement: "none", "sharpen", "brightness" or "contrast"
    pub enhancement: Enhancement,
}

impl RenderDefaults {
    /// The defaults as a complete render selection.
    pub fn to_render_config(&self) -> RenderConfig {
        RenderConfig {
            page_format: self.page_format,
            orientation: self.orientation,
            quality: self.quality,
            enhancement: self.enhancement,
        }
    }
}

/// Where rendered documents are written by the CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory for rendered documents (supports `~`)
    pub directory: String,

    /// File name prefix; the render timestamp and `.pdf` are appended
    pub file_prefix: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: ".".to_string(),
            file_prefix: "photos_to_pdf".to_string(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
