//! Folio Core - per-user photo queue and image-to-PDF rendering.
//!
//! Photos are staged per user in a [`PhotoQueue`] and later rendered into a
//! single paginated PDF, one image per page:
//!
//! ```text
//! Queue snapshot → Decode → Enhance → RGB → Fit to page → Resample → JPEG → PDF page
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use folio_core::{Config, FolioService, RenderConfig, UserId};
//!
//! #[tokio::main]
//! async fn main() -> folio_core::Result<()> {
//!     let service = FolioService::new(&Config::load()?);
//!     let user = UserId(1);
//!
//!     service.add_photo(user, std::fs::read("page1.jpg")?, None)?;
//!     let artifact = service.request_render(user, RenderConfig::default()).await?;
//!     std::fs::write(&artifact.file_name, &artifact.bytes)?;
//!     service.confirm_delivery(user, &artifact);
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod config;
pub mod discovery;
pub mod error;
pub mod queue;
pub mod render;
pub mod service;
pub mod types;

// Re-exports for convenient access
pub use config::Config;
pub use discovery::{DiscoveredFile, FileDiscovery};
pub use error::{
    ConfigError, EnhanceError, FolioError, QueueError, RenderError, RenderResult, Result,
    SkipReason,
};
pub use queue::{PhotoQueue, QueueSnapshot};
pub use render::{DocumentRenderer, Enhancer, PageOutcome, RenderedDocument};
pub use service::{AddOutcome, DocumentArtifact, FolioService};
pub use types::{
    Enhancement, Orientation, PageFormat, Quality, QueueStatus, RenderConfig, RenderConfigBuilder,
    UserId,
};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
