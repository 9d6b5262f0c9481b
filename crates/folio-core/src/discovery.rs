//! File discovery for collecting images from paths given on the command line.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extensions picked up when walking a directory.
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "webp", "gif", "bmp", "tif", "tiff",
];

/// Information about a discovered file.
#[derive(Debug, Clone)]
pub struct DiscoveredFile {
    /// Full path to the file
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
}

/// Discovers image files in directories.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileDiscovery;

impl FileDiscovery {
    /// Discover image files at a path.
    ///
    /// A file is returned as-is, whatever its extension: the renderer detects
    /// formats from content. A directory is walked recursively for files with
    /// a supported extension, sorted by path.
    pub fn discover(&self, path: &Path) -> Vec<DiscoveredFile> {
        if path.is_file() {
            return std::fs::metadata(path)
                .map(|meta| {
                    vec![DiscoveredFile {
                        path: path.to_path_buf(),
                        size: meta.len(),
                    }]
                })
                .unwrap_or_default();
        }

        let mut files: Vec<DiscoveredFile> = WalkDir::new(path)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|entry| entry.file_type().is_file() && Self::is_supported(entry.path()))
            .filter_map(|entry| {
                let size = entry.metadata().ok()?.len();
                Some(DiscoveredFile {
                    path: entry.into_path(),
                    size,
                })
            })
            .collect();

        // Sorted so page order is reproducible
        files.sort_by(|a, b| a.path.cmp(&b.path));
        files
    }

    /// Discover across several paths, keeping argument order.
    pub fn discover_all<P: AsRef<Path>>(&self, paths: &[P]) -> Vec<DiscoveredFile> {
        paths
            .iter()
            .flat_map(|path| self.discover(path.as_ref()))
            .collect()
    }

    /// Check if a file has a supported extension.
    fn is_supported(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                let ext_lower = ext.to_lowercase();
                SUPPORTED_EXTENSIONS.contains(&ext_lower.as_str())
            })
            .unwrap_or(false)
    }

    /// Get total size of all discovered files.
    pub fn total_size(files: &[DiscoveredFile]) -> u64 {
        files.iter().map(|f| f.size).sum()
    }
}
