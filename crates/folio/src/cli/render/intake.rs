//! Feeding discovered files into the photo queue.

use folio_core::{DiscoveredFile, FolioService, QueueError, UserId};
use std::path::PathBuf;

/// What happened to each file offered to the queue.
#[derive(Debug, Default)]
pub struct IntakeReport {
    /// Files accepted, in queue order
    pub accepted: Vec<PathBuf>,
    /// Files refused, with the reason
    pub rejected: Vec<(PathBuf, QueueError)>,
    /// Files that could not be read
    pub unreadable: Vec<(PathBuf, std::io::Error)>,
}

impl IntakeReport {
    pub fn is_empty(&self) -> bool {
        self.accepted.is_empty()
    }
}

/// Read each file and add it to `user`'s queue, in order.
///
/// The file's on-disk size is passed as the declared size, so oversized files
/// are refused without being read. Once the queue is full the remaining files
/// are reported as rejected.
pub async fn queue_files(
    service: &FolioService,
    user: UserId,
    files: Vec<DiscoveredFile>,
) -> IntakeReport {
    let mut report = IntakeReport::default();
    let max_bytes = service.queue().max_file_size();

    for file in files {
        if !service.status(user).has_room() {
            report.rejected.push((
                file.path,
                QueueError::CapacityExceeded {
                    max: service.queue().max_photos(),
                },
            ));
            continue;
        }
        if file.size > max_bytes {
            tracing::warn!("Skipping {:?}: larger than {} bytes", file.path, max_bytes);
            report.rejected.push((
                file.path,
                QueueError::FileTooLarge {
                    size_bytes: file.size,
                    max_bytes,
                },
            ));
            continue;
        }

        let bytes = match tokio::fs::read(&file.path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!("Cannot read {:?}: {}", file.path, e);
                report.unreadable.push((file.path, e));
                continue;
            }
        };

        match service.add_photo(user, bytes, Some(file.size)) {
            Ok(outcome) => {
                tracing::debug!("Queued {:?} ({} total)", file.path, outcome.count);
                report.accepted.push(file.path);
            }
            Err(e) => {
                tracing::warn!("Skipping {:?}: {}", file.path, e);
                report.rejected.push((file.path, e));
            }
        }
    }

    report
}
