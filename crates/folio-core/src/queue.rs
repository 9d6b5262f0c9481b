//! Per-user photo queue.
//!
//! Holds the raw encoded payloads each user has submitted, in submission
//! order, until they are rendered and delivered. Nothing here survives the
//! process.

use bytes::Bytes;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::config::LimitsConfig;
use crate::error::QueueError;
use crate::types::UserId;

/// A queued payload tagged with its admission order.
///
/// Sequence numbers come from one counter shared by all users and never
/// repeat, so a photo added after a `clear` can't be mistaken for an older one.
#[derive(Debug, Clone)]
struct QueuedPhoto {
    seq: u64,
    data: Bytes,
}

#[derive(Debug, Default)]
struct QueueState {
    next_seq: u64,
    users: HashMap<UserId, Vec<QueuedPhoto>>,
}

/// Point-in-time copy of one user's queue.
#[derive(Debug, Clone, Default)]
pub struct QueueSnapshot {
    /// Payloads in submission order
    pub photos: Vec<Bytes>,
    /// Sequence number of the last payload, `None` when empty
    pub through: Option<u64>,
}

impl QueueSnapshot {
    pub fn len(&self) -> usize {
        self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }
}

/// Process-wide mapping from user to their ordered photo payloads.
///
/// A single mutex guards the whole map. Every critical section is a short map
/// operation and is never held across an `.await`, so users only contend for
/// the duration of an append or a reference-counted clone, while operations
/// for the same user are fully serialized.
#[derive(Debug)]
pub struct PhotoQueue {
    max_photos: usize,
    max_file_size: u64,
    state: Mutex<QueueState>,
}

impl PhotoQueue {
    /// Create an empty queue enforcing the given limits.
    pub fn new(limits: &LimitsConfig) -> Self {
        Self {
            max_photos: limits.max_photos,
            max_file_size: limits.max_file_size_bytes(),
            state: Mutex::new(QueueState::default()),
        }
    }

    /// Append a payload to the user's queue and return the new count.
    ///
    /// The size and capacity checks run under the same lock as the append,
    /// so a rejected payload never touches the queue.
    pub fn add(&self, user: UserId, photo: impl Into<Bytes>) -> Result<usize, QueueError> {
        let data = photo.into();
        let size = data.len() as u64;
        if size > self.max_file_size {
            return Err(QueueError::FileTooLarge {
                size_bytes: size,
                max_bytes: self.max_file_size,
            });
        }

        let mut state = self.lock();
        if state.users.get(&user).map_or(0, Vec::len) >= self.max_photos {
            return Err(QueueError::CapacityExceeded {
                max: self.max_photos,
            });
        }

        let seq = state.next_seq;
        state.next_seq += 1;
        let photos = state.users.entry(user).or_default();
        photos.push(QueuedPhoto { seq, data });
        Ok(photos.len())
    }

    /// Remove the user's whole queue. No-op if nothing is queued.
    pub fn clear(&self, user: UserId) {
        self.lock().users.remove(&user);
    }

    /// Number of photos queued for the user.
    pub fn count(&self, user: UserId) -> usize {
        self.lock().users.get(&user).map_or(0, Vec::len)
    }

    /// Point-in-time copy of the user's queue, in submission order.
    ///
    /// Payloads are reference-counted, so this does not copy image data.
    pub fn snapshot(&self, user: UserId) -> QueueSnapshot {
        let state = self.lock();
        let Some(photos) = state.users.get(&user) else {
            return QueueSnapshot::default();
        };
        QueueSnapshot {
            photos: photos.iter().map(|p| p.data.clone()).collect(),
            through: photos.last().map(|p| p.seq),
        }
    }

    /// Remove the user's photos up to and including sequence number `through`.
    ///
    /// Used to drop exactly what a snapshot contained. Photos admitted after
    /// it stay queued, even if the queue was cleared and refilled in between.
    /// Returns how many photos were removed. The entry is removed once empty.
    pub fn drain_through(&self, user: UserId, through: u64) -> usize {
        let mut state = self.lock();
        let Some(photos) = state.users.get_mut(&user) else {
            return 0;
        };
        let before = photos.len();
        photos.retain(|p| p.seq > through);
        let removed = before - photos.len();
        if photos.is_empty() {
            state.users.remove(&user);
        }
        removed
    }

    /// Number of users with at least one queued photo.
    pub fn user_count(&self) -> usize {
        self.lock().users.values().filter(|p| !p.is_empty()).count()
    }

    /// Maximum photos per user.
    pub fn max_photos(&self) -> usize {
        self.max_photos
    }

    /// Maximum payload size in bytes.
    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    // A panic while holding the lock cannot leave a Vec half-pushed, so the
    // map is still consistent after poisoning.
    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for PhotoQueue {
    fn default() -> Self {
        Self::new(&LimitsConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE: UserId = UserId(1);
    const BOB: UserId = UserId(2);

    fn small_queue(max_photos: usize) -> PhotoQueue {
        PhotoQueue::new(&LimitsConfig {
            max_photos,
            max_file_size_mb: 1,
            ..LimitsConfig::default()
        })
    }

    #[test]
    fn test_add_returns_running_count() {
        let queue = PhotoQueue::default();
        assert_eq!(queue.add(ALICE, vec![1u8]).unwrap(), 1);
        assert_eq!(queue.add(ALICE, vec![2u8]).unwrap(), 2);
        assert_eq!(queue.add(BOB, vec![3u8]).unwrap(), 1);
        assert_eq!(queue.count(ALICE), 2);
        assert_eq!(queue.count(BOB), 1);
    }

    #[test]
    fn test_count_unknown_user_is_zero() {
        let queue = PhotoQueue::default();
        assert_eq!(queue.count(UserId(42)), 0);
    }

    #[test]
    fn test_snapshot_preserves_insertion_order() {
        let queue = PhotoQueue::default();
        for i in 0..5u8 {
            queue.add(ALICE, vec![i]).unwrap();
        }
        let snapshot = queue.snapshot(ALICE);
        let firsts: Vec<u8> = snapshot.photos.iter().map(|b| b[0]).collect();
        assert_eq!(firsts, vec![0, 1, 2, 3, 4]);
        assert_eq!(snapshot.through, Some(4));
    }

    #[test]
    fn test_capacity_exceeded_leaves_count_unchanged() {
        let queue = PhotoQueue::default();
        for i in 0..50 {
            assert_eq!(queue.add(ALICE, vec![0u8; 4]).unwrap(), i + 1);
        }
        let err = queue.add(ALICE, vec![0u8; 4]).unwrap_err();
        assert_eq!(err, QueueError::CapacityExceeded { max: 50 });
        assert_eq!(queue.count(ALICE), 50);
    }

    #[test]
    fn test_oversized_payload_is_never_stored() {
        let queue = small_queue(5);
        let too_big = vec![0u8; 1024 * 1024 + 1];
        let err = queue.add(ALICE, too_big).unwrap_err();
        assert!(matches!(err, QueueError::FileTooLarge { .. }));
        assert_eq!(queue.count(ALICE), 0);
        assert_eq!(queue.user_count(), 0);
    }

    #[test]
    fn test_clear_then_count_is_zero() {
        let queue = PhotoQueue::default();
        queue.clear(ALICE);
        assert_eq!(queue.count(ALICE), 0);

        queue.add(ALICE, vec![1u8]).unwrap();
        queue.add(BOB, vec![1u8]).unwrap();
        queue.clear(ALICE);
        assert_eq!(queue.count(ALICE), 0);
        assert_eq!(queue.count(BOB), 1);
    }

    #[test]
    fn test_drain_through_keeps_later_additions() {
        let queue = small_queue(10);
        queue.add(ALICE, vec![1u8]).unwrap();
        queue.add(ALICE, vec![2u8]).unwrap();
        let snapshot = queue.snapshot(ALICE);
        queue.add(ALICE, vec![3u8]).unwrap();

        assert_eq!(queue.drain_through(ALICE, snapshot.through.unwrap()), 2);
        let remaining = queue.snapshot(ALICE);
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining.photos[0][0], 3);
    }

    #[test]
    fn test_drain_through_spares_photos_added_after_clear() {
        let queue = small_queue(10);
        queue.add(ALICE, vec![1u8]).unwrap();
        let snapshot = queue.snapshot(ALICE);

        queue.clear(ALICE);
        queue.add(ALICE, vec![9u8]).unwrap();

        assert_eq!(queue.drain_through(ALICE, snapshot.through.unwrap()), 0);
        assert_eq!(queue.count(ALICE), 1);
        assert_eq!(queue.snapshot(ALICE).photos[0][0], 9);
    }

    #[test]
    fn test_overlapping_snapshots_drain_independently() {
        let queue = small_queue(10);
        queue.add(ALICE, vec![1u8]).unwrap();
        let first = queue.snapshot(ALICE);
        queue.add(ALICE, vec![2u8]).unwrap();
        let second = queue.snapshot(ALICE);
        queue.add(ALICE, vec![3u8]).unwrap();

        assert_eq!(queue.drain_through(ALICE, first.through.unwrap()), 1);
        assert_eq!(queue.drain_through(ALICE, second.through.unwrap()), 1);
        assert_eq!(queue.snapshot(ALICE).photos[0][0], 3);
    }

    #[test]
    fn test_sequence_numbers_are_shared_across_users() {
        let queue = small_queue(10);
        queue.add(ALICE, vec![1u8]).unwrap();
        queue.add(BOB, vec![1u8]).unwrap();
        let bob = queue.snapshot(BOB);

        assert_eq!(queue.drain_through(ALICE, bob.through.unwrap()), 1);
        assert_eq!(queue.count(BOB), 1);
    }

    #[test]
    fn test_drain_through_removes_empty_entry() {
        let queue = small_queue(10);
        queue.add(ALICE, vec![1u8]).unwrap();
        queue.drain_through(ALICE, u64::MAX);
        assert_eq!(queue.count(ALICE), 0);
        assert_eq!(queue.user_count(), 0);
        assert_eq!(queue.drain_through(BOB, u64::MAX), 0);
    }

    #[test]
    fn test_rejected_add_at_zero_capacity_leaves_no_entry() {
        let queue = small_queue(0);
        let err = queue.add(ALICE, vec![1u8]).unwrap_err();
        assert_eq!(err, QueueError::CapacityExceeded { max: 0 });
        assert_eq!(queue.user_count(), 0);
        assert!(queue.snapshot(ALICE).is_empty());
    }

    #[test]
    fn test_concurrent_adds_respect_capacity() {
        let queue = std::sync::Arc::new(small_queue(20));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let queue = queue.clone();
                std::thread::spawn(move || {
                    (0..10)
                        .filter(|_| queue.add(ALICE, vec![0u8]).is_ok())
                        .count()
                })
            })
            .collect();

        let accepted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(accepted, 20);
        assert_eq!(queue.count(ALICE), 20);
    }
}
