//! Single-slot, latest-wins handoff between the worker and the overlay.
//!
//! Only the newest published value is ever retained, so a slow consumer sees
//! either nothing-new or the single most recent complete analysis, never a
//! backlog. Both ends are non-blocking: the lock is held only for the slot
//! swap itself.

use std::sync::Mutex;

/// A mailbox holding at most one value, overwritten on publish
#[derive(Debug, Default)]
pub struct LatestOnlyChannel<T> {
    slot: Mutex<Option<T>>,
}

impl<T> LatestOnlyChannel<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    /// Store `value`, discarding any unconsumed previous value
    pub fn publish(&self, value: T) {
        let mut slot = self.slot.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        *slot = Some(value);
    }

    /// Take the held value, leaving the slot empty; `None` means no update
    pub fn poll(&self) -> Option<T> {
        let mut slot = self.slot.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        slot.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_poll_empty_returns_none() {
        let channel: LatestOnlyChannel<Vec<String>> = LatestOnlyChannel::new();
        assert_eq!(channel.poll(), None);
    }

    #[test]
    fn test_only_newest_survives() {
        let channel = LatestOnlyChannel::new();
        for i in 0..10 {
            channel.publish(i);
        }
        assert_eq!(channel.poll(), Some(9));
        assert_eq!(channel.poll(), None);
    }

    #[test]
    fn test_publish_after_drain() {
        let channel = LatestOnlyChannel::new();
        channel.publish(1);
        assert_eq!(channel.poll(), Some(1));
        channel.publish(2);
        assert_eq!(channel.poll(), Some(2));
    }

    #[test]
    fn test_cross_thread_latest_wins() {
        let channel = Arc::new(LatestOnlyChannel::new());
        let producer = Arc::clone(&channel);
        let handle = thread::spawn(move || {
            for i in 0..1000 {
                producer.publish(i);
            }
        });
        handle.join().unwrap();
        assert_eq!(channel.poll(), Some(999));
    }
}
