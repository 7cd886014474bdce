//! User-facing notifications (toasts).
//!
//! Engines report confirmations and failures through a [`Notifier`]. The
//! call is fire-and-forget: it never blocks and never fails.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use jm_games_core::Severity;
use serde::Serialize;

/// Oldest toasts are dropped past this many undisplayed toasts.
const MAX_PENDING_TOASTS: usize = 20;

/// Sink for user-visible notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str, severity: Severity);
}

/// A notification waiting to be shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub message: String,
    pub severity: Severity,
}

/// Queue of pending toasts, drained by the page renderer.
///
/// Cheaply cloneable; clones share the same queue.
#[derive(Debug, Clone, Default)]
pub struct ToastQueue {
    inner: Arc<Mutex<VecDeque<Toast>>>,
}

impl ToastQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return every pending toast, oldest first.
    #[must_use]
    pub fn drain(&self) -> Vec<Toast> {
        self.inner
            .lock()
            .map(|mut queue| queue.drain(..).collect())
            .unwrap_or_default()
    }

    /// Copy of the pending toasts without removing them.
    #[must_use]
    pub fn pending(&self) -> Vec<Toast> {
        self.inner
            .lock()
            .map(|queue| queue.iter().cloned().collect())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().map_or(0, |queue| queue.len())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Notifier for ToastQueue {
    fn notify(&self, message: &str, severity: Severity) {
        tracing::debug!(%severity, message, "Toast queued");
        if let Ok(mut queue) = self.inner.lock() {
            if queue.len() >= MAX_PENDING_TOASTS {
                queue.pop_front();
            }
            queue.push_back(Toast {
                message: message.to_string(),
                severity,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_drains_in_order() {
        let queue = ToastQueue::new();
        queue.notify("first", Severity::Success);
        queue.notify("second", Severity::Danger);

        let toasts = queue.drain();
        assert_eq!(toasts.len(), 2);
        assert_eq!(toasts[0].message, "first");
        assert_eq!(toasts[1].severity, Severity::Danger);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_clones_share_queue() {
        let queue = ToastQueue::new();
        let clone = queue.clone();
        clone.notify("shared", Severity::Info);
        assert_eq!(queue.pending().len(), 1);
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_queue_is_bounded() {
        let queue = ToastQueue::new();
        for i in 0..(MAX_PENDING_TOASTS + 5) {
            queue.notify(&format!("toast {i}"), Severity::Info);
        }
        let toasts = queue.drain();
        assert_eq!(toasts.len(), MAX_PENDING_TOASTS);
        assert_eq!(toasts[0].message, "toast 5");
    }
}
