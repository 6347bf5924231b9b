//! Client-side notification state.
//!
//! Two pieces: a TTL cache over fetched feeds, and a reducer for the
//! mark-all-read flow. The reducer renders reads optimistically through an
//! overlay while the request is in flight; the held list itself is only
//! rewritten once the server confirms, so a failure rolls back by simply
//! dropping the overlay.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::types::Notification;

/// How long a fetched feed stays fresh.
pub const DEFAULT_TTL: Duration = Duration::from_millis(30_000);

/// Injectable time source so expiry is testable.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Short-lived cache in front of the notifications endpoint. Freshness is
/// tracked explicitly: an empty feed fetched a moment ago is a hit, not a
/// miss. Only age or an explicit invalidation forces a refetch.
pub struct NotificationCache {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    cached: Option<(Instant, Vec<Notification>)>,
}

impl NotificationCache {
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            clock,
            cached: None,
        }
    }

    /// The cached feed, if it is still fresh.
    pub fn get(&self) -> Option<&[Notification]> {
        let (stored_at, items) = self.cached.as_ref()?;
        if self.clock.now().duration_since(*stored_at) < self.ttl {
            Some(items.as_slice())
        } else {
            None
        }
    }

    pub fn store(&mut self, items: Vec<Notification>) {
        self.cached = Some((self.clock.now(), items));
    }

    /// Drop the cached feed so the next read refetches.
    pub fn invalidate(&mut self) {
        self.cached = None;
    }
}

impl Default for NotificationCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

#[derive(Debug, Clone)]
pub enum FeedAction {
    /// A fresh list from the server replaces whatever is held.
    Loaded(Vec<Notification>),
    /// Mark-all-read request went out.
    MarkAllRequested,
    /// The server confirmed; commit the overlay.
    MarkAllConfirmed,
    /// The request failed; drop the overlay and restore the badge.
    MarkAllFailed,
}

/// Rendered notification feed with the optimistic mark-all overlay.
#[derive(Debug, Default)]
pub struct FeedState {
    notifications: Vec<Notification>,
    mark_all_in_flight: bool,
}

impl FeedState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, action: FeedAction) {
        match action {
            FeedAction::Loaded(items) => {
                self.notifications = items;
            }
            FeedAction::MarkAllRequested => {
                self.mark_all_in_flight = true;
            }
            FeedAction::MarkAllConfirmed => {
                self.mark_all_in_flight = false;
                for notification in &mut self.notifications {
                    notification.read = true;
                }
            }
            FeedAction::MarkAllFailed => {
                self.mark_all_in_flight = false;
            }
        }
    }

    /// Unread badge count. Zero while a mark-all request is in flight; the
    /// badge reappears only if that request fails.
    pub fn unread_count(&self) -> usize {
        if self.mark_all_in_flight {
            return 0;
        }
        self.notifications.iter().filter(|n| !n.read).count()
    }

    /// The feed as rendered, overlay applied.
    pub fn visible(&self) -> Vec<Notification> {
        if !self.mark_all_in_flight {
            return self.notifications.clone();
        }
        self.notifications
            .iter()
            .cloned()
            .map(|mut notification| {
                notification.read = true;
                notification
            })
            .collect()
    }

    pub fn mark_all_in_flight(&self) -> bool {
        self.mark_all_in_flight
    }
}
