//! Notification outbox infrastructure.
//!
//! Moderation decisions must never be conditional on notification delivery,
//! yet delivery should survive crashes and transient database failures. The
//! outbox squares that: the action that performs a state transition enqueues
//! delivery intents on the SAME connection (and therefore in the same
//! transaction), and the [`OutboxDispatcher`] drains them afterwards with
//! retries.
//!
//! # Architecture
//!
//! ```text
//! Action (one transaction)
//!     ├─► state transition (guarded UPDATE)
//!     └─► OutboxEntry::enqueue(..)        intent rows
//!
//! OutboxDispatcher (background task)
//!     ├─► claim batch (FOR UPDATE SKIP LOCKED)
//!     ├─► append notification row per intent
//!     └─► mark delivered / failed (backoff ▸ retry ▸ dead letter)
//! ```
//!
//! Delivery is at-least-once: a dispatcher crash between the notification
//! append and `mark_delivered` re-delivers on the next claim.

mod dispatcher;
mod entry;

pub use dispatcher::{OutboxDispatcher, OutboxDispatcherConfig};
pub use entry::{NewOutboxEntry, OutboxEntry, OutboxStatus};
