//! Notifications domain - append-only messages to users
//!
//! Notification rows are written exclusively by the outbox dispatcher; the
//! actions here cover the user-facing feed (list, mark-all-read) and the
//! admin announcement fan-out.

pub mod actions;
pub mod models;

pub use models::notification::{Notification, NotificationKind};
