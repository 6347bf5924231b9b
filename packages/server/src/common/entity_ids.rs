//! Typed ID definitions for all domain entities.
//!
//! This module defines type aliases for each domain entity, providing
//! compile-time type safety for ID usage throughout the application.
//!
//! # Example
//!
//! ```rust
//! use portal_core::common::{SubmissionId, UserId};
//!
//! // These are incompatible types - compiler prevents mixing them up
//! let user_id: UserId = UserId::new();
//! let submission_id: SubmissionId = SubmissionId::new();
//!
//! // This would be a compile error:
//! // let wrong: SubmissionId = user_id;
//! ```

// Re-export the core Id type
pub use super::id::Id;

// ============================================================================
// Entity marker types
// ============================================================================

/// Marker type for User entities.
pub struct User;

/// Marker type for Submission entities (themes under review).
pub struct Submission;

/// Marker type for Notification entities.
pub struct Notification;

/// Marker type for outbox delivery intents.
pub struct OutboxEntry;

// ============================================================================
// Type aliases - the primary API
// ============================================================================

/// Typed ID for User entities.
pub type UserId = Id<User>;

/// Typed ID for Submission entities.
pub type SubmissionId = Id<Submission>;

/// Typed ID for Notification entities.
pub type NotificationId = Id<Notification>;

/// Typed ID for outbox delivery intents.
pub type OutboxEntryId = Id<OutboxEntry>;
