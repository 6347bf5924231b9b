//! Submissions domain - the lifecycle and moderation core
//!
//! A submission is created pending, receives exactly one moderation
//! decision (approve or reject), and is terminal afterwards. Every
//! transition runs as a single conditional update guarded on the pending
//! state, with its side-effect intents enqueued in the same transaction.

pub mod actions;
pub mod heuristics;
pub mod models;

pub use models::submission::{
    ModeratorSnapshot, NewSubmission, Submission, SubmissionState, ValidatedUser,
};
