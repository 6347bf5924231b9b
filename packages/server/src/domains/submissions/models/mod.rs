pub mod submission;

pub use submission::{ModeratorSnapshot, NewSubmission, Submission, SubmissionState, ValidatedUser};
