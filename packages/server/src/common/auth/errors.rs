use thiserror::Error;

/// Authorization errors for the theme portal
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Authentication required")]
    AuthenticationRequired,

    #[error("Admin access required")]
    AdminRequired,

    #[error("Banned from submitting themes")]
    SubmissionsBanned,

    #[error("Invalid or expired token")]
    InvalidToken,
}
