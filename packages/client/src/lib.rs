//! Client library for the theme portal.
//!
//! Wraps the portal's REST API and carries the client-side state the
//! submission UI is built on: the four-step capture wizard, the
//! notification cache and feed reducer, and the source-link resolver that
//! turns a GitHub or raw URL into transportable theme content.
//!
//! The wizard and feed reducer are pure state machines. They never perform
//! I/O themselves; they hand back commands for the host shell to run and
//! consume the outcomes as events, which keeps every UI rule unit-testable.
//!
//! # Example
//!
//! ```rust,ignore
//! use portal_client::{HttpSourceFetcher, PortalClient, SubmissionWizard, WizardCommand, WizardEvent};
//!
//! let client = PortalClient::new("https://portal.example").with_token("session-token");
//! let fetcher = HttpSourceFetcher::new();
//!
//! let mut wizard = SubmissionWizard::new();
//! wizard.apply(WizardEvent::TitleChanged("Midnight Glass".into()));
//! // ... walk the remaining steps; the final `Next` yields a submit command.
//! if let Some(WizardCommand::Submit(form)) = wizard.apply(WizardEvent::Next) {
//!     let created = client.submit_theme(&fetcher, form).await?;
//!     wizard.apply(WizardEvent::SubmitSucceeded(created.id));
//! }
//! ```

pub mod api;
pub mod contributors;
pub mod error;
pub mod notifications;
pub mod source;
pub mod types;
pub mod wizard;

pub use api::PortalClient;
pub use contributors::split_contributor_ids;
pub use error::{ClientError, Result};
pub use notifications::{Clock, FeedAction, FeedState, NotificationCache, SystemClock, DEFAULT_TTL};
pub use source::{
    is_raw_html, parse_github_url, resolve_source_content, GithubSource, HttpSourceFetcher,
    SourceFetcher,
};
pub use types::{
    CreatedSubmission, ModeratorSnapshot, Notification, NotificationKind, RejectRequest, Standing,
    SubmissionDraft, SubmissionRecord, SubmissionState, ThemeRecord, ValidateUsersResponse,
    ValidatedUser, ValidatedUserEntry,
};
pub use wizard::{
    is_image_url, SubmissionForm, SubmissionWizard, WizardCommand, WizardEvent, WizardFields,
    WizardPhase, WizardStep,
};
