//! Submission capture wizard.
//!
//! A pure state machine: events go in, internal state updates, and at most
//! one command comes out. The `apply` method is synchronous and does no I/O;
//! the host shell executes whatever a command describes (screenshot
//! generation, the final submit) and feeds the outcome back as an event.
//!
//! Four steps, walked linearly: title, description, preview image,
//! attribution & source. `Next` is gated by a per-step validator; a failed
//! gate surfaces a field error and leaves every entered value alone.

use uuid::Uuid;

use crate::contributors::split_contributor_ids;
use crate::types::SubmissionDraft;

/// Extensions accepted for a pasted preview-image URL.
pub const IMAGE_EXTENSIONS: [&str; 5] = [".png", ".gif", ".webp", ".jpg", ".jpeg"];

const INVALID_IMAGE_URL_ERROR: &str = "Please enter a valid image URL (PNG, GIF, WEBP, JPG)";
const SCREENSHOT_FAILED_ERROR: &str = "Failed to generate preview. Please try again.";

/// True when the URL ends in an accepted image extension.
pub fn is_image_url(url: &str) -> bool {
    let lowered = url.to_lowercase();
    IMAGE_EXTENSIONS.iter().any(|ext| lowered.ends_with(ext))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    Title,
    Description,
    PreviewImage,
    Attribution,
}

impl WizardStep {
    /// 1-based position shown in the progress rail.
    pub fn number(self) -> u8 {
        match self {
            WizardStep::Title => 1,
            WizardStep::Description => 2,
            WizardStep::PreviewImage => 3,
            WizardStep::Attribution => 4,
        }
    }

    fn forward(self) -> Option<WizardStep> {
        match self {
            WizardStep::Title => Some(WizardStep::Description),
            WizardStep::Description => Some(WizardStep::PreviewImage),
            WizardStep::PreviewImage => Some(WizardStep::Attribution),
            WizardStep::Attribution => None,
        }
    }

    fn backward(self) -> Option<WizardStep> {
        match self {
            WizardStep::Title => None,
            WizardStep::Description => Some(WizardStep::Title),
            WizardStep::PreviewImage => Some(WizardStep::Description),
            WizardStep::Attribution => Some(WizardStep::PreviewImage),
        }
    }
}

/// Everything the user has entered so far. Survives step changes, failed
/// validation, and a failed submit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WizardFields {
    pub title: String,
    pub description: String,
    /// Data URL from an upload or screenshot, or a pasted image URL.
    pub preview_image: Option<String>,
    pub source_link: String,
    /// Contributor ids as typed, split on submit.
    pub contributors: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WizardPhase {
    Editing(WizardStep),
    /// Final submit in flight; duplicate submits are ignored.
    Submitting,
    Submitted { id: Uuid },
    /// The user's standing bars submissions; every event is inert.
    Blocked,
}

#[derive(Debug, Clone)]
pub enum WizardEvent {
    TitleChanged(String),
    DescriptionChanged(String),
    /// Host read an uploaded file into a data URL.
    PreviewUploaded(String),
    /// User pasted an image URL; accepted only with a known extension.
    PreviewUrlEntered(String),
    /// User asked for a generated screenshot of their theme URL.
    ScreenshotRequested(String),
    ScreenshotReady(String),
    ScreenshotFailed,
    ContributorsChanged(String),
    SourceLinkChanged(String),
    Next,
    Back,
    SubmitSucceeded(Uuid),
    SubmitFailed(String),
}

/// I/O the host shell performs on the machine's behalf.
#[derive(Debug, Clone, PartialEq)]
pub enum WizardCommand {
    GenerateScreenshot { url: String },
    Submit(SubmissionForm),
}

/// The assembled form, ready for content resolution and submission.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionForm {
    pub title: String,
    pub description: String,
    pub preview_image: String,
    pub source_link: String,
    pub contributors: Vec<String>,
}

impl SubmissionForm {
    /// Pair the form with resolved content to build the create-submission body.
    pub fn into_draft(self, content: String) -> SubmissionDraft {
        SubmissionDraft {
            title: self.title,
            description: self.description,
            content,
            preview_image: self.preview_image,
            source_link: self.source_link,
            contributors: self.contributors,
        }
    }
}

pub struct SubmissionWizard {
    phase: WizardPhase,
    fields: WizardFields,
    field_error: Option<String>,
}

impl SubmissionWizard {
    /// Fresh wizard at the title step.
    pub fn new() -> Self {
        Self {
            phase: WizardPhase::Editing(WizardStep::Title),
            fields: WizardFields::default(),
            field_error: None,
        }
    }

    /// Wizard for a user banned from submitting. The server re-checks the
    /// ban on create regardless; this gate just keeps the form shut.
    pub fn blocked() -> Self {
        Self {
            phase: WizardPhase::Blocked,
            fields: WizardFields::default(),
            field_error: None,
        }
    }

    pub fn phase(&self) -> &WizardPhase {
        &self.phase
    }

    /// Current step while the form is open. `Submitting` still reads as the
    /// attribution step, which is where the in-flight state renders.
    pub fn current_step(&self) -> Option<WizardStep> {
        match self.phase {
            WizardPhase::Editing(step) => Some(step),
            WizardPhase::Submitting => Some(WizardStep::Attribution),
            _ => None,
        }
    }

    pub fn fields(&self) -> &WizardFields {
        &self.fields
    }

    pub fn field_error(&self) -> Option<&str> {
        self.field_error.as_deref()
    }

    /// Process one event and optionally return a command for the host.
    pub fn apply(&mut self, event: WizardEvent) -> Option<WizardCommand> {
        match self.phase {
            WizardPhase::Blocked | WizardPhase::Submitted { .. } => None,
            WizardPhase::Submitting => match event {
                WizardEvent::SubmitSucceeded(id) => {
                    self.phase = WizardPhase::Submitted { id };
                    None
                }
                WizardEvent::SubmitFailed(message) => {
                    // Back to the last step with everything intact; the
                    // error is retryable.
                    self.phase = WizardPhase::Editing(WizardStep::Attribution);
                    self.field_error = Some(message);
                    None
                }
                _ => None,
            },
            WizardPhase::Editing(step) => self.apply_editing(step, event),
        }
    }

    fn apply_editing(&mut self, step: WizardStep, event: WizardEvent) -> Option<WizardCommand> {
        match event {
            WizardEvent::TitleChanged(value) => {
                self.fields.title = value;
                self.clear_error_for(step, WizardStep::Title);
                None
            }
            WizardEvent::DescriptionChanged(value) => {
                self.fields.description = value;
                self.clear_error_for(step, WizardStep::Description);
                None
            }
            WizardEvent::PreviewUploaded(data_url) => {
                self.fields.preview_image = Some(data_url);
                self.clear_error_for(step, WizardStep::PreviewImage);
                None
            }
            WizardEvent::PreviewUrlEntered(url) => {
                if is_image_url(&url) {
                    self.fields.preview_image = Some(url);
                    self.clear_error_for(step, WizardStep::PreviewImage);
                } else {
                    self.field_error = Some(INVALID_IMAGE_URL_ERROR.to_string());
                }
                None
            }
            WizardEvent::ScreenshotRequested(url) => {
                if step == WizardStep::PreviewImage {
                    Some(WizardCommand::GenerateScreenshot { url })
                } else {
                    None
                }
            }
            WizardEvent::ScreenshotReady(data_url) => {
                self.fields.preview_image = Some(data_url);
                self.clear_error_for(step, WizardStep::PreviewImage);
                None
            }
            WizardEvent::ScreenshotFailed => {
                self.field_error = Some(SCREENSHOT_FAILED_ERROR.to_string());
                None
            }
            WizardEvent::ContributorsChanged(value) => {
                self.fields.contributors = value;
                None
            }
            WizardEvent::SourceLinkChanged(value) => {
                self.fields.source_link = value;
                self.clear_error_for(step, WizardStep::Attribution);
                None
            }
            WizardEvent::Back => {
                if let Some(previous) = step.backward() {
                    self.phase = WizardPhase::Editing(previous);
                    self.field_error = None;
                }
                None
            }
            WizardEvent::Next => {
                if let Some(message) = self.step_error(step) {
                    self.field_error = Some(message.to_string());
                    return None;
                }
                self.field_error = None;
                match step.forward() {
                    Some(next) => {
                        self.phase = WizardPhase::Editing(next);
                        None
                    }
                    None => {
                        self.phase = WizardPhase::Submitting;
                        Some(WizardCommand::Submit(self.assemble_form()))
                    }
                }
            }
            WizardEvent::SubmitSucceeded(_) | WizardEvent::SubmitFailed(_) => None,
        }
    }

    /// The gate each step's `Next` must pass.
    fn step_error(&self, step: WizardStep) -> Option<&'static str> {
        match step {
            WizardStep::Title if self.fields.title.trim().chars().count() < 3 => {
                Some("Title must be longer than 3 characters.")
            }
            WizardStep::Description if self.fields.description.trim().is_empty() => {
                Some("Description is required.")
            }
            WizardStep::PreviewImage if self.fields.preview_image.is_none() => {
                Some("Preview image is required.")
            }
            WizardStep::Attribution if self.fields.source_link.trim().is_empty() => {
                Some("Source link is required.")
            }
            _ => None,
        }
    }

    fn clear_error_for(&mut self, current: WizardStep, owner: WizardStep) {
        if current == owner {
            self.field_error = None;
        }
    }

    fn assemble_form(&self) -> SubmissionForm {
        SubmissionForm {
            title: self.fields.title.trim().to_string(),
            description: self.fields.description.trim().to_string(),
            preview_image: self.fields.preview_image.clone().unwrap_or_default(),
            source_link: self.fields.source_link.trim().to_string(),
            contributors: split_contributor_ids(&self.fields.contributors),
        }
    }
}

impl Default for SubmissionWizard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wizard_at_attribution() -> SubmissionWizard {
        let mut wizard = SubmissionWizard::new();
        wizard.apply(WizardEvent::TitleChanged("Midnight Glass".into()));
        wizard.apply(WizardEvent::Next);
        wizard.apply(WizardEvent::DescriptionChanged("Translucent dark panels".into()));
        wizard.apply(WizardEvent::Next);
        wizard.apply(WizardEvent::PreviewUploaded("data:image/png;base64,AAAA".into()));
        wizard.apply(WizardEvent::Next);
        wizard.apply(WizardEvent::SourceLinkChanged(
            "https://github.com/ada/midnight/blob/main/dark.css".into(),
        ));
        assert_eq!(wizard.current_step(), Some(WizardStep::Attribution));
        wizard
    }

    #[test]
    fn test_starts_on_the_title_step() {
        let wizard = SubmissionWizard::new();
        assert_eq!(wizard.current_step(), Some(WizardStep::Title));
        assert_eq!(wizard.field_error(), None);
    }

    #[test]
    fn test_short_title_keeps_the_step_and_surfaces_the_error() {
        let mut wizard = SubmissionWizard::new();
        wizard.apply(WizardEvent::TitleChanged("Hi".into()));

        let command = wizard.apply(WizardEvent::Next);

        assert!(command.is_none());
        assert_eq!(wizard.current_step(), Some(WizardStep::Title));
        assert_eq!(
            wizard.field_error(),
            Some("Title must be longer than 3 characters.")
        );
        assert_eq!(wizard.fields().title, "Hi");
    }

    #[test]
    fn test_three_character_title_advances() {
        let mut wizard = SubmissionWizard::new();
        wizard.apply(WizardEvent::TitleChanged("Sky".into()));
        wizard.apply(WizardEvent::Next);
        assert_eq!(wizard.current_step(), Some(WizardStep::Description));
    }

    #[test]
    fn test_invalid_next_preserves_other_fields() {
        let mut wizard = SubmissionWizard::new();
        wizard.apply(WizardEvent::TitleChanged("Midnight Glass".into()));
        wizard.apply(WizardEvent::Next);
        wizard.apply(WizardEvent::DescriptionChanged("Dark panels".into()));
        wizard.apply(WizardEvent::Next);

        // No preview image set, so this gate fails.
        wizard.apply(WizardEvent::Next);

        assert_eq!(wizard.current_step(), Some(WizardStep::PreviewImage));
        assert_eq!(wizard.field_error(), Some("Preview image is required."));
        assert_eq!(wizard.fields().title, "Midnight Glass");
        assert_eq!(wizard.fields().description, "Dark panels");
    }

    #[test]
    fn test_back_walks_one_step_and_stops_at_the_start() {
        let mut wizard = SubmissionWizard::new();
        wizard.apply(WizardEvent::TitleChanged("Sky".into()));
        wizard.apply(WizardEvent::Next);

        wizard.apply(WizardEvent::Back);
        assert_eq!(wizard.current_step(), Some(WizardStep::Title));

        wizard.apply(WizardEvent::Back);
        assert_eq!(wizard.current_step(), Some(WizardStep::Title));
        assert_eq!(wizard.fields().title, "Sky");
    }

    #[test]
    fn test_pasted_preview_url_needs_an_image_extension() {
        let mut wizard = SubmissionWizard::new();
        wizard.apply(WizardEvent::TitleChanged("Sky".into()));
        wizard.apply(WizardEvent::Next);
        wizard.apply(WizardEvent::DescriptionChanged("desc".into()));
        wizard.apply(WizardEvent::Next);

        wizard.apply(WizardEvent::PreviewUrlEntered("https://example.com/page".into()));
        assert_eq!(
            wizard.field_error(),
            Some("Please enter a valid image URL (PNG, GIF, WEBP, JPG)")
        );
        assert!(wizard.fields().preview_image.is_none());

        wizard.apply(WizardEvent::PreviewUrlEntered("https://example.com/shot.PNG".into()));
        assert_eq!(wizard.field_error(), None);
        assert_eq!(
            wizard.fields().preview_image.as_deref(),
            Some("https://example.com/shot.PNG")
        );
    }

    #[test]
    fn test_screenshot_round_trip_fills_the_preview() {
        let mut wizard = SubmissionWizard::new();
        wizard.apply(WizardEvent::TitleChanged("Sky".into()));
        wizard.apply(WizardEvent::Next);
        wizard.apply(WizardEvent::DescriptionChanged("desc".into()));
        wizard.apply(WizardEvent::Next);

        let command = wizard.apply(WizardEvent::ScreenshotRequested(
            "https://cdn.example/theme.css".into(),
        ));
        assert_eq!(
            command,
            Some(WizardCommand::GenerateScreenshot {
                url: "https://cdn.example/theme.css".into()
            })
        );

        wizard.apply(WizardEvent::ScreenshotReady("data:image/png;base64,BBBB".into()));
        assert_eq!(
            wizard.fields().preview_image.as_deref(),
            Some("data:image/png;base64,BBBB")
        );
    }

    #[test]
    fn test_screenshot_failure_surfaces_a_retryable_error() {
        let mut wizard = SubmissionWizard::new();
        wizard.apply(WizardEvent::TitleChanged("Sky".into()));
        wizard.apply(WizardEvent::Next);
        wizard.apply(WizardEvent::DescriptionChanged("desc".into()));
        wizard.apply(WizardEvent::Next);

        wizard.apply(WizardEvent::ScreenshotFailed);
        assert_eq!(
            wizard.field_error(),
            Some("Failed to generate preview. Please try again.")
        );
        assert_eq!(wizard.current_step(), Some(WizardStep::PreviewImage));
    }

    #[test]
    fn test_screenshot_requests_only_fire_on_the_preview_step() {
        let mut wizard = SubmissionWizard::new();
        let command =
            wizard.apply(WizardEvent::ScreenshotRequested("https://x.example".into()));
        assert!(command.is_none());
    }

    #[test]
    fn test_final_next_emits_the_submit_command() {
        let mut wizard = wizard_at_attribution();
        wizard.apply(WizardEvent::ContributorsChanged("ben, ada ben".into()));

        let command = wizard.apply(WizardEvent::Next);

        let form = match command {
            Some(WizardCommand::Submit(form)) => form,
            other => panic!("Expected a submit command, got {other:?}"),
        };
        assert_eq!(form.title, "Midnight Glass");
        assert_eq!(form.description, "Translucent dark panels");
        assert_eq!(form.preview_image, "data:image/png;base64,AAAA");
        assert_eq!(
            form.source_link,
            "https://github.com/ada/midnight/blob/main/dark.css"
        );
        assert_eq!(form.contributors, vec!["ben", "ada"]);
        assert_eq!(wizard.phase(), &WizardPhase::Submitting);
    }

    #[test]
    fn test_duplicate_submit_attempts_are_ignored_in_flight() {
        let mut wizard = wizard_at_attribution();
        assert!(wizard.apply(WizardEvent::Next).is_some());

        assert!(wizard.apply(WizardEvent::Next).is_none());
        assert!(wizard.apply(WizardEvent::Next).is_none());
        assert_eq!(wizard.phase(), &WizardPhase::Submitting);
    }

    #[test]
    fn test_submit_failure_returns_to_the_last_step_with_data_intact() {
        let mut wizard = wizard_at_attribution();
        wizard.apply(WizardEvent::Next);

        wizard.apply(WizardEvent::SubmitFailed("Service unavailable".into()));

        assert_eq!(wizard.current_step(), Some(WizardStep::Attribution));
        assert_eq!(wizard.field_error(), Some("Service unavailable"));
        assert_eq!(wizard.fields().title, "Midnight Glass");
        assert_eq!(
            wizard.fields().source_link,
            "https://github.com/ada/midnight/blob/main/dark.css"
        );

        // The retry goes straight back out.
        let retry = wizard.apply(WizardEvent::Next);
        assert!(matches!(retry, Some(WizardCommand::Submit(_))));
    }

    #[test]
    fn test_submit_success_reaches_the_submitted_phase() {
        let mut wizard = wizard_at_attribution();
        wizard.apply(WizardEvent::Next);

        let id = Uuid::new_v4();
        wizard.apply(WizardEvent::SubmitSucceeded(id));

        assert_eq!(wizard.phase(), &WizardPhase::Submitted { id });
        assert!(wizard.apply(WizardEvent::Next).is_none());
    }

    #[test]
    fn test_blocked_wizard_is_inert() {
        let mut wizard = SubmissionWizard::blocked();

        wizard.apply(WizardEvent::TitleChanged("Sneaky".into()));
        let command = wizard.apply(WizardEvent::Next);

        assert!(command.is_none());
        assert_eq!(wizard.phase(), &WizardPhase::Blocked);
        assert_eq!(wizard.fields().title, "");
    }

    #[test]
    fn test_editing_the_failing_field_clears_its_error() {
        let mut wizard = SubmissionWizard::new();
        wizard.apply(WizardEvent::TitleChanged("Hi".into()));
        wizard.apply(WizardEvent::Next);
        assert!(wizard.field_error().is_some());

        wizard.apply(WizardEvent::TitleChanged("High Tide".into()));
        assert_eq!(wizard.field_error(), None);
    }

    #[test]
    fn test_image_url_check_is_case_insensitive() {
        assert!(is_image_url("https://x.example/a.png"));
        assert!(is_image_url("https://x.example/a.JPEG"));
        assert!(is_image_url("https://x.example/a.webp"));
        assert!(!is_image_url("https://x.example/a.svg"));
        assert!(!is_image_url("https://x.example/page"));
    }
}
