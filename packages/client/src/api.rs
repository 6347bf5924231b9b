//! HTTP client for the theme portal API.
//!
//! A thin wrapper over `reqwest` with bearer-token auth. Failed responses
//! are decoded into [`ClientError::Api`] with the server's error category
//! and message preserved, so callers can branch on conflicts without
//! string-matching the body.

use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::error::{ClientError, Result};
use crate::source::{resolve_source_content, SourceFetcher};
use crate::types::{
    AnnounceResponse, ApiErrorBody, CreatedSubmission, MarkReadResponse, Notification,
    RejectRequest, Standing, SubmissionDraft, SubmissionRecord, SubmissionState,
    TagSuggestionsResponse, ThemeRecord, ValidateUsersResponse,
};
use crate::wizard::SubmissionForm;

#[derive(Serialize)]
struct ValidateUsersBody<'a> {
    ids: &'a [String],
}

#[derive(Serialize)]
struct ApproveBody<'a> {
    tags: &'a [String],
}

#[derive(Serialize)]
struct BanBody<'a> {
    reason: Option<&'a str>,
}

#[derive(Serialize)]
struct MarkReadBody {
    mark_all_as_read: bool,
}

#[derive(Serialize)]
struct AnnounceBody<'a> {
    title: &'a str,
    message: &'a str,
}

/// Portal API client.
///
/// Cheap to clone; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct PortalClient {
    http_client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl PortalClient {
    /// New client against the given base URL, e.g. `https://portal.example`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            http_client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Attach the bearer token sent with every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.authed(self.http_client.get(self.url(path)))
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.authed(self.http_client.post(self.url(path)))
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            Err(api_error_from_body(status, &body))
        }
    }

    // Submissions

    pub async fn create_submission(&self, draft: &SubmissionDraft) -> Result<CreatedSubmission> {
        let response = self.post("/api/submissions").json(draft).send().await?;
        Self::read_json(response).await
    }

    /// Review queue listing for the given state. Admin only.
    pub async fn list_submissions(&self, state: SubmissionState) -> Result<Vec<SubmissionRecord>> {
        let response = self
            .get("/api/submissions")
            .query(&[("state", state)])
            .send()
            .await?;
        Self::read_json(response).await
    }

    pub async fn get_submission(&self, id: Uuid) -> Result<SubmissionRecord> {
        let response = self.get(&format!("/api/submissions/{id}")).send().await?;
        Self::read_json(response).await
    }

    pub async fn approve_submission(&self, id: Uuid, tags: &[String]) -> Result<SubmissionRecord> {
        let response = self
            .post(&format!("/api/submissions/{id}/approve"))
            .json(&ApproveBody { tags })
            .send()
            .await?;
        Self::read_json(response).await
    }

    pub async fn reject_submission(
        &self,
        id: Uuid,
        request: &RejectRequest,
    ) -> Result<SubmissionRecord> {
        let response = self
            .post(&format!("/api/submissions/{id}/reject"))
            .json(request)
            .send()
            .await?;
        Self::read_json(response).await
    }

    /// Heuristic tag suggestions for a pending submission.
    pub async fn tag_suggestions(&self, id: Uuid) -> Result<Vec<String>> {
        let response = self
            .get(&format!("/api/submissions/{id}/tag-suggestions"))
            .send()
            .await?;
        let body: TagSuggestionsResponse = Self::read_json(response).await?;
        Ok(body.suggestions)
    }

    // Themes

    pub async fn list_themes(&self) -> Result<Vec<ThemeRecord>> {
        let response = self.get("/api/themes").send().await?;
        Self::read_json(response).await
    }

    pub async fn get_theme(&self, id: Uuid) -> Result<ThemeRecord> {
        let response = self.get(&format!("/api/themes/{id}")).send().await?;
        Self::read_json(response).await
    }

    // Users

    /// Resolve raw contributor ids; unresolved inputs come back in `failed`.
    pub async fn validate_users(&self, ids: &[String]) -> Result<ValidateUsersResponse> {
        let response = self
            .post("/api/users/validate")
            .json(&ValidateUsersBody { ids })
            .send()
            .await?;
        Self::read_json(response).await
    }

    pub async fn ban_user(&self, id: Uuid, reason: Option<&str>) -> Result<Standing> {
        let response = self
            .post(&format!("/api/users/{id}/ban"))
            .json(&BanBody { reason })
            .send()
            .await?;
        Self::read_json(response).await
    }

    pub async fn unban_user(&self, id: Uuid) -> Result<Standing> {
        let response = self.post(&format!("/api/users/{id}/unban")).send().await?;
        Self::read_json(response).await
    }

    // Notifications

    /// The caller's notification feed, newest first.
    pub async fn list_notifications(&self) -> Result<Vec<Notification>> {
        let response = self.get("/api/notifications").send().await?;
        Self::read_json(response).await
    }

    /// Mark every notification read; returns how many rows changed.
    pub async fn mark_all_read(&self) -> Result<u64> {
        let response = self
            .post("/api/notifications/mark-read")
            .json(&MarkReadBody {
                mark_all_as_read: true,
            })
            .send()
            .await?;
        let body: MarkReadResponse = Self::read_json(response).await?;
        Ok(body.updated)
    }

    /// Queue an announcement to every user; returns how many were queued.
    pub async fn announce(&self, title: &str, message: &str) -> Result<u64> {
        let response = self
            .post("/api/announcements")
            .json(&AnnounceBody { title, message })
            .send()
            .await?;
        let body: AnnounceResponse = Self::read_json(response).await?;
        Ok(body.queued)
    }

    // Composite flows

    /// Resolve the form's source link into transportable content and create
    /// the submission. This is the whole wizard submit path in one call.
    pub async fn submit_theme(
        &self,
        fetcher: &dyn SourceFetcher,
        form: SubmissionForm,
    ) -> Result<CreatedSubmission> {
        info!(title = %form.title, "Resolving source content");
        let content = resolve_source_content(fetcher, &form.source_link).await?;

        info!(title = %form.title, "Creating submission");
        let draft = form.into_draft(content);
        let created = self.create_submission(&draft).await?;

        info!(id = %created.id, "Submission created");
        Ok(created)
    }
}

fn api_error_from_body(status: u16, body: &str) -> ClientError {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) => ClientError::Api {
            status,
            category: parsed.error,
            message: parsed.message,
        },
        Err(_) => ClientError::Api {
            status,
            category: "unknown".to_string(),
            message: body.to_string(),
        },
    }
}
