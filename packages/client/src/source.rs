//! Source link handling.
//!
//! The wizard collects a source link and turns it into the base64 content
//! blob the portal stores. GitHub blob/tree links go through the contents
//! API (raw pages behind those URLs are HTML, not CSS); anything else is
//! fetched as-is. Responses that look like an HTML document are rejected
//! outright so a copy-pasted repository page never becomes a theme.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use serde::Deserialize;
use tracing::debug;

use crate::error::{ClientError, Result};

const RAW_FETCH_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Markers that identify a fetched body as an HTML document rather than CSS.
const HTML_MARKERS: [&str; 5] = ["<!doctype", "<html", "<head", "<body", "<?xml"];

/// A GitHub blob or tree link, decomposed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GithubSource {
    pub owner: String,
    pub repo: String,
    pub branch: String,
    pub path: String,
}

impl GithubSource {
    /// Contents-API URL for this file, pinned to its branch.
    pub fn contents_api_url(&self) -> String {
        format!(
            "https://api.github.com/repos/{}/{}/contents/{}?ref={}",
            self.owner, self.repo, self.path, self.branch
        )
    }
}

/// Recognize `github.com/{owner}/{repo}/(blob|tree)/{branch}/{path}` links.
///
/// Returns `None` for anything else, including GitHub links without a file
/// path; those are fetched raw.
pub fn parse_github_url(url: &str) -> Option<GithubSource> {
    let (_, rest) = url.split_once("github.com/")?;
    let mut parts = rest.splitn(5, '/');
    let owner = parts.next()?;
    let repo = parts.next()?;
    let marker = parts.next()?;
    let branch = parts.next()?;
    let path = parts.next()?;

    if marker != "blob" && marker != "tree" {
        return None;
    }
    if owner.is_empty() || repo.is_empty() || branch.is_empty() || path.is_empty() {
        return None;
    }

    Some(GithubSource {
        owner: owner.to_string(),
        repo: repo.to_string(),
        branch: branch.to_string(),
        path: path.to_string(),
    })
}

/// True when the trimmed body starts with an HTML document marker.
pub fn is_raw_html(content: &str) -> bool {
    let head = content.trim_start();
    HTML_MARKERS.iter().any(|marker| {
        head.get(..marker.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(marker))
    })
}

/// Fetches text bodies for source resolution. The seam exists so tests can
/// resolve links without a network.
#[async_trait]
pub trait SourceFetcher: Send + Sync {
    async fn fetch_text(&self, url: &str) -> Result<String>;
}

/// `reqwest`-backed fetcher. GitHub API requests carry the JSON accept
/// header and an optional token; everything else goes out with a browser
/// user agent, which some raw-file hosts require.
pub struct HttpSourceFetcher {
    client: reqwest::Client,
    github_token: Option<String>,
}

impl HttpSourceFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            github_token: None,
        }
    }

    /// Authenticate GitHub API requests, lifting the anonymous rate limit.
    pub fn with_github_token(mut self, token: impl Into<String>) -> Self {
        self.github_token = Some(token.into());
        self
    }
}

impl Default for HttpSourceFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SourceFetcher for HttpSourceFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        let is_github_api = url.starts_with("https://api.github.com/");

        let mut request = self.client.get(url);
        if is_github_api {
            request = request.header("Accept", "application/vnd.github+json");
            if let Some(token) = &self.github_token {
                request = request.bearer_auth(token);
            }
        } else {
            request = request.header("User-Agent", RAW_FETCH_USER_AGENT);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let context = if is_github_api {
                "GitHub API fetch failed"
            } else {
                "Failed to fetch from URL"
            };
            return Err(ClientError::Source(format!("{context}: HTTP {status}")));
        }

        Ok(response.text().await?)
    }
}

/// GitHub contents-API response; `content` is base64 with line breaks.
#[derive(Debug, Deserialize)]
struct GithubContents {
    content: Option<String>,
}

fn decode_github_contents(body: &str) -> Result<String> {
    let contents: GithubContents = serde_json::from_str(body)?;
    let encoded = contents.content.ok_or_else(|| {
        ClientError::Source("No content found in GitHub API response".to_string())
    })?;

    // GitHub wraps the base64 payload at 60 columns.
    let compact: String = encoded.split_whitespace().collect();
    let bytes = BASE64_STANDARD
        .decode(compact)
        .map_err(|e| ClientError::Source(format!("GitHub content is not valid base64: {e}")))?;

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Resolve a source link into the base64 content blob a submission carries.
///
/// GitHub blob/tree links are rewritten to the contents API; other links are
/// fetched directly. Bodies that read as HTML documents are rejected.
pub async fn resolve_source_content(fetcher: &dyn SourceFetcher, url: &str) -> Result<String> {
    let text = match parse_github_url(url) {
        Some(source) => {
            let api_url = source.contents_api_url();
            debug!(url, api_url, "Rewrote GitHub link to the contents API");
            let body = fetcher.fetch_text(&api_url).await?;
            decode_github_contents(&body)?
        }
        None => fetcher.fetch_text(url).await?,
    };

    if is_raw_html(&text) {
        return Err(ClientError::Source(
            "Content appears to be raw HTML. Please provide a direct link to the CSS file."
                .to_string(),
        ));
    }

    Ok(BASE64_STANDARD.encode(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct FakeFetcher {
        pages: HashMap<String, String>,
    }

    impl FakeFetcher {
        fn new() -> Self {
            Self {
                pages: HashMap::new(),
            }
        }

        fn with_page(mut self, url: &str, body: &str) -> Self {
            self.pages.insert(url.to_string(), body.to_string());
            self
        }
    }

    #[async_trait]
    impl SourceFetcher for FakeFetcher {
        async fn fetch_text(&self, url: &str) -> Result<String> {
            self.pages
                .get(url)
                .cloned()
                .ok_or_else(|| ClientError::Source(format!("no fake page for {url}")))
        }
    }

    fn github_body(css: &str) -> String {
        format!(r#"{{"content": "{}"}}"#, BASE64_STANDARD.encode(css))
    }

    #[test]
    fn test_parses_blob_url() {
        let source = parse_github_url(
            "https://github.com/ada/midnight/blob/main/themes/dark.css",
        )
        .unwrap();
        assert_eq!(source.owner, "ada");
        assert_eq!(source.repo, "midnight");
        assert_eq!(source.branch, "main");
        assert_eq!(source.path, "themes/dark.css");
    }

    #[test]
    fn test_parses_tree_url() {
        let source =
            parse_github_url("https://github.com/ada/midnight/tree/v2/dark.css").unwrap();
        assert_eq!(source.branch, "v2");
        assert_eq!(source.path, "dark.css");
    }

    #[test]
    fn test_rejects_non_github_and_pathless_urls() {
        assert!(parse_github_url("https://gitlab.com/ada/midnight/blob/main/a.css").is_none());
        assert!(parse_github_url("https://github.com/ada/midnight").is_none());
        assert!(parse_github_url("https://github.com/ada/midnight/releases/tag/v1").is_none());
    }

    #[test]
    fn test_contents_api_url_pins_the_branch() {
        let source = parse_github_url("https://github.com/ada/midnight/blob/main/dark.css")
            .unwrap();
        assert_eq!(
            source.contents_api_url(),
            "https://api.github.com/repos/ada/midnight/contents/dark.css?ref=main"
        );
    }

    #[test]
    fn test_html_detection() {
        assert!(is_raw_html("<!DOCTYPE html><html></html>"));
        assert!(is_raw_html("  \n<html lang=\"en\">"));
        assert!(is_raw_html("<?xml version=\"1.0\"?>"));
        assert!(!is_raw_html(".sidebar { color: red; }"));
        assert!(!is_raw_html("/* <html> inside a comment, not at the start */"));
    }

    #[tokio::test]
    async fn test_github_link_goes_through_the_contents_api() {
        let css = ".panel { opacity: 0.9; }";
        let fetcher = FakeFetcher::new().with_page(
            "https://api.github.com/repos/ada/midnight/contents/dark.css?ref=main",
            &github_body(css),
        );

        let content = resolve_source_content(
            &fetcher,
            "https://github.com/ada/midnight/blob/main/dark.css",
        )
        .await
        .unwrap();

        assert_eq!(content, BASE64_STANDARD.encode(css));
    }

    #[tokio::test]
    async fn test_github_base64_with_line_breaks_decodes() {
        let encoded = BASE64_STANDARD.encode(".a { margin: 0; } .b { padding: 0; }");
        let (head, tail) = encoded.split_at(20);
        let wrapped = format!("{head}\n{tail}\n");
        let fetcher = FakeFetcher::new().with_page(
            "https://api.github.com/repos/ada/midnight/contents/dark.css?ref=main",
            &format!(r#"{{"content": "{}"}}"#, wrapped.replace('\n', "\\n")),
        );

        let content = resolve_source_content(
            &fetcher,
            "https://github.com/ada/midnight/blob/main/dark.css",
        )
        .await
        .unwrap();

        assert_eq!(content, encoded);
    }

    #[tokio::test]
    async fn test_plain_url_is_fetched_raw() {
        let css = "body { background: #111; }";
        let fetcher = FakeFetcher::new().with_page("https://cdn.example/theme.css", css);

        let content = resolve_source_content(&fetcher, "https://cdn.example/theme.css")
            .await
            .unwrap();

        assert_eq!(content, BASE64_STANDARD.encode(css));
    }

    #[tokio::test]
    async fn test_html_body_is_rejected() {
        let fetcher = FakeFetcher::new()
            .with_page("https://example.com/theme", "<!DOCTYPE html><body>nope</body>");

        let err = resolve_source_content(&fetcher, "https://example.com/theme")
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Content appears to be raw HTML. Please provide a direct link to the CSS file."
        );
    }

    #[tokio::test]
    async fn test_github_response_without_content_is_rejected() {
        let fetcher = FakeFetcher::new().with_page(
            "https://api.github.com/repos/ada/midnight/contents/dark.css?ref=main",
            r#"{"message": "Not Found"}"#,
        );

        let err = resolve_source_content(
            &fetcher,
            "https://github.com/ada/midnight/blob/main/dark.css",
        )
        .await
        .unwrap_err();

        assert_eq!(err.to_string(), "No content found in GitHub API response");
    }
}
