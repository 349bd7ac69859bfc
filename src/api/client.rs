//! HTTP client for the feed endpoint.

use super::types::FeedPage;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum FeedApiError {
    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),

    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("Feed request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Feed request returned HTTP {status}")]
    Status { status: u16 },
}

// ============================================================================
// Client
// ============================================================================

/// Client for the platform's paginated video feed.
///
/// Cheap to clone; holds a pooled `reqwest::Client` internally.
#[derive(Clone)]
pub struct FeedClient {
    http: reqwest::Client,
    base_url: Url,
    token: Option<SecretString>,
}

impl FeedClient {
    /// Build a client against `base_url` (e.g. `https://clips.example.com`).
    ///
    /// The optional bearer token is sent on every request; it stays wrapped
    /// in `SecretString` so it never appears in Debug output or logs.
    pub fn new(base_url: &str, token: Option<SecretString>) -> Result<Self, FeedApiError> {
        let base_url = Url::parse(base_url)?;
        let http = reqwest::Client::builder()
            .pool_max_idle_per_host(2)
            .pool_idle_timeout(std::time::Duration::from_secs(30))
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(FeedApiError::ClientBuild)?;
        Ok(Self {
            http,
            base_url,
            token,
        })
    }

    /// Fetch one feed page.
    ///
    /// `cursor` is the opaque token from the previous page's `nextCursor`,
    /// or `None` for the first page. Callers must stop paginating once a
    /// page reports `has_next_page == false`.
    pub async fn fetch_page(
        &self,
        cursor: Option<&str>,
        limit: u32,
    ) -> Result<FeedPage, FeedApiError> {
        let mut url = self.base_url.join("/api/videos")?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("limit", &limit.to_string());
            if let Some(cursor) = cursor {
                query.append_pair("cursor", cursor);
            }
        }

        tracing::debug!(%url, cursor = cursor.unwrap_or("<first page>"), "Fetching feed page");

        let mut request = self.http.get(url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FeedApiError::Status {
                status: status.as_u16(),
            });
        }

        let page: FeedPage = response.json().await?;
        tracing::debug!(
            videos = page.videos.len(),
            has_next_page = page.has_next_page,
            "Feed page received"
        );
        Ok(page)
    }
}

impl std::fmt::Debug for FeedClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedClient")
            .field("base_url", &self.base_url.as_str())
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}
