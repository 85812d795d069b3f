#[cfg(test)]
pub(crate) mod testing;
pub mod types;

use std::time::{Duration, Instant};

use reqwest::Response;
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

use crate::api::types::{SearchRequest, SearchResponse};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ApiClientError {
    #[error("{0}")]
    Http(#[from] reqwest::Error),
    #[error("Search failed: {status}")]
    Status { status: u16 },
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("invalid API URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

// ---------------------------------------------------------------------------
// API client
// ---------------------------------------------------------------------------

pub const DEFAULT_SEARCH_PATH: &str = "/search";

/// Client for the movie search backend.
#[derive(Debug, Clone)]
pub struct MovieApiClient {
    http_client: reqwest::Client,
    base_url: Url,
    search_path: String,
}

impl MovieApiClient {
    pub fn new(
        base_url: &str,
        search_path: &str,
        timeout: Duration,
    ) -> Result<Self, ApiClientError> {
        let base_url = Url::parse(base_url).map_err(|source| ApiClientError::InvalidUrl {
            url: base_url.to_string(),
            source,
        })?;
        let http_client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            base_url,
            search_path: search_path.to_string(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Full URL of the search endpoint.
    ///
    /// The search path is appended to the base URL's path rather than
    /// resolved against it, so `http://host/api` + `/search` keeps `/api`.
    pub fn search_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            self.search_path.trim_start_matches('/')
        )
    }

    /// Run a natural-language search. The query is sent trimmed.
    pub async fn search(&self, query: &str) -> Result<SearchResponse, ApiClientError> {
        let url = self.search_url();
        let body = SearchRequest {
            query: query.trim().to_string(),
        };

        let started = Instant::now();
        tracing::info!(%url, query = %body.query, "search request");

        // `.json()` sets `Content-Type: application/json`.
        let resp = self.http_client.post(&url).json(&body).send().await?;
        let result = self.handle_response(resp).await;

        tracing::info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            ok = result.is_ok(),
            "search finished"
        );
        result
    }

    /// Check status and deserialize the body.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: Response,
    ) -> Result<T, ApiClientError> {
        let status = resp.status();

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "search backend returned an error status");
            return Err(ApiClientError::Status {
                status: status.as_u16(),
            });
        }

        let body = resp.text().await?;
        serde_json::from_str::<T>(&body).map_err(|e| ApiClientError::InvalidResponse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{BAD_BOYS_RESPONSE, FakeBackend};

    fn client_for(backend: &FakeBackend) -> MovieApiClient {
        MovieApiClient::new(&backend.base_url(), DEFAULT_SEARCH_PATH, Duration::from_secs(5))
            .unwrap()
    }

    #[test]
    fn search_url_keeps_base_path() {
        let client =
            MovieApiClient::new("http://localhost:8000/api/", "/search", Duration::from_secs(1))
                .unwrap();
        assert_eq!(client.search_url(), "http://localhost:8000/api/search");

        let client =
            MovieApiClient::new("http://localhost:8000", "search", Duration::from_secs(1)).unwrap();
        assert_eq!(client.search_url(), "http://localhost:8000/search");
    }

    #[test]
    fn rejects_relative_base_url() {
        let err = MovieApiClient::new("/api", "/search", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, ApiClientError::InvalidUrl { .. }));
    }

    #[tokio::test]
    async fn posts_trimmed_query_as_json() {
        let backend = FakeBackend::start(200, BAD_BOYS_RESPONSE).await;
        let client = client_for(&backend);

        let resp = client.search("  action movies from the 90s \n").await.unwrap();
        assert_eq!(resp.movies.len(), 1);
        assert_eq!(resp.movies[0].title, "Bad Boys");

        let requests = backend.requests();
        assert_eq!(requests.len(), 1);
        let req = &requests[0];
        assert_eq!(req.method, "POST");
        assert_eq!(req.path, "/api/search");
        assert_eq!(
            req.header("content-type").as_deref(),
            Some("application/json")
        );
        let body: SearchRequest = serde_json::from_str(&req.body).unwrap();
        assert_eq!(body.query, "action movies from the 90s");
    }

    #[tokio::test]
    async fn non_success_status_surfaces_code() {
        let backend = FakeBackend::start(500, r#"{"detail": "boom"}"#).await;
        let err = client_for(&backend).search("anything").await.unwrap_err();
        assert!(matches!(err, ApiClientError::Status { status: 500 }));
        assert_eq!(err.to_string(), "Search failed: 500");
    }

    #[tokio::test]
    async fn malformed_body_is_invalid_response() {
        let backend = FakeBackend::start(200, "<html>not json</html>").await;
        let err = client_for(&backend).search("anything").await.unwrap_err();
        assert!(matches!(err, ApiClientError::InvalidResponse(_)));
        assert!(err.to_string().starts_with("invalid response"));
    }

    #[tokio::test]
    async fn wrong_shape_is_invalid_response() {
        let backend = FakeBackend::start(200, r#"{"results": []}"#).await;
        let err = client_for(&backend).search("anything").await.unwrap_err();
        assert!(matches!(err, ApiClientError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn connection_refused_is_http_error() {
        let url = crate::api::testing::unused_base_url().await;
        let client = MovieApiClient::new(&url, DEFAULT_SEARCH_PATH, Duration::from_secs(5)).unwrap();
        let err = client.search("anything").await.unwrap_err();
        assert!(matches!(err, ApiClientError::Http(_)));
    }
}
