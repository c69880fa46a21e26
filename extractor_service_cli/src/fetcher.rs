use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use url::Url;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Why a page could not be fetched. The Display text is the logged reason.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("timed out after {0:?}")]
    Timeout(Duration),
    #[error("network error: {0}")]
    Network(String),
    #[error("HTTP error: {0}")]
    Status(StatusCode),
    #[error("could not read response body: {0}")]
    Body(String),
}

/// Failure to set up the shared HTTP client. Fatal at startup, never per row.
#[derive(Debug, Error)]
#[error("could not build HTTP client: {0}")]
pub struct ClientError(#[from] reqwest::Error);

pub type FetchResult = Result<String, FetchError>;

/// Source of raw page HTML. One attempt per call, no retries.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(&self, url: &str) -> FetchResult;
}

#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

pub struct PageFetcher {
    client: Client,
    timeout: Duration,
}

impl PageFetcher {
    pub fn new(options: FetchOptions) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(options.timeout)
            .user_agent(options.user_agent)
            .build()?;

        Ok(Self::with_client(client, options.timeout))
    }

    /// Uses a prebuilt client. `timeout` should match the one it was built with.
    pub fn with_client(client: Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    fn classify(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout(self.timeout)
        } else {
            FetchError::Network(err.to_string())
        }
    }
}

#[async_trait]
impl Fetch for PageFetcher {
    async fn fetch(&self, url: &str) -> FetchResult {
        let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        debug!(%url, "fetching");
        let res = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        if !res.status().is_success() {
            return Err(FetchError::Status(res.status()));
        }

        // Decoded with the response charset, invalid sequences replaced.
        res.text().await.map_err(|e| match self.classify(e) {
            FetchError::Network(msg) => FetchError::Body(msg),
            other => other,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Answers one connection on loopback with `response` after `delay`.
    async fn serve_once(response: String, delay: Duration) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            tokio::time::sleep(delay).await;
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        });
        format!("http://{}/article", addr)
    }

    fn http_response(status: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {}\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        )
    }

    // no_proxy keeps loopback traffic off any proxy set in the environment
    fn loopback_fetcher(timeout: Duration) -> PageFetcher {
        let client = Client::builder()
            .timeout(timeout)
            .no_proxy()
            .build()
            .unwrap();
        PageFetcher::with_client(client, timeout)
    }

    #[tokio::test]
    async fn success_body_is_returned_unchanged() {
        let body = "<h1>T</h1><p>Body text.</p>";
        let url = serve_once(http_response("200 OK", body), Duration::ZERO).await;
        let html = loopback_fetcher(Duration::from_secs(5)).fetch(&url).await.unwrap();
        assert_eq!(html, body);
    }

    #[tokio::test]
    async fn not_found_is_a_status_failure() {
        let url = serve_once(http_response("404 Not Found", ""), Duration::ZERO).await;
        let err = loopback_fetcher(Duration::from_secs(5)).fetch(&url).await.unwrap_err();
        assert!(matches!(err, FetchError::Status(StatusCode::NOT_FOUND)));
    }

    #[tokio::test]
    async fn server_error_is_a_status_failure() {
        let url = serve_once(http_response("503 Service Unavailable", "busy"), Duration::ZERO).await;
        let err = loopback_fetcher(Duration::from_secs(5)).fetch(&url).await.unwrap_err();
        assert!(matches!(err, FetchError::Status(StatusCode::SERVICE_UNAVAILABLE)));
    }

    #[tokio::test]
    async fn slow_server_times_out() {
        let timeout = Duration::from_millis(300);
        let url = serve_once(http_response("200 OK", "late"), Duration::from_secs(3)).await;
        let err = loopback_fetcher(timeout).fetch(&url).await.unwrap_err();
        assert!(matches!(err, FetchError::Timeout(t) if t == timeout));
        assert_eq!(err.to_string(), "timed out after 300ms");
    }

    #[tokio::test]
    async fn refused_connection_is_a_network_failure() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let err = loopback_fetcher(Duration::from_secs(5))
            .fetch(&format!("http://{}/", addr))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Network(_)));
    }

    #[test]
    fn unusable_client_settings_fail_at_construction() {
        let err = PageFetcher::new(FetchOptions {
            user_agent: "bad\nagent".into(),
            ..FetchOptions::default()
        })
        .err()
        .unwrap();
        assert!(err.to_string().starts_with("could not build HTTP client"));
    }

    #[tokio::test]
    async fn malformed_url_fails_before_connecting() {
        let fetcher = PageFetcher::new(FetchOptions::default()).unwrap();
        let err = fetcher.fetch("not a url").await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl { .. }));
        assert!(err.to_string().contains("not a url"));
    }

    #[tokio::test]
    async fn empty_url_is_invalid() {
        let fetcher = PageFetcher::new(FetchOptions::default()).unwrap();
        assert!(matches!(
            fetcher.fetch("").await,
            Err(FetchError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn status_reason_names_the_code() {
        let err = FetchError::Status(StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "HTTP error: 404 Not Found");
    }
}
