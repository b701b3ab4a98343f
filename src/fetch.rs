//! Page fetching.
//!
//! Extractors never talk to the network directly; they go through a
//! [`PageFetcher`]. The production implementation is [`HttpFetcher`], a thin
//! wrapper over a `reqwest` client. Tests substitute an in-memory fetcher
//! serving fixture pages.

use crate::error::{ExtractorError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, instrument};

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";

/// Fetches a page and returns its body as text.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Download `url`. `context` names what is being fetched (usually the
    /// video id) and only shows up in logs.
    async fn fetch_page_text(&self, url: &str, context: &str) -> Result<String>;
}

/// HTTP client settings.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// [`PageFetcher`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    #[instrument(level = "info", skip_all, fields(%url, %context))]
    async fn fetch_page_text(&self, url: &str, context: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ExtractorError::HttpStatus {
                url: url.to_string(),
                status,
            });
        }

        let body = response.text().await?;
        info!(bytes = body.len(), "Downloaded webpage");
        debug!(preview = %crate::utils::truncate_for_log(&body, 200), "Page preview");
        Ok(body)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Serves fixed page bodies keyed by URL and records every request.
    #[derive(Debug, Default)]
    pub struct StaticFetcher {
        pages: HashMap<String, String>,
        pub requests: Mutex<Vec<(String, String)>>,
    }

    impl StaticFetcher {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_page(mut self, url: &str, body: &str) -> Self {
            self.pages.insert(url.to_string(), body.to_string());
            self
        }

        pub fn requested_urls(&self) -> Vec<String> {
            self.requests
                .lock()
                .unwrap()
                .iter()
                .map(|(url, _)| url.clone())
                .collect()
        }
    }

    #[async_trait]
    impl PageFetcher for StaticFetcher {
        async fn fetch_page_text(&self, url: &str, context: &str) -> Result<String> {
            self.requests
                .lock()
                .unwrap()
                .push((url.to_string(), context.to_string()));
            self.pages
                .get(url)
                .cloned()
                .ok_or_else(|| ExtractorError::HttpStatus {
                    url: url.to_string(),
                    status: reqwest::StatusCode::NOT_FOUND,
                })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::StaticFetcher;
    use super::*;

    #[test]
    fn test_http_fetcher_builds_from_default_config() {
        assert!(HttpFetcher::new(&FetchConfig::default()).is_ok());
    }

    #[tokio::test]
    async fn test_static_fetcher_serves_and_records() {
        let fetcher = StaticFetcher::new().with_page("http://a/", "body");
        assert_eq!(fetcher.fetch_page_text("http://a/", "a").await.unwrap(), "body");
        let err = fetcher.fetch_page_text("http://b/", "b").await.unwrap_err();
        assert!(matches!(err, ExtractorError::HttpStatus { status, .. } if status == reqwest::StatusCode::NOT_FOUND));
        assert_eq!(fetcher.requested_urls(), vec!["http://a/", "http://b/"]);
    }
}
