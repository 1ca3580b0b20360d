//! Fetching pages that announce the latest version of a program.

use std::time::Duration;

use tracing::debug;

use crate::error::{Result, VerwatchError};

/// Blocking HTTP fetcher for latest-version pages.
///
/// # Example
///
/// ```no_run
/// use verwatch::version::HttpFetcher;
/// use std::time::Duration;
///
/// let fetcher = HttpFetcher::new().with_timeout(Duration::from_secs(30));
/// let body = fetcher.fetch("https://example.com/releases").unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    /// Request timeout (None = wait indefinitely).
    timeout: Option<Duration>,
    /// HTTP client.
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    /// Create a fetcher without a timeout.
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Return a fetcher that gives up after `timeout`.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        Self::build(Some(timeout))
    }

    fn build(timeout: Option<Duration>) -> Self {
        // The blocking client defaults to a 30s timeout; `None` disables it.
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("verwatch/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Falling back to default HTTP client: {}", e);
                reqwest::blocking::Client::new()
            });
        Self { timeout, client }
    }

    /// Get the request timeout.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Fetch `url` and return the response body as text.
    ///
    /// The HTTP status is not inspected: error pages are returned like any
    /// other body. Only transport failures are errors.
    pub fn fetch(&self, url: &str) -> Result<String> {
        debug!("Fetching {}", url);

        let response = self.client.get(url).send().map_err(|e| fetch_error(url, e))?;
        debug!("{} answered {}", url, response.status());

        response.text().map_err(|e| fetch_error(url, e))
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

fn fetch_error(url: &str, error: reqwest::Error) -> VerwatchError {
    VerwatchError::Fetch {
        url: url.to_string(),
        message: error.to_string(),
    }
}
