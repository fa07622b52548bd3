//! Remote content fetcher
//!
//! Downloads the bytes behind a link. One attempt per link, no retries.

use ossup_core::{Error, Result};

/// Build the HTTP client shared by the fetcher and the credential client
pub fn http_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(concat!("ossup/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| Error::Network(format!("Failed to create HTTP client: {e}")))
}

/// Fetches remote files into memory
#[derive(Debug, Clone)]
pub struct RemoteFetcher {
    http: reqwest::Client,
}

impl RemoteFetcher {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// GET `url` and return the body
    ///
    /// Unreachable hosts and non-success statuses are network errors.
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| Error::Network(format!("GET {url}: {e}")))?;

        let data = response
            .bytes()
            .await
            .map_err(|e| Error::Network(format!("GET {url}: {e}")))?
            .to_vec();

        tracing::debug!(
            url,
            size = %humansize::format_size(data.len(), humansize::BINARY),
            "fetched remote file"
        );
        Ok(data)
    }

    /// Fetch every link concurrently, in input order; any failure fails all
    pub async fn fetch_all(&self, urls: &[String]) -> Result<Vec<Vec<u8>>> {
        futures::future::try_join_all(urls.iter().map(|url| self.fetch(url))).await
    }
}
