//! HTTP transport seam.
//!
//! All network access goes through the [`HttpSource`] trait so the
//! pipeline can be exercised against an in-memory transport in tests.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use futures::stream::BoxStream;

use crate::error::{Error, Result};

/// A stream of response body chunks.
pub type ByteStream = BoxStream<'static, Result<Bytes>>;

/// Abstraction over HTTP retrieval for testability.
#[async_trait]
pub trait HttpSource: Send + Sync {
    /// Fetches a resource as text. A non-success status is an error.
    async fn get_text(&self, url: &str) -> Result<String>;

    /// Opens a byte stream over a resource's body. A non-success status
    /// is an error before any bytes are yielded.
    async fn get_stream(&self, url: &str) -> Result<ByteStream>;
}

/// Default transport backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    /// Builds a client tuned for many small requests to a single host.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying client cannot be constructed.
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .pool_idle_timeout(Duration::from_secs(60))
            .pool_max_idle_per_host(8)
            .tcp_keepalive(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(15))
            .read_timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self { client })
    }

    async fn get_checked(&self, url: &str) -> Result<reqwest::Response> {
        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Status {
                url: url.to_string(),
                status,
            });
        }
        Ok(resp)
    }
}

#[async_trait]
impl HttpSource for HttpClient {
    async fn get_text(&self, url: &str) -> Result<String> {
        Ok(self.get_checked(url).await?.text().await?)
    }

    async fn get_stream(&self, url: &str) -> Result<ByteStream> {
        let resp = self.get_checked(url).await?;
        Ok(resp.bytes_stream().map(|r| r.map_err(Error::Http)).boxed())
    }
}
