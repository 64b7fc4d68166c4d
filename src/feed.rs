use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::categories::{self, Category};
use crate::types::{DirEntry, Token};

/// What a successful feed request produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedOutcome {
    Tokens(Vec<Token>),
    /// Empty array or a JSON document that is not an array at all.
    Empty,
}

impl FeedOutcome {
    pub fn len(&self) -> usize {
        match self {
            FeedOutcome::Tokens(t) => t.len(),
            FeedOutcome::Empty => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("{url} returned a body that is not JSON: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("{url} returned an unexpected listing: {detail}")]
    Listing { url: String, detail: String },
}

/// Classify a feed body. Only unparseable JSON is an error; anything that
/// parses but is not a non-empty array of tokens is `Empty`.
pub fn classify_feed_body(body: &str) -> Result<FeedOutcome, serde_json::Error> {
    let value: Value = serde_json::from_str(body)?;
    let Value::Array(items) = value else {
        log::info!("[feed] body is not an array; treating as empty");
        return Ok(FeedOutcome::Empty);
    };

    let total = items.len();
    let tokens: Vec<Token> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value::<Token>(item).ok())
        .collect();

    let skipped = total - tokens.len();
    if skipped > 0 {
        log::warn!("[feed] skipped {skipped} of {total} malformed token records");
    }

    if tokens.is_empty() {
        Ok(FeedOutcome::Empty)
    } else {
        Ok(FeedOutcome::Tokens(tokens))
    }
}

/// Parse a directory listing; entries without a `name` are ignored.
pub fn parse_listing(url: &str, body: &str) -> Result<Vec<DirEntry>, FeedError> {
    let value: Value = serde_json::from_str(body).map_err(|source| FeedError::Decode {
        url: url.to_string(),
        source,
    })?;
    match value {
        Value::Array(items) => Ok(items
            .into_iter()
            .filter_map(|item| serde_json::from_value::<DirEntry>(item).ok())
            .collect()),
        other => {
            // GitHub reports rate limiting as an object with a `message`
            let detail = other
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("expected a JSON array")
                .to_string();
            Err(FeedError::Listing {
                url: url.to_string(),
                detail,
            })
        }
    }
}

/// Everything the app needs from the network.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait TokenSource {
    async fn fetch_tokens(&self, url: &str) -> Result<FeedOutcome, FeedError>;

    async fn list_categories(
        &self,
        listing_url: &str,
        raw_base_url: &str,
    ) -> Result<Vec<Category>, FeedError>;

    /// True when the logo URL answers with a success status.
    async fn probe_logo(&self, url: &str) -> bool;
}

/// Plain unauthenticated, cache-less GETs over reqwest.
#[derive(Clone)]
pub struct HttpFeed {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpFeed {
    pub fn new(timeout_ms: u64) -> Result<Self> {
        #[cfg(not(target_arch = "wasm32"))]
        let client = reqwest::Client::builder()
            .user_agent(crate::constants::feeds::USER_AGENT)
            .build()?;

        #[cfg(target_arch = "wasm32")]
        let client = reqwest::Client::builder().build()?;

        Ok(Self {
            client,
            timeout: Duration::from_millis(timeout_ms),
        })
    }

    async fn get_text(&self, url: &str) -> Result<String, FeedError> {
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|source| FeedError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|source| FeedError::Http {
            url: url.to_string(),
            source,
        })
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl TokenSource for HttpFeed {
    async fn fetch_tokens(&self, url: &str) -> Result<FeedOutcome, FeedError> {
        log::info!("[feed] GET {url}");
        let body = self.get_text(url).await?;
        let outcome = classify_feed_body(&body).map_err(|source| FeedError::Decode {
            url: url.to_string(),
            source,
        })?;
        log::info!("[feed] {} tokens from {url}", outcome.len());
        Ok(outcome)
    }

    async fn list_categories(
        &self,
        listing_url: &str,
        raw_base_url: &str,
    ) -> Result<Vec<Category>, FeedError> {
        log::info!("[feed] listing {listing_url}");
        let body = self.get_text(listing_url).await?;
        let entries = parse_listing(listing_url, &body)?;
        Ok(categories::from_listing(&entries, raw_base_url))
    }

    async fn probe_logo(&self, url: &str) -> bool {
        let head = self.client.head(url).timeout(self.timeout).send().await;
        let status = match head {
            // Some CDNs refuse HEAD; fall back to a GET
            Ok(r) if r.status().as_u16() == 405 => {
                match self.client.get(url).timeout(self.timeout).send().await {
                    Ok(r) => r.status(),
                    Err(e) => {
                        log::debug!("[feed] logo probe failed for {url}: {e}");
                        return false;
                    }
                }
            }
            Ok(r) => r.status(),
            Err(e) => {
                log::debug!("[feed] logo probe failed for {url}: {e}");
                return false;
            }
        };
        status.is_success()
    }
}
