use serde::{Deserialize, Serialize};

use crate::categories::Category;
use crate::feed::FeedOutcome;

/// One token record as published in a feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub symbol: String,
    pub name: String,
    pub address: String,
    pub decimals: u8,
    #[serde(rename = "chainId")]
    pub chain_id: u64,
    #[serde(rename = "logoURI", default)]
    pub logo_uri: Option<String>,
    #[serde(rename = "coingeckoId", default, skip_serializing_if = "Option::is_none")]
    pub coingecko_id: Option<String>,
    #[serde(rename = "listedIn", default, skip_serializing_if = "Vec::is_empty")]
    pub listed_in: Vec<String>,
}

impl Token {
    /// Logo URL if the feed carried a non-blank one.
    pub fn logo(&self) -> Option<&str> {
        self.logo_uri
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Entry returned by the directory-listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DirEntry {
    pub name: String,
}

/// Work the app asks its host to perform asynchronously.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchTokens { seq: u64, category: String, url: String },
    DiscoverCategories { listing_url: String, raw_base_url: String },
    ProbeLogo { url: String },
}

#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Result of a token fetch. `seq` is the request sequence number it was issued with.
    TokensLoaded {
        seq: u64,
        category: String,
        result: Result<FeedOutcome, String>,
    },
    CategoriesLoaded(Result<Vec<Category>, String>),
    LogoProbed { url: String, ok: bool },
    Quit,
}
