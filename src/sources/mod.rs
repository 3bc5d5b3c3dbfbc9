pub mod dexscreener;

use async_trait::async_trait;
use thiserror::Error;
use crate::models::TokenPairsResponse;

pub use dexscreener::DexScreenerClient;

#[async_trait]
pub trait TokenSource: Send + Sync {
    fn name(&self) -> &'static str;

    /// All trading pairs the provider lists for a token contract.
    async fn fetch_token_pairs(&self, address: &str) -> Result<TokenPairsResponse, SourceError>;
}

/// Why market data could not be retrieved. None of these is ever turned into a score.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Request timed out")]
    Timeout,
    #[error("Unexpected HTTP status {0}")]
    Status(u16),
    #[error("Rate limited")]
    RateLimited,
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Invalid contract address: {0:?}")]
    InvalidAddress(String),
}

impl SourceError {
    /// Transient failures worth another attempt
    pub fn is_retryable(&self) -> bool {
        matches!(self, SourceError::Network(_) | SourceError::Timeout | SourceError::RateLimited)
    }
}

impl From<reqwest::Error> for SourceError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            SourceError::Timeout
        } else if e.is_decode() {
            SourceError::Parse(e.to_string())
        } else {
            SourceError::Network(e.to_string())
        }
    }
}

/// Trim and sanity-check a contract address (EVM hex or base58 mint).
pub fn validate_address(address: &str) -> Result<&str, SourceError> {
    let trimmed = address.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(SourceError::InvalidAddress(address.to_string()));
    }
    Ok(trimmed)
}
