use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use crate::config::SourceConfig;
use crate::models::TokenPairsResponse;
use super::{validate_address, SourceError, TokenSource};

/// DexScreener token endpoint client
pub struct DexScreenerClient {
    client: Client,
    base_url: String,
    max_retries: u32,
    retry_backoff: Duration,
}

impl DexScreenerClient {
    pub fn new(config: &SourceConfig) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            max_retries: config.max_retries,
            retry_backoff: Duration::from_millis(config.retry_backoff_ms),
        })
    }

    fn tokens_url(&self, address: &str) -> String {
        format!("{}/latest/dex/tokens/{}", self.base_url, address)
    }

    async fn fetch_once(&self, url: &str) -> Result<TokenPairsResponse, SourceError> {
        let resp = self.client.get(url)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = resp.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(SourceError::RateLimited);
        }
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }

        Ok(resp.json::<TokenPairsResponse>().await?)
    }
}

#[async_trait]
impl TokenSource for DexScreenerClient {
    fn name(&self) -> &'static str {
        "DexScreener"
    }

    async fn fetch_token_pairs(&self, address: &str) -> Result<TokenPairsResponse, SourceError> {
        let address = validate_address(address)?;
        let url = self.tokens_url(address);

        let mut attempt = 0;
        loop {
            match self.fetch_once(&url).await {
                Ok(data) => {
                    tracing::debug!("{}: {} pairs for {}", self.name(), data.pair_count(), address);
                    return Ok(data);
                }
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    attempt += 1;
                    tracing::warn!(
                        "{} error for {}: {} (retry {}/{})",
                        self.name(), address, e, attempt, self.max_retries
                    );
                    tokio::time::sleep(self.retry_backoff * attempt).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
