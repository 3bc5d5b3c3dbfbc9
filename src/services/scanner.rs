use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use futures::stream::{self, StreamExt};
use indicatif::ProgressBar;
use serde::Serialize;
use tokio::sync::Semaphore;
use crate::models::{PairSummary, ScanReport};
use crate::sources::TokenSource;
use super::RiskEngine;

pub const NOT_HONEYPOT_MESSAGE: &str = "The token does not appear to be a honeypot.";
pub const UNAVAILABLE_MESSAGE: &str = "Unable to retrieve memecoin information.";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScanOutcome {
    Assessed(ScanReport),
    Unavailable { address: String, reason: String },
}

impl ScanOutcome {
    pub fn address(&self) -> &str {
        match self {
            ScanOutcome::Assessed(report) => &report.address,
            ScanOutcome::Unavailable { address, .. } => address,
        }
    }

    /// The line(s) a human sees for this scan
    pub fn render(&self) -> String {
        match self {
            ScanOutcome::Assessed(report) => report
                .assessment
                .explanation
                .clone()
                .unwrap_or_else(|| NOT_HONEYPOT_MESSAGE.to_string()),
            ScanOutcome::Unavailable { .. } => UNAVAILABLE_MESSAGE.to_string(),
        }
    }
}

#[derive(Debug, Default)]
pub struct ScanStats {
    pub total: AtomicU64,
    pub assessed: AtomicU64,
    pub unavailable: AtomicU64,
    pub no_pairs: AtomicU64,
    /// Assessed tokens with at least one risk factor
    pub flagged: AtomicU64,
}

impl ScanStats {
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "total_scans": self.total.load(Ordering::Relaxed),
            "assessed": self.assessed.load(Ordering::Relaxed),
            "unavailable": self.unavailable.load(Ordering::Relaxed),
            "no_pairs": self.no_pairs.load(Ordering::Relaxed),
            "flagged": self.flagged.load(Ordering::Relaxed),
        })
    }
}

/// Fetches market data for a token and runs it through the risk engine.
pub struct TokenScanner {
    source: Arc<dyn TokenSource>,
    engine: RiskEngine,
    /// Caps upstream fetches across every caller: batch runs and concurrent `/scan` requests.
    semaphore: Arc<Semaphore>,
    concurrency: usize,
    stats: ScanStats,
}

impl TokenScanner {
    pub fn new(source: Arc<dyn TokenSource>, engine: RiskEngine, concurrency: usize) -> Self {
        let concurrency = concurrency.max(1);
        Self {
            source,
            engine,
            semaphore: Arc::new(Semaphore::new(concurrency)),
            concurrency,
            stats: ScanStats::default(),
        }
    }

    pub fn stats(&self) -> &ScanStats {
        &self.stats
    }

    pub async fn scan(&self, address: &str) -> ScanOutcome {
        self.stats.total.fetch_add(1, Ordering::Relaxed);

        let fetched = {
            let _permit = self.semaphore.acquire().await.ok();
            self.source.fetch_token_pairs(address).await
        };

        let response = match fetched {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("{} unavailable for {}: {}", self.source.name(), address, e);
                self.stats.unavailable.fetch_add(1, Ordering::Relaxed);
                return ScanOutcome::Unavailable {
                    address: address.to_string(),
                    reason: e.to_string(),
                };
            }
        };

        let assessment = self.engine.assess_response(&response);
        if response.pair_count() == 0 {
            self.stats.no_pairs.fetch_add(1, Ordering::Relaxed);
        }
        if !assessment.is_clean() {
            self.stats.flagged.fetch_add(1, Ordering::Relaxed);
        }
        self.stats.assessed.fetch_add(1, Ordering::Relaxed);

        tracing::info!(
            "scanned {}: {:.2}% risk ({} factors, weight {}, {} pairs)",
            address,
            assessment.risk_percentage,
            assessment.factors.len(),
            assessment.total_weight(),
            response.pair_count()
        );

        ScanOutcome::Assessed(ScanReport {
            address: address.to_string(),
            pair: response.primary_pair().map(PairSummary::from),
            pair_count: response.pair_count(),
            assessment,
            scanned_at: chrono::Utc::now().timestamp(),
        })
    }

    /// Scan many tokens concurrently; results come back in input order.
    /// `buffered` only bounds this batch, the semaphore in `scan` bounds the source.
    pub async fn scan_many(&self, addresses: &[String], progress: &ProgressBar) -> Vec<ScanOutcome> {
        stream::iter(addresses.iter())
            .map(move |address| async move {
                let outcome = self.scan(address).await;
                progress.inc(1);
                outcome
            })
            .buffered(self.concurrency)
            .collect()
            .await
    }
}
