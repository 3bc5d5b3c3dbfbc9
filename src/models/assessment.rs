use serde::Serialize;
use super::pair::DexPair;

pub const NO_PAIRS_ALERT: &str = "Alert: No pairs found for this token.";
pub const HONEYPOT_ALERT: &str = "Alert: The token may be a honeypot.";
pub const MAX_RISK_PERCENTAGE: f64 = 100.0;

/// A rule that fired, with the weight it adds to the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RiskFactor {
    pub description: &'static str,
    pub weight: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskAssessment {
    /// `None` means nothing looked suspicious
    pub explanation: Option<String>,
    pub risk_percentage: f64,
    /// Fired rules in evaluation order
    pub factors: Vec<RiskFactor>,
}

impl RiskAssessment {
    /// Token with no trading pairs: the strongest signal there is.
    pub fn no_pairs() -> Self {
        Self {
            explanation: Some(NO_PAIRS_ALERT.to_string()),
            risk_percentage: MAX_RISK_PERCENTAGE,
            factors: Vec::new(),
        }
    }

    pub fn from_factors(factors: Vec<RiskFactor>) -> Self {
        if factors.is_empty() {
            return Self {
                explanation: None,
                risk_percentage: 0.0,
                factors,
            };
        }

        let total: u32 = factors.iter().map(|f| f.weight).sum();
        let risk_percentage = (total as f64).min(MAX_RISK_PERCENTAGE);

        let alerts = factors
            .iter()
            .map(|f| f.description)
            .collect::<Vec<_>>()
            .join("\n");

        Self {
            explanation: Some(format!(
                "{}\nRisk factors:\n{}\nRisk percentage: {:.2}%",
                HONEYPOT_ALERT, alerts, risk_percentage
            )),
            risk_percentage,
            factors,
        }
    }

    pub fn is_clean(&self) -> bool {
        self.explanation.is_none()
    }

    pub fn total_weight(&self) -> u32 {
        self.factors.iter().map(|f| f.weight).sum()
    }
}

/// Identifying details of the pair that was scored.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PairSummary {
    pub chain: Option<String>,
    pub dex: Option<String>,
    pub pair_address: Option<String>,
    pub token_name: Option<String>,
    pub token_symbol: Option<String>,
    pub price_usd: Option<f64>,
    pub url: Option<String>,
}

impl From<&DexPair> for PairSummary {
    fn from(pair: &DexPair) -> Self {
        let token = pair.base_token.as_ref();
        Self {
            chain: pair.chain_id.clone(),
            dex: pair.dex_id.clone(),
            pair_address: pair.pair_address.clone(),
            token_name: token.and_then(|t| t.name.clone()),
            token_symbol: token.and_then(|t| t.symbol.clone()),
            price_usd: pair.price_usd.as_ref().and_then(|p| p.parse::<f64>().ok()),
            url: pair.url.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanReport {
    pub address: String,
    pub pair: Option<PairSummary>,
    pub pair_count: usize,
    pub assessment: RiskAssessment,
    pub scanned_at: i64,
}
