//! Honeypot risk scoring.
//!
//! Every rule is checked against the same record in table order. Fired rules
//! add their weight; the sum is the risk percentage, capped at 100.

use std::sync::Arc;
use crate::models::{RiskAssessment, RiskFactor, TimeWindow, TokenPairRecord, TokenPairsResponse};
use super::clock::{Clock, SystemClock};

const VERY_RECENT_PAIR_SECS: f64 = 3600.0;
const RECENT_PAIR_SECS: f64 = 2.0 * 3600.0;

const MAX_BUY_SELL_RATIO_24H: f64 = 2.2;
const MAX_BUY_SELL_RATIO_6H: f64 = 2.3;
const MAX_BUY_SELL_RATIO_1H: f64 = 2.5;

const MAX_PRICE_CHANGE_24H: f64 = 100_000.0;
const LOW_LIQUIDITY_USD: f64 = 10_000.0;
const VERY_LOW_LIQUIDITY_USD: f64 = 1_000.0;
const HIGH_MARKET_CAP_USD: f64 = 250_000_000.0;
const LARGE_MARKET_CAP_USD: f64 = 100_000_000.0;

/// One heuristic: fires when `check(record, pair_age_secs)` holds.
pub struct RiskRule {
    pub description: &'static str,
    pub weight: u32,
    check: fn(&TokenPairRecord, f64) -> bool,
}

impl RiskRule {
    pub fn fires(&self, record: &TokenPairRecord, age_secs: f64) -> bool {
        (self.check)(record, age_secs)
    }

    pub fn factor(&self) -> RiskFactor {
        RiskFactor {
            description: self.description,
            weight: self.weight,
        }
    }
}

pub const RULES: &[RiskRule] = &[
    RiskRule {
        description: "The pair was created less than an hour ago and the Market Cap is over 100 million.",
        weight: 30,
        check: fresh_pair_with_large_cap,
    },
    RiskRule {
        description: "The pair was created recently.",
        weight: 5,
        check: recent_pair,
    },
    RiskRule {
        description: "The buy/sell ratio in the last 24 hours is anormally high or there are no sells.",
        weight: 20,
        check: buy_heavy_24h,
    },
    RiskRule {
        description: "The buy/sell ratio in the last 6 hours is anormally high or there are no sells.",
        weight: 15,
        check: buy_heavy_6h,
    },
    RiskRule {
        description: "The buy/sell ratio in the last hour is anormally high or there are no sells.",
        weight: 10,
        check: buy_heavy_1h,
    },
    RiskRule {
        description: "The price change in the last 24 hours is anormally high.",
        weight: 15,
        check: price_spike,
    },
    RiskRule {
        description: "Liquidity is low.",
        weight: 5,
        check: low_liquidity,
    },
    RiskRule {
        description: "Liquidity is very low.",
        weight: 10,
        check: very_low_liquidity,
    },
    RiskRule {
        description: "The Market Cap is over 250 million and the price change in the last 24 hours is over 100,000.",
        weight: 20,
        check: price_spike_with_high_cap,
    },
    RiskRule {
        description: "The Market Cap is over 100 million and the crypto has no information.",
        weight: 25,
        check: large_cap_without_info,
    },
    RiskRule {
        description: "The crypto has no information.",
        weight: 5,
        check: no_info,
    },
];

fn fresh_pair_with_large_cap(r: &TokenPairRecord, age: f64) -> bool {
    age < VERY_RECENT_PAIR_SECS && r.market_cap_usd > LARGE_MARKET_CAP_USD
}

fn recent_pair(_: &TokenPairRecord, age: f64) -> bool {
    age < RECENT_PAIR_SECS
}

fn buy_heavy_24h(r: &TokenPairRecord, _: f64) -> bool {
    r.txns(TimeWindow::H24).is_buy_heavy(MAX_BUY_SELL_RATIO_24H)
}

fn buy_heavy_6h(r: &TokenPairRecord, _: f64) -> bool {
    r.txns(TimeWindow::H6).is_buy_heavy(MAX_BUY_SELL_RATIO_6H)
}

fn buy_heavy_1h(r: &TokenPairRecord, _: f64) -> bool {
    r.txns(TimeWindow::H1).is_buy_heavy(MAX_BUY_SELL_RATIO_1H)
}

fn price_spike(r: &TokenPairRecord, _: f64) -> bool {
    r.price_change_24h > MAX_PRICE_CHANGE_24H
}

fn low_liquidity(r: &TokenPairRecord, _: f64) -> bool {
    r.liquidity_usd > VERY_LOW_LIQUIDITY_USD && r.liquidity_usd < LOW_LIQUIDITY_USD
}

fn very_low_liquidity(r: &TokenPairRecord, _: f64) -> bool {
    r.liquidity_usd < VERY_LOW_LIQUIDITY_USD
}

fn price_spike_with_high_cap(r: &TokenPairRecord, _: f64) -> bool {
    r.market_cap_usd > HIGH_MARKET_CAP_USD && r.price_change_24h > MAX_PRICE_CHANGE_24H
}

// Fires together with `no_info`.
fn large_cap_without_info(r: &TokenPairRecord, _: f64) -> bool {
    r.market_cap_usd > LARGE_MARKET_CAP_USD && !r.has_info
}

fn no_info(r: &TokenPairRecord, _: f64) -> bool {
    !r.has_info
}

#[derive(Clone)]
pub struct RiskEngine {
    clock: Arc<dyn Clock>,
}

impl Default for RiskEngine {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl RiskEngine {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Score a single pair record
    pub fn assess(&self, record: &TokenPairRecord) -> RiskAssessment {
        let age = record.age_secs(self.clock.now_secs());

        let factors: Vec<RiskFactor> = RULES
            .iter()
            .filter(|rule| rule.fires(record, age))
            .map(|rule| {
                tracing::debug!("rule fired (+{}): {}", rule.weight, rule.description);
                rule.factor()
            })
            .collect();

        RiskAssessment::from_factors(factors)
    }

    /// Score a fetched response: no pairs is maximum risk, otherwise the first pair decides.
    pub fn assess_response(&self, response: &TokenPairsResponse) -> RiskAssessment {
        match response.primary_pair() {
            Some(pair) => self.assess(&TokenPairRecord::from(pair)),
            None => {
                tracing::debug!("no pairs in response");
                RiskAssessment::no_pairs()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::assessment::NO_PAIRS_ALERT;
    use crate::models::record::TxnCounts;
    use crate::services::clock::FixedClock;
    use serde_json::json;

    const NOW: f64 = 1_700_000_000.0;

    fn engine() -> RiskEngine {
        RiskEngine::new(Arc::new(FixedClock(NOW)))
    }

    /// Old, liquid, balanced, described: fires nothing.
    fn quiet_record() -> TokenPairRecord {
        TokenPairRecord {
            txns_1h: TxnCounts::new(10, 10),
            txns_6h: TxnCounts::new(60, 50),
            txns_24h: TxnCounts::new(200, 180),
            price_change_24h: 3.5,
            liquidity_usd: 250_000.0,
            pair_created_at: NOW - 30.0 * 86_400.0,
            market_cap_usd: 5_000_000.0,
            has_info: true,
        }
    }

    fn descriptions(assessment: &RiskAssessment) -> Vec<&'static str> {
        assessment.factors.iter().map(|f| f.description).collect()
    }

    #[test]
    fn test_quiet_record_is_clean() {
        let assessment = engine().assess(&quiet_record());
        assert_eq!(assessment.explanation, None);
        assert_eq!(assessment.risk_percentage, 0.0);
    }

    #[test]
    fn test_weights_match_table() {
        let weights: Vec<u32> = RULES.iter().map(|r| r.weight).collect();
        assert_eq!(weights, vec![30u32, 5, 20, 15, 10, 15, 5, 10, 20, 25, 5]);
    }

    #[test]
    fn test_scenario_new_illiquid_token() {
        let record = TokenPairRecord {
            liquidity_usd: 500.0,
            has_info: false,
            pair_created_at: NOW - 600.0,
            market_cap_usd: 5_000_000.0,
            txns_1h: TxnCounts::new(4, 4),
            txns_6h: TxnCounts::new(9, 10),
            txns_24h: TxnCounts::new(9, 10),
            ..quiet_record()
        };

        let assessment = engine().assess(&record);
        assert_eq!(
            descriptions(&assessment),
            vec![
                "The pair was created recently.",
                "Liquidity is very low.",
                "The crypto has no information.",
            ]
        );
        assert_eq!(assessment.risk_percentage, 20.0);
        assert!(assessment
            .explanation
            .as_deref()
            .unwrap()
            .ends_with("Risk percentage: 20.00%"));
    }

    #[test]
    fn test_scenario_fresh_large_cap_without_info() {
        let record = TokenPairRecord {
            market_cap_usd: 200_000_000.0,
            pair_created_at: NOW - 1_800.0,
            has_info: false,
            liquidity_usd: 50_000.0,
            ..quiet_record()
        };

        let assessment = engine().assess(&record);
        let weights: Vec<u32> = assessment.factors.iter().map(|f| f.weight).collect();
        assert_eq!(weights, vec![30u32, 5, 25, 5]);
        assert_eq!(assessment.risk_percentage, 65.0);
    }

    #[test]
    fn test_everything_fires_clamps_to_100() {
        let record = TokenPairRecord {
            txns_1h: TxnCounts::new(5, 0),
            txns_6h: TxnCounts::new(5, 0),
            txns_24h: TxnCounts::new(5, 0),
            price_change_24h: 200_000.0,
            liquidity_usd: 500.0,
            pair_created_at: NOW - 600.0,
            market_cap_usd: 300_000_000.0,
            has_info: false,
        };

        let assessment = engine().assess(&record);
        assert_eq!(assessment.factors.len(), 10);
        assert_eq!(assessment.total_weight(), 155);
        assert_eq!(assessment.risk_percentage, 100.0);
        assert!(assessment
            .explanation
            .as_deref()
            .unwrap()
            .ends_with("Risk percentage: 100.00%"));
    }

    #[test]
    fn test_no_sells_in_24h() {
        let record = TokenPairRecord {
            txns_24h: TxnCounts::new(5, 0),
            ..quiet_record()
        };

        let assessment = engine().assess(&record);
        assert_eq!(
            descriptions(&assessment),
            vec!["The buy/sell ratio in the last 24 hours is anormally high or there are no sells."]
        );
        assert_eq!(assessment.risk_percentage, 20.0);
    }

    #[test]
    fn test_no_sells_in_6h() {
        let record = TokenPairRecord {
            txns_6h: TxnCounts::new(8, 0),
            ..quiet_record()
        };

        let assessment = engine().assess(&record);
        assert_eq!(
            descriptions(&assessment),
            vec!["The buy/sell ratio in the last 6 hours is anormally high or there are no sells."]
        );
        assert_eq!(assessment.risk_percentage, 15.0);
    }

    #[test]
    fn test_no_sells_in_1h() {
        let record = TokenPairRecord {
            txns_1h: TxnCounts::new(1, 0),
            ..quiet_record()
        };

        let assessment = engine().assess(&record);
        assert_eq!(
            descriptions(&assessment),
            vec!["The buy/sell ratio in the last hour is anormally high or there are no sells."]
        );
        assert_eq!(assessment.risk_percentage, 10.0);
    }

    #[test]
    fn test_old_large_cap_without_info() {
        // age rules stay quiet, so only the two info rules fire
        let record = TokenPairRecord {
            market_cap_usd: 150_000_000.0,
            has_info: false,
            ..quiet_record()
        };

        let assessment = engine().assess(&record);
        assert_eq!(
            descriptions(&assessment),
            vec![
                "The Market Cap is over 100 million and the crypto has no information.",
                "The crypto has no information.",
            ]
        );
        assert_eq!(assessment.risk_percentage, 30.0);
    }

    #[test]
    fn test_response_with_mistyped_fields_is_scored() {
        let response: TokenPairsResponse = serde_json::from_value(json!({
            "pairs": [{
                "txns": { "h24": { "buys": "oops", "sells": 2.0 } },
                "liquidity": { "usd": "5000" },
                "priceChange": { "h24": "12.5" },
                "marketCap": "3000000",
                "info": { "imageUrl": "https://img" }
            }]
        }))
        .unwrap();

        let assessment = engine().assess_response(&response);
        assert_eq!(descriptions(&assessment), vec!["Liquidity is low."]);
        assert_eq!(assessment.risk_percentage, 5.0);
    }

    #[test]
    fn test_ratio_thresholds_per_window() {
        // 2.4 trips the 24h and 6h limits but not the 1h one
        let record = TokenPairRecord {
            txns_1h: TxnCounts::new(24, 10),
            txns_6h: TxnCounts::new(24, 10),
            txns_24h: TxnCounts::new(24, 10),
            ..quiet_record()
        };

        let weights: Vec<u32> = engine().assess(&record).factors.iter().map(|f| f.weight).collect();
        assert_eq!(weights, vec![20u32, 15]);
    }

    #[test]
    fn test_liquidity_bands() {
        let cases: [(f64, Vec<u32>); 5] = [
            (500.0, vec![10]),
            (1_000.0, vec![]),
            (5_000.0, vec![5]),
            (10_000.0, vec![]),
            (0.0, vec![10]),
        ];

        for (liquidity, expected) in cases {
            let record = TokenPairRecord { liquidity_usd: liquidity, ..quiet_record() };
            let weights: Vec<u32> = engine().assess(&record).factors.iter().map(|f| f.weight).collect();
            assert_eq!(weights, expected, "liquidity {}", liquidity);
        }
    }

    #[test]
    fn test_price_spike_with_high_cap() {
        let record = TokenPairRecord {
            price_change_24h: 150_000.0,
            market_cap_usd: 260_000_000.0,
            ..quiet_record()
        };

        let assessment = engine().assess(&record);
        assert_eq!(
            descriptions(&assessment),
            vec![
                "The price change in the last 24 hours is anormally high.",
                "The Market Cap is over 250 million and the price change in the last 24 hours is over 100,000.",
            ]
        );
        assert_eq!(assessment.risk_percentage, 35.0);
    }

    #[test]
    fn test_pair_age_boundaries() {
        let at = |age: f64| {
            let record = TokenPairRecord {
                pair_created_at: NOW - age,
                market_cap_usd: 150_000_000.0,
                ..quiet_record()
            };
            engine().assess(&record).total_weight()
        };

        assert_eq!(at(3_599.0), 35);
        assert_eq!(at(3_600.0), 5);
        assert_eq!(at(7_199.0), 5);
        assert_eq!(at(7_200.0), 0);
    }

    #[test]
    fn test_adding_a_condition_never_lowers_risk() {
        let base = TokenPairRecord { liquidity_usd: 5_000.0, ..quiet_record() };
        let base_risk = engine().assess(&base).risk_percentage;

        let variants = [
            TokenPairRecord { has_info: false, ..base.clone() },
            TokenPairRecord { price_change_24h: 500_000.0, ..base.clone() },
            TokenPairRecord { txns_1h: TxnCounts::new(9, 0), ..base.clone() },
            TokenPairRecord { pair_created_at: NOW - 60.0, ..base.clone() },
        ];

        for variant in variants {
            assert!(engine().assess(&variant).risk_percentage > base_risk);
        }
    }

    #[test]
    fn test_assess_is_idempotent() {
        let record = TokenPairRecord {
            has_info: false,
            txns_6h: TxnCounts::new(40, 1),
            ..quiet_record()
        };
        let engine = engine();
        assert_eq!(engine.assess(&record), engine.assess(&record));
    }

    #[test]
    fn test_response_without_pairs_is_max_risk() {
        for body in [json!({ "pairs": null }), json!({ "pairs": [] }), json!({})] {
            let response: TokenPairsResponse = serde_json::from_value(body).unwrap();
            let assessment = engine().assess_response(&response);
            assert_eq!(assessment.explanation.as_deref(), Some(NO_PAIRS_ALERT));
            assert_eq!(assessment.risk_percentage, 100.0);
        }
    }

    #[test]
    fn test_response_scores_first_pair_only() {
        let response: TokenPairsResponse = serde_json::from_value(json!({
            "pairs": [
                {
                    "txns": { "h24": { "buys": 10, "sells": 10 } },
                    "liquidity": { "usd": 80_000.0 },
                    "pairCreatedAt": (NOW - 86_400.0) * 1000.0,
                    "marketCap": 2_000_000.0,
                    "info": { "websites": [{ "url": "https://example.org" }] }
                },
                {
                    "liquidity": { "usd": 10.0 },
                    "pairCreatedAt": NOW * 1000.0
                }
            ]
        }))
        .unwrap();

        assert!(engine().assess_response(&response).is_clean());
    }

    #[test]
    fn test_response_with_empty_pair_uses_defaults() {
        // zero liquidity, no info, created at epoch 0
        let response: TokenPairsResponse = serde_json::from_value(json!({ "pairs": [{}] })).unwrap();
        let assessment = engine().assess_response(&response);
        assert_eq!(
            descriptions(&assessment),
            vec!["Liquidity is very low.", "The crypto has no information."]
        );
        assert_eq!(assessment.risk_percentage, 15.0);
    }
}
