use serde::Serialize;
use serde_json::Value;
use super::pair::{DexPair, TxnCount};

/// Trailing windows DexScreener reports transaction counts for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TimeWindow {
    H1,
    H6,
    H24,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TxnCounts {
    pub buys: u64,
    pub sells: u64,
}

impl TxnCounts {
    pub fn new(buys: u64, sells: u64) -> Self {
        Self { buys, sells }
    }

    /// Buys with no sells at all, or buys outnumbering sells by more than `max_ratio`.
    pub fn is_buy_heavy(&self, max_ratio: f64) -> bool {
        if self.sells == 0 {
            return self.buys > 0;
        }
        self.buys as f64 / self.sells as f64 > max_ratio
    }
}

impl From<Option<&TxnCount>> for TxnCounts {
    fn from(count: Option<&TxnCount>) -> Self {
        count
            .map(|c| Self::new(whole_count(c.buys), whole_count(c.sells)))
            .unwrap_or_default()
    }
}

/// Wire counts are floats; negative, NaN and missing values read as zero.
fn whole_count(value: Option<f64>) -> u64 {
    value
        .filter(|n| n.is_finite() && *n > 0.0)
        .map(|n| n.round() as u64)
        .unwrap_or(0)
}

/// Flattened statistics of one trading pair, as the risk rules see them.
///
/// Missing upstream fields collapse to neutral values: zero counts, zero
/// liquidity and market cap, creation time 0, no info payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TokenPairRecord {
    pub txns_1h: TxnCounts,
    pub txns_6h: TxnCounts,
    pub txns_24h: TxnCounts,
    pub price_change_24h: f64,
    pub liquidity_usd: f64,
    /// Unix seconds
    pub pair_created_at: f64,
    pub market_cap_usd: f64,
    pub has_info: bool,
}

impl TokenPairRecord {
    pub fn txns(&self, window: TimeWindow) -> TxnCounts {
        match window {
            TimeWindow::H1 => self.txns_1h,
            TimeWindow::H6 => self.txns_6h,
            TimeWindow::H24 => self.txns_24h,
        }
    }

    /// Seconds between pair creation and `now`
    pub fn age_secs(&self, now: f64) -> f64 {
        now - self.pair_created_at
    }
}

impl From<&DexPair> for TokenPairRecord {
    fn from(pair: &DexPair) -> Self {
        let txns = pair.txns.as_ref();

        Self {
            txns_1h: txns.and_then(|t| t.h1.as_ref()).into(),
            txns_6h: txns.and_then(|t| t.h6.as_ref()).into(),
            txns_24h: txns.and_then(|t| t.h24.as_ref()).into(),
            price_change_24h: pair.price_change.and_then(|p| p.h24).unwrap_or(0.0),
            liquidity_usd: pair.liquidity.and_then(|l| l.usd).unwrap_or(0.0),
            pair_created_at: pair.pair_created_at.unwrap_or(0.0) / 1000.0,
            market_cap_usd: pair.market_cap.unwrap_or(0.0),
            has_info: pair.info.as_ref().map(has_content).unwrap_or(false),
        }
    }
}

/// Whether an info payload actually says anything (`{}`, `[]`, `""` and `null` don't).
fn has_content(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|n| n != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}
