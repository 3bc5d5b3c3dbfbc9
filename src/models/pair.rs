use serde::Deserialize;
use serde_with::{serde_as, DefaultOnError, DisplayFromStr, PickFirst, Same};

/// A number that may arrive as a JSON number or a numeric string; anything else reads as absent.
type LenientNumber = DefaultOnError<Option<PickFirst<(Same, DisplayFromStr)>>>;

/// Body of `GET /latest/dex/tokens/{address}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenPairsResponse {
    #[serde(rename = "schemaVersion")]
    pub schema_version: Option<String>,
    pub pairs: Option<Vec<DexPair>>,
}

impl TokenPairsResponse {
    /// The pair DexScreener lists first; the only one that gets scored.
    pub fn primary_pair(&self) -> Option<&DexPair> {
        self.pairs.as_ref().and_then(|pairs| pairs.first())
    }

    pub fn pair_count(&self) -> usize {
        self.pairs.as_ref().map(|pairs| pairs.len()).unwrap_or(0)
    }
}

/// One pair as DexScreener reports it. Fields that feed the risk rules never
/// fail the whole body: a mistyped value is read as missing.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DexPair {
    #[serde(rename = "chainId")]
    pub chain_id: Option<String>,
    #[serde(rename = "dexId")]
    pub dex_id: Option<String>,
    pub url: Option<String>,
    #[serde(rename = "pairAddress")]
    pub pair_address: Option<String>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(rename = "baseToken", default)]
    pub base_token: Option<PairToken>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(rename = "priceUsd", default)]
    pub price_usd: Option<String>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub txns: Option<PairTxns>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(rename = "priceChange", default)]
    pub price_change: Option<PriceChange>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub liquidity: Option<PairLiquidity>,
    /// Milliseconds since the Unix epoch
    #[serde_as(as = "LenientNumber")]
    #[serde(rename = "pairCreatedAt", default)]
    pub pair_created_at: Option<f64>,
    #[serde_as(as = "LenientNumber")]
    #[serde(rename = "marketCap", default)]
    pub market_cap: Option<f64>,
    /// Name, image, websites and socials; shape varies, so kept raw
    pub info: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PairToken {
    pub address: Option<String>,
    pub name: Option<String>,
    pub symbol: Option<String>,
}

#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PairTxns {
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub m5: Option<TxnCount>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub h1: Option<TxnCount>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub h6: Option<TxnCount>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub h24: Option<TxnCount>,
}

/// Counts stay floating point on the wire; some feeds send `3.0`.
#[serde_as]
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct TxnCount {
    #[serde_as(as = "LenientNumber")]
    #[serde(default)]
    pub buys: Option<f64>,
    #[serde_as(as = "LenientNumber")]
    #[serde(default)]
    pub sells: Option<f64>,
}

#[serde_as]
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PriceChange {
    #[serde_as(as = "LenientNumber")]
    #[serde(default)]
    pub m5: Option<f64>,
    #[serde_as(as = "LenientNumber")]
    #[serde(default)]
    pub h1: Option<f64>,
    #[serde_as(as = "LenientNumber")]
    #[serde(default)]
    pub h6: Option<f64>,
    #[serde_as(as = "LenientNumber")]
    #[serde(default)]
    pub h24: Option<f64>,
}

#[serde_as]
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PairLiquidity {
    #[serde_as(as = "LenientNumber")]
    #[serde(default)]
    pub usd: Option<f64>,
    #[serde_as(as = "LenientNumber")]
    #[serde(default)]
    pub base: Option<f64>,
    #[serde_as(as = "LenientNumber")]
    #[serde(default)]
    pub quote: Option<f64>,
}
