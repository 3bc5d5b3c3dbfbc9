pub mod pair;
pub mod record;
pub mod assessment;

pub use pair::TokenPairsResponse;
pub use record::{TimeWindow, TokenPairRecord};
pub use assessment::{PairSummary, RiskAssessment, RiskFactor, ScanReport};
