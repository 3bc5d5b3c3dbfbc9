pub mod clock;
pub mod scorer;
pub mod scanner;

pub use scorer::RiskEngine;
pub use scanner::{ScanOutcome, TokenScanner};
