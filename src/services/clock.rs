/// Source of "now" for the age-based rules.
pub trait Clock: Send + Sync {
    /// Unix time in (fractional) seconds
    fn now_secs(&self) -> f64;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now_secs(&self) -> f64 {
        chrono::Utc::now().timestamp_millis() as f64 / 1000.0
    }
}

/// Frozen time for tests.
#[cfg(test)]
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub f64);

#[cfg(test)]
impl Clock for FixedClock {
    fn now_secs(&self) -> f64 {
        self.0
    }
}
