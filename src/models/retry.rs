use serde::Deserialize;

/// Bounded exponential backoff policy.
#[derive(Clone, Debug, Deserialize)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    pub backoff_multiplier: u64,
}
