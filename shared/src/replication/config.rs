use std::time::Duration;

/// Timing of the position/velocity channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResendConfig {
    /// Number of sends a forced sync guarantees, and the value the force
    /// counter is reset to
    pub max_force_resends: u8,
    /// Minimum time between two forced resends
    pub resend_delay: Duration,
    /// Maximum time a moving object goes without being re-sent
    pub heartbeat_interval: Duration,
}

impl Default for ResendConfig {
    fn default() -> Self {
        Self {
            max_force_resends: 3,
            resend_delay: Duration::from_millis(100),
            heartbeat_interval: Duration::from_secs(1),
        }
    }
}
