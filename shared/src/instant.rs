use std::time::Duration;

/// Monotonic point in time used by the resend and heartbeat timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Instant {
    inner: std::time::Instant,
}

impl Instant {
    pub fn now() -> Self {
        Self {
            inner: std::time::Instant::now(),
        }
    }

    /// Time from `self` until `now`, zero if `now` is earlier
    pub fn elapsed(&self, now: &Instant) -> Duration {
        now.inner.saturating_duration_since(self.inner)
    }

    pub fn add_millis(&self, millis: u32) -> Self {
        self.add_duration(Duration::from_millis(u64::from(millis)))
    }

    pub fn add_duration(&self, duration: Duration) -> Self {
        Self {
            inner: self.inner + duration,
        }
    }
}
