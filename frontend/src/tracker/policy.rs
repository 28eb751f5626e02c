use std::time::Duration;

/// Delay between status polls in the dashboard's reference cadence.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2000);

/// How long and how often the tracker polls.
///
/// Polling stops with a `Timeout` failure once the next poll would exceed
/// `max_attempts` or push the accumulated wait past `max_wait`.
#[derive(Debug, Clone, PartialEq)]
pub struct PollPolicy {
    pub interval: Duration,
    /// Multiplier applied to the delay after each non-terminal poll. `1.0` keeps it fixed.
    pub backoff: f64,
    pub max_interval: Duration,
    pub max_attempts: Option<u32>,
    pub max_wait: Option<Duration>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            backoff: 1.0,
            max_interval: Duration::from_secs(30),
            max_attempts: None,
            max_wait: Some(Duration::from_secs(10 * 60)),
        }
    }
}

impl PollPolicy {
    /// Fixed cadence, no bound. Only for jobs known to terminate.
    pub fn fixed(interval: Duration) -> Self {
        Self {
            interval,
            max_wait: None,
            ..Default::default()
        }
    }

    /// Grows the delay by `factor` after each poll, up to `max_interval`.
    /// Factors that are not finite or below `1.0` keep the cadence fixed.
    pub fn with_backoff(mut self, factor: f64, max_interval: Duration) -> Self {
        self.backoff = if factor.is_finite() && factor >= 1.0 { factor } else { 1.0 };
        self.max_interval = max_interval;
        self
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = Some(attempts);
        self
    }

    pub fn with_max_wait(mut self, wait: Duration) -> Self {
        self.max_wait = Some(wait);
        self
    }

    pub fn next_delay(&self, current: Duration) -> Duration {
        if self.backoff.is_nan() || self.backoff <= 1.0 {
            return current;
        }
        let cap = self.max_interval.max(self.interval);
        Duration::try_from_secs_f64(current.as_secs_f64() * self.backoff)
            .map_or(cap, |next| next.min(cap))
    }

    /// Whether poll number `attempts + 1`, fired after a total wait of `waited_after`, is allowed.
    pub fn allows(&self, attempts: u32, waited_after: Duration) -> bool {
        if self.max_attempts.is_some_and(|max| attempts >= max) {
            return false;
        }
        !self.max_wait.is_some_and(|max| waited_after > max)
    }
}
