//! Retry policies for the blocking connect loops.
//!
//! Both [`WifiConnector::connect`](crate::network::wifi::WifiConnector::connect)
//! and [`MqttSession::connect`](crate::network::application::mqtt::MqttSession::connect)
//! sleep between attempts. A [`RetryPolicy`] decides how long, and whether to
//! give up. [`RetryPolicy::forever`] reproduces the classic firmware loop that
//! never returns until the link is up; [`RetryPolicy::bounded`] returns an error
//! to the caller instead.

/// Sleep-and-retry schedule.
///
/// # Examples
///
/// ```rust
/// use loadcell_mqtt::network::retry::RetryPolicy;
///
/// let policy = RetryPolicy::bounded(5, 250).with_backoff(2, 1_000);
/// assert_eq!(policy.delay_for(1), 250);
/// assert_eq!(policy.delay_for(2), 500);
/// assert_eq!(policy.delay_for(4), 1_000);
/// assert!(policy.allows(5));
/// assert!(!policy.allows(6));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    interval_ms: u32,
    max_attempts: Option<u32>,
    backoff_factor: u32,
    max_interval_ms: u32,
}

impl RetryPolicy {
    /// Retry without bound, sleeping `interval_ms` between attempts.
    ///
    /// A loop running under this policy blocks forever if the peer never
    /// answers.
    pub const fn forever(interval_ms: u32) -> Self {
        Self {
            interval_ms,
            max_attempts: None,
            backoff_factor: 1,
            max_interval_ms: interval_ms,
        }
    }

    /// Give up after `max_attempts` attempts.
    ///
    /// A budget of zero is treated as one attempt.
    pub const fn bounded(max_attempts: u32, interval_ms: u32) -> Self {
        Self {
            interval_ms,
            max_attempts: Some(if max_attempts == 0 { 1 } else { max_attempts }),
            backoff_factor: 1,
            max_interval_ms: interval_ms,
        }
    }

    /// Multiply the interval by `factor` after each failure, never sleeping
    /// longer than `max_interval_ms`.
    pub const fn with_backoff(mut self, factor: u32, max_interval_ms: u32) -> Self {
        self.backoff_factor = if factor == 0 { 1 } else { factor };
        self.max_interval_ms = if max_interval_ms < self.interval_ms {
            self.interval_ms
        } else {
            max_interval_ms
        };
        self
    }

    /// Base interval in milliseconds.
    pub const fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    /// Attempt budget, `None` when unbounded.
    pub const fn max_attempts(&self) -> Option<u32> {
        self.max_attempts
    }

    /// Whether attempt number `attempt` (1-based) may run.
    pub fn allows(&self, attempt: u32) -> bool {
        match self.max_attempts {
            Some(max) => attempt <= max,
            None => true,
        }
    }

    /// Milliseconds to sleep after failed attempt number `attempt` (1-based).
    pub fn delay_for(&self, attempt: u32) -> u32 {
        let mut delay = self.interval_ms;
        for _ in 1..attempt {
            if self.backoff_factor == 1 || delay >= self.max_interval_ms {
                break;
            }
            delay = delay.saturating_mul(self.backoff_factor);
        }
        delay.min(self.max_interval_ms)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::forever(1_000)
    }
}
