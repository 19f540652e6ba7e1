//! Bounded retry with optional backoff

use std::future::Future;
use std::time::Duration;

/// How long to keep probing and how far apart
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total probes, including the first one; zero still probes once
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    /// Applied to the delay after every failed probe; 1.0 keeps it fixed
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 100,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(1),
            multiplier: 1.0,
        }
    }
}

impl RetryPolicy {
    /// A single probe, no waiting
    pub fn once() -> Self {
        Self {
            max_attempts: 1,
            initial_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            multiplier: 1.0,
        }
    }

    /// Delay after the failed probe number `attempt` (0-based)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = self.multiplier.max(1.0).powi(attempt.min(i32::MAX as u32) as i32);
        let millis = self.initial_delay.as_millis() as f64 * factor;
        let delay = Duration::from_millis(millis.min(u64::MAX as f64) as u64);
        delay.min(self.max_delay.max(self.initial_delay))
    }

    /// Upper bound on time spent sleeping between probes
    pub fn total_budget(&self) -> Duration {
        (0..self.max_attempts.saturating_sub(1))
            .map(|attempt| self.delay_for(attempt))
            .sum()
    }
}

/// Outcome of a bounded probe loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Readiness<T> {
    Ready(T),
    NotReady { attempts: u32 },
}

impl<T> Readiness<T> {
    pub fn is_ready(&self) -> bool {
        matches!(self, Readiness::Ready(_))
    }
}

/// Call `probe` until it yields a value or the policy runs out
pub async fn retry_until_ready<T, F, Fut>(policy: &RetryPolicy, mut probe: F) -> Readiness<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Option<T>>,
{
    let attempts = policy.max_attempts.max(1);
    for attempt in 0..attempts {
        if let Some(value) = probe(attempt).await {
            tracing::debug!("Ready after {} attempt(s)", attempt + 1);
            return Readiness::Ready(value);
        }
        if attempt + 1 < attempts {
            tokio::time::sleep(policy.delay_for(attempt)).await;
        }
    }
    Readiness::NotReady { attempts }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_interval_default() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(0), Duration::from_millis(100));
        assert_eq!(policy.delay_for(50), Duration::from_millis(100));
        assert_eq!(policy.total_budget(), Duration::from_millis(9900));
    }

    #[test]
    fn test_backoff_is_capped() {
        let policy = RetryPolicy {
            max_attempts: 10,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_millis(500),
            multiplier: 2.0,
        };
        assert_eq!(policy.delay_for(0), Duration::from_millis(100));
        assert_eq!(policy.delay_for(1), Duration::from_millis(200));
        assert_eq!(policy.delay_for(2), Duration::from_millis(400));
        assert_eq!(policy.delay_for(3), Duration::from_millis(500));
        assert_eq!(policy.delay_for(30), Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_ready_on_third_attempt() {
        let policy = RetryPolicy {
            max_attempts: 5,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_millis(100),
            multiplier: 1.0,
        };
        let start = tokio::time::Instant::now();
        let result = retry_until_ready(&policy, |attempt| async move {
            (attempt == 2).then_some("host")
        })
        .await;
        assert_eq!(result, Readiness::Ready("host"));
        assert_eq!(start.elapsed(), Duration::from_millis(200));
    }

    #[tokio::test(start_paused = true)]
    async fn test_not_ready_after_budget() {
        let policy = RetryPolicy {
            max_attempts: 3,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_millis(100),
            multiplier: 1.0,
        };
        let mut calls = 0;
        let result: Readiness<()> = retry_until_ready(&policy, |_| {
            calls += 1;
            async { None }
        })
        .await;
        assert_eq!(result, Readiness::NotReady { attempts: 3 });
        assert_eq!(calls, 3);
    }

    #[tokio::test]
    async fn test_zero_attempts_still_probes_once() {
        let policy = RetryPolicy {
            max_attempts: 0,
            ..RetryPolicy::once()
        };
        let result = retry_until_ready(&policy, |_| async { Some(1) }).await;
        assert!(result.is_ready());
    }
}
