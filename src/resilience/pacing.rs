//! Fixed-rate call pacing.
//!
//! A `Pacer` waits its full interval before every call, including the first
//! one of the run. There is no burst allowance.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Timed pause. Injected so tests can observe waits without sleeping.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Sleeps on the Tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Enforces a minimum delay before each call.
#[derive(Clone)]
pub struct Pacer {
    interval: Duration,
    sleeper: Arc<dyn Sleeper>,
}

impl Pacer {
    pub fn new(interval: Duration, sleeper: Arc<dyn Sleeper>) -> Self {
        Self { interval, sleeper }
    }

    /// Wait before the next call.
    pub async fn pace(&self) {
        if !self.interval.is_zero() {
            self.sleeper.sleep(self.interval).await;
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl std::fmt::Debug for Pacer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pacer").field("interval", &self.interval).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorded(Mutex<Vec<Duration>>);

    #[async_trait]
    impl Sleeper for Recorded {
        async fn sleep(&self, duration: Duration) {
            self.0.lock().unwrap().push(duration);
        }
    }

    #[tokio::test]
    async fn test_pacer_waits_before_first_call() {
        let sleeper = Arc::new(Recorded::default());
        let pacer = Pacer::new(Duration::from_millis(100), sleeper.clone());

        pacer.pace().await;
        pacer.pace().await;

        assert_eq!(
            *sleeper.0.lock().unwrap(),
            vec![Duration::from_millis(100), Duration::from_millis(100)]
        );
    }

    #[tokio::test]
    async fn test_zero_interval_never_sleeps() {
        let sleeper = Arc::new(Recorded::default());
        let pacer = Pacer::new(Duration::ZERO, sleeper.clone());

        pacer.pace().await;
        assert!(sleeper.0.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_tokio_sleeper_elapses() {
        let start = std::time::Instant::now();
        TokioSleeper.sleep(Duration::from_millis(20)).await;
        assert!(start.elapsed() >= Duration::from_millis(20));
    }
}
