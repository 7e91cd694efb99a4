use std::fmt::Display;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, warn};

pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(200);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    /// Delay between two probes
    pub interval: Duration,
    /// Upper bound on the whole wait
    pub timeout: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl PollSettings {
    pub fn from_millis(interval_ms: u64, timeout_ms: u64) -> Self {
        Self {
            interval: Duration::from_millis(interval_ms),
            timeout: Duration::from_millis(timeout_ms),
        }
    }
}

/// How a poll ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome<T> {
    /// The probe produced a value
    Ready(T),
    /// The timeout elapsed before the probe produced a value
    TimedOut,
    /// The probe returned an error; it is never retried
    Failed(String),
}

impl<T> PollOutcome<T> {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    pub fn ready(self) -> Option<T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }
}

/// Run `probe` until it yields a value, fails, or `settings.timeout` elapses.
///
/// The first probe runs before any timer is armed, so an immediately available
/// value costs no tick. Dropping the returned future stops the polling.
pub async fn poll_for<T, E, F>(mut probe: F, settings: PollSettings) -> PollOutcome<T>
where
    F: FnMut() -> Result<Option<T>, E>,
    E: Display,
{
    let start = Instant::now();
    let mut attempts: u32 = 0;

    loop {
        attempts += 1;
        match probe() {
            Ok(Some(value)) => {
                debug!(attempts, elapsed_ms = start.elapsed().as_millis() as u64, "poll ready");
                return PollOutcome::Ready(value);
            }
            Ok(None) => {}
            Err(e) => {
                warn!(attempts, error = %e, "poll probe failed, giving up");
                return PollOutcome::Failed(e.to_string());
            }
        }

        let elapsed = start.elapsed();
        if elapsed >= settings.timeout {
            debug!(
                attempts,
                timeout_ms = settings.timeout.as_millis() as u64,
                "poll timed out"
            );
            return PollOutcome::TimedOut;
        }
        tokio::time::sleep(settings.interval.min(settings.timeout - elapsed)).await;
    }
}

/// Poll a fallible boolean predicate.
pub async fn poll_until<E, F>(mut predicate: F, settings: PollSettings) -> PollOutcome<()>
where
    F: FnMut() -> Result<bool, E>,
    E: Display,
{
    poll_for(|| predicate().map(|met| met.then_some(())), settings).await
}

/// Resolve `true` once `predicate` holds, `false` on timeout.
pub async fn wait_for_condition<F>(mut predicate: F, settings: PollSettings) -> bool
where
    F: FnMut() -> bool,
{
    poll_until(|| Ok::<_, std::convert::Infallible>(predicate()), settings)
        .await
        .is_ready()
}

/// Like [`wait_for_condition`], but a predicate error also resolves `false`.
/// The two failure modes are told apart only in the logs.
pub async fn try_wait_for_condition<E, F>(predicate: F, settings: PollSettings) -> bool
where
    F: FnMut() -> Result<bool, E>,
    E: Display,
{
    poll_until(predicate, settings).await.is_ready()
}

/// Wait until `probe` finds something, e.g. an element or a line of text.
pub async fn wait_for_value<T, E, F>(probe: F, settings: PollSettings) -> Option<T>
where
    F: FnMut() -> Result<Option<T>, E>,
    E: Display,
{
    poll_for(probe, settings).await.ready()
}
