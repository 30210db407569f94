//! Bounded retry with a fixed delay for I/O that can hit transient lock
//! contention.

use std::io;
use std::thread;
use std::time::Duration;

use kermut_core::config::DataConfig;
use kermut_core::constants::{DEFAULT_READ_ATTEMPTS, DEFAULT_READ_RETRY_DELAY_SECS};
use tracing::warn;

/// Blocks the current thread between attempts. Injectable for tests.
pub trait Sleeper {
    fn sleep(&self, delay: Duration);
}

impl<S: Sleeper + ?Sized> Sleeper for &S {
    fn sleep(&self, delay: Duration) {
        (**self).sleep(delay);
    }
}

/// Sleeps on the real clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, delay: Duration) {
        thread::sleep(delay);
    }
}

/// Attempt bound and fixed delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_READ_ATTEMPTS,
            delay: Duration::from_secs(DEFAULT_READ_RETRY_DELAY_SECS),
        }
    }
}

impl RetryPolicy {
    pub fn from_config(config: &DataConfig) -> Self {
        Self {
            max_attempts: config.read_attempts.max(1),
            delay: config.read_retry_delay(),
        }
    }
}

/// Errors worth another attempt: a lock held by a writer, an interrupted
/// call, or a timeout. Everything else is permanent.
pub fn is_transient(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted | io::ErrorKind::TimedOut
    )
}

/// Run `op` until it succeeds, fails permanently, or `policy.max_attempts`
/// attempts have been made. `op` receives the 1-based attempt number.
///
/// The delay is slept between attempts only, never after the last one.
/// When attempts run out the last error is returned unchanged.
pub fn retry_io<T, F>(policy: &RetryPolicy, sleeper: &dyn Sleeper, mut op: F) -> io::Result<T>
where
    F: FnMut(u32) -> io::Result<T>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match op(attempt) {
            Ok(value) => return Ok(value),
            Err(err) if is_transient(&err) && attempt < max_attempts => {
                warn!(
                    attempt,
                    max_attempts,
                    delay_ms = policy.delay.as_millis() as u64,
                    error = %err,
                    "transient I/O failure, retrying"
                );
                sleeper.sleep(policy.delay);
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
