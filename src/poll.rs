//! Bounded condition polling.
//!
//! The navigator never sleeps for a fixed interval and hopes the page is
//! ready; it polls an observable condition at a fixed interval under a
//! bounded deadline. This keeps every suspension point explicit and lets
//! tests drive the primitive with millisecond budgets instead of real
//! page-load waits.

use std::error::Error;
use std::thread;
use std::time::{Duration, Instant};

/// Deadline and probe interval for one poll.
#[derive(Debug, Clone, Copy)]
pub struct PollConfig {
    /// Total time budget before giving up.
    pub timeout: Duration,
    /// Fixed pause between probes.
    pub interval: Duration,
}

impl PollConfig {
    pub fn new(timeout: Duration, interval: Duration) -> Self {
        Self { timeout, interval }
    }
}

/// Poll `condition` until it reports `true` or the deadline elapses.
///
/// The condition is probed once immediately, then at the configured fixed
/// interval. Returns `Ok(true)` when the condition was met within the
/// budget, `Ok(false)` on timeout, and propagates the first probe error.
pub fn poll_until<F>(config: PollConfig, mut condition: F) -> Result<bool, Box<dyn Error>>
where
    F: FnMut() -> Result<bool, Box<dyn Error>>,
{
    let deadline = Instant::now() + config.timeout;
    loop {
        if condition()? {
            return Ok(true);
        }
        if Instant::now() >= deadline {
            return Ok(false);
        }
        thread::sleep(config.interval);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick() -> PollConfig {
        PollConfig::new(Duration::from_millis(50), Duration::from_millis(1))
    }

    #[test]
    fn test_condition_met_immediately() {
        let met = poll_until(quick(), || Ok(true)).unwrap();
        assert!(met);
    }

    #[test]
    fn test_condition_met_after_a_few_probes() {
        let mut probes = 0;
        let met = poll_until(quick(), || {
            probes += 1;
            Ok(probes >= 3)
        })
        .unwrap();
        assert!(met);
        assert_eq!(probes, 3);
    }

    #[test]
    fn test_timeout_reports_false() {
        let met = poll_until(quick(), || Ok(false)).unwrap();
        assert!(!met);
    }

    #[test]
    fn test_probe_error_propagates() {
        let result = poll_until(quick(), || Err("probe exploded".into()));
        assert!(result.is_err());
    }
}
