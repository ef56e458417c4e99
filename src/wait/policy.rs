use std::thread;
use std::time::{Duration, Instant};

use crate::browser::driver::PageDriver;

/// Default polling interval between predicate evaluations.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Default timeout for element-level checks (clickability, text, counts).
pub const DEFAULT_ELEMENT_TIMEOUT: Duration = Duration::from_secs(20);

/// Default timeout for page-level checks (title and URL settling after navigation).
pub const DEFAULT_PAGE_TIMEOUT: Duration = Duration::from_secs(30);

/// Bounds for a single wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitSpec {
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl WaitSpec {
    pub fn new(timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            timeout,
            poll_interval,
        }
    }
}

/// How a wait ended. A timeout is an outcome, not an error: callers choose
/// whether to fail or to fall back to reading whatever state exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    Satisfied { elapsed: Duration, polls: u32 },
    TimedOut { elapsed: Duration, polls: u32 },
}

impl WaitOutcome {
    pub fn is_satisfied(&self) -> bool {
        matches!(self, WaitOutcome::Satisfied { .. })
    }

    pub fn elapsed(&self) -> Duration {
        match self {
            WaitOutcome::Satisfied { elapsed, .. } | WaitOutcome::TimedOut { elapsed, .. } => *elapsed,
        }
    }

    pub fn polls(&self) -> u32 {
        match self {
            WaitOutcome::Satisfied { polls, .. } | WaitOutcome::TimedOut { polls, .. } => *polls,
        }
    }
}

/// Timeouts used by the scenario steps, one per kind of check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitConfig {
    pub element_timeout: Duration,
    pub page_timeout: Duration,
    pub poll_interval: Duration,
}

impl WaitConfig {
    pub fn element(&self) -> WaitSpec {
        WaitSpec::new(self.element_timeout, self.poll_interval)
    }

    pub fn page(&self) -> WaitSpec {
        WaitSpec::new(self.page_timeout, self.poll_interval)
    }
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            element_timeout: DEFAULT_ELEMENT_TIMEOUT,
            page_timeout: DEFAULT_PAGE_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// Poll `predicate` against the driver until it holds or `spec.timeout` elapses.
///
/// The predicate is evaluated at least once, and returns as soon as it is
/// true. Sleeps never run past the deadline, so the final evaluation happens
/// right at the timeout rather than one poll interval after it.
pub fn wait_until<P>(driver: &mut dyn PageDriver, spec: &WaitSpec, mut predicate: P) -> WaitOutcome
where
    P: FnMut(&mut dyn PageDriver) -> bool,
{
    let start = Instant::now();
    let mut polls = 0u32;

    loop {
        polls += 1;
        if predicate(driver) {
            return WaitOutcome::Satisfied {
                elapsed: start.elapsed(),
                polls,
            };
        }

        let elapsed = start.elapsed();
        if elapsed >= spec.timeout {
            return WaitOutcome::TimedOut { elapsed, polls };
        }

        let remaining = spec.timeout - elapsed;
        thread::sleep(spec.poll_interval.min(remaining));
    }
}
