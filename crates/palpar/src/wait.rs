//! Polling wait engine.
//!
//! One loop shape serves every wait in the framework: bounded wall-clock
//! budget, a minimum-tries floor that overrides a trivially-expired
//! deadline, escalating sleep between attempts, and a page-source
//! invalidation before each retry so the next evaluation sees live state.
//!
//! Predicates return `PalparResult<bool>` — a technical crash inside a
//! predicate aborts the wait immediately instead of being polled through.

use crate::result::{PalparError, PalparResult};
use crate::session::Session;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Attempts guaranteed even when the deadline is already expired
pub const DEFAULT_MINIMUM_TRIES: u32 = 3;

/// Sleep before the next attempt; escalates with the attempt count so
/// short flakes recheck quickly and long waits stop hammering the device.
#[must_use]
pub const fn backoff_delay(current_try: u32) -> Duration {
    match current_try {
        0..=5 => Duration::from_millis(200),
        6..=10 => Duration::from_millis(500),
        11..=20 => Duration::from_secs(1),
        21..=30 => Duration::from_secs(2),
        _ => Duration::from_secs(3),
    }
}

/// Options for a wait loop
#[derive(Clone)]
pub struct WaitOptions {
    /// Wall-clock budget; `None` uses the session's existence timeout
    pub timeout: Option<Duration>,
    /// Fail with a timeout error instead of returning `false`
    pub assert: bool,
    /// Minimum attempts regardless of the deadline
    pub minimum_tries: u32,
    /// Sleep between attempts (disabled by some scripted-device tests)
    pub sleep_between_tries: bool,
    /// Lazy extra failure detail, evaluated only on exhaustion
    pub failure_message: Option<std::sync::Arc<dyn Fn() -> String + Send + Sync>>,
}

impl std::fmt::Debug for WaitOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WaitOptions")
            .field("timeout", &self.timeout)
            .field("assert", &self.assert)
            .field("minimum_tries", &self.minimum_tries)
            .field("sleep_between_tries", &self.sleep_between_tries)
            .finish_non_exhaustive()
    }
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout: None,
            assert: false,
            minimum_tries: DEFAULT_MINIMUM_TRIES,
            sleep_between_tries: true,
            failure_message: None,
        }
    }
}

impl WaitOptions {
    /// Create default options
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the wall-clock budget
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Fail with an error on exhaustion
    #[must_use]
    pub const fn with_assert(mut self) -> Self {
        self.assert = true;
        self
    }

    /// Disable sleeping between attempts
    #[must_use]
    pub const fn without_sleep(mut self) -> Self {
        self.sleep_between_tries = false;
        self
    }

    /// Attach a lazy failure message, evaluated only on exhaustion
    #[must_use]
    pub fn with_failure_message(
        mut self,
        message: impl Fn() -> String + Send + Sync + 'static,
    ) -> Self {
        self.failure_message = Some(std::sync::Arc::new(message));
        self
    }
}

/// Poll a boolean condition until it holds, the deadline expires, and the
/// minimum-tries floor is exhausted.
///
/// Returns `Ok(true)` on success; `Ok(false)` on exhaustion unless
/// `options.assert` turns exhaustion into a timeout error.
pub fn wait_condition(
    session: &Session,
    condition_name: &str,
    options: &WaitOptions,
    mut predicate: impl FnMut() -> PalparResult<bool>,
) -> PalparResult<bool> {
    let outcome = wait_for_value(session, condition_name, options, || {
        Ok(if predicate()? { Some(()) } else { None })
    })?;
    Ok(outcome.is_some())
}

/// Poll a producing predicate until it yields a value.
///
/// The generic shape behind condition waits and view-data waits: the same
/// deadline, floor, backoff and invalidation schedule, but the success
/// value is returned to the caller.
pub fn wait_for_value<T>(
    session: &Session,
    condition_name: &str,
    options: &WaitOptions,
    mut produce: impl FnMut() -> PalparResult<Option<T>>,
) -> PalparResult<Option<T>> {
    let timeout = options.timeout.unwrap_or(session.config().wait_timeout);
    debug!(condition = condition_name, ?timeout, "waiting for condition");

    let start = Instant::now();
    let mut current_try: u32 = 0;

    while start.elapsed() < timeout || current_try < options.minimum_tries {
        if current_try > 0 {
            trace!(condition = condition_name, try_number = current_try + 1, "retrying");
        }

        if let Some(value) = produce()? {
            debug!(condition = condition_name, tries = current_try + 1, "condition met");
            return Ok(Some(value));
        }

        trace!(condition = condition_name, "condition not met");
        current_try += 1;

        if options.sleep_between_tries {
            std::thread::sleep(backoff_delay(current_try));
        }

        session.invalidate_source();
    }

    let message = options
        .failure_message
        .as_ref()
        .map(|message| message())
        .unwrap_or_default();

    if !message.is_empty() {
        debug!(condition = condition_name, %message, "wait exhausted");
    }

    if options.assert {
        return Err(PalparError::Timeout {
            condition: condition_name.to_string(),
            elapsed_ms: start.elapsed().as_millis() as u64,
            message: if message.is_empty() {
                message
            } else {
                format!(". {message}")
            },
        });
    }

    Ok(None)
}

/// Poll until a condition stops holding (disappearance).
///
/// Pure elapsed-time loop — no minimum-tries floor: a state that is
/// already gone must return immediately even with a zero budget.
pub fn wait_gone(
    session: &Session,
    condition_name: &str,
    timeout: Option<Duration>,
    mut still_present: impl FnMut() -> PalparResult<bool>,
) -> PalparResult<bool> {
    let timeout = timeout.unwrap_or(session.config().disappear_timeout);
    debug!(condition = condition_name, ?timeout, "waiting for disappearance");

    let start = Instant::now();
    loop {
        if !still_present()? {
            debug!(condition = condition_name, "disappeared");
            return Ok(true);
        }

        if start.elapsed() >= timeout {
            debug!(condition = condition_name, "still present after budget");
            return Ok(false);
        }

        trace!(condition = condition_name, "still present, continuing to wait");
        std::thread::sleep(backoff_delay(0));
        session.invalidate_source();
    }
}
