//! Device session: backend ownership, page-source caching, invalidation.
//!
//! One `Session` = one device. The page-source cache lives here — never in
//! process-wide state — so concurrent sessions (including the framework's
//! own tests) cannot interfere. Every device-mutating operation routed
//! through the session invalidates the cache before it runs; this is the
//! single most safety-critical invariant in the system, because anything
//! resolved from a stale hierarchy taps stale geometry.
//!
//! The session is a cheap-clone handle (`Arc` inside). The design contract
//! is still single-threaded per device session: the internal mutexes make
//! sharing sound, not concurrent automation meaningful.

use crate::device::{DeviceBackend, DeviceKey};
use crate::geometry::{Point, Rect};
use crate::platform::{Platform, PlatformDialect};
use crate::result::{PalparError, PalparResult};
use crate::xml;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Default budget for waiting a view into existence
pub const VIEW_WAIT_TIMEOUT: Duration = Duration::from_secs(9);

/// Default budget for waiting a view to disappear
pub const VIEW_DISAPPEAR_TIMEOUT: Duration = Duration::from_secs(6);

/// Default budget for waiting a device-log line (used by log-collector
/// integrations built on the generic condition wait)
pub const LOG_CONTAINS_TIMEOUT: Duration = Duration::from_secs(7);

/// Default delay between existence rechecks
pub const RECHECK_DELAY: Duration = Duration::from_millis(200);

/// Default duration of a drag gesture
pub const DRAG_DURATION: Duration = Duration::from_millis(600);

/// Per-session configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Platform under automation
    pub platform: Platform,
    /// App package/bundle identifier (scopes Android resource ids)
    pub package_id: String,
    /// Budget for waiting a view into existence
    pub wait_timeout: Duration,
    /// Budget for waiting a view to disappear
    pub disappear_timeout: Duration,
    /// Budget for waiting a device-log line
    pub log_wait_timeout: Duration,
    /// Drag gesture duration
    pub drag_duration: Duration,
    /// Settle delay after a vertical scroll drag
    pub scroll_settle_delay: Duration,
    /// Settle delay after a horizontal swipe drag
    pub swipe_settle_delay: Duration,
    /// Settle delay after taps and other point actions
    pub action_settle_delay: Duration,
}

impl SessionConfig {
    /// Platform defaults (settle delays differ between platforms to absorb
    /// their animation timing)
    #[must_use]
    pub fn new(platform: Platform, package_id: impl Into<String>) -> Self {
        let (swipe_settle, action_settle) = match platform {
            Platform::Android => (Duration::from_millis(900), Duration::from_millis(150)),
            Platform::Ios => (Duration::from_millis(400), Duration::from_millis(200)),
        };
        Self {
            platform,
            package_id: package_id.into(),
            wait_timeout: VIEW_WAIT_TIMEOUT,
            disappear_timeout: VIEW_DISAPPEAR_TIMEOUT,
            log_wait_timeout: LOG_CONTAINS_TIMEOUT,
            drag_duration: DRAG_DURATION,
            scroll_settle_delay: Duration::from_millis(600),
            swipe_settle_delay: swipe_settle,
            action_settle_delay: action_settle,
        }
    }

    /// Override the existence wait budget
    #[must_use]
    pub const fn with_wait_timeout(mut self, timeout: Duration) -> Self {
        self.wait_timeout = timeout;
        self
    }

    /// Override the disappearance wait budget
    #[must_use]
    pub const fn with_disappear_timeout(mut self, timeout: Duration) -> Self {
        self.disappear_timeout = timeout;
        self
    }

    /// Zero every settle delay — scripted-device tests have no animations
    #[must_use]
    pub const fn without_settle_delays(mut self) -> Self {
        self.scroll_settle_delay = Duration::ZERO;
        self.swipe_settle_delay = Duration::ZERO;
        self.action_settle_delay = Duration::ZERO;
        self
    }
}

struct SessionInner {
    id: Uuid,
    config: SessionConfig,
    device: Mutex<Box<dyn DeviceBackend>>,
    cache: Mutex<Option<String>>,
}

/// Handle to one device automation session
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.inner.id)
            .field("platform", &self.inner.config.platform)
            .field("package_id", &self.inner.config.package_id)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Attach to a device backend
    #[must_use]
    pub fn new(config: SessionConfig, device: Box<dyn DeviceBackend>) -> Self {
        let session = Self {
            inner: Arc::new(SessionInner {
                id: Uuid::new_v4(),
                config,
                device: Mutex::new(device),
                cache: Mutex::new(None),
            }),
        };
        info!(
            session = %session.inner.id,
            platform = %session.platform(),
            "session attached"
        );
        session
    }

    /// Session identifier (logs)
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    /// Session configuration
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.inner.config
    }

    /// Platform under automation
    #[must_use]
    pub fn platform(&self) -> Platform {
        self.inner.config.platform
    }

    /// The platform dialect, selected once per session
    #[must_use]
    pub fn dialect(&self) -> &'static dyn PlatformDialect {
        self.inner.config.platform.dialect()
    }

    /// App package identifier
    #[must_use]
    pub fn package_id(&self) -> &str {
        &self.inner.config.package_id
    }

    /// Run a backend command with the restart-and-retry policy: one
    /// transport failure triggers `recover()` and a single retry; a second
    /// failure escalates to a technical crash.
    fn with_device<T>(
        &self,
        op_name: &str,
        mut command: impl FnMut(&mut dyn DeviceBackend) -> PalparResult<T>,
    ) -> PalparResult<T> {
        let mut device = self.inner.device.lock().expect("device mutex poisoned");
        match command(device.as_mut()) {
            Ok(value) => Ok(value),
            Err(PalparError::Driver { message }) => {
                warn!(op = op_name, %message, "transport failure, recovering backend");
                device.recover()?;
                command(device.as_mut()).map_err(|err| PalparError::TechnicalCrash {
                    message: format!("'{op_name}' failed after backend recovery: {err}"),
                })
            }
            Err(other) => Err(other),
        }
    }

    /// Current page source, cached until the next mutating operation.
    ///
    /// `context` labels the fetch in logs. `full` requests the unfiltered
    /// hierarchy (iOS only; views that must see platform-hidden elements
    /// are flagged for it).
    pub fn screen_xml(&self, context: &str, full: bool) -> PalparResult<String> {
        if let Some(cached) = self.inner.cache.lock().expect("cache mutex poisoned").clone() {
            return Ok(cached);
        }

        debug!(context, full, "fetching page source");
        let raw = self.with_device("page_source", |device| device.page_source(full))?;

        let source = match self.platform() {
            Platform::Android => raw,
            Platform::Ios => {
                if full {
                    xml::rewrite_ios_full_source(&raw)?
                } else {
                    xml::rewrite_ios_source(&raw, self.device_rect())?
                }
            }
        };

        *self.inner.cache.lock().expect("cache mutex poisoned") = Some(source.clone());
        Ok(source)
    }

    /// Drop the cached page source; the next read fetches live.
    pub fn invalidate_source(&self) {
        *self.inner.cache.lock().expect("cache mutex poisoned") = None;
    }

    /// Cached page source, if any (diagnostics and invariant tests)
    #[must_use]
    pub fn cached_source(&self) -> Option<String> {
        self.inner.cache.lock().expect("cache mutex poisoned").clone()
    }

    /// Physical screen rectangle
    #[must_use]
    pub fn device_rect(&self) -> Rect {
        self.inner
            .device
            .lock()
            .expect("device mutex poisoned")
            .screen_rect()
    }

    /// Convert density-independent pixels to device pixels
    #[must_use]
    pub fn dp_to_px(&self, dp: i32) -> i32 {
        let density = self
            .inner
            .device
            .lock()
            .expect("device mutex poisoned")
            .pixel_density();
        (f64::from(dp) * density).round() as i32
    }

    /// Tap physical coordinates
    pub fn tap(&self, x: i32, y: i32, times: u32) -> PalparResult<()> {
        if times < 1 {
            return Err(PalparError::TechnicalCrash {
                message: "tap count must be at least 1".to_string(),
            });
        }
        self.invalidate_source();
        debug!(x, y, times, "tapping");
        self.with_device("tap", |device| device.tap(x, y, times))
    }

    /// Drag between physical coordinates
    pub fn drag(&self, from: Point, to: Point, duration: Option<Duration>) -> PalparResult<()> {
        self.invalidate_source();
        let duration = duration.unwrap_or(self.inner.config.drag_duration);
        debug!(%from, %to, ?duration, "dragging");
        self.with_device("drag", |device| device.drag(from, to, duration))
    }

    /// Type text into the focused element
    pub fn enter_text(&self, text: &str) -> PalparResult<()> {
        self.invalidate_source();
        self.with_device("enter_text", |device| device.enter_text(text))
    }

    /// Clear the focused element's text
    pub fn clear_text(&self) -> PalparResult<()> {
        self.invalidate_source();
        self.with_device("clear_text", |device| device.clear_text())
    }

    /// Send a hardware/system key
    pub fn press_key(&self, key: DeviceKey) -> PalparResult<()> {
        self.invalidate_source();
        self.with_device("press_key", |device| device.press_key(key))
    }

    /// Dismiss the on-screen keyboard
    pub fn hide_keyboard(&self) -> PalparResult<()> {
        self.invalidate_source();
        self.with_device("hide_keyboard", |device| device.hide_keyboard())
    }

    /// Launch (or foreground) an app
    pub fn launch_app(&self, bundle_id: &str) -> PalparResult<()> {
        self.invalidate_source();
        info!(bundle_id, "launching app");
        self.with_device("launch_app", |device| device.launch_app(bundle_id))
    }

    /// Terminate an app
    pub fn terminate_app(&self, bundle_id: &str) -> PalparResult<()> {
        self.invalidate_source();
        info!(bundle_id, "terminating app");
        self.with_device("terminate_app", |device| device.terminate_app(bundle_id))
    }

    /// Open a deep link
    pub fn open_deep_link(&self, url: &str) -> PalparResult<()> {
        self.invalidate_source();
        info!(url, "opening deep link");
        self.with_device("open_deep_link", |device| device.open_deep_link(url))
    }

    /// Whether the on-screen keyboard is currently shown (read-only; does
    /// not touch the cache)
    pub fn is_keyboard_visible(&self) -> PalparResult<bool> {
        self.with_device("is_keyboard_visible", |device| device.is_keyboard_visible())
    }

}
