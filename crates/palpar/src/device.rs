//! Device backend façade.
//!
//! The resolution core depends only on this contract, never on a concrete
//! automation transport. Real implementations wrap a WebDriver/Appium
//! client; [`ScriptedDevice`] is the in-memory double used to test the
//! framework itself (and page objects built on it) without a device.

use crate::geometry::{Point, Rect};
use crate::result::{PalparError, PalparResult};
use std::time::Duration;

/// Hardware/system key a test can send
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceKey {
    /// Platform back navigation
    Back,
    /// Home button
    Home,
    /// Enter / return
    Enter,
    /// Delete / backspace
    Delete,
}

/// Contract between the resolution core and a device automation transport.
///
/// Implementations do not cache: freshness is owned by the session layer.
/// `recover` is the transport-restart hook the session invokes once before
/// escalating a transport failure to a technical crash.
pub trait DeviceBackend: Send {
    /// Fetch the raw UI hierarchy XML. `full` requests the unfiltered
    /// variant on platforms that distinguish the two.
    fn page_source(&mut self, full: bool) -> PalparResult<String>;

    /// Tap physical coordinates, `times` in quick succession
    fn tap(&mut self, x: i32, y: i32, times: u32) -> PalparResult<()>;

    /// Drag between two physical coordinates over `duration`
    fn drag(&mut self, from: Point, to: Point, duration: Duration) -> PalparResult<()>;

    /// Type text into the focused element
    fn enter_text(&mut self, text: &str) -> PalparResult<()>;

    /// Clear the focused element's text
    fn clear_text(&mut self) -> PalparResult<()>;

    /// Send a hardware/system key
    fn press_key(&mut self, key: DeviceKey) -> PalparResult<()>;

    /// Dismiss the on-screen keyboard
    fn hide_keyboard(&mut self) -> PalparResult<()>;

    /// Launch (or foreground) an app
    fn launch_app(&mut self, bundle_id: &str) -> PalparResult<()>;

    /// Terminate an app
    fn terminate_app(&mut self, bundle_id: &str) -> PalparResult<()>;

    /// Open a deep link
    fn open_deep_link(&mut self, url: &str) -> PalparResult<()>;

    /// Whether the on-screen keyboard is currently shown
    fn is_keyboard_visible(&mut self) -> PalparResult<bool>;

    /// Physical screen rectangle
    fn screen_rect(&self) -> Rect;

    /// Device pixels per density-independent pixel
    fn pixel_density(&self) -> f64;

    /// Restart the transport after a failure; default is a no-op
    fn recover(&mut self) -> PalparResult<()> {
        Ok(())
    }
}

/// One recorded backend operation (scripted device only)
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceOp {
    /// Page source fetch
    FetchSource {
        /// Whether the full hierarchy was requested
        full: bool,
    },
    /// Coordinate tap
    Tap {
        /// X coordinate
        x: i32,
        /// Y coordinate
        y: i32,
        /// Tap count
        times: u32,
    },
    /// Coordinate drag
    Drag {
        /// Start point
        from: Point,
        /// End point
        to: Point,
    },
    /// Text entry
    EnterText(String),
    /// Text clearing
    ClearText,
    /// Key press
    PressKey(DeviceKey),
    /// Keyboard dismissal
    HideKeyboard,
    /// App launch
    LaunchApp(String),
    /// App termination
    TerminateApp(String),
    /// Deep link
    OpenDeepLink(String),
    /// Transport recovery
    Recover,
}

/// In-memory device double: serves a scripted sequence of page sources and
/// records every operation for assertions.
///
/// Each fetch advances to the next scripted frame; the last frame repeats
/// forever, so a "static screen" is a single frame.
#[derive(Debug)]
pub struct ScriptedDevice {
    frames: Vec<String>,
    cursor: usize,
    advance_on_gesture: bool,
    gesture_pending: bool,
    ops: Vec<DeviceOp>,
    keyboard_visible: bool,
    screen: Rect,
    density: f64,
    failures_to_inject: u32,
}

impl Default for ScriptedDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedDevice {
    /// Create a device with no frames (fetch fails until frames are added)
    #[must_use]
    pub fn new() -> Self {
        Self {
            frames: Vec::new(),
            cursor: 0,
            advance_on_gesture: false,
            gesture_pending: false,
            ops: Vec::new(),
            keyboard_visible: false,
            screen: Rect::new(0, 0, 1080, 2400),
            density: 2.625,
            failures_to_inject: 0,
        }
    }

    /// Append a scripted page-source frame
    #[must_use]
    pub fn with_frame(mut self, xml: impl Into<String>) -> Self {
        self.frames.push(xml.into());
        self
    }

    /// Advance frames on gestures (tap/drag) instead of on every fetch —
    /// models a screen that only changes when interacted with.
    #[must_use]
    pub const fn with_frame_per_gesture(mut self) -> Self {
        self.advance_on_gesture = true;
        self
    }

    /// Set the physical screen rectangle
    #[must_use]
    pub const fn with_screen(mut self, screen: Rect) -> Self {
        self.screen = screen;
        self
    }

    /// Set the pixel density
    #[must_use]
    pub const fn with_density(mut self, density: f64) -> Self {
        self.density = density;
        self
    }

    /// Report the keyboard as visible
    #[must_use]
    pub const fn with_keyboard_visible(mut self, visible: bool) -> Self {
        self.keyboard_visible = visible;
        self
    }

    /// Make the next `count` fetches fail with a transport error
    #[must_use]
    pub const fn with_transport_failures(mut self, count: u32) -> Self {
        self.failures_to_inject = count;
        self
    }

    /// Recorded operations, in order
    #[must_use]
    pub fn ops(&self) -> &[DeviceOp] {
        &self.ops
    }

    /// Number of page-source fetches performed
    #[must_use]
    pub fn fetch_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, DeviceOp::FetchSource { .. }))
            .count()
    }

    /// Number of drags performed
    #[must_use]
    pub fn drag_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, DeviceOp::Drag { .. }))
            .count()
    }

    fn record_gesture(&mut self, op: DeviceOp) {
        self.ops.push(op);
        if self.advance_on_gesture {
            self.gesture_pending = true;
        }
    }
}

impl DeviceBackend for ScriptedDevice {
    fn page_source(&mut self, full: bool) -> PalparResult<String> {
        self.ops.push(DeviceOp::FetchSource { full });

        if self.failures_to_inject > 0 {
            self.failures_to_inject -= 1;
            return Err(PalparError::Driver {
                message: "scripted transport failure".to_string(),
            });
        }

        if self.gesture_pending {
            self.gesture_pending = false;
            if self.cursor + 1 < self.frames.len() {
                self.cursor += 1;
            }
        }

        let frame = self.frames.get(self.cursor).cloned();
        if !self.advance_on_gesture && self.cursor + 1 < self.frames.len() {
            self.cursor += 1;
        }

        frame.ok_or_else(|| PalparError::Driver {
            message: "scripted device has no frames".to_string(),
        })
    }

    fn tap(&mut self, x: i32, y: i32, times: u32) -> PalparResult<()> {
        self.record_gesture(DeviceOp::Tap { x, y, times });
        Ok(())
    }

    fn drag(&mut self, from: Point, to: Point, _duration: Duration) -> PalparResult<()> {
        self.record_gesture(DeviceOp::Drag { from, to });
        Ok(())
    }

    fn enter_text(&mut self, text: &str) -> PalparResult<()> {
        self.record_gesture(DeviceOp::EnterText(text.to_string()));
        Ok(())
    }

    fn clear_text(&mut self) -> PalparResult<()> {
        self.record_gesture(DeviceOp::ClearText);
        Ok(())
    }

    fn press_key(&mut self, key: DeviceKey) -> PalparResult<()> {
        self.record_gesture(DeviceOp::PressKey(key));
        Ok(())
    }

    fn hide_keyboard(&mut self) -> PalparResult<()> {
        self.keyboard_visible = false;
        self.record_gesture(DeviceOp::HideKeyboard);
        Ok(())
    }

    fn launch_app(&mut self, bundle_id: &str) -> PalparResult<()> {
        self.record_gesture(DeviceOp::LaunchApp(bundle_id.to_string()));
        Ok(())
    }

    fn terminate_app(&mut self, bundle_id: &str) -> PalparResult<()> {
        self.record_gesture(DeviceOp::TerminateApp(bundle_id.to_string()));
        Ok(())
    }

    fn open_deep_link(&mut self, url: &str) -> PalparResult<()> {
        self.record_gesture(DeviceOp::OpenDeepLink(url.to_string()));
        Ok(())
    }

    fn is_keyboard_visible(&mut self) -> PalparResult<bool> {
        Ok(self.keyboard_visible)
    }

    fn screen_rect(&self) -> Rect {
        self.screen
    }

    fn pixel_density(&self) -> f64 {
        self.density
    }

    fn recover(&mut self) -> PalparResult<()> {
        self.ops.push(DeviceOp::Recover);
        Ok(())
    }
}

impl ScriptedDevice {
    /// Wrap into a cheap-clone handle so a test can keep inspecting the
    /// device after handing it to a session.
    #[must_use]
    pub fn into_shared(self) -> SharedScriptedDevice {
        SharedScriptedDevice {
            inner: std::sync::Arc::new(std::sync::Mutex::new(self)),
        }
    }
}

/// Cheap-clone handle over a [`ScriptedDevice`].
///
/// The session owns one clone as its backend; the test keeps another to
/// assert on recorded operations and fetch counts.
#[derive(Debug, Clone)]
pub struct SharedScriptedDevice {
    inner: std::sync::Arc<std::sync::Mutex<ScriptedDevice>>,
}

impl SharedScriptedDevice {
    /// Run an inspection closure against the underlying device
    pub fn inspect<T>(&self, inspect: impl FnOnce(&ScriptedDevice) -> T) -> T {
        inspect(&self.inner.lock().expect("scripted device mutex poisoned"))
    }

    fn with<T>(&self, run: impl FnOnce(&mut ScriptedDevice) -> T) -> T {
        run(&mut self.inner.lock().expect("scripted device mutex poisoned"))
    }
}

impl DeviceBackend for SharedScriptedDevice {
    fn page_source(&mut self, full: bool) -> PalparResult<String> {
        self.with(|device| device.page_source(full))
    }

    fn tap(&mut self, x: i32, y: i32, times: u32) -> PalparResult<()> {
        self.with(|device| device.tap(x, y, times))
    }

    fn drag(&mut self, from: Point, to: Point, duration: Duration) -> PalparResult<()> {
        self.with(|device| device.drag(from, to, duration))
    }

    fn enter_text(&mut self, text: &str) -> PalparResult<()> {
        self.with(|device| device.enter_text(text))
    }

    fn clear_text(&mut self) -> PalparResult<()> {
        self.with(|device| device.clear_text())
    }

    fn press_key(&mut self, key: DeviceKey) -> PalparResult<()> {
        self.with(|device| device.press_key(key))
    }

    fn hide_keyboard(&mut self) -> PalparResult<()> {
        self.with(|device| device.hide_keyboard())
    }

    fn launch_app(&mut self, bundle_id: &str) -> PalparResult<()> {
        self.with(|device| device.launch_app(bundle_id))
    }

    fn terminate_app(&mut self, bundle_id: &str) -> PalparResult<()> {
        self.with(|device| device.terminate_app(bundle_id))
    }

    fn open_deep_link(&mut self, url: &str) -> PalparResult<()> {
        self.with(|device| device.open_deep_link(url))
    }

    fn is_keyboard_visible(&mut self) -> PalparResult<bool> {
        self.with(|device| device.is_keyboard_visible())
    }

    fn screen_rect(&self) -> Rect {
        self.inspect(|device| device.screen_rect())
    }

    fn pixel_density(&self) -> f64 {
        self.inspect(|device| device.pixel_density())
    }

    fn recover(&mut self) -> PalparResult<()> {
        self.with(|device| device.recover())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frames_advance_per_fetch() {
        let mut device = ScriptedDevice::new().with_frame("<a/>").with_frame("<b/>");
        assert_eq!(device.page_source(false).unwrap(), "<a/>");
        assert_eq!(device.page_source(false).unwrap(), "<b/>");
        // Last frame repeats.
        assert_eq!(device.page_source(false).unwrap(), "<b/>");
        assert_eq!(device.fetch_count(), 3);
    }

    #[test]
    fn test_frames_advance_per_gesture() {
        let mut device = ScriptedDevice::new()
            .with_frame("<a/>")
            .with_frame("<b/>")
            .with_frame_per_gesture();
        assert_eq!(device.page_source(false).unwrap(), "<a/>");
        assert_eq!(device.page_source(false).unwrap(), "<a/>");
        device.tap(1, 1, 1).unwrap();
        assert_eq!(device.page_source(false).unwrap(), "<b/>");
    }

    #[test]
    fn test_ops_are_recorded_in_order() {
        let mut device = ScriptedDevice::new().with_frame("<a/>");
        device.tap(10, 20, 1).unwrap();
        device.enter_text("hi").unwrap();
        assert_eq!(
            device.ops(),
            &[
                DeviceOp::Tap {
                    x: 10,
                    y: 20,
                    times: 1
                },
                DeviceOp::EnterText("hi".to_string()),
            ]
        );
    }

    #[test]
    fn test_injected_transport_failure() {
        let mut device = ScriptedDevice::new()
            .with_frame("<a/>")
            .with_transport_failures(1);
        assert!(matches!(
            device.page_source(false),
            Err(PalparError::Driver { .. })
        ));
        assert_eq!(device.page_source(false).unwrap(), "<a/>");
    }

    #[test]
    fn test_no_frames_is_a_driver_error() {
        let mut device = ScriptedDevice::new();
        assert!(device.page_source(false).is_err());
    }
}
