//! Palpar: Rust-native page-object core for mobile UI test automation.
//!
//! Palpar (Spanish: "to touch/feel") is the resolution engine of a
//! page-object-style test framework for Android and iOS: platform-aware
//! XPath query composition, polling waits with escalating backoff,
//! scroll-until-found with change detection, and a per-session page-source
//! cache whose invalidation keeps everything consistent with the live
//! device.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                     PALPAR Architecture                          │
//! ├──────────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐   ┌────────────┐   ┌───────────┐   ┌───────────┐  │
//! │  │ Page      │   │ Wait /     │   │ XPath     │   │ Page-     │  │
//! │  │ Objects   │──►│ Scroll     │──►│ Evaluator │──►│ Source    │  │
//! │  │ (Views)   │   │ Engines    │   │           │   │ Cache     │  │
//! │  └───────────┘   └────────────┘   └───────────┘   └─────┬─────┘  │
//! │                                                         ▼        │
//! │                      DeviceBackend trait  ◄── Appium / scripted  │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A view holds a composed query; on access the wait engine polls the
//! evaluator; the evaluator reads XML through the session cache
//! (re-fetching from the device on a miss); matches become
//! [`viewdata::ViewData`] snapshots. When a target is off-screen, the
//! scroll engine drives gestures and re-enters the same loop.
//!
//! # Example
//!
//! ```no_run
//! use palpar::prelude::*;
//!
//! # fn backend() -> Box<dyn DeviceBackend> { unimplemented!() }
//! # fn main() -> PalparResult<()> {
//! let session = Session::new(
//!     SessionConfig::new(Platform::Android, "com.example.app"),
//!     backend(),
//! );
//!
//! let screen = View::screen(&session, "VaultScreen", Query::new().id("vault_screen"))?;
//! let add_item = View::builder(&session, "AddItem")
//!     .parent(&screen)
//!     .query(Query::new().id("add_item"))
//!     .build()?;
//! add_item.assert_enabled()?.tap()?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

/// Waiting assertions over views and lists
pub mod asserts;
/// Typed widget views (checkbox, text input, list, dialog)
pub mod controls;
/// Device backend façade and the scripted test double
pub mod device;
/// Integer geometry for device coordinates
pub mod geometry;
/// Tracing subscriber setup
pub mod logging;
/// Platform dialects (Android / iOS)
pub mod platform;
/// Declarative XPath query builder
pub mod query;
/// Result and error types
pub mod result;
/// Scroll-search engine
pub mod scroll;
/// Declared scroll order tables
pub mod scroll_order;
/// Device session, page-source cache and invalidation
pub mod session;
/// Placeholder-template text matching
pub mod text;
/// Snapshots of resolved UI elements
pub mod viewdata;
/// The `View` core and its builder
pub mod views;
/// Polling wait engine
pub mod wait;
/// Page-source XML evaluation and iOS hierarchy rewriting
pub mod xml;

pub use result::{PalparError, PalparResult};

/// Commonly used types, one `use` away
pub mod prelude {
    pub use super::asserts::ViewAsserts;
    pub use super::controls::{
        CheckBox, DialogView, KeyboardDismiss, ListView, TextInput, TextInputKind,
    };
    pub use super::device::{DeviceBackend, DeviceKey, DeviceOp, ScriptedDevice, SharedScriptedDevice};
    pub use super::geometry::{Point, Rect};
    pub use super::platform::{Platform, PlatformDialect};
    pub use super::query::{xpath_literal, Query};
    pub use super::result::{PalparError, PalparResult};
    pub use super::scroll::{
        Direction, ScrollAxis, ScrollHistory, ScrollOptions, ScrollStrategy,
    };
    pub use super::scroll_order::{ScrollOrderKind, ScrollOrderTable};
    pub use super::session::{Session, SessionConfig};
    pub use super::viewdata::{PageNode, ViewData};
    pub use super::views::{AsView, ComposeMode, View, ViewBuilder, ViewRole};
    pub use super::wait::{wait_condition, wait_for_value, wait_gone, WaitOptions};
}
