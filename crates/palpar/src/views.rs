//! The `View`: a logical handle to zero-or-more UI elements.
//!
//! A view is a composable query plus an optional parent. Resolution is
//! lazy: constructing a view (with `no_wait`) costs nothing on-device;
//! every property access re-resolves against the current page source
//! through the wait engine. By default `build()` waits the view into
//! existence, which is what page objects want — a screen constructor
//! fails fast when the screen never appeared.
//!
//! # Query composition
//!
//! A view's full query is its parent's full query plus its own fragment,
//! with two exceptions: children of a root view re-anchor through the
//! platform root element (so relative fragments survive arbitrary
//! intermediate nesting), and on iOS the children of an "iOS-not-root"
//! view compose directly (those screens live embedded in another
//! hierarchy and must not re-anchor).

use crate::geometry::{Point, Rect};
use crate::query::Query;
use crate::result::{PalparError, PalparResult};
use crate::scroll::{self, Direction, ScrollHistory, ScrollOptions};
use crate::session::Session;
use crate::viewdata::ViewData;
use crate::wait::{self, WaitOptions};
use crate::xml::evaluate_xpath;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Minimum drag distance, in density-independent pixels
pub const MIN_DRAG_DISTANCE_DP: i32 = 30;

/// Role a view plays in its children's query composition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewRole {
    /// Plain element: children extend its query directly
    Element,
    /// Screen root: children re-anchor through the platform root element
    Root,
    /// Root on Android; composes directly on iOS (embedded hierarchies)
    IosNotRoot,
}

/// How a view combines with its ancestor chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposeMode {
    /// Parent chain participates in the full query
    Regular,
    /// Own fragment only (root views and deliberate absolute queries)
    SkipParents,
}

/// Anything that exposes an underlying [`View`] (typed widgets included)
pub trait AsView {
    /// The underlying view handle
    fn as_view(&self) -> &View;
}

/// A logical handle to zero-or-more UI elements
#[derive(Clone)]
pub struct View {
    session: Session,
    parent: Option<Arc<View>>,
    name: String,
    full_name: String,
    query: Query,
    role: ViewRole,
    compose: ComposeMode,
    full_page_source: bool,
}

impl std::fmt::Debug for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("View")
            .field("full_name", &self.full_name)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

impl std::fmt::Display for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.full_name)
    }
}

impl AsView for View {
    fn as_view(&self) -> &View {
        self
    }
}

impl View {
    /// Start building a view
    #[must_use]
    pub fn builder(session: &Session, name: impl Into<String>) -> ViewBuilder {
        ViewBuilder::new(session, name)
    }

    /// Build a root screen view (waits it into existence)
    pub fn screen(session: &Session, name: impl Into<String>, query: Query) -> PalparResult<Self> {
        ViewBuilder::new(session, name)
            .query(query)
            .role(ViewRole::Root)
            .build()
    }

    /// Session this view resolves against
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Short name (without the ancestor path)
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Dotted ancestor path used in logs and failure messages
    #[must_use]
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Parent view, if any
    #[must_use]
    pub fn parent(&self) -> Option<&Arc<View>> {
        self.parent.as_ref()
    }

    /// Composition role
    #[must_use]
    pub fn role(&self) -> ViewRole {
        self.role
    }

    /// Whether resolution requires the full (unfiltered) page source
    #[must_use]
    pub fn needs_full_source(&self) -> bool {
        self.full_page_source
    }

    /// The fully composed XPath for this view
    #[must_use]
    pub fn full_query(&self) -> String {
        let dialect = self.session.dialect();
        let package = self.session.package_id();

        if self.compose == ComposeMode::SkipParents {
            return self.query.render(dialect, package);
        }

        let Some(parent) = &self.parent else {
            return self.query.render(dialect, package);
        };

        let parent_query = parent.full_query();
        let ios = self.session.platform() == crate::platform::Platform::Ios;

        match parent.role {
            ViewRole::IosNotRoot if ios => self.query.render_onto(&parent_query, dialect, package),
            ViewRole::Root | ViewRole::IosNotRoot => {
                let anchored = format!("{parent_query}/ancestor::{}", dialect.root_element());
                self.query.render_onto(&anchored, dialect, package)
            }
            ViewRole::Element => self.query.render_onto(&parent_query, dialect, package),
        }
    }

    /// Resolve the query against the current page source
    pub fn evaluate(&self) -> PalparResult<Vec<ViewData>> {
        let xpath = self.full_query();
        let xml = self
            .session
            .screen_xml(&self.full_name, self.full_page_source)?;
        evaluate_xpath(self.session.dialect(), &self.full_name, &xpath, &xml)
    }

    /// Whether at least one element matches right now (no waiting)
    pub fn exists(&self) -> PalparResult<bool> {
        let exists = !self.evaluate()?.is_empty();
        debug!(view = %self, exists, "existence check");
        Ok(exists)
    }

    /// Whether no element matches right now (no waiting)
    pub fn does_not_exist(&self) -> PalparResult<bool> {
        Ok(!self.exists()?)
    }

    /// Wait for the first matching element's snapshot
    pub fn wait_data(&self, timeout: Option<Duration>) -> PalparResult<Option<ViewData>> {
        let mut options = WaitOptions::new();
        options.timeout = timeout;
        wait::wait_for_value(&self.session, &format!("Waiting {self}"), &options, || {
            let matches = self.evaluate()?;
            match matches.first() {
                Some(first) => {
                    debug!(view = %self, found = matches.len(), data = %first.describe(), "resolved");
                    Ok(Some(first.clone()))
                }
                None => {
                    debug!(view = %self, "not on screen");
                    Ok(None)
                }
            }
        })
    }

    /// First matching element's snapshot, waited and asserted
    pub fn data(&self) -> PalparResult<ViewData> {
        self.wait_data(None)?
            .ok_or_else(|| PalparError::ViewNotFound {
                message: format!("{self} isn't on screen but should be"),
            })
    }

    /// Wait the view into existence.
    ///
    /// Returns whether it appeared; with `assert` a missing view becomes a
    /// not-found error instead of `false`.
    pub fn wait_exists(&self, assert: bool, timeout: Option<Duration>) -> PalparResult<bool> {
        let appeared = self.wait_data(timeout)?.is_some();
        if assert && !appeared {
            return Err(PalparError::ViewNotFound {
                message: format!("{self} isn't on screen but should be"),
            });
        }
        Ok(appeared)
    }

    /// Wait and assert; chainable
    pub fn wait(&self) -> PalparResult<&Self> {
        self.wait_exists(true, None)?;
        Ok(self)
    }

    /// Wait without asserting; chainable
    pub fn try_wait(&self) -> PalparResult<&Self> {
        self.wait_exists(false, None)?;
        Ok(self)
    }

    /// Wait for the view to leave the screen.
    pub fn disappeared(&self) -> PalparResult<&Self> {
        self.disappeared_with(None, None)
    }

    /// Wait for the view to leave the screen, with overrides
    pub fn disappeared_with(
        &self,
        timeout: Option<Duration>,
        custom_message: Option<&str>,
    ) -> PalparResult<&Self> {
        let gone = wait::wait_gone(
            &self.session,
            &format!("Waiting disappearing {self}"),
            timeout,
            || self.exists(),
        )?;

        if !gone {
            return Err(PalparError::ViewNotDisappeared {
                message: PalparError::combine(
                    &format!("{self} is still visible but shouldn't be"),
                    custom_message,
                ),
            });
        }
        Ok(self)
    }

    /// Waited on-screen rectangle
    pub fn rect(&self) -> PalparResult<Rect> {
        Ok(self.data()?.rect)
    }

    /// Waited text content
    pub fn text(&self) -> PalparResult<String> {
        let text = self.data()?.text;
        debug!(view = %self, %text, "text read");
        Ok(text)
    }

    /// Waited enabled flag
    pub fn enabled(&self) -> PalparResult<bool> {
        Ok(self.data()?.enabled)
    }

    /// Waited selected flag
    pub fn selected(&self) -> PalparResult<bool> {
        Ok(self.data()?.selected)
    }

    /// Waited checked flag
    pub fn checked(&self) -> PalparResult<bool> {
        Ok(self.data()?.checked)
    }

    /// Number of elements matching right now (no waiting)
    pub fn count(&self) -> PalparResult<usize> {
        Ok(self.evaluate()?.len())
    }

    /// Tap the view's center
    pub fn tap(&self) -> PalparResult<&Self> {
        self.tap_with(None, 1)
    }

    /// Tap the view's center twice in quick succession
    pub fn double_tap(&self) -> PalparResult<&Self> {
        self.tap_with(None, 2)?;
        std::thread::sleep(self.session.config().action_settle_delay);
        Ok(self)
    }

    /// Tap at explicit coordinates, `times` in quick succession.
    ///
    /// A failed tap is a technical crash, not a test failure: coordinates
    /// were already resolved, so only the transport can be at fault.
    pub fn tap_with(&self, coordinates: Option<Point>, times: u32) -> PalparResult<&Self> {
        let point = match coordinates {
            Some(point) => point,
            None => self.rect()?.center(),
        };

        info!(view = %self, %point, times, "tapping");

        self.session
            .tap(point.x, point.y, times)
            .map_err(|err| PalparError::TechnicalCrash {
                message: format!("Tapping {self} failed: {err}"),
            })?;

        Ok(self)
    }

    /// Tap and assert the enclosing screen closed
    pub fn tap_closing_screen(&self) -> PalparResult<&Self> {
        self.tap()?;
        self.root().disappeared()?;
        Ok(self)
    }

    /// The root ancestor (or the view itself when unparented)
    #[must_use]
    pub fn root(&self) -> &View {
        let mut current = self;
        while let Some(parent) = current.parent.as_deref() {
            current = parent;
        }
        current
    }

    /// Drag the view in a direction using default distance
    pub fn drag(&self, direction: Direction) -> PalparResult<&Self> {
        self.drag_with(direction, None, None)
    }

    /// Swipe helpers for horizontal gestures
    pub fn swipe_left(&self) -> PalparResult<&Self> {
        self.drag(Direction::Left)
    }

    /// Swipe right across the view
    pub fn swipe_right(&self) -> PalparResult<&Self> {
        self.drag(Direction::Right)
    }

    /// Drag the view, with distance and start-ordinate overrides.
    ///
    /// Vertical drags start a tenth of the view's height off center and
    /// default to ~70% of its height, floored at a minimum so a squat
    /// container still produces an observable scroll; endpoints clamp to
    /// the screen. Geometry for root views uses the whole device rect.
    pub fn drag_with(
        &self,
        direction: Direction,
        distance_px: Option<i32>,
        start_y_px: Option<i32>,
    ) -> PalparResult<&Self> {
        let session = &self.session;
        let rect = if self.role == ViewRole::Element {
            self.rect()?
        } else {
            session.device_rect()
        };
        let device = session.device_rect();

        debug!(view = %self, ?direction, "dragging");

        match direction {
            Direction::Up => {
                let distance = self.vertical_drag_distance(distance_px, rect);
                let from_y = start_y_px.unwrap_or(rect.center_y() - rect.height / 10);
                let mut to_y = from_y + distance;
                if to_y > device.height || to_y < 0 {
                    to_y = device.height - session.dp_to_px(10);
                }
                session.drag(
                    Point::new(rect.center_x(), from_y),
                    Point::new(rect.center_x(), to_y),
                    None,
                )?;
                std::thread::sleep(session.config().scroll_settle_delay);
            }
            Direction::Down => {
                let distance = self.vertical_drag_distance(distance_px, rect);
                let from_y = start_y_px.unwrap_or(rect.center_y() + rect.height / 10);
                let mut to_y = from_y - distance;
                if to_y < 0 || to_y > device.height {
                    to_y = session.dp_to_px(20);
                }
                session.drag(
                    Point::new(rect.center_x(), from_y),
                    Point::new(rect.center_x(), to_y),
                    None,
                )?;
                std::thread::sleep(session.config().scroll_settle_delay);
            }
            Direction::Left => {
                let from_x = rect.center_x() + rect.width / 10;
                let to_x = match distance_px {
                    None => rect.x + rect.width / 100,
                    Some(distance) => from_x + distance,
                };
                session.drag(
                    Point::new(from_x, rect.center_y()),
                    Point::new(to_x, rect.center_y()),
                    None,
                )?;
                std::thread::sleep(session.config().swipe_settle_delay);
            }
            Direction::Right => {
                let from_x = rect.center_x() - rect.width / 10;
                let to_x = match distance_px {
                    None => rect.x + rect.width - rect.width / 100,
                    Some(distance) => rect.x - distance,
                };
                session.drag(
                    Point::new(from_x, rect.center_y()),
                    Point::new(to_x, rect.center_y()),
                    None,
                )?;
                std::thread::sleep(session.config().swipe_settle_delay);
            }
        }

        Ok(self)
    }

    fn vertical_drag_distance(&self, distance_px: Option<i32>, rect: Rect) -> i32 {
        let distance = distance_px.unwrap_or((f64::from(rect.height) / 1.4) as i32);
        let floor = self.session.dp_to_px(MIN_DRAG_DISTANCE_DP);
        if distance >= floor {
            distance
        } else {
            debug!(
                view = %self,
                distance,
                floor,
                "drag distance below the minimum, using the floor"
            );
            floor
        }
    }

    /// Scroll this container until `target` exists
    pub fn scroll_to(&self, target: &impl AsView, options: &ScrollOptions) -> PalparResult<ScrollHistory> {
        scroll::scroll_to_view(self, target.as_view(), options)
    }

    /// Wait until two successive reads of the view's center agree —
    /// the cheap way to outlast entry animations.
    pub fn wait_for_animations_stop(&self) -> PalparResult<&Self> {
        let mut current = self.rect()?.center();
        self.session.invalidate_source();

        wait::wait_condition(
            &self.session,
            "Animations stop",
            &WaitOptions::new().with_assert(),
            || {
                let next = self.rect()?.center();
                if next == current {
                    return Ok(true);
                }
                current = next;
                Ok(false)
            },
        )?;

        Ok(self)
    }
}

/// Builder for [`View`]
pub struct ViewBuilder {
    session: Session,
    name: String,
    parent: Option<Arc<View>>,
    query: Query,
    ios_query: Option<Query>,
    role: ViewRole,
    compose: ComposeMode,
    wait: bool,
    full_page_source: bool,
}

impl ViewBuilder {
    fn new(session: &Session, name: impl Into<String>) -> Self {
        Self {
            session: session.clone(),
            name: name.into(),
            parent: None,
            query: Query::new(),
            ios_query: None,
            role: ViewRole::Element,
            compose: ComposeMode::Regular,
            wait: true,
            full_page_source: false,
        }
    }

    /// Set the parent view
    #[must_use]
    pub fn parent(mut self, parent: &impl AsView) -> Self {
        self.parent = Some(Arc::new(parent.as_view().clone()));
        self
    }

    /// Set the query (both platforms)
    #[must_use]
    pub fn query(mut self, query: Query) -> Self {
        self.query = query;
        self
    }

    /// Set separate Android and iOS queries
    #[must_use]
    pub fn platform_queries(mut self, android: Query, ios: Query) -> Self {
        self.query = android;
        self.ios_query = Some(ios);
        self
    }

    /// Set the composition role
    #[must_use]
    pub const fn role(mut self, role: ViewRole) -> Self {
        self.role = role;
        self
    }

    /// Render this view's own fragment only, ignoring the parent chain
    #[must_use]
    pub const fn skip_parents(mut self) -> Self {
        self.compose = ComposeMode::SkipParents;
        self
    }

    /// Do not wait for existence at construction
    #[must_use]
    pub const fn no_wait(mut self) -> Self {
        self.wait = false;
        self
    }

    /// Resolve against the full (unfiltered) page source
    #[must_use]
    pub const fn full_page_source(mut self) -> Self {
        self.full_page_source = true;
        self
    }

    /// Build the view; unless `no_wait`, waits it into existence.
    pub fn build(self) -> PalparResult<View> {
        let query = match (self.session.platform(), self.ios_query) {
            (crate::platform::Platform::Ios, Some(ios_query)) => ios_query,
            (_, _) => self.query,
        };

        // Unparented views have nothing to compose with.
        let compose = if self.parent.is_none() {
            ComposeMode::SkipParents
        } else {
            self.compose
        };

        let full_page_source = self.full_page_source
            || self
                .parent
                .as_ref()
                .is_some_and(|parent| parent.full_page_source);

        let full_name = match &self.parent {
            None => self.name.clone(),
            Some(parent) => {
                if self.name.starts_with('[') {
                    format!("{}{}", parent.full_name, self.name)
                } else {
                    format!("{}.{}", parent.full_name, self.name)
                }
            }
        };

        let view = View {
            session: self.session,
            parent: self.parent,
            name: self.name,
            full_name,
            query,
            role: self.role,
            compose,
            full_page_source,
        };

        if view.full_page_source {
            debug!(view = %view, "view resolves against the full page source");
        }

        if self.wait {
            view.wait_exists(true, None)?;
        }

        Ok(view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::ScriptedDevice;
    use crate::platform::Platform;
    use crate::session::SessionConfig;

    const XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<hierarchy class="hierarchy" width="1080" height="2400">
  <node class="android.widget.FrameLayout" resource-id="com.example.app:id/vault_screen" bounds="[0,0][1080,2400]" enabled="true">
    <node class="android.widget.TextView" resource-id="com.example.app:id/title" text="My Vault" bounds="[40,100][640,180]" enabled="true"/>
    <node class="android.widget.Button" resource-id="com.example.app:id/add_item" text="Add item" bounds="[40,300][340,420]" enabled="true"/>
  </node>
</hierarchy>"#;

    fn session() -> Session {
        Session::new(
            SessionConfig::new(Platform::Android, "com.example.app").without_settle_delays(),
            Box::new(ScriptedDevice::new().with_frame(XML)),
        )
    }

    fn screen(session: &Session) -> View {
        View::builder(session, "VaultScreen")
            .query(Query::new().id("vault_screen"))
            .role(ViewRole::Root)
            .build()
            .unwrap()
    }

    mod composition_tests {
        use super::*;

        #[test]
        fn test_unparented_view_renders_own_fragment() {
            let session = session();
            let view = View::builder(&session, "Title")
                .query(Query::new().id("title"))
                .no_wait()
                .build()
                .unwrap();
            assert_eq!(view.full_query(), "//*[@resource-id='com.example.app:id/title']");
        }

        #[test]
        fn test_child_of_root_reanchors_through_root_element() {
            let session = session();
            let screen = screen(&session);
            let title = View::builder(&session, "Title")
                .parent(&screen)
                .query(Query::new().id("title"))
                .no_wait()
                .build()
                .unwrap();
            assert_eq!(
                title.full_query(),
                "//*[@resource-id='com.example.app:id/vault_screen']/ancestor::hierarchy//*[@resource-id='com.example.app:id/title']"
            );
        }

        #[test]
        fn test_three_level_chain_concatenates_in_order() {
            let session = session();
            let grandparent = View::builder(&session, "Grandparent")
                .query(Query::new().id("vault_screen"))
                .no_wait()
                .build()
                .unwrap();
            let parent = View::builder(&session, "Parent")
                .parent(&grandparent)
                .query(Query::new().class("android.widget.FrameLayout"))
                .no_wait()
                .build()
                .unwrap();
            let child = View::builder(&session, "Child")
                .parent(&parent)
                .query(Query::new().text("My Vault"))
                .no_wait()
                .build()
                .unwrap();

            let dialect = session.dialect();
            let expected = Query::new()
                .id("vault_screen")
                .class("android.widget.FrameLayout")
                .text("My Vault")
                .render(dialect, "com.example.app");
            assert_eq!(child.full_query(), expected);
        }

        #[test]
        fn test_sibling_fragments_are_independent() {
            let session = session();
            let screen = screen(&session);
            let first = View::builder(&session, "First")
                .parent(&screen)
                .query(Query::new().id("title"))
                .no_wait()
                .build()
                .unwrap();
            let second = View::builder(&session, "Second")
                .parent(&screen)
                .query(Query::new().id("add_item"))
                .no_wait()
                .build()
                .unwrap();

            let before = first.full_query();
            let _other = second.full_query();
            assert_eq!(first.full_query(), before);
        }

        #[test]
        fn test_skip_parents_ignores_chain() {
            let session = session();
            let screen = screen(&session);
            let absolute = View::builder(&session, "Absolute")
                .parent(&screen)
                .query(Query::new().id("title"))
                .skip_parents()
                .no_wait()
                .build()
                .unwrap();
            assert_eq!(
                absolute.full_query(),
                "//*[@resource-id='com.example.app:id/title']"
            );
        }

        #[test]
        fn test_ios_not_root_parent_composes_directly_on_ios() {
            let ios_session = Session::new(
                SessionConfig::new(Platform::Ios, "com.example.app").without_settle_delays(),
                Box::new(ScriptedDevice::new().with_frame("<AppiumAUT/>")),
            );
            let sheet = View::builder(&ios_session, "Sheet")
                .query(Query::new().id("sheet"))
                .role(ViewRole::IosNotRoot)
                .no_wait()
                .build()
                .unwrap();
            let row = View::builder(&ios_session, "Row")
                .parent(&sheet)
                .query(Query::new().id("row"))
                .no_wait()
                .build()
                .unwrap();
            assert_eq!(row.full_query(), "//*[@name='sheet']//*[@name='row']");
        }

        #[test]
        fn test_ios_not_root_parent_reanchors_on_android() {
            let session = session();
            let sheet = View::builder(&session, "Sheet")
                .query(Query::new().id("vault_screen"))
                .role(ViewRole::IosNotRoot)
                .no_wait()
                .build()
                .unwrap();
            let row = View::builder(&session, "Row")
                .parent(&sheet)
                .query(Query::new().id("title"))
                .no_wait()
                .build()
                .unwrap();
            assert!(row.full_query().contains("/ancestor::hierarchy"));
        }

        #[test]
        fn test_full_name_chains_with_dots_and_indices() {
            let session = session();
            let screen = screen(&session);
            let list = View::builder(&session, "Items")
                .parent(&screen)
                .query(Query::new().id("title"))
                .no_wait()
                .build()
                .unwrap();
            let row = View::builder(&session, "[2]")
                .parent(&list)
                .query(Query::new().index_wrapped(2))
                .no_wait()
                .build()
                .unwrap();
            assert_eq!(row.full_name(), "VaultScreen.Items[2]");
        }
    }

    mod resolution_tests {
        use super::*;

        #[test]
        fn test_build_waits_and_succeeds_for_present_view() {
            let session = session();
            let view = View::builder(&session, "Title")
                .query(Query::new().id("title"))
                .build();
            assert!(view.is_ok());
        }

        #[test]
        fn test_build_fails_for_missing_view() {
            let session = Session::new(
                SessionConfig::new(Platform::Android, "com.example.app")
                    .without_settle_delays()
                    .with_wait_timeout(Duration::ZERO),
                Box::new(ScriptedDevice::new().with_frame(XML)),
            );
            let view = View::builder(&session, "Ghost")
                .query(Query::new().id("missing"))
                .build();
            assert!(matches!(view, Err(PalparError::ViewNotFound { .. })));
        }

        #[test]
        fn test_exists_and_text() {
            let session = session();
            let title = View::builder(&session, "Title")
                .query(Query::new().id("title"))
                .no_wait()
                .build()
                .unwrap();
            assert!(title.exists().unwrap());
            assert_eq!(title.text().unwrap(), "My Vault");
            assert_eq!(title.rect().unwrap(), Rect::new(40, 100, 600, 80));
        }

        #[test]
        fn test_root_climbs_the_chain() {
            let session = session();
            let screen = screen(&session);
            let title = View::builder(&session, "Title")
                .parent(&screen)
                .query(Query::new().id("title"))
                .no_wait()
                .build()
                .unwrap();
            assert_eq!(title.root().name(), "VaultScreen");
        }

        #[test]
        fn test_full_page_source_is_inherited() {
            let session = session();
            let parent = View::builder(&session, "Parent")
                .query(Query::new().id("vault_screen"))
                .full_page_source()
                .no_wait()
                .build()
                .unwrap();
            let child = View::builder(&session, "Child")
                .parent(&parent)
                .query(Query::new().id("title"))
                .no_wait()
                .build()
                .unwrap();
            assert!(child.needs_full_source());
        }
    }
}
