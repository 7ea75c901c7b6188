//! Typed widget views built on [`View`].
//!
//! Widgets add the interaction protocol of their control class: a checkbox
//! knows how to toggle on each platform, a text input owns the
//! tap-clear-type-assert cycle and the keyboard, a list materializes typed
//! rows through an explicit factory function.

use crate::device::DeviceKey;
use crate::platform::Platform;
use crate::query::Query;
use crate::result::{PalparError, PalparResult};
use crate::scroll::{Direction, ScrollHistory, ScrollOptions};
use crate::session::Session;
use crate::views::{AsView, View, ViewBuilder};
use crate::wait::{self, WaitOptions};
use std::sync::Arc;
use tracing::{debug, info};

/// When a text input dismisses the keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyboardDismiss {
    /// Dismiss after the interaction
    #[default]
    Always,
    /// Leave the keyboard up (the next action needs it)
    Never,
}

/// What kind of content a text input holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextInputKind {
    /// Plain text
    #[default]
    Regular,
    /// Masked password entry
    Password,
}

/// A two-state checkbox/switch
#[derive(Debug, Clone)]
pub struct CheckBox {
    view: View,
}

impl AsView for CheckBox {
    fn as_view(&self) -> &View {
        &self.view
    }
}

impl std::fmt::Display for CheckBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.view)
    }
}

impl CheckBox {
    /// Wrap a built view
    #[must_use]
    pub fn new(view: View) -> Self {
        Self { view }
    }

    /// Build from a view builder
    pub fn build(builder: ViewBuilder) -> PalparResult<Self> {
        Ok(Self::new(builder.build()?))
    }

    /// Waited checked state
    pub fn is_checked(&self) -> PalparResult<bool> {
        self.view.checked()
    }

    /// Toggle from a known state to the other, asserting both ends.
    ///
    /// Android checkboxes toggle on tap; iOS switches are flicked in the
    /// direction of the desired state.
    pub fn tap_to_switch(&self, from: bool, to: bool) -> PalparResult<&Self> {
        info!(checkbox = %self.view, from, to, "toggling");

        self.assert_checked_state(from)?;

        match self.view.session().platform() {
            Platform::Android => {
                self.view.tap()?;
            }
            Platform::Ios => {
                self.view.drag(if from { Direction::Left } else { Direction::Right })?;
            }
        }

        self.assert_checked_state(to)?;
        Ok(self)
    }

    /// Wait until the checkbox reports the expected state
    pub fn assert_checked_state(&self, expected: bool) -> PalparResult<&Self> {
        let met = wait::wait_condition(
            self.view.session(),
            &format!("{} checked state is {expected}", self.view),
            &WaitOptions::new(),
            || Ok(self.view.checked()? == expected),
        )?;

        if !met {
            return Err(PalparError::Assertion {
                message: format!(
                    "{} is {} but should be {}",
                    self.view,
                    checked_word(!expected),
                    checked_word(expected)
                ),
            });
        }
        Ok(self)
    }
}

const fn checked_word(checked: bool) -> &'static str {
    if checked {
        "checked"
    } else {
        "unchecked"
    }
}

/// A text input with a known placeholder
#[derive(Debug, Clone)]
pub struct TextInput {
    view: View,
    placeholder: String,
    kind: TextInputKind,
}

impl AsView for TextInput {
    fn as_view(&self) -> &View {
        &self.view
    }
}

impl std::fmt::Display for TextInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.view)
    }
}

impl TextInput {
    /// Wrap a built view
    #[must_use]
    pub fn new(view: View, placeholder: impl Into<String>) -> Self {
        Self {
            view,
            placeholder: placeholder.into(),
            kind: TextInputKind::Regular,
        }
    }

    /// Build from a view builder
    pub fn build(builder: ViewBuilder, placeholder: impl Into<String>) -> PalparResult<Self> {
        Ok(Self::new(builder.build()?, placeholder))
    }

    /// Mark as a password field (affects the post-entry text assertion)
    #[must_use]
    pub const fn with_kind(mut self, kind: TextInputKind) -> Self {
        self.kind = kind;
        self
    }

    /// The declared placeholder text
    #[must_use]
    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// Whether the input currently shows its placeholder (i.e. is empty)
    pub fn placeholder_visible(&self) -> PalparResult<bool> {
        let text = self.view.text()?;
        Ok(text.is_empty() || text == self.placeholder)
    }

    /// Tap the input's left side (clear of any inline buttons) and wait
    /// for the keyboard
    pub fn tap(&self) -> PalparResult<&Self> {
        let rect = self.view.rect()?;
        let left_x = rect.x + self.view.session().dp_to_px(10);
        self.view.tap_with(
            Some(crate::geometry::Point::new(left_x, rect.center_y())),
            1,
        )?;

        wait::wait_condition(
            self.view.session(),
            "Keyboard is appearing",
            &WaitOptions::new().with_assert(),
            || self.view.session().is_keyboard_visible(),
        )?;

        Ok(self)
    }

    /// Clear any current text and assert the placeholder came back
    pub fn clear_text(&self) -> PalparResult<&Self> {
        self.clear_inner()?;
        self.view.session().hide_keyboard()?;
        Ok(self)
    }

    fn clear_inner(&self) -> PalparResult<bool> {
        debug!(input = %self.view, "clearing text");

        let current = self.view.text()?;
        let mut tapped = false;

        if !current.is_empty() && current != self.placeholder {
            self.tap()?;
            tapped = true;
            self.view.session().clear_text()?;
        }

        if !self.placeholder_visible()? {
            return Err(PalparError::Assertion {
                message: format!(
                    "Failed to clear text in {}. Current text: '{}'",
                    self.view,
                    self.view.text()?
                ),
            });
        }

        Ok(tapped)
    }

    /// Clear, type, assert the entered text, and handle the keyboard.
    pub fn enter_text(&self, text: &str) -> PalparResult<&Self> {
        self.enter_text_with(text, KeyboardDismiss::Always)
    }

    /// [`Self::enter_text`] with explicit keyboard handling
    pub fn enter_text_with(&self, text: &str, keyboard: KeyboardDismiss) -> PalparResult<&Self> {
        info!(input = %self.view, text, "entering text");

        let tapped = self.clear_inner()?;

        if text.is_empty() {
            debug!(input = %self.view, "no text to enter");
            return Ok(self);
        }

        if !tapped {
            self.tap()?;
        }

        self.view.session().enter_text(text)?;

        if keyboard == KeyboardDismiss::Always {
            self.view.session().hide_keyboard()?;
        }

        self.assert_entered_text(text)?;
        Ok(self)
    }

    /// Send the enter/return key through the focused input
    pub fn submit(&self) -> PalparResult<&Self> {
        self.view.session().press_key(DeviceKey::Enter)?;
        Ok(self)
    }

    fn assert_entered_text(&self, entered: &str) -> PalparResult<()> {
        // iOS masks password fields with bullets; compare against the mask.
        let expected = if self.kind == TextInputKind::Password
            && self.view.session().platform() == Platform::Ios
        {
            "\u{2022}".repeat(entered.chars().count())
        } else {
            entered.to_string()
        };

        let met = wait::wait_condition(
            self.view.session(),
            &format!("{} text becomes '{expected}'", self.view),
            &WaitOptions::new(),
            || Ok(self.view.text()? == expected),
        )?;

        if !met {
            return Err(PalparError::Assertion {
                message: format!(
                    "Text is not equal to entered text in {}: expected '{expected}', found '{}'",
                    self.view,
                    self.view.text()?
                ),
            });
        }
        Ok(())
    }
}

/// Typed row factory: receives the framework-built row view, returns the
/// typed row. Registered per list at construction — row shape mismatches
/// are compile errors, not runtime surprises.
pub type RowFactory<R> = Arc<dyn Fn(View) -> R + Send + Sync>;

/// A list of homogeneous typed rows
#[derive(Clone)]
pub struct ListView<R> {
    view: View,
    item_query: Query,
    make_row: RowFactory<R>,
}

impl<R> AsView for ListView<R> {
    fn as_view(&self) -> &View {
        &self.view
    }
}

impl<R> std::fmt::Debug for ListView<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListView")
            .field("view", &self.view)
            .finish_non_exhaustive()
    }
}

impl<R> std::fmt::Display for ListView<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.view)
    }
}

impl<R: AsView> ListView<R> {
    /// Wrap a built container view with a row query and a row factory
    #[must_use]
    pub fn new(
        view: View,
        item_query: Query,
        make_row: impl Fn(View) -> R + Send + Sync + 'static,
    ) -> Self {
        Self {
            view,
            item_query,
            make_row: Arc::new(make_row),
        }
    }

    /// Session of the underlying container
    #[must_use]
    pub fn session(&self) -> &Session {
        self.view.session()
    }

    /// Number of rows currently resolvable
    pub fn count(&self) -> PalparResult<usize> {
        let row_probe = self.row_view(None)?;
        let count = row_probe.count()?;
        debug!(list = %self.view, count, "row count");
        Ok(count)
    }

    /// Whether the list currently has no rows
    pub fn is_empty(&self) -> PalparResult<bool> {
        Ok(self.count()? == 0)
    }

    /// The typed row at `index` (zero-based); waits for the list to have
    /// enough rows first
    pub fn row(&self, index: usize) -> PalparResult<R> {
        let met = wait::wait_condition(
            self.view.session(),
            &format!("{} has at least {} row(s)", self.view, index + 1),
            &WaitOptions::new(),
            || Ok(self.count()? > index),
        )?;

        if !met {
            return Err(PalparError::ViewNotFound {
                message: format!(
                    "{} has {} rows but row [{index}] was requested",
                    self.view,
                    self.count()?
                ),
            });
        }

        Ok((self.make_row)(self.row_view(Some(index))?))
    }

    /// All typed rows currently resolvable
    pub fn rows(&self) -> PalparResult<Vec<R>> {
        let count = self.count()?;
        (0..count).map(|index| self.row(index)).collect()
    }

    /// First row matching the predicate; waits for one to show up
    pub fn first(
        &self,
        mut predicate: impl FnMut(&R) -> PalparResult<bool>,
    ) -> PalparResult<R> {
        let found = wait::wait_for_value(
            self.view.session(),
            &format!("{} has a matching row", self.view),
            &WaitOptions::new(),
            || {
                for row in self.rows()? {
                    if predicate(&row)? {
                        return Ok(Some(row));
                    }
                }
                Ok(None)
            },
        )?;

        found.ok_or_else(|| PalparError::ViewNotFound {
            message: format!("Failed to find a matching row in {}", self.view),
        })
    }

    /// Scroll the list until a row matches the predicate
    pub fn scroll_to_row(
        &self,
        options: &ScrollOptions,
        mut predicate: impl FnMut(&R) -> PalparResult<bool>,
    ) -> PalparResult<(R, ScrollHistory)> {
        let history = crate::scroll::scroll_to(&self.view, options, || {
            for row in self.rows()? {
                if predicate(&row)? {
                    return Ok(true);
                }
            }
            Ok(false)
        })?;

        for row in self.rows()? {
            if predicate(&row)? {
                return Ok((row, history));
            }
        }

        Err(PalparError::ViewNotFound {
            message: PalparError::combine(
                &format!("Failed to find a row in {} after {history}", self.view),
                options.message.as_deref(),
            ),
        })
    }

    /// Build the raw row view: the item query wrapped with an index when
    /// one is given, parented on the list container
    fn row_view(&self, index: Option<usize>) -> PalparResult<View> {
        let (name, query) = match index {
            Some(index) => (
                format!("[{index}]"),
                self.item_query.clone().index_wrapped(index),
            ),
            None => ("[*]".to_string(), self.item_query.clone()),
        };

        View::builder(self.view.session(), name)
            .parent(&self.view)
            .query(query)
            .no_wait()
            .build()
    }
}

/// A modal dialog identified by the texts it shows
#[derive(Debug, Clone)]
pub struct DialogView {
    view: View,
}

impl AsView for DialogView {
    fn as_view(&self) -> &View {
        &self.view
    }
}

impl std::fmt::Display for DialogView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.view)
    }
}

impl DialogView {
    /// Build a dialog view waiting for all its texts to be on screen
    pub fn appear(session: &Session, name: impl Into<String>, texts: &[&str]) -> PalparResult<Self> {
        let view = View::builder(session, name)
            .query(Query::new().dialog(texts))
            .role(crate::views::ViewRole::Root)
            .build()?;
        Ok(Self { view })
    }

    /// A button of the dialog, found by text
    pub fn button(&self, text: &str) -> PalparResult<View> {
        View::builder(self.view.session(), format!("Button '{text}'"))
            .parent(&self.view)
            .query(Query::new().text(text))
            .build()
    }

    /// Assert the dialog shows exactly `expected` buttons
    pub fn assert_button_count(&self, expected: usize) -> PalparResult<&Self> {
        let buttons = View::builder(self.view.session(), "Buttons")
            .parent(&self.view)
            .query(Query::new().button_class())
            .no_wait()
            .build()?;

        let met = wait::wait_condition(
            self.view.session(),
            &format!("{} has {expected} buttons", self.view),
            &WaitOptions::new(),
            || Ok(buttons.count()? == expected),
        )?;

        if !met {
            return Err(PalparError::Assertion {
                message: format!(
                    "{} has {} buttons but should have {expected}",
                    self.view,
                    buttons.count()?
                ),
            });
        }
        Ok(self)
    }

    /// Tap a button and wait for the dialog to close
    pub fn dismiss_with(&self, button_text: &str) -> PalparResult<()> {
        self.button(button_text)?.tap()?;
        self.view.disappeared()?;
        Ok(())
    }
}
