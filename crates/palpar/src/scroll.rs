//! Scroll-search engine.
//!
//! Brings an off-screen target into view by dragging a container, bounded
//! by a scroll budget, re-checking a predicate after every drag. A
//! change-detection probe short-circuits hopeless phases: when two
//! successive snapshots of the visible elements are equivalent, further
//! drags in that direction cannot reveal anything new.
//!
//! Two-phase strategies (`UpThenDown`, `LeftThenRight`) first rewind in
//! the backward direction, then sweep forward; single-direction
//! strategies (`Down`, `Right`) only sweep forward.

use crate::query::Query;
use crate::result::{PalparError, PalparResult};
use crate::session::Session;
use crate::viewdata::ViewData;
use crate::views::View;
use crate::xml::evaluate_xpath;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Default scroll budget per phase
pub const DEFAULT_MAX_SCROLLS: u32 = 5;

/// Scroll budget for the negative-space helpers
pub const DEFAULT_SCROLL_AROUND_TRIES: u32 = 7;

/// Drag direction in screen terms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Reveal earlier content (finger moves down)
    Up,
    /// Reveal later content (finger moves up)
    Down,
    /// Reveal content to the left
    Left,
    /// Reveal content to the right
    Right,
}

/// Axis a scroll search moves along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScrollAxis {
    /// Vertical scrolling (lists, pages)
    Vertical,
    /// Horizontal scrolling (carousels, tabs)
    Horizontal,
}

/// Phase plan of a scroll search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScrollStrategy {
    /// Rewind up first, then sweep down
    UpThenDown,
    /// Sweep down only
    Down,
    /// Rewind left first, then sweep right
    LeftThenRight,
    /// Sweep right only
    Right,
}

/// Backward/forward drag counts of one search (diagnostics only)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrollHistory {
    /// Drags in the backward (rewind) direction
    pub back_movements: u32,
    /// Drags in the forward direction
    pub forward_movements: u32,
}

impl std::fmt::Display for ScrollHistory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ↑ and {} ↓ moves",
            self.back_movements, self.forward_movements
        )
    }
}

/// Options for a scroll search
#[derive(Debug, Clone)]
pub struct ScrollOptions {
    /// Scroll budget per phase (padded per platform at run time)
    pub max_scrolls: u32,
    /// Axis to move along
    pub axis: ScrollAxis,
    /// Phase plan; `None` picks the two-phase default for the axis
    pub strategy: Option<ScrollStrategy>,
    /// Fail with a not-found error if the predicate never matched
    pub assert: bool,
    /// Drag distance override, in device pixels
    pub distance_px: Option<i32>,
    /// Extra failure context
    pub message: Option<String>,
    /// Change-detection probe override; `None` uses the platform default
    pub change_probe: Option<Query>,
    /// Fixed drag start ordinate override
    pub start_y_px: Option<i32>,
}

impl Default for ScrollOptions {
    fn default() -> Self {
        Self {
            max_scrolls: DEFAULT_MAX_SCROLLS,
            axis: ScrollAxis::Vertical,
            strategy: None,
            assert: false,
            distance_px: None,
            message: None,
            change_probe: None,
            start_y_px: None,
        }
    }
}

impl ScrollOptions {
    /// Create default options (vertical, two-phase, non-asserting)
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-phase budget
    #[must_use]
    pub const fn with_max_scrolls(mut self, max_scrolls: u32) -> Self {
        self.max_scrolls = max_scrolls;
        self
    }

    /// Set the axis
    #[must_use]
    pub const fn with_axis(mut self, axis: ScrollAxis) -> Self {
        self.axis = axis;
        self
    }

    /// Set the phase plan
    #[must_use]
    pub const fn with_strategy(mut self, strategy: ScrollStrategy) -> Self {
        self.strategy = Some(strategy);
        self
    }

    /// Fail with a not-found error on exhaustion
    #[must_use]
    pub const fn with_assert(mut self) -> Self {
        self.assert = true;
        self
    }

    /// Override the drag distance
    #[must_use]
    pub const fn with_distance_px(mut self, distance: i32) -> Self {
        self.distance_px = Some(distance);
        self
    }

    /// Attach extra failure context
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Override the change-detection probe
    #[must_use]
    pub fn with_change_probe(mut self, probe: Query) -> Self {
        self.change_probe = Some(probe);
        self
    }

    const fn resolved_strategy(&self) -> ScrollStrategy {
        match self.strategy {
            Some(strategy) => strategy,
            None => match self.axis {
                ScrollAxis::Vertical => ScrollStrategy::UpThenDown,
                ScrollAxis::Horizontal => ScrollStrategy::LeftThenRight,
            },
        }
    }
}

/// Scroll the container until the predicate holds.
///
/// Returns the movement history; with `options.assert` a never-matching
/// predicate becomes a not-found error instead.
pub fn scroll_to(
    container: &View,
    options: &ScrollOptions,
    mut predicate: impl FnMut() -> PalparResult<bool>,
) -> PalparResult<ScrollHistory> {
    let session = container.session();
    let strategy = options.resolved_strategy();
    let max_scrolls = options.max_scrolls + session.dialect().scroll_budget_padding();

    debug!(
        container = container.full_name(),
        max_scrolls,
        ?strategy,
        axis = ?options.axis,
        "scroll search"
    );

    let mut history = ScrollHistory::default();

    if predicate()? {
        return Ok(history);
    }

    let two_phase = matches!(
        (strategy, options.axis),
        (ScrollStrategy::UpThenDown, ScrollAxis::Vertical)
            | (ScrollStrategy::LeftThenRight, ScrollAxis::Horizontal)
    );

    if two_phase {
        let backward = match options.axis {
            ScrollAxis::Vertical => Direction::Up,
            ScrollAxis::Horizontal => Direction::Left,
        };
        if let Some(found) = run_phase(
            container,
            options,
            backward,
            max_scrolls,
            &mut history,
            &mut predicate,
        )? {
            return Ok(found);
        }
    }

    let forward = match options.axis {
        ScrollAxis::Vertical => Direction::Down,
        ScrollAxis::Horizontal => Direction::Right,
    };
    if let Some(found) = run_phase(
        container,
        options,
        forward,
        max_scrolls,
        &mut history,
        &mut predicate,
    )? {
        return Ok(found);
    }

    if !options.assert {
        return Ok(history);
    }

    let base_message = "Predicate scrolling not successful";
    Err(PalparError::ViewNotFound {
        message: PalparError::combine(base_message, options.message.as_deref()),
    })
}

/// One directional phase. Returns `Some(history)` when the predicate
/// matched, `None` when the phase gave up (budget or no observable change).
fn run_phase(
    container: &View,
    options: &ScrollOptions,
    direction: Direction,
    max_scrolls: u32,
    history: &mut ScrollHistory,
    predicate: &mut impl FnMut() -> PalparResult<bool>,
) -> PalparResult<Option<ScrollHistory>> {
    let session = container.session();
    let mut scrolls_done = 0;

    while scrolls_done < max_scrolls {
        let before = collect_change_probe(session, options.change_probe.as_ref())?;

        container.drag_with(direction, options.distance_px, options.start_y_px)?;

        match direction {
            Direction::Up | Direction::Left => history.back_movements += 1,
            Direction::Down | Direction::Right => history.forward_movements += 1,
        }
        scrolls_done += 1;

        if predicate()? {
            return Ok(Some(*history));
        }

        let after = collect_change_probe(session, options.change_probe.as_ref())?;
        if !more_scrolls_needed(&before, &after) {
            debug!(?direction, "screen content stopped changing, ending phase");
            return Ok(None);
        }
    }

    Ok(None)
}

/// Snapshot the elements used to decide whether scrolling changed anything.
fn collect_change_probe(
    session: &Session,
    probe: Option<&Query>,
) -> PalparResult<Vec<ViewData>> {
    let dialect = session.dialect();
    let xpath = probe.map_or_else(
        || dialect.visible_probe().to_string(),
        |query| query.render(dialect, session.package_id()),
    );

    evaluate_xpath(
        dialect,
        "Scroll change probe",
        &xpath,
        &session.screen_xml("Scrolling Calculations", false)?,
    )
}

/// Whether another drag can still reveal new content.
///
/// Both snapshots must have more than one element before equivalence is
/// trusted — a single-element screen compares equal too easily.
fn more_scrolls_needed(before: &[ViewData], after: &[ViewData]) -> bool {
    let unchanged = before.len() > 1
        && after.len() > 1
        && before.len() == after.len()
        && before
            .iter()
            .zip(after.iter())
            .all(|(lhs, rhs)| lhs.matches(rhs));

    !unchanged
}

/// Scroll the container until the target view exists.
///
/// With `options.assert`, exhaustion reports the movement history in the
/// not-found message.
pub fn scroll_to_view(
    container: &View,
    target: &View,
    options: &ScrollOptions,
) -> PalparResult<ScrollHistory> {
    info!(
        target = target.full_name(),
        container = container.full_name(),
        "scrolling to view"
    );

    // The inner search never asserts; the wrapper owns the error so it can
    // report the movement counts.
    let mut inner = options.clone();
    inner.assert = false;
    let history = scroll_to(container, &inner, || target.exists())?;

    if options.assert && !target.exists()? {
        return Err(PalparError::ViewNotFound {
            message: PalparError::combine(
                &format!(
                    "{} is not on screen but should be there after {history}",
                    target.full_name()
                ),
                options.message.as_deref(),
            ),
        });
    }

    Ok(history)
}

/// Scroll both ways and fail if the target shows up anywhere.
pub fn scroll_around_and_assert_absent(
    container: &View,
    target: &View,
    max_scrolls: u32,
) -> PalparResult<()> {
    debug!(
        target = target.full_name(),
        container = container.full_name(),
        max_scrolls,
        "asserting view is absent while scrolling around"
    );

    let exists_error = || {
        Err(PalparError::Scroll {
            message: format!("Row {} exists", target.full_name()),
        })
    };

    if target.exists()? {
        return exists_error();
    }

    for _ in 0..max_scrolls {
        container.drag_with(Direction::Up, None, None)?;
        if target.exists()? {
            return exists_error();
        }
    }

    for _ in 0..max_scrolls {
        container.drag_with(Direction::Down, None, None)?;
        if target.exists()? {
            return exists_error();
        }
    }

    Ok(())
}

/// Scroll both ways looking for the target; no assertion either way.
pub fn scroll_around_and_find(
    container: &View,
    target: &View,
    max_scrolls: u32,
) -> PalparResult<bool> {
    if target.exists()? {
        return Ok(true);
    }

    for _ in 0..max_scrolls {
        container.drag_with(Direction::Up, None, None)?;
        if target.exists()? {
            return Ok(true);
        }
    }

    for _ in 0..max_scrolls {
        container.drag_with(Direction::Down, None, None)?;
        if target.exists()? {
            return Ok(true);
        }
    }

    Ok(false)
}
