//! Declared scroll order: direction without trial and error.
//!
//! Screens whose blocks have a fixed visual order declare it in a
//! [`ScrollOrderTable`]: an explicit ordered list of entries, each naming a
//! child block, its declared index, and whether it scrolls with the
//! content. To bring a block on-screen the engine reads which declared
//! blocks are currently visible and compares indices — target below the
//! visible minimum scrolls up, above the visible maximum scrolls down, and
//! a target inside the visible range must already be on screen.
//!
//! The table is validated at construction: indices must be contiguous from
//! 1 and declared in ascending order, so a mis-declared screen fails
//! loudly before any scrolling happens.

use crate::platform::Platform;
use crate::result::{PalparError, PalparResult};
use crate::scroll::{ScrollOptions, ScrollStrategy};
use crate::session::Session;
use crate::views::View;
use crate::wait::{self, WaitOptions};
use std::sync::Arc;
use tracing::{debug, info};

/// How an entry participates in scrolling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollOrderKind {
    /// Moves with the scrolled content
    Scrollable,
    /// Pinned on both platforms (headers, toolbars) — never probed
    Fixed,
    /// Pinned on Android, scrollable on iOS
    FixedOnAndroidOnly,
}

type ViewAccessor = Arc<dyn Fn() -> PalparResult<View> + Send + Sync>;

/// One declared block of an ordered screen
#[derive(Clone)]
pub struct ScrollOrderEntry {
    index: u32,
    kind: ScrollOrderKind,
    name: String,
    accessor: ViewAccessor,
}

impl std::fmt::Debug for ScrollOrderEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollOrderEntry")
            .field("index", &self.index)
            .field("kind", &self.kind)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl ScrollOrderEntry {
    /// Declared index (1-based)
    #[must_use]
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Block name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    fn probed_on(&self, platform: Platform) -> bool {
        match self.kind {
            ScrollOrderKind::Scrollable => true,
            ScrollOrderKind::Fixed => false,
            ScrollOrderKind::FixedOnAndroidOnly => platform == Platform::Ios,
        }
    }
}

/// Ordered table of a screen's declared blocks
#[derive(Debug, Clone)]
pub struct ScrollOrderTable {
    container: String,
    entries: Vec<ScrollOrderEntry>,
}

impl ScrollOrderTable {
    /// Start building a table for the named container
    #[must_use]
    pub fn builder(container: impl Into<String>) -> ScrollOrderTableBuilder {
        ScrollOrderTableBuilder {
            container: container.into(),
            entries: Vec::new(),
        }
    }

    /// Declared entries, in declaration order
    #[must_use]
    pub fn entries(&self) -> &[ScrollOrderEntry] {
        &self.entries
    }

    /// Entry by block name
    #[must_use]
    pub fn entry(&self, name: &str) -> Option<&ScrollOrderEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    /// Declared indices of the currently visible blocks.
    ///
    /// Waits until at least one declared block is visible; entries pinned
    /// on the current platform are not probed.
    pub fn visible_indices(&self, session: &Session) -> PalparResult<Vec<u32>> {
        let platform = session.platform();
        let mut visible: Vec<u32> = Vec::new();

        let found = wait::wait_condition(
            session,
            &format!("Views order receiving for {}", self.container),
            &WaitOptions::new(),
            || {
                visible = self
                    .entries
                    .iter()
                    .filter(|entry| entry.probed_on(platform))
                    .filter_map(|entry| match (entry.accessor)() {
                        Ok(view) => match view.exists() {
                            Ok(true) => Some(Ok(entry.index)),
                            Ok(false) => None,
                            Err(err) => Some(Err(err)),
                        },
                        // A block whose view cannot even be built right now
                        // is simply not visible.
                        Err(_) => None,
                    })
                    .collect::<PalparResult<Vec<u32>>>()?;
                Ok(!visible.is_empty())
            },
        )?;

        if !found {
            return Err(PalparError::ViewNotFound {
                message: format!(
                    "No views were found. {} or its closest parent isn't on screen",
                    self.container
                ),
            });
        }

        debug!(container = %self.container, ?visible, "visible declared blocks");
        Ok(visible)
    }

    /// Bring the named block on-screen, choosing scroll direction from the
    /// declared order instead of blind two-phase search.
    pub fn ensure_visible(&self, scroll_container: &View, name: &str) -> PalparResult<View> {
        let entry = self.entry(name).ok_or_else(|| PalparError::TechnicalCrash {
            message: format!(
                "Block '{name}' is not declared in the scroll order of {}",
                self.container
            ),
        })?;

        let target = (entry.accessor)()?;
        if target.exists()? {
            return Ok(target);
        }

        let session = scroll_container.session().clone();
        let visible = self.visible_indices(&session)?;
        let lowest = visible[0];
        let highest = *visible.last().expect("visible set is non-empty");

        info!(
            container = %self.container,
            block = name,
            declared = entry.index,
            lowest,
            highest,
            "choosing scroll direction from declared order"
        );

        if lowest > entry.index {
            scroll_container.scroll_to(
                &target,
                &ScrollOptions::new()
                    .with_strategy(ScrollStrategy::UpThenDown)
                    .with_assert(),
            )?;
        } else if highest < entry.index {
            scroll_container.scroll_to(
                &target,
                &ScrollOptions::new()
                    .with_strategy(ScrollStrategy::Down)
                    .with_assert(),
            )?;
        } else {
            return Err(PalparError::ViewNotFound {
                message: format!(
                    "{} should be at position {} but was not found. Currently visible are: {:?}",
                    target.full_name(),
                    entry.index,
                    visible
                ),
            });
        }

        Ok(target)
    }
}

/// Builder for [`ScrollOrderTable`]
pub struct ScrollOrderTableBuilder {
    container: String,
    entries: Vec<ScrollOrderEntry>,
}

impl ScrollOrderTableBuilder {
    /// Declare the next block
    #[must_use]
    pub fn entry(
        mut self,
        index: u32,
        kind: ScrollOrderKind,
        name: impl Into<String>,
        accessor: impl Fn() -> PalparResult<View> + Send + Sync + 'static,
    ) -> Self {
        self.entries.push(ScrollOrderEntry {
            index,
            kind,
            name: name.into(),
            accessor: Arc::new(accessor),
        });
        self
    }

    /// Validate and build the table.
    ///
    /// Indices must be declared in strictly ascending order and form the
    /// contiguous range `1..=N`; anything else is a declaration defect in
    /// the container and fails construction.
    pub fn build(self) -> PalparResult<ScrollOrderTable> {
        let declaration_defect = |detail: String| PalparError::TechnicalCrash {
            message: format!("Wrong scroll order declared in {}: {detail}", self.container),
        };

        if self.entries.is_empty() {
            return Err(declaration_defect("no blocks declared".to_string()));
        }

        for pair in self.entries.windows(2) {
            if pair[1].index <= pair[0].index {
                return Err(declaration_defect(format!(
                    "index {} of '{}' is declared after index {} of '{}'",
                    pair[1].index, pair[1].name, pair[0].index, pair[0].name
                )));
            }
        }

        if self.entries[0].index != 1 {
            return Err(declaration_defect(format!(
                "indices must start at 1, found {}",
                self.entries[0].index
            )));
        }

        let last = self.entries.last().expect("entries are non-empty");
        if last.index != self.entries.len() as u32 {
            return Err(declaration_defect(format!(
                "indices must be contiguous 1..={}, found maximum {}",
                self.entries.len(),
                last.index
            )));
        }

        Ok(ScrollOrderTable {
            container: self.container,
            entries: self.entries,
        })
    }
}
