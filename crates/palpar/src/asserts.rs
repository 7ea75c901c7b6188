//! Waiting assertions over views.
//!
//! Every assertion polls through the wait engine before failing: UI state
//! settles asynchronously, so "is disabled" means "becomes disabled within
//! the wait budget". Failures are assertion errors (test defects), never
//! retried automatically beyond that budget.

use crate::controls::ListView;
use crate::result::{PalparError, PalparResult};
use crate::text;
use crate::views::AsView;
use crate::wait::{self, WaitOptions};
use tracing::debug;

/// Waiting assertions available on every view and typed widget
pub trait ViewAsserts: AsView {
    /// Assert the view resolves to at least one element right now
    fn assert_exists(&self, custom_message: Option<&str>) -> PalparResult<&Self> {
        let view = self.as_view();
        if view.does_not_exist()? {
            return Err(PalparError::ViewNotFound {
                message: PalparError::combine(
                    &format!("{view} not found but should be on screen right now"),
                    custom_message,
                ),
            });
        }
        debug!(view = %view, "assertion passed: exists");
        Ok(self)
    }

    /// Assert the view resolves to nothing right now
    fn assert_does_not_exist(&self, custom_message: Option<&str>) -> PalparResult<&Self> {
        let view = self.as_view();
        if view.exists()? {
            return Err(PalparError::Assertion {
                message: PalparError::combine(
                    &format!("{view} found but should not be on screen right now"),
                    custom_message,
                ),
            });
        }
        debug!(view = %view, "assertion passed: does not exist");
        Ok(self)
    }

    /// Assert the view becomes enabled
    fn assert_enabled(&self) -> PalparResult<&Self> {
        assert_flag(self.as_view(), "Enabled", &|view| view.enabled())?;
        Ok(self)
    }

    /// Assert the view becomes disabled
    fn assert_disabled(&self) -> PalparResult<&Self> {
        assert_flag(self.as_view(), "Disabled", &|view| Ok(!view.enabled()?))?;
        Ok(self)
    }

    /// Assert the view becomes selected
    fn assert_selected(&self) -> PalparResult<&Self> {
        assert_flag(self.as_view(), "Selected", &|view| view.selected())?;
        Ok(self)
    }

    /// Assert the view's text becomes exactly `expected`
    fn assert_text_becomes(&self, expected: &str) -> PalparResult<&Self> {
        let view = self.as_view();
        let met = wait::wait_condition(
            view.session(),
            &format!("{view} text becomes '{expected}'"),
            &WaitOptions::new(),
            || Ok(view.text()? == expected),
        )?;

        if !met {
            return Err(PalparError::Assertion {
                message: format!(
                    "{view} text is '{}' but should be '{expected}'",
                    view.text()?
                ),
            });
        }
        debug!(view = %view, expected, "assertion passed: text equals");
        Ok(self)
    }

    /// Assert the view's text comes to contain `fragment`
    fn assert_text_contains(&self, fragment: &str) -> PalparResult<&Self> {
        let view = self.as_view();
        let met = wait::wait_condition(
            view.session(),
            &format!("{view} text contains '{fragment}'"),
            &WaitOptions::new(),
            || Ok(view.text()?.contains(fragment)),
        )?;

        if !met {
            return Err(PalparError::Assertion {
                message: format!(
                    "{view} text is '{}' and does not contain '{fragment}'",
                    view.text()?
                ),
            });
        }
        Ok(self)
    }

    /// Assert the view's text matches a placeholder template such as
    /// `"{0} items selected"`
    fn assert_text_matches_template(&self, template: &str) -> PalparResult<&Self> {
        let view = self.as_view();
        let met = wait::wait_condition(
            view.session(),
            &format!("{view} text matches template '{template}'"),
            &WaitOptions::new(),
            || Ok(text::matches_template(&view.text()?, template)),
        )?;

        if !met {
            return Err(PalparError::Assertion {
                message: format!(
                    "{view} text is '{}' and does not match template '{template}'",
                    view.text()?
                ),
            });
        }
        Ok(self)
    }

}

impl<T: AsView> ViewAsserts for T {}

/// Shared flag assertion: waits for the reader to report `true`
fn assert_flag(
    view: &crate::views::View,
    flag_name: &str,
    read: &dyn Fn(&crate::views::View) -> PalparResult<bool>,
) -> PalparResult<()> {
    let met = wait::wait_condition(
        view.session(),
        &format!("Waiting for {view} is {flag_name}"),
        &WaitOptions::new(),
        || read(view),
    )?;

    if !met {
        return Err(PalparError::Assertion {
            message: format!("{view} is not {flag_name} but should be"),
        });
    }
    debug!(view = %view, flag_name, "assertion passed");
    Ok(())
}

impl<R: AsView> ListView<R> {
    /// Assert the list becomes empty
    pub fn assert_empty(&self) -> PalparResult<&Self> {
        let met = wait::wait_condition(
            self.session(),
            &format!("Waiting for {self} to be empty"),
            &WaitOptions::new(),
            || self.is_empty(),
        )?;

        if !met {
            return Err(PalparError::Assertion {
                message: format!(
                    "List {self} is not empty and has {} items but should be empty",
                    self.count()?
                ),
            });
        }
        Ok(self)
    }

    /// Assert the list comes to hold at least one row
    pub fn assert_not_empty(&self) -> PalparResult<&Self> {
        let met = wait::wait_condition(
            self.session(),
            &format!("Waiting for {self} to have rows"),
            &WaitOptions::new(),
            || Ok(!self.is_empty()?),
        )?;

        if !met {
            return Err(PalparError::Assertion {
                message: format!("List {self} is empty but should not be"),
            });
        }
        Ok(self)
    }

    /// Assert the list comes to hold exactly `expected` rows
    pub fn assert_contains_rows(&self, expected: usize) -> PalparResult<&Self> {
        let met = wait::wait_condition(
            self.session(),
            &format!("Waiting for {self} to have {expected} rows"),
            &WaitOptions::new(),
            || Ok(self.count()? == expected),
        )?;

        if !met {
            return Err(PalparError::Assertion {
                message: format!(
                    "List {self} contains {} rows but should contain {expected} rows",
                    self.count()?
                ),
            });
        }
        Ok(self)
    }

    /// Assert the list comes to hold at least `minimum` rows
    pub fn assert_contains_no_less_rows(&self, minimum: usize) -> PalparResult<&Self> {
        let met = wait::wait_condition(
            self.session(),
            &format!("Waiting for {self} to have at least {minimum} rows"),
            &WaitOptions::new(),
            || Ok(self.count()? >= minimum),
        )?;

        if !met {
            return Err(PalparError::Assertion {
                message: format!(
                    "List {self} contains {} rows but should contain minimum {minimum} rows",
                    self.count()?
                ),
            });
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::ScriptedDevice;
    use crate::platform::Platform;
    use crate::query::Query;
    use crate::session::{Session, SessionConfig};
    use crate::views::View;
    use std::time::Duration;

    const XML: &str = r#"<hierarchy class="hierarchy" width="1080" height="2400">
  <node class="android.widget.Button" resource-id="com.example.app:id/save" text="Save" bounds="[40,300][340,420]" enabled="true" selected="true"/>
  <node class="android.widget.TextView" resource-id="com.example.app:id/counter" text="5 items selected" bounds="[40,500][640,560]" enabled="false"/>
</hierarchy>"#;

    fn session() -> Session {
        Session::new(
            SessionConfig::new(Platform::Android, "com.example.app")
                .without_settle_delays()
                .with_wait_timeout(Duration::ZERO),
            Box::new(ScriptedDevice::new().with_frame(XML)),
        )
    }

    fn view(session: &Session, id: &str) -> View {
        View::builder(session, id)
            .query(Query::new().id(id))
            .no_wait()
            .build()
            .unwrap()
    }

    #[test]
    fn test_assert_exists_passes_and_fails() {
        let session = session();
        assert!(view(&session, "save").assert_exists(None).is_ok());

        let missing = view(&session, "missing");
        let result = missing.assert_exists(Some("after login"));
        match result {
            Err(PalparError::ViewNotFound { message }) => {
                assert!(message.starts_with("after login | "));
            }
            other => panic!("expected not-found, got {other:?}"),
        }
    }

    #[test]
    fn test_assert_does_not_exist() {
        let session = session();
        assert!(view(&session, "missing").assert_does_not_exist(None).is_ok());
        assert!(view(&session, "save").assert_does_not_exist(None).is_err());
    }

    #[test]
    fn test_flag_assertions() {
        let session = session();
        assert!(view(&session, "save").assert_enabled().is_ok());
        assert!(view(&session, "counter").assert_disabled().is_ok());
        assert!(view(&session, "save").assert_selected().is_ok());
        assert!(view(&session, "counter").assert_enabled().is_err());
    }

    #[test]
    fn test_text_assertions() {
        let session = session();
        let counter = view(&session, "counter");
        assert!(counter.assert_text_becomes("5 items selected").is_ok());
        assert!(counter.assert_text_contains("items").is_ok());
        assert!(counter.assert_text_becomes("6 items selected").is_err());
    }

    #[test]
    fn test_template_assertion() {
        let session = session();
        let counter = view(&session, "counter");
        assert!(counter
            .assert_text_matches_template("{0} items selected")
            .is_ok());
        assert!(counter
            .assert_text_matches_template("{0} rows selected")
            .is_err());
    }
}
