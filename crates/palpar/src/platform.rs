//! Platform dialects — the single place Android and iOS differ.
//!
//! Every platform-specific decision (attribute names, root element,
//! widget class names, node-to-snapshot mapping) goes through
//! [`PlatformDialect`]. The dialect is selected once per session and
//! injected; engine code never switches on the platform itself.

use crate::result::PalparResult;
use crate::viewdata::{PageNode, ViewData};
use serde::{Deserialize, Serialize};

/// Mobile platform under automation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    /// Android (UiAutomator hierarchy)
    Android,
    /// iOS (XCUITest accessibility snapshot)
    Ios,
}

impl Platform {
    /// The dialect implementing this platform's capability set
    #[must_use]
    pub fn dialect(self) -> &'static dyn PlatformDialect {
        match self {
            Self::Android => &AndroidDialect,
            Self::Ios => &IosDialect,
        }
    }

    /// Short name used in logs
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Android => "Android",
            Self::Ios => "iOS",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Platform capability set used by the query builder and the evaluator.
///
/// Two implementations exist ([`AndroidDialect`], [`IosDialect`]); both are
/// stateless. Text values passed to the predicate builders must already be
/// XPath-safe (see [`crate::query::xpath_literal`]).
pub trait PlatformDialect: Send + Sync + std::fmt::Debug {
    /// The platform this dialect implements
    fn platform(&self) -> Platform;

    /// Root element the ancestor re-anchor join climbs to
    fn root_element(&self) -> &'static str;

    /// Predicate matching an element identifier.
    ///
    /// `package_id` scopes Android resource ids (`<pkg>:id/<id>`); pass an
    /// empty string for system-app elements that carry unscoped ids.
    fn id_predicate(&self, id: &str, package_id: &str) -> String;

    /// Predicate matching element text; `literal` is an XPath literal
    fn text_predicate(&self, literal: &str) -> String;

    /// Predicate matching a substring of element text
    fn text_contains_predicate(&self, literal: &str) -> String;

    /// Predicate matching the element class/type
    fn class_predicate(&self, class: &str) -> String;

    /// Query matching every element currently considered on-screen;
    /// the scroll engine's default change-detection probe
    fn visible_probe(&self) -> &'static str;

    /// Widget classes acting as text inputs
    fn text_input_classes(&self) -> &'static [&'static str];

    /// Widget class acting as a two-state checkbox
    fn checkbox_class(&self) -> &'static str;

    /// Widget class acting as a push button
    fn button_class(&self) -> &'static str;

    /// Extra scroll attempts granted to absorb scroll-momentum variance
    fn scroll_budget_padding(&self) -> u32;

    /// Project a page-source node into a [`ViewData`] snapshot
    fn view_data(&self, node: &PageNode) -> PalparResult<ViewData>;
}

/// Android: UiAutomator attribute names and widget classes
#[derive(Debug, Clone, Copy)]
pub struct AndroidDialect;

impl PlatformDialect for AndroidDialect {
    fn platform(&self) -> Platform {
        Platform::Android
    }

    fn root_element(&self) -> &'static str {
        "hierarchy"
    }

    fn id_predicate(&self, id: &str, package_id: &str) -> String {
        if package_id.is_empty() {
            format!("@resource-id='{id}'")
        } else {
            format!("@resource-id='{package_id}:id/{id}'")
        }
    }

    fn text_predicate(&self, literal: &str) -> String {
        format!("@text={literal}")
    }

    fn text_contains_predicate(&self, literal: &str) -> String {
        format!("contains(@text, {literal})")
    }

    fn class_predicate(&self, class: &str) -> String {
        format!("@class='{class}'")
    }

    fn visible_probe(&self) -> &'static str {
        "//*[@displayed='true']"
    }

    fn text_input_classes(&self) -> &'static [&'static str] {
        &["android.widget.EditText"]
    }

    fn checkbox_class(&self) -> &'static str {
        "android.widget.CheckBox"
    }

    fn button_class(&self) -> &'static str {
        "android.widget.Button"
    }

    fn scroll_budget_padding(&self) -> u32 {
        0
    }

    fn view_data(&self, node: &PageNode) -> PalparResult<ViewData> {
        ViewData::from_android_node(node)
    }
}

/// iOS: XCUITest attribute names and element types
#[derive(Debug, Clone, Copy)]
pub struct IosDialect;

impl PlatformDialect for IosDialect {
    fn platform(&self) -> Platform {
        Platform::Ios
    }

    fn root_element(&self) -> &'static str {
        // The automation target wraps the app hierarchy; anchoring to its
        // closest children keeps relative queries inside the app.
        "AppiumAUT/*"
    }

    fn id_predicate(&self, id: &str, _package_id: &str) -> String {
        format!("@name='{id}'")
    }

    fn text_predicate(&self, literal: &str) -> String {
        format!("@label={literal}")
    }

    fn text_contains_predicate(&self, literal: &str) -> String {
        format!("contains(@label, {literal})")
    }

    fn class_predicate(&self, class: &str) -> String {
        format!("@type='{class}'")
    }

    fn visible_probe(&self) -> &'static str {
        "//*[@enabled='true']"
    }

    fn text_input_classes(&self) -> &'static [&'static str] {
        &[
            "UIFieldEditor",
            "XCUIElementTypeTextField",
            "XCUIElementTypeSearchField",
            "XCUIElementTypeSecureTextField",
        ]
    }

    fn checkbox_class(&self) -> &'static str {
        "XCUIElementTypeSwitch"
    }

    fn button_class(&self) -> &'static str {
        "XCUIElementTypeButton"
    }

    fn scroll_budget_padding(&self) -> u32 {
        5
    }

    fn view_data(&self, node: &PageNode) -> PalparResult<ViewData> {
        ViewData::from_ios_node(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod android_tests {
        use super::*;

        #[test]
        fn test_id_predicate_scoped() {
            let dialect = Platform::Android.dialect();
            assert_eq!(
                dialect.id_predicate("login_button", "com.example.app"),
                "@resource-id='com.example.app:id/login_button'"
            );
        }

        #[test]
        fn test_id_predicate_system_app() {
            let dialect = Platform::Android.dialect();
            assert_eq!(
                dialect.id_predicate("button1", ""),
                "@resource-id='button1'"
            );
        }

        #[test]
        fn test_text_and_class() {
            let dialect = Platform::Android.dialect();
            assert_eq!(dialect.text_predicate("'Save'"), "@text='Save'");
            assert_eq!(
                dialect.class_predicate("android.widget.TextView"),
                "@class='android.widget.TextView'"
            );
        }

        #[test]
        fn test_no_scroll_padding() {
            assert_eq!(Platform::Android.dialect().scroll_budget_padding(), 0);
        }
    }

    mod ios_tests {
        use super::*;

        #[test]
        fn test_id_predicate_ignores_package() {
            let dialect = Platform::Ios.dialect();
            assert_eq!(
                dialect.id_predicate("login_button", "com.example.app"),
                "@name='login_button'"
            );
        }

        #[test]
        fn test_text_and_class() {
            let dialect = Platform::Ios.dialect();
            assert_eq!(dialect.text_predicate("'Save'"), "@label='Save'");
            assert_eq!(
                dialect.class_predicate("XCUIElementTypeCell"),
                "@type='XCUIElementTypeCell'"
            );
        }

        #[test]
        fn test_scroll_padding() {
            assert_eq!(Platform::Ios.dialect().scroll_budget_padding(), 5);
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(Platform::Android.to_string(), "Android");
        assert_eq!(Platform::Ios.to_string(), "iOS");
    }
}
