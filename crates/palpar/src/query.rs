//! Declarative XPath query builder.
//!
//! A [`Query`] is an ordered list of typed steps, rendered to a
//! platform-specific XPath string on demand. Keeping the query as data
//! (instead of composed closures) makes fragments cheap to clone, safe to
//! capture in page objects, and independent of any ambient platform state:
//! the same `Query` renders differently under the Android and iOS dialects.
//!
//! # Rendering model
//!
//! Each step appends to the accumulated expression, so an empty query plus
//! `.id("email")` renders `//*[@resource-id='<pkg>:id/email']` on Android
//! and `//*[@name='email']` on iOS. Ancestor joins (`root_parent`,
//! `parent`) climb back up so a later step can re-descend — this is how
//! "element with several child texts" conditions are expressed.

use crate::platform::PlatformDialect;

/// Build an XPath string literal, escaping what XPath 1.0 cannot.
///
/// `&` becomes `&amp;` before the XML layer sees it. Apostrophes cannot be
/// escaped inside a single-quoted XPath 1.0 literal at all, so a value
/// containing one is rendered through the `concat()` idiom:
/// `it's mine` → `concat('it', "'", 's mine')`.
#[must_use]
pub fn xpath_literal(text: &str) -> String {
    let safe = text.replace('&', "&amp;");
    if safe.contains('\'') {
        format!("concat('{}')", safe.replace('\'', "', \"'\", '"))
    } else {
        format!("'{safe}'")
    }
}

/// One typed step of a query
#[derive(Debug, Clone, PartialEq)]
enum Step {
    Id {
        id: String,
        alternatives: Vec<String>,
    },
    SystemId {
        id: String,
    },
    IdAndText {
        id: String,
        text: String,
    },
    IdAndTextContains {
        id: String,
        text: String,
    },
    IdAndValue {
        id: String,
        value: String,
    },
    IdOrClass {
        id: String,
        class: String,
    },
    Text {
        text: String,
        alternatives: Vec<String>,
    },
    TextContains {
        text: String,
    },
    Class {
        class: String,
        alternatives: Vec<String>,
    },
    ClassAndText {
        class: String,
        text: String,
    },
    ContentDescription {
        marked: String,
    },
    Index {
        index: usize,
        wrap: bool,
    },
    AncestorRoot,
    Ancestor {
        class: String,
    },
    AllChildren,
    ClosestChildren,
    ClosestChildWithClass {
        class: String,
    },
    ClosestParentOfChildWithId {
        id: String,
    },
    ElementWithIdAndChildTexts {
        id: String,
        texts: Vec<String>,
    },
    ElementWithClassAndChildTexts {
        class: String,
        texts: Vec<String>,
    },
    ElementWithClassAndChildIds {
        class: String,
        ids: Vec<String>,
    },
    ElementWithClassAndNoChildText {
        class: String,
        text: String,
    },
    Dialog {
        texts: Vec<String>,
    },
    TextInputClass,
    CheckBoxClass,
    ButtonClass,
    Raw {
        xpath: String,
    },
}

/// A composable, platform-agnostic element query
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Query {
    steps: Vec<Step>,
}

impl Query {
    /// Create an empty query (renders to an empty string until steps are added)
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no steps have been added
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    fn push(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    /// Any descendant with the given identifier
    #[must_use]
    pub fn id(self, id: impl Into<String>) -> Self {
        self.push(Step::Id {
            id: id.into(),
            alternatives: Vec::new(),
        })
    }

    /// Any descendant with one of several identifiers
    #[must_use]
    pub fn id_or(self, id: impl Into<String>, alternatives: &[&str]) -> Self {
        self.push(Step::Id {
            id: id.into(),
            alternatives: alternatives.iter().map(ToString::to_string).collect(),
        })
    }

    /// Identifier of a system-app element (unscoped by the app package)
    #[must_use]
    pub fn id_for_system_app(self, id: impl Into<String>) -> Self {
        self.push(Step::SystemId { id: id.into() })
    }

    /// Identifier and exact text together
    #[must_use]
    pub fn id_and_text(self, id: impl Into<String>, text: impl Into<String>) -> Self {
        self.push(Step::IdAndText {
            id: id.into(),
            text: text.into(),
        })
    }

    /// Identifier and a text substring together
    #[must_use]
    pub fn id_and_text_contains(self, id: impl Into<String>, text: impl Into<String>) -> Self {
        self.push(Step::IdAndTextContains {
            id: id.into(),
            text: text.into(),
        })
    }

    /// Identifier and exact `value` attribute together
    #[must_use]
    pub fn id_and_value(self, id: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(Step::IdAndValue {
            id: id.into(),
            value: value.into(),
        })
    }

    /// Identifier or class, whichever matches
    #[must_use]
    pub fn id_or_class(self, id: impl Into<String>, class: impl Into<String>) -> Self {
        self.push(Step::IdOrClass {
            id: id.into(),
            class: class.into(),
        })
    }

    /// Any descendant with the given text
    #[must_use]
    pub fn text(self, text: impl Into<String>) -> Self {
        self.push(Step::Text {
            text: text.into(),
            alternatives: Vec::new(),
        })
    }

    /// Any descendant with one of several texts
    #[must_use]
    pub fn text_or(self, text: impl Into<String>, alternatives: &[&str]) -> Self {
        self.push(Step::Text {
            text: text.into(),
            alternatives: alternatives.iter().map(ToString::to_string).collect(),
        })
    }

    /// Any descendant whose text contains the given substring
    #[must_use]
    pub fn text_contains(self, text: impl Into<String>) -> Self {
        self.push(Step::TextContains { text: text.into() })
    }

    /// Any descendant with the given class/type
    #[must_use]
    pub fn class(self, class: impl Into<String>) -> Self {
        self.push(Step::Class {
            class: class.into(),
            alternatives: Vec::new(),
        })
    }

    /// Any descendant with one of several classes/types
    #[must_use]
    pub fn class_or(self, class: impl Into<String>, alternatives: &[&str]) -> Self {
        self.push(Step::Class {
            class: class.into(),
            alternatives: alternatives.iter().map(ToString::to_string).collect(),
        })
    }

    /// Class and exact text together
    #[must_use]
    pub fn class_and_text(self, class: impl Into<String>, text: impl Into<String>) -> Self {
        self.push(Step::ClassAndText {
            class: class.into(),
            text: text.into(),
        })
    }

    /// Any descendant with the given content description
    #[must_use]
    pub fn content_description(self, marked: impl Into<String>) -> Self {
        self.push(Step::ContentDescription {
            marked: marked.into(),
        })
    }

    /// Select the n-th match (zero-based; rendered in XPath 1-based form)
    #[must_use]
    pub fn index(self, index: usize) -> Self {
        self.push(Step::Index { index, wrap: false })
    }

    /// Select the n-th match of the whole expression so far (zero-based)
    #[must_use]
    pub fn index_wrapped(self, index: usize) -> Self {
        self.push(Step::Index { index, wrap: true })
    }

    /// Climb to the platform root element (re-anchor for a fresh descent)
    #[must_use]
    pub fn root_parent(self) -> Self {
        self.push(Step::AncestorRoot)
    }

    /// Climb to the closest ancestor with the given class
    #[must_use]
    pub fn parent(self, class: impl Into<String>) -> Self {
        self.push(Step::Ancestor {
            class: class.into(),
        })
    }

    /// All descendants of the current selection
    #[must_use]
    pub fn all_children(self) -> Self {
        self.push(Step::AllChildren)
    }

    /// Direct children of the current selection
    #[must_use]
    pub fn closest_children(self) -> Self {
        self.push(Step::ClosestChildren)
    }

    /// Direct child with the given class
    #[must_use]
    pub fn closest_child_with_class(self, class: impl Into<String>) -> Self {
        self.push(Step::ClosestChildWithClass {
            class: class.into(),
        })
    }

    /// Direct parent of a descendant with the given identifier
    #[must_use]
    pub fn closest_parent_of_child_with_id(self, id: impl Into<String>) -> Self {
        self.push(Step::ClosestParentOfChildWithId { id: id.into() })
    }

    /// Element with an identifier whose subtree contains all given texts
    #[must_use]
    pub fn element_with_id_and_child_texts(self, id: impl Into<String>, texts: &[&str]) -> Self {
        self.push(Step::ElementWithIdAndChildTexts {
            id: id.into(),
            texts: texts.iter().map(ToString::to_string).collect(),
        })
    }

    /// Element with a class whose subtree contains all given texts
    #[must_use]
    pub fn element_with_class_and_child_texts(
        self,
        class: impl Into<String>,
        texts: &[&str],
    ) -> Self {
        self.push(Step::ElementWithClassAndChildTexts {
            class: class.into(),
            texts: texts.iter().map(ToString::to_string).collect(),
        })
    }

    /// Element with a class whose subtree contains all given identifiers
    #[must_use]
    pub fn element_with_class_and_child_ids(
        self,
        class: impl Into<String>,
        ids: &[&str],
    ) -> Self {
        self.push(Step::ElementWithClassAndChildIds {
            class: class.into(),
            ids: ids.iter().map(ToString::to_string).collect(),
        })
    }

    /// Element with a class and no descendant carrying the given text
    #[must_use]
    pub fn element_with_class_and_no_child_text(
        self,
        class: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        self.push(Step::ElementWithClassAndNoChildText {
            class: class.into(),
            text: text.into(),
        })
    }

    /// A dialog identified by the texts it shows.
    ///
    /// On iOS the match is additionally pinned to the enclosing alert
    /// element; Android dialogs have no dedicated container class.
    #[must_use]
    pub fn dialog(self, texts: &[&str]) -> Self {
        self.push(Step::Dialog {
            texts: texts.iter().map(ToString::to_string).collect(),
        })
    }

    /// Any descendant acting as a text input on the current platform
    #[must_use]
    pub fn text_input_class(self) -> Self {
        self.push(Step::TextInputClass)
    }

    /// Any descendant acting as a checkbox on the current platform
    #[must_use]
    pub fn checkbox_class(self) -> Self {
        self.push(Step::CheckBoxClass)
    }

    /// Any descendant acting as a button on the current platform
    #[must_use]
    pub fn button_class(self) -> Self {
        self.push(Step::ButtonClass)
    }

    /// Append a raw XPath fragment verbatim (escape hatch)
    #[must_use]
    pub fn raw(self, xpath: impl Into<String>) -> Self {
        self.push(Step::Raw {
            xpath: xpath.into(),
        })
    }

    /// Render this query to XPath, appended to `base`.
    #[must_use]
    pub fn render_onto(
        &self,
        base: &str,
        dialect: &dyn PlatformDialect,
        package_id: &str,
    ) -> String {
        let mut out = base.to_string();
        for step in &self.steps {
            render_step(&mut out, step, dialect, package_id);
        }
        out
    }

    /// Render this query to XPath from an empty base.
    #[must_use]
    pub fn render(&self, dialect: &dyn PlatformDialect, package_id: &str) -> String {
        self.render_onto("", dialect, package_id)
    }
}

fn or_join(first: String, rest: impl Iterator<Item = String>) -> String {
    let mut joined = first;
    for alternative in rest {
        joined.push_str(" or ");
        joined.push_str(&alternative);
    }
    joined
}

fn render_step(out: &mut String, step: &Step, dialect: &dyn PlatformDialect, package_id: &str) {
    let id_pred = |id: &str| dialect.id_predicate(id, package_id);
    let text_pred = |text: &str| dialect.text_predicate(&xpath_literal(text));
    match step {
        Step::Id { id, alternatives } => {
            let joined = or_join(
                id_pred(id),
                alternatives.iter().map(|alternative| id_pred(alternative)),
            );
            out.push_str(&format!("//*[{joined}]"));
        }
        Step::SystemId { id } => {
            out.push_str(&format!("//*[{}]", dialect.id_predicate(id, "")));
        }
        Step::IdAndText { id, text } => {
            out.push_str(&format!("//*[{} and {}]", id_pred(id), text_pred(text)));
        }
        Step::IdAndTextContains { id, text } => {
            let contains = dialect.text_contains_predicate(&xpath_literal(text));
            out.push_str(&format!("//*[{} and {contains}]", id_pred(id)));
        }
        Step::IdAndValue { id, value } => {
            out.push_str(&format!("//*[{} and @value='{value}']", id_pred(id)));
        }
        Step::IdOrClass { id, class } => {
            out.push_str(&format!(
                "//*[{} or {}]",
                id_pred(id),
                dialect.class_predicate(class)
            ));
        }
        Step::Text { text, alternatives } => {
            let joined = or_join(
                text_pred(text),
                alternatives.iter().map(|alternative| text_pred(alternative)),
            );
            out.push_str(&format!("//*[{joined}]"));
        }
        Step::TextContains { text } => {
            let contains = dialect.text_contains_predicate(&xpath_literal(text));
            out.push_str(&format!("//*[{contains}]"));
        }
        Step::Class {
            class,
            alternatives,
        } => {
            let joined = or_join(
                dialect.class_predicate(class),
                alternatives
                    .iter()
                    .map(|alternative| dialect.class_predicate(alternative)),
            );
            out.push_str(&format!("//*[{joined}]"));
        }
        Step::ClassAndText { class, text } => {
            out.push_str(&format!(
                "//*[{} and {}]",
                dialect.class_predicate(class),
                text_pred(text)
            ));
        }
        Step::ContentDescription { marked } => {
            out.push_str(&format!("//*[@content-desc='{marked}']"));
        }
        Step::Index { index, wrap } => {
            // Logical indices are zero-based; XPath counts from 1.
            let xpath_index = index + 1;
            if *wrap {
                *out = format!("({out})[{xpath_index}]");
            } else {
                out.push_str(&format!("[{xpath_index}]"));
            }
        }
        Step::AncestorRoot => {
            out.push_str(&format!("/ancestor::{}", dialect.root_element()));
        }
        Step::Ancestor { class } => {
            out.push_str(&format!("/ancestor::{class}"));
        }
        Step::AllChildren => out.push_str("//*"),
        Step::ClosestChildren => out.push_str("/*"),
        Step::ClosestChildWithClass { class } => {
            out.push_str(&format!("/*[{}]", dialect.class_predicate(class)));
        }
        Step::ClosestParentOfChildWithId { id } => {
            out.push_str(&format!("//*[{}]/..", id_pred(id)));
        }
        Step::ElementWithIdAndChildTexts { id, texts } => {
            let mut expr = format!("//*[{}", id_pred(id));
            for text in texts {
                expr.push_str(&format!(" and .//*[{}]", text_pred(text)));
            }
            expr.push(']');
            out.push_str(&expr);
        }
        Step::ElementWithClassAndChildTexts { class, texts } => {
            let mut expr = format!("//*[{}", dialect.class_predicate(class));
            for text in texts {
                expr.push_str(&format!(" and .//*[{}]", text_pred(text)));
            }
            expr.push(']');
            out.push_str(&expr);
        }
        Step::ElementWithClassAndChildIds { class, ids } => {
            let mut expr = format!("//*[{}", dialect.class_predicate(class));
            for id in ids {
                expr.push_str(&format!(" and .//*[{}]", id_pred(id)));
            }
            expr.push(']');
            out.push_str(&expr);
        }
        Step::ElementWithClassAndNoChildText { class, text } => {
            out.push_str(&format!(
                "//*[{} and not(.//*[{}])]",
                dialect.class_predicate(class),
                text_pred(text)
            ));
        }
        Step::Dialog { texts } => {
            let ios = dialect.platform() == crate::platform::Platform::Ios;
            if ios {
                out.push_str(&format!(
                    "//*[{}]",
                    dialect.class_predicate("XCUIElementTypeAlert")
                ));
            }
            render_chained_texts(out, texts, dialect);
            if ios {
                out.push_str("/ancestor::XCUIElementTypeAlert");
            }
        }
        Step::TextInputClass => {
            let classes = dialect.text_input_classes();
            let joined = or_join(
                dialect.class_predicate(classes[0]),
                classes[1..]
                    .iter()
                    .map(|class| dialect.class_predicate(class)),
            );
            out.push_str(&format!("//*[{joined}]"));
        }
        Step::CheckBoxClass => {
            out.push_str(&format!(
                "//*[{}]",
                dialect.class_predicate(dialect.checkbox_class())
            ));
        }
        Step::ButtonClass => {
            out.push_str(&format!(
                "//*[{}]",
                dialect.class_predicate(dialect.button_class())
            ));
        }
        Step::Raw { xpath } => out.push_str(xpath),
    }
}

/// Match each text in turn, re-anchoring through the root element between
/// them, so all texts are required somewhere on the same screen.
fn render_chained_texts(out: &mut String, texts: &[String], dialect: &dyn PlatformDialect) {
    for (position, text) in texts.iter().enumerate() {
        let literal = xpath_literal(text);
        out.push_str(&format!("//*[{}]", dialect.text_predicate(&literal)));
        if position != texts.len() - 1 {
            out.push_str(&format!("/ancestor::{}", dialect.root_element()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::Platform;

    const PKG: &str = "com.example.app";

    fn android(query: &Query) -> String {
        query.render(Platform::Android.dialect(), PKG)
    }

    fn ios(query: &Query) -> String {
        query.render(Platform::Ios.dialect(), PKG)
    }

    mod literal_tests {
        use super::*;

        #[test]
        fn test_plain_text() {
            assert_eq!(xpath_literal("Save"), "'Save'");
        }

        #[test]
        fn test_apostrophe_uses_concat() {
            assert_eq!(
                xpath_literal("it's mine"),
                "concat('it', \"'\", 's mine')"
            );
        }

        #[test]
        fn test_multiple_apostrophes() {
            assert_eq!(
                xpath_literal("a'b'c"),
                "concat('a', \"'\", 'b', \"'\", 'c')"
            );
        }

        #[test]
        fn test_ampersand_is_html_escaped() {
            assert_eq!(xpath_literal("Terms & Conditions"), "'Terms &amp; Conditions'");
        }
    }

    mod id_tests {
        use super::*;

        #[test]
        fn test_android_id_is_package_scoped() {
            let query = Query::new().id("foo");
            assert_eq!(android(&query), "//*[@resource-id='com.example.app:id/foo']");
        }

        #[test]
        fn test_ios_id_uses_name() {
            let query = Query::new().id("foo");
            assert_eq!(ios(&query), "//*[@name='foo']");
        }

        #[test]
        fn test_id_alternatives_join_with_or() {
            let query = Query::new().id_or("foo", &["bar"]);
            assert_eq!(
                android(&query),
                "//*[@resource-id='com.example.app:id/foo' or @resource-id='com.example.app:id/bar']"
            );
        }

        #[test]
        fn test_system_app_id_is_unscoped() {
            let query = Query::new().id_for_system_app("button1");
            assert_eq!(android(&query), "//*[@resource-id='button1']");
        }
    }

    mod text_tests {
        use super::*;

        #[test]
        fn test_android_text() {
            let query = Query::new().text("Save");
            assert_eq!(android(&query), "//*[@text='Save']");
        }

        #[test]
        fn test_ios_text_uses_label() {
            let query = Query::new().text("Save");
            assert_eq!(ios(&query), "//*[@label='Save']");
        }

        #[test]
        fn test_apostrophe_safe_text() {
            let query = Query::new().text("it's mine");
            assert_eq!(android(&query), "//*[@text=concat('it', \"'\", 's mine')]");
        }

        #[test]
        fn test_text_contains() {
            let query = Query::new().text_contains("err");
            assert_eq!(android(&query), "//*[contains(@text, 'err')]");
            assert_eq!(ios(&query), "//*[contains(@label, 'err')]");
        }

        #[test]
        fn test_id_and_text() {
            let query = Query::new().id_and_text("title", "Vault");
            assert_eq!(
                android(&query),
                "//*[@resource-id='com.example.app:id/title' and @text='Vault']"
            );
        }
    }

    mod structure_tests {
        use super::*;

        #[test]
        fn test_index_is_one_based() {
            let query = Query::new().class("android.widget.Button").index(0);
            assert_eq!(android(&query), "//*[@class='android.widget.Button'][1]");
        }

        #[test]
        fn test_wrapped_index_wraps_whole_expression() {
            let query = Query::new().id("row").index_wrapped(2);
            assert_eq!(
                android(&query),
                "(//*[@resource-id='com.example.app:id/row'])[3]"
            );
        }

        #[test]
        fn test_root_parent_android() {
            let query = Query::new().text("A").root_parent().text("B");
            assert_eq!(
                android(&query),
                "//*[@text='A']/ancestor::hierarchy//*[@text='B']"
            );
        }

        #[test]
        fn test_root_parent_ios() {
            let query = Query::new().text("A").root_parent();
            assert_eq!(ios(&query), "//*[@label='A']/ancestor::AppiumAUT/*");
        }

        #[test]
        fn test_children_selectors() {
            assert_eq!(
                android(&Query::new().id("list").all_children()),
                "//*[@resource-id='com.example.app:id/list']//*"
            );
            assert_eq!(
                android(&Query::new().id("list").closest_children()),
                "//*[@resource-id='com.example.app:id/list']/*"
            );
        }

        #[test]
        fn test_closest_parent_of_child_with_id() {
            let query = Query::new().closest_parent_of_child_with_id("icon");
            assert_eq!(
                android(&query),
                "//*[@resource-id='com.example.app:id/icon']/.."
            );
        }

        #[test]
        fn test_element_with_class_and_child_texts() {
            let query =
                Query::new().element_with_class_and_child_texts("XCUIElementTypeCell", &["A", "B"]);
            assert_eq!(
                ios(&query),
                "//*[@type='XCUIElementTypeCell' and .//*[@label='A'] and .//*[@label='B']]"
            );
        }

        #[test]
        fn test_element_with_class_and_no_child_text() {
            let query =
                Query::new().element_with_class_and_no_child_text("XCUIElementTypeCell", "Done");
            assert_eq!(
                ios(&query),
                "//*[@type='XCUIElementTypeCell' and not(.//*[@label='Done'])]"
            );
        }
    }

    mod platform_class_tests {
        use super::*;

        #[test]
        fn test_text_input_class_android() {
            let query = Query::new().text_input_class();
            assert_eq!(android(&query), "//*[@class='android.widget.EditText']");
        }

        #[test]
        fn test_text_input_class_ios_lists_alternatives() {
            let query = Query::new().text_input_class();
            let rendered = ios(&query);
            assert!(rendered.contains("@type='XCUIElementTypeTextField'"));
            assert!(rendered.contains("@type='XCUIElementTypeSecureTextField'"));
            assert!(rendered.contains(" or "));
        }

        #[test]
        fn test_checkbox_class() {
            assert_eq!(
                android(&Query::new().checkbox_class()),
                "//*[@class='android.widget.CheckBox']"
            );
            assert_eq!(
                ios(&Query::new().checkbox_class()),
                "//*[@type='XCUIElementTypeSwitch']"
            );
        }

        #[test]
        fn test_dialog_android_chains_texts() {
            let query = Query::new().dialog(&["Log out", "Cancel"]);
            assert_eq!(
                android(&query),
                "//*[@text='Log out']/ancestor::hierarchy//*[@text='Cancel']"
            );
        }

        #[test]
        fn test_dialog_ios_pins_alert_container() {
            let query = Query::new().dialog(&["Log out"]);
            let rendered = ios(&query);
            assert!(rendered.starts_with("//*[@type='XCUIElementTypeAlert']"));
            assert!(rendered.ends_with("/ancestor::XCUIElementTypeAlert"));
        }
    }

    mod composition_tests {
        use super::*;

        #[test]
        fn test_render_onto_appends() {
            let base = "//*[@resource-id='com.example.app:id/screen']";
            let query = Query::new().text("Save");
            assert_eq!(
                query.render_onto(base, Platform::Android.dialect(), PKG),
                "//*[@resource-id='com.example.app:id/screen']//*[@text='Save']"
            );
        }

        #[test]
        fn test_clone_keeps_fragments_independent() {
            let parent = Query::new().id("screen");
            let child_a = parent.clone().text("A");
            let child_b = parent.clone().text("B");
            // Extending one sibling never leaks into the other.
            assert_ne!(android(&child_a), android(&child_b));
            assert_eq!(android(&parent), "//*[@resource-id='com.example.app:id/screen']");
        }

        #[test]
        fn test_empty_query_renders_empty() {
            assert_eq!(android(&Query::new()), "");
            assert!(Query::new().is_empty());
        }

        #[test]
        fn test_raw_escape_hatch() {
            let query = Query::new().raw("//*[@displayed='true']");
            assert_eq!(android(&query), "//*[@displayed='true']");
        }
    }
}
