//! Snapshots of resolved UI elements.
//!
//! A [`ViewData`] is created fresh from the current page source on every
//! query evaluation, never mutated, and either consumed by an assertion or
//! compared against another snapshot. Comparison is tolerant in geometry
//! (scroll physics make ±5 px jitter normal between two fetches of an
//! unchanged screen) and exact in everything else.

use crate::geometry::Rect;
use crate::result::{PalparError, PalparResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Geometry jitter treated as "nothing moved", in device pixels
pub const RECT_TOLERANCE_PX: i32 = 5;

/// A page-source node handed to the platform mapping: element tag name
/// plus its attributes. Built by the evaluator; platform-agnostic.
#[derive(Debug, Clone, Default)]
pub struct PageNode {
    /// Element tag name
    pub tag: String,
    /// Attribute name → value
    pub attrs: HashMap<String, String>,
}

impl PageNode {
    /// Create a node from a tag and attribute pairs
    #[must_use]
    pub fn new(tag: impl Into<String>, attrs: &[(&str, &str)]) -> Self {
        Self {
            tag: tag.into(),
            attrs: attrs
                .iter()
                .map(|(name, value)| ((*name).to_string(), (*value).to_string()))
                .collect(),
        }
    }

    /// Attribute value, if present
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// Attribute value or empty string
    #[must_use]
    pub fn attr_or_empty(&self, name: &str) -> String {
        self.attr(name).unwrap_or_default().to_string()
    }

    fn required_attr(&self, name: &str) -> PalparResult<&str> {
        self.attr(name).ok_or_else(|| PalparError::Xml {
            message: format!("<{}> node is missing the '{name}' attribute", self.tag),
        })
    }

    fn required_int(&self, name: &str) -> PalparResult<i32> {
        let raw = self.required_attr(name)?;
        raw.parse().map_err(|_| PalparError::Xml {
            message: format!("<{}> attribute '{name}'='{raw}' is not an integer", self.tag),
        })
    }

    fn flag(&self, name: &str) -> bool {
        self.attr(name) == Some("true")
    }
}

/// Immutable snapshot of one matched UI element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewData {
    /// On-screen rectangle in device pixels
    pub rect: Rect,
    /// Visible text (platform mapping: `text` / `label` / `value`)
    pub text: String,
    /// Enabled flag
    pub enabled: bool,
    /// Selected flag
    pub selected: bool,
    /// Checked flag (meaningful for checkbox-like classes only)
    pub checked: bool,
    /// Element class (`class` on Android, `type` on iOS)
    pub class: String,
    /// Identifier used in logs (`resource-id` / `name`)
    pub id: String,
}

impl ViewData {
    /// Map an Android UiAutomator node.
    ///
    /// The synthetic `hierarchy` root carries no `bounds`; its rectangle is
    /// reconstructed from the `width`/`height` attributes instead.
    pub fn from_android_node(node: &PageNode) -> PalparResult<Self> {
        let class = node.required_attr("class")?.to_string();

        let rect = if class == "hierarchy" {
            Rect::new(0, 0, node.required_int("width")?, node.required_int("height")?)
        } else {
            parse_android_bounds(node.required_attr("bounds")?)?
        };

        Ok(Self {
            rect,
            text: node.attr_or_empty("text"),
            enabled: node.flag("enabled"),
            selected: node.flag("selected"),
            checked: node.flag("checked"),
            id: node.attr_or_empty("resource-id"),
            class,
        })
    }

    /// Map an iOS accessibility-snapshot node (after hierarchy rewriting,
    /// so the synthetic `type` attribute is always present).
    pub fn from_ios_node(node: &PageNode) -> PalparResult<Self> {
        let class = node.required_attr("type")?.to_string();

        let rect = Rect::new(
            node.required_int("x")?,
            node.required_int("y")?,
            node.required_int("width")?,
            node.required_int("height")?,
        );

        let text = if matches!(
            class.as_str(),
            "XCUIElementTypeTextField" | "XCUIElementTypeSecureTextField" | "XCUIElementTypeSearchField"
        ) {
            node.attr_or_empty("value")
        } else if node.attr("label").is_some() {
            node.attr_or_empty("label")
        } else {
            node.attr_or_empty("value")
        };

        // Buttons report their toggled state through `value`.
        let selected =
            node.flag("selected") || (class == "XCUIElementTypeButton" && node.attr("value").is_some());

        let checked = if class == "XCUIElementTypeSwitch" {
            let raw = node.required_attr("value")?;
            let as_int: i32 = raw.parse().map_err(|_| PalparError::Xml {
                message: format!("switch value '{raw}' is not numeric"),
            })?;
            as_int == 1
        } else {
            false
        };

        Ok(Self {
            rect,
            text,
            enabled: node.flag("enabled"),
            selected,
            checked,
            id: node.attr_or_empty("name"),
            class,
        })
    }

    /// Tolerant equivalence: identity, text and state must match exactly,
    /// geometry may drift by up to [`RECT_TOLERANCE_PX`] per dimension.
    ///
    /// This is deliberately not `PartialEq` — tolerance is not transitive.
    #[must_use]
    pub fn matches(&self, other: &Self) -> bool {
        self.id == other.id
            && self.text == other.text
            && self.checked == other.checked
            && self.class == other.class
            && self.enabled == other.enabled
            && self.selected == other.selected
            && (self.rect.x - other.rect.x).abs() <= RECT_TOLERANCE_PX
            && (self.rect.y - other.rect.y).abs() <= RECT_TOLERANCE_PX
            && (self.rect.width - other.rect.width).abs() <= RECT_TOLERANCE_PX
            && (self.rect.height - other.rect.height).abs() <= RECT_TOLERANCE_PX
    }

    /// One-line description used by the resolution log
    #[must_use]
    pub fn describe(&self) -> String {
        format!(
            "'{}' [{}] text='{}' enabled={} selected={} checked={} at {}",
            self.id, self.class, self.text, self.enabled, self.selected, self.checked, self.rect
        )
    }
}

/// Parse the UiAutomator bounds format `[x1,y1][x2,y2]`.
fn parse_android_bounds(bounds: &str) -> PalparResult<Rect> {
    let malformed = || PalparError::Xml {
        message: format!("malformed bounds attribute '{bounds}'"),
    };

    let inner = bounds
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or_else(malformed)?;

    let (first, second) = inner.split_once("][").ok_or_else(malformed)?;

    let parse_pair = |pair: &str| -> PalparResult<(i32, i32)> {
        let (x, y) = pair.split_once(',').ok_or_else(malformed)?;
        Ok((
            x.trim().parse().map_err(|_| malformed())?,
            y.trim().parse().map_err(|_| malformed())?,
        ))
    };

    let (x1, y1) = parse_pair(first)?;
    let (x2, y2) = parse_pair(second)?;

    Ok(Rect::new(x1, y1, x2 - x1, y2 - y1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn android_button(bounds: &str) -> PageNode {
        PageNode::new(
            "node",
            &[
                ("class", "android.widget.Button"),
                ("bounds", bounds),
                ("text", "Save"),
                ("resource-id", "com.example.app:id/save"),
                ("enabled", "true"),
                ("selected", "false"),
                ("checked", "false"),
            ],
        )
    }

    mod android_mapping_tests {
        use super::*;

        #[test]
        fn test_bounds_become_rect() {
            let data = ViewData::from_android_node(&android_button("[10,20][110,70]")).unwrap();
            assert_eq!(data.rect, Rect::new(10, 20, 100, 50));
            assert_eq!(data.text, "Save");
            assert_eq!(data.id, "com.example.app:id/save");
            assert!(data.enabled);
            assert!(!data.checked);
        }

        #[test]
        fn test_hierarchy_root_uses_width_height() {
            let node = PageNode::new(
                "hierarchy",
                &[("class", "hierarchy"), ("width", "1080"), ("height", "2400")],
            );
            let data = ViewData::from_android_node(&node).unwrap();
            assert_eq!(data.rect, Rect::new(0, 0, 1080, 2400));
        }

        #[test]
        fn test_malformed_bounds_is_an_error() {
            let result = ViewData::from_android_node(&android_button("10,20,110,70"));
            assert!(matches!(result, Err(PalparError::Xml { .. })));
        }

        #[test]
        fn test_missing_class_is_an_error() {
            let node = PageNode::new("node", &[("bounds", "[0,0][1,1]")]);
            assert!(ViewData::from_android_node(&node).is_err());
        }
    }

    mod ios_mapping_tests {
        use super::*;

        fn ios_node(kind: &str, extra: &[(&str, &str)]) -> PageNode {
            let mut attrs = vec![
                ("type", kind),
                ("x", "0"),
                ("y", "100"),
                ("width", "390"),
                ("height", "44"),
                ("enabled", "true"),
            ];
            attrs.extend_from_slice(extra);
            PageNode::new(kind, &attrs)
        }

        #[test]
        fn test_label_is_text() {
            let data =
                ViewData::from_ios_node(&ios_node("XCUIElementTypeStaticText", &[("label", "Vault")]))
                    .unwrap();
            assert_eq!(data.text, "Vault");
        }

        #[test]
        fn test_text_field_prefers_value() {
            let data = ViewData::from_ios_node(&ios_node(
                "XCUIElementTypeTextField",
                &[("label", "Email"), ("value", "user@example.com")],
            ))
            .unwrap();
            assert_eq!(data.text, "user@example.com");
        }

        #[test]
        fn test_switch_value_maps_to_checked() {
            let on = ios_node("XCUIElementTypeSwitch", &[("value", "1")]);
            let off = ios_node("XCUIElementTypeSwitch", &[("value", "0")]);
            assert!(ViewData::from_ios_node(&on).unwrap().checked);
            assert!(!ViewData::from_ios_node(&off).unwrap().checked);
        }

        #[test]
        fn test_switch_without_numeric_value_is_an_error() {
            let node = ios_node("XCUIElementTypeSwitch", &[("value", "maybe")]);
            assert!(ViewData::from_ios_node(&node).is_err());
        }

        #[test]
        fn test_button_with_value_reads_selected() {
            let node = ios_node("XCUIElementTypeButton", &[("label", "Tab"), ("value", "1")]);
            assert!(ViewData::from_ios_node(&node).unwrap().selected);
        }
    }

    mod equivalence_tests {
        use super::*;

        fn base() -> ViewData {
            ViewData::from_android_node(&android_button("[10,20][110,70]")).unwrap()
        }

        #[test]
        fn test_identical_snapshots_match() {
            assert!(base().matches(&base()));
        }

        #[test]
        fn test_five_px_drift_matches() {
            let mut shifted = base();
            shifted.rect = Rect::new(15, 25, 105, 45);
            assert!(base().matches(&shifted));
        }

        #[test]
        fn test_six_px_drift_does_not_match() {
            let mut shifted = base();
            shifted.rect = Rect::new(16, 20, 100, 50);
            assert!(!base().matches(&shifted));
        }

        #[test]
        fn test_text_difference_never_matches() {
            let mut renamed = base();
            renamed.text = "Cancel".into();
            assert!(!base().matches(&renamed));
        }

        #[test]
        fn test_checked_difference_never_matches() {
            let mut toggled = base();
            toggled.checked = true;
            assert!(!base().matches(&toggled));
        }
    }
}
