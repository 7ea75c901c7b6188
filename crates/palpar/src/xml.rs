//! Page-source XML: XPath evaluation and the iOS hierarchy rewrite.
//!
//! The evaluator is the single funnel between composed queries and the
//! device's accessibility tree. Evaluation failures are never "not found":
//! a query that cannot be parsed or a hierarchy that cannot be loaded is a
//! technical crash and must surface immediately rather than being retried.

use crate::geometry::Rect;
use crate::platform::PlatformDialect;
use crate::result::{PalparError, PalparResult};
use crate::viewdata::{PageNode, ViewData};
use sxd_document::dom::{Document, Element};
use sxd_document::{parser, writer, Package};
use sxd_xpath::{Context, Factory, Value};
use tracing::{debug, error};

/// Evaluate a composed XPath against page-source XML, producing the
/// ordered list of matching element snapshots.
///
/// `view_name` is used for log context and error messages only.
pub fn evaluate_xpath(
    dialect: &dyn PlatformDialect,
    view_name: &str,
    xpath: &str,
    xml: &str,
) -> PalparResult<Vec<ViewData>> {
    if xpath.is_empty() {
        return Err(PalparError::InvalidQuery {
            view: view_name.to_string(),
            message: "XPath is empty".to_string(),
        });
    }

    debug!(view = view_name, xpath, "evaluating query");

    select_nodes(dialect, xpath, xml).map_err(|source| {
        error!(view = view_name, %source, "error while selecting nodes");
        PalparError::TechnicalCrash {
            message: format!("Error while selecting nodes for {view_name}: {source}"),
        }
    })
}

fn select_nodes(
    dialect: &dyn PlatformDialect,
    xpath: &str,
    xml: &str,
) -> PalparResult<Vec<ViewData>> {
    let package = parse_source(xml)?;
    let document = package.as_document();

    let factory = Factory::new();
    let expression = factory
        .build(xpath)
        .map_err(|err| PalparError::Xml {
            message: format!("XPath '{xpath}' failed to parse: {err}"),
        })?
        .ok_or_else(|| PalparError::Xml {
            message: format!("XPath '{xpath}' produced no expression"),
        })?;

    let context = Context::new();
    let value = expression
        .evaluate(&context, document.root())
        .map_err(|err| PalparError::Xml {
            message: format!("XPath '{xpath}' failed to evaluate: {err}"),
        })?;

    let Value::Nodeset(nodes) = value else {
        return Err(PalparError::Xml {
            message: format!("XPath '{xpath}' did not select a node set"),
        });
    };

    nodes
        .document_order()
        .into_iter()
        .filter_map(|node| node.element())
        .map(|element| dialect.view_data(&page_node(element)))
        .collect()
}

fn page_node(element: Element<'_>) -> PageNode {
    let mut node = PageNode {
        tag: element.name().local_part().to_string(),
        ..PageNode::default()
    };
    for attribute in element.attributes() {
        node.attrs.insert(
            attribute.name().local_part().to_string(),
            attribute.value().to_string(),
        );
    }
    node
}

fn parse_source(xml: &str) -> PalparResult<Package> {
    parser::parse(xml).map_err(|err| PalparError::Xml {
        message: format!("page source is not valid XML: {err}"),
    })
}

fn serialize(document: &Document<'_>) -> PalparResult<String> {
    let mut buffer = Vec::new();
    writer::format_document(document, &mut buffer).map_err(|err| PalparError::Xml {
        message: format!("failed to serialize rewritten page source: {err}"),
    })?;
    String::from_utf8(buffer).map_err(|err| PalparError::Xml {
        message: format!("rewritten page source is not UTF-8: {err}"),
    })
}

fn root_element<'d>(document: &Document<'d>) -> PalparResult<Element<'d>> {
    document
        .root()
        .children()
        .into_iter()
        .find_map(|child| child.element())
        .ok_or_else(|| PalparError::Xml {
            message: "page source has no root element".to_string(),
        })
}

/// Rewrite a raw iOS accessibility hierarchy into the interactable view.
///
/// Two passes: every node below the root gains a synthetic `type`
/// attribute copied from its tag name (so iOS and Android expose a uniform
/// class axis), then nodes outside the device bounds — or outside an
/// enclosing scrollable container — are pruned, and straddling nodes are
/// clamped to the container bounds.
pub fn rewrite_ios_source(xml: &str, device_rect: Rect) -> PalparResult<String> {
    let package = parse_source(xml)?;
    let document = package.as_document();
    let root = root_element(&document)?;

    inject_type_attributes(root);
    prune_invisible(root, device_rect, false, None);

    serialize(&document)
}

/// Rewrite a "full" iOS hierarchy: only subtrees the platform itself marks
/// `visible='false'` are dropped; off-screen geometry is kept.
pub fn rewrite_ios_full_source(xml: &str) -> PalparResult<String> {
    let package = parse_source(xml)?;
    let document = package.as_document();
    let root = root_element(&document)?;

    cut_invisible_marked(root);

    serialize(&document)
}

fn child_elements(element: Element<'_>) -> Vec<Element<'_>> {
    element
        .children()
        .into_iter()
        .filter_map(|child| child.element())
        .collect()
}

fn inject_type_attributes(element: Element<'_>) {
    for child in child_elements(element) {
        let tag = child.name().local_part().to_string();
        child.set_attribute_value("type", &tag);
        inject_type_attributes(child);
    }
}

fn cut_invisible_marked(element: Element<'_>) {
    for child in child_elements(element) {
        if child.attribute_value("visible") == Some("false") {
            child.remove_from_parent();
            continue;
        }
        cut_invisible_marked(child);
    }
}

fn int_attr(element: Element<'_>, name: &str) -> Option<i32> {
    element.attribute_value(name).and_then(|raw| raw.parse().ok())
}

fn prune_invisible(
    element: Element<'_>,
    device_rect: Rect,
    has_scrollable_parent: bool,
    scrollable_rect: Option<Rect>,
) {
    // The scrollable rect is threaded through sibling order: once a scroll
    // view is seen, later siblings are judged against its bounds.
    let mut scrollable_rect = scrollable_rect;

    for child in child_elements(element) {
        let kind = child.attribute_value("type").map(ToString::to_string);
        let geometry = (
            int_attr(child, "x"),
            int_attr(child, "y"),
            int_attr(child, "width"),
            int_attr(child, "height"),
        );

        if let (Some(x), Some(y), Some(width), Some(height)) = geometry {
            let mut max_width = device_rect.width;
            let mut max_height = device_rect.height;

            let mut out_of_scroll_view = false;
            if has_scrollable_parent {
                if let Some(scroll) = scrollable_rect {
                    out_of_scroll_view = x + width <= scroll.x || y + height <= scroll.y;
                    max_height = (scroll.height + scroll.y).min(device_rect.height);
                    max_width = scroll.width + scroll.x;
                }
            }

            match kind.as_deref() {
                Some("XCUIElementTypeCell") => {
                    prune_invisible(child, device_rect, true, Some(Rect::new(x, y, width, height)));
                }
                Some("XCUIElementTypeScrollView" | "XCUIElementTypeTable") => {
                    scrollable_rect = Some(Rect::new(x, y, width, height));
                }
                _ => {}
            }

            let is_container = height > max_height || width > max_width;
            let is_out = x >= max_width || y >= max_height || out_of_scroll_view;

            if !is_container && is_out {
                child.remove_from_parent();
                continue;
            }

            if is_out {
                continue;
            }

            let parent_x = int_attr(element, "x");
            let parent_y = int_attr(element, "y");
            if let (Some(parent_x), Some(parent_y)) = (parent_x, parent_y) {
                if y < parent_y {
                    child.set_attribute_value("y", &parent_y.to_string());
                }
                if x < parent_x {
                    child.set_attribute_value("x", &parent_x.to_string());
                }
            }

            if x + width > max_width {
                child.set_attribute_value("width", &(max_width - x).to_string());
            }
            if y + height > max_height {
                child.set_attribute_value("height", &(max_height - y).to_string());
            }
        }

        let child_is_scrollable = matches!(
            kind.as_deref(),
            Some("XCUIElementTypeScrollView" | "XCUIElementTypeTable")
        );
        prune_invisible(
            child,
            device_rect,
            has_scrollable_parent || child_is_scrollable,
            scrollable_rect,
        );
    }
}
