// crates/librilabs-verify/src/document.rs
// ============================================================================
// Module: Rendered Document
// Description: Queryable view over parsed HTML markup.
// Purpose: Answer title, heading, landmark, and visibility questions.
// Dependencies: scraper
// ============================================================================

//! ## Overview
//! [`RenderedDocument`] parses markup with an HTML5 parser and exposes the
//! queries the checks need. Queries follow browser semantics closely enough
//! for server-rendered pages:
//! - the accessible name of an element is its `aria-label` when present,
//!   otherwise its whitespace-normalized text content;
//! - an element is visible when it sits inside `<body>` and neither it nor
//!   an ancestor is hidden (`hidden`, `aria-hidden="true"`, inline
//!   `display:none` or `visibility:hidden`);
//! - the title is the `<title>` text with whitespace stripped and collapsed,
//!   as `document.title` reports it;
//! - a passage is visible when some visible element's rendered text, with
//!   hidden descendants skipped and whitespace collapsed, contains it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use scraper::ElementRef;
use scraper::Html;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Heading element names.
const HEADING_TAGS: [&str; 6] = ["h1", "h2", "h3", "h4", "h5", "h6"];
/// Elements whose text never renders.
const NON_RENDERED_TAGS: [&str; 5] = ["head", "script", "style", "template", "noscript"];

// ============================================================================
// SECTION: Document
// ============================================================================

/// Parsed document or fragment ready for querying.
pub struct RenderedDocument {
    /// Parsed HTML tree.
    html: Html,
}

impl RenderedDocument {
    /// Parses a complete HTML document.
    #[must_use]
    pub fn parse(markup: &str) -> Self {
        Self {
            html: Html::parse_document(markup),
        }
    }

    /// Parses an HTML fragment, such as the output of a single component.
    #[must_use]
    pub fn parse_fragment(markup: &str) -> Self {
        Self {
            html: Html::parse_fragment(markup),
        }
    }

    /// Iterates every element in document order.
    fn elements(&self) -> impl Iterator<Item = ElementRef<'_>> {
        self.html.root_element().descendants().filter_map(ElementRef::wrap)
    }

    /// Returns the whitespace-normalized text of the first `<title>` element.
    #[must_use]
    pub fn title(&self) -> Option<String> {
        self.elements()
            .find(|element| element.value().name() == "title")
            .map(|element| normalize_whitespace(&text_content(element)))
    }

    /// Returns every heading whose accessible name equals `name`.
    #[must_use]
    pub fn headings_named(&self, name: &str) -> Vec<ElementRef<'_>> {
        self.elements()
            .filter(|element| is_heading(*element) && accessible_name(*element) == name)
            .collect()
    }

    /// Returns every main landmark (`<main>` or `role="main"`).
    #[must_use]
    pub fn main_landmarks(&self) -> Vec<ElementRef<'_>> {
        self.elements()
            .filter(|element| {
                element.value().name() == "main" || element.value().attr("role") == Some("main")
            })
            .collect()
    }

    /// Returns the first element carrying `data-testid="{test_id}"`.
    #[must_use]
    pub fn by_test_id(&self, test_id: &str) -> Option<ElementRef<'_>> {
        self.elements().find(|element| element.value().attr("data-testid") == Some(test_id))
    }

    /// Returns the whitespace-normalized visible text of `<body>`.
    #[must_use]
    pub fn visible_text(&self) -> String {
        self.elements()
            .find(|element| element.value().name() == "body")
            .map(|body| normalize_whitespace(&rendered_text(body)))
            .unwrap_or_default()
    }

    /// Returns true when some visible element's rendered text contains
    /// `passage`.
    #[must_use]
    pub fn visible_text_contains(&self, passage: &str) -> bool {
        let needle = normalize_whitespace(passage);
        self.elements()
            .filter(|element| is_visible(*element))
            .any(|element| normalize_whitespace(&rendered_text(element)).contains(&needle))
    }
}

// ============================================================================
// SECTION: Element Queries
// ============================================================================

/// Returns the exact text content of `element` and its descendants.
#[must_use]
pub fn text_content(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// Returns the accessible name of `element`.
#[must_use]
pub fn accessible_name(element: ElementRef<'_>) -> String {
    element
        .value()
        .attr("aria-label")
        .map_or_else(|| normalize_whitespace(&text_content(element)), normalize_whitespace)
}

/// Returns true when `element` is rendered and not hidden.
#[must_use]
pub fn is_visible(element: ElementRef<'_>) -> bool {
    let mut in_body = false;
    for node in std::iter::once(*element).chain(element.ancestors()) {
        let Some(ancestor) = ElementRef::wrap(node) else {
            continue;
        };
        let name = ancestor.value().name();
        if NON_RENDERED_TAGS.contains(&name) || is_hidden(ancestor) {
            return false;
        }
        if name == "body" {
            in_body = true;
        }
    }
    in_body
}

/// Concatenates the text under `element`, skipping hidden and non-rendered
/// subtrees. Adjacent nodes are joined without separators.
fn rendered_text(element: ElementRef<'_>) -> String {
    let mut text = String::new();
    push_rendered_text(element, &mut text);
    text
}

/// Appends the rendered text of `element`'s children to `out`.
fn push_rendered_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(value) = child.value().as_text() {
            out.push_str(value);
        } else if let Some(child) = ElementRef::wrap(child)
            && !NON_RENDERED_TAGS.contains(&child.value().name())
            && !is_hidden(child)
        {
            push_rendered_text(child, out);
        }
    }
}

/// Returns true when `element` has `ancestor` somewhere above it.
#[must_use]
pub fn is_descendant_of(element: ElementRef<'_>, ancestor: ElementRef<'_>) -> bool {
    element.ancestors().any(|node| node.id() == ancestor.id())
}

/// Returns true for heading elements and `role="heading"`.
fn is_heading(element: ElementRef<'_>) -> bool {
    HEADING_TAGS.contains(&element.value().name()) || element.value().attr("role") == Some("heading")
}

/// Returns true when the element itself hides its subtree.
fn is_hidden(element: ElementRef<'_>) -> bool {
    let value = element.value();
    if value.attr("hidden").is_some() || value.attr("aria-hidden") == Some("true") {
        return true;
    }
    value.attr("style").is_some_and(|style| {
        let compact: String =
            style.chars().filter(|ch| !ch.is_whitespace()).collect::<String>().to_ascii_lowercase();
        compact.contains("display:none") || compact.contains("visibility:hidden")
    })
}

/// Collapses runs of whitespace to single spaces and trims the ends.
fn normalize_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ============================================================================
// SECTION: Tests
// ============================================================================
