// crates/librilabs-page/src/shell.rs
// ============================================================================
// Module: Page Shell
// Description: Document skeleton with fixed product metadata.
// Purpose: Wrap page content in a complete HTML document.
// Dependencies: maud
// ============================================================================

//! ## Overview
//! The page shell is the top-level document wrapper. It declares the document
//! language, sets the title and description from [`SiteMetadata`], and places
//! the caller's content inside exactly one `<body>` container.
//!
//! Invariants:
//! - Metadata is fixed configuration, never derived from request input.
//! - Children are inserted as given; the shell neither validates nor rewrites
//!   them.

// ============================================================================
// SECTION: Imports
// ============================================================================

use maud::DOCTYPE;
use maud::Markup;
use maud::Render;
use maud::html;

use crate::components::home_page;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Product name used as the document title.
pub const PRODUCT_NAME: &str = "Librilabs Translator";
/// One-line product description used for the description meta tag.
pub const PRODUCT_DESCRIPTION: &str = "Translation application";
/// Language declared on the root element.
pub const DOCUMENT_LANG: &str = "en";

// ============================================================================
// SECTION: Metadata
// ============================================================================

/// Document-level metadata written by the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SiteMetadata {
    /// Value of the `<title>` element.
    pub title: &'static str,
    /// Value of the `description` meta tag.
    pub description: &'static str,
    /// Value of the `lang` attribute on `<html>`.
    pub lang: &'static str,
}

impl SiteMetadata {
    /// Metadata for the Librilabs Translator product.
    pub const PRODUCT: Self = Self {
        title: PRODUCT_NAME,
        description: PRODUCT_DESCRIPTION,
        lang: DOCUMENT_LANG,
    };
}

impl Default for SiteMetadata {
    fn default() -> Self {
        Self::PRODUCT
    }
}

// ============================================================================
// SECTION: Rendering
// ============================================================================

/// Wraps `children` in the product document skeleton.
#[must_use]
pub fn page_shell(children: impl Render) -> Markup {
    page_shell_with(SiteMetadata::PRODUCT, children)
}

/// Wraps `children` in a document skeleton carrying `metadata`.
#[must_use]
pub fn page_shell_with(metadata: SiteMetadata, children: impl Render) -> Markup {
    html! {
        (DOCTYPE)
        html lang=(metadata.lang) {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (metadata.title) }
                meta name="description" content=(metadata.description);
            }
            body {
                (children)
            }
        }
    }
}

/// Renders the root route document: the shell around the home page.
#[must_use]
pub fn render_home_document() -> String {
    page_shell(home_page()).into_string()
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test-only assertions."
    )]

    use maud::PreEscaped;
    use maud::html;

    use super::PRODUCT_DESCRIPTION;
    use super::PRODUCT_NAME;
    use super::SiteMetadata;
    use super::page_shell;
    use super::page_shell_with;
    use super::render_home_document;

    #[test]
    fn shell_sets_language_title_and_description() {
        let document = page_shell(html! {}).into_string();
        assert!(document.starts_with("<!DOCTYPE html>"));
        assert!(document.contains(r#"<html lang="en">"#));
        assert!(document.contains(&format!("<title>{PRODUCT_NAME}</title>")));
        assert!(
            document.contains(&format!(r#"<meta name="description" content="{PRODUCT_DESCRIPTION}">"#))
        );
    }

    #[test]
    fn shell_accepts_empty_children() {
        let document = page_shell(html! {}).into_string();
        assert!(document.contains("<body></body>"));
    }

    #[test]
    fn shell_inserts_children_unmodified() {
        let children = PreEscaped("<section id=\"a\">one</section><p>two &amp; three</p>");
        let document = page_shell(children).into_string();
        assert!(
            document.contains("<body><section id=\"a\">one</section><p>two &amp; three</p></body>")
        );
    }

    #[test]
    fn shell_has_exactly_one_body_container() {
        let document = page_shell(html! { div { "x" } div { "y" } }).into_string();
        assert_eq!(document.matches("<body>").count(), 1);
        assert_eq!(document.matches("</body>").count(), 1);
    }

    #[test]
    fn shell_carries_explicit_metadata_verbatim() {
        let metadata = SiteMetadata {
            title: "Other & Title",
            description: "Other description",
            lang: "fr",
        };
        let document = page_shell_with(metadata, html! {}).into_string();
        assert!(document.contains(r#"<html lang="fr">"#));
        assert!(document.contains("<title>Other &amp; Title</title>"));
        assert!(document.contains(r#"content="Other description""#));
    }

    #[test]
    fn default_metadata_is_product_metadata() {
        assert_eq!(SiteMetadata::default(), SiteMetadata::PRODUCT);
    }

    #[test]
    fn home_document_is_stable_across_renders() {
        assert_eq!(render_home_document(), render_home_document());
    }
}
