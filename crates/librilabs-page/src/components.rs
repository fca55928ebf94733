// crates/librilabs-page/src/components.rs
// ============================================================================
// Module: Page Components
// Description: Content components rendered inside the page shell.
// Purpose: Provide the home page content and a standalone message component.
// Dependencies: maud
// ============================================================================

//! ## Overview
//! Components render content only; they never emit document metadata. The
//! home page supplies the visible heading and welcome passage for the root
//! route, and [`message_component`] renders a single string input verbatim.

// ============================================================================
// SECTION: Imports
// ============================================================================

use maud::Markup;
use maud::html;

use crate::shell::PRODUCT_NAME;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Welcome passage shown on the home page.
pub const WELCOME_TEXT: &str = "Welcome to the translation application";
/// `data-testid` value of the message component container.
pub const EXAMPLE_MESSAGE_TEST_ID: &str = "example-message";

// ============================================================================
// SECTION: Components
// ============================================================================

/// Home page content: one main landmark holding the product heading and the
/// welcome passage.
#[must_use]
pub fn home_page() -> Markup {
    html! {
        main {
            h1 { (PRODUCT_NAME) }
            p { (WELCOME_TEXT) }
        }
    }
}

/// Renders `message` verbatim inside a container identified by
/// [`EXAMPLE_MESSAGE_TEST_ID`].
///
/// The text is HTML-escaped but otherwise untouched: no trimming, no case
/// changes, no truncation.
#[must_use]
pub fn message_component(message: &str) -> Markup {
    html! {
        div data-testid=(EXAMPLE_MESSAGE_TEST_ID) { (message) }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
