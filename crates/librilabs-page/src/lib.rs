// crates/librilabs-page/src/lib.rs
// ============================================================================
// Module: Librilabs Page
// Description: Server-rendered page shell and page components.
// Purpose: Produce the root document served by the translator front end.
// Dependencies: maud
// ============================================================================

//! ## Overview
//! `librilabs-page` renders the Librilabs Translator front page. The
//! [`shell`] module owns the document skeleton (language, metadata, one body
//! container) and the [`components`] module owns the content placed inside
//! it. Rendering is pure and cannot fail: every function takes its inputs by
//! value or reference and returns markup.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod components;
pub mod shell;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use components::EXAMPLE_MESSAGE_TEST_ID;
pub use components::WELCOME_TEXT;
pub use components::home_page;
pub use components::message_component;
pub use maud::Markup;
pub use shell::DOCUMENT_LANG;
pub use shell::PRODUCT_DESCRIPTION;
pub use shell::PRODUCT_NAME;
pub use shell::SiteMetadata;
pub use shell::page_shell;
pub use shell::page_shell_with;
pub use shell::render_home_document;
