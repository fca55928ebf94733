// crates/librilabs-verify/src/checks.rs
// ============================================================================
// Module: Page Checks
// Description: Independent pass/fail checks over rendered markup.
// Purpose: Evaluate served-instance and isolated-component properties.
// Dependencies: librilabs-page, scraper
// ============================================================================

//! ## Overview
//! Each check evaluates one observable property and records a
//! [`CheckResult`]. Checks never short-circuit each other: a failed title
//! check still lets the heading, welcome, and landmark checks run.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use librilabs_page::PRODUCT_NAME;
use librilabs_page::WELCOME_TEXT;

use crate::document::RenderedDocument;
use crate::document::is_descendant_of;
use crate::document::is_visible;
use crate::document::text_content;

// ============================================================================
// SECTION: Check Names
// ============================================================================

/// Check name for the document title.
pub const TITLE_CHECK: &str = "document_title";
/// Check name for the single visible product heading.
pub const HEADING_CHECK: &str = "product_heading_visible_once";
/// Check name for the welcome passage.
pub const WELCOME_CHECK: &str = "welcome_text_visible";
/// Check name for the main landmark containing the heading.
pub const LANDMARK_CHECK: &str = "main_landmark_contains_heading";
/// Check name for isolated component rendering.
pub const COMPONENT_CHECK: &str = "component_text_exact";

// ============================================================================
// SECTION: Results
// ============================================================================

/// Outcome of a single check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// The property held.
    Passed,
    /// The property did not hold.
    Failed {
        /// Description of the expected value.
        expected: String,
        /// Description of the observed value.
        actual: String,
    },
}

/// Named result of one check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    /// Stable check identifier.
    pub name: &'static str,
    /// Pass or fail with details.
    pub outcome: CheckOutcome,
}

impl CheckResult {
    /// Builds a passing result.
    #[must_use]
    pub const fn pass(name: &'static str) -> Self {
        Self {
            name,
            outcome: CheckOutcome::Passed,
        }
    }

    /// Builds a failing result.
    #[must_use]
    pub fn fail(name: &'static str, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self {
            name,
            outcome: CheckOutcome::Failed {
                expected: expected.into(),
                actual: actual.into(),
            },
        }
    }

    /// Returns true when the check passed.
    #[must_use]
    pub const fn passed(&self) -> bool {
        matches!(self.outcome, CheckOutcome::Passed)
    }
}

impl fmt::Display for CheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            CheckOutcome::Passed => write!(f, "PASS {}", self.name),
            CheckOutcome::Failed {
                expected,
                actual,
            } => write!(f, "FAIL {}: expected {expected}, actual {actual}", self.name),
        }
    }
}

/// Ordered collection of check results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckReport {
    /// Results in evaluation order.
    results: Vec<CheckResult>,
}

impl CheckReport {
    /// Appends a result.
    pub fn push(&mut self, result: CheckResult) {
        self.results.push(result);
    }

    /// Returns all results in evaluation order.
    #[must_use]
    pub fn results(&self) -> &[CheckResult] {
        &self.results
    }

    /// Returns true when every check passed.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.results.iter().all(CheckResult::passed)
    }

    /// Returns the failed checks.
    pub fn failures(&self) -> impl Iterator<Item = &CheckResult> {
        self.results.iter().filter(|result| !result.passed())
    }

    /// Returns the result recorded under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&CheckResult> {
        self.results.iter().find(|result| result.name == name)
    }
}

// ============================================================================
// SECTION: Served Instance Checks
// ============================================================================

/// Values the served root document is expected to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServedExpectations {
    /// Exact document title.
    pub title: String,
    /// Accessible name of the product heading.
    pub heading: String,
    /// Passage that must be visible.
    pub welcome_text: String,
}

impl Default for ServedExpectations {
    fn default() -> Self {
        Self {
            title: PRODUCT_NAME.to_string(),
            heading: PRODUCT_NAME.to_string(),
            welcome_text: WELCOME_TEXT.to_string(),
        }
    }
}

/// Evaluates the served-instance checks against a parsed root document.
#[must_use]
pub fn served_instance_checks(
    document: &RenderedDocument,
    expectations: &ServedExpectations,
) -> CheckReport {
    let mut report = CheckReport::default();
    report.push(check_title(document, &expectations.title));
    report.push(check_heading(document, &expectations.heading));
    report.push(check_welcome(document, &expectations.welcome_text));
    report.push(check_landmark(document, &expectations.heading));
    report
}

/// Title must equal the expected value exactly.
fn check_title(document: &RenderedDocument, expected: &str) -> CheckResult {
    match document.title() {
        Some(title) if title == expected => CheckResult::pass(TITLE_CHECK),
        Some(title) => CheckResult::fail(TITLE_CHECK, quoted(expected), quoted(&title)),
        None => CheckResult::fail(TITLE_CHECK, quoted(expected), "no title element"),
    }
}

/// Exactly one visible heading carries the expected name.
fn check_heading(document: &RenderedDocument, name: &str) -> CheckResult {
    let visible = document.headings_named(name).into_iter().filter(|heading| is_visible(*heading)).count();
    if visible == 1 {
        CheckResult::pass(HEADING_CHECK)
    } else {
        CheckResult::fail(
            HEADING_CHECK,
            format!("1 visible heading named {}", quoted(name)),
            format!("{visible} visible headings"),
        )
    }
}

/// Welcome passage appears in visible text.
fn check_welcome(document: &RenderedDocument, passage: &str) -> CheckResult {
    if document.visible_text_contains(passage) {
        CheckResult::pass(WELCOME_CHECK)
    } else {
        CheckResult::fail(WELCOME_CHECK, format!("visible text {}", quoted(passage)), "not visible")
    }
}

/// One main landmark exists and the visible heading sits inside it.
fn check_landmark(document: &RenderedDocument, heading_name: &str) -> CheckResult {
    let landmarks = document.main_landmarks();
    let [main] = landmarks.as_slice() else {
        return CheckResult::fail(
            LANDMARK_CHECK,
            "exactly 1 main landmark",
            format!("{} main landmarks", landmarks.len()),
        );
    };
    let headings = document.headings_named(heading_name);
    let Some(heading) = headings.iter().find(|heading| is_visible(**heading)) else {
        return CheckResult::fail(
            LANDMARK_CHECK,
            format!("heading {} inside main", quoted(heading_name)),
            "heading missing",
        );
    };
    if is_descendant_of(*heading, *main) {
        CheckResult::pass(LANDMARK_CHECK)
    } else {
        CheckResult::fail(
            LANDMARK_CHECK,
            format!("heading {} inside main", quoted(heading_name)),
            "heading outside main",
        )
    }
}

// ============================================================================
// SECTION: Isolated Component Checks
// ============================================================================

/// Checks that the element carrying `data-testid="{test_id}"` in `markup`
/// shows exactly `expected` as its text content.
#[must_use]
pub fn isolated_component_check(markup: &str, test_id: &str, expected: &str) -> CheckResult {
    let document = RenderedDocument::parse_fragment(markup);
    let Some(element) = document.by_test_id(test_id) else {
        return CheckResult::fail(
            COMPONENT_CHECK,
            format!("element with data-testid={}", quoted(test_id)),
            "no matching element",
        );
    };
    let actual = text_content(element);
    if actual == expected {
        CheckResult::pass(COMPONENT_CHECK)
    } else {
        CheckResult::fail(COMPONENT_CHECK, quoted(expected), quoted(&actual))
    }
}

/// Wraps `value` in double quotes for reporting.
fn quoted(value: &str) -> String {
    format!("\"{value}\"")
}

// ============================================================================
// SECTION: Tests
// ============================================================================
