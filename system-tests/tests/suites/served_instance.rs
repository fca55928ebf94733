// system-tests/tests/suites/served_instance.rs
// ============================================================================
// Module: Served Instance Tests
// Description: Front page checks against a running server.
// Purpose: Ensure the served root document shows the product shell.
// Dependencies: system-tests helpers, librilabs-verify
// ============================================================================

//! Served instance tests for Librilabs system-tests.

use librilabs_verify::CheckReport;
use librilabs_verify::ServedExpectations;
use librilabs_verify::ServedInstanceProbe;
use librilabs_verify::checks::HEADING_CHECK;
use librilabs_verify::checks::LANDMARK_CHECK;
use librilabs_verify::checks::TITLE_CHECK;
use librilabs_verify::checks::WELCOME_CHECK;

use crate::helpers;
use crate::helpers::harness::ServedTarget;

/// Runs the served-instance checks once against `target`.
async fn run_checks(target: &ServedTarget) -> Result<CheckReport, Box<dyn std::error::Error>> {
    let probe = ServedInstanceProbe::new(target.base_url(), helpers::harness::timeout()?)?;
    Ok(probe.run(&ServedExpectations::default()).await?)
}

/// Fails with the named check's report line unless it passed.
fn require_pass(report: &CheckReport, name: &str) -> Result<(), Box<dyn std::error::Error>> {
    match report.get(name) {
        Some(result) if result.passed() => Ok(()),
        Some(result) => Err(result.to_string().into()),
        None => Err(format!("check {name} was not evaluated").into()),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn title_is_product_name_on_every_visit() -> Result<(), Box<dyn std::error::Error>> {
    let target = ServedTarget::acquire().await?;
    let first = run_checks(&target).await?;
    let second = run_checks(&target).await?;
    target.release().await?;

    require_pass(&first, TITLE_CHECK)?;
    require_pass(&second, TITLE_CHECK)?;
    if first != second {
        return Err("repeated visits produced different reports".into());
    }
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn product_heading_is_visible_once() -> Result<(), Box<dyn std::error::Error>> {
    let target = ServedTarget::acquire().await?;
    let report = run_checks(&target).await?;
    target.release().await?;
    require_pass(&report, HEADING_CHECK)
}

#[tokio::test(flavor = "multi_thread")]
async fn welcome_text_is_visible() -> Result<(), Box<dyn std::error::Error>> {
    let target = ServedTarget::acquire().await?;
    let report = run_checks(&target).await?;
    target.release().await?;
    require_pass(&report, WELCOME_CHECK)
}

#[tokio::test(flavor = "multi_thread")]
async fn heading_sits_inside_single_main_landmark() -> Result<(), Box<dyn std::error::Error>> {
    let target = ServedTarget::acquire().await?;
    let report = run_checks(&target).await?;
    target.release().await?;
    require_pass(&report, LANDMARK_CHECK)
}
