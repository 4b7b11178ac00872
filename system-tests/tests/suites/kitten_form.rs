// system-tests/tests/suites/kitten_form.rs
// ============================================================================
// Module: Kitten Form Tests
// Description: End-to-end coverage of the add-kitten form.
// Purpose: Validate that form posts create kittens under the right agency.
// Dependencies: system-tests helpers
// ============================================================================

//! Kitten form system tests.

use cat_manager_core::AgencyId;
use cat_manager_core::NewAgency;
use helpers::harness::AGENCY_ID;
use helpers::harness::EnvironmentOptions;
use helpers::harness::TestEnvironment;
use helpers::harness::UNPRIVILEGED_USER_ID;
use helpers::harness::USER_ID;
use helpers::harness::kitten_form_path;
use helpers::harness::kittens_path;
use helpers::inspector::HtmlPage;
use reqwest::StatusCode;

use crate::helpers;

/// Test outcome; errors fail the test with their message.
type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Form fields for Paul Barner.
const PAUL: [(&str, &str); 3] =
    [("first_name", "Paul"), ("last_name", "Barner"), ("kitten_id", "kitten1")];

/// Starts an environment with agency 2 inserted.
async fn seeded() -> Result<TestEnvironment, String> {
    let env = TestEnvironment::start(EnvironmentOptions::new()).await?;
    env.reset_fixtures().await?;
    env.insert_agency(NewAgency::new(AgencyId::new(AGENCY_ID)).with_name("Whiskers Ltd")).await?;
    Ok(env)
}

#[tokio::test(flavor = "multi_thread")]
async fn form_page_renders_for_granted_user() -> TestResult {
    let env = seeded().await?;
    let cookie = env.ada_cookie(USER_ID)?;
    let response = env
        .get(&kitten_form_path(AGENCY_ID), Some(&cookie))
        .await?
        .expect_status(StatusCode::OK)?;
    let page = HtmlPage::parse(&response.body);
    assert_eq!(page.title()?, "Tes - Add kitten");
    assert_eq!(page.count(".t-kitten-form")?, 1);
    assert_eq!(page.texts("h1")?, vec!["Whiskers Ltd".to_string()]);
    env.shutdown().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn form_post_adds_kitten_to_list() -> TestResult {
    let env = seeded().await?;
    let cookie = env.ada_cookie(USER_ID)?;
    let created = env
        .post_form(&kitten_form_path(AGENCY_ID), Some(&cookie), &PAUL)
        .await?
        .expect_status(StatusCode::SEE_OTHER)?;
    assert_eq!(created.location.as_deref(), Some(kittens_path(AGENCY_ID).as_str()));

    let stored = env.get_kittens().await?;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].agency_id, AgencyId::new(AGENCY_ID));

    let list =
        env.get(&kittens_path(AGENCY_ID), Some(&cookie)).await?.expect_status(StatusCode::OK)?;
    assert_eq!(HtmlPage::parse(&list.body).texts(".t-kitten")?, vec!["Barner, Paul".to_string()]);
    env.shutdown().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn duplicate_kitten_id_conflicts() -> TestResult {
    let env = seeded().await?;
    let cookie = env.ada_cookie(USER_ID)?;
    let path = kitten_form_path(AGENCY_ID);
    env.post_form(&path, Some(&cookie), &PAUL).await?.expect_status(StatusCode::SEE_OTHER)?;
    env.post_form(&path, Some(&cookie), &PAUL).await?.expect_status(StatusCode::CONFLICT)?;
    assert_eq!(env.get_kittens().await?.len(), 1);
    env.shutdown().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn blank_names_are_rejected() -> TestResult {
    let env = seeded().await?;
    let cookie = env.ada_cookie(USER_ID)?;
    let fields = [("first_name", "  "), ("last_name", "Barner"), ("kitten_id", "kitten1")];
    env.post_form(&kitten_form_path(AGENCY_ID), Some(&cookie), &fields)
        .await?
        .expect_status(StatusCode::BAD_REQUEST)?;
    assert!(env.get_kittens().await?.is_empty());
    env.shutdown().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn form_post_enforces_access() -> TestResult {
    let env = seeded().await?;
    let path = kitten_form_path(AGENCY_ID);
    env.post_form(&path, None, &PAUL).await?.expect_status(StatusCode::UNAUTHORIZED)?;
    let outsider = env.bare_cookie(UNPRIVILEGED_USER_ID)?;
    env.post_form(&path, Some(&outsider), &PAUL).await?.expect_status(StatusCode::FORBIDDEN)?;
    assert!(env.get_kittens().await?.is_empty());
    env.shutdown().await;
    Ok(())
}
