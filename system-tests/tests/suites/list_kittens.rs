// system-tests/tests/suites/list_kittens.rs
// ============================================================================
// Module: List Kittens Tests
// Description: End-to-end coverage of the agency kitten list page.
// Purpose: Validate access order, scoping, sorting, and the add-kitten flag.
// Dependencies: system-tests helpers
// ============================================================================

//! Kitten list system tests.

use cat_manager_core::AgencyId;
use cat_manager_core::NewAgency;
use helpers::harness::AGENCY_ID;
use helpers::harness::EnvironmentOptions;
use helpers::harness::IN_HOUSE_ADMIN_ID;
use helpers::harness::IN_HOUSE_AGENCY_ID;
use helpers::harness::OTHER_AGENCY_ID;
use helpers::harness::TestEnvironment;
use helpers::harness::UNPRIVILEGED_USER_ID;
use helpers::harness::USER_ID;
use helpers::harness::kitten;
use helpers::harness::kitten_form_path;
use helpers::harness::kittens_path;
use helpers::inspector::HtmlPage;
use reqwest::StatusCode;

use crate::helpers;

/// Test outcome; errors fail the test with their message.
type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Starts an environment with fresh fixtures and agency 2 inserted.
async fn seeded(options: EnvironmentOptions) -> Result<TestEnvironment, String> {
    let env = TestEnvironment::start(options).await?;
    env.reset_fixtures().await?;
    env.insert_agency(NewAgency::new(AgencyId::new(AGENCY_ID))).await?;
    Ok(env)
}

/// Inserts the in-house agency and one kitten under it.
async fn seed_in_house(env: &TestEnvironment) -> Result<(), String> {
    env.insert_agency(NewAgency::new(AgencyId::new(IN_HOUSE_AGENCY_ID)).in_house()).await?;
    env.insert_kitten(kitten(IN_HOUSE_AGENCY_ID, "Paul", "Barner", "kitten1")).await?;
    Ok(())
}

// ============================================================================
// SECTION: Access
// ============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn list_requires_a_cookie() -> TestResult {
    let env = seeded(EnvironmentOptions::new()).await?;
    env.get(&kittens_path(AGENCY_ID), None).await?.expect_status(StatusCode::UNAUTHORIZED)?;
    env.shutdown().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn list_rejects_tampered_cookie() -> TestResult {
    let env = seeded(EnvironmentOptions::new()).await?;
    let cookie = env.ada_cookie(USER_ID)?;
    let forged = format!("{cookie}x");
    env.get(&kittens_path(AGENCY_ID), Some(&forged))
        .await?
        .expect_status(StatusCode::UNAUTHORIZED)?;
    env.shutdown().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn list_restricts_permission() -> TestResult {
    let env = seeded(EnvironmentOptions::new()).await?;
    let cookie = env.bare_cookie(UNPRIVILEGED_USER_ID)?;
    env.get(&kittens_path(AGENCY_ID), Some(&cookie))
        .await?
        .expect_status(StatusCode::FORBIDDEN)?;
    env.shutdown().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_agency_is_not_found() -> TestResult {
    let env = seeded(EnvironmentOptions::new()).await?;
    let cookie = env.ada_cookie(USER_ID)?;
    env.remove_agencies().await?;
    env.get(&kitten_form_path(AGENCY_ID), Some(&cookie))
        .await?
        .expect_status(StatusCode::NOT_FOUND)?;
    env.get(&kittens_path(AGENCY_ID), Some(&cookie))
        .await?
        .expect_status(StatusCode::NOT_FOUND)?;
    env.shutdown().await;
    Ok(())
}

// ============================================================================
// SECTION: Fixtures
// ============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn removed_fixtures_read_back_empty() -> TestResult {
    let env = seeded(EnvironmentOptions::new()).await?;
    env.insert_kitten(kitten(AGENCY_ID, "Paul", "Barner", "kitten1")).await?;
    if env.get_agency(AGENCY_ID).await?.is_none() {
        return Err("seeded agency should read back".into());
    }

    env.remove_kittens().await?;
    env.remove_agencies().await?;
    if !env.get_kittens().await?.is_empty() {
        return Err("kittens should be empty after removal".into());
    }
    if env.get_agency(AGENCY_ID).await?.is_some() {
        return Err("agency should be absent after removal".into());
    }
    // Removal is idempotent.
    assert_eq!(env.remove_kittens().await?, 0);
    assert_eq!(env.remove_agencies().await?, 0);
    env.shutdown().await;
    Ok(())
}

// ============================================================================
// SECTION: Listing
// ============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn list_shows_sorted_kittens_for_agency() -> TestResult {
    let env = seeded(EnvironmentOptions::new()).await?;
    tokio::try_join!(
        env.insert_kitten(kitten(AGENCY_ID, "Paul", "Barner", "kitten1")),
        env.insert_kitten(kitten(AGENCY_ID, "Annie", "Louise", "kitten2")),
    )?;
    assert_eq!(env.get_kittens().await?.len(), 2);

    let cookie = env.ada_cookie(USER_ID)?;
    let response =
        env.get(&kittens_path(AGENCY_ID), Some(&cookie)).await?.expect_status(StatusCode::OK)?;
    let page = HtmlPage::parse(&response.body);
    assert_eq!(page.title()?, "Tes - Kittens");
    assert_eq!(page.texts(".t-add-kitten")?, vec!["Add kitten".to_string()]);
    let rows = page.texts(".t-kitten")?;
    assert_eq!(rows.len(), 2);
    assert!(rows[0].contains("Barner, Paul"));
    assert!(rows[1].contains("Louise, Annie"));
    env.shutdown().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn list_hides_kittens_from_other_agencies() -> TestResult {
    let env = seeded(EnvironmentOptions::new()).await?;
    tokio::try_join!(
        env.insert_kitten(kitten(AGENCY_ID, "Paul", "Barner", "kitten1")),
        env.insert_kitten(kitten(OTHER_AGENCY_ID, "Annie", "Louise", "kitten2")),
    )?;
    assert_eq!(env.get_kittens().await?.len(), 2);

    let cookie = env.ada_cookie(USER_ID)?;
    let response =
        env.get(&kittens_path(AGENCY_ID), Some(&cookie)).await?.expect_status(StatusCode::OK)?;
    let rows = HtmlPage::parse(&response.body).texts(".t-kitten")?;
    assert_eq!(rows.len(), 1);
    let text = rows.concat();
    assert!(!text.contains("Louise, Annie"));
    assert!(text.contains("Barner, Paul"));
    env.shutdown().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn json_view_agrees_with_html() -> TestResult {
    let env = seeded(EnvironmentOptions::new()).await?;
    tokio::try_join!(
        env.insert_kitten(kitten(AGENCY_ID, "Annie", "Louise", "kitten2")),
        env.insert_kitten(kitten(AGENCY_ID, "Paul", "Barner", "kitten1")),
        env.insert_kitten(kitten(OTHER_AGENCY_ID, "Zed", "Aardvark", "kitten3")),
    )?;
    let cookie = env.ada_cookie(USER_ID)?;

    let view = env.get_kitten_view(AGENCY_ID, &cookie).await?;
    let labels: Vec<String> = view.kittens.iter().map(|row| row.label.clone()).collect();
    assert_eq!(labels, vec!["Barner, Paul".to_string(), "Louise, Annie".to_string()]);
    assert_eq!(view.title, "Tes - Kittens");
    assert_eq!(view.viewer, "Ada Lovelace");
    assert_eq!(view.agency.id, AgencyId::new(AGENCY_ID));

    let response =
        env.get(&kittens_path(AGENCY_ID), Some(&cookie)).await?.expect_status(StatusCode::OK)?;
    let page = HtmlPage::parse(&response.body);
    assert_eq!(page.texts(".t-kitten")?, labels);
    assert_eq!(page.attributes(".t-kitten", "data-kitten-id")?, vec!["kitten1", "kitten2"]);
    assert_eq!(page.count(".t-add-kitten")? == 1, view.show_add_kitten);
    env.shutdown().await;
    Ok(())
}

// ============================================================================
// SECTION: In-House Add Kitten Option
// ============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn in_house_option_hidden_when_flag_off() -> TestResult {
    let env = seeded(EnvironmentOptions::new()).await?;
    seed_in_house(&env).await?;
    let cookie = env.ada_cookie(IN_HOUSE_ADMIN_ID)?;
    let response = env
        .get(&kittens_path(IN_HOUSE_AGENCY_ID), Some(&cookie))
        .await?
        .expect_status(StatusCode::OK)?;
    assert_eq!(HtmlPage::parse(&response.body).count(".t-add-kitten")?, 0);
    env.shutdown().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn in_house_option_shown_when_flag_on() -> TestResult {
    let env = seeded(EnvironmentOptions::new().with_add_kitten_button()).await?;
    seed_in_house(&env).await?;
    let cookie = env.ada_cookie(IN_HOUSE_ADMIN_ID)?;
    let response = env
        .get(&kittens_path(IN_HOUSE_AGENCY_ID), Some(&cookie))
        .await?
        .expect_status(StatusCode::OK)?;
    assert_eq!(HtmlPage::parse(&response.body).count(".t-add-kitten")?, 1);
    env.shutdown().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn flag_state_does_not_leak_between_environments() -> TestResult {
    let flagged = seeded(EnvironmentOptions::new().with_add_kitten_button()).await?;
    let plain = seeded(EnvironmentOptions::new()).await?;
    seed_in_house(&flagged).await?;
    seed_in_house(&plain).await?;

    let path = kittens_path(IN_HOUSE_AGENCY_ID);
    let flagged_cookie = flagged.ada_cookie(IN_HOUSE_ADMIN_ID)?;
    let plain_cookie = plain.ada_cookie(IN_HOUSE_ADMIN_ID)?;
    let (on, off) = tokio::try_join!(
        flagged.get(&path, Some(&flagged_cookie)),
        plain.get(&path, Some(&plain_cookie)),
    )?;
    assert_eq!(HtmlPage::parse(&on.expect_status(StatusCode::OK)?.body).count(".t-add-kitten")?, 1);
    assert_eq!(
        HtmlPage::parse(&off.expect_status(StatusCode::OK)?.body).count(".t-add-kitten")?,
        0
    );
    flagged.shutdown().await;
    plain.shutdown().await;
    Ok(())
}
