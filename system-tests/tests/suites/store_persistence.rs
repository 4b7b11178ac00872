// system-tests/tests/suites/store_persistence.rs
// ============================================================================
// Module: Store Persistence Tests
// Description: End-to-end persistence validation for the SQLite store backend.
// Purpose: Ensure agencies and kittens survive server restarts.
// Dependencies: system-tests helpers
// ============================================================================

//! `SQLite` kitten store persistence tests.

use cat_manager_core::AgencyId;
use cat_manager_core::NewAgency;
use helpers::harness::AGENCY_ID;
use helpers::harness::EnvironmentOptions;
use helpers::harness::TestEnvironment;
use helpers::harness::USER_ID;
use helpers::harness::kitten_form_path;
use helpers::harness::kittens_path;
use helpers::inspector::HtmlPage;
use reqwest::StatusCode;
use tempfile::TempDir;

use crate::helpers;

#[tokio::test(flavor = "multi_thread")]
async fn kittens_persist_across_restart() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let db_path = temp.path().join("kittens.sqlite");

    let first = TestEnvironment::start(EnvironmentOptions::new().with_database(&db_path)).await?;
    first.reset_fixtures().await?;
    first.insert_agency(NewAgency::new(AgencyId::new(AGENCY_ID))).await?;
    let cookie = first.ada_cookie(USER_ID)?;
    let fields = [("first_name", "Paul"), ("last_name", "Barner"), ("kitten_id", "kitten1")];
    first
        .post_form(&kitten_form_path(AGENCY_ID), Some(&cookie), &fields)
        .await?
        .expect_status(StatusCode::SEE_OTHER)?;
    first.shutdown().await;

    let second = TestEnvironment::start(EnvironmentOptions::new().with_database(&db_path)).await?;
    if second.get_agency(AGENCY_ID).await?.is_none() {
        return Err("agency should survive restart".into());
    }
    let cookie = second.ada_cookie(USER_ID)?;
    let response =
        second.get(&kittens_path(AGENCY_ID), Some(&cookie)).await?.expect_status(StatusCode::OK)?;
    let rows = HtmlPage::parse(&response.body).texts(".t-kitten")?;
    if rows != ["Barner, Paul"] {
        return Err(format!("expected one persisted kitten, got {}", rows.join(" | ")).into());
    }
    second.shutdown().await;
    Ok(())
}
