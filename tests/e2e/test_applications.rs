use crate::e2e::helpers;

use chrono::{Duration, Utc};
use helpers::payloads::sample_profile;
use helpers::TestContext;
use hyper::StatusCode;
use pretty_assertions::assert_eq;
use resume_tailor_backend::domain::user::SubscriptionTier;
use serde_json::json;
use test_context::test_context;
use uuid::Uuid;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_create_an_application(ctx: &TestContext) {
    let (user, token) = ctx
        .signed_in_user("free@example.com", SubscriptionTier::Free)
        .await
        .unwrap();

    let response = ctx
        .client
        .post_with_auth(
            "/api/cv/applications",
            &json!({
                "jobTitle": "Rust Engineer",
                "companyName": "Ferrous Systems",
                "jobDescription": "Build async services",
                "tailoredProfile": sample_profile(),
                "matchScore": 142
            }),
            &token,
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::CREATED);
    let id: Uuid = response.json()["application"]["id"]
        .as_str()
        .unwrap()
        .parse()
        .unwrap();

    let stored = ctx.fixtures.get_application(id).await.unwrap().unwrap();
    assert_eq!(stored.user_id, user.id);
    assert_eq!(stored.status, "APPLIED");
    assert_eq!(stored.match_score, 100);
    assert_eq!(stored.tailored_resume["personal"]["fullName"], "Ada Lovelace");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_require_title_and_company(ctx: &TestContext) {
    let (_, token) = ctx
        .signed_in_user("free@example.com", SubscriptionTier::Free)
        .await
        .unwrap();

    ctx.client
        .post_with_auth(
            "/api/cv/applications",
            &json!({ "jobTitle": "Rust Engineer", "companyName": "  " }),
            &token,
        )
        .await
        .unwrap()
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("Job title and company name are required");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_list_only_own_applications_newest_first(ctx: &TestContext) {
    let (user, token) = ctx
        .signed_in_user("me@example.com", SubscriptionTier::Pro)
        .await
        .unwrap();
    let (other, _) = ctx
        .signed_in_user("other@example.com", SubscriptionTier::Pro)
        .await
        .unwrap();
    let now = Utc::now();
    ctx.fixtures
        .create_application(user.id, "Older", "Acme", now - Duration::days(3))
        .await
        .unwrap();
    ctx.fixtures
        .create_application(user.id, "Newer", "Acme", now - Duration::days(1))
        .await
        .unwrap();
    ctx.fixtures
        .create_application(other.id, "Someone else's", "Acme", now)
        .await
        .unwrap();

    let response = ctx
        .client
        .get_with_auth("/api/cv/applications", &token)
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    let applications = response.json()["applications"].as_array().unwrap();
    let titles: Vec<&str> = applications
        .iter()
        .map(|a| a["jobTitle"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Newer", "Older"]);
    assert_eq!(applications[0]["status"], "applied");
    assert_eq!(applications[0]["companyName"], "Acme");
    assert_eq!(applications[0]["matchScore"], 70);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_update_status_ignoring_case(ctx: &TestContext) {
    let (user, token) = ctx
        .signed_in_user("me@example.com", SubscriptionTier::Pro)
        .await
        .unwrap();
    let id = ctx
        .fixtures
        .create_application(user.id, "Rust Engineer", "Acme", Utc::now())
        .await
        .unwrap();

    let response = ctx
        .client
        .patch_with_auth(
            &format!("/api/cv/applications/{}", id),
            &json!({ "status": "Interviewing" }),
            &token,
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.json()["success"], true);
    let stored = ctx.fixtures.get_application(id).await.unwrap().unwrap();
    assert_eq!(stored.status, "INTERVIEWING");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_unknown_statuses(ctx: &TestContext) {
    let (user, token) = ctx
        .signed_in_user("me@example.com", SubscriptionTier::Pro)
        .await
        .unwrap();
    let id = ctx
        .fixtures
        .create_application(user.id, "Rust Engineer", "Acme", Utc::now())
        .await
        .unwrap();

    ctx.client
        .patch_with_auth(
            &format!("/api/cv/applications/{}", id),
            &json!({ "status": "hired" }),
            &token,
        )
        .await
        .unwrap()
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("Invalid status. Must be one of:");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_hide_other_users_applications(ctx: &TestContext) {
    let (owner, _) = ctx
        .signed_in_user("owner@example.com", SubscriptionTier::Pro)
        .await
        .unwrap();
    let (_, token) = ctx
        .signed_in_user("intruder@example.com", SubscriptionTier::Pro)
        .await
        .unwrap();
    let id = ctx
        .fixtures
        .create_application(owner.id, "Rust Engineer", "Acme", Utc::now())
        .await
        .unwrap();
    let path = format!("/api/cv/applications/{}", id);

    ctx.client
        .patch_with_auth(&path, &json!({ "status": "offer" }), &token)
        .await
        .unwrap()
        .assert_status(StatusCode::NOT_FOUND)
        .assert_error_message("Application not found");
    ctx.client
        .delete_with_auth(&path, &token)
        .await
        .unwrap()
        .assert_status(StatusCode::NOT_FOUND);

    let stored = ctx.fixtures.get_application(id).await.unwrap().unwrap();
    assert_eq!(stored.status, "APPLIED");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_treat_malformed_ids_as_missing(ctx: &TestContext) {
    let (_, token) = ctx
        .signed_in_user("me@example.com", SubscriptionTier::Pro)
        .await
        .unwrap();

    ctx.client
        .delete_with_auth("/api/cv/applications/not-a-uuid", &token)
        .await
        .unwrap()
        .assert_status(StatusCode::NOT_FOUND)
        .assert_error_message("Application not found");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_delete_an_application(ctx: &TestContext) {
    let (user, token) = ctx
        .signed_in_user("me@example.com", SubscriptionTier::Pro)
        .await
        .unwrap();
    let id = ctx
        .fixtures
        .create_application(user.id, "Rust Engineer", "Acme", Utc::now())
        .await
        .unwrap();

    ctx.client
        .delete_with_auth(&format!("/api/cv/applications/{}", id), &token)
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    assert!(ctx.fixtures.get_application(id).await.unwrap().is_none());
}
