use crate::e2e::helpers;

use helpers::payloads::sample_profile;
use helpers::TestContext;
use hyper::StatusCode;
use pretty_assertions::assert_eq;
use resume_tailor_backend::domain::user::SubscriptionTier;
use serde_json::{json, Value};
use test_context::test_context;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_null_before_the_first_save(ctx: &TestContext) {
    let (_, token) = ctx
        .signed_in_user("new@example.com", SubscriptionTier::Free)
        .await
        .unwrap();

    let response = ctx.client.get_with_auth("/api/profile", &token).await.unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.json()["profile"], Value::Null);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_store_and_return_the_master_profile(ctx: &TestContext) {
    let (_, token) = ctx
        .signed_in_user("ada@example.com", SubscriptionTier::Free)
        .await
        .unwrap();
    let mut profile = sample_profile();
    profile["projects"] = json!([{ "name": "Difference Engine", "description": "Notes" }]);

    let saved = ctx
        .client
        .put_with_auth("/api/profile", &json!({ "profile": profile }), &token)
        .await
        .unwrap();

    saved.assert_status(StatusCode::OK);
    assert_eq!(saved.json()["success"], true);
    let project_id = saved.json()["profile"]["projects"][0]["id"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(!project_id.is_empty());
    // existing ids are kept
    assert_eq!(saved.json()["profile"]["experience"][0]["id"], "exp-1");

    let fetched = ctx.client.get_with_auth("/api/profile", &token).await.unwrap();
    fetched.assert_status(StatusCode::OK);
    let stored = &fetched.json()["profile"];
    assert_eq!(stored["personal"]["fullName"], "Ada Lovelace");
    assert_eq!(stored["skills"], json!(["Go", "Python", "PostgreSQL"]));
    assert_eq!(stored["projects"][0]["id"], project_id.as_str());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_the_saved_document_unchanged(ctx: &TestContext) {
    let (_, token) = ctx
        .signed_in_user("ada@example.com", SubscriptionTier::Free)
        .await
        .unwrap();
    let document = json!({
        "personal": { "fullName": "Ada", "email": "a@x.io", "portfolio": "ada.art" },
        "experience": [{ "id": "e1", "company": "X", "achievements": ["Shipped"] }],
        "skills": ["Rust", ""],
        "hobbies": ["chess"]
    });

    let saved = ctx
        .client
        .put_with_auth("/api/profile", &json!({ "profile": document }), &token)
        .await
        .unwrap();
    saved.assert_status(StatusCode::OK);
    assert_eq!(saved.json()["profile"], document);

    let fetched = ctx.client.get_with_auth("/api/profile", &token).await.unwrap();
    fetched.assert_status(StatusCode::OK);
    assert_eq!(fetched.json()["profile"], document);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_replace_the_profile_on_save(ctx: &TestContext) {
    let (_, token) = ctx
        .signed_in_user("ada@example.com", SubscriptionTier::Free)
        .await
        .unwrap();
    ctx.client
        .put_with_auth("/api/profile", &json!({ "profile": sample_profile() }), &token)
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    let mut updated = sample_profile();
    updated["skills"] = json!(["Rust"]);
    ctx.client
        .put_with_auth("/api/profile", &json!({ "profile": updated }), &token)
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    let fetched = ctx.client.get_with_auth("/api/profile", &token).await.unwrap();
    assert_eq!(fetched.json()["profile"]["skills"], json!(["Rust"]));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_require_a_profile_body(ctx: &TestContext) {
    let (_, token) = ctx
        .signed_in_user("ada@example.com", SubscriptionTier::Free)
        .await
        .unwrap();

    ctx.client
        .put_with_auth("/api/profile", &json!({}), &token)
        .await
        .unwrap()
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("Profile is required");

    ctx.client
        .put_with_auth("/api/profile", &json!({ "profile": "plain text" }), &token)
        .await
        .unwrap()
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("Profile is required");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_require_a_session_for_profiles(ctx: &TestContext) {
    ctx.client
        .get("/api/profile")
        .await
        .unwrap()
        .assert_status(StatusCode::UNAUTHORIZED);
}
