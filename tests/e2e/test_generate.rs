use crate::e2e::helpers;

use chrono::{Duration, Utc};
use futures::future::join_all;
use helpers::payloads::{copied_answer, generate_request, tailored_answer, JOB_DESCRIPTION};
use helpers::signing::lemon_signature;
use helpers::{TestContext, LEMON_WEBHOOK_SECRET};
use hyper::StatusCode;
use pretty_assertions::assert_eq;
use resume_tailor_backend::domain::user::SubscriptionTier;
use resume_tailor_backend::infrastructure::repositories::CompletionError;
use serde_json::json;
use test_context::test_context;

fn close(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-6
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_generate_a_tailored_profile(ctx: &TestContext) {
    let (user, token) = ctx
        .signed_in_user("pro@example.com", SubscriptionTier::Pro)
        .await
        .unwrap();
    ctx.completion.push(tailored_answer().to_string());

    let response = ctx
        .client
        .post_with_auth("/api/cv/generate", &generate_request(), &token)
        .await
        .unwrap();

    response
        .assert_status(StatusCode::OK)
        .assert_header(
            "cache-control",
            "no-store, no-cache, must-revalidate, proxy-revalidate",
        )
        .assert_header("pragma", "no-cache")
        .assert_header("expires", "0");

    let body = response.json();
    assert_eq!(body["matchScore"], 87);
    assert_eq!(body["jobTitle"], "Senior Rust Engineer");
    assert_eq!(body["companyName"], "Ferrous Systems");
    assert_eq!(body["originalDescription"], JOB_DESCRIPTION);
    assert_eq!(
        body["layoutStrategy"]["sectionOrder"],
        json!(["skills", "experience", "education"])
    );

    // contact details never come from the model
    let personal = &body["tailoredProfile"]["personal"];
    assert_eq!(personal["email"], "ada@example.com");
    assert_eq!(personal["phone"], "+44 20 7946 0000");
    assert_eq!(personal["title"], "Senior Rust Engineer");
    // sections the model left out fall back to the original
    assert_eq!(
        body["tailoredProfile"]["education"][0]["institution"],
        "University of London"
    );

    let requests = ctx.completion.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].json_mode);
    assert!(close(requests[0].temperature, 0.3));
    assert!(requests[0]
        .user
        .contains("TEMPLATE STYLE: The user prefers the \"harvard\" style"));

    assert_eq!(ctx.fixtures.usage_count(user.id).await.unwrap(), 1);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_tailor_creatively_for_unrecognised_options(ctx: &TestContext) {
    let (_, token) = ctx
        .signed_in_user("pro@example.com", SubscriptionTier::Pro)
        .await
        .unwrap();
    ctx.completion.push(tailored_answer().to_string());
    let mut request = generate_request();
    request["options"] = json!({ "mode": "bold", "templateStyle": "fancy" });

    ctx.client
        .post_with_auth("/api/cv/generate", &request, &token)
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    let requests = ctx.completion.requests();
    assert!(close(requests[0].temperature, 0.7));
    assert!(requests[0].user.contains("\"harvard\" style"));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_retry_once_when_the_model_copies_the_profile(ctx: &TestContext) {
    let (user, token) = ctx
        .signed_in_user("pro@example.com", SubscriptionTier::Pro)
        .await
        .unwrap();
    ctx.completion.push(copied_answer().to_string());
    ctx.completion.push(tailored_answer().to_string());

    let response = ctx
        .client
        .post_with_auth("/api/cv/generate", &generate_request(), &token)
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.json()["matchScore"], 87);

    let requests = ctx.completion.requests();
    assert_eq!(requests.len(), 2);
    assert!(close(requests[1].temperature, 0.9));
    // a retried generation still costs one unit
    assert_eq!(ctx.fixtures.usage_count(user.id).await.unwrap(), 1);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_accept_the_retry_even_if_still_copied(ctx: &TestContext) {
    let (_, token) = ctx
        .signed_in_user("pro@example.com", SubscriptionTier::Pro)
        .await
        .unwrap();
    ctx.completion.always(copied_answer().to_string());

    let response = ctx
        .client
        .post_with_auth("/api/cv/generate", &generate_request(), &token)
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(ctx.completion.call_count(), 2);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_missing_fields_without_charging(ctx: &TestContext) {
    let (user, token) = ctx
        .signed_in_user("pro@example.com", SubscriptionTier::Pro)
        .await
        .unwrap();

    ctx.client
        .post_with_auth("/api/cv/generate", &json!({ "jobDescription": "x" }), &token)
        .await
        .unwrap()
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("Missing required fields: profile and jobDescription");

    ctx.client
        .post_with_auth(
            "/api/cv/generate",
            &json!({ "profile": { "personal": {} }, "jobDescription": "   " }),
            &token,
        )
        .await
        .unwrap()
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("Job description cannot be empty");

    let mut without_personal = generate_request();
    without_personal["profile"]["personal"] = json!(null);
    ctx.client
        .post_with_auth("/api/cv/generate", &without_personal, &token)
        .await
        .unwrap()
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("Missing required fields: profile and jobDescription");

    assert_eq!(ctx.fixtures.usage_count(user.id).await.unwrap(), 0);
    assert_eq!(ctx.completion.call_count(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_refuse_generation_when_quota_is_exhausted(ctx: &TestContext) {
    let (user, token) = ctx
        .signed_in_user("starter@example.com", SubscriptionTier::Starter)
        .await
        .unwrap();
    ctx.fixtures.set_usage(user.id, 20, Utc::now()).await.unwrap();

    let response = ctx
        .client
        .post_with_auth("/api/cv/generate", &generate_request(), &token)
        .await
        .unwrap();

    response
        .assert_status(StatusCode::FORBIDDEN)
        .assert_error_message("Monthly usage limit reached");
    let body = response.json();
    assert_eq!(body["tier"], "STARTER");
    assert_eq!(body["limit"], 20);
    assert_eq!(body["current"], 20);
    assert_eq!(body["upgradeUrl"], "/settings/billing");

    assert_eq!(ctx.completion.call_count(), 0);
    assert_eq!(ctx.fixtures.usage_count(user.id).await.unwrap(), 20);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_give_free_accounts_no_generations(ctx: &TestContext) {
    let (_, token) = ctx
        .signed_in_user("free@example.com", SubscriptionTier::Free)
        .await
        .unwrap();

    let response = ctx
        .client
        .post_with_auth("/api/cv/generate", &generate_request(), &token)
        .await
        .unwrap();

    response.assert_status(StatusCode::FORBIDDEN);
    assert_eq!(response.json()["limit"], 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_not_count_failed_generations(ctx: &TestContext) {
    let (user, token) = ctx
        .signed_in_user("pro@example.com", SubscriptionTier::Pro)
        .await
        .unwrap();
    ctx.completion.push("this is not json");

    ctx.client
        .post_with_auth("/api/cv/generate", &generate_request(), &token)
        .await
        .unwrap()
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR)
        .assert_error_message("AI analysis failed");

    assert_eq!(ctx.fixtures.usage_count(user.id).await.unwrap(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_map_provider_quota_to_service_unavailable(ctx: &TestContext) {
    let (_, token) = ctx
        .signed_in_user("pro@example.com", SubscriptionTier::Pro)
        .await
        .unwrap();
    ctx.completion.push_error(CompletionError::QuotaExceeded);

    ctx.client
        .post_with_auth("/api/cv/generate", &generate_request(), &token)
        .await
        .unwrap()
        .assert_status(StatusCode::SERVICE_UNAVAILABLE)
        .assert_error_message("AI service temporarily unavailable. Please try again later.");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_never_exceed_the_limit_under_concurrency(ctx: &TestContext) {
    let (user, token) = ctx
        .signed_in_user("starter@example.com", SubscriptionTier::Starter)
        .await
        .unwrap();
    ctx.fixtures.set_usage(user.id, 18, Utc::now()).await.unwrap();
    ctx.completion.always(tailored_answer().to_string());
    ctx.completion
        .delay_by(std::time::Duration::from_millis(200));

    let body = generate_request();
    let calls = (0..5).map(|_| {
        ctx.client
            .post_with_auth("/api/cv/generate", &body, &token)
    });
    let responses = join_all(calls).await;

    let succeeded = responses
        .iter()
        .filter(|r| r.as_ref().unwrap().status == StatusCode::OK)
        .count();
    let refused = responses
        .iter()
        .filter(|r| r.as_ref().unwrap().status == StatusCode::FORBIDDEN)
        .count();

    assert_eq!(succeeded, 2);
    assert_eq!(refused, 3);
    assert_eq!(ctx.fixtures.usage_count(user.id).await.unwrap(), 20);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reset_usage_in_a_new_month(ctx: &TestContext) {
    let (user, token) = ctx
        .signed_in_user("starter@example.com", SubscriptionTier::Starter)
        .await
        .unwrap();
    ctx.fixtures
        .set_usage(user.id, 20, Utc::now() - Duration::days(62))
        .await
        .unwrap();
    ctx.completion.push(tailored_answer().to_string());

    ctx.client
        .post_with_auth("/api/cv/generate", &generate_request(), &token)
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    let user = ctx.fixtures.get_user(user.id).await.unwrap();
    assert_eq!(user.usage_count, 1);
    assert!(Utc::now() - user.last_reset_date < Duration::minutes(1));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_report_usage(ctx: &TestContext) {
    let (user, token) = ctx
        .signed_in_user("pro@example.com", SubscriptionTier::Pro)
        .await
        .unwrap();
    ctx.fixtures.set_usage(user.id, 5, Utc::now()).await.unwrap();

    let response = ctx.client.get_with_auth("/api/usage", &token).await.unwrap();

    response.assert_status(StatusCode::OK);
    let body = response.json();
    assert_eq!(body["tier"], "PRO");
    assert_eq!(body["limit"], 70);
    assert_eq!(body["used"], 5);
    assert_eq!(body["remaining"], 65);
    assert!(body["resetsAt"].as_str().is_some());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_parse_pasted_resume_text(ctx: &TestContext) {
    let (user, token) = ctx
        .signed_in_user("pro@example.com", SubscriptionTier::Pro)
        .await
        .unwrap();
    ctx.completion.push(
        json!({
            "personal": { "fullName": "Grace Hopper", "email": "grace@example.com" },
            "experience": [{ "company": "US Navy", "role": "Rear Admiral" }],
            "skills": ["COBOL"]
        })
        .to_string(),
    );

    let response = ctx
        .client
        .post_with_auth(
            "/api/cv/parse",
            &json!({ "rawText": "Grace Hopper\nRear Admiral, US Navy\nCOBOL" }),
            &token,
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    let profile = &response.json()["profile"];
    assert_eq!(profile["personal"]["fullName"], "Grace Hopper");
    assert!(!profile["experience"][0]["id"].as_str().unwrap().is_empty());

    let request = &ctx.completion.requests()[0];
    assert!(close(request.temperature, 0.2));
    assert_eq!(request.max_tokens, 4000);
    // parsing needs remaining quota but does not spend it
    assert_eq!(ctx.fixtures.usage_count(user.id).await.unwrap(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_refuse_parsing_without_remaining_quota(ctx: &TestContext) {
    let (_, token) = ctx
        .signed_in_user("free@example.com", SubscriptionTier::Free)
        .await
        .unwrap();

    ctx.client
        .post_with_auth("/api/cv/parse", &json!({ "rawText": "Grace Hopper" }), &token)
        .await
        .unwrap()
        .assert_status(StatusCode::FORBIDDEN)
        .assert_error_message("Monthly usage limit reached");
    assert_eq!(ctx.completion.call_count(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_blank_resume_text(ctx: &TestContext) {
    let (_, token) = ctx
        .signed_in_user("pro@example.com", SubscriptionTier::Pro)
        .await
        .unwrap();

    ctx.client
        .post_with_auth("/api/cv/parse", &json!({ "rawText": "  " }), &token)
        .await
        .unwrap()
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("No text content provided for parsing");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_open_the_quota_after_upgrading(ctx: &TestContext) {
    let (user, token) = ctx
        .signed_in_user("upgrader@example.com", SubscriptionTier::Free)
        .await
        .unwrap();
    ctx.completion.always(tailored_answer().to_string());
    let body = generate_request();

    let refused = ctx
        .client
        .post_with_auth("/api/cv/generate", &body, &token)
        .await
        .unwrap();
    refused.assert_status(StatusCode::FORBIDDEN);
    assert_eq!(refused.json()["tier"], "FREE");
    assert_eq!(refused.json()["limit"], 0);

    let upgrade = json!({
        "meta": {
            "event_name": "subscription_created",
            "custom_data": { "user_id": user.id.to_string() }
        },
        "data": { "id": "sub_1", "attributes": { "customer_id": "1", "variant_id": "1000" } }
    })
    .to_string()
    .into_bytes();
    let signature = lemon_signature(LEMON_WEBHOOK_SECRET, &upgrade);
    ctx.client
        .post_raw("/api/lemonsqueezy/webhook", &upgrade, &[("x-signature", &signature)])
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    // the session token still says FREE; the gate reads the stored tier
    for _ in 0..20 {
        ctx.client
            .post_with_auth("/api/cv/generate", &body, &token)
            .await
            .unwrap()
            .assert_status(StatusCode::OK);
    }

    let exhausted = ctx
        .client
        .post_with_auth("/api/cv/generate", &body, &token)
        .await
        .unwrap();
    exhausted.assert_status(StatusCode::FORBIDDEN);
    assert_eq!(exhausted.json()["tier"], "STARTER");
    assert_eq!(exhausted.json()["current"], 20);
    assert_eq!(exhausted.json()["limit"], 20);
}
