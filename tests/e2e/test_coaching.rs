use crate::e2e::helpers;

use chrono::Utc;
use helpers::payloads::{sample_profile, JOB_DESCRIPTION};
use helpers::TestContext;
use hyper::StatusCode;
use pretty_assertions::assert_eq;
use resume_tailor_backend::domain::user::SubscriptionTier;
use serde_json::json;
use test_context::test_context;

const LETTER: &str = "Dear Hiring Manager,\n\nI would love to build async services with you.";

fn questions_answer() -> String {
    json!({
        "questions": [
            { "question": "Tell us about a hard outage.", "type": "behavioral", "tip": "Use STAR" },
            { "question": "How does tokio schedule tasks?", "type": "technical", "tip": "Mention work stealing" },
            { "question": "", "type": "technical", "tip": "dropped" }
        ]
    })
    .to_string()
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_write_a_cover_letter_and_cache_it_on_the_application(ctx: &TestContext) {
    let (user, token) = ctx
        .signed_in_user("pro@example.com", SubscriptionTier::Pro)
        .await
        .unwrap();
    let application_id = ctx
        .fixtures
        .create_application(user.id, "Rust Engineer", "Ferrous Systems", Utc::now())
        .await
        .unwrap();
    ctx.completion.push(format!("  {}  ", LETTER));

    let response = ctx
        .client
        .post_with_auth(
            "/api/cv/cover-letter",
            &json!({
                "profile": sample_profile(),
                "jobDescription": JOB_DESCRIPTION,
                "options": { "tone": "enthusiastic", "companyName": "Ferrous Systems" },
                "applicationId": application_id.to_string()
            }),
            &token,
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.json()["coverLetter"], LETTER);
    assert!(response.json().get("fromCache").is_none());

    let request = &ctx.completion.requests()[0];
    assert!(!request.json_mode);
    assert!(request.user.contains("Ferrous Systems"));

    let stored = ctx.fixtures.get_application(application_id).await.unwrap().unwrap();
    assert_eq!(stored.cover_letter.as_deref(), Some(LETTER));
    assert_eq!(ctx.fixtures.usage_count(user.id).await.unwrap(), 1);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_serve_a_cached_cover_letter_for_free(ctx: &TestContext) {
    let (user, token) = ctx
        .signed_in_user("pro@example.com", SubscriptionTier::Pro)
        .await
        .unwrap();
    let application_id = ctx
        .fixtures
        .create_application(user.id, "Rust Engineer", "Ferrous Systems", Utc::now())
        .await
        .unwrap();
    ctx.fixtures
        .cache_cover_letter(application_id, "Already written")
        .await
        .unwrap();

    let response = ctx
        .client
        .post_with_auth(
            "/api/cv/cover-letter",
            &json!({
                "profile": sample_profile(),
                "jobDescription": JOB_DESCRIPTION,
                "applicationId": application_id.to_string()
            }),
            &token,
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.json()["coverLetter"], "Already written");
    assert_eq!(response.json()["fromCache"], true);
    assert_eq!(ctx.completion.call_count(), 0);
    assert_eq!(ctx.fixtures.usage_count(user.id).await.unwrap(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_ignore_another_users_application_cache(ctx: &TestContext) {
    let (owner, _) = ctx
        .signed_in_user("owner@example.com", SubscriptionTier::Pro)
        .await
        .unwrap();
    let (_, token) = ctx
        .signed_in_user("other@example.com", SubscriptionTier::Pro)
        .await
        .unwrap();
    let application_id = ctx
        .fixtures
        .create_application(owner.id, "Rust Engineer", "Ferrous Systems", Utc::now())
        .await
        .unwrap();
    ctx.fixtures
        .cache_cover_letter(application_id, "Owner's private letter")
        .await
        .unwrap();
    ctx.completion.push(LETTER);

    let response = ctx
        .client
        .post_with_auth(
            "/api/cv/cover-letter",
            &json!({
                "profile": sample_profile(),
                "jobDescription": JOB_DESCRIPTION,
                "applicationId": application_id.to_string()
            }),
            &token,
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.json()["coverLetter"], LETTER);

    let stored = ctx.fixtures.get_application(application_id).await.unwrap().unwrap();
    assert_eq!(stored.cover_letter.as_deref(), Some("Owner's private letter"));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_require_profile_and_job_description_for_cover_letters(ctx: &TestContext) {
    let (user, token) = ctx
        .signed_in_user("pro@example.com", SubscriptionTier::Pro)
        .await
        .unwrap();

    ctx.client
        .post_with_auth(
            "/api/cv/cover-letter",
            &json!({ "profile": sample_profile() }),
            &token,
        )
        .await
        .unwrap()
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("Profile and job description are required");

    assert_eq!(ctx.fixtures.usage_count(user.id).await.unwrap(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_generate_interview_questions(ctx: &TestContext) {
    let (user, token) = ctx
        .signed_in_user("pro@example.com", SubscriptionTier::Pro)
        .await
        .unwrap();
    let application_id = ctx
        .fixtures
        .create_application(user.id, "Rust Engineer", "Ferrous Systems", Utc::now())
        .await
        .unwrap();
    ctx.completion.push(questions_answer());

    let response = ctx
        .client
        .post_with_auth(
            "/api/cv/interview-prep",
            &json!({
                "profile": sample_profile(),
                "jobDescription": JOB_DESCRIPTION,
                "questionType": "technical",
                "applicationId": application_id.to_string()
            }),
            &token,
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    let questions = response.json()["questions"].as_array().unwrap();
    assert_eq!(questions.len(), 2);
    assert_eq!(questions[1]["type"], "technical");
    assert_eq!(questions[1]["tip"], "Mention work stealing");
    assert!(ctx.completion.requests()[0].json_mode);

    let stored = ctx.fixtures.get_application(application_id).await.unwrap().unwrap();
    assert_eq!(
        stored.interview_questions.unwrap().as_array().map(Vec::len),
        Some(2)
    );
    assert_eq!(ctx.fixtures.usage_count(user.id).await.unwrap(), 1);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_serve_cached_questions_without_a_job_description(ctx: &TestContext) {
    let (user, token) = ctx
        .signed_in_user("pro@example.com", SubscriptionTier::Pro)
        .await
        .unwrap();
    let application_id = ctx
        .fixtures
        .create_application(user.id, "Rust Engineer", "Ferrous Systems", Utc::now())
        .await
        .unwrap();
    ctx.fixtures
        .cache_interview_questions(
            application_id,
            &json!([{ "question": "Why Rust?", "type": "behavioral", "tip": "Be honest" }]),
        )
        .await
        .unwrap();

    let response = ctx
        .client
        .post_with_auth(
            "/api/cv/interview-prep",
            &json!({ "applicationId": application_id.to_string() }),
            &token,
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.json()["fromCache"], true);
    assert_eq!(response.json()["questions"][0]["question"], "Why Rust?");
    assert_eq!(ctx.completion.call_count(), 0);
    assert_eq!(ctx.fixtures.usage_count(user.id).await.unwrap(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_require_a_job_description_for_fresh_questions(ctx: &TestContext) {
    let (user, token) = ctx
        .signed_in_user("pro@example.com", SubscriptionTier::Pro)
        .await
        .unwrap();

    ctx.client
        .post_with_auth(
            "/api/cv/interview-prep",
            &json!({ "profile": sample_profile() }),
            &token,
        )
        .await
        .unwrap()
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("Job description is required");

    assert_eq!(ctx.fixtures.usage_count(user.id).await.unwrap(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_report_unparseable_question_answers(ctx: &TestContext) {
    let (_, token) = ctx
        .signed_in_user("pro@example.com", SubscriptionTier::Pro)
        .await
        .unwrap();
    ctx.completion.push("1. Why Rust?");

    ctx.client
        .post_with_auth(
            "/api/cv/interview-prep",
            &json!({ "jobDescription": JOB_DESCRIPTION }),
            &token,
        )
        .await
        .unwrap()
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR)
        .assert_error_message("Failed to parse AI response");
}
