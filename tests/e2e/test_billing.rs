use crate::e2e::helpers;

use chrono::Utc;
use helpers::fakes::SentEmail;
use helpers::signing::{lemon_signature, stripe_signature};
use helpers::{
    TestContext, LEMON_PRO_VARIANT, LEMON_WEBHOOK_SECRET, STRIPE_PRO_PRICE,
    STRIPE_UNLIMITED_PRICE, STRIPE_WEBHOOK_SECRET,
};
use hyper::StatusCode;
use pretty_assertions::assert_eq;
use resume_tailor_backend::domain::user::{SubscriptionTier, User};
use serde_json::{json, Value};
use test_context::test_context;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, ResponseTemplate};

fn lemon_event(event_name: &str, user: &User, variant_id: &str) -> Vec<u8> {
    json!({
        "meta": {
            "event_name": event_name,
            "custom_data": { "user_id": user.id.to_string(), "tier": "PRO", "billing_cycle": "monthly" }
        },
        "data": {
            "id": "sub_991",
            "type": "subscriptions",
            "attributes": {
                "customer_id": 55,
                "variant_id": variant_id.parse::<i64>().unwrap(),
                "user_email": user.email,
                "status": "active"
            }
        }
    })
    .to_string()
    .into_bytes()
}

async fn deliver_lemon(ctx: &TestContext, body: &[u8]) -> helpers::api_client::ApiResponse {
    let signature = lemon_signature(LEMON_WEBHOOK_SECRET, body);
    ctx.client
        .post_raw(
            "/api/lemonsqueezy/webhook",
            body,
            &[("x-signature", &signature)],
        )
        .await
        .unwrap()
}

fn stripe_event(kind: &str, object: Value) -> Vec<u8> {
    json!({ "id": "evt_1", "type": kind, "data": { "object": object } })
        .to_string()
        .into_bytes()
}

async fn deliver_stripe(ctx: &TestContext, body: &[u8]) -> helpers::api_client::ApiResponse {
    let signature = stripe_signature(STRIPE_WEBHOOK_SECRET, body, Utc::now().timestamp());
    ctx.client
        .post_raw(
            "/api/stripe/webhook",
            body,
            &[("stripe-signature", &signature)],
        )
        .await
        .unwrap()
}

fn subscription_object(id: &str, price: &str, user: Option<&User>, period_end: i64) -> Value {
    let metadata = match user {
        Some(user) => json!({ "userId": user.id.to_string() }),
        None => json!({}),
    };
    json!({
        "id": id,
        "object": "subscription",
        "customer": "cus_123",
        "status": "active",
        "current_period_end": period_end,
        "metadata": metadata,
        "items": { "data": [{ "price": { "id": price } }] }
    })
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_upgrade_on_lemon_subscription_created(ctx: &TestContext) {
    let user = ctx
        .fixtures
        .create_verified_user("buyer@example.com", SubscriptionTier::Free)
        .await
        .unwrap();
    ctx.fixtures.set_usage(user.id, 3, Utc::now()).await.unwrap();

    let response = deliver_lemon(
        ctx,
        &lemon_event("subscription_created", &user, LEMON_PRO_VARIANT),
    )
    .await;

    response.assert_status(StatusCode::OK);
    assert_eq!(response.json()["received"], true);

    let user = ctx.fixtures.get_user(user.id).await.unwrap();
    assert_eq!(user.subscription_tier, SubscriptionTier::Pro);
    assert_eq!(user.usage_count, 0);
    assert_eq!(user.lemon_customer_id.as_deref(), Some("55"));
    assert_eq!(user.lemon_subscription_id.as_deref(), Some("sub_991"));
    assert!(ctx.emails.sent().contains(&SentEmail::SubscriptionConfirmation {
        to: "buyer@example.com".to_string(),
        plan: "Pro".to_string(),
    }));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_fall_back_to_the_custom_tier_for_unknown_variants(ctx: &TestContext) {
    let user = ctx
        .fixtures
        .create_verified_user("buyer@example.com", SubscriptionTier::Free)
        .await
        .unwrap();

    deliver_lemon(ctx, &lemon_event("subscription_updated", &user, "9999"))
        .await
        .assert_status(StatusCode::OK);

    let user = ctx.fixtures.get_user(user.id).await.unwrap();
    assert_eq!(user.subscription_tier, SubscriptionTier::Pro);
    // only creation sends a confirmation
    assert!(ctx.emails.sent().is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_lemon_webhooks_with_a_bad_signature(ctx: &TestContext) {
    let user = ctx
        .fixtures
        .create_verified_user("buyer@example.com", SubscriptionTier::Free)
        .await
        .unwrap();
    let body = lemon_event("subscription_created", &user, LEMON_PRO_VARIANT);

    ctx.client
        .post_raw(
            "/api/lemonsqueezy/webhook",
            &body,
            &[("x-signature", "deadbeef")],
        )
        .await
        .unwrap()
        .assert_status(StatusCode::UNAUTHORIZED)
        .assert_error_message("Invalid signature");

    let user = ctx.fixtures.get_user(user.id).await.unwrap();
    assert_eq!(user.subscription_tier, SubscriptionTier::Free);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_downgrade_on_lemon_cancellation(ctx: &TestContext) {
    let user = ctx
        .fixtures
        .create_verified_user("buyer@example.com", SubscriptionTier::Pro)
        .await
        .unwrap();

    deliver_lemon(
        ctx,
        &lemon_event("subscription_cancelled", &user, LEMON_PRO_VARIANT),
    )
    .await
    .assert_status(StatusCode::OK);

    let user = ctx.fixtures.get_user(user.id).await.unwrap();
    assert_eq!(user.subscription_tier, SubscriptionTier::Free);
    assert!(user.lemon_subscription_id.is_none());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reset_usage_on_lemon_payment(ctx: &TestContext) {
    let user = ctx
        .fixtures
        .create_verified_user("buyer@example.com", SubscriptionTier::Starter)
        .await
        .unwrap();
    ctx.fixtures.set_usage(user.id, 20, Utc::now()).await.unwrap();

    deliver_lemon(
        ctx,
        &lemon_event("subscription_payment_success", &user, LEMON_PRO_VARIANT),
    )
    .await
    .assert_status(StatusCode::OK);

    assert_eq!(ctx.fixtures.usage_count(user.id).await.unwrap(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_acknowledge_lemon_events_without_a_user(ctx: &TestContext) {
    let body = json!({ "meta": { "event_name": "order_created" }, "data": { "id": "1" } })
        .to_string()
        .into_bytes();

    deliver_lemon(ctx, &body).await.assert_status(StatusCode::OK);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_apply_stripe_subscription_updates(ctx: &TestContext) {
    let user = ctx
        .fixtures
        .create_verified_user("buyer@example.com", SubscriptionTier::Free)
        .await
        .unwrap();
    let period_end = Utc::now().timestamp() + 30 * 24 * 3600;

    deliver_stripe(
        ctx,
        &stripe_event(
            "customer.subscription.updated",
            subscription_object("sub_1", STRIPE_PRO_PRICE, Some(&user), period_end),
        ),
    )
    .await
    .assert_status(StatusCode::OK);

    let user = ctx.fixtures.get_user(user.id).await.unwrap();
    assert_eq!(user.subscription_tier, SubscriptionTier::Pro);
    assert_eq!(user.stripe_subscription_id.as_deref(), Some("sub_1"));
    assert_eq!(
        user.subscription_end_date.map(|d| d.timestamp()),
        Some(period_end)
    );
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_stripe_webhooks_with_a_bad_signature(ctx: &TestContext) {
    let body = stripe_event(
        "customer.subscription.deleted",
        subscription_object("sub_1", STRIPE_PRO_PRICE, None, 0),
    );
    let forged = stripe_signature("whsec_wrong", &body, Utc::now().timestamp());

    ctx.client
        .post_raw(
            "/api/stripe/webhook",
            &body,
            &[("stripe-signature", &forged)],
        )
        .await
        .unwrap()
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("Webhook Error");

    ctx.client
        .post_raw(
            "/api/stripe/webhook",
            &body,
            &[],
        )
        .await
        .unwrap()
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("Webhook Error");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_stale_stripe_deliveries(ctx: &TestContext) {
    let body = stripe_event("invoice.payment_succeeded", json!({ "customer": "cus_123" }));
    let stale = stripe_signature(STRIPE_WEBHOOK_SECRET, &body, Utc::now().timestamp() - 3600);

    ctx.client
        .post_raw(
            "/api/stripe/webhook",
            &body,
            &[("stripe-signature", &stale)],
        )
        .await
        .unwrap()
        .assert_status(StatusCode::BAD_REQUEST);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_downgrade_when_stripe_subscription_is_deleted(ctx: &TestContext) {
    let user = ctx
        .fixtures
        .create_verified_user("buyer@example.com", SubscriptionTier::Unlimited)
        .await
        .unwrap();
    ctx.fixtures.set_stripe_customer(user.id, "cus_123").await.unwrap();

    // no metadata: the user is found by customer id
    deliver_stripe(
        ctx,
        &stripe_event(
            "customer.subscription.deleted",
            subscription_object("sub_1", STRIPE_UNLIMITED_PRICE, None, 0),
        ),
    )
    .await
    .assert_status(StatusCode::OK);

    let user = ctx.fixtures.get_user(user.id).await.unwrap();
    assert_eq!(user.subscription_tier, SubscriptionTier::Free);
    assert!(user.subscription_end_date.is_none());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reset_usage_when_a_stripe_invoice_is_paid(ctx: &TestContext) {
    let user = ctx
        .fixtures
        .create_verified_user("buyer@example.com", SubscriptionTier::Pro)
        .await
        .unwrap();
    ctx.fixtures.set_stripe_customer(user.id, "cus_123").await.unwrap();
    ctx.fixtures.set_usage(user.id, 42, Utc::now()).await.unwrap();

    deliver_stripe(
        ctx,
        &stripe_event(
            "invoice.payment_succeeded",
            json!({ "id": "in_1", "customer": "cus_123" }),
        ),
    )
    .await
    .assert_status(StatusCode::OK);

    assert_eq!(ctx.fixtures.usage_count(user.id).await.unwrap(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_fetch_the_subscription_after_stripe_checkout(ctx: &TestContext) {
    let user = ctx
        .fixtures
        .create_verified_user("buyer@example.com", SubscriptionTier::Free)
        .await
        .unwrap();
    let period_end = Utc::now().timestamp() + 3600;
    Mock::given(method("GET"))
        .and(path("/subscriptions/sub_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(subscription_object(
            "sub_1",
            STRIPE_UNLIMITED_PRICE,
            None,
            period_end,
        )))
        .expect(1)
        .mount(&ctx.providers)
        .await;

    deliver_stripe(
        ctx,
        &stripe_event(
            "checkout.session.completed",
            json!({
                "id": "cs_1",
                "customer": "cus_123",
                "subscription": "sub_1",
                "metadata": { "userId": user.id.to_string(), "tier": "UNLIMITED" }
            }),
        ),
    )
    .await
    .assert_status(StatusCode::OK);

    let user = ctx.fixtures.get_user(user.id).await.unwrap();
    assert_eq!(user.subscription_tier, SubscriptionTier::Unlimited);
    assert_eq!(user.stripe_subscription_id.as_deref(), Some("sub_1"));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_create_a_stripe_customer_on_first_checkout(ctx: &TestContext) {
    let (user, token) = ctx
        .signed_in_user("buyer@example.com", SubscriptionTier::Free)
        .await
        .unwrap();
    Mock::given(method("POST"))
        .and(path("/customers"))
        .and(body_string_contains("buyer%40example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "cus_new" })))
        .expect(1)
        .mount(&ctx.providers)
        .await;
    Mock::given(method("POST"))
        .and(path("/checkout/sessions"))
        .and(body_string_contains("customer=cus_new"))
        .and(body_string_contains(STRIPE_PRO_PRICE))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "id": "cs_1", "url": "https://checkout.stripe.test/cs_1" })),
        )
        .expect(1)
        .mount(&ctx.providers)
        .await;

    let response = ctx
        .client
        .post_with_auth(
            "/api/stripe/checkout",
            &json!({ "priceId": STRIPE_PRO_PRICE }),
            &token,
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.json()["url"], "https://checkout.stripe.test/cs_1");
    let user = ctx.fixtures.get_user(user.id).await.unwrap();
    assert_eq!(user.stripe_customer_id.as_deref(), Some("cus_new"));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_require_a_price_for_stripe_checkout(ctx: &TestContext) {
    let (_, token) = ctx
        .signed_in_user("buyer@example.com", SubscriptionTier::Free)
        .await
        .unwrap();

    ctx.client
        .post_with_auth("/api/stripe/checkout", &json!({}), &token)
        .await
        .unwrap()
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("Price ID is required");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_refuse_the_stripe_portal_without_a_customer(ctx: &TestContext) {
    let (_, token) = ctx
        .signed_in_user("buyer@example.com", SubscriptionTier::Free)
        .await
        .unwrap();

    ctx.client
        .post_with_auth("/api/stripe/portal", &json!({}), &token)
        .await
        .unwrap()
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("No billing account found");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_open_the_stripe_portal(ctx: &TestContext) {
    let (user, token) = ctx
        .signed_in_user("buyer@example.com", SubscriptionTier::Pro)
        .await
        .unwrap();
    ctx.fixtures.set_stripe_customer(user.id, "cus_123").await.unwrap();
    Mock::given(method("POST"))
        .and(path("/billing_portal/sessions"))
        .and(body_string_contains("customer=cus_123"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "url": "https://portal.stripe.test/p" })),
        )
        .mount(&ctx.providers)
        .await;

    let response = ctx
        .client
        .post_with_auth("/api/stripe/portal", &json!({}), &token)
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.json()["url"], "https://portal.stripe.test/p");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_create_a_lemon_checkout(ctx: &TestContext) {
    let (_, token) = ctx
        .signed_in_user("buyer@example.com", SubscriptionTier::Free)
        .await
        .unwrap();
    Mock::given(method("POST"))
        .and(path("/checkouts"))
        .and(body_string_contains("buyer@example.com"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "data": { "attributes": { "url": "https://shop.lemon.test/checkout/abc" } }
        })))
        .expect(1)
        .mount(&ctx.providers)
        .await;

    let response = ctx
        .client
        .post_with_auth(
            "/api/lemonsqueezy/checkout",
            &json!({ "variantId": "LEMON_PRO_MONTHLY", "tier": "PRO", "billingCycle": "monthly" }),
            &token,
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.json()["url"], "https://shop.lemon.test/checkout/abc");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_unknown_lemon_plans(ctx: &TestContext) {
    let (_, token) = ctx
        .signed_in_user("buyer@example.com", SubscriptionTier::Free)
        .await
        .unwrap();

    ctx.client
        .post_with_auth(
            "/api/lemonsqueezy/checkout",
            &json!({ "variantId": "LEMON_GOLD_MONTHLY" }),
            &token,
        )
        .await
        .unwrap()
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("Invalid plan selected");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_refuse_the_lemon_portal_without_a_subscription(ctx: &TestContext) {
    let (_, token) = ctx
        .signed_in_user("buyer@example.com", SubscriptionTier::Free)
        .await
        .unwrap();

    ctx.client
        .post_with_auth("/api/lemonsqueezy/portal", &json!({}), &token)
        .await
        .unwrap()
        .assert_status(StatusCode::NOT_FOUND)
        .assert_error_message("No subscription found");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_require_a_session_for_checkout(ctx: &TestContext) {
    ctx.client
        .post("/api/stripe/checkout", &json!({ "priceId": STRIPE_PRO_PRICE }))
        .await
        .unwrap()
        .assert_status(StatusCode::UNAUTHORIZED);
}
