use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    Extension, Json,
};
use std::sync::Arc;

use crate::domain::billing::{
    LemonCheckoutRequest, LemonSqueezyService, LemonSqueezyServiceApi, StripeCheckoutRequest,
    StripeService, StripeServiceApi, UrlResponse, WebhookAck,
};
use crate::{error::AppResult, infrastructure::auth::AuthUser};

const LEMON_SIGNATURE_HEADER: &str = "x-signature";
const STRIPE_SIGNATURE_HEADER: &str = "stripe-signature";

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

pub struct LemonSqueezyController {
    lemonsqueezy_service: Arc<LemonSqueezyService>,
}

impl LemonSqueezyController {
    pub fn new(lemonsqueezy_service: Arc<LemonSqueezyService>) -> Self {
        Self {
            lemonsqueezy_service,
        }
    }

    /// POST /api/lemonsqueezy/checkout
    pub async fn checkout(
        State(controller): State<Arc<LemonSqueezyController>>,
        Extension(auth_user): Extension<AuthUser>,
        Json(request): Json<LemonCheckoutRequest>,
    ) -> AppResult<Json<UrlResponse>> {
        let url = controller
            .lemonsqueezy_service
            .create_checkout(auth_user.user_id, request)
            .await?;
        Ok(Json(UrlResponse { url }))
    }

    /// POST /api/lemonsqueezy/portal
    pub async fn portal(
        State(controller): State<Arc<LemonSqueezyController>>,
        Extension(auth_user): Extension<AuthUser>,
    ) -> AppResult<Json<UrlResponse>> {
        let url = controller
            .lemonsqueezy_service
            .customer_portal(auth_user.user_id)
            .await?;
        Ok(Json(UrlResponse { url }))
    }

    /// POST /api/lemonsqueezy/webhook - Signed with the raw body
    pub async fn webhook(
        State(controller): State<Arc<LemonSqueezyController>>,
        headers: HeaderMap,
        body: Bytes,
    ) -> AppResult<Json<WebhookAck>> {
        controller
            .lemonsqueezy_service
            .handle_webhook(&body, header_value(&headers, LEMON_SIGNATURE_HEADER))
            .await?;
        Ok(Json(WebhookAck { received: true }))
    }
}

pub struct StripeController {
    stripe_service: Arc<StripeService>,
}

impl StripeController {
    pub fn new(stripe_service: Arc<StripeService>) -> Self {
        Self { stripe_service }
    }

    /// POST /api/stripe/checkout
    pub async fn checkout(
        State(controller): State<Arc<StripeController>>,
        Extension(auth_user): Extension<AuthUser>,
        Json(request): Json<StripeCheckoutRequest>,
    ) -> AppResult<Json<UrlResponse>> {
        let url = controller
            .stripe_service
            .create_checkout(auth_user.user_id, request)
            .await?;
        Ok(Json(UrlResponse { url }))
    }

    /// POST /api/stripe/portal
    pub async fn portal(
        State(controller): State<Arc<StripeController>>,
        Extension(auth_user): Extension<AuthUser>,
    ) -> AppResult<Json<UrlResponse>> {
        let url = controller
            .stripe_service
            .create_portal(auth_user.user_id)
            .await?;
        Ok(Json(UrlResponse { url }))
    }

    /// POST /api/stripe/webhook
    pub async fn webhook(
        State(controller): State<Arc<StripeController>>,
        headers: HeaderMap,
        body: Bytes,
    ) -> AppResult<Json<WebhookAck>> {
        controller
            .stripe_service
            .handle_webhook(&body, header_value(&headers, STRIPE_SIGNATURE_HEADER))
            .await?;
        Ok(Json(WebhookAck { received: true }))
    }
}
