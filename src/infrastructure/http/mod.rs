use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderName, HeaderValue, Method},
    middleware,
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

use crate::controllers::{
    applications::ApplicationController,
    auth::AuthController,
    billing::{LemonSqueezyController, StripeController},
    cv::CvController,
    health::{self, HealthState},
    profile::ProfileController,
    usage::UsageController,
};
use crate::domain::{
    application::ApplicationService,
    auth::{AuthService, JwtManager},
    billing::{LemonSqueezyService, StripeService},
    coaching::CoachingService,
    profile::ProfileService,
    tailoring::TailoringService,
    usage::UsageService,
};
use crate::infrastructure::auth::{auth_middleware, request_id_middleware, usage_gate_middleware};
use crate::infrastructure::clients::{
    EmailSender, LemonSqueezyClient, StripeClient, TurnstileVerifier,
};
use crate::infrastructure::config::Config;
use crate::infrastructure::db::DbPool;
use crate::infrastructure::repositories::{
    ApplicationRepository, CompletionRepository, ProfileRepository, UsageRepository,
    UserRepository,
};

const MAX_BODY_BYTES: usize = 5 * 1024 * 1024;
const LOCAL_FRONTEND: &str = "http://localhost:3000";

/// Outside collaborators the router is built from. Tests swap the
/// completion provider and the email sender for in-memory fakes.
pub struct AppDependencies {
    pub pool: Arc<DbPool>,
    pub config: Arc<Config>,
    /// None when no AI provider key is configured
    pub completion: Option<Arc<dyn CompletionRepository>>,
    pub email_sender: Arc<dyn EmailSender>,
    pub turnstile: Arc<TurnstileVerifier>,
}

fn cors_layer(config: &Config) -> CorsLayer {
    let origins = if config.is_production() {
        let allowed: Vec<HeaderValue> = [config.frontend_url.as_str(), LOCAL_FRONTEND]
            .into_iter()
            .filter_map(|origin| HeaderValue::from_str(origin).ok())
            .collect();
        AllowOrigin::list(allowed)
    } else {
        AllowOrigin::mirror_request()
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-request-id"),
        ])
}

fn with_security_headers(app: Router) -> Router {
    app.layer(SetResponseHeaderLayer::if_not_present(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    ))
    .layer(SetResponseHeaderLayer::if_not_present(
        header::X_FRAME_OPTIONS,
        HeaderValue::from_static("DENY"),
    ))
    .layer(SetResponseHeaderLayer::if_not_present(
        header::X_XSS_PROTECTION,
        HeaderValue::from_static("1; mode=block"),
    ))
    .layer(SetResponseHeaderLayer::if_not_present(
        header::REFERRER_POLICY,
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    ))
}

/// Wire repositories, services and controllers into the full router
pub fn build_router(deps: AppDependencies) -> Router {
    let AppDependencies {
        pool,
        config,
        completion,
        email_sender,
        turnstile,
    } = deps;

    // 1. Repositories
    let user_repo = Arc::new(UserRepository::new(pool.clone()));
    let usage_repo = Arc::new(UsageRepository::new(pool.clone()));
    let profile_repo = Arc::new(ProfileRepository::new(pool.clone()));
    let application_repo = Arc::new(ApplicationRepository::new(pool.clone()));

    // 2. Clients
    let lemonsqueezy_client = Arc::new(LemonSqueezyClient::new(&config.lemonsqueezy));
    let stripe_client = Arc::new(StripeClient::new(&config.stripe));

    // 3. Services
    let jwt_manager = Arc::new(JwtManager::new(
        config.jwt_secret.clone(),
        config.jwt_expiration_hours,
    ));
    let auth_service = Arc::new(AuthService::new(
        user_repo.clone(),
        jwt_manager.clone(),
        email_sender.clone(),
        turnstile,
    ));
    let usage_service = Arc::new(UsageService::new(user_repo.clone(), usage_repo.clone()));
    let profile_service = Arc::new(ProfileService::new(profile_repo));
    let tailoring_service = Arc::new(TailoringService::new(completion.clone()));
    let coaching_service = Arc::new(CoachingService::new(completion, application_repo.clone()));
    let application_service = Arc::new(ApplicationService::new(application_repo));
    let lemonsqueezy_service = Arc::new(LemonSqueezyService::new(
        user_repo.clone(),
        usage_repo.clone(),
        lemonsqueezy_client,
        email_sender,
        config.lemonsqueezy.clone(),
        config.frontend_url.clone(),
    ));
    let stripe_service = Arc::new(StripeService::new(
        user_repo,
        usage_repo,
        stripe_client,
        config.stripe.clone(),
        config.frontend_url.clone(),
    ));

    // 4. Controllers
    let auth_controller = Arc::new(AuthController::new(
        auth_service,
        config.jwt_expiration_hours,
        config.is_production(),
    ));
    let usage_controller = Arc::new(UsageController::new(usage_service.clone()));
    let profile_controller = Arc::new(ProfileController::new(profile_service));
    let cv_controller = Arc::new(CvController::new(tailoring_service, coaching_service));
    let application_controller = Arc::new(ApplicationController::new(application_service));
    let lemonsqueezy_controller = Arc::new(LemonSqueezyController::new(lemonsqueezy_service));
    let stripe_controller = Arc::new(StripeController::new(stripe_service));

    let require_auth = middleware::from_fn_with_state(jwt_manager, auth_middleware);

    // Auth routes (public)
    let auth_routes = Router::new()
        .route("/api/auth/register", post(AuthController::register))
        .route("/api/auth/login", post(AuthController::login))
        .route("/api/auth/logout", post(AuthController::logout))
        .route(
            "/api/auth/verify-email/:token",
            get(AuthController::verify_email),
        )
        .route(
            "/api/auth/resend-verification",
            post(AuthController::resend_verification),
        )
        .with_state(auth_controller.clone());

    let session_routes = Router::new()
        .route("/api/auth/me", get(AuthController::me))
        .with_state(auth_controller)
        .layer(require_auth.clone());

    let profile_routes = Router::new()
        .route(
            "/api/profile",
            get(ProfileController::get_profile).put(ProfileController::update_profile),
        )
        .with_state(profile_controller)
        .layer(require_auth.clone());

    let usage_routes = Router::new()
        .route("/api/usage", get(UsageController::get_usage))
        .with_state(usage_controller)
        .layer(require_auth.clone());

    // Generation routes: auth runs first, then the quota gate
    let generation_routes = Router::new()
        .route("/api/cv/generate", post(CvController::generate))
        .route("/api/cv/parse", post(CvController::parse))
        .route("/api/cv/cover-letter", post(CvController::cover_letter))
        .route("/api/cv/interview-prep", post(CvController::interview_prep))
        .with_state(cv_controller)
        .layer(middleware::from_fn_with_state(
            usage_service,
            usage_gate_middleware,
        ))
        .layer(require_auth.clone());

    let presentation_routes = Router::new()
        .route("/api/cv/render", post(CvController::render))
        .route("/api/cv/ats-score", post(CvController::ats_score))
        .layer(require_auth.clone());

    let application_routes = Router::new()
        .route(
            "/api/cv/applications",
            get(ApplicationController::list).post(ApplicationController::create),
        )
        .route(
            "/api/cv/applications/:id",
            patch(ApplicationController::update_status).delete(ApplicationController::delete),
        )
        .with_state(application_controller)
        .layer(require_auth.clone());

    let lemonsqueezy_routes = Router::new()
        .route(
            "/api/lemonsqueezy/checkout",
            post(LemonSqueezyController::checkout),
        )
        .route("/api/lemonsqueezy/portal", post(LemonSqueezyController::portal))
        .with_state(lemonsqueezy_controller.clone())
        .layer(require_auth.clone());

    let stripe_routes = Router::new()
        .route("/api/stripe/checkout", post(StripeController::checkout))
        .route("/api/stripe/portal", post(StripeController::portal))
        .with_state(stripe_controller.clone())
        .layer(require_auth);

    // Webhooks are authenticated by signature, not session
    let webhook_routes = Router::new()
        .route(
            "/api/lemonsqueezy/webhook",
            post(LemonSqueezyController::webhook),
        )
        .with_state(lemonsqueezy_controller)
        .merge(
            Router::new()
                .route("/api/stripe/webhook", post(StripeController::webhook))
                .with_state(stripe_controller),
        );

    let health_state = HealthState {
        pool,
        environment: config.environment.to_string(),
    };

    let app = Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::health_ready))
        .with_state(health_state)
        .merge(auth_routes)
        .merge(session_routes)
        .merge(profile_routes)
        .merge(usage_routes)
        .merge(generation_routes)
        .merge(presentation_routes)
        .merge(application_routes)
        .merge(lemonsqueezy_routes)
        .merge(stripe_routes)
        .merge(webhook_routes)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors_layer(&config));

    let app = if config.is_production() {
        with_security_headers(app)
    } else {
        app
    };

    app.layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
}

/// Start the HTTP server with all routes configured
pub async fn start_http_server(
    config: Arc<Config>,
    app: Router,
) -> Result<(), Box<dyn std::error::Error>> {
    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
