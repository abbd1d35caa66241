use anyhow::Result;
use once_cell::sync::Lazy;
use resume_tailor_backend::domain::auth::JwtManager;
use resume_tailor_backend::domain::user::{SubscriptionTier, User};
use resume_tailor_backend::infrastructure::clients::{EmailSender, TurnstileVerifier};
use resume_tailor_backend::infrastructure::config::{
    AiConfig, AiProvider, Config, EmailConfig, Environment, LemonSqueezyConfig, LogFormat,
    StripeConfig,
};
use resume_tailor_backend::infrastructure::http::{build_router, AppDependencies};
use resume_tailor_backend::infrastructure::repositories::CompletionRepository;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Arc;
use test_context::AsyncTestContext;
use testcontainers::{clients::Cli, Container};
use testcontainers_modules::postgres::Postgres;
use tokio::net::TcpListener;
use wiremock::MockServer;

pub mod payloads;

use api_client::TestClient;
use db_pool::{DatabasePool, PooledDatabase};
use fakes::{RecordingEmailSender, ScriptedCompletion};
use fixtures::TestFixtures;

pub const JWT_SECRET: &str = "test-jwt-secret-key-for-testing-only";
pub const LEMON_WEBHOOK_SECRET: &str = "lemon-webhook-test-secret";
pub const STRIPE_WEBHOOK_SECRET: &str = "whsec_test_secret";
pub const STRIPE_PRO_PRICE: &str = "price_pro_test";
pub const STRIPE_UNLIMITED_PRICE: &str = "price_unlimited_test";
pub const LEMON_PRO_VARIANT: &str = "1001";
pub const FRONTEND_URL: &str = "http://frontend.test";

// Docker client for test containers
static DOCKER: Lazy<Cli> = Lazy::new(Cli::default);

// Shared PostgreSQL container for all tests
static SHARED_CONTAINER: Lazy<SharedContainer> = Lazy::new(SharedContainer::new);

// Global database pool
static DB_POOL: Lazy<DatabasePool> = Lazy::new(|| DatabasePool::new(SHARED_CONTAINER.port));

/// Shared container that lives for the duration of all tests
struct SharedContainer {
    _container: Container<'static, Postgres>,
    port: u16,
}

impl SharedContainer {
    fn new() -> Self {
        let container = DOCKER.run(Postgres::default());
        let port = container.get_host_port_ipv4(5432);

        println!("Started shared PostgreSQL container on port {}", port);

        Self {
            _container: container,
            port,
        }
    }
}

pub struct TestContext {
    pub client: TestClient,
    #[allow(dead_code)]
    pub pool: PgPool,
    #[allow(dead_code)]
    pub config: Config,
    pub fixtures: TestFixtures,
    pub completion: Arc<ScriptedCompletion>,
    pub emails: Arc<RecordingEmailSender>,
    /// Stands in for both the LemonSqueezy and the Stripe API
    pub providers: MockServer,
    _db: PooledDatabase,
}

fn test_config(database_url: String, provider_url: &str) -> Config {
    let variants = HashMap::from([
        ("LEMON_STARTER_MONTHLY".to_string(), "1000".to_string()),
        ("LEMON_PRO_MONTHLY".to_string(), LEMON_PRO_VARIANT.to_string()),
        ("LEMON_UNLIMITED_MONTHLY".to_string(), "1002".to_string()),
    ]);

    Config {
        database_url,
        host: "127.0.0.1".to_string(),
        port: 0,
        jwt_secret: JWT_SECRET.to_string(),
        jwt_expiration_hours: 1,
        environment: Environment::Development,
        log_format: LogFormat::Pretty,
        frontend_url: FRONTEND_URL.to_string(),
        ai: AiConfig {
            provider: AiProvider::OpenAi,
            openai_api_key: Some("sk-test".to_string()),
            openai_model: "gpt-4o".to_string(),
            gemini_api_key: None,
            gemini_model: "gemini-1.5-flash".to_string(),
            gemini_api_url: provider_url.to_string(),
        },
        lemonsqueezy: LemonSqueezyConfig {
            api_key: Some("lemon-test-key".to_string()),
            store_id: Some("42".to_string()),
            webhook_secret: Some(LEMON_WEBHOOK_SECRET.to_string()),
            api_url: provider_url.to_string(),
            variants,
        },
        stripe: StripeConfig {
            secret_key: Some("sk_test_stripe".to_string()),
            webhook_secret: Some(STRIPE_WEBHOOK_SECRET.to_string()),
            api_url: provider_url.to_string(),
            starter_price_id: Some("price_starter_test".to_string()),
            pro_price_id: Some(STRIPE_PRO_PRICE.to_string()),
            unlimited_price_id: Some(STRIPE_UNLIMITED_PRICE.to_string()),
        },
        email: EmailConfig {
            resend_api_key: None,
            resend_api_url: provider_url.to_string(),
            from: "noreply@test.local".to_string(),
        },
        turnstile_secret: None,
    }
}

impl AsyncTestContext for TestContext {
    fn setup() -> impl std::future::Future<Output = Self> + Send {
        async {
            // Get a database from the shared pool
            let pooled_db = DB_POOL
                .get_database()
                .await
                .expect("Failed to get database from pool");

            let providers = MockServer::start().await;
            let config = test_config(pooled_db.database_url.clone(), &providers.uri());

            let completion = Arc::new(ScriptedCompletion::default());
            let emails = Arc::new(RecordingEmailSender::default());

            let app = build_router(AppDependencies {
                pool: Arc::new(pooled_db.pool.clone()),
                config: Arc::new(config.clone()),
                completion: Some(completion.clone() as Arc<dyn CompletionRepository>),
                email_sender: emails.clone() as Arc<dyn EmailSender>,
                turnstile: Arc::new(TurnstileVerifier::new(None)),
            });

            // Start server
            let listener = TcpListener::bind("127.0.0.1:0")
                .await
                .expect("Failed to bind listener");
            let addr = listener.local_addr().expect("Failed to get local addr");
            let base_url = format!("http://{}", addr);

            tokio::spawn(async move {
                axum::serve(listener, app).await.unwrap();
            });

            // Wait for server to be ready
            tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

            Self {
                client: TestClient::new(&base_url),
                pool: pooled_db.pool.clone(),
                config,
                fixtures: TestFixtures::new(pooled_db.pool.clone()),
                completion,
                emails,
                providers,
                _db: pooled_db,
            }
        }
    }

    fn teardown(self) -> impl std::future::Future<Output = ()> + Send {
        async {
            // Database cleanup happens automatically via Drop on PooledDatabase
        }
    }
}

impl TestContext {
    /// Verified user on `tier` with a session token
    pub async fn signed_in_user(&self, email: &str, tier: SubscriptionTier) -> Result<(User, String)> {
        let user = self.fixtures.create_verified_user(email, tier).await?;
        let token = session_token(&user);
        Ok((user, token))
    }
}

/// Session token the server accepts for `user`
pub fn session_token(user: &User) -> String {
    JwtManager::new(JWT_SECRET.to_string(), 1)
        .generate_token(user.id, &user.email, user.subscription_tier)
        .unwrap()
}
