use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use resume_tailor_backend::error::set_expose_internal_errors;
use resume_tailor_backend::infrastructure::clients::{EmailSender, ResendEmailClient, TurnstileVerifier};
use resume_tailor_backend::infrastructure::config::{AiProvider, Config, LogFormat};
use resume_tailor_backend::infrastructure::db::connect_and_migrate;
use resume_tailor_backend::infrastructure::http::{build_router, start_http_server, AppDependencies};
use resume_tailor_backend::infrastructure::repositories::{
    CompletionRepository, GeminiCompletionRepository, OpenAiCompletionRepository,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);
    set_expose_internal_errors(!config.is_production());

    tracing::info!(
        environment = %config.environment,
        "Starting resume tailor backend on {}:{}",
        config.host,
        config.port
    );

    let pool = connect_and_migrate(&config.database_url).await?;
    tracing::info!("Database ready, migrations applied");

    let completion = completion_provider(&config);
    if completion.is_none() {
        tracing::warn!(provider = ?config.ai.provider, "No AI API key configured, generation endpoints will fail");
    }

    if config.email.resend_api_key.is_none() {
        tracing::warn!("RESEND_API_KEY not set, emails will be skipped");
    }
    let email_sender: Arc<dyn EmailSender> = Arc::new(ResendEmailClient::new(
        &config.email,
        config.frontend_url.clone(),
    ));
    let turnstile = Arc::new(TurnstileVerifier::new(config.turnstile_secret.clone()));

    let config = Arc::new(config);
    let app = build_router(AppDependencies {
        pool: Arc::new(pool),
        config: config.clone(),
        completion,
        email_sender,
        turnstile,
    });

    start_http_server(config, app).await?;

    Ok(())
}

/// Completion backend for the configured provider, if its key is present
fn completion_provider(config: &Config) -> Option<Arc<dyn CompletionRepository>> {
    let api_key = config.ai.active_api_key()?;
    let provider: Arc<dyn CompletionRepository> = match config.ai.provider {
        AiProvider::OpenAi => Arc::new(OpenAiCompletionRepository::from_api_key(
            api_key,
            config.ai.openai_model.clone(),
        )),
        AiProvider::Gemini => Arc::new(GeminiCompletionRepository::new(
            api_key.to_string(),
            config.ai.gemini_model.clone(),
            config.ai.gemini_api_url.clone(),
        )),
    };
    tracing::info!(provider = ?config.ai.provider, "AI provider configured");
    Some(provider)
}

fn init_logging(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "resume_tailor_backend=debug,tower_http=debug".into());

    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
