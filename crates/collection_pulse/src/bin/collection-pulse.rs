use std::sync::Arc;

use clap::Parser;
use collection_datastore::PgDataStore;
use tokio::signal;

use collection_pulse::{
    gemini::GeminiClient,
    http::{create_router, AppState},
    speech::google::GoogleSpeechClient,
    tracing::init_tracing_subscriber,
    SummaryService,
};

#[derive(Parser)]
#[command(
    name = "collection-pulse",
    about = "Visitor comment summaries and speech services for museum collections"
)]
struct Cli {
    /// Database connection URL
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    /// Maximum pooled database connections
    #[arg(long, env = "DATABASE_MAX_CONNECTIONS", default_value = "5")]
    database_max_connections: u32,

    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY")]
    gemini_key: String,

    /// Gemini model used for summaries
    #[arg(long, env = "GEMINI_MODEL", default_value = GeminiClient::DEFAULT_MODEL)]
    gemini_model: String,

    /// Google Cloud API key for text-to-speech and speech-to-text
    #[arg(long, env = "GOOGLE_CLOUD_API_KEY")]
    google_cloud_key: String,

    /// Key clients must send in `X-API-Key`; unset disables the check
    #[arg(long, env = "AI_SERVICE_API_KEY")]
    api_key: Option<String>,

    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    #[arg(long, env = "PORT", default_value = "8000")]
    port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let _guard = sentry::init((
        std::env::var("SENTRY_DSN").unwrap_or_default(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: Some("production".into()),
            ..Default::default()
        },
    ));

    let cli = Cli::parse();
    init_tracing_subscriber()?;

    let store = PgDataStore::init(&cli.database_url, cli.database_max_connections).await?;
    let generator = GeminiClient::new(cli.gemini_key).with_model(cli.gemini_model);
    let speech = GoogleSpeechClient::new(cli.google_cloud_key);

    let api_key = cli
        .api_key
        .filter(|key| !key.trim().is_empty())
        .map(Arc::<str>::from);
    if api_key.is_none() {
        tracing::warn!("AI_SERVICE_API_KEY not set, API key check disabled");
    }

    let state = AppState::new(SummaryService::new(store, generator), speech);
    let app = create_router(state, api_key);

    let addr = format!("{}:{}", cli.host, cli.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = ?e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = ?e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down..."),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down..."),
    }
}
