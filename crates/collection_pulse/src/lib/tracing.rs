use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Registry};

const SERVICE_NAME: &str = "collection-pulse";

/// Installs the global subscriber: env filter, bunyan JSON to stdout and the
/// sentry breadcrumb/event layer.
///
/// Falls back to `info` for this workspace and `tower_http` when `RUST_LOG`
/// is unset.
pub fn init_tracing_subscriber() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("collection_pulse=info,collection_datastore=info,tower_http=info")
    });

    let subscriber = Registry::default()
        .with(env_filter)
        .with(JsonStorageLayer)
        .with(BunyanFormattingLayer::new(
            SERVICE_NAME.into(),
            std::io::stdout,
        ))
        .with(sentry_tracing::layer());

    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}
