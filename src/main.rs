use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cine_voice::{
    config::Config,
    routes::{create_router, AppState},
    services::{
        providers::{load_catalog, provider_from_config},
        recommendations::Recommender,
        rules::RuleSet,
    },
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    let config = Config::from_env()?;

    let provider = provider_from_config(&config).context("Failed to configure catalog provider")?;
    let catalog = load_catalog(provider.as_ref())
        .await
        .with_context(|| format!("Failed to load catalog from {} provider", provider.name()))?;

    let rules = match &config.rules_path {
        Some(path) => RuleSet::from_json_file(path)
            .with_context(|| format!("Failed to load keyword rules from {}", path.display()))?,
        None => RuleSet::builtin().context("Failed to compile built-in keyword rules")?,
    };

    let recommender = Recommender::new(catalog, rules, config.recommender_settings());
    let app = create_router(AppState::new(recommender));

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    tracing::info!(address = %address, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
