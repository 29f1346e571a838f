//! Mediasearch - unified media search and autocomplete service.
//!
//! Entry point: load configuration, open/bootstrap the tantivy collections,
//! wire up brokered provider clients, and serve the HTTP API.

use std::net::SocketAddr;
use std::path::Path;

use mediasearch::config::Config;
use mediasearch::index::{seed, IndexSet};
use mediasearch::providers::ProviderClients;
use mediasearch::{build_app, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mediasearch=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    tracing::info!("starting mediasearch");

    let index_path = Path::new(&config.index_path);
    let index = IndexSet::open_or_create(index_path)?;
    tracing::info!(path = %config.index_path, "tantivy collections opened");

    if std::env::var("MEDIASEARCH_SEED_DEMO_DATA").as_deref() == Ok("1") {
        seed::seed_demo_data(&index)?;
        tracing::info!("demo data seeded");
    }

    let providers = ProviderClients::from_config(&config.providers);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let state = AppState::new(config, index, providers);
    let app = build_app(state);

    tracing::info!(%addr, "listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
