use anyhow::Context;

use catalog_api::{app, config::ApiConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    catalog_observability::init();

    let config = ApiConfig::from_env()?;
    let services = app::services::AppServices::load(&config.catalog_path)?;
    tracing::info!(
        products = services.catalog().len(),
        path = %config.catalog_path.display(),
        "catalog loaded"
    );

    let app = app::build_app(services);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
