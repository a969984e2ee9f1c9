use anyhow::Context;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    restock_observability::init();

    let config = restock_analytics::AnalyticsConfig::from_env();
    config.validate().context("invalid analytics configuration")?;

    let bind_addr = std::env::var("RESTOCK_BIND_ADDR").unwrap_or_else(|_| {
        tracing::info!("RESTOCK_BIND_ADDR not set; using {DEFAULT_BIND_ADDR}");
        DEFAULT_BIND_ADDR.to_string()
    });

    let app = restock_api::app::build_app(config);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
