use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use recipe_server::build_app;
use recipe_server::shared::config::Config;
use recipe_server::shared::database::Database;
use recipe_server::shared::services::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("recipe_server=info,tower_http=info")),
        )
        .compact()
        .init();

    let config = Config::from_env()?;

    // DB 연결 + 마이그레이션
    let db = Database::new(&config.database).await?;
    db.initialize().await?;

    // AppState 생성 (모든 Service 초기화)
    let app_state = AppState::from_config(&config, &db)
        .await
        .context("Failed to initialize AppState")?;

    let app = build_app(app_state, &config.server.cors_origin)?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Server running on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/api", addr);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
