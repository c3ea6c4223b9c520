use pt_booking::config::StubConfig;
use pt_booking::stub::{self, AppState};

use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cfg = StubConfig::from_env()?;
    let state = AppState::from_config(&cfg);
    let app = stub::app(state);

    tracing::info!(trainer = %cfg.trainer_username, "Listening on http://{}", cfg.bind_addr);
    let listener = tokio::net::TcpListener::bind(&cfg.bind_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
