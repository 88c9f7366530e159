use std::env;

use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use assumption_validator::{create_router, AppState, Config};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "assumption_validator=debug,tower_http=debug,axum::rejection=trace".into()
        }))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // A missing credential stops startup here.
    let config = Config::from_env()?;

    tracing::info!("Starting Assumption Validator");
    tracing::info!(
        "Model: {} (temperature {})",
        config.openai_model,
        config.openai_temperature
    );
    tracing::info!("Max file size: {}MB", config.max_file_size_mb);
    tracing::info!("Max concurrent analyses: {}", config.max_concurrent_requests);

    let state = AppState::from_config(&config)?;
    let app = create_router(state);

    // Hosting platforms hand the port over in PORT.
    let port = env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(config.server_port);

    let addr = format!("{}:{}", config.server_host, port);

    tracing::info!("Server listening on {}", addr);

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
