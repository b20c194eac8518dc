use clap::Parser;
use dotenv::dotenv;
use tracing::info;
use tracing_subscriber::EnvFilter;
use nowhey_backend::config::Config;
use nowhey_backend::controller;
use nowhey_backend::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::parse();
    info!("Starting nowhey backend in {} environment", config.environment);

    let app_state = AppState::from_config(&config).await?;
    controller::serve(app_state, &config).await
}
