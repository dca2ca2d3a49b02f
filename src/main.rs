use std::error::Error;

use llm_service::telemetry;
use tracing::Level;
use tracing_subscriber::{Layer as _, filter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Load environment variables from .env file.
    // Fails if .env file not found, not readable or invalid.
    dotenvy::dotenv()?;

    let env_filter = telemetry::env_filter_with_level("info", Level::INFO);

    // The llm-service layer renders its own events; everything else goes
    // through the plain fmt layer so no event is printed twice.
    let not_llm = filter::filter_fn(|meta| !meta.target().starts_with(telemetry::TARGET_PREFIX));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(false).with_filter(not_llm))
        .with(telemetry::layer())
        .init();

    api::start().await?;

    Ok(())
}
