use std::sync::Arc;

use homesafe_api::config::Config;
use homesafe_api::evaluation::{GeminiGenerator, StopEvaluator};
use homesafe_api::routes::guardians::GuardianBook;
use homesafe_api::{monitor, routes, AppState};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("homesafe_api=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    let generator = GeminiGenerator::new(&config.llm)?;
    let evaluator = StopEvaluator::new(Arc::new(generator));

    let state = AppState::new(evaluator, GuardianBook::seeded(), config.monitor.clone());
    let _background = monitor::spawn_background(state.clone());

    let app = routes::routes().with_state(state);

    let listener = tokio::net::TcpListener::bind(config.addr()).await?;

    tracing::info!(
        addr = %config.addr(),
        model = %config.llm.model,
        simulate_location = config.monitor.simulate_location,
        "server listening"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
