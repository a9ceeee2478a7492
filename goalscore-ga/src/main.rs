//! goalscore-ga - Goal Analysis service
//!
//! Upload a spreadsheet of employee goals, get back SMART-criteria scores
//! per goal and weighted aggregates per employee, with incremental
//! progress streamed as newline-delimited JSON events.

use anyhow::Result;
use goalscore_common::config;
use goalscore_ga::services::oracle::{OpenAiOracle, ScoreOracle};
use goalscore_ga::{build_router, AppState};
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!(
        "Starting GoalScore Goal Analysis (goalscore-ga) v{}",
        env!("CARGO_PKG_VERSION")
    );

    let toml_config = config::load_default_config()?;
    let service_config = config::ServiceConfig::resolve(&toml_config);

    let oracle: Option<Arc<dyn ScoreOracle>> = match &service_config.openai_api_key {
        Some(key) => {
            let oracle = OpenAiOracle::new(service_config.openai_base_url.clone(), key.clone())?;
            info!(
                "Scoring oracle configured ({})",
                service_config.openai_base_url
            );
            Some(Arc::new(oracle))
        }
        None => {
            warn!(
                "OpenAI API key is not configured; analysis requests will fail until one is provided via:\n\
                 1. Environment: {}=your-key-here\n\
                 2. Environment: {}=your-key-here\n\
                 3. TOML config: {} (openai_api_key = \"your-key\")",
                config::API_KEY_ENV_VAR,
                config::GENERIC_API_KEY_ENV_VAR,
                config::default_config_path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "~/.config/goalscore/goalscore.toml".to_string()),
            );
            None
        }
    };

    let state = AppState::new(oracle);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&service_config.bind_addr).await?;
    info!("goalscore-ga listening on http://{}", service_config.bind_addr);
    info!("Health check: http://{}/health", service_config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
