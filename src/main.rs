use std::process::ExitCode;
use std::sync::Arc;

use cdp_docs::config::ServiceConfig;
use cdp_docs::engine::build_answerer;
use cdp_docs::ops::{serve, telemetry};

#[tokio::main]
async fn main() -> ExitCode {
    let config = match ServiceConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    telemetry::init_tracing(&config.log_filter);

    let answerer = match build_answerer(&config) {
        Ok(answerer) => Arc::new(answerer),
        Err(e) => {
            tracing::error!(error = %e, "Startup validation failed");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        platforms = ?answerer.supported_platforms(),
        max_retries = config.max_retries,
        "CDP documentation assistant initialized"
    );

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    match serve(answerer, config.bind_addr, shutdown).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Server terminated");
            ExitCode::FAILURE
        }
    }
}
