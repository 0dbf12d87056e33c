//! Gradebook server binary.
//!
//! - Config: `$GRADEBOOK_CONFIG`, `gradebook.yaml`, or built-in defaults
//! - JSON access log per request, `x-request-id` on every response
//! - Graceful shutdown on SIGINT/SIGTERM (readiness flips to 503 first)

use std::process::ExitCode;

use gradebook_core::error::{GradebookError, Result};
use gradebook_server::{app_state::AppState, config, obs, router};

#[tokio::main]
async fn main() -> ExitCode {
    let cfg = match config::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("gradebook-server: config load failed: {e}");
            return ExitCode::FAILURE;
        }
    };
    obs::logging::init(&cfg.log);

    match run(cfg).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "gradebook-server stopped");
            ExitCode::FAILURE
        }
    }
}

async fn run(cfg: config::GradebookConfig) -> Result<()> {
    let listen = cfg.server.listen_addr()?;

    let state = AppState::new(cfg)?;
    let app = router::build_router(state.clone());

    tracing::info!(%listen, "gradebook-server starting");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| GradebookError::Internal(format!("bind {listen} failed: {e}")))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(state))
        .await
        .map_err(|e| GradebookError::Internal(format!("server failed: {e}")))?;

    tracing::info!("gradebook-server stopped");
    Ok(())
}

async fn shutdown_signal(state: AppState) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    state.set_draining();
    tracing::info!("signal received, draining in-flight requests");
}
