//! advis dashboard
//!
//! Web front end for advisor allocation: upload a roster CSV, inspect a
//! sample, run the round-robin allocation and download both result tables.

use std::time::Duration;

use advis_dashboard::{api, config, logging, state::AppState};
use anyhow::Result;
use tokio::sync::watch;
use tracing::{error, info, warn};

/// How long in-flight requests get to finish after Ctrl+C.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::Config::from_env()?;
    logging::init(&config)?;

    info!("Starting advis dashboard");
    info!(
        listen_addr = %config.listen_addr,
        log_file = %config.log_file.display(),
        max_upload_bytes = config.max_upload_bytes,
        max_sessions = config.max_sessions,
        "Configuration loaded"
    );

    let state = AppState::from_config(&config);
    let app = api::create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    info!(addr = %config.listen_addr, "Listening for connections");

    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

    let mut server_handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.wait_for(|stop| *stop).await;
                info!("HTTP server shutting down");
            })
            .await
    });

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal");
            let _ = shutdown_tx.send(true);
            if tokio::time::timeout(SHUTDOWN_TIMEOUT, &mut server_handle).await.is_err() {
                warn!("HTTP server did not shut down in time");
            }
        }
        result = &mut server_handle => {
            match result {
                Ok(Ok(())) => info!("Server exited normally"),
                Ok(Err(e)) => error!(error = %e, "Server error"),
                Err(e) => error!(error = %e, "Server task panicked"),
            }
        }
    }

    info!("Dashboard shutdown complete");
    Ok(())
}
