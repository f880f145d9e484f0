//! Signal handling for graceful shutdown and config reload.

use crate::config::ConfigLoader;
use crate::state::AppState;
use std::sync::Arc;
use tokio::signal::unix::{SignalKind, signal};
use tokio::sync::Notify;

/// Creates a future that completes when a shutdown signal is received.
///
/// Listens for SIGTERM and SIGINT (Ctrl+C). If a handler cannot be
/// installed the other one is still awaited.
pub async fn shutdown_signal() {
    let sigterm = async {
        match signal(SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };
    let sigint = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install SIGINT handler");
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        _ = sigterm => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
        _ = sigint => {
            tracing::info!("Received SIGINT, initiating graceful shutdown");
        }
    }
}

/// Spawns a task that listens for SIGHUP and reloads the configuration.
///
/// Returns a Notify that can be used to signal when shutdown is complete.
pub fn spawn_config_reload_handler(
    state: AppState,
    config_loader: Arc<ConfigLoader>,
) -> Arc<Notify> {
    let shutdown_notify = Arc::new(Notify::new());
    let shutdown_notify_clone = shutdown_notify.clone();

    tokio::spawn(async move {
        let mut sighup = match signal(SignalKind::hangup()) {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGHUP handler, config reload disabled");
                return;
            }
        };

        loop {
            tokio::select! {
                _ = sighup.recv() => {
                    tracing::info!("Received SIGHUP, reloading configuration");
                    match config_loader.reload() {
                        Ok(loaded_config) => {
                            let bound = state.config.server.read().await.listen;
                            if loaded_config.server.listen != bound {
                                tracing::warn!(
                                    %bound,
                                    requested = %loaded_config.server.listen,
                                    "Listen address changes take effect after a restart"
                                );
                            }
                            state
                                .config
                                .reload(loaded_config.razorpay, loaded_config.upstream)
                                .await;
                            tracing::info!("Configuration reloaded successfully");
                        }
                        Err(e) => {
                            tracing::error!(error = %e, "Failed to reload configuration");
                        }
                    }
                }
                _ = shutdown_notify_clone.notified() => {
                    tracing::debug!("Config reload handler shutting down");
                    break;
                }
            }
        }
    });

    shutdown_notify
}
