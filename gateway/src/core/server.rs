//! HTTP server bootstrap and graceful shutdown (component H, §6 "Exit
//! behavior").
//!
//! Mirrors `edge-server`'s `Server::{new, with_state, run}` shape: a thin
//! struct over `Config` plus an already-built `AppState`; `run` binds the
//! listener and serves until a shutdown signal fires. The drain window
//! comes from `Config::shutdown_timeout` rather than a hardcoded `30s`
//! (contrast `crab-cloud`'s `graceful_shutdown`), since this gateway makes
//! it configurable (§6).

use std::net::SocketAddr;

use tokio_util::sync::CancellationToken;

use crate::core::config::Config;
use crate::core::state::AppState;
use crate::routes::build_app;

pub struct Server {
    config: Config,
    state: Option<AppState>,
    shutdown: CancellationToken,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: None,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_state(config: Config, state: AppState) -> Self {
        Self {
            config,
            state: Some(state),
            shutdown: CancellationToken::new(),
        }
    }

    /// Token the caller can cancel to trigger the stop-accepting-then-drain
    /// sequence (e.g. from a `ctrl_c`/`SIGTERM` listener in `main`).
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let state = match self.state {
            Some(s) => s,
            None => AppState::initialize(self.config.clone()).await?,
        };

        let app = build_app(state.clone()).with_state(state.clone());

        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!(%addr, "catalog gateway listening");

        let shutdown_timeout = self.config.shutdown_timeout;
        let accept_shutdown = self.shutdown.clone();
        let drain_bound_shutdown = self.shutdown.clone();

        let serve = axum::serve(listener, app).with_graceful_shutdown(async move {
            accept_shutdown.cancelled().await;
            tracing::info!("shutdown signal received, draining in-flight requests");
        });

        // `with_graceful_shutdown` stops accepting new connections the
        // instant the token cancels but then waits indefinitely for
        // in-flight requests to finish. Bound that wait by
        // `shutdown_timeout` (§6: "drain ... up to a shutdown deadline") so a
        // handler that ignores its own request deadline can't hold the
        // process open forever.
        tokio::select! {
            result = serve => result?,
            _ = async {
                drain_bound_shutdown.cancelled().await;
                tokio::time::sleep(shutdown_timeout).await;
            } => {
                tracing::warn!(?shutdown_timeout, "shutdown drain window elapsed, exiting with requests still in flight");
            }
        }

        tracing::info!("HTTP listener stopped, closing backends");
        state.close().await;

        Ok(())
    }
}
