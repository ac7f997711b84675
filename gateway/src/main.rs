//! Catalog gateway binary entry point.
//!
//! Mirrors `edge-server/src/main.rs`: load `.env`, initialize logging,
//! load config, build state, run until a shutdown signal arrives.

use catalog_gateway::{cleanup_old_logs, init_logger_with_file, Config, Server};

fn setup_logging(config: &Config) {
    init_logger_with_file(Some(&config.log_level), Some(config.log_json), Some("logs"));
    if let Err(e) = cleanup_old_logs("logs", 14) {
        eprintln!("failed to clean up old logs: {e}");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env();
    setup_logging(&config);

    tracing::info!("catalog gateway starting");

    let server = Server::new(config);
    let shutdown = server.shutdown_token();

    // `server.run()` must keep running (not be dropped) after the shutdown
    // signal fires so it can actually drain in-flight requests, so it runs
    // on its own task rather than racing directly against `ctrl_c` in a
    // `select!` (which would abort it the instant the signal future wins).
    let run_handle = tokio::spawn(server.run());

    tokio::signal::ctrl_c().await?;
    tracing::info!("received ctrl-c, shutting down");
    shutdown.cancel();

    match run_handle.await {
        Ok(result) => {
            if let Err(e) = &result {
                tracing::error!(error = %e, "server exited with error");
            }
            result
        }
        Err(join_err) => Err(anyhow::anyhow!("server task panicked: {join_err}")),
    }
}
