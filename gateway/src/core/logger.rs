//! Structured logging setup.
//!
//! Console output plus optional daily-rotating file output; application logs
//! older than 14 days are deleted by [`cleanup_old_logs`].

use std::fs;
use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, prelude::*};

/// Delete `app-YYYY-MM-DD.log` files older than `keep_days` days under `log_dir`.
pub fn cleanup_old_logs(log_dir: &str, keep_days: i64) -> anyhow::Result<()> {
    use chrono::{Local, TimeZone};

    let dir = Path::new(log_dir);
    if !dir.exists() {
        return Ok(());
    }
    let cutoff = Local::now() - chrono::Duration::days(keep_days);

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some(date_part) = name
            .strip_prefix("app.log.")
            .or_else(|| name.strip_prefix("app-").and_then(|d| d.strip_suffix(".log")))
        else {
            continue;
        };
        let Ok(naive_date) = chrono::NaiveDate::parse_from_str(date_part, "%Y-%m-%d") else {
            continue;
        };
        let Some(local_midnight) = Local
            .from_local_datetime(&naive_date.and_hms_opt(0, 0, 0).unwrap())
            .single()
        else {
            continue;
        };
        if local_midnight < cutoff {
            fs::remove_file(&path)?;
            tracing::info!(file = %name, "deleted old log file");
        }
    }
    Ok(())
}

/// Initialize the global tracing subscriber. `log_dir: None` logs to console only.
pub fn init_logger_with_file(level: Option<&str>, json_format: Option<bool>, log_dir: Option<&str>) {
    let level = level.unwrap_or("info");
    let json_format = json_format.unwrap_or(false);
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = tracing_subscriber::registry().with(env_filter);

    if json_format {
        let console_layer = fmt::layer()
            .json()
            .with_target(true)
            .with_file(true)
            .with_line_number(true);
        match log_dir {
            Some(dir) => {
                if let Err(e) = fs::create_dir_all(dir) {
                    eprintln!("failed to create log directory {dir}: {e}");
                    subscriber.with(console_layer).init();
                    return;
                }
                let appender = RollingFileAppender::new(Rotation::DAILY, dir, "app");
                let file_layer = fmt::layer()
                    .json()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_ansi(false)
                    .with_writer(std::sync::Mutex::new(appender));
                subscriber.with(console_layer).with(file_layer).init();
            }
            None => subscriber.with(console_layer).init(),
        }
    } else {
        let console_layer = fmt::layer().with_target(true).with_file(true).with_line_number(true);
        match log_dir {
            Some(dir) => {
                if let Err(e) = fs::create_dir_all(dir) {
                    eprintln!("failed to create log directory {dir}: {e}");
                    subscriber.with(console_layer).init();
                    return;
                }
                let appender = RollingFileAppender::new(Rotation::DAILY, dir, "app");
                let file_layer = fmt::layer()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_ansi(false)
                    .with_writer(std::sync::Mutex::new(appender));
                subscriber.with(console_layer).with(file_layer).init();
            }
            None => subscriber.with(console_layer).init(),
        }
    }
}
