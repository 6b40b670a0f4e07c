use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::JsonFields;
use tracing_subscriber::prelude::*;

use crate::config;

/// Installs the global JSON file logger. The returned guard flushes pending
/// lines when dropped, so the caller keeps it alive until the process ends.
pub fn init(log_dir: Option<PathBuf>, log_level: Option<&str>) -> anyhow::Result<WorkerGuard> {
    let log_path = config::log_path(log_dir);
    let (Some(dir), Some(file_name)) = (log_path.parent(), log_path.file_name()) else {
        anyhow::bail!("Invalid log path {:?}", log_path);
    };

    std::fs::create_dir_all(dir).inspect_err(|e| {
        eprintln!("Failed to create log directory {:?}: {}", dir, e);
    })?;

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let json_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(writer)
        .fmt_fields(JsonFields::default());

    // RUST_LOG wins, then --log-level, then INFO
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.unwrap_or("info")));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .try_init()?;

    Ok(guard)
}
