use std::{
    fs,
    path::{Path, PathBuf},
    time::{Duration, SystemTime},
};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[allow(dead_code)]
pub struct LoggerGuard(WorkerGuard);

/// Set up a daily rolling file log plus an ANSI stdout layer. The returned
/// guard must stay alive for the duration of the process or buffered log
/// lines are lost.
pub fn init_logging(log_dir: impl AsRef<Path>, prefix: &str, level: &str) -> LoggerGuard {
    let log_dir = log_dir.as_ref().to_path_buf();

    let level = match level {
        "trace" | "debug" | "info" | "warn" | "error" => level,
        _ => "info",
    };

    let builder = EnvFilter::builder().with_default_directive(level.parse().unwrap());
    let console_filter = builder
        .clone()
        .parse_lossy(std::env::var("RUST_LOG").unwrap_or_default());
    let file_filter = builder.parse_lossy(std::env::var("RUST_LOG").unwrap_or_default());

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(prefix)
        .filename_suffix("log")
        .build(&log_dir)
        .expect("Failed to create file appender");
    let (non_blocking, guard) = NonBlocking::new(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_filter(file_filter);
    let stdout_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true)
        .with_filter(console_filter);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stdout_layer)
        .init();

    if let Err(e) = cleanup_old_logs(&log_dir, prefix, MAX_LOG_AGE) {
        tracing::warn!("Failed to clean up old log files: {}", e);
    }

    LoggerGuard(guard)
}

const MAX_LOG_AGE: Duration = Duration::from_secs(60 * 60 * 24 * 7);

/// Delete rolled log files older than `max_age`. Search runs are one-shot
/// processes, so this happens once at startup rather than on a timer.
fn cleanup_old_logs(log_dir: &Path, prefix: &str, max_age: Duration) -> std::io::Result<()> {
    if !log_dir.exists() {
        return Ok(());
    }
    let now = SystemTime::now();

    for entry in fs::read_dir(log_dir)? {
        let path: PathBuf = entry?.path();
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !file_name.starts_with(prefix) || !file_name.ends_with(".log") {
            continue;
        }
        let modified = fs::metadata(&path)?.modified()?;
        if now.duration_since(modified).unwrap_or_default() > max_age {
            fs::remove_file(&path)?;
            tracing::info!("Old log file deleted: {}", file_name);
        }
    }
    Ok(())
}
