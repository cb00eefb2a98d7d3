use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const LOG_FILE_NAME: &str = "coursescrape.log";

#[derive(Debug, Clone)]
pub struct LogOptions {
    /// Level applied to this binary and the library when `RUST_LOG` is unset.
    pub level: String,
    /// Write to an hourly rolling file in this directory instead of stdout.
    pub log_dir: Option<PathBuf>,
}

/// Installs the subscriber for the whole process. Keep the returned guard
/// alive until exit or buffered lines are lost.
pub fn init(options: &LogOptions) -> WorkerGuard {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "libcoursescrape={level},coursescrape={level}",
            level = options.level
        ))
    });
    let (writer, guard) = match &options.log_dir {
        Some(dir) => {
            tracing_appender::non_blocking(tracing_appender::rolling::hourly(dir, LOG_FILE_NAME))
        }
        None => tracing_appender::non_blocking(std::io::stdout()),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(options.log_dir.is_none())
        .init();
    guard
}
