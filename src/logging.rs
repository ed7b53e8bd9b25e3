use crate::config::Config;
use crate::error::ApiError;
use std::io::stdout;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Sets up logging for the client layer.
///
/// Always logs to a daily-rolling file; `log_to_stdout` additionally
/// mirrors output to stdout (useful for host apps running in a terminal).
/// The log file location comes from the config's `log_file_path` when set,
/// otherwise the platform default log directory.
///
/// Returns the path to the log file and the guard that must be kept alive
/// for the duration of the program to ensure proper log flushing.
pub fn setup_logging(config: &Config, log_to_stdout: bool) -> Result<(String, WorkerGuard), ApiError> {
    let (log_dir, log_file_name) = match &config.log_file_path {
        Some(custom_path) => {
            let path = Path::new(custom_path);
            let parent = path.parent().unwrap_or(Path::new("."));
            let file_name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("carelink_net.log");
            (parent.to_string_lossy().to_string(), file_name.to_string())
        }
        None => (
            crate::config::get_log_dir_path(),
            "carelink_net.log".to_string(),
        ),
    };

    if !Path::new(&log_dir).exists() {
        std::fs::create_dir_all(&log_dir).map_err(|e| {
            ApiError::log_setup_error(format!("Failed to create log directory: {e}"))
        })?;
    }

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, &log_file_name);

    // The guard must be kept alive for the duration of the program
    // to ensure logs are flushed properly
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::Layer::new()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_filter(
            EnvFilter::from_default_env().add_directive("carelink_net=info".parse().map_err(
                |e| ApiError::log_setup_error(format!("Invalid log directive: {e}")),
            )?),
        )
        .boxed();

    let registry = tracing_subscriber::registry();
    if log_to_stdout {
        registry
            .with(vec![
                fmt::Layer::new()
                    .with_writer(stdout)
                    .with_ansi(true)
                    .with_filter(EnvFilter::from_default_env().add_directive(
                        "carelink_net=info".parse().map_err(|e| {
                            ApiError::log_setup_error(format!("Invalid log directive: {e}"))
                        })?,
                    ))
                    .boxed(),
                file_layer,
            ])
            .init();
    } else {
        registry.with(vec![file_layer]).init();
    }

    let log_file_path = format!("{log_dir}/{log_file_name}");
    Ok((log_file_path, guard))
}
