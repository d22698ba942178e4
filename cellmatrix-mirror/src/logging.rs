use std::path::PathBuf;

use directories::ProjectDirs;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    Layer, filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Configuration for the bootstrap's logging.
///
/// Console output goes to stderr because stdout carries the display
/// stream; file logging is optional.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level for file output.
    pub file_level: Level,
    /// Log level for stderr output.
    pub console_level: Level,
    /// Directory for log files; `None` disables file logging.
    pub log_dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file_level: Level::DEBUG,
            console_level: Level::WARN,
            log_dir: None,
        }
    }
}

impl LoggingConfig {
    /// The OS-appropriate default log directory.
    pub fn default_log_dir() -> PathBuf {
        if let Some(project_dirs) = ProjectDirs::from("", "", "cellmatrix") {
            project_dirs.cache_dir().to_path_buf()
        } else {
            PathBuf::from("cellmatrix-logs")
        }
    }

    /// Reads overrides from `CELLMATRIX_LOG`, `CELLMATRIX_FILE_LOG`,
    /// and `CELLMATRIX_LOG_DIR`.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(level) = std::env::var("CELLMATRIX_LOG") {
            if let Ok(parsed) = level.parse::<Level>() {
                config.console_level = parsed;
                config.file_level = parsed;
            }
        }

        if let Ok(level) = std::env::var("CELLMATRIX_FILE_LOG") {
            if let Ok(parsed) = level.parse::<Level>() {
                config.file_level = parsed;
            }
        }

        if let Ok(dir) = std::env::var("CELLMATRIX_LOG_DIR") {
            config.log_dir = Some(PathBuf::from(dir));
        }

        config
    }
}

/// Installs the global subscriber; call once from the binary.
///
/// Returns the appender guard keeping file output alive; dropping it
/// flushes and stops the background writer.
pub fn init_logging(config: LoggingConfig) -> std::io::Result<Option<WorkerGuard>> {
    let mut layers = vec![];
    let mut guard = None;

    if let Some(log_dir) = &config.log_dir {
        std::fs::create_dir_all(log_dir)?;

        let appender = tracing_appender::rolling::daily(log_dir, "cellmatrix-mirror.log");
        let (non_blocking, file_guard) = tracing_appender::non_blocking(appender);
        guard = Some(file_guard);

        let filter = EnvFilter::builder()
            .with_default_directive(config.file_level.into())
            .from_env_lossy();

        layers.push(fmt::layer().with_writer(non_blocking).with_filter(filter).boxed());
    }

    let console_filter = EnvFilter::builder()
        .with_default_directive(config.console_level.into())
        .from_env_lossy();
    layers.push(
        fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
            .with_filter(console_filter)
            .boxed(),
    );

    tracing_subscriber::registry().with(layers).init();
    Ok(guard)
}
