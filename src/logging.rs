use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{
    fmt::{self, writer::BoxMakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Registry,
};

use crate::error::{ReaderError, ReaderResult};

/// Logging configuration for CHONKER Reader
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub log_dir: PathBuf,
    /// Only honoured when built with `advanced_logging`
    pub enable_file_logging: bool,
    pub max_log_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_dir: PathBuf::from("logs"),
            enable_file_logging: false,
            max_log_files: 10,
        }
    }
}

/// Keeps background log writers alive. Drop it only on shutdown.
#[derive(Default)]
pub struct LoggingGuard {
    #[cfg(feature = "advanced_logging")]
    _file_guard: Option<tracing_appender::non_blocking::WorkerGuard>,
}

/// Where console log lines go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleOutput {
    Stderr,
    /// The TUI owns the terminal, console lines would corrupt the screen
    Silent,
}

/// Initialize the logging system
pub fn init_logging(config: &LoggingConfig, console: ConsoleOutput) -> ReaderResult<LoggingGuard> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "chonker_reader={},lopdf=warn,{}",
            config.level, config.level
        ))
    });

    let registry = Registry::default().with(env_filter);

    let console_writer = match console {
        ConsoleOutput::Stderr => BoxMakeWriter::new(std::io::stderr),
        ConsoleOutput::Silent => BoxMakeWriter::new(std::io::sink),
    };
    let console_layer = fmt::layer()
        .with_writer(console_writer)
        .with_ansi(console == ConsoleOutput::Stderr)
        .with_target(false)
        .without_time()
        .compact();

    #[cfg(feature = "advanced_logging")]
    {
        if config.enable_file_logging {
            use tracing_appender::{non_blocking, rolling};

            fs::create_dir_all(&config.log_dir).map_err(|e| {
                ReaderError::file_io(config.log_dir.to_string_lossy().to_string(), e)
            })?;

            let file_appender = rolling::daily(&config.log_dir, "chonker-reader.log");
            let (file_writer, guard) = non_blocking(file_appender);
            let file_layer = fmt::layer().with_writer(file_writer).with_ansi(false);

            registry
                .with(console_layer)
                .with(file_layer)
                .try_init()
                .map_err(|e| ReaderError::configuration(format!("logging: {}", e)))?;

            info!("🐹 CHONKER Reader logging initialized");
            info!("File logging enabled: {}", config.log_dir.display());
            return Ok(LoggingGuard {
                _file_guard: Some(guard),
            });
        }
    }

    registry
        .with(console_layer)
        .try_init()
        .map_err(|e| ReaderError::configuration(format!("logging: {}", e)))?;

    info!("🐹 CHONKER Reader logging initialized");
    info!("Log level: {}", config.level);
    if config.enable_file_logging && cfg!(not(feature = "advanced_logging")) {
        warn!("File logging requested but the advanced_logging feature is disabled");
    }

    Ok(LoggingGuard::default())
}

/// Log system information for debugging
pub fn log_system_info() {
    info!(
        "🐹 CHONKER Reader v{} - PDF study viewer",
        env!("CARGO_PKG_VERSION")
    );
    info!("System: {} {}", std::env::consts::OS, std::env::consts::ARCH);

    if let Ok(cwd) = std::env::current_dir() {
        info!("Working directory: {}", cwd.display());
    }
}

/// Performance timing helper
pub struct PerformanceTimer {
    start: std::time::Instant,
    operation: String,
}

impl PerformanceTimer {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            start: std::time::Instant::now(),
            operation: operation.into(),
        }
    }

    pub fn elapsed_ms(&self) -> u128 {
        self.start.elapsed().as_millis()
    }
}

impl Drop for PerformanceTimer {
    fn drop(&mut self) {
        tracing::debug!("⏱️  Completed {}: {}ms", self.operation, self.elapsed_ms());
    }
}

/// Clean up old log files
pub fn cleanup_old_logs(config: &LoggingConfig) -> ReaderResult<()> {
    if !config.enable_file_logging || !config.log_dir.exists() {
        return Ok(());
    }

    let mut log_files = Vec::new();

    let entries = fs::read_dir(&config.log_dir)
        .map_err(|e| ReaderError::file_io(config.log_dir.to_string_lossy().to_string(), e))?;

    for entry in entries {
        let entry = entry
            .map_err(|e| ReaderError::file_io(config.log_dir.to_string_lossy().to_string(), e))?;

        let path = entry.path();
        let is_log = path
            .file_name()
            .and_then(|s| s.to_str())
            .map(|name| name.starts_with("chonker-reader.log"))
            .unwrap_or(false);
        if is_log {
            if let Ok(metadata) = fs::metadata(&path) {
                log_files.push((
                    path,
                    metadata
                        .modified()
                        .unwrap_or(std::time::SystemTime::UNIX_EPOCH),
                ));
            }
        }
    }

    // Newest first
    log_files.sort_by(|a, b| b.1.cmp(&a.1));

    if log_files.len() > config.max_log_files {
        for (path, _) in &log_files[config.max_log_files..] {
            if let Err(e) = fs::remove_file(path) {
                warn!("Failed to remove old log file {}: {}", path.display(), e);
            } else {
                info!("Removed old log file: {}", path.display());
            }
        }
    }

    Ok(())
}

/// Macro for logging with context
#[macro_export]
macro_rules! log_error {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            recoverable = $error.is_recoverable(),
            "CHONKER Reader error occurred"
        );
    };
}
