//! Logging utilities and configuration for docscope.
//!
//! The library only emits `tracing` events and spans. Installing a
//! subscriber is left to the application; [`setup::init_logging`] is a
//! ready-made one for binaries and tests.

use tracing::Level;

/// Controls how chatty the analytics facade is.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Base log level for docscope components
    pub base_level: Level,
    /// Whether to log every store read (counts, samples, listings)
    pub log_store_operations: bool,
    /// Whether to log per-field analysis results
    pub log_field_details: bool,
    /// Maximum length for logged field values (to prevent huge logs)
    pub max_field_length: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            base_level: Level::INFO,
            log_store_operations: true,
            log_field_details: false,
            max_field_length: 256,
        }
    }
}

impl LogConfig {
    /// Creates a verbose configuration suitable for debugging.
    pub fn verbose() -> Self {
        Self {
            base_level: Level::DEBUG,
            log_store_operations: true,
            log_field_details: true,
            max_field_length: 1024,
        }
    }

    /// Creates a minimal configuration for production with lowest overhead.
    pub fn production() -> Self {
        Self {
            base_level: Level::WARN,
            log_store_operations: false,
            log_field_details: false,
            max_field_length: 128,
        }
    }

    pub fn balanced() -> Self {
        Self::default()
    }
}

/// Debug logging that skips formatting unless the config asks for debug output.
#[macro_export]
macro_rules! perf_debug {
    ($config:expr, $($arg:tt)*) => {
        if $config.base_level <= tracing::Level::DEBUG {
            tracing::debug!($($arg)*);
        }
    };
}

/// Logs a store read when store-operation logging is enabled.
#[macro_export]
macro_rules! log_store_op {
    ($config:expr, $($arg:tt)*) => {
        if $config.log_store_operations {
            tracing::info!($($arg)*);
        }
    };
}

/// Logs a per-field result when field-detail logging is enabled.
#[macro_export]
macro_rules! log_field_detail {
    ($config:expr, $($arg:tt)*) => {
        if $config.log_field_details {
            tracing::debug!($($arg)*);
        }
    };
}

/// Truncates a string to at most `max_length` characters.
pub fn truncate_field(value: &str, max_length: usize) -> String {
    match value.char_indices().nth(max_length) {
        None => value.to_string(),
        Some((byte_index, _)) => format!("{}...(truncated)", &value[..byte_index]),
    }
}

/// Subscriber installation for binaries and tests.
pub mod setup {
    use tracing::Level;

    #[derive(Debug, Clone)]
    pub struct LoggingConfig {
        /// Log level for everything outside docscope
        pub level: Level,
        /// Log level for docscope components specifically
        pub docscope_level: Level,
        /// Whether to use JSON output format
        pub json_format: bool,
        /// Environment filter override
        pub env_filter: Option<String>,
    }

    impl Default for LoggingConfig {
        fn default() -> Self {
            Self {
                level: Level::INFO,
                docscope_level: Level::DEBUG,
                json_format: false,
                env_filter: None,
            }
        }
    }

    impl LoggingConfig {
        /// JSON output, warnings only outside docscope.
        pub fn production() -> Self {
            Self {
                level: Level::WARN,
                docscope_level: Level::INFO,
                json_format: true,
                env_filter: None,
            }
        }

        pub fn development() -> Self {
            Self {
                level: Level::DEBUG,
                docscope_level: Level::DEBUG,
                json_format: false,
                env_filter: None,
            }
        }

        pub fn with_level(mut self, level: Level) -> Self {
            self.level = level;
            self
        }

        pub fn with_docscope_level(mut self, level: Level) -> Self {
            self.docscope_level = level;
            self
        }

        pub fn with_json_format(mut self, enabled: bool) -> Self {
            self.json_format = enabled;
            self
        }

        pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
            self.env_filter = Some(filter.into());
            self
        }

        /// Builds the environment filter string.
        pub fn env_filter(&self) -> String {
            if let Some(ref filter) = self.env_filter {
                filter.clone()
            } else {
                format!(
                    "{},docscope={}",
                    self.level.as_str().to_lowercase(),
                    self.docscope_level.as_str().to_lowercase()
                )
            }
        }
    }

    /// Installs a global `fmt` subscriber. `RUST_LOG` overrides the configured filter.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use docscope::logging::setup::{init_logging, LoggingConfig};
    ///
    /// init_logging(LoggingConfig::development().with_json_format(true)).unwrap();
    /// ```
    pub fn init_logging(config: LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config.env_filter()));

        let fmt_layer = if config.json_format {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .boxed()
        } else {
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .boxed()
        };

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;

        Ok(())
    }
}
