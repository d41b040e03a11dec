//! Logging utilities and configuration for term-shape.
//!
//! The scan in [`core`](crate::core) never logs. Row sources and the
//! command-line tool emit `tracing` events, gated by [`LogConfig`].

use tracing::Level;

/// What term-shape components log once a subscriber is installed.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Level of term-shape's own events; seeds the subscriber filter
    pub base_level: Level,
    /// Log source operations: open, download, cleanup, verdicts
    pub log_data_operations: bool,
    /// Log the offending row's fields when a table is invalid
    pub log_row_content: bool,
    /// Longest field preview written to a log line, in bytes
    pub max_field_length: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            base_level: Level::INFO,
            log_data_operations: true,
            log_row_content: false,
            max_field_length: 256,
        }
    }
}

impl LogConfig {
    /// Everything, including offending row content.
    pub fn verbose() -> Self {
        Self {
            base_level: Level::DEBUG,
            log_row_content: true,
            max_field_length: 1024,
            ..Self::default()
        }
    }

    /// Warnings only. Row content is never logged since tables may carry
    /// personal data.
    pub fn production() -> Self {
        Self {
            base_level: Level::WARN,
            log_data_operations: false,
            log_row_content: false,
            max_field_length: 128,
        }
    }

    /// Returns a field shortened for a log line.
    pub fn preview(&self, field: &str) -> String {
        truncate_field(field, self.max_field_length)
    }
}

/// Logs a source operation at info level when `log_data_operations` is set.
///
/// ```rust
/// use term_shape::{log_data_op, logging::LogConfig};
///
/// let config = LogConfig::default();
/// log_data_op!(config, source.id = "orders.csv", "Opened source");
/// ```
#[macro_export]
macro_rules! log_data_op {
    ($config:expr, $($arg:tt)*) => {
        if $config.log_data_operations {
            tracing::info!($($arg)*);
        }
    };
}

/// Shortens `value` to at most `max_length` bytes without splitting a
/// character, marking the cut.
pub fn truncate_field(value: &str, max_length: usize) -> String {
    if value.len() <= max_length {
        return value.to_string();
    }
    let end = (0..=max_length)
        .rev()
        .find(|&i| value.is_char_boundary(i))
        .unwrap_or(0);
    format!("{}...(truncated)", &value[..end])
}

/// Installing a `tracing` subscriber.
pub mod setup {
    use super::LogConfig;
    use std::io::IsTerminal;
    use tracing::Level;

    /// Subscriber settings. Output always goes to stderr; stdout carries
    /// rendered results.
    #[derive(Debug, Clone)]
    pub struct LoggingConfig {
        /// Level for every other crate
        pub level: Level,
        /// Level for `term_shape` targets
        pub shape_level: Level,
        /// Emit one JSON object per event
        pub json_format: bool,
        /// Complete filter directive, replacing the two levels above
        pub env_filter: Option<String>,
        /// Color human-readable output with ANSI escapes
        pub ansi: bool,
    }

    impl Default for LoggingConfig {
        fn default() -> Self {
            Self {
                level: Level::WARN,
                shape_level: Level::INFO,
                json_format: false,
                env_filter: None,
                ansi: std::io::stderr().is_terminal(),
            }
        }
    }

    impl From<&LogConfig> for LoggingConfig {
        /// Filters `term_shape` events at the preset's `base_level`.
        fn from(config: &LogConfig) -> Self {
            Self::default().with_shape_level(config.base_level)
        }
    }

    impl LoggingConfig {
        /// JSON, warnings only.
        pub fn production() -> Self {
            Self {
                shape_level: Level::WARN,
                json_format: true,
                ..Self::default()
            }
        }

        /// Human-readable, debug everywhere.
        pub fn development() -> Self {
            Self {
                level: Level::DEBUG,
                shape_level: Level::DEBUG,
                ..Self::default()
            }
        }

        /// Sets the level for other crates.
        pub fn with_level(mut self, level: Level) -> Self {
            self.level = level;
            self
        }

        /// Sets the level for `term_shape` targets.
        pub fn with_shape_level(mut self, level: Level) -> Self {
            self.shape_level = level;
            self
        }

        /// Switches JSON output on or off.
        pub fn with_json_format(mut self, enabled: bool) -> Self {
            self.json_format = enabled;
            self
        }

        /// Switches ANSI colors on or off.
        pub fn with_ansi(mut self, enabled: bool) -> Self {
            self.ansi = enabled;
            self
        }

        /// Replaces the generated filter with `filter`.
        pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
            self.env_filter = Some(filter.into());
            self
        }

        /// The filter directive used when `RUST_LOG` is unset.
        pub fn env_filter(&self) -> String {
            match &self.env_filter {
                Some(filter) => filter.clone(),
                None => format!(
                    "{},term_shape={}",
                    self.level.as_str().to_lowercase(),
                    self.shape_level.as_str().to_lowercase()
                ),
            }
        }
    }

    /// Installs the global subscriber.
    ///
    /// `RUST_LOG` takes precedence over the configured filter when set. Fails
    /// if a global subscriber is already installed.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use term_shape::logging::setup::{LoggingConfig, init_logging};
    ///
    /// let config = LoggingConfig::development().with_json_format(true);
    /// init_logging(config).unwrap();
    /// ```
    pub fn init_logging(config: LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config.env_filter()));

        let output = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(config.ansi);
        let output = if config.json_format {
            output.json().boxed()
        } else {
            output.boxed()
        };

        tracing_subscriber::registry()
            .with(filter)
            .with(output)
            .try_init()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::setup::LoggingConfig;
    use super::*;

    #[test]
    fn test_presets() {
        let default = LogConfig::default();
        assert_eq!(default.base_level, Level::INFO);
        assert!(default.log_data_operations);
        assert!(!default.log_row_content);

        let verbose = LogConfig::verbose();
        assert!(verbose.log_row_content);
        assert!(verbose.log_data_operations);

        let production = LogConfig::production();
        assert_eq!(production.base_level, Level::WARN);
        assert!(!production.log_data_operations);
        assert!(!production.log_row_content);
    }

    #[test]
    fn test_truncate_field() {
        assert_eq!(truncate_field("hello", 10), "hello");
        assert_eq!(truncate_field("hello", 5), "hello");
        assert_eq!(
            truncate_field("a long free-text comment column", 6),
            "a long...(truncated)"
        );
    }

    #[test]
    fn test_truncate_field_respects_char_boundaries() {
        // 'é' is two bytes; cutting at 2 would split it
        assert_eq!(truncate_field("aéb", 2), "a...(truncated)");
    }

    #[test]
    fn test_preview_uses_configured_length() {
        let config = LogConfig {
            max_field_length: 3,
            ..LogConfig::default()
        };
        assert_eq!(config.preview("abcdef"), "abc...(truncated)");
    }

    #[test]
    fn test_env_filter() {
        assert_eq!(LoggingConfig::default().env_filter(), "warn,term_shape=info");
        assert_eq!(
            LoggingConfig::production().env_filter(),
            "warn,term_shape=warn"
        );

        let custom = LoggingConfig::development().with_env_filter("term_shape=trace");
        assert_eq!(custom.env_filter(), "term_shape=trace");
    }

    #[test]
    fn test_log_config_sets_shape_level() {
        assert_eq!(
            LoggingConfig::from(&LogConfig::production()).env_filter(),
            "warn,term_shape=warn"
        );
        assert_eq!(
            LoggingConfig::from(&LogConfig::default()).env_filter(),
            "warn,term_shape=info"
        );

        let verbose = LoggingConfig::from(&LogConfig::verbose());
        assert_eq!(verbose.shape_level, Level::DEBUG);
        assert_eq!(verbose.level, Level::WARN);
    }

    #[test]
    fn test_ansi_can_be_disabled() {
        assert!(!LoggingConfig::default().with_ansi(false).ansi);
        assert!(LoggingConfig::default().with_ansi(true).ansi);
    }
}
