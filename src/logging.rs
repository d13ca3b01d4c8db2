//=========================================================================
// Logging
//=========================================================================
//
// One-time `env_logger` setup behind the `log` facade used everywhere
// in the engine.
//
// Targets used by the engine: "engine", "scene", "physics", "input",
// "platform", "render". Filter them with RUST_LOG, e.g.
//   RUST_LOG=info,physics=debug
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::Once;

use log::LevelFilter;

//=== LoggingConfig =======================================================

/// Logger configuration.
///
/// `env_filter` uses the `env_logger` filter syntax and takes priority
/// over `RUST_LOG`.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub default_level: LevelFilter,
    pub write_style: env_logger::WriteStyle,

    /// Route output through the test harness capture.
    pub is_test: bool,
}

impl LoggingConfig {
    /// Configuration for `#[test]` functions: captured, debug level.
    pub fn for_tests() -> Self {
        Self {
            default_level: LevelFilter::Debug,
            is_test: true,
            ..Self::default()
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            default_level: LevelFilter::Info,
            write_style: env_logger::WriteStyle::Auto,
            is_test: false,
        }
    }
}

static INIT: Once = Once::new();

/// Installs the global logger once. Later calls are ignored.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        if let Some(filter) = config.env_filter.as_deref() {
            builder.parse_filters(filter);
        } else if let Ok(filter) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filter);
        } else {
            builder.filter_level(config.default_level);
        }

        builder.write_style(config.write_style);
        builder.is_test(config.is_test);

        // Another logger may already be installed by the host application.
        if builder.try_init().is_ok() {
            log::debug!(target: "engine", "logging initialized");
        }
    });
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        init_logging(LoggingConfig::for_tests());
        init_logging(LoggingConfig::default());
        log::info!(target: "engine", "still logging");
    }

    #[test]
    fn test_config_captures_output() {
        let config = LoggingConfig::for_tests();
        assert!(config.is_test);
        assert_eq!(config.default_level, LevelFilter::Debug);
    }
}
