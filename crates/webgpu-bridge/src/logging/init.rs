use std::sync::Once;

/// Environment variable consulted before `RUST_LOG`.
pub const FILTER_ENV_VAR: &str = "WEBGPU_BRIDGE_LOG";

/// Default filter. wgpu's internals are chatty at `info`.
const DEFAULT_FILTER: &str = "info,wgpu_core=warn,wgpu_hal=warn,naga=warn";

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "debug",
/// "webgpu_bridge=debug,wgpu_core=warn").
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

/// Picks the filter string: explicit config, then [`FILTER_ENV_VAR`], then
/// `RUST_LOG`, then the built-in default.
pub fn resolve_filter(
    explicit: Option<&str>,
    bridge_var: Option<&str>,
    rust_log: Option<&str>,
) -> String {
    [explicit, bridge_var, rust_log]
        .into_iter()
        .flatten()
        .find(|f| !f.trim().is_empty())
        .unwrap_or(DEFAULT_FILTER)
        .to_string()
}

static INIT: Once = Once::new();

/// Initializes the global logger once.
///
/// Subsequent calls are ignored, as is the case where another logger was
/// already installed by the host application.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let bridge_var = std::env::var(FILTER_ENV_VAR).ok();
        let rust_log = std::env::var("RUST_LOG").ok();
        let filter = resolve_filter(
            config.env_filter.as_deref(),
            bridge_var.as_deref(),
            rust_log.as_deref(),
        );

        let mut builder = env_logger::Builder::new();
        builder.parse_filters(&filter);
        builder.write_style(config.write_style);

        if builder.try_init().is_err() {
            return;
        }

        log::debug!("logging initialized with filter `{filter}`");
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_filter_wins() {
        let f = resolve_filter(Some("trace"), Some("debug"), Some("warn"));
        assert_eq!(f, "trace");
    }

    #[test]
    fn bridge_var_beats_rust_log() {
        let f = resolve_filter(None, Some("debug"), Some("warn"));
        assert_eq!(f, "debug");
    }

    #[test]
    fn falls_back_to_default() {
        assert_eq!(resolve_filter(None, None, None), DEFAULT_FILTER);
    }

    #[test]
    fn blank_filter_is_skipped() {
        assert_eq!(resolve_filter(None, Some("  "), Some("warn")), "warn");
        assert_eq!(resolve_filter(Some(""), None, None), DEFAULT_FILTER);
    }

    #[test]
    fn init_is_idempotent() {
        init_logging(LoggingConfig::default());
        init_logging(LoggingConfig {
            env_filter: Some("trace".into()),
            ..Default::default()
        });
    }
}
