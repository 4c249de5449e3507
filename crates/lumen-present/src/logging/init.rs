use std::sync::Once;

/// How the capture tools and tests want log output set up.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Directive string such as `"lumen_present=trace"`. Takes precedence over
    /// the `RUST_LOG` environment variable when present.
    pub env_filter: Option<String>,

    /// Colored output; `Auto` disables it when stderr is not a terminal.
    pub write_style: env_logger::WriteStyle,
}

impl LoggingConfig {
    /// Config with an explicit directive string.
    pub fn with_filter(filter: impl Into<String>) -> Self {
        Self {
            env_filter: Some(filter.into()),
            ..Self::default()
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

/// Directives applied when neither the config nor `RUST_LOG` names any.
/// Presenter events at info; wgpu internals only from warn up, since they
/// log every adapter probe.
const DEFAULT_DIRECTIVES: &str = "info,wgpu_core=warn,wgpu_hal=warn";

/// Picks the directive string: config first, then `rust_log`, then the default.
fn directives(config: &LoggingConfig, rust_log: Option<String>) -> String {
    config
        .env_filter
        .clone()
        .or(rust_log)
        .unwrap_or_else(|| DEFAULT_DIRECTIVES.to_owned())
}

static INIT: Once = Once::new();

/// Installs `env_logger` as the `log` backend for the process.
///
/// Only the first call does anything. If another logger is already installed
/// (a test harness, an embedding host) it is left in place.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = directives(&config, std::env::var("RUST_LOG").ok());

        let installed = env_logger::Builder::new()
            .parse_filters(&filter)
            .write_style(config.write_style)
            .try_init()
            .is_ok();

        if installed {
            log::debug!("log filter: {filter}");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_filter_beats_rust_log() {
        let config = LoggingConfig::with_filter("lumen_present=trace");
        assert_eq!(
            directives(&config, Some("warn".into())),
            "lumen_present=trace"
        );
    }

    #[test]
    fn rust_log_used_without_explicit_filter() {
        assert_eq!(directives(&LoggingConfig::default(), Some("warn".into())), "warn");
    }

    #[test]
    fn default_quiets_wgpu_internals() {
        assert_eq!(directives(&LoggingConfig::default(), None), DEFAULT_DIRECTIVES);
    }

    #[test]
    fn init_twice_is_harmless() {
        init_logging(LoggingConfig::default());
        init_logging(LoggingConfig::with_filter("debug"));
    }
}
