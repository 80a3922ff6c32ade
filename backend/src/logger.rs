use std::sync::OnceLock;

use tracing_subscriber::EnvFilter;

/// Log levels representing increasing verbosity. Setting a level enables
/// that level and all less verbose levels below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Silent = 0,
    Error = 1,
    Warn = 2,
    Info = 3,
    Debug = 4,
}

impl Level {
    /// Parse a log level from a string (case insensitive).
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "silent" => Some(Level::Silent),
            "error" => Some(Level::Error),
            "warn" => Some(Level::Warn),
            "info" => Some(Level::Info),
            "debug" => Some(Level::Debug),
            _ => None,
        }
    }

    fn as_filter_str(&self) -> &'static str {
        match self {
            Level::Silent => "off",
            Level::Error => "error",
            Level::Warn => "warn",
            Level::Info => "info",
            Level::Debug => "debug",
        }
    }
}

static LOGGER_INIT: OnceLock<()> = OnceLock::new();

/// Install the global tracing subscriber. RUST_LOG takes precedence,
/// otherwise LOG_LEVEL selects one of the Level names (default: info).
/// Safe to call more than once.
pub fn init() {
    LOGGER_INIT.get_or_init(|| {
        let level = std::env::var("LOG_LEVEL")
            .ok()
            .and_then(|s| Level::from_str(&s))
            .unwrap_or(Level::Info);

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(level.as_filter_str()));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .try_init();
    });
}

pub fn error(msg: &str) {
    tracing::error!("{}", msg);
}

pub fn warn(msg: &str) {
    tracing::warn!("{}", msg);
}

pub fn info(msg: &str) {
    tracing::info!("{}", msg);
}

pub fn debug(msg: &str) {
    tracing::debug!("{}", msg);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_from_str() {
        assert_eq!(Level::from_str("info"), Some(Level::Info));
        assert_eq!(Level::from_str("DEBUG"), Some(Level::Debug));
        assert_eq!(Level::from_str("nope"), None);
    }

    #[test]
    fn test_level_ordering() {
        assert!(Level::Debug > Level::Info);
        assert!(Level::Error > Level::Silent);
    }
}
