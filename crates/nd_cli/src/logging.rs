use std::sync::Once;
use tracing::Level;

static INIT: Once = Once::new();

/// Prefixes command output so interleaved runs stay readable.
#[derive(Debug, Clone, Default)]
pub struct Logger {
    prefixes: Vec<String>,
}

impl Logger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefixes.push(prefix.into());
        self
    }

    fn prefixed(&self, message: &str) -> String {
        let mut line = String::new();
        for prefix in &self.prefixes {
            line.push_str(prefix);
            line.push(' ');
        }
        line.push_str(message);
        line
    }

    pub fn info(&self, message: &str) {
        tracing::info!("{}", self.prefixed(message));
    }

    pub fn warn(&self, message: &str) {
        tracing::warn!("{}", self.prefixed(message));
    }
}

pub fn max_level(verbose: bool) -> Level {
    if verbose {
        Level::DEBUG
    } else {
        Level::INFO
    }
}

/// Install the fmt subscriber once per process. Later calls only hand out
/// a fresh [`Logger`].
pub fn init_logging(verbose: bool) -> Logger {
    if !tracing::dispatcher::has_been_set() {
        INIT.call_once(|| {
            tracing_subscriber::fmt()
                .with_max_level(max_level(verbose))
                .with_writer(std::io::stderr)
                .init();
        });
    }
    Logger::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixes_are_joined_in_order() {
        let logger = Logger::new().with_prefix("[serve]").with_prefix("📰");
        assert_eq!(logger.prefixed("ready"), "[serve] 📰 ready");
        assert_eq!(Logger::new().prefixed("plain"), "plain");
    }

    #[test]
    fn test_verbose_raises_level() {
        assert_eq!(max_level(true), Level::DEBUG);
        assert_eq!(max_level(false), Level::INFO);
    }

    #[test]
    fn test_init_is_idempotent() {
        init_logging(false).info("first");
        init_logging(true).info("second");
    }
}
