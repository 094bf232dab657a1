use crate::logger::{format::LoggerFormat, level::LoggerLevel};

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub format: LoggerFormat,
    pub level: LoggerLevel,
    /// Raw `EnvFilter` directive; overrides `level` when set.
    pub filter: Option<String>,
    pub with_targets: bool,
    pub use_color: bool,
}

impl LoggerConfig {
    pub fn with_format(mut self, format: LoggerFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_level(mut self, level: LoggerLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Directive handed to the subscriber filter.
    pub fn directive(&self) -> String {
        match &self.filter {
            Some(filter) if !filter.trim().is_empty() => filter.clone(),
            _ => self.level.directive(),
        }
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        let use_color = cfg!(test) || atty::is(atty::Stream::Stdout);
        Self {
            format: LoggerFormat::Text,
            level: LoggerLevel::Info,
            filter: None,
            with_targets: true,
            use_color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_overrides_level() {
        let cfg = LoggerConfig::default().with_level(LoggerLevel::Debug);
        assert!(cfg.directive().starts_with("debug,"));

        let cfg = cfg.with_filter("vouch_core=trace");
        assert_eq!(cfg.directive(), "vouch_core=trace");
    }

    #[test]
    fn blank_filter_falls_back_to_level() {
        let cfg = LoggerConfig::default().with_filter("  ");
        assert_eq!(cfg.directive(), LoggerLevel::Info.directive());
    }
}
