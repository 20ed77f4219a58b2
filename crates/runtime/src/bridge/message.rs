//! Framework messages and the sink that displays them.

use std::str::FromStr;

/// Message severity, ordered from least to most severe.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    serde::Serialize,
    serde::Deserialize,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    Debug,
    Verbose,
    #[default]
    Log,
    Warning,
    Error,
    Fatal,
}

impl LogLevel {
    pub fn parse(text: &str) -> Option<Self> {
        Self::from_str(text).ok()
    }
}

/// One message emitted by the framework.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DisplayMessage {
    pub level: LogLevel,
    pub message: String,
    pub category: String,
    /// Show in the host's console/log window.
    pub on_console: bool,
    /// Show on screen as an overlay.
    pub on_screen: bool,
    /// Messages with the same tag replace each other on screen.
    pub tag: Option<String>,
}

impl DisplayMessage {
    pub fn new(level: LogLevel, message: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            category: category.into(),
            on_console: true,
            on_screen: false,
            tag: None,
        }
    }

    pub fn on_screen(mut self, on_screen: bool) -> Self {
        self.on_screen = on_screen;
        self
    }

    pub fn on_console(mut self, on_console: bool) -> Self {
        self.on_console = on_console;
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }
}

/// Receives framework messages.
pub trait MessageSink: Send + Sync {
    fn display_message(&self, message: &DisplayMessage);
}

/// Routes messages into `tracing` under the `discen::message` target.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl MessageSink for TracingSink {
    fn display_message(&self, message: &DisplayMessage) {
        let DisplayMessage {
            level,
            message,
            category,
            ..
        } = message;
        match level {
            LogLevel::Debug | LogLevel::Verbose => {
                tracing::debug!(target: "discen::message", %category, "{}", message)
            }
            LogLevel::Log => tracing::info!(target: "discen::message", %category, "{}", message),
            LogLevel::Warning => {
                tracing::warn!(target: "discen::message", %category, "{}", message)
            }
            LogLevel::Error | LogLevel::Fatal => {
                tracing::error!(target: "discen::message", %category, %level, "{}", message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_are_ordered() {
        assert!(LogLevel::Debug < LogLevel::Verbose);
        assert!(LogLevel::Log < LogLevel::Warning);
        assert!(LogLevel::Error < LogLevel::Fatal);
        assert_eq!(LogLevel::parse("WARNING"), Some(LogLevel::Warning));
        assert_eq!(LogLevel::parse("loud"), None);
    }
}
