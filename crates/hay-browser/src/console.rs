//! Page console capture.
//!
//! Catalog pages load availability through JavaScript; when that breaks the
//! status cells simply stay empty. Capturing `console.*` output during a check
//! lets the runner report the script error next to the assertion that failed.

use chromiumoxide::cdp::js_protocol::runtime::EventConsoleApiCalled;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::SystemTime;

/// The severity level of a console message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConsoleLevel {
    /// `console.log()`
    Log,
    /// `console.info()`
    Info,
    /// `console.warn()`
    Warning,
    /// `console.error()`
    Error,
    /// `console.debug()`
    Debug,
    /// Catch-all for other console APIs
    Other,
}

impl ConsoleLevel {
    /// Returns true if this is an error-level message.
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, ConsoleLevel::Error)
    }
}

impl From<&EventConsoleApiCalled> for ConsoleLevel {
    fn from(event: &EventConsoleApiCalled) -> Self {
        use chromiumoxide::cdp::js_protocol::runtime::ConsoleApiCalledType;

        match event.r#type {
            ConsoleApiCalledType::Log => ConsoleLevel::Log,
            ConsoleApiCalledType::Info => ConsoleLevel::Info,
            ConsoleApiCalledType::Warning => ConsoleLevel::Warning,
            ConsoleApiCalledType::Error => ConsoleLevel::Error,
            ConsoleApiCalledType::Debug => ConsoleLevel::Debug,
            _ => ConsoleLevel::Other,
        }
    }
}

/// A captured console message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleMessage {
    /// Severity level (log, warn, error, etc.)
    pub level: ConsoleLevel,

    /// The formatted message text. Multiple arguments are joined with spaces.
    pub text: String,

    /// When the message was captured (system time, not page time).
    pub timestamp: SystemTime,

    /// Source location if available (e.g., "availability.js:42:10").
    pub source: Option<String>,
}

impl ConsoleMessage {
    /// Creates a new console message.
    #[must_use]
    pub fn new(level: ConsoleLevel, text: String) -> Self {
        Self {
            level,
            text,
            timestamp: SystemTime::now(),
            source: None,
        }
    }

    /// Creates a message with source location.
    #[must_use]
    pub fn with_source(mut self, source: String) -> Self {
        self.source = Some(source);
        self
    }
}

impl fmt::Display for ConsoleMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Some(source) => write!(f, "{} ({source})", self.text),
            None => f.write_str(&self.text),
        }
    }
}

/// Thread-safe console message accumulator.
///
/// Cheap to clone; the CDP listener task and the check share one buffer.
#[derive(Debug, Clone, Default)]
pub struct ConsoleCapture {
    messages: Arc<Mutex<Vec<ConsoleMessage>>>,
}

impl ConsoleCapture {
    /// Creates a new, empty console capture.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a message to the capture buffer.
    ///
    /// A poisoned lock drops the message; the panic that poisoned it is the
    /// failure worth reporting.
    pub(crate) fn push(&self, message: ConsoleMessage) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(message);
        }
    }

    /// Returns all captured messages as a snapshot.
    #[must_use]
    pub fn messages(&self) -> Vec<ConsoleMessage> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns all error-level messages.
    #[must_use]
    pub fn errors(&self) -> Vec<ConsoleMessage> {
        self.messages()
            .into_iter()
            .filter(|m| m.level.is_error())
            .collect()
    }

    /// Returns the count of error messages.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|m| m.level.is_error())
            .count()
    }

    /// Clears all captured messages.
    ///
    /// Used after the warm-up navigation so only the checked page's output
    /// is reported.
    pub fn clear(&self) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.clear();
        }
    }

    /// Returns the total number of messages captured.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true if no messages have been captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Parses a CDP `EventConsoleApiCalled` into a `ConsoleMessage`.
pub(crate) fn parse_console_event(event: &EventConsoleApiCalled) -> ConsoleMessage {
    let level = ConsoleLevel::from(event);

    let text = event
        .args
        .iter()
        .map(|arg| {
            arg.value
                .as_ref()
                .and_then(|v| v.as_str())
                .unwrap_or("<object>")
                .to_string()
        })
        .collect::<Vec<_>>()
        .join(" ");

    let mut message = ConsoleMessage::new(level, text);

    if let Some(frame) = event
        .stack_trace
        .as_ref()
        .and_then(|trace| trace.call_frames.first())
    {
        message = message.with_source(format!(
            "{}:{}:{}",
            frame.url, frame.line_number, frame.column_number
        ));
    }

    message
}
