use std::fmt;

use serde::Serialize;

/// Severity of a diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Severity {
    /// Something was resolved silently, such as an assumed multiplication.
    Info,
    /// The result is valid but degraded (undefined sub-results, timeouts).
    Warning,
    /// The request failed.
    Error,
}

impl Severity {
    /// The prefix label used when messages are rendered for a host.
    ///
    /// # Example
    /// ```
    /// use reckon::diagnostics::Severity;
    ///
    /// assert_eq!(Severity::Warning.label(), "Warning");
    /// ```
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Info => "Info",
            Self::Warning => "Warning",
            Self::Error => "Error",
        }
    }

    const fn log_level(self) -> log::Level {
        match self {
            Self::Info => log::Level::Debug,
            Self::Warning => log::Level::Warn,
            Self::Error => log::Level::Error,
        }
    }
}

/// A single diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub severity: Severity,
    pub text:     String,
}

impl Message {
    #[must_use]
    pub fn new(severity: Severity, text: impl Into<String>) -> Self {
        Self { severity,
               text: text.into() }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity.label(), self.text)
    }
}

/// Ordered collection of the messages produced by one request.
///
/// A session clears the sink at the start of every top-level operation and
/// drains it at the end, so messages never leak from one request into the
/// next.
///
/// # Example
/// ```
/// use reckon::diagnostics::{Diagnostics, Severity};
///
/// let mut sink = Diagnostics::new();
/// sink.info("assumed multiplication");
/// sink.warning("division by zero");
///
/// let messages = sink.drain();
/// assert_eq!(messages.len(), 2);
/// assert_eq!(messages[1].severity, Severity::Warning);
/// assert!(sink.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct Diagnostics {
    messages: Vec<Message>,
}

impl Diagnostics {
    #[must_use]
    pub const fn new() -> Self {
        Self { messages: Vec::new() }
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Appends a message and forwards it to the `log` facade.
    pub fn push(&mut self, message: Message) {
        log::log!(message.severity.log_level(), "{message}");
        self.messages.push(message);
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.push(Message::new(Severity::Info, text));
    }

    pub fn warning(&mut self, text: impl Into<String>) {
        self.push(Message::new(Severity::Warning, text));
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.push(Message::new(Severity::Error, text));
    }

    /// Removes and returns every message in push order.
    pub fn drain(&mut self) -> Vec<Message> {
        std::mem::take(&mut self.messages)
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Whether a message of at least `severity` has been pushed.
    #[must_use]
    pub fn has(&self, severity: Severity) -> bool {
        self.messages.iter().any(|m| m.severity >= severity)
    }
}

/// Renders messages as `"Label: text\n"` lines.
///
/// # Example
/// ```
/// use reckon::diagnostics::{Message, Severity, render_messages};
///
/// let text = render_messages(&[Message::new(Severity::Info, "a"),
///                              Message::new(Severity::Error, "b")]);
/// assert_eq!(text, "Info: a\nError: b\n");
/// ```
#[must_use]
pub fn render_messages(messages: &[Message]) -> String {
    messages.iter().map(|m| format!("{m}\n")).collect()
}
