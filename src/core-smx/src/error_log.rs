//! Run-scoped accumulator of user-facing failure descriptions.

use serde::Serialize;

/// Append-only log of human-readable error messages, one per failed sitemap node or operation.
///
/// Messages are kept in the order they were recorded. There is no deduplication and no
/// severity: everything recorded here is meant to be shown to the user once a run completes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ErrorLog {
    messages: Vec<String>,
}

impl ErrorLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message to the log.
    pub fn record(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!("{}", message);
        self.messages.push(message);
    }

    /// All recorded messages, oldest first.
    pub fn all(&self) -> &[String] {
        &self.messages
    }

    /// Clears the log for a new run.
    pub fn reset(&mut self) {
        self.messages.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Destroys the log, obtaining the recorded messages directly.
    pub fn into_messages(self) -> Vec<String> {
        self.messages
    }
}
