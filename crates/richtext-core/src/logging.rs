// SPDX-License-Identifier: AGPL-3.0-or-later
//! Warning sinks

use crate::traits::WarningSink;
use std::sync::{Mutex, PoisonError};

/// Forwards warnings to `tracing` at WARN level
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl WarningSink for TracingSink {
    fn warn(&self, message: &str) {
        tracing::warn!(target: "richtext_core", "{}", message);
    }
}

/// Discards every warning
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl WarningSink for NullSink {
    fn warn(&self, _message: &str) {}
}

/// Keeps warnings in memory, for tests and for hosts that surface them to users
#[derive(Debug, Default)]
pub struct CollectingSink {
    messages: Mutex<Vec<String>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the warnings received so far
    pub fn messages(&self) -> Vec<String> {
        self.lock().clone()
    }

    /// Drain the warnings received so far
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.lock())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<String>> {
        self.messages.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl WarningSink for CollectingSink {
    fn warn(&self, message: &str) {
        self.lock().push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collecting_sink_take_drains() {
        let sink = CollectingSink::new();
        sink.warn("one");
        assert_eq!(sink.len(), 1);
        assert_eq!(sink.take(), vec!["one"]);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_null_sink_accepts_anything() {
        NullSink.warn("ignored");
    }
}
