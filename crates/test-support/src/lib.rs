#![deny(unsafe_code)]
#![deny(missing_docs)]

//! crates/test-support/src/lib.rs
//! Recording callback shared by the workspace test suites.
//!
//! [`Capture`] hands out closures with the callback signature of the
//! `logging` crate and stores every message they receive. It can be switched
//! to fail so tests can observe how errors travel back to the caller.

use std::error::Error;
use std::fmt::Write as _;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::Value;

/// Error type returned by the recording sink.
pub type SinkError = Box<dyn Error + Send + Sync>;

/// One message received by a [`Capture`] sink.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    /// Canonical level name.
    pub level: String,
    /// Resolved tag, empty for the default tag.
    pub tag: String,
    /// The message as delivered.
    pub message: Value,
    /// Extra parameters as delivered.
    pub params: Vec<Value>,
}

impl Record {
    /// Renders the record as `LEVEL: [tag] message, param, ...`.
    ///
    /// String values are written without quotes and the tag bracket is
    /// omitted for the default tag.
    #[must_use]
    pub fn render(&self) -> String {
        let mut line = format!("{}: ", self.level);
        if !self.tag.is_empty() {
            let _ = write!(line, "[{}] ", self.tag);
        }
        push_value(&mut line, &self.message);
        for param in &self.params {
            line.push_str(", ");
            push_value(&mut line, param);
        }
        line
    }
}

fn push_value(line: &mut String, value: &Value) {
    match value {
        Value::String(text) => line.push_str(text),
        other => {
            let _ = write!(line, "{other}");
        }
    }
}

#[derive(Debug, Default)]
struct State {
    records: Vec<Record>,
    failure: Option<String>,
}

/// Shared recorder for callback output.
///
/// Clones share the same storage.
#[derive(Clone, Debug, Default)]
pub struct Capture {
    state: Arc<Mutex<State>>,
}

impl Capture {
    /// Creates an empty capture.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a callback closure that records into this capture.
    ///
    /// While a failure is armed with [`fail_with`](Self::fail_with) the
    /// closure records nothing and returns the configured error.
    #[must_use]
    pub fn sink(
        &self,
    ) -> impl Fn(&str, &str, &Value, &[Value]) -> Result<(), SinkError> + Send + Sync + 'static
    {
        let state = Arc::clone(&self.state);
        move |level: &str, tag: &str, message: &Value, params: &[Value]| {
            let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(failure) = &state.failure {
                return Err(failure.clone().into());
            }
            state.records.push(Record {
                level: level.to_owned(),
                tag: tag.to_owned(),
                message: message.clone(),
                params: params.to_vec(),
            });
            Ok(())
        }
    }

    /// Makes every subsequent sink call fail with `message`.
    pub fn fail_with(&self, message: &str) {
        self.lock().failure = Some(message.to_owned());
    }

    /// Disarms a failure set by [`fail_with`](Self::fail_with).
    pub fn succeed(&self) {
        self.lock().failure = None;
    }

    /// Copies the recorded messages.
    #[must_use]
    pub fn records(&self) -> Vec<Record> {
        self.lock().records.clone()
    }

    /// Removes and returns the recorded messages.
    pub fn take(&self) -> Vec<Record> {
        std::mem::take(&mut self.lock().records)
    }

    /// Rendered form of every recorded message.
    #[must_use]
    pub fn rendered(&self) -> Vec<String> {
        self.lock().records.iter().map(Record::render).collect()
    }

    /// Number of recorded messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().records.len()
    }

    /// Returns `true` when nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().records.is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
