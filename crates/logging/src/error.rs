//! crates/logging/src/error.rs
//! Errors surfaced by emission and configuration calls.

use thiserror::Error;

use levels::Severity;

use crate::callback::CallbackError;

/// Error returned by the engine's emission methods.
///
/// Malformed configuration never produces an error; it is reported through
/// [`Diagnostics`](crate::Diagnostics) instead. The only failure that reaches
/// the caller is a callback refusing a message.
#[derive(Debug, Error)]
pub enum LogError {
    /// The registered callback returned an error.
    #[error("log callback failed for {level} message tagged \"{tag}\": {source}")]
    Callback {
        /// Severity of the rejected message.
        level: Severity,
        /// Resolved tag, empty for the default tag.
        tag: String,
        /// The callback's error.
        #[source]
        source: CallbackError,
    },
}

impl LogError {
    /// Severity of the message that triggered the error.
    #[must_use]
    pub const fn level(&self) -> Severity {
        match self {
            Self::Callback { level, .. } => *level,
        }
    }

    /// Tag of the message that triggered the error.
    #[must_use]
    pub fn tag(&self) -> &str {
        match self {
            Self::Callback { tag, .. } => tag,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn callback_error_preserves_source_and_context() {
        let error = LogError::Callback {
            level: Severity::Info,
            tag: String::new(),
            source: "Test Error".into(),
        };

        assert_eq!(error.level(), Severity::Info);
        assert_eq!(error.tag(), "");
        assert_eq!(
            error.to_string(),
            "log callback failed for INFO message tagged \"\": Test Error"
        );
        assert_eq!(error.source().unwrap().to_string(), "Test Error");
    }
}
