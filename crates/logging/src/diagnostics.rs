//! crates/logging/src/diagnostics.rs
//! Side channel for configuration problems, kept apart from the message callback.

use std::fmt;

use levels::Severity;

use crate::error::LogError;

/// Tracing target used for diagnostic events.
pub const DIAGNOSTICS_TARGET: &str = "taglog::diagnostics";

/// Details of a configuration entry whose level string failed to parse.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InvalidLevel<'a> {
    /// The configured tag, or the wildcard key.
    pub tag: &'a str,
    /// The rejected level string.
    pub raw: &'a str,
    /// The severity used instead. For the wildcard this is the default left in place.
    pub substituted: Severity,
    /// `true` when the substitute is the current default severity.
    pub from_default: bool,
}

impl fmt::Display for InvalidLevel<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid log level \"{}\" for tag \"{}\". ",
            self.raw, self.tag
        )?;
        if self.from_default {
            write!(f, "Using default ({}).", self.substituted)
        } else {
            write!(f, "Using {}.", self.substituted)
        }
    }
}

/// Logger of last resort for problems the engine recovers from.
pub trait Diagnostics: Send + Sync {
    /// A configuration entry named an unknown severity.
    fn invalid_level(&self, notice: &InvalidLevel<'_>);

    /// An emission call started with a string that is not a registered tag.
    fn unregistered_tag(&self, candidate: &str);

    /// A callback failed where no caller can receive the error, as for
    /// events forwarded by the tracing bridge.
    fn callback_failed(&self, error: &LogError);
}

/// Default diagnostics that emit `tracing` events.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn invalid_level(&self, notice: &InvalidLevel<'_>) {
        tracing::warn!(
            target: DIAGNOSTICS_TARGET,
            tag = notice.tag,
            level = notice.raw,
            substituted = notice.substituted.as_str(),
            "{notice}"
        );
    }

    fn unregistered_tag(&self, candidate: &str) {
        tracing::trace!(
            target: DIAGNOSTICS_TARGET,
            candidate,
            "logger: unregistered tag, \"{candidate}\""
        );
    }

    fn callback_failed(&self, error: &LogError) {
        tracing::error!(
            target: DIAGNOSTICS_TARGET,
            level = error.level().as_str(),
            tag = error.tag(),
            %error,
            "log callback failed"
        );
    }
}

/// A diagnostic captured by [`RecordingDiagnostics`].
#[cfg(any(test, feature = "test-support"))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DiagnosticEvent {
    /// An invalid level was replaced.
    InvalidLevel {
        /// The configured tag.
        tag: String,
        /// The rejected level string.
        raw: String,
        /// The substituted severity.
        substituted: Severity,
        /// The rendered warning text.
        message: String,
    },
    /// An unregistered tag candidate was seen.
    UnregisteredTag {
        /// The candidate string.
        candidate: String,
    },
    /// A callback failure with nobody to return it to.
    CallbackFailed {
        /// Severity of the rejected message.
        level: Severity,
        /// Resolved tag of the rejected message.
        tag: String,
        /// The rendered error.
        message: String,
    },
}

/// Diagnostics sink that records events in memory.
#[cfg(any(test, feature = "test-support"))]
#[derive(Debug, Default)]
pub struct RecordingDiagnostics {
    events: std::sync::Mutex<Vec<DiagnosticEvent>>,
}

#[cfg(any(test, feature = "test-support"))]
impl RecordingDiagnostics {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drains all recorded events, clearing the internal buffer.
    pub fn drain_events(&self) -> Vec<DiagnosticEvent> {
        self.lock().drain(..).collect()
    }

    /// Rendered warning texts of recorded invalid-level events.
    pub fn warnings(&self) -> Vec<String> {
        self.lock()
            .iter()
            .filter_map(|event| match event {
                DiagnosticEvent::InvalidLevel { message, .. } => Some(message.clone()),
                DiagnosticEvent::UnregisteredTag { .. } | DiagnosticEvent::CallbackFailed { .. } => {
                    None
                }
            })
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<DiagnosticEvent>> {
        self.events
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[cfg(any(test, feature = "test-support"))]
impl Diagnostics for RecordingDiagnostics {
    fn invalid_level(&self, notice: &InvalidLevel<'_>) {
        self.lock().push(DiagnosticEvent::InvalidLevel {
            tag: notice.tag.to_owned(),
            raw: notice.raw.to_owned(),
            substituted: notice.substituted,
            message: notice.to_string(),
        });
    }

    fn unregistered_tag(&self, candidate: &str) {
        self.lock().push(DiagnosticEvent::UnregisteredTag {
            candidate: candidate.to_owned(),
        });
    }

    fn callback_failed(&self, error: &LogError) {
        self.lock().push(DiagnosticEvent::CallbackFailed {
            level: error.level(),
            tag: error.tag().to_owned(),
            message: error.to_string(),
        });
    }
}
