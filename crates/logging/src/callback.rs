//! crates/logging/src/callback.rs
//! The single consumer of accepted messages.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use levels::Severity;

use crate::error::LogError;

/// Error type callbacks report failures with.
pub type CallbackError = Box<dyn std::error::Error + Send + Sync>;

/// Receives every message the engine accepts.
///
/// Arguments are the canonical level name, the resolved tag (empty for the
/// default tag), the message and the extra parameters with undefined slots
/// removed. Any closure with the matching signature implements the trait.
pub trait Callback: Send + Sync {
    /// Handles one accepted message.
    fn emit(
        &self,
        level: &str,
        tag: &str,
        message: &Value,
        params: &[Value],
    ) -> Result<(), CallbackError>;
}

impl<F> Callback for F
where
    F: Fn(&str, &str, &Value, &[Value]) -> Result<(), CallbackError> + Send + Sync,
{
    fn emit(
        &self,
        level: &str,
        tag: &str,
        message: &Value,
        params: &[Value],
    ) -> Result<(), CallbackError> {
        self(level, tag, message, params)
    }
}

/// How `init` treats the active callback.
///
/// `Keep` and `Disable` are deliberately distinct: omitting a callback leaves
/// the current one in place while `Disable` silences emission.
#[derive(Clone, Default)]
pub enum CallbackUpdate {
    /// Leave the active callback untouched.
    #[default]
    Keep,
    /// Remove the active callback. Emission becomes a no-op.
    Disable,
    /// Install a new callback.
    Replace(Arc<dyn Callback>),
}

impl CallbackUpdate {
    /// Wraps a closure as a replacement callback.
    pub fn replace<F>(callback: F) -> Self
    where
        F: Fn(&str, &str, &Value, &[Value]) -> Result<(), CallbackError> + Send + Sync + 'static,
    {
        Self::Replace(Arc::new(callback))
    }

    /// Installs an already shared callback.
    pub fn shared(callback: Arc<dyn Callback>) -> Self {
        Self::Replace(callback)
    }
}

impl fmt::Debug for CallbackUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Keep => f.write_str("Keep"),
            Self::Disable => f.write_str("Disable"),
            Self::Replace(_) => f.write_str("Replace(..)"),
        }
    }
}

/// An accepted message waiting to be handed to the callback.
///
/// Deliveries are prepared while the engine is borrowed and run after the
/// borrow ends, so a callback may log through the same engine.
pub(crate) struct Delivery {
    pub(crate) callback: Arc<dyn Callback>,
    pub(crate) level: Severity,
    pub(crate) tag: String,
    pub(crate) message: Value,
    pub(crate) params: Vec<Value>,
}

impl Delivery {
    pub(crate) fn deliver(self) -> Result<(), LogError> {
        self.callback
            .emit(self.level.as_str(), &self.tag, &self.message, &self.params)
            .map_err(|source| LogError::Callback {
                level: self.level,
                tag: self.tag,
                source,
            })
    }
}

/// Delivers in order, stopping at the first failing callback.
pub(crate) fn deliver_all(deliveries: Vec<Delivery>) -> Result<(), LogError> {
    deliveries.into_iter().try_for_each(Delivery::deliver)
}
