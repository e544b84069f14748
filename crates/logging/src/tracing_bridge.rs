//! crates/logging/src/tracing_bridge.rs
//! Bridge from the tracing crate into a shared filter engine.
//!
//! [`TagLayer`] is a tracing-subscriber layer that turns every tracing event
//! into an emission call on an [`Engine`]: the event target is the tag
//! candidate, the tracing level is the severity, the `message` field is the
//! message and every other field becomes an extra parameter of the form
//! `{"name": value}`. Targets that are not registered tags fall back to the
//! default tag, exactly like an unknown first argument.
//!
//! Events under the `taglog::` targets are the engine's own diagnostics and
//! are never forwarded. A callback failure has no caller to return to here, so
//! it goes to the engine's [`Diagnostics`](crate::Diagnostics).
//!
//! Code that logs through a [`SharedEngine`] from a thread where the layer is
//! active should use [`log_shared`] and [`init_shared`], which release the lock
//! before the callback runs.
//!
//! # Usage
//!
//! ```rust,ignore
//! use logging::{CallbackUpdate, Engine, init_shared, init_tracing, shared};
//! use levels::LevelConfig;
//!
//! let engine = shared(Engine::new());
//! init_shared(&engine, &LevelConfig::from([("app::db", "DEBUG")]), callback)?;
//! init_tracing(engine)?;
//!
//! tracing::debug!(target: "app::db", rows = 3, "query finished");
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use serde_json::{Map, Value};
use tracing::field::{Field, Visit};
use tracing::{Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::TryInitError;

use levels::{LevelConfig, Severity};

use crate::callback::{CallbackUpdate, Delivery, deliver_all};
use crate::engine::Engine;
use crate::error::LogError;
use crate::invocation::Call;
use crate::message::Arg;

const OWN_TARGET_PREFIX: &str = "taglog::";

/// Engine shared between the tracing layer and the code configuring it.
///
/// Calling [`Engine::log`] or [`Engine::init`] through `lock()` runs the
/// callback with the mutex held. If that callback emits a tracing event on a
/// non-`taglog::` target while a [`TagLayer`] for the same engine is active,
/// the layer locks the mutex again on the same thread and deadlocks. Use
/// [`log_shared`] and [`init_shared`] instead.
pub type SharedEngine = Arc<Mutex<Engine>>;

/// Wraps `engine` for use with [`TagLayer`].
#[must_use]
pub fn shared(engine: Engine) -> SharedEngine {
    Arc::new(Mutex::new(engine))
}

/// [`Engine::init`] on a shared engine, with replay after the lock is released.
///
/// # Errors
///
/// Returns the first callback failure raised while replaying buffered calls.
pub fn init_shared(
    engine: &SharedEngine,
    config: &LevelConfig,
    callback: CallbackUpdate,
) -> Result<(), LogError> {
    let replay = engine
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .apply(config, callback);
    deliver_all(replay)
}

/// [`Engine::log`] on a shared engine, with delivery after the lock is released.
///
/// # Errors
///
/// Returns [`LogError::Callback`] when the callback rejects the message.
pub fn log_shared(engine: &SharedEngine, level: Severity, args: Vec<Arg>) -> Result<(), LogError> {
    let delivery = engine
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .submit(level, Call::Positional(args));
    delivery.map_or(Ok(()), Delivery::deliver)
}

/// A tracing layer that forwards events to a shared [`Engine`].
///
/// The engine lock is held only while the filtering decision is made; the
/// callback runs after it is released.
#[derive(Clone, Debug)]
pub struct TagLayer {
    engine: SharedEngine,
}

impl TagLayer {
    /// Create a layer feeding `engine`.
    #[must_use]
    pub const fn new(engine: SharedEngine) -> Self {
        Self { engine }
    }

    /// The engine this layer feeds.
    #[must_use]
    pub const fn engine(&self) -> &SharedEngine {
        &self.engine
    }

    /// Map a tracing level to a severity.
    const fn severity_for(level: &Level) -> Severity {
        match *level {
            Level::ERROR => Severity::Error,
            Level::WARN => Severity::Warn,
            Level::INFO => Severity::Info,
            Level::DEBUG => Severity::Debug,
            Level::TRACE => Severity::Trace,
        }
    }
}

impl<S> Layer<S> for TagLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let target = metadata.target();
        if target.starts_with(OWN_TARGET_PREFIX) {
            return;
        }

        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);
        let Some(message) = visitor.message else {
            return;
        };

        let call = Call::Targeted {
            target: target.to_owned(),
            message,
            params: visitor.params,
        };
        let severity = Self::severity_for(metadata.level());

        let (delivery, diagnostics) = {
            let mut engine = self.engine.lock().unwrap_or_else(PoisonError::into_inner);
            (engine.submit(severity, call), engine.diagnostics())
        };

        if let Some(Err(error)) = delivery.map(Delivery::deliver) {
            diagnostics.callback_failed(&error);
        }
    }
}

/// Collects the message and the remaining fields of an event as JSON values.
#[derive(Default)]
struct FieldVisitor {
    message: Option<Value>,
    params: Vec<Value>,
}

impl FieldVisitor {
    fn push(&mut self, field: &Field, value: Value) {
        if field.name() == "message" {
            self.message = Some(value);
        } else {
            let mut entry = Map::new();
            entry.insert(field.name().to_owned(), value);
            self.params.push(Value::Object(entry));
        }
    }
}

impl Visit for FieldVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.push(field, Value::String(format!("{value:?}")));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.push(field, Value::from(value));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.push(field, Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.push(field, Value::from(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.push(field, Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.push(field, Value::from(value));
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.push(field, Value::String(value.to_string()));
    }
}

/// Install a global subscriber that forwards tracing events to `engine`.
///
/// # Errors
///
/// Fails when a global subscriber is already installed.
pub fn init_tracing(engine: SharedEngine) -> Result<(), TryInitError> {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::registry()
        .with(TagLayer::new(engine))
        .try_init()
}

/// Install a global subscriber combining `filter` with the engine bridge.
///
/// The filter runs first, so events it rejects never reach the engine.
///
/// # Example
///
/// ```rust,ignore
/// use logging::{Engine, init_tracing_with_filter, shared};
/// use tracing_subscriber::EnvFilter;
///
/// init_tracing_with_filter(shared(Engine::new()), EnvFilter::from_default_env())?;
/// ```
///
/// # Errors
///
/// Fails when a global subscriber is already installed.
pub fn init_tracing_with_filter<F>(engine: SharedEngine, filter: F) -> Result<(), TryInitError>
where
    F: Layer<tracing_subscriber::Registry> + Send + Sync + 'static,
{
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::registry()
        .with(filter)
        .with(TagLayer::new(engine))
        .try_init()
}
