//! crates/logging/src/global.rs
//! Thread-local engine behind free functions and the `log_*!` macros.
//!
//! Filtering decisions are taken while the engine is borrowed. The callback
//! runs after the borrow is released, so a callback may itself log through
//! these functions.

use std::cell::RefCell;

use levels::{LevelConfig, Severity};

use crate::callback::{CallbackUpdate, Delivery, deliver_all};
use crate::engine::Engine;
use crate::error::LogError;
use crate::invocation::Call;
use crate::message::Arg;

thread_local! {
    static ENGINE: RefCell<Engine> = RefCell::new(Engine::new());
}

/// Replaces the engine of the current thread, returning the previous one.
///
/// Use this to install an engine built with custom options or diagnostics.
pub fn install(engine: Engine) -> Engine {
    ENGINE.with(|current| current.replace(engine))
}

/// Configure the engine of the current thread.
///
/// # Errors
///
/// Returns the first callback failure raised while replaying buffered calls.
pub fn init(config: &LevelConfig, callback: CallbackUpdate) -> Result<(), LogError> {
    let replay = ENGINE.with(|engine| engine.borrow_mut().apply(config, callback));
    deliver_all(replay)
}

/// Configure the engine of the current thread, keeping its callback.
///
/// # Errors
///
/// See [`init`].
pub fn configure(config: &LevelConfig) -> Result<(), LogError> {
    init(config, CallbackUpdate::Keep)
}

/// Emit `args` at `level`.
///
/// # Errors
///
/// Returns [`LogError::Callback`] when the callback rejects the message.
pub fn log(level: Severity, args: Vec<Arg>) -> Result<(), LogError> {
    let delivery =
        ENGINE.with(|engine| engine.borrow_mut().submit(level, Call::Positional(args)));
    delivery.map_or(Ok(()), Delivery::deliver)
}

/// Emit at `TRACE`.
///
/// # Errors
///
/// See [`log`].
pub fn trace(args: Vec<Arg>) -> Result<(), LogError> {
    log(Severity::Trace, args)
}

/// Emit at `DEBUG`.
///
/// # Errors
///
/// See [`log`].
pub fn debug(args: Vec<Arg>) -> Result<(), LogError> {
    log(Severity::Debug, args)
}

/// Emit at `INFO`.
///
/// # Errors
///
/// See [`log`].
pub fn info(args: Vec<Arg>) -> Result<(), LogError> {
    log(Severity::Info, args)
}

/// Emit at `WARN`.
///
/// # Errors
///
/// See [`log`].
pub fn warn(args: Vec<Arg>) -> Result<(), LogError> {
    log(Severity::Warn, args)
}

/// Emit at `ERROR`.
///
/// # Errors
///
/// See [`log`].
pub fn error(args: Vec<Arg>) -> Result<(), LogError> {
    log(Severity::Error, args)
}

/// Check whether `level` passes for `tag` on the current thread.
pub fn is_level_enabled(level: &str, tag: Option<&str>) -> bool {
    ENGINE.with(|engine| engine.borrow().is_level_enabled(level, tag))
}

/// Reset the engine of the current thread.
pub fn reset() {
    ENGINE.with(|engine| {
        engine.borrow_mut().reset();
    });
}

/// Run `f` with exclusive access to the engine of the current thread.
///
/// Callbacks triggered from inside `f` run while the engine is borrowed and
/// must not log through this module.
pub fn with_engine<R>(f: impl FnOnce(&mut Engine) -> R) -> R {
    ENGINE.with(|engine| f(&mut engine.borrow_mut()))
}

/// Names of the tags registered on the current thread, in registration order.
pub fn registered_tags() -> Vec<String> {
    ENGINE.with(|engine| engine.borrow().tags().to_vec())
}
