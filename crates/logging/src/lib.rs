#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `logging` decides whether a leveled, tagged message reaches the single
//! callback registered by the host application. It performs no formatting and
//! no I/O of its own: the callback receives the canonical level name, the
//! resolved tag, the message and any extra parameters, and does whatever the
//! host wants with them.
//!
//! # Design
//!
//! [`Engine`] owns the tag→severity map, the default severity, the tag
//! registry, a level-decision cache and a bounded buffer for calls made
//! before the first [`Engine::init`]. Configuration arrives as a
//! [`LevelConfig`] and merges into the current state. Emission methods take a
//! positional argument list built with [`args!`]; the first argument selects a
//! tag only when it names a registered tag, which [`Invocation::resolve`]
//! decides once per call.
//!
//! Configuration problems are reported through the [`Diagnostics`] side
//! channel, by default as `tracing` events. The [`global`] module keeps one
//! engine per thread behind free functions and the `log_*!` macros, and the
//! `tracing-bridge` feature forwards `tracing` events into a shared engine.
//!
//! # Invariants
//!
//! - A message is delivered iff a callback is installed and its severity is at
//!   least the effective level of its resolved tag.
//! - `OFF` is never delivered.
//! - Undefined extra parameters are removed before delivery.
//! - The decision cache never changes an outcome; it is cleared by every
//!   `init` and `reset`.
//! - The wildcard key `*` configures the default severity and is never
//!   registered as a tag.
//!
//! # Errors
//!
//! Malformed configuration never fails. Callback failures propagate to the
//! caller as [`LogError::Callback`].
//!
//! # Examples
//!
//! ```
//! use std::sync::{Arc, Mutex};
//! use logging::{args, CallbackError, CallbackUpdate, Engine};
//! use levels::LevelConfig;
//! use serde_json::Value;
//!
//! let lines = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&lines);
//!
//! let mut engine = Engine::new();
//! engine.info(args!["early"])?;
//!
//! engine.init(
//!     &"security=ERROR,INFO".parse::<LevelConfig>().unwrap(),
//!     CallbackUpdate::replace(move |level: &str, tag: &str, message: &Value, _: &[Value]| {
//!         sink.lock().unwrap().push(format!("{level}|{tag}|{message}"));
//!         Ok::<(), CallbackError>(())
//!     }),
//! )?;
//!
//! engine.info(args!["security", "login ok"])?;
//! engine.error(args!["security", "breach"])?;
//!
//! assert_eq!(
//!     *lines.lock().unwrap(),
//!     ["INFO||\"early\"", "ERROR|security|\"breach\""]
//! );
//! # Ok::<(), logging::LogError>(())
//! ```

mod macros;

mod buffer;
mod cache;
mod callback;
mod diagnostics;
mod engine;
mod error;
pub mod global;
mod invocation;
mod message;
mod registry;
#[cfg(feature = "tracing-bridge")]
mod tracing_bridge;

pub use buffer::DEFAULT_BUFFER_CAPACITY;
pub use cache::CacheStats;
pub use callback::{Callback, CallbackError, CallbackUpdate};
#[cfg(any(test, feature = "test-support"))]
pub use diagnostics::{DiagnosticEvent, RecordingDiagnostics};
pub use diagnostics::{DIAGNOSTICS_TARGET, Diagnostics, InvalidLevel, TracingDiagnostics};
pub use engine::{ENGINE_TARGET, Engine, EngineOptions, InvalidLevelFallback};
pub use error::LogError;
pub use invocation::Invocation;
pub use levels::{DEFAULT_TAG, LevelConfig, Severity};
pub use message::Arg;
pub use registry::{TagDescriptor, Tags};
#[cfg(feature = "tracing-bridge")]
pub use tracing_bridge::{
    SharedEngine, TagLayer, init_shared, init_tracing, init_tracing_with_filter, log_shared,
    shared,
};
