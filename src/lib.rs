#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `taglog` is an embeddable logging facade. Calling code emits leveled,
//! tagged messages; the host application decides which tags are interesting
//! and receives the accepted messages through one callback. Formatting and
//! output are entirely the host's business.
//!
//! The workspace is split into:
//!
//! - [`levels`]: the ordered [`Severity`] scale and the [`LevelConfig`]
//!   mapping from tags to level strings, including directive parsing
//!   (`network=TRACE,*=INFO`) and environment loading.
//! - [`logging`]: the filtering [`Engine`], its tag reflector, the
//!   thread-local [`global`] engine with the `log_*!` macros, and the optional
//!   bridge from `tracing`.
//!
//! # Examples
//!
//! ```
//! use taglog::{args, CallbackError, CallbackUpdate, Engine, LevelConfig};
//! use serde_json::Value;
//!
//! let mut engine = Engine::new();
//! engine.init(
//!     &LevelConfig::from([("network", "TRACE"), ("*", "INFO")]),
//!     CallbackUpdate::replace(|level: &str, tag: &str, message: &Value, params: &[Value]| {
//!         println!("{level} [{tag}] {message} {params:?}");
//!         Ok::<(), CallbackError>(())
//!     }),
//! )?;
//!
//! engine.trace(args!["network", "connected"])?;
//! assert!(!engine.is_debug_enabled(None));
//! assert_eq!(engine.tags().get("network"), Some("network"));
//! # Ok::<(), taglog::LogError>(())
//! ```

pub use levels;
pub use logging;

pub use levels::{
    ConfigError, DEFAULT_TAG, ENV_VAR, LevelConfig, ParseSeverityError, Severity,
};
pub use logging::global;
pub use logging::{
    Arg, CacheStats, Callback, CallbackError, CallbackUpdate, DEFAULT_BUFFER_CAPACITY,
    Diagnostics, Engine, EngineOptions, InvalidLevel, InvalidLevelFallback, Invocation, LogError,
    TagDescriptor, Tags, TracingDiagnostics,
};
pub use logging::{args, log_debug, log_error, log_info, log_trace, log_warn};
#[cfg(feature = "tracing-bridge")]
pub use logging::{
    SharedEngine, TagLayer, init_shared, init_tracing, init_tracing_with_filter, log_shared,
    shared,
};
