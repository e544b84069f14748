//! crates/logging/src/engine.rs
//! The tag-aware level filter that decides which messages reach the callback.

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use levels::{DEFAULT_TAG, LevelConfig, Severity};

use crate::buffer::{DEFAULT_BUFFER_CAPACITY, Deferred, PendingBuffer};
use crate::cache::{CacheStats, DecisionCache};
use crate::callback::{Callback, CallbackUpdate, Delivery, deliver_all};
use crate::diagnostics::{Diagnostics, InvalidLevel, TracingDiagnostics};
use crate::error::LogError;
use crate::invocation::{Call, Invocation};
use crate::message::Arg;
use crate::registry::{TagRegistry, Tags};

#[cfg(test)]
mod tests;

/// Tracing target of engine lifecycle events.
pub const ENGINE_TARGET: &str = "taglog::engine";

/// Severity assigned to a configured tag whose level string does not parse.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InvalidLevelFallback {
    /// The default severity in effect when the entry is applied.
    #[default]
    Default,
    /// A fixed severity.
    Fixed(Severity),
}

/// Policies of an [`Engine`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EngineOptions {
    /// Default severity before any wildcard entry is configured, and after `reset`.
    pub baseline: Severity,
    /// Number of calls retained before the first `init`. Zero disables buffering.
    pub buffer_capacity: usize,
    /// Treat empty-string messages as no-ops.
    pub skip_empty_messages: bool,
    /// Severity given to tags configured with an unknown level.
    pub invalid_fallback: InvalidLevelFallback,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            baseline: Severity::Info,
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            skip_empty_messages: true,
            invalid_fallback: InvalidLevelFallback::Default,
        }
    }
}

impl EngineOptions {
    /// Sets the baseline severity.
    #[must_use]
    pub const fn with_baseline(mut self, baseline: Severity) -> Self {
        self.baseline = baseline;
        self
    }

    /// Sets the pre-init buffer capacity.
    #[must_use]
    pub const fn with_buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity;
        self
    }

    /// Chooses whether empty-string messages are dropped.
    #[must_use]
    pub const fn with_skip_empty_messages(mut self, skip: bool) -> Self {
        self.skip_empty_messages = skip;
        self
    }

    /// Sets the fallback for invalid level strings.
    #[must_use]
    pub const fn with_invalid_fallback(mut self, fallback: InvalidLevelFallback) -> Self {
        self.invalid_fallback = fallback;
        self
    }
}

/// Filtering engine mapping tags to minimum severities.
///
/// A message reaches the callback when a callback is installed and its
/// severity is at least the effective level of the resolved tag. The effective
/// level is the tag's configured severity, else the default severity, which
/// starts at the baseline.
///
/// Calls made before the first [`init`](Self::init) are buffered and replayed
/// through the new configuration once it arrives.
///
/// # Examples
///
/// ```
/// use std::sync::{Arc, Mutex};
/// use logging::{args, CallbackError, CallbackUpdate, Engine};
/// use levels::LevelConfig;
/// use serde_json::Value;
///
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let sink = Arc::clone(&seen);
///
/// let mut engine = Engine::new();
/// engine.init(
///     &LevelConfig::from([("network", "TRACE"), ("*", "INFO")]),
///     CallbackUpdate::replace(move |level: &str, tag: &str, message: &Value, _: &[Value]| {
///         sink.lock().unwrap().push(format!("{level} {tag} {message}"));
///         Ok::<(), CallbackError>(())
///     }),
/// )?;
///
/// engine.trace(args!["network", "connected"])?;
/// engine.debug(args!["no logging here"])?;
///
/// assert_eq!(*seen.lock().unwrap(), ["TRACE network \"connected\""]);
/// # Ok::<(), logging::LogError>(())
/// ```
pub struct Engine {
    levels: FxHashMap<String, Severity>,
    default_level: Severity,
    registry: TagRegistry,
    cache: DecisionCache,
    callback: Option<Arc<dyn Callback>>,
    buffer: PendingBuffer,
    initialized: bool,
    options: EngineOptions,
    diagnostics: Arc<dyn Diagnostics>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("levels", &self.levels)
            .field("default_level", &self.default_level)
            .field("registry", &self.registry)
            .field("has_callback", &self.callback.is_some())
            .field("buffered", &self.buffer.len())
            .field("initialized", &self.initialized)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Creates an unconfigured engine with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(EngineOptions::default())
    }

    /// Creates an unconfigured engine with the given policies.
    #[must_use]
    pub fn with_options(options: EngineOptions) -> Self {
        Self::with_diagnostics(options, Arc::new(TracingDiagnostics))
    }

    /// Creates an engine reporting configuration problems to `diagnostics`.
    #[must_use]
    pub fn with_diagnostics(options: EngineOptions, diagnostics: Arc<dyn Diagnostics>) -> Self {
        Self {
            levels: FxHashMap::default(),
            default_level: options.baseline,
            registry: TagRegistry::default(),
            cache: DecisionCache::default(),
            callback: None,
            buffer: PendingBuffer::with_capacity(options.buffer_capacity),
            initialized: false,
            options,
            diagnostics,
        }
    }

    /// Applies `config` and updates the callback.
    ///
    /// Entries merge into the current configuration. The wildcard entry is
    /// applied first. Unknown level strings are reported through the
    /// diagnostics channel and replaced by the configured fallback; they never
    /// abort the call.
    ///
    /// The first call after construction or [`reset`](Self::reset) replays
    /// buffered calls in arrival order.
    ///
    /// # Errors
    ///
    /// Returns the first callback failure raised while replaying buffered
    /// calls. The configuration is applied regardless and the remaining
    /// buffered calls are discarded.
    pub fn init(
        &mut self,
        config: &LevelConfig,
        callback: CallbackUpdate,
    ) -> Result<&mut Self, LogError> {
        let replay = self.apply(config, callback);
        deliver_all(replay)?;
        Ok(self)
    }

    /// Applies `config` and keeps the active callback.
    ///
    /// # Errors
    ///
    /// See [`init`](Self::init).
    pub fn configure(&mut self, config: &LevelConfig) -> Result<&mut Self, LogError> {
        self.init(config, CallbackUpdate::Keep)
    }

    /// Emits `args` at `level`.
    ///
    /// When the first argument names a registered tag it selects the tag,
    /// otherwise every argument belongs to the message and the default tag
    /// applies.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::Callback`] when the callback rejects the message.
    pub fn log(&mut self, level: Severity, args: Vec<Arg>) -> Result<(), LogError> {
        self.submit(level, Call::Positional(args))
            .map_or(Ok(()), Delivery::deliver)
    }

    /// Emits at [`Severity::Trace`].
    ///
    /// # Errors
    ///
    /// See [`log`](Self::log).
    pub fn trace(&mut self, args: Vec<Arg>) -> Result<(), LogError> {
        self.log(Severity::Trace, args)
    }

    /// Emits at [`Severity::Debug`].
    ///
    /// # Errors
    ///
    /// See [`log`](Self::log).
    pub fn debug(&mut self, args: Vec<Arg>) -> Result<(), LogError> {
        self.log(Severity::Debug, args)
    }

    /// Emits at [`Severity::Info`].
    ///
    /// # Errors
    ///
    /// See [`log`](Self::log).
    pub fn info(&mut self, args: Vec<Arg>) -> Result<(), LogError> {
        self.log(Severity::Info, args)
    }

    /// Emits at [`Severity::Warn`].
    ///
    /// # Errors
    ///
    /// See [`log`](Self::log).
    pub fn warn(&mut self, args: Vec<Arg>) -> Result<(), LogError> {
        self.log(Severity::Warn, args)
    }

    /// Emits at [`Severity::Error`].
    ///
    /// # Errors
    ///
    /// See [`log`](Self::log).
    pub fn error(&mut self, args: Vec<Arg>) -> Result<(), LogError> {
        self.log(Severity::Error, args)
    }

    /// Returns `true` when a message at `level` for `tag` would pass the filter.
    ///
    /// Unparseable level strings and `OFF` yield `false`. `None`, `""` and the
    /// wildcard select the default tag. The callback is not consulted.
    #[must_use]
    pub fn is_level_enabled(&self, level: &str, tag: Option<&str>) -> bool {
        level
            .parse::<Severity>()
            .is_ok_and(|severity| self.is_enabled(severity, tag))
    }

    /// Typed form of [`is_level_enabled`](Self::is_level_enabled).
    #[must_use]
    pub fn is_enabled(&self, severity: Severity, tag: Option<&str>) -> bool {
        self.decide(default_key(tag.unwrap_or_default()), severity)
    }

    /// Returns `true` when `TRACE` passes for `tag`.
    #[must_use]
    pub fn is_trace_enabled(&self, tag: Option<&str>) -> bool {
        self.is_enabled(Severity::Trace, tag)
    }

    /// Returns `true` when `DEBUG` passes for `tag`.
    #[must_use]
    pub fn is_debug_enabled(&self, tag: Option<&str>) -> bool {
        self.is_enabled(Severity::Debug, tag)
    }

    /// Returns `true` when `INFO` passes for `tag`.
    #[must_use]
    pub fn is_info_enabled(&self, tag: Option<&str>) -> bool {
        self.is_enabled(Severity::Info, tag)
    }

    /// Returns `true` when `WARN` passes for `tag`.
    #[must_use]
    pub fn is_warn_enabled(&self, tag: Option<&str>) -> bool {
        self.is_enabled(Severity::Warn, tag)
    }

    /// Returns `true` when `ERROR` passes for `tag`.
    #[must_use]
    pub fn is_error_enabled(&self, tag: Option<&str>) -> bool {
        self.is_enabled(Severity::Error, tag)
    }

    /// The severity used to filter messages for `tag`.
    #[must_use]
    pub fn effective_level(&self, tag: &str) -> Severity {
        self.levels
            .get(default_key(tag))
            .copied()
            .unwrap_or(self.default_level)
    }

    /// The severity applied to untagged and unconfigured messages.
    #[must_use]
    pub const fn default_level(&self) -> Severity {
        self.default_level
    }

    /// Returns `true` once `init` has run since construction or the last reset.
    #[must_use]
    pub const fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Number of calls waiting for the first `init`.
    #[must_use]
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    /// Returns `true` when a callback is installed.
    #[must_use]
    pub const fn has_callback(&self) -> bool {
        self.callback.is_some()
    }

    /// The policies this engine was built with.
    #[must_use]
    pub const fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Counters of the level-decision cache.
    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Read-only view of the registered tags.
    #[must_use]
    pub fn tags(&self) -> Tags<'_> {
        Tags::new(&self.registry, &self.levels, self.default_level)
    }

    /// Clears tag levels, the registry, the cache and the buffer, and restores
    /// the baseline default. The callback stays installed. The engine returns
    /// to the uninitialized state, so calls are buffered again.
    pub fn reset(&mut self) -> &mut Self {
        self.levels.clear();
        self.registry.clear();
        self.cache.clear();
        self.buffer.clear();
        self.default_level = self.options.baseline;
        self.initialized = false;
        tracing::debug!(
            target: ENGINE_TARGET,
            baseline = self.default_level.as_str(),
            "engine reset"
        );
        self
    }

    /// Updates configuration and callback, returning replayed deliveries.
    pub(crate) fn apply(&mut self, config: &LevelConfig, update: CallbackUpdate) -> Vec<Delivery> {
        let (wildcard, tagged): (Vec<_>, Vec<_>) =
            config.iter().partition(|(tag, _)| is_default_key(tag));

        for (tag, raw) in wildcard {
            match raw.parse::<Severity>() {
                Ok(severity) => self.default_level = severity,
                Err(_) => self.diagnostics.invalid_level(&InvalidLevel {
                    tag,
                    raw,
                    substituted: self.default_level,
                    from_default: true,
                }),
            }
        }

        for (tag, raw) in tagged {
            let severity = raw
                .parse::<Severity>()
                .unwrap_or_else(|_| self.fallback_for(tag, raw));
            self.levels.insert(tag.to_owned(), severity);
            self.registry.register(tag);
        }

        match update {
            CallbackUpdate::Keep => {}
            CallbackUpdate::Disable => self.callback = None,
            CallbackUpdate::Replace(callback) => self.callback = Some(callback),
        }

        self.cache.clear();
        let first = !self.initialized;
        self.initialized = true;

        tracing::debug!(
            target: ENGINE_TARGET,
            entries = config.len(),
            tags = self.registry.len(),
            default = self.default_level.as_str(),
            callback = self.callback.is_some(),
            "engine configured"
        );

        if first { self.replay() } else { Vec::new() }
    }

    /// Buffers or evaluates one call. Returns the delivery when the call passes.
    #[cfg(feature = "tracing-bridge")]
    pub(crate) fn diagnostics(&self) -> Arc<dyn Diagnostics> {
        Arc::clone(&self.diagnostics)
    }

    pub(crate) fn submit(&mut self, level: Severity, call: Call) -> Option<Delivery> {
        if level.is_off() {
            return None;
        }

        if !self.initialized && self.buffer.is_enabled() {
            if !self.buffer.push(Deferred { level, call }) {
                tracing::trace!(
                    target: ENGINE_TARGET,
                    dropped = self.buffer.dropped(),
                    "pre-init buffer full, call dropped"
                );
            }
            return None;
        }

        self.prepare(level, call)
    }

    fn prepare(&self, level: Severity, call: Call) -> Option<Delivery> {
        let callback = self.callback.as_ref()?;
        let positional = matches!(call, Call::Positional(_));

        let invocation = Invocation::resolve_call(call, |candidate| self.registry.contains(candidate))?;

        if positional {
            self.notice_unregistered(&invocation);
        }

        if self.options.skip_empty_messages && invocation.message().as_str() == Some("") {
            return None;
        }

        if !self.decide(invocation.tag(), level) {
            return None;
        }

        let (tag, message, params) = invocation.into_parts();
        Some(Delivery {
            callback: Arc::clone(callback),
            level,
            tag,
            message,
            params,
        })
    }

    fn replay(&mut self) -> Vec<Delivery> {
        let pending = self.buffer.drain();
        if pending.is_empty() {
            return Vec::new();
        }

        let total = pending.len();
        let deliveries: Vec<_> = pending
            .into_iter()
            .filter_map(|deferred| self.prepare(deferred.level, deferred.call))
            .collect();

        tracing::debug!(
            target: ENGINE_TARGET,
            buffered = total,
            delivered = deliveries.len(),
            "replayed pre-init calls"
        );
        deliveries
    }

    fn decide(&self, tag: &str, severity: Severity) -> bool {
        let key = if self.levels.contains_key(tag) { tag } else { "" };
        self.cache
            .decide(key, severity, || severity >= self.effective_level(key))
    }

    fn fallback_for(&self, tag: &str, raw: &str) -> Severity {
        let (substituted, from_default) = match self.options.invalid_fallback {
            InvalidLevelFallback::Default => (self.default_level, true),
            InvalidLevelFallback::Fixed(severity) => (severity, false),
        };
        self.diagnostics.invalid_level(&InvalidLevel {
            tag,
            raw,
            substituted,
            from_default,
        });
        substituted
    }

    fn notice_unregistered(&self, invocation: &Invocation) {
        let Invocation::Untagged { message, params } = invocation else {
            return;
        };
        if params.is_empty() {
            return;
        }
        if let Some(candidate) = message.as_str() {
            self.diagnostics.unregistered_tag(candidate);
        }
    }
}

fn is_default_key(tag: &str) -> bool {
    tag.is_empty() || tag == DEFAULT_TAG
}

fn default_key(tag: &str) -> &str {
    if is_default_key(tag) { "" } else { tag }
}
