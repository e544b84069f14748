//! crates/logging/src/macros.rs
//! Argument list builder and level macros over the thread-local engine.
//!
//! The level macros forward to the functions in [`global`](crate::global)
//! and evaluate to their `Result`.

/// Builds a `Vec<Arg>` from heterogeneous values.
///
/// # Example
/// ```
/// use logging::{args, Arg};
///
/// let list = args!["network", "connected", 3, None::<&str>];
/// assert_eq!(list.len(), 4);
/// assert!(list[3].is_undefined());
/// ```
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::Arg>::new()
    };
    ($($arg:expr),+ $(,)?) => {
        ::std::vec![$($crate::Arg::from($arg)),+]
    };
}

/// Emit at `TRACE` through the thread-local engine.
///
/// # Example
/// ```ignore
/// log_trace!("network", "connected to {}", host)?;
/// ```
#[macro_export]
macro_rules! log_trace {
    ($($arg:expr),* $(,)?) => {
        $crate::global::trace($crate::args![$($arg),*])
    };
}

/// Emit at `DEBUG` through the thread-local engine.
///
/// # Example
/// ```ignore
/// log_debug!("cache", "miss", key)?;
/// ```
#[macro_export]
macro_rules! log_debug {
    ($($arg:expr),* $(,)?) => {
        $crate::global::debug($crate::args![$($arg),*])
    };
}

/// Emit at `INFO` through the thread-local engine.
///
/// # Example
/// ```ignore
/// log_info!("loader", "ready")?;
/// ```
#[macro_export]
macro_rules! log_info {
    ($($arg:expr),* $(,)?) => {
        $crate::global::info($crate::args![$($arg),*])
    };
}

/// Emit at `WARN` through the thread-local engine.
///
/// # Example
/// ```ignore
/// log_warn!("disk almost full")?;
/// ```
#[macro_export]
macro_rules! log_warn {
    ($($arg:expr),* $(,)?) => {
        $crate::global::warn($crate::args![$($arg),*])
    };
}

/// Emit at `ERROR` through the thread-local engine.
///
/// # Example
/// ```ignore
/// log_error!("security", "breach", details)?;
/// ```
#[macro_export]
macro_rules! log_error {
    ($($arg:expr),* $(,)?) => {
        $crate::global::error($crate::args![$($arg),*])
    };
}
