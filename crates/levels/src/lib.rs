#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `levels` defines the data model shared by the taglog workspace: the ordered
//! [`Severity`] scale and the [`LevelConfig`] mapping from tags to severity
//! strings that the filter engine consumes.
//!
//! # Invariants
//!
//! - `Trace < Debug < Info < Warn < Error < Off`. `Off` is only ever a
//!   threshold, never the severity of a message.
//! - [`LevelConfig`] keeps level strings unparsed so invalid values can be
//!   reported by the engine instead of rejected up front.
//!
//! # Examples
//!
//! ```
//! use levels::{DEFAULT_TAG, LevelConfig, Severity};
//!
//! let config: LevelConfig = "network=TRACE,*=INFO".parse().unwrap();
//! assert_eq!(config.get("network"), Some("TRACE"));
//! assert_eq!(config.default_level(), Some("INFO"));
//! assert_eq!(config.get(DEFAULT_TAG), Some("INFO"));
//!
//! assert!(Severity::Warn > Severity::Info);
//! assert_eq!("ERROR".parse::<Severity>(), Ok(Severity::Error));
//! assert!("error".parse::<Severity>().is_err());
//! ```

mod config;
mod severity;

pub use config::{ConfigError, DEFAULT_TAG, ENV_VAR, LevelConfig};
pub use severity::{ParseSeverityError, Severity};
