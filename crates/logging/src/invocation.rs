//! crates/logging/src/invocation.rs
//! Resolution of positional arguments into a tag, a message and extra parameters.

use serde_json::Value;

use crate::message::Arg;
use crate::registry::Tags;

/// Raw form of an emission call before it is resolved against the registry.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Call {
    /// Arguments as passed to `log` and the level wrappers.
    Positional(Vec<Arg>),
    /// A call whose tag candidate is known up front, as produced by the tracing bridge.
    #[cfg_attr(not(feature = "tracing-bridge"), allow(dead_code))]
    Targeted {
        target: String,
        message: Value,
        params: Vec<Value>,
    },
}

/// An emission call after dispatch on its first argument.
///
/// When the first argument is a string naming a registered tag the call is
/// [`Tagged`](Self::Tagged) and the remaining arguments shift left by one.
/// Otherwise every argument belongs to the message and the call is attributed
/// to the default tag.
#[derive(Clone, Debug, PartialEq)]
pub enum Invocation {
    /// The first argument named a registered tag.
    Tagged {
        /// The registered tag.
        tag: String,
        /// The message, passed through untouched.
        message: Value,
        /// Extra parameters with undefined slots removed.
        params: Vec<Value>,
    },
    /// The call is attributed to the default tag.
    Untagged {
        /// The message, passed through untouched.
        message: Value,
        /// Extra parameters with undefined slots removed.
        params: Vec<Value>,
    },
}

impl Invocation {
    /// Resolves `args` against the registered `tags`.
    ///
    /// Returns `None` when no message remains or the message slot is undefined.
    ///
    /// ```
    /// use logging::{args, CallbackUpdate, Engine, Invocation};
    /// use levels::LevelConfig;
    /// use serde_json::json;
    ///
    /// let mut engine = Engine::new();
    /// engine.init(&LevelConfig::from([("loader", "INFO")]), CallbackUpdate::Keep).unwrap();
    ///
    /// let tagged = Invocation::resolve(args!["loader", "ready"], &engine.tags()).unwrap();
    /// assert_eq!(tagged.tag(), "loader");
    ///
    /// let untagged = Invocation::resolve(args!["unknownTag", "text"], &engine.tags()).unwrap();
    /// assert_eq!(untagged.tag(), "");
    /// assert_eq!(untagged.params(), [json!("text")]);
    ///
    /// assert!(Invocation::resolve(args!["loader"], &engine.tags()).is_none());
    /// ```
    #[must_use]
    pub fn resolve(args: Vec<Arg>, tags: &Tags<'_>) -> Option<Self> {
        Self::resolve_with(args, |candidate| tags.contains(candidate))
    }

    pub(crate) fn resolve_with<F>(args: Vec<Arg>, is_tag: F) -> Option<Self>
    where
        F: Fn(&str) -> bool,
    {
        let mut args = args.into_iter();
        let first = args.next()?;

        let tag = first
            .as_str()
            .filter(|candidate| is_tag(candidate))
            .map(str::to_owned);

        match tag {
            Some(tag) => {
                let message = args.next()?.into_value()?;
                Some(Self::Tagged {
                    tag,
                    message,
                    params: defined(args),
                })
            }
            None => Some(Self::Untagged {
                message: first.into_value()?,
                params: defined(args),
            }),
        }
    }

    pub(crate) fn resolve_call<F>(call: Call, is_tag: F) -> Option<Self>
    where
        F: Fn(&str) -> bool,
    {
        match call {
            Call::Positional(args) => Self::resolve_with(args, is_tag),
            Call::Targeted {
                target,
                message,
                params,
            } if is_tag(&target) => Some(Self::Tagged {
                tag: target,
                message,
                params,
            }),
            Call::Targeted {
                message, params, ..
            } => Some(Self::Untagged { message, params }),
        }
    }

    /// The resolved tag, empty for the default tag.
    #[must_use]
    pub fn tag(&self) -> &str {
        match self {
            Self::Tagged { tag, .. } => tag,
            Self::Untagged { .. } => "",
        }
    }

    /// The message value.
    #[must_use]
    pub const fn message(&self) -> &Value {
        match self {
            Self::Tagged { message, .. } | Self::Untagged { message, .. } => message,
        }
    }

    /// Extra parameters in call order.
    #[must_use]
    pub fn params(&self) -> &[Value] {
        match self {
            Self::Tagged { params, .. } | Self::Untagged { params, .. } => params,
        }
    }

    pub(crate) fn into_parts(self) -> (String, Value, Vec<Value>) {
        match self {
            Self::Tagged {
                tag,
                message,
                params,
            } => (tag, message, params),
            Self::Untagged { message, params } => (String::new(), message, params),
        }
    }
}

fn defined(args: impl Iterator<Item = Arg>) -> Vec<Value> {
    args.filter_map(Arg::into_value).collect()
}
