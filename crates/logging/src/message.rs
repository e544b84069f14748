//! crates/logging/src/message.rs
//! Positional arguments accepted by the emission methods.

use serde_json::Value;

/// One positional argument of an emission call.
///
/// `Undefined` marks a slot that was passed without a value. An undefined
/// message makes the call a no-op and undefined extra parameters are dropped
/// before the callback sees them.
#[derive(Clone, Debug, PartialEq)]
pub enum Arg {
    /// A slot with no value.
    Undefined,
    /// A value passed through to the callback untouched.
    Value(Value),
}

impl Arg {
    /// Returns the string content when the argument is a JSON string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Value(Value::String(text)) => Some(text),
            _ => None,
        }
    }

    /// Returns `true` for [`Arg::Undefined`].
    #[must_use]
    pub const fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// Converts into the wrapped value, `None` when undefined.
    #[must_use]
    pub fn into_value(self) -> Option<Value> {
        match self {
            Self::Undefined => None,
            Self::Value(value) => Some(value),
        }
    }
}

impl From<Value> for Arg {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl<T> From<Option<T>> for Arg
where
    T: Into<Value>,
{
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Undefined, |inner| Self::Value(inner.into()))
    }
}

macro_rules! arg_from_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Arg {
                fn from(value: $ty) -> Self {
                    Self::Value(Value::from(value))
                }
            }
        )*
    };
}

arg_from_value!(&str, String, bool, i32, i64, u32, u64, usize, f64);

impl From<&String> for Arg {
    fn from(value: &String) -> Self {
        Self::Value(Value::String(value.clone()))
    }
}
