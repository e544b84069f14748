//! crates/levels/src/config.rs
//! Tag to level configuration supplied to the filter engine.

use std::env;
use std::str::FromStr;

use thiserror::Error;

use crate::severity::Severity;

/// Reserved key that configures the default severity.
pub const DEFAULT_TAG: &str = "*";

/// Environment variable conventionally holding a directive string.
pub const ENV_VAR: &str = "TAGLOG";

/// Error produced when a directive string cannot be split into tag/level pairs.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A `tag=LEVEL` directive had nothing before the `=`.
    #[error("directive \"{directive}\" has an empty tag")]
    EmptyTag {
        /// The offending directive.
        directive: String,
    },
    /// A `tag=LEVEL` directive had nothing after the `=`.
    #[error("directive \"{directive}\" has an empty level")]
    EmptyLevel {
        /// The offending directive.
        directive: String,
    },
    /// A directive contained more than one `=`.
    #[error("directive \"{directive}\" contains more than one '='")]
    TooManySeparators {
        /// The offending directive.
        directive: String,
    },
    /// The environment variable exists but is not valid unicode.
    #[error("environment variable {var} is not valid unicode")]
    NotUnicode {
        /// Name of the variable.
        var: String,
    },
}

/// Insertion-ordered mapping from tag to a raw severity string.
///
/// Level strings are stored as given. Validation happens when the engine
/// applies the configuration, where an unknown level degrades to a warning and
/// a fallback severity instead of an error.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LevelConfig {
    entries: Vec<(String, String)>,
}

impl LevelConfig {
    /// Creates an empty configuration.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Builder form of [`set`](Self::set).
    #[must_use]
    pub fn with(mut self, tag: impl Into<String>, level: impl Into<String>) -> Self {
        self.set(tag, level);
        self
    }

    /// Assigns `level` to `tag`. A tag that is already present keeps its position.
    pub fn set(&mut self, tag: impl Into<String>, level: impl Into<String>) {
        let tag = tag.into();
        let level = level.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == tag) {
            Some(entry) => entry.1 = level,
            None => self.entries.push((tag, level)),
        }
    }

    /// Assigns a typed severity to `tag`.
    pub fn set_severity(&mut self, tag: impl Into<String>, severity: Severity) {
        self.set(tag, severity.as_str());
    }

    /// Raw level string configured for `tag`.
    #[must_use]
    pub fn get(&self, tag: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == tag)
            .map(|(_, level)| level.as_str())
    }

    /// Raw level string configured for [`DEFAULT_TAG`].
    #[must_use]
    pub fn default_level(&self) -> Option<&str> {
        self.get(DEFAULT_TAG)
    }

    /// Iterates over `(tag, level)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(tag, level)| (tag.as_str(), level.as_str()))
    }

    /// Number of configured keys, the wildcard included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no key is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parses a comma separated directive list such as `network=TRACE,*=INFO`.
    ///
    /// A bare `LEVEL` item configures the wildcard. Empty items are skipped.
    pub fn parse_directives(input: &str) -> Result<Self, ConfigError> {
        let mut config = Self::new();
        for directive in input.split(',').map(str::trim) {
            if directive.is_empty() {
                continue;
            }
            let (tag, level) = split_directive(directive)?;
            config.set(tag, level);
        }
        Ok(config)
    }

    /// Reads directives from the environment variable `var`.
    ///
    /// A missing variable yields an empty configuration.
    pub fn from_env(var: &str) -> Result<Self, ConfigError> {
        match env::var(var) {
            Ok(value) => Self::parse_directives(&value),
            Err(env::VarError::NotPresent) => Ok(Self::new()),
            Err(env::VarError::NotUnicode(_)) => Err(ConfigError::NotUnicode {
                var: var.to_owned(),
            }),
        }
    }
}

/// Split a directive like "network=TRACE" into ("network", "TRACE") or "INFO" into ("*", "INFO").
fn split_directive(directive: &str) -> Result<(&str, &str), ConfigError> {
    let mut parts = directive.split('=');
    let first = parts.next().unwrap_or_default().trim();
    let Some(second) = parts.next() else {
        return Ok((DEFAULT_TAG, first));
    };
    if parts.next().is_some() {
        return Err(ConfigError::TooManySeparators {
            directive: directive.to_owned(),
        });
    }
    let second = second.trim();
    if first.is_empty() {
        return Err(ConfigError::EmptyTag {
            directive: directive.to_owned(),
        });
    }
    if second.is_empty() {
        return Err(ConfigError::EmptyLevel {
            directive: directive.to_owned(),
        });
    }
    Ok((first, second))
}

impl FromStr for LevelConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_directives(s)
    }
}

impl<K, V> FromIterator<(K, V)> for LevelConfig
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut config = Self::new();
        config.extend(iter);
        config
    }
}

impl<K, V> Extend<(K, V)> for LevelConfig
where
    K: Into<String>,
    V: Into<String>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (tag, level) in iter {
            self.set(tag, level);
        }
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for LevelConfig
where
    K: Into<String>,
    V: Into<String>,
{
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for LevelConfig {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (tag, level) in &self.entries {
            map.serialize_entry(tag, level)?;
        }
        map.end()
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for LevelConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct ConfigVisitor;

        impl<'de> serde::de::Visitor<'de> for ConfigVisitor {
            type Value = LevelConfig;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("a map of tag names to level strings")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: serde::de::MapAccess<'de>,
            {
                let mut config = LevelConfig::new();
                while let Some((tag, level)) = access.next_entry::<String, String>()? {
                    config.set(tag, level);
                }
                Ok(config)
            }
        }

        deserializer.deserialize_map(ConfigVisitor)
    }
}
