//! crates/logging/src/registry.rs
//! Registered tag names and their read-only reflection view.

use rustc_hash::{FxHashMap, FxHashSet};

use levels::Severity;

/// Insertion-ordered set of registered tag names.
///
/// Only the engine mutates the registry. Callers observe it through [`Tags`].
#[derive(Clone, Debug, Default)]
pub(crate) struct TagRegistry {
    order: Vec<String>,
    members: FxHashSet<String>,
}

impl TagRegistry {
    /// Registers `tag`, returning `false` when it was already present.
    pub(crate) fn register(&mut self, tag: &str) -> bool {
        if self.members.contains(tag) {
            return false;
        }
        self.members.insert(tag.to_owned());
        self.order.push(tag.to_owned());
        true
    }

    pub(crate) fn contains(&self, tag: &str) -> bool {
        self.members.contains(tag)
    }

    pub(crate) fn get(&self, tag: &str) -> Option<&str> {
        self.members.get(tag).map(String::as_str)
    }

    pub(crate) fn iter(&self) -> std::slice::Iter<'_, String> {
        self.order.iter()
    }

    pub(crate) fn len(&self) -> usize {
        self.order.len()
    }

    pub(crate) fn clear(&mut self) {
        self.order.clear();
        self.members.clear();
    }
}

/// Metadata reported for a registered tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TagDescriptor<'a> {
    /// The canonical tag name.
    pub name: &'a str,
    /// The tag's configured severity.
    pub level: Severity,
    /// Always `true`: every registered tag is listed by enumeration.
    pub enumerable: bool,
}

/// Read-only view over the registered tags of an [`Engine`](crate::Engine).
///
/// Lookup never fails loudly: unknown names simply yield `None`.
///
/// ```
/// use logging::{CallbackUpdate, Engine};
/// use levels::LevelConfig;
///
/// let mut engine = Engine::new();
/// engine
///     .init(&LevelConfig::from([("network", "TRACE"), ("system", "OFF")]), CallbackUpdate::Keep)
///     .unwrap();
///
/// let tags = engine.tags();
/// assert_eq!(tags.get("network"), Some("network"));
/// assert_eq!(tags.get("unknown"), None);
/// assert_eq!(tags.iter().collect::<Vec<_>>(), ["network", "system"]);
/// assert!(tags.describe("system").unwrap().enumerable);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Tags<'a> {
    registry: &'a TagRegistry,
    levels: &'a FxHashMap<String, Severity>,
    fallback: Severity,
}

impl<'a> Tags<'a> {
    pub(crate) const fn new(
        registry: &'a TagRegistry,
        levels: &'a FxHashMap<String, Severity>,
        fallback: Severity,
    ) -> Self {
        Self {
            registry,
            levels,
            fallback,
        }
    }

    /// Returns the canonical tag string when `name` is registered.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&'a str> {
        self.registry.get(name)
    }

    /// Returns `true` when `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.registry.contains(name)
    }

    /// Describes a registered tag regardless of its severity, `Off` included.
    #[must_use]
    pub fn describe(&self, name: &str) -> Option<TagDescriptor<'a>> {
        let name = self.registry.get(name)?;
        Some(TagDescriptor {
            name,
            level: self.levels.get(name).copied().unwrap_or(self.fallback),
            enumerable: true,
        })
    }

    /// Iterates over registered tag names in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &'a str> + use<'a> {
        self.registry.iter().map(String::as_str)
    }

    /// Number of registered tags.
    #[must_use]
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    /// Returns `true` when no tag is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registry.len() == 0
    }

    /// Copies the registered names into a vector.
    #[must_use]
    pub fn to_vec(&self) -> Vec<String> {
        self.iter().map(str::to_owned).collect()
    }
}

impl<'a> IntoIterator for Tags<'a> {
    type Item = &'a str;
    type IntoIter = std::iter::Map<std::slice::Iter<'a, String>, fn(&'a String) -> &'a str>;

    fn into_iter(self) -> Self::IntoIter {
        self.registry.iter().map(String::as_str as fn(&'a String) -> &'a str)
    }
}
