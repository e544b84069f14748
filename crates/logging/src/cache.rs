//! crates/logging/src/cache.rs
//! Memoised emit decisions keyed by resolved tag and severity.

use std::cell::{Cell, RefCell};

use rustc_hash::FxHashMap;

use levels::Severity;

type DecisionRow = [Option<bool>; Severity::EMITTABLE.len()];

/// Hit and miss counters of the decision cache.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that had to compute the decision.
    pub misses: u64,
    /// Distinct tags currently holding at least one decision.
    pub entries: usize,
}

/// Per-tag table of decisions.
///
/// Callers must clear the cache whenever the configuration it was computed
/// from changes.
#[derive(Debug, Default)]
pub(crate) struct DecisionCache {
    rows: RefCell<FxHashMap<String, DecisionRow>>,
    hits: Cell<u64>,
    misses: Cell<u64>,
}

impl DecisionCache {
    /// Returns the cached decision or computes and stores it.
    ///
    /// `Off` is never cached and always resolves to `false`.
    pub(crate) fn decide<F>(&self, tag: &str, severity: Severity, compute: F) -> bool
    where
        F: FnOnce() -> bool,
    {
        let Some(slot) = severity.slot() else {
            return false;
        };

        if let Some(decision) = self.rows.borrow().get(tag).and_then(|row| row[slot]) {
            self.hits.set(self.hits.get() + 1);
            return decision;
        }

        self.misses.set(self.misses.get() + 1);
        let decision = compute();
        self.rows
            .borrow_mut()
            .entry(tag.to_owned())
            .or_default()[slot] = Some(decision);
        decision
    }

    pub(crate) fn clear(&self) {
        self.rows.borrow_mut().clear();
    }

    pub(crate) fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.get(),
            misses: self.misses.get(),
            entries: self.rows.borrow().len(),
        }
    }
}
