//! crates/logging/src/buffer.rs
//! Bounded FIFO holding emission calls made before the first `init`.

use std::collections::VecDeque;

use levels::Severity;

use crate::invocation::Call;

/// Default number of calls retained before the first `init`.
pub const DEFAULT_BUFFER_CAPACITY: usize = 50;

/// An emission call held back until the engine is configured.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Deferred {
    pub(crate) level: Severity,
    pub(crate) call: Call,
}

/// Bounded queue that drops new calls once full.
#[derive(Clone, Debug)]
pub(crate) struct PendingBuffer {
    entries: VecDeque<Deferred>,
    capacity: usize,
    dropped: u64,
}

impl PendingBuffer {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(DEFAULT_BUFFER_CAPACITY)),
            capacity,
            dropped: 0,
        }
    }

    pub(crate) const fn is_enabled(&self) -> bool {
        self.capacity > 0
    }

    /// Queues `entry`, returning `false` when the buffer is full and the entry was dropped.
    pub(crate) fn push(&mut self, entry: Deferred) -> bool {
        if self.entries.len() >= self.capacity {
            self.dropped += 1;
            return false;
        }
        self.entries.push_back(entry);
        true
    }

    /// Removes every queued call in arrival order.
    pub(crate) fn drain(&mut self) -> Vec<Deferred> {
        self.dropped = 0;
        self.entries.drain(..).collect()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
        self.dropped = 0;
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) const fn dropped(&self) -> u64 {
        self.dropped
    }
}
