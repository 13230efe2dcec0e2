//! Fetch-cycle generations
//!
//! Every refresh of a screen starts a new generation. A response that
//! arrives for an older generation belongs to a superseded cycle and must
//! not overwrite fresher data.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Monotonic fetch-cycle counter owned by one screen
#[derive(Debug, Clone, Default)]
pub struct Generation {
    current: Arc<AtomicU64>,
}

impl Generation {
    /// Create a counter at generation zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new cycle, superseding every outstanding token
    pub fn advance(&self) -> CycleToken {
        let value = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        CycleToken {
            value,
            current: Arc::clone(&self.current),
        }
    }

    /// The latest generation number
    pub fn current(&self) -> u64 {
        self.current.load(Ordering::SeqCst)
    }
}

/// Handle identifying one fetch cycle
#[derive(Debug, Clone)]
pub struct CycleToken {
    value: u64,
    current: Arc<AtomicU64>,
}

impl CycleToken {
    /// Generation number of this cycle
    pub fn value(&self) -> u64 {
        self.value
    }

    /// Whether no newer cycle has started since this one
    pub fn is_current(&self) -> bool {
        self.current.load(Ordering::SeqCst) == self.value
    }

    /// Whether a newer cycle has superseded this one
    pub fn is_stale(&self) -> bool {
        !self.is_current()
    }
}

#[cfg(test)]
mod generation_tests {
    use super::*;

    #[test]
    fn test_advance_supersedes_previous_token() {
        let generation = Generation::new();
        let first = generation.advance();
        assert!(first.is_current());
        assert_eq!(first.value(), 1);

        let second = generation.advance();
        assert!(first.is_stale());
        assert!(second.is_current());
        assert_eq!(generation.current(), 2);
    }

    #[test]
    fn test_clones_share_the_counter() {
        let generation = Generation::new();
        let token = generation.advance();
        let shared = generation.clone();
        shared.advance();
        assert!(token.is_stale());
    }
}
