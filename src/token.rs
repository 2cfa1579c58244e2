//! Generation counters and safety tokens.
//!
//! Every owning object carries a [`GenerationCounter`], advanced whenever
//! its backing storage is reallocated, resized, or released. A
//! [`SafetyToken`] snapshots the counter at issuance; views re-check the
//! snapshot against the live counter on every access, turning use of
//! invalidated storage into a reportable [`StaleView`] failure instead of
//! undefined behavior.
//!
//! The counter is not a lock and not a reference count; it is a liveness
//! check only. Tokens are `Send + Sync` so a completion fence can carry
//! them across threads if one is layered on top of this crate.
//!
//! [`StaleView`]: crate::error::SpriteDataError::StaleView

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::error::{SpriteDataError, SpriteDataResult};

/// Monotonically increasing invalidation counter owned by a sprite or
/// renderer object.
#[derive(Debug, Clone, Default)]
pub struct GenerationCounter {
    counter: Arc<AtomicU64>,
}

impl GenerationCounter {
    /// Create a counter at generation zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current generation.
    pub fn current(&self) -> u64 {
        self.counter.load(Ordering::Relaxed)
    }

    /// Advance to the next generation, invalidating every outstanding
    /// token. Returns the new generation.
    pub fn advance(&self) -> u64 {
        self.counter.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Issue a token bound to the current generation.
    pub fn token(&self) -> SafetyToken {
        SafetyToken {
            issued: self.current(),
            counter: Arc::clone(&self.counter),
        }
    }
}

/// A capability snapshot tying a view to the owner generation that issued it.
///
/// Tokens are issued fresh on every accessor call and never cached: the
/// owner's layout or backing address may change between calls. A token is
/// not an ownership relation: dropping it releases nothing.
#[derive(Debug, Clone)]
pub struct SafetyToken {
    issued: u64,
    counter: Arc<AtomicU64>,
}

impl SafetyToken {
    /// The generation recorded when this token was issued.
    pub fn generation(&self) -> u64 {
        self.issued
    }

    /// The owner's generation right now.
    pub fn current(&self) -> u64 {
        self.counter.load(Ordering::Relaxed)
    }

    /// Whether the owner's storage is still the storage this token was
    /// issued against.
    pub fn is_valid(&self) -> bool {
        self.issued == self.current()
    }

    /// Fail with `StaleView` if the owner has advanced past this token.
    pub(crate) fn check(&self) -> SpriteDataResult<()> {
        let current = self.current();
        if self.issued == current {
            Ok(())
        } else {
            Err(SpriteDataError::StaleView {
                token_generation: self.issued,
                current_generation: current,
            })
        }
    }
}

// Tokens must be able to cross threads for a future completion fence.
static_assertions::assert_impl_all!(SafetyToken: Send, Sync);
