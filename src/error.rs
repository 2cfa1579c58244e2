//! Error types for sprite data access.
//!
//! Every failure in this crate is local and synchronous: a validation that
//! fails aborts the requested operation before any backing memory is read
//! or written. Nothing is retried internally.

use thiserror::Error;

use crate::channel::VertexChannel;

/// Errors that can occur while accessing sprite mesh data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpriteDataError {
    /// The channel has no sprite representation (e.g. skinning attributes,
    /// which are reached through the bone-weight accessor instead).
    #[error("the requested channel '{channel:?}' is not a sprite channel")]
    UnsupportedChannel {
        /// The channel that was requested.
        channel: VertexChannel,
    },

    /// The requested element type does not match the channel's element type.
    #[error("channel '{channel:?}' holds {expected} elements, requested {requested}")]
    TypeMismatch {
        /// The channel that was requested.
        channel: VertexChannel,
        /// Name of the element type the channel holds.
        expected: &'static str,
        /// Name of the element type the caller asked for.
        requested: &'static str,
    },

    /// The descriptor's stride is smaller than the element size, which would
    /// make consecutive elements overlap.
    #[error("stride {stride} is smaller than the element size {element_size}")]
    InvalidStride {
        /// Byte distance between consecutive elements.
        stride: usize,
        /// Size in bytes of the requested element type.
        element_size: usize,
    },

    /// A write was attempted with a source length that differs from the
    /// channel's current element count.
    #[error("source holds {actual} elements, channel holds {expected}")]
    CountMismatch {
        /// The channel's current element count.
        expected: usize,
        /// The source's element count.
        actual: usize,
    },

    /// The view's safety token no longer matches the owner's generation:
    /// the backing storage was resized, reallocated, or released after the
    /// view was constructed.
    #[error("stale view: token generation {token_generation}, owner generation {current_generation}")]
    StaleView {
        /// Generation recorded when the token was issued.
        token_generation: u64,
        /// The owner's generation at the time of access.
        current_generation: u64,
    },

    /// A bone sequence does not form a valid forest.
    #[error("invalid bone hierarchy at index {index}: {reason}")]
    InvalidHierarchy {
        /// Index of the offending bone.
        index: usize,
        /// What the bone violated.
        reason: HierarchyViolation,
    },

    /// The owning object's layout does not carry the requested channel.
    #[error("sprite has no '{channel:?}' channel")]
    NoSuchChannel {
        /// The channel that was requested.
        channel: VertexChannel,
    },

    /// The deformable buffer is not currently active.
    #[error("deformable buffer is inactive")]
    BufferInactive,

    /// A view access outside the element count.
    #[error("index {index} out of bounds for view of length {len}")]
    IndexOutOfBounds {
        /// The index that was accessed.
        index: usize,
        /// The view's element count.
        len: usize,
    },
}

/// Reason a bone sequence was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HierarchyViolation {
    /// Parent index is neither the root marker nor an index into the sequence.
    ParentOutOfRange,
    /// Parent index does not precede the bone it parents, so the sequence
    /// could contain a cycle.
    ParentNotEarlier,
    /// Bone length is negative.
    NegativeLength,
}

impl std::fmt::Display for HierarchyViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ParentOutOfRange => write!(f, "parent index out of range"),
            Self::ParentNotEarlier => write!(f, "parent index must precede the bone"),
            Self::NegativeLength => write!(f, "bone length is negative"),
        }
    }
}

/// Result alias used throughout the crate.
pub type SpriteDataResult<T> = Result<T, SpriteDataError>;
