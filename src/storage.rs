//! Backing byte storage and channel descriptors.
//!
//! A [`BufferBlock`] is one heap allocation backing one or more buffers of
//! an owning object. Blocks are shared via `Arc` between the owner and any
//! outstanding views: the owner overwrites bytes in place for same-size
//! writes, and swaps in a fresh block for any size change. A view holding
//! the old `Arc` therefore keeps the old allocation alive while its safety
//! token reports it stale; a bypassed generation check can surface stale
//! data, never a dangling read.
//!
//! # Access contract
//!
//! Owners and views of one object are driven from a single control flow at
//! a time, and every operation completes before returning. Byte access is
//! confined to [`BufferBlock::with_bytes`] / [`BufferBlock::with_bytes_mut`],
//! whose slices never escape the call that created them.

use std::cell::UnsafeCell;
use std::fmt;
use std::sync::Arc;

/// A shared heap allocation holding raw element bytes.
pub struct BufferBlock {
    data: UnsafeCell<Box<[u8]>>,
}

impl BufferBlock {
    /// Allocate a zero-filled block of `len` bytes.
    pub(crate) fn zeroed(len: usize) -> Arc<Self> {
        Arc::new(Self {
            data: UnsafeCell::new(vec![0u8; len].into_boxed_slice()),
        })
    }

    /// Allocate a block holding a copy of `bytes`.
    pub(crate) fn from_bytes(bytes: Vec<u8>) -> Arc<Self> {
        Arc::new(Self {
            data: UnsafeCell::new(bytes.into_boxed_slice()),
        })
    }

    /// Total size of the block in bytes.
    pub fn len(&self) -> usize {
        self.with_bytes(|bytes| bytes.len())
    }

    /// Whether the block holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run `f` over the block's bytes.
    pub(crate) fn with_bytes<R>(&self, f: impl FnOnce(&[u8]) -> R) -> R {
        // Sound under the access contract: single control flow, synchronous
        // operations, slice confined to this call.
        let bytes = unsafe { &*self.data.get() };
        f(bytes)
    }

    /// Run `f` over the block's bytes mutably.
    pub(crate) fn with_bytes_mut<R>(&self, f: impl FnOnce(&mut [u8]) -> R) -> R {
        let bytes = unsafe { &mut *self.data.get() };
        f(bytes)
    }
}

impl fmt::Debug for BufferBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufferBlock").field("len", &self.len()).finish()
    }
}

/// Location of one typed region inside a [`BufferBlock`].
///
/// The owning object computes `count`, `offset`, and `stride`; the
/// descriptor itself validates nothing and holds no layout logic. It is
/// created fresh on every accessor call, since layouts and backing blocks
/// may change between calls, and is never cached.
#[derive(Clone)]
pub struct ChannelDescriptor {
    pub(crate) block: Arc<BufferBlock>,
    pub(crate) count: usize,
    pub(crate) offset: usize,
    pub(crate) stride: usize,
}

impl ChannelDescriptor {
    /// Create a descriptor over `block`.
    pub(crate) fn new(block: Arc<BufferBlock>, count: usize, offset: usize, stride: usize) -> Self {
        Self {
            block,
            count,
            offset,
            stride,
        }
    }

    /// Number of elements in the region.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Byte offset from the block start to the first element.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Byte distance between consecutive elements. May exceed the element
    /// size for interleaved layouts.
    pub fn stride(&self) -> usize {
        self.stride
    }
}

impl fmt::Debug for ChannelDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelDescriptor")
            .field("count", &self.count)
            .field("offset", &self.offset)
            .field("stride", &self.stride)
            .field("block_len", &self.block.len())
            .finish()
    }
}
