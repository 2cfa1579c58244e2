//! Typed, generation-checked views over channel storage.
//!
//! A [`ChannelView`] is a zero-copy strided view: element `i` lives at byte
//! `offset + i * stride` of the backing block. Every access bounds-checks
//! the index and re-checks the safety token, so a view outlived by a
//! resize or reallocation of its owner fails with `StaleView` rather than
//! reading relocated memory.

use std::fmt;
use std::marker::PhantomData;
use std::mem;
use std::sync::Arc;

use crate::channel::ChannelElement;
use crate::error::{SpriteDataError, SpriteDataResult};
use crate::storage::{BufferBlock, ChannelDescriptor};
use crate::token::SafetyToken;

/// A read-only strided view over `count` elements of type `T`.
///
/// Views are constructed fresh on every accessor call and become stale as
/// soon as the owning object's generation advances. They observe in-place
/// same-size overwrites of the backing storage (zero-copy semantics).
///
/// # Example
///
/// ```ignore
/// let positions = sprite.channel::<Vec3>(VertexChannel::Position)?;
/// for p in positions.iter() {
///     println!("{:?}", p?);
/// }
/// ```
pub struct ChannelView<T: ChannelElement> {
    block: Arc<BufferBlock>,
    token: SafetyToken,
    count: usize,
    offset: usize,
    stride: usize,
    _element: PhantomData<fn() -> T>,
}

impl<T: ChannelElement> ChannelView<T> {
    /// Construct a view from a descriptor and a safety token.
    ///
    /// Fails with `InvalidStride` if the stride would make consecutive
    /// elements overlap. A descriptor with `count == 0` yields a valid,
    /// empty view.
    pub(crate) fn new(descriptor: ChannelDescriptor, token: SafetyToken) -> SpriteDataResult<Self> {
        let element_size = mem::size_of::<T>();
        if descriptor.stride < element_size {
            return Err(SpriteDataError::InvalidStride {
                stride: descriptor.stride,
                element_size,
            });
        }
        Ok(Self {
            block: descriptor.block,
            token,
            count: descriptor.count,
            offset: descriptor.offset,
            stride: descriptor.stride,
            _element: PhantomData,
        })
    }

    /// Number of elements in the view.
    pub fn len(&self) -> usize {
        self.count
    }

    /// Whether the view holds no elements.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Byte distance between consecutive elements.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// The generation this view was constructed against.
    pub fn generation(&self) -> u64 {
        self.token.generation()
    }

    /// Whether the owner's storage is still the storage this view reads.
    pub fn is_valid(&self) -> bool {
        self.token.is_valid()
    }

    /// Read the element at `index`.
    ///
    /// Checks the safety token and the bounds before touching memory.
    pub fn get(&self, index: usize) -> SpriteDataResult<T> {
        self.token.check()?;
        if index >= self.count {
            return Err(SpriteDataError::IndexOutOfBounds {
                index,
                len: self.count,
            });
        }
        let start = self.offset + index * self.stride;
        Ok(self.block.with_bytes(|bytes| {
            bytemuck::pod_read_unaligned(&bytes[start..start + mem::size_of::<T>()])
        }))
    }

    /// Iterate over the elements, re-checking the safety token each step.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            view: self,
            next: 0,
        }
    }

    /// Copy every element out of the view.
    ///
    /// One token check covers the whole copy; operations are synchronous,
    /// so the owner cannot invalidate the storage mid-call.
    pub fn to_vec(&self) -> SpriteDataResult<Vec<T>> {
        self.token.check()?;
        let element_size = mem::size_of::<T>();
        Ok(self.block.with_bytes(|bytes| {
            (0..self.count)
                .map(|i| {
                    let start = self.offset + i * self.stride;
                    bytemuck::pod_read_unaligned(&bytes[start..start + element_size])
                })
                .collect()
        }))
    }
}

impl<T: ChannelElement> fmt::Debug for ChannelView<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelView")
            .field("count", &self.count)
            .field("offset", &self.offset)
            .field("stride", &self.stride)
            .field("generation", &self.token.generation())
            .field("valid", &self.token.is_valid())
            .finish()
    }
}

/// Iterator over a [`ChannelView`], yielding `SpriteDataResult<T>`.
///
/// Every step re-checks the view's safety token, so iteration started
/// before an invalidating mutation reports `StaleView` on the next element
/// instead of reading stale storage.
pub struct Iter<'a, T: ChannelElement> {
    view: &'a ChannelView<T>,
    next: usize,
}

impl<T: ChannelElement> Iterator for Iter<'_, T> {
    type Item = SpriteDataResult<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.view.count {
            return None;
        }
        let index = self.next;
        self.next += 1;
        Some(self.view.get(index))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.view.count - self.next;
        (remaining, Some(remaining))
    }
}

impl<T: ChannelElement> ExactSizeIterator for Iter<'_, T> {}

impl<'a, T: ChannelElement> IntoIterator for &'a ChannelView<T> {
    type Item = SpriteDataResult<T>;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// Views alias interior-mutable storage and stay on the owner's thread.
static_assertions::assert_not_impl_any!(ChannelView<glam::Vec3>: Send, Sync);
