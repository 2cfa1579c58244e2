//! Sprite mesh data: the owning aggregate and its typed accessors.
//!
//! [`SpriteMeshData`] owns the backing storage this crate exposes views
//! over: one interleaved per-vertex block shared by all vertex channels,
//! plus independent index, bind-pose, and bone-weight blocks and the bone
//! hierarchy. The per-vertex channels share a single `vertex_count`, and
//! [`SpriteMeshData::set_vertex_count`] is the only way to change it, so
//! channels can never disagree on their length.
//!
//! Descriptors and safety tokens are produced fresh on every accessor
//! call; the only state a caller retains across calls is a view, and a
//! view polices itself through its token.

use std::mem;
use std::sync::Arc;

use glam::Mat4;

use crate::bone::{validate_hierarchy, SpriteBone};
use crate::channel::{ChannelElement, VertexChannel};
use crate::error::{SpriteDataError, SpriteDataResult};
use crate::storage::{BufferBlock, ChannelDescriptor};
use crate::token::{GenerationCounter, SafetyToken};
use crate::types::BoneWeight;
use crate::view::ChannelView;

/// One channel's placement inside the interleaved per-vertex record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutEntry {
    /// The channel stored at this slot.
    pub channel: VertexChannel,
    /// Byte offset of the channel within each vertex record.
    pub offset: usize,
}

/// Which vertex channels a sprite carries, and where each lives within the
/// interleaved vertex record.
///
/// Channels are packed in insertion order; the stride is the sum of the
/// element sizes. Built with [`SpriteLayout::with_channel`] or one of the
/// presets.
///
/// # Example
///
/// ```ignore
/// let layout = SpriteLayout::new()
///     .with_channel(VertexChannel::Position)?
///     .with_channel(VertexChannel::TexCoord0)?;
/// assert_eq!(layout.stride(), 20);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpriteLayout {
    entries: Vec<LayoutEntry>,
    stride: usize,
}

impl SpriteLayout {
    /// Create an empty layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a channel at the current end of the vertex record.
    ///
    /// Fails with `UnsupportedChannel` for attributes that have no sprite
    /// channel representation. Adding a channel twice keeps the first
    /// placement.
    pub fn with_channel(mut self, channel: VertexChannel) -> SpriteDataResult<Self> {
        let format = channel
            .expected_format()
            .ok_or(SpriteDataError::UnsupportedChannel { channel })?;
        if self.entry(channel).is_none() {
            self.entries.push(LayoutEntry {
                channel,
                offset: self.stride,
            });
            self.stride += format.size();
        }
        Ok(self)
    }

    /// Position + color + one texture coordinate set.
    pub fn standard() -> Self {
        Self::preset(&[
            VertexChannel::Position,
            VertexChannel::Color,
            VertexChannel::TexCoord0,
        ])
    }

    /// Every sprite channel: position, normal, tangent, color, and all
    /// four texture coordinate sets.
    pub fn full() -> Self {
        Self::preset(&[
            VertexChannel::Position,
            VertexChannel::Normal,
            VertexChannel::Tangent,
            VertexChannel::Color,
            VertexChannel::TexCoord0,
            VertexChannel::TexCoord1,
            VertexChannel::TexCoord2,
            VertexChannel::TexCoord3,
        ])
    }

    fn preset(channels: &[VertexChannel]) -> Self {
        let mut layout = Self::new();
        for &channel in channels {
            // Presets only name channels with a sprite representation.
            let format = channel.expected_format().unwrap_or_else(|| {
                unreachable!("preset channel {channel:?} has a sprite format")
            });
            layout.entries.push(LayoutEntry {
                channel,
                offset: layout.stride,
            });
            layout.stride += format.size();
        }
        layout
    }

    /// Byte size of one interleaved vertex record.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// The channels in this layout, in record order.
    pub fn channels(&self) -> impl Iterator<Item = VertexChannel> + '_ {
        self.entries.iter().map(|entry| entry.channel)
    }

    /// Whether the layout carries `channel`.
    pub fn has_channel(&self, channel: VertexChannel) -> bool {
        self.entry(channel).is_some()
    }

    /// Placement of `channel` within the record, if present.
    pub fn entry(&self, channel: VertexChannel) -> Option<&LayoutEntry> {
        self.entries.iter().find(|entry| entry.channel == channel)
    }
}

/// Owner of a sprite's mesh buffers and skeleton data.
///
/// Carries one generation counter; any resize or reallocation of any of
/// its blocks advances it, staling every outstanding view of this sprite.
/// Same-size overwrites mutate storage in place and leave views live.
///
/// # Example
///
/// ```ignore
/// let mut sprite = SpriteMeshData::new(SpriteLayout::standard());
/// sprite.set_vertex_count(4);
/// sprite.set_channel(VertexChannel::Position, &corners)?;
/// let positions = sprite.channel::<Vec3>(VertexChannel::Position)?;
/// ```
#[derive(Debug)]
pub struct SpriteMeshData {
    layout: SpriteLayout,
    vertex_count: usize,
    vertices: Arc<BufferBlock>,
    index_count: usize,
    indices: Arc<BufferBlock>,
    bind_pose_count: usize,
    bind_poses: Arc<BufferBlock>,
    bone_weight_count: usize,
    bone_weights: Arc<BufferBlock>,
    bones: Vec<SpriteBone>,
    generation: GenerationCounter,
}

impl SpriteMeshData {
    /// Create an empty sprite with the given channel layout.
    pub fn new(layout: SpriteLayout) -> Self {
        Self {
            layout,
            vertex_count: 0,
            vertices: BufferBlock::zeroed(0),
            index_count: 0,
            indices: BufferBlock::zeroed(0),
            bind_pose_count: 0,
            bind_poses: BufferBlock::zeroed(0),
            bone_weight_count: 0,
            bone_weights: BufferBlock::zeroed(0),
            bones: Vec::new(),
            generation: GenerationCounter::new(),
        }
    }

    /// The sprite's channel layout.
    pub fn layout(&self) -> &SpriteLayout {
        &self.layout
    }

    /// Number of vertices in every per-vertex channel.
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// The generation the sprite's storage is currently at.
    pub fn current_generation(&self) -> u64 {
        self.generation.current()
    }

    /// Issue a safety token bound to the current generation.
    pub fn safety_token(&self) -> SafetyToken {
        self.generation.token()
    }

    /// Resize every per-vertex channel to `count` vertices.
    ///
    /// The sole mutator of the vertex count. Reallocates the interleaved
    /// vertex block, preserving the common prefix and zero-filling any
    /// growth, and advances the generation: every previously obtained
    /// per-vertex view is stale afterwards. Setting the current count is
    /// a no-op.
    pub fn set_vertex_count(&mut self, count: usize) {
        if count == self.vertex_count {
            return;
        }
        let stride = self.layout.stride();
        let fresh = BufferBlock::zeroed(count * stride);
        let keep = (self.vertex_count.min(count)) * stride;
        if keep > 0 {
            self.vertices.with_bytes(|old| {
                fresh.with_bytes_mut(|new| new[..keep].copy_from_slice(&old[..keep]));
            });
        }
        self.vertices = fresh;
        self.vertex_count = count;
        let generation = self.generation.advance();
        log::debug!("sprite vertex storage resized to {count} vertices (generation {generation})");
    }

    /// Describe where `channel` lives right now.
    ///
    /// Fails with `NoSuchChannel` when the layout does not carry the
    /// channel. The descriptor is computed fresh on every call.
    pub fn channel_descriptor(
        &self,
        channel: VertexChannel,
    ) -> SpriteDataResult<ChannelDescriptor> {
        let entry = self
            .layout
            .entry(channel)
            .ok_or(SpriteDataError::NoSuchChannel { channel })?;
        Ok(ChannelDescriptor::new(
            Arc::clone(&self.vertices),
            self.vertex_count,
            entry.offset,
            self.layout.stride(),
        ))
    }

    /// Construct a typed read view over `channel`.
    ///
    /// Validates the element type against the channel, then builds a
    /// strided view from a fresh descriptor and token. A sprite with zero
    /// vertices yields a valid, empty view.
    pub fn channel<T: ChannelElement>(
        &self,
        channel: VertexChannel,
    ) -> SpriteDataResult<ChannelView<T>> {
        channel.validate_element::<T>()?;
        let descriptor = self.channel_descriptor(channel)?;
        ChannelView::new(descriptor, self.safety_token())
    }

    /// Copy `source` into `channel`'s slots.
    ///
    /// Validates the element type, then requires `source` to match the
    /// channel's current count exactly: this write never resizes; sizing
    /// belongs to [`SpriteMeshData::set_vertex_count`]. On any failure
    /// nothing is written. The overwrite is in place, so the generation
    /// does not advance and previously constructed views stay live and
    /// observe the new data.
    pub fn set_channel<T: ChannelElement>(
        &mut self,
        channel: VertexChannel,
        source: &[T],
    ) -> SpriteDataResult<()> {
        channel.validate_element::<T>()?;
        let descriptor = self.channel_descriptor(channel)?;
        if source.len() != descriptor.count() {
            return Err(SpriteDataError::CountMismatch {
                expected: descriptor.count(),
                actual: source.len(),
            });
        }
        let offset = descriptor.offset();
        let stride = descriptor.stride();
        let element_size = mem::size_of::<T>();
        self.vertices.with_bytes_mut(|bytes| {
            for (i, element) in source.iter().enumerate() {
                let start = offset + i * stride;
                bytes[start..start + element_size].copy_from_slice(bytemuck::bytes_of(element));
            }
        });
        Ok(())
    }

    /// Number of indices. Independent of the vertex count.
    pub fn index_count(&self) -> usize {
        self.index_count
    }

    /// Typed read view over the index buffer.
    pub fn indices(&self) -> SpriteDataResult<ChannelView<u16>> {
        ChannelView::new(
            Self::packed_descriptor::<u16>(&self.indices, self.index_count),
            self.safety_token(),
        )
    }

    /// Replace the index buffer contents.
    ///
    /// A length change reallocates the block and advances the generation;
    /// a same-length write overwrites in place.
    pub fn set_indices(&mut self, source: &[u16]) {
        self.index_count =
            Self::write_packed(&mut self.indices, &self.generation, source, "index");
    }

    /// Number of bind poses. Independent of the vertex count.
    pub fn bind_pose_count(&self) -> usize {
        self.bind_pose_count
    }

    /// Typed read view over the bind-pose buffer.
    pub fn bind_poses(&self) -> SpriteDataResult<ChannelView<Mat4>> {
        ChannelView::new(
            Self::packed_descriptor::<Mat4>(&self.bind_poses, self.bind_pose_count),
            self.safety_token(),
        )
    }

    /// Replace the bind-pose buffer contents. Resize semantics match
    /// [`SpriteMeshData::set_indices`].
    pub fn set_bind_poses(&mut self, source: &[Mat4]) {
        self.bind_pose_count =
            Self::write_packed(&mut self.bind_poses, &self.generation, source, "bind-pose");
    }

    /// Number of bone weights. Independent of the vertex count.
    pub fn bone_weight_count(&self) -> usize {
        self.bone_weight_count
    }

    /// Typed read view over the bone-weight buffer.
    pub fn bone_weights(&self) -> SpriteDataResult<ChannelView<BoneWeight>> {
        ChannelView::new(
            Self::packed_descriptor::<BoneWeight>(&self.bone_weights, self.bone_weight_count),
            self.safety_token(),
        )
    }

    /// Replace the bone-weight buffer contents. Resize semantics match
    /// [`SpriteMeshData::set_indices`].
    pub fn set_bone_weights(&mut self, source: &[BoneWeight]) {
        self.bone_weight_count = Self::write_packed(
            &mut self.bone_weights,
            &self.generation,
            source,
            "bone-weight",
        );
    }

    /// Number of bones in the hierarchy.
    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }

    /// Copy of the bone hierarchy, in sequence order.
    ///
    /// Whole-array copy semantics: the skeleton is small and irregular
    /// enough that copy cost is accepted over view machinery.
    pub fn bones(&self) -> Vec<SpriteBone> {
        self.bones.clone()
    }

    /// Replace the bone hierarchy.
    ///
    /// Validates the forest invariant before committing; on rejection the
    /// prior hierarchy is left unchanged.
    pub fn set_bones(&mut self, bones: Vec<SpriteBone>) -> SpriteDataResult<()> {
        if let Err(err) = validate_hierarchy(&bones) {
            log::warn!("rejected bone hierarchy: {err}");
            return Err(err);
        }
        self.bones = bones;
        Ok(())
    }

    /// Descriptor over a tightly packed single-type block.
    fn packed_descriptor<T: ChannelElement>(
        block: &Arc<BufferBlock>,
        count: usize,
    ) -> ChannelDescriptor {
        ChannelDescriptor::new(Arc::clone(block), count, 0, mem::size_of::<T>())
    }

    /// Overwrite a packed block, reallocating on length change. Returns
    /// the new element count.
    fn write_packed<T: ChannelElement>(
        block: &mut Arc<BufferBlock>,
        generation: &GenerationCounter,
        source: &[T],
        label: &str,
    ) -> usize {
        let bytes: &[u8] = bytemuck::cast_slice(source);
        if block.len() == bytes.len() {
            block.with_bytes_mut(|dst| dst.copy_from_slice(bytes));
        } else {
            *block = BufferBlock::from_bytes(bytes.to_vec());
            let generation = generation.advance();
            log::debug!(
                "sprite {label} storage reallocated for {} elements (generation {generation})",
                source.len()
            );
        }
        source.len()
    }
}
