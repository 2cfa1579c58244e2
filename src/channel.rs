//! Vertex channel semantics and element compatibility.
//!
//! A [`VertexChannel`] names one per-vertex attribute of a sprite mesh.
//! Each sprite channel holds exactly one element type; the compatibility
//! table is fixed and checked before any memory is touched, so a view can
//! never reinterpret a region as a type incompatible with its semantic role.

use std::any::type_name;

use bytemuck::Pod;
use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::error::{SpriteDataError, SpriteDataResult};
use crate::types::{BoneWeight, Color32};

/// Semantic meaning of a vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexChannel {
    /// Vertex position (float3).
    Position,
    /// Vertex normal (float3).
    Normal,
    /// Vertex tangent (float4, w = handedness).
    Tangent,
    /// Vertex color (byte-normalized RGBA).
    Color,
    /// Texture coordinates set 0 (float2).
    TexCoord0,
    /// Texture coordinates set 1 (float2).
    TexCoord1,
    /// Texture coordinates set 2 (float2).
    TexCoord2,
    /// Texture coordinates set 3 (float2).
    TexCoord3,
    /// Joint indices for skinning. Not a sprite channel; skinning data is
    /// reached through the bone-weight accessor.
    Joints,
    /// Joint weights for skinning. Not a sprite channel.
    Weights,
}

impl VertexChannel {
    /// The element format a sprite stores for this channel, or `None` for
    /// attributes that have no sprite channel representation.
    pub fn expected_format(&self) -> Option<ElementFormat> {
        match self {
            Self::Position | Self::Normal => Some(ElementFormat::Float3),
            Self::Tangent => Some(ElementFormat::Float4),
            Self::Color => Some(ElementFormat::Unorm8x4),
            Self::TexCoord0 | Self::TexCoord1 | Self::TexCoord2 | Self::TexCoord3 => {
                Some(ElementFormat::Float2)
            }
            Self::Joints | Self::Weights => None,
        }
    }

    /// Check that `T` is the element type this channel holds.
    ///
    /// Pure validation with no side effects; called before any memory
    /// access on both the read and write paths.
    pub fn validate_element<T: ChannelElement>(&self) -> SpriteDataResult<()> {
        let expected = self
            .expected_format()
            .ok_or(SpriteDataError::UnsupportedChannel { channel: *self })?;
        if T::FORMAT != expected {
            return Err(SpriteDataError::TypeMismatch {
                channel: *self,
                expected: expected.element_name(),
                requested: type_name::<T>(),
            });
        }
        Ok(())
    }
}

/// Data format of a buffer element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementFormat {
    /// Two 32-bit floats.
    Float2,
    /// Three 32-bit floats.
    Float3,
    /// Four 32-bit floats.
    Float4,
    /// Four 8-bit unsigned integers (normalized to 0.0-1.0).
    Unorm8x4,
    /// Single 16-bit unsigned integer.
    Uint16,
    /// 4x4 matrix of 32-bit floats.
    Float4x4,
    /// Four joint influences (weights + indices).
    BoneWeight,
}

impl ElementFormat {
    /// Size in bytes of one element of this format.
    pub fn size(&self) -> usize {
        match self {
            Self::Float2 => 8,
            Self::Float3 => 12,
            Self::Float4 => 16,
            Self::Unorm8x4 => 4,
            Self::Uint16 => 2,
            Self::Float4x4 => 64,
            Self::BoneWeight => 32,
        }
    }

    /// Name of the Rust element type backing this format, for diagnostics.
    pub fn element_name(&self) -> &'static str {
        match self {
            Self::Float2 => "Vec2",
            Self::Float3 => "Vec3",
            Self::Float4 => "Vec4",
            Self::Unorm8x4 => "Color32",
            Self::Uint16 => "u16",
            Self::Float4x4 => "Mat4",
            Self::BoneWeight => "BoneWeight",
        }
    }
}

/// Element types that can back a typed buffer view.
///
/// The `Pod` bound guarantees every bit pattern is a valid value, so reads
/// out of raw storage are total. `FORMAT` ties the Rust type to the wire
/// format the compatibility table speaks about.
pub trait ChannelElement: Pod {
    /// The buffer format this element type occupies.
    const FORMAT: ElementFormat;
}

impl ChannelElement for Vec2 {
    const FORMAT: ElementFormat = ElementFormat::Float2;
}

impl ChannelElement for Vec3 {
    const FORMAT: ElementFormat = ElementFormat::Float3;
}

impl ChannelElement for Vec4 {
    const FORMAT: ElementFormat = ElementFormat::Float4;
}

impl ChannelElement for Color32 {
    const FORMAT: ElementFormat = ElementFormat::Unorm8x4;
}

impl ChannelElement for u16 {
    const FORMAT: ElementFormat = ElementFormat::Uint16;
}

impl ChannelElement for Mat4 {
    const FORMAT: ElementFormat = ElementFormat::Float4x4;
}

impl ChannelElement for BoneWeight {
    const FORMAT: ElementFormat = ElementFormat::BoneWeight;
}
