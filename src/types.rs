//! Plain-old-data element types stored in sprite buffers.
//!
//! All element types are `bytemuck::Pod` so they can be read out of raw
//! byte storage without copies or per-field decoding.

use bytemuck::{Pod, Zeroable};

/// A 4-component byte-normalized color (RGBA, 0-255 per component).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Pod, Zeroable)]
pub struct Color32 {
    /// Red component.
    pub r: u8,
    /// Green component.
    pub g: u8,
    /// Blue component.
    pub b: u8,
    /// Alpha component.
    pub a: u8,
}

impl Color32 {
    /// Opaque white.
    pub const WHITE: Self = Self::new(255, 255, 255, 255);
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    /// Create a color from its components.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// Per-vertex skinning influence: up to four joints with blend weights.
///
/// Weights are expected to sum to 1.0 for fully skinned vertices; unused
/// influences carry a weight of 0.0.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct BoneWeight {
    /// Blend weight per influence.
    pub weights: [f32; 4],
    /// Joint index per influence.
    pub joints: [u32; 4],
}

impl BoneWeight {
    /// A single full-weight influence on one joint.
    pub fn single(joint: u32) -> Self {
        Self {
            weights: [1.0, 0.0, 0.0, 0.0],
            joints: [joint, 0, 0, 0],
        }
    }
}

// Buffer layouts depend on these exact sizes.
static_assertions::const_assert_eq!(std::mem::size_of::<Color32>(), 4);
static_assertions::const_assert_eq!(std::mem::size_of::<BoneWeight>(), 32);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_components() {
        let c = Color32::new(10, 20, 30, 40);
        assert_eq!((c.r, c.g, c.b, c.a), (10, 20, 30, 40));
        assert_eq!(Color32::WHITE.a, 255);
    }

    #[test]
    fn test_color_byte_layout() {
        let c = Color32::new(1, 2, 3, 4);
        assert_eq!(bytemuck::bytes_of(&c), &[1, 2, 3, 4]);
    }

    #[test]
    fn test_bone_weight_single() {
        let w = BoneWeight::single(7);
        assert_eq!(w.joints[0], 7);
        assert_eq!(w.weights[0], 1.0);
        assert_eq!(w.weights[1..].iter().sum::<f32>(), 0.0);
    }
}
