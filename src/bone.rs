//! Skeleton bone descriptors and hierarchy validation.
//!
//! Bones form a forest: a bone's parent is either absent or an earlier
//! index in the same sequence, which rules out cycles by construction.

use glam::{Quat, Vec3};

use crate::error::{HierarchyViolation, SpriteDataError, SpriteDataResult};

/// One node of a sprite skeleton.
///
/// Names are labels for tooling and need not be unique.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteBone {
    /// Display name of the bone.
    pub name: String,
    /// Bind position relative to the parent.
    pub position: Vec3,
    /// Bind rotation relative to the parent (unit quaternion).
    pub rotation: Quat,
    /// Length of the bone along its local axis.
    pub length: f32,
    /// Index of the parent bone in the same sequence, or
    /// [`SpriteBone::NO_PARENT`] for roots.
    pub parent_id: i32,
}

impl SpriteBone {
    /// Parent index marking a root bone.
    pub const NO_PARENT: i32 = -1;

    /// Create a root bone with identity pose.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            length: 0.0,
            parent_id: Self::NO_PARENT,
        }
    }

    /// Set the bind position.
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Set the bind rotation.
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Set the bone length.
    pub fn with_length(mut self, length: f32) -> Self {
        self.length = length;
        self
    }

    /// Set the parent index.
    pub fn with_parent(mut self, parent_id: i32) -> Self {
        self.parent_id = parent_id;
        self
    }

    /// Whether this bone has no parent.
    pub fn is_root(&self) -> bool {
        self.parent_id == Self::NO_PARENT
    }
}

/// Check that `bones` forms a valid forest.
///
/// Each bone's parent must be [`SpriteBone::NO_PARENT`] or an index that
/// precedes the bone itself, and bone lengths must be non-negative. The
/// first violation is reported with the index of the offending bone.
pub fn validate_hierarchy(bones: &[SpriteBone]) -> SpriteDataResult<()> {
    for (index, bone) in bones.iter().enumerate() {
        if bone.length < 0.0 {
            return Err(SpriteDataError::InvalidHierarchy {
                index,
                reason: HierarchyViolation::NegativeLength,
            });
        }
        if bone.parent_id == SpriteBone::NO_PARENT {
            continue;
        }
        if bone.parent_id < 0 || bone.parent_id as usize >= bones.len() {
            return Err(SpriteDataError::InvalidHierarchy {
                index,
                reason: HierarchyViolation::ParentOutOfRange,
            });
        }
        if bone.parent_id as usize >= index {
            return Err(SpriteDataError::InvalidHierarchy {
                index,
                reason: HierarchyViolation::ParentNotEarlier,
            });
        }
    }
    Ok(())
}
