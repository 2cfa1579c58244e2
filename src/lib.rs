//! # Sprite Data
//!
//! Typed, zero-copy access to sprite mesh data backed by externally-managed
//! storage.
//!
//! ## Overview
//!
//! This crate provides:
//! - [`SpriteMeshData`] - Owner of a sprite's channel, index, bind-pose,
//!   bone-weight, and bone-hierarchy storage
//! - [`ChannelView`] - Zero-copy strided views, bounds- and
//!   generation-checked on every access
//! - [`VertexChannel`] - Channel semantics with a fixed element
//!   compatibility table
//! - [`SafetyToken`] - Generation snapshots that turn use of invalidated
//!   storage into a reportable error
//! - [`SpriteRendererData`] - Renderer-side access to the transient
//!   deformable position buffer
//!
//! Two classes of bugs are rejected before memory is touched: a region can
//! never be reinterpreted as an element type incompatible with its channel,
//! and a view over storage that has since been resized, reallocated, or
//! released fails with [`SpriteDataError::StaleView`] instead of reading
//! invalidated memory.
//!
//! ## Example
//!
//! ```ignore
//! use sprite_data::{SpriteLayout, SpriteMeshData, VertexChannel};
//! use glam::Vec3;
//!
//! let mut sprite = SpriteMeshData::new(SpriteLayout::standard());
//! sprite.set_vertex_count(4);
//! sprite.set_channel(VertexChannel::Position, &quad)?;
//!
//! let positions = sprite.channel::<Vec3>(VertexChannel::Position)?;
//! for position in positions.iter() {
//!     println!("{:?}", position?);
//! }
//! ```

pub mod bone;
pub mod channel;
pub mod error;
pub mod renderer;
pub mod sprite;
pub mod storage;
pub mod token;
pub mod types;
pub mod view;

// Re-export main types for convenience
pub use bone::{validate_hierarchy, SpriteBone};
pub use channel::{ChannelElement, ElementFormat, VertexChannel};
pub use error::{HierarchyViolation, SpriteDataError, SpriteDataResult};
pub use renderer::SpriteRendererData;
pub use sprite::{LayoutEntry, SpriteLayout, SpriteMeshData};
pub use storage::ChannelDescriptor;
pub use token::{GenerationCounter, SafetyToken};
pub use types::{BoneWeight, Color32};
pub use view::ChannelView;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the sprite data subsystem.
///
/// Optional; only emits a version line through the logger.
pub fn init() {
    log::info!("sprite-data v{} initialized", VERSION);
}
