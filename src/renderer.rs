//! Renderer-side access to the transient deformable position buffer.
//!
//! A sprite renderer may carry one deformable position buffer, distinct
//! from the sprite's static channels: the deformation pipeline fills it,
//! rendering consumes it, and either side can release it. This module
//! exposes the read view and the deactivation edge; activation is driven
//! by the pipeline.

use std::mem;
use std::sync::Arc;

use glam::Vec3;

use crate::error::{SpriteDataError, SpriteDataResult};
use crate::storage::{BufferBlock, ChannelDescriptor};
use crate::token::{GenerationCounter, SafetyToken};
use crate::view::ChannelView;

/// Owner of a renderer's transient deformable position buffer.
///
/// Carries its own generation counter, independent of any sprite: the
/// deformable buffer's lifecycle (activate, deactivate) is what advances
/// it.
#[derive(Debug, Default)]
pub struct SpriteRendererData {
    deformable: Option<DeformableBuffer>,
    generation: GenerationCounter,
}

#[derive(Debug)]
struct DeformableBuffer {
    block: Arc<BufferBlock>,
    count: usize,
}

impl SpriteRendererData {
    /// Create a renderer with no active deformable buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a deformable buffer is currently active.
    pub fn is_deformable_active(&self) -> bool {
        self.deformable.is_some()
    }

    /// The generation the renderer's storage is currently at.
    pub fn current_generation(&self) -> u64 {
        self.generation.current()
    }

    /// Issue a safety token bound to the current generation.
    pub fn safety_token(&self) -> SafetyToken {
        self.generation.token()
    }

    /// Activate the deformable buffer with the given positions.
    ///
    /// Called by the deformation pipeline when it hands the renderer a
    /// fresh buffer. Replaces any previous buffer and advances the
    /// generation, staling outstanding views.
    pub fn activate_deformable_buffer(&mut self, positions: &[Vec3]) {
        self.deformable = Some(DeformableBuffer {
            block: BufferBlock::from_bytes(bytemuck::cast_slice(positions).to_vec()),
            count: positions.len(),
        });
        let generation = self.generation.advance();
        log::debug!(
            "deformable buffer activated with {} positions (generation {generation})",
            positions.len()
        );
    }

    /// Release the deformable buffer back to the pipeline.
    ///
    /// Advances the generation, so outstanding views fail with `StaleView`
    /// and subsequent [`SpriteRendererData::deformable_positions`] calls
    /// fail with `BufferInactive` until the pipeline reactivates the
    /// buffer. Deactivating an inactive buffer is a no-op.
    pub fn deactivate_deformable_buffer(&mut self) {
        if self.deformable.take().is_some() {
            let generation = self.generation.advance();
            log::debug!("deformable buffer deactivated (generation {generation})");
        }
    }

    /// Typed read view over the deformable positions.
    ///
    /// Fails with `BufferInactive` while no buffer is active.
    pub fn deformable_positions(&self) -> SpriteDataResult<ChannelView<Vec3>> {
        let deformable = self
            .deformable
            .as_ref()
            .ok_or(SpriteDataError::BufferInactive)?;
        ChannelView::new(
            ChannelDescriptor::new(
                Arc::clone(&deformable.block),
                deformable.count,
                0,
                mem::size_of::<Vec3>(),
            ),
            self.safety_token(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positions() -> Vec<Vec3> {
        vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ]
    }

    #[test]
    fn test_inactive_by_default() {
        let renderer = SpriteRendererData::new();
        assert!(!renderer.is_deformable_active());
        assert_eq!(
            renderer.deformable_positions().unwrap_err(),
            SpriteDataError::BufferInactive
        );
    }

    #[test]
    fn test_activate_and_read() {
        let mut renderer = SpriteRendererData::new();
        renderer.activate_deformable_buffer(&positions());

        let view = renderer.deformable_positions().unwrap();
        assert_eq!(view.len(), 3);
        assert_eq!(view.to_vec().unwrap(), positions());
    }

    #[test]
    fn test_deactivate_blocks_access() {
        let mut renderer = SpriteRendererData::new();
        renderer.activate_deformable_buffer(&positions());
        let view = renderer.deformable_positions().unwrap();

        renderer.deactivate_deformable_buffer();

        // New accessor calls report the buffer inactive; the outstanding
        // view reports staleness.
        assert_eq!(
            renderer.deformable_positions().unwrap_err(),
            SpriteDataError::BufferInactive
        );
        assert!(matches!(
            view.get(0),
            Err(SpriteDataError::StaleView { .. })
        ));
    }

    #[test]
    fn test_deactivate_when_inactive_is_noop() {
        let mut renderer = SpriteRendererData::new();
        let generation = renderer.current_generation();
        renderer.deactivate_deformable_buffer();
        assert_eq!(renderer.current_generation(), generation);
    }

    #[test]
    fn test_reactivation_restores_access() {
        let mut renderer = SpriteRendererData::new();
        renderer.activate_deformable_buffer(&positions());
        renderer.deactivate_deformable_buffer();

        let fresh = vec![Vec3::ONE; 2];
        renderer.activate_deformable_buffer(&fresh);
        let view = renderer.deformable_positions().unwrap();
        assert_eq!(view.to_vec().unwrap(), fresh);
    }

    #[test]
    fn test_reactivation_stales_prior_view() {
        let mut renderer = SpriteRendererData::new();
        renderer.activate_deformable_buffer(&positions());
        let view = renderer.deformable_positions().unwrap();

        renderer.activate_deformable_buffer(&positions());
        assert!(matches!(
            view.get(0),
            Err(SpriteDataError::StaleView { .. })
        ));
    }
}
