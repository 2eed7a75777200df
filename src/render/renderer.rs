use std::sync::Arc;

use crate::assets::provider::AssetProvider;
use crate::assets::slots::{AssetSlots, TextureRole};
use crate::assets::texture::Texture;
use crate::foundation::core::Canvas;
use crate::foundation::error::{StampError, StampResult};
use crate::render::frame::{FrameExecutor, FrameInputs, FrameRGBA, RenderThreading};
use crate::state::render_state::RenderState;

/// Frame driver: owns the texture slots and turns the current state into pixels.
///
/// Each render snapshots the bound handles, so a load completing mid-frame can never tear it.
#[derive(Debug)]
pub struct FrameRenderer {
    slots: AssetSlots,
    placeholder: Arc<Texture>,
    threading: RenderThreading,
    executor: FrameExecutor,
}

impl FrameRenderer {
    /// Renderer with empty slots loading through `provider`.
    pub fn new(provider: Arc<dyn AssetProvider>, threading: RenderThreading) -> StampResult<Self> {
        let executor = FrameExecutor::new(&threading)?;
        Ok(Self {
            slots: AssetSlots::new(provider)?,
            placeholder: Arc::new(Texture::transparent_placeholder()),
            threading,
            executor,
        })
    }

    /// Bound textures.
    pub fn slots(&self) -> &AssetSlots {
        &self.slots
    }

    /// Bound textures, for binding and load requests.
    pub fn slots_mut(&mut self) -> &mut AssetSlots {
        &mut self.slots
    }

    /// Current dispatch settings.
    pub fn threading(&self) -> &RenderThreading {
        &self.threading
    }

    /// Replace the dispatch settings.
    pub fn set_threading(&mut self, threading: RenderThreading) -> StampResult<()> {
        self.executor = FrameExecutor::new(&threading)?;
        self.threading = threading;
        Ok(())
    }

    /// Inputs for the next frame, or `None` when no product is bound.
    ///
    /// A missing depth map falls back to the product; a missing pattern falls back to the
    /// transparent placeholder.
    pub fn frame_inputs(&self, state: &RenderState, viewport: Canvas) -> Option<FrameInputs> {
        let product = Arc::clone(self.slots.get(TextureRole::Product)?);
        let depth = self
            .slots
            .get(TextureRole::Depth)
            .map_or_else(|| Arc::clone(&product), Arc::clone);
        let pattern = self
            .slots
            .get(TextureRole::Pattern)
            .map_or_else(|| Arc::clone(&self.placeholder), Arc::clone);
        Some(FrameInputs {
            viewport,
            product,
            depth,
            pattern,
            state: *state,
        })
    }

    /// Render the composite for `viewport`, sampled onto an `output` grid.
    ///
    /// Without a product the frame is cleared to transparent.
    #[tracing::instrument(skip(self, state))]
    pub fn render(
        &self,
        state: &RenderState,
        viewport: Canvas,
        output: Canvas,
    ) -> StampResult<FrameRGBA> {
        if viewport.is_empty() {
            return Err(StampError::validation("viewport width and height must be > 0"));
        }
        match self.frame_inputs(state, viewport) {
            Some(inputs) => self.executor.render(&inputs, output),
            None => {
                tracing::trace!("no product bound; clearing frame");
                FrameRGBA::transparent(output)
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/renderer.rs"]
mod tests;
