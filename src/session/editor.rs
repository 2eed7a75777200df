use std::path::Path;
use std::sync::Arc;

use crate::assets::provider::AssetProvider;
use crate::assets::slots::{LoadTicket, TextureRole};
use crate::assets::texture::Texture;
use crate::encode::png::write_png;
use crate::foundation::core::Canvas;
use crate::foundation::error::{StampError, StampResult};
use crate::render::frame::{FrameRGBA, RenderThreading};
use crate::render::renderer::FrameRenderer;
use crate::state::controller::TransformController;
use crate::state::input::InputEvent;
use crate::state::render_state::RenderState;

/// One editing session: the controller, the frame driver and the display viewport.
///
/// Everything here runs on the control thread. A host calls [`EditorSession::handle_input`] for
/// UI events and [`EditorSession::tick`] once per display refresh.
#[derive(Debug)]
pub struct EditorSession {
    controller: TransformController,
    renderer: FrameRenderer,
    viewport: Canvas,
    selected: [Option<String>; 3],
}

impl EditorSession {
    /// Session with default state and empty slots.
    pub fn new(
        viewport: Canvas,
        provider: Arc<dyn AssetProvider>,
        threading: RenderThreading,
    ) -> StampResult<Self> {
        if viewport.is_empty() {
            return Err(StampError::validation("viewport width and height must be > 0"));
        }
        Ok(Self {
            controller: TransformController::new(),
            renderer: FrameRenderer::new(provider, threading)?,
            viewport,
            selected: Default::default(),
        })
    }

    /// Replace the controller, e.g. to start from a saved state.
    pub fn with_controller(mut self, controller: TransformController) -> Self {
        self.controller = controller;
        self
    }

    /// Display canvas.
    pub fn viewport(&self) -> Canvas {
        self.viewport
    }

    /// Resize the display canvas. Zero-sized viewports are rejected.
    pub fn resize(&mut self, viewport: Canvas) -> StampResult<()> {
        if viewport.is_empty() {
            return Err(StampError::validation("viewport width and height must be > 0"));
        }
        self.viewport = viewport;
        Ok(())
    }

    /// The state owner.
    pub fn controller(&self) -> &TransformController {
        &self.controller
    }

    /// The state owner, for direct operation calls.
    pub fn controller_mut(&mut self) -> &mut TransformController {
        &mut self.controller
    }

    /// The frame driver.
    pub fn renderer(&self) -> &FrameRenderer {
        &self.renderer
    }

    /// Copy of the current state, for labels and persistence.
    pub fn state(&self) -> RenderState {
        self.controller.snapshot()
    }

    /// Route one UI event to the controller.
    pub fn handle_input(&mut self, event: InputEvent) {
        self.controller.handle(event, self.viewport);
    }

    /// Path last selected for `role`, if still selected.
    pub fn selected(&self, role: TextureRole) -> Option<&str> {
        self.selected[role.index()].as_deref()
    }

    /// Select a pattern by path. Selecting the current pattern again deselects it; a pattern whose
    /// load failed is no longer selected, so selecting it again retries.
    ///
    /// Returns the load ticket, or `None` when the call deselected.
    pub fn select_pattern(&mut self, path: &str) -> Option<LoadTicket> {
        if self.selected(TextureRole::Pattern) == Some(path) {
            self.deselect_pattern();
            return None;
        }
        Some(self.request(TextureRole::Pattern, path))
    }

    /// Unbind the pattern; frames fall back to the product alone.
    pub fn deselect_pattern(&mut self) {
        self.clear(TextureRole::Pattern);
    }

    /// Select a product and its optional depth map. Selecting the current product again
    /// deselects both.
    ///
    /// Without a depth map the product's red channel is used as depth.
    pub fn select_product(&mut self, product: &str, depth: Option<&str>) -> Option<LoadTicket> {
        if self.selected(TextureRole::Product) == Some(product) {
            self.deselect_product();
            return None;
        }
        let ticket = self.request(TextureRole::Product, product);
        match depth {
            Some(depth) => {
                self.request(TextureRole::Depth, depth);
            }
            None => self.clear(TextureRole::Depth),
        }
        Some(ticket)
    }

    /// Unbind product and depth; frames clear to transparent.
    pub fn deselect_product(&mut self) {
        self.clear(TextureRole::Product);
        self.clear(TextureRole::Depth);
    }

    /// Bind an already decoded texture, bypassing the provider.
    pub fn bind_texture(&mut self, role: TextureRole, texture: Texture) {
        self.selected[role.index()] = None;
        self.renderer.slots_mut().bind(role, texture);
    }

    /// Apply finished loads without blocking. Returns the number of slots rebound.
    pub fn poll_loads(&mut self) -> usize {
        let applied = self.renderer.slots_mut().poll();
        self.forget_failed_selections();
        applied
    }

    /// Block until all requested loads have arrived.
    pub fn wait_for_loads(&mut self) -> usize {
        let applied = self.renderer.slots_mut().wait_for_loads();
        self.forget_failed_selections();
        applied
    }

    /// Fit the bound pattern to the viewport. Returns `false` when no pattern is bound.
    pub fn fit_pattern(&mut self) -> bool {
        let Some(pattern) = self.renderer.slots().get(TextureRole::Pattern) else {
            return false;
        };
        let size = pattern.size();
        self.controller.fit_pattern(self.viewport, size);
        true
    }

    /// Restore default state.
    pub fn reset(&mut self) {
        self.controller.reset();
    }

    /// One refresh: pick up finished loads, then render at viewport size.
    pub fn tick(&mut self) -> StampResult<FrameRGBA> {
        self.poll_loads();
        self.render_frame()
    }

    /// Render the current composite at viewport size.
    pub fn render_frame(&self) -> StampResult<FrameRGBA> {
        self.render_frame_at(self.viewport)
    }

    /// Render the current composite sampled onto an `output`-sized grid.
    pub fn render_frame_at(&self, output: Canvas) -> StampResult<FrameRGBA> {
        self.renderer
            .render(self.controller.state(), self.viewport, output)
    }

    /// Render at `size` (viewport size when `None`) and write a PNG.
    #[tracing::instrument(skip(self))]
    pub fn export_png(&self, path: &Path, size: Option<Canvas>) -> StampResult<FrameRGBA> {
        let frame = self.render_frame_at(size.unwrap_or(self.viewport))?;
        write_png(&frame, path)?;
        tracing::info!(
            path = %path.display(),
            width = frame.width,
            height = frame.height,
            "exported"
        );
        Ok(frame)
    }

    fn request(&mut self, role: TextureRole, path: &str) -> LoadTicket {
        self.selected[role.index()] = Some(path.to_owned());
        self.renderer.slots_mut().request(role, path)
    }

    // A selection with neither a bound texture nor a pending load is a failed load.
    fn forget_failed_selections(&mut self) {
        let slots = self.renderer.slots();
        for role in TextureRole::ALL {
            let selected = &mut self.selected[role.index()];
            if selected.is_some() && !slots.is_bound(role) && !slots.is_loading(role) {
                tracing::debug!(%role, path = ?selected, "selection dropped after failed load");
                *selected = None;
            }
        }
    }

    fn clear(&mut self, role: TextureRole) {
        self.selected[role.index()] = None;
        self.renderer.slots_mut().clear(role);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/editor.rs"]
mod tests;
