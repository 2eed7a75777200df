use crate::foundation::core::{Canvas, Point, Vec2};
use crate::state::input::{InputEvent, PointerKind, SliderParam};
use crate::state::render_state::{BlendMode, MAX_SCALE, MIN_SCALE, RenderState};

/// Default wheel zoom sensitivity: `factor = exp(-delta_y * k)`.
pub const DEFAULT_WHEEL_SENSITIVITY: f64 = 0.001;

#[derive(Clone, Copy, Debug, PartialEq)]
struct Drag {
    last: Point,
    kind: PointerKind,
}

/// Sole owner of the [`RenderState`].
///
/// UI adapters call these operations (or feed [`InputEvent`]s); nothing writes state fields
/// directly. Each call composes with prior state. Inputs are clamped here so the compositor can
/// assume in-range values; non-finite inputs are ignored.
#[derive(Clone, Debug)]
pub struct TransformController {
    state: RenderState,
    drag: Option<Drag>,
    wheel_sensitivity: f64,
}

impl Default for TransformController {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformController {
    /// Controller holding the default state.
    pub fn new() -> Self {
        Self::from_state(RenderState::default())
    }

    /// Controller seeded from an existing state; values are clamped on entry.
    pub fn from_state(state: RenderState) -> Self {
        let mut c = Self {
            state: RenderState::default(),
            drag: None,
            wheel_sensitivity: DEFAULT_WHEEL_SENSITIVITY,
        };
        c.state.translate = if state.translate.is_finite() {
            state.translate
        } else {
            Vec2::ZERO
        };
        c.set_scale(state.scale);
        c.set_skew(state.skew_x, state.skew_y);
        c.set_distortion(state.distortion);
        c.set_perspective(state.perspective);
        c.set_depth_threshold(state.depth_threshold);
        c.set_opacity(state.opacity);
        c.set_blend_mode(state.blend_mode);
        c
    }

    /// Override the wheel zoom sensitivity `k`.
    pub fn with_wheel_sensitivity(mut self, k: f64) -> Self {
        if k.is_finite() {
            self.wheel_sensitivity = k;
        }
        self
    }

    /// Read-only view of the current state.
    pub fn state(&self) -> &RenderState {
        &self.state
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> RenderState {
        self.state
    }

    /// Whether a pointer drag is in progress.
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Pan by a screen-space delta (y down). Pattern space is y up, so `dy` is subtracted.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        if !(dx.is_finite() && dy.is_finite()) {
            return;
        }
        self.state.translate.x += dx;
        self.state.translate.y -= dy;
    }

    /// Zoom by `factor` keeping the point under the cursor fixed.
    ///
    /// `(cx, cy)` is the cursor relative to the viewport center, y down. The applied ratio is
    /// computed after clamping, so the invariant holds exactly whenever the scale is not pinned
    /// at a bound.
    pub fn zoom_at(&mut self, cx: f64, cy: f64, factor: f64) {
        if !(cx.is_finite() && cy.is_finite() && factor.is_finite()) || factor <= 0.0 {
            return;
        }
        let old = self.state.scale;
        let new = (old * factor).clamp(MIN_SCALE, MAX_SCALE);
        let r = new / old;

        let t = self.state.translate;
        self.state.translate = Vec2::new(cx - (cx - t.x) * r, -cy - (-cy - t.y) * r);
        self.state.scale = new;
    }

    /// [`TransformController::zoom_at`] with a canvas-local cursor position.
    pub fn zoom_at_canvas(&mut self, pos: Point, viewport: Canvas, factor: f64) {
        let c = pos - viewport.center();
        self.zoom_at(c.x, c.y, factor);
    }

    /// Exponential wheel zoom: `factor = exp(-delta_y * k)`.
    pub fn zoom_wheel(&mut self, pos: Point, viewport: Canvas, delta_y: f64) {
        let factor = (-delta_y * self.wheel_sensitivity).exp();
        self.zoom_at_canvas(pos, viewport, factor);
    }

    /// Set both shear terms.
    pub fn set_skew(&mut self, x: f64, y: f64) {
        if x.is_finite() {
            self.state.skew_x = x;
        }
        if y.is_finite() {
            self.state.skew_y = y;
        }
    }

    /// Set the scale, clamped to `[MIN_SCALE, MAX_SCALE]`.
    pub fn set_scale(&mut self, s: f64) {
        if s.is_finite() {
            self.state.scale = s.clamp(MIN_SCALE, MAX_SCALE);
        }
    }

    /// Set displacement strength, clamped to `[0, 1]`.
    pub fn set_distortion(&mut self, v: f32) {
        if v.is_finite() {
            self.state.distortion = v.clamp(0.0, 1.0);
        }
    }

    /// Set perspective strength (signed, unclamped).
    pub fn set_perspective(&mut self, v: f32) {
        if v.is_finite() {
            self.state.perspective = v;
        }
    }

    /// Set the depth cutoff, clamped to `[0, 1]`.
    pub fn set_depth_threshold(&mut self, v: f32) {
        if v.is_finite() {
            self.state.depth_threshold = v.clamp(0.0, 1.0);
        }
    }

    /// Set pattern opacity, clamped to `[0, 1]`.
    pub fn set_opacity(&mut self, v: f32) {
        if v.is_finite() {
            self.state.opacity = v.clamp(0.0, 1.0);
        }
    }

    /// Select the blend law.
    pub fn set_blend_mode(&mut self, mode: BlendMode) {
        self.state.blend_mode = mode;
    }

    /// Apply a slider value to its parameter.
    pub fn set_slider(&mut self, param: SliderParam, value: f64) {
        match param {
            SliderParam::Distortion => self.set_distortion(value as f32),
            SliderParam::Opacity => self.set_opacity(value as f32),
            SliderParam::SkewX => self.set_skew(value, self.state.skew_y),
            SliderParam::SkewY => self.set_skew(self.state.skew_x, value),
            SliderParam::DepthThreshold => self.set_depth_threshold(value as f32),
            SliderParam::Perspective => self.set_perspective(value as f32),
        }
    }

    /// Restore every parameter to its default and end any drag.
    pub fn reset(&mut self) {
        self.state = RenderState::default();
        self.drag = None;
    }

    /// Zero the pan, keeping scale and skew.
    pub fn center(&mut self) {
        self.state.translate = Vec2::ZERO;
    }

    /// Size the pattern to a third of the viewport's shorter side and center it.
    pub fn fit_pattern(&mut self, viewport: Canvas, pattern: Canvas) {
        if viewport.is_empty() || pattern.is_empty() {
            return;
        }
        self.set_scale((viewport.min_side() / 3.0) / pattern.max_side());
        self.center();
    }

    /// Begin a drag. Secondary buttons are ignored.
    pub fn pointer_down(&mut self, pos: Point, kind: PointerKind, primary: bool) {
        if kind == PointerKind::Mouse && !primary {
            return;
        }
        self.drag = Some(Drag { last: pos, kind });
    }

    /// Pan by the scaled movement since the last applied position.
    ///
    /// Movements not exceeding the device's jitter threshold on either axis leave the anchor in
    /// place so slow drags still accumulate.
    pub fn pointer_move(&mut self, pos: Point) {
        let Some(drag) = self.drag.as_mut() else {
            return;
        };
        let k = drag.kind.drag_sensitivity();
        let d = (pos - drag.last) * k;
        let min = drag.kind.min_drag_movement();
        if d.x.abs() > min || d.y.abs() > min {
            drag.last = pos;
            self.pan(d.x, d.y);
        }
    }

    /// End any drag.
    pub fn pointer_up(&mut self) {
        self.drag = None;
    }

    /// Route a UI event to the matching operation.
    pub fn handle(&mut self, event: InputEvent, viewport: Canvas) {
        match event {
            InputEvent::PointerDown { pos, kind, primary } => self.pointer_down(pos, kind, primary),
            InputEvent::PointerMove { pos } => self.pointer_move(pos),
            InputEvent::PointerUp | InputEvent::PointerCancel => self.pointer_up(),
            InputEvent::Wheel { pos, delta_y } => self.zoom_wheel(pos, viewport, delta_y),
            InputEvent::Slider { param, value } => self.set_slider(param, value),
            InputEvent::SelectBlendMode(mode) => self.set_blend_mode(mode),
            InputEvent::Reset => self.reset(),
            InputEvent::Center => self.center(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/state/controller.rs"]
mod tests;
