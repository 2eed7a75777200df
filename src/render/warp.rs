//! Depth-guided warp: maps a destination pixel into pattern UV space.
//!
//! All screen positions here are in canvas pixels with the origin at the bottom-left corner
//! (y up), matching the pattern-space convention used by the controller.

use crate::assets::texture::Texture;
use crate::foundation::core::{Canvas, Point, Vec2};
use crate::foundation::math::{LinearMap2, mix_vec2};
use crate::state::render_state::RenderState;

/// Converts depth-gradient units into pixels of displacement.
///
/// The gradient is a raw central difference of depth values one canvas texel apart, so it is
/// roughly O(1/texel); this gain brings it to pixel scale.
pub const DISPLACEMENT_GAIN: f64 = 200.0;
/// Exponent softening the displacement near zero depth.
pub const DEPTH_SOFTNESS_EXPONENT: f64 = 0.7;
/// Lower bound on the radial perspective factor.
pub const MIN_PERSPECTIVE_FACTOR: f64 = 0.1;
/// Added to the combined strength before computing the perspective weight.
pub const WARP_WEIGHT_EPSILON: f64 = 0.001;
/// Weight of the two-stage warp against the untouched position.
///
/// Fixed at 1.0, so the warped position is the two-stage result as-is.
pub const OUTER_WARP_WEIGHT: f64 = 1.0;

/// Depth gradient at `uv` by central differences `step` apart (in product UV units).
///
/// The difference is not divided by the step width.
pub fn depth_gradient(depth: &Texture, uv: Point, step: Vec2) -> Vec2 {
    let dx = Vec2::new(step.x, 0.0);
    let dy = Vec2::new(0.0, step.y);
    Vec2::new(
        f64::from(depth.sample_red(uv + dx)) - f64::from(depth.sample_red(uv - dx)),
        f64::from(depth.sample_red(uv + dy)) - f64::from(depth.sample_red(uv - dy)),
    )
}

/// Push `screen` along the depth gradient.
pub fn displacement_warp(screen: Point, grad: Vec2, depth: f64, distortion: f64) -> Point {
    let depth_factor = depth.max(0.0).powf(DEPTH_SOFTNESS_EXPONENT);
    screen + grad * (distortion * depth_factor * DISPLACEMENT_GAIN)
}

/// Radial scaling of `screen` about `center`, modulated by depth.
pub fn perspective_warp(screen: Point, center: Point, depth: f64, perspective: f64) -> Point {
    let factor = (1.0 + (depth - 0.5) * perspective).max(MIN_PERSPECTIVE_FACTOR);
    center + (screen - center) * factor
}

/// Relative weight of the perspective stage, `perspective / (distortion + perspective + eps)`.
///
/// The denominator's magnitude is floored at the epsilon so a negative perspective that cancels
/// the distortion cannot divide by zero.
pub fn perspective_weight(distortion: f64, perspective: f64) -> f64 {
    let total = distortion + perspective + WARP_WEIGHT_EPSILON;
    let total = if total.abs() < WARP_WEIGHT_EPSILON {
        WARP_WEIGHT_EPSILON.copysign(total)
    } else {
        total
    };
    perspective / total
}

/// Displacement, then perspective on the displaced point, mixed by relative strength.
pub fn combined_warp(
    screen: Point,
    center: Point,
    grad: Vec2,
    depth: f64,
    distortion: f64,
    perspective: f64,
) -> Point {
    let displaced = displacement_warp(screen, grad, depth, distortion);
    let projected = perspective_warp(displaced, center, depth, perspective);
    let w = perspective_weight(distortion, perspective);
    let inner = mix_vec2(displaced.to_vec2(), projected.to_vec2(), w);
    mix_vec2(screen.to_vec2(), inner, OUTER_WARP_WEIGHT).to_point()
}

/// Per-frame constants for the warp and the screen-to-pattern inversion.
#[derive(Clone, Copy, Debug)]
pub struct WarpEngine {
    center: Point,
    gradient_step: Vec2,
    translate: Vec2,
    map: LinearMap2,
    pattern_size: Vec2,
    distortion: f64,
    perspective: f64,
}

impl WarpEngine {
    /// Capture the frame's canvas, pattern size and transform state.
    pub fn new(canvas: Canvas, pattern: Canvas, state: &RenderState) -> Self {
        let size = canvas.size();
        Self {
            center: canvas.center(),
            gradient_step: Vec2::new(1.0 / size.x, 1.0 / size.y),
            translate: state.translate,
            map: state.linear_map(),
            pattern_size: pattern.size(),
            distortion: f64::from(state.distortion),
            perspective: f64::from(state.perspective),
        }
    }

    /// Warped screen position for a pixel whose product UV and depth are known.
    pub fn warp(&self, screen: Point, product_uv: Point, depth: f64, depth_map: &Texture) -> Point {
        let grad = depth_gradient(depth_map, product_uv, self.gradient_step);
        combined_warp(
            screen,
            self.center,
            grad,
            depth,
            self.distortion,
            self.perspective,
        )
    }

    /// Pattern pixel coordinates (origin at the pattern center) for a warped screen position.
    pub fn to_pattern_px(&self, warped: Point) -> Vec2 {
        let local = warped - self.center - self.translate;
        self.map.apply_inverse(local)
    }

    /// Pattern UV for a warped screen position, or `None` when the pattern does not cover it.
    pub fn pattern_uv(&self, warped: Point) -> Option<Point> {
        let px = self.to_pattern_px(warped);
        let uv = Point::new(
            (px.x + 0.5 * self.pattern_size.x) / self.pattern_size.x,
            (px.y + 0.5 * self.pattern_size.y) / self.pattern_size.y,
        );
        let inside = (0.0..=1.0).contains(&uv.x) && (0.0..=1.0).contains(&uv.y);
        inside.then_some(uv)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/warp.rs"]
mod tests;
