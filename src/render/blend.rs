use crate::foundation::core::{Canvas, Rgbaf};
use crate::foundation::math::{fract, mix, smoothstep};
use crate::state::render_state::BlendMode;

/// Masks below this value leave the base color untouched.
pub const MASK_CUTOFF: f32 = 0.01;
/// Soft edge half-width of the depth mask, in screen pixels.
pub const MASK_FEATHER_PX: f32 = 2.0;
/// Keeps dodge/burn denominators away from zero.
pub const DODGE_BURN_EPSILON: f32 = 0.001;
/// Strength of the hologram tint over the base.
pub const HOLOGRAM_MIX: f32 = 0.7;

/// Mask feather in depth units for a canvas: two pixels of the shorter side.
pub fn depth_feather(canvas: Canvas) -> f32 {
    MASK_FEATHER_PX / canvas.min_side() as f32
}

/// Soft depth selector: 0 below `threshold - feather`, 1 above `threshold + feather`.
pub fn depth_mask(threshold: f32, feather: f32, depth: f32) -> f32 {
    smoothstep(threshold - feather, threshold + feather, depth)
}

/// Blended color for one mode, before mixing by alpha. Not clamped.
pub fn blend_rgb(mode: BlendMode, b: [f32; 3], s: [f32; 3]) -> [f32; 3] {
    match mode {
        BlendMode::Normal => s,
        BlendMode::Multiply => per_channel(b, s, |b, s| b * s),
        BlendMode::Screen => per_channel(b, s, |b, s| 1.0 - (1.0 - b) * (1.0 - s)),
        BlendMode::Overlay | BlendMode::HardLight => per_channel(b, s, |b, s| {
            if s < 0.5 {
                2.0 * b * s
            } else {
                1.0 - 2.0 * (1.0 - b) * (1.0 - s)
            }
        }),
        BlendMode::Darken => per_channel(b, s, f32::min),
        BlendMode::Lighten => per_channel(b, s, f32::max),
        BlendMode::ColorDodge => per_channel(b, s, |b, s| b / (1.0 - s + DODGE_BURN_EPSILON)),
        BlendMode::ColorBurn => {
            per_channel(b, s, |b, s| 1.0 - (1.0 - b) / (s + DODGE_BURN_EPSILON))
        }
        BlendMode::SoftLight => per_channel(b, s, |b, s| {
            if s < 0.5 {
                2.0 * b * s + b * b * (1.0 - 2.0 * s)
            } else {
                b.max(0.0).sqrt() * (2.0 * s - 1.0) + 2.0 * b * (1.0 - s)
            }
        }),
        BlendMode::Hologram => {
            let tint = rainbow(s[0]);
            per_channel(b, [tint[0] * s[0], tint[1] * s[1], tint[2] * s[2]], |b, t| {
                mix(b, t, HOLOGRAM_MIX)
            })
        }
    }
}

/// Three-band triangular hue wave keyed on `x`, clamped to `[0, 1]`.
fn rainbow(x: f32) -> [f32; 3] {
    let h = fract(x * 6.0) * 6.0;
    [
        ((h - 3.0).abs() - 1.0).clamp(0.0, 1.0),
        (2.0 - (h - 2.0).abs()).clamp(0.0, 1.0),
        (2.0 - (h - 4.0).abs()).clamp(0.0, 1.0),
    ]
}

#[inline(always)]
fn per_channel<F>(b: [f32; 3], s: [f32; 3], f: F) -> [f32; 3]
where
    F: Fn(f32, f32) -> f32,
{
    [f(b[0], s[0]), f(b[1], s[1]), f(b[2], s[2])]
}

/// Composite `pat` over `base` with the given mask, opacity and mode.
///
/// `final_alpha = pat.a * opacity * mask`; the output color is `mix(base, blended, final_alpha)`
/// and the output alpha is always the base alpha.
pub fn composite(base: Rgbaf, pat: Rgbaf, mask: f32, opacity: f32, mode: BlendMode) -> Rgbaf {
    let final_alpha = pat[3] * opacity * mask;
    if final_alpha <= 0.0 {
        return base;
    }
    let b = [base[0], base[1], base[2]];
    let blended = blend_rgb(mode, b, [pat[0], pat[1], pat[2]]);
    [
        mix(b[0], blended[0], final_alpha),
        mix(b[1], blended[1], final_alpha),
        mix(b[2], blended[2], final_alpha),
        base[3],
    ]
}

#[cfg(test)]
#[path = "../../tests/unit/render/blend.rs"]
mod tests;
