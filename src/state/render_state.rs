use std::str::FromStr;

use crate::foundation::core::Vec2;
use crate::foundation::error::{StampError, StampResult};
use crate::foundation::math::LinearMap2;

/// Lower bound for [`RenderState::scale`].
pub const MIN_SCALE: f64 = 0.01;
/// Upper bound for [`RenderState::scale`].
pub const MAX_SCALE: f64 = 10.0;

/// Default displacement-warp strength.
pub const DEFAULT_DISTORTION: f32 = 0.3;
/// Default pattern opacity.
pub const DEFAULT_OPACITY: f32 = 1.0;
/// Default depth cutoff.
pub const DEFAULT_DEPTH_THRESHOLD: f32 = 0.7;
/// Default perspective-warp strength.
pub const DEFAULT_PERSPECTIVE: f32 = 0.0;

/// Pixel blending law used to merge the pattern into the product.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum BlendMode {
    /// Pattern color replaces the base.
    #[default]
    Normal,
    /// `b * s`.
    Multiply,
    /// `1 - (1-b)(1-s)`.
    Screen,
    /// Multiply or screen, keyed on the pattern channel.
    Overlay,
    /// Component-wise minimum.
    Darken,
    /// Component-wise maximum.
    Lighten,
    /// Brighten the base by the inverse of the pattern.
    ColorDodge,
    /// Darken the base by the pattern.
    ColorBurn,
    /// Gentle contrast keyed on the pattern channel.
    SoftLight,
    /// Hard contrast keyed on the pattern channel.
    HardLight,
    /// Rainbow tint derived from the pattern's red channel.
    Hologram,
}

impl BlendMode {
    /// All modes, ordered by their legacy numeric index.
    pub const ALL: [BlendMode; 11] = [
        Self::Normal,
        Self::Multiply,
        Self::Screen,
        Self::Overlay,
        Self::Darken,
        Self::Lighten,
        Self::ColorDodge,
        Self::ColorBurn,
        Self::SoftLight,
        Self::HardLight,
        Self::Hologram,
    ];

    /// Kebab-case name, as used in scene files and UI selections.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Multiply => "multiply",
            Self::Screen => "screen",
            Self::Overlay => "overlay",
            Self::Darken => "darken",
            Self::Lighten => "lighten",
            Self::ColorDodge => "color-dodge",
            Self::ColorBurn => "color-burn",
            Self::SoftLight => "soft-light",
            Self::HardLight => "hard-light",
            Self::Hologram => "hologram",
        }
    }

    /// Legacy numeric index (`0..=10`).
    pub fn index(self) -> u8 {
        match self {
            Self::Normal => 0,
            Self::Multiply => 1,
            Self::Screen => 2,
            Self::Overlay => 3,
            Self::Darken => 4,
            Self::Lighten => 5,
            Self::ColorDodge => 6,
            Self::ColorBurn => 7,
            Self::SoftLight => 8,
            Self::HardLight => 9,
            Self::Hologram => 10,
        }
    }

    /// Inverse of [`BlendMode::index`].
    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(usize::from(index)).copied()
    }
}

impl std::fmt::Display for BlendMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlendMode {
    type Err = StampError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| StampError::validation(format!("unknown blend mode \"{s}\"")))
    }
}

/// Every parameter the compositor reads for one frame.
///
/// Owned by [`crate::TransformController`]; everyone else sees copies.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RenderState {
    /// Accumulated pan in canvas pixels (y up).
    pub translate: Vec2,
    /// Uniform pattern scale, within `[MIN_SCALE, MAX_SCALE]`.
    pub scale: f64,
    /// Horizontal shear term.
    pub skew_x: f64,
    /// Vertical shear term.
    pub skew_y: f64,
    /// Displacement-warp strength in `[0, 1]`.
    pub distortion: f32,
    /// Perspective-warp strength, signed.
    pub perspective: f32,
    /// Depth cutoff for the mask, in `[0, 1]`.
    pub depth_threshold: f32,
    /// Pattern opacity in `[0, 1]`.
    pub opacity: f32,
    /// Blend law.
    pub blend_mode: BlendMode,
}

impl Default for RenderState {
    fn default() -> Self {
        Self {
            translate: Vec2::ZERO,
            scale: 1.0,
            skew_x: 0.0,
            skew_y: 0.0,
            distortion: DEFAULT_DISTORTION,
            perspective: DEFAULT_PERSPECTIVE,
            depth_threshold: DEFAULT_DEPTH_THRESHOLD,
            opacity: DEFAULT_OPACITY,
            blend_mode: BlendMode::Normal,
        }
    }
}

impl RenderState {
    /// Linear part of the pattern transform, `[[scale, skew_x], [skew_y, scale]]`.
    pub fn linear_map(&self) -> LinearMap2 {
        LinearMap2::scale_skew(self.scale, self.skew_x, self.skew_y)
    }

    /// Check that every field is finite and inside its documented range.
    pub fn validate(&self) -> StampResult<()> {
        let finite = [
            self.translate.x,
            self.translate.y,
            self.scale,
            self.skew_x,
            self.skew_y,
        ]
        .iter()
        .all(|v| v.is_finite())
            && [
                self.distortion,
                self.perspective,
                self.depth_threshold,
                self.opacity,
            ]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(StampError::validation("render state values must be finite"));
        }
        if !(MIN_SCALE..=MAX_SCALE).contains(&self.scale) {
            return Err(StampError::validation(format!(
                "scale must be within [{MIN_SCALE}, {MAX_SCALE}]"
            )));
        }
        for (name, v) in [
            ("distortion", self.distortion),
            ("depth_threshold", self.depth_threshold),
            ("opacity", self.opacity),
        ] {
            if !(0.0..=1.0).contains(&v) {
                return Err(StampError::validation(format!(
                    "{name} must be within [0, 1]"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/state/render_state.rs"]
mod tests;
