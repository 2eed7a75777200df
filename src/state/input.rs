use std::str::FromStr;

use crate::foundation::core::Point;
use crate::foundation::error::StampError;
use crate::state::render_state::BlendMode;

/// Kind of pointing device behind a pointer event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerKind {
    /// Mouse or trackpad.
    #[default]
    Mouse,
    /// Finger on a touch screen.
    Touch,
    /// Stylus.
    Pen,
}

impl PointerKind {
    /// Multiplier applied to drag deltas.
    pub fn drag_sensitivity(self) -> f64 {
        match self {
            Self::Touch => 1.5,
            Self::Mouse | Self::Pen => 1.0,
        }
    }

    /// Drag deltas at or below this many pixels on both axes are ignored.
    pub fn min_drag_movement(self) -> f64 {
        match self {
            Self::Touch => 0.5,
            Self::Mouse | Self::Pen => 0.1,
        }
    }
}

/// Slider-backed parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SliderParam {
    /// Displacement-warp strength.
    Distortion,
    /// Pattern opacity.
    Opacity,
    /// Horizontal shear.
    SkewX,
    /// Vertical shear.
    SkewY,
    /// Depth mask cutoff.
    DepthThreshold,
    /// Perspective-warp strength.
    Perspective,
}

impl SliderParam {
    /// All slider parameters.
    pub const ALL: [SliderParam; 6] = [
        Self::Distortion,
        Self::Opacity,
        Self::SkewX,
        Self::SkewY,
        Self::DepthThreshold,
        Self::Perspective,
    ];

    /// Control identifier (`skewX`, `depthThreshold`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Distortion => "distortion",
            Self::Opacity => "opacity",
            Self::SkewX => "skewX",
            Self::SkewY => "skewY",
            Self::DepthThreshold => "depthThreshold",
            Self::Perspective => "perspective",
        }
    }
}

impl FromStr for SliderParam {
    type Err = StampError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| StampError::validation(format!("unknown slider \"{s}\"")))
    }
}

/// UI events, already translated to canvas-local pixel coordinates (origin top-left, y down).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    /// A pointer was pressed.
    PointerDown {
        /// Canvas-local position.
        pos: Point,
        /// Device kind.
        kind: PointerKind,
        /// `false` for secondary mouse buttons, which never start a drag.
        primary: bool,
    },
    /// The pointer moved.
    PointerMove {
        /// Canvas-local position.
        pos: Point,
    },
    /// The pointer was released.
    PointerUp,
    /// The pointer was cancelled or left the canvas.
    PointerCancel,
    /// Wheel scrolled over the canvas.
    Wheel {
        /// Canvas-local cursor position.
        pos: Point,
        /// Vertical wheel delta (positive zooms out).
        delta_y: f64,
    },
    /// A slider moved.
    Slider {
        /// Which slider.
        param: SliderParam,
        /// New raw slider value.
        value: f64,
    },
    /// A blend mode was selected.
    SelectBlendMode(BlendMode),
    /// Restore defaults.
    Reset,
    /// Recenter the pattern without changing scale.
    Center,
}

#[cfg(test)]
#[path = "../../tests/unit/state/input.rs"]
mod tests;
