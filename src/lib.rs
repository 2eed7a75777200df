//! Stampwarp previews a flat pattern (logo, print) stamped onto a product photograph.
//!
//! The pattern is placed with a user-controlled 2D transform, bent along the product's depth map,
//! masked to surfaces deeper than a threshold, and blended with one of eleven blend modes. All
//! compositing runs on the CPU as a pure per-pixel map over [`FrameInputs`].
//!
//! # Pipeline overview
//!
//! 1. **Control**: UI events become [`TransformController`] operations on a [`RenderState`]
//! 2. **Fit**: the product is letterboxed into the canvas ([`ProductFit`])
//! 3. **Warp**: each pixel is displaced along the depth gradient and scaled radially
//!    ([`WarpEngine`]), then inverted through the pattern transform into pattern UV
//! 4. **Blend**: the depth mask and opacity gate a blend-mode composite ([`composite`])
//! 5. **Export** (optional): frames are written as PNG ([`write_png`])
//!
//! Assets load asynchronously into three independent slots ([`AssetSlots`]); a frame always uses
//! whatever is bound at the time it starts. [`EditorSession`] ties it all together.
//!
//! Frames are **straight-alpha** RGBA8; the product's alpha passes through unchanged.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod encode;
mod foundation;
mod render;
mod scene;
mod session;
mod state;

pub use assets::decode::{decode_image, decode_image_file};
pub use assets::provider::{
    AssetProvider, FsAssetProvider, InMemoryAssetProvider, normalize_rel_path,
};
pub use assets::slots::{AssetSlots, LoadTicket, TextureRole};
pub use assets::texture::Texture;
pub use encode::png::{encode_png, write_png};
pub use foundation::core::{Canvas, Point, Rgbaf, Vec2};
pub use foundation::error::{StampError, StampResult};
pub use foundation::math::{LinearMap2, MIN_DETERMINANT, fract, mix, mix_vec2, smoothstep};
pub use render::blend::{
    DODGE_BURN_EPSILON, HOLOGRAM_MIX, MASK_CUTOFF, MASK_FEATHER_PX, blend_rgb, composite,
    depth_feather, depth_mask,
};
pub use render::fit::ProductFit;
pub use render::frame::{
    FrameExecutor, FrameInputs, FrameRGBA, PixelShader, RenderThreading, render_frame,
    shade_pixel,
};
pub use render::renderer::FrameRenderer;
pub use render::warp::{
    DEPTH_SOFTNESS_EXPONENT, DISPLACEMENT_GAIN, MIN_PERSPECTIVE_FACTOR, OUTER_WARP_WEIGHT,
    WARP_WEIGHT_EPSILON, WarpEngine, combined_warp, depth_gradient, displacement_warp,
    perspective_warp, perspective_weight,
};
pub use scene::config::SceneConfig;
pub use session::editor::EditorSession;
pub use state::controller::{DEFAULT_WHEEL_SENSITIVITY, TransformController};
pub use state::input::{InputEvent, PointerKind, SliderParam};
pub use state::render_state::{
    BlendMode, DEFAULT_DEPTH_THRESHOLD, DEFAULT_DISTORTION, DEFAULT_OPACITY, DEFAULT_PERSPECTIVE,
    MAX_SCALE, MIN_SCALE, RenderState,
};
