use std::sync::Arc;

use rayon::prelude::*;

use crate::assets::texture::Texture;
use crate::foundation::core::{Canvas, Point, Rgbaf};
use crate::foundation::error::{StampError, StampResult};
use crate::render::blend::{MASK_CUTOFF, composite, depth_feather, depth_mask};
use crate::render::fit::ProductFit;
use crate::render::warp::WarpEngine;
use crate::state::render_state::RenderState;

/// Rendered frame in row-major RGBA8, top row first.
///
/// Stamp frames are straight alpha (`premultiplied == false`): the product's own alpha passes
/// through unchanged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// `width * height * 4` bytes.
    pub data: Vec<u8>,
    /// Always `false` for frames produced here.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Fully transparent frame.
    pub fn transparent(size: Canvas) -> StampResult<Self> {
        let len = checked_frame_len(size)?;
        Ok(Self {
            width: size.width,
            height: size.height,
            data: vec![0; len],
            premultiplied: false,
        })
    }

    /// Frame dimensions.
    pub fn size(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    /// Pixel at `(x, y)`, top row first.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        [
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ]
    }

    /// Whether every pixel has zero alpha.
    pub fn is_fully_transparent(&self) -> bool {
        self.data.chunks_exact(4).all(|px| px[3] == 0)
    }
}

/// How the per-pixel pass is dispatched.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RenderThreading {
    /// Shade rows on the rayon pool instead of the calling thread.
    pub parallel: bool,
    /// Dedicated pool size. `None` uses the global rayon pool.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threads: Option<usize>,
}

impl Default for RenderThreading {
    fn default() -> Self {
        Self {
            parallel: true,
            threads: None,
        }
    }
}

/// Snapshot of everything one frame reads.
///
/// Taken on the control thread; the pixel pass only reads it.
#[derive(Clone, Debug)]
pub struct FrameInputs {
    /// Logical canvas the composite is evaluated in.
    pub viewport: Canvas,
    /// Product color image.
    pub product: Arc<Texture>,
    /// Depth map; the product itself when no depth map is bound.
    pub depth: Arc<Texture>,
    /// Pattern; the transparent placeholder when no pattern is bound.
    pub pattern: Arc<Texture>,
    /// State snapshot for this frame.
    pub state: RenderState,
}

/// Per-frame constants plus the pure per-pixel function.
#[derive(Clone, Copy, Debug)]
pub struct PixelShader<'a> {
    inputs: &'a FrameInputs,
    fit: ProductFit,
    engine: WarpEngine,
    feather: f32,
}

impl<'a> PixelShader<'a> {
    /// Derive fit, warp and mask constants from `inputs`.
    pub fn new(inputs: &'a FrameInputs) -> Self {
        Self {
            inputs,
            fit: ProductFit::new(inputs.viewport, inputs.product.size()),
            engine: WarpEngine::new(inputs.viewport, inputs.pattern.size(), &inputs.state),
            feather: depth_feather(inputs.viewport),
        }
    }

    /// Shade one destination pixel given its canvas UV (origin bottom-left).
    pub fn shade(&self, uv: Point) -> Rgbaf {
        let Some(product_uv) = self.fit.product_uv(uv) else {
            return [0.0; 4];
        };

        let base = self.inputs.product.sample(product_uv);
        let depth = self.inputs.depth.sample_red(product_uv);
        let state = &self.inputs.state;

        let mask = depth_mask(state.depth_threshold, self.feather, depth);
        if mask < MASK_CUTOFF {
            return base;
        }

        let size = self.inputs.viewport.size();
        let screen = Point::new(uv.x * size.x, uv.y * size.y);
        let warped = self
            .engine
            .warp(screen, product_uv, f64::from(depth), &self.inputs.depth);
        let Some(pattern_uv) = self.engine.pattern_uv(warped) else {
            return base;
        };

        let pat = self.inputs.pattern.sample(pattern_uv);
        composite(base, pat, mask, state.opacity, state.blend_mode)
    }
}

/// Shade one pixel of `inputs` at canvas UV `uv`.
pub fn shade_pixel(inputs: &FrameInputs, uv: Point) -> Rgbaf {
    PixelShader::new(inputs).shade(uv)
}

/// Dispatches the per-pixel pass according to a [`RenderThreading`].
#[derive(Debug)]
pub struct FrameExecutor {
    parallel: bool,
    pool: Option<rayon::ThreadPool>,
}

impl FrameExecutor {
    /// Validate `threading` and build a dedicated pool when a thread count is set.
    pub fn new(threading: &RenderThreading) -> StampResult<Self> {
        let pool = match threading.threads {
            Some(n) if threading.parallel => Some(build_thread_pool(n)?),
            Some(0) => {
                return Err(StampError::validation(
                    "render threading 'threads' must be >= 1 when set",
                ));
            }
            _ => None,
        };
        Ok(Self {
            parallel: threading.parallel,
            pool,
        })
    }

    /// Render `inputs` onto an `output`-sized sampling grid.
    ///
    /// The composite is always evaluated in viewport space; `output` only decides how densely it
    /// is sampled.
    pub fn render(&self, inputs: &FrameInputs, output: Canvas) -> StampResult<FrameRGBA> {
        if inputs.viewport.is_empty() {
            return Err(StampError::validation("viewport width and height must be > 0"));
        }
        let mut frame = FrameRGBA::transparent(output)?;
        let shader = PixelShader::new(inputs);
        let row_bytes = (output.width as usize) * 4;
        let shade_row = |(row, out): (usize, &mut [u8])| {
            shade_row_into(&shader, output, row as u32, out);
        };

        if !self.parallel {
            frame.data.chunks_mut(row_bytes).enumerate().for_each(shade_row);
            return Ok(frame);
        }

        match &self.pool {
            Some(pool) => pool.install(|| {
                frame
                    .data
                    .par_chunks_mut(row_bytes)
                    .enumerate()
                    .for_each(shade_row)
            }),
            None => frame
                .data
                .par_chunks_mut(row_bytes)
                .enumerate()
                .for_each(shade_row),
        }
        Ok(frame)
    }
}

/// One-shot render with a freshly built executor.
#[tracing::instrument(skip(inputs), fields(viewport = ?inputs.viewport))]
pub fn render_frame(
    inputs: &FrameInputs,
    output: Canvas,
    threading: &RenderThreading,
) -> StampResult<FrameRGBA> {
    FrameExecutor::new(threading)?.render(inputs, output)
}

fn shade_row_into(shader: &PixelShader<'_>, output: Canvas, row: u32, out: &mut [u8]) {
    let w = f64::from(output.width);
    let h = f64::from(output.height);
    // Row 0 is the top of the image; UV v grows upward.
    let v = 1.0 - (f64::from(row) + 0.5) / h;
    for (col, px) in out.chunks_exact_mut(4).enumerate() {
        let u = (col as f64 + 0.5) / w;
        let c = shader.shade(Point::new(u, v));
        for (dst, src) in px.iter_mut().zip(c) {
            *dst = quantize(src);
        }
    }
}

#[inline]
fn quantize(c: f32) -> u8 {
    (c.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn checked_frame_len(size: Canvas) -> StampResult<usize> {
    if size.is_empty() {
        return Err(StampError::validation("frame width and height must be > 0"));
    }
    size.rgba8_len()
}

fn build_thread_pool(threads: usize) -> StampResult<rayon::ThreadPool> {
    if threads == 0 {
        return Err(StampError::validation(
            "render threading 'threads' must be >= 1 when set",
        ));
    }
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(|e| StampError::render(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame.rs"]
mod tests;
