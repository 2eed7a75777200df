use crate::foundation::core::{Canvas, Point, Vec2};

/// Aspect-preserving, centered placement of the product image inside the canvas.
///
/// Quantities are in "aspect units": each size divided by its own longer side.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProductFit {
    /// Canvas size normalized by its longer side.
    pub canvas_aspect: Vec2,
    /// Product size normalized by its longer side.
    pub product_aspect: Vec2,
    /// Uniform factor fitting the product inside the canvas.
    pub scale: f64,
    /// Fitted product size in aspect units.
    pub scaled_size: Vec2,
    /// Margin before the product on each axis, in aspect units.
    pub offset: Vec2,
}

impl ProductFit {
    /// Compute the placement. Recompute whenever either size changes.
    pub fn new(canvas: Canvas, product: Canvas) -> Self {
        let canvas_aspect = canvas.size() / canvas.max_side();
        let product_aspect = product.size() / product.max_side();

        let scale = (canvas_aspect.x / product_aspect.x).min(canvas_aspect.y / product_aspect.y);
        let scaled_size = product_aspect * scale;
        let offset = (canvas_aspect - scaled_size) * 0.5;

        Self {
            canvas_aspect,
            product_aspect,
            scale,
            scaled_size,
            offset,
        }
    }

    /// Map a canvas UV to product UV without bounds checks.
    pub fn map_uv(&self, uv: Point) -> Point {
        Point::new(
            (uv.x * self.canvas_aspect.x - self.offset.x) / self.scaled_size.x,
            (uv.y * self.canvas_aspect.y - self.offset.y) / self.scaled_size.y,
        )
    }

    /// Product UV for a canvas UV, or `None` in the letterbox/pillarbox margins.
    pub fn product_uv(&self, uv: Point) -> Option<Point> {
        let p = self.map_uv(uv);
        let inside = (0.0..=1.0).contains(&p.x) && (0.0..=1.0).contains(&p.y);
        inside.then_some(p)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/fit.rs"]
mod tests;
