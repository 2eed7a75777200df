use crate::foundation::core::Vec2;

/// Smallest determinant magnitude used when inverting a [`LinearMap2`].
pub const MIN_DETERMINANT: f64 = 1e-6;

/// Hermite smoothstep between edges `a` and `b`.
///
/// Degenerate edges (`a >= b`) behave as a hard step at `a`.
pub fn smoothstep(a: f32, b: f32, x: f32) -> f32 {
    if x <= a {
        return 0.0;
    }
    if x >= b {
        return 1.0;
    }
    let t = (x - a) / (b - a);
    (t * t * (3.0 - 2.0 * t)).clamp(0.0, 1.0)
}

/// Linear interpolation `a*(1-t) + b*t`.
pub fn mix(a: f32, b: f32, t: f32) -> f32 {
    a * (1.0 - t) + b * t
}

/// Linear interpolation between two vectors.
pub fn mix_vec2(a: Vec2, b: Vec2, t: f64) -> Vec2 {
    a * (1.0 - t) + b * t
}

/// Fractional part, always in `[0, 1)` for finite input.
pub fn fract(x: f32) -> f32 {
    x - x.floor()
}

/// A 2x2 linear map in row-major order.
///
/// `apply` computes `[[m00, m01], [m10, m11]] * v`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearMap2 {
    /// Row 0, column 0.
    pub m00: f64,
    /// Row 0, column 1.
    pub m01: f64,
    /// Row 1, column 0.
    pub m10: f64,
    /// Row 1, column 1.
    pub m11: f64,
}

impl LinearMap2 {
    /// Identity map.
    pub const IDENTITY: Self = Self {
        m00: 1.0,
        m01: 0.0,
        m10: 0.0,
        m11: 1.0,
    };

    /// Uniform scale with shear terms: `[[scale, skew_x], [skew_y, scale]]`.
    pub fn scale_skew(scale: f64, skew_x: f64, skew_y: f64) -> Self {
        Self {
            m00: scale,
            m01: skew_x,
            m10: skew_y,
            m11: scale,
        }
    }

    /// Raw determinant.
    pub fn determinant(self) -> f64 {
        self.m00 * self.m11 - self.m01 * self.m10
    }

    /// Determinant with its magnitude floored at [`MIN_DETERMINANT`], sign preserved.
    pub fn guarded_determinant(self) -> f64 {
        let det = self.determinant();
        if det.abs() < MIN_DETERMINANT {
            MIN_DETERMINANT.copysign(det)
        } else {
            det
        }
    }

    /// Forward map.
    pub fn apply(self, v: Vec2) -> Vec2 {
        Vec2::new(
            self.m00 * v.x + self.m01 * v.y,
            self.m10 * v.x + self.m11 * v.y,
        )
    }

    /// Inverse map via adjugate over the guarded determinant.
    ///
    /// Always finite for finite input; a near-singular map yields very large output instead of
    /// infinities.
    pub fn apply_inverse(self, v: Vec2) -> Vec2 {
        let det = self.guarded_determinant();
        Vec2::new(
            (self.m11 * v.x - self.m01 * v.y) / det,
            (-self.m10 * v.x + self.m00 * v.y) / det,
        )
    }
}

impl Default for LinearMap2 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
