use super::*;

const EPS: f64 = 1e-9;

fn ramp_x() -> Texture {
    // Four columns of depth 0, 85, 170, 255; identical rows.
    let row: Vec<u8> = [0u8, 85, 170, 255]
        .iter()
        .flat_map(|&v| [v, v, v, 255])
        .collect();
    Texture::from_rgba8(4, 2, row.repeat(2)).unwrap()
}

fn canvas(w: u32, h: u32) -> Canvas {
    Canvas::new(w, h).unwrap()
}

#[test]
fn flat_depth_has_zero_gradient() {
    let flat = Texture::solid(8, 8, [128, 128, 128, 255]).unwrap();
    let g = depth_gradient(&flat, Point::new(0.5, 0.5), Vec2::new(0.125, 0.125));
    assert_eq!(g, Vec2::ZERO);
}

#[test]
fn ramp_gradient_is_raw_central_difference() {
    let g = depth_gradient(&ramp_x(), Point::new(0.5, 0.5), Vec2::new(0.25, 0.25));
    assert!((g.x - 170.0 / 255.0).abs() < 1e-6);
    assert!(g.y.abs() < 1e-6);
}

#[test]
fn displacement_scales_with_gain_strength_and_depth() {
    let p = displacement_warp(Point::new(10.0, 10.0), Vec2::new(0.5, 0.0), 1.0, 0.3);
    assert!((p.x - 40.0).abs() < EPS);
    assert!((p.y - 10.0).abs() < EPS);

    let none = displacement_warp(Point::new(10.0, 10.0), Vec2::new(0.5, 0.5), 0.0, 1.0);
    assert_eq!(none, Point::new(10.0, 10.0));

    let half = displacement_warp(Point::ZERO, Vec2::new(1.0, 0.0), 0.5, 1.0);
    assert!((half.x - 200.0 * 0.5f64.powf(0.7)).abs() < EPS);
}

#[test]
fn perspective_scales_radially_about_center() {
    let c = Point::new(50.0, 50.0);
    let p = perspective_warp(Point::new(60.0, 50.0), c, 1.0, 1.0);
    assert!((p.x - 65.0).abs() < EPS);
    assert_eq!(perspective_warp(Point::new(60.0, 40.0), c, 0.5, 3.0), Point::new(60.0, 40.0));

    // Factor floors at MIN_PERSPECTIVE_FACTOR.
    let clamped = perspective_warp(Point::new(60.0, 50.0), c, 0.0, 10.0);
    assert!((clamped.x - (50.0 + 10.0 * MIN_PERSPECTIVE_FACTOR)).abs() < EPS);
}

#[test]
fn perspective_weight_is_relative_strength() {
    assert_eq!(perspective_weight(0.3, 0.0), 0.0);
    assert!((perspective_weight(0.0, 1.0) - 1.0 / 1.001).abs() < EPS);
    assert!((perspective_weight(1.0, 1.0) - 1.0 / 2.001).abs() < EPS);
    // Cancelling strengths stay finite.
    assert!(perspective_weight(0.5, -0.501).is_finite());
}

#[test]
fn combined_warp_is_identity_without_strength() {
    let p = Point::new(12.0, 34.0);
    let q = combined_warp(p, Point::new(50.0, 50.0), Vec2::new(0.4, -0.2), 0.9, 0.0, 0.0);
    assert_eq!(q, p);
}

#[test]
fn combined_warp_mixes_displaced_and_projected() {
    let screen = Point::new(70.0, 50.0);
    let center = Point::new(50.0, 50.0);
    let grad = Vec2::new(0.1, 0.0);
    let (depth, dist, pers) = (1.0, 0.5, 1.0);

    let displaced = displacement_warp(screen, grad, depth, dist);
    let projected = perspective_warp(displaced, center, depth, pers);
    let w = pers / (dist + pers + WARP_WEIGHT_EPSILON);
    let expected = displaced + (projected - displaced) * w;

    let got = combined_warp(screen, center, grad, depth, dist, pers);
    assert!((got - expected).hypot() < 1e-9);
}

#[test]
fn pattern_uv_centers_pattern_on_canvas() {
    let state = RenderState::default();
    let engine = WarpEngine::new(canvas(100, 100), canvas(10, 10), &state);
    let c = Point::new(50.0, 50.0);

    let uv = engine.pattern_uv(c).unwrap();
    assert!((uv - Point::new(0.5, 0.5)).hypot() < EPS);
    let corner = engine.pattern_uv(c + Vec2::new(5.0, 5.0)).unwrap();
    assert!((corner - Point::new(1.0, 1.0)).hypot() < EPS);
    assert!(engine.pattern_uv(c + Vec2::new(6.0, 0.0)).is_none());
}

#[test]
fn pattern_uv_applies_translate_and_inverse_scale() {
    let state = RenderState {
        translate: Vec2::new(20.0, 0.0),
        scale: 2.0,
        ..RenderState::default()
    };
    let engine = WarpEngine::new(canvas(100, 100), canvas(10, 10), &state);
    let c = Point::new(50.0, 50.0);

    let uv = engine.pattern_uv(c + Vec2::new(20.0, 0.0)).unwrap();
    assert!((uv - Point::new(0.5, 0.5)).hypot() < EPS);
    let edge = engine.pattern_uv(c + Vec2::new(30.0, 0.0)).unwrap();
    assert!((edge.x - 1.0).abs() < EPS);
}

#[test]
fn singular_transform_pushes_pattern_out_of_view() {
    let state = RenderState {
        scale: 0.01,
        skew_x: 0.01,
        skew_y: 0.01,
        ..RenderState::default()
    };
    let engine = WarpEngine::new(canvas(100, 100), canvas(10, 10), &state);
    let px = engine.to_pattern_px(Point::new(53.0, 51.0));
    assert!(px.x.is_finite() && px.y.is_finite());
    assert!(engine.pattern_uv(Point::new(53.0, 51.0)).is_none());
}

#[test]
fn engine_warp_uses_canvas_texel_step() {
    let state = RenderState {
        distortion: 1.0,
        perspective: 0.0,
        ..RenderState::default()
    };
    let engine = WarpEngine::new(canvas(4, 4), canvas(1, 1), &state);
    let screen = Point::new(2.0, 2.0);
    let warped = engine.warp(screen, Point::new(0.5, 0.5), 1.0, &ramp_x());
    let expected_dx = (170.0 / 255.0) * DISPLACEMENT_GAIN;
    assert!((warped.x - (2.0 + expected_dx)).abs() < 1e-4);
    assert!((warped.y - 2.0).abs() < 1e-6);
}
