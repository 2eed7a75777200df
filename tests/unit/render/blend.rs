use super::*;

const EPS: f32 = 1e-6;

fn close3(a: [f32; 3], b: [f32; 3]) -> bool {
    a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < EPS)
}

#[test]
fn normal_with_full_alpha_is_pattern_exactly() {
    let base = [0.2, 0.4, 0.6, 1.0];
    let pat = [0.9, 0.1, 0.3, 1.0];
    let out = composite(base, pat, 1.0, 1.0, BlendMode::Normal);
    assert_eq!(out, [0.9, 0.1, 0.3, 1.0]);
}

#[test]
fn normal_half_alpha_documented_example() {
    let out = composite(
        [0.2, 0.2, 0.2, 1.0],
        [0.8, 0.8, 0.8, 1.0],
        1.0,
        0.5,
        BlendMode::Normal,
    );
    assert!(close3([out[0], out[1], out[2]], [0.5, 0.5, 0.5]));
}

#[test]
fn output_alpha_is_base_alpha() {
    for mode in BlendMode::ALL {
        let out = composite([0.3, 0.3, 0.3, 0.4], [1.0, 0.5, 0.0, 1.0], 1.0, 1.0, mode);
        assert_eq!(out[3], 0.4, "{mode}");
    }
}

#[test]
fn zero_alpha_returns_base_unchanged() {
    let base = [0.1, 0.2, 0.3, 0.9];
    for mode in BlendMode::ALL {
        assert_eq!(composite(base, [1.0, 1.0, 1.0, 0.0], 1.0, 1.0, mode), base);
        assert_eq!(composite(base, [1.0, 1.0, 1.0, 1.0], 0.0, 1.0, mode), base);
        assert_eq!(composite(base, [1.0, 1.0, 1.0, 1.0], 1.0, 0.0, mode), base);
    }
}

#[test]
fn separable_modes_match_formulas() {
    let b = [0.2, 0.6, 0.9];
    let s = [0.3, 0.7, 0.5];
    assert!(close3(blend_rgb(BlendMode::Multiply, b, s), [0.06, 0.42, 0.45]));
    assert!(close3(
        blend_rgb(BlendMode::Screen, b, s),
        [1.0 - 0.8 * 0.7, 1.0 - 0.4 * 0.3, 1.0 - 0.1 * 0.5]
    ));
    assert!(close3(blend_rgb(BlendMode::Darken, b, s), [0.2, 0.6, 0.5]));
    assert!(close3(blend_rgb(BlendMode::Lighten, b, s), [0.3, 0.7, 0.9]));
    assert!(close3(
        blend_rgb(BlendMode::Overlay, b, s),
        [2.0 * 0.2 * 0.3, 1.0 - 2.0 * 0.4 * 0.3, 1.0 - 2.0 * 0.1 * 0.5]
    ));
    assert_eq!(
        blend_rgb(BlendMode::Overlay, b, s),
        blend_rgb(BlendMode::HardLight, b, s)
    );
}

#[test]
fn dodge_and_burn_use_epsilon_denominators() {
    let d = blend_rgb(BlendMode::ColorDodge, [0.5, 0.5, 0.5], [1.0, 0.0, 0.5]);
    assert!((d[0] - 0.5 / 0.001).abs() < 1e-2);
    assert!((d[1] - 0.5 / 1.001).abs() < EPS);
    assert!((d[2] - 0.5 / 0.501).abs() < EPS);

    let c = blend_rgb(BlendMode::ColorBurn, [0.5, 0.5, 0.5], [0.0, 1.0, 0.5]);
    assert!((c[0] - (1.0 - 0.5 / 0.001)).abs() < 1e-2);
    assert!((c[1] - (1.0 - 0.5 / 1.001)).abs() < EPS);
    assert!((c[2] - (1.0 - 0.5 / 0.501)).abs() < EPS);
}

#[test]
fn soft_light_branches_and_continuity() {
    let b = 0.36f32;
    let low = blend_rgb(BlendMode::SoftLight, [b; 3], [0.25; 3])[0];
    assert!((low - (2.0 * b * 0.25 + b * b * 0.5)).abs() < EPS);
    let high = blend_rgb(BlendMode::SoftLight, [b; 3], [0.75; 3])[0];
    assert!((high - (0.6 * 0.5 + 2.0 * b * 0.25)).abs() < EPS);
    // Both branches meet at s = 0.5 with value b.
    let mid = blend_rgb(BlendMode::SoftLight, [b; 3], [0.5; 3])[0];
    assert!((mid - b).abs() < EPS);
    let below = blend_rgb(BlendMode::SoftLight, [b; 3], [0.4999; 3])[0];
    assert!((below - b).abs() < 1e-3);
}

#[test]
fn hologram_tints_with_rainbow() {
    // s.r = 0 -> hue 0 -> rainbow (1, 0, 0).
    let out = blend_rgb(BlendMode::Hologram, [0.5; 3], [0.0, 0.8, 0.8]);
    assert!(close3(out, [0.5 * 0.3, 0.5 * 0.3, 0.5 * 0.3]));

    // s.r = 1/12 -> hue 0.5 -> h = 3 -> rainbow (0, 1, 1).
    let s = [1.0 / 12.0, 0.6, 0.4];
    let out = blend_rgb(BlendMode::Hologram, [0.2; 3], s);
    assert!(close3(
        out,
        [0.2 * 0.3, 0.2 * 0.3 + 0.6 * 0.7, 0.2 * 0.3 + 0.4 * 0.7]
    ));
}

#[test]
fn depth_mask_is_monotone_with_hard_bounds() {
    let th = 0.7;
    let f = depth_feather(Canvas::new(800, 600).unwrap());
    assert!((f - 2.0 / 600.0).abs() < EPS);

    assert_eq!(depth_mask(th, f, th - f), 0.0);
    assert_eq!(depth_mask(th, f, 0.0), 0.0);
    assert_eq!(depth_mask(th, f, th + f), 1.0);
    assert_eq!(depth_mask(th, f, 1.0), 1.0);
    assert!((depth_mask(th, f, th) - 0.5).abs() < 1e-3);

    let mut prev = 0.0;
    for i in 0..=1000 {
        let d = i as f32 / 1000.0;
        let m = depth_mask(th, f, d);
        assert!(m >= prev, "mask decreased at depth {d}");
        prev = m;
    }
}
