use super::*;

fn gradient_2x2() -> Texture {
    // Top row: black, white. Bottom row: red, blue.
    Texture::from_rgba8(
        2,
        2,
        vec![
            0, 0, 0, 255, 255, 255, 255, 255, //
            255, 0, 0, 255, 0, 0, 255, 255,
        ],
    )
    .unwrap()
}

#[test]
fn from_rgba8_validates_length_and_size() {
    assert!(Texture::from_rgba8(2, 2, vec![0; 15]).is_err());
    assert!(Texture::from_rgba8(0, 2, vec![]).is_err());
    assert!(Texture::from_rgba8(1, 1, vec![1, 2, 3, 4]).is_ok());
}

#[test]
fn placeholder_is_transparent_1x1() {
    let t = Texture::transparent_placeholder();
    assert_eq!(t.size(), Canvas::new(1, 1).unwrap());
    assert_eq!(t.sample(Point::new(0.5, 0.5)), [0.0; 4]);
    assert_eq!(t.sample(Point::new(-3.0, 9.0)), [0.0; 4]);
}

#[test]
fn sample_at_texel_centers_is_exact_and_bottom_up() {
    let t = gradient_2x2();
    // v = 0.75 is the first (top) image row.
    assert_eq!(t.sample(Point::new(0.25, 0.75)), [0.0, 0.0, 0.0, 1.0]);
    assert_eq!(t.sample(Point::new(0.75, 0.75)), [1.0, 1.0, 1.0, 1.0]);
    // v = 0.25 is the bottom image row.
    assert_eq!(t.sample(Point::new(0.25, 0.25)), [1.0, 0.0, 0.0, 1.0]);
    assert_eq!(t.sample(Point::new(0.75, 0.25)), [0.0, 0.0, 1.0, 1.0]);
}

#[test]
fn sample_interpolates_between_texels() {
    let t = gradient_2x2();
    let mid_top = t.sample(Point::new(0.5, 0.75));
    assert!((mid_top[0] - 0.5).abs() < 1e-6);
    assert!((mid_top[3] - 1.0).abs() < 1e-6);
}

#[test]
fn sample_clamps_to_edge() {
    let t = gradient_2x2();
    assert_eq!(t.sample(Point::new(-1.0, 2.0)), t.texel(0, 0));
    assert_eq!(t.sample(Point::new(2.0, -1.0)), t.texel(1, 1));
}

#[test]
fn sample_red_reads_depth_channel() {
    let t = Texture::solid(3, 3, [51, 0, 0, 255]).unwrap();
    assert!((t.sample_red(Point::new(0.5, 0.5)) - 0.2).abs() < 1e-6);
}
