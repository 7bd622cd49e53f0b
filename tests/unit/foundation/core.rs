use super::*;

#[test]
fn export_canvas_is_square_thousand() {
    let c = Canvas::export();
    assert_eq!(c, Canvas::square(1000));
    assert_eq!(c.dims_u16().unwrap(), (1000, 1000));
    assert_eq!(c.center(), Point::new(500.0, 500.0));
    assert!((c.reference_size() - 800.0).abs() < 1e-9);
}

#[test]
fn canvas_dims_reject_zero_and_oversized() {
    assert!(Canvas::square(0).dims_u16().is_err());
    assert!(
        Canvas {
            width: 70_000,
            height: 10
        }
        .dims_u16()
        .is_err()
    );
}

#[test]
fn scale_ratio_maps_preview_to_canvas() {
    let g = PreviewGeometry::with_width(500.0);
    assert!((g.scale_ratio(1000) - 2.0).abs() < 1e-12);

    assert_eq!(PreviewGeometry::default().scale_ratio(1000), 1.0);
    assert_eq!(PreviewGeometry::with_width(0.0).scale_ratio(1000), 1.0);
    assert_eq!(PreviewGeometry::with_width(f64::NAN).scale_ratio(1000), 1.0);
}

#[test]
fn clamp_scale_bounds() {
    assert_eq!(clamp_scale(5.0), MAX_ACCESSORY_SCALE);
    assert_eq!(clamp_scale(0.0), MIN_ACCESSORY_SCALE);
    assert_eq!(clamp_scale(1.25), 1.25);
}

#[test]
fn premul_rounds_half_up() {
    let c = Rgba8Premul::from_straight_rgba(255, 128, 0, 128);
    assert_eq!(c.r, 128);
    assert_eq!(c.g, 64);
    assert_eq!(c.b, 0);
    assert_eq!(c.a, 128);
    assert_eq!(Rgba8Premul::transparent().a, 0);
}
