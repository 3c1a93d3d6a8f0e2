use chart_transformer::core::{Point, Rect, Transformer, ViewPortHandler};
use proptest::prelude::*;

fn build_view_port(
    chart_width: f64,
    chart_height: f64,
    offset_left: f64,
    offset_top: f64,
    zoom: f64,
) -> ViewPortHandler {
    let mut view_port = ViewPortHandler::new(chart_width, chart_height).expect("view port");
    view_port.restrain_view_port(offset_left, offset_top, 15.0, 25.0);
    let zoomed = view_port.zoom(zoom, zoom, 0.0, 0.0);
    view_port.refresh(zoomed);
    view_port
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn value_pixel_value_roundtrip_is_stable(
        chart_width in 200.0f64..2400.0,
        chart_height in 150.0f64..1400.0,
        offset_left in 0.0f64..80.0,
        offset_top in 0.0f64..60.0,
        zoom in 1.0f64..8.0,
        x_min in -1.0e6f64..1.0e6,
        y_min in -1.0e4f64..1.0e4,
        delta_x in 1.0e-3f64..1.0e6,
        delta_y in 1.0e-3f64..1.0e4,
        inverted in any::<bool>(),
        x_ratio in 0.0f64..1.0,
        y_ratio in 0.0f64..1.0,
    ) {
        let view_port = build_view_port(chart_width, chart_height, offset_left, offset_top, zoom);
        let mut transformer = Transformer::new(&view_port);
        transformer.prepare_value_to_pixel_matrix(x_min, delta_x, delta_y, y_min);
        transformer.prepare_offset_matrix(inverted);
        prop_assume!(!transformer.pixel_to_value_inversion().is_degenerate());

        let original = Point::new(x_min + x_ratio * delta_x, y_min + y_ratio * delta_y);
        let pixel = transformer.point_to_pixel(original);
        let recovered = transformer.pixel_to_values(pixel);

        let tolerance_x = 1e-9 * (x_min.abs() + delta_x).max(1.0);
        let tolerance_y = 1e-9 * (y_min.abs() + delta_y).max(1.0);
        prop_assert!((recovered.x - original.x).abs() <= tolerance_x);
        prop_assert!((recovered.y - original.y).abs() <= tolerance_y);
    }

    #[test]
    fn zero_delta_never_produces_non_finite_pixels(
        x_min in -1.0e6f64..1.0e6,
        y_min in -1.0e4f64..1.0e4,
        zero_x in any::<bool>(),
        x in -1.0e6f64..1.0e6,
        y in -1.0e4f64..1.0e4,
    ) {
        let view_port = build_view_port(800.0, 600.0, 40.0, 10.0, 1.0);
        let mut transformer = Transformer::new(&view_port);
        let (delta_x, delta_y) = if zero_x { (0.0, 10.0) } else { (10.0, 0.0) };
        transformer.prepare_value_to_pixel_matrix(x_min, delta_x, delta_y, y_min);
        transformer.prepare_offset_matrix(false);

        prop_assert!(transformer.pixel_for_values(x, y).is_finite());
        prop_assert!(transformer.value_for_touch_coordinates(x, y).is_finite());
    }

    #[test]
    fn phased_rect_stays_within_unphased_rect_for_non_negative_values(
        x in 0.0f64..90.0,
        y in 0.0f64..40.0,
        width in 0.0f64..10.0,
        height in 0.0f64..10.0,
        phase in 0.0f64..=1.0,
    ) {
        let view_port = build_view_port(1100.0, 550.0, 50.0, 20.0, 1.0);
        let mut transformer = Transformer::new(&view_port);
        transformer.prepare_value_to_pixel_matrix(0.0, 100.0, 50.0, 0.0);
        transformer.prepare_offset_matrix(false);

        let rect = Rect::new(x, y, width, height);
        let full = transformer.rect_to_pixels(Rect::new(x, 0.0, width, y + height));
        let phased = transformer.rect_to_pixels_with_phase(rect, phase);

        prop_assert!(phased.height >= 0.0);
        prop_assert!(phased.height <= full.height + 1e-9);
        prop_assert!(phased.y + phased.height <= full.y + full.height + 1e-9);
        prop_assert!(phased.y >= full.y - 1e-9);
    }
}
