use chart_transformer::core::{Point, Rect, Transformer, ViewPortHandler};
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn build_view_port() -> ViewPortHandler {
    let mut view_port = ViewPortHandler::new(1920.0, 1080.0).expect("view port");
    view_port.restrain_view_port(60.0, 20.0, 80.0, 40.0);
    let zoomed = view_port.zoom(2.5, 1.5, 400.0, -300.0);
    view_port.refresh(zoomed);
    view_port
}

fn bench_point_round_trip(c: &mut Criterion) {
    let view_port = build_view_port();
    let mut transformer = Transformer::new(&view_port);
    transformer.prepare_value_to_pixel_matrix(0.0, 10_000.0, 2_500.0, 0.0);
    transformer.prepare_offset_matrix(false);

    c.bench_function("point_round_trip", |b| {
        b.iter(|| {
            let px = transformer.pixel_for_values(black_box(4_321.123), black_box(1_234.5));
            let _ = transformer.value_for_touch_point(px);
        })
    });
}

fn bench_points_to_pixels_10k(c: &mut Criterion) {
    let view_port = build_view_port();
    let mut transformer = Transformer::new(&view_port);
    transformer.prepare_value_to_pixel_matrix(0.0, 10_001.0, 2_500.0, 0.0);
    transformer.prepare_offset_matrix(false);

    let values: Vec<Point> = (0..10_000)
        .map(|i| {
            let t = i as f64;
            Point::new(t, 100.0 + t * 0.05)
        })
        .collect();

    c.bench_function("points_to_pixels_10k", |b| {
        b.iter(|| {
            let mut points = values.clone();
            transformer.points_to_pixels(black_box(&mut points));
            points
        })
    });
}

fn bench_rects_to_pixels_with_phase_2k(c: &mut Criterion) {
    let view_port = build_view_port();
    let mut transformer = Transformer::new(&view_port);
    transformer.prepare_value_to_pixel_matrix(0.0, 2_001.0, 2_500.0, 0.0);
    transformer.prepare_offset_matrix(false);

    let bars: Vec<Rect> = (0..2_000)
        .map(|i| {
            let t = i as f64;
            Rect::new(t - 0.35, 0.0, 0.7, 400.0 + t * 0.03)
        })
        .collect();

    c.bench_function("rects_to_pixels_with_phase_2k", |b| {
        b.iter(|| {
            bars.iter()
                .map(|bar| transformer.rect_to_pixels_with_phase(*bar, black_box(0.6)))
                .collect::<Vec<_>>()
        })
    });
}

criterion_group!(
    benches,
    bench_point_round_trip,
    bench_points_to_pixels_10k,
    bench_rects_to_pixels_with_phase_2k
);
criterion_main!(benches);
