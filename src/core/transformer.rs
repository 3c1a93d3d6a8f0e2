#[cfg(feature = "parallel-projection")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::affine::{AffineTransform, Inversion};
use crate::core::primitives::finite_or_zero;
use crate::core::types::{Point, Rect};
use crate::core::view_port::ViewPort;

/// Which axis the offset transform mirrors when the chart is inverted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OffsetOrientation {
    /// Value axis is vertical; inversion flips Y.
    #[default]
    Vertical,
    /// Value axis is horizontal (horizontal bar charts); inversion flips X.
    Horizontal,
}

/// Converts between value space and pixel space.
///
/// Holds the value-to-pixel and offset transforms and reads the pan/zoom
/// touch matrix from the view port on every call. The composite matrix is
/// always `value -> touch -> offset`: a point is first scaled into content
/// pixels, then panned/zoomed, then moved into the content rectangle.
#[derive(Debug, Clone)]
pub struct Transformer<V> {
    view_port: V,
    orientation: OffsetOrientation,
    matrix_value_to_px: AffineTransform,
    matrix_offset: AffineTransform,
}

impl<V: ViewPort> Transformer<V> {
    #[must_use]
    pub fn new(view_port: V) -> Self {
        Self::with_orientation(view_port, OffsetOrientation::Vertical)
    }

    /// Transformer for horizontal bar charts.
    #[must_use]
    pub fn horizontal_bar(view_port: V) -> Self {
        Self::with_orientation(view_port, OffsetOrientation::Horizontal)
    }

    #[must_use]
    pub fn with_orientation(view_port: V, orientation: OffsetOrientation) -> Self {
        Self {
            view_port,
            orientation,
            matrix_value_to_px: AffineTransform::IDENTITY,
            matrix_offset: AffineTransform::IDENTITY,
        }
    }

    #[must_use]
    pub fn view_port(&self) -> &V {
        &self.view_port
    }

    #[must_use]
    pub fn orientation(&self) -> OffsetOrientation {
        self.orientation
    }

    /// The locally held value-to-pixel scale/translate transform.
    #[must_use]
    pub fn value_transform(&self) -> AffineTransform {
        self.matrix_value_to_px
    }

    /// The locally held content offset transform.
    #[must_use]
    pub fn offset_transform(&self) -> AffineTransform {
        self.matrix_offset
    }

    /// Rebuilds the value-to-pixel transform for the given chart extents.
    ///
    /// A zero `delta_x` or `delta_y` yields a zero scale on that axis, so every
    /// value collapses onto one coordinate instead of becoming non-finite.
    pub fn prepare_value_to_pixel_matrix(
        &mut self,
        x_min: f64,
        delta_x: f64,
        delta_y: f64,
        y_min: f64,
    ) {
        let raw_scale_x = self.view_port.content_width() / delta_x;
        let raw_scale_y = self.view_port.content_height() / delta_y;
        let scale_x = finite_or_zero(raw_scale_x);
        let scale_y = finite_or_zero(raw_scale_y);

        if scale_x != raw_scale_x || scale_y != raw_scale_y {
            debug!(delta_x, delta_y, "normalized non-finite value scale to zero");
        }

        self.matrix_value_to_px = AffineTransform::IDENTITY
            .scaled_by(scale_x, -scale_y)
            .translated_by(-x_min, -y_min);

        trace!(x_min, y_min, scale_x, scale_y, "prepared value-to-pixel matrix");
    }

    /// Rebuilds the offset transform from the current view port offsets.
    pub fn prepare_offset_matrix(&mut self, inverted: bool) {
        let vp = &self.view_port;
        self.matrix_offset = match (inverted, self.orientation) {
            (false, _) => AffineTransform::translation(
                vp.offset_left(),
                vp.chart_height() - vp.offset_bottom(),
            ),
            (true, OffsetOrientation::Vertical) => AffineTransform::scaling(1.0, -1.0)
                .translated_by(vp.offset_left(), -vp.offset_top()),
            (true, OffsetOrientation::Horizontal) => AffineTransform::scaling(-1.0, 1.0)
                .translated_by(
                    -(vp.chart_width() - vp.offset_right()),
                    vp.chart_height() - vp.offset_bottom(),
                ),
        };

        trace!(inverted, orientation = ?self.orientation, "prepared offset matrix");
    }

    /// Composite value-to-pixel matrix, recomputed from the live touch matrix.
    #[must_use]
    pub fn value_to_pixel_matrix(&self) -> AffineTransform {
        self.matrix_value_to_px
            .concatenating(self.view_port.touch_matrix())
            .concatenating(self.matrix_offset)
    }

    /// Inverse of [`Self::value_to_pixel_matrix`], tagged as degenerate when the
    /// composite cannot be inverted.
    #[must_use]
    pub fn pixel_to_value_inversion(&self) -> Inversion {
        let inversion = self.value_to_pixel_matrix().inversion();
        if inversion.is_degenerate() {
            debug!("value-to-pixel matrix is singular; pixel mapping falls back to forward matrix");
        }
        inversion
    }

    /// Inverse of [`Self::value_to_pixel_matrix`].
    ///
    /// When the composite is singular this returns the forward matrix
    /// unchanged; use [`Self::pixel_to_value_inversion`] to detect that case.
    #[must_use]
    pub fn pixel_to_value_matrix(&self) -> AffineTransform {
        self.pixel_to_value_inversion().transform()
    }

    #[must_use]
    pub fn point_to_pixel(&self, point: Point) -> Point {
        self.value_to_pixel_matrix().apply_to_point(point)
    }

    /// Transforms value-space points into pixels in place.
    pub fn points_to_pixels(&self, points: &mut [Point]) {
        map_points(self.value_to_pixel_matrix(), points);
    }

    #[must_use]
    pub fn pixel_for_values(&self, x: f64, y: f64) -> Point {
        self.point_to_pixel(Point::new(x, y))
    }

    #[must_use]
    pub fn rect_to_pixels(&self, rect: Rect) -> Rect {
        self.value_to_pixel_matrix().apply_to_rect(rect)
    }

    /// Transforms a rect after scaling its vertical extent by `phase_y`.
    #[must_use]
    pub fn rect_to_pixels_with_phase(&self, rect: Rect, phase_y: f64) -> Rect {
        self.rect_to_pixels(scale_vertical_extent(rect, phase_y))
    }

    #[must_use]
    pub fn rect_to_pixels_horizontal(&self, rect: Rect) -> Rect {
        self.rect_to_pixels(rect)
    }

    /// Transforms a rect after scaling its horizontal extent by `phase_y`.
    #[must_use]
    pub fn rect_to_pixels_horizontal_with_phase(&self, rect: Rect, phase_y: f64) -> Rect {
        self.rect_to_pixels(scale_horizontal_extent(rect, phase_y))
    }

    /// Transforms value-space rects into pixels in place.
    pub fn rects_to_pixels(&self, rects: &mut [Rect]) {
        map_rects(self.value_to_pixel_matrix(), rects);
    }

    #[must_use]
    pub fn pixel_to_values(&self, pixel: Point) -> Point {
        self.pixel_to_value_matrix().apply_to_point(pixel)
    }

    /// Transforms pixel points back into value space in place.
    pub fn pixels_to_values(&self, pixels: &mut [Point]) {
        map_points(self.pixel_to_value_matrix(), pixels);
    }

    #[must_use]
    pub fn value_for_touch_point(&self, point: Point) -> Point {
        self.pixel_to_values(point)
    }

    #[must_use]
    pub fn value_for_touch_coordinates(&self, x: f64, y: f64) -> Point {
        self.pixel_to_values(Point::new(x, y))
    }
}

fn scale_vertical_extent(rect: Rect, phase_y: f64) -> Rect {
    let top = rect.y * phase_y;
    let bottom = (rect.y + rect.height) * phase_y;
    Rect {
        y: top,
        height: bottom - top,
        ..rect
    }
}

fn scale_horizontal_extent(rect: Rect, phase: f64) -> Rect {
    let left = rect.x * phase;
    let right = (rect.x + rect.width) * phase;
    Rect {
        x: left,
        width: right - left,
        ..rect
    }
}

fn map_points(matrix: AffineTransform, points: &mut [Point]) {
    #[cfg(feature = "parallel-projection")]
    {
        points
            .par_iter_mut()
            .for_each(|point| *point = matrix.apply_to_point(*point));
    }

    #[cfg(not(feature = "parallel-projection"))]
    {
        for point in points.iter_mut() {
            *point = matrix.apply_to_point(*point);
        }
    }
}

fn map_rects(matrix: AffineTransform, rects: &mut [Rect]) {
    #[cfg(feature = "parallel-projection")]
    {
        rects
            .par_iter_mut()
            .for_each(|rect| *rect = matrix.apply_to_rect(*rect));
    }

    #[cfg(not(feature = "parallel-projection"))]
    {
        for rect in rects.iter_mut() {
            *rect = matrix.apply_to_rect(*rect);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{scale_horizontal_extent, scale_vertical_extent};
    use crate::core::types::Rect;

    #[test]
    fn vertical_phase_scales_top_and_bottom_edges() {
        let rect = scale_vertical_extent(Rect::new(1.0, 10.0, 2.0, 30.0), 0.5);
        assert_eq!(rect, Rect::new(1.0, 5.0, 2.0, 15.0));
    }

    #[test]
    fn horizontal_phase_scales_left_and_right_edges() {
        let rect = scale_horizontal_extent(Rect::new(4.0, 1.0, 8.0, 2.0), 0.25);
        assert_eq!(rect, Rect::new(1.0, 1.0, 2.0, 2.0));
    }
}
