use std::cell::RefCell;
use std::rc::Rc;
use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::affine::AffineTransform;
use crate::core::types::{Point, Rect};
use crate::error::{ChartError, ChartResult};

/// Read-only view of the chart surface consumed by the transformer.
///
/// Every accessor must report live state. Implementations for shared handles
/// (`Rc<RefCell<_>>`, `Arc<RwLock<_>>`) borrow on each call, so mutations made
/// between transformer calls are always observed.
pub trait ViewPort {
    fn chart_width(&self) -> f64;
    fn chart_height(&self) -> f64;
    fn offset_left(&self) -> f64;
    fn offset_top(&self) -> f64;
    fn offset_right(&self) -> f64;
    fn offset_bottom(&self) -> f64;
    fn content_width(&self) -> f64;
    fn content_height(&self) -> f64;
    /// Current pan/zoom transform.
    fn touch_matrix(&self) -> AffineTransform;
}

macro_rules! forward_view_port {
    ($recv:ident => $target:expr) => {
        fn chart_width(&$recv) -> f64 {
            $target.chart_width()
        }
        fn chart_height(&$recv) -> f64 {
            $target.chart_height()
        }
        fn offset_left(&$recv) -> f64 {
            $target.offset_left()
        }
        fn offset_top(&$recv) -> f64 {
            $target.offset_top()
        }
        fn offset_right(&$recv) -> f64 {
            $target.offset_right()
        }
        fn offset_bottom(&$recv) -> f64 {
            $target.offset_bottom()
        }
        fn content_width(&$recv) -> f64 {
            $target.content_width()
        }
        fn content_height(&$recv) -> f64 {
            $target.content_height()
        }
        fn touch_matrix(&$recv) -> AffineTransform {
            $target.touch_matrix()
        }
    };
}

impl<V: ViewPort + ?Sized> ViewPort for &V {
    forward_view_port!(self => (**self));
}

impl<V: ViewPort + ?Sized> ViewPort for Rc<RefCell<V>> {
    forward_view_port!(self => self.borrow());
}

impl<V: ViewPort + ?Sized> ViewPort for Arc<RwLock<V>> {
    forward_view_port!(self => self.read().unwrap_or_else(PoisonError::into_inner));
}

/// Pan/zoom limits applied whenever the touch matrix is refreshed.
///
/// This type is serializable so host applications can persist gesture limits
/// alongside the rest of their chart setup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewPortConfig {
    #[serde(default = "default_min_scale")]
    pub min_scale_x: f64,
    #[serde(default = "default_max_scale")]
    pub max_scale_x: f64,
    #[serde(default = "default_min_scale")]
    pub min_scale_y: f64,
    #[serde(default = "default_max_scale")]
    pub max_scale_y: f64,
    /// Horizontal overscroll allowed past the content edges, in pixels.
    #[serde(default)]
    pub drag_offset_x: f64,
    /// Vertical overscroll allowed past the content edges, in pixels.
    #[serde(default)]
    pub drag_offset_y: f64,
}

impl Default for ViewPortConfig {
    fn default() -> Self {
        Self {
            min_scale_x: default_min_scale(),
            max_scale_x: default_max_scale(),
            min_scale_y: default_min_scale(),
            max_scale_y: default_max_scale(),
            drag_offset_x: 0.0,
            drag_offset_y: 0.0,
        }
    }
}

impl ViewPortConfig {
    /// Sets the horizontal zoom limits.
    #[must_use]
    pub fn with_scale_x_limits(mut self, min: f64, max: f64) -> Self {
        self.min_scale_x = min;
        self.max_scale_x = max;
        self
    }

    /// Sets the vertical zoom limits.
    #[must_use]
    pub fn with_scale_y_limits(mut self, min: f64, max: f64) -> Self {
        self.min_scale_y = min;
        self.max_scale_y = max;
        self
    }

    #[must_use]
    pub fn with_drag_offsets(mut self, drag_offset_x: f64, drag_offset_y: f64) -> Self {
        self.drag_offset_x = drag_offset_x;
        self.drag_offset_y = drag_offset_y;
        self
    }

    /// Checks that scale limits are positive and ordered and drag offsets are
    /// finite and non-negative.
    pub fn validate(self) -> ChartResult<Self> {
        let limits = [
            ("x", self.min_scale_x, self.max_scale_x),
            ("y", self.min_scale_y, self.max_scale_y),
        ];
        for (axis, min, max) in limits {
            if min.is_nan() || max.is_nan() || min <= 0.0 || min > max {
                return Err(ChartError::InvalidData(format!(
                    "scale {axis} limits must satisfy 0 < min <= max (got {min}..{max})"
                )));
            }
        }

        for drag in [self.drag_offset_x, self.drag_offset_y] {
            if !drag.is_finite() || drag < 0.0 {
                return Err(ChartError::InvalidData(
                    "drag offsets must be finite and >= 0".to_owned(),
                ));
            }
        }

        Ok(self)
    }

    /// Serializes config to pretty JSON for debug/config files.
    pub fn to_json_pretty(self) -> ChartResult<String> {
        serde_json::to_string_pretty(&self)
            .map_err(|e| ChartError::InvalidData(format!("failed to serialize config: {e}")))
    }

    /// Deserializes and validates config from JSON.
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse config: {e}")))?;
        config.validate()
    }
}

fn default_min_scale() -> f64 {
    1.0
}

fn default_max_scale() -> f64 {
    f64::MAX
}

/// Owns chart dimensions, content padding and the pan/zoom touch matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewPortHandler {
    chart_width: f64,
    chart_height: f64,
    offset_left: f64,
    offset_top: f64,
    offset_right: f64,
    offset_bottom: f64,
    touch_matrix: AffineTransform,
    config: ViewPortConfig,
}

impl ViewPortHandler {
    /// Creates a handler whose content area initially covers the whole chart.
    pub fn new(chart_width: f64, chart_height: f64) -> ChartResult<Self> {
        validate_dimens(chart_width, chart_height)?;
        Ok(Self {
            chart_width,
            chart_height,
            offset_left: 0.0,
            offset_top: 0.0,
            offset_right: 0.0,
            offset_bottom: 0.0,
            touch_matrix: AffineTransform::IDENTITY,
            config: ViewPortConfig::default(),
        })
    }

    /// Replaces pan/zoom limits and re-applies them to the current touch matrix.
    pub fn with_config(mut self, config: ViewPortConfig) -> ChartResult<Self> {
        self.config = config.validate()?;
        self.refresh(self.touch_matrix);
        Ok(self)
    }

    #[must_use]
    pub fn config(&self) -> ViewPortConfig {
        self.config
    }

    /// Resizes the chart while keeping the current content offsets.
    pub fn set_chart_dimens(&mut self, width: f64, height: f64) -> ChartResult<()> {
        validate_dimens(width, height)?;
        debug!(width, height, "set chart dimensions");
        self.chart_width = width;
        self.chart_height = height;
        Ok(())
    }

    /// Sets the padding between the chart bounds and the content rectangle.
    pub fn restrain_view_port(
        &mut self,
        offset_left: f64,
        offset_top: f64,
        offset_right: f64,
        offset_bottom: f64,
    ) {
        trace!(
            offset_left,
            offset_top,
            offset_right,
            offset_bottom,
            "restrain view port"
        );
        self.offset_left = offset_left;
        self.offset_top = offset_top;
        self.offset_right = offset_right;
        self.offset_bottom = offset_bottom;
    }

    #[must_use]
    pub fn has_chart_dimens(&self) -> bool {
        self.chart_width > 0.0 && self.chart_height > 0.0
    }

    #[must_use]
    pub fn content_rect(&self) -> Rect {
        Rect::new(
            self.offset_left,
            self.offset_top,
            self.content_width(),
            self.content_height(),
        )
    }

    #[must_use]
    pub fn content_center(&self) -> Point {
        let rect = self.content_rect();
        Point::new(rect.mid_x(), rect.mid_y())
    }

    /// Touch matrix zoomed by `scale_x`/`scale_y` around `(x, y)`.
    ///
    /// The pivot is expressed in the touch matrix's input space (value space
    /// already scaled to content pixels, before the content offset). The
    /// result is not installed; pass it to [`Self::refresh`].
    #[must_use]
    pub fn zoom(&self, scale_x: f64, scale_y: f64, x: f64, y: f64) -> AffineTransform {
        self.touch_matrix
            .translated_by(x, y)
            .scaled_by(scale_x, scale_y)
            .translated_by(-x, -y)
    }

    /// Touch matrix panned by a pixel delta. Not installed until refreshed.
    #[must_use]
    pub fn translate(&self, dx: f64, dy: f64) -> AffineTransform {
        self.touch_matrix
            .concatenating(AffineTransform::translation(dx, dy))
    }

    /// Installs `matrix` without applying any limits.
    pub fn set_touch_matrix(&mut self, matrix: AffineTransform) {
        self.touch_matrix = matrix;
    }

    /// Resets pan/zoom to the configured minimum scale.
    pub fn fit_screen(&mut self) -> AffineTransform {
        self.refresh(AffineTransform::scaling(
            self.config.min_scale_x,
            self.config.min_scale_y,
        ))
    }

    /// Clamps `matrix` to the configured limits and installs it as the touch matrix.
    pub fn refresh(&mut self, matrix: AffineTransform) -> AffineTransform {
        let limited = self.limit_trans_and_scale(matrix);
        trace!(
            scale_x = limited.a,
            scale_y = limited.d,
            trans_x = limited.tx,
            trans_y = limited.ty,
            "refresh touch matrix"
        );
        self.touch_matrix = limited;
        limited
    }

    fn limit_trans_and_scale(&self, matrix: AffineTransform) -> AffineTransform {
        let config = self.config;
        let scale_x = matrix.a.max(config.min_scale_x).min(config.max_scale_x);
        let scale_y = matrix.d.max(config.min_scale_y).min(config.max_scale_y);

        let max_trans_x = -self.content_width() * (scale_x - 1.0);
        let trans_x = matrix
            .tx
            .max(max_trans_x - config.drag_offset_x)
            .min(config.drag_offset_x);

        // Content y runs from -height to 0 before the offset flip.
        let max_trans_y = self.content_height() * (scale_y - 1.0);
        let trans_y = matrix
            .ty
            .min(max_trans_y + config.drag_offset_y)
            .max(-config.drag_offset_y);

        AffineTransform {
            a: scale_x,
            d: scale_y,
            tx: trans_x,
            ty: trans_y,
            ..matrix
        }
    }

    #[must_use]
    pub fn scale_x(&self) -> f64 {
        self.touch_matrix.a
    }

    #[must_use]
    pub fn scale_y(&self) -> f64 {
        self.touch_matrix.d
    }

    #[must_use]
    pub fn trans_x(&self) -> f64 {
        self.touch_matrix.tx
    }

    #[must_use]
    pub fn trans_y(&self) -> f64 {
        self.touch_matrix.ty
    }

    #[must_use]
    pub fn is_fully_zoomed_out(&self) -> bool {
        self.scale_x() <= self.config.min_scale_x && self.scale_y() <= self.config.min_scale_y
    }

    #[must_use]
    pub fn is_in_bounds_x(&self, x: f64) -> bool {
        let rect = self.content_rect();
        x >= rect.min_x() && x <= rect.max_x()
    }

    #[must_use]
    pub fn is_in_bounds_y(&self, y: f64) -> bool {
        let rect = self.content_rect();
        y >= rect.min_y() && y <= rect.max_y()
    }
}

impl ViewPort for ViewPortHandler {
    fn chart_width(&self) -> f64 {
        self.chart_width
    }

    fn chart_height(&self) -> f64 {
        self.chart_height
    }

    fn offset_left(&self) -> f64 {
        self.offset_left
    }

    fn offset_top(&self) -> f64 {
        self.offset_top
    }

    fn offset_right(&self) -> f64 {
        self.offset_right
    }

    fn offset_bottom(&self) -> f64 {
        self.offset_bottom
    }

    fn content_width(&self) -> f64 {
        (self.chart_width - self.offset_left - self.offset_right).max(0.0)
    }

    fn content_height(&self) -> f64 {
        (self.chart_height - self.offset_top - self.offset_bottom).max(0.0)
    }

    fn touch_matrix(&self) -> AffineTransform {
        self.touch_matrix
    }
}

fn validate_dimens(width: f64, height: f64) -> ChartResult<()> {
    if !width.is_finite() || !height.is_finite() || width < 0.0 || height < 0.0 {
        return Err(ChartError::InvalidViewport { width, height });
    }
    Ok(())
}
