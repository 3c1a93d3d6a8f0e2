//! chart-transformer: value/pixel coordinate mapping for 2D charts.
//!
//! A [`Transformer`] composes three affine transforms in a fixed order:
//! value space scaled into content pixels, the view port's pan/zoom touch
//! matrix, then the content offset inside the chart bounds. The inverse of
//! that composite maps touch/click pixels back into data values.

pub mod core;
pub mod error;
pub mod telemetry;

pub use crate::core::{
    AffineTransform, Inversion, OffsetOrientation, Point, Rect, Transformer, ViewPort,
    ViewPortConfig, ViewPortHandler,
};
pub use error::{ChartError, ChartResult};
