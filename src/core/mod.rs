pub mod affine;
pub mod primitives;
pub mod transformer;
pub mod types;
pub mod view_port;

pub use affine::{AffineTransform, Inversion};
pub use transformer::{OffsetOrientation, Transformer};
pub use types::{Point, Rect};
pub use view_port::{ViewPort, ViewPortConfig, ViewPortHandler};
