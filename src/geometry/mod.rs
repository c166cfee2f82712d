//! Geometric Primitives and Operations
//!
//! Point types, colors and the affine helpers that every transformable
//! object in the object model shares.

pub mod color;
pub mod point_type;
pub mod transform;
pub mod ufo_point;

pub use color::Color;
pub use point_type::{PointType, SegmentType};
pub use transform::{interpolate, interpolate_point, origin_offset, round_value};
pub use ufo_point::UfoPoint;
