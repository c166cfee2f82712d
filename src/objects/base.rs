//! Behavior shared by every object: identity, reprs and transformations

use std::fmt;

use kurbo::{Affine, Point, Vec2};

use crate::error::Result;
use crate::geometry::transform::{
    offset_matrix, origin_offset, rotation_matrix, scale_matrix, skew_matrix,
};
use crate::normalizers::{
    self, normalize_coordinate_tuple, normalize_transformation_matrix, AxisValue,
};

/// Identity and presentation of a wrapped native object
pub trait BaseObject: Clone + fmt::Debug {
    /// Name used in reprs and error messages
    const OBJECT_NAME: &'static str;

    /// Identity of the wrapped native object. Wrappers around the same
    /// native object report the same id.
    fn native_id(&self) -> usize;

    fn repr_contents(&self) -> Vec<String> {
        Vec::new()
    }

    fn repr(&self) -> String {
        let contents = self.repr_contents();
        if contents.is_empty() {
            format!("<{} at {}>", Self::OBJECT_NAME, self.native_id())
        } else {
            format!(
                "<{} {} at {}>",
                Self::OBJECT_NAME,
                contents.join(" "),
                self.native_id()
            )
        }
    }

    fn is_same(&self, other: &Self) -> bool {
        self.native_id() == other.native_id()
    }

    /// Tell the environment the object changed.
    fn changed(&self) {}
}

/// Position of `item` in `items`, by native identity
pub fn position_of<T: BaseObject>(items: &[T], item: &T) -> Option<usize> {
    items.iter().position(|candidate| candidate.is_same(item))
}

/// Move, scale, rotate and skew.
///
/// Environments implement [`Transformation::raw_transform_by`]. The other
/// `raw_*` hooks default to building a matrix and routing it back through
/// `raw_transform_by`.
pub trait Transformation {
    /// Apply `matrix`, then move by `origin_offset` so the origin stays put.
    fn raw_transform_by(&self, matrix: Affine, origin: Point, origin_offset: Vec2) -> Result<()>;

    fn raw_move_by(&self, offset: Vec2) -> Result<()> {
        self.apply_matrix(offset_matrix(offset), Point::ZERO)
    }

    fn raw_scale_by(&self, scale: (f64, f64), origin: Point) -> Result<()> {
        self.apply_matrix(scale_matrix(scale), origin)
    }

    fn raw_rotate_by(&self, degrees: f64, origin: Point) -> Result<()> {
        self.apply_matrix(rotation_matrix(degrees), origin)
    }

    fn raw_skew_by(&self, degrees: (f64, f64), origin: Point) -> Result<()> {
        self.apply_matrix(skew_matrix(degrees), origin)
    }

    fn apply_matrix(&self, matrix: Affine, origin: Point) -> Result<()> {
        self.raw_transform_by(matrix, origin, origin_offset(matrix, origin))
    }

    /// Transform by a `[xx, xy, yx, yy, dx, dy]` matrix around `origin`,
    /// which defaults to `(0, 0)`.
    fn transform_by(&self, matrix: [f64; 6], origin: Option<Point>) -> Result<()> {
        let matrix = normalize_transformation_matrix(matrix)?;
        let origin = normalize_coordinate_tuple(origin.unwrap_or(Point::ZERO))?;
        self.apply_matrix(matrix, origin)
    }

    fn move_by(&self, offset: impl Into<Vec2>) -> Result<()> {
        let offset = normalizers::normalize_transformation_offset(offset)?;
        self.raw_move_by(offset)
    }

    fn scale_by(&self, value: impl Into<AxisValue>, origin: Option<Point>) -> Result<()> {
        let scale = normalizers::normalize_transformation_scale(value)?;
        let origin = normalize_coordinate_tuple(origin.unwrap_or(Point::ZERO))?;
        self.raw_scale_by(scale, origin)
    }

    /// Rotate by an angle in degrees.
    fn rotate_by(&self, degrees: f64, origin: Option<Point>) -> Result<()> {
        let degrees = normalizers::normalize_rotation_angle(degrees)?;
        let origin = normalize_coordinate_tuple(origin.unwrap_or(Point::ZERO))?;
        self.raw_rotate_by(degrees, origin)
    }

    /// Skew by one angle (x only) or a pair of angles, in degrees.
    fn skew_by(&self, value: impl Into<AxisValue>, origin: Option<Point>) -> Result<()> {
        let degrees = normalizers::normalize_skew_angle(value)?;
        let origin = normalize_coordinate_tuple(origin.unwrap_or(Point::ZERO))?;
        self.raw_skew_by(degrees, origin)
    }
}
