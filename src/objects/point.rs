//! Points of a contour

use kurbo::{Affine, Point, Vec2};

use super::base::{position_of, BaseObject, Transformation};
use super::contour::BaseContour;
use super::glyph::BaseGlyph;
use super::layer::BaseLayer;
use super::{ContourOf, Environment, FontOf, GlyphOf, LayerOf};
use crate::error::{not_implemented, Result};
use crate::geometry::transform::transform_point;
use crate::geometry::PointType;
use crate::normalizers::{
    normalize_identifier, normalize_point_name, normalize_rounding, normalize_x, normalize_y,
};

/// Environment hooks for a point
pub trait PointBackend: BaseObject + Transformation {
    type Env: Environment<Point = Self>;

    /// A new point with no parent contour
    fn raw_new() -> Self;

    fn raw_contour(&self) -> Option<ContourOf<Self::Env>>;
    fn raw_set_contour(&self, contour: Option<ContourOf<Self::Env>>);

    fn raw_point_type(&self) -> PointType;
    fn raw_set_point_type(&self, value: PointType);
    fn raw_smooth(&self) -> bool;
    fn raw_set_smooth(&self, value: bool);
    fn raw_x(&self) -> f64;
    fn raw_set_x(&self, value: f64);
    fn raw_y(&self) -> f64;
    fn raw_set_y(&self, value: f64);
    fn raw_name(&self) -> Option<String>;
    fn raw_set_name(&self, value: Option<String>);
    fn raw_identifier(&self) -> Option<String>;

    /// Assign a new unique identifier and return it.
    fn raw_generate_identifier(&self) -> Result<String> {
        not_implemented(Self::OBJECT_NAME, "getIdentifier")
    }

    fn raw_index(&self) -> Option<usize> {
        let contour = self.raw_contour()?;
        position_of(&contour.points(), self)
    }

    fn raw_round(&self) -> Result<()> {
        self.raw_set_x(normalize_rounding(self.raw_x()));
        self.raw_set_y(normalize_rounding(self.raw_y()));
        Ok(())
    }
}

/// Public point API
pub trait BasePoint: PointBackend {
    fn contour(&self) -> Option<ContourOf<Self::Env>> {
        self.raw_contour()
    }

    /// Attach the point to a contour. A point keeps the first contour it is
    /// given.
    fn set_contour(&self, contour: &ContourOf<Self::Env>) {
        if self.raw_contour().is_none() {
            self.raw_set_contour(Some(contour.clone()));
        }
    }

    fn glyph(&self) -> Option<GlyphOf<Self::Env>> {
        self.contour()?.glyph()
    }

    fn layer(&self) -> Option<LayerOf<Self::Env>> {
        self.glyph()?.layer()
    }

    fn font(&self) -> Option<FontOf<Self::Env>> {
        self.layer()?.font()
    }

    fn point_type(&self) -> PointType {
        self.raw_point_type()
    }

    fn set_point_type(&self, value: PointType) {
        self.raw_set_point_type(value);
        self.changed();
    }

    fn smooth(&self) -> bool {
        self.raw_smooth()
    }

    fn set_smooth(&self, value: bool) {
        self.raw_set_smooth(value);
        self.changed();
    }

    fn x(&self) -> f64 {
        self.raw_x()
    }

    fn set_x(&self, value: f64) -> Result<()> {
        self.raw_set_x(normalize_x(value)?);
        self.changed();
        Ok(())
    }

    fn y(&self) -> f64 {
        self.raw_y()
    }

    fn set_y(&self, value: f64) -> Result<()> {
        self.raw_set_y(normalize_y(value)?);
        self.changed();
        Ok(())
    }

    fn position(&self) -> Point {
        Point::new(self.x(), self.y())
    }

    fn set_position(&self, value: impl Into<Point>) -> Result<()> {
        let point = value.into();
        self.set_x(point.x)?;
        self.set_y(point.y)
    }

    fn name(&self) -> Option<String> {
        self.raw_name()
    }

    fn set_name(&self, value: Option<&str>) -> Result<()> {
        let value = value.map(normalize_point_name).transpose()?;
        self.raw_set_name(value);
        self.changed();
        Ok(())
    }

    fn identifier(&self) -> Option<String> {
        self.raw_identifier()
    }

    /// The point's identifier, generating one if it has none.
    fn generate_identifier(&self) -> Result<String> {
        match self.raw_identifier() {
            Some(identifier) => Ok(identifier),
            None => normalize_identifier(&self.raw_generate_identifier()?),
        }
    }

    /// Index within the parent contour's points
    fn index(&self) -> Option<usize> {
        self.raw_index()
    }

    fn round(&self) -> Result<()> {
        self.raw_round()?;
        self.changed();
        Ok(())
    }

    /// An orphan copy of the point
    fn copy(&self) -> Self {
        let copy = Self::raw_new();
        copy.raw_set_point_type(self.point_type());
        copy.raw_set_smooth(self.smooth());
        copy.raw_set_x(self.x());
        copy.raw_set_y(self.y());
        copy.raw_set_name(self.name());
        copy
    }
}

impl<T: PointBackend> BasePoint for T {}

/// Transformation fallback for points: transform the coordinate, then
/// realign with the origin.
pub fn transform_point_coordinates<P: PointBackend>(
    point: &P,
    matrix: Affine,
    origin_offset: Vec2,
) -> Result<()> {
    let moved = transform_point(matrix, origin_offset, Point::new(point.raw_x(), point.raw_y()));
    point.raw_set_x(moved.x);
    point.raw_set_y(moved.y);
    Ok(())
}
