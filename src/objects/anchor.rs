//! Anchors: named positions in a glyph

use kurbo::{Affine, Point, Vec2};

use super::base::{position_of, BaseObject, Transformation};
use super::glyph::BaseGlyph;
use super::layer::BaseLayer;
use super::{Environment, FontOf, GlyphOf, LayerOf};
use crate::error::{not_implemented, Result};
use crate::geometry::transform::transform_point;
use crate::geometry::Color;
use crate::normalizers::{
    normalize_anchor_name, normalize_identifier, normalize_rounding, normalize_x, normalize_y,
};

/// Environment hooks for an anchor
pub trait AnchorBackend: BaseObject + Transformation {
    type Env: Environment<Anchor = Self>;

    fn raw_new() -> Self;

    fn raw_glyph(&self) -> Option<GlyphOf<Self::Env>>;
    fn raw_set_glyph(&self, glyph: Option<GlyphOf<Self::Env>>);

    fn raw_name(&self) -> Option<String>;
    fn raw_set_name(&self, value: Option<String>);
    fn raw_x(&self) -> f64;
    fn raw_set_x(&self, value: f64);
    fn raw_y(&self) -> f64;
    fn raw_set_y(&self, value: f64);
    fn raw_color(&self) -> Option<Color>;
    fn raw_set_color(&self, value: Option<Color>);
    fn raw_identifier(&self) -> Option<String>;

    fn raw_generate_identifier(&self) -> Result<String> {
        not_implemented(Self::OBJECT_NAME, "getIdentifier")
    }

    fn raw_index(&self) -> Option<usize> {
        let glyph = self.raw_glyph()?;
        position_of(&glyph.anchors(), self)
    }

    fn raw_round(&self) -> Result<()> {
        self.raw_set_x(normalize_rounding(self.raw_x()));
        self.raw_set_y(normalize_rounding(self.raw_y()));
        Ok(())
    }
}

/// Public anchor API
pub trait BaseAnchor: AnchorBackend {
    fn glyph(&self) -> Option<GlyphOf<Self::Env>> {
        self.raw_glyph()
    }

    fn set_glyph(&self, glyph: &GlyphOf<Self::Env>) {
        if self.raw_glyph().is_none() {
            self.raw_set_glyph(Some(glyph.clone()));
        }
    }

    fn layer(&self) -> Option<LayerOf<Self::Env>> {
        self.glyph()?.layer()
    }

    fn font(&self) -> Option<FontOf<Self::Env>> {
        self.layer()?.font()
    }

    fn name(&self) -> Option<String> {
        self.raw_name()
    }

    fn set_name(&self, value: Option<&str>) -> Result<()> {
        let value = value.map(normalize_anchor_name).transpose()?;
        self.raw_set_name(value);
        self.changed();
        Ok(())
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

    fn color(&self) -> Option<Color> {
        self.raw_color()
    }

    fn set_color(&self, value: Option<Color>) {
        self.raw_set_color(value);
        self.changed();
    }

    fn identifier(&self) -> Option<String> {
        self.raw_identifier()
    }

    fn generate_identifier(&self) -> Result<String> {
        match self.raw_identifier() {
            Some(identifier) => Ok(identifier),
            None => normalize_identifier(&self.raw_generate_identifier()?),
        }
    }

    fn index(&self) -> Option<usize> {
        self.raw_index()
    }

    fn round(&self) -> Result<()> {
        self.raw_round()?;
        self.changed();
        Ok(())
    }

    fn is_compatible(&self, other: &Self) -> (bool, String) {
        if self.name() != other.name() {
            return (
                true,
                "[Warning] The anchors do not have the same name.".to_string(),
            );
        }
        (true, String::new())
    }

    /// An orphan copy of the anchor
    fn copy(&self) -> Self {
        let copy = Self::raw_new();
        copy.raw_set_name(self.name());
        copy.raw_set_x(self.x());
        copy.raw_set_y(self.y());
        copy.raw_set_color(self.color());
        copy
    }
}

impl<T: AnchorBackend> BaseAnchor for T {}

/// Transformation fallback for anchors
pub fn transform_anchor<A: AnchorBackend>(
    anchor: &A,
    matrix: Affine,
    origin_offset: Vec2,
) -> Result<()> {
    let moved = transform_point(matrix, origin_offset, Point::new(anchor.raw_x(), anchor.raw_y()));
    anchor.raw_set_x(moved.x);
    anchor.raw_set_y(moved.y);
    Ok(())
}
