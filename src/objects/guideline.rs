//! Guidelines: infinite lines through a point, in a glyph or a font

use std::fmt;

use kurbo::{Affine, Point, Vec2};

use super::base::{position_of, BaseObject, Transformation};
use super::font::BaseFont;
use super::glyph::BaseGlyph;
use super::{Environment, FontOf, GlyphOf, LayerOf};
use crate::error::{not_implemented, Result};
use crate::geometry::transform::transform_point;
use crate::geometry::Color;
use crate::normalizers::{
    normalize_guideline_angle, normalize_guideline_name, normalize_identifier, normalize_rounding,
    normalize_x, normalize_y,
};

/// Guidelines live either in a glyph or in the font info.
pub enum GuidelineParent<E: Environment> {
    Glyph(GlyphOf<E>),
    Font(FontOf<E>),
}

impl<E: Environment> Clone for GuidelineParent<E> {
    fn clone(&self) -> Self {
        match self {
            GuidelineParent::Glyph(glyph) => GuidelineParent::Glyph(glyph.clone()),
            GuidelineParent::Font(font) => GuidelineParent::Font(font.clone()),
        }
    }
}

impl<E: Environment> fmt::Debug for GuidelineParent<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GuidelineParent::Glyph(glyph) => f.debug_tuple("Glyph").field(glyph).finish(),
            GuidelineParent::Font(font) => f.debug_tuple("Font").field(font).finish(),
        }
    }
}

/// Environment hooks for a guideline
pub trait GuidelineBackend: BaseObject + Transformation {
    type Env: Environment<Guideline = Self>;

    fn raw_new() -> Self;

    fn raw_parent(&self) -> Option<GuidelineParent<Self::Env>>;
    fn raw_set_parent(&self, parent: Option<GuidelineParent<Self::Env>>);

    fn raw_x(&self) -> f64;
    fn raw_set_x(&self, value: f64);
    fn raw_y(&self) -> f64;
    fn raw_set_y(&self, value: f64);
    fn raw_angle(&self) -> f64;
    fn raw_set_angle(&self, value: f64);
    fn raw_name(&self) -> Option<String>;
    fn raw_set_name(&self, value: Option<String>);
    fn raw_color(&self) -> Option<Color>;
    fn raw_set_color(&self, value: Option<Color>);
    fn raw_identifier(&self) -> Option<String>;

    fn raw_generate_identifier(&self) -> Result<String> {
        not_implemented(Self::OBJECT_NAME, "getIdentifier")
    }

    fn raw_index(&self) -> Option<usize> {
        match self.raw_parent()? {
            GuidelineParent::Glyph(glyph) => position_of(&glyph.guidelines(), self),
            GuidelineParent::Font(font) => position_of(&font.guidelines(), self),
        }
    }

    fn raw_round(&self) -> Result<()> {
        self.raw_set_x(normalize_rounding(self.raw_x()));
        self.raw_set_y(normalize_rounding(self.raw_y()));
        self.raw_set_angle(normalize_rounding(self.raw_angle()) % 360.0);
        Ok(())
    }
}

/// Public guideline API
pub trait BaseGuideline: GuidelineBackend {
    fn glyph(&self) -> Option<GlyphOf<Self::Env>> {
        match self.raw_parent()? {
            GuidelineParent::Glyph(glyph) => Some(glyph),
            GuidelineParent::Font(_) => None,
        }
    }

    fn layer(&self) -> Option<LayerOf<Self::Env>> {
        self.glyph()?.layer()
    }

    fn font(&self) -> Option<FontOf<Self::Env>> {
        match self.raw_parent()? {
            GuidelineParent::Glyph(glyph) => glyph.font(),
            GuidelineParent::Font(font) => Some(font),
        }
    }

    /// Attach the guideline to a glyph or font. A guideline keeps the first
    /// parent it is given.
    fn set_parent(&self, parent: GuidelineParent<Self::Env>) {
        if self.raw_parent().is_none() {
            self.raw_set_parent(Some(parent));
        }
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

    /// Angle in degrees, within `0..360`
    fn angle(&self) -> f64 {
        self.raw_angle()
    }

    fn set_angle(&self, value: f64) -> Result<()> {
        self.raw_set_angle(normalize_guideline_angle(value)?);
        self.changed();
        Ok(())
    }

    fn name(&self) -> Option<String> {
        self.raw_name()
    }

    fn set_name(&self, value: Option<&str>) -> Result<()> {
        let value = value.map(normalize_guideline_name).transpose()?;
        self.raw_set_name(value);
        self.changed();
        Ok(())
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

    /// An orphan copy of the guideline
    fn copy(&self) -> Self {
        let copy = Self::raw_new();
        copy.raw_set_x(self.x());
        copy.raw_set_y(self.y());
        copy.raw_set_angle(self.angle());
        copy.raw_set_name(self.name());
        copy.raw_set_color(self.color());
        copy
    }
}

impl<T: GuidelineBackend> BaseGuideline for T {}

/// Transformation fallback for guidelines: move the anchor point and turn
/// the direction vector by the linear part of the matrix.
pub fn transform_guideline<G: GuidelineBackend>(
    guideline: &G,
    matrix: Affine,
    origin_offset: Vec2,
) -> Result<()> {
    let moved = transform_point(
        matrix,
        origin_offset,
        Point::new(guideline.raw_x(), guideline.raw_y()),
    );
    guideline.raw_set_x(moved.x);
    guideline.raw_set_y(moved.y);
    guideline.raw_set_angle(transformed_angle(matrix, guideline.raw_angle()));
    Ok(())
}

/// Angle of a direction after the linear part of `matrix`, within `0..360`
pub fn transformed_angle(matrix: Affine, degrees: f64) -> f64 {
    let radians = degrees.to_radians();
    let [xx, xy, yx, yy, _, _] = matrix.as_coeffs();
    let (dx, dy) = (radians.cos(), radians.sin());
    let tx = xx * dx + yx * dy;
    let ty = xy * dx + yy * dy;
    let angle = ty.atan2(tx).to_degrees();
    let angle = if angle < 0.0 { angle + 360.0 } else { angle };
    // snap float noise so axis-aligned guidelines stay exact
    let snapped = (angle * 1e9).round() / 1e9;
    if snapped >= 360.0 {
        0.0
    } else {
        snapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::transform::rotation_matrix;

    #[test]
    fn test_rotated_angle() {
        assert_eq!(transformed_angle(rotation_matrix(90.0), 0.0), 90.0);
        assert_eq!(transformed_angle(rotation_matrix(90.0), 300.0), 30.0);
        assert_eq!(transformed_angle(Affine::scale_non_uniform(-1.0, 1.0), 90.0), 90.0);
        assert_eq!(transformed_angle(Affine::scale_non_uniform(-1.0, 1.0), 45.0), 135.0);
    }
}
