//! Components: references to other glyphs, placed by an affine transform

use kurbo::{Affine, BezPath, Point, Rect, Shape, Vec2};

use super::base::{position_of, BaseObject, Transformation};
use super::contour::path_bounds;
use super::glyph::{glyph_outline, BaseGlyph};
use super::layer::BaseLayer;
use super::pen::PointPen;
use super::{Environment, FontOf, GlyphOf, LayerOf};
use crate::error::{not_implemented, Error, Result};
use crate::normalizers::{
    normalize_component_base_glyph, normalize_component_scale, normalize_coordinate_tuple,
    normalize_identifier, normalize_index, normalize_rounding, normalize_transformation_matrix,
    normalize_transformation_offset, AxisValue,
};

/// Environment hooks for a component
pub trait ComponentBackend: BaseObject + Transformation {
    type Env: Environment<Component = Self>;

    /// A new component with no parent glyph
    fn raw_new() -> Self;

    fn raw_glyph(&self) -> Option<GlyphOf<Self::Env>>;
    fn raw_set_glyph(&self, glyph: Option<GlyphOf<Self::Env>>);

    fn raw_base_glyph(&self) -> String;
    fn raw_set_base_glyph(&self, value: String);
    fn raw_transformation(&self) -> Affine;
    fn raw_set_transformation(&self, value: Affine);
    fn raw_identifier(&self) -> Option<String>;

    fn raw_generate_identifier(&self) -> Result<String> {
        not_implemented(Self::OBJECT_NAME, "getIdentifier")
    }

    fn raw_offset(&self) -> Vec2 {
        self.raw_transformation().translation()
    }

    fn raw_set_offset(&self, value: Vec2) {
        let transformation = self.raw_transformation().with_translation(value);
        self.raw_set_transformation(transformation);
    }

    fn raw_scale(&self) -> (f64, f64) {
        let [xx, _, _, yy, _, _] = self.raw_transformation().as_coeffs();
        (xx, yy)
    }

    fn raw_set_scale(&self, value: (f64, f64)) {
        let [_, xy, yx, _, dx, dy] = self.raw_transformation().as_coeffs();
        self.raw_set_transformation(Affine::new([value.0, xy, yx, value.1, dx, dy]));
    }

    fn raw_index(&self) -> Option<usize> {
        let glyph = self.raw_glyph()?;
        position_of(&glyph.components(), self)
    }

    fn raw_set_index(&self, index: usize) -> Result<()> {
        let _ = index;
        not_implemented(Self::OBJECT_NAME, "index")
    }

    /// Outline of the base glyph placed by the transformation. `None` when
    /// the base glyph cannot be found in the layer.
    fn raw_outline(&self) -> Result<Option<BezPath>> {
        let Some(glyph) = self.raw_glyph() else {
            return Ok(None);
        };
        let Some(layer) = glyph.layer() else {
            return Ok(None);
        };
        let name = self.raw_base_glyph();
        if !layer.contains(&name) {
            return Ok(None);
        }
        let base = layer.glyph(&name)?;
        let mut stack = vec![glyph.name()];
        Ok(Some(self.raw_transformation() * glyph_outline(&base, &mut stack)?))
    }

    fn raw_bounds(&self) -> Result<Option<Rect>> {
        Ok(self
            .raw_outline()?
            .and_then(|path| path_bounds(&path)))
    }

    fn raw_point_inside(&self, point: Point) -> Result<bool> {
        Ok(self
            .raw_outline()?
            .is_some_and(|path| path.winding(point) != 0))
    }

    /// Draw the base glyph into the parent glyph, then remove the component.
    fn raw_decompose(&self) -> Result<()> {
        let glyph = self
            .raw_glyph()
            .ok_or_else(|| Error::Orphan("The component does not belong to a glyph.".into()))?;
        let layer = glyph
            .layer()
            .ok_or_else(|| Error::Orphan("The component's glyph does not belong to a layer.".into()))?;
        let base = layer.glyph(&self.raw_base_glyph())?;
        let mut pen = TransformPointPen::new(glyph.point_pen(), self.raw_transformation());
        base.draw_points(&mut pen, true, true)?;
        glyph.remove_component(self)
    }

    fn raw_round(&self) -> Result<()> {
        let offset = self.raw_offset();
        self.raw_set_offset(Vec2::new(
            normalize_rounding(offset.x),
            normalize_rounding(offset.y),
        ));
        Ok(())
    }
}

/// Public component API
pub trait BaseComponent: ComponentBackend {
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

    fn base_glyph(&self) -> String {
        self.raw_base_glyph()
    }

    /// A component may not reference the glyph that holds it.
    fn set_base_glyph(&self, value: &str) -> Result<()> {
        let value = normalize_component_base_glyph(value)?;
        if let Some(glyph) = self.glyph() {
            if glyph.name() == value {
                return Err(Error::invalid(
                    "A glyph cannot contain a component referencing itself.",
                ));
            }
        }
        self.raw_set_base_glyph(value);
        self.changed();
        Ok(())
    }

    fn transformation(&self) -> Affine {
        self.raw_transformation()
    }

    fn set_transformation(&self, value: [f64; 6]) -> Result<()> {
        self.raw_set_transformation(normalize_transformation_matrix(value)?);
        self.changed();
        Ok(())
    }

    fn offset(&self) -> Vec2 {
        self.raw_offset()
    }

    fn set_offset(&self, value: impl Into<Vec2>) -> Result<()> {
        self.raw_set_offset(normalize_transformation_offset(value)?);
        self.changed();
        Ok(())
    }

    fn scale(&self) -> (f64, f64) {
        self.raw_scale()
    }

    fn set_scale(&self, value: impl Into<AxisValue>) -> Result<()> {
        self.raw_set_scale(normalize_component_scale(value)?);
        self.changed();
        Ok(())
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

    fn set_index(&self, index: isize) -> Result<()> {
        let glyph = self
            .glyph()
            .ok_or_else(|| Error::Orphan("The component does not belong to a glyph.".into()))?;
        let index = normalize_index(index, glyph.components().len(), "component")?;
        if Some(index) == self.index() {
            return Ok(());
        }
        self.raw_set_index(index)?;
        self.changed();
        Ok(())
    }

    fn bounds(&self) -> Result<Option<Rect>> {
        self.raw_bounds()
    }

    fn point_inside(&self, point: impl Into<Point>) -> Result<bool> {
        let point = normalize_coordinate_tuple(point)?;
        self.raw_point_inside(point)
    }

    fn decompose(&self) -> Result<()> {
        self.raw_decompose()
    }

    fn draw_points(&self, pen: &mut impl PointPen) -> Result<()> {
        pen.add_component(
            &self.base_glyph(),
            self.transformation(),
            self.identifier().as_deref(),
        )
    }

    fn round(&self) -> Result<()> {
        self.raw_round()?;
        self.changed();
        Ok(())
    }

    fn is_compatible(&self, other: &Self) -> (bool, String) {
        if self.base_glyph() != other.base_glyph() {
            return (
                true,
                "[Warning] The components do not have the same base glyph.".to_string(),
            );
        }
        (true, String::new())
    }

    /// An orphan copy of the component
    fn copy(&self) -> Self {
        let copy = Self::raw_new();
        copy.raw_set_base_glyph(self.base_glyph());
        copy.raw_set_transformation(self.transformation());
        copy
    }
}

impl<T: ComponentBackend> BaseComponent for T {}

/// Transformation fallback for components: compose with the existing
/// transformation.
pub fn transform_component<C: ComponentBackend>(
    component: &C,
    matrix: Affine,
    origin_offset: Vec2,
) -> Result<()> {
    let composed = Affine::translate(origin_offset) * matrix * component.raw_transformation();
    component.raw_set_transformation(composed);
    Ok(())
}

/// Passes everything through to another pen after applying a transformation.
pub struct TransformPointPen<P> {
    inner: P,
    transformation: Affine,
}

impl<P: PointPen> TransformPointPen<P> {
    pub fn new(inner: P, transformation: Affine) -> Self {
        Self {
            inner,
            transformation,
        }
    }

    pub fn into_inner(self) -> P {
        self.inner
    }
}

impl<P: PointPen> PointPen for TransformPointPen<P> {
    fn begin_path(&mut self, identifier: Option<&str>) -> Result<()> {
        self.inner.begin_path(identifier)
    }

    fn add_point(&mut self, point: &crate::geometry::UfoPoint) -> Result<()> {
        let moved = self.transformation * point.position();
        let mut point = point.clone();
        point.x = moved.x;
        point.y = moved.y;
        self.inner.add_point(&point)
    }

    fn end_path(&mut self) -> Result<()> {
        self.inner.end_path()
    }

    fn add_component(
        &mut self,
        base_glyph: &str,
        transformation: Affine,
        identifier: Option<&str>,
    ) -> Result<()> {
        self.inner
            .add_component(base_glyph, self.transformation * transformation, identifier)
    }
}
