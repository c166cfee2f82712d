//! Glyphs: outlines, metrics and the objects attached to them
//!
//! A glyph owns contours, components, anchors and guidelines. Most of the
//! behavior here (margins, bounds, clearing, copying, math and
//! interpolation) is composed from the child objects' public APIs, so an
//! environment only has to store and hand out the children.

use std::collections::HashSet;

use kurbo::{Affine, BezPath, Point, Rect, Shape, Vec2};
use serde_json::Value;
use tracing::{debug, warn};

use super::anchor::{AnchorBackend, BaseAnchor};
use super::base::{position_of, BaseObject, Transformation};
use super::component::BaseComponent;
use super::contour::{path_bounds, BaseContour};
use super::dict::BaseDict;
use super::font::BaseFont;
use super::font_lib::{BaseLib, LibParent};
use super::guideline::{BaseGuideline, GuidelineBackend, GuidelineParent};
use super::layer::BaseLayer;
use super::math::{MathAnchor, MathGlyph, MathGuideline};
use super::pen::{PathBuffer, PointPen};
use super::{
    AnchorOf, ComponentOf, ContourOf, Environment, FontOf, GuidelineOf, LayerOf, LibOf,
};
use crate::error::{not_implemented, Error, Result};
use crate::geometry::{Color, UfoPoint};
use crate::normalizers::{
    normalize_anchor_name, normalize_color, normalize_component_base_glyph,
    normalize_component_scale, normalize_coordinate_tuple, normalize_glyph_bottom_margin,
    normalize_glyph_height, normalize_glyph_left_margin, normalize_glyph_name,
    normalize_glyph_note, normalize_glyph_right_margin, normalize_glyph_top_margin,
    normalize_glyph_unicode, normalize_glyph_unicodes, normalize_glyph_width,
    normalize_guideline_angle, normalize_guideline_name, normalize_identifier, normalize_index,
    normalize_interpolation_factor, normalize_layer_name, normalize_rounding,
    normalize_transformation_offset, AxisValue,
};

/// Lib key the mark color is stored under
pub const MARK_COLOR_KEY: &str = "public.markColor";

/// Which parts of a glyph [`BaseGlyph::clear_parts`] removes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GlyphParts {
    pub contours: bool,
    pub components: bool,
    pub anchors: bool,
    pub guidelines: bool,
}

impl GlyphParts {
    pub const ALL: GlyphParts = GlyphParts {
        contours: true,
        components: true,
        anchors: true,
        guidelines: true,
    };
}

impl Default for GlyphParts {
    fn default() -> Self {
        Self::ALL
    }
}

/// Environment hooks for a glyph
pub trait GlyphBackend: BaseObject + Transformation {
    type Env: Environment<Glyph = Self>;

    /// A new, empty glyph with no parent layer
    fn raw_new() -> Self;

    fn raw_layer(&self) -> Option<LayerOf<Self::Env>>;
    fn raw_set_layer(&self, layer: Option<LayerOf<Self::Env>>);

    fn raw_name(&self) -> String;
    /// Rename the glyph. The new name is known to be free in the layer.
    fn raw_set_name(&self, value: String) -> Result<()>;

    fn raw_unicodes(&self) -> Vec<u32>;
    fn raw_set_unicodes(&self, value: Vec<u32>);

    fn raw_auto_unicodes(&self) -> Result<()> {
        not_implemented(Self::OBJECT_NAME, "autoUnicodes")
    }

    fn raw_width(&self) -> f64;
    fn raw_set_width(&self, value: f64);
    fn raw_height(&self) -> f64;
    fn raw_set_height(&self, value: f64);

    fn raw_left_margin(&self) -> Result<f64> {
        Ok(self.raw_bounds()?.map_or(0.0, |bounds| bounds.x0))
    }

    fn raw_set_left_margin(&self, value: f64) -> Result<()> {
        let diff = value - self.raw_left_margin()?;
        self.raw_move_by(Vec2::new(diff, 0.0))?;
        self.raw_set_width(self.raw_width() + diff);
        Ok(())
    }

    fn raw_right_margin(&self) -> Result<f64> {
        let width = self.raw_width();
        Ok(self.raw_bounds()?.map_or(width, |bounds| width - bounds.x1))
    }

    fn raw_set_right_margin(&self, value: f64) -> Result<()> {
        match self.raw_bounds()? {
            Some(bounds) => self.raw_set_width(bounds.x1 + value),
            None => self.raw_set_width(value),
        }
        Ok(())
    }

    fn raw_bottom_margin(&self) -> Result<f64> {
        Ok(self.raw_bounds()?.map_or(0.0, |bounds| bounds.y0))
    }

    fn raw_set_bottom_margin(&self, value: f64) -> Result<()> {
        let diff = value - self.raw_bottom_margin()?;
        self.raw_move_by(Vec2::new(0.0, diff))?;
        self.raw_set_height(self.raw_height() + diff);
        Ok(())
    }

    fn raw_top_margin(&self) -> Result<f64> {
        let height = self.raw_height();
        Ok(self.raw_bounds()?.map_or(height, |bounds| height - bounds.y1))
    }

    fn raw_set_top_margin(&self, value: f64) -> Result<()> {
        match self.raw_bounds()? {
            Some(bounds) => self.raw_set_height(bounds.y1 + value),
            None => self.raw_set_height(value),
        }
        Ok(())
    }

    fn raw_contours(&self) -> Vec<ContourOf<Self::Env>>;
    /// Append an empty contour.
    fn raw_new_contour(&self, identifier: Option<String>) -> Result<ContourOf<Self::Env>>;
    fn raw_remove_contour(&self, index: usize) -> Result<()>;

    fn raw_components(&self) -> Vec<ComponentOf<Self::Env>>;
    fn raw_new_component(
        &self,
        base_glyph: String,
        transformation: Affine,
        identifier: Option<String>,
    ) -> Result<ComponentOf<Self::Env>>;
    fn raw_remove_component(&self, index: usize) -> Result<()>;

    fn raw_anchors(&self) -> Vec<AnchorOf<Self::Env>>;
    /// Append an unnamed anchor at the origin.
    fn raw_new_anchor(&self) -> Result<AnchorOf<Self::Env>>;
    fn raw_remove_anchor(&self, index: usize) -> Result<()>;

    fn raw_guidelines(&self) -> Vec<GuidelineOf<Self::Env>>;
    /// Append an unnamed horizontal guideline at the origin.
    fn raw_new_guideline(&self) -> Result<GuidelineOf<Self::Env>>;
    fn raw_remove_guideline(&self, index: usize) -> Result<()>;

    fn raw_clear_contours(&self) -> Result<()> {
        for index in (0..self.raw_contours().len()).rev() {
            self.raw_remove_contour(index)?;
        }
        Ok(())
    }

    fn raw_clear_components(&self) -> Result<()> {
        for index in (0..self.raw_components().len()).rev() {
            self.raw_remove_component(index)?;
        }
        Ok(())
    }

    fn raw_clear_anchors(&self) -> Result<()> {
        for index in (0..self.raw_anchors().len()).rev() {
            self.raw_remove_anchor(index)?;
        }
        Ok(())
    }

    fn raw_clear_guidelines(&self) -> Result<()> {
        for index in (0..self.raw_guidelines().len()).rev() {
            self.raw_remove_guideline(index)?;
        }
        Ok(())
    }

    fn raw_decompose(&self) -> Result<()> {
        for component in self.raw_components() {
            component.decompose()?;
        }
        Ok(())
    }

    fn raw_remove_overlap(&self) -> Result<()> {
        not_implemented(Self::OBJECT_NAME, "removeOverlap")
    }

    /// Orient closed contours by nesting depth: outermost contours run
    /// counter-clockwise, holes clockwise. TrueType outlines are the
    /// other way around.
    fn raw_correct_direction(&self, true_type: bool) -> Result<()> {
        let contours: Vec<_> = self
            .raw_contours()
            .into_iter()
            .filter(|contour| !contour.open() && !contour.is_empty())
            .collect();
        let paths: Vec<BezPath> = contours.iter().map(|contour| contour.to_bez_path()).collect();
        for (index, contour) in contours.iter().enumerate() {
            let sample = contour
                .ufo_points()
                .iter()
                .find(|point| point.point_type.is_on_curve())
                .map(UfoPoint::position);
            let Some(sample) = sample else {
                continue;
            };
            let depth = paths
                .iter()
                .enumerate()
                .filter(|(other, path)| *other != index && path.winding(sample) != 0)
                .count();
            let want_clockwise = (depth % 2 == 1) != true_type;
            if contour.clockwise()? != want_clockwise {
                contour.reverse()?;
            }
        }
        Ok(())
    }

    fn raw_auto_contour_order(&self) -> Result<()> {
        not_implemented(Self::OBJECT_NAME, "autoContourOrder")
    }

    fn raw_mark_color(&self) -> Option<Color> {
        match self.raw_lib().get(&MARK_COLOR_KEY.to_string()) {
            Some(Value::String(value)) => value.parse().ok(),
            _ => None,
        }
    }

    fn raw_set_mark_color(&self, value: Option<Color>) -> Result<()> {
        let lib = self.raw_lib();
        match value {
            Some(color) => lib.set(MARK_COLOR_KEY.to_string(), Value::String(color.to_string())),
            None => {
                if lib.contains(&MARK_COLOR_KEY.to_string()) {
                    lib.remove(&MARK_COLOR_KEY.to_string())?;
                }
                Ok(())
            }
        }
    }

    fn raw_note(&self) -> Option<String>;
    fn raw_set_note(&self, value: Option<String>);

    fn raw_lib(&self) -> LibOf<Self::Env>;

    /// This glyph in every layer of the font that has a glyph by its name
    fn raw_layers(&self) -> Result<Vec<Self>> {
        let name = self.raw_name();
        let Some(font) = self.raw_layer().and_then(|layer| layer.font()) else {
            return Ok(vec![self.clone()]);
        };
        let mut glyphs = Vec::new();
        for layer in font.layers() {
            if layer.contains(&name) {
                glyphs.push(layer.glyph(&name)?);
            }
        }
        Ok(glyphs)
    }

    fn raw_new_layer(&self, name: &str) -> Result<Self> {
        let font = self
            .raw_layer()
            .and_then(|layer| layer.font())
            .ok_or_else(|| Error::Orphan("The glyph does not belong to a font.".into()))?;
        let layer = match font.get_layer(name) {
            Ok(layer) => layer,
            Err(Error::NotFound(_)) => font.new_layer(name, None)?,
            Err(error) => return Err(error),
        };
        layer.new_glyph(&self.raw_name(), true)
    }

    fn raw_remove_layer(&self, name: &str) -> Result<()> {
        let font = self
            .raw_layer()
            .and_then(|layer| layer.font())
            .ok_or_else(|| Error::Orphan("The glyph does not belong to a font.".into()))?;
        font.get_layer(name)?.remove_glyph(&self.raw_name())
    }

    fn raw_bounds(&self) -> Result<Option<Rect>> {
        Ok(path_bounds(&glyph_outline(self, &mut Vec::new())?))
    }

    fn raw_point_inside(&self, point: Point) -> Result<bool> {
        Ok(glyph_outline(self, &mut Vec::new())?.winding(point) != 0)
    }

    fn raw_round(&self) -> Result<()> {
        for contour in self.raw_contours() {
            contour.round()?;
        }
        for component in self.raw_components() {
            component.round()?;
        }
        for anchor in self.raw_anchors() {
            anchor.round()?;
        }
        for guideline in self.raw_guidelines() {
            guideline.round()?;
        }
        self.raw_set_width(normalize_rounding(self.raw_width()));
        self.raw_set_height(normalize_rounding(self.raw_height()));
        Ok(())
    }
}

/// Public glyph API
pub trait BaseGlyph: GlyphBackend {
    // -------
    // Parents
    // -------

    fn layer(&self) -> Option<LayerOf<Self::Env>> {
        self.raw_layer()
    }

    fn set_layer(&self, layer: &LayerOf<Self::Env>) {
        if self.raw_layer().is_none() {
            self.raw_set_layer(Some(layer.clone()));
        }
    }

    fn font(&self) -> Option<FontOf<Self::Env>> {
        self.layer().and_then(|layer| layer.font())
    }

    // -----------
    // Identifiers
    // -----------

    fn name(&self) -> String {
        self.raw_name()
    }

    fn set_name(&self, value: &str) -> Result<()> {
        let value = normalize_glyph_name(value)?;
        if value == self.raw_name() {
            return Ok(());
        }
        if let Some(layer) = self.layer() {
            if layer.contains(&value) {
                return Err(Error::Duplicate(format!(
                    "A glyph with the name '{value}' already exists."
                )));
            }
        }
        self.raw_set_name(value)?;
        self.changed();
        Ok(())
    }

    fn unicodes(&self) -> Vec<u32> {
        self.raw_unicodes()
    }

    fn set_unicodes(&self, value: &[u32]) -> Result<()> {
        let value = normalize_glyph_unicodes(value)?;
        self.raw_set_unicodes(value);
        self.changed();
        Ok(())
    }

    /// The primary unicode
    fn unicode(&self) -> Option<u32> {
        self.raw_unicodes().first().copied()
    }

    /// Make `value` the primary unicode, keeping the others. `None` clears
    /// all unicodes.
    fn set_unicode(&self, value: Option<u32>) -> Result<()> {
        let Some(value) = value else {
            return self.set_unicodes(&[]);
        };
        let value = normalize_glyph_unicode(value)?;
        let mut values = self.raw_unicodes();
        values.retain(|existing| *existing != value);
        values.insert(0, value);
        self.set_unicodes(&values)
    }

    fn auto_unicodes(&self) -> Result<()> {
        self.raw_auto_unicodes()?;
        self.changed();
        Ok(())
    }

    /// Every object identifier in use inside the glyph. UFO requires these
    /// to be unique across contours, points, components, anchors and
    /// guidelines.
    fn identifiers(&self) -> HashSet<String> {
        let mut identifiers = HashSet::new();
        for contour in self.raw_contours() {
            identifiers.extend(contour.identifier());
            identifiers.extend(
                contour
                    .ufo_points()
                    .into_iter()
                    .filter_map(|point| point.identifier),
            );
        }
        identifiers.extend(
            self.raw_components()
                .iter()
                .filter_map(|component| component.identifier()),
        );
        identifiers.extend(self.raw_anchors().iter().filter_map(|anchor| anchor.identifier()));
        identifiers.extend(
            self.raw_guidelines()
                .iter()
                .filter_map(|guideline| guideline.identifier()),
        );
        identifiers
    }

    // -------
    // Metrics
    // -------

    fn width(&self) -> f64 {
        self.raw_width()
    }

    fn set_width(&self, value: f64) -> Result<()> {
        self.raw_set_width(normalize_glyph_width(value)?);
        self.changed();
        Ok(())
    }

    fn height(&self) -> f64 {
        self.raw_height()
    }

    fn set_height(&self, value: f64) -> Result<()> {
        self.raw_set_height(normalize_glyph_height(value)?);
        self.changed();
        Ok(())
    }

    fn left_margin(&self) -> Result<f64> {
        normalize_glyph_left_margin(self.raw_left_margin()?)
    }

    fn set_left_margin(&self, value: f64) -> Result<()> {
        self.raw_set_left_margin(normalize_glyph_left_margin(value)?)?;
        self.changed();
        Ok(())
    }

    fn right_margin(&self) -> Result<f64> {
        normalize_glyph_right_margin(self.raw_right_margin()?)
    }

    fn set_right_margin(&self, value: f64) -> Result<()> {
        self.raw_set_right_margin(normalize_glyph_right_margin(value)?)?;
        self.changed();
        Ok(())
    }

    fn bottom_margin(&self) -> Result<f64> {
        normalize_glyph_bottom_margin(self.raw_bottom_margin()?)
    }

    fn set_bottom_margin(&self, value: f64) -> Result<()> {
        self.raw_set_bottom_margin(normalize_glyph_bottom_margin(value)?)?;
        self.changed();
        Ok(())
    }

    fn top_margin(&self) -> Result<f64> {
        normalize_glyph_top_margin(self.raw_top_margin()?)
    }

    fn set_top_margin(&self, value: f64) -> Result<()> {
        self.raw_set_top_margin(normalize_glyph_top_margin(value)?)?;
        self.changed();
        Ok(())
    }

    // ----
    // Pens
    // ----

    /// A pen that appends whatever is drawn into it to this glyph
    fn point_pen(&self) -> GlyphPointPen<Self> {
        GlyphPointPen {
            glyph: self.clone(),
            buffer: PathBuffer::default(),
        }
    }

    fn draw_points(&self, pen: &mut impl PointPen, contours: bool, components: bool) -> Result<()> {
        if contours {
            for contour in self.contours() {
                contour.draw_points(pen)?;
            }
        }
        if components {
            for component in self.components() {
                component.draw_points(pen)?;
            }
        }
        Ok(())
    }

    /// The outline with components resolved through the layer
    fn to_bez_path(&self) -> Result<BezPath> {
        glyph_outline(self, &mut Vec::new())
    }

    // -----------------------------------------
    // Contour, Component and Anchor Interaction
    // -----------------------------------------

    fn clear(&self) -> Result<()> {
        self.clear_parts(GlyphParts::ALL)
    }

    fn clear_parts(&self, parts: GlyphParts) -> Result<()> {
        if parts.contours {
            self.clear_contours()?;
        }
        if parts.components {
            self.clear_components()?;
        }
        if parts.anchors {
            self.clear_anchors()?;
        }
        if parts.guidelines {
            self.clear_guidelines()?;
        }
        Ok(())
    }

    /// Append a copy of `other`'s outline and guidelines, moved by `offset`.
    fn append_glyph(&self, other: &Self, offset: Option<Vec2>) -> Result<()> {
        let offset = normalize_transformation_offset(offset.unwrap_or(Vec2::ZERO))?;
        let copy = other.copy()?;
        if offset != Vec2::ZERO {
            copy.move_by(offset)?;
        }
        let mut pen = self.point_pen();
        copy.draw_points(&mut pen, true, true)?;
        for guideline in copy.guidelines() {
            self.append_guideline(
                guideline.position(),
                guideline.angle(),
                guideline.name().as_deref(),
                guideline.color(),
            )?;
        }
        Ok(())
    }

    // Contours

    fn contours(&self) -> Vec<ContourOf<Self::Env>> {
        let contours = self.raw_contours();
        for contour in &contours {
            contour.set_glyph(self);
        }
        contours
    }

    /// Number of contours
    fn len(&self) -> usize {
        self.raw_contours().len()
    }

    /// A glyph is empty when it has neither contours nor components.
    fn is_empty(&self) -> bool {
        self.raw_contours().is_empty() && self.raw_components().is_empty()
    }

    fn contour(&self, index: isize) -> Result<ContourOf<Self::Env>> {
        let mut contours = self.contours();
        let index = normalize_index(index, contours.len(), "contour")?;
        Ok(contours.swap_remove(index))
    }

    /// Append a copy of `contour`, moved by `offset`.
    fn append_contour(
        &self,
        contour: &ContourOf<Self::Env>,
        offset: Option<Vec2>,
    ) -> Result<ContourOf<Self::Env>> {
        let offset = normalize_transformation_offset(offset.unwrap_or(Vec2::ZERO))?;
        let mut used = self.identifiers();
        let identifier = claim_identifier(contour.identifier(), &mut used);
        let appended = self.raw_new_contour(identifier)?;
        appended.set_glyph(self);
        for mut point in contour.ufo_points() {
            point.identifier = claim_identifier(point.identifier.take(), &mut used);
            appended.append_point(point)?;
        }
        if offset != Vec2::ZERO {
            appended.move_by(offset)?;
        }
        self.changed();
        Ok(appended)
    }

    fn remove_contour(&self, contour: &ContourOf<Self::Env>) -> Result<()> {
        let index = position_of(&self.raw_contours(), contour)
            .ok_or_else(|| Error::not_found("The contour could not be found in the glyph."))?;
        self.raw_remove_contour(index)?;
        self.changed();
        Ok(())
    }

    fn remove_contour_at(&self, index: isize) -> Result<()> {
        let index = normalize_index(index, self.raw_contours().len(), "contour")?;
        self.raw_remove_contour(index)?;
        self.changed();
        Ok(())
    }

    fn clear_contours(&self) -> Result<()> {
        self.raw_clear_contours()?;
        self.changed();
        Ok(())
    }

    fn remove_overlap(&self) -> Result<()> {
        self.raw_remove_overlap()?;
        self.changed();
        Ok(())
    }

    fn correct_direction(&self, true_type: bool) -> Result<()> {
        self.raw_correct_direction(true_type)?;
        self.changed();
        Ok(())
    }

    fn auto_contour_order(&self) -> Result<()> {
        self.raw_auto_contour_order()?;
        self.changed();
        Ok(())
    }

    // Components

    fn components(&self) -> Vec<ComponentOf<Self::Env>> {
        let components = self.raw_components();
        for component in &components {
            component.set_glyph(self);
        }
        components
    }

    fn component(&self, index: isize) -> Result<ComponentOf<Self::Env>> {
        let mut components = self.components();
        let index = normalize_index(index, components.len(), "component")?;
        Ok(components.swap_remove(index))
    }

    /// Append a component referencing `base_glyph`.
    fn append_component(
        &self,
        base_glyph: &str,
        offset: Option<Vec2>,
        scale: Option<AxisValue>,
    ) -> Result<ComponentOf<Self::Env>> {
        let base_glyph = normalize_component_base_glyph(base_glyph)?;
        if base_glyph == self.raw_name() {
            return Err(Error::invalid(
                "A glyph cannot contain a component referencing itself.",
            ));
        }
        let offset = normalize_transformation_offset(offset.unwrap_or(Vec2::ZERO))?;
        let (sx, sy) = normalize_component_scale(scale.unwrap_or(AxisValue::Uniform(1.0)))?;
        let transformation = Affine::new([sx, 0.0, 0.0, sy, offset.x, offset.y]);
        let component = self.raw_new_component(base_glyph, transformation, None)?;
        component.set_glyph(self);
        self.changed();
        Ok(component)
    }

    fn remove_component(&self, component: &ComponentOf<Self::Env>) -> Result<()> {
        let index = position_of(&self.raw_components(), component)
            .ok_or_else(|| Error::not_found("The component could not be found in the glyph."))?;
        self.raw_remove_component(index)?;
        self.changed();
        Ok(())
    }

    fn remove_component_at(&self, index: isize) -> Result<()> {
        let index = normalize_index(index, self.raw_components().len(), "component")?;
        self.raw_remove_component(index)?;
        self.changed();
        Ok(())
    }

    fn clear_components(&self) -> Result<()> {
        self.raw_clear_components()?;
        self.changed();
        Ok(())
    }

    /// Replace every component with the outline it references.
    fn decompose(&self) -> Result<()> {
        self.raw_decompose()?;
        self.changed();
        Ok(())
    }

    // Anchors

    fn anchors(&self) -> Vec<AnchorOf<Self::Env>> {
        let anchors = self.raw_anchors();
        for anchor in &anchors {
            anchor.set_glyph(self);
        }
        anchors
    }

    fn anchor(&self, index: isize) -> Result<AnchorOf<Self::Env>> {
        let mut anchors = self.anchors();
        let index = normalize_index(index, anchors.len(), "anchor")?;
        Ok(anchors.swap_remove(index))
    }

    fn append_anchor(
        &self,
        name: Option<&str>,
        position: impl Into<Point>,
        color: Option<Color>,
    ) -> Result<AnchorOf<Self::Env>> {
        let name = name.map(normalize_anchor_name).transpose()?;
        let position = normalize_coordinate_tuple(position)?;
        let color = color.map(|color| normalize_color(color.to_array())).transpose()?;
        let anchor = self.raw_new_anchor()?;
        anchor.set_glyph(self);
        anchor.raw_set_name(name);
        anchor.raw_set_x(position.x);
        anchor.raw_set_y(position.y);
        anchor.raw_set_color(color);
        self.changed();
        Ok(anchor)
    }

    fn remove_anchor(&self, anchor: &AnchorOf<Self::Env>) -> Result<()> {
        let index = position_of(&self.raw_anchors(), anchor)
            .ok_or_else(|| Error::not_found("The anchor could not be found in the glyph."))?;
        self.raw_remove_anchor(index)?;
        self.changed();
        Ok(())
    }

    fn remove_anchor_at(&self, index: isize) -> Result<()> {
        let index = normalize_index(index, self.raw_anchors().len(), "anchor")?;
        self.raw_remove_anchor(index)?;
        self.changed();
        Ok(())
    }

    fn clear_anchors(&self) -> Result<()> {
        self.raw_clear_anchors()?;
        self.changed();
        Ok(())
    }

    // Guidelines

    fn guidelines(&self) -> Vec<GuidelineOf<Self::Env>> {
        let guidelines = self.raw_guidelines();
        for guideline in &guidelines {
            guideline.set_parent(GuidelineParent::Glyph(self.clone()));
        }
        guidelines
    }

    fn guideline(&self, index: isize) -> Result<GuidelineOf<Self::Env>> {
        let mut guidelines = self.guidelines();
        let index = normalize_index(index, guidelines.len(), "guideline")?;
        Ok(guidelines.swap_remove(index))
    }

    fn append_guideline(
        &self,
        position: impl Into<Point>,
        angle: f64,
        name: Option<&str>,
        color: Option<Color>,
    ) -> Result<GuidelineOf<Self::Env>> {
        let position = normalize_coordinate_tuple(position)?;
        let angle = normalize_guideline_angle(angle)?;
        let name = name.map(normalize_guideline_name).transpose()?;
        let color = color.map(|color| normalize_color(color.to_array())).transpose()?;
        let guideline = self.raw_new_guideline()?;
        guideline.set_parent(GuidelineParent::Glyph(self.clone()));
        guideline.raw_set_x(position.x);
        guideline.raw_set_y(position.y);
        guideline.raw_set_angle(angle);
        guideline.raw_set_name(name);
        guideline.raw_set_color(color);
        self.changed();
        Ok(guideline)
    }

    fn remove_guideline(&self, guideline: &GuidelineOf<Self::Env>) -> Result<()> {
        let index = position_of(&self.raw_guidelines(), guideline)
            .ok_or_else(|| Error::not_found("The guideline could not be found in the glyph."))?;
        self.raw_remove_guideline(index)?;
        self.changed();
        Ok(())
    }

    fn remove_guideline_at(&self, index: isize) -> Result<()> {
        let index = normalize_index(index, self.raw_guidelines().len(), "guideline")?;
        self.raw_remove_guideline(index)?;
        self.changed();
        Ok(())
    }

    fn clear_guidelines(&self) -> Result<()> {
        self.raw_clear_guidelines()?;
        self.changed();
        Ok(())
    }

    // ----
    // Math
    // ----

    /// Snapshot everything that takes part in glyph math.
    fn to_math_glyph(&self) -> Result<MathGlyph> {
        let mut math = MathGlyph {
            name: self.name(),
            unicodes: self.unicodes(),
            width: self.width(),
            height: self.height(),
            note: self.note(),
            lib: self.lib().to_map(),
            ..Default::default()
        };
        self.draw_points(&mut math.point_pen(), true, true)?;
        math.anchors = self
            .anchors()
            .iter()
            .map(|anchor| MathAnchor {
                x: anchor.x(),
                y: anchor.y(),
                name: anchor.name(),
                color: anchor.color(),
                identifier: anchor.identifier(),
            })
            .collect();
        math.guidelines = self
            .guidelines()
            .iter()
            .map(|guideline| MathGuideline {
                x: guideline.x(),
                y: guideline.y(),
                angle: guideline.angle(),
                name: guideline.name(),
                color: guideline.color(),
                identifier: guideline.identifier(),
            })
            .collect();
        Ok(math)
    }

    /// Replace this glyph's outline, anchors, guidelines, metrics and lib
    /// with the contents of `math`. Name and unicodes are only taken over
    /// when `to_this_glyph` is false.
    fn apply_math_glyph(&self, math: &MathGlyph, to_this_glyph: bool) -> Result<()> {
        self.clear()?;
        if !to_this_glyph {
            if !math.name.is_empty() {
                self.set_name(&math.name)?;
            }
            self.set_unicodes(&math.unicodes)?;
        }
        let mut pen = self.point_pen();
        math.draw_points(&mut pen)?;
        for anchor in &math.anchors {
            self.append_anchor(anchor.name.as_deref(), (anchor.x, anchor.y), anchor.color)?;
        }
        for guideline in &math.guidelines {
            self.append_guideline(
                (guideline.x, guideline.y),
                guideline.angle.rem_euclid(360.0),
                guideline.name.as_deref(),
                guideline.color,
            )?;
        }
        self.set_width(math.width)?;
        self.set_height(math.height)?;
        self.set_note(math.note.as_deref());
        self.lib().update(math.lib.clone())?;
        Ok(())
    }

    /// An orphan glyph holding the contents of `math`
    fn from_math_glyph(math: &MathGlyph) -> Result<Self> {
        let glyph = Self::raw_new();
        glyph.apply_math_glyph(math, false)?;
        Ok(glyph)
    }

    fn math_add(&self, other: &Self) -> Result<Self> {
        Self::from_math_glyph(&self.to_math_glyph()?.add(&other.to_math_glyph()?)?)
    }

    fn math_sub(&self, other: &Self) -> Result<Self> {
        Self::from_math_glyph(&self.to_math_glyph()?.sub(&other.to_math_glyph()?)?)
    }

    fn math_mul(&self, factor: impl Into<AxisValue>) -> Result<Self> {
        let factor = normalize_interpolation_factor(factor)?;
        Self::from_math_glyph(&self.to_math_glyph()?.mul(factor))
    }

    fn math_div(&self, factor: impl Into<AxisValue>) -> Result<Self> {
        let factor = normalize_interpolation_factor(factor)?;
        Self::from_math_glyph(&self.to_math_glyph()?.div(factor)?)
    }

    /// Fill this glyph with the interpolation between `min` and `max`.
    fn interpolate(
        &self,
        factor: impl Into<AxisValue>,
        min: &Self,
        max: &Self,
        round: bool,
        suppress_error: bool,
    ) -> Result<()> {
        let factor = normalize_interpolation_factor(factor)?;
        let (min_math, max_math) = (min.to_math_glyph()?, max.to_math_glyph()?);
        match MathGlyph::interpolate(&min_math, &max_math, factor) {
            Ok(mut result) => {
                if round {
                    result.round();
                }
                self.apply_math_glyph(&result, true)
            }
            Err(error) if suppress_error => {
                debug!("Skipping interpolation of '{}': {}", min_math.name, error);
                Ok(())
            }
            Err(_) => Err(Error::Incompatible(format!(
                "Glyphs named '{}' and '{}' can't be interpolated.",
                min_math.name, max_math.name
            ))),
        }
    }

    /// Check whether the glyphs can be interpolated. Fatal problems make
    /// the glyphs incompatible, warnings and notes only end up in the
    /// report.
    fn is_compatible(&self, other: &Self) -> (bool, String) {
        let mut compatible = true;
        let mut report = Vec::new();
        let (ours, theirs) = (self.contours(), other.contours());
        if ours.len() != theirs.len() {
            report.push("[Fatal] The glyphs do not contain the same number of contours.".into());
            compatible = false;
        }
        for (index, (a, b)) in ours.iter().zip(&theirs).enumerate() {
            if a.len() != b.len() {
                report.push(format!(
                    "[Fatal] Contour {index} contains a different number of segments."
                ));
                compatible = false;
            }
        }
        let sorted = |mut names: Vec<String>| {
            names.sort();
            names
        };
        let base_glyphs = |glyph: &Self| {
            sorted(glyph.components().iter().map(|c| c.base_glyph()).collect())
        };
        if base_glyphs(self) != base_glyphs(other) {
            report.push(
                "[Warning] The glyphs do not contain components with exactly the same base glyphs."
                    .into(),
            );
        }
        let anchor_names = |glyph: &Self| {
            sorted(
                glyph
                    .anchors()
                    .iter()
                    .map(|a| a.name().unwrap_or_default())
                    .collect(),
            )
        };
        if anchor_names(self) != anchor_names(other) {
            report.push(
                "[Warning] The glyphs do not contain anchors with exactly the same names.".into(),
            );
        }
        if self.raw_guidelines().len() != other.raw_guidelines().len() {
            report.push("[Note] The glyphs do not contain the same number of guidelines.".into());
        }
        (compatible, report.join("\n"))
    }

    // ------------
    // Data Queries
    // ------------

    fn point_inside(&self, point: impl Into<Point>) -> Result<bool> {
        let point = normalize_coordinate_tuple(point)?;
        self.raw_point_inside(point)
    }

    fn bounds(&self) -> Result<Option<Rect>> {
        self.raw_bounds()
    }

    // ------
    // Layers
    // ------

    fn layers(&self) -> Result<Vec<Self>> {
        self.raw_layers()
    }

    fn get_layer(&self, name: &str) -> Result<Self> {
        let name = normalize_layer_name(name)?;
        for glyph in self.raw_layers()? {
            if glyph.layer().is_some_and(|layer| layer.name() == name) {
                return Ok(glyph);
            }
        }
        Err(Error::not_found(format!(
            "No layer named '{name}' in glyph '{}'.",
            self.name()
        )))
    }

    /// This glyph in the layer `name`, replacing whatever was there.
    fn new_layer(&self, name: &str) -> Result<Self> {
        let name = normalize_layer_name(name)?;
        for glyph in self.raw_layers()? {
            if let Some(layer) = glyph.layer() {
                if layer.name() == name {
                    layer.remove_glyph(&self.name())?;
                }
            }
        }
        let glyph = self.raw_new_layer(&name)?;
        self.changed();
        Ok(glyph)
    }

    fn remove_layer(&self, name: &str) -> Result<()> {
        let name = normalize_layer_name(name)?;
        let glyph = self.get_layer(&name)?;
        if glyph.layer().is_some_and(|layer| layer.name() == name) {
            self.raw_remove_layer(&name)?;
        }
        self.changed();
        Ok(())
    }

    // ----
    // Misc
    // ----

    fn mark_color(&self) -> Option<Color> {
        self.raw_mark_color()
    }

    fn set_mark_color(&self, value: Option<Color>) -> Result<()> {
        let value = value.map(|color| normalize_color(color.to_array())).transpose()?;
        self.raw_set_mark_color(value)?;
        self.changed();
        Ok(())
    }

    fn note(&self) -> Option<String> {
        self.raw_note()
    }

    fn set_note(&self, value: Option<&str>) {
        self.raw_set_note(value.map(normalize_glyph_note));
        self.changed();
    }

    fn lib(&self) -> LibOf<Self::Env> {
        let lib = self.raw_lib();
        lib.set_parent(LibParent::Glyph(self.clone()));
        lib
    }

    fn round(&self) -> Result<()> {
        self.raw_round()?;
        self.changed();
        Ok(())
    }

    /// Copy metrics, outline, anchors, guidelines, note, mark color and
    /// lib from `source`.
    fn copy_data(&self, source: &Self) -> Result<()> {
        self.set_unicodes(&source.unicodes())?;
        self.set_width(source.width())?;
        self.set_height(source.height())?;
        self.set_note(source.note().as_deref());
        self.lib().update(source.lib().to_map())?;
        self.set_mark_color(source.mark_color())?;
        let mut pen = self.point_pen();
        source.draw_points(&mut pen, true, true)?;
        for anchor in source.anchors() {
            self.append_anchor(anchor.name().as_deref(), anchor.position(), anchor.color())?;
        }
        for guideline in source.guidelines() {
            self.append_guideline(
                guideline.position(),
                guideline.angle(),
                guideline.name().as_deref(),
                guideline.color(),
            )?;
        }
        Ok(())
    }

    /// An orphan copy of the glyph
    fn copy(&self) -> Result<Self> {
        let copy = Self::raw_new();
        copy.raw_set_name(self.name())?;
        copy.copy_data(self)?;
        Ok(copy)
    }
}

impl<T: GlyphBackend> BaseGlyph for T {}

/// Transformation fallback for glyphs: transform every child around the
/// same origin.
pub fn transform_glyph<G: GlyphBackend>(glyph: &G, matrix: Affine, origin: Point) -> Result<()> {
    for contour in glyph.raw_contours() {
        contour.apply_matrix(matrix, origin)?;
    }
    for component in glyph.raw_components() {
        component.apply_matrix(matrix, origin)?;
    }
    for anchor in glyph.raw_anchors() {
        anchor.apply_matrix(matrix, origin)?;
    }
    for guideline in glyph.raw_guidelines() {
        guideline.apply_matrix(matrix, origin)?;
    }
    Ok(())
}

/// The outline of `glyph` with components resolved through its layer.
/// `stack` holds the glyphs being expanded, so reference cycles end
/// instead of recursing forever.
pub(crate) fn glyph_outline<G: BaseGlyph>(glyph: &G, stack: &mut Vec<String>) -> Result<BezPath> {
    let mut path = BezPath::new();
    for contour in glyph.contours() {
        path.extend(contour.to_bez_path().elements().iter().copied());
    }
    let components = glyph.components();
    if components.is_empty() {
        return Ok(path);
    }
    let Some(layer) = glyph.layer() else {
        return Ok(path);
    };
    stack.push(glyph.name());
    for component in components {
        let base_name = component.base_glyph();
        if stack.contains(&base_name) {
            warn!("Component cycle through '{}' in '{}'", base_name, glyph.name());
            continue;
        }
        if !layer.contains(&base_name) {
            continue;
        }
        let base = layer.glyph(&base_name)?;
        let outline = component.transformation() * glyph_outline(&base, stack)?;
        path.extend(outline.elements().iter().copied());
    }
    stack.pop();
    Ok(path)
}

/// `identifier`, unless something in `used` already claims it
fn claim_identifier(identifier: Option<String>, used: &mut HashSet<String>) -> Option<String> {
    identifier.filter(|identifier| used.insert(identifier.clone()))
}

/// Appends drawn contours and components to a glyph. Identifiers already
/// used in the glyph are dropped.
pub struct GlyphPointPen<G> {
    glyph: G,
    buffer: PathBuffer,
}

impl<G: BaseGlyph> PointPen for GlyphPointPen<G> {
    fn begin_path(&mut self, identifier: Option<&str>) -> Result<()> {
        self.buffer.begin(identifier)
    }

    fn add_point(&mut self, point: &UfoPoint) -> Result<()> {
        self.buffer.push(point)
    }

    fn end_path(&mut self) -> Result<()> {
        let (identifier, points) = self.buffer.finish()?;
        let identifier = identifier.as_deref().map(normalize_identifier).transpose()?;
        let mut used = self.glyph.identifiers();
        let identifier = claim_identifier(identifier, &mut used);
        let contour = self.glyph.raw_new_contour(identifier)?;
        contour.set_glyph(&self.glyph);
        for mut point in points {
            point.identifier = claim_identifier(point.identifier.take(), &mut used);
            contour.append_point(point)?;
        }
        self.glyph.changed();
        Ok(())
    }

    fn add_component(
        &mut self,
        base_glyph: &str,
        transformation: Affine,
        identifier: Option<&str>,
    ) -> Result<()> {
        let base_glyph = normalize_component_base_glyph(base_glyph)?;
        let identifier = identifier.map(normalize_identifier).transpose()?;
        let identifier = claim_identifier(identifier, &mut self.glyph.identifiers());
        let component = self
            .glyph
            .raw_new_component(base_glyph, transformation, identifier)?;
        component.set_glyph(&self.glyph);
        self.glyph.changed();
        Ok(())
    }
}
