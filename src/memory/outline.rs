//! Points, contours, components, anchors and guidelines

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Weak;

use kurbo::{Affine, Point, Vec2};

use super::font::{FontData, MemoryFont};
use super::glyph::{GlyphData, MemoryGlyph};
use super::{make_identifier, Memory};
use crate::error::{Error, Result};
use crate::geometry::{Color, PointType, UfoPoint};
use crate::objects::anchor::transform_anchor;
use crate::objects::component::transform_component;
use crate::objects::contour::transform_contour_points;
use crate::objects::guideline::transform_guideline;
use crate::objects::point::transform_point_coordinates;
use crate::objects::base::position_of;
use crate::objects::{
    AnchorBackend, BaseGlyph, BaseObject, ComponentBackend, ContourBackend, GuidelineBackend,
    GuidelineParent, PointBackend, Transformation,
};

fn glyph_identifiers(glyph: Option<MemoryGlyph>) -> HashSet<String> {
    glyph.map(|glyph| glyph.identifiers()).unwrap_or_default()
}

/// Move `item` to `index` within `items`.
fn move_to_index<T: BaseObject>(items: &mut Vec<T>, item: &T, index: usize) -> Result<()> {
    let current = position_of(items, item)
        .ok_or_else(|| Error::Orphan("The object is not in its parent.".into()))?;
    let item = items.remove(current);
    items.insert(index.min(items.len()), item);
    Ok(())
}

// -----
// Point
// -----

#[derive(Debug)]
pub(crate) struct PointData {
    pub(crate) point: UfoPoint,
    pub(crate) contour: Weak<RefCell<ContourData>>,
}

native_handle!(
    /// A contour point
    MemoryPoint => PointData
);

impl MemoryPoint {
    pub(crate) fn from_ufo_point(point: UfoPoint) -> Self {
        Self::from_data(PointData {
            point,
            contour: Weak::new(),
        })
    }

    pub(crate) fn to_ufo_point(&self) -> UfoPoint {
        self.0.borrow().point.clone()
    }
}

impl BaseObject for MemoryPoint {
    const OBJECT_NAME: &'static str = "Point";

    fn native_id(&self) -> usize {
        self.address()
    }

    fn repr_contents(&self) -> Vec<String> {
        let data = self.0.borrow();
        let point = &data.point;
        let mut contents = vec![
            format!("'{}'", point.point_type),
            format!("({}, {})", point.x, point.y),
        ];
        if let Some(name) = &point.name {
            contents.push(format!("name='{name}'"));
        }
        if point.smooth {
            contents.push("smooth=True".to_string());
        }
        contents
    }
}

impl Transformation for MemoryPoint {
    fn raw_transform_by(&self, matrix: Affine, _origin: Point, origin_offset: Vec2) -> Result<()> {
        transform_point_coordinates(self, matrix, origin_offset)
    }
}

impl PointBackend for MemoryPoint {
    type Env = Memory;

    fn raw_new() -> Self {
        Self::from_ufo_point(UfoPoint::line_to(0.0, 0.0))
    }

    fn raw_contour(&self) -> Option<MemoryContour> {
        MemoryContour::upgrade(&self.0.borrow().contour)
    }

    fn raw_set_contour(&self, contour: Option<MemoryContour>) {
        self.0.borrow_mut().contour = contour.map_or_else(Weak::new, |contour| contour.downgrade());
    }

    fn raw_point_type(&self) -> PointType {
        self.0.borrow().point.point_type
    }

    fn raw_set_point_type(&self, value: PointType) {
        let mut data = self.0.borrow_mut();
        data.point.point_type = value;
        if !value.is_on_curve() {
            data.point.smooth = false;
        }
    }

    fn raw_smooth(&self) -> bool {
        self.0.borrow().point.smooth
    }

    fn raw_set_smooth(&self, value: bool) {
        self.0.borrow_mut().point.smooth = value;
    }

    fn raw_x(&self) -> f64 {
        self.0.borrow().point.x
    }

    fn raw_set_x(&self, value: f64) {
        self.0.borrow_mut().point.x = value;
    }

    fn raw_y(&self) -> f64 {
        self.0.borrow().point.y
    }

    fn raw_set_y(&self, value: f64) {
        self.0.borrow_mut().point.y = value;
    }

    fn raw_name(&self) -> Option<String> {
        self.0.borrow().point.name.clone()
    }

    fn raw_set_name(&self, value: Option<String>) {
        self.0.borrow_mut().point.name = value;
    }

    fn raw_identifier(&self) -> Option<String> {
        self.0.borrow().point.identifier.clone()
    }

    fn raw_generate_identifier(&self) -> Result<String> {
        let glyph = self.raw_contour().and_then(|contour| contour.raw_glyph());
        let identifier = make_identifier(&glyph_identifiers(glyph));
        self.0.borrow_mut().point.identifier = Some(identifier.clone());
        Ok(identifier)
    }
}

// -------
// Contour
// -------

#[derive(Debug, Default)]
pub(crate) struct ContourData {
    pub(crate) points: Vec<MemoryPoint>,
    pub(crate) identifier: Option<String>,
    pub(crate) glyph: Weak<RefCell<GlyphData>>,
}

native_handle!(
    /// An ordered list of points
    MemoryContour => ContourData
);

impl MemoryContour {
    /// The points as plain records
    pub(crate) fn to_ufo_points(&self) -> Vec<UfoPoint> {
        self.0
            .borrow()
            .points
            .iter()
            .map(MemoryPoint::to_ufo_point)
            .collect()
    }
}

impl BaseObject for MemoryContour {
    const OBJECT_NAME: &'static str = "Contour";

    fn native_id(&self) -> usize {
        self.address()
    }

    fn repr_contents(&self) -> Vec<String> {
        let mut contents = Vec::new();
        if let Some(identifier) = self.raw_identifier() {
            contents.push(format!("identifier='{identifier}'"));
        }
        if let Some(glyph) = self.raw_glyph() {
            contents.push("in glyph".to_string());
            contents.extend(glyph.repr_contents());
        }
        contents
    }
}

impl Transformation for MemoryContour {
    fn raw_transform_by(&self, matrix: Affine, origin: Point, origin_offset: Vec2) -> Result<()> {
        transform_contour_points(self, matrix, origin, origin_offset)
    }
}

impl ContourBackend for MemoryContour {
    type Env = Memory;

    fn raw_new() -> Self {
        Self::from_data(ContourData::default())
    }

    fn raw_glyph(&self) -> Option<MemoryGlyph> {
        MemoryGlyph::upgrade(&self.0.borrow().glyph)
    }

    fn raw_set_glyph(&self, glyph: Option<MemoryGlyph>) {
        self.0.borrow_mut().glyph = glyph.map_or_else(Weak::new, |glyph| glyph.downgrade());
    }

    fn raw_identifier(&self) -> Option<String> {
        self.0.borrow().identifier.clone()
    }

    fn raw_generate_identifier(&self) -> Result<String> {
        let identifier = make_identifier(&glyph_identifiers(self.raw_glyph()));
        self.0.borrow_mut().identifier = Some(identifier.clone());
        Ok(identifier)
    }

    fn raw_generate_identifier_for_point(&self, point: &MemoryPoint) -> Result<String> {
        point.raw_generate_identifier()
    }

    fn raw_points(&self) -> Vec<MemoryPoint> {
        self.0.borrow().points.clone()
    }

    fn raw_insert_point(&self, index: usize, point: &UfoPoint) -> Result<MemoryPoint> {
        let inserted = MemoryPoint::from_ufo_point(point.clone());
        inserted.raw_set_contour(Some(self.clone()));
        let mut data = self.0.borrow_mut();
        let index = index.min(data.points.len());
        data.points.insert(index, inserted.clone());
        Ok(inserted)
    }

    fn raw_remove_point(&self, index: usize) -> Result<()> {
        let mut data = self.0.borrow_mut();
        if index >= data.points.len() {
            return Err(Error::not_found(format!("No point located at index {index}.")));
        }
        let removed = data.points.remove(index);
        removed.0.borrow_mut().contour = Weak::new();
        Ok(())
    }

    fn raw_set_index(&self, index: usize) -> Result<()> {
        let glyph = self
            .raw_glyph()
            .ok_or_else(|| Error::Orphan("The contour does not belong to a glyph.".into()))?;
        let mut data = glyph.0.borrow_mut();
        move_to_index(&mut data.contours, self, index)
    }
}

// ---------
// Component
// ---------

#[derive(Debug)]
pub(crate) struct ComponentData {
    pub(crate) base_glyph: String,
    pub(crate) transformation: Affine,
    pub(crate) identifier: Option<String>,
    pub(crate) glyph: Weak<RefCell<GlyphData>>,
}

native_handle!(
    /// A reference to another glyph, placed by an affine transformation
    MemoryComponent => ComponentData
);

impl MemoryComponent {
    pub(crate) fn with_base(
        base_glyph: String,
        transformation: Affine,
        identifier: Option<String>,
    ) -> Self {
        Self::from_data(ComponentData {
            base_glyph,
            transformation,
            identifier,
            glyph: Weak::new(),
        })
    }
}

impl BaseObject for MemoryComponent {
    const OBJECT_NAME: &'static str = "Component";

    fn native_id(&self) -> usize {
        self.address()
    }

    fn repr_contents(&self) -> Vec<String> {
        let offset = self.raw_offset();
        let mut contents = vec![
            format!("baseGlyph='{}'", self.raw_base_glyph()),
            format!("offset='({}, {})'", offset.x, offset.y),
        ];
        if let Some(glyph) = self.raw_glyph() {
            contents.push("in glyph".to_string());
            contents.extend(glyph.repr_contents());
        }
        contents
    }
}

impl Transformation for MemoryComponent {
    fn raw_transform_by(&self, matrix: Affine, _origin: Point, origin_offset: Vec2) -> Result<()> {
        transform_component(self, matrix, origin_offset)
    }
}

impl ComponentBackend for MemoryComponent {
    type Env = Memory;

    fn raw_new() -> Self {
        Self::with_base(String::new(), Affine::IDENTITY, None)
    }

    fn raw_glyph(&self) -> Option<MemoryGlyph> {
        MemoryGlyph::upgrade(&self.0.borrow().glyph)
    }

    fn raw_set_glyph(&self, glyph: Option<MemoryGlyph>) {
        self.0.borrow_mut().glyph = glyph.map_or_else(Weak::new, |glyph| glyph.downgrade());
    }

    fn raw_base_glyph(&self) -> String {
        self.0.borrow().base_glyph.clone()
    }

    fn raw_set_base_glyph(&self, value: String) {
        self.0.borrow_mut().base_glyph = value;
    }

    fn raw_transformation(&self) -> Affine {
        self.0.borrow().transformation
    }

    fn raw_set_transformation(&self, value: Affine) {
        self.0.borrow_mut().transformation = value;
    }

    fn raw_identifier(&self) -> Option<String> {
        self.0.borrow().identifier.clone()
    }

    fn raw_generate_identifier(&self) -> Result<String> {
        let identifier = make_identifier(&glyph_identifiers(self.raw_glyph()));
        self.0.borrow_mut().identifier = Some(identifier.clone());
        Ok(identifier)
    }

    fn raw_set_index(&self, index: usize) -> Result<()> {
        let glyph = self
            .raw_glyph()
            .ok_or_else(|| Error::Orphan("The component does not belong to a glyph.".into()))?;
        let mut data = glyph.0.borrow_mut();
        move_to_index(&mut data.components, self, index)
    }
}

// ------
// Anchor
// ------

#[derive(Debug, Default)]
pub(crate) struct AnchorData {
    pub(crate) x: f64,
    pub(crate) y: f64,
    pub(crate) name: Option<String>,
    pub(crate) color: Option<Color>,
    pub(crate) identifier: Option<String>,
    pub(crate) glyph: Weak<RefCell<GlyphData>>,
}

native_handle!(
    /// A named attachment position
    MemoryAnchor => AnchorData
);

impl BaseObject for MemoryAnchor {
    const OBJECT_NAME: &'static str = "Anchor";

    fn native_id(&self) -> usize {
        self.address()
    }

    fn repr_contents(&self) -> Vec<String> {
        let data = self.0.borrow();
        let mut contents = Vec::new();
        if let Some(name) = &data.name {
            contents.push(format!("'{name}'"));
        }
        contents.push(format!("({}, {})", data.x, data.y));
        contents
    }
}

impl Transformation for MemoryAnchor {
    fn raw_transform_by(&self, matrix: Affine, _origin: Point, origin_offset: Vec2) -> Result<()> {
        transform_anchor(self, matrix, origin_offset)
    }
}

impl AnchorBackend for MemoryAnchor {
    type Env = Memory;

    fn raw_new() -> Self {
        Self::from_data(AnchorData::default())
    }

    fn raw_glyph(&self) -> Option<MemoryGlyph> {
        MemoryGlyph::upgrade(&self.0.borrow().glyph)
    }

    fn raw_set_glyph(&self, glyph: Option<MemoryGlyph>) {
        self.0.borrow_mut().glyph = glyph.map_or_else(Weak::new, |glyph| glyph.downgrade());
    }

    fn raw_name(&self) -> Option<String> {
        self.0.borrow().name.clone()
    }

    fn raw_set_name(&self, value: Option<String>) {
        self.0.borrow_mut().name = value;
    }

    fn raw_x(&self) -> f64 {
        self.0.borrow().x
    }

    fn raw_set_x(&self, value: f64) {
        self.0.borrow_mut().x = value;
    }

    fn raw_y(&self) -> f64 {
        self.0.borrow().y
    }

    fn raw_set_y(&self, value: f64) {
        self.0.borrow_mut().y = value;
    }

    fn raw_color(&self) -> Option<Color> {
        self.0.borrow().color
    }

    fn raw_set_color(&self, value: Option<Color>) {
        self.0.borrow_mut().color = value;
    }

    fn raw_identifier(&self) -> Option<String> {
        self.0.borrow().identifier.clone()
    }

    fn raw_generate_identifier(&self) -> Result<String> {
        let identifier = make_identifier(&glyph_identifiers(self.raw_glyph()));
        self.0.borrow_mut().identifier = Some(identifier.clone());
        Ok(identifier)
    }
}

// ---------
// Guideline
// ---------

#[derive(Debug, Default)]
pub(crate) enum GuidelineOwner {
    #[default]
    None,
    Glyph(Weak<RefCell<GlyphData>>),
    Font(Weak<RefCell<FontData>>),
}

#[derive(Debug, Default)]
pub(crate) struct GuidelineData {
    pub(crate) x: f64,
    pub(crate) y: f64,
    pub(crate) angle: f64,
    pub(crate) name: Option<String>,
    pub(crate) color: Option<Color>,
    pub(crate) identifier: Option<String>,
    pub(crate) owner: GuidelineOwner,
}

native_handle!(
    /// A guideline in a glyph or in the font
    MemoryGuideline => GuidelineData
);

impl BaseObject for MemoryGuideline {
    const OBJECT_NAME: &'static str = "Guideline";

    fn native_id(&self) -> usize {
        self.address()
    }

    fn repr_contents(&self) -> Vec<String> {
        let data = self.0.borrow();
        let mut contents = Vec::new();
        if let Some(name) = &data.name {
            contents.push(format!("'{name}'"));
        }
        contents.push(format!("({}, {})", data.x, data.y));
        contents.push(format!("angle={}", data.angle));
        contents
    }
}

impl Transformation for MemoryGuideline {
    fn raw_transform_by(&self, matrix: Affine, _origin: Point, origin_offset: Vec2) -> Result<()> {
        transform_guideline(self, matrix, origin_offset)
    }
}

impl GuidelineBackend for MemoryGuideline {
    type Env = Memory;

    fn raw_new() -> Self {
        Self::from_data(GuidelineData::default())
    }

    fn raw_parent(&self) -> Option<GuidelineParent<Memory>> {
        match &self.0.borrow().owner {
            GuidelineOwner::None => None,
            GuidelineOwner::Glyph(glyph) => MemoryGlyph::upgrade(glyph).map(GuidelineParent::Glyph),
            GuidelineOwner::Font(font) => MemoryFont::upgrade(font).map(GuidelineParent::Font),
        }
    }

    fn raw_set_parent(&self, parent: Option<GuidelineParent<Memory>>) {
        self.0.borrow_mut().owner = match parent {
            None => GuidelineOwner::None,
            Some(GuidelineParent::Glyph(glyph)) => GuidelineOwner::Glyph(glyph.downgrade()),
            Some(GuidelineParent::Font(font)) => GuidelineOwner::Font(font.downgrade()),
        };
    }

    fn raw_x(&self) -> f64 {
        self.0.borrow().x
    }

    fn raw_set_x(&self, value: f64) {
        self.0.borrow_mut().x = value;
    }

    fn raw_y(&self) -> f64 {
        self.0.borrow().y
    }

    fn raw_set_y(&self, value: f64) {
        self.0.borrow_mut().y = value;
    }

    fn raw_angle(&self) -> f64 {
        self.0.borrow().angle
    }

    fn raw_set_angle(&self, value: f64) {
        self.0.borrow_mut().angle = value;
    }

    fn raw_name(&self) -> Option<String> {
        self.0.borrow().name.clone()
    }

    fn raw_set_name(&self, value: Option<String>) {
        self.0.borrow_mut().name = value;
    }

    fn raw_color(&self) -> Option<Color> {
        self.0.borrow().color
    }

    fn raw_set_color(&self, value: Option<Color>) {
        self.0.borrow_mut().color = value;
    }

    fn raw_identifier(&self) -> Option<String> {
        self.0.borrow().identifier.clone()
    }

    fn raw_generate_identifier(&self) -> Result<String> {
        let taken = match self.raw_parent() {
            Some(GuidelineParent::Glyph(glyph)) => glyph.identifiers(),
            Some(GuidelineParent::Font(font)) => font.guideline_identifiers(),
            None => HashSet::new(),
        };
        let identifier = make_identifier(&taken);
        self.0.borrow_mut().identifier = Some(identifier.clone());
        Ok(identifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::prelude::*;

    #[test]
    fn test_point_identity_follows_native_data() {
        let point = MemoryPoint::raw_new();
        let same = point.clone();
        let other = MemoryPoint::raw_new();
        assert!(point.is_same(&same));
        assert!(!point.is_same(&other));
    }

    #[test]
    fn test_orphan_point_generates_identifier() {
        let point = MemoryPoint::raw_new();
        assert_eq!(point.raw_identifier(), None);
        let identifier = point.generate_identifier().unwrap();
        assert_eq!(point.identifier(), Some(identifier));
    }

    #[test]
    fn test_removed_point_loses_its_contour() {
        let contour = MemoryContour::raw_new();
        let point = contour.raw_insert_point(0, &UfoPoint::line_to(1.0, 2.0)).unwrap();
        assert!(point.contour().is_some());
        contour.raw_remove_point(0).unwrap();
        assert!(point.contour().is_none());
    }

    #[test]
    fn test_point_repr() {
        let point = MemoryPoint::from_ufo_point(UfoPoint::curve_to(10.0, 20.0).with_name("tip"));
        assert!(point.repr().starts_with("<Point 'curve' (10, 20) name='tip' at "));
    }
}
