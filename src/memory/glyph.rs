//! Glyphs

use std::cell::RefCell;
use std::rc::Weak;

use kurbo::{Affine, Point, Vec2};
use tracing::debug;

use super::dicts::MemoryLib;
use super::layer::{LayerData, MemoryLayer};
use super::outline::{
    ContourData, GuidelineOwner, MemoryAnchor, MemoryComponent, MemoryContour, MemoryGuideline,
};
use super::Memory;
use crate::error::{Error, Result};
use crate::objects::glyph::transform_glyph;
use crate::objects::{
    AnchorBackend, BaseObject, ComponentBackend, GlyphBackend, GuidelineBackend, LayerBackend,
    Transformation,
};

/// The code point a glyph name stands for, from `uniXXXX` and
/// `uXXXX`..`uXXXXXX` names.
pub fn unicode_from_glyph_name(name: &str) -> Option<u32> {
    let parse = |digits: &str| {
        if digits.chars().all(|c| c.is_ascii_hexdigit()) {
            u32::from_str_radix(digits, 16)
                .ok()
                .filter(|value| char::from_u32(*value).is_some())
        } else {
            None
        }
    };
    if let Some(digits) = name.strip_prefix("uni") {
        if digits.len() == 4 {
            return parse(digits);
        }
        return None;
    }
    if let Some(digits) = name.strip_prefix('u') {
        if (4..=6).contains(&digits.len()) {
            return parse(digits);
        }
    }
    None
}

#[derive(Debug)]
pub(crate) struct GlyphData {
    pub(crate) name: String,
    pub(crate) unicodes: Vec<u32>,
    pub(crate) width: f64,
    pub(crate) height: f64,
    pub(crate) note: Option<String>,
    pub(crate) lib: MemoryLib,
    pub(crate) contours: Vec<MemoryContour>,
    pub(crate) components: Vec<MemoryComponent>,
    pub(crate) anchors: Vec<MemoryAnchor>,
    pub(crate) guidelines: Vec<MemoryGuideline>,
    pub(crate) layer: Weak<RefCell<LayerData>>,
}

impl GlyphData {
    pub(crate) fn new(name: String, width: f64, height: f64) -> Self {
        Self {
            name,
            unicodes: Vec::new(),
            width,
            height,
            note: None,
            lib: MemoryLib::new(),
            contours: Vec::new(),
            components: Vec::new(),
            anchors: Vec::new(),
            guidelines: Vec::new(),
            layer: Weak::new(),
        }
    }
}

native_handle!(
    /// A glyph in a layer
    MemoryGlyph => GlyphData
);

impl BaseObject for MemoryGlyph {
    const OBJECT_NAME: &'static str = "Glyph";

    fn native_id(&self) -> usize {
        self.address()
    }

    fn repr_contents(&self) -> Vec<String> {
        let mut contents = vec![format!("'{}'", self.raw_name())];
        if let Some(layer) = self.raw_layer() {
            contents.push(format!("('{}')", layer.raw_name()));
        }
        contents
    }
}

impl Transformation for MemoryGlyph {
    fn raw_transform_by(&self, matrix: Affine, origin: Point, _origin_offset: Vec2) -> Result<()> {
        transform_glyph(self, matrix, origin)
    }
}

impl GlyphBackend for MemoryGlyph {
    type Env = Memory;

    fn raw_new() -> Self {
        Self::from_data(GlyphData::new(String::new(), 0.0, 0.0))
    }

    fn raw_layer(&self) -> Option<MemoryLayer> {
        MemoryLayer::upgrade(&self.0.borrow().layer)
    }

    fn raw_set_layer(&self, layer: Option<MemoryLayer>) {
        self.0.borrow_mut().layer = layer.map_or_else(Weak::new, |layer| layer.downgrade());
    }

    fn raw_name(&self) -> String {
        self.0.borrow().name.clone()
    }

    /// Rename the glyph, rekeying it in its layer.
    fn raw_set_name(&self, value: String) -> Result<()> {
        let old = self.raw_name();
        if let Some(layer) = self.raw_layer() {
            let mut data = layer.0.borrow_mut();
            if data.glyphs.contains_key(&value) {
                return Err(Error::Duplicate(format!(
                    "A glyph with the name '{value}' already exists."
                )));
            }
            if let Some((index, _, glyph)) = data.glyphs.shift_remove_full(&old) {
                data.glyphs.shift_insert(index, value.clone(), glyph);
            }
        }
        debug!("Renamed glyph '{}' to '{}'", old, value);
        self.0.borrow_mut().name = value;
        Ok(())
    }

    fn raw_unicodes(&self) -> Vec<u32> {
        self.0.borrow().unicodes.clone()
    }

    fn raw_set_unicodes(&self, value: Vec<u32>) {
        self.0.borrow_mut().unicodes = value;
    }

    fn raw_auto_unicodes(&self) -> Result<()> {
        if let Some(value) = unicode_from_glyph_name(&self.raw_name()) {
            self.raw_set_unicodes(vec![value]);
        }
        Ok(())
    }

    fn raw_width(&self) -> f64 {
        self.0.borrow().width
    }

    fn raw_set_width(&self, value: f64) {
        self.0.borrow_mut().width = value;
    }

    fn raw_height(&self) -> f64 {
        self.0.borrow().height
    }

    fn raw_set_height(&self, value: f64) {
        self.0.borrow_mut().height = value;
    }

    fn raw_contours(&self) -> Vec<MemoryContour> {
        self.0.borrow().contours.clone()
    }

    fn raw_new_contour(&self, identifier: Option<String>) -> Result<MemoryContour> {
        let contour = MemoryContour::from_data(ContourData {
            points: Vec::new(),
            identifier,
            glyph: self.downgrade(),
        });
        self.0.borrow_mut().contours.push(contour.clone());
        Ok(contour)
    }

    fn raw_remove_contour(&self, index: usize) -> Result<()> {
        let mut data = self.0.borrow_mut();
        if index >= data.contours.len() {
            return Err(Error::not_found(format!("No contour located at index {index}.")));
        }
        let removed = data.contours.remove(index);
        removed.0.borrow_mut().glyph = Weak::new();
        Ok(())
    }

    fn raw_components(&self) -> Vec<MemoryComponent> {
        self.0.borrow().components.clone()
    }

    fn raw_new_component(
        &self,
        base_glyph: String,
        transformation: Affine,
        identifier: Option<String>,
    ) -> Result<MemoryComponent> {
        let component = MemoryComponent::with_base(base_glyph, transformation, identifier);
        component.raw_set_glyph(Some(self.clone()));
        self.0.borrow_mut().components.push(component.clone());
        Ok(component)
    }

    fn raw_remove_component(&self, index: usize) -> Result<()> {
        let mut data = self.0.borrow_mut();
        if index >= data.components.len() {
            return Err(Error::not_found(format!(
                "No component located at index {index}."
            )));
        }
        let removed = data.components.remove(index);
        removed.0.borrow_mut().glyph = Weak::new();
        Ok(())
    }

    fn raw_anchors(&self) -> Vec<MemoryAnchor> {
        self.0.borrow().anchors.clone()
    }

    fn raw_new_anchor(&self) -> Result<MemoryAnchor> {
        let anchor = MemoryAnchor::raw_new();
        anchor.raw_set_glyph(Some(self.clone()));
        self.0.borrow_mut().anchors.push(anchor.clone());
        Ok(anchor)
    }

    fn raw_remove_anchor(&self, index: usize) -> Result<()> {
        let mut data = self.0.borrow_mut();
        if index >= data.anchors.len() {
            return Err(Error::not_found(format!("No anchor located at index {index}.")));
        }
        let removed = data.anchors.remove(index);
        removed.0.borrow_mut().glyph = Weak::new();
        Ok(())
    }

    fn raw_guidelines(&self) -> Vec<MemoryGuideline> {
        self.0.borrow().guidelines.clone()
    }

    fn raw_new_guideline(&self) -> Result<MemoryGuideline> {
        let guideline = MemoryGuideline::raw_new();
        guideline.0.borrow_mut().owner = GuidelineOwner::Glyph(self.downgrade());
        self.0.borrow_mut().guidelines.push(guideline.clone());
        Ok(guideline)
    }

    fn raw_remove_guideline(&self, index: usize) -> Result<()> {
        let mut data = self.0.borrow_mut();
        if index >= data.guidelines.len() {
            return Err(Error::not_found(format!(
                "No guideline located at index {index}."
            )));
        }
        let removed = data.guidelines.remove(index);
        removed.0.borrow_mut().owner = GuidelineOwner::None;
        Ok(())
    }

    fn raw_note(&self) -> Option<String> {
        self.0.borrow().note.clone()
    }

    fn raw_set_note(&self, value: Option<String>) {
        self.0.borrow_mut().note = value;
    }

    fn raw_lib(&self) -> MemoryLib {
        self.0.borrow().lib.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::ContourBackend;

    #[test]
    fn test_unicode_from_glyph_name() {
        assert_eq!(unicode_from_glyph_name("uni0041"), Some(0x41));
        assert_eq!(unicode_from_glyph_name("u1F600"), Some(0x1F600));
        assert_eq!(unicode_from_glyph_name("u0041"), Some(0x41));
        assert_eq!(unicode_from_glyph_name("uni00410042"), None);
        assert_eq!(unicode_from_glyph_name("uni0041.alt"), None);
        assert_eq!(unicode_from_glyph_name("uniD800"), None);
        assert_eq!(unicode_from_glyph_name("A"), None);
    }

    #[test]
    fn test_removed_contour_is_detached() {
        let glyph = MemoryGlyph::raw_new();
        let contour = glyph.raw_new_contour(None).unwrap();
        assert!(contour.raw_glyph().is_some());
        glyph.raw_remove_contour(0).unwrap();
        assert!(contour.raw_glyph().is_none());
        assert!(glyph.raw_remove_contour(0).is_err());
    }
}
