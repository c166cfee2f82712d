//! Layers

use std::cell::RefCell;
use std::rc::Weak;

use indexmap::IndexMap;
use tracing::debug;

use super::dicts::MemoryLib;
use super::font::{FontData, MemoryFont};
use super::glyph::{GlyphData, MemoryGlyph};
use super::Memory;
use crate::error::{Error, Result};
use crate::geometry::Color;
use crate::objects::{BaseObject, LayerBackend};

#[derive(Debug)]
pub(crate) struct LayerData {
    pub(crate) name: String,
    pub(crate) color: Option<Color>,
    pub(crate) lib: MemoryLib,
    pub(crate) glyphs: IndexMap<String, MemoryGlyph>,
    pub(crate) font: Weak<RefCell<FontData>>,
}

impl LayerData {
    pub(crate) fn new(name: String) -> Self {
        Self {
            name,
            color: None,
            lib: MemoryLib::new(),
            glyphs: IndexMap::new(),
            font: Weak::new(),
        }
    }
}

native_handle!(
    /// A named set of glyphs
    MemoryLayer => LayerData
);

impl MemoryLayer {
    /// Add an already built glyph, replacing any glyph with its name.
    pub(crate) fn adopt_glyph(&self, glyph: MemoryGlyph) {
        glyph.0.borrow_mut().layer = self.downgrade();
        let name = glyph.0.borrow().name.clone();
        self.0.borrow_mut().glyphs.insert(name, glyph);
    }

    /// Default advance width and height for new glyphs
    fn glyph_defaults(&self) -> (f64, f64) {
        MemoryFont::upgrade(&self.0.borrow().font)
            .map(|font| {
                let data = font.0.borrow();
                (data.glyph_width, data.glyph_height)
            })
            .unwrap_or_default()
    }
}

impl BaseObject for MemoryLayer {
    const OBJECT_NAME: &'static str = "Layer";

    fn native_id(&self) -> usize {
        self.address()
    }

    fn repr_contents(&self) -> Vec<String> {
        let mut contents = vec![format!("'{}'", self.raw_name())];
        if let Some(color) = self.raw_color() {
            contents.push(format!("color={color}"));
        }
        if let Some(font) = self.raw_font() {
            contents.push("in font".to_string());
            contents.extend(font.repr_contents());
        }
        contents
    }
}

impl LayerBackend for MemoryLayer {
    type Env = Memory;

    fn raw_new() -> Self {
        Self::from_data(LayerData::new(String::new()))
    }

    fn raw_font(&self) -> Option<MemoryFont> {
        MemoryFont::upgrade(&self.0.borrow().font)
    }

    fn raw_set_font(&self, font: Option<MemoryFont>) {
        self.0.borrow_mut().font = font.map_or_else(Weak::new, |font| font.downgrade());
    }

    fn raw_name(&self) -> String {
        self.0.borrow().name.clone()
    }

    /// Rename the layer, keeping its place in the font's layer order.
    fn raw_set_name(&self, value: String) -> Result<()> {
        let old = self.raw_name();
        if let Some(font) = self.raw_font() {
            let mut data = font.0.borrow_mut();
            if data.layers.contains_key(&value) {
                return Err(Error::Duplicate(format!(
                    "A layer with the name '{value}' already exists."
                )));
            }
            let layers = std::mem::take(&mut data.layers);
            data.layers = layers
                .into_iter()
                .map(|(name, layer)| {
                    if name == old {
                        (value.clone(), layer)
                    } else {
                        (name, layer)
                    }
                })
                .collect();
            if data.default_layer_name == old {
                data.default_layer_name = value.clone();
            }
        }
        debug!("Renamed layer '{}' to '{}'", old, value);
        self.0.borrow_mut().name = value;
        Ok(())
    }

    fn raw_color(&self) -> Option<Color> {
        self.0.borrow().color
    }

    fn raw_set_color(&self, value: Option<Color>) {
        self.0.borrow_mut().color = value;
    }

    fn raw_lib(&self) -> MemoryLib {
        self.0.borrow().lib.clone()
    }

    fn raw_keys(&self) -> Vec<String> {
        self.0.borrow().glyphs.keys().cloned().collect()
    }

    fn raw_glyph(&self, name: &str) -> Option<MemoryGlyph> {
        self.0.borrow().glyphs.get(name).cloned()
    }

    fn raw_new_glyph(&self, name: String) -> Result<MemoryGlyph> {
        if self.raw_contains(&name) {
            return Err(Error::Duplicate(format!(
                "A glyph with the name '{name}' already exists."
            )));
        }
        let (width, height) = self.glyph_defaults();
        let glyph = MemoryGlyph::from_data(GlyphData::new(name, width, height));
        self.adopt_glyph(glyph.clone());
        Ok(glyph)
    }

    fn raw_remove_glyph(&self, name: &str) -> Result<()> {
        let removed = self
            .0
            .borrow_mut()
            .glyphs
            .shift_remove(name)
            .ok_or_else(|| Error::not_found(format!("No glyph with the name '{name}' exists.")))?;
        removed.0.borrow_mut().layer = Weak::new();
        Ok(())
    }

    fn raw_contains(&self, name: &str) -> bool {
        self.0.borrow().glyphs.contains_key(name)
    }

    fn raw_len(&self) -> usize {
        self.0.borrow().glyphs.len()
    }
}
