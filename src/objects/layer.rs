//! Layers: named sets of glyphs within a font

use std::collections::BTreeMap;

use tracing::debug;

use super::base::BaseObject;
use super::component::BaseComponent;
use super::dict::BaseDict;
use super::font::BaseFont;
use super::font_lib::{BaseLib, LibParent};
use super::glyph::BaseGlyph;
use super::{Environment, FontOf, GlyphOf, LibOf};
use crate::error::{Error, Result};
use crate::geometry::Color;
use crate::normalizers::{
    normalize_color, normalize_glyph_name, normalize_interpolation_factor, normalize_layer_name,
    AxisValue,
};

/// Environment hooks for a layer
pub trait LayerBackend: BaseObject {
    type Env: Environment<Layer = Self>;

    /// A new, empty layer with no parent font
    fn raw_new() -> Self;

    fn raw_font(&self) -> Option<FontOf<Self::Env>>;
    fn raw_set_font(&self, font: Option<FontOf<Self::Env>>);

    fn raw_name(&self) -> String;
    /// Rename the layer. No other layer in the font has the name.
    fn raw_set_name(&self, value: String) -> Result<()>;

    fn raw_color(&self) -> Option<Color>;
    fn raw_set_color(&self, value: Option<Color>);

    fn raw_lib(&self) -> LibOf<Self::Env>;

    fn raw_keys(&self) -> Vec<String>;
    fn raw_glyph(&self, name: &str) -> Option<GlyphOf<Self::Env>>;
    /// Create an empty glyph. No glyph with the name is in the layer.
    fn raw_new_glyph(&self, name: String) -> Result<GlyphOf<Self::Env>>;
    fn raw_remove_glyph(&self, name: &str) -> Result<()>;

    fn raw_contains(&self, name: &str) -> bool {
        self.raw_glyph(name).is_some()
    }

    fn raw_len(&self) -> usize {
        self.raw_keys().len()
    }

    /// Copy `glyph` into a new glyph called `name`.
    fn raw_insert_glyph(
        &self,
        glyph: &GlyphOf<Self::Env>,
        name: String,
    ) -> Result<GlyphOf<Self::Env>> {
        let dest = self.raw_new_glyph(name)?;
        dest.set_layer(self);
        dest.copy_data(glyph)?;
        Ok(dest)
    }

    fn raw_round(&self) -> Result<()> {
        for name in self.raw_keys() {
            if let Some(glyph) = self.raw_glyph(&name) {
                glyph.round()?;
            }
        }
        Ok(())
    }

    fn raw_auto_unicodes(&self) -> Result<()> {
        for name in self.raw_keys() {
            if let Some(glyph) = self.raw_glyph(&name) {
                glyph.auto_unicodes()?;
            }
        }
        Ok(())
    }

    /// Code point to the names of the glyphs mapped to it
    fn raw_character_mapping(&self) -> BTreeMap<u32, Vec<String>> {
        let mut mapping: BTreeMap<u32, Vec<String>> = BTreeMap::new();
        for name in self.raw_keys() {
            if let Some(glyph) = self.raw_glyph(&name) {
                for code_point in glyph.unicodes() {
                    mapping.entry(code_point).or_default().push(name.clone());
                }
            }
        }
        mapping
    }

    /// Base glyph to the names of the glyphs that use it as a component
    fn raw_reverse_component_mapping(&self) -> BTreeMap<String, Vec<String>> {
        let mut mapping: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for name in self.raw_keys() {
            if let Some(glyph) = self.raw_glyph(&name) {
                for component in glyph.components() {
                    let users = mapping.entry(component.base_glyph()).or_default();
                    if !users.contains(&name) {
                        users.push(name.clone());
                    }
                }
            }
        }
        mapping
    }

    /// Replace the glyphs with interpolations of the glyphs both `min` and
    /// `max` have.
    fn raw_interpolate(
        &self,
        factor: (f64, f64),
        min: &Self,
        max: &Self,
        round: bool,
        suppress_error: bool,
    ) -> Result<()> {
        for name in self.raw_keys() {
            self.raw_remove_glyph(&name)?;
        }
        for name in min.raw_keys() {
            let (Some(min_glyph), Some(max_glyph)) = (min.raw_glyph(&name), max.raw_glyph(&name))
            else {
                continue;
            };
            let dest = self.raw_new_glyph(name)?;
            dest.set_layer(self);
            dest.interpolate(factor, &min_glyph, &max_glyph, round, suppress_error)?;
        }
        Ok(())
    }
}

/// Public layer API
pub trait BaseLayer: LayerBackend {
    fn font(&self) -> Option<FontOf<Self::Env>> {
        self.raw_font()
    }

    fn set_font(&self, font: &FontOf<Self::Env>) {
        if self.raw_font().is_none() {
            self.raw_set_font(Some(font.clone()));
        }
    }

    fn name(&self) -> String {
        self.raw_name()
    }

    fn set_name(&self, value: &str) -> Result<()> {
        let value = normalize_layer_name(value)?;
        if value == self.raw_name() {
            return Ok(());
        }
        if let Some(font) = self.font() {
            if font.layer_order().contains(&value) {
                return Err(Error::Duplicate(format!(
                    "A layer with the name '{value}' already exists."
                )));
            }
        }
        self.raw_set_name(value)?;
        self.changed();
        Ok(())
    }

    fn color(&self) -> Option<Color> {
        self.raw_color()
    }

    fn set_color(&self, value: Option<Color>) -> Result<()> {
        let value = value.map(|color| normalize_color(color.to_array())).transpose()?;
        self.raw_set_color(value);
        self.changed();
        Ok(())
    }

    fn lib(&self) -> LibOf<Self::Env> {
        let lib = self.raw_lib();
        lib.set_parent(LibParent::Layer(self.clone()));
        lib
    }

    // ------
    // Glyphs
    // ------

    /// Glyph names, in no particular order
    fn keys(&self) -> Vec<String> {
        self.raw_keys()
    }

    fn len(&self) -> usize {
        self.raw_len()
    }

    fn is_empty(&self) -> bool {
        self.raw_len() == 0
    }

    fn contains(&self, name: &str) -> bool {
        self.raw_contains(name)
    }

    fn glyph(&self, name: &str) -> Result<GlyphOf<Self::Env>> {
        let name = normalize_glyph_name(name)?;
        let glyph = self
            .raw_glyph(&name)
            .ok_or_else(|| Error::not_found(format!("No glyph named '{name}'.")))?;
        glyph.set_layer(self);
        Ok(glyph)
    }

    fn glyphs(&self) -> Vec<GlyphOf<Self::Env>> {
        self.raw_keys()
            .iter()
            .filter_map(|name| self.raw_glyph(name))
            .inspect(|glyph| glyph.set_layer(self))
            .collect()
    }

    /// A new glyph called `name`. An existing glyph with the name is
    /// replaced when `clear` is set and returned as is otherwise.
    fn new_glyph(&self, name: &str, clear: bool) -> Result<GlyphOf<Self::Env>> {
        let name = normalize_glyph_name(name)?;
        if self.raw_contains(&name) {
            if !clear {
                return self.glyph(&name);
            }
            self.raw_remove_glyph(&name)?;
        }
        let glyph = self.raw_new_glyph(name)?;
        glyph.set_layer(self);
        self.changed();
        Ok(glyph)
    }

    /// Copy `glyph` into this layer, under `name` or the glyph's own name.
    fn insert_glyph(
        &self,
        glyph: &GlyphOf<Self::Env>,
        name: Option<&str>,
    ) -> Result<GlyphOf<Self::Env>> {
        let name = match name {
            Some(name) => name.to_string(),
            None => glyph.name(),
        };
        let name = normalize_glyph_name(&name)?;
        if self.raw_contains(&name) {
            self.raw_remove_glyph(&name)?;
        }
        let dest = self.raw_insert_glyph(glyph, name)?;
        self.changed();
        Ok(dest)
    }

    fn remove_glyph(&self, name: &str) -> Result<()> {
        let name = normalize_glyph_name(name)?;
        if !self.raw_contains(&name) {
            return Err(Error::not_found(format!(
                "No glyph with the name '{name}' exists."
            )));
        }
        self.raw_remove_glyph(&name)?;
        self.changed();
        Ok(())
    }

    fn round(&self) -> Result<()> {
        self.raw_round()?;
        self.changed();
        Ok(())
    }

    fn auto_unicodes(&self) -> Result<()> {
        self.raw_auto_unicodes()?;
        self.changed();
        Ok(())
    }

    fn character_mapping(&self) -> BTreeMap<u32, Vec<String>> {
        self.raw_character_mapping()
    }

    fn reverse_component_mapping(&self) -> BTreeMap<String, Vec<String>> {
        self.raw_reverse_component_mapping()
    }

    fn interpolate(
        &self,
        factor: impl Into<AxisValue>,
        min: &Self,
        max: &Self,
        round: bool,
        suppress_error: bool,
    ) -> Result<()> {
        let factor = normalize_interpolation_factor(factor)?;
        self.raw_interpolate(factor, min, max, round, suppress_error)?;
        debug!("Interpolated layer '{}'", self.name());
        self.changed();
        Ok(())
    }

    /// Compare every glyph the layers have in common.
    fn is_compatible(&self, other: &Self) -> (bool, String) {
        let mut compatible = true;
        let mut report = Vec::new();
        let mut ours = self.keys();
        let mut theirs = other.keys();
        ours.sort();
        theirs.sort();
        if ours != theirs {
            report.push("[Warning] The layers do not contain the same glyphs.".to_string());
        }
        for name in &ours {
            let (Some(a), Some(b)) = (self.raw_glyph(name), other.raw_glyph(name)) else {
                continue;
            };
            let (glyph_compatible, glyph_report) = a.is_compatible(&b);
            if !glyph_compatible {
                compatible = false;
            }
            if !glyph_report.is_empty() {
                report.push(format!("\n{name}:\n{glyph_report}"));
            }
        }
        (compatible, report.join("\n"))
    }

    /// Copy color, lib and glyphs from `source`.
    fn copy_data(&self, source: &Self) -> Result<()> {
        self.set_color(source.color())?;
        self.lib().update(source.lib().to_map())?;
        for glyph in source.glyphs() {
            self.insert_glyph(&glyph, None)?;
        }
        Ok(())
    }

    /// An orphan copy of the layer
    fn copy(&self) -> Result<Self> {
        let copy = Self::raw_new();
        copy.raw_set_name(self.name())?;
        copy.copy_data(self)?;
        Ok(copy)
    }
}

impl<T: LayerBackend> BaseLayer for T {}
