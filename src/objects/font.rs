//! Fonts: layers, font-wide data and file operations
//!
//! Glyph access on a font goes through its default layer.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::base::{position_of, BaseObject};
use super::dict::BaseDict;
use super::features::BaseFeatures;
use super::font_lib::{BaseLib, LibParent};
use super::groups::BaseGroups;
use super::guideline::{BaseGuideline, GuidelineBackend, GuidelineParent};
use super::info::BaseInfo;
use super::kerning::BaseKerning;
use super::layer::{BaseLayer, LayerBackend};
use super::{
    Environment, FeaturesOf, GlyphOf, GroupsOf, GuidelineOf, InfoOf, KerningOf, LayerOf, LibOf,
};
use crate::error::{not_implemented, Error, Result};
use crate::geometry::Color;
use crate::normalizers::{
    normalize_color, normalize_coordinate_tuple, normalize_default_layer_name,
    normalize_file_format_version, normalize_file_path, normalize_glyph_order,
    normalize_guideline_angle, normalize_guideline_name, normalize_index,
    normalize_interpolation_factor, normalize_layer_name, normalize_layer_order, AxisValue,
};

/// File extension for a generate format, or `fallback` for formats
/// without a known extension.
pub fn generate_format_to_extension(format: &str, fallback: &str) -> String {
    let extension = match format {
        "macttf" => ".ttf",
        "macttdfont" => ".dfont",
        "otfcff" => ".otf",
        "otfttf" => ".ttf",
        "ufo1" | "ufo2" | "ufo3" => ".ufo",
        "unixascii" => ".pfa",
        _ => fallback,
    };
    extension.to_string()
}

/// Environment hooks for a font
pub trait FontBackend: BaseObject {
    type Env: Environment<Font = Self>;

    /// A new font with one empty default layer
    fn raw_new() -> Self;

    fn raw_path(&self) -> Option<PathBuf>;

    /// Write the font to `path`, or to its own path when `path` is `None`.
    fn raw_save(&self, path: Option<&Path>, format_version: Option<u32>) -> Result<()> {
        let _ = (path, format_version);
        not_implemented(Self::OBJECT_NAME, "save")
    }

    fn raw_close(&self) -> Result<()> {
        not_implemented(Self::OBJECT_NAME, "close")
    }

    fn raw_generate(&self, format: &str, path: &Path) -> Result<()> {
        let _ = (format, path);
        not_implemented(Self::OBJECT_NAME, "generate")
    }

    fn raw_info(&self) -> InfoOf<Self::Env>;
    fn raw_groups(&self) -> GroupsOf<Self::Env>;
    fn raw_kerning(&self) -> KerningOf<Self::Env>;
    fn raw_features(&self) -> FeaturesOf<Self::Env>;
    fn raw_lib(&self) -> LibOf<Self::Env>;

    /// Layers in layer order
    fn raw_layers(&self) -> Vec<LayerOf<Self::Env>>;

    fn raw_layer_order(&self) -> Vec<String> {
        self.raw_layers().iter().map(|layer| layer.name()).collect()
    }

    /// Reorder the layers. `value` holds every layer name exactly once.
    fn raw_set_layer_order(&self, value: Vec<String>) -> Result<()>;

    fn raw_default_layer_name(&self) -> String;
    fn raw_set_default_layer_name(&self, value: String) -> Result<()>;

    fn raw_get_layer(&self, name: &str) -> Option<LayerOf<Self::Env>> {
        self.raw_layers()
            .into_iter()
            .find(|layer| layer.name() == name)
    }

    /// Create a layer. No layer with the name exists.
    fn raw_new_layer(&self, name: String, color: Option<Color>) -> Result<LayerOf<Self::Env>>;
    fn raw_remove_layer(&self, name: &str) -> Result<()>;

    fn raw_glyph_order(&self) -> Vec<String>;
    fn raw_set_glyph_order(&self, value: Vec<String>);

    fn raw_guidelines(&self) -> Vec<GuidelineOf<Self::Env>>;
    /// Append an unnamed horizontal guideline at the origin.
    fn raw_new_guideline(&self) -> Result<GuidelineOf<Self::Env>>;
    fn raw_remove_guideline(&self, index: usize) -> Result<()>;

    fn raw_round(&self) -> Result<()> {
        self.default_layer()?.round()?;
        self.info().round()?;
        self.kerning().round(1);
        for guideline in self.guidelines() {
            guideline.round()?;
        }
        Ok(())
    }

    fn raw_auto_unicodes(&self) -> Result<()> {
        self.default_layer()?.auto_unicodes()
    }

    /// Rebuild the layers both fonts have from interpolations of their
    /// glyphs, then interpolate kerning and info.
    fn raw_interpolate(
        &self,
        factor: (f64, f64),
        min: &Self,
        max: &Self,
        round: bool,
        suppress_error: bool,
    ) -> Result<()> {
        let shared: Vec<String> = min
            .layer_order()
            .into_iter()
            .filter(|name| max.layer_order().contains(name))
            .collect();
        for name in &shared {
            let dest = self.new_layer(name, None)?;
            dest.interpolate(
                factor,
                &min.get_layer(name)?,
                &max.get_layer(name)?,
                round,
                suppress_error,
            )?;
        }
        if let Some(first) = shared.first() {
            self.set_default_layer_name(first)?;
            for name in self.layer_order() {
                if !shared.contains(&name) {
                    self.remove_layer(&name)?;
                }
            }
        }
        self.kerning()
            .interpolate(factor, &min.kerning(), &max.kerning(), round)?;
        self.info()
            .interpolate(factor, &min.info(), &max.info(), round, suppress_error)?;
        Ok(())
    }
}

/// Public font API
pub trait BaseFont: FontBackend {
    // -----
    // Files
    // -----

    fn path(&self) -> Option<PathBuf> {
        self.raw_path()
    }

    /// Save to `path`, or back to where the font was loaded from.
    fn save(&self, path: Option<&Path>, format_version: Option<u32>) -> Result<()> {
        if path.is_none() && self.raw_path().is_none() {
            return Err(Error::invalid(
                "The font cannot be saved because no file location has been given.",
            ));
        }
        let path = path.map(normalize_file_path).transpose()?;
        let format_version = format_version
            .map(normalize_file_format_version)
            .transpose()?;
        self.raw_save(path.as_deref(), format_version)?;
        info!("Saved {}", self.repr());
        Ok(())
    }

    fn close(&self, save: bool) -> Result<()> {
        if save {
            self.save(None, None)?;
        }
        self.raw_close()
    }

    /// Generate the font in another format and return the written path.
    ///
    /// Without `path` the output lands next to the source font. When
    /// `path` is a directory, the source file name with the format's
    /// extension is used inside it.
    fn generate(&self, format: &str, path: Option<&Path>) -> Result<PathBuf> {
        if format.is_empty() {
            return Err(Error::invalid("The format must be defined when generating."));
        }
        let extension = generate_format_to_extension(format, &format!(".{format}"));
        let extension = extension.trim_start_matches('.');
        let source = self.raw_path();
        let path = match (path, source) {
            (None, None) => {
                return Err(Error::invalid(
                    "The file cannot be generated because an output path was not defined.",
                ))
            }
            (None, Some(source)) => source.with_extension(extension),
            (Some(path), source) if path.is_dir() => {
                let source = source.ok_or_else(|| {
                    Error::invalid(
                        "The file cannot be generated because the file does not have a path.",
                    )
                })?;
                let stem = source.file_stem().unwrap_or(source.as_os_str());
                path.join(format!("{}.{extension}", stem.to_string_lossy()))
            }
            (Some(path), _) => path.to_path_buf(),
        };
        let path = normalize_file_path(path)?;
        self.raw_generate(format, &path)?;
        Ok(path)
    }

    // -----------
    // Sub-objects
    // -----------

    fn info(&self) -> InfoOf<Self::Env> {
        let info = self.raw_info();
        info.set_font(self);
        info
    }

    fn groups(&self) -> GroupsOf<Self::Env> {
        let groups = self.raw_groups();
        groups.set_font(self);
        groups
    }

    fn kerning(&self) -> KerningOf<Self::Env> {
        let kerning = self.raw_kerning();
        kerning.set_font(self);
        kerning
    }

    fn features(&self) -> FeaturesOf<Self::Env> {
        let features = self.raw_features();
        features.set_font(self);
        features
    }

    fn lib(&self) -> LibOf<Self::Env> {
        let lib = self.raw_lib();
        lib.set_parent(LibParent::Font(self.clone()));
        lib
    }

    // ------
    // Layers
    // ------

    fn layers(&self) -> Vec<LayerOf<Self::Env>> {
        let layers = self.raw_layers();
        for layer in &layers {
            layer.set_font(self);
        }
        layers
    }

    fn layer_order(&self) -> Vec<String> {
        self.raw_layer_order()
    }

    fn set_layer_order(&self, value: &[String]) -> Result<()> {
        let value = normalize_layer_order(value, &self.raw_layer_order())?;
        self.raw_set_layer_order(value)?;
        self.changed();
        Ok(())
    }

    fn default_layer_name(&self) -> String {
        self.raw_default_layer_name()
    }

    fn set_default_layer_name(&self, value: &str) -> Result<()> {
        let value = normalize_default_layer_name(value, &self.raw_layer_order())?;
        self.raw_set_default_layer_name(value)?;
        self.changed();
        Ok(())
    }

    fn default_layer(&self) -> Result<LayerOf<Self::Env>> {
        self.get_layer(&self.raw_default_layer_name())
    }

    fn set_default_layer(&self, layer: &LayerOf<Self::Env>) -> Result<()> {
        self.set_default_layer_name(&layer.name())
    }

    fn get_layer(&self, name: &str) -> Result<LayerOf<Self::Env>> {
        let name = normalize_layer_name(name)?;
        let layer = self
            .raw_get_layer(&name)
            .ok_or_else(|| Error::not_found(format!("No layer with the name '{name}' exists.")))?;
        layer.set_font(self);
        Ok(layer)
    }

    /// The layer called `name`, created when missing. The color of an
    /// existing layer is updated when one is given.
    fn new_layer(&self, name: &str, color: Option<Color>) -> Result<LayerOf<Self::Env>> {
        let name = normalize_layer_name(name)?;
        let color = color.map(|color| normalize_color(color.to_array())).transpose()?;
        if let Some(layer) = self.raw_get_layer(&name) {
            layer.set_font(self);
            if color.is_some() {
                layer.set_color(color)?;
            }
            return Ok(layer);
        }
        let layer = self.raw_new_layer(name, color)?;
        layer.set_font(self);
        debug!("Created layer '{}'", layer.name());
        self.changed();
        Ok(layer)
    }

    fn remove_layer(&self, name: &str) -> Result<()> {
        let name = normalize_layer_name(name)?;
        if !self.raw_layer_order().contains(&name) {
            return Err(Error::not_found(format!(
                "No layer with the name '{name}' exists."
            )));
        }
        self.raw_remove_layer(&name)?;
        self.changed();
        Ok(())
    }

    /// Copy `layer` into this font as `name`, or under its own name.
    /// An existing layer with that name is replaced.
    fn insert_layer(
        &self,
        layer: &LayerOf<Self::Env>,
        name: Option<&str>,
    ) -> Result<LayerOf<Self::Env>> {
        let name = match name {
            Some(name) => name.to_string(),
            None => layer.name(),
        };
        let name = normalize_layer_name(&name)?;
        let dest = self.new_layer(&name, None)?;
        for existing in dest.keys() {
            dest.raw_remove_glyph(&existing)?;
        }
        dest.lib().clear();
        dest.copy_data(layer)?;
        self.changed();
        Ok(dest)
    }

    fn duplicate_layer(&self, name: &str, new_name: &str) -> Result<LayerOf<Self::Env>> {
        let source = self.get_layer(name)?;
        let new_name = normalize_layer_name(new_name)?;
        if self.raw_layer_order().contains(&new_name) {
            return Err(Error::Duplicate(format!(
                "A layer with the name '{new_name}' already exists."
            )));
        }
        self.insert_layer(&source, Some(&new_name))
    }

    fn swap_layer_names(&self, first: &str, second: &str) -> Result<()> {
        let a = self.get_layer(first)?;
        let b = self.get_layer(second)?;
        let (first, second) = (a.name(), b.name());
        let default_name = self.raw_default_layer_name();
        let mut temp = format!("{first}.swap");
        while self.raw_layer_order().contains(&temp) {
            temp.push('_');
        }
        a.raw_set_name(temp)?;
        b.raw_set_name(first.clone())?;
        a.raw_set_name(second.clone())?;
        if default_name == first {
            self.raw_set_default_layer_name(second)?;
        } else if default_name == second {
            self.raw_set_default_layer_name(first)?;
        }
        self.changed();
        Ok(())
    }

    // ------
    // Glyphs
    // ------

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.default_layer()?.keys())
    }

    fn len(&self) -> Result<usize> {
        Ok(self.default_layer()?.len())
    }

    fn contains(&self, name: &str) -> bool {
        self.default_layer().is_ok_and(|layer| layer.contains(name))
    }

    fn glyph(&self, name: &str) -> Result<GlyphOf<Self::Env>> {
        self.default_layer()?.glyph(name)
    }

    fn glyphs(&self) -> Result<Vec<GlyphOf<Self::Env>>> {
        Ok(self.default_layer()?.glyphs())
    }

    fn new_glyph(&self, name: &str, clear: bool) -> Result<GlyphOf<Self::Env>> {
        self.default_layer()?.new_glyph(name, clear)
    }

    fn insert_glyph(
        &self,
        glyph: &GlyphOf<Self::Env>,
        name: Option<&str>,
    ) -> Result<GlyphOf<Self::Env>> {
        self.default_layer()?.insert_glyph(glyph, name)
    }

    fn remove_glyph(&self, name: &str) -> Result<()> {
        self.default_layer()?.remove_glyph(name)
    }

    fn glyph_order(&self) -> Vec<String> {
        self.raw_glyph_order()
    }

    fn set_glyph_order(&self, value: &[String]) -> Result<()> {
        let value = normalize_glyph_order(value)?;
        self.raw_set_glyph_order(value);
        self.changed();
        Ok(())
    }

    // ----------
    // Guidelines
    // ----------

    fn guidelines(&self) -> Vec<GuidelineOf<Self::Env>> {
        let guidelines = self.raw_guidelines();
        for guideline in &guidelines {
            guideline.set_parent(GuidelineParent::Font(self.clone()));
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
        position: impl Into<kurbo::Point>,
        angle: f64,
        name: Option<&str>,
        color: Option<Color>,
    ) -> Result<GuidelineOf<Self::Env>> {
        let position = normalize_coordinate_tuple(position)?;
        let angle = normalize_guideline_angle(angle)?;
        let name = name.map(normalize_guideline_name).transpose()?;
        let color = color.map(|color| normalize_color(color.to_array())).transpose()?;
        let guideline = self.raw_new_guideline()?;
        guideline.set_parent(GuidelineParent::Font(self.clone()));
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
            .ok_or_else(|| Error::not_found("The guideline could not be found in the font."))?;
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
        for index in (0..self.raw_guidelines().len()).rev() {
            self.raw_remove_guideline(index)?;
        }
        self.changed();
        Ok(())
    }

    // -----------------
    // Global operations
    // -----------------

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
        self.changed();
        Ok(())
    }

    /// Compare guidelines and every layer the fonts share.
    fn is_compatible(&self, other: &Self) -> (bool, String) {
        let mut compatible = true;
        let mut report = Vec::new();
        if self.raw_guidelines().len() != other.raw_guidelines().len() {
            report.push("[Note] The fonts do not contain the same number of guidelines.".into());
        }
        let mut ours = self.layer_order();
        let mut theirs = other.layer_order();
        ours.sort();
        theirs.sort();
        if ours != theirs {
            report.push("[Warning] The fonts do not contain the same layers.".into());
        }
        for name in &ours {
            let (Some(a), Some(b)) = (self.raw_get_layer(name), other.raw_get_layer(name)) else {
                continue;
            };
            let (layer_compatible, layer_report) = a.is_compatible(&b);
            if !layer_compatible {
                compatible = false;
            }
            if !layer_report.is_empty() {
                let marker = "-".repeat(name.chars().count());
                report.push(format!("\n{name}\n{marker}\n{layer_report}"));
            }
        }
        (compatible, report.join("\n"))
    }

    fn reverse_component_mapping(&self) -> Result<BTreeMap<String, Vec<String>>> {
        Ok(self.default_layer()?.reverse_component_mapping())
    }

    fn character_mapping(&self) -> Result<BTreeMap<u32, Vec<String>>> {
        Ok(self.default_layer()?.character_mapping())
    }

    // ----
    // Copy
    // ----

    /// Copy layers, guidelines and font-wide data from `source`.
    fn copy_data(&self, source: &Self) -> Result<()> {
        for layer in source.layers() {
            let dest = self.new_layer(&layer.name(), None)?;
            dest.copy_data(&layer)?;
        }
        self.set_default_layer_name(&source.default_layer_name())?;
        self.set_layer_order(&source.layer_order())?;
        for guideline in source.guidelines() {
            self.append_guideline(
                guideline.position(),
                guideline.angle(),
                guideline.name().as_deref(),
                guideline.color(),
            )?;
        }
        self.info().copy_data(&source.info())?;
        self.groups().copy_data(&source.groups())?;
        self.kerning().copy_data(&source.kerning())?;
        self.features().copy_data(&source.features());
        self.lib().update(source.lib().to_map())?;
        self.set_glyph_order(&source.glyph_order())?;
        Ok(())
    }

    /// A new font, not saved anywhere, holding a copy of this one
    fn copy(&self) -> Result<Self> {
        let copy = Self::raw_new();
        copy.copy_data(self)?;
        Ok(copy)
    }
}

impl<T: FontBackend> BaseFont for T {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_format_to_extension() {
        assert_eq!(generate_format_to_extension("otfcff", ".otfcff"), ".otf");
        assert_eq!(generate_format_to_extension("ufo3", ".ufo3"), ".ufo");
        assert_eq!(generate_format_to_extension("woff2", ".woff2"), ".woff2");
    }
}
