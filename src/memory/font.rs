//! Fonts

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tracing::{debug, info};

use super::dicts::{MemoryFeatures, MemoryGroups, MemoryInfo, MemoryKerning, MemoryLib};
use super::layer::{LayerData, MemoryLayer};
use super::outline::{GuidelineOwner, MemoryGuideline};
use super::{ufo, Memory};
use crate::config::Settings;
use crate::error::{Error, Result};
use crate::geometry::Color;
use crate::objects::info::json_number;
use crate::objects::{
    BaseObject, FeaturesBackend, FontBackend, GroupsBackend, GuidelineBackend, InfoBackend,
    KerningBackend, LayerBackend, LibBackend, LibParent,
};

/// The only UFO format version the memory environment writes
pub const UFO_FORMAT_VERSION: u32 = 3;

#[derive(Debug)]
pub(crate) struct FontData {
    pub(crate) path: Option<PathBuf>,
    pub(crate) layers: IndexMap<String, MemoryLayer>,
    pub(crate) default_layer_name: String,
    pub(crate) info: MemoryInfo,
    pub(crate) groups: MemoryGroups,
    pub(crate) kerning: MemoryKerning,
    pub(crate) features: MemoryFeatures,
    pub(crate) lib: MemoryLib,
    pub(crate) glyph_order: Vec<String>,
    pub(crate) guidelines: Vec<MemoryGuideline>,
    pub(crate) glyph_width: f64,
    pub(crate) glyph_height: f64,
}

native_handle!(
    /// A font held in memory, optionally backed by a UFO on disk
    MemoryFont => FontData
);

impl Default for MemoryFont {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryFont {
    /// A new font with the built-in defaults
    pub fn new() -> Self {
        Self::with_settings(&Settings::default())
    }

    /// A new font with one empty layer, set up from user settings
    pub fn with_settings(settings: &Settings) -> Self {
        let font = Self::empty(settings.default_layer_name());
        {
            let mut data = font.0.borrow_mut();
            data.glyph_width = settings.default_glyph_width();
            data.glyph_height = settings.default_glyph_height();
        }
        let layer = MemoryLayer::from_data(LayerData::new(settings.default_layer_name().into()));
        font.adopt_layer(layer);
        let units_per_em = json_number(settings.units_per_em());
        font.0.borrow().info.0.borrow_mut().values.insert("unitsPerEm".into(), units_per_em);
        font
    }

    /// Load a UFO from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        ufo::load(path.as_ref())
    }

    /// A font without layers. Callers add at least one before handing it out.
    pub(crate) fn empty(default_layer_name: &str) -> Self {
        let font = Self::from_data(FontData {
            path: None,
            layers: IndexMap::new(),
            default_layer_name: default_layer_name.to_string(),
            info: MemoryInfo::new(),
            groups: MemoryGroups::new(),
            kerning: MemoryKerning::new(),
            features: MemoryFeatures::new(),
            lib: MemoryLib::new(),
            glyph_order: Vec::new(),
            guidelines: Vec::new(),
            glyph_width: 0.0,
            glyph_height: 0.0,
        });
        font.attach_children();
        font
    }

    /// Point the font-wide objects back at this font.
    pub(crate) fn attach_children(&self) {
        let data = self.0.borrow();
        data.info.raw_set_font(Some(self.clone()));
        data.groups.raw_set_font(Some(self.clone()));
        data.kerning.raw_set_font(Some(self.clone()));
        data.features.raw_set_font(Some(self.clone()));
        data.lib.raw_set_parent(Some(LibParent::Font(self.clone())));
    }

    /// Add a layer built elsewhere, replacing any layer with its name.
    pub(crate) fn adopt_layer(&self, layer: MemoryLayer) {
        layer.raw_set_font(Some(self.clone()));
        let name = layer.raw_name();
        self.0.borrow_mut().layers.insert(name, layer);
    }

    pub(crate) fn adopt_guideline(&self, guideline: MemoryGuideline) {
        guideline.0.borrow_mut().owner = GuidelineOwner::Font(self.downgrade());
        self.0.borrow_mut().guidelines.push(guideline);
    }

    pub(crate) fn guideline_identifiers(&self) -> HashSet<String> {
        self.0
            .borrow()
            .guidelines
            .iter()
            .filter_map(|guideline| guideline.raw_identifier())
            .collect()
    }

    pub(crate) fn set_path(&self, path: Option<PathBuf>) {
        self.0.borrow_mut().path = path;
    }
}

impl BaseObject for MemoryFont {
    const OBJECT_NAME: &'static str = "Font";

    fn native_id(&self) -> usize {
        self.address()
    }

    fn repr_contents(&self) -> Vec<String> {
        let data = self.0.borrow();
        let mut contents = Vec::new();
        let name = ["familyName", "styleName"]
            .iter()
            .filter_map(|attribute| data.info.raw_get(attribute))
            .filter_map(|value| value.as_str().map(str::to_string))
            .collect::<Vec<_>>();
        if !name.is_empty() {
            contents.push(format!("'{}'", name.join(" ")));
        }
        if let Some(path) = &data.path {
            contents.push(format!("path={:?}", path));
        }
        contents
    }
}

impl FontBackend for MemoryFont {
    type Env = Memory;

    fn raw_new() -> Self {
        Self::new()
    }

    fn raw_path(&self) -> Option<PathBuf> {
        self.0.borrow().path.clone()
    }

    fn raw_save(&self, path: Option<&Path>, format_version: Option<u32>) -> Result<()> {
        if let Some(version) = format_version.filter(|v| *v != UFO_FORMAT_VERSION) {
            return Err(Error::Unsupported(format!(
                "UFO format version {version} cannot be written."
            )));
        }
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => self.raw_path().ok_or_else(|| {
                Error::invalid("The font cannot be saved because no file location has been given.")
            })?,
        };
        ufo::save(self, &path)?;
        self.set_path(Some(path));
        Ok(())
    }

    fn raw_close(&self) -> Result<()> {
        debug!("Closed {}", self.repr());
        Ok(())
    }

    fn raw_generate(&self, format: &str, path: &Path) -> Result<()> {
        if format != "ufo3" {
            return Err(Error::Unsupported(format!(
                "The format '{format}' is not supported."
            )));
        }
        ufo::save(self, path)?;
        info!("Generated {:?}", path);
        Ok(())
    }

    fn raw_info(&self) -> MemoryInfo {
        self.0.borrow().info.clone()
    }

    fn raw_groups(&self) -> MemoryGroups {
        self.0.borrow().groups.clone()
    }

    fn raw_kerning(&self) -> MemoryKerning {
        self.0.borrow().kerning.clone()
    }

    fn raw_features(&self) -> MemoryFeatures {
        self.0.borrow().features.clone()
    }

    fn raw_lib(&self) -> MemoryLib {
        self.0.borrow().lib.clone()
    }

    fn raw_layers(&self) -> Vec<MemoryLayer> {
        self.0.borrow().layers.values().cloned().collect()
    }

    fn raw_layer_order(&self) -> Vec<String> {
        self.0.borrow().layers.keys().cloned().collect()
    }

    fn raw_set_layer_order(&self, value: Vec<String>) -> Result<()> {
        let mut data = self.0.borrow_mut();
        let mut layers = IndexMap::new();
        for name in value {
            let layer = data
                .layers
                .shift_remove(&name)
                .ok_or_else(|| Error::not_found(format!("No layer with the name '{name}' exists.")))?;
            layers.insert(name, layer);
        }
        layers.extend(data.layers.drain(..));
        data.layers = layers;
        Ok(())
    }

    fn raw_default_layer_name(&self) -> String {
        self.0.borrow().default_layer_name.clone()
    }

    fn raw_set_default_layer_name(&self, value: String) -> Result<()> {
        self.0.borrow_mut().default_layer_name = value;
        Ok(())
    }

    fn raw_get_layer(&self, name: &str) -> Option<MemoryLayer> {
        self.0.borrow().layers.get(name).cloned()
    }

    fn raw_new_layer(&self, name: String, color: Option<Color>) -> Result<MemoryLayer> {
        if self.0.borrow().layers.contains_key(&name) {
            return Err(Error::Duplicate(format!(
                "A layer with the name '{name}' already exists."
            )));
        }
        let layer = MemoryLayer::from_data(LayerData::new(name));
        layer.raw_set_color(color);
        self.adopt_layer(layer.clone());
        Ok(layer)
    }

    /// Remove a layer. The last layer cannot be removed; removing the
    /// default layer makes the first remaining layer the default.
    fn raw_remove_layer(&self, name: &str) -> Result<()> {
        let mut data = self.0.borrow_mut();
        if data.layers.len() == 1 && data.layers.contains_key(name) {
            return Err(Error::invalid("The last layer of a font cannot be removed."));
        }
        let removed = data
            .layers
            .shift_remove(name)
            .ok_or_else(|| Error::not_found(format!("No layer with the name '{name}' exists.")))?;
        if data.default_layer_name == name {
            if let Some(first) = data.layers.keys().next() {
                data.default_layer_name = first.clone();
            }
        }
        drop(data);
        removed.raw_set_font(None);
        debug!("Removed layer '{}'", name);
        Ok(())
    }

    fn raw_glyph_order(&self) -> Vec<String> {
        self.0.borrow().glyph_order.clone()
    }

    fn raw_set_glyph_order(&self, value: Vec<String>) {
        self.0.borrow_mut().glyph_order = value;
    }

    fn raw_guidelines(&self) -> Vec<MemoryGuideline> {
        self.0.borrow().guidelines.clone()
    }

    fn raw_new_guideline(&self) -> Result<MemoryGuideline> {
        let guideline = MemoryGuideline::raw_new();
        self.adopt_guideline(guideline.clone());
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
}
