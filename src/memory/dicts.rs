//! Font-wide data: info, groups, kerning, features and libs

use std::cell::RefCell;
use std::rc::Weak;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::font::{FontData, MemoryFont};
use super::glyph::{GlyphData, MemoryGlyph};
use super::layer::{LayerData, MemoryLayer};
use super::Memory;
use crate::error::Result;
use crate::objects::features::features_repr_contents;
use crate::objects::font_lib::LibKind;
use crate::objects::groups::GroupsKind;
use crate::objects::kerning::{KerningKind, KerningPair};
use crate::objects::{
    BaseObject, DictBackend, FeaturesBackend, GroupsBackend, InfoBackend, KerningBackend,
    LibBackend, LibParent,
};

/// `for font ...` repr contents shared by the font-wide objects
fn for_font(font: Option<MemoryFont>) -> Vec<String> {
    let mut contents = Vec::new();
    if let Some(font) = font {
        contents.push("for font".to_string());
        contents.extend(font.repr_contents());
    }
    contents
}

fn attach(font: Option<MemoryFont>) -> Weak<RefCell<FontData>> {
    font.map_or_else(Weak::new, |font| font.downgrade())
}

// ----
// Info
// ----

#[derive(Debug, Default)]
pub(crate) struct InfoData {
    pub(crate) values: Map<String, Value>,
    pub(crate) font: Weak<RefCell<FontData>>,
}

native_handle!(
    /// Font info attributes
    MemoryInfo => InfoData
);

impl MemoryInfo {
    pub(crate) fn new() -> Self {
        Self::from_data(InfoData::default())
    }
}

impl BaseObject for MemoryInfo {
    const OBJECT_NAME: &'static str = "Info";

    fn native_id(&self) -> usize {
        self.address()
    }

    fn repr_contents(&self) -> Vec<String> {
        for_font(self.raw_font())
    }
}

impl InfoBackend for MemoryInfo {
    type Env = Memory;

    fn raw_font(&self) -> Option<MemoryFont> {
        MemoryFont::upgrade(&self.0.borrow().font)
    }

    fn raw_set_font(&self, font: Option<MemoryFont>) {
        self.0.borrow_mut().font = attach(font);
    }

    fn raw_get(&self, attribute: &str) -> Option<Value> {
        self.0.borrow().values.get(attribute).cloned()
    }

    fn raw_set(&self, attribute: &str, value: Value) -> Result<()> {
        let mut data = self.0.borrow_mut();
        if value.is_null() {
            data.values.remove(attribute);
        } else {
            data.values.insert(attribute.to_string(), value);
        }
        Ok(())
    }
}

// ------
// Groups
// ------

#[derive(Debug, Default)]
pub(crate) struct GroupsData {
    pub(crate) groups: IndexMap<String, Vec<String>>,
    pub(crate) font: Weak<RefCell<FontData>>,
}

native_handle!(
    /// Named glyph groups
    MemoryGroups => GroupsData
);

impl MemoryGroups {
    pub(crate) fn new() -> Self {
        Self::from_data(GroupsData::default())
    }
}

impl BaseObject for MemoryGroups {
    const OBJECT_NAME: &'static str = "Groups";

    fn native_id(&self) -> usize {
        self.address()
    }

    fn repr_contents(&self) -> Vec<String> {
        for_font(self.raw_font())
    }
}

impl DictBackend for MemoryGroups {
    type Kind = GroupsKind;

    fn raw_keys(&self) -> Vec<String> {
        self.0.borrow().groups.keys().cloned().collect()
    }

    fn raw_get(&self, key: &String) -> Option<Vec<String>> {
        self.0.borrow().groups.get(key).cloned()
    }

    fn raw_set(&self, key: String, value: Vec<String>) {
        self.0.borrow_mut().groups.insert(key, value);
    }

    fn raw_remove(&self, key: &String) {
        self.0.borrow_mut().groups.shift_remove(key);
    }

    fn raw_clear(&self) {
        self.0.borrow_mut().groups.clear();
    }
}

impl GroupsBackend for MemoryGroups {
    type Env = Memory;

    fn raw_font(&self) -> Option<MemoryFont> {
        MemoryFont::upgrade(&self.0.borrow().font)
    }

    fn raw_set_font(&self, font: Option<MemoryFont>) {
        self.0.borrow_mut().font = attach(font);
    }
}

// -------
// Kerning
// -------

#[derive(Debug, Default)]
pub(crate) struct KerningData {
    pub(crate) pairs: IndexMap<KerningPair, f64>,
    pub(crate) font: Weak<RefCell<FontData>>,
}

native_handle!(
    /// Kerning pairs
    MemoryKerning => KerningData
);

impl MemoryKerning {
    pub(crate) fn new() -> Self {
        Self::from_data(KerningData::default())
    }
}

impl BaseObject for MemoryKerning {
    const OBJECT_NAME: &'static str = "Kerning";

    fn native_id(&self) -> usize {
        self.address()
    }

    fn repr_contents(&self) -> Vec<String> {
        for_font(self.raw_font())
    }
}

impl DictBackend for MemoryKerning {
    type Kind = KerningKind;

    fn raw_keys(&self) -> Vec<KerningPair> {
        self.0.borrow().pairs.keys().cloned().collect()
    }

    fn raw_get(&self, key: &KerningPair) -> Option<f64> {
        self.0.borrow().pairs.get(key).copied()
    }

    fn raw_set(&self, key: KerningPair, value: f64) {
        self.0.borrow_mut().pairs.insert(key, value);
    }

    fn raw_remove(&self, key: &KerningPair) {
        self.0.borrow_mut().pairs.shift_remove(key);
    }

    fn raw_clear(&self) {
        self.0.borrow_mut().pairs.clear();
    }
}

impl KerningBackend for MemoryKerning {
    type Env = Memory;

    fn raw_font(&self) -> Option<MemoryFont> {
        MemoryFont::upgrade(&self.0.borrow().font)
    }

    fn raw_set_font(&self, font: Option<MemoryFont>) {
        self.0.borrow_mut().font = attach(font);
    }
}

// --------
// Features
// --------

#[derive(Debug, Default)]
pub(crate) struct FeaturesData {
    pub(crate) text: Option<String>,
    pub(crate) font: Weak<RefCell<FontData>>,
}

native_handle!(
    /// Feature file source
    MemoryFeatures => FeaturesData
);

impl MemoryFeatures {
    pub(crate) fn new() -> Self {
        Self::from_data(FeaturesData::default())
    }
}

impl BaseObject for MemoryFeatures {
    const OBJECT_NAME: &'static str = "Features";

    fn native_id(&self) -> usize {
        self.address()
    }

    fn repr_contents(&self) -> Vec<String> {
        features_repr_contents(self)
    }
}

impl FeaturesBackend for MemoryFeatures {
    type Env = Memory;

    fn raw_font(&self) -> Option<MemoryFont> {
        MemoryFont::upgrade(&self.0.borrow().font)
    }

    fn raw_set_font(&self, font: Option<MemoryFont>) {
        self.0.borrow_mut().font = attach(font);
    }

    fn raw_text(&self) -> Option<String> {
        self.0.borrow().text.clone()
    }

    fn raw_set_text(&self, value: Option<String>) {
        self.0.borrow_mut().text = value;
    }
}

// ---
// Lib
// ---

#[derive(Debug, Default)]
pub(crate) enum LibOwner {
    #[default]
    None,
    Font(Weak<RefCell<FontData>>),
    Layer(Weak<RefCell<LayerData>>),
    Glyph(Weak<RefCell<GlyphData>>),
}

#[derive(Debug, Default)]
pub(crate) struct LibData {
    pub(crate) entries: IndexMap<String, Value>,
    pub(crate) owner: LibOwner,
}

native_handle!(
    /// Custom data of a font, layer or glyph
    MemoryLib => LibData
);

impl MemoryLib {
    pub(crate) fn new() -> Self {
        Self::from_data(LibData::default())
    }

    pub(crate) fn from_map(entries: Map<String, Value>) -> Self {
        Self::from_data(LibData {
            entries: entries.into_iter().collect(),
            owner: LibOwner::None,
        })
    }
}

impl BaseObject for MemoryLib {
    const OBJECT_NAME: &'static str = "Lib";

    fn native_id(&self) -> usize {
        self.address()
    }

    fn repr_contents(&self) -> Vec<String> {
        let mut contents = Vec::new();
        match self.raw_parent() {
            Some(LibParent::Glyph(glyph)) => {
                contents.push("for glyph".to_string());
                contents.extend(glyph.repr_contents());
            }
            Some(LibParent::Layer(layer)) => {
                contents.push("for layer".to_string());
                contents.extend(layer.repr_contents());
            }
            Some(LibParent::Font(font)) => {
                contents.push("for font".to_string());
                contents.extend(font.repr_contents());
            }
            None => {}
        }
        contents
    }
}

impl DictBackend for MemoryLib {
    type Kind = LibKind;

    fn raw_keys(&self) -> Vec<String> {
        self.0.borrow().entries.keys().cloned().collect()
    }

    fn raw_get(&self, key: &String) -> Option<Value> {
        self.0.borrow().entries.get(key).cloned()
    }

    fn raw_set(&self, key: String, value: Value) {
        self.0.borrow_mut().entries.insert(key, value);
    }

    fn raw_remove(&self, key: &String) {
        self.0.borrow_mut().entries.shift_remove(key);
    }

    fn raw_clear(&self) {
        self.0.borrow_mut().entries.clear();
    }
}

impl LibBackend for MemoryLib {
    type Env = Memory;

    fn raw_parent(&self) -> Option<LibParent<Memory>> {
        match &self.0.borrow().owner {
            LibOwner::None => None,
            LibOwner::Font(font) => MemoryFont::upgrade(font).map(LibParent::Font),
            LibOwner::Layer(layer) => MemoryLayer::upgrade(layer).map(LibParent::Layer),
            LibOwner::Glyph(glyph) => MemoryGlyph::upgrade(glyph).map(LibParent::Glyph),
        }
    }

    fn raw_set_parent(&self, parent: Option<LibParent<Memory>>) {
        self.0.borrow_mut().owner = match parent {
            None => LibOwner::None,
            Some(LibParent::Font(font)) => LibOwner::Font(font.downgrade()),
            Some(LibParent::Layer(layer)) => LibOwner::Layer(layer.downgrade()),
            Some(LibParent::Glyph(glyph)) => LibOwner::Glyph(glyph.downgrade()),
        };
    }
}
