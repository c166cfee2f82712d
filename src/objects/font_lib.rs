//! Custom data attached to fonts, layers and glyphs

use std::fmt;

use serde_json::{Map, Value};

use super::dict::{BaseDict, DictBackend, DictKind};
use super::glyph::BaseGlyph;
use super::layer::BaseLayer;
use super::{Environment, FontOf, GlyphOf, LayerOf};
use crate::error::Result;
use crate::normalizers::normalize_lib_key;

/// What a lib belongs to
pub enum LibParent<E: Environment> {
    Font(FontOf<E>),
    Layer(LayerOf<E>),
    Glyph(GlyphOf<E>),
}

impl<E: Environment> Clone for LibParent<E> {
    fn clone(&self) -> Self {
        match self {
            LibParent::Font(font) => LibParent::Font(font.clone()),
            LibParent::Layer(layer) => LibParent::Layer(layer.clone()),
            LibParent::Glyph(glyph) => LibParent::Glyph(glyph.clone()),
        }
    }
}

impl<E: Environment> fmt::Debug for LibParent<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LibParent::Font(font) => f.debug_tuple("Font").field(font).finish(),
            LibParent::Layer(layer) => f.debug_tuple("Layer").field(layer).finish(),
            LibParent::Glyph(glyph) => f.debug_tuple("Glyph").field(glyph).finish(),
        }
    }
}

pub struct LibKind;

impl DictKind for LibKind {
    type Key = String;
    type Value = Value;

    const NAME: &'static str = "lib";

    fn normalize_key(key: String) -> Result<String> {
        normalize_lib_key(&key)
    }

    fn normalize_value(value: Value) -> Result<Value> {
        Ok(value)
    }
}

/// Environment hooks for a lib
pub trait LibBackend: DictBackend<Kind = LibKind> {
    type Env: Environment<Lib = Self>;

    fn raw_parent(&self) -> Option<LibParent<Self::Env>>;
    fn raw_set_parent(&self, parent: Option<LibParent<Self::Env>>);
}

/// Public lib API
pub trait BaseLib: LibBackend {
    fn parent(&self) -> Option<LibParent<Self::Env>> {
        self.raw_parent()
    }

    fn set_parent(&self, parent: LibParent<Self::Env>) {
        if self.raw_parent().is_none() {
            self.raw_set_parent(Some(parent));
        }
    }

    fn glyph(&self) -> Option<GlyphOf<Self::Env>> {
        match self.raw_parent()? {
            LibParent::Glyph(glyph) => Some(glyph),
            _ => None,
        }
    }

    fn layer(&self) -> Option<LayerOf<Self::Env>> {
        match self.raw_parent()? {
            LibParent::Layer(layer) => Some(layer),
            LibParent::Glyph(glyph) => glyph.layer(),
            LibParent::Font(_) => None,
        }
    }

    fn font(&self) -> Option<FontOf<Self::Env>> {
        match self.raw_parent()? {
            LibParent::Font(font) => Some(font),
            LibParent::Layer(layer) => layer.font(),
            LibParent::Glyph(glyph) => glyph.font(),
        }
    }

    /// The entries as a JSON object
    fn to_map(&self) -> Map<String, Value> {
        self.items().into_iter().collect()
    }
}

impl<T: LibBackend> BaseLib for T {}
