//! OpenType feature source attached to a font

use super::base::BaseObject;
use super::{Environment, FontOf};
use crate::normalizers::normalize_feature_text;

/// Environment hooks for features
pub trait FeaturesBackend: BaseObject {
    type Env: Environment<Features = Self>;

    fn raw_font(&self) -> Option<FontOf<Self::Env>>;
    fn raw_set_font(&self, font: Option<FontOf<Self::Env>>);

    fn raw_text(&self) -> Option<String>;
    fn raw_set_text(&self, value: Option<String>);
}

/// Public features API
pub trait BaseFeatures: FeaturesBackend {
    fn font(&self) -> Option<FontOf<Self::Env>> {
        self.raw_font()
    }

    fn set_font(&self, font: &FontOf<Self::Env>) {
        if self.raw_font().is_none() {
            self.raw_set_font(Some(font.clone()));
        }
    }

    /// The feature file text, in `.fea` syntax
    fn text(&self) -> Option<String> {
        self.raw_text().map(|text| normalize_feature_text(&text))
    }

    fn set_text(&self, value: Option<&str>) {
        self.raw_set_text(value.map(normalize_feature_text));
        self.changed();
    }

    fn copy_data(&self, other: &Self) {
        self.set_text(other.text().as_deref());
    }
}

impl<T: FeaturesBackend> BaseFeatures for T {}

/// `<Features for font ...>` contents
pub fn features_repr_contents<F: BaseFeatures>(features: &F) -> Vec<String> {
    let mut contents = Vec::new();
    if let Some(font) = features.font() {
        contents.push("for font".to_string());
        contents.extend(font.repr_contents());
    }
    contents
}
