//! Named glyph groups
//!
//! Groups whose names start with `public.kern1.` or `public.kern2.` are
//! kerning groups for the first and second side of a pair.

use super::dict::{BaseDict, DictBackend, DictKind};
use super::kerning::{SIDE1_PREFIX, SIDE2_PREFIX};
use super::{Environment, FontOf};
use crate::error::Result;
use crate::normalizers::{normalize_glyph_name, normalize_groups_key, normalize_groups_value};

pub struct GroupsKind;

impl DictKind for GroupsKind {
    type Key = String;
    type Value = Vec<String>;

    const NAME: &'static str = "groups";

    fn normalize_key(key: String) -> Result<String> {
        normalize_groups_key(&key)
    }

    fn normalize_value(value: Vec<String>) -> Result<Vec<String>> {
        normalize_groups_value(&value)
    }
}

/// Environment hooks for groups
pub trait GroupsBackend: DictBackend<Kind = GroupsKind> {
    type Env: Environment<Groups = Self>;

    fn raw_font(&self) -> Option<FontOf<Self::Env>>;
    fn raw_set_font(&self, font: Option<FontOf<Self::Env>>);

    /// Names of the groups that contain `glyph_name`
    fn raw_find_glyph(&self, glyph_name: &str) -> Vec<String> {
        self.items()
            .into_iter()
            .filter(|(_, members)| members.iter().any(|member| member == glyph_name))
            .map(|(name, _)| name)
            .collect()
    }
}

/// Public groups API
pub trait BaseGroups: GroupsBackend {
    fn font(&self) -> Option<FontOf<Self::Env>> {
        self.raw_font()
    }

    fn set_font(&self, font: &FontOf<Self::Env>) {
        if self.raw_font().is_none() {
            self.raw_set_font(Some(font.clone()));
        }
    }

    fn find_glyph(&self, glyph_name: &str) -> Result<Vec<String>> {
        let glyph_name = normalize_glyph_name(glyph_name)?;
        Ok(self.raw_find_glyph(&glyph_name))
    }

    /// Kerning groups for the first side of a pair
    fn side1_kerning_groups(&self) -> Vec<(String, Vec<String>)> {
        self.items()
            .into_iter()
            .filter(|(name, _)| name.starts_with(SIDE1_PREFIX))
            .collect()
    }

    /// Kerning groups for the second side of a pair
    fn side2_kerning_groups(&self) -> Vec<(String, Vec<String>)> {
        self.items()
            .into_iter()
            .filter(|(name, _)| name.starts_with(SIDE2_PREFIX))
            .collect()
    }

    /// Replace all groups with those of `other`.
    fn copy_data(&self, other: &Self) -> Result<()> {
        self.clear();
        self.update(other.items())
    }
}

impl<T: GroupsBackend> BaseGroups for T {}
