//! Kerning pairs
//!
//! Keys are `(first, second)` pairs of glyph or group names, values are
//! adjustments in font units. Group names carry the `public.kern1.` and
//! `public.kern2.` prefixes.

use std::collections::BTreeMap;

use super::dict::{BaseDict, DictBackend, DictKind};
use super::font::BaseFont;
use super::groups::BaseGroups;
use super::{Environment, FontOf};
use crate::error::Result;
use crate::geometry::transform::round_to_multiple;
use crate::normalizers::{
    normalize_glyph_name, normalize_interpolation_factor, normalize_kerning_key,
    normalize_kerning_value, normalize_transformation_scale, AxisValue,
};

pub const SIDE1_PREFIX: &str = "public.kern1.";
pub const SIDE2_PREFIX: &str = "public.kern2.";

pub type KerningPair = (String, String);

pub struct KerningKind;

impl DictKind for KerningKind {
    type Key = KerningPair;
    type Value = f64;

    const NAME: &'static str = "kerning";

    fn normalize_key(key: KerningPair) -> Result<KerningPair> {
        normalize_kerning_key(&key.0, &key.1)
    }

    fn normalize_value(value: f64) -> Result<f64> {
        normalize_kerning_value(value)
    }
}

/// Environment hooks for kerning
pub trait KerningBackend: DictBackend<Kind = KerningKind> {
    type Env: Environment<Kerning = Self>;

    fn raw_font(&self) -> Option<FontOf<Self::Env>>;
    fn raw_set_font(&self, font: Option<FontOf<Self::Env>>);

    fn raw_scale_by(&self, factor: f64) {
        for (pair, value) in self.items() {
            self.raw_set(pair, value * factor);
        }
    }

    fn raw_round(&self, multiple: u32) {
        let multiple = f64::from(multiple.max(1));
        for (pair, value) in self.items() {
            self.raw_set(pair, round_to_multiple(value, multiple));
        }
    }

    /// Interpolate over the union of both pair sets. A pair missing on
    /// one side counts as zero there.
    fn raw_interpolate(&self, factor: (f64, f64), min: &Self, max: &Self, round: bool) {
        let mut pairs: BTreeMap<KerningPair, (f64, f64)> = BTreeMap::new();
        for (pair, value) in min.items() {
            pairs.entry(pair).or_default().0 = value;
        }
        for (pair, value) in max.items() {
            pairs.entry(pair).or_default().1 = value;
        }
        self.raw_clear();
        for (pair, (a, b)) in pairs {
            let mut value = a + (b - a) * factor.0;
            if round {
                value = round_to_multiple(value, 1.0);
            }
            if value != 0.0 {
                self.raw_set(pair, value);
            }
        }
    }

    /// Look up a pair, falling back to the kerning groups of either side.
    fn raw_find(&self, pair: &KerningPair) -> Option<f64> {
        if let Some(value) = self.raw_get(pair) {
            return Some(value);
        }
        let font = self.raw_font()?;
        let groups = font.groups();
        let (side1, side2) = (groups.side1_kerning_groups(), groups.side2_kerning_groups());
        let group_of = |glyph: &str, side: &[(String, Vec<String>)]| {
            side.iter()
                .find(|(_, members)| members.iter().any(|member| member == glyph))
                .map(|(name, _)| name.clone())
        };
        let (first, first_group) = if pair.0.starts_with(SIDE1_PREFIX) {
            (None, Some(pair.0.clone()))
        } else {
            (Some(pair.0.clone()), group_of(&pair.0, &side1))
        };
        let (second, second_group) = if pair.1.starts_with(SIDE2_PREFIX) {
            (None, Some(pair.1.clone()))
        } else {
            (Some(pair.1.clone()), group_of(&pair.1, &side2))
        };
        let candidates = [
            (first.clone(), second.clone()),
            (first, second_group.clone()),
            (first_group.clone(), second),
            (first_group, second_group),
        ];
        candidates.into_iter().find_map(|candidate| match candidate {
            (Some(a), Some(b)) => self.raw_get(&(a, b)),
            _ => None,
        })
    }
}

/// Public kerning API
pub trait BaseKerning: KerningBackend {
    fn font(&self) -> Option<FontOf<Self::Env>> {
        self.raw_font()
    }

    fn set_font(&self, font: &FontOf<Self::Env>) {
        if self.raw_font().is_none() {
            self.raw_set_font(Some(font.clone()));
        }
    }

    /// The value of `(first, second)`, or `None` when there is no such pair
    fn value(&self, first: &str, second: &str) -> Option<f64> {
        self.raw_get(&(first.to_string(), second.to_string()))
    }

    fn set_value(&self, first: &str, second: &str, value: f64) -> Result<()> {
        self.set((first.to_string(), second.to_string()), value)
    }

    /// Multiply every value by `factor`. A per-axis factor uses its x part.
    fn scale_by(&self, factor: impl Into<AxisValue>) -> Result<()> {
        let (factor, _) = normalize_transformation_scale(factor)?;
        self.raw_scale_by(factor);
        self.changed();
        Ok(())
    }

    /// Round every value to a multiple of `multiple`.
    fn round(&self, multiple: u32) {
        self.raw_round(multiple);
        self.changed();
    }

    /// Kerning always interpolates, so there is no error to suppress.
    fn interpolate(
        &self,
        factor: impl Into<AxisValue>,
        min: &Self,
        max: &Self,
        round: bool,
    ) -> Result<()> {
        let factor = normalize_interpolation_factor(factor)?;
        self.raw_interpolate(factor, min, max, round);
        self.changed();
        Ok(())
    }

    /// The value applied to a glyph or group pair, including values
    /// inherited from kerning groups.
    fn find(&self, first: &str, second: &str) -> Result<Option<f64>> {
        let first = if first.starts_with(SIDE1_PREFIX) {
            first.to_string()
        } else {
            normalize_glyph_name(first)?
        };
        let second = if second.starts_with(SIDE2_PREFIX) {
            second.to_string()
        } else {
            normalize_glyph_name(second)?
        };
        Ok(self.raw_find(&(first, second)))
    }

    /// Replace all pairs with those of `other`.
    fn copy_data(&self, other: &Self) -> Result<()> {
        self.clear();
        self.update(other.items())
    }
}

impl<T: KerningBackend> BaseKerning for T {}
