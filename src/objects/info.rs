//! Font-wide metadata
//!
//! Info values are addressed by their UFO attribute names
//! (`familyName`, `unitsPerEm`, ...) and carried as JSON values, checked
//! against the attribute table in [`crate::normalizers::info`].

use serde_json::{Map, Value};
use tracing::debug;

use super::base::BaseObject;
use super::{Environment, FontOf};
use crate::error::{Error, Result};
use crate::geometry::round_value;
use crate::normalizers::{
    info_attribute_kind, normalize_info_value, normalize_interpolation_factor, AxisValue,
    INFO_ATTRIBUTES,
};

/// Attributes that are never rounded
const UNROUNDED_ATTRIBUTES: &[&str] = &["postscriptBlueScale"];

/// Attributes measured along the x axis. Everything else numeric
/// interpolates with the y factor.
const HORIZONTAL_ATTRIBUTES: &[&str] = &[
    "italicAngle",
    "openTypeHheaCaretOffset",
    "openTypeOS2SubscriptXSize",
    "openTypeOS2SubscriptXOffset",
    "openTypeOS2SuperscriptXSize",
    "openTypeOS2SuperscriptXOffset",
    "postscriptStemSnapV",
    "postscriptDefaultWidthX",
    "postscriptNominalWidthX",
];

/// A JSON number, stored as an integer when it has no fractional part.
pub fn json_number(value: f64) -> Value {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Value::from(value as i64)
    } else {
        Value::from(value)
    }
}

fn round_json(value: &Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.iter().map(round_json).collect()),
        _ => value
            .as_f64()
            .map(|number| json_number(round_value(number)))
            .unwrap_or_else(|| value.clone()),
    }
}

/// `a + (b - a) * factor` on numbers or equally long number lists
fn interpolate_json(a: &Value, b: &Value, factor: f64) -> Option<Value> {
    match (a, b) {
        (Value::Array(a), Value::Array(b)) => {
            if a.len() != b.len() {
                return None;
            }
            a.iter()
                .zip(b)
                .map(|(a, b)| interpolate_json(a, b, factor))
                .collect::<Option<Vec<_>>>()
                .map(Value::Array)
        }
        _ => {
            let (a, b) = (a.as_f64()?, b.as_f64()?);
            Some(json_number(a + (b - a) * factor))
        }
    }
}

/// Environment hooks for font info
pub trait InfoBackend: BaseObject {
    type Env: Environment<Info = Self>;

    fn raw_font(&self) -> Option<FontOf<Self::Env>>;
    fn raw_set_font(&self, font: Option<FontOf<Self::Env>>);

    fn raw_get(&self, attribute: &str) -> Option<Value>;
    /// Store a value; `Null` clears the attribute.
    fn raw_set(&self, attribute: &str, value: Value) -> Result<()>;

    fn raw_attributes(&self) -> Vec<String> {
        INFO_ATTRIBUTES
            .iter()
            .filter(|(name, _)| self.raw_get(name).is_some())
            .map(|(name, _)| name.to_string())
            .collect()
    }

    fn raw_round(&self) -> Result<()> {
        for (name, kind) in INFO_ATTRIBUTES {
            if !kind.is_numeric() || UNROUNDED_ATTRIBUTES.contains(name) {
                continue;
            }
            if let Some(value) = self.raw_get(name) {
                self.raw_set(name, round_json(&value))?;
            }
        }
        Ok(())
    }

    /// Numeric attributes are interpolated when both sides have them;
    /// everything else is taken from `min`. Integer attributes are always
    /// rounded.
    fn raw_interpolate(
        &self,
        factor: (f64, f64),
        min: &Self,
        max: &Self,
        round: bool,
        suppress_error: bool,
    ) -> Result<()> {
        for (name, kind) in INFO_ATTRIBUTES {
            let ours = min.raw_get(name);
            let value = if kind.is_numeric() {
                match (ours, max.raw_get(name)) {
                    (Some(a), Some(b)) => {
                        let factor = if HORIZONTAL_ATTRIBUTES.contains(name) {
                            factor.0
                        } else {
                            factor.1
                        };
                        match interpolate_json(&a, &b, factor) {
                            Some(value)
                                if (round || kind.is_integer())
                                    && !UNROUNDED_ATTRIBUTES.contains(name) =>
                            {
                                round_json(&value)
                            }
                            Some(value) => value,
                            None if suppress_error => {
                                debug!("Skipping info attribute {} with mismatched lists", name);
                                Value::Null
                            }
                            None => {
                                return Err(Error::Incompatible(format!(
                                    "The values of info attribute {name} cannot be interpolated."
                                )))
                            }
                        }
                    }
                    _ => Value::Null,
                }
            } else {
                ours.unwrap_or(Value::Null)
            };
            self.raw_set(name, value)?;
        }
        Ok(())
    }
}

/// Public font info API
pub trait BaseInfo: InfoBackend {
    fn font(&self) -> Option<FontOf<Self::Env>> {
        self.raw_font()
    }

    fn set_font(&self, font: &FontOf<Self::Env>) {
        if self.raw_font().is_none() {
            self.raw_set_font(Some(font.clone()));
        }
    }

    fn get(&self, attribute: &str) -> Result<Option<Value>> {
        if info_attribute_kind(attribute).is_none() {
            return Err(Error::invalid(format!("Unknown attribute {attribute}.")));
        }
        Ok(self.raw_get(attribute))
    }

    /// Set an attribute. Whole floats given for integer attributes are
    /// stored as integers.
    fn set(&self, attribute: &str, value: impl Into<Value>) -> Result<()> {
        let mut value = value.into();
        if info_attribute_kind(attribute).is_some_and(|kind| kind.is_integer()) {
            value = integral(value);
        }
        let value = normalize_info_value(attribute, value)?;
        self.raw_set(attribute, value)?;
        self.changed();
        Ok(())
    }

    fn remove(&self, attribute: &str) -> Result<()> {
        self.set(attribute, Value::Null)
    }

    /// Names of the attributes that have a value
    fn attributes(&self) -> Vec<String> {
        self.raw_attributes()
    }

    fn to_map(&self) -> Map<String, Value> {
        self.raw_attributes()
            .into_iter()
            .filter_map(|name| self.raw_get(&name).map(|value| (name, value)))
            .collect()
    }

    /// Copy every attribute `other` has a value for.
    fn update(&self, other: &Self) -> Result<()> {
        for (name, value) in other.to_map() {
            self.set(&name, value)?;
        }
        Ok(())
    }

    /// Replace all attributes with those of `other`.
    fn copy_data(&self, other: &Self) -> Result<()> {
        for name in self.raw_attributes() {
            self.raw_set(&name, Value::Null)?;
        }
        self.update(other)
    }

    fn round(&self) -> Result<()> {
        self.raw_round()?;
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

    // Common attributes

    fn family_name(&self) -> Option<String> {
        string_value(self.raw_get("familyName"))
    }

    fn set_family_name(&self, value: Option<&str>) -> Result<()> {
        self.set("familyName", value.map_or(Value::Null, Value::from))
    }

    fn style_name(&self) -> Option<String> {
        string_value(self.raw_get("styleName"))
    }

    fn set_style_name(&self, value: Option<&str>) -> Result<()> {
        self.set("styleName", value.map_or(Value::Null, Value::from))
    }

    fn units_per_em(&self) -> Option<f64> {
        self.raw_get("unitsPerEm").and_then(|value| value.as_f64())
    }

    fn set_units_per_em(&self, value: Option<f64>) -> Result<()> {
        self.set("unitsPerEm", value.map_or(Value::Null, json_number))
    }

    fn ascender(&self) -> Option<f64> {
        self.raw_get("ascender").and_then(|value| value.as_f64())
    }

    fn set_ascender(&self, value: Option<f64>) -> Result<()> {
        self.set("ascender", value.map_or(Value::Null, json_number))
    }

    fn descender(&self) -> Option<f64> {
        self.raw_get("descender").and_then(|value| value.as_f64())
    }

    fn set_descender(&self, value: Option<f64>) -> Result<()> {
        self.set("descender", value.map_or(Value::Null, json_number))
    }

    fn x_height(&self) -> Option<f64> {
        self.raw_get("xHeight").and_then(|value| value.as_f64())
    }

    fn set_x_height(&self, value: Option<f64>) -> Result<()> {
        self.set("xHeight", value.map_or(Value::Null, json_number))
    }

    fn cap_height(&self) -> Option<f64> {
        self.raw_get("capHeight").and_then(|value| value.as_f64())
    }

    fn set_cap_height(&self, value: Option<f64>) -> Result<()> {
        self.set("capHeight", value.map_or(Value::Null, json_number))
    }

    fn italic_angle(&self) -> Option<f64> {
        self.raw_get("italicAngle").and_then(|value| value.as_f64())
    }

    fn set_italic_angle(&self, value: Option<f64>) -> Result<()> {
        self.set("italicAngle", value.map_or(Value::Null, json_number))
    }
}

impl<T: InfoBackend> BaseInfo for T {}

fn string_value(value: Option<Value>) -> Option<String> {
    match value? {
        Value::String(value) => Some(value),
        _ => None,
    }
}

/// Whole floats become integers, recursively through lists.
fn integral(value: Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.into_iter().map(integral).collect()),
        Value::Number(number) => match number.as_f64() {
            Some(float) if number.is_f64() && float.fract() == 0.0 => json_number(float),
            _ => Value::Number(number),
        },
        _ => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizers::InfoValueKind;
    use serde_json::json;

    #[test]
    fn test_round_json() {
        assert_eq!(round_json(&json!(1.5)), json!(2));
        assert_eq!(round_json(&json!(-1.5)), json!(-1));
        assert_eq!(round_json(&json!([0.4, 10.6])), json!([0, 11]));
        assert_eq!(round_json(&json!("name")), json!("name"));
    }

    #[test]
    fn test_interpolate_json() {
        assert_eq!(interpolate_json(&json!(0), &json!(100), 0.25), Some(json!(25)));
        assert_eq!(
            interpolate_json(&json!([0, 10]), &json!([10, 20]), 0.5),
            Some(json!([5, 15]))
        );
        assert_eq!(interpolate_json(&json!([0]), &json!([10, 20]), 0.5), None);
    }

    #[test]
    fn test_integral_values() {
        assert_eq!(integral(json!(1000.0)), json!(1000));
        assert_eq!(integral(json!(1000.5)), json!(1000.5));
        assert_eq!(integral(json!([1.0, 2.0])), json!([1, 2]));
    }

    #[test]
    fn test_kind_table_is_consistent() {
        assert_eq!(info_attribute_kind("postscriptBlueScale"), Some(InfoValueKind::Number));
        assert!(HORIZONTAL_ATTRIBUTES
            .iter()
            .all(|name| info_attribute_kind(name).is_some_and(|kind| kind.is_numeric())));
    }
}
