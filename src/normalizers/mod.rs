//! Input validation and normalization
//!
//! Every public operation of the object model runs caller-supplied values
//! through these functions before anything reaches an environment. Each
//! normalizer is pure: it either returns the canonical form of its input or
//! an [`Error::Invalid`].

pub mod info;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use kurbo::{Affine, Point, Rect, Vec2};

use crate::error::{Error, Result};
use crate::geometry::{Color, PointType, SegmentType};

pub use info::{info_attribute_kind, normalize_info_value, InfoValueKind, INFO_ATTRIBUTES};

/// A value given either once for both axes or separately per axis
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AxisValue {
    Uniform(f64),
    PerAxis(f64, f64),
}

impl AxisValue {
    pub fn pair(self) -> (f64, f64) {
        match self {
            AxisValue::Uniform(value) => (value, value),
            AxisValue::PerAxis(x, y) => (x, y),
        }
    }
}

impl From<f64> for AxisValue {
    fn from(value: f64) -> Self {
        AxisValue::Uniform(value)
    }
}

impl From<(f64, f64)> for AxisValue {
    fn from(value: (f64, f64)) -> Self {
        AxisValue::PerAxis(value.0, value.1)
    }
}

// -------
// Generic
// -------

/// Resolve an index, counting negative values from the end.
pub fn normalize_index(index: isize, len: usize, what: &str) -> Result<usize> {
    let resolved = if index < 0 {
        len as isize + index
    } else {
        index
    };
    if resolved < 0 || resolved as usize >= len {
        return Err(Error::not_found(format!(
            "No {what} located at index {index}."
        )));
    }
    Ok(resolved as usize)
}

/// Resolve an insertion index. Out of range values clamp to either end.
pub fn normalize_insert_index(index: isize, len: usize) -> usize {
    if index < 0 {
        (len as isize + index).max(0) as usize
    } else {
        (index as usize).min(len)
    }
}

pub fn normalize_identifier(value: &str) -> Result<String> {
    if value.is_empty() {
        return Err(Error::invalid("The identifier string is empty."));
    }
    let length = value.chars().count();
    if length > 100 {
        return Err(Error::invalid(format!(
            "The identifier string has a length ({length}) greater than the maximum allowed (100)."
        )));
    }
    if value.chars().any(|c| !(' '..='~').contains(&c)) {
        return Err(Error::invalid(format!(
            "The identifier string ('{value}') contains a character out side of the range 0x20 - 0x7E."
        )));
    }
    Ok(value.to_string())
}

fn normalize_number(value: f64, what: &str) -> Result<f64> {
    if !value.is_finite() {
        return Err(Error::invalid(format!("{what} must be a finite number, not {value}.")));
    }
    Ok(value)
}

// -----------
// Coordinates
// -----------

pub fn normalize_x(value: f64) -> Result<f64> {
    normalize_number(value, "X coordinates")
}

pub fn normalize_y(value: f64) -> Result<f64> {
    normalize_number(value, "Y coordinates")
}

pub fn normalize_coordinate_tuple(value: impl Into<Point>) -> Result<Point> {
    let point = value.into();
    Ok(Point::new(normalize_x(point.x)?, normalize_y(point.y)?))
}

pub fn normalize_bounding_box(value: Rect) -> Result<Rect> {
    for coordinate in [value.x0, value.y0, value.x1, value.y1] {
        normalize_number(coordinate, "Bounding box values")?;
    }
    if value.x0 > value.x1 {
        return Err(Error::invalid("xMin is larger than xMax."));
    }
    if value.y0 > value.y1 {
        return Err(Error::invalid("yMin is larger than yMax."));
    }
    Ok(value)
}

pub fn normalize_area(value: f64) -> Result<f64> {
    let value = normalize_number(value, "Area")?;
    if value < 0.0 {
        return Err(Error::invalid("Area must be a positive number."));
    }
    Ok(value)
}

/// Round half up, the OpenType rounding rule.
pub fn normalize_rounding(value: f64) -> f64 {
    crate::geometry::round_value(value)
}

pub fn normalize_color(value: [f64; 4]) -> Result<Color> {
    Color::try_from(value)
}

// -----
// Files
// -----

pub fn normalize_file_path(value: impl AsRef<Path>) -> Result<PathBuf> {
    let path = value.as_ref();
    if path.as_os_str().is_empty() {
        return Err(Error::invalid("File paths must not be empty."));
    }
    Ok(path.to_path_buf())
}

pub fn normalize_file_format_version(value: u32) -> Result<u32> {
    if !(1..=3).contains(&value) {
        return Err(Error::invalid(format!(
            "File format versions must be 1, 2 or 3, not {value}."
        )));
    }
    Ok(value)
}

// ----
// Font
// ----

fn find_duplicates<'a, T>(values: &'a [T]) -> Vec<&'a T>
where
    T: Eq + std::hash::Hash,
{
    let mut seen = HashSet::new();
    let mut duplicates = Vec::new();
    for value in values {
        if !seen.insert(value) && !duplicates.contains(&value) {
            duplicates.push(value);
        }
    }
    duplicates
}

/// Check a new layer order against the layers that exist in the font.
pub fn normalize_layer_order(value: &[String], existing: &[String]) -> Result<Vec<String>> {
    for name in value {
        normalize_layer_name(name)?;
        if !existing.contains(name) {
            return Err(Error::invalid(format!(
                "Layer must exist in font. {name} does not exist in font.layers."
            )));
        }
    }
    let duplicates = find_duplicates(value);
    if !duplicates.is_empty() {
        let names: Vec<&str> = duplicates.iter().map(|name| name.as_str()).collect();
        return Err(Error::invalid(format!(
            "Duplicate layers are not allowed. Layer name(s) '{}' are duplicate(s).",
            names.join(", ")
        )));
    }
    Ok(value.to_vec())
}

pub fn normalize_default_layer_name(value: &str, layer_order: &[String]) -> Result<String> {
    let value = normalize_layer_name(value)?;
    if !layer_order.contains(&value) {
        return Err(Error::not_found(format!(
            "No layer with the name '{value}' exists."
        )));
    }
    Ok(value)
}

pub fn normalize_glyph_order(value: &[String]) -> Result<Vec<String>> {
    for name in value {
        normalize_glyph_name(name)?;
    }
    let duplicates = find_duplicates(value);
    if !duplicates.is_empty() {
        let names: Vec<&str> = duplicates.iter().map(|name| name.as_str()).collect();
        return Err(Error::invalid(format!(
            "Duplicate glyph names are not allowed. Glyph name(s) '{}' are duplicate.",
            names.join(", ")
        )));
    }
    Ok(value.to_vec())
}

// -------
// Kerning
// -------

pub fn normalize_kerning_key(first: &str, second: &str) -> Result<(String, String)> {
    if first.is_empty() || second.is_empty() {
        return Err(Error::invalid(
            "Kerning key items must be at least one character long.",
        ));
    }
    if first.starts_with("public.") && !first.starts_with("public.kern1.") {
        return Err(Error::invalid(
            "Left Kerning key group names must start with public.kern1.",
        ));
    }
    if second.starts_with("public.") && !second.starts_with("public.kern2.") {
        return Err(Error::invalid(
            "Right Kerning key group names must start with public.kern2.",
        ));
    }
    Ok((first.to_string(), second.to_string()))
}

pub fn normalize_kerning_value(value: f64) -> Result<f64> {
    normalize_number(value, "Kerning values")
}

// ------
// Groups
// ------

pub fn normalize_groups_key(value: &str) -> Result<String> {
    if value.is_empty() {
        return Err(Error::invalid("Group names must be at least one character long."));
    }
    Ok(value.to_string())
}

pub fn normalize_groups_value(value: &[String]) -> Result<Vec<String>> {
    value.iter().map(|name| normalize_glyph_name(name)).collect()
}

// --------
// Features
// --------

pub fn normalize_feature_text(value: &str) -> String {
    value.to_string()
}

// ---
// Lib
// ---

pub fn normalize_lib_key(value: &str) -> Result<String> {
    if value.is_empty() {
        return Err(Error::invalid("Lib key is an empty string."));
    }
    Ok(value.to_string())
}

// -----
// Layer
// -----

pub fn normalize_layer_name(value: &str) -> Result<String> {
    if value.is_empty() {
        return Err(Error::invalid("Layer names must be at least one character long."));
    }
    Ok(value.to_string())
}

// -----
// Glyph
// -----

pub fn normalize_glyph_name(value: &str) -> Result<String> {
    if value.is_empty() {
        return Err(Error::invalid("Glyph names must be at least one character long."));
    }
    if value.chars().any(char::is_control) {
        return Err(Error::invalid(format!(
            "Glyph name '{}' contains control characters.",
            value.escape_debug()
        )));
    }
    Ok(value.to_string())
}

pub fn normalize_glyph_unicode(value: u32) -> Result<u32> {
    if value > 0x10FFFF {
        return Err(Error::invalid(format!(
            "Unicode value {value:#X} is not in the range 0x0 - 0x10FFFF."
        )));
    }
    Ok(value)
}

/// Parse a hexadecimal unicode string such as `"0041"` or `"0x41"`.
pub fn normalize_glyph_unicode_str(value: &str) -> Result<u32> {
    let trimmed = value.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    let invalid = || Error::invalid(format!("Unicode value '{value}' is not a valid hex value."));
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    let parsed = u32::from_str_radix(digits, 16).map_err(|_| invalid())?;
    normalize_glyph_unicode(parsed)
}

pub fn normalize_glyph_unicodes(value: &[u32]) -> Result<Vec<u32>> {
    let values = value
        .iter()
        .map(|v| normalize_glyph_unicode(*v))
        .collect::<Result<Vec<_>>>()?;
    if !find_duplicates(&values).is_empty() {
        return Err(Error::invalid("Duplicate unicode values are not allowed."));
    }
    Ok(values)
}

pub fn normalize_glyph_width(value: f64) -> Result<f64> {
    normalize_number(value, "Glyph width")
}

pub fn normalize_glyph_height(value: f64) -> Result<f64> {
    normalize_number(value, "Glyph height")
}

pub fn normalize_glyph_left_margin(value: f64) -> Result<f64> {
    normalize_number(value, "Glyph left margin")
}

pub fn normalize_glyph_right_margin(value: f64) -> Result<f64> {
    normalize_number(value, "Glyph right margin")
}

pub fn normalize_glyph_bottom_margin(value: f64) -> Result<f64> {
    normalize_number(value, "Glyph bottom margin")
}

pub fn normalize_glyph_top_margin(value: f64) -> Result<f64> {
    normalize_number(value, "Glyph top margin")
}

pub fn normalize_glyph_note(value: &str) -> String {
    value.to_string()
}

// ---------------
// Contour & point
// ---------------

pub fn normalize_point_type(value: &str) -> Result<PointType> {
    value.parse()
}

pub fn normalize_segment_type(value: &str) -> Result<SegmentType> {
    value.parse()
}

pub fn normalize_point_name(value: &str) -> Result<String> {
    if value.is_empty() {
        return Err(Error::invalid("Point names must be at least one character long."));
    }
    Ok(value.to_string())
}

pub fn normalize_anchor_name(value: &str) -> Result<String> {
    if value.is_empty() {
        return Err(Error::invalid("Anchor names must be at least one character long."));
    }
    Ok(value.to_string())
}

pub fn normalize_guideline_name(value: &str) -> Result<String> {
    if value.is_empty() {
        return Err(Error::invalid("Guideline names must be at least one character long."));
    }
    Ok(value.to_string())
}

/// Angles between -360 and 360; negative angles wrap into `0..360`.
pub fn normalize_guideline_angle(value: f64) -> Result<f64> {
    let value = normalize_number(value, "Guideline angle")?;
    if value.abs() > 360.0 {
        return Err(Error::invalid("Guideline angle must be between -360 and 360."));
    }
    Ok(if value < 0.0 { value + 360.0 } else { value })
}

pub fn normalize_component_base_glyph(value: &str) -> Result<String> {
    normalize_glyph_name(value)
}

pub fn normalize_component_scale(value: impl Into<AxisValue>) -> Result<(f64, f64)> {
    let (x, y) = value.into().pair();
    Ok((
        normalize_number(x, "Component scale")?,
        normalize_number(y, "Component scale")?,
    ))
}

// ---------------
// Transformations
// ---------------

pub fn normalize_transformation_matrix(value: [f64; 6]) -> Result<Affine> {
    for coefficient in value {
        normalize_number(coefficient, "Transformation values")?;
    }
    Ok(Affine::new(value))
}

pub fn normalize_transformation_offset(value: impl Into<Vec2>) -> Result<Vec2> {
    let offset = value.into();
    Ok(Vec2::new(
        normalize_number(offset.x, "Offset values")?,
        normalize_number(offset.y, "Offset values")?,
    ))
}

pub fn normalize_transformation_scale(value: impl Into<AxisValue>) -> Result<(f64, f64)> {
    let (x, y) = value.into().pair();
    Ok((
        normalize_number(x, "Scale values")?,
        normalize_number(y, "Scale values")?,
    ))
}

/// Angles between -360 and 360; negative angles have 360 added.
pub fn normalize_rotation_angle(value: f64) -> Result<f64> {
    let value = normalize_number(value, "Angle")?;
    if value.abs() > 360.0 {
        return Err(Error::invalid("Angle must be between -360 and 360."));
    }
    Ok(if value < 0.0 { value + 360.0 } else { value })
}

/// A single angle skews x only.
pub fn normalize_skew_angle(value: impl Into<AxisValue>) -> Result<(f64, f64)> {
    let (x, y) = match value.into() {
        AxisValue::Uniform(x) => (x, 0.0),
        AxisValue::PerAxis(x, y) => (x, y),
    };
    for angle in [x, y] {
        normalize_number(angle, "Skew angle")?;
        if angle.abs() > 360.0 {
            return Err(Error::invalid("Skew angles must be between -360 and 360."));
        }
    }
    Ok((x, y))
}

pub fn normalize_interpolation_factor(value: impl Into<AxisValue>) -> Result<(f64, f64)> {
    let (x, y) = value.into().pair();
    Ok((
        normalize_number(x, "Interpolation factors")?,
        normalize_number(y, "Interpolation factors")?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_wraps_negative_values() {
        assert_eq!(normalize_index(-1, 4, "point").unwrap(), 3);
        assert_eq!(normalize_index(2, 4, "point").unwrap(), 2);
        let error = normalize_index(4, 4, "segment").unwrap_err();
        assert_eq!(error.to_string(), "No segment located at index 4.");
        assert!(normalize_index(-5, 4, "point").is_err());
    }

    #[test]
    fn test_insert_index_clamps() {
        assert_eq!(normalize_insert_index(10, 3), 3);
        assert_eq!(normalize_insert_index(-1, 3), 2);
        assert_eq!(normalize_insert_index(-10, 3), 0);
    }

    #[test]
    fn test_identifier_rules() {
        assert!(normalize_identifier("abc123").is_ok());
        assert!(normalize_identifier("").is_err());
        assert!(normalize_identifier(&"a".repeat(101)).is_err());
        assert!(normalize_identifier("tab\there").is_err());
        assert!(normalize_identifier("é").is_err());
    }

    #[test]
    fn test_angles() {
        assert_eq!(normalize_rotation_angle(-90.0).unwrap(), 270.0);
        assert!(normalize_rotation_angle(361.0).is_err());
        assert_eq!(normalize_guideline_angle(-45.0).unwrap(), 315.0);
        assert_eq!(normalize_skew_angle(10.0).unwrap(), (10.0, 0.0));
        assert!(normalize_skew_angle((10.0, 400.0)).is_err());
    }

    #[test]
    fn test_scale_and_factor_pairs() {
        assert_eq!(normalize_transformation_scale(2.0).unwrap(), (2.0, 2.0));
        assert_eq!(normalize_transformation_scale((2.0, 3.0)).unwrap(), (2.0, 3.0));
        assert_eq!(normalize_interpolation_factor(0.5).unwrap(), (0.5, 0.5));
        assert!(normalize_transformation_scale(f64::NAN).is_err());
    }

    #[test]
    fn test_matrix_rejects_non_finite_values() {
        assert!(normalize_transformation_matrix([1.0, 0.0, 0.0, 1.0, 0.0, 0.0]).is_ok());
        assert!(normalize_transformation_matrix([1.0, 0.0, 0.0, f64::INFINITY, 0.0, 0.0]).is_err());
    }

    #[test]
    fn test_unicode_values() {
        assert_eq!(normalize_glyph_unicode_str("0041").unwrap(), 0x41);
        assert_eq!(normalize_glyph_unicode_str("0x1F600").unwrap(), 0x1F600);
        assert!(normalize_glyph_unicode_str("zz").is_err());
        assert!(normalize_glyph_unicode_str("0x0x41").is_err());
        assert!(normalize_glyph_unicode_str("+41").is_err());
        assert!(normalize_glyph_unicode_str("0x").is_err());
        assert!(normalize_glyph_unicode(0x110000).is_err());
        assert!(normalize_glyph_unicodes(&[0x41, 0x42, 0x41]).is_err());
    }

    #[test]
    fn test_layer_order_and_default_layer() {
        let existing = vec!["public.default".to_string(), "background".to_string()];
        let order = vec!["background".to_string(), "public.default".to_string()];
        assert_eq!(normalize_layer_order(&order, &existing).unwrap(), order);
        let missing = vec!["sketch".to_string()];
        assert!(normalize_layer_order(&missing, &existing).is_err());
        let duplicated = vec!["background".to_string(), "background".to_string()];
        assert!(normalize_layer_order(&duplicated, &existing).is_err());
        assert!(normalize_default_layer_name("sketch", &existing).is_err());
    }

    #[test]
    fn test_kerning_keys() {
        assert!(normalize_kerning_key("public.kern1.O", "public.kern2.O").is_ok());
        assert!(normalize_kerning_key("public.kern2.O", "A").is_err());
        assert!(normalize_kerning_key("A", "public.kern1.O").is_err());
        assert!(normalize_kerning_key("", "A").is_err());
    }

    #[test]
    fn test_bounding_box_and_area() {
        assert!(normalize_bounding_box(Rect::new(0.0, 0.0, 10.0, 10.0)).is_ok());
        assert!(normalize_bounding_box(Rect::new(10.0, 0.0, 0.0, 10.0)).is_err());
        assert!(normalize_area(-1.0).is_err());
    }

    #[test]
    fn test_color_components() {
        assert!(normalize_color([1.0, 0.0, 0.0, 0.5]).is_ok());
        assert!(normalize_color([1.0, 2.0, 0.0, 0.5]).is_err());
    }

    #[test]
    fn test_names() {
        assert!(normalize_glyph_name("").is_err());
        assert!(normalize_glyph_name("a\nb").is_err());
        assert!(normalize_layer_name("").is_err());
        assert!(normalize_lib_key("").is_err());
        assert!(normalize_glyph_order(&["a".into(), "b".into(), "a".into()]).is_err());
        assert!(normalize_file_format_version(4).is_err());
    }
}
