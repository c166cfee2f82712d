//! Font info attribute table
//!
//! The UFO 3 fontinfo attributes, keyed by their plist names, with the kind of
//! value each one accepts.

use serde_json::Value;

use crate::error::{Error, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InfoValueKind {
    String,
    Integer,
    NonNegativeInteger,
    Number,
    NonNegativeNumber,
    Boolean,
    IntegerList,
    NumberList,
    /// Structured records (name records, gasp ranges, WOFF metadata)
    Structured,
}

impl InfoValueKind {
    /// Kinds whose values take part in rounding and interpolation.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            InfoValueKind::Integer
                | InfoValueKind::NonNegativeInteger
                | InfoValueKind::Number
                | InfoValueKind::NonNegativeNumber
                | InfoValueKind::IntegerList
                | InfoValueKind::NumberList
        )
    }

    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            InfoValueKind::Integer | InfoValueKind::NonNegativeInteger | InfoValueKind::IntegerList
        )
    }
}

use InfoValueKind::*;

pub const INFO_ATTRIBUTES: &[(&str, InfoValueKind)] = &[
    ("familyName", String),
    ("styleName", String),
    ("styleMapFamilyName", String),
    ("styleMapStyleName", String),
    ("versionMajor", Integer),
    ("versionMinor", NonNegativeInteger),
    ("year", Integer),
    ("copyright", String),
    ("trademark", String),
    ("unitsPerEm", NonNegativeNumber),
    ("descender", Number),
    ("xHeight", Number),
    ("capHeight", Number),
    ("ascender", Number),
    ("italicAngle", Number),
    ("note", String),
    ("openTypeGaspRangeRecords", Structured),
    ("openTypeHeadCreated", String),
    ("openTypeHeadLowestRecPPEM", NonNegativeInteger),
    ("openTypeHeadFlags", IntegerList),
    ("openTypeHheaAscender", Integer),
    ("openTypeHheaDescender", Integer),
    ("openTypeHheaLineGap", Integer),
    ("openTypeHheaCaretSlopeRise", Integer),
    ("openTypeHheaCaretSlopeRun", Integer),
    ("openTypeHheaCaretOffset", Integer),
    ("openTypeNameDesigner", String),
    ("openTypeNameDesignerURL", String),
    ("openTypeNameManufacturer", String),
    ("openTypeNameManufacturerURL", String),
    ("openTypeNameLicense", String),
    ("openTypeNameLicenseURL", String),
    ("openTypeNameVersion", String),
    ("openTypeNameUniqueID", String),
    ("openTypeNameDescription", String),
    ("openTypeNamePreferredFamilyName", String),
    ("openTypeNamePreferredSubfamilyName", String),
    ("openTypeNameCompatibleFullName", String),
    ("openTypeNameSampleText", String),
    ("openTypeNameWWSFamilyName", String),
    ("openTypeNameWWSSubfamilyName", String),
    ("openTypeNameRecords", Structured),
    ("openTypeOS2WidthClass", NonNegativeInteger),
    ("openTypeOS2WeightClass", NonNegativeInteger),
    ("openTypeOS2Selection", IntegerList),
    ("openTypeOS2VendorID", String),
    ("openTypeOS2Panose", IntegerList),
    ("openTypeOS2FamilyClass", IntegerList),
    ("openTypeOS2UnicodeRanges", IntegerList),
    ("openTypeOS2CodePageRanges", IntegerList),
    ("openTypeOS2TypoAscender", Integer),
    ("openTypeOS2TypoDescender", Integer),
    ("openTypeOS2TypoLineGap", Integer),
    ("openTypeOS2WinAscent", NonNegativeInteger),
    ("openTypeOS2WinDescent", NonNegativeInteger),
    ("openTypeOS2Type", IntegerList),
    ("openTypeOS2SubscriptXSize", Integer),
    ("openTypeOS2SubscriptYSize", Integer),
    ("openTypeOS2SubscriptXOffset", Integer),
    ("openTypeOS2SubscriptYOffset", Integer),
    ("openTypeOS2SuperscriptXSize", Integer),
    ("openTypeOS2SuperscriptYSize", Integer),
    ("openTypeOS2SuperscriptXOffset", Integer),
    ("openTypeOS2SuperscriptYOffset", Integer),
    ("openTypeOS2StrikeoutSize", Integer),
    ("openTypeOS2StrikeoutPosition", Integer),
    ("openTypeVheaVertTypoAscender", Integer),
    ("openTypeVheaVertTypoDescender", Integer),
    ("openTypeVheaVertTypoLineGap", Integer),
    ("openTypeVheaCaretSlopeRise", Integer),
    ("openTypeVheaCaretSlopeRun", Integer),
    ("openTypeVheaCaretOffset", Integer),
    ("postscriptFontName", String),
    ("postscriptFullName", String),
    ("postscriptSlantAngle", Number),
    ("postscriptUniqueID", Integer),
    ("postscriptUnderlineThickness", Number),
    ("postscriptUnderlinePosition", Number),
    ("postscriptIsFixedPitch", Boolean),
    ("postscriptBlueValues", NumberList),
    ("postscriptOtherBlues", NumberList),
    ("postscriptFamilyBlues", NumberList),
    ("postscriptFamilyOtherBlues", NumberList),
    ("postscriptStemSnapH", NumberList),
    ("postscriptStemSnapV", NumberList),
    ("postscriptBlueFuzz", Number),
    ("postscriptBlueShift", Number),
    ("postscriptBlueScale", Number),
    ("postscriptForceBold", Boolean),
    ("postscriptDefaultWidthX", Number),
    ("postscriptNominalWidthX", Number),
    ("postscriptWeightName", String),
    ("postscriptDefaultCharacter", String),
    ("postscriptWindowsCharacterSet", NonNegativeInteger),
    ("macintoshFONDFamilyID", Integer),
    ("macintoshFONDName", String),
    ("woffMajorVersion", NonNegativeInteger),
    ("woffMinorVersion", NonNegativeInteger),
    ("woffMetadataUniqueID", Structured),
    ("woffMetadataVendor", Structured),
    ("woffMetadataCredits", Structured),
    ("woffMetadataDescription", Structured),
    ("woffMetadataLicense", Structured),
    ("woffMetadataCopyright", Structured),
    ("woffMetadataTrademark", Structured),
    ("woffMetadataLicensee", Structured),
    ("woffMetadataExtensions", Structured),
];

pub fn info_attribute_kind(attribute: &str) -> Option<InfoValueKind> {
    INFO_ATTRIBUTES
        .iter()
        .find(|(name, _)| *name == attribute)
        .map(|(_, kind)| *kind)
}

fn is_integer(value: &Value) -> bool {
    value.is_i64() || value.is_u64()
}

fn is_finite_number(value: &Value) -> bool {
    value.as_f64().is_some_and(f64::is_finite)
}

/// Check a value against the kind of an info attribute. `Null` clears the
/// attribute and is always accepted.
pub fn normalize_info_value(attribute: &str, value: Value) -> Result<Value> {
    let kind = info_attribute_kind(attribute)
        .ok_or_else(|| Error::invalid(format!("Unknown attribute {attribute}.")))?;
    if value.is_null() {
        return Ok(value);
    }
    let valid = match kind {
        InfoValueKind::String => value.is_string(),
        InfoValueKind::Integer => is_integer(&value),
        InfoValueKind::NonNegativeInteger => value.is_u64(),
        InfoValueKind::Number => is_finite_number(&value),
        InfoValueKind::NonNegativeNumber => {
            is_finite_number(&value) && value.as_f64().is_some_and(|v| v >= 0.0)
        }
        InfoValueKind::Boolean => value.is_boolean(),
        InfoValueKind::IntegerList => value
            .as_array()
            .is_some_and(|items| items.iter().all(is_integer)),
        InfoValueKind::NumberList => value
            .as_array()
            .is_some_and(|items| items.iter().all(is_finite_number)),
        InfoValueKind::Structured => value.is_array() || value.is_object(),
    };
    if !valid {
        return Err(Error::invalid(format!(
            "Invalid value for attribute '{attribute}': {value}."
        )));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_units_per_em_must_be_non_negative() {
        assert!(normalize_info_value("unitsPerEm", json!(1000)).is_ok());
        assert!(normalize_info_value("unitsPerEm", json!(2000.1)).is_ok());
        assert!(normalize_info_value("unitsPerEm", json!(-1000)).is_err());
    }

    #[test]
    fn test_kinds() {
        assert!(normalize_info_value("familyName", json!("Test")).is_ok());
        assert!(normalize_info_value("familyName", json!(1)).is_err());
        assert!(normalize_info_value("versionMajor", json!(1.5)).is_err());
        assert!(normalize_info_value("openTypeOS2Selection", json!([1, 2])).is_ok());
        assert!(normalize_info_value("postscriptBlueValues", json!([-10, 0.5])).is_ok());
        assert!(normalize_info_value("postscriptIsFixedPitch", json!("yes")).is_err());
        assert!(normalize_info_value("familyName", Value::Null).is_ok());
    }

    #[test]
    fn test_unknown_attribute() {
        let error = normalize_info_value("bogus", json!(1)).unwrap_err();
        assert_eq!(error.to_string(), "Unknown attribute bogus.");
    }
}
