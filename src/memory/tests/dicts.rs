//! Info, groups, kerning, features and libs

use serde_json::json;

use super::*;

#[test]
fn test_info_values_are_checked() {
    let font = MemoryFont::new();
    let info = font.info();
    assert!(info.font().unwrap().is_same(&font));

    info.set("familyName", "Test Sans").unwrap();
    assert_eq!(info.get("familyName").unwrap(), Some(json!("Test Sans")));
    assert!(matches!(info.set("familyName", 12), Err(Error::Invalid(_))));
    assert!(matches!(info.set("unitsPerEm", -1), Err(Error::Invalid(_))));
    assert!(matches!(info.get("bogus"), Err(Error::Invalid(_))));

    info.set("versionMajor", 2.0).unwrap();
    assert_eq!(info.get("versionMajor").unwrap(), Some(json!(2)));

    info.remove("familyName").unwrap();
    assert_eq!(info.family_name(), None);
    assert!(!info.attributes().contains(&"familyName".to_string()));
}

#[test]
fn test_info_round_skips_blue_scale() {
    let info = MemoryFont::new().info();
    info.set("ascender", 700.6).unwrap();
    info.set("postscriptBlueScale", 0.039625).unwrap();
    info.set("postscriptBlueValues", json!([-10.4, 0.6])).unwrap();

    info.round().unwrap();
    assert_eq!(info.ascender(), Some(701.0));
    assert_eq!(info.get("postscriptBlueScale").unwrap(), Some(json!(0.039625)));
    assert_eq!(info.get("postscriptBlueValues").unwrap(), Some(json!([-10, 1])));
}

#[test]
fn test_info_interpolation_per_axis() {
    let (min, max) = (MemoryFont::new().info(), MemoryFont::new().info());
    min.set("italicAngle", 0).unwrap();
    max.set("italicAngle", -10).unwrap();
    min.set("capHeight", 700).unwrap();
    max.set("capHeight", 800).unwrap();
    min.set("familyName", "Light").unwrap();
    max.set("familyName", "Bold").unwrap();

    let result = MemoryFont::new().info();
    result.interpolate((0.5, 0.25), &min, &max, false, false).unwrap();
    assert_eq!(result.italic_angle(), Some(-5.0));
    assert_eq!(result.cap_height(), Some(725.0));
    assert_eq!(result.family_name().as_deref(), Some("Light"));
}

#[test]
fn test_info_interpolation_of_mismatched_lists() {
    let (min, max) = (MemoryFont::new().info(), MemoryFont::new().info());
    min.set("postscriptBlueValues", json!([0, 10])).unwrap();
    max.set("postscriptBlueValues", json!([0, 10, 500, 510])).unwrap();

    let result = MemoryFont::new().info();
    assert!(matches!(
        result.interpolate(0.5, &min, &max, false, false),
        Err(Error::Incompatible(_))
    ));
    result.interpolate(0.5, &min, &max, false, true).unwrap();
    assert_eq!(result.get("postscriptBlueValues").unwrap(), None);
}

#[test]
fn test_groups() {
    let font = MemoryFont::new();
    let groups = font.groups();
    groups
        .set("public.kern1.O".into(), vec!["O".into(), "Q".into()])
        .unwrap();
    groups.set("public.kern2.O".into(), vec!["O".into()]).unwrap();
    groups.set("round".into(), vec!["O".into()]).unwrap();

    let mut found = groups.find_glyph("O").unwrap();
    found.sort();
    assert_eq!(found, vec!["public.kern1.O", "public.kern2.O", "round"]);
    assert_eq!(groups.side1_kerning_groups().len(), 1);
    assert_eq!(groups.side2_kerning_groups().len(), 1);

    assert!(matches!(
        groups.set(String::new(), vec![]),
        Err(Error::Invalid(_))
    ));
    assert!(matches!(
        groups.remove(&"missing".to_string()),
        Err(Error::NotFound(_))
    ));
    assert_eq!(groups.pop(&"round".to_string(), None), Some(vec!["O".to_string()]));
    assert_eq!(groups.len(), 2);
}

#[test]
fn test_kerning_find_uses_groups() {
    let font = MemoryFont::new();
    let groups = font.groups();
    groups
        .set("public.kern1.O".into(), vec!["O".into(), "Q".into()])
        .unwrap();
    groups
        .set("public.kern2.V".into(), vec!["V".into(), "W".into()])
        .unwrap();

    let kerning = font.kerning();
    kerning.set_value("public.kern1.O", "public.kern2.V", -40.0).unwrap();
    kerning.set_value("Q", "public.kern2.V", -55.0).unwrap();
    kerning.set_value("O", "W", -20.0).unwrap();

    assert_eq!(kerning.find("O", "V").unwrap(), Some(-40.0));
    assert_eq!(kerning.find("Q", "W").unwrap(), Some(-55.0));
    assert_eq!(kerning.find("O", "W").unwrap(), Some(-20.0));
    assert_eq!(kerning.find("A", "V").unwrap(), None);
    assert_eq!(kerning.value("O", "V"), None);
}

#[test]
fn test_kerning_scale_and_round() {
    let kerning = MemoryFont::new().kerning();
    kerning.set_value("A", "V", -33.0).unwrap();
    kerning.set_value("T", "o", 12.0).unwrap();

    kerning.scale_by(1.5).unwrap();
    assert_eq!(kerning.value("A", "V"), Some(-49.5));

    kerning.round(10);
    assert_eq!(kerning.value("A", "V"), Some(-50.0));
    assert_eq!(kerning.value("T", "o"), Some(20.0));
}

#[test]
fn test_kerning_interpolation_uses_union() {
    let (min, max) = (MemoryFont::new().kerning(), MemoryFont::new().kerning());
    min.set_value("A", "V", -40.0).unwrap();
    max.set_value("A", "V", -80.0).unwrap();
    max.set_value("T", "o", -20.0).unwrap();
    min.set_value("L", "T", 10.0).unwrap();
    max.set_value("L", "T", -10.0).unwrap();

    let result = MemoryFont::new().kerning();
    result.interpolate(0.5, &min, &max, true).unwrap();
    assert_eq!(result.value("A", "V"), Some(-60.0));
    assert_eq!(result.value("T", "o"), Some(-10.0));
    assert!(!result.contains(&("L".to_string(), "T".to_string())));
}

#[test]
fn test_features() {
    let font = MemoryFont::new();
    let features = font.features();
    assert!(features.font().unwrap().is_same(&font));
    assert_eq!(features.text(), None);

    features.set_text(Some("languagesystem DFLT dflt;"));
    assert_eq!(features.text().as_deref(), Some("languagesystem DFLT dflt;"));
    features.set_text(None);
    assert_eq!(features.text(), None);
}

#[test]
fn test_libs_know_their_parent() {
    let (font, glyph) = font_with_glyph("A");
    assert!(font.lib().font().unwrap().is_same(&font));

    let layer = font.default_layer().unwrap();
    let layer_lib = layer.lib();
    assert!(layer_lib.layer().unwrap().is_same(&layer));
    assert!(layer_lib.font().unwrap().is_same(&font));

    let glyph_lib = glyph.lib();
    assert!(glyph_lib.glyph().unwrap().is_same(&glyph));
    assert!(glyph_lib.font().unwrap().is_same(&font));
}

#[test]
fn test_lib_values() {
    let lib = MemoryFont::new().lib();
    lib.set("com.example.flag".into(), json!(true)).unwrap();
    lib.set("com.example.list".into(), json!([1, 2, 3])).unwrap();

    assert_eq!(lib.len(), 2);
    assert_eq!(lib.get(&"com.example.flag".to_string()), Some(json!(true)));
    assert_eq!(lib.to_map().len(), 2);
    assert!(matches!(lib.set(String::new(), json!(1)), Err(Error::Invalid(_))));

    lib.clear();
    assert!(lib.is_empty());
}
