//! Fonts and layers

use super::*;
use crate::config::Settings;

#[test]
fn test_new_font_defaults() {
    let font = MemoryFont::new();
    assert_eq!(font.layer_order(), vec![DEFAULT_LAYER_NAME.to_string()]);
    assert_eq!(font.default_layer_name(), DEFAULT_LAYER_NAME);
    assert_eq!(font.info().units_per_em(), Some(1000.0));
    assert_eq!(font.len().unwrap(), 0);
    assert!(font.path().is_none());
}

#[test]
fn test_font_from_settings() {
    let settings = Settings {
        default_layer_name: Some("foreground".into()),
        default_glyph_width: Some(600.0),
        units_per_em: Some(2048.0),
        ..Default::default()
    };
    let font = MemoryFont::with_settings(&settings);
    assert_eq!(font.default_layer_name(), "foreground");
    assert_eq!(font.info().units_per_em(), Some(2048.0));
    assert_eq!(font.new_glyph("A", false).unwrap().width(), 600.0);
}

#[test]
fn test_layer_parents() {
    let font = MemoryFont::new();
    let layer = font.new_layer("background", None).unwrap();
    assert!(layer.font().unwrap().is_same(&font));
    assert!(font.get_layer("background").unwrap().is_same(&layer));
    assert!(matches!(font.get_layer("missing"), Err(Error::NotFound(_))));
}

#[test]
fn test_new_layer_returns_existing() {
    let font = MemoryFont::new();
    let layer = font.new_layer("background", None).unwrap();
    let color = Color::new(0.5, 0.5, 0.5, 1.0).unwrap();

    let again = font.new_layer("background", Some(color)).unwrap();
    assert!(again.is_same(&layer));
    assert_eq!(layer.color(), Some(color));
    assert_eq!(font.layers().len(), 2);
}

#[test]
fn test_layer_order() {
    let font = MemoryFont::new();
    font.new_layer("a", None).unwrap();
    font.new_layer("b", None).unwrap();

    let order: Vec<String> = ["b", DEFAULT_LAYER_NAME, "a"].map(String::from).to_vec();
    font.set_layer_order(&order).unwrap();
    assert_eq!(font.layer_order(), order);

    let bad: Vec<String> = ["b", "b"].map(String::from).to_vec();
    assert!(matches!(font.set_layer_order(&bad), Err(Error::Invalid(_))));
}

#[test]
fn test_rename_layer_keeps_order_and_default() {
    let font = MemoryFont::new();
    font.new_layer("background", None).unwrap();

    font.default_layer().unwrap().set_name("foreground").unwrap();
    assert_eq!(font.default_layer_name(), "foreground");
    assert_eq!(
        font.layer_order(),
        vec!["foreground".to_string(), "background".to_string()]
    );

    let result = font.get_layer("background").unwrap().set_name("foreground");
    assert!(matches!(result, Err(Error::Duplicate(_))));
}

#[test]
fn test_remove_layers() {
    let font = MemoryFont::new();
    font.new_layer("background", None).unwrap();

    font.remove_layer(DEFAULT_LAYER_NAME).unwrap();
    assert_eq!(font.default_layer_name(), "background");
    assert!(matches!(
        font.remove_layer("background"),
        Err(Error::Invalid(_))
    ));
    assert!(matches!(font.remove_layer("missing"), Err(Error::NotFound(_))));
}

#[test]
fn test_default_layer_must_exist() {
    let font = MemoryFont::new();
    assert!(matches!(
        font.set_default_layer_name("missing"),
        Err(Error::NotFound(_))
    ));
    let layer = font.new_layer("bold", None).unwrap();
    font.set_default_layer(&layer).unwrap();
    assert_eq!(font.default_layer_name(), "bold");
}

#[test]
fn test_duplicate_and_swap_layers() {
    let font = MemoryFont::new();
    draw_square(&font.new_glyph("A", false).unwrap(), (0.0, 0.0), 100.0);

    let copy = font.duplicate_layer(DEFAULT_LAYER_NAME, "backup").unwrap();
    assert_eq!(copy.glyph("A").unwrap().len(), 1);
    assert!(matches!(
        font.duplicate_layer(DEFAULT_LAYER_NAME, "backup"),
        Err(Error::Duplicate(_))
    ));

    font.get_layer("backup").unwrap().new_glyph("B", false).unwrap();
    font.swap_layer_names(DEFAULT_LAYER_NAME, "backup").unwrap();
    assert!(font.get_layer(DEFAULT_LAYER_NAME).unwrap().contains("B"));
    assert!(!font.get_layer("backup").unwrap().contains("B"));
    // the default follows the layer, not the name
    assert_eq!(font.default_layer_name(), "backup");
    assert!(!font.contains("B"));
    assert_eq!(
        font.layer_order(),
        vec!["backup".to_string(), DEFAULT_LAYER_NAME.to_string()]
    );
}

#[test]
fn test_layer_glyph_access() {
    let font = MemoryFont::new();
    let layer = font.default_layer().unwrap();
    let glyph = layer.new_glyph("A", false).unwrap();
    glyph.set_width(500.0).unwrap();

    assert!(layer.new_glyph("A", false).unwrap().is_same(&glyph));
    let cleared = layer.new_glyph("A", true).unwrap();
    assert!(!cleared.is_same(&glyph));
    assert!(glyph.layer().is_none());
    assert_eq!(layer.keys(), vec!["A".to_string()]);

    assert!(matches!(layer.glyph("missing"), Err(Error::NotFound(_))));
    assert!(matches!(layer.remove_glyph("missing"), Err(Error::NotFound(_))));
}

#[test]
fn test_insert_glyph_copies() {
    let (font, glyph) = font_with_glyph("A");
    draw_square(&glyph, (0.0, 0.0), 100.0);

    let other = MemoryFont::new();
    let inserted = other.insert_glyph(&glyph, Some("A.alt")).unwrap();
    assert_eq!(inserted.name(), "A.alt");
    assert!(inserted.font().unwrap().is_same(&other));
    assert_eq!(inserted.len(), 1);

    inserted.clear().unwrap();
    assert_eq!(font.glyph("A").unwrap().len(), 1);
}

#[test]
fn test_character_mapping() {
    let font = MemoryFont::new();
    font.new_glyph("A", false).unwrap().set_unicodes(&[0x41]).unwrap();
    font.new_glyph("A.alt", false).unwrap().set_unicodes(&[0x41]).unwrap();

    let mapping = font.character_mapping().unwrap();
    assert_eq!(
        mapping.get(&0x41),
        Some(&vec!["A".to_string(), "A.alt".to_string()])
    );
}

#[test]
fn test_glyph_order() {
    let font = MemoryFont::new();
    let order: Vec<String> = ["B", "A"].map(String::from).to_vec();
    font.set_glyph_order(&order).unwrap();
    assert_eq!(font.glyph_order(), order);

    let duplicate: Vec<String> = ["A", "A"].map(String::from).to_vec();
    assert!(matches!(
        font.set_glyph_order(&duplicate),
        Err(Error::Invalid(_))
    ));
}

#[test]
fn test_font_guidelines() {
    let font = MemoryFont::new();
    let guideline = font
        .append_guideline((0.0, 700.0), 0.0, Some("cap"), None)
        .unwrap();
    assert!(guideline.font().unwrap().is_same(&font));
    assert!(guideline.glyph().is_none());
    assert_eq!(font.guidelines().len(), 1);

    font.remove_guideline(&guideline).unwrap();
    assert!(font.guidelines().is_empty());
    assert!(matches!(font.remove_guideline_at(0), Err(Error::NotFound(_))));
}

#[test]
fn test_font_round() {
    let font = MemoryFont::new();
    let glyph = font.new_glyph("A", false).unwrap();
    glyph.set_width(100.4).unwrap();
    font.kerning().set_value("A", "V", -10.6).unwrap();
    font.append_guideline((0.5, 10.2), 0.0, None, None).unwrap();

    font.round().unwrap();
    assert_eq!(glyph.width(), 100.0);
    assert_eq!(font.kerning().value("A", "V"), Some(-11.0));
    assert_eq!(font.guideline(0).unwrap().position(), Point::new(1.0, 10.0));
}

#[test]
fn test_font_interpolation() {
    let light = MemoryFont::new();
    let bold = MemoryFont::new();
    for (font, size, width) in [(&light, 100.0, 200.0), (&bold, 200.0, 400.0)] {
        let glyph = font.new_glyph("A", false).unwrap();
        draw_square(&glyph, (0.0, 0.0), size);
        glyph.set_width(width).unwrap();
        font.kerning().set_value("A", "A", -width / 10.0).unwrap();
    }
    light.info().set("ascender", 700).unwrap();
    bold.info().set("ascender", 800).unwrap();

    let (compatible, report) = light.is_compatible(&bold);
    assert!(compatible, "{report}");

    let result = MemoryFont::new();
    result.interpolate(0.5, &light, &bold, true, false).unwrap();
    assert_eq!(result.glyph("A").unwrap().width(), 300.0);
    assert_eq!(result.kerning().value("A", "A"), Some(-30.0));
    assert_eq!(result.info().ascender(), Some(750.0));
}

#[test]
fn test_font_compatibility_report() {
    let light = MemoryFont::new();
    let bold = MemoryFont::new();
    draw_square(&light.new_glyph("A", false).unwrap(), (0.0, 0.0), 100.0);
    bold.new_glyph("A", false).unwrap();
    bold.new_layer("extra", None).unwrap();

    let (compatible, report) = light.is_compatible(&bold);
    assert!(!compatible);
    assert!(report.contains("[Warning] The fonts do not contain the same layers."));
    assert!(report.contains(DEFAULT_LAYER_NAME));
}

#[test]
fn test_font_copy() {
    let font = MemoryFont::new();
    font.info().set_family_name(Some("Test Sans")).unwrap();
    draw_square(&font.new_glyph("A", false).unwrap(), (0.0, 0.0), 100.0);
    font.new_layer("background", None).unwrap();
    font.groups()
        .set("public.kern1.A".into(), vec!["A".into()])
        .unwrap();
    font.features().set_text(Some("# empty"));

    let copy = font.copy().unwrap();
    assert!(!copy.is_same(&font));
    assert_eq!(copy.info().family_name().as_deref(), Some("Test Sans"));
    assert_eq!(copy.layer_order(), font.layer_order());
    assert_eq!(copy.glyph("A").unwrap().len(), 1);
    assert_eq!(copy.groups().len(), 1);
    assert_eq!(copy.features().text().as_deref(), Some("# empty"));
    assert!(copy.path().is_none());
}

#[test]
fn test_save_without_path_fails() {
    let font = MemoryFont::new();
    assert!(matches!(font.save(None, None), Err(Error::Invalid(_))));
}

#[test]
fn test_font_repr() {
    let font = MemoryFont::new();
    font.info().set_family_name(Some("Test")).unwrap();
    font.info().set_style_name(Some("Bold")).unwrap();
    assert!(font.repr().starts_with("<Font 'Test Bold' at "));
}
