//! Reading and writing UFO files

use serde_json::json;
use tempfile::TempDir;

use super::*;

fn sample_font() -> MemoryFont {
    let font = MemoryFont::new();
    let info = font.info();
    info.set_family_name(Some("Round Trip")).unwrap();
    info.set_style_name(Some("Regular")).unwrap();
    info.set_ascender(Some(750.0)).unwrap();

    let glyph = font.new_glyph("A", false).unwrap();
    draw_square(&glyph, (0.0, 0.0), 100.0);
    glyph.set_width(500.0).unwrap();
    glyph.set_unicodes(&[0x41]).unwrap();
    glyph
        .append_anchor(Some("top"), (50.0, 100.0), None)
        .unwrap();
    glyph
        .append_guideline((0.0, 0.0), 90.0, Some("stem"), None)
        .unwrap();
    glyph
        .set_mark_color(Some(Color::new(1.0, 0.0, 0.0, 1.0).unwrap()))
        .unwrap();
    glyph.set_note(Some("base glyph"));

    let acute = font.new_glyph("Aacute", false).unwrap();
    acute
        .append_component("A", Some(Vec2::new(10.0, 20.0)), None)
        .unwrap();

    let background = font.new_layer("background", None).unwrap();
    background.new_glyph("A", false).unwrap();

    font.groups()
        .set("public.kern1.A".into(), vec!["A".into(), "Aacute".into()])
        .unwrap();
    font.kerning()
        .set_value("public.kern1.A", "V", -30.0)
        .unwrap();
    font.features().set_text(Some("# features\n"));
    font.lib()
        .set("com.example.key".into(), json!("value"))
        .unwrap();
    font.set_glyph_order(&["Aacute".to_string(), "A".to_string()])
        .unwrap();
    font.append_guideline((0.0, 700.0), 0.0, Some("cap"), None)
        .unwrap();
    font
}

#[test]
fn test_save_and_load_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("RoundTrip.ufo");
    let font = sample_font();

    font.save(Some(path.as_path()), None).unwrap();
    assert_eq!(font.path().as_deref(), Some(path.as_path()));

    let loaded = MemoryFont::load(&path).unwrap();
    assert_eq!(loaded.path().as_deref(), Some(path.as_path()));
    assert_eq!(loaded.info().family_name().as_deref(), Some("Round Trip"));
    assert_eq!(loaded.info().ascender(), Some(750.0));
    assert_eq!(loaded.default_layer_name(), DEFAULT_LAYER_NAME);
    assert!(loaded.get_layer("background").unwrap().contains("A"));

    let glyph = loaded.glyph("A").unwrap();
    assert!(glyph.font().unwrap().is_same(&loaded));
    assert_eq!(glyph.width(), 500.0);
    assert_eq!(glyph.unicodes(), vec![0x41]);
    assert_eq!(glyph.len(), 1);
    assert_eq!(glyph.contour(0).unwrap().len_points(), 4);
    assert_eq!(glyph.anchor(0).unwrap().name().as_deref(), Some("top"));
    assert_eq!(glyph.guideline(0).unwrap().angle(), 90.0);
    assert_eq!(glyph.note().as_deref(), Some("base glyph"));
    assert_eq!(
        glyph.mark_color(),
        Some(Color::new(1.0, 0.0, 0.0, 1.0).unwrap())
    );

    let component = loaded.glyph("Aacute").unwrap().component(0).unwrap();
    assert_eq!(component.base_glyph(), "A");
    assert_eq!(component.offset(), Vec2::new(10.0, 20.0));

    assert_eq!(
        loaded.groups().get(&"public.kern1.A".to_string()),
        Some(vec!["A".to_string(), "Aacute".to_string()])
    );
    assert_eq!(loaded.kerning().value("public.kern1.A", "V"), Some(-30.0));
    assert_eq!(loaded.kerning().find("Aacute", "V").unwrap(), Some(-30.0));
    assert_eq!(loaded.features().text().as_deref(), Some("# features\n"));
    assert_eq!(
        loaded.lib().get(&"com.example.key".to_string()),
        Some(json!("value"))
    );
    assert_eq!(
        loaded.glyph_order(),
        vec!["Aacute".to_string(), "A".to_string()]
    );
    assert_eq!(loaded.guidelines().len(), 1);
    assert_eq!(loaded.guideline(0).unwrap().name().as_deref(), Some("cap"));
}

#[test]
fn test_save_back_to_loaded_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("Resave.ufo");
    sample_font().save(Some(path.as_path()), None).unwrap();

    let loaded = MemoryFont::load(&path).unwrap();
    loaded.new_glyph("B", false).unwrap();
    loaded.save(None, None).unwrap();

    assert!(MemoryFont::load(&path).unwrap().contains("B"));
}

#[test]
fn test_renamed_default_layer_survives() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("Renamed.ufo");
    let font = MemoryFont::new();
    font.new_glyph("A", false).unwrap();
    font.default_layer().unwrap().set_name("foreground").unwrap();
    font.save(Some(path.as_path()), None).unwrap();

    let loaded = MemoryFont::load(&path).unwrap();
    assert_eq!(loaded.default_layer_name(), "foreground");
    assert!(loaded.contains("A"));
}

#[test]
fn test_unsupported_format_version() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("Old.ufo");
    let result = MemoryFont::new().save(Some(path.as_path()), Some(2));
    assert!(matches!(result, Err(Error::Unsupported(_))));
}

#[test]
fn test_generate_into_directory() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("Source.ufo");
    let font = sample_font();
    font.save(Some(source.as_path()), None).unwrap();

    let out = dir.path().join("out");
    std::fs::create_dir_all(&out).unwrap();
    let written = font.generate("ufo3", Some(out.as_path())).unwrap();
    assert_eq!(written, out.join("Source.ufo"));
    assert!(MemoryFont::load(&written).unwrap().contains("Aacute"));
    assert_eq!(font.path().as_deref(), Some(source.as_path()));

    assert!(matches!(
        font.generate("otf", Some(out.as_path())),
        Err(Error::Unsupported(_))
    ));
}

#[test]
fn test_load_missing_file() {
    let dir = TempDir::new().unwrap();
    let result = MemoryFont::load(dir.path().join("Missing.ufo"));
    assert!(matches!(result, Err(Error::Ufo(_))));
}

#[test]
fn test_appended_identifiers_reload() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("Appended.ufo");
    let font = MemoryFont::new();

    let source = font.new_glyph("source", false).unwrap();
    let mut pen = source.point_pen();
    pen.begin_path(Some("bowl")).unwrap();
    for (index, (x, y)) in [(0.0, 0.0), (0.0, 100.0), (100.0, 100.0)].into_iter().enumerate() {
        pen.add_point(&UfoPoint::line_to(x, y).with_identifier(format!("bowl{index}")))
            .unwrap();
    }
    pen.end_path().unwrap();

    let target = font.new_glyph("target", false).unwrap();
    target.append_glyph(&source, None).unwrap();
    target
        .append_glyph(&source, Some(Vec2::new(200.0, 0.0)))
        .unwrap();
    target.append_glyph(&target.clone(), None).unwrap();
    font.save(Some(path.as_path()), None).unwrap();

    let loaded = MemoryFont::load(&path).unwrap();
    let glyph = loaded.glyph("target").unwrap();
    assert_eq!(glyph.len(), 4);
    assert_eq!(glyph.contour(0).unwrap().identifier().as_deref(), Some("bowl"));
    assert_eq!(
        glyph.contour(0).unwrap().ufo_points()[2].identifier.as_deref(),
        Some("bowl2")
    );
    assert_eq!(glyph.contour(1).unwrap().identifier(), None);
}
