//! Glyphs, components, anchors and guidelines

use kurbo::{Affine, Rect};

use super::*;

#[test]
fn test_new_glyph_is_in_default_layer() {
    let (font, glyph) = font_with_glyph("A");
    assert_eq!(glyph.name(), "A");
    assert!(glyph.layer().unwrap().is_same(&font.default_layer().unwrap()));
    assert!(glyph.font().unwrap().is_same(&font));
    assert!(font.contains("A"));
    assert_eq!(glyph.width(), 0.0);
}

#[test]
fn test_rename_glyph_rekeys_layer() {
    let (font, glyph) = font_with_glyph("A");
    font.new_glyph("B", false).unwrap();

    glyph.set_name("Aacute").unwrap();
    assert_eq!(glyph.name(), "Aacute");
    assert!(font.contains("Aacute"));
    assert!(!font.contains("A"));

    let result = glyph.set_name("B");
    assert!(matches!(result, Err(Error::Duplicate(_))));
    assert!(matches!(glyph.set_name(""), Err(Error::Invalid(_))));
}

#[test]
fn test_rename_glyph_keeps_layer_order() {
    let (font, _glyph) = font_with_glyph("A");
    let glyph = font.new_glyph("B", false).unwrap();
    font.new_glyph("C", false).unwrap();

    glyph.set_name("Bee").unwrap();
    assert_eq!(font.keys().unwrap(), vec!["A", "Bee", "C"]);
}

#[test]
fn test_unicodes() {
    let (_font, glyph) = font_with_glyph("A");
    glyph.set_unicodes(&[0x41, 0x61]).unwrap();
    assert_eq!(glyph.unicode(), Some(0x41));

    glyph.set_unicode(Some(0x61)).unwrap();
    assert_eq!(glyph.unicodes(), vec![0x61, 0x41]);

    glyph.set_unicode(None).unwrap();
    assert!(glyph.unicodes().is_empty());
}

#[test]
fn test_auto_unicodes() {
    let font = MemoryFont::new();
    let uni = font.new_glyph("uni00C5", false).unwrap();
    let long = font.new_glyph("u1F600", false).unwrap();
    let suffixed = font.new_glyph("uni0041.alt", false).unwrap();
    suffixed.set_unicodes(&[0xE000]).unwrap();

    font.auto_unicodes().unwrap();
    assert_eq!(uni.unicodes(), vec![0xC5]);
    assert_eq!(long.unicodes(), vec![0x1F600]);
    assert_eq!(suffixed.unicodes(), vec![0xE000]);
    assert_eq!(crate::memory::glyph::unicode_from_glyph_name("uniD800"), None);
}

#[test]
fn test_margins() {
    let (_font, glyph) = font_with_glyph("A");
    draw_square(&glyph, (10.0, 0.0), 100.0);
    glyph.set_width(150.0).unwrap();

    assert_eq!(glyph.left_margin().unwrap(), 10.0);
    assert_eq!(glyph.right_margin().unwrap(), 40.0);

    glyph.set_left_margin(30.0).unwrap();
    assert_eq!(glyph.left_margin().unwrap(), 30.0);
    assert_eq!(glyph.width(), 170.0);

    glyph.set_right_margin(0.0).unwrap();
    assert_eq!(glyph.width(), 130.0);
}

#[test]
fn test_empty_glyph_margins() {
    let (_font, glyph) = font_with_glyph("space");
    glyph.set_width(250.0).unwrap();
    assert_eq!(glyph.left_margin().unwrap(), 0.0);
    assert_eq!(glyph.right_margin().unwrap(), 250.0);
    assert!(glyph.bounds().unwrap().is_none());
}

#[test]
fn test_component_bounds_and_decompose() {
    let font = MemoryFont::new();
    let base = font.new_glyph("B", false).unwrap();
    draw_square(&base, (0.0, 0.0), 50.0);
    let glyph = font.new_glyph("A", false).unwrap();

    let component = glyph
        .append_component("B", Some(Vec2::new(100.0, 0.0)), None)
        .unwrap();
    assert!(component.glyph().unwrap().is_same(&glyph));
    assert_eq!(component.offset(), Vec2::new(100.0, 0.0));

    let bounds = glyph.bounds().unwrap().unwrap();
    assert_eq!((bounds.x0, bounds.x1), (100.0, 150.0));
    assert!(glyph.point_inside((120.0, 20.0)).unwrap());

    let mapping = font.reverse_component_mapping().unwrap();
    assert_eq!(mapping.get("B"), Some(&vec!["A".to_string()]));

    glyph.decompose().unwrap();
    assert!(glyph.components().is_empty());
    assert_eq!(glyph.len(), 1);
    let bounds = glyph.contour(0).unwrap().bounds().unwrap().unwrap();
    assert_eq!((bounds.x0, bounds.x1), (100.0, 150.0));
}

#[test]
fn test_component_cannot_reference_its_glyph() {
    let (_font, glyph) = font_with_glyph("A");
    let result = glyph.append_component("A", None, None);
    assert!(matches!(result, Err(Error::Invalid(_))));
}

#[test]
fn test_component_scale_and_index() {
    let (_font, glyph) = font_with_glyph("A");
    let first = glyph.append_component("B", None, None).unwrap();
    let second = glyph
        .append_component("C", None, Some((2.0, 0.5).into()))
        .unwrap();
    assert_eq!(second.scale(), (2.0, 0.5));

    second.set_index(0).unwrap();
    assert_eq!(second.index(), Some(0));
    assert_eq!(first.index(), Some(1));
}

#[test]
fn test_anchors() {
    let (_font, glyph) = font_with_glyph("A");
    let color = Color::new(1.0, 0.0, 0.0, 1.0).unwrap();
    let anchor = glyph
        .append_anchor(Some("top"), (250.0, 700.0), Some(color))
        .unwrap();
    assert!(anchor.glyph().unwrap().is_same(&glyph));
    assert_eq!(anchor.name().as_deref(), Some("top"));
    assert_eq!(anchor.position(), Point::new(250.0, 700.0));
    assert_eq!(anchor.color(), Some(color));

    glyph.move_by((10.0, 0.0)).unwrap();
    assert_eq!(glyph.anchor(0).unwrap().x(), 260.0);

    glyph.remove_anchor(&anchor).unwrap();
    assert!(glyph.anchors().is_empty());
    assert!(anchor.glyph().is_none());
}

#[test]
fn test_glyph_guidelines() {
    let (_font, glyph) = font_with_glyph("A");
    let guideline = glyph
        .append_guideline((0.0, 500.0), 0.0, Some("overshoot"), None)
        .unwrap();
    assert!(guideline.glyph().unwrap().is_same(&glyph));
    assert_eq!(guideline.index(), Some(0));

    assert!(matches!(
        glyph.append_guideline((0.0, 0.0), 400.0, None, None),
        Err(Error::Invalid(_))
    ));

    glyph.clear_guidelines().unwrap();
    assert!(glyph.guidelines().is_empty());
}

#[test]
fn test_mark_color_lives_in_lib() {
    let (_font, glyph) = font_with_glyph("A");
    let color = Color::new(0.0, 0.5, 1.0, 1.0).unwrap();
    glyph.set_mark_color(Some(color)).unwrap();
    assert_eq!(glyph.mark_color(), Some(color));
    assert!(glyph.lib().contains(&"public.markColor".to_string()));

    glyph.set_mark_color(None).unwrap();
    assert_eq!(glyph.mark_color(), None);
    assert!(glyph.lib().is_empty());
}

#[test]
fn test_glyph_math() {
    let (_font, glyph) = font_with_glyph("A");
    draw_square(&glyph, (0.0, 0.0), 100.0);
    glyph.set_width(200.0).unwrap();

    let doubled = glyph.math_mul(2.0).unwrap();
    assert!(doubled.layer().is_none());
    assert_eq!(doubled.width(), 400.0);
    let bounds = doubled.bounds().unwrap().unwrap();
    assert_eq!(bounds.x1, 200.0);

    let sum = glyph.math_add(&glyph).unwrap();
    assert_eq!(sum.width(), 400.0);

    assert!(matches!(glyph.math_div(0.0), Err(Error::Invalid(_))));
}

#[test]
fn test_glyph_interpolation() {
    let font = MemoryFont::new();
    let light = font.new_glyph("light", false).unwrap();
    draw_square(&light, (0.0, 0.0), 100.0);
    light.set_width(200.0).unwrap();
    let bold = font.new_glyph("bold", false).unwrap();
    draw_square(&bold, (0.0, 0.0), 200.0);
    bold.set_width(301.0).unwrap();

    let (compatible, report) = light.is_compatible(&bold);
    assert!(compatible, "{report}");

    let result = font.new_glyph("result", false).unwrap();
    result.interpolate(0.5, &light, &bold, true, false).unwrap();
    assert_eq!(result.width(), 251.0);
    let bounds = result.bounds().unwrap().unwrap();
    assert_eq!(bounds.x1, 150.0);
}

#[test]
fn test_incompatible_interpolation() {
    let font = MemoryFont::new();
    let one = font.new_glyph("one", false).unwrap();
    draw_square(&one, (0.0, 0.0), 100.0);
    let empty = font.new_glyph("empty", false).unwrap();

    let (compatible, report) = one.is_compatible(&empty);
    assert!(!compatible);
    assert!(report.contains("[Fatal]"));

    let result = font.new_glyph("result", false).unwrap();
    assert!(matches!(
        result.interpolate(0.5, &one, &empty, true, false),
        Err(Error::Incompatible(_))
    ));
    assert!(result.interpolate(0.5, &one, &empty, true, true).is_ok());
}

#[test]
fn test_correct_direction() {
    let (_font, glyph) = font_with_glyph("O");
    draw_square(&glyph, (0.0, 0.0), 100.0);
    draw_square(&glyph, (25.0, 25.0), 50.0);

    glyph.correct_direction(false).unwrap();
    assert!(!glyph.contour(0).unwrap().clockwise().unwrap());
    assert!(glyph.contour(1).unwrap().clockwise().unwrap());

    glyph.correct_direction(true).unwrap();
    assert!(glyph.contour(0).unwrap().clockwise().unwrap());
    assert!(!glyph.contour(1).unwrap().clockwise().unwrap());
}

#[test]
fn test_glyph_layers() {
    let (font, glyph) = font_with_glyph("A");
    draw_square(&glyph, (0.0, 0.0), 100.0);

    let background = glyph.new_layer("background").unwrap();
    assert_eq!(background.layer().unwrap().name(), "background");
    assert!(font.get_layer("background").unwrap().contains("A"));
    assert_eq!(glyph.layers().unwrap().len(), 2);
    assert!(glyph.get_layer("background").unwrap().is_same(&background));

    glyph.remove_layer("background").unwrap();
    assert_eq!(glyph.layers().unwrap().len(), 1);
    assert!(matches!(
        glyph.get_layer("background"),
        Err(Error::NotFound(_))
    ));
}

#[test]
fn test_copy_is_orphan_with_same_data() {
    let (_font, glyph) = font_with_glyph("A");
    draw_square(&glyph, (0.0, 0.0), 100.0);
    glyph.set_width(120.0).unwrap();
    glyph.set_note(Some("checked"));
    glyph.append_anchor(Some("top"), (50.0, 100.0), None).unwrap();

    let copy = glyph.copy().unwrap();
    assert!(copy.layer().is_none());
    assert_eq!(copy.name(), "A");
    assert_eq!(copy.width(), 120.0);
    assert_eq!(copy.note().as_deref(), Some("checked"));
    assert_eq!(copy.len(), 1);
    assert_eq!(copy.anchors().len(), 1);
}

#[test]
fn test_glyph_round() {
    let (_font, glyph) = font_with_glyph("A");
    draw_square(&glyph, (0.4, 0.6), 100.0);
    glyph.set_width(100.5).unwrap();
    glyph.round().unwrap();

    assert_eq!(glyph.width(), 101.0);
    let point = glyph.contour(0).unwrap().point(0).unwrap();
    assert_eq!(point.position(), Point::new(0.0, 1.0));
}

#[test]
fn test_single_point_bounds() {
    let (_font, glyph) = font_with_glyph("A");
    let mut pen = glyph.point_pen();
    pen.begin_path(None).unwrap();
    pen.add_point(&UfoPoint::move_to(100.0, 200.0)).unwrap();
    pen.end_path().unwrap();

    let expected = Some(Rect::new(100.0, 200.0, 100.0, 200.0));
    assert_eq!(glyph.contour(0).unwrap().bounds().unwrap(), expected);
    assert_eq!(glyph.bounds().unwrap(), expected);
}

#[test]
fn test_pen_drops_identifiers_in_use() {
    let (_font, glyph) = font_with_glyph("A");
    let anchor = glyph.append_anchor(Some("top"), (50.0, 100.0), None).unwrap();
    let anchor_id = anchor.generate_identifier().unwrap();

    let mut pen = glyph.point_pen();
    pen.begin_path(Some("outer")).unwrap();
    pen.add_point(&UfoPoint::line_to(0.0, 0.0).with_identifier("outer"))
        .unwrap();
    pen.add_point(&UfoPoint::line_to(0.0, 100.0).with_identifier("corner"))
        .unwrap();
    pen.add_point(&UfoPoint::line_to(100.0, 100.0).with_identifier("corner"))
        .unwrap();
    pen.add_point(&UfoPoint::line_to(100.0, 0.0).with_identifier(anchor_id.as_str()))
        .unwrap();
    pen.end_path().unwrap();
    pen.begin_path(Some("outer")).unwrap();
    pen.add_point(&UfoPoint::line_to(200.0, 0.0).with_identifier("corner"))
        .unwrap();
    pen.end_path().unwrap();
    pen.add_component("B", Affine::IDENTITY, Some("corner"))
        .unwrap();

    let first = glyph.contour(0).unwrap();
    assert_eq!(first.identifier().as_deref(), Some("outer"));
    let point_ids: Vec<Option<String>> = first
        .ufo_points()
        .into_iter()
        .map(|point| point.identifier)
        .collect();
    assert_eq!(point_ids, vec![None, Some("corner".to_string()), None, None]);

    let second = glyph.contour(1).unwrap();
    assert_eq!(second.identifier(), None);
    assert_eq!(second.ufo_points()[0].identifier, None);
    assert_eq!(glyph.component(0).unwrap().identifier(), None);
    assert_eq!(glyph.identifiers().len(), 3);
}

#[test]
fn test_append_glyph_to_itself() {
    let (_font, glyph) = font_with_glyph("A");
    let mut pen = glyph.point_pen();
    pen.begin_path(Some("outer")).unwrap();
    pen.add_point(&UfoPoint::line_to(0.0, 0.0).with_identifier("start"))
        .unwrap();
    pen.add_point(&UfoPoint::line_to(0.0, 100.0)).unwrap();
    pen.add_point(&UfoPoint::line_to(100.0, 100.0)).unwrap();
    pen.end_path().unwrap();
    pen.add_component("B", Affine::IDENTITY, Some("accent"))
        .unwrap();

    glyph
        .append_glyph(&glyph.clone(), Some(Vec2::new(200.0, 0.0)))
        .unwrap();

    assert_eq!(glyph.len(), 2);
    assert_eq!(glyph.components().len(), 2);
    let appended = glyph.contour(1).unwrap();
    assert_ne!(appended.identifier().as_deref(), Some("outer"));
    let start = &appended.ufo_points()[0];
    assert_eq!(start.position(), Point::new(200.0, 0.0));
    assert_ne!(start.identifier.as_deref(), Some("start"));
    assert_ne!(
        glyph.component(1).unwrap().identifier().as_deref(),
        Some("accent")
    );

    let mut seen = Vec::new();
    for contour in glyph.contours() {
        seen.extend(contour.identifier());
        seen.extend(contour.ufo_points().into_iter().filter_map(|point| point.identifier));
    }
    seen.extend(glyph.components().iter().filter_map(|component| component.identifier()));
    let unique = seen.len();
    seen.sort();
    seen.dedup();
    assert_eq!(seen.len(), unique);
}
