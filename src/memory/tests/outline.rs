//! Points, segments and contours

use super::*;

#[test]
fn test_point_parents_reach_the_font() {
    let (font, glyph) = font_with_glyph("A");
    draw_square(&glyph, (0.0, 0.0), 100.0);

    let contour = glyph.contour(0).unwrap();
    let point = contour.point(-1).unwrap();
    assert!(point.contour().unwrap().is_same(&contour));
    assert!(point.glyph().unwrap().is_same(&glyph));
    assert!(point.layer().unwrap().is_same(&font.default_layer().unwrap()));
    assert!(point.font().unwrap().is_same(&font));
    assert_eq!(point.index(), Some(3));
    assert_eq!(point.position(), Point::new(100.0, 0.0));
}

#[test]
fn test_point_setters_and_round() {
    let (_font, glyph) = font_with_glyph("A");
    draw_square(&glyph, (0.0, 0.0), 100.0);
    let point = glyph.contour(0).unwrap().point(0).unwrap();

    point.set_position((10.4, -3.5)).unwrap();
    point.set_name(Some("corner")).unwrap();
    point.round().unwrap();
    assert_eq!(point.position(), Point::new(10.0, -3.0));
    assert_eq!(point.name().as_deref(), Some("corner"));

    point.set_name(None).unwrap();
    assert_eq!(point.name(), None);
}

#[test]
fn test_point_identifier_is_stable() {
    let (_font, glyph) = font_with_glyph("A");
    draw_square(&glyph, (0.0, 0.0), 100.0);
    let point = glyph.contour(0).unwrap().point(1).unwrap();
    assert_eq!(point.identifier(), None);

    let identifier = point.generate_identifier().unwrap();
    assert_eq!(point.identifier(), Some(identifier.clone()));
    assert_eq!(point.generate_identifier().unwrap(), identifier);
}

#[test]
fn test_point_move_and_scale() {
    let (_font, glyph) = font_with_glyph("A");
    draw_square(&glyph, (0.0, 0.0), 100.0);
    let point = glyph.contour(0).unwrap().point(2).unwrap();

    point.move_by((5.0, -5.0)).unwrap();
    assert_eq!(point.position(), Point::new(105.0, 95.0));

    point.scale_by(2.0, None).unwrap();
    assert_eq!(point.position(), Point::new(210.0, 190.0));
}

#[test]
fn test_closed_square_segments() {
    let (_font, glyph) = font_with_glyph("A");
    draw_square(&glyph, (0.0, 0.0), 100.0);
    let contour = glyph.contour(0).unwrap();

    assert!(!contour.open());
    assert_eq!(contour.len(), 4);
    for segment in contour.segments() {
        assert_eq!(segment.segment_type().unwrap(), SegmentType::Line);
        assert_eq!(segment.len(), 1);
    }
}

#[test]
fn test_segment_becomes_curve_and_back() {
    let (_font, glyph) = font_with_glyph("A");
    draw_square(&glyph, (0.0, 0.0), 100.0);
    let contour = glyph.contour(0).unwrap();

    let mut segment = contour.segment(1).unwrap();
    segment.set_segment_type(SegmentType::Curve).unwrap();
    assert_eq!(contour.len_points(), 6);
    assert_eq!(segment.len(), 3);
    assert_eq!(
        segment.positions(),
        vec![
            Point::new(0.0, 100.0),
            Point::new(100.0, 100.0),
            Point::new(100.0, 100.0)
        ]
    );

    let mut segment = contour.segment(1).unwrap();
    segment.set_segment_type(SegmentType::Line).unwrap();
    assert_eq!(contour.len_points(), 4);
    assert_eq!(contour.point(2).unwrap().point_type(), PointType::Line);
}

#[test]
fn test_append_and_remove_segment() {
    let (_font, glyph) = font_with_glyph("A");
    draw_square(&glyph, (0.0, 0.0), 100.0);
    let contour = glyph.contour(0).unwrap();

    contour
        .append_segment(
            SegmentType::Curve,
            &[
                Point::new(100.0, -20.0),
                Point::new(20.0, -20.0),
                Point::new(0.0, 0.0),
            ],
            true,
        )
        .unwrap();
    assert_eq!(contour.len(), 5);
    let curve = contour.segment(3).unwrap();
    assert_eq!(curve.segment_type().unwrap(), SegmentType::Curve);
    assert!(curve.smooth());
    assert_eq!(contour.len_points(), 7);

    contour.remove_segment(3).unwrap();
    assert_eq!(contour.len(), 4);
    assert_eq!(contour.len_points(), 4);
}

#[test]
fn test_set_start_segment_rotates_points() {
    let (_font, glyph) = font_with_glyph("A");
    draw_square(&glyph, (0.0, 0.0), 100.0);
    let contour = glyph.contour(0).unwrap();

    contour.set_start_segment(2).unwrap();
    let first = contour.segment(0).unwrap().on_curve().unwrap();
    assert_eq!(first.position(), Point::new(100.0, 0.0));
    assert_eq!(contour.len(), 4);
}

#[test]
fn test_contour_direction() {
    let (_font, glyph) = font_with_glyph("A");
    draw_square(&glyph, (0.0, 0.0), 100.0);
    let contour = glyph.contour(0).unwrap();

    assert!(contour.clockwise().unwrap());
    contour.set_clockwise(false).unwrap();
    assert!(!contour.clockwise().unwrap());
    assert_eq!(contour.len_points(), 4);
}

#[test]
fn test_contour_bounds_and_point_inside() {
    let (_font, glyph) = font_with_glyph("A");
    draw_square(&glyph, (10.0, 20.0), 100.0);
    let contour = glyph.contour(0).unwrap();

    let bounds = contour.bounds().unwrap().unwrap();
    assert_eq!((bounds.x0, bounds.y0, bounds.x1, bounds.y1), (10.0, 20.0, 110.0, 120.0));
    assert!(contour.point_inside((50.0, 50.0)).unwrap());
    assert!(!contour.point_inside((0.0, 0.0)).unwrap());
}

#[test]
fn test_contour_index_moves_within_glyph() {
    let (_font, glyph) = font_with_glyph("A");
    draw_square(&glyph, (0.0, 0.0), 100.0);
    draw_square(&glyph, (200.0, 0.0), 50.0);
    let second = glyph.contour(1).unwrap();

    second.set_index(0).unwrap();
    assert_eq!(second.index(), Some(0));
    assert!(glyph.contour(0).unwrap().is_same(&second));
}

#[test]
fn test_remove_point_detaches_it() {
    let (_font, glyph) = font_with_glyph("A");
    draw_square(&glyph, (0.0, 0.0), 100.0);
    let contour = glyph.contour(0).unwrap();
    let point = contour.point(0).unwrap();

    contour.remove_point(&point).unwrap();
    assert_eq!(contour.len_points(), 3);
    assert!(point.contour().is_none());
    assert!(matches!(contour.remove_point(&point), Err(Error::NotFound(_))));
}

#[test]
fn test_contour_compatibility() {
    let (_font, glyph) = font_with_glyph("A");
    draw_square(&glyph, (0.0, 0.0), 100.0);
    draw_square(&glyph, (0.0, 0.0), 40.0);
    let (first, second) = (glyph.contour(0).unwrap(), glyph.contour(1).unwrap());
    assert!(first.is_compatible(&second).unwrap().0);

    second.segment(0).unwrap().set_segment_type(SegmentType::Curve).unwrap();
    let (compatible, report) = first.is_compatible(&second).unwrap();
    assert!(!compatible);
    assert!(report.contains("[Fatal]"));
}

#[test]
fn test_contour_copy_is_orphan() {
    let (_font, glyph) = font_with_glyph("A");
    draw_square(&glyph, (0.0, 0.0), 100.0);
    let copy = glyph.contour(0).unwrap().copy().unwrap();

    assert!(copy.glyph().is_none());
    assert_eq!(copy.len_points(), 4);
    assert_eq!(glyph.len(), 1);
}
