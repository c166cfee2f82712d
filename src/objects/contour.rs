//! Contours: ordered, typed points
//!
//! Segment handling (grouping, insertion, removal and choosing the start
//! segment) is built entirely on the point hooks, so environments only need
//! to store points.

use kurbo::{Affine, BezPath, PathEl, Point, Rect, Shape, Vec2};

use super::base::{position_of, BaseObject, Transformation};
use super::glyph::BaseGlyph;
use super::layer::BaseLayer;
use super::pen::PointPen;
use super::point::BasePoint;
use super::segment::Segment;
use super::{Environment, FontOf, GlyphOf, LayerOf, PointOf};
use crate::error::{not_implemented, Error, Result};
use crate::geometry::{PointType, SegmentType, UfoPoint};
use crate::normalizers::{
    normalize_coordinate_tuple, normalize_identifier, normalize_index, normalize_insert_index,
};

/// Environment hooks for a contour
pub trait ContourBackend: BaseObject + Transformation {
    type Env: Environment<Contour = Self>;

    /// A new, empty contour with no parent glyph
    fn raw_new() -> Self;

    fn raw_glyph(&self) -> Option<GlyphOf<Self::Env>>;
    fn raw_set_glyph(&self, glyph: Option<GlyphOf<Self::Env>>);

    fn raw_identifier(&self) -> Option<String>;

    fn raw_generate_identifier(&self) -> Result<String> {
        not_implemented(Self::OBJECT_NAME, "getIdentifier")
    }

    fn raw_generate_identifier_for_point(&self, point: &PointOf<Self::Env>) -> Result<String> {
        let _ = point;
        not_implemented(Self::OBJECT_NAME, "getIdentifierForPoint")
    }

    fn raw_points(&self) -> Vec<PointOf<Self::Env>>;

    /// Insert a point at `index`, which is within `0..=len`.
    fn raw_insert_point(&self, index: usize, point: &UfoPoint) -> Result<PointOf<Self::Env>>;

    fn raw_remove_point(&self, index: usize) -> Result<()>;

    /// A contour is open when it starts with a move.
    fn raw_open(&self) -> bool {
        self.raw_points()
            .first()
            .is_some_and(|point| point.point_type() == PointType::Move)
    }

    fn raw_index(&self) -> Option<usize> {
        let glyph = self.raw_glyph()?;
        position_of(&glyph.contours(), self)
    }

    fn raw_set_index(&self, index: usize) -> Result<()> {
        let _ = index;
        not_implemented(Self::OBJECT_NAME, "index")
    }

    fn raw_reverse(&self) -> Result<()> {
        let reversed = reversed_points(&ufo_points_of(self));
        replace_points(self, &reversed)
    }

    fn raw_clockwise(&self) -> Result<bool> {
        Ok(bez_path(&ufo_points_of(self)).area() < 0.0)
    }

    fn raw_bounds(&self) -> Result<Option<Rect>> {
        Ok(path_bounds(&bez_path(&ufo_points_of(self))))
    }

    fn raw_point_inside(&self, point: Point) -> Result<bool> {
        Ok(bez_path(&ufo_points_of(self)).winding(point) != 0)
    }

    fn raw_round(&self) -> Result<()> {
        for point in self.raw_points() {
            point.round()?;
        }
        Ok(())
    }
}

/// Public contour API
pub trait BaseContour: ContourBackend {
    fn glyph(&self) -> Option<GlyphOf<Self::Env>> {
        self.raw_glyph()
    }

    /// Attach the contour to a glyph. A contour keeps the first glyph it is
    /// given.
    fn set_glyph(&self, glyph: &GlyphOf<Self::Env>) {
        if self.raw_glyph().is_none() {
            self.raw_set_glyph(Some(glyph.clone()));
        }
    }

    fn layer(&self) -> Option<LayerOf<Self::Env>> {
        self.glyph()?.layer()
    }

    fn font(&self) -> Option<FontOf<Self::Env>> {
        self.layer()?.font()
    }

    fn identifier(&self) -> Option<String> {
        self.raw_identifier()
    }

    fn generate_identifier(&self) -> Result<String> {
        match self.raw_identifier() {
            Some(identifier) => Ok(identifier),
            None => normalize_identifier(&self.raw_generate_identifier()?),
        }
    }

    /// Identifier for one of this contour's points, generating one if needed.
    fn generate_identifier_for_point(&self, point: &PointOf<Self::Env>) -> Result<String> {
        if position_of(&self.raw_points(), point).is_none() {
            return Err(Error::not_found("The point is not part of this contour."));
        }
        match point.identifier() {
            Some(identifier) => Ok(identifier),
            None => normalize_identifier(&self.raw_generate_identifier_for_point(point)?),
        }
    }

    fn index(&self) -> Option<usize> {
        self.raw_index()
    }

    /// Move the contour to another position in its glyph.
    fn set_index(&self, index: isize) -> Result<()> {
        let glyph = self
            .glyph()
            .ok_or_else(|| Error::Orphan("The contour does not belong to a glyph.".into()))?;
        let count = glyph.contours().len();
        let index = normalize_index(index, count, "contour")?;
        if Some(index) == self.index() {
            return Ok(());
        }
        self.raw_set_index(index)?;
        self.changed();
        Ok(())
    }

    fn open(&self) -> bool {
        self.raw_open()
    }

    fn clockwise(&self) -> Result<bool> {
        self.raw_clockwise()
    }

    fn set_clockwise(&self, value: bool) -> Result<()> {
        if self.clockwise()? != value {
            self.reverse()?;
        }
        Ok(())
    }

    fn reverse(&self) -> Result<()> {
        self.raw_reverse()?;
        self.changed();
        Ok(())
    }

    fn bounds(&self) -> Result<Option<Rect>> {
        self.raw_bounds()
    }

    /// Whether `point` is in the black of the contour, by non-zero winding.
    fn point_inside(&self, point: impl Into<Point>) -> Result<bool> {
        let point = normalize_coordinate_tuple(point)?;
        self.raw_point_inside(point)
    }

    // --------
    // Segments
    // --------

    fn segments(&self) -> Vec<Segment<Self::Env>> {
        group_segments(&self.raw_points())
            .into_iter()
            .map(|points| Segment::in_contour(points, self.clone()))
            .collect()
    }

    /// Number of segments
    fn len(&self) -> usize {
        self.segments().len()
    }

    fn is_empty(&self) -> bool {
        self.raw_points().is_empty()
    }

    fn segment(&self, index: isize) -> Result<Segment<Self::Env>> {
        let mut segments = self.segments();
        let index = normalize_index(index, segments.len(), "segment")?;
        Ok(segments.swap_remove(index))
    }

    fn append_segment(
        &self,
        segment_type: SegmentType,
        points: &[Point],
        smooth: bool,
    ) -> Result<()> {
        let index = self.segments().len() as isize;
        self.insert_segment(index, segment_type, points, smooth)
    }

    /// Insert a segment made of `points`, the last of which is on-curve.
    fn insert_segment(
        &self,
        index: isize,
        segment_type: SegmentType,
        points: &[Point],
        smooth: bool,
    ) -> Result<()> {
        let points = points
            .iter()
            .map(|point| normalize_coordinate_tuple(*point))
            .collect::<Result<Vec<_>>>()?;
        let (on_curve, off_curves) = points
            .split_last()
            .ok_or_else(|| Error::invalid("Segments must contain at least one point."))?;
        let segments = self.segments();
        let mut index = normalize_insert_index(index, segments.len());
        let mut extra = 1;
        if self.open() {
            index += 1;
            extra = 0;
        }
        let point_index = segments
            .iter()
            .take(index)
            .map(|segment| segment.len())
            .sum::<usize>()
            + extra;
        let point_index = point_index.min(self.raw_points().len()) as isize;
        self.insert_point(
            point_index,
            UfoPoint::new(on_curve.x, on_curve.y, segment_type.point_type()).with_smooth(smooth),
        )?;
        for off_curve in off_curves.iter().rev() {
            self.insert_point(point_index, UfoPoint::off_curve(off_curve.x, off_curve.y))?;
        }
        Ok(())
    }

    fn remove_segment(&self, index: isize) -> Result<()> {
        let segment = self.segment(index)?;
        for point in segment.points() {
            self.remove_point(point)?;
        }
        Ok(())
    }

    /// Rotate the points so the segment at `index` comes first.
    fn set_start_segment(&self, index: isize) -> Result<()> {
        let mut segments = self.segments();
        if segments.len() < 2 {
            return Ok(());
        }
        let mut index = normalize_index(index, segments.len(), "segment")?;
        if index == 0 {
            return Ok(());
        }
        let old_start = segments[segments.len() - 1].clone();
        let old_last = segments[0].clone();
        // a curve ending on top of the start point makes the start redundant
        if old_last.segment_type()?.has_off_curves() {
            if let (Some(start_on), Some(last_on)) = (old_start.on_curve(), old_last.on_curve()) {
                if start_on.position() == last_on.position() {
                    self.remove_segment(0)?;
                    index -= 1;
                    segments = self.segments();
                }
            }
        }
        if segments[0].segment_type()? == SegmentType::Move {
            if let Some(on_curve) = segments[0].on_curve() {
                on_curve.set_point_type(PointType::Line);
            }
        }
        let pivot = (index + segments.len() - 1) % segments.len();
        let reordered: Vec<UfoPoint> = segments[pivot..]
            .iter()
            .chain(segments[..pivot].iter())
            .flat_map(|segment| segment.points().to_vec())
            .map(|point| ufo_point(&point))
            .collect();
        replace_points(self, &reordered)?;
        self.changed();
        Ok(())
    }

    // ------
    // Points
    // ------

    fn points(&self) -> Vec<PointOf<Self::Env>> {
        let points = self.raw_points();
        for point in &points {
            point.set_contour(self);
        }
        points
    }

    fn len_points(&self) -> usize {
        self.raw_points().len()
    }

    fn point(&self, index: isize) -> Result<PointOf<Self::Env>> {
        let mut points = self.points();
        let index = normalize_index(index, points.len(), "point")?;
        Ok(points.swap_remove(index))
    }

    fn append_point(&self, point: UfoPoint) -> Result<PointOf<Self::Env>> {
        let index = self.raw_points().len() as isize;
        self.insert_point(index, point)
    }

    fn insert_point(&self, index: isize, point: UfoPoint) -> Result<PointOf<Self::Env>> {
        let position = normalize_coordinate_tuple(point.position())?;
        let identifier = point
            .identifier
            .as_deref()
            .map(normalize_identifier)
            .transpose()?;
        let point = UfoPoint {
            x: position.x,
            y: position.y,
            identifier,
            ..point
        };
        let index = normalize_insert_index(index, self.raw_points().len());
        let inserted = self.raw_insert_point(index, &point)?;
        inserted.set_contour(self);
        self.changed();
        Ok(inserted)
    }

    fn remove_point(&self, point: &PointOf<Self::Env>) -> Result<()> {
        let index = position_of(&self.raw_points(), point)
            .ok_or_else(|| Error::not_found("The point could not be found in the contour."))?;
        self.raw_remove_point(index)?;
        self.changed();
        Ok(())
    }

    fn remove_point_at(&self, index: isize) -> Result<()> {
        let index = normalize_index(index, self.raw_points().len(), "point")?;
        self.raw_remove_point(index)?;
        self.changed();
        Ok(())
    }

    // -------
    // Drawing
    // -------

    fn ufo_points(&self) -> Vec<UfoPoint> {
        ufo_points_of(self)
    }

    fn draw_points(&self, pen: &mut impl PointPen) -> Result<()> {
        pen.begin_path(self.identifier().as_deref())?;
        for point in self.ufo_points() {
            pen.add_point(&point)?;
        }
        pen.end_path()
    }

    fn to_bez_path(&self) -> BezPath {
        bez_path(&self.ufo_points())
    }

    // ----
    // Misc
    // ----

    fn round(&self) -> Result<()> {
        self.raw_round()?;
        self.changed();
        Ok(())
    }

    /// Contours are compatible when they are both open or both closed and
    /// their segments line up.
    fn is_compatible(&self, other: &Self) -> Result<(bool, String)> {
        let mut compatible = true;
        let mut report = Vec::new();
        if self.open() != other.open() {
            report.push("[Fatal] The contours are not both open or both closed.".to_string());
            compatible = false;
        }
        let ours = self.segments();
        let theirs = other.segments();
        if ours.len() != theirs.len() {
            report.push("[Fatal] The contours do not contain the same number of segments.".into());
            compatible = false;
        }
        for (index, (a, b)) in ours.iter().zip(&theirs).enumerate() {
            if a.segment_type()? != b.segment_type()? {
                report.push(format!("[Fatal] Segment {index} is not the same type."));
                compatible = false;
            }
        }
        Ok((compatible, report.join("\n")))
    }

    /// An orphan copy of the contour and its points
    fn copy(&self) -> Result<Self> {
        let copy = Self::raw_new();
        for (index, point) in self.ufo_points().iter().enumerate() {
            copy.raw_insert_point(index, point)?;
        }
        Ok(copy)
    }
}

impl<T: ContourBackend> BaseContour for T {}

pub(crate) fn ufo_point<P: BasePoint>(point: &P) -> UfoPoint {
    UfoPoint {
        x: point.x(),
        y: point.y(),
        point_type: point.point_type(),
        smooth: point.smooth(),
        name: point.name(),
        identifier: point.identifier(),
    }
}

fn ufo_points_of<C: ContourBackend>(contour: &C) -> Vec<UfoPoint> {
    contour.raw_points().iter().map(ufo_point).collect()
}

fn replace_points<C: ContourBackend>(contour: &C, points: &[UfoPoint]) -> Result<()> {
    for index in (0..contour.raw_points().len()).rev() {
        contour.raw_remove_point(index)?;
    }
    for (index, point) in points.iter().enumerate() {
        let inserted = contour.raw_insert_point(index, point)?;
        inserted.set_contour(contour);
    }
    Ok(())
}

/// Transformation fallback for contours: transform every point.
pub fn transform_contour_points<C: ContourBackend>(
    contour: &C,
    matrix: Affine,
    origin: Point,
    origin_offset: Vec2,
) -> Result<()> {
    for point in contour.raw_points() {
        point.raw_transform_by(matrix, origin, origin_offset)?;
    }
    Ok(())
}

/// Group points into segments.
///
/// Every on-curve point closes a segment. In a closed contour, trailing
/// off-curves belong to the first segment, and the first segment is moved to
/// the end so the segment list starts after the contour's start point.
pub fn group_segments<T: Clone + BasePoint>(points: &[T]) -> Vec<Vec<T>> {
    let Some(first) = points.first() else {
        return Vec::new();
    };
    let first_is_move = first.point_type() == PointType::Move;
    let mut segments: Vec<Vec<T>> = vec![Vec::new()];
    let mut last_was_off_curve = false;
    for point in points {
        if let Some(segment) = segments.last_mut() {
            segment.push(point.clone());
        }
        let off_curve = point.point_type() == PointType::OffCurve;
        if !off_curve {
            segments.push(Vec::new());
        }
        last_was_off_curve = off_curve;
    }
    if segments.last().is_some_and(|segment| segment.is_empty()) {
        segments.pop();
    }
    if last_was_off_curve && first_is_move {
        // trailing off-curves of an open contour lead nowhere
        segments.pop();
    } else if last_was_off_curve && segments.len() > 1 {
        let mut trailing = segments.pop().unwrap_or_default();
        trailing.extend(segments.remove(0));
        segments.push(trailing);
    } else if !last_was_off_curve && !first_is_move {
        let first_segment = segments.remove(0);
        segments.push(first_segment);
    }
    segments
}

/// Reverse the direction of a contour's points.
///
/// Segment types stay attached to the segments they describe, so each
/// on-curve point takes the type of the segment that used to start at it.
pub fn reversed_points(points: &[UfoPoint]) -> Vec<UfoPoint> {
    let mut points = points.to_vec();
    if points.is_empty() {
        return points;
    }
    let closed = points[0].point_type != PointType::Move;
    let mut last_segment_type = if closed {
        let first = points.remove(0);
        points.push(first);
        points
            .iter()
            .find(|point| point.point_type.is_on_curve())
            .map(|point| point.point_type)
    } else {
        Some(PointType::Move)
    };
    points.reverse();
    if !closed {
        let leading = points
            .iter()
            .take_while(|point| !point.point_type.is_on_curve())
            .count();
        points.drain(..leading);
    }
    for point in points.iter_mut() {
        if point.point_type.is_on_curve() {
            let next = point.point_type;
            if let Some(segment_type) = last_segment_type {
                point.point_type = segment_type;
            }
            last_segment_type = Some(next);
        }
    }
    points
}

/// Outline of UFO points as a kurbo path
pub fn bez_path(points: &[UfoPoint]) -> BezPath {
    let mut path = BezPath::new();
    if points.is_empty() {
        return path;
    }
    let closed = points[0].point_type != PointType::Move;
    let Some(start) = points.iter().position(|point| point.point_type.is_on_curve()) else {
        return quadratic_loop(points);
    };
    // closed contours start drawing from their first on-curve point
    let mut ordered: Vec<&UfoPoint> = points[start..].iter().chain(points[..start].iter()).collect();
    if closed {
        ordered.push(ordered[0]);
    }
    path.move_to(ordered[0].position());
    let mut pending: Vec<Point> = Vec::new();
    for point in &ordered[1..] {
        let pt = point.position();
        match point.point_type {
            PointType::OffCurve => pending.push(pt),
            PointType::Move | PointType::Line => path.line_to(pt),
            PointType::Curve => {
                match pending.len() {
                    0 => path.line_to(pt),
                    1 => path.quad_to(pending[0], pt),
                    n => path.curve_to(pending[n - 2], pending[n - 1], pt),
                }
                pending.clear();
            }
            PointType::QCurve => {
                append_quadratic(&mut path, &pending, pt);
                pending.clear();
            }
        }
    }
    if closed {
        path.close_path();
    }
    path
}

/// Bounds of an outline, or `None` when it has no points.
///
/// Lone move points count toward the bounds; `BezPath::bounding_box` only
/// looks at drawn segments.
pub fn path_bounds(path: &BezPath) -> Option<Rect> {
    let moves = path.elements().iter().filter_map(|element| match element {
        PathEl::MoveTo(point) => Some(Rect::from_points(*point, *point)),
        _ => None,
    });
    let segments = path
        .segments()
        .map(|segment| kurbo::ParamCurveExtrema::bounding_box(&segment));
    moves.chain(segments).reduce(|bounds, rect| bounds.union(rect))
}

/// Quadratic off-curve runs have implied on-curve points halfway between
/// consecutive off-curves.
fn append_quadratic(path: &mut BezPath, off_curves: &[Point], end: Point) {
    if off_curves.is_empty() {
        path.line_to(end);
        return;
    }
    for (i, control) in off_curves.iter().enumerate() {
        let target = match off_curves.get(i + 1) {
            Some(next) => control.midpoint(*next),
            None => end,
        };
        path.quad_to(*control, target);
    }
}

/// A closed TrueType contour with no on-curve points at all
fn quadratic_loop(points: &[UfoPoint]) -> BezPath {
    let mut path = BezPath::new();
    let controls: Vec<Point> = points.iter().map(UfoPoint::position).collect();
    let (Some(first), Some(last)) = (controls.first(), controls.last()) else {
        return path;
    };
    let start = last.midpoint(*first);
    path.move_to(start);
    let mut wrapped = controls.clone();
    wrapped.push(start);
    let (end, off_curves) = match wrapped.split_last() {
        Some((end, off_curves)) => (*end, off_curves),
        None => return path,
    };
    append_quadratic(&mut path, off_curves, end);
    path.close_path();
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    fn types(points: &[UfoPoint]) -> Vec<PointType> {
        points.iter().map(|point| point.point_type).collect()
    }

    #[test]
    fn test_reverse_closed_contour_keeps_segment_types() {
        let points = vec![
            UfoPoint::line_to(0.0, 0.0),
            UfoPoint::line_to(0.0, 100.0),
            UfoPoint::off_curve(50.0, 150.0),
            UfoPoint::off_curve(100.0, 150.0),
            UfoPoint::curve_to(100.0, 100.0),
        ];
        let reversed = reversed_points(&points);
        let positions: Vec<(f64, f64)> = reversed.iter().map(|p| (p.x, p.y)).collect();
        assert_eq!(
            positions,
            vec![(0.0, 0.0), (100.0, 100.0), (100.0, 150.0), (50.0, 150.0), (0.0, 100.0)]
        );
        assert_eq!(
            types(&reversed),
            vec![
                PointType::Line,
                PointType::Line,
                PointType::OffCurve,
                PointType::OffCurve,
                PointType::Curve,
            ]
        );
    }

    #[test]
    fn test_reverse_open_contour() {
        let points = vec![
            UfoPoint::move_to(0.0, 0.0),
            UfoPoint::line_to(100.0, 0.0),
            UfoPoint::line_to(100.0, 100.0),
        ];
        let reversed = reversed_points(&points);
        assert_eq!(reversed[0].position(), Point::new(100.0, 100.0));
        assert_eq!(
            types(&reversed),
            vec![PointType::Move, PointType::Line, PointType::Line]
        );
    }

    #[test]
    fn test_square_path_area_and_bounds() {
        let points = vec![
            UfoPoint::line_to(0.0, 0.0),
            UfoPoint::line_to(0.0, 100.0),
            UfoPoint::line_to(100.0, 100.0),
            UfoPoint::line_to(100.0, 0.0),
        ];
        let path = bez_path(&points);
        // drawn clockwise in a y-up system
        assert!(path.area() < 0.0);
        assert_eq!(path.bounding_box(), Rect::new(0.0, 0.0, 100.0, 100.0));
        assert_ne!(path.winding(Point::new(50.0, 50.0)), 0);
        assert_eq!(path.winding(Point::new(150.0, 50.0)), 0);
    }

    #[test]
    fn test_path_bounds_count_single_points() {
        let single = bez_path(&[UfoPoint::move_to(100.0, 200.0)]);
        assert_eq!(
            path_bounds(&single),
            Some(Rect::new(100.0, 200.0, 100.0, 200.0))
        );

        let mut path = bez_path(&[
            UfoPoint::move_to(0.0, 0.0),
            UfoPoint::line_to(50.0, 10.0),
        ]);
        let lone = bez_path(&[UfoPoint::move_to(-20.0, 300.0)]);
        path.extend(lone.elements().iter().copied());
        assert_eq!(path_bounds(&path), Some(Rect::new(-20.0, 0.0, 50.0, 300.0)));
        assert_eq!(path_bounds(&BezPath::new()), None);
    }

    #[test]
    fn test_quadratic_loop_has_implied_points() {
        let points = vec![
            UfoPoint::off_curve(0.0, 0.0),
            UfoPoint::off_curve(0.0, 100.0),
            UfoPoint::off_curve(100.0, 100.0),
            UfoPoint::off_curve(100.0, 0.0),
        ];
        let path = bez_path(&points);
        assert!(path.winding(Point::new(50.0, 50.0)) != 0);
    }
}
