//! Segments: on-curve points with their leading off-curve points
//!
//! Segments are not stored anywhere. A contour builds them from its points
//! on request, so a segment is a view of points that belong to a contour.

use std::fmt;

use kurbo::{Affine, Point, Vec2};

use super::base::{BaseObject, Transformation};
use super::contour::BaseContour;
use super::glyph::BaseGlyph;
use super::layer::BaseLayer;
use super::point::BasePoint;
use super::{ContourOf, Environment, FontOf, GlyphOf, LayerOf, PointOf};
use crate::error::{Error, Result};
use crate::geometry::{PointType, SegmentType, UfoPoint};
use crate::normalizers::normalize_index;

pub struct Segment<E: Environment> {
    points: Vec<PointOf<E>>,
    contour: Option<ContourOf<E>>,
}

impl<E: Environment> Segment<E> {
    /// A segment that is not part of any contour
    pub fn new(points: Vec<PointOf<E>>) -> Self {
        Self {
            points,
            contour: None,
        }
    }

    pub(crate) fn in_contour(points: Vec<PointOf<E>>, contour: ContourOf<E>) -> Self {
        Self {
            points,
            contour: Some(contour),
        }
    }

    pub fn contour(&self) -> Option<ContourOf<E>> {
        self.contour.clone()
    }

    pub fn glyph(&self) -> Option<GlyphOf<E>> {
        self.contour.as_ref()?.glyph()
    }

    pub fn layer(&self) -> Option<LayerOf<E>> {
        self.glyph()?.layer()
    }

    pub fn font(&self) -> Option<FontOf<E>> {
        self.layer()?.font()
    }

    /// Index within the parent contour's segments
    pub fn index(&self) -> Option<usize> {
        let contour = self.contour.as_ref()?;
        contour
            .segments()
            .iter()
            .position(|segment| segment == self)
    }

    pub fn points(&self) -> &[PointOf<E>] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn point(&self, index: isize) -> Result<PointOf<E>> {
        let index = normalize_index(index, self.points.len(), "point")?;
        Ok(self.points[index].clone())
    }

    pub fn on_curve(&self) -> Option<PointOf<E>> {
        self.points.last().cloned()
    }

    pub fn off_curve(&self) -> Vec<PointOf<E>> {
        match self.points.split_last() {
            Some((_, off_curves)) => off_curves.to_vec(),
            None => Vec::new(),
        }
    }

    pub fn segment_type(&self) -> Result<SegmentType> {
        let on_curve = self
            .on_curve()
            .ok_or_else(|| Error::invalid("The segment has no points."))?;
        SegmentType::try_from(on_curve.point_type())
    }

    /// Change the segment type, adding or removing off-curve points.
    ///
    /// Turning a move or line into a curve inserts two off-curve points, one
    /// on the previous on-curve point and one on this segment's on-curve
    /// point. Turning a curve into a move or line removes the off-curves.
    /// Between curve and qcurve, and between move and line, only the type of
    /// the on-curve point changes.
    pub fn set_segment_type(&mut self, value: SegmentType) -> Result<()> {
        let old = self.segment_type()?;
        if old == value {
            return Ok(());
        }
        let contour = self
            .contour
            .clone()
            .ok_or_else(|| Error::Orphan("The segment does not belong to a contour.".into()))?;
        let on_curve = self
            .on_curve()
            .ok_or_else(|| Error::invalid("The segment has no points."))?;
        if !value.has_off_curves() {
            for point in self.off_curve() {
                contour.remove_point(&point)?;
            }
            self.points = vec![on_curve.clone()];
        } else if !old.has_off_curves() {
            let segments = contour.segments();
            let index = segments
                .iter()
                .position(|segment| segment == &*self)
                .ok_or_else(|| Error::not_found("The segment is not in its contour."))?;
            let previous_index = if index == 0 {
                segments.len() - 1
            } else {
                index - 1
            };
            let previous = segments[previous_index]
                .on_curve()
                .ok_or_else(|| Error::invalid("The previous segment has no points."))?;
            let point_index = on_curve
                .index()
                .ok_or_else(|| Error::not_found("The on-curve point is not in the contour."))?
                as isize;
            let off2 = contour.insert_point(
                point_index,
                UfoPoint::off_curve(on_curve.x(), on_curve.y()),
            )?;
            let off1 = contour.insert_point(
                point_index,
                UfoPoint::off_curve(previous.x(), previous.y()),
            )?;
            self.points = vec![off1, off2, on_curve.clone()];
        }
        on_curve.set_point_type(value.point_type());
        Ok(())
    }

    pub fn smooth(&self) -> bool {
        self.on_curve().is_some_and(|point| point.smooth())
    }

    pub fn set_smooth(&self, value: bool) {
        if let Some(point) = self.on_curve() {
            point.set_smooth(value);
        }
    }

    pub fn round(&self) -> Result<()> {
        for point in &self.points {
            point.round()?;
        }
        Ok(())
    }

    /// Segments interpolate when they have the same type.
    pub fn is_compatible(&self, other: &Self) -> Result<(bool, String)> {
        if self.segment_type()? != other.segment_type()? {
            return Ok((false, "[Fatal] The segments are not the same type.".into()));
        }
        if self.points.len() != other.points.len() {
            return Ok((
                false,
                "[Fatal] The segments do not contain the same number of points.".into(),
            ));
        }
        Ok((true, String::new()))
    }

    pub fn positions(&self) -> Vec<Point> {
        self.points.iter().map(|point| point.position()).collect()
    }
}

impl<E: Environment> Transformation for Segment<E> {
    fn raw_transform_by(&self, matrix: Affine, origin: Point, origin_offset: Vec2) -> Result<()> {
        for point in &self.points {
            point.raw_transform_by(matrix, origin, origin_offset)?;
        }
        Ok(())
    }
}

impl<E: Environment> Clone for Segment<E> {
    fn clone(&self) -> Self {
        Self {
            points: self.points.clone(),
            contour: self.contour.clone(),
        }
    }
}

/// Segments are equal when they hold the same points.
impl<E: Environment> PartialEq for Segment<E> {
    fn eq(&self, other: &Self) -> bool {
        self.points.len() == other.points.len()
            && self
                .points
                .iter()
                .zip(&other.points)
                .all(|(a, b)| a.is_same(b))
    }
}

impl<E: Environment> fmt::Debug for Segment<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = self
            .on_curve()
            .map(|point| point.point_type())
            .unwrap_or(PointType::OffCurve);
        f.debug_struct("Segment")
            .field("type", &kind)
            .field("points", &self.positions())
            .finish()
    }
}
