//! Plain-data glyph snapshots for arithmetic and interpolation
//!
//! A [`MathGlyph`] holds everything that takes part in glyph math. Contours
//! must line up point for point. Components, anchors and guidelines are
//! paired by name, and anything without a partner is dropped from the result.

use kurbo::{Affine, Point};
use serde_json::{Map, Value};

use super::pen::{PathBuffer, PointPen};
use crate::error::{Error, Result};
use crate::geometry::{round_value, Color, UfoPoint};

#[derive(Clone, Debug, PartialEq)]
pub struct MathContour {
    pub identifier: Option<String>,
    pub points: Vec<UfoPoint>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MathComponent {
    pub base_glyph: String,
    pub transformation: Affine,
    pub identifier: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MathAnchor {
    pub x: f64,
    pub y: f64,
    pub name: Option<String>,
    pub color: Option<Color>,
    pub identifier: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MathGuideline {
    pub x: f64,
    pub y: f64,
    pub angle: f64,
    pub name: Option<String>,
    pub color: Option<Color>,
    pub identifier: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MathGlyph {
    pub name: String,
    pub unicodes: Vec<u32>,
    pub width: f64,
    pub height: f64,
    pub note: Option<String>,
    pub lib: Map<String, Value>,
    pub contours: Vec<MathContour>,
    pub components: Vec<MathComponent>,
    pub anchors: Vec<MathAnchor>,
    pub guidelines: Vec<MathGuideline>,
}

/// Which factor of a per-axis pair applies to a value
#[derive(Clone, Copy)]
enum Axis {
    X,
    Y,
}

fn pick(factor: (f64, f64), axis: Axis) -> f64 {
    match axis {
        Axis::X => factor.0,
        Axis::Y => factor.1,
    }
}

/// Pair items by key, in order of appearance. The n-th item with a key is
/// paired with the n-th item with the same key on the other side.
fn pair_by_key<'a, T, K: PartialEq>(
    ours: &'a [T],
    theirs: &'a [T],
    key: impl Fn(&T) -> K,
) -> Vec<(&'a T, &'a T)> {
    let mut used = vec![false; theirs.len()];
    let mut pairs = Vec::new();
    for item in ours {
        let wanted = key(item);
        if let Some(index) = theirs
            .iter()
            .enumerate()
            .position(|(index, other)| !used[index] && key(other) == wanted)
        {
            used[index] = true;
            pairs.push((item, &theirs[index]));
        }
    }
    pairs
}

impl MathGlyph {
    pub fn point_pen(&mut self) -> MathGlyphPen<'_> {
        MathGlyphPen {
            glyph: self,
            buffer: PathBuffer::default(),
        }
    }

    pub fn draw_points(&self, pen: &mut impl PointPen) -> Result<()> {
        for contour in &self.contours {
            pen.begin_path(contour.identifier.as_deref())?;
            for point in &contour.points {
                pen.add_point(point)?;
            }
            pen.end_path()?;
        }
        for component in &self.components {
            pen.add_component(
                &component.base_glyph,
                component.transformation,
                component.identifier.as_deref(),
            )?;
        }
        Ok(())
    }

    /// Combine two glyphs value by value. `op` receives our value, theirs
    /// and the axis the value belongs to.
    fn combine(&self, other: &MathGlyph, op: impl Fn(f64, f64, Axis) -> f64) -> Result<MathGlyph> {
        if self.contours.len() != other.contours.len() {
            return Err(Error::Incompatible(format!(
                "'{}' has {} contours, '{}' has {}.",
                self.name,
                self.contours.len(),
                other.name,
                other.contours.len()
            )));
        }
        let mut contours = Vec::with_capacity(self.contours.len());
        for (index, (ours, theirs)) in self.contours.iter().zip(&other.contours).enumerate() {
            if ours.points.len() != theirs.points.len() {
                return Err(Error::Incompatible(format!(
                    "Contour {index} has {} points in '{}' and {} in '{}'.",
                    ours.points.len(),
                    self.name,
                    theirs.points.len(),
                    other.name
                )));
            }
            let points = ours
                .points
                .iter()
                .zip(&theirs.points)
                .map(|(a, b)| UfoPoint {
                    x: op(a.x, b.x, Axis::X),
                    y: op(a.y, b.y, Axis::Y),
                    ..a.clone()
                })
                .collect();
            contours.push(MathContour {
                identifier: ours.identifier.clone(),
                points,
            });
        }
        let components = pair_by_key(&self.components, &other.components, |c| {
            c.base_glyph.clone()
        })
        .into_iter()
        .map(|(a, b)| {
            let (ca, cb) = (a.transformation.as_coeffs(), b.transformation.as_coeffs());
            let axes = [Axis::X, Axis::Y, Axis::X, Axis::Y, Axis::X, Axis::Y];
            let mut coeffs = [0.0; 6];
            for i in 0..6 {
                coeffs[i] = op(ca[i], cb[i], axes[i]);
            }
            MathComponent {
                transformation: Affine::new(coeffs),
                ..a.clone()
            }
        })
        .collect();
        let anchors = pair_by_key(&self.anchors, &other.anchors, |a| a.name.clone())
            .into_iter()
            .map(|(a, b)| MathAnchor {
                x: op(a.x, b.x, Axis::X),
                y: op(a.y, b.y, Axis::Y),
                ..a.clone()
            })
            .collect();
        let guidelines = pair_by_key(&self.guidelines, &other.guidelines, |g| g.name.clone())
            .into_iter()
            .map(|(a, b)| MathGuideline {
                x: op(a.x, b.x, Axis::X),
                y: op(a.y, b.y, Axis::Y),
                angle: op(a.angle, b.angle, Axis::X),
                ..a.clone()
            })
            .collect();
        Ok(MathGlyph {
            width: op(self.width, other.width, Axis::X),
            height: op(self.height, other.height, Axis::Y),
            contours,
            components,
            anchors,
            guidelines,
            ..self.clone()
        })
    }

    /// Apply `op` to every value with the factor of its axis.
    fn scaled(&self, op: impl Fn(f64, f64) -> f64, factor: (f64, f64)) -> MathGlyph {
        let f = |value: f64, axis: Axis| op(value, pick(factor, axis));
        let mut result = self.clone();
        result.width = f(self.width, Axis::X);
        result.height = f(self.height, Axis::Y);
        for contour in &mut result.contours {
            for point in &mut contour.points {
                point.x = f(point.x, Axis::X);
                point.y = f(point.y, Axis::Y);
            }
        }
        for component in &mut result.components {
            let [xx, xy, yx, yy, dx, dy] = component.transformation.as_coeffs();
            component.transformation = Affine::new([
                f(xx, Axis::X),
                f(xy, Axis::Y),
                f(yx, Axis::X),
                f(yy, Axis::Y),
                f(dx, Axis::X),
                f(dy, Axis::Y),
            ]);
        }
        for anchor in &mut result.anchors {
            anchor.x = f(anchor.x, Axis::X);
            anchor.y = f(anchor.y, Axis::Y);
        }
        for guideline in &mut result.guidelines {
            guideline.x = f(guideline.x, Axis::X);
            guideline.y = f(guideline.y, Axis::Y);
        }
        result
    }

    pub fn add(&self, other: &MathGlyph) -> Result<MathGlyph> {
        self.combine(other, |a, b, _| a + b)
    }

    pub fn sub(&self, other: &MathGlyph) -> Result<MathGlyph> {
        self.combine(other, |a, b, _| a - b)
    }

    pub fn mul(&self, factor: (f64, f64)) -> MathGlyph {
        self.scaled(|value, f| value * f, factor)
    }

    pub fn div(&self, factor: (f64, f64)) -> Result<MathGlyph> {
        if factor.0 == 0.0 || factor.1 == 0.0 {
            return Err(Error::invalid("Glyphs cannot be divided by zero."));
        }
        Ok(self.scaled(|value, f| value / f, factor))
    }

    /// `min + (max - min) * factor`, with per-axis factors
    pub fn interpolate(min: &MathGlyph, max: &MathGlyph, factor: (f64, f64)) -> Result<MathGlyph> {
        min.combine(max, |a, b, axis| a + (b - a) * pick(factor, axis))
    }

    /// Round coordinates, metrics and offsets to integers.
    pub fn round(&mut self) {
        self.width = round_value(self.width);
        self.height = round_value(self.height);
        for contour in &mut self.contours {
            for point in &mut contour.points {
                point.x = round_value(point.x);
                point.y = round_value(point.y);
            }
        }
        for component in &mut self.components {
            let [xx, xy, yx, yy, dx, dy] = component.transformation.as_coeffs();
            component.transformation =
                Affine::new([xx, xy, yx, yy, round_value(dx), round_value(dy)]);
        }
        for anchor in &mut self.anchors {
            anchor.x = round_value(anchor.x);
            anchor.y = round_value(anchor.y);
        }
        for guideline in &mut self.guidelines {
            guideline.x = round_value(guideline.x);
            guideline.y = round_value(guideline.y);
        }
    }

    pub fn bounds_points(&self) -> Vec<Point> {
        self.contours
            .iter()
            .flat_map(|contour| contour.points.iter().map(UfoPoint::position))
            .collect()
    }
}

/// Builds contours and components of a [`MathGlyph`].
pub struct MathGlyphPen<'a> {
    glyph: &'a mut MathGlyph,
    buffer: PathBuffer,
}

impl PointPen for MathGlyphPen<'_> {
    fn begin_path(&mut self, identifier: Option<&str>) -> Result<()> {
        self.buffer.begin(identifier)
    }

    fn add_point(&mut self, point: &UfoPoint) -> Result<()> {
        self.buffer.push(point)
    }

    fn end_path(&mut self) -> Result<()> {
        let (identifier, points) = self.buffer.finish()?;
        self.glyph.contours.push(MathContour { identifier, points });
        Ok(())
    }

    fn add_component(
        &mut self,
        base_glyph: &str,
        transformation: Affine,
        identifier: Option<&str>,
    ) -> Result<()> {
        self.glyph.components.push(MathComponent {
            base_glyph: base_glyph.to_string(),
            transformation,
            identifier: identifier.map(str::to_string),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(name: &str, size: f64, width: f64) -> MathGlyph {
        let mut glyph = MathGlyph {
            name: name.to_string(),
            width,
            ..Default::default()
        };
        let mut pen = glyph.point_pen();
        pen.begin_path(None).unwrap();
        for (x, y) in [(0.0, 0.0), (0.0, size), (size, size), (size, 0.0)] {
            pen.add_point(&UfoPoint::line_to(x, y)).unwrap();
        }
        pen.end_path().unwrap();
        pen.add_component("acute", Affine::translate((size, 0.0)), None)
            .unwrap();
        glyph.anchors.push(MathAnchor {
            x: size,
            y: size,
            name: Some("top".into()),
            color: None,
            identifier: None,
        });
        glyph
    }

    #[test]
    fn test_interpolate_halfway() {
        let min = square("min", 100.0, 200.0);
        let max = square("max", 200.0, 400.0);
        let result = MathGlyph::interpolate(&min, &max, (0.5, 0.5)).unwrap();
        assert_eq!(result.width, 300.0);
        assert_eq!(result.contours[0].points[2].position(), Point::new(150.0, 150.0));
        assert_eq!(result.components[0].transformation.translation().x, 150.0);
        assert_eq!(result.anchors[0].x, 150.0);
        assert_eq!(result.name, "min");
    }

    #[test]
    fn test_per_axis_factor() {
        let min = square("min", 100.0, 200.0);
        let max = square("max", 200.0, 400.0);
        let result = MathGlyph::interpolate(&min, &max, (0.0, 1.0)).unwrap();
        assert_eq!(result.contours[0].points[2].position(), Point::new(100.0, 200.0));
    }

    #[test]
    fn test_mismatched_contours_fail() {
        let min = square("min", 100.0, 200.0);
        let mut max = square("max", 200.0, 400.0);
        max.contours[0].points.pop();
        assert!(matches!(
            MathGlyph::interpolate(&min, &max, (0.5, 0.5)),
            Err(Error::Incompatible(_))
        ));
    }

    #[test]
    fn test_unpaired_anchors_are_dropped() {
        let min = square("min", 100.0, 200.0);
        let mut max = square("max", 200.0, 400.0);
        max.anchors[0].name = Some("bottom".into());
        let result = min.add(&max).unwrap();
        assert!(result.anchors.is_empty());
    }

    #[test]
    fn test_arithmetic_and_rounding() {
        let glyph = square("a", 100.0, 250.0);
        let doubled = glyph.mul((2.0, 2.0));
        assert_eq!(doubled.width, 500.0);
        let halved = doubled.div((4.0, 4.0)).unwrap();
        let mut sum = halved.add(&glyph).unwrap();
        assert_eq!(sum.width, 375.0);
        sum = sum.mul((1.0 / 3.0, 1.0 / 3.0));
        sum.round();
        assert_eq!(sum.width, 125.0);
        assert!(glyph.div((0.0, 1.0)).is_err());
        assert_eq!(glyph.sub(&glyph).unwrap().width, 0.0);
    }
}
