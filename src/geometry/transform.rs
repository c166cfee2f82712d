//! Affine helpers shared by every transformable object
//!
//! Matrices use the `[xx, xy, yx, yy, dx, dy]` layout, which is the layout of
//! both `kurbo::Affine` and the UFO component transformation.

use kurbo::{Affine, Point, Vec2};

/// Offset that realigns the transformed origin with the original one.
pub fn origin_offset(matrix: Affine, origin: Point) -> Vec2 {
    if origin == Point::ZERO {
        return Vec2::ZERO;
    }
    origin - matrix * origin
}

/// Translation matrix for an offset
pub fn offset_matrix(offset: Vec2) -> Affine {
    Affine::translate(offset)
}

pub fn scale_matrix(scale: (f64, f64)) -> Affine {
    Affine::scale_non_uniform(scale.0, scale.1)
}

/// Rotation matrix for an angle in degrees
pub fn rotation_matrix(degrees: f64) -> Affine {
    Affine::rotate(degrees.to_radians())
}

/// Skew matrix for a pair of angles in degrees
pub fn skew_matrix(degrees: (f64, f64)) -> Affine {
    Affine::skew(degrees.0.to_radians().tan(), degrees.1.to_radians().tan())
}

/// Apply a matrix to a point and shift it by the origin offset.
pub fn transform_point(matrix: Affine, origin_offset: Vec2, point: Point) -> Point {
    matrix * point + origin_offset
}

/// Linear interpolation, `a + (b - a) * factor`
pub fn interpolate(a: f64, b: f64, factor: f64) -> f64 {
    a + (b - a) * factor
}

/// Interpolate x and y independently.
pub fn interpolate_point(a: Point, b: Point, factor: (f64, f64)) -> Point {
    Point::new(interpolate(a.x, b.x, factor.0), interpolate(a.y, b.y, factor.1))
}

/// Round half up, the OpenType rounding rule.
pub fn round_value(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Round a value to the nearest multiple.
pub fn round_to_multiple(value: f64, multiple: f64) -> f64 {
    if multiple <= 1.0 {
        return round_value(value);
    }
    round_value(value / multiple) * multiple
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Point, b: Point) {
        assert!((a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9, "{a:?} != {b:?}");
    }

    #[test]
    fn test_rotation_about_origin_offset() {
        let matrix = rotation_matrix(90.0);
        let origin = Point::new(100.0, 100.0);
        let offset = origin_offset(matrix, origin);
        // rotating the origin itself must leave it in place
        assert_close(transform_point(matrix, offset, origin), origin);
        assert_close(
            transform_point(matrix, offset, Point::new(200.0, 100.0)),
            Point::new(100.0, 200.0),
        );
    }

    #[test]
    fn test_skew_matches_ufo_layout() {
        let matrix = skew_matrix((45.0, 0.0));
        let coeffs = matrix.as_coeffs();
        assert!((coeffs[2] - 1.0).abs() < 1e-9);
        assert_eq!(coeffs[1], 0.0);
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_value(1.5), 2.0);
        assert_eq!(round_value(-1.5), -1.0);
        assert_eq!(round_value(2.4), 2.0);
        assert_eq!(round_to_multiple(23.0, 10.0), 20.0);
        assert_eq!(round_to_multiple(25.0, 10.0), 30.0);
    }

    #[test]
    fn test_interpolate() {
        assert_eq!(interpolate(0.0, 100.0, 0.25), 25.0);
        assert_eq!(
            interpolate_point(Point::ZERO, Point::new(10.0, 20.0), (0.5, 1.0)),
            Point::new(5.0, 20.0)
        );
    }
}
