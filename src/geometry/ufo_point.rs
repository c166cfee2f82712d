//! UFO-compliant point records
//!
//! A plain description of a contour point, used when adding points to a
//! contour, by pens and by math glyphs.

use kurbo::Point;
use serde::{Deserialize, Serialize};

use super::PointType;

/// Full UFO point data
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UfoPoint {
    pub x: f64,
    pub y: f64,
    #[serde(rename = "type")]
    pub point_type: PointType,
    #[serde(default)]
    pub smooth: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
}

impl UfoPoint {
    /// Create a new UFO point with coordinates and type
    pub fn new(x: f64, y: f64, point_type: PointType) -> Self {
        Self {
            x,
            y,
            point_type,
            smooth: false,
            name: None,
            identifier: None,
        }
    }

    /// Create a move point (first point in contour)
    pub fn move_to(x: f64, y: f64) -> Self {
        Self::new(x, y, PointType::Move)
    }

    pub fn line_to(x: f64, y: f64) -> Self {
        Self::new(x, y, PointType::Line)
    }

    /// Create an off-curve control point
    pub fn off_curve(x: f64, y: f64) -> Self {
        Self::new(x, y, PointType::OffCurve)
    }

    pub fn curve_to(x: f64, y: f64) -> Self {
        Self::new(x, y, PointType::Curve)
    }

    pub fn qcurve_to(x: f64, y: f64) -> Self {
        Self::new(x, y, PointType::QCurve)
    }

    /// Set the smooth flag. Off-curve points are never smooth.
    pub fn with_smooth(mut self, smooth: bool) -> Self {
        self.smooth = smooth && self.point_type.is_on_curve();
        self
    }

    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_identifier<S: Into<String>>(mut self, identifier: S) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn from_norad(point: &norad::ContourPoint) -> Self {
        Self {
            x: point.x,
            y: point.y,
            point_type: PointType::from_norad(&point.typ),
            smooth: point.smooth,
            name: point.name.as_ref().map(|name| name.to_string()),
            identifier: point.identifier().map(|id| id.as_str().to_string()),
        }
    }

    pub fn to_norad(&self) -> norad::ContourPoint {
        norad::ContourPoint::new(
            self.x,
            self.y,
            self.point_type.to_norad(),
            self.smooth,
            self.name.as_deref().and_then(|name| name.parse().ok()),
            self.identifier
                .as_deref()
                .and_then(|id| norad::Identifier::new(id).ok()),
        )
    }
}
