//! UFO point and segment types
//!
//! A contour is made of typed points. Every point except `offcurve` ends a
//! segment, so segment types are the on-curve subset of point types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// UFO point type enumeration
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointType {
    /// First point in an open contour
    #[serde(rename = "move")]
    Move,
    /// Draws straight line from previous point
    #[serde(rename = "line")]
    Line,
    /// Part of curve segment (control point)
    #[serde(rename = "offcurve")]
    OffCurve,
    /// Draws cubic Bézier curve
    #[serde(rename = "curve")]
    Curve,
    /// Draws quadratic curve
    #[serde(rename = "qcurve")]
    QCurve,
}

impl PointType {
    /// Check if this point type is on-curve (not a control point)
    pub fn is_on_curve(&self) -> bool {
        !matches!(self, PointType::OffCurve)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PointType::Move => "move",
            PointType::Line => "line",
            PointType::OffCurve => "offcurve",
            PointType::Curve => "curve",
            PointType::QCurve => "qcurve",
        }
    }

    pub fn from_norad(typ: &norad::PointType) -> Self {
        match typ {
            norad::PointType::Move => PointType::Move,
            norad::PointType::Line => PointType::Line,
            norad::PointType::OffCurve => PointType::OffCurve,
            norad::PointType::Curve => PointType::Curve,
            norad::PointType::QCurve => PointType::QCurve,
        }
    }

    pub fn to_norad(self) -> norad::PointType {
        match self {
            PointType::Move => norad::PointType::Move,
            PointType::Line => norad::PointType::Line,
            PointType::OffCurve => norad::PointType::OffCurve,
            PointType::Curve => norad::PointType::Curve,
            PointType::QCurve => norad::PointType::QCurve,
        }
    }
}

impl fmt::Display for PointType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PointType {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.to_ascii_lowercase().as_str() {
            "move" => Ok(PointType::Move),
            "line" => Ok(PointType::Line),
            "offcurve" => Ok(PointType::OffCurve),
            "curve" => Ok(PointType::Curve),
            "qcurve" => Ok(PointType::QCurve),
            _ => Err(Error::invalid(format!(
                "Point type must be 'move', 'line', 'curve', 'qcurve' or 'offcurve'; not '{value}'."
            ))),
        }
    }
}

/// The type of a segment, taken from its on-curve point
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentType {
    Move,
    Line,
    Curve,
    #[serde(rename = "qcurve")]
    QCurve,
}

impl SegmentType {
    pub fn as_str(&self) -> &'static str {
        self.point_type().as_str()
    }

    pub fn point_type(self) -> PointType {
        match self {
            SegmentType::Move => PointType::Move,
            SegmentType::Line => PointType::Line,
            SegmentType::Curve => PointType::Curve,
            SegmentType::QCurve => PointType::QCurve,
        }
    }

    /// Curve segments carry off-curve points, move and line segments don't.
    pub fn has_off_curves(&self) -> bool {
        matches!(self, SegmentType::Curve | SegmentType::QCurve)
    }
}

impl TryFrom<PointType> for SegmentType {
    type Error = Error;

    fn try_from(value: PointType) -> Result<Self> {
        match value {
            PointType::Move => Ok(SegmentType::Move),
            PointType::Line => Ok(SegmentType::Line),
            PointType::Curve => Ok(SegmentType::Curve),
            PointType::QCurve => Ok(SegmentType::QCurve),
            PointType::OffCurve => Err(Error::invalid(
                "Segment type must be 'move', 'line', 'curve' or 'qcurve'; not 'offcurve'.",
            )),
        }
    }
}

impl fmt::Display for SegmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SegmentType {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        value
            .parse::<PointType>()
            .map_err(|_| {
                Error::invalid(format!(
                    "Segment type must be 'move', 'line', 'curve' or 'qcurve'; not '{value}'."
                ))
            })
            .and_then(SegmentType::try_from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_type_parsing_is_case_insensitive() {
        assert_eq!("QCurve".parse::<PointType>().unwrap(), PointType::QCurve);
        assert_eq!("offcurve".parse::<PointType>().unwrap(), PointType::OffCurve);
        assert!("bezier".parse::<PointType>().is_err());
    }

    #[test]
    fn test_segment_type_rejects_offcurve() {
        assert!("offcurve".parse::<SegmentType>().is_err());
        assert_eq!("curve".parse::<SegmentType>().unwrap(), SegmentType::Curve);
    }

    #[test]
    fn test_norad_round_trip() {
        for typ in [
            PointType::Move,
            PointType::Line,
            PointType::OffCurve,
            PointType::Curve,
            PointType::QCurve,
        ] {
            assert_eq!(PointType::from_norad(&typ.to_norad()), typ);
        }
    }
}
