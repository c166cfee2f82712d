//! RGBA colors used for marks, layers, anchors and guidelines

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A color with each component in the `0..=1` range
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Color {
    pub fn new(r: f64, g: f64, b: f64, a: f64) -> Result<Self> {
        let color = Self { r, g, b, a };
        for (name, value) in color.components() {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(Error::invalid(format!(
                    "The value for the {name} component ({value}) is not between 0 and 1."
                )));
            }
        }
        Ok(color)
    }

    pub fn to_array(&self) -> [f64; 4] {
        [self.r, self.g, self.b, self.a]
    }

    fn components(&self) -> [(&'static str, f64); 4] {
        [("red", self.r), ("green", self.g), ("blue", self.b), ("alpha", self.a)]
    }
}

impl TryFrom<[f64; 4]> for Color {
    type Error = Error;

    fn try_from(value: [f64; 4]) -> Result<Self> {
        Color::new(value[0], value[1], value[2], value[3])
    }
}

/// Formats as the UFO color string, `"r,g,b,a"`.
impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.r, self.g, self.b, self.a)
    }
}

impl FromStr for Color {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        let parts = value
            .split(',')
            .map(|part| part.trim().parse::<f64>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|_| Error::invalid(format!("Color string '{value}' is not valid.")))?;
        match parts.as_slice() {
            [r, g, b, a] => Color::new(*r, *g, *b, *a),
            _ => Err(Error::invalid(format!(
                "Colors must contain four values, not {}.",
                parts.len()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_string_format() {
        let color = Color::new(1.0, 0.0, 0.5, 1.0).unwrap();
        assert_eq!(color.to_string(), "1,0,0.5,1");
        assert_eq!("1,0,0.5,1".parse::<Color>().unwrap(), color);
    }

    #[test]
    fn test_color_component_out_of_range() {
        assert!(Color::new(1.5, 0.0, 0.0, 1.0).is_err());
        assert!(Color::try_from([0.0, -0.1, 0.0, 1.0]).is_err());
        assert!("1,0,0".parse::<Color>().is_err());
    }
}
