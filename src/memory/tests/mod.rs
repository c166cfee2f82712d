//! Behavior tests for the in-memory environment
//!
//! These drive the public `Base*` API end to end, so they cover the
//! normalization and fallback layers as well as the memory hooks.

mod dicts;
mod font;
mod glyph;
mod outline;
mod ufo;

use kurbo::{Point, Vec2};

use super::*;
use crate::error::Error;
use crate::geometry::{Color, PointType, SegmentType, UfoPoint};
use crate::objects::prelude::*;

/// A font whose default layer holds one empty glyph
fn font_with_glyph(name: &str) -> (MemoryFont, MemoryGlyph) {
    let font = MemoryFont::new();
    let glyph = font.new_glyph(name, false).unwrap();
    (font, glyph)
}

/// Draw a closed clockwise square with its lower left corner at `origin`
fn draw_square(glyph: &MemoryGlyph, origin: (f64, f64), size: f64) {
    let (x, y) = origin;
    let mut pen = glyph.point_pen();
    pen.begin_path(None).unwrap();
    for (px, py) in [(x, y), (x, y + size), (x + size, y + size), (x + size, y)] {
        pen.add_point(&UfoPoint::line_to(px, py)).unwrap();
    }
    pen.end_path().unwrap();
}
