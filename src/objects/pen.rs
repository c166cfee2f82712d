//! Point pens
//!
//! The point pen protocol walks an outline contour by contour: `begin_path`,
//! one `add_point` per point, `end_path`, with `add_component` calls in
//! between contours.

use kurbo::Affine;

use crate::error::{Error, Result};
use crate::geometry::UfoPoint;

pub trait PointPen {
    fn begin_path(&mut self, identifier: Option<&str>) -> Result<()>;
    fn add_point(&mut self, point: &UfoPoint) -> Result<()>;
    fn end_path(&mut self) -> Result<()>;
    fn add_component(
        &mut self,
        base_glyph: &str,
        transformation: Affine,
        identifier: Option<&str>,
    ) -> Result<()>;
}

/// A recorded pen call
#[derive(Clone, Debug, PartialEq)]
pub enum PenCommand {
    BeginPath(Option<String>),
    AddPoint(UfoPoint),
    EndPath,
    AddComponent {
        base_glyph: String,
        transformation: Affine,
        identifier: Option<String>,
    },
}

/// Records every call so it can be inspected or replayed into another pen.
#[derive(Clone, Debug, Default)]
pub struct RecordingPointPen {
    pub commands: Vec<PenCommand>,
}

impl RecordingPointPen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replay(&self, pen: &mut impl PointPen) -> Result<()> {
        for command in &self.commands {
            match command {
                PenCommand::BeginPath(identifier) => pen.begin_path(identifier.as_deref())?,
                PenCommand::AddPoint(point) => pen.add_point(point)?,
                PenCommand::EndPath => pen.end_path()?,
                PenCommand::AddComponent {
                    base_glyph,
                    transformation,
                    identifier,
                } => pen.add_component(base_glyph, *transformation, identifier.as_deref())?,
            }
        }
        Ok(())
    }
}

impl PointPen for RecordingPointPen {
    fn begin_path(&mut self, identifier: Option<&str>) -> Result<()> {
        self.commands
            .push(PenCommand::BeginPath(identifier.map(str::to_string)));
        Ok(())
    }

    fn add_point(&mut self, point: &UfoPoint) -> Result<()> {
        self.commands.push(PenCommand::AddPoint(point.clone()));
        Ok(())
    }

    fn end_path(&mut self) -> Result<()> {
        self.commands.push(PenCommand::EndPath);
        Ok(())
    }

    fn add_component(
        &mut self,
        base_glyph: &str,
        transformation: Affine,
        identifier: Option<&str>,
    ) -> Result<()> {
        self.commands.push(PenCommand::AddComponent {
            base_glyph: base_glyph.to_string(),
            transformation,
            identifier: identifier.map(str::to_string),
        });
        Ok(())
    }
}

/// Collects the points of the contour being drawn and hands them out at
/// `end_path`. Shared by pens that build contours.
#[derive(Debug, Default)]
pub(crate) struct PathBuffer {
    current: Option<(Option<String>, Vec<UfoPoint>)>,
}

impl PathBuffer {
    pub(crate) fn begin(&mut self, identifier: Option<&str>) -> Result<()> {
        if self.current.is_some() {
            return Err(Error::invalid("begin_path called while a path is open."));
        }
        self.current = Some((identifier.map(str::to_string), Vec::new()));
        Ok(())
    }

    pub(crate) fn push(&mut self, point: &UfoPoint) -> Result<()> {
        match self.current.as_mut() {
            Some((_, points)) => {
                points.push(point.clone());
                Ok(())
            }
            None => Err(Error::invalid("add_point called outside of a path.")),
        }
    }

    pub(crate) fn finish(&mut self) -> Result<(Option<String>, Vec<UfoPoint>)> {
        self.current
            .take()
            .ok_or_else(|| Error::invalid("end_path called without begin_path."))
    }
}
