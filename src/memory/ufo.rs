//! UFO conversion and file I/O
//!
//! Conversion between the memory environment's native data and norad's
//! UFO model. Info and lib values travel through `serde_json`, which is
//! also how the object model carries them.

use std::path::Path;

use kurbo::Affine;
use serde_json::{Map, Value};
use tracing::{debug, info};

use super::dicts::MemoryLib;
use super::font::MemoryFont;
use super::glyph::{GlyphData, MemoryGlyph};
use super::layer::{LayerData, MemoryLayer};
use super::outline::{
    AnchorData, ContourData, GuidelineData, GuidelineOwner, MemoryAnchor, MemoryComponent,
    MemoryContour, MemoryGuideline, MemoryPoint,
};
use super::DEFAULT_LAYER_NAME;
use crate::error::{Error, Result};
use crate::geometry::{Color, UfoPoint};
use crate::normalizers::info_attribute_kind;
use crate::objects::{
    ComponentBackend, ContourBackend, DictBackend, FeaturesBackend, FontBackend,
    GuidelineBackend, InfoBackend, LayerBackend,
};

/// Lib key holding the glyph order
pub const GLYPH_ORDER_KEY: &str = "public.glyphOrder";

/// Load a UFO font file from disk
pub fn load(path: &Path) -> Result<MemoryFont> {
    let ufo = norad::Font::load(path)
        .map_err(|e| Error::Ufo(format!("Failed to load {}: {}", path.display(), e)))?;
    let font = font_from_norad(&ufo)?;
    font.set_path(Some(path.to_path_buf()));
    info!(
        "Loaded {:?} with {} layers",
        path,
        font.raw_layer_order().len()
    );
    Ok(font)
}

/// Write `font` as a UFO 3 directory at `path`
pub fn save(font: &MemoryFont, path: &Path) -> Result<()> {
    let ufo = font_to_norad(font)?;
    ufo.save(path)
        .map_err(|e| Error::Ufo(format!("Failed to save {}: {}", path.display(), e)))?;
    debug!("Wrote UFO to {:?}", path);
    Ok(())
}

// ----------
// From norad
// ----------

pub fn font_from_norad(ufo: &norad::Font) -> Result<MemoryFont> {
    let default_layer_name = ufo.layers.default_layer().name().to_string();
    let font = MemoryFont::empty(&default_layer_name);
    for layer in ufo.layers.iter() {
        font.adopt_layer(layer_from_norad(layer)?);
    }

    let info = serde_json::to_value(&ufo.font_info)
        .map_err(|e| Error::Ufo(format!("Unreadable font info: {}", e)))?;
    if let Value::Object(values) = info {
        let raw_info = font.raw_info();
        for (attribute, value) in values {
            if value.is_null() || info_attribute_kind(&attribute).is_none() {
                continue;
            }
            raw_info.raw_set(&attribute, value)?;
        }
    }
    for guideline in ufo.font_info.guidelines.iter().flatten() {
        font.adopt_guideline(guideline_from_norad(guideline));
    }

    let groups = font.raw_groups();
    for (name, members) in &ufo.groups {
        groups.raw_set(
            name.to_string(),
            members.iter().map(|member| member.to_string()).collect(),
        );
    }
    let kerning = font.raw_kerning();
    for (first, seconds) in &ufo.kerning {
        for (second, value) in seconds {
            kerning.raw_set((first.to_string(), second.to_string()), *value);
        }
    }
    if !ufo.features.is_empty() {
        font.raw_features().raw_set_text(Some(ufo.features.clone()));
    }

    let mut lib = plist_to_map(&ufo.lib)?;
    if let Some(Value::Array(order)) = lib.remove(GLYPH_ORDER_KEY) {
        let order = order
            .into_iter()
            .filter_map(|name| name.as_str().map(str::to_string))
            .collect();
        font.raw_set_glyph_order(order);
    }
    let font_lib = font.raw_lib();
    for (key, value) in lib {
        font_lib.raw_set(key, value);
    }
    Ok(font)
}

fn layer_from_norad(layer: &norad::Layer) -> Result<MemoryLayer> {
    let mut data = LayerData::new(layer.name().to_string());
    data.color = layer.color.as_ref().and_then(color_from_norad);
    data.lib = MemoryLib::from_map(plist_to_map(&layer.lib)?);
    let memory = MemoryLayer::from_data(data);
    for glyph in layer.iter() {
        memory.adopt_glyph(glyph_from_norad(glyph)?);
    }
    Ok(memory)
}

/// Convert from norad glyph to the memory environment's glyph
pub fn glyph_from_norad(norad_glyph: &norad::Glyph) -> Result<MemoryGlyph> {
    let mut data = GlyphData::new(
        norad_glyph.name().to_string(),
        norad_glyph.width,
        norad_glyph.height,
    );
    data.unicodes = norad_glyph.codepoints.iter().map(u32::from).collect();
    data.note = norad_glyph.note.clone();
    data.lib = MemoryLib::from_map(plist_to_map(&norad_glyph.lib)?);
    let glyph = MemoryGlyph::from_data(data);

    let contours = norad_glyph
        .contours
        .iter()
        .map(|contour| contour_from_norad(contour, &glyph))
        .collect();
    let components = norad_glyph
        .components
        .iter()
        .map(|component| {
            let memory = MemoryComponent::with_base(
                component.base.to_string(),
                affine_from_norad(&component.transform),
                component.identifier().map(|id| id.as_str().to_string()),
            );
            memory.raw_set_glyph(Some(glyph.clone()));
            memory
        })
        .collect();
    let anchors = norad_glyph
        .anchors
        .iter()
        .map(|anchor| {
            MemoryAnchor::from_data(AnchorData {
                x: anchor.x,
                y: anchor.y,
                name: anchor.name.as_ref().map(|name| name.to_string()),
                color: anchor.color.as_ref().and_then(color_from_norad),
                identifier: anchor.identifier().map(|id| id.as_str().to_string()),
                glyph: glyph.downgrade(),
            })
        })
        .collect();
    let guidelines = norad_glyph
        .guidelines
        .iter()
        .map(|guideline| {
            let memory = guideline_from_norad(guideline);
            memory.0.borrow_mut().owner = GuidelineOwner::Glyph(glyph.downgrade());
            memory
        })
        .collect();

    {
        let mut data = glyph.0.borrow_mut();
        data.contours = contours;
        data.components = components;
        data.anchors = anchors;
        data.guidelines = guidelines;
    }
    Ok(glyph)
}

fn contour_from_norad(contour: &norad::Contour, glyph: &MemoryGlyph) -> MemoryContour {
    let memory = MemoryContour::from_data(ContourData {
        points: Vec::new(),
        identifier: contour.identifier().map(|id| id.as_str().to_string()),
        glyph: glyph.downgrade(),
    });
    let points = contour
        .points
        .iter()
        .map(|point| {
            let point = MemoryPoint::from_ufo_point(UfoPoint::from_norad(point));
            point.0.borrow_mut().contour = memory.downgrade();
            point
        })
        .collect();
    memory.0.borrow_mut().points = points;
    memory
}

fn guideline_from_norad(guideline: &norad::Guideline) -> MemoryGuideline {
    let (x, y, angle) = match guideline.line {
        norad::Line::Vertical(x) => (x, 0.0, 90.0),
        norad::Line::Horizontal(y) => (0.0, y, 0.0),
        norad::Line::Angle { x, y, degrees } => (x, y, degrees),
    };
    MemoryGuideline::from_data(GuidelineData {
        x,
        y,
        angle,
        name: guideline.name.as_ref().map(|name| name.to_string()),
        color: guideline.color.as_ref().and_then(color_from_norad),
        identifier: guideline.identifier().map(|id| id.as_str().to_string()),
        owner: GuidelineOwner::None,
    })
}

// --------
// To norad
// --------

pub fn font_to_norad(font: &MemoryFont) -> Result<norad::Font> {
    let mut ufo = norad::Font::new();
    let default_layer_name = font.raw_default_layer_name();

    // norad starts with its own default layer, which takes our default's name
    if default_layer_name != DEFAULT_LAYER_NAME {
        ufo.layers
            .rename_layer(DEFAULT_LAYER_NAME, &default_layer_name, false)
            .map_err(|e| Error::Ufo(format!("Invalid layer name '{}': {}", default_layer_name, e)))?;
    }
    for layer in font.raw_layers() {
        let name = layer.raw_name();
        let target = if name == default_layer_name {
            ufo.layers.default_layer_mut()
        } else {
            ufo.layers
                .new_layer(&name)
                .map_err(|e| Error::Ufo(format!("Invalid layer name '{}': {}", name, e)))?
        };
        layer_to_norad(&layer, target)?;
    }

    let mut info_values = Map::new();
    let raw_info = font.raw_info();
    for attribute in raw_info.raw_attributes() {
        if let Some(value) = raw_info.raw_get(&attribute) {
            info_values.insert(attribute, value);
        }
    }
    ufo.font_info = serde_json::from_value(Value::Object(info_values))
        .map_err(|e| Error::Ufo(format!("Font info cannot be written: {}", e)))?;
    let guidelines = font
        .raw_guidelines()
        .iter()
        .map(guideline_to_norad)
        .collect::<Result<Vec<_>>>()?;
    if !guidelines.is_empty() {
        ufo.font_info.guidelines = Some(guidelines);
    }

    let groups = font.raw_groups();
    for name in groups.raw_keys() {
        let members = groups
            .raw_get(&name)
            .unwrap_or_default()
            .iter()
            .map(|member| norad_name(member))
            .collect::<Result<Vec<_>>>()?;
        ufo.groups.insert(norad_name(&name)?, members);
    }
    let kerning = font.raw_kerning();
    for pair in kerning.raw_keys() {
        if let Some(value) = kerning.raw_get(&pair) {
            ufo.kerning
                .entry(norad_name(&pair.0)?)
                .or_default()
                .insert(norad_name(&pair.1)?, value);
        }
    }
    ufo.features = font.raw_features().raw_text().unwrap_or_default();

    let mut lib = lib_to_map(&font.raw_lib());
    let glyph_order = font.raw_glyph_order();
    if !glyph_order.is_empty() {
        lib.insert(
            GLYPH_ORDER_KEY.to_string(),
            Value::Array(glyph_order.into_iter().map(Value::String).collect()),
        );
    }
    ufo.lib = map_to_plist(lib)?;
    Ok(ufo)
}

fn layer_to_norad(layer: &MemoryLayer, target: &mut norad::Layer) -> Result<()> {
    target.color = layer.raw_color().as_ref().and_then(color_to_norad);
    target.lib = map_to_plist(lib_to_map(&layer.raw_lib()))?;
    for name in layer.raw_keys() {
        if let Some(glyph) = layer.raw_glyph(&name) {
            target.insert_glyph(glyph_to_norad(&glyph)?);
        }
    }
    Ok(())
}

/// Convert back to norad glyph
pub fn glyph_to_norad(glyph: &MemoryGlyph) -> Result<norad::Glyph> {
    let data = glyph.0.borrow();
    let mut norad_glyph = norad::Glyph::new(&data.name);
    norad_glyph.width = data.width;
    norad_glyph.height = data.height;

    for codepoint in data.unicodes.iter().filter_map(|value| char::from_u32(*value)) {
        norad_glyph.codepoints.insert(codepoint);
    }
    norad_glyph.note = data.note.clone();

    norad_glyph.contours = data
        .contours
        .iter()
        .map(|contour| {
            let points = contour.to_ufo_points().iter().map(UfoPoint::to_norad).collect();
            norad::Contour::new(points, norad_identifier(contour.raw_identifier()))
        })
        .collect();

    norad_glyph.components = data
        .components
        .iter()
        .map(|component| {
            Ok(norad::Component::new(
                norad_name(&component.raw_base_glyph())?,
                affine_to_norad(component.raw_transformation()),
                norad_identifier(component.raw_identifier()),
            ))
        })
        .collect::<Result<_>>()?;

    norad_glyph.anchors = data
        .anchors
        .iter()
        .map(|anchor| {
            let anchor = anchor.0.borrow();
            Ok(norad::Anchor::new(
                anchor.x,
                anchor.y,
                anchor.name.as_deref().map(norad_name).transpose()?,
                anchor.color.as_ref().and_then(color_to_norad),
                norad_identifier(anchor.identifier.clone()),
            ))
        })
        .collect::<Result<_>>()?;

    norad_glyph.guidelines = data
        .guidelines
        .iter()
        .map(guideline_to_norad)
        .collect::<Result<_>>()?;
    norad_glyph.lib = map_to_plist(lib_to_map(&data.lib))?;
    Ok(norad_glyph)
}

fn guideline_to_norad(guideline: &MemoryGuideline) -> Result<norad::Guideline> {
    let data = guideline.0.borrow();
    let line = if data.angle == 90.0 && data.y == 0.0 {
        norad::Line::Vertical(data.x)
    } else if data.angle == 0.0 && data.x == 0.0 {
        norad::Line::Horizontal(data.y)
    } else {
        norad::Line::Angle {
            x: data.x,
            y: data.y,
            degrees: data.angle,
        }
    };
    Ok(norad::Guideline::new(
        line,
        data.name.as_deref().map(norad_name).transpose()?,
        data.color.as_ref().and_then(color_to_norad),
        norad_identifier(data.identifier.clone()),
    ))
}

// -------
// Helpers
// -------

fn norad_name(value: &str) -> Result<norad::Name> {
    norad::Name::new(value).map_err(|e| Error::Ufo(format!("Invalid name '{}': {}", value, e)))
}

fn norad_identifier(value: Option<String>) -> Option<norad::Identifier> {
    value.and_then(|id| norad::Identifier::new(&id).ok())
}

pub fn affine_from_norad(transform: &norad::AffineTransform) -> Affine {
    Affine::new([
        transform.x_scale,
        transform.xy_scale,
        transform.yx_scale,
        transform.y_scale,
        transform.x_offset,
        transform.y_offset,
    ])
}

pub fn affine_to_norad(transformation: Affine) -> norad::AffineTransform {
    let [x_scale, xy_scale, yx_scale, y_scale, x_offset, y_offset] = transformation.as_coeffs();
    norad::AffineTransform {
        x_scale,
        xy_scale,
        yx_scale,
        y_scale,
        x_offset,
        y_offset,
    }
}

fn color_from_norad(color: &norad::Color) -> Option<Color> {
    let (r, g, b, a) = color.channels();
    Color::new(r, g, b, a).ok()
}

fn color_to_norad(color: &Color) -> Option<norad::Color> {
    let [r, g, b, a] = color.to_array();
    norad::Color::new(r, g, b, a).ok()
}

fn plist_to_map(plist: &norad::Plist) -> Result<Map<String, Value>> {
    match serde_json::to_value(plist) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Ok(Map::new()),
        Err(e) => Err(Error::Ufo(format!("Unreadable lib: {}", e))),
    }
}

fn map_to_plist(map: Map<String, Value>) -> Result<norad::Plist> {
    serde_json::from_value(Value::Object(map))
        .map_err(|e| Error::Ufo(format!("Lib cannot be written: {}", e)))
}

fn lib_to_map(lib: &MemoryLib) -> Map<String, Value> {
    lib.raw_keys()
        .into_iter()
        .filter_map(|key| lib.raw_get(&key).map(|value| (key, value)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::GlyphBackend;

    #[test]
    fn test_affine_conversion_keeps_coefficients() {
        let affine = Affine::new([2.0, 0.5, -0.5, 3.0, 10.0, 20.0]);
        assert_eq!(affine_from_norad(&affine_to_norad(affine)), affine);
    }

    #[test]
    fn test_guideline_lines() {
        let vertical = MemoryGuideline::from_data(GuidelineData {
            x: 100.0,
            angle: 90.0,
            ..Default::default()
        });
        let converted = guideline_to_norad(&vertical).unwrap();
        assert!(matches!(converted.line, norad::Line::Vertical(x) if x == 100.0));

        let back = guideline_from_norad(&converted);
        assert_eq!(back.raw_x(), 100.0);
        assert_eq!(back.raw_angle(), 90.0);
    }

    #[test]
    fn test_glyph_conversion_keeps_outline() {
        let mut norad_glyph = norad::Glyph::new("A");
        norad_glyph.width = 500.0;
        norad_glyph.codepoints.insert('A');
        norad_glyph.contours.push(norad::Contour::new(
            vec![
                UfoPoint::line_to(0.0, 0.0).to_norad(),
                UfoPoint::line_to(100.0, 0.0).to_norad(),
                UfoPoint::line_to(100.0, 100.0).to_norad(),
            ],
            None,
        ));
        let glyph = glyph_from_norad(&norad_glyph).unwrap();
        assert_eq!(glyph.0.borrow().unicodes, vec![0x41]);
        assert_eq!(glyph.raw_contours().len(), 1);
        assert!(glyph.raw_contours()[0].raw_glyph().is_some());

        let written = glyph_to_norad(&glyph).unwrap();
        assert_eq!(written.width, 500.0);
        assert_eq!(written.contours[0].points.len(), 3);
    }
}
