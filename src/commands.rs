//! Subcommand implementations
//!
//! Every command runs against the memory environment. Output goes to
//! stdout; diagnostics go through `tracing`.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::Command;
use crate::config::Settings;
use crate::memory::MemoryFont;
use crate::objects::prelude::*;

pub fn run(command: Command) -> Result<()> {
    match command {
        Command::Info { font } => print_info(&open(&font)?),
        Command::Glyph { font, name, layer } => print_glyph(&open(&font)?, &name, layer.as_deref()),
        Command::Round { font, output } => {
            let ufo = open(&font)?;
            ufo.round().context("Failed to round the font")?;
            save(&ufo, output.as_deref())
        }
        Command::Transform {
            font,
            matrix,
            glyph,
            output,
        } => {
            let ufo = open(&font)?;
            transform(&ufo, matrix, glyph.as_deref())?;
            save(&ufo, output.as_deref())
        }
        Command::Compat { font, other } => {
            let (compatible, report) = open(&font)?.is_compatible(&open(&other)?);
            if !report.is_empty() {
                println!("{report}");
            }
            println!("{}", if compatible { "Compatible" } else { "Not compatible" });
            Ok(())
        }
        Command::Interpolate {
            min,
            max,
            factor,
            output,
            no_round,
            suppress_errors,
        } => {
            let (min, max) = (open(&min)?, open(&max)?);
            let settings = Settings::load().unwrap_or_default();
            let result = MemoryFont::with_settings(&settings);
            result
                .interpolate(factor, &min, &max, !no_round, suppress_errors)
                .context("Failed to interpolate")?;
            save(&result, Some(output.as_path()))
        }
        Command::NewConfig => Settings::initialize_config_directory(),
    }
}

fn open(path: &Path) -> Result<MemoryFont> {
    MemoryFont::load(path).with_context(|| format!("Failed to open {}", path.display()))
}

fn save(font: &MemoryFont, output: Option<&Path>) -> Result<()> {
    font.save(output, None).context("Failed to save the font")?;
    if let Some(path) = font.path() {
        println!("Saved {}", path.display());
    }
    Ok(())
}

fn print_info(font: &MemoryFont) -> Result<()> {
    let info = font.info();
    println!(
        "Family: {}",
        info.family_name().unwrap_or_else(|| "(none)".to_string())
    );
    println!(
        "Style: {}",
        info.style_name().unwrap_or_else(|| "(none)".to_string())
    );
    println!("Default layer: {}", font.default_layer_name());
    for layer in font.layers() {
        println!("  {}: {} glyphs", layer.name(), layer.len());
    }
    println!("Glyphs: {}", font.len()?);
    println!("Kerning pairs: {}", font.kerning().len());
    println!("Groups: {}", font.groups().len());
    Ok(())
}

fn print_glyph(font: &MemoryFont, name: &str, layer: Option<&str>) -> Result<()> {
    let glyph = match layer {
        Some(layer) => font.get_layer(layer)?.glyph(name)?,
        None => font.glyph(name)?,
    };
    println!("{}", glyph.repr());
    let unicodes: Vec<String> = glyph
        .unicodes()
        .iter()
        .map(|code| format!("U+{code:04X}"))
        .collect();
    println!("Unicodes: {}", unicodes.join(" "));
    println!("Width: {}  Height: {}", glyph.width(), glyph.height());
    println!(
        "Margins: left {} right {}",
        glyph.left_margin()?,
        glyph.right_margin()?
    );
    match glyph.bounds()? {
        Some(bounds) => println!(
            "Bounds: ({}, {}) - ({}, {})",
            bounds.x0, bounds.y0, bounds.x1, bounds.y1
        ),
        None => println!("Bounds: (empty)"),
    }
    for (index, contour) in glyph.contours().iter().enumerate() {
        let direction = if contour.clockwise()? { "cw" } else { "ccw" };
        let types: Vec<String> = contour
            .segments()
            .iter()
            .map(|segment| {
                segment
                    .segment_type()
                    .map(|kind| kind.to_string())
                    .unwrap_or_else(|_| "?".to_string())
            })
            .collect();
        println!(
            "Contour {index} ({direction}, {} points): {}",
            contour.len_points(),
            types.join(" ")
        );
    }
    for component in glyph.components() {
        println!("Component: {} {:?}", component.base_glyph(), component.offset());
    }
    for anchor in glyph.anchors() {
        let position = anchor.position();
        println!(
            "Anchor: {} ({}, {})",
            anchor.name().unwrap_or_default(),
            position.x,
            position.y
        );
    }
    Ok(())
}

fn transform(font: &MemoryFont, matrix: [f64; 6], glyph: Option<&str>) -> Result<()> {
    let glyphs = match glyph {
        Some(name) => vec![font.glyph(name)?],
        None => font.glyphs()?,
    };
    for glyph in &glyphs {
        glyph
            .transform_by(matrix, None)
            .with_context(|| format!("Failed to transform {}", glyph.name()))?;
    }
    info!("Transformed {} glyphs", glyphs.len());
    Ok(())
}
