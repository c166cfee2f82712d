//! Command line interface for fontparts
//!
//! Parses arguments for the `fontparts` tool and validates them before any
//! font is opened. Options with a non-obvious format carry examples in
//! their long help.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

/// fontparts CLI arguments
///
/// Examples:
///   fontparts info MyFont.ufo                          # Summary of a font
///   fontparts glyph MyFont.ufo A                       # Metrics and outline of A
///   fontparts glyph MyFont.ufo A --layer background    # Same, from another layer
///   fontparts round MyFont.ufo -o Rounded.ufo          # Round every value
///   fontparts transform MyFont.ufo --matrix 1,0,0.2,1,0,0
///   fontparts compat Light.ufo Bold.ufo                # Interpolation report
///   fontparts interpolate Light.ufo Bold.ufo --factor 0.5 -o Regular.ufo
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "fontparts",
    version,
    about = "Script and inspect UFO font sources",
    long_about = "fontparts reads UFO font sources into an environment-agnostic font object model and runs common scripting operations on them: inspection, rounding, transformation, compatibility checks and interpolation."
)]
pub struct CliArgs {
    #[clap(subcommand)]
    pub command: Command,

    /// Log filter directive
    ///
    /// Uses `tracing` filter syntax. `RUST_LOG` takes precedence when set.
    #[clap(
        long = "log-filter",
        global = true,
        help = "Log filter, e.g. info or fontparts=debug",
        long_help = "Filter directive for log output in tracing-subscriber syntax, for example 'info', 'warn' or 'fontparts=debug'. Falls back to the log_filter setting, then to 'info'. The RUST_LOG environment variable wins over both."
    )]
    pub log_filter: Option<String>,

    /// Write logs to the dated log file instead of stderr
    #[clap(
        long = "log-file",
        global = true,
        help = "Write logs to ~/.config/fontparts/logs/",
        long_help = "Write log output to a dated file in ~/.config/fontparts/logs/ instead of stderr."
    )]
    pub log_file: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print names, layers and counts of a font
    Info {
        /// UFO to read
        font: PathBuf,
    },

    /// Print metrics and the outline structure of one glyph
    Glyph {
        /// UFO to read
        font: PathBuf,
        /// Glyph name
        name: String,
        #[clap(
            long = "layer",
            short = 'l',
            help = "Layer to read the glyph from",
            long_help = "Name of the layer to read the glyph from. Defaults to the font's default layer."
        )]
        layer: Option<String>,
    },

    /// Round coordinates, metrics, kerning and info values
    Round {
        /// UFO to round
        font: PathBuf,
        #[clap(
            long = "output",
            short = 'o',
            help = "Where to save the result",
            long_help = "Path of the UFO to write. Without it the source font is overwritten."
        )]
        output: Option<PathBuf>,
    },

    /// Apply an affine matrix to glyphs
    Transform {
        /// UFO to transform
        font: PathBuf,
        #[clap(
            long = "matrix",
            short = 'm',
            value_parser = parse_matrix,
            allow_hyphen_values = true,
            help = "Six comma separated values: xx,xy,yx,yy,dx,dy",
            long_help = "Affine matrix as six comma separated values in the order xx,xy,yx,yy,dx,dy. For example '1,0,0,1,50,0' moves everything 50 units right and '1,0,0.2,1,0,0' slants by about 11 degrees."
        )]
        matrix: [f64; 6],
        #[clap(
            long = "glyph",
            short = 'g',
            help = "Only transform this glyph",
            long_help = "Name of a glyph in the default layer to transform. Without it every glyph of the default layer is transformed."
        )]
        glyph: Option<String>,
        #[clap(
            long = "output",
            short = 'o',
            help = "Where to save the result",
            long_help = "Path of the UFO to write. Without it the source font is overwritten."
        )]
        output: Option<PathBuf>,
    },

    /// Report whether two fonts can be interpolated
    Compat {
        /// First UFO
        font: PathBuf,
        /// Second UFO
        other: PathBuf,
    },

    /// Interpolate between two fonts and save the result
    Interpolate {
        /// UFO at factor 0
        min: PathBuf,
        /// UFO at factor 1
        max: PathBuf,
        #[clap(
            long = "factor",
            short = 'f',
            value_parser = parse_factor,
            allow_hyphen_values = true,
            help = "Interpolation factor, or x,y factors",
            long_help = "Interpolation factor. A single value such as '0.5' applies to both axes; a pair such as '0.5,0.25' gives separate horizontal and vertical factors. Values outside 0..1 extrapolate."
        )]
        factor: (f64, f64),
        #[clap(
            long = "output",
            short = 'o',
            help = "Where to save the result"
        )]
        output: PathBuf,
        #[clap(
            long = "no-round",
            help = "Keep fractional values",
            long_help = "Keep fractional coordinates in the interpolated font instead of rounding them."
        )]
        no_round: bool,
        #[clap(
            long = "suppress-errors",
            help = "Skip incompatible glyphs instead of failing"
        )]
        suppress_errors: bool,
    },

    /// Write the default settings file
    ///
    /// Creates ~/.config/fontparts with a settings.json holding every
    /// default and an empty logs/ directory.
    NewConfig,
}

impl CliArgs {
    /// Validate the CLI arguments after parsing
    ///
    /// Checks that every input path is a UFO directory so that mistakes show
    /// up before any work is done.
    pub fn validate(&self) -> Result<(), String> {
        match &self.command {
            Command::Info { font }
            | Command::Glyph { font, .. }
            | Command::Round { font, .. }
            | Command::Transform { font, .. } => validate_ufo(font),
            Command::Compat { font, other } => {
                validate_ufo(font)?;
                validate_ufo(other)
            }
            Command::Interpolate { min, max, output, .. } => {
                validate_ufo(min)?;
                validate_ufo(max)?;
                if output.as_os_str().is_empty() {
                    return Err("The output path must not be empty.".to_string());
                }
                Ok(())
            }
            Command::NewConfig => Ok(()),
        }
    }
}

fn validate_ufo(path: &Path) -> Result<(), String> {
    if !path.exists() {
        return Err(format!(
            "Font source does not exist: {}\nMake sure the path is correct and the file exists.",
            path.display()
        ));
    }
    if !path.is_dir() {
        return Err(format!(
            "Not a UFO directory: {}\nUFO sources are directories ending in .ufo.",
            path.display()
        ));
    }
    if !path.join("metainfo.plist").exists() {
        return Err(format!(
            "Not a valid UFO directory: missing metainfo.plist in {}\nMake sure this is a valid UFO directory.",
            path.display()
        ));
    }
    Ok(())
}

fn parse_numbers(value: &str) -> Result<Vec<f64>, String> {
    value
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<f64>()
                .map_err(|_| format!("'{}' is not a number", part.trim()))
        })
        .collect()
}

/// Parse `xx,xy,yx,yy,dx,dy`
pub fn parse_matrix(value: &str) -> Result<[f64; 6], String> {
    let numbers = parse_numbers(value)?;
    <[f64; 6]>::try_from(numbers.as_slice())
        .map_err(|_| format!("A matrix needs 6 values, got {}", numbers.len()))
}

/// Parse `f` or `fx,fy`
pub fn parse_factor(value: &str) -> Result<(f64, f64), String> {
    match parse_numbers(value)?.as_slice() {
        [factor] => Ok((*factor, *factor)),
        [x, y] => Ok((*x, *y)),
        other => Err(format!("A factor needs 1 or 2 values, got {}", other.len())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_matrix() {
        assert_eq!(
            parse_matrix("1, 0, 0.2, 1, -10, 0").unwrap(),
            [1.0, 0.0, 0.2, 1.0, -10.0, 0.0]
        );
        assert!(parse_matrix("1,0,0,1").is_err());
        assert!(parse_matrix("1,0,0,1,a,0").is_err());
    }

    #[test]
    fn test_parse_factor() {
        assert_eq!(parse_factor("0.5").unwrap(), (0.5, 0.5));
        assert_eq!(parse_factor("0.5,0.25").unwrap(), (0.5, 0.25));
        assert!(parse_factor("1,2,3").is_err());
    }

    #[test]
    fn test_subcommands_parse() {
        let args = CliArgs::parse_from([
            "fontparts",
            "--log-filter",
            "debug",
            "transform",
            "Font.ufo",
            "--matrix",
            "1,0,0,1,-50,0",
            "--glyph",
            "A",
        ]);
        assert_eq!(args.log_filter.as_deref(), Some("debug"));
        match args.command {
            Command::Transform { matrix, glyph, .. } => {
                assert_eq!(matrix[4], -50.0);
                assert_eq!(glyph.as_deref(), Some("A"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_validate_rejects_missing_font() {
        let args = CliArgs::parse_from(["fontparts", "info", "/nonexistent/Font.ufo"]);
        let error = args.validate().unwrap_err();
        assert!(error.contains("does not exist"));
    }

    #[test]
    fn test_validate_accepts_ufo_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        let ufo = dir.path().join("Font.ufo");
        std::fs::create_dir_all(&ufo).unwrap();
        assert!(validate_ufo(&ufo).is_err());

        std::fs::write(ufo.join("metainfo.plist"), "").unwrap();
        assert!(validate_ufo(&ufo).is_ok());
        assert!(CliArgs::parse_from(["fontparts", "new-config"]).validate().is_ok());
    }
}
