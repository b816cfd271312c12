//! Terminal listings of markers and legend rows.
//!
//! Supports human-readable (with colors), JSON, and NDJSON formats.

use std::io::{self, Write};

use crate::legend::LegendEntry;
use crate::marker::CircleMarker;

// ANSI codes
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

const SWATCH: &str = "●";

/// Output format selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// Human-readable terminal output (default)
    #[default]
    Human,
    /// JSON array
    Json,
    /// Newline-delimited JSON (one object per line)
    Ndjson,
}

impl std::str::FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            "ndjson" => Ok(Self::Ndjson),
            _ => Err(format!("unknown format: {s} (expected: human, json, ndjson)")),
        }
    }
}

/// Truecolor foreground escape for a `#rrggbb` color; empty if unparseable.
fn ansi_color(hex: &str) -> String {
    let Some(digits) = hex.strip_prefix('#').filter(|d| d.len() == 6 && d.is_ascii()) else {
        return String::new();
    };
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    match (channel(0), channel(2), channel(4)) {
        (Some(r), Some(g), Some(b)) => format!("\x1b[38;2;{r};{g};{b}m"),
        _ => String::new(),
    }
}

/// Write markers as aligned rows with a colored depth swatch.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_human<W: Write>(writer: &mut W, markers: &[CircleMarker]) -> io::Result<()> {
    for m in markers {
        let mag = m.magnitude.map_or_else(|| "?".into(), |v| format!("{v:.1}"));
        let depth = m.depth_km.map_or_else(|| "?".into(), |d| format!("{d:.0}"));
        let mag_type = m.mag_type.as_deref().unwrap_or("?");
        let place = m.place.as_deref().unwrap_or("Unknown location");
        let swatch = ansi_color(&m.color);

        writeln!(
            writer,
            "{swatch}{SWATCH}{RESET} {BOLD}M{mag:>4}{RESET} {DIM}{mag_type:<3}{RESET} │ \
             {DIM}{depth:>5}km{RESET} │ \
             r={radius:>7.2} │ \
             {color} │ \
             {place}",
            radius = m.radius,
            color = m.color,
        )?;
    }
    Ok(())
}

/// Write markers as a JSON array.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_json<W: Write>(writer: &mut W, markers: &[CircleMarker]) -> io::Result<()> {
    let json = serde_json::to_string_pretty(markers)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(writer, "{json}")
}

/// Write markers as newline-delimited JSON.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_ndjson<W: Write>(writer: &mut W, markers: &[CircleMarker]) -> io::Result<()> {
    for m in markers {
        let json = serde_json::to_string(m)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        writeln!(writer, "{json}")?;
    }
    Ok(())
}

/// Write markers in the specified format.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_markers<W: Write>(
    writer: &mut W,
    markers: &[CircleMarker],
    format: Format,
) -> io::Result<()> {
    match format {
        Format::Human => write_human(writer, markers),
        Format::Json => write_json(writer, markers),
        Format::Ndjson => write_ndjson(writer, markers),
    }
}

/// Write legend rows, one per line.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_legend<W: Write>(
    writer: &mut W,
    entries: &[LegendEntry],
    format: Format,
) -> io::Result<()> {
    match format {
        Format::Human => {
            writeln!(writer, "{BOLD}Depth (km){RESET}")?;
            for e in entries {
                let swatch = ansi_color(&e.color);
                writeln!(writer, "{swatch}{SWATCH}{RESET} {:<7} {DIM}{}{RESET}", e.range, e.color)?;
            }
            Ok(())
        }
        Format::Json => {
            let json = serde_json::to_string_pretty(entries)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
            writeln!(writer, "{json}")
        }
        Format::Ndjson => {
            for e in entries {
                let json = serde_json::to_string(e)
                    .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
                writeln!(writer, "{json}")?;
            }
            Ok(())
        }
    }
}
