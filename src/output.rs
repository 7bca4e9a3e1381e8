//! Output formatters for tree records.
//!
//! Supports human-readable (with colors), JSON, and NDJSON formats.
//! Human output keeps the Dutch labels of the inventory app.

use std::io::{self, Write};

use serde::Serialize;

use crate::filters::TaggedTree;
use crate::models::Tree;

// ANSI color codes
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[92m";

const ICON_TREE: &str = "🌳";

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

/// Normalized row for list output, optionally tagged with a distance.
#[derive(Debug, Clone, Serialize)]
pub struct TreeRow {
    pub id: i64,
    pub name: Option<String>,
    pub description: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub height_m: Option<f64>,
    pub diameter_cm: Option<f64>,
    pub added_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_m: Option<f64>,
}

impl From<&Tree> for TreeRow {
    fn from(tree: &Tree) -> Self {
        Self {
            id: tree.id,
            name: tree.name.clone(),
            description: tree.description.clone(),
            latitude: tree.latitude,
            longitude: tree.longitude,
            height_m: tree.height,
            diameter_cm: tree.diameter,
            added_at: tree.added_at.map(|t| t.to_rfc3339()),
            distance_m: None,
        }
    }
}

impl From<&TaggedTree> for TreeRow {
    fn from(tagged: &TaggedTree) -> Self {
        let mut row = Self::from(&tagged.tree);
        row.distance_m = Some(tagged.distance_m);
        row
    }
}

/// Write rows in human-readable list format.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_human<W: Write>(writer: &mut W, rows: &[TreeRow]) -> io::Result<()> {
    for row in rows {
        let name = row.name.as_deref().unwrap_or("Naamloos");

        let distance = row
            .distance_m
            .map(|d| format!(" │ {GREEN}{d:.2} meter verwijderd{RESET}"))
            .unwrap_or_default();

        writeln!(
            writer,
            "{ICON_TREE} {BOLD}Boom #{}{RESET} │ {name} │ \
             {DIM}{:.6}, {:.6}{RESET}{distance}",
            row.id, row.latitude, row.longitude
        )?;
    }
    Ok(())
}

/// Write a single tree as a detail card.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_detail<W: Write>(writer: &mut W, row: &TreeRow) -> io::Result<()> {
    writeln!(writer, "{ICON_TREE} {BOLD}Boom #{}{RESET}", row.id)?;
    writeln!(writer, "  Naam:         {}", row.name.as_deref().unwrap_or("Naamloos"))?;
    writeln!(
        writer,
        "  Beschrijving: {}",
        row.description.as_deref().unwrap_or("N.v.t")
    )?;
    writeln!(
        writer,
        "  Hoogte:       {}",
        row.height_m.map_or("onbekend".into(), |h| format!("{h} meter"))
    )?;
    writeln!(
        writer,
        "  Diameter:     {}",
        row.diameter_cm.map_or("onbekend".into(), |d| format!("{d} cm"))
    )?;
    writeln!(
        writer,
        "  Coördinaten:  {:.6}, {:.6}",
        row.latitude, row.longitude
    )?;
    if let Some(added) = &row.added_at {
        writeln!(writer, "  Toegevoegd:   {added}")?;
    }
    Ok(())
}

/// Write rows as a JSON array.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_json<W: Write>(writer: &mut W, rows: &[TreeRow]) -> io::Result<()> {
    let json = serde_json::to_string_pretty(rows)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(writer, "{json}")
}

/// Write rows as newline-delimited JSON.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_ndjson<W: Write>(writer: &mut W, rows: &[TreeRow]) -> io::Result<()> {
    for row in rows {
        let json = serde_json::to_string(row)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        writeln!(writer, "{json}")?;
    }
    Ok(())
}

/// Write rows in the specified format.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_rows<W: Write>(writer: &mut W, rows: &[TreeRow], format: Format) -> io::Result<()> {
    match format {
        Format::Human => write_human(writer, rows),
        Format::Json => write_json(writer, rows),
        Format::Ndjson => write_ndjson(writer, rows),
    }
}
