//! Decoding of raw report bytes into a cell grid.
//!
//! The exchange publishes reports as legacy `.xls` workbooks. Decoding
//! stops at a plain grid of optional text cells; locating the table of
//! interest inside the grid is `extract`'s job. The reports print `-` for
//! "no value", so that literal (and blank/whitespace cells) normalizes to
//! `None`.

use std::io::Cursor;

use calamine::{Data, Reader, Xls};

use crate::domain::errors::ExtractionError;

pub type SheetRow = Vec<Option<String>>;

/// Raw rows-by-columns view of one worksheet.
#[derive(Debug, Clone, Default)]
pub struct SheetGrid {
    pub rows: Vec<SheetRow>,
}

impl SheetGrid {
    pub fn new(rows: Vec<SheetRow>) -> Self {
        Self { rows }
    }
}

/// Decodes the first worksheet of an `.xls` workbook.
pub fn decode_xls(bytes: &[u8]) -> Result<SheetGrid, ExtractionError> {
    let mut workbook = Xls::new(Cursor::new(bytes)).map_err(|e| ExtractionError::Decode {
        reason: e.to_string(),
    })?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ExtractionError::Decode {
            reason: "workbook has no sheets".to_string(),
        })?
        .map_err(|e| ExtractionError::Decode {
            reason: e.to_string(),
        })?;

    let rows = range
        .rows()
        .map(|row| row.iter().map(normalize_cell).collect())
        .collect();

    Ok(SheetGrid { rows })
}

fn normalize_cell(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) => normalize_text(s),
        Data::Float(f) => Some(format_number(*f)),
        Data::Int(i) => Some(i.to_string()),
        Data::Bool(b) => Some(b.to_string()),
        Data::DateTime(dt) => Some(format_number(dt.as_f64())),
        Data::DateTimeIso(s) | Data::DurationIso(s) => normalize_text(s),
    }
}

fn normalize_text(s: &str) -> Option<String> {
    let trimmed = s.trim();
    // The reports mark absent values with a bare dash
    if trimmed.is_empty() || trimmed == "-" {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Numeric cells decode as floats even for whole numbers; render those
/// without the trailing `.0` so integer parsing downstream sees `140`,
/// not `140.0`.
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_and_dash_cells_normalize_to_none() {
        assert_eq!(normalize_cell(&Data::Empty), None);
        assert_eq!(normalize_cell(&Data::String("".to_string())), None);
        assert_eq!(normalize_cell(&Data::String("  ".to_string())), None);
        assert_eq!(normalize_cell(&Data::String("-".to_string())), None);
    }

    #[test]
    fn test_text_cells_are_trimmed() {
        assert_eq!(
            normalize_cell(&Data::String("  A100NVY060F ".to_string())),
            Some("A100NVY060F".to_string())
        );
    }

    #[test]
    fn test_whole_floats_lose_their_fraction() {
        assert_eq!(normalize_cell(&Data::Float(140.0)), Some("140".to_string()));
        assert_eq!(normalize_cell(&Data::Float(-5.0)), Some("-5".to_string()));
    }

    #[test]
    fn test_fractional_floats_keep_their_fraction() {
        assert_eq!(
            normalize_cell(&Data::Float(140.5)),
            Some("140.5".to_string())
        );
    }
}
