//! Isolation of the metric-ton trading table inside a report sheet, and
//! mapping of its rows to [`TradingResult`] records.
//!
//! A report sheet is a loose stack of headers, several tables, footnotes
//! and a decorative empty first column. Exactly one sub-table matters: the
//! one announced by the metric-ton unit marker and closed by the summary
//! row. Extraction strips everything else, including product lines that
//! carry no executed contracts.

use chrono::{NaiveDate, Utc};

use crate::domain::errors::{ExtractionError, ParseError};
use crate::domain::models::TradingResult;
use crate::infrastructure::sheet::{SheetGrid, SheetRow};

/// First-column label of the table of interest. Matched by exact string
/// equality, first occurrence wins.
pub const METRIC_TON_MARKER: &str = "Единица измерения: Метрическая тонна";

/// First-column label of the summary row that closes the table.
pub const SUMMARY_MARKER: &str = "Итого:";

/// Header rows between the marker row and the first data row, in addition
/// to the row immediately below the marker.
const HEADER_OFFSET: usize = 2;

/// The cleaned metric-ton table of one report.
#[derive(Debug, Clone)]
pub struct ReportTable {
    rows: Vec<SheetRow>,
    date: NaiveDate,
}

impl ReportTable {
    /// Locates and cleans the metric-ton table inside a decoded sheet.
    ///
    /// The summary marker is optional (the table then runs to the end of
    /// the sheet), but a summary marker at or above the start marker means
    /// the layout is malformed and the whole extraction fails.
    pub fn extract(grid: SheetGrid, date: NaiveDate) -> Result<Self, ExtractionError> {
        // The leftmost column is decorative and always empty
        let rows: Vec<SheetRow> = grid
            .rows
            .into_iter()
            .map(|row| row.into_iter().skip(1).collect())
            .collect();

        let start = find_marker(&rows, METRIC_TON_MARKER)
            .ok_or(ExtractionError::StartMarkerNotFound)?;
        let end = find_marker(&rows, SUMMARY_MARKER);

        if let Some(end) = end
            && end <= start
        {
            return Err(ExtractionError::MarkersOutOfOrder { start, end });
        }

        // Body starts below the marker row, its unit sub-header and the
        // column header rows
        let body_start = start + 1 + HEADER_OFFSET;
        let body_end = end.unwrap_or(rows.len()).max(body_start);

        let rows = rows
            .into_iter()
            .take(body_end)
            .skip(body_start)
            // No contract count means no executed trades on that line
            .filter(|row| matches!(row.last(), Some(Some(_))))
            .collect();

        Ok(Self { rows, date })
    }

    /// Cleaned data rows, lazily.
    pub fn rows(&self) -> impl Iterator<Item = &SheetRow> {
        self.rows.iter()
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Maps every cleaned row to a record. The first unparsable row fails
    /// the whole report; partial ingestion of a file is worse than none.
    pub fn list_results(&self) -> Result<Vec<TradingResult>, ParseError> {
        self.rows().map(|row| map_row(row, self.date)).collect()
    }
}

fn find_marker(rows: &[SheetRow], marker: &str) -> Option<usize> {
    rows.iter()
        .position(|row| matches!(row.first(), Some(Some(cell)) if cell == marker))
}

/// Converts one cleaned row into a [`TradingResult`].
///
/// Column layout after the decorative-column drop: product code, product
/// name, delivery-basis name, volume, total, then trailing columns ending
/// in the contract count. The three sub-identifiers are sliced out of the
/// product code; a code too short to decompose fails loudly rather than
/// being truncated.
pub fn map_row(row: &[Option<String>], date: NaiveDate) -> Result<TradingResult, ParseError> {
    let now = Utc::now();

    let exchange_product_id = text_cell(row, 0, "exchange_product_id")?;
    if exchange_product_id.len() < 8 || !exchange_product_id.is_ascii() {
        return Err(ParseError::MalformedProductCode {
            code: exchange_product_id,
        });
    }

    let exchange_product_name = text_cell(row, 1, "exchange_product_name")?;
    let delivery_basis_name = text_cell(row, 2, "delivery_basis_name")?;
    let volume = whole_cell(row, 3, "volume")?;
    let total = whole_cell(row, 4, "total")?;
    let count = whole_cell(row, row.len().saturating_sub(1), "count")?;

    let oil_id = exchange_product_id[..4].to_string();
    let delivery_basis_id = exchange_product_id[4..7].to_string();
    let delivery_type_id = exchange_product_id[exchange_product_id.len() - 1..].to_string();

    Ok(TradingResult {
        id: None,
        exchange_product_id,
        exchange_product_name,
        oil_id,
        delivery_basis_id,
        delivery_basis_name,
        delivery_type_id,
        volume,
        total,
        count,
        date,
        created_on: now,
        updated_on: now,
    })
}

fn text_cell(
    row: &[Option<String>],
    index: usize,
    column: &'static str,
) -> Result<String, ParseError> {
    row.get(index)
        .and_then(|cell| cell.clone())
        .ok_or(ParseError::MissingCell { column })
}

fn whole_cell(
    row: &[Option<String>],
    index: usize,
    column: &'static str,
) -> Result<i64, ParseError> {
    let value = text_cell(row, index, column)?;
    let number = parse_whole(&value, column)?;
    if number < 0 {
        return Err(ParseError::NegativeNumber {
            column,
            value: number,
        });
    }
    Ok(number)
}

/// Accepts plain integers and integral floats (`"140"`, `"140.0"`); the
/// decode step can render numeric cells either way.
fn parse_whole(value: &str, column: &'static str) -> Result<i64, ParseError> {
    let trimmed = value.trim();

    if let Ok(number) = trimmed.parse::<i64>() {
        return Ok(number);
    }

    if let Ok(float) = trimmed.parse::<f64>()
        && float.fract() == 0.0
        && float.abs() < i64::MAX as f64
    {
        return Ok(float as i64);
    }

    Err(ParseError::InvalidNumber {
        column,
        value: value.to_string(),
    })
}
