// Spreadsheet import (xlsx, xls, xlsb, ods) via calamine.
//
// Only the first worksheet is read: marketplace exports are single-sheet.

use std::io::{Cursor, Read, Seek};
use std::path::Path;

use calamine::{open_workbook_auto, open_workbook_auto_from_rs, Data, Range, Reader, Sheets};

use crate::error::LoadError;
use crate::table::{HeaderLayout, RawTable};

/// Maximum number of data rows read from one sheet (prevents DoS from huge files)
const MAX_ROWS: usize = 1_048_576;

pub fn import_path(source: &str, path: &Path, layout: HeaderLayout) -> Result<RawTable, LoadError> {
    let workbook: Sheets<_> = open_workbook_auto(path)
        .map_err(|e| LoadError::malformed(source, format!("failed to open spreadsheet: {e}")))?;
    first_sheet_table(source, workbook, layout)
}

pub fn import_bytes(source: &str, bytes: &[u8], layout: HeaderLayout) -> Result<RawTable, LoadError> {
    let workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| LoadError::malformed(source, format!("failed to open spreadsheet: {e}")))?;
    first_sheet_table(source, workbook, layout)
}

fn first_sheet_table<RS: Read + Seek>(
    source: &str,
    mut workbook: Sheets<RS>,
    layout: HeaderLayout,
) -> Result<RawTable, LoadError> {
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| LoadError::malformed(source, "spreadsheet contains no sheets"))?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| LoadError::malformed(source, format!("failed to read sheet '{sheet_name}': {e}")))?;

    table_from_range(source, &range, layout)
}

fn table_from_range(source: &str, range: &Range<Data>, layout: HeaderLayout) -> Result<RawTable, LoadError> {
    let (height, _) = range.get_size();
    if height > MAX_ROWS {
        log::warn!("{source}: sheet truncated from {height} to {MAX_ROWS} rows");
    }

    let records = range
        .rows()
        .take(MAX_ROWS)
        .map(|row| row.iter().map(cell_text).collect::<Vec<_>>());

    RawTable::from_records(source, records, layout)
        .ok_or_else(|| LoadError::malformed(source, "first sheet is empty"))
}

/// Render a cell the way a CSV export of the same sheet would.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => format_float(*f),
        Data::Bool(b) => if *b { "TRUE".into() } else { "FALSE".into() },
        Data::DateTime(dt) => format_float(dt.as_f64()),
        other => other.to_string(),
    }
}

/// Whole floats print without a fractional part ("2", not "2.0").
fn format_float(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        f.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_cells_render_like_csv() {
        assert_eq!(cell_text(&Data::Float(2.0)), "2");
        assert_eq!(cell_text(&Data::Float(-1250.5)), "-1250.5");
        assert_eq!(cell_text(&Data::Int(7)), "7");
        assert_eq!(cell_text(&Data::Empty), "");
        assert_eq!(cell_text(&Data::String("HARYANA".into())), "HARYANA");
    }

    #[test]
    fn range_with_annotation_row() {
        let mut range = Range::new((0, 0), (3, 1));
        range.set_value((0, 0), Data::String("Item Quantity".into()));
        range.set_value((0, 1), Data::String("Customer's Billing State".into()));
        range.set_value((1, 0), Data::String("Number of units".into()));
        range.set_value((1, 1), Data::String("State of the buyer".into()));
        range.set_value((2, 0), Data::Float(3.0));
        range.set_value((2, 1), Data::String("Kerala".into()));
        range.set_value((3, 0), Data::Float(-1.0));
        range.set_value((3, 1), Data::String("Goa".into()));

        let t = table_from_range("fk.xlsx", &range, HeaderLayout::HeaderWithAnnotation).unwrap();
        assert_eq!(t.len(), 2);
        assert_eq!(t.get(0, "Item Quantity"), Some("3"));
        assert_eq!(t.get(1, "Customer's Billing State"), Some("Goa"));
    }

    #[test]
    fn empty_range_is_malformed() {
        let range: Range<Data> = Range::empty();
        let err = table_from_range("blank.xlsx", &range, HeaderLayout::SingleHeader).unwrap_err();
        assert!(matches!(err, LoadError::Malformed { .. }));
    }
}
