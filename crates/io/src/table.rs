use serde::Deserialize;

/// Where data rows begin relative to the header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderLayout {
    /// Row 1 is the header, everything after is data.
    #[default]
    SingleHeader,
    /// Row 1 is the header, row 2 is a description/annotation row that is discarded.
    HeaderWithAnnotation,
}

impl HeaderLayout {
    fn skipped_rows(&self) -> usize {
        match self {
            Self::SingleHeader => 0,
            Self::HeaderWithAnnotation => 1,
        }
    }
}

/// A loaded sheet: trimmed header names and untyped string cells.
///
/// Rows may be shorter than the header (ragged CSV); missing trailing cells
/// read as empty strings.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    source: String,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Build a table from raw records. The first non-blank record is the
    /// header; the layout's annotation row is the record right after it,
    /// blank or not. Blank data records (every cell empty after trimming)
    /// are dropped.
    pub fn from_records<I>(source: &str, records: I, layout: HeaderLayout) -> Option<Self>
    where
        I: IntoIterator<Item = Vec<String>>,
    {
        let mut records = records.into_iter().skip_while(|r| is_blank(r));

        let headers: Vec<String> = records.next()?.iter().map(|h| h.trim().to_string()).collect();
        let rows: Vec<Vec<String>> = records
            .skip(layout.skipped_rows())
            .filter(|r| !is_blank(r))
            .collect();

        Some(Self { source: source.to_string(), headers, rows })
    }

    /// Build directly from headers and rows (tests and programmatic callers).
    pub fn new(source: &str, headers: &[&str], rows: Vec<Vec<String>>) -> Self {
        Self {
            source: source.to_string(),
            headers: headers.iter().map(|h| h.trim().to_string()).collect(),
            rows,
        }
    }

    /// File name the table was loaded from.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column, matched exactly (case-sensitive). First match wins.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Required columns that this table does not carry, in the order given.
    pub fn missing_columns(&self, required: &[&str]) -> Vec<String> {
        required
            .iter()
            .filter(|c| self.column_index(c).is_none())
            .map(|c| c.to_string())
            .collect()
    }

    /// Cell at (row, column index); empty when the row is short.
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(|s| s.as_str())
            .unwrap_or("")
    }

    /// Cell by column name; `None` when the column does not exist.
    pub fn get(&self, row: usize, column: &str) -> Option<&str> {
        self.column_index(column).map(|c| self.cell(row, c))
    }

    /// Distinct trimmed, non-empty values of a column, sorted.
    pub fn distinct(&self, column: &str) -> Vec<String> {
        let Some(col) = self.column_index(column) else {
            return Vec::new();
        };
        let mut values: Vec<String> = (0..self.rows.len())
            .map(|r| self.cell(r, col).trim().to_string())
            .filter(|v| !v.is_empty())
            .collect();
        values.sort();
        values.dedup();
        values
    }
}

fn is_blank(record: &[String]) -> bool {
    record.iter().all(|c| c.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter().map(|r| r.iter().map(|c| c.to_string()).collect()).collect()
    }

    #[test]
    fn headers_are_trimmed_and_exact() {
        let t = RawTable::from_records(
            "t.csv",
            records(&[&[" SKU ", "Quantity"], &["A1", "3"]]),
            HeaderLayout::SingleHeader,
        )
        .unwrap();
        assert_eq!(t.column_index("SKU"), Some(0));
        assert_eq!(t.column_index("sku"), None);
        assert_eq!(t.get(0, "Quantity"), Some("3"));
    }

    #[test]
    fn annotation_row_is_discarded() {
        let t = RawTable::from_records(
            "t.xlsx",
            records(&[&["state", "qty"], &["Billing state", "Units sold"], &["GOA", "1"], &["ASSAM", "2"]]),
            HeaderLayout::HeaderWithAnnotation,
        )
        .unwrap();
        assert_eq!(t.len(), 2);
        assert_eq!(t.cell(0, 0), "GOA");
    }

    #[test]
    fn blank_annotation_row_still_counts_as_the_annotation() {
        let t = RawTable::from_records(
            "fk.csv",
            records(&[&["state", "qty"], &["", ""], &["GOA", "1"], &["KERALA", "2"]]),
            HeaderLayout::HeaderWithAnnotation,
        )
        .unwrap();
        assert_eq!(t.len(), 2);
        assert_eq!(t.cell(0, 0), "GOA");
    }

    #[test]
    fn blank_rows_dropped_and_short_rows_padded() {
        let t = RawTable::from_records(
            "t.csv",
            records(&[&["", ""], &["a", "b", "c"], &["  ", ""], &["1"]]),
            HeaderLayout::SingleHeader,
        )
        .unwrap();
        assert_eq!(t.headers(), &["a", "b", "c"]);
        assert_eq!(t.len(), 1);
        assert_eq!(t.cell(0, 2), "");
        assert_eq!(t.cell(5, 0), "");
    }

    #[test]
    fn empty_input_has_no_table() {
        assert!(RawTable::from_records("t.csv", Vec::new(), HeaderLayout::SingleHeader).is_none());
    }

    #[test]
    fn missing_columns_preserve_request_order() {
        let t = RawTable::new("t.csv", &["quantity", "tax_amount"], vec![]);
        assert_eq!(
            t.missing_columns(&["end_customer_state_new", "quantity", "total_taxable_sale_value"]),
            vec!["end_customer_state_new", "total_taxable_sale_value"]
        );
    }

    #[test]
    fn distinct_values_sorted() {
        let t = RawTable::new(
            "t.csv",
            &["Seller GSTIN"],
            records(&[&["06BBB"], &["06AAA"], &[" 06BBB "], &[""]]),
        );
        assert_eq!(t.distinct("Seller GSTIN"), vec!["06AAA", "06BBB"]);
        assert!(t.distinct("missing").is_empty());
    }
}
