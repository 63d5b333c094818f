//! Header normalization and column lookup for spreadsheet exports.
//!
//! Sheet headers are typed by hand, so lookups are tolerant: headers are
//! normalized first and then matched by equality or by substring. Substring
//! matching is loose on purpose (an `id` lookup also hits `video`), which is
//! a known fragility kept for compatibility with the existing sheets.

use std::sync::OnceLock;

use regex::Regex;

fn whitespace() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("static regex"))
}

/// Collapses internal whitespace, trims and lowercases a header cell.
#[must_use]
pub fn normalize_header(cell: &str) -> String {
    whitespace().replace_all(cell, " ").trim().to_lowercase()
}

/// A normalized header row with lookup helpers.
///
/// Every lookup returns `None` for an absent column; callers read cells
/// through [`Header::cell`] which turns `None` into an empty value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    cells: Vec<String>,
}

impl Header {
    #[must_use]
    pub fn new(raw: &[String]) -> Self {
        Self {
            cells: raw.iter().map(|c| normalize_header(c)).collect(),
        }
    }

    #[must_use]
    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    /// First column whose normalized text equals `name`.
    #[must_use]
    pub fn exact(&self, name: &str) -> Option<usize> {
        self.cells.iter().position(|c| c == name)
    }

    /// First column whose normalized text contains `needle`.
    #[must_use]
    pub fn containing(&self, needle: &str) -> Option<usize> {
        self.cells.iter().position(|c| c.contains(needle))
    }

    /// First column that contains any of `needles`.
    #[must_use]
    pub fn containing_any(&self, needles: &[&str]) -> Option<usize> {
        self.cells
            .iter()
            .position(|c| needles.iter().any(|n| c.contains(n)))
    }

    /// First column matching an arbitrary predicate.
    pub fn position(&self, pred: impl Fn(&str) -> bool) -> Option<usize> {
        self.cells.iter().position(|c| pred(c))
    }

    /// Trimmed cell of `row` at `column`, or `""` when the column or the
    /// cell is missing.
    #[must_use]
    pub fn cell<'a>(row: &'a [String], column: Option<usize>) -> &'a str {
        column
            .and_then(|i| row.get(i))
            .map_or("", |c| c.trim())
    }
}

/// Scans `rows` from the top for the first row that has a cell containing
/// `needle` once normalized. Returns the row index and its header.
#[must_use]
pub fn discover_header(rows: &[Vec<String>], needle: &str) -> Option<(usize, Header)> {
    rows.iter().enumerate().find_map(|(i, row)| {
        let header = Header::new(row);
        header.containing(needle).map(|_| (i, header))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| (*c).to_string()).collect()
    }

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header("  Release \t  Status \n"), "release status");
        assert_eq!(normalize_header("ID_Shiki"), "id_shiki");
        assert_eq!(normalize_header(""), "");
    }

    #[test]
    fn test_lookup_by_substring_and_missing() {
        let header = Header::new(&row(&["ID_Shiki", "Name_RU"]));
        assert_eq!(header.containing("id"), Some(0));
        assert_eq!(header.exact("name_ru"), Some(1));
        assert_eq!(header.containing("poster"), None);
        assert_eq!(header.exact("poster"), None);
    }

    #[test]
    fn test_loose_id_match_hits_unrelated_column() {
        // Known fragility: "video" contains "id".
        let header = Header::new(&row(&["Video", "Shiki ID"]));
        assert_eq!(header.containing("id"), Some(0));
    }

    #[test]
    fn test_cell_access_tolerates_missing_columns() {
        let data = row(&["  42 ", "x"]);
        assert_eq!(Header::cell(&data, Some(0)), "42");
        assert_eq!(Header::cell(&data, Some(5)), "");
        assert_eq!(Header::cell(&data, None), "");
    }

    #[test]
    fn test_discover_header_skips_leading_rows() {
        let rows = vec![
            row(&["My anime notes"]),
            row(&["", ""]),
            row(&["Name", "Shiki ID", "Пересмотр"]),
            row(&["Frieren", "52991", "2"]),
        ];
        let (idx, header) = discover_header(&rows, "id").unwrap();
        assert_eq!(idx, 2);
        assert_eq!(header.containing("пересмотр"), Some(2));
    }

    #[test]
    fn test_discover_header_none() {
        let rows = vec![row(&["a", "b"]), row(&["c", "d"])];
        assert!(discover_header(&rows, "id").is_none());
    }
}
