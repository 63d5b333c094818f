//! Permissive CSV reader for published spreadsheets.
//!
//! Google Sheets exports are well-formed most of the time, but hand-edited
//! cells regularly contain stray quotes. The reader never fails: it walks the
//! input once with a single quote toggle and keeps whatever it collected.

/// A parsed table: rows of cells, in source order.
pub type Rows = Vec<Vec<String>>;

/// Parses `text` into rows of cells.
///
/// - `,` separates cells, `\r`, `\n` or `\r\n` separate rows (outside quotes).
/// - Inside quotes, separators and line breaks are literal and `""` is one `"`.
/// - Blank lines produce no row; a final row without a line break is kept.
#[must_use]
pub fn parse_csv(text: &str) -> Rows {
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut cell = String::new();
    let mut in_quotes = false;

    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if in_quotes && chars.peek() == Some(&'"') {
                    cell.push('"');
                    chars.next();
                } else {
                    in_quotes = !in_quotes;
                }
            }
            ',' if !in_quotes => row.push(std::mem::take(&mut cell)),
            '\n' | '\r' if !in_quotes => {
                if !cell.is_empty() || !row.is_empty() {
                    row.push(std::mem::take(&mut cell));
                    rows.push(std::mem::take(&mut row));
                }
            }
            _ => cell.push(ch),
        }
    }

    if !cell.is_empty() || !row.is_empty() {
        row.push(cell);
        rows.push(row);
    }

    rows
}

/// Returns `true` when every cell of the row is blank.
#[must_use]
pub fn is_blank_row(row: &[String]) -> bool {
    row.iter().all(|c| c.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quoted_separator_and_escaped_quote() {
        let rows = parse_csv("a,\"b,c\"\nd,\"e\"\"f\"");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], vec!["a", "b,c"]);
        assert_eq!(rows[1], vec!["d", "e\"f"]);
    }

    #[test]
    fn test_line_endings() {
        let rows = parse_csv("a,b\r\nc,d\re,f\n");
        assert_eq!(
            rows,
            vec![
                vec!["a".to_string(), "b".to_string()],
                vec!["c".to_string(), "d".to_string()],
                vec!["e".to_string(), "f".to_string()],
            ]
        );
    }

    #[test]
    fn test_multiline_quoted_cell() {
        let rows = parse_csv("id,description\n1,\"first line\nsecond line\"\n");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1][1], "first line\nsecond line");
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let rows = parse_csv("a,b\n\n\n\nc,d\n\n");
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_trailing_cell_without_newline() {
        let rows = parse_csv("a,b\nc,");
        assert_eq!(rows[1], vec!["c", ""]);

        let rows = parse_csv("x");
        assert_eq!(rows, vec![vec!["x".to_string()]]);
    }

    #[test]
    fn test_row_of_empty_cells_is_kept() {
        // Only fully empty lines vanish; a line of separators is still a row.
        let rows = parse_csv("a,b\n,\nc,d");
        assert_eq!(rows.len(), 3);
        assert!(is_blank_row(&rows[1]));
    }

    #[test]
    fn test_unbalanced_quote_does_not_fail() {
        let rows = parse_csv("a,\"unterminated\nb,c");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][1], "unterminated\nb,c");
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_csv("").is_empty());
        assert!(parse_csv("\r\n\n").is_empty());
    }
}
