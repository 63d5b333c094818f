//! The anime-notes sheet: personal annotations and card poster overrides,
//! keyed by tracker id.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::models::CustomAnnotation;
use crate::parser::{Header, Rows, discover_header};

fn commented_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)с\s*заком").expect("static regex"))
}

/// Tracker id from a sheet cell. `-`, blanks and non-numbers are absent.
#[must_use]
pub fn parse_tracker_id(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if raw.is_empty() || raw == "-" {
        return None;
    }
    if let Ok(id) = raw.parse::<i64>() {
        return Some(id);
    }
    #[allow(clippy::cast_possible_truncation)]
    raw.parse::<f64>()
        .ok()
        .filter(|f| f.is_finite() && f.fract() == 0.0)
        .map(|f| f as i64)
}

fn non_empty(cell: &str) -> Option<String> {
    let cell = cell.trim();
    (!cell.is_empty()).then(|| cell.to_string())
}

/// Resolved columns of the notes sheet.
struct NotesColumns {
    id: Option<usize>,
    rewatch: Option<usize>,
    date: Option<usize>,
    voice: Option<usize>,
    commented: Option<usize>,
    poster: Option<usize>,
}

impl NotesColumns {
    fn resolve(header: &Header) -> Self {
        Self {
            id: header.containing("id"),
            rewatch: header.containing("пересмотр"),
            date: header.containing("дата"),
            voice: header.containing("озвучк"),
            commented: header.containing("коммент"),
            poster: header.containing_any(&["poster", "постер"]),
        }
    }
}

/// Data rows of the notes sheet with their tracker id.
fn data_rows(rows: &Rows) -> Option<(NotesColumns, Vec<(i64, &Vec<String>)>)> {
    let (header_idx, header) = discover_header(rows, "id")?;
    let columns = NotesColumns::resolve(&header);

    let data = rows
        .iter()
        .skip(header_idx + 1)
        .filter(|row| !row.is_empty())
        .filter_map(|row| parse_tracker_id(Header::cell(row, columns.id)).map(|id| (id, row)))
        .collect();

    Some((columns, data))
}

/// Annotations per tracker id. Later rows win on duplicate ids.
#[must_use]
pub fn parse_annotations(rows: &Rows) -> HashMap<i64, CustomAnnotation> {
    let Some((columns, data)) = data_rows(rows) else {
        return HashMap::new();
    };

    data.into_iter()
        .map(|(id, row)| {
            let commented = non_empty(Header::cell(row, columns.commented))
                .is_some_and(|c| commented_regex().is_match(&c));
            let ongoing = row.iter().any(|c| c.to_lowercase().contains("онгоинг"));

            let annotation = CustomAnnotation {
                rewatch: non_empty(Header::cell(row, columns.rewatch)),
                watch_date: non_empty(Header::cell(row, columns.date)),
                voice_over: non_empty(Header::cell(row, columns.voice)),
                commented,
                ongoing,
            };
            (id, annotation)
        })
        .collect()
}

/// Card poster overrides per tracker id.
#[must_use]
pub fn parse_poster_overrides(rows: &Rows) -> HashMap<i64, String> {
    let Some((columns, data)) = data_rows(rows) else {
        return HashMap::new();
    };
    if columns.poster.is_none() {
        return HashMap::new();
    }

    data.into_iter()
        .filter_map(|(id, row)| {
            let poster = Header::cell(row, columns.poster);
            (!poster.is_empty() && poster != "-").then(|| (id, poster.to_string()))
        })
        .collect()
}
