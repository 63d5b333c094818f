//! Manga and movies catalogs backed by published spreadsheet tabs.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::clients::FetchError;
use crate::clients::sheets::SheetsClient;
use crate::clients::shikimori::ShikimoriClient;
use crate::config::SheetsConfig;
use crate::models::{SheetItem, SheetKind};
use crate::parser::dates::first_date_millis;
use crate::parser::{Header, Rows, is_blank_row, parse_csv};
use crate::services::cache::TtlCache;
use crate::services::notes::parse_tracker_id;

#[derive(Debug, Error)]
pub enum SheetError {
    #[error("Failed to load {kind} sheet: {source}")]
    Fetch {
        kind: SheetKind,
        #[source]
        source: FetchError,
    },

    #[error("The {0} sheet is empty")]
    Empty(SheetKind),

    #[error("Invalid row {row}: {kind} data starts at row {first}")]
    InvalidRow {
        kind: SheetKind,
        row: i64,
        first: usize,
    },

    #[error("Row {row} not found in {kind} sheet")]
    RowNotFound { kind: SheetKind, row: usize },
}

/// A sheet row plus the description ready to embed as HTML.
#[derive(Debug, Clone, Serialize)]
pub struct SheetDetail {
    pub item: SheetItem,
    pub description_html: Option<String>,
}

fn leading_float() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)").expect("static regex"))
}

/// Strict number; zero and garbage are absent.
fn strict_number(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite() && *n != 0.0)
}

/// Leading decimal of a score cell, accepting a decimal comma (`8,5`).
fn lenient_score(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let normalized = raw.replacen(',', ".", 1);
    leading_float()
        .find(&normalized)
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// Escapes sheet text for HTML and keeps its line breaks.
#[must_use]
pub fn description_to_html(text: &str) -> String {
    html_escape::encode_quoted_attribute(text)
        .replace("\r\n", "<br>")
        .replace('\n', "<br>")
}

struct MangaColumns {
    id: Option<usize>,
    name_ru: Option<usize>,
    name_orig: Option<usize>,
    kind: Option<usize>,
    year: Option<usize>,
    release_status: Option<usize>,
    chapters: Option<usize>,
    poster: Option<usize>,
    genres: Option<usize>,
    age_rating: Option<usize>,
    status: Option<usize>,
    date: Option<usize>,
    my_score: Option<usize>,
    score: Option<usize>,
    adaptation: Option<usize>,
    description: Option<usize>,
}

impl MangaColumns {
    fn resolve(header: &Header) -> Self {
        Self {
            id: header.exact("id_shiki"),
            name_ru: header.exact("name_ru"),
            name_orig: header.exact("name_orig"),
            kind: header.exact("type"),
            year: header.exact("year"),
            release_status: header.exact("release status"),
            chapters: header.exact("chapters"),
            poster: header.exact("poster"),
            genres: header.exact("genres"),
            age_rating: header.exact("rating"),
            status: header.exact("status"),
            date: header.exact("date"),
            my_score: header.exact("myscore"),
            score: header.exact("score"),
            adaptation: header.exact("anime adaptation"),
            description: header.exact("description"),
        }
    }

    fn item(&self, row_index: usize, row: &[String]) -> SheetItem {
        let get = |column| Header::cell(row, column).to_string();
        let date = get(self.date);

        SheetItem {
            row_index,
            tracker_id: parse_tracker_id(Header::cell(row, self.id)),
            name_ru: get(self.name_ru),
            name_orig: get(self.name_orig),
            kind: get(self.kind),
            year: get(self.year),
            length: get(self.chapters),
            poster: get(self.poster),
            genres_text: get(self.genres),
            age_rating: get(self.age_rating),
            status: get(self.status),
            first_date_ts: first_date_millis(&date),
            watch_date: date,
            my_score: strict_number(Header::cell(row, self.my_score)),
            score: strict_number(Header::cell(row, self.score)),
            description: get(self.description),
            release_status: get(self.release_status),
            anime_adaptation_id: parse_tracker_id(Header::cell(row, self.adaptation)),
            ..SheetItem::default()
        }
    }
}

struct MoviesColumns {
    name_ru: Option<usize>,
    name_orig: Option<usize>,
    kind: Option<usize>,
    country: Option<usize>,
    year: Option<usize>,
    duration: Option<usize>,
    poster: Option<usize>,
    genres: Option<usize>,
    age_rating: Option<usize>,
    status: Option<usize>,
    date: Option<usize>,
    voiceover: Option<usize>,
    my_score: Option<usize>,
    score: Option<usize>,
    note: Option<usize>,
    description: Option<usize>,
}

impl MoviesColumns {
    fn resolve(header: &Header) -> Self {
        Self {
            name_ru: header.containing_any(&["name_ru", "name ru"]),
            name_orig: header.containing_any(&["name_orig", "name orig", "name_original"]),
            kind: header.exact("type"),
            country: header.exact("country"),
            year: header.exact("year"),
            duration: header.containing_any(&["duration", "series", "серии"]),
            poster: header.exact("poster"),
            genres: header.exact("genres"),
            age_rating: header.exact("rating"),
            status: header.exact("status"),
            date: header.exact("date"),
            voiceover: header.exact("voiceover"),
            my_score: header.containing_any(&["my score", "myscore"]),
            score: header.exact("score"),
            note: header.exact("note"),
            description: header.exact("description"),
        }
    }

    fn item(&self, row_index: usize, row: &[String]) -> SheetItem {
        // Dashes mark empty cells in this sheet.
        let get = |column| {
            let value = Header::cell(row, column);
            if value == "-" { String::new() } else { value.to_string() }
        };
        let date = get(self.date);

        SheetItem {
            row_index,
            name_ru: get(self.name_ru),
            name_orig: get(self.name_orig),
            kind: get(self.kind),
            country: get(self.country),
            year: get(self.year),
            length: get(self.duration),
            poster: get(self.poster),
            genres_text: get(self.genres),
            age_rating: get(self.age_rating),
            status: get(self.status),
            first_date_ts: first_date_millis(&date),
            watch_date: date,
            voiceover: get(self.voiceover),
            my_score: strict_number(&get(self.my_score)),
            score: lenient_score(&get(self.score)),
            note: get(self.note),
            description: get(self.description),
            ..SheetItem::default()
        }
    }
}

enum Columns {
    Manga(MangaColumns),
    Movies(MoviesColumns),
}

impl Columns {
    fn resolve(kind: SheetKind, header: &Header) -> Self {
        match kind {
            SheetKind::Manga => Self::Manga(MangaColumns::resolve(header)),
            SheetKind::Movies => Self::Movies(MoviesColumns::resolve(header)),
        }
    }

    fn item(&self, row_index: usize, row: &[String]) -> SheetItem {
        match self {
            Self::Manga(c) => c.item(row_index, row),
            Self::Movies(c) => c.item(row_index, row),
        }
    }
}

/// Every non-blank data row of a sheet. Row 0 is the header.
#[must_use]
pub fn parse_sheet(kind: SheetKind, rows: &Rows) -> Vec<SheetItem> {
    let Some(header_row) = rows.first() else {
        return Vec::new();
    };
    let columns = Columns::resolve(kind, &Header::new(header_row));

    rows.iter()
        .enumerate()
        .skip(kind.first_data_row())
        .filter(|(_, row)| !is_blank_row(row))
        .map(|(i, row)| columns.item(i, row))
        .collect()
}

/// One row by its index in the sheet.
pub fn sheet_row(kind: SheetKind, rows: &Rows, row: usize) -> Result<SheetItem, SheetError> {
    let header_row = rows.first().ok_or(SheetError::Empty(kind))?;
    if row < kind.first_data_row() || row >= rows.len() {
        return Err(SheetError::RowNotFound { kind, row });
    }
    let columns = Columns::resolve(kind, &Header::new(header_row));
    Ok(columns.item(row, &rows[row]))
}

/// Checks a requested row index before anything is fetched.
pub fn validate_row(kind: SheetKind, row: i64) -> Result<usize, SheetError> {
    usize::try_from(row)
        .ok()
        .filter(|r| *r >= kind.first_data_row())
        .ok_or(SheetError::InvalidRow {
            kind,
            row,
            first: kind.first_data_row(),
        })
}

#[derive(Clone)]
pub struct SheetCatalogService {
    sheets: SheetsClient,
    shikimori: ShikimoriClient,
    cache: TtlCache,
    config: SheetsConfig,
}

impl SheetCatalogService {
    #[must_use]
    pub const fn new(
        sheets: SheetsClient,
        shikimori: ShikimoriClient,
        cache: TtlCache,
        config: SheetsConfig,
    ) -> Self {
        Self {
            sheets,
            shikimori,
            cache,
            config,
        }
    }

    fn url(&self, kind: SheetKind) -> &str {
        match kind {
            SheetKind::Manga => &self.config.manga_url,
            SheetKind::Movies => &self.config.movies_url,
        }
    }

    async fn fetch_rows(&self, kind: SheetKind) -> Result<Rows, SheetError> {
        let text = self
            .sheets
            .fetch_csv(self.url(kind))
            .await
            .map_err(|source| SheetError::Fetch { kind, source })?;
        Ok(parse_csv(&text))
    }

    /// The whole catalog, from cache when fresh.
    pub async fn load(&self, kind: SheetKind) -> Result<Vec<SheetItem>, SheetError> {
        if let Some(mut items) = self.cache.get::<Vec<SheetItem>>(kind.cache_key()).await {
            for item in &mut items {
                if item.first_date_ts == 0 {
                    item.first_date_ts = first_date_millis(&item.watch_date);
                }
            }
            return Ok(items);
        }

        let rows = self.fetch_rows(kind).await?;
        let items = parse_sheet(kind, &rows);
        info!(sheet = %kind, count = items.len(), "Loaded sheet catalog");

        self.cache.set(kind.cache_key(), &items).await;
        Ok(items)
    }

    /// Drops the cached copy and fetches again.
    pub async fn reload(&self, kind: SheetKind) -> Result<Vec<SheetItem>, SheetError> {
        self.cache.remove(kind.cache_key()).await;
        self.load(kind).await
    }

    /// A single row read fresh from the sheet.
    pub async fn detail(&self, kind: SheetKind, row: i64) -> Result<SheetDetail, SheetError> {
        let row = validate_row(kind, row)?;
        let rows = self.fetch_rows(kind).await?;
        let item = sheet_row(kind, &rows, row)?;

        let description_html = if !item.description.is_empty() {
            Some(description_to_html(&item.description))
        } else if let (SheetKind::Manga, Some(id)) = (kind, item.tracker_id) {
            self.tracker_description(id).await
        } else {
            None
        };

        Ok(SheetDetail {
            item,
            description_html,
        })
    }

    async fn tracker_description(&self, manga_id: i64) -> Option<String> {
        match self.shikimori.manga_description(manga_id).await {
            Ok(description) => description,
            Err(e) => {
                warn!(manga_id, "Failed to load manga description: {e}");
                None
            }
        }
    }
}
