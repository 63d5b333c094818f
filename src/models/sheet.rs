use serde::{Deserialize, Serialize};
use std::fmt;

/// Which published sheet a row came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SheetKind {
    Manga,
    Movies,
}

impl SheetKind {
    /// First row index that can hold data.
    #[must_use]
    pub const fn first_data_row(self) -> usize {
        match self {
            Self::Manga => 1,
            // Row 1 of the movies sheet is a divider under the header.
            Self::Movies => 2,
        }
    }

    #[must_use]
    pub const fn cache_key(self) -> &'static str {
        match self {
            Self::Manga => "manga_sheet_data",
            Self::Movies => "moves_sheet_data",
        }
    }
}

impl fmt::Display for SheetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Manga => write!(f, "manga"),
            Self::Movies => write!(f, "movies"),
        }
    }
}

/// A catalog entry whose source of truth is a spreadsheet row.
///
/// Text fields are empty strings when the sheet leaves them blank; numeric
/// fields are `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SheetItem {
    /// Row index in the published sheet, stable identity for detail links.
    pub row_index: usize,
    #[serde(default)]
    pub tracker_id: Option<i64>,
    #[serde(default)]
    pub name_ru: String,
    #[serde(default)]
    pub name_orig: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub year: String,
    /// Chapter count for manga, duration or series count for movies.
    #[serde(default)]
    pub length: String,
    #[serde(default)]
    pub poster: String,
    #[serde(default)]
    pub genres_text: String,
    #[serde(default)]
    pub age_rating: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub watch_date: String,
    #[serde(default)]
    pub my_score: Option<f64>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub release_status: String,
    #[serde(default)]
    pub anime_adaptation_id: Option<i64>,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub voiceover: String,
    /// Epoch millis of the first date in `watch_date`, 0 when unknown.
    #[serde(default)]
    pub first_date_ts: i64,
}

impl SheetItem {
    #[must_use]
    pub fn display_title(&self) -> &str {
        if !self.name_ru.is_empty() {
            &self.name_ru
        } else if !self.name_orig.is_empty() {
            &self.name_orig
        } else {
            "—"
        }
    }

    #[must_use]
    pub fn genres(&self) -> Vec<&str> {
        self.genres_text
            .split(',')
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .collect()
    }
}
