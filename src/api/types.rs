use serde::{Deserialize, Serialize};

use crate::domain::FilterState;
use crate::models::{CustomAnnotation, PosterSource, SheetItem, SheetKind, Trailer, UserRate};
use crate::services::{AnimeDetail, SheetDetail};

/// Shown wherever a value is unknown.
pub const MISSING: &str = "—";

const WATCH_URL_BASE: &str = "https://reyohoho-gitlab.vercel.app/#shiki";

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Query string of a catalog listing.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogQuery {
    pub q: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub sort: Option<String>,
    #[serde(default)]
    pub reset: bool,
}

impl CatalogQuery {
    #[must_use]
    pub const fn is_explicit(&self) -> bool {
        self.q.is_some() || self.kind.is_some() || self.sort.is_some()
    }

    #[must_use]
    pub fn to_filter_state(&self) -> FilterState {
        FilterState {
            q: self.q.clone().unwrap_or_default(),
            kind: self.kind.clone().unwrap_or_default(),
            sort: self.sort.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct IdQuery {
    pub id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RowQuery {
    pub row: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CatalogPage<T, S> {
    pub filters: FilterState,
    /// Size of the whole catalog before filtering.
    pub total: usize,
    pub shown: usize,
    pub stats: S,
    pub items: Vec<T>,
}

#[derive(Debug, Serialize)]
pub struct AnimeCardDto {
    pub id: i64,
    pub rate_id: i64,
    pub title: String,
    pub kind: String,
    pub episodes: Option<i32>,
    pub year: Option<String>,
    pub user_score: Option<i32>,
    pub community_score: Option<f64>,
    pub genres: Vec<String>,
    pub poster_url: String,
    pub link: String,
}

impl AnimeCardDto {
    #[must_use]
    pub fn from_rate(rate: &UserRate, poster_url: String) -> Self {
        let anime = rate.anime.as_ref();
        let id = anime.map_or(0, |a| a.id);

        Self {
            id,
            rate_id: rate.rate_id,
            title: anime
                .and_then(|a| a.display_title())
                .unwrap_or(MISSING)
                .to_string(),
            kind: anime
                .and_then(|a| a.kind.as_deref())
                .unwrap_or("")
                .to_uppercase(),
            episodes: anime.and_then(|a| a.episodes).filter(|e| *e > 0),
            year: anime.and_then(|a| a.aired_year()).map(str::to_string),
            user_score: rate.user_score(),
            community_score: anime.and_then(|a| a.score),
            genres: anime
                .map(|a| a.genres.iter().map(|g| g.name.clone()).collect())
                .unwrap_or_default(),
            poster_url,
            link: format!("/api/anime/item?id={id}"),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SheetCardDto {
    pub row: usize,
    pub title: String,
    pub kind: String,
    pub length: String,
    pub year: String,
    pub user_score: Option<f64>,
    pub community_score: Option<f64>,
    pub poster_url: String,
    pub link: String,
}

impl SheetCardDto {
    #[must_use]
    pub fn from_item(kind: SheetKind, item: &SheetItem) -> Self {
        Self {
            row: item.row_index,
            title: item.display_title().to_string(),
            kind: item.kind.clone(),
            length: item.length.clone(),
            year: item.year.clone(),
            user_score: item.my_score,
            community_score: item.score,
            poster_url: if item.poster.is_empty() {
                crate::services::reconcile::placeholder_poster()
            } else {
                item.poster.clone()
            },
            link: format!("/api/{kind}/item?row={}", item.row_index),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SheetStatsDto {
    pub shown: usize,
}

#[derive(Debug, Serialize)]
pub struct AnimeLinks {
    pub tracker: String,
    pub watch: String,
}

#[derive(Debug, Serialize)]
pub struct AnimeDetailDto {
    pub id: i64,
    pub title: String,
    pub subtitle: Option<String>,
    pub english: Vec<String>,
    pub japanese: Vec<String>,
    pub synonyms: Vec<String>,
    pub kind: String,
    pub episodes: Option<i32>,
    pub year: String,
    pub community_score: Option<f64>,
    /// Owner's score, or "—" when unrated or not in the list.
    pub user_score: String,
    pub genres: Vec<String>,
    pub studios: Vec<String>,
    pub poster_url: String,
    pub poster_source: PosterSource,
    pub trailers: Vec<Trailer>,
    pub description_html: Option<String>,
    pub notes: Option<CustomAnnotation>,
    pub links: AnimeLinks,
}

impl AnimeDetailDto {
    #[must_use]
    pub fn from_detail(detail: AnimeDetail, base_url: &str) -> Self {
        let AnimeDetail {
            item, annotation, ..
        } = detail;

        Self {
            id: item.id,
            title: item.display_title().to_string(),
            kind: item
                .kind
                .as_deref()
                .map_or_else(|| MISSING.to_string(), str::to_uppercase),
            year: item.aired_year.clone().unwrap_or_else(|| MISSING.to_string()),
            user_score: item
                .user_score
                .map_or_else(|| MISSING.to_string(), |s| s.to_string()),
            genres: item.genres.iter().map(|g| g.label().to_string()).collect(),
            studios: item.studios.iter().map(|s| s.name.clone()).collect(),
            links: AnimeLinks {
                tracker: format!("{}/animes/{}", base_url.trim_end_matches('/'), item.id),
                watch: format!("{WATCH_URL_BASE}{}", item.id),
            },
            subtitle: item.titles.name,
            english: item.titles.english,
            japanese: item.titles.japanese,
            synonyms: item.titles.synonyms,
            episodes: item.episodes,
            community_score: item.community_score,
            poster_url: item.poster_url,
            poster_source: item.poster_source,
            trailers: item.trailers,
            description_html: item.description_html,
            notes: annotation.filter(|a| !a.is_empty()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SheetDetailDto {
    pub row: usize,
    pub title: String,
    pub subtitle: String,
    pub kind: String,
    pub year: String,
    pub length: String,
    pub poster_url: String,
    pub genres: Vec<String>,
    pub age_rating: String,
    pub status: String,
    pub watch_date: String,
    pub user_score: String,
    pub community_score: String,
    pub release_status: String,
    pub country: String,
    pub voiceover: String,
    pub note: String,
    pub description_html: Option<String>,
    pub tracker_url: Option<String>,
    pub anime_adaptation_link: Option<String>,
}

fn score_label(score: Option<f64>) -> String {
    score.map_or_else(|| MISSING.to_string(), |s| s.to_string())
}

fn or_missing(value: &str) -> String {
    if value.is_empty() {
        MISSING.to_string()
    } else {
        value.to_string()
    }
}

impl SheetDetailDto {
    #[must_use]
    pub fn from_detail(detail: SheetDetail, base_url: &str) -> Self {
        let SheetDetail {
            item,
            description_html,
        } = detail;

        Self {
            row: item.row_index,
            title: item.display_title().to_string(),
            genres: item.genres().into_iter().map(str::to_string).collect(),
            kind: or_missing(&item.kind),
            year: or_missing(&item.year),
            length: or_missing(&item.length),
            poster_url: if item.poster.is_empty() {
                crate::services::reconcile::placeholder_poster()
            } else {
                item.poster.clone()
            },
            user_score: score_label(item.my_score),
            community_score: score_label(item.score),
            tracker_url: item
                .tracker_id
                .map(|id| format!("{}/mangas/{id}", base_url.trim_end_matches('/'))),
            anime_adaptation_link: item
                .anime_adaptation_id
                .map(|id| format!("/api/anime/item?id={id}")),
            subtitle: item.name_orig,
            age_rating: item.age_rating,
            status: item.status,
            watch_date: item.watch_date,
            release_status: item.release_status,
            country: item.country,
            voiceover: item.voiceover,
            note: item.note,
            description_html,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReloadDto {
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct HealthDto {
    pub status: &'static str,
    pub database: bool,
    pub uptime_seconds: u64,
    pub version: &'static str,
}
