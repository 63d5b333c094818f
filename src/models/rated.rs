use serde::{Deserialize, Serialize};

use super::rate::{Genre, Studio};

/// Where the final poster URL came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PosterSource {
    Rest,
    Graphql,
    Override,
    Placeholder,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Titles {
    pub name: Option<String>,
    pub russian: Option<String>,
    pub english: Vec<String>,
    pub japanese: Vec<String>,
    pub synonyms: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trailer {
    pub name: String,
    pub url: String,
    pub youtube_id: Option<String>,
    pub thumbnail_url: Option<String>,
}

/// A tracker anime after merging REST data with the GraphQL supplement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatedItem {
    pub id: i64,
    pub titles: Titles,
    pub kind: Option<String>,
    pub episodes: Option<i32>,
    pub aired_year: Option<String>,
    pub community_score: Option<f64>,
    pub user_score: Option<i32>,
    pub genres: Vec<Genre>,
    pub studios: Vec<Studio>,
    pub poster_url: String,
    pub poster_source: PosterSource,
    pub trailers: Vec<Trailer>,
    pub description_html: Option<String>,
}

impl RatedItem {
    #[must_use]
    pub fn display_title(&self) -> &str {
        self.titles
            .russian
            .as_deref()
            .filter(|s| !s.is_empty())
            .or(self.titles.name.as_deref())
            .unwrap_or("—")
    }
}
