use serde::{Deserialize, Serialize};

use super::de;

/// Relative image paths as returned by the tracker REST API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSet {
    pub original: Option<String>,
    pub preview: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub name: String,
    #[serde(default)]
    pub russian: Option<String>,
}

impl Genre {
    /// Localized name when present, otherwise the original one.
    #[must_use]
    pub fn label(&self) -> &str {
        self.russian
            .as_deref()
            .filter(|r| !r.is_empty())
            .unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Studio {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub kind: Option<String>,
}

/// An anime as the tracker REST API describes it.
///
/// The list endpoint embeds a short form, the item endpoint the long form;
/// both deserialize into this type and every field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimeRecord {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub russian: Option<String>,
    #[serde(default, deserialize_with = "de::string_list")]
    pub english: Vec<String>,
    #[serde(default, deserialize_with = "de::string_list")]
    pub japanese: Vec<String>,
    #[serde(default, deserialize_with = "de::string_list")]
    pub synonyms: Vec<String>,
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub episodes: Option<i32>,
    #[serde(default)]
    pub aired_on: Option<String>,
    #[serde(default, deserialize_with = "de::score")]
    pub score: Option<f64>,
    #[serde(default)]
    pub image: Option<ImageSet>,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub genres: Vec<Genre>,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub studios: Vec<Studio>,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub videos: Vec<Video>,
    #[serde(default)]
    pub description_html: Option<String>,
}

impl AnimeRecord {
    /// Localized title, then the original one.
    #[must_use]
    pub fn display_title(&self) -> Option<&str> {
        self.russian
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.name.as_deref().filter(|s| !s.is_empty()))
    }

    /// Every title variant joined for text search.
    #[must_use]
    pub fn search_text(&self) -> String {
        let mut parts: Vec<&str> = Vec::with_capacity(4 + self.synonyms.len());
        parts.push(self.russian.as_deref().unwrap_or(""));
        parts.push(self.name.as_deref().unwrap_or(""));
        parts.extend(self.english.iter().map(String::as_str));
        parts.extend(self.japanese.iter().map(String::as_str));
        parts.extend(self.synonyms.iter().map(String::as_str));
        parts.join(" ").to_lowercase()
    }

    #[must_use]
    pub fn kind_normalized(&self) -> String {
        self.kind.as_deref().unwrap_or("").to_lowercase()
    }

    #[must_use]
    pub fn aired_year(&self) -> Option<&str> {
        self.aired_on.as_deref().and_then(crate::parser::dates::year_prefix)
    }
}

/// One entry of the owner's rating list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRate {
    pub id: i64,
    /// Zero means "not rated".
    #[serde(default)]
    pub score: i32,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub anime: Option<AnimeRecord>,
    /// Ordering key copied from `id` after fetching; the tracker has no
    /// consistent "added at" field.
    #[serde(default)]
    pub rate_id: i64,
}

impl UserRate {
    #[must_use]
    pub fn user_score(&self) -> Option<i32> {
        (self.score > 0).then_some(self.score)
    }

    #[must_use]
    pub fn anime_id(&self) -> Option<i64> {
        self.anime.as_ref().map(|a| a.id)
    }
}
