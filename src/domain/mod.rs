//! Domain primitives shared by the services, the API and the CLI.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::SheetKind;

/// The three catalogs the dashboard shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Catalog {
    Anime,
    Manga,
    Movies,
}

impl Catalog {
    /// Session key under which the last filter selection is kept.
    #[must_use]
    pub const fn session_key(self) -> &'static str {
        match self {
            Self::Anime => "filters:anime",
            Self::Manga => "filters:manga",
            Self::Movies => "filters:movies",
        }
    }

    /// The published sheet backing this catalog, if any.
    #[must_use]
    pub const fn sheet_kind(self) -> Option<SheetKind> {
        match self {
            Self::Anime => None,
            Self::Manga => Some(SheetKind::Manga),
            Self::Movies => Some(SheetKind::Movies),
        }
    }
}

impl From<SheetKind> for Catalog {
    fn from(kind: SheetKind) -> Self {
        match kind {
            SheetKind::Manga => Self::Manga,
            SheetKind::Movies => Self::Movies,
        }
    }
}

impl fmt::Display for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Anime => write!(f, "anime"),
            Self::Manga => write!(f, "manga"),
            Self::Movies => write!(f, "movies"),
        }
    }
}

/// Ordering of a catalog view.
///
/// Unknown names parse to [`SortMode::Unchanged`], which keeps the input
/// order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    RatingDesc,
    RatingAsc,
    /// Most recently added first, by secondary identity.
    #[default]
    Newest,
    Oldest,
    NameAsc,
    NameDesc,
    Unchanged,
}

impl SortMode {
    /// Canonical name used in URLs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RatingDesc => "rate_desc",
            Self::RatingAsc => "rate_asc",
            Self::Newest => "date",
            Self::Oldest => "date_old",
            Self::NameAsc => "name_az",
            Self::NameDesc => "name_za",
            Self::Unchanged => "none",
        }
    }
}

impl FromStr for SortMode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "rate_desc" | "my_score_desc" => Self::RatingDesc,
            "rate_asc" | "my_score_asc" => Self::RatingAsc,
            "date" | "date_desc" | "" => Self::Newest,
            "date_old" | "date_asc" => Self::Oldest,
            "name_az" => Self::NameAsc,
            "name_za" => Self::NameDesc,
            _ => Self::Unchanged,
        })
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user's filter selection for one catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    #[serde(default)]
    pub q: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub sort: String,
}

impl FilterState {
    #[must_use]
    pub fn sort_mode(&self) -> SortMode {
        self.sort.parse().unwrap_or_default()
    }

    #[must_use]
    pub fn is_default(&self) -> bool {
        self.q.trim().is_empty()
            && self.kind.is_empty()
            && matches!(self.sort_mode(), SortMode::Newest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_mode_names() {
        assert_eq!("rate_desc".parse::<SortMode>().unwrap(), SortMode::RatingDesc);
        assert_eq!("my_score_asc".parse::<SortMode>().unwrap(), SortMode::RatingAsc);
        assert_eq!("date".parse::<SortMode>().unwrap(), SortMode::Newest);
        assert_eq!("date_asc".parse::<SortMode>().unwrap(), SortMode::Oldest);
        assert_eq!("".parse::<SortMode>().unwrap(), SortMode::Newest);
        assert_eq!("whatever".parse::<SortMode>().unwrap(), SortMode::Unchanged);
    }

    #[test]
    fn test_filter_state_default() {
        assert!(FilterState::default().is_default());
        let state = FilterState {
            q: "naruto".to_string(),
            ..FilterState::default()
        };
        assert!(!state.is_default());
    }
}
