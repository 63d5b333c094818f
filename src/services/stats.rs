use serde::Serialize;

use crate::models::{SheetItem, UserRate};
use crate::services::catalog::MovieCategory;

const MINUTES_PER_EPISODE: f64 = 24.0;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnimeStats {
    pub tv: usize,
    pub movie: usize,
    pub ova: usize,
    pub ona: usize,
    pub special: usize,
    pub total: usize,
    pub episodes: i64,
    /// Watch time at 24 minutes per episode, one decimal.
    pub hours: f64,
    /// Two decimals.
    pub days: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MovieStats {
    pub films: usize,
    pub series: usize,
    pub dramas: usize,
    pub cartoons: usize,
    pub total: usize,
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[must_use]
pub fn anime_stats(list: &[UserRate]) -> AnimeStats {
    let mut stats = AnimeStats {
        total: list.len(),
        ..AnimeStats::default()
    };

    for anime in list.iter().filter_map(|r| r.anime.as_ref()) {
        match anime.kind_normalized().as_str() {
            "tv" => stats.tv += 1,
            "movie" => stats.movie += 1,
            "ova" => stats.ova += 1,
            "ona" => stats.ona += 1,
            "special" | "tv_special" => stats.special += 1,
            _ => {}
        }
        stats.episodes += i64::from(anime.episodes.unwrap_or(0).max(0));
    }

    #[allow(clippy::cast_precision_loss)]
    let hours = stats.episodes as f64 * MINUTES_PER_EPISODE / 60.0;
    stats.hours = round_to(hours, 1);
    stats.days = round_to(hours / 24.0, 2);
    stats
}

#[must_use]
pub fn movie_stats(list: &[SheetItem]) -> MovieStats {
    let mut stats = MovieStats {
        total: list.len(),
        ..MovieStats::default()
    };

    for item in list {
        match MovieCategory::classify(&item.kind) {
            Some(MovieCategory::Cartoon) => stats.cartoons += 1,
            Some(MovieCategory::Drama) => stats.dramas += 1,
            Some(MovieCategory::Series) => stats.series += 1,
            Some(MovieCategory::Film) => stats.films += 1,
            None => {}
        }
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AnimeRecord;

    fn rate(kind: &str, episodes: Option<i32>) -> UserRate {
        UserRate {
            id: 1,
            score: 0,
            status: None,
            anime: Some(AnimeRecord {
                id: 1,
                kind: Some(kind.to_string()),
                episodes,
                ..AnimeRecord::default()
            }),
            rate_id: 1,
        }
    }

    #[test]
    fn test_anime_stats() {
        let list = vec![
            rate("tv", Some(12)),
            rate("TV", Some(13)),
            rate("movie", Some(1)),
            rate("tv_special", Some(1)),
            rate("special", None),
            rate("music", Some(3)),
        ];

        let stats = anime_stats(&list);
        assert_eq!(stats.tv, 2);
        assert_eq!(stats.movie, 1);
        assert_eq!(stats.special, 2);
        assert_eq!(stats.total, 6);
        assert_eq!(stats.episodes, 30);
        assert!((stats.hours - 12.0).abs() < f64::EPSILON);
        assert!((stats.days - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_movie_stats() {
        let items: Vec<SheetItem> = ["Фильм", "М/ф", "Сериал", "Дорама", "Мультфильм", "?"]
            .iter()
            .map(|kind| SheetItem {
                kind: (*kind).to_string(),
                ..SheetItem::default()
            })
            .collect();

        let stats = movie_stats(&items);
        assert_eq!(
            stats,
            MovieStats {
                films: 2,
                series: 1,
                dramas: 1,
                cartoons: 1,
                total: 6,
            }
        );
    }
}
