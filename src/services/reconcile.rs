//! Per-field fallback merge of tracker REST data, the GraphQL supplement,
//! manual overrides and generated placeholders.

use crate::clients::graphql::GraphqlAnimeInfo;
use crate::clients::shikimori::{absolute_url, is_placeholder};
use crate::models::{AnimeRecord, PosterSource, RatedItem, Titles, Trailer, UserRate, Video};
use crate::parser::video::{youtube_id, youtube_thumbnail};

const PLACEHOLDER_SVG: &str = "<svg xmlns='http://www.w3.org/2000/svg' width='400' height='600'>\
<rect width='100%' height='100%' fill='#2b2b2b'/>\
<text x='50%' y='50%' dominant-baseline='middle' text-anchor='middle' font-size='20' fill='#999'>No image</text>\
</svg>";

const DEFAULT_TRAILER_NAME: &str = "Трейлер";

/// "No image" poster as an inline SVG data URI.
#[must_use]
pub fn placeholder_poster() -> String {
    format!(
        "data:image/svg+xml;utf8,{}",
        urlencoding::encode(PLACEHOLDER_SVG)
    )
}

/// Detail-page poster: REST original, then GraphQL, then the manual
/// override, then the placeholder.
#[must_use]
pub fn resolve_poster(
    base_url: &str,
    rest_original: Option<&str>,
    graphql: Option<&GraphqlAnimeInfo>,
    override_url: Option<&str>,
) -> (String, PosterSource) {
    if let Some(path) = rest_original.filter(|p| !p.is_empty() && !is_placeholder(p)) {
        return (absolute_url(base_url, path), PosterSource::Rest);
    }

    if let Some(url) = graphql.and_then(|g| g.poster_url.as_deref()) {
        return (url.to_string(), PosterSource::Graphql);
    }

    if let Some(url) = override_url.filter(|u| !u.trim().is_empty()) {
        return (url.to_string(), PosterSource::Override);
    }

    (placeholder_poster(), PosterSource::Placeholder)
}

/// List-card poster: sheet override, then preview, then original, then the
/// placeholder.
#[must_use]
pub fn card_poster(base_url: &str, anime: &AnimeRecord, sheet_override: Option<&str>) -> String {
    if let Some(url) = sheet_override.filter(|u| !u.is_empty()) {
        return url.to_string();
    }

    let image = anime.image.as_ref();
    image
        .and_then(|i| i.preview.as_deref())
        .or_else(|| image.and_then(|i| i.original.as_deref()))
        .filter(|p| !p.is_empty())
        .map_or_else(placeholder_poster, |p| absolute_url(base_url, p))
}

/// The primary list when non-empty, else the supplementary one.
#[must_use]
pub fn prefer_non_empty<T: Clone>(primary: &[T], secondary: Option<&[T]>) -> Vec<T> {
    if primary.is_empty() {
        secondary.map(<[T]>::to_vec).unwrap_or_default()
    } else {
        primary.to_vec()
    }
}

/// Trailers with a URL; YouTube ones get an id and a thumbnail.
#[must_use]
pub fn trailers(videos: &[Video]) -> Vec<Trailer> {
    videos
        .iter()
        .filter_map(|v| {
            let url = v.url.as_deref().filter(|u| !u.is_empty())?;
            let id = youtube_id(url);
            Some(Trailer {
                name: v
                    .name
                    .clone()
                    .filter(|n| !n.is_empty())
                    .unwrap_or_else(|| DEFAULT_TRAILER_NAME.to_string()),
                url: url.to_string(),
                thumbnail_url: id.as_deref().map(youtube_thumbnail),
                youtube_id: id,
            })
        })
        .collect()
}

/// Merges a REST record with its optional supplements into a [`RatedItem`].
#[must_use]
pub fn build_rated_item(
    base_url: &str,
    record: AnimeRecord,
    graphql: Option<&GraphqlAnimeInfo>,
    rate: Option<&UserRate>,
    override_url: Option<&str>,
) -> RatedItem {
    let rest_original = record.image.as_ref().and_then(|i| i.original.as_deref());
    let (poster_url, poster_source) = resolve_poster(base_url, rest_original, graphql, override_url);

    let genres = prefer_non_empty(&record.genres, graphql.map(|g| g.genres.as_slice()));
    let studios = prefer_non_empty(&record.studios, graphql.map(|g| g.studios.as_slice()));
    let trailers = trailers(&record.videos);
    let aired_year = record.aired_year().map(str::to_string);

    RatedItem {
        id: record.id,
        titles: Titles {
            name: record.name,
            russian: record.russian,
            english: record.english,
            japanese: record.japanese,
            synonyms: record.synonyms,
        },
        kind: record.kind,
        episodes: record.episodes,
        aired_year,
        community_score: record.score,
        user_score: rate.and_then(UserRate::user_score),
        genres,
        studios,
        poster_url,
        poster_source,
        trailers,
        description_html: record.description_html.filter(|d| !d.is_empty()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Genre, ImageSet, Studio};

    const BASE: &str = "https://shikimori.one";

    fn genre(name: &str) -> Genre {
        Genre {
            name: name.to_string(),
            russian: None,
        }
    }

    fn gql(poster: Option<&str>, genres: &[&str]) -> GraphqlAnimeInfo {
        GraphqlAnimeInfo {
            poster_url: poster.map(str::to_string),
            genres: genres.iter().map(|g| genre(g)).collect(),
            studios: vec![Studio {
                name: "Madhouse".to_string(),
            }],
        }
    }

    #[test]
    fn test_poster_prefers_rest_original() {
        let info = gql(Some("https://gql/poster.jpg"), &[]);
        let (url, source) = resolve_poster(
            BASE,
            Some("/system/animes/original/1.jpg"),
            Some(&info),
            Some("https://override"),
        );
        assert_eq!(url, "https://shikimori.one/system/animes/original/1.jpg");
        assert_eq!(source, PosterSource::Rest);
    }

    #[test]
    fn test_poster_falls_back_past_placeholder() {
        let info = gql(Some("https://gql/poster.jpg"), &[]);
        let (url, source) = resolve_poster(
            BASE,
            Some("/assets/globals/missing_original.jpg"),
            Some(&info),
            None,
        );
        assert_eq!(url, "https://gql/poster.jpg");
        assert_eq!(source, PosterSource::Graphql);

        let no_poster = gql(None, &[]);
        let (url, source) = resolve_poster(BASE, None, Some(&no_poster), Some("https://override"));
        assert_eq!(url, "https://override");
        assert_eq!(source, PosterSource::Override);

        let (url, source) = resolve_poster(BASE, None, None, None);
        assert!(url.starts_with("data:image/svg+xml"));
        assert_eq!(source, PosterSource::Placeholder);
    }

    #[test]
    fn test_genres_fall_back_to_graphql_only_when_empty() {
        let info = gql(None, &["Drama"]);
        let merged = prefer_non_empty(&[], Some(info.genres.as_slice()));
        assert_eq!(merged, vec![genre("Drama")]);

        let merged = prefer_non_empty(&[genre("Action")], Some(info.genres.as_slice()));
        assert_eq!(merged, vec![genre("Action")]);

        let merged: Vec<Genre> = prefer_non_empty(&[], None);
        assert!(merged.is_empty());
    }

    #[test]
    fn test_build_rated_item() {
        let record = AnimeRecord {
            id: 5,
            name: Some("Mushishi".to_string()),
            image: Some(ImageSet {
                original: Some("/assets/globals/missing_original.jpg".to_string()),
                preview: None,
            }),
            score: Some(8.7),
            videos: vec![
                Video {
                    url: Some("https://youtu.be/xyz".to_string()),
                    name: None,
                    kind: Some("pv".to_string()),
                },
                Video {
                    url: None,
                    name: Some("broken".to_string()),
                    kind: None,
                },
            ],
            ..AnimeRecord::default()
        };
        let rate = UserRate {
            id: 77,
            score: 10,
            status: None,
            anime: None,
            rate_id: 77,
        };
        let info = gql(None, &["Mystery"]);

        let item = build_rated_item(BASE, record, Some(&info), Some(&rate), Some("https://o"));
        assert_eq!(item.poster_source, PosterSource::Override);
        assert_eq!(item.genres, vec![genre("Mystery")]);
        assert_eq!(item.studios.len(), 1);
        assert_eq!(item.user_score, Some(10));
        assert_eq!(item.trailers.len(), 1);
        assert_eq!(item.trailers[0].name, "Трейлер");
        assert_eq!(item.trailers[0].youtube_id.as_deref(), Some("xyz"));
        assert_eq!(item.display_title(), "Mushishi");
    }

    #[test]
    fn test_card_poster_order() {
        let mut anime = AnimeRecord {
            id: 1,
            image: Some(ImageSet {
                original: Some("/o.jpg".to_string()),
                preview: Some("/p.jpg".to_string()),
            }),
            ..AnimeRecord::default()
        };
        assert_eq!(card_poster(BASE, &anime, Some("https://sheet")), "https://sheet");
        assert_eq!(card_poster(BASE, &anime, None), "https://shikimori.one/p.jpg");

        anime.image = None;
        assert!(card_poster(BASE, &anime, None).starts_with("data:image/svg+xml"));
    }
}
