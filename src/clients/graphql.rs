use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::shikimori::is_placeholder;
use super::{FetchError, count_request, decode_json, ensure_success};
use crate::config::TrackerConfig;
use crate::models::{Genre, Studio};

const ANIME_INFO_QUERY: &str = r"
query ($ids: String!) {
  animes(ids: $ids) {
    id
    poster { mainUrl originalUrl }
    genres { name russian }
    studios { name }
  }
}
";

#[derive(Serialize)]
struct GraphQLRequest<'a> {
    query: &'a str,
    variables: Variables,
}

#[derive(Serialize)]
struct Variables {
    ids: String,
}

#[derive(Deserialize)]
struct GraphQLResponse {
    data: Option<Data>,
    #[serde(default)]
    errors: Option<Vec<GraphQLErrorItem>>,
}

#[derive(Deserialize)]
struct GraphQLErrorItem {
    #[serde(default)]
    message: String,
}

#[derive(Deserialize)]
struct Data {
    #[serde(default)]
    animes: Vec<GqlAnime>,
}

#[derive(Deserialize)]
struct GqlAnime {
    #[serde(default)]
    poster: Option<GqlPoster>,
    #[serde(default)]
    genres: Option<Vec<Genre>>,
    #[serde(default)]
    studios: Option<Vec<Studio>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GqlPoster {
    main_url: Option<String>,
    original_url: Option<String>,
}

/// Supplementary anime data from the GraphQL endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphqlAnimeInfo {
    /// Already filtered: never a placeholder image.
    pub poster_url: Option<String>,
    pub genres: Vec<Genre>,
    pub studios: Vec<Studio>,
}

#[derive(Clone)]
pub struct GraphqlClient {
    client: Client,
    endpoint: String,
}

impl GraphqlClient {
    #[must_use]
    pub fn new(client: Client, config: &TrackerConfig) -> Self {
        Self {
            client,
            endpoint: config.graphql_url.clone(),
        }
    }

    /// Poster, genres and studios for one anime. `Ok(None)` when the
    /// tracker returns no such anime.
    pub async fn anime_info(&self, id: i64) -> Result<Option<GraphqlAnimeInfo>, FetchError> {
        let request = GraphQLRequest {
            query: ANIME_INFO_QUERY,
            variables: Variables { ids: id.to_string() },
        };

        count_request("graphql");

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await?;
        let response = ensure_success(response).await?;
        let body: GraphQLResponse = decode_json(response).await?;
        anime_info_from(body)
    }
}

fn anime_info_from(body: GraphQLResponse) -> Result<Option<GraphqlAnimeInfo>, FetchError> {
    if let Some(errors) = body.errors.filter(|e| !e.is_empty()) {
        let messages: Vec<String> = errors.into_iter().map(|e| e.message).collect();
        return Err(FetchError::Graphql(messages.join("; ")));
    }

    let Some(first) = body.data.and_then(|d| d.animes.into_iter().next()) else {
        return Ok(None);
    };

    let poster_url = first
        .poster
        .and_then(|p| {
            p.main_url
                .filter(|u| !u.is_empty())
                .or(p.original_url.filter(|u| !u.is_empty()))
        })
        .filter(|u| !is_placeholder(u));

    Ok(Some(GraphqlAnimeInfo {
        poster_url,
        genres: first.genres.unwrap_or_default(),
        studios: first.studios.unwrap_or_default(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<Option<GraphqlAnimeInfo>, FetchError> {
        anime_info_from(serde_json::from_str(json).unwrap())
    }

    #[test]
    fn test_errors_array_is_a_failure() {
        let result = parse(r#"{"data": null, "errors": [{"message": "x"}, {"message": "y"}]}"#);
        match result {
            Err(FetchError::Graphql(message)) => assert_eq!(message, "x; y"),
            other => panic!("expected GraphQL error, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_errors_array_is_ignored() {
        let info = parse(r#"{"data": {"animes": [{"genres": [{"name": "Drama"}]}]}, "errors": []}"#)
            .unwrap()
            .unwrap();
        assert_eq!(info.genres[0].name, "Drama");
        assert_eq!(info.poster_url, None);
    }

    #[test]
    fn test_poster_prefers_main_url_and_skips_placeholders() {
        let info = parse(
            r#"{"data": {"animes": [{"poster": {"mainUrl": "", "originalUrl": "https://cdn/o.jpg"}}]}}"#,
        )
        .unwrap()
        .unwrap();
        assert_eq!(info.poster_url.as_deref(), Some("https://cdn/o.jpg"));

        let info = parse(
            r#"{"data": {"animes": [{"poster": {"mainUrl": "https://x/assets/globals/missing_original.jpg"}}]}}"#,
        )
        .unwrap()
        .unwrap();
        assert_eq!(info.poster_url, None);
        assert!(info.studios.is_empty());
    }

    #[test]
    fn test_unknown_anime() {
        assert_eq!(parse(r#"{"data": {"animes": []}}"#).unwrap(), None);
    }
}
