use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{FetchError, count_request, decode_json, ensure_success};
use crate::config::TrackerConfig;
use crate::models::{AnimeRecord, UserRate};

/// Path fragment the tracker uses for its "no image" stub.
pub const PLACEHOLDER_PATH: &str = "/assets/globals/missing_original";

#[must_use]
pub fn is_placeholder(path_or_url: &str) -> bool {
    path_or_url.contains(PLACEHOLDER_PATH)
}

/// Absolute URL for a site-relative image path.
#[must_use]
pub fn absolute_url(base_url: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        path.to_string()
    } else {
        format!("{}{}", base_url.trim_end_matches('/'), path)
    }
}

#[derive(Debug, Deserialize)]
struct MangaDescription {
    #[serde(default)]
    description_html: Option<String>,
}

/// REST client for the tracker.
#[derive(Clone)]
pub struct ShikimoriClient {
    client: Client,
    base_url: String,
}

impl ShikimoriClient {
    #[must_use]
    pub fn new(client: Client, config: &TrackerConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn absolute_url(&self, path: &str) -> String {
        absolute_url(&self.base_url, path)
    }

    /// One page of a user's rating list. `status` of `None` lists every
    /// status.
    pub async fn rates_page(
        &self,
        nickname: &str,
        status: Option<&str>,
        limit: usize,
        page: u32,
    ) -> Result<Vec<UserRate>, FetchError> {
        let mut url = format!(
            "{}/api/users/{}/anime_rates?limit={}&page={}",
            self.base_url,
            urlencoding::encode(nickname),
            limit,
            page
        );
        if let Some(status) = status {
            url.push_str("&status=");
            url.push_str(&urlencoding::encode(status));
        }

        debug!(page, ?status, "Fetching rates page");
        count_request("rest");

        let response = self.client.get(&url).send().await?;
        let response = ensure_success(response).await?;
        decode_json(response).await
    }

    pub async fn anime(&self, id: i64) -> Result<AnimeRecord, FetchError> {
        let url = format!("{}/api/animes/{}", self.base_url, id);
        count_request("rest");

        let response = self.client.get(&url).send().await?;
        let response = ensure_success(response).await?;
        decode_json(response).await
    }

    /// `description_html` of a manga, `None` when the tracker has none.
    pub async fn manga_description(&self, id: i64) -> Result<Option<String>, FetchError> {
        let url = format!("{}/api/mangas/{}", self.base_url, id);
        count_request("rest");

        let response = self.client.get(&url).send().await?;
        let response = ensure_success(response).await?;
        let manga: MangaDescription = decode_json(response).await?;
        Ok(manga.description_html.filter(|d| !d.trim().is_empty()))
    }
}
