use reqwest::Client;
use url::Url;

use super::{FetchError, count_request, ensure_success};

/// Fetches published spreadsheet tabs as CSV text.
#[derive(Clone)]
pub struct SheetsClient {
    client: Client,
}

impl SheetsClient {
    #[must_use]
    pub const fn new(client: Client) -> Self {
        Self { client }
    }

    pub async fn fetch_csv(&self, csv_url: &str) -> Result<String, FetchError> {
        let now_ms = chrono::Utc::now().timestamp_millis();
        let url = with_cachebust(csv_url, now_ms)?;

        count_request("sheets");

        let response = self.client.get(url).send().await?;
        let response = ensure_success(response).await?;
        Ok(response.text().await?)
    }
}

/// Appends `cachebust=floor(now_ms / 60000)` so the publishing CDN serves a
/// copy at most a minute old.
pub fn with_cachebust(csv_url: &str, now_ms: i64) -> Result<Url, FetchError> {
    let mut url = Url::parse(csv_url).map_err(|e| FetchError::Decode(format!("{csv_url}: {e}")))?;
    url.query_pairs_mut()
        .append_pair("cachebust", &(now_ms / 60_000).to_string());
    Ok(url)
}
