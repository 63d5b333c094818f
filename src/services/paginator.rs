//! Paged walks over the owner's rating list.

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::clients::FetchError;
use crate::clients::shikimori::ShikimoriClient;
use crate::models::UserRate;

/// Anything that can serve one page of a rating list.
#[async_trait]
pub trait RatePageSource: Send + Sync {
    async fn rates_page(
        &self,
        nickname: &str,
        status: Option<&str>,
        limit: usize,
        page: u32,
    ) -> Result<Vec<UserRate>, FetchError>;
}

#[async_trait]
impl RatePageSource for ShikimoriClient {
    async fn rates_page(
        &self,
        nickname: &str,
        status: Option<&str>,
        limit: usize,
        page: u32,
    ) -> Result<Vec<UserRate>, FetchError> {
        Self::rates_page(self, nickname, status, limit, page).await
    }
}

/// Fetches every page for `status`, stopping at the first short page.
/// Each record gets `rate_id = id`.
pub async fn fetch_all_rates(
    source: &dyn RatePageSource,
    nickname: &str,
    status: &str,
    page_size: usize,
) -> Result<Vec<UserRate>, FetchError> {
    let mut all = Vec::new();
    let mut page = 1;

    loop {
        let mut rates = source
            .rates_page(nickname, Some(status), page_size, page)
            .await?;
        let fetched = rates.len();

        for rate in &mut rates {
            rate.rate_id = rate.id;
        }
        all.append(&mut rates);

        debug!(page, fetched, total = all.len(), "Fetched rates page");

        if fetched < page_size {
            break;
        }
        page += 1;
    }

    Ok(all)
}

/// Walks the unfiltered list until a rate for `anime_id` shows up.
///
/// A failed page ends the search with `None`.
pub async fn find_rate(
    source: &dyn RatePageSource,
    nickname: &str,
    anime_id: i64,
    page_size: usize,
) -> Option<UserRate> {
    let mut page = 1;

    loop {
        let rates = match source.rates_page(nickname, None, page_size, page).await {
            Ok(rates) => rates,
            Err(e) => {
                warn!(page, "Failed to load rates page: {e}");
                return None;
            }
        };
        let fetched = rates.len();

        if let Some(mut found) = rates.into_iter().find(|r| r.anime_id() == Some(anime_id)) {
            found.rate_id = found.id;
            return Some(found);
        }

        if fetched < page_size {
            return None;
        }
        page += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AnimeRecord;
    use std::sync::Mutex;

    /// Serves `total` synthetic rates in pages and records each request.
    struct FakeSource {
        total: usize,
        fail_on_page: Option<u32>,
        requests: Mutex<Vec<(Option<String>, u32)>>,
    }

    impl FakeSource {
        fn new(total: usize) -> Self {
            Self {
                total,
                fail_on_page: None,
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl RatePageSource for FakeSource {
        async fn rates_page(
            &self,
            _nickname: &str,
            status: Option<&str>,
            limit: usize,
            page: u32,
        ) -> Result<Vec<UserRate>, FetchError> {
            self.requests
                .lock()
                .unwrap()
                .push((status.map(str::to_string), page));

            if self.fail_on_page == Some(page) {
                return Err(FetchError::Status {
                    status: 503,
                    body: String::new(),
                });
            }

            let start = (page as usize - 1) * limit;
            let end = (start + limit).min(self.total);
            Ok((start..end)
                .map(|i| UserRate {
                    id: i as i64 + 1,
                    score: 0,
                    status: Some("completed".to_string()),
                    anime: Some(AnimeRecord {
                        id: 10_000 + i as i64,
                        ..AnimeRecord::default()
                    }),
                    rate_id: 0,
                })
                .collect())
        }
    }

    #[tokio::test]
    async fn test_fetch_all_stops_on_short_page() {
        let source = FakeSource::new(510);
        let all = fetch_all_rates(&source, "user", "completed", 500)
            .await
            .unwrap();

        assert_eq!(all.len(), 510);
        assert!(all.iter().all(|r| r.rate_id == r.id));

        let requests = source.requests.lock().unwrap();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0], (Some("completed".to_string()), 1));
        assert_eq!(requests[1].1, 2);
    }

    #[tokio::test]
    async fn test_fetch_all_exact_multiple_needs_empty_page() {
        let source = FakeSource::new(1000);
        let all = fetch_all_rates(&source, "user", "completed", 500)
            .await
            .unwrap();
        assert_eq!(all.len(), 1000);
        assert_eq!(source.requests.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_fetch_all_propagates_status() {
        let mut source = FakeSource::new(900);
        source.fail_on_page = Some(2);
        let err = fetch_all_rates(&source, "user", "completed", 500)
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(503));
    }

    #[tokio::test]
    async fn test_find_rate_walks_pages_without_status() {
        let source = FakeSource::new(700);
        let found = find_rate(&source, "user", 10_600, 500).await.unwrap();
        assert_eq!(found.id, 601);
        assert_eq!(found.rate_id, 601);

        let requests = source.requests.lock().unwrap();
        assert_eq!(requests.len(), 2);
        assert!(requests.iter().all(|(status, _)| status.is_none()));
    }

    #[tokio::test]
    async fn test_find_rate_missing_or_failing() {
        let source = FakeSource::new(20);
        assert!(find_rate(&source, "user", 1, 500).await.is_none());

        let mut source = FakeSource::new(900);
        source.fail_on_page = Some(1);
        assert!(find_rate(&source, "user", 10_000, 500).await.is_none());
    }
}
