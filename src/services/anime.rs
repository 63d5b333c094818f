//! The owner's anime library: cached rating list, card posters and the
//! reconciled detail view.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::clients::FetchError;
use crate::clients::graphql::GraphqlClient;
use crate::clients::sheets::SheetsClient;
use crate::clients::shikimori::ShikimoriClient;
use crate::config::TrackerConfig;
use crate::models::{CustomAnnotation, RatedItem, UserRate};
use crate::overrides::PosterOverrides;
use crate::parser::{Rows, parse_csv};
use crate::services::cache::TtlCache;
use crate::services::notes::{parse_annotations, parse_poster_overrides};
use crate::services::paginator::{fetch_all_rates, find_rate};
use crate::services::reconcile::{build_rated_item, card_poster};

pub const POSTER_OVERRIDES_KEY: &str = "poster_overrides";

#[derive(Debug, Error)]
pub enum AnimeError {
    #[error("Failed to load anime list: {0}")]
    List(#[source] FetchError),

    #[error("Failed to load anime {id}: {source}")]
    Detail {
        id: i64,
        #[source]
        source: FetchError,
    },
}

impl AnimeError {
    /// Status code returned by the tracker, if the failure was one.
    #[must_use]
    pub const fn upstream_status(&self) -> Option<u16> {
        match self {
            Self::List(e) | Self::Detail { source: e, .. } => e.status(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AnimeDetail {
    pub item: RatedItem,
    pub annotation: Option<CustomAnnotation>,
    /// False when the title is not in the owner's list.
    pub rate_found: bool,
}

#[derive(Clone)]
pub struct AnimeLibraryService {
    shikimori: ShikimoriClient,
    graphql: GraphqlClient,
    sheets: SheetsClient,
    cache: TtlCache,
    overrides: Arc<PosterOverrides>,
    tracker: TrackerConfig,
    notes_url: String,
}

impl AnimeLibraryService {
    #[must_use]
    pub const fn new(
        shikimori: ShikimoriClient,
        graphql: GraphqlClient,
        sheets: SheetsClient,
        cache: TtlCache,
        overrides: Arc<PosterOverrides>,
        tracker: TrackerConfig,
        notes_url: String,
    ) -> Self {
        Self {
            shikimori,
            graphql,
            sheets,
            cache,
            overrides,
            tracker,
            notes_url,
        }
    }

    #[must_use]
    pub fn nickname(&self) -> &str {
        &self.tracker.nickname
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        self.shikimori.base_url()
    }

    /// Every rate with the configured status, from cache when fresh.
    pub async fn list(&self) -> Result<Vec<UserRate>, AnimeError> {
        let key = self.tracker.rates_cache_key();
        if let Some(rates) = self.cache.get::<Vec<UserRate>>(&key).await {
            return Ok(rates);
        }

        let rates = fetch_all_rates(
            &self.shikimori,
            &self.tracker.nickname,
            &self.tracker.status,
            self.tracker.page_size,
        )
        .await
        .map_err(AnimeError::List)?;

        info!(count = rates.len(), "Loaded anime list");
        self.cache.set(&key, &rates).await;
        Ok(rates)
    }

    /// Drops the cached list and poster map, then fetches again.
    pub async fn reload(&self) -> Result<Vec<UserRate>, AnimeError> {
        self.cache.remove(&self.tracker.rates_cache_key()).await;
        self.cache.remove(POSTER_OVERRIDES_KEY).await;
        self.list().await
    }

    async fn notes_rows(&self) -> Option<Rows> {
        match self.sheets.fetch_csv(&self.notes_url).await {
            Ok(text) => Some(parse_csv(&text)),
            Err(e) => {
                warn!("Failed to load anime notes sheet: {e}");
                None
            }
        }
    }

    /// Card poster overrides from the notes sheet. Empty when the sheet is
    /// unavailable.
    pub async fn sheet_posters(&self) -> HashMap<i64, String> {
        if let Some(posters) = self
            .cache
            .get::<HashMap<i64, String>>(POSTER_OVERRIDES_KEY)
            .await
        {
            return posters;
        }

        let Some(rows) = self.notes_rows().await else {
            return HashMap::new();
        };
        let posters = parse_poster_overrides(&rows);
        self.cache.set(POSTER_OVERRIDES_KEY, &posters).await;
        posters
    }

    /// Poster for a list card.
    #[must_use]
    pub fn card_poster(&self, rate: &UserRate, sheet_posters: &HashMap<i64, String>) -> String {
        rate.anime.as_ref().map_or_else(
            crate::services::reconcile::placeholder_poster,
            |anime| {
                card_poster(
                    self.base_url(),
                    anime,
                    sheet_posters.get(&anime.id).map(String::as_str),
                )
            },
        )
    }

    /// Personal notes for one title.
    pub async fn annotation(&self, anime_id: i64) -> Option<CustomAnnotation> {
        let rows = self.notes_rows().await?;
        parse_annotations(&rows).remove(&anime_id)
    }

    /// REST record merged with GraphQL, the owner's rate and the notes.
    pub async fn detail(&self, anime_id: i64) -> Result<AnimeDetail, AnimeError> {
        let record = self
            .shikimori
            .anime(anime_id)
            .await
            .map_err(|source| AnimeError::Detail {
                id: anime_id,
                source,
            })?;

        let (graphql, rate, notes) = futures::join!(
            self.graphql.anime_info(anime_id),
            find_rate(
                &self.shikimori,
                &self.tracker.nickname,
                anime_id,
                self.tracker.page_size,
            ),
            self.notes_rows(),
        );

        let graphql = graphql.unwrap_or_else(|e| {
            warn!(anime_id, "GraphQL lookup failed, using REST data only: {e}");
            None
        });

        let annotation = notes
            .as_ref()
            .and_then(|rows| parse_annotations(rows).remove(&anime_id));

        let override_url = self.overrides.get(anime_id).map(str::to_string).or_else(|| {
            notes
                .as_ref()
                .and_then(|rows| parse_poster_overrides(rows).remove(&anime_id))
        });

        let item = build_rated_item(
            self.base_url(),
            record,
            graphql.as_ref(),
            rate.as_ref(),
            override_url.as_deref(),
        );

        Ok(AnimeDetail {
            item,
            annotation,
            rate_found: rate.is_some(),
        })
    }
}
