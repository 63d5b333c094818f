use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::clients::build_http_client;
use crate::clients::graphql::GraphqlClient;
use crate::clients::sheets::SheetsClient;
use crate::clients::shikimori::ShikimoriClient;
use crate::config::Config;
use crate::db::Store;
use crate::overrides::PosterOverrides;
use crate::services::{AnimeLibraryService, SheetCatalogService, TtlCache};

/// Everything a request handler or CLI command needs, built once.
#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Store,

    pub anime: AnimeLibraryService,

    pub sheets: SheetCatalogService,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        Self::with_store(config, store)
    }

    /// Wires the services around an already opened store.
    pub fn with_store(config: Config, store: Store) -> anyhow::Result<Self> {
        // One pooled client shared by every remote source.
        let http_client = build_http_client(&config.tracker)
            .map_err(|e| anyhow::anyhow!("Failed to build shared HTTP client: {e}"))?;

        let shikimori = ShikimoriClient::new(http_client.clone(), &config.tracker);
        let graphql = GraphqlClient::new(http_client.clone(), &config.tracker);
        let sheets_client = SheetsClient::new(http_client);

        let cache = TtlCache::new(store.clone(), Duration::from_secs(config.cache.ttl_seconds));
        let overrides = Arc::new(PosterOverrides::load_or_empty(Path::new(
            &config.overrides_path,
        )));

        let anime = AnimeLibraryService::new(
            shikimori.clone(),
            graphql,
            sheets_client.clone(),
            cache.clone(),
            overrides,
            config.tracker.clone(),
            config.sheets.anime_notes_url.clone(),
        );

        let sheets = SheetCatalogService::new(sheets_client, shikimori, cache, config.sheets.clone());

        Ok(Self {
            config: Arc::new(config),
            store,
            anime,
            sheets,
        })
    }
}
