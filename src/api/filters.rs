//! Per-session memory of the last filter selection of each catalog.

use tower_sessions::Session;
use tracing::warn;

use super::CatalogQuery;
use crate::domain::{Catalog, FilterState};

/// Resolves the effective filters of a listing request.
///
/// `reset` forgets the stored selection. Explicit parameters win and are
/// stored; otherwise the stored selection is restored. Session failures
/// only degrade to the request's own parameters.
pub async fn resolve(session: &Session, catalog: Catalog, query: &CatalogQuery) -> FilterState {
    let key = catalog.session_key();

    if query.reset {
        if let Err(e) = session.remove::<FilterState>(key).await {
            warn!(catalog = %catalog, error = %e, "Failed to clear stored filters");
        }
        return query.to_filter_state();
    }

    if query.is_explicit() {
        let state = query.to_filter_state();
        if let Err(e) = session.insert(key, &state).await {
            warn!(catalog = %catalog, error = %e, "Failed to store filters");
        }
        return state;
    }

    match session.get::<FilterState>(key).await {
        Ok(Some(stored)) => stored,
        Ok(None) => FilterState::default(),
        Err(e) => {
            warn!(catalog = %catalog, error = %e, "Failed to restore filters");
            FilterState::default()
        }
    }
}
