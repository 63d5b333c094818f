use axum::{
    Json,
    extract::{Query, State},
};
use std::sync::Arc;
use tower_sessions::Session;

use super::{
    AnimeCardDto, AnimeDetailDto, ApiError, ApiResponse, AppState, CatalogPage, CatalogQuery,
    IdQuery, ReloadDto, filters,
};
use crate::api::validation::validate_anime_id;
use crate::domain::Catalog;
use crate::services::catalog;
use crate::services::stats::{AnimeStats, anime_stats};

pub async fn list_anime(
    State(state): State<Arc<AppState>>,
    session: Session,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<ApiResponse<CatalogPage<AnimeCardDto, AnimeStats>>>, ApiError> {
    let filters = filters::resolve(&session, Catalog::Anime, &query).await;
    let service = state.anime();

    let (rates, sheet_posters) = futures::join!(service.list(), service.sheet_posters());
    let rates = rates?;

    let view = catalog::apply(&rates, Catalog::Anime, &filters);
    let items: Vec<AnimeCardDto> = view
        .iter()
        .map(|rate| AnimeCardDto::from_rate(rate, service.card_poster(rate, &sheet_posters)))
        .collect();

    Ok(Json(ApiResponse::success(CatalogPage {
        filters,
        total: rates.len(),
        shown: items.len(),
        stats: anime_stats(&view),
        items,
    })))
}

pub async fn reload_anime(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<ReloadDto>>, ApiError> {
    let rates = state.anime().reload().await?;
    Ok(Json(ApiResponse::success(ReloadDto { count: rates.len() })))
}

pub async fn get_anime(
    State(state): State<Arc<AppState>>,
    Query(query): Query<IdQuery>,
) -> Result<Json<ApiResponse<AnimeDetailDto>>, ApiError> {
    let id = validate_anime_id(query.id.as_deref())?;
    let service = state.anime();

    let detail = service.detail(id).await?;
    Ok(Json(ApiResponse::success(AnimeDetailDto::from_detail(
        detail,
        service.base_url(),
    ))))
}
