//! Manga and movies listings, both backed by published sheets.

use axum::{
    Json,
    extract::{Query, State},
};
use std::sync::Arc;
use tower_sessions::Session;

use super::{
    ApiError, ApiResponse, AppState, CatalogPage, CatalogQuery, ReloadDto, RowQuery,
    SheetCardDto, SheetDetailDto, SheetStatsDto, filters,
};
use crate::api::validation::parse_identity;
use crate::domain::Catalog;
use crate::models::{SheetItem, SheetKind};
use crate::services::catalog;
use crate::services::stats::{MovieStats, movie_stats};

fn cards(kind: SheetKind, view: &[SheetItem]) -> Vec<SheetCardDto> {
    view.iter()
        .map(|item| SheetCardDto::from_item(kind, item))
        .collect()
}

pub async fn list_manga(
    State(state): State<Arc<AppState>>,
    session: Session,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<ApiResponse<CatalogPage<SheetCardDto, SheetStatsDto>>>, ApiError> {
    let filters = filters::resolve(&session, Catalog::Manga, &query).await;
    let items = state.sheets().load(SheetKind::Manga).await?;
    let view = catalog::apply(&items, Catalog::Manga, &filters);
    let cards = cards(SheetKind::Manga, &view);

    Ok(Json(ApiResponse::success(CatalogPage {
        filters,
        total: items.len(),
        shown: cards.len(),
        stats: SheetStatsDto { shown: cards.len() },
        items: cards,
    })))
}

pub async fn list_movies(
    State(state): State<Arc<AppState>>,
    session: Session,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<ApiResponse<CatalogPage<SheetCardDto, MovieStats>>>, ApiError> {
    let filters = filters::resolve(&session, Catalog::Movies, &query).await;
    let items = state.sheets().load(SheetKind::Movies).await?;
    let view = catalog::apply(&items, Catalog::Movies, &filters);
    let cards = cards(SheetKind::Movies, &view);

    Ok(Json(ApiResponse::success(CatalogPage {
        filters,
        total: items.len(),
        shown: cards.len(),
        stats: movie_stats(&view),
        items: cards,
    })))
}

async fn reload(state: &AppState, kind: SheetKind) -> Result<Json<ApiResponse<ReloadDto>>, ApiError> {
    let items = state.sheets().reload(kind).await?;
    Ok(Json(ApiResponse::success(ReloadDto { count: items.len() })))
}

pub async fn reload_manga(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<ReloadDto>>, ApiError> {
    reload(&state, SheetKind::Manga).await
}

pub async fn reload_movies(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<ReloadDto>>, ApiError> {
    reload(&state, SheetKind::Movies).await
}

async fn detail(
    state: &AppState,
    kind: SheetKind,
    query: &RowQuery,
) -> Result<Json<ApiResponse<SheetDetailDto>>, ApiError> {
    let row = parse_identity(query.row.as_deref())?;
    let detail = state.sheets().detail(kind, row).await?;
    Ok(Json(ApiResponse::success(SheetDetailDto::from_detail(
        detail,
        state.anime().base_url(),
    ))))
}

pub async fn get_manga(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RowQuery>,
) -> Result<Json<ApiResponse<SheetDetailDto>>, ApiError> {
    detail(&state, SheetKind::Manga, &query).await
}

pub async fn get_movie(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RowQuery>,
) -> Result<Json<ApiResponse<SheetDetailDto>>, ApiError> {
    detail(&state, SheetKind::Movies, &query).await
}
