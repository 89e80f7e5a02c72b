//! HTTP handlers for the comics module.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Deserialize;

use catalog_http::{
    error::AppError,
    response::{ApiResponse, ApiResult, Pagination},
};
use catalog_kernel::settings::CatalogSettings;

use super::models::{ComicCandidate, ComicRecord};
use super::query::PageRequest;
use super::service::{CatalogError, ComicService, Page};

/// Shared state for every comics handler.
pub struct ComicsState {
    pub service: ComicService,
    pub catalog: CatalogSettings,
}

pub fn router(state: Arc<ComicsState>) -> Router {
    Router::new()
        .route("/addComic", post(add_comic))
        .route("/updateComic/{id}", put(update_comic))
        .route("/deleteComic/{id}", delete(delete_comic))
        .route("/allComics", get(all_comics))
        .route("/allComics/filter", get(filter_comics))
        .route("/allComics/sort", get(sort_comics))
        .route("/comic/{id}", get(get_comic))
        .with_state(state)
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Validation(e) => AppError::validation(e.code(), e.to_string()),
            CatalogError::Query(e) => AppError::validation(e.code(), e.to_string()),
            CatalogError::Duplicate => AppError::conflict(CatalogError::Duplicate.to_string()),
            CatalogError::NotFound(message) => AppError::not_found(message),
            CatalogError::Store(e) => AppError::Internal(e.into()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct PageParams {
    page: Option<String>,
    limit: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SortParams {
    sort: Option<String>,
    order: Option<String>,
    page: Option<String>,
    limit: Option<String>,
}

fn paged(page: Page) -> ApiResponse<Vec<ComicRecord>> {
    ApiResponse::page(
        page.records,
        Pagination {
            current_page: page.current_page,
            total_pages: page.total_pages,
            total_records: page.total_records,
        },
    )
}

async fn add_comic(
    State(state): State<Arc<ComicsState>>,
    payload: Result<Json<ComicCandidate>, JsonRejection>,
) -> ApiResult<ComicRecord> {
    let Json(candidate) = payload?;
    let record = state.service.create(candidate).await?;
    Ok(ApiResponse::created(record))
}

async fn update_comic(
    State(state): State<Arc<ComicsState>>,
    id: Result<Path<String>, PathRejection>,
    payload: Result<Json<ComicCandidate>, JsonRejection>,
) -> ApiResult<ComicRecord> {
    let Path(id) = id?;
    let Json(candidate) = payload?;
    let record = state.service.update(&id, candidate).await?;
    Ok(ApiResponse::ok(record))
}

async fn delete_comic(
    State(state): State<Arc<ComicsState>>,
    id: Result<Path<String>, PathRejection>,
) -> ApiResult<()> {
    let Path(id) = id?;
    state.service.delete(&id).await?;
    Ok(ApiResponse::message("Comic book deleted"))
}

async fn all_comics(
    State(state): State<Arc<ComicsState>>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> ApiResult<Vec<ComicRecord>> {
    let Query(params) = params?;
    let request = PageRequest::parse(
        params.page.as_deref(),
        params.limit.as_deref(),
        &state.catalog,
    )
    .map_err(CatalogError::from)?;

    Ok(paged(state.service.list(request).await?))
}

/// Every query pair is kept in order so repeated keys all apply.
async fn filter_comics(
    State(state): State<Arc<ComicsState>>,
    params: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> ApiResult<Vec<ComicRecord>> {
    let Query(params) = params?;
    let lookup = |name: &str| {
        params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    };
    let request = PageRequest::parse(lookup("page"), lookup("limit"), &state.catalog)
        .map_err(CatalogError::from)?;

    Ok(paged(state.service.list_filtered(&params, request).await?))
}

async fn sort_comics(
    State(state): State<Arc<ComicsState>>,
    params: Result<Query<SortParams>, QueryRejection>,
) -> ApiResult<Vec<ComicRecord>> {
    let Query(params) = params?;
    let request = PageRequest::parse(
        params.page.as_deref(),
        params.limit.as_deref(),
        &state.catalog,
    )
    .map_err(CatalogError::from)?;

    let page = state
        .service
        .list_sorted(params.sort.as_deref(), params.order.as_deref(), request)
        .await?;
    Ok(paged(page))
}

async fn get_comic(
    State(state): State<Arc<ComicsState>>,
    id: Result<Path<String>, PathRejection>,
) -> ApiResult<ComicRecord> {
    let Path(id) = id?;
    let record = state.service.get_by_id(&id).await?;
    Ok(ApiResponse::ok(record))
}
