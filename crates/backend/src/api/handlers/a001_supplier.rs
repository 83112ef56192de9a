use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use contracts::domain::a001_supplier::{SupplierDto, SupplierInput};
use contracts::shared::api_response::{
    ApiItemResponse, ApiListResponse, ApiMessageResponse, Pagination, StatsDto,
};

use crate::api::{json_body, parse_list_query, AppState};
use crate::domain::a001_supplier::service;
use crate::shared::error::AppError;

/// GET /api/suppliers?page&limit&search&<filter>
pub async fn list(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<ApiListResponse<SupplierDto>>, AppError> {
    let query = parse_list_query(pairs, state.max_page_size)?;
    let (data, total) = service::list(&state.db, &query).await?;
    Ok(Json(ApiListResponse {
        status: true,
        message: String::new(),
        data,
        pagination: Pagination::new(total, query.page, query.limit),
    }))
}

pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiItemResponse<SupplierDto>>, AppError> {
    let data = service::get(&state.db, &id).await?;
    Ok(Json(ApiItemResponse {
        status: true,
        message: String::new(),
        data,
    }))
}

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<SupplierInput>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiMessageResponse>), AppError> {
    let input = json_body(payload)?;
    let id = service::create(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(ApiMessageResponse::created(id))))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<SupplierInput>, JsonRejection>,
) -> Result<Json<ApiMessageResponse>, AppError> {
    let input = json_body(payload)?;
    service::update(&state.db, &id, input).await?;
    Ok(Json(ApiMessageResponse::ok("updated")))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiMessageResponse>, AppError> {
    service::delete(&state.db, &id).await?;
    Ok(Json(ApiMessageResponse::ok("deleted")))
}

/// GET /api/suppliers/stats: точные счётчики active/inactive
pub async fn stats(
    State(state): State<AppState>,
) -> Result<Json<ApiItemResponse<StatsDto>>, AppError> {
    let data = service::stats(&state.db).await?;
    Ok(Json(ApiItemResponse {
        status: true,
        message: String::new(),
        data,
    }))
}
