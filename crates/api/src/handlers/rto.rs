//! Handlers for the `/rtos` resource.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use mdm_core::error::CoreError;
use mdm_core::import::{ensure_key_column, rto_from_row, RTO_KEY_ALIASES};
use mdm_core::master::MasterTable;
use mdm_db::models::rto::{CreateRto, RtoFilter, UpdateRto};
use mdm_db::repositories::RtoRepo;

use super::mapping::{self, SetMappingRequest};
use crate::error::{AppError, AppResult};
use crate::import::{read_csv_upload, run_import};
use crate::middleware::auth::AuthUser;
use crate::query::MappingImportParams;
use crate::response::DataResponse;
use crate::state::AppState;

const TABLE: MasterTable = MasterTable::Rto;

fn not_found(id: &str) -> AppError {
    AppError::Core(CoreError::not_found(TABLE.entity(), id))
}

/// GET /api/v1/rtos?state=&city=&rto=&q=&limit=&offset=
pub async fn list(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(filter): Query<RtoFilter>,
) -> AppResult<impl IntoResponse> {
    let rtos = RtoRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: rtos }))
}

/// POST /api/v1/rtos
///
/// Create an RTO. An existing id is a conflict.
pub async fn create(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(input): Json<CreateRto>,
) -> AppResult<impl IntoResponse> {
    if input.id.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation("id must not be empty".into())));
    }
    let rto = RtoRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: rto })))
}

/// GET /api/v1/rtos/{id}
pub async fn get(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let rto = RtoRepo::find_by_id(&state.pool, &id)
        .await?
        .ok_or_else(|| not_found(&id))?;
    Ok(Json(DataResponse { data: rto }))
}

/// PUT /api/v1/rtos/{id}
pub async fn update(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
    Json(input): Json<UpdateRto>,
) -> AppResult<impl IntoResponse> {
    let rto = RtoRepo::update(&state.pool, &id, &input)
        .await?
        .ok_or_else(|| not_found(&id))?;
    Ok(Json(DataResponse { data: rto }))
}

/// PUT /api/v1/rtos/{id}/mappings/{insurer}
pub async fn set_mapping(
    State(state): State<AppState>,
    _user: AuthUser,
    Path((id, insurer)): Path<(String, String)>,
    Json(input): Json<SetMappingRequest>,
) -> AppResult<impl IntoResponse> {
    mapping::set_mapping(&state, TABLE, &id, &insurer, &input).await?;
    let rto = RtoRepo::find_by_id(&state.pool, &id)
        .await?
        .ok_or_else(|| not_found(&id))?;
    Ok(Json(DataResponse { data: rto }))
}

/// POST /api/v1/rtos/import
pub async fn import(
    State(state): State<AppState>,
    user: AuthUser,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let csv = read_csv_upload(multipart).await?;
    ensure_key_column(&csv, &RTO_KEY_ALIASES)?;

    tracing::info!(user_id = user.user_id, "RTO import requested");
    let pool = &state.pool;
    let summary = run_import(TABLE, &csv, rto_from_row, move |record| async move {
        RtoRepo::upsert(pool, &record).await
    })
    .await;
    Ok(Json(DataResponse { data: summary }))
}

/// POST /api/v1/rtos/mappings/import?insurer=&overwrite=
pub async fn import_mappings(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<MappingImportParams>,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let summary = mapping::import_mappings(&state, TABLE, &params, multipart).await?;
    Ok(Json(DataResponse { data: summary }))
}
