//! Handlers for the `/pincodes` resource.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use mdm_core::error::CoreError;
use mdm_core::import::{ensure_key_column, pincode_from_row, PINCODE_KEY_ALIASES};
use mdm_core::master::MasterTable;
use mdm_db::models::pincode::{CreatePincode, PincodeFilter, UpdatePincode};
use mdm_db::repositories::PincodeRepo;

use super::mapping::{self, SetMappingRequest};
use crate::error::{AppError, AppResult};
use crate::import::{read_csv_upload, run_import};
use crate::middleware::auth::AuthUser;
use crate::query::MappingImportParams;
use crate::response::DataResponse;
use crate::state::AppState;

const TABLE: MasterTable = MasterTable::Pincode;

fn not_found(pincode: &str) -> AppError {
    AppError::Core(CoreError::not_found(TABLE.entity(), pincode))
}

/// GET /api/v1/pincodes?state=&district=&city=&q=&limit=&offset=
pub async fn list(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(filter): Query<PincodeFilter>,
) -> AppResult<impl IntoResponse> {
    let pincodes = PincodeRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: pincodes }))
}

/// POST /api/v1/pincodes
pub async fn create(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(input): Json<CreatePincode>,
) -> AppResult<impl IntoResponse> {
    if input.pincode.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "pincode must not be empty".into(),
        )));
    }
    let pincode = PincodeRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: pincode })))
}

/// GET /api/v1/pincodes/{pincode}
pub async fn get(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(pincode): Path<String>,
) -> AppResult<impl IntoResponse> {
    let row = PincodeRepo::find_by_pincode(&state.pool, &pincode)
        .await?
        .ok_or_else(|| not_found(&pincode))?;
    Ok(Json(DataResponse { data: row }))
}

/// PUT /api/v1/pincodes/{pincode}
pub async fn update(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(pincode): Path<String>,
    Json(input): Json<UpdatePincode>,
) -> AppResult<impl IntoResponse> {
    let row = PincodeRepo::update(&state.pool, &pincode, &input)
        .await?
        .ok_or_else(|| not_found(&pincode))?;
    Ok(Json(DataResponse { data: row }))
}

/// PUT /api/v1/pincodes/{pincode}/mappings/{insurer}
pub async fn set_mapping(
    State(state): State<AppState>,
    _user: AuthUser,
    Path((pincode, insurer)): Path<(String, String)>,
    Json(input): Json<SetMappingRequest>,
) -> AppResult<impl IntoResponse> {
    mapping::set_mapping(&state, TABLE, &pincode, &insurer, &input).await?;
    let row = PincodeRepo::find_by_pincode(&state.pool, &pincode)
        .await?
        .ok_or_else(|| not_found(&pincode))?;
    Ok(Json(DataResponse { data: row }))
}

/// POST /api/v1/pincodes/import
pub async fn import(
    State(state): State<AppState>,
    user: AuthUser,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let csv = read_csv_upload(multipart).await?;
    ensure_key_column(&csv, &PINCODE_KEY_ALIASES)?;

    tracing::info!(user_id = user.user_id, "Pincode import requested");
    let pool = &state.pool;
    let summary = run_import(TABLE, &csv, pincode_from_row, move |record| async move {
        PincodeRepo::upsert(pool, &record).await
    })
    .await;
    Ok(Json(DataResponse { data: summary }))
}

/// POST /api/v1/pincodes/mappings/import?insurer=&overwrite=
pub async fn import_mappings(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<MappingImportParams>,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let summary = mapping::import_mappings(&state, TABLE, &params, multipart).await?;
    Ok(Json(DataResponse { data: summary }))
}
