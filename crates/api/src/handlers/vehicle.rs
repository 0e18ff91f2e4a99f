//! Handlers for the `/vehicles` resource (make/model/variant master).

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use mdm_core::ensuredit::{next_make_id, next_model_id, next_variant_id, EnsureditId};
use mdm_core::error::CoreError;
use mdm_core::import::{ensure_key_column, vehicle_from_row, VEHICLE_KEY_ALIASES};
use mdm_core::master::MasterTable;
use mdm_core::product::{Product, VehicleOptions};
use mdm_db::models::vehicle::{CreateVehicle, UpdateVehicle, Vehicle, VehicleFilter};
use mdm_db::repositories::VehicleRepo;
use sqlx::PgPool;

use super::mapping::{self, SetMappingRequest};
use crate::error::{AppError, AppResult};
use crate::import::{read_csv_upload, run_import};
use crate::middleware::auth::AuthUser;
use crate::query::{HierarchyParams, ImportParams, MappingImportParams, ProductParams};
use crate::response::DataResponse;
use crate::state::AppState;

const TABLE: MasterTable = MasterTable::Vehicle;

fn not_found(id: &str) -> AppError {
    AppError::Core(CoreError::not_found(TABLE.entity(), id))
}

/// Look up a vehicle by surrogate id, falling back to its ensuredit id.
async fn find_vehicle(pool: &PgPool, id: &str) -> AppResult<Vehicle> {
    let vehicle = match VehicleRepo::find_by_id(pool, id).await? {
        Some(vehicle) => Some(vehicle),
        None => VehicleRepo::find_by_ensuredit_id(pool, id).await?,
    };
    vehicle.ok_or_else(|| not_found(id))
}

/// Trim a required text field, rejecting blanks.
fn required(value: &str, field: &str) -> AppResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::Core(CoreError::Validation(format!(
            "{field} must not be empty"
        ))));
    }
    Ok(value.to_string())
}

/// Work out the ensuredit id of a new make/model/variant.
///
/// Existing make and model segments are reused; missing segments are
/// allocated as the highest one in use plus one.
async fn allocate_ensuredit_id(
    pool: &PgPool,
    product: Product,
    make: &str,
    model: &str,
    variant: &str,
) -> AppResult<EnsureditId> {
    let make_id = match VehicleRepo::existing_make_id(pool, product, make).await? {
        Some(id) => id,
        None => next_make_id(product, VehicleRepo::max_make_id(pool, product).await?)?,
    };

    let model_id = match VehicleRepo::existing_model_id(pool, make_id, model).await? {
        Some(id) => id,
        None => next_model_id(VehicleRepo::max_model_id(pool, make_id).await?)?,
    };

    let prefix = EnsureditId::model_prefix(make_id, model_id);
    let variant_id = match VehicleRepo::existing_variant_id(pool, &prefix, variant).await? {
        Some(id) => id,
        None => next_variant_id(VehicleRepo::max_variant_id(pool, &prefix).await?)?,
    };

    Ok(EnsureditId {
        make_id,
        model_id,
        variant_id,
    })
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/vehicles?product_id=&make=&model=&variant=&fuel_type=&q=&limit=&offset=
pub async fn list(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(filter): Query<VehicleFilter>,
) -> AppResult<impl IntoResponse> {
    let vehicles = VehicleRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: vehicles }))
}

/// POST /api/v1/vehicles
///
/// Define a new make/model/variant. The ensuredit id is allocated here.
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(mut input): Json<CreateVehicle>,
) -> AppResult<impl IntoResponse> {
    input.make = required(&input.make, "make")?;
    input.model = required(&input.model, "model")?;
    input.variant = required(&input.variant, "variant")?;
    let product = input.product_id;

    let existing = VehicleRepo::find_by_hierarchy(
        &state.pool,
        product,
        &input.make,
        &input.model,
        &input.variant,
    )
    .await?;
    if let Some(existing) = existing {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "{} {} {} already exists as {}",
            input.make, input.model, input.variant, existing.ensuredit_id
        ))));
    }

    let ensuredit_id =
        allocate_ensuredit_id(&state.pool, product, &input.make, &input.model, &input.variant)
            .await?
            .to_string();
    let vehicle = VehicleRepo::create(&state.pool, &ensuredit_id, &input).await?;

    tracing::info!(
        user_id = user.user_id,
        vehicle_id = %vehicle.id,
        ensuredit_id = %vehicle.ensuredit_id,
        "Created vehicle",
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: vehicle })))
}

/// GET /api/v1/vehicles/options?product_id=
pub async fn options(
    _user: AuthUser,
    Query(params): Query<ProductParams>,
) -> AppResult<Json<DataResponse<VehicleOptions>>> {
    let product = params.product()?;
    Ok(Json(DataResponse {
        data: VehicleOptions::for_product(product),
    }))
}

/// GET /api/v1/vehicles/makes?product_id=
pub async fn makes(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<HierarchyParams>,
) -> AppResult<Json<DataResponse<Vec<String>>>> {
    let makes = VehicleRepo::makes(&state.pool, params.product()?).await?;
    Ok(Json(DataResponse { data: makes }))
}

/// GET /api/v1/vehicles/models?product_id=&make=
pub async fn models(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<HierarchyParams>,
) -> AppResult<Json<DataResponse<Vec<String>>>> {
    let models =
        VehicleRepo::models(&state.pool, params.product()?, params.require_make()?).await?;
    Ok(Json(DataResponse { data: models }))
}

/// GET /api/v1/vehicles/variants?product_id=&make=&model=
pub async fn variants(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<HierarchyParams>,
) -> AppResult<Json<DataResponse<Vec<String>>>> {
    let variants = VehicleRepo::variants(
        &state.pool,
        params.product()?,
        params.require_make()?,
        params.require_model()?,
    )
    .await?;
    Ok(Json(DataResponse { data: variants }))
}

/// GET /api/v1/vehicles/{id}
///
/// `id` may be the surrogate id or the ensuredit id, as in every
/// `/vehicles/{id}` route.
pub async fn get(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let vehicle = find_vehicle(&state.pool, &id).await?;
    Ok(Json(DataResponse { data: vehicle }))
}

/// PUT /api/v1/vehicles/{id}
///
/// Edit descriptive columns. The ensuredit id and product are immutable.
pub async fn update(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
    Json(input): Json<UpdateVehicle>,
) -> AppResult<impl IntoResponse> {
    let id = find_vehicle(&state.pool, &id).await?.id;
    let vehicle = VehicleRepo::update(&state.pool, &id, &input)
        .await?
        .ok_or_else(|| not_found(&id))?;
    Ok(Json(DataResponse { data: vehicle }))
}

/// PUT /api/v1/vehicles/{id}/mappings/{insurer}
///
/// Set one insurer's mapping. Values must be JSON except for insurers that
/// use plain vehicle codes.
pub async fn set_mapping(
    State(state): State<AppState>,
    _user: AuthUser,
    Path((id, insurer)): Path<(String, String)>,
    Json(input): Json<SetMappingRequest>,
) -> AppResult<impl IntoResponse> {
    let id = find_vehicle(&state.pool, &id).await?.id;
    mapping::set_mapping(&state, TABLE, &id, &insurer, &input).await?;
    let vehicle = find_vehicle(&state.pool, &id).await?;
    Ok(Json(DataResponse { data: vehicle }))
}

/// POST /api/v1/vehicles/import?product_id=
///
/// Upsert every row of the uploaded CSV (multipart field `file`), keyed by
/// ensuredit id.
pub async fn import(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<ImportParams>,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let product = params.product()?;
    let csv = read_csv_upload(multipart).await?;
    ensure_key_column(&csv, &VEHICLE_KEY_ALIASES)?;

    tracing::info!(user_id = user.user_id, product = ?product, "Vehicle import requested");
    let pool = &state.pool;
    let summary = run_import(
        TABLE,
        &csv,
        |row| vehicle_from_row(row, product),
        move |record| async move { VehicleRepo::upsert(pool, &record).await },
    )
    .await;
    Ok(Json(DataResponse { data: summary }))
}

/// POST /api/v1/vehicles/mappings/import?insurer=&overwrite=
pub async fn import_mappings(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<MappingImportParams>,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let summary = mapping::import_mappings(&state, TABLE, &params, multipart).await?;
    Ok(Json(DataResponse { data: summary }))
}
