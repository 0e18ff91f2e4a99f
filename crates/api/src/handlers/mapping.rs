//! Insurer mapping operations shared by the vehicle, RTO and pincode
//! resources.

use axum::extract::Multipart;
use mdm_core::error::CoreError;
use mdm_core::mapping::{ensure_table_has_insurer, locate_columns, prepare_mapping_value, MappingUploadSummary};
use mdm_core::master::MasterTable;
use mdm_db::repositories::MappingRepo;
use serde::Deserialize;

use crate::error::AppResult;
use crate::import::{mapping_rows, read_csv_upload};
use crate::query::{parse_insurer, MappingImportParams};
use crate::state::AppState;

/// Request body for `PUT /{resource}/{id}/mappings/{insurer}`.
#[derive(Debug, Deserialize)]
pub struct SetMappingRequest {
    /// New mapping; `null` or blank clears it.
    pub value: Option<String>,
}

/// Validate and store one insurer mapping of the row addressed by `id`.
pub async fn set_mapping(
    state: &AppState,
    table: MasterTable,
    id: &str,
    insurer: &str,
    input: &SetMappingRequest,
) -> AppResult<()> {
    let insurer = parse_insurer(insurer)?;
    let value = prepare_mapping_value(table, insurer, input.value.as_deref())?;

    let updated = MappingRepo::set(
        &state.pool,
        table,
        table.row_id_column(),
        id,
        insurer,
        value.as_deref(),
    )
    .await?;
    if !updated {
        return Err(CoreError::not_found(table.entity(), id).into());
    }

    tracing::info!(table = table.table_name(), id, insurer = %insurer, "Updated mapping");
    Ok(())
}

/// Apply an uploaded mapping CSV for one insurer of `table`.
pub async fn import_mappings(
    state: &AppState,
    table: MasterTable,
    params: &MappingImportParams,
    multipart: Multipart,
) -> AppResult<MappingUploadSummary> {
    let insurer = parse_insurer(&params.insurer)?;
    ensure_table_has_insurer(table, insurer)?;

    let csv = read_csv_upload(multipart).await?;
    let columns = locate_columns(&csv, insurer)?;
    let (rows, blank_keys) = mapping_rows(&csv, columns);

    tracing::info!(
        table = table.table_name(),
        insurer = %insurer,
        rows = rows.len(),
        overwrite = params.overwrite,
        "Applying mapping upload",
    );
    let mut summary =
        MappingRepo::apply_upload(&state.pool, table, insurer, &rows, params.overwrite).await?;
    summary.skipped += blank_keys;
    Ok(summary)
}
