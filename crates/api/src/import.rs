//! Shared plumbing of the CSV upload endpoints.
//!
//! Table imports upsert row by row, so one bad row never aborts the file;
//! mapping uploads are applied in a single transaction by
//! [`MappingRepo::apply_upload`](mdm_db::repositories::MappingRepo::apply_upload).

use std::future::Future;

use axum::extract::Multipart;
use mdm_core::clean::clean_text;
use mdm_core::csv::{CsvRow, CsvTable};
use mdm_core::error::CoreError;
use mdm_core::import::{ImportSummary, UpsertOutcome, PROGRESS_EVERY};
use mdm_core::mapping::{normalize_payload, MappingColumns};
use mdm_core::master::MasterTable;
use mdm_db::repositories::mapping_repo::MappingRow;

use crate::error::{AppError, AppResult};

/// Name of the multipart field carrying the CSV file.
pub const UPLOAD_FIELD: &str = "file";

/// Read the `file` field of a multipart upload and parse it as CSV.
pub async fn read_csv_upload(mut multipart: Multipart) -> AppResult<CsvTable> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or("upload.csv").to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {e}")))?;
        tracing::debug!(file_name = %file_name, bytes = data.len(), "Received CSV upload");
        return Ok(CsvTable::from_bytes(&data)?);
    }
    Err(CoreError::Validation(format!("Multipart field '{UPLOAD_FIELD}' is required")).into())
}

/// Import every row of `csv` into `table`.
///
/// `map` turns a row into a record (or a row error message); `upsert`
/// writes it. Failures are collected into the summary and the import
/// carries on with the next row.
pub async fn run_import<R, M, U, Fut>(
    table: MasterTable,
    csv: &CsvTable,
    map: M,
    upsert: U,
) -> ImportSummary
where
    M: Fn(&CsvRow<'_>) -> Result<R, String>,
    U: Fn(R) -> Fut,
    Fut: Future<Output = Result<UpsertOutcome, sqlx::Error>>,
{
    let table_name = table.table_name();
    let mut summary = ImportSummary::default();
    tracing::info!(table = table_name, rows = csv.len(), "Starting import");

    for row in csv.rows() {
        let line = row.line();
        match map(&row) {
            Ok(record) => match upsert(record).await {
                Ok(outcome) => summary.record(outcome),
                Err(e) => {
                    tracing::warn!(table = table_name, line, error = %e, "Row upsert failed");
                    summary.record_failure(line, e.to_string());
                }
            },
            Err(message) => {
                tracing::warn!(table = table_name, line, error = %message, "Row rejected");
                summary.record_failure(line, message);
            }
        }

        if summary.total_rows % PROGRESS_EVERY == 0 {
            tracing::info!(table = table_name, processed = summary.total_rows, "Import progress");
        }
    }

    tracing::info!(
        table = table_name,
        total = summary.total_rows,
        inserted = summary.inserted,
        updated = summary.updated,
        failed = summary.failed,
        "Import finished",
    );
    summary
}

/// Collect the rows of a mapping upload. Rows with a blank identifier are
/// dropped; their count is returned alongside.
pub fn mapping_rows(csv: &CsvTable, columns: MappingColumns) -> (Vec<MappingRow>, usize) {
    let mut rows = Vec::with_capacity(csv.len());
    let mut blank_keys = 0;
    for row in csv.rows() {
        match clean_text(row.get_at(columns.id)) {
            Some(key) => rows.push(MappingRow {
                key,
                value: normalize_payload(row.get_at(columns.payload)),
            }),
            None => blank_keys += 1,
        }
    }
    (rows, blank_keys)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdm_core::import::rto_from_row;

    #[test]
    fn mapping_rows_normalize_payloads_and_drop_blank_keys() {
        let csv = CsvTable::parse("id,tata\nMH01,T1\n,T2\nMH02,NaN\n").unwrap();
        let (rows, blank) = mapping_rows(&csv, MappingColumns { id: 0, payload: 1 });
        assert_eq!(blank, 1);
        assert_eq!(
            rows,
            vec![
                MappingRow {
                    key: "MH01".into(),
                    value: Some("T1".into()),
                },
                MappingRow {
                    key: "MH02".into(),
                    value: None,
                },
            ]
        );
    }

    #[tokio::test]
    async fn run_import_counts_rejected_and_failed_rows() {
        let csv = CsvTable::parse("id,city\nMH01,Mumbai\n,Pune\nMH02,Thane\n").unwrap();

        let summary = run_import(MasterTable::Rto, &csv, rto_from_row, |record| async move {
            if record.id == "MH02" {
                Err(sqlx::Error::RowNotFound)
            } else {
                Ok(UpsertOutcome::Inserted)
            }
        })
        .await;

        assert_eq!(summary.total_rows, 3);
        assert_eq!(summary.inserted, 1);
        assert_eq!(summary.failed, 2);
        assert_eq!(summary.errors[0].line, 3);
        assert_eq!(summary.errors[0].message, "missing id");
        assert_eq!(summary.errors[1].line, 4);
    }
}
