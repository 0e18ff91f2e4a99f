//! Per-insurer mapping columns of the master tables.
//!
//! Column and table names come from [`MasterTable`] and [`Insurer`], never
//! from user input, so they are interpolated into the SQL directly.

use mdm_core::insurer::Insurer;
use mdm_core::mapping::{decide, MappingDecision, MappingUploadSummary};
use mdm_core::master::MasterTable;
use sqlx::{PgExecutor, PgPool};

/// One row of a mapping upload: the row key and the normalized payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingRow {
    pub key: String,
    pub value: Option<String>,
}

/// Reads and writes single insurer mapping cells.
pub struct MappingRepo;

impl MappingRepo {
    /// Current mapping of one row.
    ///
    /// The outer `Option` is `None` when no row has `key` in `key_column`.
    pub async fn fetch<'e>(
        executor: impl PgExecutor<'e>,
        table: MasterTable,
        key_column: &str,
        key: &str,
        insurer: Insurer,
    ) -> Result<Option<Option<String>>, sqlx::Error> {
        let query = format!(
            "SELECT {col} FROM {tbl} WHERE {key_column} = $1",
            col = insurer.column(),
            tbl = table.table_name(),
        );
        sqlx::query_scalar::<_, Option<String>>(&query)
            .bind(key)
            .fetch_optional(executor)
            .await
    }

    /// Overwrite one row's mapping; `None` clears it.
    ///
    /// Returns `true` if a row was updated.
    pub async fn set<'e>(
        executor: impl PgExecutor<'e>,
        table: MasterTable,
        key_column: &str,
        key: &str,
        insurer: Insurer,
        value: Option<&str>,
    ) -> Result<bool, sqlx::Error> {
        let query = format!(
            "UPDATE {tbl} SET {col} = $2 WHERE {key_column} = $1",
            col = insurer.column(),
            tbl = table.table_name(),
        );
        let result = sqlx::query(&query)
            .bind(key)
            .bind(value)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Apply a mapping upload to `table`, matching rows on its business key.
    ///
    /// Runs in a single transaction: a database error rolls back every row
    /// already written.
    pub async fn apply_upload(
        pool: &PgPool,
        table: MasterTable,
        insurer: Insurer,
        rows: &[MappingRow],
        overwrite: bool,
    ) -> Result<MappingUploadSummary, sqlx::Error> {
        let key_column = table.key_column();
        let mut summary = MappingUploadSummary::default();
        let mut tx = pool.begin().await?;

        for row in rows {
            let Some(stored) = Self::fetch(&mut *tx, table, key_column, &row.key, insurer).await?
            else {
                summary.not_found += 1;
                continue;
            };

            match decide(stored.as_deref(), row.value.clone(), overwrite) {
                MappingDecision::Write(value) => {
                    Self::set(&mut *tx, table, key_column, &row.key, insurer, value.as_deref())
                        .await?;
                    summary.updated += 1;
                }
                MappingDecision::Skip => summary.skipped += 1,
            }
        }

        tx.commit().await?;
        tracing::debug!(
            table = table.table_name(),
            insurer = %insurer,
            updated = summary.updated,
            skipped = summary.skipped,
            not_found = summary.not_found,
            "Mapping upload committed",
        );
        Ok(summary)
    }
}
