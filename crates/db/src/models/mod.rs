//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches
//! - A `Deserialize` filter for the list/search endpoint

use mdm_core::import::InsurerCodes;
use mdm_core::master::MasterTable;
use sqlx::postgres::PgRow;
use sqlx::Row;

pub mod pincode;
pub mod rto;
pub mod user;
pub mod vehicle;

/// Read every insurer column of `table` from a result row.
pub(crate) fn read_insurer_columns(
    row: &PgRow,
    table: MasterTable,
) -> Result<InsurerCodes, sqlx::Error> {
    table
        .insurers()
        .iter()
        .map(|insurer| Ok((*insurer, row.try_get::<Option<String>, _>(insurer.column())?)))
        .collect()
}
