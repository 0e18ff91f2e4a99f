//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` (or any `PgExecutor`) as the first argument.

use mdm_core::import::InsurerCodes;
use mdm_core::master::MasterTable;

pub mod mapping_repo;
pub mod pincode_repo;
pub mod rto_repo;
pub mod user_repo;
pub mod vehicle_repo;

pub use mapping_repo::MappingRepo;
pub use pincode_repo::PincodeRepo;
pub use rto_repo::RtoRepo;
pub use user_repo::UserRepo;
pub use vehicle_repo::VehicleRepo;

/// Full column list of a master table: its fixed columns, every insurer
/// column, then the timestamps.
pub(crate) fn master_columns(table: MasterTable, fixed: &[&str]) -> String {
    format!(
        "{}, {}, created_at, updated_at",
        fixed.join(", "),
        table.insurer_columns()
    )
}

/// Build the idempotent upsert for a master table.
///
/// Binds `fixed` columns first (`$1..`), then the table's insurer columns in
/// catalogue order. On a conflict of the business key every column except
/// the key and `immutable` ones is overwritten. The statement returns a
/// single boolean, `true` when the row was inserted.
pub(crate) fn upsert_sql(table: MasterTable, fixed: &[&str], immutable: &[&str]) -> String {
    let columns: Vec<&str> = fixed
        .iter()
        .copied()
        .chain(table.insurers().iter().map(|i| i.column()))
        .collect();

    let placeholders: Vec<String> = (1..=columns.len()).map(|n| format!("${n}")).collect();

    let key = table.key_column();
    let assignments: Vec<String> = columns
        .iter()
        .filter(|c| **c != key && !immutable.contains(c))
        .map(|c| format!("{c} = EXCLUDED.{c}"))
        .chain(std::iter::once("updated_at = NOW()".to_string()))
        .collect();

    format!(
        "INSERT INTO {table} ({columns}) VALUES ({values}) \
         ON CONFLICT ({key}) DO UPDATE SET {assignments} \
         RETURNING (xmax = 0) AS inserted",
        table = table.table_name(),
        columns = columns.join(", "),
        values = placeholders.join(", "),
        assignments = assignments.join(", "),
    )
}

/// Insurer values of a record in the bind order used by [`upsert_sql`].
pub(crate) fn insurer_binds(table: MasterTable, codes: &InsurerCodes) -> Vec<Option<String>> {
    table
        .insurers()
        .iter()
        .map(|insurer| codes.get(insurer).cloned().flatten())
        .collect()
}
