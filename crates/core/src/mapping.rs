//! Rules for editing a single insurer mapping column.
//!
//! Covers both the single-row edit form and the bulk mapping upload, where a
//! CSV with an identifier column and a payload column updates one insurer's
//! mapping across many rows.

use serde::Serialize;

use crate::csv::CsvTable;
use crate::error::CoreError;
use crate::insurer::Insurer;
use crate::master::{MasterTable, VEHICLE_PLAIN_CODE_INSURERS};

/// Header names recognised as the row identifier of a mapping upload.
pub const ID_COLUMN_ALIASES: [&str; 5] = ["ensuredit_id", "id", "rto_id", "pincode", "pin_code"];

/// Header names recognised as the payload of a mapping upload, besides the
/// insurer's own name.
pub const PAYLOAD_COLUMN_ALIASES: [&str; 4] = ["json_payload", "payload", "data", "search_string"];

/// Spreadsheet placeholders that mean "no value".
const NULL_MARKERS: [&str; 3] = ["nan", "none", "null"];

/// Column positions of a mapping upload file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MappingColumns {
    pub id: usize,
    pub payload: usize,
}

/// What to do with one row of a mapping upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingDecision {
    /// Write the value; `None` clears the column.
    Write(Option<String>),
    Skip,
}

/// Outcome counters of a mapping upload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MappingUploadSummary {
    pub updated: usize,
    pub skipped: usize,
    pub not_found: usize,
}

/// Check that `table` carries a column for `insurer`.
pub fn ensure_table_has_insurer(table: MasterTable, insurer: Insurer) -> Result<(), CoreError> {
    if table.has_insurer(insurer) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "{} master has no mapping column for insurer '{insurer}'",
            table.entity()
        )))
    }
}

/// Locate the identifier and payload columns of a mapping upload.
pub fn locate_columns(csv: &CsvTable, insurer: Insurer) -> Result<MappingColumns, CoreError> {
    let id = csv.find_column(&ID_COLUMN_ALIASES);

    let mut payload_aliases: Vec<String> = insurer.header_aliases();
    payload_aliases.extend(PAYLOAD_COLUMN_ALIASES.iter().map(|s| s.to_string()));
    let payload = csv.find_column(&payload_aliases);

    match (id, payload) {
        (Some(id), Some(payload)) if id != payload => Ok(MappingColumns { id, payload }),
        _ => Err(CoreError::Validation(format!(
            "CSV must contain an ID column ({}) and a data column ('{insurer}' or 'json_payload'). Found: {:?}",
            ID_COLUMN_ALIASES.join(", "),
            csv.headers()
        ))),
    }
}

/// Normalize an uploaded payload cell: trim, and map blanks and spreadsheet
/// null markers to `None`.
pub fn normalize_payload(raw: Option<&str>) -> Option<String> {
    let value = raw?.trim();
    if value.is_empty() || NULL_MARKERS.iter().any(|m| value.eq_ignore_ascii_case(m)) {
        None
    } else {
        Some(value.to_string())
    }
}

/// Whether a stored mapping counts as empty.
pub fn is_empty_mapping(stored: Option<&str>) -> bool {
    match stored.map(str::trim) {
        None => true,
        Some(v) => v.is_empty() || v == "{}",
    }
}

/// Decide how an uploaded value changes a stored mapping.
///
/// With `overwrite` every row is written, and an empty upload clears the
/// mapping. Without it an empty mapping is only filled by a non-empty value,
/// and a non-empty one is rewritten (or cleared) whenever the upload differs.
pub fn decide(stored: Option<&str>, incoming: Option<String>, overwrite: bool) -> MappingDecision {
    if overwrite {
        return MappingDecision::Write(incoming);
    }
    if is_empty_mapping(stored) {
        return match incoming {
            Some(value) => MappingDecision::Write(Some(value)),
            None => MappingDecision::Skip,
        };
    }
    if stored == incoming.as_deref() {
        MappingDecision::Skip
    } else {
        MappingDecision::Write(incoming)
    }
}

/// Validate a single-row mapping edit and normalize it for storage.
///
/// Blank values clear the mapping. Vehicle mappings must be valid JSON,
/// except for insurers whose vehicle codes are plain strings.
pub fn prepare_mapping_value(
    table: MasterTable,
    insurer: Insurer,
    value: Option<&str>,
) -> Result<Option<String>, CoreError> {
    ensure_table_has_insurer(table, insurer)?;

    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };

    let needs_json =
        table == MasterTable::Vehicle && !VEHICLE_PLAIN_CODE_INSURERS.contains(&insurer);
    if needs_json {
        serde_json::from_str::<serde_json::Value>(value).map_err(|e| {
            CoreError::Validation(format!("Invalid JSON for {insurer}: {e}"))
        })?;
    }
    Ok(Some(value.to_string()))
}
