//! RTO entity model and DTOs.

use mdm_core::import::InsurerCodes;
use mdm_core::master::MasterTable;
use mdm_core::types::Timestamp;
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};

use super::read_insurer_columns;

/// A row from the `rto_master` table.
#[derive(Debug, Clone, Serialize)]
pub struct Rto {
    pub id: String,
    pub search_string: Option<String>,
    pub display_string: Option<String>,
    pub rto: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub insurers: InsurerCodes,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl<'r> FromRow<'r, PgRow> for Rto {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            search_string: row.try_get("search_string")?,
            display_string: row.try_get("display_string")?,
            rto: row.try_get("rto")?,
            city: row.try_get("city")?,
            state: row.try_get("state")?,
            insurers: read_insurer_columns(row, MasterTable::Rto)?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

/// DTO for creating an RTO. Insurer mappings start empty.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRto {
    pub id: String,
    pub search_string: Option<String>,
    pub display_string: Option<String>,
    pub rto: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
}

/// DTO for editing an RTO. The id is immutable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateRto {
    pub search_string: Option<String>,
    pub display_string: Option<String>,
    pub rto: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
}

/// Query parameters of the RTO search.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RtoFilter {
    pub state: Option<String>,
    pub city: Option<String>,
    pub rto: Option<String>,
    /// Free text matched against id, search string, display string and code.
    pub q: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
