//! Pincode entity model and DTOs.

use mdm_core::import::InsurerCodes;
use mdm_core::master::MasterTable;
use mdm_core::types::Timestamp;
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};

use super::read_insurer_columns;

/// A row from the `pincode_master` table.
#[derive(Debug, Clone, Serialize)]
pub struct Pincode {
    pub pincode: String,
    pub district: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub insurers: InsurerCodes,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl<'r> FromRow<'r, PgRow> for Pincode {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            pincode: row.try_get("pincode")?,
            district: row.try_get("district")?,
            city: row.try_get("city")?,
            state: row.try_get("state")?,
            insurers: read_insurer_columns(row, MasterTable::Pincode)?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

/// DTO for creating a pincode. Insurer mappings start empty.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePincode {
    pub pincode: String,
    pub district: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
}

/// DTO for editing a pincode. The pincode itself is immutable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePincode {
    pub district: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
}

/// Query parameters of the pincode search.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PincodeFilter {
    pub state: Option<String>,
    pub district: Option<String>,
    pub city: Option<String>,
    /// Pincode prefix, or text contained in city or district.
    pub q: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
