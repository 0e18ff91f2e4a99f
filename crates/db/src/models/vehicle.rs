//! Vehicle (make/model/variant) entity model and DTOs.

use mdm_core::import::InsurerCodes;
use mdm_core::master::MasterTable;
use mdm_core::product::Product;
use mdm_core::types::Timestamp;
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};

use super::read_insurer_columns;

/// A row from the `mmv_master` table.
#[derive(Debug, Clone, Serialize)]
pub struct Vehicle {
    pub id: String,
    pub ensuredit_id: String,
    pub product_id: i32,
    pub make: Option<String>,
    pub model: Option<String>,
    pub variant: Option<String>,
    pub cc: i32,
    pub fuel_type: Option<String>,
    pub body_type: Option<String>,
    pub seating_capacity: i32,
    pub carrying_capacity: i32,
    pub insurers: InsurerCodes,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl<'r> FromRow<'r, PgRow> for Vehicle {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            ensuredit_id: row.try_get("ensuredit_id")?,
            product_id: row.try_get("product_id")?,
            make: row.try_get("make")?,
            model: row.try_get("model")?,
            variant: row.try_get("variant")?,
            cc: row.try_get("cc")?,
            fuel_type: row.try_get("fuel_type")?,
            body_type: row.try_get("body_type")?,
            seating_capacity: row.try_get("seating_capacity")?,
            carrying_capacity: row.try_get("carrying_capacity")?,
            insurers: read_insurer_columns(row, MasterTable::Vehicle)?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

/// DTO for defining a new vehicle. The ensuredit id is allocated by the
/// server; capacities default per product.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateVehicle {
    pub product_id: Product,
    pub make: String,
    pub model: String,
    pub variant: String,
    pub cc: Option<i32>,
    pub fuel_type: Option<String>,
    pub body_type: Option<String>,
    pub seating_capacity: Option<i32>,
    pub carrying_capacity: Option<i32>,
}

/// DTO for editing a vehicle. All fields optional; the ensuredit id and
/// product are immutable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateVehicle {
    pub make: Option<String>,
    pub model: Option<String>,
    pub variant: Option<String>,
    pub cc: Option<i32>,
    pub fuel_type: Option<String>,
    pub body_type: Option<String>,
    pub seating_capacity: Option<i32>,
    pub carrying_capacity: Option<i32>,
}

/// Query parameters of the vehicle search.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VehicleFilter {
    pub product_id: Option<i32>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub variant: Option<String>,
    pub fuel_type: Option<String>,
    /// Free text matched against make, model, variant and ensuredit id.
    pub q: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
