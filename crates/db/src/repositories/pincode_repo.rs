//! Repository for the `pincode_master` table.

use mdm_core::import::{PincodeRecord, UpsertOutcome};
use mdm_core::master::MasterTable;
use mdm_core::search::{
    clamp_limit, clamp_offset, contains_pattern, exact_filter, prefix_pattern, DEFAULT_LIMIT,
    MAX_LIMIT,
};
use sqlx::PgPool;

use super::{insurer_binds, master_columns, upsert_sql};
use crate::models::pincode::{CreatePincode, Pincode, PincodeFilter, UpdatePincode};

const TABLE: MasterTable = MasterTable::Pincode;

const FIXED_COLUMNS: [&str; 4] = ["pincode", "district", "city", "state"];

fn columns() -> String {
    master_columns(TABLE, &FIXED_COLUMNS)
}

/// Provides CRUD, search and import queries for pincodes.
pub struct PincodeRepo;

impl PincodeRepo {
    pub async fn create(pool: &PgPool, input: &CreatePincode) -> Result<Pincode, sqlx::Error> {
        let query = format!(
            "INSERT INTO pincode_master (pincode, district, city, state) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {}",
            columns()
        );
        sqlx::query_as::<_, Pincode>(&query)
            .bind(input.pincode.trim())
            .bind(&input.district)
            .bind(&input.city)
            .bind(&input.state)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_pincode(
        pool: &PgPool,
        pincode: &str,
    ) -> Result<Option<Pincode>, sqlx::Error> {
        let query = format!("SELECT {} FROM pincode_master WHERE pincode = $1", columns());
        sqlx::query_as::<_, Pincode>(&query)
            .bind(pincode)
            .fetch_optional(pool)
            .await
    }

    /// Search pincodes. `q` matches a pincode prefix or part of the city or
    /// district. Ordered by pincode.
    pub async fn list(pool: &PgPool, filter: &PincodeFilter) -> Result<Vec<Pincode>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM pincode_master \
             WHERE ($1::TEXT IS NULL OR LOWER(state) = LOWER($1)) \
               AND ($2::TEXT IS NULL OR LOWER(district) = LOWER($2)) \
               AND ($3::TEXT IS NULL OR LOWER(city) = LOWER($3)) \
               AND ($4::TEXT IS NULL OR pincode LIKE $4 OR city ILIKE $5 OR district ILIKE $5) \
             ORDER BY pincode \
             LIMIT $6 OFFSET $7",
            columns()
        );
        sqlx::query_as::<_, Pincode>(&query)
            .bind(exact_filter(filter.state.as_deref()))
            .bind(exact_filter(filter.district.as_deref()))
            .bind(exact_filter(filter.city.as_deref()))
            .bind(prefix_pattern(filter.q.as_deref()))
            .bind(contains_pattern(filter.q.as_deref()))
            .bind(clamp_limit(filter.limit, DEFAULT_LIMIT, MAX_LIMIT))
            .bind(clamp_offset(filter.offset))
            .fetch_all(pool)
            .await
    }

    /// Update a pincode's location columns. Only non-`None` fields are applied.
    ///
    /// Returns `None` if the pincode does not exist.
    pub async fn update(
        pool: &PgPool,
        pincode: &str,
        input: &UpdatePincode,
    ) -> Result<Option<Pincode>, sqlx::Error> {
        let query = format!(
            "UPDATE pincode_master SET \
                district = COALESCE($2, district), \
                city = COALESCE($3, city), \
                state = COALESCE($4, state) \
             WHERE pincode = $1 \
             RETURNING {}",
            columns()
        );
        sqlx::query_as::<_, Pincode>(&query)
            .bind(pincode)
            .bind(&input.district)
            .bind(&input.city)
            .bind(&input.state)
            .fetch_optional(pool)
            .await
    }

    /// Insert or overwrite a pincode row.
    pub async fn upsert(pool: &PgPool, record: &PincodeRecord) -> Result<UpsertOutcome, sqlx::Error> {
        let query = upsert_sql(TABLE, &FIXED_COLUMNS, &[]);
        let mut q = sqlx::query_scalar::<_, bool>(&query)
            .bind(&record.pincode)
            .bind(&record.district)
            .bind(&record.city)
            .bind(&record.state);
        for value in insurer_binds(TABLE, &record.insurers) {
            q = q.bind(value);
        }
        let inserted = q.fetch_one(pool).await?;
        Ok(if inserted {
            UpsertOutcome::Inserted
        } else {
            UpsertOutcome::Updated
        })
    }
}
