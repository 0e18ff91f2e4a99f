//! Repository for the `rto_master` table.

use mdm_core::import::{RtoRecord, UpsertOutcome};
use mdm_core::master::MasterTable;
use mdm_core::search::{clamp_limit, clamp_offset, contains_pattern, exact_filter, DEFAULT_LIMIT, MAX_LIMIT};
use sqlx::PgPool;

use super::{insurer_binds, master_columns, upsert_sql};
use crate::models::rto::{CreateRto, Rto, RtoFilter, UpdateRto};

const TABLE: MasterTable = MasterTable::Rto;

const FIXED_COLUMNS: [&str; 6] = ["id", "search_string", "display_string", "rto", "city", "state"];

fn columns() -> String {
    master_columns(TABLE, &FIXED_COLUMNS)
}

/// Provides CRUD, search and import queries for RTOs.
pub struct RtoRepo;

impl RtoRepo {
    /// Insert a new RTO, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateRto) -> Result<Rto, sqlx::Error> {
        let query = format!(
            "INSERT INTO rto_master (id, search_string, display_string, rto, city, state) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {}",
            columns()
        );
        sqlx::query_as::<_, Rto>(&query)
            .bind(input.id.trim())
            .bind(&input.search_string)
            .bind(&input.display_string)
            .bind(&input.rto)
            .bind(&input.city)
            .bind(&input.state)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Rto>, sqlx::Error> {
        let query = format!("SELECT {} FROM rto_master WHERE id = $1", columns());
        sqlx::query_as::<_, Rto>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Search RTOs. Ordered by id.
    pub async fn list(pool: &PgPool, filter: &RtoFilter) -> Result<Vec<Rto>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM rto_master \
             WHERE ($1::TEXT IS NULL OR LOWER(state) = LOWER($1)) \
               AND ($2::TEXT IS NULL OR LOWER(city) = LOWER($2)) \
               AND ($3::TEXT IS NULL OR LOWER(rto) = LOWER($3)) \
               AND ($4::TEXT IS NULL \
                    OR id ILIKE $4 OR search_string ILIKE $4 \
                    OR display_string ILIKE $4 OR rto ILIKE $4) \
             ORDER BY id \
             LIMIT $5 OFFSET $6",
            columns()
        );
        sqlx::query_as::<_, Rto>(&query)
            .bind(exact_filter(filter.state.as_deref()))
            .bind(exact_filter(filter.city.as_deref()))
            .bind(exact_filter(filter.rto.as_deref()))
            .bind(contains_pattern(filter.q.as_deref()))
            .bind(clamp_limit(filter.limit, DEFAULT_LIMIT, MAX_LIMIT))
            .bind(clamp_offset(filter.offset))
            .fetch_all(pool)
            .await
    }

    /// Update an RTO. Only non-`None` fields are applied; the id is immutable.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: &str,
        input: &UpdateRto,
    ) -> Result<Option<Rto>, sqlx::Error> {
        let query = format!(
            "UPDATE rto_master SET \
                search_string = COALESCE($2, search_string), \
                display_string = COALESCE($3, display_string), \
                rto = COALESCE($4, rto), \
                city = COALESCE($5, city), \
                state = COALESCE($6, state) \
             WHERE id = $1 \
             RETURNING {}",
            columns()
        );
        sqlx::query_as::<_, Rto>(&query)
            .bind(id)
            .bind(&input.search_string)
            .bind(&input.display_string)
            .bind(&input.rto)
            .bind(&input.city)
            .bind(&input.state)
            .fetch_optional(pool)
            .await
    }

    /// Insert or overwrite an RTO keyed by id.
    pub async fn upsert(pool: &PgPool, record: &RtoRecord) -> Result<UpsertOutcome, sqlx::Error> {
        let query = upsert_sql(TABLE, &FIXED_COLUMNS, &[]);
        let mut q = sqlx::query_scalar::<_, bool>(&query)
            .bind(&record.id)
            .bind(&record.search_string)
            .bind(&record.display_string)
            .bind(&record.rto)
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
