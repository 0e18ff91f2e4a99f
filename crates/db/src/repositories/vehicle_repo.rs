//! Repository for the `mmv_master` table.

use mdm_core::ensuredit::SQL_ID_PATTERN;
use mdm_core::import::{UpsertOutcome, VehicleRecord};
use mdm_core::master::MasterTable;
use mdm_core::product::Product;
use mdm_core::search::{clamp_limit, clamp_offset, contains_pattern, exact_filter, DEFAULT_LIMIT, MAX_LIMIT};
use sqlx::PgPool;

use super::{insurer_binds, master_columns, upsert_sql};
use crate::models::vehicle::{CreateVehicle, UpdateVehicle, Vehicle, VehicleFilter};

const TABLE: MasterTable = MasterTable::Vehicle;

/// Fixed (non-insurer) columns, in upsert bind order.
const FIXED_COLUMNS: [&str; 11] = [
    "id",
    "ensuredit_id",
    "product_id",
    "make",
    "model",
    "variant",
    "cc",
    "fuel_type",
    "body_type",
    "seating_capacity",
    "carrying_capacity",
];

fn columns() -> String {
    master_columns(TABLE, &FIXED_COLUMNS)
}

/// Convert a segment read back from SQL into an id component.
fn segment(value: Option<i32>) -> Option<u32> {
    value.and_then(|v| u32::try_from(v).ok())
}

/// Provides CRUD, search, import and id-allocation queries for vehicles.
pub struct VehicleRepo;

impl VehicleRepo {
    /// Insert a newly defined vehicle under an already allocated ensuredit id.
    ///
    /// Missing capacities fall back to the product defaults. Insurer
    /// mappings start empty.
    pub async fn create(
        pool: &PgPool,
        ensuredit_id: &str,
        input: &CreateVehicle,
    ) -> Result<Vehicle, sqlx::Error> {
        let product = input.product_id;
        let query = format!(
            "INSERT INTO mmv_master \
                (id, ensuredit_id, product_id, make, model, variant, cc, fuel_type, body_type, \
                 seating_capacity, carrying_capacity) \
             VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, 0), $8, $9, $10, $11) \
             RETURNING {}",
            columns()
        );
        sqlx::query_as::<_, Vehicle>(&query)
            .bind(uuid::Uuid::new_v4().to_string())
            .bind(ensuredit_id)
            .bind(product.id())
            .bind(input.make.trim())
            .bind(input.model.trim())
            .bind(input.variant.trim())
            .bind(input.cc)
            .bind(&input.fuel_type)
            .bind(&input.body_type)
            .bind(input.seating_capacity.unwrap_or(product.default_seating_capacity()))
            .bind(input.carrying_capacity.unwrap_or(product.default_carrying_capacity()))
            .fetch_one(pool)
            .await
    }

    /// Find a vehicle by its surrogate id.
    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Vehicle>, sqlx::Error> {
        let query = format!("SELECT {} FROM mmv_master WHERE id = $1", columns());
        sqlx::query_as::<_, Vehicle>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a vehicle by its ensuredit id.
    pub async fn find_by_ensuredit_id(
        pool: &PgPool,
        ensuredit_id: &str,
    ) -> Result<Option<Vehicle>, sqlx::Error> {
        let query = format!("SELECT {} FROM mmv_master WHERE ensuredit_id = $1", columns());
        sqlx::query_as::<_, Vehicle>(&query)
            .bind(ensuredit_id)
            .fetch_optional(pool)
            .await
    }

    /// Find the vehicle with exactly this product, make, model and variant.
    pub async fn find_by_hierarchy(
        pool: &PgPool,
        product: Product,
        make: &str,
        model: &str,
        variant: &str,
    ) -> Result<Option<Vehicle>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM mmv_master \
             WHERE product_id = $1 AND make = $2 AND model = $3 AND variant = $4 \
             LIMIT 1",
            columns()
        );
        sqlx::query_as::<_, Vehicle>(&query)
            .bind(product.id())
            .bind(make)
            .bind(model)
            .bind(variant)
            .fetch_optional(pool)
            .await
    }

    /// Search vehicles. Ordered by make, model, variant.
    pub async fn list(pool: &PgPool, filter: &VehicleFilter) -> Result<Vec<Vehicle>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM mmv_master \
             WHERE ($1::INTEGER IS NULL OR product_id = $1) \
               AND ($2::TEXT IS NULL OR make = $2) \
               AND ($3::TEXT IS NULL OR model = $3) \
               AND ($4::TEXT IS NULL OR variant = $4) \
               AND ($5::TEXT IS NULL OR fuel_type = $5) \
               AND ($6::TEXT IS NULL \
                    OR make ILIKE $6 OR model ILIKE $6 OR variant ILIKE $6 \
                    OR ensuredit_id ILIKE $6) \
             ORDER BY make, model, variant, ensuredit_id \
             LIMIT $7 OFFSET $8",
            columns()
        );
        sqlx::query_as::<_, Vehicle>(&query)
            .bind(filter.product_id)
            .bind(exact_filter(filter.make.as_deref()))
            .bind(exact_filter(filter.model.as_deref()))
            .bind(exact_filter(filter.variant.as_deref()))
            .bind(exact_filter(filter.fuel_type.as_deref()))
            .bind(contains_pattern(filter.q.as_deref()))
            .bind(clamp_limit(filter.limit, DEFAULT_LIMIT, MAX_LIMIT))
            .bind(clamp_offset(filter.offset))
            .fetch_all(pool)
            .await
    }

    /// Update a vehicle's descriptive columns. Only non-`None` fields are
    /// applied; the ensuredit id and product are immutable.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: &str,
        input: &UpdateVehicle,
    ) -> Result<Option<Vehicle>, sqlx::Error> {
        let query = format!(
            "UPDATE mmv_master SET \
                make = COALESCE($2, make), \
                model = COALESCE($3, model), \
                variant = COALESCE($4, variant), \
                cc = COALESCE($5, cc), \
                fuel_type = COALESCE($6, fuel_type), \
                body_type = COALESCE($7, body_type), \
                seating_capacity = COALESCE($8, seating_capacity), \
                carrying_capacity = COALESCE($9, carrying_capacity) \
             WHERE id = $1 \
             RETURNING {}",
            columns()
        );
        sqlx::query_as::<_, Vehicle>(&query)
            .bind(id)
            .bind(&input.make)
            .bind(&input.model)
            .bind(&input.variant)
            .bind(input.cc)
            .bind(&input.fuel_type)
            .bind(&input.body_type)
            .bind(input.seating_capacity)
            .bind(input.carrying_capacity)
            .fetch_optional(pool)
            .await
    }

    /// Insert or overwrite a vehicle keyed by ensuredit id.
    ///
    /// A new row gets a fresh surrogate id; an existing row keeps its own.
    pub async fn upsert(pool: &PgPool, record: &VehicleRecord) -> Result<UpsertOutcome, sqlx::Error> {
        let query = upsert_sql(TABLE, &FIXED_COLUMNS, &["id"]);
        let mut q = sqlx::query_scalar::<_, bool>(&query)
            .bind(uuid::Uuid::new_v4().to_string())
            .bind(&record.ensuredit_id)
            .bind(record.product_id)
            .bind(&record.make)
            .bind(&record.model)
            .bind(&record.variant)
            .bind(record.cc)
            .bind(&record.fuel_type)
            .bind(&record.body_type)
            .bind(record.seating_capacity)
            .bind(record.carrying_capacity);
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

    /// Distinct makes of a product.
    pub async fn makes(pool: &PgPool, product: Product) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT make FROM mmv_master \
             WHERE product_id = $1 AND make IS NOT NULL \
             ORDER BY make",
        )
        .bind(product.id())
        .fetch_all(pool)
        .await
    }

    /// Distinct models of a make.
    pub async fn models(
        pool: &PgPool,
        product: Product,
        make: &str,
    ) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT model FROM mmv_master \
             WHERE product_id = $1 AND make = $2 AND model IS NOT NULL \
             ORDER BY model",
        )
        .bind(product.id())
        .bind(make)
        .fetch_all(pool)
        .await
    }

    /// Distinct variants of a make and model.
    pub async fn variants(
        pool: &PgPool,
        product: Product,
        make: &str,
        model: &str,
    ) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT variant FROM mmv_master \
             WHERE product_id = $1 AND make = $2 AND model = $3 AND variant IS NOT NULL \
             ORDER BY variant",
        )
        .bind(product.id())
        .bind(make)
        .bind(model)
        .fetch_all(pool)
        .await
    }

    // -- ensuredit id allocation ------------------------------------------

    /// Make id already used by `make` within `product`, if any.
    pub async fn existing_make_id(
        pool: &PgPool,
        product: Product,
        make: &str,
    ) -> Result<Option<u32>, sqlx::Error> {
        let id = sqlx::query_scalar::<_, i32>(
            "SELECT CAST(SUBSTRING(ensuredit_id FROM 1 FOR 3) AS INTEGER) FROM mmv_master \
             WHERE product_id = $1 AND make = $2 AND ensuredit_id ~ $3 \
             ORDER BY ensuredit_id \
             LIMIT 1",
        )
        .bind(product.id())
        .bind(make)
        .bind(SQL_ID_PATTERN)
        .fetch_optional(pool)
        .await?;
        Ok(segment(id))
    }

    /// Highest make id in use among ids carrying the product's prefix.
    ///
    /// The stored `product_id` is not consulted, so no allocated id can
    /// collide with an existing one.
    pub async fn max_make_id(pool: &PgPool, product: Product) -> Result<Option<u32>, sqlx::Error> {
        let id = sqlx::query_scalar::<_, Option<i32>>(
            "SELECT MAX(CAST(SUBSTRING(ensuredit_id FROM 1 FOR 3) AS INTEGER)) FROM mmv_master \
             WHERE ensuredit_id ~ $1 AND LEFT(ensuredit_id, 1) = $2",
        )
        .bind(SQL_ID_PATTERN)
        .bind(product.id_prefix().to_string())
        .fetch_one(pool)
        .await?;
        Ok(segment(id))
    }

    /// Model id already used by `model` under a make id, if any.
    pub async fn existing_model_id(
        pool: &PgPool,
        make_id: u32,
        model: &str,
    ) -> Result<Option<u32>, sqlx::Error> {
        let id = sqlx::query_scalar::<_, i32>(
            "SELECT CAST(SUBSTRING(ensuredit_id FROM 4 FOR 3) AS INTEGER) FROM mmv_master \
             WHERE LEFT(ensuredit_id, 3) = $1 AND model = $2 AND ensuredit_id ~ $3 \
             ORDER BY ensuredit_id \
             LIMIT 1",
        )
        .bind(format!("{make_id:03}"))
        .bind(model)
        .bind(SQL_ID_PATTERN)
        .fetch_optional(pool)
        .await?;
        Ok(segment(id))
    }

    /// Highest model id in use under a make id.
    pub async fn max_model_id(pool: &PgPool, make_id: u32) -> Result<Option<u32>, sqlx::Error> {
        let id = sqlx::query_scalar::<_, Option<i32>>(
            "SELECT MAX(CAST(SUBSTRING(ensuredit_id FROM 4 FOR 3) AS INTEGER)) FROM mmv_master \
             WHERE LEFT(ensuredit_id, 3) = $1 AND ensuredit_id ~ $2",
        )
        .bind(format!("{make_id:03}"))
        .bind(SQL_ID_PATTERN)
        .fetch_one(pool)
        .await?;
        Ok(segment(id))
    }

    /// Variant id already used by `variant` under a make+model prefix, if any.
    pub async fn existing_variant_id(
        pool: &PgPool,
        model_prefix: &str,
        variant: &str,
    ) -> Result<Option<u32>, sqlx::Error> {
        let id = sqlx::query_scalar::<_, i32>(
            "SELECT CAST(SUBSTRING(ensuredit_id FROM 7 FOR 2) AS INTEGER) FROM mmv_master \
             WHERE LEFT(ensuredit_id, 6) = $1 AND variant = $2 AND ensuredit_id ~ $3 \
             ORDER BY ensuredit_id \
             LIMIT 1",
        )
        .bind(model_prefix)
        .bind(variant)
        .bind(SQL_ID_PATTERN)
        .fetch_optional(pool)
        .await?;
        Ok(segment(id))
    }

    /// Highest variant id in use under a make+model prefix.
    pub async fn max_variant_id(pool: &PgPool, model_prefix: &str) -> Result<Option<u32>, sqlx::Error> {
        let id = sqlx::query_scalar::<_, Option<i32>>(
            "SELECT MAX(CAST(SUBSTRING(ensuredit_id FROM 7 FOR 2) AS INTEGER)) FROM mmv_master \
             WHERE LEFT(ensuredit_id, 6) = $1 AND ensuredit_id ~ $2",
        )
        .bind(model_prefix)
        .bind(SQL_ID_PATTERN)
        .fetch_one(pool)
        .await?;
        Ok(segment(id))
    }
}
