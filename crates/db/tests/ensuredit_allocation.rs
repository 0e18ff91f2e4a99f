//! Integration tests for the segment lookups behind ensuredit id allocation.

use mdm_core::ensuredit::EnsureditId;
use mdm_core::product::Product;
use mdm_db::models::vehicle::CreateVehicle;
use mdm_db::repositories::VehicleRepo;
use sqlx::PgPool;

async fn insert(pool: &PgPool, ensuredit_id: &str, product: Product, make: &str, model: &str, variant: &str) {
    VehicleRepo::create(
        pool,
        ensuredit_id,
        &CreateVehicle {
            product_id: product,
            make: make.into(),
            model: model.into(),
            variant: variant.into(),
            cc: None,
            fuel_type: None,
            body_type: None,
            seating_capacity: None,
            carrying_capacity: None,
        },
    )
    .await
    .unwrap();
}

#[sqlx::test(migrations = "./migrations")]
async fn empty_table_has_no_segments(pool: PgPool) {
    assert_eq!(VehicleRepo::max_make_id(&pool, Product::FourWheeler).await.unwrap(), None);
    assert_eq!(VehicleRepo::max_model_id(&pool, 401).await.unwrap(), None);
    assert_eq!(VehicleRepo::max_variant_id(&pool, "401101").await.unwrap(), None);
}

#[sqlx::test(migrations = "./migrations")]
async fn segments_are_read_back_per_product_and_prefix(pool: PgPool) {
    insert(&pool, "40110101", Product::FourWheeler, "HONDA", "CITY", "VX").await;
    insert(&pool, "40110203", Product::FourWheeler, "HONDA", "JAZZ", "S").await;
    insert(&pool, "40210101", Product::FourWheeler, "TATA", "NEXON", "XZ").await;
    insert(&pool, "10110101", Product::TwoWheeler, "HONDA", "SHINE", "DRUM").await;
    insert(&pool, "LEGACY-1", Product::FourWheeler, "HONDA", "OLD", "X").await;

    assert_eq!(VehicleRepo::existing_make_id(&pool, Product::FourWheeler, "HONDA").await.unwrap(), Some(401));
    assert_eq!(VehicleRepo::existing_make_id(&pool, Product::TwoWheeler, "HONDA").await.unwrap(), Some(101));
    assert_eq!(VehicleRepo::existing_make_id(&pool, Product::FourWheeler, "KIA").await.unwrap(), None);
    assert_eq!(VehicleRepo::max_make_id(&pool, Product::FourWheeler).await.unwrap(), Some(402));
    assert_eq!(VehicleRepo::max_make_id(&pool, Product::TwoWheeler).await.unwrap(), Some(101));

    assert_eq!(VehicleRepo::existing_model_id(&pool, 401, "JAZZ").await.unwrap(), Some(102));
    assert_eq!(VehicleRepo::existing_model_id(&pool, 401, "OLD").await.unwrap(), None);
    assert_eq!(VehicleRepo::max_model_id(&pool, 401).await.unwrap(), Some(102));

    let prefix = EnsureditId::model_prefix(401, 102);
    assert_eq!(VehicleRepo::existing_variant_id(&pool, &prefix, "S").await.unwrap(), Some(3));
    assert_eq!(VehicleRepo::max_variant_id(&pool, &prefix).await.unwrap(), Some(3));
}

#[sqlx::test(migrations = "./migrations")]
async fn highest_make_counts_prefix_regardless_of_stored_product(pool: PgPool) {
    insert(&pool, "40110101", Product::FourWheeler, "HONDA", "CITY", "VX").await;
    insert(&pool, "40510101", Product::TwoWheeler, "MISFILED", "ROW", "X").await;

    assert_eq!(VehicleRepo::max_make_id(&pool, Product::FourWheeler).await.unwrap(), Some(405));
    assert_eq!(VehicleRepo::max_make_id(&pool, Product::TwoWheeler).await.unwrap(), None);
}

#[sqlx::test(migrations = "./migrations")]
async fn create_applies_product_defaults(pool: PgPool) {
    insert(&pool, "10110101", Product::TwoWheeler, "HERO", "SPLENDOR", "PLUS").await;

    let vehicle = VehicleRepo::find_by_ensuredit_id(&pool, "10110101")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(vehicle.product_id, 1);
    assert_eq!(vehicle.seating_capacity, 2);
    assert_eq!(vehicle.carrying_capacity, 1);
    assert_eq!(vehicle.cc, 0);
    assert!(vehicle.insurers.values().all(Option::is_none));

    let found = VehicleRepo::find_by_hierarchy(&pool, Product::TwoWheeler, "HERO", "SPLENDOR", "PLUS")
        .await
        .unwrap();
    assert_eq!(found.map(|v| v.id), Some(vehicle.id));
}
