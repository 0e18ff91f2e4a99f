//! Integration tests for the idempotent master-table upserts.

use mdm_core::csv::CsvTable;
use mdm_core::import::{pincode_from_row, rto_from_row, vehicle_from_row, UpsertOutcome};
use mdm_core::insurer::Insurer;
use mdm_core::product::Product;
use mdm_db::models::pincode::PincodeFilter;
use mdm_db::models::rto::RtoFilter;
use mdm_db::models::vehicle::VehicleFilter;
use mdm_db::repositories::{PincodeRepo, RtoRepo, VehicleRepo};
use sqlx::PgPool;

const VEHICLES_CSV: &str = "ensureditId,make,model,variant,cc,fuel,digit,tata\n\
                            40110101,HONDA,CITY,VX,1497,Petrol,D1,\"{\"\"code\"\":\"\"T1\"\"}\"\n\
                            40110102,HONDA,CITY,ZX,1497,Petrol,D2,\n";

async fn import_vehicles(pool: &PgPool, text: &str) -> Vec<UpsertOutcome> {
    let csv = CsvTable::parse(text).unwrap();
    let mut outcomes = Vec::new();
    for row in csv.rows() {
        let record = vehicle_from_row(&row, Some(Product::FourWheeler)).unwrap();
        outcomes.push(VehicleRepo::upsert(pool, &record).await.unwrap());
    }
    outcomes
}

async fn count(pool: &PgPool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap()
}

#[sqlx::test(migrations = "./migrations")]
async fn vehicle_reimport_is_idempotent(pool: PgPool) {
    let first = import_vehicles(&pool, VEHICLES_CSV).await;
    assert_eq!(first, vec![UpsertOutcome::Inserted, UpsertOutcome::Inserted]);
    let original = VehicleRepo::find_by_ensuredit_id(&pool, "40110101")
        .await
        .unwrap()
        .unwrap();

    let second = import_vehicles(&pool, VEHICLES_CSV).await;
    assert_eq!(second, vec![UpsertOutcome::Updated, UpsertOutcome::Updated]);
    assert_eq!(count(&pool, "mmv_master").await, 2);

    let again = VehicleRepo::find_by_ensuredit_id(&pool, "40110101")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(again.id, original.id, "surrogate id survives re-import");
    assert_eq!(again.insurers[&Insurer::Tata].as_deref(), Some(r#"{"code":"T1"}"#));
    assert_eq!(again.seating_capacity, 5);
}

#[sqlx::test(migrations = "./migrations")]
async fn vehicle_reimport_overwrites_non_key_columns(pool: PgPool) {
    import_vehicles(&pool, VEHICLES_CSV).await;

    let changed = "ensureditId,make,model,variant,cc,fuel,digit\n\
                   40110101,HONDA,CITY,VX CVT,1498,Hybrid,\n";
    import_vehicles(&pool, changed).await;

    let vehicle = VehicleRepo::find_by_ensuredit_id(&pool, "40110101")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(vehicle.variant.as_deref(), Some("VX CVT"));
    assert_eq!(vehicle.cc, 1498);
    assert_eq!(vehicle.fuel_type.as_deref(), Some("Hybrid"));
    assert_eq!(vehicle.insurers[&Insurer::Digit], None);
    assert_eq!(vehicle.insurers[&Insurer::Tata], None);
}

#[sqlx::test(migrations = "./migrations")]
async fn vehicle_search_filters_and_orders(pool: PgPool) {
    import_vehicles(&pool, VEHICLES_CSV).await;

    let filter = VehicleFilter {
        q: Some("zx".into()),
        ..Default::default()
    };
    let found = VehicleRepo::list(&pool, &filter).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].ensuredit_id, "40110102");

    let filter = VehicleFilter {
        product_id: Some(Product::FourWheeler.id()),
        make: Some("HONDA".into()),
        ..Default::default()
    };
    let variants: Vec<_> = VehicleRepo::list(&pool, &filter)
        .await
        .unwrap()
        .into_iter()
        .map(|v| v.variant.unwrap())
        .collect();
    assert_eq!(variants, vec!["VX", "ZX"]);

    let models = VehicleRepo::models(&pool, Product::FourWheeler, "HONDA").await.unwrap();
    assert_eq!(models, vec!["CITY"]);
    assert!(VehicleRepo::makes(&pool, Product::TwoWheeler).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn rto_upsert_reports_insert_then_update(pool: PgPool) {
    let csv = CsvTable::parse("id,rto,city,state,royal\nMH01,MH01,Mumbai,Maharashtra,R1\n").unwrap();
    let row = csv.rows().next().unwrap();
    let record = rto_from_row(&row).unwrap();

    assert_eq!(RtoRepo::upsert(&pool, &record).await.unwrap(), UpsertOutcome::Inserted);
    assert_eq!(RtoRepo::upsert(&pool, &record).await.unwrap(), UpsertOutcome::Updated);

    let rto = RtoRepo::find_by_id(&pool, "MH01").await.unwrap().unwrap();
    assert_eq!(rto.city.as_deref(), Some("Mumbai"));
    assert_eq!(rto.insurers[&Insurer::RoyalSundaram].as_deref(), Some("R1"));
    assert_eq!(count(&pool, "rto_master").await, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn pincode_search_matches_prefix_and_city(pool: PgPool) {
    let csv = CsvTable::parse(
        "pincode,district,city,state\n411001,Pune,Pune,MH\n411002,Pune,Pune,MH\n400001,Mumbai,Mumbai,MH\n",
    )
    .unwrap();
    for row in csv.rows() {
        PincodeRepo::upsert(&pool, &pincode_from_row(&row).unwrap())
            .await
            .unwrap();
    }

    let by_prefix = PincodeRepo::list(
        &pool,
        &PincodeFilter {
            q: Some("4110".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    let codes: Vec<_> = by_prefix.iter().map(|p| p.pincode.as_str()).collect();
    assert_eq!(codes, vec!["411001", "411002"]);

    let by_city = PincodeRepo::list(
        &pool,
        &PincodeFilter {
            q: Some("mumb".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(by_city.len(), 1);

    let paged = PincodeRepo::list(
        &pool,
        &PincodeFilter {
            limit: Some(1),
            offset: Some(1),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(paged[0].pincode, "411001");
}

#[sqlx::test(migrations = "./migrations")]
async fn location_filters_match_whole_values_only(pool: PgPool) {
    let csv = CsvTable::parse("id,city,state\nMH01,Mumbai,MH\nMP04,Bhopal,MP\n").unwrap();
    for row in csv.rows() {
        RtoRepo::upsert(&pool, &rto_from_row(&row).unwrap()).await.unwrap();
    }

    let rtos = |state: &str| RtoFilter {
        state: Some(state.into()),
        ..Default::default()
    };
    let ids = |found: Vec<mdm_db::models::rto::Rto>| -> Vec<String> {
        found.into_iter().map(|r| r.id).collect()
    };

    assert_eq!(ids(RtoRepo::list(&pool, &rtos("mh")).await.unwrap()), vec!["MH01"]);
    assert!(RtoRepo::list(&pool, &rtos("M_")).await.unwrap().is_empty());
    assert!(RtoRepo::list(&pool, &rtos("%")).await.unwrap().is_empty());

    let csv = CsvTable::parse("pincode,district,city,state\n411001,Pune,Pune,MH\n").unwrap();
    for row in csv.rows() {
        PincodeRepo::upsert(&pool, &pincode_from_row(&row).unwrap()).await.unwrap();
    }
    let wildcard_city = PincodeRepo::list(
        &pool,
        &PincodeFilter {
            city: Some("%".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert!(wildcard_city.is_empty());

    let exact_city = PincodeRepo::list(
        &pool,
        &PincodeFilter {
            city: Some("PUNE".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(exact_city.len(), 1);
}
