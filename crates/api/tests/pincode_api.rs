//! HTTP-level integration tests for the `/pincodes` resource.

mod common;

use axum::http::{Method, StatusCode};
use common::{expect_json, get_auth, post_csv, send_json};
use sqlx::PgPool;

const PINCODES_CSV: &str = "Pincode,District,City,State,nivaBupa\n\
                            411001,Pune,Pune,Maharashtra,NB1\n\
                            411002,Pune,Pune,Maharashtra,\n\
                            400001,Mumbai,Mumbai,Maharashtra,\n";

#[sqlx::test(migrations = "../db/migrations")]
async fn import_updates_in_place_on_reimport(pool: PgPool) {
    let token = common::auth_token(&pool).await;
    post_csv(common::build_test_app(pool.clone()), "/api/v1/pincodes/import", PINCODES_CSV, &token).await;

    let changed = "pincode,district,city,state\n411001,Pune City,Pune,Maharashtra\n";
    let response = post_csv(common::build_test_app(pool.clone()), "/api/v1/pincodes/import", changed, &token).await;
    let json = expect_json(response, StatusCode::OK).await;
    assert_eq!(json["data"]["updated"], 1);

    let json = expect_json(
        get_auth(common::build_test_app(pool), "/api/v1/pincodes/411001", Some(&token)).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["data"]["district"], "Pune City");
    assert_eq!(json["data"]["insurers"]["nivaBupa"], serde_json::Value::Null);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn search_by_prefix_and_state(pool: PgPool) {
    let token = common::auth_token(&pool).await;
    post_csv(common::build_test_app(pool.clone()), "/api/v1/pincodes/import", PINCODES_CSV, &token).await;

    let json = expect_json(
        get_auth(common::build_test_app(pool.clone()), "/api/v1/pincodes?q=411", Some(&token)).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);

    let json = expect_json(
        get_auth(
            common::build_test_app(pool),
            "/api/v1/pincodes?state=maharashtra&limit=1",
            Some(&token),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["data"][0]["pincode"], "400001");
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn update_missing_pincode_is_404(pool: PgPool) {
    let token = common::auth_token(&pool).await;
    let response = send_json(
        common::build_test_app(pool),
        Method::PUT,
        "/api/v1/pincodes/000000",
        serde_json::json!({ "city": "Nowhere" }),
        Some(&token),
    )
    .await;
    let json = expect_json(response, StatusCode::NOT_FOUND).await;
    assert_eq!(json["error"], "Pincode with id 000000 not found");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn mapping_upload_uses_payload_column(pool: PgPool) {
    let token = common::auth_token(&pool).await;
    post_csv(common::build_test_app(pool.clone()), "/api/v1/pincodes/import", PINCODES_CSV, &token).await;

    let upload = "pin_code,json_payload\n411001,null\n411002,\"{\"\"zone\"\":\"\"A\"\"}\"\n,orphan\n";
    let response = post_csv(
        common::build_test_app(pool.clone()),
        "/api/v1/pincodes/mappings/import?insurer=nivaBupa&overwrite=true",
        upload,
        &token,
    )
    .await;
    let json = expect_json(response, StatusCode::OK).await;
    assert_eq!(json["data"], serde_json::json!({ "updated": 2, "skipped": 1, "not_found": 0 }));

    let json = expect_json(
        get_auth(common::build_test_app(pool), "/api/v1/pincodes/411002", Some(&token)).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["data"]["insurers"]["nivaBupa"], "{\"zone\":\"A\"}");
}
