//! HTTP-level integration tests for the `/rtos` resource.

mod common;

use axum::http::{Method, StatusCode};
use common::{expect_json, get_auth, post_csv, send_json};
use sqlx::PgPool;

const RTOS_CSV: &str = "id,searchString,displayString,rto,city,state,royal,tata\n\
                        MH01,mumbai central,MH-01 Mumbai Central,MH01,Mumbai,Maharashtra,\"{\"\"code\"\":\"\"R1\"\"}\",T1\n\
                        MH12,pune,MH-12 Pune,MH12,Pune,Maharashtra,,\n";

#[sqlx::test(migrations = "../db/migrations")]
async fn import_then_search(pool: PgPool) {
    let token = common::auth_token(&pool).await;

    let response = post_csv(common::build_test_app(pool.clone()), "/api/v1/rtos/import", RTOS_CSV, &token).await;
    let json = expect_json(response, StatusCode::OK).await;
    assert_eq!(json["data"]["inserted"], 2);

    let json = expect_json(
        get_auth(common::build_test_app(pool.clone()), "/api/v1/rtos?q=pune", Some(&token)).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"][0]["id"], "MH12");

    let json = expect_json(
        get_auth(common::build_test_app(pool), "/api/v1/rtos/MH01", Some(&token)).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["data"]["insurers"]["royalSundaram"], "{\"code\":\"R1\"}");
    assert_eq!(json["data"]["insurers"]["tata"], "T1");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn create_conflicts_on_existing_id(pool: PgPool) {
    let token = common::auth_token(&pool).await;
    let body = serde_json::json!({ "id": "KA01", "city": "Bengaluru", "state": "Karnataka" });

    let response = send_json(
        common::build_test_app(pool.clone()),
        Method::POST,
        "/api/v1/rtos",
        body.clone(),
        Some(&token),
    )
    .await;
    let json = expect_json(response, StatusCode::CREATED).await;
    assert_eq!(json["data"]["city"], "Bengaluru");

    let response =
        send_json(common::build_test_app(pool), Method::POST, "/api/v1/rtos", body, Some(&token)).await;
    let json = expect_json(response, StatusCode::CONFLICT).await;
    assert_eq!(json["code"], "CONFLICT");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn mappings_accept_plain_text_and_can_be_cleared(pool: PgPool) {
    let token = common::auth_token(&pool).await;
    post_csv(common::build_test_app(pool.clone()), "/api/v1/rtos/import", RTOS_CSV, &token).await;

    let response = send_json(
        common::build_test_app(pool.clone()),
        Method::PUT,
        "/api/v1/rtos/MH12/mappings/shriram",
        serde_json::json!({ "value": "PUNE-12" }),
        Some(&token),
    )
    .await;
    let json = expect_json(response, StatusCode::OK).await;
    assert_eq!(json["data"]["insurers"]["shriram"], "PUNE-12");

    let response = send_json(
        common::build_test_app(pool.clone()),
        Method::PUT,
        "/api/v1/rtos/MH01/mappings/tata",
        serde_json::json!({ "value": null }),
        Some(&token),
    )
    .await;
    let json = expect_json(response, StatusCode::OK).await;
    assert_eq!(json["data"]["insurers"]["tata"], serde_json::Value::Null);

    let response = send_json(
        common::build_test_app(pool),
        Method::PUT,
        "/api/v1/rtos/XX99/mappings/tata",
        serde_json::json!({ "value": "T" }),
        Some(&token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn mapping_upload_reports_missing_columns(pool: PgPool) {
    let token = common::auth_token(&pool).await;
    let response = post_csv(
        common::build_test_app(pool),
        "/api/v1/rtos/mappings/import?insurer=tata",
        "code,value\nMH01,T\n",
        &token,
    )
    .await;
    let json = expect_json(response, StatusCode::BAD_REQUEST).await;
    assert!(json["error"].as_str().unwrap().contains("ID column"));
}
