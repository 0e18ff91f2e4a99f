pub mod auth;
pub mod health;
pub mod pincode;
pub mod rto;
pub mod vehicle;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                          login (public)
/// /auth/me                             current user
///
/// /vehicles                            search, create
/// /vehicles/options                    fuel and body types per product
/// /vehicles/makes                      makes of a product
/// /vehicles/models                     models of a make
/// /vehicles/variants                   variants of a model
/// /vehicles/import                     CSV upsert (POST)
/// /vehicles/mappings/import            insurer mapping upload (POST)
/// /vehicles/{id}                       get, update
/// /vehicles/{id}/mappings/{insurer}    set one mapping (PUT)
///
/// /rtos, /pincodes                     same shape, without the
///                                      options and drill-down routes
/// ```
///
/// Every route except login requires a bearer token.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/vehicles", vehicle::router())
        .nest("/rtos", rto::router())
        .nest("/pincodes", pincode::router())
}
