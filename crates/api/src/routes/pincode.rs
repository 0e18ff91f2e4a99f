//! Route definitions for the `/pincodes` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::pincode;
use crate::state::AppState;

/// Routes mounted at `/pincodes`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(pincode::list).post(pincode::create))
        .route("/import", post(pincode::import))
        .route("/mappings/import", post(pincode::import_mappings))
        .route("/{pincode}", get(pincode::get).put(pincode::update))
        .route("/{pincode}/mappings/{insurer}", put(pincode::set_mapping))
}
