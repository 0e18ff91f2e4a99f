//! Route definitions for the `/rtos` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::rto;
use crate::state::AppState;

/// Routes mounted at `/rtos`.
///
/// ```text
/// GET  /                          -> list
/// POST /                          -> create
/// POST /import                    -> import
/// POST /mappings/import           -> import_mappings
/// GET  /{id}                      -> get
/// PUT  /{id}                      -> update
/// PUT  /{id}/mappings/{insurer}   -> set_mapping
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(rto::list).post(rto::create))
        .route("/import", post(rto::import))
        .route("/mappings/import", post(rto::import_mappings))
        .route("/{id}", get(rto::get).put(rto::update))
        .route("/{id}/mappings/{insurer}", put(rto::set_mapping))
}
