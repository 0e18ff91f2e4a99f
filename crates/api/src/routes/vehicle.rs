//! Route definitions for the `/vehicles` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::vehicle;
use crate::state::AppState;

/// Routes mounted at `/vehicles`.
///
/// ```text
/// GET  /                          -> list
/// POST /                          -> create
/// GET  /options                   -> options
/// GET  /makes                     -> makes
/// GET  /models                    -> models
/// GET  /variants                  -> variants
/// POST /import                    -> import
/// POST /mappings/import           -> import_mappings
/// GET  /{id}                      -> get
/// PUT  /{id}                      -> update
/// PUT  /{id}/mappings/{insurer}   -> set_mapping
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(vehicle::list).post(vehicle::create))
        .route("/options", get(vehicle::options))
        .route("/makes", get(vehicle::makes))
        .route("/models", get(vehicle::models))
        .route("/variants", get(vehicle::variants))
        .route("/import", post(vehicle::import))
        .route("/mappings/import", post(vehicle::import_mappings))
        .route("/{id}", get(vehicle::get).put(vehicle::update))
        .route("/{id}/mappings/{insurer}", put(vehicle::set_mapping))
}
