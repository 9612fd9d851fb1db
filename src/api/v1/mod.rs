//! Public read endpoints

pub mod bills;
pub mod feed;
pub mod search;

use axum::routing::get;
use axum::Router;

use super::state::AppState;

/// Create the v1 router
pub fn create_v1_router() -> Router<AppState> {
    Router::new()
        .route("/feed", get(feed::get_feed))
        .route("/search", get(search::search))
        .route("/bills/{congress}/{bill_type}/{number}", get(bills::get_bill))
}
