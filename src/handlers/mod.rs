mod activations;
mod brands;
mod customers;
mod licenses;
mod products;

pub use activations::*;
pub use brands::*;
pub use customers::*;
pub use licenses::*;
pub use products::*;

use axum::{
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Serialize;

use crate::db::AppState;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        // Registry
        .route("/brands/", get(list_brands).post(create_brand))
        .route("/products/", get(list_products).post(create_product))
        .route("/customers/", get(list_customers).post(create_customer))
        .route("/customers/{email}/licenses", get(list_customer_licenses))
        // Ledger
        .route("/licenses/", post(create_license))
        .route("/licenses/validate", post(validate_license))
        .route("/licenses/{id}/suspend", put(suspend_license))
        .route("/licenses/{id}/resume", put(resume_license))
        // Tracker
        .route("/activations/", post(create_activation))
        .route("/activations/{id}", delete(delete_activation))
}
