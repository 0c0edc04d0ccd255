use axum::extract::State;

use crate::db::{queries, AppState};
use crate::error::Result;
use crate::extractors::{Json, Query};
use crate::models::{CreateProduct, Product};
use crate::pagination::PaginationQuery;

pub async fn create_product(
    State(state): State<AppState>,
    Json(input): Json<CreateProduct>,
) -> Result<Json<Product>> {
    input.validate()?;

    let conn = state.db.get()?;
    let product = queries::create_product(&conn, &input)?;

    tracing::info!("Created product {} ({})", product.name, product.id);
    Ok(Json(product))
}

pub async fn list_products(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<Vec<Product>>> {
    let conn = state.db.get()?;
    let products = queries::list_products(&conn, pagination.limit(), pagination.offset())?;
    Ok(Json(products))
}
