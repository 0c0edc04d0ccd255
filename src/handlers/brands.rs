use axum::extract::State;

use crate::db::{queries, AppState};
use crate::error::Result;
use crate::extractors::{Json, Query};
use crate::models::{Brand, CreateBrand};
use crate::pagination::PaginationQuery;

pub async fn create_brand(
    State(state): State<AppState>,
    Json(input): Json<CreateBrand>,
) -> Result<Json<Brand>> {
    input.validate()?;

    let conn = state.db.get()?;
    let brand = queries::create_brand(&conn, &input)?;

    tracing::info!("Created brand {} ({})", brand.name, brand.id);
    Ok(Json(brand))
}

pub async fn list_brands(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<Vec<Brand>>> {
    let conn = state.db.get()?;
    let brands = queries::list_brands(&conn, pagination.limit(), pagination.offset())?;
    Ok(Json(brands))
}
