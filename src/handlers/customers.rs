use axum::extract::State;

use crate::db::{queries, AppState};
use crate::error::{AppError, Result};
use crate::extractors::{Json, Path, Query};
use crate::models::{CreateCustomer, Customer, LicenseWithActivations};
use crate::pagination::PaginationQuery;

pub async fn create_customer(
    State(state): State<AppState>,
    Json(input): Json<CreateCustomer>,
) -> Result<Json<Customer>> {
    input.validate()?;

    let conn = state.db.get()?;
    let customer = queries::create_customer(&conn, &input)?;

    tracing::info!("Registered customer {}", customer.id);
    Ok(Json(customer))
}

pub async fn list_customers(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<Vec<Customer>>> {
    let conn = state.db.get()?;
    let customers = queries::list_customers(&conn, pagination.limit(), pagination.offset())?;
    Ok(Json(customers))
}

/// GET /customers/{email}/licenses - every license for the customer, joined
/// with its activations and computed seat counts.
pub async fn list_customer_licenses(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<Vec<LicenseWithActivations>>> {
    let mut conn = state.db.get()?;

    let customer = queries::get_customer_by_email(&conn, &email)?
        .ok_or_else(|| AppError::NotFound("Customer not found".into()))?;

    let licenses = queries::licenses_for_customer(&mut conn, &customer.id)?;
    Ok(Json(licenses))
}
