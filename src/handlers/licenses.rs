use axum::extract::State;
use chrono::Utc;

use crate::db::{queries, AppState};
use crate::error::Result;
use crate::extractors::{Json, Path};
use crate::models::{CreateLicense, InvalidReason, License, ValidateLicense, ValidationResult};

/// POST /licenses/ - issue a license. Created active; key auto-generated
/// when not supplied.
pub async fn create_license(
    State(state): State<AppState>,
    Json(input): Json<CreateLicense>,
) -> Result<Json<License>> {
    input.validate()?;

    let mut conn = state.db.get()?;
    let license = queries::create_license(&mut conn, &input)?;

    tracing::info!(
        "Issued license {} for customer {} ({} seats)",
        license.id,
        license.customer_id,
        license.max_seats
    );
    Ok(Json(license))
}

/// POST /licenses/validate - the stateless read path.
///
/// Always answers 200; a business-logic "no" is encoded in the body, never
/// as a transport error. The license row and its seat count are read in one
/// statement, so the snapshot is consistent under concurrent activations.
pub async fn validate_license(
    State(state): State<AppState>,
    Json(req): Json<ValidateLicense>,
) -> Result<Json<ValidationResult>> {
    let conn = state.db.get()?;

    let Some((license, active_seats)) =
        queries::get_license_snapshot(&conn, &req.product_id, &req.key)?
    else {
        return Ok(Json(ValidationResult::rejected(InvalidReason::NotFound)));
    };

    if !license.is_active {
        return Ok(Json(ValidationResult::rejected(InvalidReason::Suspended)));
    }

    if license.is_expired(Utc::now().timestamp()) {
        return Ok(Json(ValidationResult::rejected(InvalidReason::Expired)));
    }

    Ok(Json(ValidationResult::ok(
        license.max_seats as i64 - active_seats,
    )))
}

/// PUT /licenses/{id}/suspend - idempotent. Existing activations stay
/// recorded; validation and new activations are rejected until resume.
pub async fn suspend_license(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<License>> {
    let conn = state.db.get()?;
    let license = queries::set_license_active(&conn, &id, false)?;

    tracing::info!("Suspended license {}", license.id);
    Ok(Json(license))
}

/// PUT /licenses/{id}/resume - idempotent, symmetric to suspend. Restores
/// seat-based validation without resetting activations.
pub async fn resume_license(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<License>> {
    let conn = state.db.get()?;
    let license = queries::set_license_active(&conn, &id, true)?;

    tracing::info!("Resumed license {}", license.id);
    Ok(Json(license))
}
