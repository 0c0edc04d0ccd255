use axum::extract::State;
use serde::Serialize;

use crate::db::queries::ActivationOutcome;
use crate::db::{queries, AppState};
use crate::error::{AppError, Result};
use crate::extractors::{Json, Path};
use crate::models::{Activation, CreateActivation};

#[derive(Debug, Serialize)]
pub struct DeactivateResponse {
    pub deactivated: bool,
    /// Seats now free on the license (max_seats minus live activations)
    pub remaining_seats: i64,
}

/// POST /activations/ - seat-bounded admission.
///
/// Re-activating a machine that already holds a seat returns the existing
/// record unchanged. The seat-cap check-then-insert is atomic per license
/// (see `queries::activate_machine`).
pub async fn create_activation(
    State(state): State<AppState>,
    Json(input): Json<CreateActivation>,
) -> Result<Json<Activation>> {
    input.validate()?;

    let mut conn = state.db.get()?;

    let outcome = queries::activate_machine(&mut conn, &input)?;
    match &outcome {
        ActivationOutcome::Created(a) => {
            tracing::info!("Activated machine {} on license {}", a.machine_id, a.license_id);
        }
        ActivationOutcome::Existing(a) => {
            tracing::debug!(
                "Machine {} already active on license {}",
                a.machine_id,
                a.license_id
            );
        }
    }

    Ok(Json(outcome.into_activation()))
}

/// DELETE /activations/{id} - frees exactly one seat and reports how many
/// seats are now free. A repeat call on the same id answers 404.
pub async fn delete_activation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeactivateResponse>> {
    let conn = state.db.get()?;

    let activation = queries::get_activation_by_id(&conn, &id)?
        .ok_or_else(|| AppError::NotFound("Activation not found".into()))?;

    queries::delete_activation(&conn, &activation.id)?;

    let license = queries::get_license_by_id(&conn, &activation.license_id)?
        .ok_or_else(|| AppError::Internal("License vanished for activation".into()))?;
    let active = queries::count_activations(&conn, &activation.license_id)?;
    let remaining = license.max_seats as i64 - active;

    tracing::info!(
        "Deactivated machine {} on license {}",
        activation.machine_id,
        activation.license_id
    );
    Ok(Json(DeactivateResponse {
        deactivated: true,
        remaining_seats: remaining,
    }))
}
