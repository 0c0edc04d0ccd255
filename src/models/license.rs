use serde::{Deserialize, Serialize};

use crate::error::{msg, AppError, Result};
use crate::models::Activation;

/// A license binds a customer to a product with a seat cap.
///
/// Seat occupancy is not stored here - it is the count of live activation
/// rows, so it cannot drift from the tracker's view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct License {
    pub id: String,
    /// Unique per product. Auto-generated when not supplied at issuance.
    pub key: String,
    pub customer_id: String,
    pub product_id: String,
    pub is_active: bool,
    pub max_seats: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
    pub created_at: i64,
}

impl License {
    /// Whether the license has passed its expiry timestamp as of `now`.
    pub fn is_expired(&self, now: i64) -> bool {
        matches!(self.expires_at, Some(exp) if now > exp)
    }
}

/// A license joined with its activations, as served to the dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct LicenseWithActivations {
    #[serde(flatten)]
    pub license: License,
    pub activations: Vec<Activation>,
    /// Live activation count (computed, never stored)
    pub active_seats: i64,
}

fn default_max_seats() -> i32 {
    1
}

#[derive(Debug, Deserialize)]
pub struct CreateLicense {
    pub customer_id: String,
    pub product_id: String,
    /// Omit to have a random URL-safe key generated server-side
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default = "default_max_seats")]
    pub max_seats: i32,
    #[serde(default)]
    pub expires_at: Option<i64>,
}

impl CreateLicense {
    pub fn validate(&self) -> Result<()> {
        if self.max_seats < 1 {
            return Err(AppError::BadRequest(msg::MAX_SEATS_RANGE.into()));
        }
        if let Some(ref key) = self.key
            && key.trim().is_empty()
        {
            return Err(AppError::BadRequest(msg::KEY_EMPTY.into()));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct ValidateLicense {
    pub key: String,
    pub product_id: String,
}

/// Why a validation came back negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidReason {
    NotFound,
    Suspended,
    Expired,
}

/// Body of the validate response. Always delivered with HTTP 200 - a
/// business-logic "no" is not a transport error.
#[derive(Debug, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<InvalidReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seats_available: Option<i64>,
}

impl ValidationResult {
    pub fn ok(seats_available: i64) -> Self {
        Self {
            valid: true,
            reason: None,
            seats_available: Some(seats_available),
        }
    }

    pub fn rejected(reason: InvalidReason) -> Self {
        Self {
            valid: false,
            reason: Some(reason),
            seats_available: None,
        }
    }
}
