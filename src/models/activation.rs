use serde::{Deserialize, Serialize};

use crate::error::{msg, AppError, Result};

/// One consumed seat: a machine activated against a license.
///
/// `(license_id, machine_id)` is unique - re-activating the same machine
/// returns the existing record instead of consuming another seat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activation {
    pub id: String,
    pub license_id: String,
    /// Stable identifier of the machine/instance
    pub machine_id: String,
    /// e.g. "John's MacBook"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub friendly_name: Option<String>,
    pub activated_at: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateActivation {
    pub license_id: String,
    pub machine_id: String,
    #[serde(default)]
    pub friendly_name: Option<String>,
}

impl CreateActivation {
    pub fn validate(&self) -> Result<()> {
        if self.machine_id.trim().is_empty() {
            return Err(AppError::BadRequest(msg::MACHINE_ID_EMPTY.into()));
        }
        Ok(())
    }
}
