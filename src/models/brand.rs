use serde::{Deserialize, Serialize};

use crate::error::{msg, AppError, Result};

/// A software vendor. Brand names are unique and immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brand {
    pub id: String,
    pub name: String,
    /// Contact email for the brand
    pub email: String,
    pub created_at: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateBrand {
    pub name: String,
    pub email: String,
}

impl CreateBrand {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::BadRequest(msg::NAME_EMPTY.into()));
        }
        super::validate_email_format(&self.email)?;
        Ok(())
    }
}
