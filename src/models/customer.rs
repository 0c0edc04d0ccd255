use serde::{Deserialize, Serialize};

use crate::error::Result;

/// End customer. Email is the unique identity key for license lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub email: String,
    pub created_at: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateCustomer {
    pub email: String,
}

impl CreateCustomer {
    pub fn validate(&self) -> Result<()> {
        super::validate_email_format(&self.email)
    }
}
