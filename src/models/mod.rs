mod activation;
mod brand;
mod customer;
mod license;
mod product;

pub use activation::*;
pub use brand::*;
pub use customer::*;
pub use license::*;
pub use product::*;

use crate::error::{msg, AppError, Result};

/// Basic email format validation.
///
/// Validates that email has:
/// - Exactly one @ symbol
/// - Non-empty local part (before @)
/// - Non-empty domain part (after @) with at least one dot
///
/// This is intentionally permissive to avoid rejecting valid but unusual
/// emails. It's not meant to be RFC 5322 compliant - just a sanity check.
pub(crate) fn validate_email_format(email: &str) -> Result<()> {
    let email = email.trim();

    if email.is_empty() {
        return Err(AppError::BadRequest(msg::EMAIL_EMPTY.into()));
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return Err(AppError::BadRequest(msg::INVALID_EMAIL_FORMAT.into()));
    }

    let local_part = parts[0];
    let domain_part = parts[1];

    if local_part.is_empty() || local_part.contains(' ') {
        return Err(AppError::BadRequest(msg::INVALID_EMAIL_FORMAT.into()));
    }

    if domain_part.is_empty() || !domain_part.contains('.') {
        return Err(AppError::BadRequest(msg::INVALID_EMAIL_FORMAT.into()));
    }

    if domain_part.starts_with('.') || domain_part.ends_with('.') {
        return Err(AppError::BadRequest(msg::INVALID_EMAIL_FORMAT.into()));
    }

    Ok(())
}
