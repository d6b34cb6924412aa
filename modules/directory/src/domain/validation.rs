//! Input rules for directory writes.

use super::error::DomainError;

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Empty mail is allowed; anything else must look like `local@domain.tld`.
///
/// # Errors
/// Returns [`DomainError::Validation`] for a malformed address.
pub fn validate_mail(mail: &str) -> Result<(), DomainError> {
    if mail.is_empty() {
        return Ok(());
    }
    if looks_like_mail(mail) {
        Ok(())
    } else {
        Err(DomainError::validation("Invalid email format"))
    }
}

/// A single `@` splits a non-empty local part from a domain with an inner
/// dot. Whitespace is never allowed.
fn looks_like_mail(mail: &str) -> bool {
    if mail.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = mail.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain
            .char_indices()
            .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

/// Both entries are required, must match and be long enough.
///
/// # Errors
/// Returns [`DomainError::Validation`] naming the first rule that failed.
pub fn validate_new_password(new_password: &str, repeat_password: &str) -> Result<(), DomainError> {
    if new_password.is_empty() || repeat_password.is_empty() {
        return Err(DomainError::validation("Password fields are required"));
    }
    if new_password != repeat_password {
        return Err(DomainError::validation("Passwords do not match"));
    }
    if new_password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(DomainError::validation(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters long"
        )));
    }
    Ok(())
}
