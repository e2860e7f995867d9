use crate::roster::audit::error::{AuditError, Result};

/// Produces the canonical comparison form of an email address.
///
/// Webmail providers ignore dots in the local-part, so the same mailbox shows
/// up under several spellings across exports. Dots are stripped from the
/// local-part for every domain and the local-part is lower-cased; the domain
/// is kept as written.
pub fn normalize_email(email: &str) -> Result<String> {
    let email = email.trim();
    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(AuditError::InvalidEmailFormat(email.to_string()));
    };

    let local: String = local
        .chars()
        .filter(|ch| *ch != '.')
        .flat_map(char::to_lowercase)
        .collect();

    Ok(format!("{local}@{domain}"))
}
