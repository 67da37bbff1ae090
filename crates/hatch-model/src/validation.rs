//! Validation helpers shared by the engine's input checks

use crate::ModelError;
use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

/// Lowercase, dash-separated slug of a display name.
///
/// Letters and digits of any script are kept. Runs of anything else
/// collapse into a single dash; leading and trailing dashes are dropped.
pub fn slugify(name: &str) -> Result<String, ModelError> {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;

    for ch in name.chars() {
        if ch.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(ch.to_lowercase());
        } else {
            pending_dash = true;
        }
    }

    if slug.is_empty() {
        Err(ModelError::EmptySlug(name.to_string()))
    } else {
        Ok(slug)
    }
}

/// Shape check only; deliverability is the mail system's problem.
pub fn validate_email(email: &str) -> Result<(), ModelError> {
    if EMAIL.is_match(email.trim()) {
        Ok(())
    } else {
        Err(ModelError::InvalidEmail(email.to_string()))
    }
}
