// handlers/mod.rs - Route handlers
//
// Page routes under the protected prefixes (/dashboard, ...) sit behind the
// route guard; the JSON API under /api is reachable without it.

pub mod analytics;
pub mod auth;
pub mod connections;
pub mod dashboard;
pub mod service;

use uuid::Uuid;

use crate::error::ApiError;

/// Parses a required uuid parameter: missing or empty is `missing`, malformed is a 400 too.
pub(crate) fn required_uuid(raw: Option<&str>, missing: &str, name: &str) -> Result<Uuid, ApiError> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty()).ok_or_else(|| ApiError::bad_request(missing))?;
    Uuid::parse_str(raw).map_err(|_| ApiError::bad_request(format!("Invalid {}: {}", name, raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_uuid_distinguishes_missing_and_malformed() {
        let missing = required_uuid(None, "userId required", "userId").unwrap_err();
        assert_eq!(missing.message(), "userId required");

        let empty = required_uuid(Some("  "), "userId required", "userId").unwrap_err();
        assert_eq!(empty.message(), "userId required");

        let malformed = required_uuid(Some("abc"), "userId required", "userId").unwrap_err();
        assert_eq!(malformed.message(), "Invalid userId: abc");

        let id = Uuid::new_v4();
        assert_eq!(required_uuid(Some(&id.to_string()), "x", "x").unwrap(), id);
    }
}
