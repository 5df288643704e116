//! Admin credential gate for destructive endpoints.
//!
//! The entire admin trust model is one shared secret presented in a
//! header and compared for exact equality. A missing *configuration* is an
//! operator fault and maps to an internal error, not to unauthorized.

use actix_web::HttpRequest;

use crate::domain::{ApiResult, Error};
use crate::server::config::AdminApiKey;

/// Header carrying the admin shared secret.
pub const ADMIN_KEY_HEADER: &str = "x-admin-key";

/// Check the presented admin credential against the configured one.
///
/// Runs before any store interaction, so a failed check never mutates
/// state.
pub fn require_admin_key(req: &HttpRequest, configured: Option<&AdminApiKey>) -> ApiResult<()> {
    let Some(expected) = configured else {
        return Err(Error::internal("Admin functionality not configured"));
    };

    let presented = req
        .headers()
        .get(ADMIN_KEY_HEADER)
        .and_then(|value| value.to_str().ok());

    match presented {
        Some(value) if expected.matches(value) => Ok(()),
        _ => Err(Error::unauthorized("Unauthorized - Invalid admin key")),
    }
}
