//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on the domain service and remain testable without I/O.

use crate::domain::ContactService;
use crate::server::config::AdminApiKey;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Contact submission use-cases.
    pub contact: ContactService,
    /// Configured admin shared secret, if any.
    pub admin_key: Option<AdminApiKey>,
}

impl HttpState {
    /// Bundle the service and the optional admin credential.
    pub fn new(contact: ContactService, admin_key: Option<AdminApiKey>) -> Self {
        Self { contact, admin_key }
    }
}
