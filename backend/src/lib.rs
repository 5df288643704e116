//! DSGVO-compliant contact form backend.
//!
//! Accepts contact form submissions over HTTP, stores them with
//! privacy-reduced client metadata, and supports erasure on request
//! (Right to be Forgotten) as well as retention-based cleanup.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod outbound;
pub mod server;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
