//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API: the contact endpoints, the health
//! probes, and the admin-key security scheme. The generated specification
//! backs Swagger UI in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::submission::FieldViolation;
use crate::domain::{Error, ErrorCode};
use crate::inbound::http::contact::{
    CleanupResponse, ErasureResponse, SubmissionRequest, SubmissionResponse,
};

/// Enrich the generated document with the admin header security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "AdminKey",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                "x-admin-key",
                "Shared secret required by the deletion and cleanup endpoints.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Contact form backend API",
        description = "DSGVO-compliant contact form intake with anonymized \
                       client metadata, erasure on request and retention \
                       cleanup."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::contact::submit_contact,
        crate::inbound::http::contact::delete_by_email,
        crate::inbound::http::contact::cleanup_expired,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        SubmissionRequest,
        SubmissionResponse,
        ErasureResponse,
        CleanupResponse,
        FieldViolation,
        Error,
        ErrorCode,
    )),
    tags(
        (name = "contact", description = "Contact form intake and erasure"),
        (name = "health", description = "Probes for orchestration")
    )
)]
pub struct ApiDoc;
