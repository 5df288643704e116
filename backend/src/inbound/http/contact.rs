//! Contact form HTTP handlers.
//!
//! ```text
//! POST   /api/v1/contact/submit
//! DELETE /api/v1/contact/delete/{email}
//! POST   /api/v1/contact/cleanup
//! ```
//!
//! Submit is public; delete and cleanup require the admin header checked
//! by [`require_admin_key`] before anything touches the store.

use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, delete, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::submission::{FieldViolation, SubmissionForm};
use crate::domain::{ClientMetadata, Error, SubmissionDraft, SubmissionId, SubmissionReceipt};
use crate::inbound::http::ApiResult;
use crate::inbound::http::admin::require_admin_key;
use crate::inbound::http::state::HttpState;

/// Request payload for a contact form submission.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SubmissionRequest {
    /// Sender name.
    pub name: Option<String>,
    /// Sender email address.
    pub email: Option<String>,
    /// Message body.
    pub message: Option<String>,
    /// Explicit consent flag; must be boolean `true`. Deserialized as raw
    /// JSON so non-boolean payloads become field violations.
    #[schema(value_type = Option<bool>)]
    pub consent_checkbox: Option<serde_json::Value>,
}

/// Response payload for a stored submission.
///
/// Deliberately excludes the anonymized address and agent: derived
/// privacy fields never travel back to the caller.
#[derive(Debug, Serialize, ToSchema)]
pub struct SubmissionResponse {
    /// Store-assigned identifier.
    pub id: SubmissionId,
    /// Store-assigned creation timestamp (RFC 3339).
    pub submitted_at: String,
}

impl From<SubmissionReceipt> for SubmissionResponse {
    fn from(receipt: SubmissionReceipt) -> Self {
        Self {
            id: receipt.id,
            submitted_at: receipt.submitted_at.to_rfc3339(),
        }
    }
}

/// Response payload for an erasure request.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErasureResponse {
    /// Normalized email the erasure matched.
    pub email: String,
    /// Number of removed records.
    pub deleted_count: u64,
}

/// Response payload for a retention sweep.
#[derive(Debug, Serialize, ToSchema)]
pub struct CleanupResponse {
    /// Number of removed records.
    pub deleted_count: u64,
    /// Effective window, e.g. `6 months`.
    pub retention_policy: String,
}

fn validation_failed(violations: Vec<FieldViolation>) -> Error {
    Error::invalid_request("Validation failed").with_details(json!(violations))
}

/// First hop of `X-Forwarded-For` when present, socket peer otherwise.
fn client_address(req: &HttpRequest) -> Option<String> {
    let forwarded = req
        .headers()
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned);

    forwarded.or_else(|| req.peer_addr().map(|addr| addr.ip().to_string()))
}

fn client_metadata(req: &HttpRequest) -> ClientMetadata {
    ClientMetadata {
        remote_address: client_address(req),
        user_agent: req
            .headers()
            .get(header::USER_AGENT)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned),
    }
}

/// Accept a contact form submission.
#[utoipa::path(
    post,
    path = "/api/v1/contact/submit",
    request_body = SubmissionRequest,
    responses(
        (status = 201, description = "Submission stored", body = SubmissionResponse),
        (status = 400, description = "Validation failed", body = crate::domain::Error),
        (status = 500, description = "Storage failure", body = crate::domain::Error)
    ),
    tags = ["contact"],
    operation_id = "submitContact"
)]
#[post("/contact/submit")]
pub async fn submit_contact(
    state: web::Data<HttpState>,
    req: HttpRequest,
    payload: web::Json<SubmissionRequest>,
) -> ApiResult<HttpResponse> {
    let SubmissionRequest {
        name,
        email,
        message,
        consent_checkbox,
    } = payload.into_inner();

    let form = SubmissionForm {
        name,
        email,
        message,
        consent: consent_checkbox,
    };
    let draft = SubmissionDraft::validate(&form).map_err(validation_failed)?;

    let metadata = client_metadata(&req);
    let receipt = state.contact.submit(draft, &metadata).await?;

    Ok(HttpResponse::Created().json(SubmissionResponse::from(receipt)))
}

/// Remove every submission for an email address (Right to be Forgotten).
#[utoipa::path(
    delete,
    path = "/api/v1/contact/delete/{email}",
    params(("email" = String, Path, description = "Email address to erase")),
    responses(
        (status = 200, description = "Submissions removed", body = ErasureResponse),
        (status = 400, description = "Email parameter missing", body = crate::domain::Error),
        (status = 401, description = "Admin credential missing or invalid", body = crate::domain::Error),
        (status = 404, description = "No submissions for this email", body = crate::domain::Error),
        (status = 500, description = "Storage failure or missing admin configuration", body = crate::domain::Error)
    ),
    tags = ["contact"],
    operation_id = "deleteSubmissionsByEmail"
)]
#[delete("/contact/delete/{email}")]
pub async fn delete_by_email(
    state: web::Data<HttpState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    require_admin_key(&req, state.admin_key.as_ref())?;

    let email = path.into_inner();
    if email.trim().is_empty() {
        return Err(Error::invalid_request("Email parameter is required"));
    }

    let report = state.contact.erase_by_email(&email).await?;
    Ok(HttpResponse::Ok().json(ErasureResponse {
        email: report.email,
        deleted_count: report.deleted,
    }))
}

/// Remove submissions older than the configured retention window.
#[utoipa::path(
    post,
    path = "/api/v1/contact/cleanup",
    responses(
        (status = 200, description = "Sweep completed", body = CleanupResponse),
        (status = 401, description = "Admin credential missing or invalid", body = crate::domain::Error),
        (status = 500, description = "Storage failure or missing admin configuration", body = crate::domain::Error)
    ),
    tags = ["contact"],
    operation_id = "cleanupExpiredSubmissions"
)]
#[post("/contact/cleanup")]
pub async fn cleanup_expired(
    state: web::Data<HttpState>,
    req: HttpRequest,
) -> ApiResult<HttpResponse> {
    require_admin_key(&req, state.admin_key.as_ref())?;

    let report = state.contact.purge_expired().await?;
    Ok(HttpResponse::Ok().json(CleanupResponse {
        deleted_count: report.deleted,
        retention_policy: report.window.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use chrono::Utc;
    use serde_json::{Value, json};
    use uuid::Uuid;

    use super::*;
    use crate::domain::ports::MockSubmissionRepository;
    use crate::domain::submission::SubmissionId;
    use crate::domain::{ContactService, RetentionPolicy, SubmissionReceipt};
    use crate::server::config::AdminApiKey;

    const ADMIN_HEADER: (&str, &str) = ("x-admin-key", "s3cret");

    fn state_with(repo: MockSubmissionRepository, admin: Option<AdminApiKey>) -> HttpState {
        let service = ContactService::new(Arc::new(repo), RetentionPolicy::default());
        HttpState::new(service, admin)
    }

    macro_rules! init_app {
        ($state:expr) => {
            test::init_service(
                App::new().app_data(web::Data::new($state)).service(
                    web::scope("/api/v1")
                        .service(submit_contact)
                        .service(delete_by_email)
                        .service(cleanup_expired),
                ),
            )
            .await
        };
    }

    fn valid_body() -> Value {
        json!({
            "name": "Maria Musterfrau",
            "email": "maria@example.com",
            "message": "I would like to know more about your services.",
            "consent_checkbox": true
        })
    }

    fn receipt() -> SubmissionReceipt {
        SubmissionReceipt {
            id: SubmissionId::from_uuid(Uuid::new_v4()),
            submitted_at: Utc::now(),
        }
    }

    #[actix_web::test]
    async fn submit_returns_created_with_receipt_only() {
        let mut repo = MockSubmissionRepository::new();
        repo.expect_create().times(1).return_once(|_| Ok(receipt()));
        let app = init_app!(state_with(repo, None));

        let req = test::TestRequest::post()
            .uri("/api/v1/contact/submit")
            .insert_header(("user-agent", "curl/8.0"))
            .set_json(valid_body())
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        assert!(body.get("id").is_some());
        assert!(body.get("submitted_at").is_some());
        // Privacy-derived fields must never be echoed.
        assert!(body.get("anonymized_ip").is_none());
        assert!(body.get("user_agent").is_none());
    }

    #[actix_web::test]
    async fn submit_with_invalid_fields_reports_all_violations() {
        // No create expectation: reaching the store would panic the mock.
        let repo = MockSubmissionRepository::new();
        let app = init_app!(state_with(repo, None));

        let req = test::TestRequest::post()
            .uri("/api/v1/contact/submit")
            .set_json(json!({ "name": "x", "email": "nope", "message": "short" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], "invalid_request");
        let details = body["details"].as_array().expect("violations");
        assert_eq!(details.len(), 4);
    }

    #[actix_web::test]
    async fn submit_without_consent_is_rejected_before_the_store() {
        let repo = MockSubmissionRepository::new();
        let app = init_app!(state_with(repo, None));

        let mut body = valid_body();
        body["consent_checkbox"] = json!(false);
        let req = test::TestRequest::post()
            .uri("/api/v1/contact/submit")
            .set_json(body)
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        let details = body["details"].as_array().expect("violations");
        assert_eq!(details[0]["field"], "consent_checkbox");
        assert_eq!(
            details[0]["message"],
            "Consent must be explicitly granted for DSGVO compliance"
        );
    }

    #[actix_web::test]
    async fn delete_without_credential_is_unauthorized_and_touches_nothing() {
        let repo = MockSubmissionRepository::new();
        let app = init_app!(state_with(repo, Some(AdminApiKey::new("s3cret"))));

        let req = test::TestRequest::delete()
            .uri("/api/v1/contact/delete/maria@example.com")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn delete_with_wrong_credential_is_unauthorized() {
        let repo = MockSubmissionRepository::new();
        let app = init_app!(state_with(repo, Some(AdminApiKey::new("s3cret"))));

        let req = test::TestRequest::delete()
            .uri("/api/v1/contact/delete/maria@example.com")
            .insert_header(("x-admin-key", "nope"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn delete_without_configured_secret_is_a_server_error() {
        let repo = MockSubmissionRepository::new();
        let app = init_app!(state_with(repo, None));

        let req = test::TestRequest::delete()
            .uri("/api/v1/contact/delete/maria@example.com")
            .insert_header(ADMIN_HEADER)
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Internal server error");
    }

    #[actix_web::test]
    async fn delete_blank_email_is_a_missing_parameter() {
        let repo = MockSubmissionRepository::new();
        let app = init_app!(state_with(repo, Some(AdminApiKey::new("s3cret"))));

        let req = test::TestRequest::delete()
            .uri("/api/v1/contact/delete/%20")
            .insert_header(ADMIN_HEADER)
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn delete_unknown_email_is_not_found_with_echo() {
        let mut repo = MockSubmissionRepository::new();
        repo.expect_count_by_email().return_once(|_| Ok(0));
        let app = init_app!(state_with(repo, Some(AdminApiKey::new("s3cret"))));

        let req = test::TestRequest::delete()
            .uri("/api/v1/contact/delete/ghost@example.com")
            .insert_header(ADMIN_HEADER)
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["details"]["email"], "ghost@example.com");
    }

    #[actix_web::test]
    async fn delete_reports_removed_count() {
        let mut repo = MockSubmissionRepository::new();
        repo.expect_count_by_email().return_once(|_| Ok(2));
        repo.expect_delete_by_email().return_once(|_| Ok(2));
        let app = init_app!(state_with(repo, Some(AdminApiKey::new("s3cret"))));

        let req = test::TestRequest::delete()
            .uri("/api/v1/contact/delete/maria@example.com")
            .insert_header(ADMIN_HEADER)
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["deleted_count"], 2);
        assert_eq!(body["email"], "maria@example.com");
    }

    #[actix_web::test]
    async fn cleanup_reports_count_and_window() {
        let mut repo = MockSubmissionRepository::new();
        repo.expect_delete_older_than().return_once(|_| Ok(7));
        let app = init_app!(state_with(repo, Some(AdminApiKey::new("s3cret"))));

        let req = test::TestRequest::post()
            .uri("/api/v1/contact/cleanup")
            .insert_header(ADMIN_HEADER)
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["deleted_count"], 7);
        assert_eq!(body["retention_policy"], "6 months");
    }

    #[actix_web::test]
    async fn cleanup_without_credential_is_unauthorized() {
        let repo = MockSubmissionRepository::new();
        let app = init_app!(state_with(repo, Some(AdminApiKey::new("s3cret"))));

        let req = test::TestRequest::post()
            .uri("/api/v1/contact/cleanup")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn storage_failures_surface_as_redacted_internal_errors() {
        use crate::domain::ports::SubmissionRepositoryError;

        let mut repo = MockSubmissionRepository::new();
        repo.expect_create()
            .return_once(|_| Err(SubmissionRepositoryError::connection("dial tcp refused")));
        let app = init_app!(state_with(repo, None));

        let req = test::TestRequest::post()
            .uri("/api/v1/contact/submit")
            .set_json(valid_body())
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Internal server error");
        assert!(body.get("details").is_none());
    }
}
