//! Tests for the contact service.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::MockSubmissionRepository;
use crate::domain::retention::RetentionWindow;
use crate::domain::submission::{SubmissionForm, SubmissionId};

fn make_service(repo: MockSubmissionRepository) -> ContactService {
    ContactService::new(Arc::new(repo), RetentionPolicy::default())
}

fn valid_draft() -> SubmissionDraft {
    let form = SubmissionForm {
        name: Some("Maria Musterfrau".into()),
        email: Some("maria@example.com".into()),
        message: Some("I would like to know more about your services.".into()),
        consent: Some(serde_json::json!(true)),
    };
    SubmissionDraft::validate(&form).expect("valid fixture form")
}

fn receipt() -> SubmissionReceipt {
    SubmissionReceipt {
        id: SubmissionId::from_uuid(Uuid::new_v4()),
        submitted_at: Utc::now(),
    }
}

#[tokio::test]
async fn submit_passes_anonymized_metadata_to_the_store() {
    let mut repo = MockSubmissionRepository::new();
    repo.expect_create()
        .withf(|submission| {
            submission.anonymized_ip() == "203.0.113.0"
                && submission.user_agent() == "curl/8.0"
                && submission.consent_given()
        })
        .times(1)
        .return_once(|_| Ok(receipt()));

    let metadata = ClientMetadata {
        remote_address: Some("203.0.113.77".into()),
        user_agent: Some("curl/8.0".into()),
    };
    let service = make_service(repo);

    service
        .submit(valid_draft(), &metadata)
        .await
        .expect("submit succeeds");
}

#[tokio::test]
async fn submit_without_metadata_stores_placeholders() {
    let mut repo = MockSubmissionRepository::new();
    repo.expect_create()
        .withf(|submission| {
            submission.anonymized_ip() == "0.0.0.0" && submission.user_agent() == "Unknown"
        })
        .times(1)
        .return_once(|_| Ok(receipt()));

    let service = make_service(repo);
    service
        .submit(valid_draft(), &ClientMetadata::default())
        .await
        .expect("submit succeeds");
}

#[tokio::test]
async fn submit_maps_storage_failures_to_internal_errors() {
    let mut repo = MockSubmissionRepository::new();
    repo.expect_create()
        .return_once(|_| Err(SubmissionRepositoryError::connection("pool timed out")));

    let service = make_service(repo);
    let error = service
        .submit(valid_draft(), &ClientMetadata::default())
        .await
        .expect_err("storage failure");

    assert_eq!(error.code(), ErrorCode::InternalError);
    // Backing-engine detail must not leak to callers.
    assert!(!error.message().contains("pool timed out"));
}

#[tokio::test]
async fn erase_reports_not_found_without_deleting() {
    let mut repo = MockSubmissionRepository::new();
    repo.expect_count_by_email()
        .withf(|email| email.as_str() == "ghost@example.com")
        .times(1)
        .return_once(|_| Ok(0));
    // No delete expectation: a delete call would panic the mock.

    let service = make_service(repo);
    let error = service
        .erase_by_email("ghost@example.com")
        .await
        .expect_err("nothing stored");

    assert_eq!(error.code(), ErrorCode::NotFound);
    let details = error.details().expect("details attached");
    assert_eq!(details["email"], "ghost@example.com");
}

#[tokio::test]
async fn erase_removes_all_records_for_the_email() {
    let mut repo = MockSubmissionRepository::new();
    repo.expect_count_by_email().return_once(|_| Ok(3));
    repo.expect_delete_by_email()
        .withf(|email| email.as_str() == "maria@example.com")
        .times(1)
        .return_once(|_| Ok(3));

    let service = make_service(repo);
    let report = service
        .erase_by_email("Maria@Example.com")
        .await
        .expect("erasure succeeds");

    assert_eq!(report.deleted, 3);
    assert_eq!(report.email, "maria@example.com");
}

#[tokio::test]
async fn erase_with_unparseable_email_never_touches_the_store() {
    let repo = MockSubmissionRepository::new();

    let service = make_service(repo);
    let error = service
        .erase_by_email("not an email")
        .await
        .expect_err("cannot match");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn erase_maps_storage_failures_to_internal_errors() {
    let mut repo = MockSubmissionRepository::new();
    repo.expect_count_by_email()
        .return_once(|_| Err(SubmissionRepositoryError::query("relation missing")));

    let service = make_service(repo);
    let error = service
        .erase_by_email("maria@example.com")
        .await
        .expect_err("storage failure");

    assert_eq!(error.code(), ErrorCode::InternalError);
}

#[tokio::test]
async fn repeated_erasure_reports_not_found_the_second_time() {
    let mut repo = MockSubmissionRepository::new();
    let mut counts = vec![Ok(0), Ok(2)];
    repo.expect_count_by_email()
        .times(2)
        .returning(move |_| counts.pop().unwrap_or(Ok(0)));
    repo.expect_delete_by_email().times(1).returning(|_| Ok(2));

    let service = make_service(repo);
    let first = service
        .erase_by_email("maria@example.com")
        .await
        .expect("first erasure");
    assert_eq!(first.deleted, 2);

    let second = service
        .erase_by_email("maria@example.com")
        .await
        .expect_err("nothing left");
    assert_eq!(second.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn purge_reports_count_and_window() {
    let mut repo = MockSubmissionRepository::new();
    repo.expect_delete_older_than()
        .withf(|window| window.months() == 6)
        .times(1)
        .return_once(|_| Ok(12));

    let service = make_service(repo);
    let report = service.purge_expired().await.expect("sweep succeeds");

    assert_eq!(report.deleted, 12);
    assert_eq!(report.window, RetentionWindow::default());
}

#[tokio::test]
async fn purge_maps_storage_failures_to_internal_errors() {
    let mut repo = MockSubmissionRepository::new();
    repo.expect_delete_older_than()
        .return_once(|_| Err(SubmissionRepositoryError::connection("unreachable")));

    let service = make_service(repo);
    let error = service.purge_expired().await.expect_err("storage failure");
    assert_eq!(error.code(), ErrorCode::InternalError);
}
