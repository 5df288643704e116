//! Contact submission use-cases composed over the store port.
//!
//! This is the only layer that talks to the [`SubmissionRepository`]; it
//! derives the anonymized metadata, enforces the not-found semantics of
//! erasure requests, and collapses storage failures into generic internal
//! errors (full detail goes to the log, never to the caller).

use std::sync::Arc;

use serde_json::json;
use tracing::{error, info};

use super::Error;
use super::ports::{SubmissionRepository, SubmissionRepositoryError};
use super::privacy::{anonymize_address, summarize_agent};
use super::retention::{RetentionPolicy, RetentionWindow};
use super::submission::{EmailAddress, NewSubmission, SubmissionDraft, SubmissionReceipt};

/// Ambient request metadata captured by the inbound adapter.
///
/// Both values are raw; anonymization happens inside [`ContactService`]
/// so no handler can accidentally persist them untransformed.
#[derive(Debug, Clone, Default)]
pub struct ClientMetadata {
    /// Client address as reported by the proxy chain or socket.
    pub remote_address: Option<String>,
    /// Raw `User-Agent` header value.
    pub user_agent: Option<String>,
}

/// Outcome of an erasure request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErasureReport {
    /// Normalized email the erasure matched.
    pub email: String,
    /// Number of records removed.
    pub deleted: u64,
}

/// Outcome of a retention sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepReport {
    /// Number of records removed.
    pub deleted: u64,
    /// Window that was applied.
    pub window: RetentionWindow,
}

/// Service implementing the submit, erase and cleanup operations.
#[derive(Clone)]
pub struct ContactService {
    submissions: Arc<dyn SubmissionRepository>,
    retention: RetentionPolicy,
}

impl ContactService {
    /// Create a service over the given store with the given retention
    /// policy.
    pub fn new(submissions: Arc<dyn SubmissionRepository>, retention: RetentionPolicy) -> Self {
        Self {
            submissions,
            retention,
        }
    }

    fn storage_failure(operation: &'static str, err: &SubmissionRepositoryError) -> Error {
        error!(operation, error = %err, "submission store failure");
        Error::internal("A storage error occurred while processing the request")
    }

    fn no_records(email: &str) -> Error {
        Error::not_found("No submissions found for this email")
            .with_details(json!({ "email": email }))
    }

    /// Persist a validated submission together with anonymized request
    /// metadata.
    ///
    /// The returned receipt carries only the assigned identity and
    /// timestamp; anonymized fields never travel back to the caller.
    pub async fn submit(
        &self,
        draft: SubmissionDraft,
        metadata: &ClientMetadata,
    ) -> Result<SubmissionReceipt, Error> {
        let anonymized_ip = anonymize_address(metadata.remote_address.as_deref().unwrap_or_default());
        let user_agent = summarize_agent(metadata.user_agent.as_deref());

        let submission = NewSubmission::compose(draft, anonymized_ip, user_agent);
        let receipt = self
            .submissions
            .create(submission)
            .await
            .map_err(|err| Self::storage_failure("create", &err))?;

        info!(id = %receipt.id, "contact submission stored");
        Ok(receipt)
    }

    /// Remove every submission for an email address (Right to be
    /// Forgotten).
    ///
    /// The not-found outcome is reported as an [`Error`] with code
    /// `not_found` carrying the email; it is a semantic result, not a
    /// system failure. Stored emails are always normalized and
    /// syntactically valid, so input that fails parsing cannot match any
    /// record and short-circuits to the same outcome.
    pub async fn erase_by_email(&self, raw_email: &str) -> Result<ErasureReport, Error> {
        let Ok(email) = EmailAddress::parse(raw_email) else {
            return Err(Self::no_records(raw_email.trim()));
        };

        let existing = self
            .submissions
            .count_by_email(&email)
            .await
            .map_err(|err| Self::storage_failure("count_by_email", &err))?;
        if existing == 0 {
            return Err(Self::no_records(email.as_str()));
        }

        let deleted = self
            .submissions
            .delete_by_email(&email)
            .await
            .map_err(|err| Self::storage_failure("delete_by_email", &err))?;

        info!(email = %email, deleted, "erased submissions on data-subject request");
        Ok(ErasureReport {
            email: email.into_string(),
            deleted,
        })
    }

    /// Remove every submission older than the configured retention window.
    pub async fn purge_expired(&self) -> Result<SweepReport, Error> {
        let window = self.retention.window();
        let deleted = self
            .submissions
            .delete_older_than(window)
            .await
            .map_err(|err| Self::storage_failure("delete_older_than", &err))?;

        info!(deleted, retention = %window, "retention sweep removed expired submissions");
        Ok(SweepReport { deleted, window })
    }
}

#[cfg(test)]
#[path = "contact_service_tests.rs"]
mod tests;
