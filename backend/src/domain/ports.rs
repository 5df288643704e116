//! Domain ports defining the edges of the hexagon.
//!
//! The submission store is the single driven adapter. The trait exposes
//! strongly typed errors so the persistence layer maps its failures into
//! predictable variants instead of returning `anyhow::Result`.

use async_trait::async_trait;
use thiserror::Error;

use super::retention::RetentionWindow;
use super::submission::{EmailAddress, NewSubmission, SubmissionReceipt};

/// Errors surfaced by the submission store adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionRepositoryError {
    /// Store unreachable, pool exhausted, or the call timed out.
    #[error("submission store connection failed: {message}")]
    Connection {
        /// Adapter-level detail, logged but never sent to callers.
        message: String,
    },
    /// A statement failed during execution or row conversion.
    #[error("submission store query failed: {message}")]
    Query {
        /// Adapter-level detail, logged but never sent to callers.
        message: String,
    },
    /// The store's consent check constraint rejected a write. The
    /// validation gate makes this unreachable in practice; the constraint
    /// exists so a bug upstream cannot persist a non-consented record.
    #[error("submission store rejected the consent flag: {message}")]
    ConsentConstraint {
        /// Adapter-level detail, logged but never sent to callers.
        message: String,
    },
}

impl SubmissionRepositoryError {
    /// Helper for connection-level adapter errors.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for statement failures.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Helper for consent check-constraint violations.
    pub fn consent_constraint(message: impl Into<String>) -> Self {
        Self::ConsentConstraint {
            message: message.into(),
        }
    }
}

/// Port for persisting and erasing contact submissions.
///
/// Every operation is atomic at the level of a single statement and
/// idempotent in effect: repeating a deletion after success reports zero
/// affected records rather than an error.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubmissionRepository: Send + Sync {
    /// Persist a submission, returning the store-assigned identity and
    /// timestamp.
    async fn create(
        &self,
        submission: NewSubmission,
    ) -> Result<SubmissionReceipt, SubmissionRepositoryError>;

    /// Count submissions whose normalized email matches exactly.
    async fn count_by_email(&self, email: &EmailAddress)
    -> Result<u64, SubmissionRepositoryError>;

    /// Remove every submission for the email, returning how many existed.
    async fn delete_by_email(&self, email: &EmailAddress)
    -> Result<u64, SubmissionRepositoryError>;

    /// Remove every submission older than the retention window, returning
    /// how many were removed.
    async fn delete_older_than(
        &self,
        window: RetentionWindow,
    ) -> Result<u64, SubmissionRepositoryError>;
}
