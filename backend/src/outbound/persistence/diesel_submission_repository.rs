//! PostgreSQL-backed `SubmissionRepository` implementation using Diesel.
//!
//! A thin adapter: it translates between domain types and Diesel rows and
//! maps engine failures onto the port's error variants. No business logic
//! lives here.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use mockable::{Clock, DefaultClock};
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{SubmissionRepository, SubmissionRepositoryError};
use crate::domain::retention::RetentionWindow;
use crate::domain::submission::{EmailAddress, NewSubmission, SubmissionId, SubmissionReceipt};

use super::models::NewSubmissionRow;
use super::pool::{DbPool, PoolError};
use super::schema::contact_submissions;

/// Diesel-backed implementation of the `SubmissionRepository` port.
#[derive(Clone)]
pub struct DieselSubmissionRepository {
    pool: DbPool,
    clock: Arc<dyn Clock>,
}

impl DieselSubmissionRepository {
    /// Create a new repository over the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self::with_clock(pool, Arc::new(DefaultClock))
    }

    /// Create a repository with an injected clock. The retention cutoff is
    /// derived from this clock, which keeps sweeps deterministic in tests.
    pub fn with_clock(pool: DbPool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }
}

/// Map pool errors to the port's error variants.
fn map_pool_error(error: PoolError) -> SubmissionRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            SubmissionRepositoryError::connection(message)
        }
    }
}

/// Map Diesel errors to the port's error variants.
fn map_diesel_error(error: diesel::result::Error) -> SubmissionRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::CheckViolation, info) => {
            SubmissionRepositoryError::consent_constraint(info.message().to_owned())
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            SubmissionRepositoryError::connection("database connection error")
        }
        DieselError::DatabaseError(_, _) => SubmissionRepositoryError::query("database error"),
        _ => SubmissionRepositoryError::query("database error"),
    }
}

#[async_trait]
impl SubmissionRepository for DieselSubmissionRepository {
    async fn create(
        &self,
        submission: NewSubmission,
    ) -> Result<SubmissionReceipt, SubmissionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewSubmissionRow {
            name: submission.name(),
            email: submission.email().as_str(),
            message: submission.message(),
            consent_given: submission.consent_given(),
            anonymized_ip: submission.anonymized_ip(),
            user_agent: submission.user_agent(),
        };

        let (id, submitted_at) = diesel::insert_into(contact_submissions::table)
            .values(&row)
            .returning((
                contact_submissions::id,
                contact_submissions::submitted_at,
            ))
            .get_result::<(Uuid, DateTime<Utc>)>(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(SubmissionReceipt {
            id: SubmissionId::from_uuid(id),
            submitted_at,
        })
    }

    async fn count_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<u64, SubmissionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let count: i64 = contact_submissions::table
            .filter(contact_submissions::email.eq(email.as_str()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(u64::try_from(count).unwrap_or_default())
    }

    async fn delete_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<u64, SubmissionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(
            contact_submissions::table.filter(contact_submissions::email.eq(email.as_str())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        Ok(u64::try_from(deleted).unwrap_or_default())
    }

    async fn delete_older_than(
        &self,
        window: RetentionWindow,
    ) -> Result<u64, SubmissionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // Calendar-aware cutoff computed here and bound as a parameter; the
        // window value never reaches the SQL text.
        let cutoff = window.cutoff_from(self.clock.utc());

        let deleted = diesel::delete(
            contact_submissions::table.filter(contact_submissions::submitted_at.lt(cutoff)),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        Ok(u64::try_from(deleted).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::result::{DatabaseErrorKind, Error as DieselError};
    use rstest::rstest;

    fn db_error(kind: DatabaseErrorKind, message: &str) -> DieselError {
        DieselError::DatabaseError(kind, Box::new(message.to_owned()))
    }

    #[rstest]
    fn check_violations_map_to_the_consent_variant() {
        let mapped = map_diesel_error(db_error(
            DatabaseErrorKind::CheckViolation,
            "new row violates check constraint \"consent_must_be_true\"",
        ));
        assert!(matches!(
            mapped,
            SubmissionRepositoryError::ConsentConstraint { .. }
        ));
    }

    #[rstest]
    fn closed_connections_map_to_connection_errors() {
        let mapped = map_diesel_error(db_error(DatabaseErrorKind::ClosedConnection, "gone"));
        assert_eq!(
            mapped,
            SubmissionRepositoryError::connection("database connection error")
        );
    }

    #[rstest]
    fn other_database_errors_map_to_query_errors() {
        let mapped = map_diesel_error(db_error(DatabaseErrorKind::UniqueViolation, "dup"));
        assert_eq!(mapped, SubmissionRepositoryError::query("database error"));
    }

    #[rstest]
    fn pool_errors_map_to_connection_errors() {
        let mapped = map_pool_error(PoolError::checkout("timed out waiting for connection"));
        assert!(matches!(
            mapped,
            SubmissionRepositoryError::Connection { .. }
        ));
    }
}
