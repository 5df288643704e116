//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and
//! must never be exposed to the domain.

use diesel::prelude::*;

use super::schema::contact_submissions;

/// Insertable struct for creating new submission records. Identity and
/// timestamp come from column defaults.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = contact_submissions)]
pub(crate) struct NewSubmissionRow<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub message: &'a str,
    pub consent_given: bool,
    pub anonymized_ip: &'a str,
    pub user_agent: &'a str,
}
