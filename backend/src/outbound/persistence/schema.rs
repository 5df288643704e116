//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are
//! used by Diesel for compile-time query validation and type-safe SQL
//! generation.

diesel::table! {
    /// Contact form submissions.
    ///
    /// Only privacy-reduced client metadata is stored, and the
    /// `consent_given` column carries a check constraint forcing it to
    /// `TRUE`. Indexed by `email` and by `submitted_at` so erasure and
    /// retention sweeps stay cheap.
    contact_submissions (id) {
        /// Primary key: UUID v4 assigned by the database.
        id -> Uuid,
        /// Escaped sender name.
        name -> Varchar,
        /// Normalized sender email (not unique; one person may write twice).
        email -> Varchar,
        /// Escaped message body.
        message -> Text,
        /// Consent flag; constrained to TRUE.
        consent_given -> Bool,
        /// Privacy-reduced client address.
        anonymized_ip -> Varchar,
        /// Truncated user agent.
        user_agent -> Varchar,
        /// Creation timestamp assigned by the database.
        submitted_at -> Timestamptz,
    }
}
