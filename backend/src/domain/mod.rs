//! Domain core: anonymization, validation, retention and the store port.
//!
//! Everything in this module is transport and engine agnostic. Inbound
//! adapters translate HTTP requests into the types defined here; the
//! persistence layer implements [`ports::SubmissionRepository`].

pub mod contact_service;
pub mod error;
pub mod ports;
pub mod privacy;
pub mod retention;
pub mod submission;

pub use self::contact_service::{ClientMetadata, ContactService, ErasureReport, SweepReport};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::retention::{
    DEFAULT_RETENTION_MONTHS, RetentionPolicy, RetentionWindow, RetentionWindowError,
};
pub use self::submission::{
    EmailAddress, FieldViolation, NewSubmission, SubmissionDraft, SubmissionForm, SubmissionId,
    SubmissionReceipt,
};

/// Convenient result alias for domain operations.
pub type ApiResult<T> = Result<T, Error>;
