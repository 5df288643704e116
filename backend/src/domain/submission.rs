//! Contact submission data model and the validation gate in front of it.
//!
//! The gate evaluates every field of an inbound form against an ordered set
//! of rules and reports all violations at once rather than stopping at the
//! first. A [`SubmissionDraft`] can only exist once every rule has passed,
//! and it carries a [`ConsentAttestation`] that cannot be constructed
//! outside this module, so nothing without explicit consent ever reaches
//! the store.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

/// Maximum number of characters accepted for an email address.
pub const EMAIL_MAX: usize = 255;

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // Syntactic shape only; deliverability is not this layer's concern.
        let pattern = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";
        Regex::new(pattern).unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Validation errors returned by [`EmailAddress::parse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmailValidationError {
    /// Input was empty after trimming.
    Empty,
    /// Input does not look like an email address.
    Syntax,
    /// Input exceeds [`EMAIL_MAX`] characters.
    TooLong,
}

impl fmt::Display for EmailValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "email must not be empty"),
            Self::Syntax => write!(f, "email is not syntactically valid"),
            Self::TooLong => write!(f, "email must be at most {EMAIL_MAX} characters"),
        }
    }
}

impl std::error::Error for EmailValidationError {}

/// Normalized email address: trimmed and lower-cased.
///
/// Submissions are stored with the normalized form, and deletion-by-email
/// matches against it, so a data subject's erasure request is insensitive
/// to the casing they originally typed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and normalize a raw email string.
    ///
    /// # Examples
    /// ```
    /// use contact_backend::domain::submission::EmailAddress;
    ///
    /// let email = EmailAddress::parse("  Max@Example.COM ").expect("valid");
    /// assert_eq!(email.as_str(), "max@example.com");
    /// ```
    pub fn parse(raw: &str) -> Result<Self, EmailValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(EmailValidationError::Empty);
        }
        if !email_regex().is_match(trimmed) {
            return Err(EmailValidationError::Syntax);
        }
        let normalized = trimmed.to_lowercase();
        if normalized.chars().count() > EMAIL_MAX {
            return Err(EmailValidationError::TooLong);
        }
        Ok(Self(normalized))
    }

    /// Borrow the normalized form.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Consume the wrapper, yielding the normalized form.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Store-assigned submission identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(transparent)]
pub struct SubmissionId(Uuid);

impl SubmissionId {
    /// Wrap a store-assigned UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldViolation {
    /// Name of the offending form field.
    pub field: &'static str,
    /// Human-readable description of the violated rule.
    pub message: String,
}

fn violation(field: &'static str, message: impl Into<String>) -> FieldViolation {
    FieldViolation {
        field,
        message: message.into(),
    }
}

/// Unvalidated contact form content as received by an inbound adapter.
///
/// Consent arrives as raw JSON so that non-boolean payloads surface as a
/// field violation with a dedicated message instead of a deserialization
/// failure.
#[derive(Debug, Clone, Default)]
pub struct SubmissionForm {
    /// Raw name field.
    pub name: Option<String>,
    /// Raw email field.
    pub email: Option<String>,
    /// Raw message body.
    pub message: Option<String>,
    /// Raw consent checkbox value.
    pub consent: Option<Value>,
}

/// Proof that the data subject explicitly granted consent.
///
/// Only the validation gate creates this value; holding one is the
/// precondition for building a [`NewSubmission`].
#[derive(Debug, Clone, Copy)]
pub struct ConsentAttestation(());

/// Length rules applied to a required free-text field.
struct TextRules {
    field: &'static str,
    min: usize,
    max: usize,
    required: &'static str,
    length: &'static str,
}

const NAME_RULES: TextRules = TextRules {
    field: "name",
    min: 2,
    max: 255,
    required: "Name is required",
    length: "Name must be between 2 and 255 characters",
};

const MESSAGE_RULES: TextRules = TextRules {
    field: "message",
    min: 10,
    max: 5000,
    required: "Message is required",
    length: "Message must be between 10 and 5000 characters",
};

impl TextRules {
    fn apply(&self, raw: Option<&str>) -> Result<String, FieldViolation> {
        let trimmed = raw.unwrap_or_default().trim();
        if trimmed.is_empty() {
            return Err(violation(self.field, self.required));
        }
        let length = trimmed.chars().count();
        if length < self.min || length > self.max {
            return Err(violation(self.field, self.length));
        }
        Ok(escape_markup(trimmed))
    }
}

/// Neutralize markup-significant characters before storage so stored
/// content renders inert in any HTML context.
fn escape_markup(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            '/' => escaped.push_str("&#x2F;"),
            '\\' => escaped.push_str("&#x5C;"),
            '`' => escaped.push_str("&#96;"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn validate_email(raw: Option<&str>) -> Result<EmailAddress, FieldViolation> {
    EmailAddress::parse(raw.unwrap_or_default()).map_err(|err| match err {
        EmailValidationError::Empty => violation("email", "Email is required"),
        EmailValidationError::Syntax => violation("email", "Valid email is required"),
        EmailValidationError::TooLong => violation("email", "Email is too long"),
    })
}

fn validate_consent(value: Option<&Value>) -> Result<ConsentAttestation, FieldViolation> {
    match value {
        None | Some(Value::Null) => Err(violation("consent_checkbox", "Consent is required")),
        Some(Value::Bool(true)) => Ok(ConsentAttestation(())),
        Some(Value::Bool(false)) => Err(violation(
            "consent_checkbox",
            "Consent must be explicitly granted for DSGVO compliance",
        )),
        Some(_) => Err(violation(
            "consent_checkbox",
            "Consent must be a boolean value",
        )),
    }
}

/// Validated contact form content, ready for composition with anonymized
/// request metadata.
#[derive(Debug, Clone)]
pub struct SubmissionDraft {
    name: String,
    email: EmailAddress,
    message: String,
    consent: ConsentAttestation,
}

impl SubmissionDraft {
    /// Run the validation gate over a raw form.
    ///
    /// All fields are checked; the error carries one violation per failing
    /// field, in form order.
    ///
    /// # Errors
    /// Returns every [`FieldViolation`] found. The vector is never empty on
    /// the error path.
    pub fn validate(form: &SubmissionForm) -> Result<Self, Vec<FieldViolation>> {
        let mut violations = Vec::new();

        let name = NAME_RULES
            .apply(form.name.as_deref())
            .map_err(|v| violations.push(v))
            .ok();
        let email = validate_email(form.email.as_deref())
            .map_err(|v| violations.push(v))
            .ok();
        let message = MESSAGE_RULES
            .apply(form.message.as_deref())
            .map_err(|v| violations.push(v))
            .ok();
        let consent = validate_consent(form.consent.as_ref())
            .map_err(|v| violations.push(v))
            .ok();

        match (name, email, message, consent) {
            (Some(name), Some(email), Some(message), Some(consent)) => Ok(Self {
                name,
                email,
                message,
                consent,
            }),
            _ => Err(violations),
        }
    }

    /// Escaped, trimmed name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Normalized email address.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Escaped, trimmed message body.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

/// A submission ready to be persisted: validated content plus anonymized
/// request metadata.
#[derive(Debug, Clone)]
pub struct NewSubmission {
    name: String,
    email: EmailAddress,
    message: String,
    consent_given: bool,
    anonymized_ip: String,
    user_agent: String,
}

impl NewSubmission {
    /// Combine a validated draft with already-anonymized metadata.
    ///
    /// The consent flag is fixed to `true` here; the attestation inside the
    /// draft is the only way to reach this constructor.
    pub fn compose(draft: SubmissionDraft, anonymized_ip: String, user_agent: String) -> Self {
        let SubmissionDraft {
            name,
            email,
            message,
            consent: ConsentAttestation(()),
        } = draft;
        Self {
            name,
            email,
            message,
            consent_given: true,
            anonymized_ip,
            user_agent,
        }
    }

    /// Escaped name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Normalized email.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Escaped message body.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Always `true`; kept explicit for the store's consent column.
    pub fn consent_given(&self) -> bool {
        self.consent_given
    }

    /// Privacy-reduced client address.
    pub fn anonymized_ip(&self) -> &str {
        self.anonymized_ip.as_str()
    }

    /// Truncated user agent.
    pub fn user_agent(&self) -> &str {
        self.user_agent.as_str()
    }
}

/// Store-assigned identity and timestamp returned from a create.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionReceipt {
    /// Assigned identifier.
    pub id: SubmissionId,
    /// Creation timestamp assigned by the store.
    pub submitted_at: DateTime<Utc>,
}
