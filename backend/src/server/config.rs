//! Environment-driven application configuration.
//!
//! Configuration is read through the [`Env`] trait so tests can inject
//! values without mutating the process environment.

use std::fmt;

use crate::domain::retention::{RetentionWindow, RetentionWindowError};

/// Environment abstraction for configuration lookups.
pub trait Env {
    /// Fetch a string value by name.
    fn string(&self, name: &str) -> Option<String>;
}

/// Environment access backed by the real process environment.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProcessEnv;

impl Env for ProcessEnv {
    fn string(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// Shared secret guarding the admin endpoints.
///
/// Compared for exact equality against the presented header value. The
/// `Debug` impl redacts the secret so it cannot leak through logs.
#[derive(Clone)]
pub struct AdminApiKey(String);

impl AdminApiKey {
    /// Wrap a configured secret.
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Exact-equality check against a presented credential.
    pub fn matches(&self, presented: &str) -> bool {
        self.0 == presented
    }
}

impl fmt::Debug for AdminApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AdminApiKey(<redacted>)")
    }
}

/// Errors raised while assembling [`AppConfig`] from the environment.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// `DB_PORT` did not parse as a port number.
    #[error("DB_PORT is not a valid port number: {value}")]
    InvalidDbPort {
        /// Offending raw value.
        value: String,
    },
    /// `PORT` did not parse as a port number.
    #[error("PORT is not a valid port number: {value}")]
    InvalidListenPort {
        /// Offending raw value.
        value: String,
    },
    /// `DATA_RETENTION_MONTHS` did not parse as a month count.
    #[error("DATA_RETENTION_MONTHS is not a valid month count: {value}")]
    InvalidRetention {
        /// Offending raw value.
        value: String,
    },
    /// `DATA_RETENTION_MONTHS` was zero.
    #[error(transparent)]
    RetentionTooShort(#[from] RetentionWindowError),
}

/// Operational configuration for the backend process.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Port the HTTP server binds to.
    pub listen_port: u16,
    /// Allowed CORS origin; `None` permits any origin.
    pub cors_origin: Option<String>,
    /// Admin shared secret; `None` disables the admin endpoints with a
    /// server error rather than silently allowing access.
    pub admin_api_key: Option<AdminApiKey>,
    /// Retention window for the cleanup sweep.
    pub retention: RetentionWindow,
}

impl AppConfig {
    /// Assemble configuration from the environment.
    ///
    /// `DATABASE_URL` takes precedence; otherwise the URL is built from
    /// the discrete `DB_*` variables with the defaults the service has
    /// always used (localhost, 5432, `dsgvo_contacts`, `postgres`).
    ///
    /// # Errors
    /// Returns a [`ConfigError`] for unparsable ports or retention values.
    /// A misconfigured retention refuses startup instead of guessing.
    pub fn from_env(env: &dyn Env) -> Result<Self, ConfigError> {
        let database_url = match env.string("DATABASE_URL") {
            Some(url) => url,
            None => database_url_from_parts(env)?,
        };

        let listen_port = match env.string("PORT") {
            None => 3000,
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidListenPort { value: raw.clone() })?,
        };

        let cors_origin = env.string("CORS_ORIGIN").filter(|v| !v.trim().is_empty());

        let admin_api_key = env
            .string("ADMIN_API_KEY")
            .filter(|v| !v.is_empty())
            .map(AdminApiKey::new);

        let retention = match env.string("DATA_RETENTION_MONTHS") {
            None => RetentionWindow::default(),
            Some(raw) => {
                let months: u32 = raw
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidRetention { value: raw.clone() })?;
                RetentionWindow::new(months)?
            }
        };

        Ok(Self {
            database_url,
            listen_port,
            cors_origin,
            admin_api_key,
            retention,
        })
    }
}

fn database_url_from_parts(env: &dyn Env) -> Result<String, ConfigError> {
    let host = env.string("DB_HOST").unwrap_or_else(|| "localhost".into());
    let name = env
        .string("DB_NAME")
        .unwrap_or_else(|| "dsgvo_contacts".into());
    let user = env.string("DB_USER").unwrap_or_else(|| "postgres".into());
    let password = env.string("DB_PASSWORD").unwrap_or_default();

    let port: u16 = match env.string("DB_PORT") {
        None => 5432,
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidDbPort { value: raw.clone() })?,
    };

    if password.is_empty() {
        Ok(format!("postgres://{user}@{host}:{port}/{name}"))
    } else {
        Ok(format!("postgres://{user}:{password}@{host}:{port}/{name}"))
    }
}
