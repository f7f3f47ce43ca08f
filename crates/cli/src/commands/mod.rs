//! Command implementations.
//!
//! Every invocation logs in with the configured credentials and works with
//! the returned bearer token until it exits.

pub mod admins;
pub mod audit;
pub mod content;
pub mod products;

use catalogo_admin::backend::{AdminApiClient, AuthToken, BackendError};
use catalogo_core::{Admin, FormError};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use url::Url;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Environment variable has an invalid value.
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(&'static str, String),

    /// The backend rejected or failed a request.
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// Input failed validation before anything was sent.
    #[error("Invalid input: {0}")]
    Invalid(#[from] FormError),

    /// Reading stdin or a file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Refused by the CLI itself.
    #[error("{0}")]
    Refused(String),
}

/// Backend location and login credentials.
pub struct CliConfig {
    pub api_url: String,
    pub email: String,
    pub password: SecretString,
}

impl std::fmt::Debug for CliConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CliConfig")
            .field("api_url", &self.api_url)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl CliConfig {
    /// Load from the environment (and `.env` if present).
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is missing or the URL is malformed.
    pub fn from_env() -> Result<Self, CliError> {
        dotenvy::dotenv().ok();

        let api_url = require("CATALOG_API_URL")?;
        Url::parse(&api_url)
            .map_err(|e| CliError::InvalidEnvVar("CATALOG_API_URL", e.to_string()))?;

        Ok(Self {
            api_url: api_url.trim_end_matches('/').to_owned(),
            email: require("CATALOG_ADMIN_EMAIL")?,
            password: SecretString::from(require("CATALOG_ADMIN_PASSWORD")?),
        })
    }
}

fn require(key: &'static str) -> Result<String, CliError> {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or(CliError::MissingEnvVar(key))
}

/// A logged-in backend session.
pub struct Connection {
    pub api: AdminApiClient,
    pub token: AuthToken,
    pub admin: Admin,
}

impl Connection {
    /// Log in with the configured credentials.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unreachable or rejects the login.
    pub async fn open(config: &CliConfig) -> Result<Self, CliError> {
        let api = AdminApiClient::new(&config.api_url)?;
        let login = api
            .login(&config.email, config.password.expose_secret())
            .await?;
        tracing::debug!(admin = %login.admin.email, "Logged in");

        Ok(Self {
            api,
            token: AuthToken::new(login.token),
            admin: login.admin,
        })
    }
}

/// Read one line from stdin without the trailing newline.
pub(crate) async fn read_line() -> Result<String, CliError> {
    let mut line = String::new();
    BufReader::new(tokio::io::stdin()).read_line(&mut line).await?;
    Ok(line.trim_end_matches(['\r', '\n']).to_owned())
}

/// Read stdin to the end.
pub(crate) async fn read_all() -> Result<String, CliError> {
    let mut text = String::new();
    tokio::io::stdin().read_to_string(&mut text).await?;
    Ok(text)
}

/// Write command output to stdout.
#[allow(clippy::print_stdout)]
pub(crate) fn emit(line: &str) {
    println!("{line}");
}
