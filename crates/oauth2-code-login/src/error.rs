//! Error types for the authorization-code login pipeline.
//!
//! Uses `thiserror` for structured error handling. Only
//! [`AuthenticationServiceError`] crosses the provider boundary; the other
//! kinds are produced by configuration and by the two delegated network calls.

use std::fmt;

/// Invalid static configuration. Always fatal at construction time.
#[derive(thiserror::Error, Debug)]
pub enum ConfigurationError {
    /// Grant type string is not one of the supported values.
    #[error("Unsupported grant type '{0}': must be either 'authorization_code' or 'implicit'")]
    UnsupportedGrantType(String),

    /// Response type string is not one of the supported values.
    #[error("Unsupported response type '{0}': must be either 'code' or 'token'")]
    UnsupportedResponseType(String),

    /// Response type does not pair with the grant type.
    #[error("responseType must be '{expected}' for grant type '{grant_type}', got '{actual}'")]
    MismatchedResponseType {
        /// Grant type of the request
        grant_type: String,
        /// Response type required by the grant type
        expected: String,
        /// Response type that was supplied
        actual: String,
    },

    /// A required identifier is missing or empty.
    #[error("{0} cannot be empty")]
    MissingField(&'static str),

    /// An endpoint is not an absolute URI.
    #[error("Invalid {field}: {source}")]
    InvalidUri {
        /// Name of the offending field
        field: &'static str,
        /// Underlying parse failure
        #[source]
        source: url::ParseError,
    },

    /// An authorization request was built for a different client.
    #[error(
        "Authorization request client_id '{request}' does not match configured client '{configured}'"
    )]
    ClientMismatch {
        /// Client id on the request
        request: String,
        /// Client id of the configuration
        configured: String,
    },
}

impl ConfigurationError {
    /// Create an invalid URI error.
    #[must_use]
    pub fn invalid_uri(field: &'static str, source: url::ParseError) -> Self {
        Self::InvalidUri { field, source }
    }
}

/// Errors from the token endpoint exchange.
#[derive(thiserror::Error, Debug)]
pub enum ExchangeError {
    /// The grant was unusable before any request was sent.
    #[error("Invalid token request: {0}")]
    InvalidRequest(String),

    /// HTTP transport error (connection, DNS, TLS, timeout, etc.)
    #[error("Token endpoint request failed: {0}")]
    Transport(#[source] reqwest_middleware::Error),

    /// The token endpoint answered with an OAuth2 error body.
    #[error("{}", error_response_message(.error, .description.as_deref()))]
    ErrorResponse {
        /// OAuth2 error code (e.g. `invalid_grant`)
        error: String,
        /// Human-readable description supplied by the server
        description: Option<String>,
        /// Link to further information supplied by the server
        uri: Option<String>,
    },

    /// Non-success status without a parseable OAuth2 error body.
    #[error("Unexpected token endpoint status {status}: {message}")]
    UnexpectedStatus {
        /// HTTP status code
        status: u16,
        /// Response body or reason
        message: String,
    },

    /// Success status but the body is not a usable token response.
    #[error("Invalid token response: {0}")]
    InvalidResponse(String),

    /// JSON parsing error
    #[error("Failed to parse token response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Failure raised by a custom exchanger implementation.
    #[error("{0}")]
    Other(#[source] Box<dyn std::error::Error + Send + Sync>),
}

fn error_response_message(error: &str, description: Option<&str>) -> String {
    match description {
        Some(description) => format!("Token endpoint returned error '{error}': {description}"),
        None => format!("Token endpoint returned error '{error}'"),
    }
}

impl ExchangeError {
    /// Create an error from an OAuth2 error response.
    #[must_use]
    pub fn error_response(error: impl Into<String>, description: Option<String>) -> Self {
        Self::ErrorResponse { error: error.into(), description, uri: None }
    }

    /// Create an invalid response error.
    #[must_use]
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse(message.into())
    }

    /// Wrap a transport error, dropping the request URL from its message.
    #[must_use]
    pub fn transport(err: reqwest_middleware::Error) -> Self {
        Self::Transport(without_url(err))
    }

    /// The OAuth2 error code, if the server supplied one.
    #[must_use]
    pub fn oauth_error_code(&self) -> Option<&str> {
        match self {
            Self::ErrorResponse { error, .. } => Some(error),
            _ => None,
        }
    }
}

/// Errors from the user-info endpoint.
#[derive(thiserror::Error, Debug)]
pub enum IdentityResolutionError {
    /// The client configuration has no user-info endpoint.
    #[error("No user-info endpoint configured for client '{0}'")]
    MissingEndpoint(String),

    /// HTTP transport error
    #[error("User-info request failed: {0}")]
    Transport(#[source] reqwest_middleware::Error),

    /// Non-success status from the user-info endpoint.
    #[error("User-info endpoint returned status {status}: {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, with any bearer token removed
        message: String,
    },

    /// The payload is JSON but not an object.
    #[error("Invalid user-info payload: {0}")]
    InvalidPayload(String),

    /// The payload lacks the subject attribute.
    #[error("User-info payload has no string attribute '{0}'")]
    MissingSubject(String),

    /// JSON parsing error
    #[error("Failed to parse user-info response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Failure raised by a custom resolver implementation.
    #[error("{0}")]
    Other(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl IdentityResolutionError {
    /// Wrap a transport error, dropping the request URL from its message.
    #[must_use]
    pub fn transport(err: reqwest_middleware::Error) -> Self {
        Self::Transport(without_url(err))
    }

    /// Create a status error from a response body.
    ///
    /// `secret` is scrubbed before the body is shortened, so a token cut at
    /// the truncation point cannot survive.
    #[must_use]
    pub fn status(status: u16, body: &str, secret: &str) -> Self {
        let scrubbed = if secret.is_empty() {
            body.to_string()
        } else {
            body.replace(secret, "[redacted]")
        };
        Self::Status { status, message: crate::client::error_body_text(scrubbed.as_bytes()) }
    }
}

fn without_url(err: reqwest_middleware::Error) -> reqwest_middleware::Error {
    match err {
        reqwest_middleware::Error::Reqwest(e) => {
            reqwest_middleware::Error::Reqwest(e.without_url())
        }
        other => other,
    }
}

/// Which delegated step of authentication failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthenticationStage {
    /// Exchanging the authorization code at the token endpoint.
    Exchange,
    /// Resolving the identity at the user-info endpoint.
    Resolution,
}

impl fmt::Display for AuthenticationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exchange => f.write_str("token exchange"),
            Self::Resolution => f.write_str("identity resolution"),
        }
    }
}

/// The only error surfaced by an authentication provider.
///
/// Displays as the wrapped error's message and exposes it as `source()`.
/// A failure here does not mean the credential was definitively rejected;
/// transient service failures surface the same way.
#[derive(thiserror::Error, Debug)]
pub enum AuthenticationServiceError {
    /// The authorization code could not be exchanged.
    #[error("{0}")]
    Exchange(#[source] ExchangeError),

    /// The identity could not be resolved with the obtained token.
    #[error("{0}")]
    Resolution(#[source] IdentityResolutionError),
}

impl AuthenticationServiceError {
    /// Step of the flow that failed.
    #[must_use]
    pub const fn stage(&self) -> AuthenticationStage {
        match self {
            Self::Exchange(_) => AuthenticationStage::Exchange,
            Self::Resolution(_) => AuthenticationStage::Resolution,
        }
    }

    /// The wrapped exchange error, if the exchange failed.
    #[must_use]
    pub const fn exchange_error(&self) -> Option<&ExchangeError> {
        match self {
            Self::Exchange(e) => Some(e),
            Self::Resolution(_) => None,
        }
    }

    /// The wrapped resolution error, if resolution failed.
    #[must_use]
    pub const fn resolution_error(&self) -> Option<&IdentityResolutionError> {
        match self {
            Self::Resolution(e) => Some(e),
            Self::Exchange(_) => None,
        }
    }
}

impl From<ExchangeError> for AuthenticationServiceError {
    fn from(err: ExchangeError) -> Self {
        Self::Exchange(err)
    }
}

impl From<IdentityResolutionError> for AuthenticationServiceError {
    fn from(err: IdentityResolutionError) -> Self {
        Self::Resolution(err)
    }
}

/// Result type alias for configuration.
pub type ConfigResult<T> = Result<T, ConfigurationError>;

/// Result type alias for token exchange.
pub type ExchangeResult<T> = Result<T, ExchangeError>;

/// Result type alias for identity resolution.
pub type ResolveResult<T> = Result<T, IdentityResolutionError>;

/// Result type alias for authentication.
pub type AuthResult<T> = Result<T, AuthenticationServiceError>;
