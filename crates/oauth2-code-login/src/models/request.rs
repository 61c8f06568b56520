//! Authorization request descriptor.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{ConfigResult, ConfigurationError};

/// OAuth2 grant types that start at the authorization endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorizationGrantType {
    /// `authorization_code`
    AuthorizationCode,
    /// `implicit`
    Implicit,
}

impl AuthorizationGrantType {
    /// Wire value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AuthorizationCode => "authorization_code",
            Self::Implicit => "implicit",
        }
    }

    /// The only response type this grant type may be requested with.
    #[must_use]
    pub const fn response_type(self) -> ResponseType {
        match self {
            Self::AuthorizationCode => ResponseType::Code,
            Self::Implicit => ResponseType::Token,
        }
    }
}

impl fmt::Display for AuthorizationGrantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthorizationGrantType {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "authorization_code" => Ok(Self::AuthorizationCode),
            "implicit" => Ok(Self::Implicit),
            other => Err(ConfigurationError::UnsupportedGrantType(other.to_string())),
        }
    }
}

/// Authorization endpoint response types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseType {
    /// `code`
    Code,
    /// `token`
    Token,
}

impl ResponseType {
    /// Wire value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Code => "code",
            Self::Token => "token",
        }
    }
}

impl fmt::Display for ResponseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResponseType {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "code" => Ok(Self::Code),
            "token" => Ok(Self::Token),
            other => Err(ConfigurationError::UnsupportedResponseType(other.to_string())),
        }
    }
}

/// A pending authorization request.
///
/// The grant type and response type are validated as a pair when the value is
/// built, so every instance is either an authorization-code request with
/// response type `code` or an implicit request with response type `token`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizationRequestAttributes {
    grant_type: AuthorizationGrantType,
    response_type: ResponseType,
    client_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    redirect_uri: Option<String>,
    scope: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    state: Option<String>,
}

impl AuthorizationRequestAttributes {
    /// Build and validate a request.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] if the response type does not pair with
    /// the grant type or the client id is empty.
    pub fn new(
        grant_type: AuthorizationGrantType,
        response_type: ResponseType,
        client_id: impl Into<String>,
        redirect_uri: Option<String>,
        scope: Vec<String>,
        state: Option<String>,
    ) -> ConfigResult<Self> {
        let expected = grant_type.response_type();
        if response_type != expected {
            return Err(ConfigurationError::MismatchedResponseType {
                grant_type: grant_type.to_string(),
                expected: expected.to_string(),
                actual: response_type.to_string(),
            });
        }

        let client_id = client_id.into();
        if client_id.is_empty() {
            return Err(ConfigurationError::MissingField("clientId"));
        }

        Ok(Self { grant_type, response_type, client_id, redirect_uri, scope, state })
    }

    /// Build a request from wire strings, e.g. query parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] if either type is unsupported or they
    /// do not pair.
    pub fn parse(
        grant_type: &str,
        response_type: &str,
        client_id: impl Into<String>,
        redirect_uri: Option<String>,
        scope: Vec<String>,
        state: Option<String>,
    ) -> ConfigResult<Self> {
        Self::new(
            grant_type.parse()?,
            response_type.parse()?,
            client_id,
            redirect_uri,
            scope,
            state,
        )
    }

    /// Authorization-code grant request (response type `code`).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] if the client id is empty.
    pub fn authorization_code_grant(
        client_id: impl Into<String>,
        redirect_uri: Option<String>,
        scope: Vec<String>,
        state: Option<String>,
    ) -> ConfigResult<Self> {
        Self::new(
            AuthorizationGrantType::AuthorizationCode,
            ResponseType::Code,
            client_id,
            redirect_uri,
            scope,
            state,
        )
    }

    /// Implicit grant request (response type `token`).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] if the client id is empty.
    pub fn implicit_grant(
        client_id: impl Into<String>,
        redirect_uri: Option<String>,
        scope: Vec<String>,
        state: Option<String>,
    ) -> ConfigResult<Self> {
        Self::new(
            AuthorizationGrantType::Implicit,
            ResponseType::Token,
            client_id,
            redirect_uri,
            scope,
            state,
        )
    }

    #[must_use]
    pub const fn grant_type(&self) -> AuthorizationGrantType {
        self.grant_type
    }

    #[must_use]
    pub const fn response_type(&self) -> ResponseType {
        self.response_type
    }

    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    #[must_use]
    pub fn redirect_uri(&self) -> Option<&str> {
        self.redirect_uri.as_deref()
    }

    #[must_use]
    pub fn scope(&self) -> &[String] {
        &self.scope
    }

    #[must_use]
    pub fn state(&self) -> Option<&str> {
        self.state.as_deref()
    }

    #[must_use]
    pub fn is_authorization_code_grant(&self) -> bool {
        self.grant_type == AuthorizationGrantType::AuthorizationCode
    }

    #[must_use]
    pub fn is_implicit_grant(&self) -> bool {
        self.grant_type == AuthorizationGrantType::Implicit
    }
}
