//! Credential and principal types for the two phases of authentication.
//!
//! An [`AuthorizationCodeGrantCredential`] is the unauthenticated input. Once
//! the code has been exchanged it becomes an [`IntermediateTokenPrincipal`],
//! which holds tokens but no identity. [`IntermediateTokenPrincipal::promote`]
//! turns that into the final [`AuthenticatedPrincipal`].

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::request::AuthorizationRequestAttributes;
use super::token::{AccessToken, RefreshToken, TokenPair};
use crate::config::ClientConfiguration;

/// Caller-supplied request metadata, carried through unchanged.
pub type Details = serde_json::Map<String, serde_json::Value>;

/// Raw user-info attributes.
pub type Attributes = serde_json::Map<String, serde_json::Value>;

/// A granted authority, e.g. `ROLE_USER` or `SCOPE_read`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GrantedAuthority(String);

impl GrantedAuthority {
    #[must_use]
    pub fn new(authority: impl Into<String>) -> Self {
        Self(authority.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GrantedAuthority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GrantedAuthority {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for GrantedAuthority {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Ordered, de-duplicated authority set.
pub type Authorities = BTreeSet<GrantedAuthority>;

/// Collect authority names into an [`Authorities`] set.
pub fn authorities<I, S>(names: I) -> Authorities
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    names.into_iter().map(GrantedAuthority::new).collect()
}

/// Unauthenticated input: an authorization code returned to the redirect URI.
#[derive(Clone)]
pub struct AuthorizationCodeGrantCredential {
    code: String,
    configuration: Arc<ClientConfiguration>,
    authorization_request: Option<AuthorizationRequestAttributes>,
    details: Details,
}

impl AuthorizationCodeGrantCredential {
    #[must_use]
    pub fn new(code: impl Into<String>, configuration: Arc<ClientConfiguration>) -> Self {
        Self {
            code: code.into(),
            configuration,
            authorization_request: None,
            details: Details::new(),
        }
    }

    /// Attach caller metadata (remote address, session id, ...).
    #[must_use]
    pub fn with_details(mut self, details: Details) -> Self {
        self.details = details;
        self
    }

    /// Attach the authorization request this code answers.
    #[must_use]
    pub fn with_authorization_request(mut self, request: AuthorizationRequestAttributes) -> Self {
        self.authorization_request = Some(request);
        self
    }

    /// The authorization code. Never log this.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    #[must_use]
    pub fn configuration(&self) -> &ClientConfiguration {
        &self.configuration
    }

    #[must_use]
    pub const fn authorization_request(&self) -> Option<&AuthorizationRequestAttributes> {
        self.authorization_request.as_ref()
    }

    #[must_use]
    pub const fn details(&self) -> &Details {
        &self.details
    }
}

impl fmt::Debug for AuthorizationCodeGrantCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthorizationCodeGrantCredential")
            .field("code", &"[redacted]")
            .field("client_id", &self.configuration.client_id())
            .field("authorization_request", &self.authorization_request)
            .field("details", &self.details)
            .finish()
    }
}

/// Identity returned by a user-info lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    subject: String,
    authorities: Authorities,
    attributes: Attributes,
}

impl Identity {
    #[must_use]
    pub fn new(subject: impl Into<String>, authorities: Authorities) -> Self {
        Self { subject: subject.into(), authorities, attributes: Attributes::new() }
    }

    /// Keep the raw user-info attributes alongside the identity.
    #[must_use]
    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    #[must_use]
    pub const fn authorities(&self) -> &Authorities {
        &self.authorities
    }

    #[must_use]
    pub const fn attributes(&self) -> &Attributes {
        &self.attributes
    }
}

/// Token holder with no resolved identity yet.
#[derive(Debug, Clone)]
pub struct IntermediateTokenPrincipal {
    configuration: Arc<ClientConfiguration>,
    authorization_request: Option<AuthorizationRequestAttributes>,
    access_token: AccessToken,
    refresh_token: Option<RefreshToken>,
    details: Details,
}

impl IntermediateTokenPrincipal {
    /// Consume a credential and the tokens it was exchanged for.
    #[must_use]
    pub fn from_grant(credential: AuthorizationCodeGrantCredential, tokens: TokenPair) -> Self {
        let (access_token, refresh_token) = tokens.into_parts();
        Self {
            configuration: credential.configuration,
            authorization_request: credential.authorization_request,
            access_token,
            refresh_token,
            details: credential.details,
        }
    }

    #[must_use]
    pub fn configuration(&self) -> &ClientConfiguration {
        &self.configuration
    }

    #[must_use]
    pub const fn access_token(&self) -> &AccessToken {
        &self.access_token
    }

    #[must_use]
    pub const fn refresh_token(&self) -> Option<&RefreshToken> {
        self.refresh_token.as_ref()
    }

    #[must_use]
    pub const fn details(&self) -> &Details {
        &self.details
    }

    /// Attach a resolved identity and its mapped authorities.
    ///
    /// The identity's raw authorities are dropped; `authorities` replaces them.
    #[must_use]
    pub fn promote(self, identity: Identity, authorities: Authorities) -> AuthenticatedPrincipal {
        AuthenticatedPrincipal {
            subject: identity.subject,
            attributes: identity.attributes,
            authorities,
            configuration: self.configuration,
            authorization_request: self.authorization_request,
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            details: self.details,
        }
    }
}

/// Result of a successful authentication.
#[derive(Debug, Clone)]
pub struct AuthenticatedPrincipal {
    subject: String,
    attributes: Attributes,
    authorities: Authorities,
    configuration: Arc<ClientConfiguration>,
    authorization_request: Option<AuthorizationRequestAttributes>,
    access_token: AccessToken,
    refresh_token: Option<RefreshToken>,
    details: Details,
}

impl AuthenticatedPrincipal {
    /// Resolved subject (username).
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Mapped authorities.
    #[must_use]
    pub const fn authorities(&self) -> &Authorities {
        &self.authorities
    }

    #[must_use]
    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities.iter().any(|a| a.as_str() == authority)
    }

    /// Raw user-info attributes.
    #[must_use]
    pub const fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&serde_json::Value> {
        self.attributes.get(name)
    }

    #[must_use]
    pub fn configuration(&self) -> &ClientConfiguration {
        &self.configuration
    }

    /// Shared handle to the client configuration.
    #[must_use]
    pub fn configuration_arc(&self) -> Arc<ClientConfiguration> {
        Arc::clone(&self.configuration)
    }

    #[must_use]
    pub const fn authorization_request(&self) -> Option<&AuthorizationRequestAttributes> {
        self.authorization_request.as_ref()
    }

    #[must_use]
    pub const fn access_token(&self) -> &AccessToken {
        &self.access_token
    }

    #[must_use]
    pub const fn refresh_token(&self) -> Option<&RefreshToken> {
        self.refresh_token.as_ref()
    }

    #[must_use]
    pub const fn details(&self) -> &Details {
        &self.details
    }

    /// Always `true`; the type only exists after authentication succeeded.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        true
    }
}
