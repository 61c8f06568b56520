//! Access and refresh tokens issued by the token endpoint.
//!
//! Token values are secrets: `Debug` redacts them and nothing in this crate
//! logs or serializes them.

use std::fmt;

use chrono::{DateTime, Duration, Utc};

/// Access token type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AccessTokenType {
    /// `Bearer` (RFC 6750)
    Bearer,
    /// `MAC`
    Mac,
    /// Any other type, kept as sent by the server.
    Unknown(String),
}

impl AccessTokenType {
    /// Classify a `token_type` value. Matching is case-insensitive.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("bearer") {
            Self::Bearer
        } else if value.eq_ignore_ascii_case("mac") {
            Self::Mac
        } else {
            Self::Unknown(value.to_string())
        }
    }

    /// Canonical wire value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Bearer => "Bearer",
            Self::Mac => "MAC",
            Self::Unknown(raw) => raw,
        }
    }
}

impl fmt::Display for AccessTokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An access token with its type, lifetime and granted scope.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    token_type: AccessTokenType,
    value: String,
    expires_in: u64,
    scope: Vec<String>,
    issued_at: DateTime<Utc>,
}

impl AccessToken {
    /// Create a token issued now.
    #[must_use]
    pub fn new(
        token_type: AccessTokenType,
        value: impl Into<String>,
        expires_in: u64,
        scope: Vec<String>,
    ) -> Self {
        Self::new_at(token_type, value, expires_in, scope, Utc::now())
    }

    /// Create a token with an explicit issue time.
    #[must_use]
    pub fn new_at(
        token_type: AccessTokenType,
        value: impl Into<String>,
        expires_in: u64,
        scope: Vec<String>,
        issued_at: DateTime<Utc>,
    ) -> Self {
        Self { token_type, value: value.into(), expires_in, scope, issued_at }
    }

    #[must_use]
    pub const fn token_type(&self) -> &AccessTokenType {
        &self.token_type
    }

    /// Token value. Never log this.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Lifetime in seconds; `0` when the server did not say.
    #[must_use]
    pub const fn expires_in(&self) -> u64 {
        self.expires_in
    }

    #[must_use]
    pub fn scope(&self) -> &[String] {
        &self.scope
    }

    #[must_use]
    pub const fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    /// Expiry instant, or `None` when the lifetime is unknown.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        if self.expires_in == 0 {
            return None;
        }
        let secs = i64::try_from(self.expires_in).ok()?;
        self.issued_at.checked_add_signed(Duration::seconds(secs))
    }

    /// Whether the token is past its lifetime at `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().is_some_and(|expiry| now >= expiry)
    }

    /// Whether the token is past its lifetime.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("token_type", &self.token_type)
            .field("value", &"[redacted]")
            .field("expires_in", &self.expires_in)
            .field("scope", &self.scope)
            .field("issued_at", &self.issued_at)
            .finish()
    }
}

/// An opaque refresh token.
#[derive(Clone, PartialEq, Eq)]
pub struct RefreshToken {
    value: String,
}

impl RefreshToken {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self { value: value.into() }
    }

    /// Token value. Never log this.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Debug for RefreshToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshToken").field("value", &"[redacted]").finish()
    }
}

/// Tokens returned by a successful code exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    access_token: AccessToken,
    refresh_token: Option<RefreshToken>,
}

impl TokenPair {
    #[must_use]
    pub const fn new(access_token: AccessToken, refresh_token: Option<RefreshToken>) -> Self {
        Self { access_token, refresh_token }
    }

    #[must_use]
    pub const fn access_token(&self) -> &AccessToken {
        &self.access_token
    }

    #[must_use]
    pub const fn refresh_token(&self) -> Option<&RefreshToken> {
        self.refresh_token.as_ref()
    }

    /// Split into owned tokens.
    #[must_use]
    pub fn into_parts(self) -> (AccessToken, Option<RefreshToken>) {
        (self.access_token, self.refresh_token)
    }
}
