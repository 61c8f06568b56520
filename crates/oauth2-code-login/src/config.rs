//! Configuration for the OAuth2 client and its HTTP transport.

use std::fmt;
use std::time::Duration;

use serde::Serialize;
use url::Url;

use crate::error::{ConfigResult, ConfigurationError};

/// Default values.
pub mod defaults {
    use std::time::Duration;

    /// Request timeout for token and user-info calls.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    /// Connection timeout.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// User agent sent to providers.
    pub const USER_AGENT: &str = concat!("oauth2-code-login/", env!("CARGO_PKG_VERSION"));

    /// User-info attribute holding the subject.
    pub const SUBJECT_ATTRIBUTE: &str = "sub";

    /// Authority granted to every resolved identity.
    pub const DEFAULT_AUTHORITY: &str = "ROLE_USER";

    /// Prefix added by the simple authority mapper.
    pub const ROLE_PREFIX: &str = "ROLE_";
}

/// Registered client identifiers and provider endpoints.
///
/// Immutable once built; share it as `Arc<ClientConfiguration>`.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfiguration {
    client_id: String,
    #[serde(skip_serializing)]
    client_secret: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    client_name: Option<String>,
    authorization_uri: Url,
    token_uri: Url,
    redirect_uri: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_info_uri: Option<Url>,
    scope: Vec<String>,
}

impl ClientConfiguration {
    /// Start building a configuration.
    #[must_use]
    pub fn builder() -> ClientConfigurationBuilder {
        ClientConfigurationBuilder::default()
    }

    /// Build a configuration from `OAUTH2_*` environment variables.
    ///
    /// Reads `OAUTH2_CLIENT_ID`, `OAUTH2_CLIENT_SECRET`, `OAUTH2_AUTHORIZATION_URI`,
    /// `OAUTH2_TOKEN_URI`, `OAUTH2_REDIRECT_URI`, and optionally
    /// `OAUTH2_USER_INFO_URI`, `OAUTH2_CLIENT_NAME` and `OAUTH2_SCOPE`
    /// (space-delimited).
    ///
    /// # Errors
    ///
    /// Returns error if a required variable is missing or invalid.
    pub fn from_env() -> anyhow::Result<Self> {
        let var = |name: &str| std::env::var(name).ok();

        let mut builder = Self::builder();
        if let Some(v) = var("OAUTH2_CLIENT_ID") {
            builder = builder.client_id(v);
        }
        if let Some(v) = var("OAUTH2_CLIENT_SECRET") {
            builder = builder.client_secret(v);
        }
        if let Some(v) = var("OAUTH2_CLIENT_NAME") {
            builder = builder.client_name(v);
        }
        if let Some(v) = var("OAUTH2_AUTHORIZATION_URI") {
            builder = builder.authorization_uri(v);
        }
        if let Some(v) = var("OAUTH2_TOKEN_URI") {
            builder = builder.token_uri(v);
        }
        if let Some(v) = var("OAUTH2_REDIRECT_URI") {
            builder = builder.redirect_uri(v);
        }
        if let Some(v) = var("OAUTH2_USER_INFO_URI") {
            builder = builder.user_info_uri(v);
        }
        if let Some(v) = var("OAUTH2_SCOPE") {
            builder = builder.scope(v.split_whitespace().map(str::to_string));
        }

        Ok(builder.build()?)
    }

    /// Client identifier.
    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Client secret. Never log this.
    #[must_use]
    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    /// Display name of the client, if any.
    #[must_use]
    pub fn client_name(&self) -> Option<&str> {
        self.client_name.as_deref()
    }

    /// Authorization endpoint.
    #[must_use]
    pub const fn authorization_uri(&self) -> &Url {
        &self.authorization_uri
    }

    /// Token endpoint.
    #[must_use]
    pub const fn token_uri(&self) -> &Url {
        &self.token_uri
    }

    /// Redirect URI registered for this client, exactly as configured.
    ///
    /// Providers compare it character for character, so it is never
    /// normalized.
    #[must_use]
    pub fn redirect_uri(&self) -> &str {
        &self.redirect_uri
    }

    /// User-info endpoint, if the provider has one.
    #[must_use]
    pub const fn user_info_uri(&self) -> Option<&Url> {
        self.user_info_uri.as_ref()
    }

    /// Scopes requested by default.
    #[must_use]
    pub fn scope(&self) -> &[String] {
        &self.scope
    }
}

impl fmt::Debug for ClientConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfiguration")
            .field("client_id", &self.client_id)
            .field("client_name", &self.client_name)
            .field("authorization_uri", &self.authorization_uri.as_str())
            .field("token_uri", &self.token_uri.as_str())
            .field("redirect_uri", &self.redirect_uri)
            .field("user_info_uri", &self.user_info_uri.as_ref().map(Url::as_str))
            .field("scope", &self.scope)
            .finish()
    }
}

/// Builder for [`ClientConfiguration`].
#[derive(Default)]
pub struct ClientConfigurationBuilder {
    client_id: Option<String>,
    client_secret: Option<String>,
    client_name: Option<String>,
    authorization_uri: Option<String>,
    token_uri: Option<String>,
    redirect_uri: Option<String>,
    user_info_uri: Option<String>,
    scope: Vec<String>,
}

impl ClientConfigurationBuilder {
    /// Set the client identifier.
    #[must_use]
    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Set the client secret.
    #[must_use]
    pub fn client_secret(mut self, client_secret: impl Into<String>) -> Self {
        self.client_secret = Some(client_secret.into());
        self
    }

    /// Set the display name.
    #[must_use]
    pub fn client_name(mut self, client_name: impl Into<String>) -> Self {
        self.client_name = Some(client_name.into());
        self
    }

    /// Set the authorization endpoint.
    #[must_use]
    pub fn authorization_uri(mut self, uri: impl Into<String>) -> Self {
        self.authorization_uri = Some(uri.into());
        self
    }

    /// Set the token endpoint.
    #[must_use]
    pub fn token_uri(mut self, uri: impl Into<String>) -> Self {
        self.token_uri = Some(uri.into());
        self
    }

    /// Set the redirect URI.
    #[must_use]
    pub fn redirect_uri(mut self, uri: impl Into<String>) -> Self {
        self.redirect_uri = Some(uri.into());
        self
    }

    /// Set the user-info endpoint.
    #[must_use]
    pub fn user_info_uri(mut self, uri: impl Into<String>) -> Self {
        self.user_info_uri = Some(uri.into());
        self
    }

    /// Set the default scopes.
    #[must_use]
    pub fn scope<I, S>(mut self, scope: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scope = scope.into_iter().map(Into::into).collect();
        self
    }

    /// Validate and build the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] if an identifier is missing or an
    /// endpoint is not an absolute URI.
    pub fn build(self) -> ConfigResult<ClientConfiguration> {
        let client_id = required(self.client_id, "clientId")?;
        let client_secret = required(self.client_secret, "clientSecret")?;
        let authorization_uri = parse_uri(self.authorization_uri, "authorizationUri")?;
        let token_uri = parse_uri(self.token_uri, "tokenUri")?;
        let redirect_uri = required(self.redirect_uri, "redirectUri")?;
        absolute_uri(&redirect_uri, "redirectUri")?;
        let user_info_uri = match self.user_info_uri {
            Some(uri) => Some(parse_uri(Some(uri), "userInfoUri")?),
            None => None,
        };

        Ok(ClientConfiguration {
            client_id,
            client_secret,
            client_name: self.client_name,
            authorization_uri,
            token_uri,
            redirect_uri,
            user_info_uri,
            scope: self.scope,
        })
    }
}

fn required(value: Option<String>, field: &'static str) -> ConfigResult<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigurationError::MissingField(field)),
    }
}

fn parse_uri(value: Option<String>, field: &'static str) -> ConfigResult<Url> {
    absolute_uri(&required(value, field)?, field)
}

fn absolute_uri(value: &str, field: &'static str) -> ConfigResult<Url> {
    Url::parse(value).map_err(|e| ConfigurationError::invalid_uri(field, e))
}

/// HTTP transport settings for the default exchanger and resolver.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Request timeout.
    pub request_timeout: Duration,

    /// Connection timeout.
    pub connect_timeout: Duration,

    /// User agent header.
    pub user_agent: String,
}

impl HttpConfig {
    /// Create a configuration with explicit timeouts.
    #[must_use]
    pub fn new(request_timeout: Duration, connect_timeout: Duration) -> Self {
        Self {
            request_timeout,
            connect_timeout,
            user_agent: defaults::USER_AGENT.to_string(),
        }
    }

    /// Create a test configuration with short timeouts for mock servers.
    #[must_use]
    pub fn for_testing() -> Self {
        Self::new(Duration::from_secs(5), Duration::from_secs(2))
    }

    /// Create configuration from environment variables.
    ///
    /// Reads `OAUTH2_HTTP_TIMEOUT_SECS` and `OAUTH2_HTTP_CONNECT_TIMEOUT_SECS`.
    ///
    /// # Errors
    ///
    /// Returns error if a variable is set but not a number.
    pub fn from_env() -> anyhow::Result<Self> {
        let secs = |name: &str, default: Duration| -> anyhow::Result<Duration> {
            match std::env::var(name) {
                Ok(v) => Ok(Duration::from_secs(v.parse()?)),
                Err(_) => Ok(default),
            }
        };

        Ok(Self::new(
            secs("OAUTH2_HTTP_TIMEOUT_SECS", defaults::REQUEST_TIMEOUT)?,
            secs("OAUTH2_HTTP_CONNECT_TIMEOUT_SECS", defaults::CONNECT_TIMEOUT)?,
        ))
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self::new(defaults::REQUEST_TIMEOUT, defaults::CONNECT_TIMEOUT)
    }
}
