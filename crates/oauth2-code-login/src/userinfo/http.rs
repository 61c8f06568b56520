//! User-info endpoint client using bearer token authentication.

use reqwest::header::ACCEPT;
use reqwest_middleware::ClientWithMiddleware;
use serde_json::Value;

use super::{IdentityResolver, UserInfoMapping};
use crate::client::build_http_client;
use crate::config::HttpConfig;
use crate::error::{IdentityResolutionError, ResolveResult};
use crate::models::{
    Attributes, Authorities, GrantedAuthority, Identity, IntermediateTokenPrincipal,
};

/// Default [`IdentityResolver`] over HTTP.
#[derive(Clone)]
pub struct HttpUserInfoResolver {
    client: ClientWithMiddleware,
    mapping: UserInfoMapping,
}

impl HttpUserInfoResolver {
    /// Create a resolver with its own HTTP client.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails.
    pub fn new(config: &HttpConfig, mapping: UserInfoMapping) -> anyhow::Result<Self> {
        Ok(Self { client: build_http_client(config)?, mapping })
    }

    /// Create a resolver over a caller-supplied client.
    #[must_use]
    pub fn with_client(client: ClientWithMiddleware, mapping: UserInfoMapping) -> Self {
        Self { client, mapping }
    }

    #[must_use]
    pub const fn mapping(&self) -> &UserInfoMapping {
        &self.mapping
    }

    fn to_identity(&self, attributes: Attributes) -> ResolveResult<Identity> {
        let subject = match attributes.get(&self.mapping.subject_attribute) {
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => {
                return Err(IdentityResolutionError::MissingSubject(
                    self.mapping.subject_attribute.clone(),
                ));
            }
        };

        let mut authorities: Authorities = self
            .mapping
            .default_authorities
            .iter()
            .map(|a| GrantedAuthority::new(a.as_str()))
            .collect();

        if let Some(attribute) = &self.mapping.authorities_attribute {
            match attributes.get(attribute) {
                Some(Value::Array(items)) => authorities.extend(
                    items.iter().filter_map(Value::as_str).map(GrantedAuthority::from),
                ),
                Some(Value::String(s)) => {
                    authorities.extend(s.split_whitespace().map(GrantedAuthority::from));
                }
                _ => {}
            }
        }

        Ok(Identity::new(subject, authorities).with_attributes(attributes))
    }
}

impl std::fmt::Debug for HttpUserInfoResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpUserInfoResolver").field("mapping", &self.mapping).finish()
    }
}

#[async_trait::async_trait]
impl IdentityResolver for HttpUserInfoResolver {
    async fn resolve(&self, principal: &IntermediateTokenPrincipal) -> ResolveResult<Identity> {
        let configuration = principal.configuration();
        let uri = configuration.user_info_uri().ok_or_else(|| {
            IdentityResolutionError::MissingEndpoint(configuration.client_id().to_string())
        })?;
        let token = principal.access_token().value();

        tracing::debug!(
            client_id = %configuration.client_id(),
            user_info_uri = %uri,
            "Requesting user info"
        );

        let response = self
            .client
            .get(uri.as_str())
            .bearer_auth(token)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(IdentityResolutionError::transport)?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| IdentityResolutionError::transport(e.into()))?;

        if !status.is_success() {
            return Err(IdentityResolutionError::status(
                status.as_u16(),
                &String::from_utf8_lossy(&body),
                token,
            ));
        }

        match serde_json::from_slice::<Value>(&body)? {
            Value::Object(attributes) => self.to_identity(attributes),
            other => Err(IdentityResolutionError::InvalidPayload(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
