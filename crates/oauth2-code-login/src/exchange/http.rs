//! Token endpoint client using `client_secret_basic` authentication.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest_middleware::ClientWithMiddleware;
use serde::{Deserialize, Deserializer};

use super::GrantTokenExchanger;
use crate::client::{build_http_client, error_body_text};
use crate::config::HttpConfig;
use crate::error::{ExchangeError, ExchangeResult};
use crate::models::{
    AccessToken, AccessTokenType, AuthorizationCodeGrantCredential, RefreshToken, TokenPair,
};

/// Default [`GrantTokenExchanger`] over HTTP.
///
/// Sends `grant_type=authorization_code`, the code and the configured
/// redirect URI as a form body, authenticating the client with HTTP Basic.
#[derive(Clone)]
pub struct HttpTokenExchanger {
    client: ClientWithMiddleware,
}

impl HttpTokenExchanger {
    /// Create an exchanger with its own HTTP client.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails.
    pub fn new(config: &HttpConfig) -> anyhow::Result<Self> {
        Ok(Self { client: build_http_client(config)? })
    }

    /// Create an exchanger over a caller-supplied client.
    #[must_use]
    pub fn with_client(client: ClientWithMiddleware) -> Self {
        Self { client }
    }
}

impl std::fmt::Debug for HttpTokenExchanger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTokenExchanger").finish()
    }
}

#[async_trait::async_trait]
impl GrantTokenExchanger for HttpTokenExchanger {
    async fn exchange(
        &self,
        credential: &AuthorizationCodeGrantCredential,
    ) -> ExchangeResult<TokenPair> {
        if credential.code().is_empty() {
            return Err(ExchangeError::InvalidRequest("authorization code is empty".into()));
        }

        let configuration = credential.configuration();
        let body = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("grant_type", "authorization_code")
            .append_pair("code", credential.code())
            .append_pair("redirect_uri", configuration.redirect_uri())
            .finish();

        tracing::debug!(
            client_id = %configuration.client_id(),
            token_uri = %configuration.token_uri(),
            "Sending authorization code token request"
        );

        let response = self
            .client
            .post(configuration.token_uri().as_str())
            .header(
                AUTHORIZATION,
                client_secret_basic(configuration.client_id(), configuration.client_secret()),
            )
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await
            .map_err(ExchangeError::transport)?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| ExchangeError::transport(e.into()))?;

        let value: serde_json::Value = match serde_json::from_slice(&body) {
            Ok(value) => value,
            Err(e) if status.is_success() => return Err(ExchangeError::Parse(e)),
            Err(_) => {
                return Err(ExchangeError::UnexpectedStatus {
                    status: status.as_u16(),
                    message: error_body_text(&body),
                });
            }
        };

        // Some providers answer errors with 200, so look for a string `error` first.
        let has_error_code = value.get("error").and_then(serde_json::Value::as_str).is_some();
        if !status.is_success() || has_error_code {
            return Err(match serde_json::from_value::<TokenErrorBody>(value) {
                Ok(err) => ExchangeError::ErrorResponse {
                    error: err.error,
                    description: err.error_description,
                    uri: err.error_uri,
                },
                // A 2xx body may carry tokens, so it is never quoted.
                Err(_) if status.is_success() => {
                    ExchangeError::invalid_response("malformed error body")
                }
                Err(_) => ExchangeError::UnexpectedStatus {
                    status: status.as_u16(),
                    message: error_body_text(&body),
                },
            });
        }

        let tokens = serde_json::from_value::<TokenSuccessBody>(value)?.into_token_pair()?;

        tracing::debug!(
            client_id = %configuration.client_id(),
            token_type = %tokens.access_token().token_type(),
            expires_in = tokens.access_token().expires_in(),
            has_refresh_token = tokens.refresh_token().is_some(),
            "Token exchange succeeded"
        );

        Ok(tokens)
    }
}

/// `Authorization: Basic` value per RFC 6749 section 2.3.1: both parts are
/// form-urlencoded before base64 encoding.
fn client_secret_basic(client_id: &str, client_secret: &str) -> String {
    let encode = |s: &str| url::form_urlencoded::byte_serialize(s.as_bytes()).collect::<String>();
    let credentials = format!("{}:{}", encode(client_id), encode(client_secret));
    format!("Basic {}", STANDARD.encode(credentials))
}

#[derive(Deserialize)]
struct TokenErrorBody {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    error_uri: Option<String>,
}

#[derive(Deserialize)]
struct TokenSuccessBody {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    token_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_u64")]
    expires_in: Option<u64>,
    #[serde(default)]
    scope: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
}

impl TokenSuccessBody {
    fn into_token_pair(self) -> ExchangeResult<TokenPair> {
        let value = self
            .access_token
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ExchangeError::invalid_response("missing access_token"))?;
        let token_type = self
            .token_type
            .as_deref()
            .map(AccessTokenType::parse)
            .ok_or_else(|| ExchangeError::invalid_response("missing token_type"))?;
        let scope = self
            .scope
            .map(|s| s.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default();

        let access_token =
            AccessToken::new(token_type, value, self.expires_in.unwrap_or(0), scope);
        let refresh_token = self.refresh_token.filter(|v| !v.is_empty()).map(RefreshToken::new);

        Ok(TokenPair::new(access_token, refresh_token))
    }
}

/// `expires_in` as a number or a numeric string; anything else is ignored.
fn lenient_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_u64(),
        Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_client_secret_basic() {
        // base64("client-1:secret")
        assert_eq!(client_secret_basic("client-1", "secret"), "Basic Y2xpZW50LTE6c2VjcmV0");
    }

    #[test]
    fn test_client_secret_basic_encodes_reserved_characters() {
        // base64("a%3Ab:c+d") : ':' is escaped, ' ' becomes '+'
        assert_eq!(client_secret_basic("a:b", "c d"), "Basic YSUzQWI6Yytk");
    }

    #[test]
    fn test_success_body_full() {
        let body: TokenSuccessBody = serde_json::from_value(json!({
            "access_token": "AT1",
            "token_type": "Bearer",
            "expires_in": 3600,
            "scope": "read write",
            "refresh_token": "RT1"
        }))
        .unwrap();
        let pair = body.into_token_pair().unwrap();

        assert_eq!(pair.access_token().value(), "AT1");
        assert_eq!(pair.access_token().token_type(), &AccessTokenType::Bearer);
        assert_eq!(pair.access_token().expires_in(), 3600);
        assert_eq!(pair.access_token().scope(), ["read", "write"]);
        assert_eq!(pair.refresh_token().map(RefreshToken::value), Some("RT1"));
    }

    #[test]
    fn test_success_body_minimal() {
        let body: TokenSuccessBody =
            serde_json::from_value(json!({"access_token": "AT1", "token_type": "N_A"})).unwrap();
        let pair = body.into_token_pair().unwrap();

        assert_eq!(pair.access_token().token_type(), &AccessTokenType::Unknown("N_A".into()));
        assert_eq!(pair.access_token().expires_in(), 0);
        assert!(pair.access_token().scope().is_empty());
        assert!(pair.refresh_token().is_none());
    }

    #[test]
    fn test_string_expires_in() {
        let body: TokenSuccessBody = serde_json::from_value(
            json!({"access_token": "AT1", "token_type": "bearer", "expires_in": "120"}),
        )
        .unwrap();
        assert_eq!(body.into_token_pair().unwrap().access_token().expires_in(), 120);
    }

    #[test]
    fn test_empty_access_token_rejected() {
        let body: TokenSuccessBody =
            serde_json::from_value(json!({"access_token": "", "token_type": "Bearer"})).unwrap();
        let err = body.into_token_pair().unwrap_err();
        assert!(matches!(err, ExchangeError::InvalidResponse(_)));
    }

    #[test]
    fn test_missing_token_type_rejected() {
        let body: TokenSuccessBody =
            serde_json::from_value(json!({"access_token": "AT1"})).unwrap();
        let err = body.into_token_pair().unwrap_err();
        assert!(err.to_string().contains("token_type"));
    }
}
