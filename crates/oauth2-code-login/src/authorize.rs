//! Authorization endpoint request URIs.

use url::Url;

use crate::config::ClientConfiguration;
use crate::error::{ConfigResult, ConfigurationError};
use crate::models::AuthorizationRequestAttributes;

/// Build the URI the resource owner is sent to at the authorization endpoint.
///
/// Query parameters already present on the configured endpoint are kept.
///
/// # Errors
///
/// Returns [`ConfigurationError::ClientMismatch`] if the request was built for
/// a different client.
pub fn authorization_request_uri(
    configuration: &ClientConfiguration,
    request: &AuthorizationRequestAttributes,
) -> ConfigResult<Url> {
    if request.client_id() != configuration.client_id() {
        return Err(ConfigurationError::ClientMismatch {
            request: request.client_id().to_string(),
            configured: configuration.client_id().to_string(),
        });
    }

    let mut uri = configuration.authorization_uri().clone();
    {
        let mut query = uri.query_pairs_mut();
        query
            .append_pair("response_type", request.response_type().as_str())
            .append_pair("client_id", request.client_id());
        if let Some(redirect_uri) = request.redirect_uri() {
            query.append_pair("redirect_uri", redirect_uri);
        }
        if !request.scope().is_empty() {
            query.append_pair("scope", &request.scope().join(" "));
        }
        if let Some(state) = request.state() {
            query.append_pair("state", state);
        }
    }
    Ok(uri)
}

/// Authorization-code request for `configuration`, using its redirect URI
/// and scope.
///
/// # Errors
///
/// Returns [`ConfigurationError`] if the configuration's client id is empty.
pub fn authorization_code_request(
    configuration: &ClientConfiguration,
    state: Option<String>,
) -> ConfigResult<AuthorizationRequestAttributes> {
    AuthorizationRequestAttributes::authorization_code_grant(
        configuration.client_id(),
        Some(configuration.redirect_uri().to_string()),
        configuration.scope().to_vec(),
        state,
    )
}

/// Fresh opaque `state` value.
#[must_use]
pub fn generate_state() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
