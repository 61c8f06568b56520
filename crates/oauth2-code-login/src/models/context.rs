//! Read-only view of an authenticated client session.

use super::principal::AuthenticatedPrincipal;
use super::request::AuthorizationRequestAttributes;
use super::token::{AccessToken, RefreshToken};
use crate::config::ClientConfiguration;

/// What a downstream consumer needs to call a resource server on behalf of
/// the resource owner.
pub trait ClientContext {
    /// Client the tokens were issued to.
    fn configuration(&self) -> &ClientConfiguration;

    /// Authorization request that started the flow, when it was recorded.
    fn authorization_request(&self) -> Option<&AuthorizationRequestAttributes>;

    fn access_token(&self) -> &AccessToken;

    fn refresh_token(&self) -> Option<&RefreshToken>;
}

impl ClientContext for AuthenticatedPrincipal {
    fn configuration(&self) -> &ClientConfiguration {
        Self::configuration(self)
    }

    fn authorization_request(&self) -> Option<&AuthorizationRequestAttributes> {
        Self::authorization_request(self)
    }

    fn access_token(&self) -> &AccessToken {
        Self::access_token(self)
    }

    fn refresh_token(&self) -> Option<&RefreshToken> {
        Self::refresh_token(self)
    }
}
