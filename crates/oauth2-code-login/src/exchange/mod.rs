//! Authorization-code-for-token exchange.

mod http;

pub use http::HttpTokenExchanger;

use crate::error::ExchangeResult;
use crate::models::{AuthorizationCodeGrantCredential, TokenPair};

/// Exchanges an authorization code for tokens at the token endpoint.
///
/// Implementations hold no per-call state and never retry: one call, one
/// request. On success the access token value is never empty.
#[async_trait::async_trait]
pub trait GrantTokenExchanger: Send + Sync {
    /// Exchange the credential's code using its client configuration.
    async fn exchange(
        &self,
        credential: &AuthorizationCodeGrantCredential,
    ) -> ExchangeResult<TokenPair>;
}
