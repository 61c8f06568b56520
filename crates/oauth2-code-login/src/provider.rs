//! Authentication provider for the authorization-code grant.
//!
//! [`AuthorizationCodeAuthenticationProvider`] runs one pass of
//! exchange, resolve, map and promote. It holds no per-call state and never
//! retries; each failure is surfaced as an [`AuthenticationServiceError`]
//! tagged with the stage that failed.

use std::any::TypeId;
use std::fmt;
use std::sync::Arc;

use crate::authority::{AuthorityMapper, IdentityAuthorityMapper};
use crate::error::{AuthResult, AuthenticationServiceError};
use crate::exchange::GrantTokenExchanger;
use crate::models::{
    AuthenticatedPrincipal, AuthorizationCodeGrantCredential, IntermediateTokenPrincipal,
};
use crate::userinfo::IdentityResolver;

/// Authenticates one kind of credential.
///
/// Dispatchers call [`supports`](Self::supports) first and only pass
/// credentials of a supported type to [`authenticate`](Self::authenticate).
#[async_trait::async_trait]
pub trait AuthenticationProvider: Send + Sync {
    /// Credential type this provider accepts.
    type Credential: Send + 'static;

    /// Whether credentials of `credential_type` can be authenticated here.
    fn supports(&self, credential_type: TypeId) -> bool {
        credential_type == TypeId::of::<Self::Credential>()
    }

    /// Typed shorthand for [`supports`](Self::supports).
    fn supports_type<T: 'static>(&self) -> bool
    where
        Self: Sized,
    {
        self.supports(TypeId::of::<T>())
    }

    /// Authenticate the credential.
    async fn authenticate(
        &self,
        credential: Self::Credential,
    ) -> AuthResult<AuthenticatedPrincipal>;
}

/// Provider for [`AuthorizationCodeGrantCredential`].
#[derive(Clone)]
pub struct AuthorizationCodeAuthenticationProvider {
    exchanger: Arc<dyn GrantTokenExchanger>,
    resolver: Arc<dyn IdentityResolver>,
    authorities_mapper: Arc<dyn AuthorityMapper>,
}

impl AuthorizationCodeAuthenticationProvider {
    /// Create a provider that keeps resolved authorities as they are.
    #[must_use]
    pub fn new(
        exchanger: Arc<dyn GrantTokenExchanger>,
        resolver: Arc<dyn IdentityResolver>,
    ) -> Self {
        Self { exchanger, resolver, authorities_mapper: Arc::new(IdentityAuthorityMapper) }
    }

    /// Replace the authority mapper. Configure before sharing the provider.
    #[must_use]
    pub fn with_authorities_mapper(mut self, mapper: Arc<dyn AuthorityMapper>) -> Self {
        self.authorities_mapper = mapper;
        self
    }
}

impl fmt::Debug for AuthorizationCodeAuthenticationProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthorizationCodeAuthenticationProvider").finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl AuthenticationProvider for AuthorizationCodeAuthenticationProvider {
    type Credential = AuthorizationCodeGrantCredential;

    async fn authenticate(
        &self,
        credential: AuthorizationCodeGrantCredential,
    ) -> AuthResult<AuthenticatedPrincipal> {
        let client_id = credential.configuration().client_id().to_string();

        let tokens = self.exchanger.exchange(&credential).await.map_err(|e| {
            tracing::warn!(
                client_id = %client_id,
                error = %e,
                "Authorization code exchange failed"
            );
            AuthenticationServiceError::Exchange(e)
        })?;

        let intermediate = IntermediateTokenPrincipal::from_grant(credential, tokens);

        let identity = self.resolver.resolve(&intermediate).await.map_err(|e| {
            tracing::warn!(client_id = %client_id, error = %e, "Identity resolution failed");
            AuthenticationServiceError::Resolution(e)
        })?;

        let authorities = self.authorities_mapper.map_authorities(identity.authorities());
        let principal = intermediate.promote(identity, authorities);

        tracing::info!(
            client_id = %client_id,
            subject = %principal.subject(),
            authorities = ?principal.authorities(),
            "Authenticated with authorization code"
        );

        Ok(principal)
    }
}
