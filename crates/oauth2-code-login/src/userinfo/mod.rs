//! Identity resolution at the user-info endpoint.

mod http;

pub use http::HttpUserInfoResolver;

use crate::config::defaults;
use crate::error::ResolveResult;
use crate::models::{Identity, IntermediateTokenPrincipal};

/// Resolves the resource owner behind an access token.
///
/// Implementations are stateless and must keep the access token out of any
/// error they return.
#[async_trait::async_trait]
pub trait IdentityResolver: Send + Sync {
    /// Look up the identity for the principal's access token.
    async fn resolve(&self, principal: &IntermediateTokenPrincipal) -> ResolveResult<Identity>;
}

/// How a user-info JSON object maps onto an [`Identity`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserInfoMapping {
    /// Attribute holding the subject (`sub` for OpenID Connect, `id` or
    /// `login` for many social providers).
    pub subject_attribute: String,

    /// Attribute holding raw authorities, either a JSON array of strings or
    /// a space-delimited string.
    pub authorities_attribute: Option<String>,

    /// Authorities granted to every identity.
    pub default_authorities: Vec<String>,
}

impl UserInfoMapping {
    /// Mapping with a custom subject attribute and the default authorities.
    #[must_use]
    pub fn with_subject_attribute(attribute: impl Into<String>) -> Self {
        Self { subject_attribute: attribute.into(), ..Self::default() }
    }

    /// Also read raw authorities from `attribute`.
    #[must_use]
    pub fn authorities_from(mut self, attribute: impl Into<String>) -> Self {
        self.authorities_attribute = Some(attribute.into());
        self
    }
}

impl Default for UserInfoMapping {
    fn default() -> Self {
        Self {
            subject_attribute: defaults::SUBJECT_ATTRIBUTE.to_string(),
            authorities_attribute: None,
            default_authorities: vec![defaults::DEFAULT_AUTHORITY.to_string()],
        }
    }
}
