//! Data models for the authorization-code login flow.
//!
//! Everything here is immutable once constructed. Secret-bearing types
//! redact their values in `Debug` output.

mod context;
mod principal;
mod request;
mod token;

pub use context::ClientContext;
pub use principal::{
    Attributes, AuthenticatedPrincipal, Authorities, AuthorizationCodeGrantCredential, Details,
    GrantedAuthority, Identity, IntermediateTokenPrincipal, authorities,
};
pub use request::{AuthorizationGrantType, AuthorizationRequestAttributes, ResponseType};
pub use token::{AccessToken, AccessTokenType, RefreshToken, TokenPair};
