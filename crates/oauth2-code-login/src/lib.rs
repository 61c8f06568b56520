//! OAuth2 Authorization-Code Login
//!
//! Client-side authentication for the OAuth2 authorization-code grant. A
//! caller hands in the code returned to its redirect URI and gets back an
//! authenticated principal carrying the tokens, the resolved identity and its
//! mapped authorities.
//!
//! # Features
//!
//! - **Code exchange**: `client_secret_basic` token requests with RFC 6749
//!   error handling
//! - **Identity resolution**: user-info lookup with the bearer token
//! - **Authority mapping**: pluggable, identity mapping by default
//! - **No hidden retries**: every failure is surfaced once, tagged with its stage
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use oauth2_code_login::{
//!     AuthenticationProvider, AuthorizationCodeAuthenticationProvider,
//!     AuthorizationCodeGrantCredential, ClientConfiguration, HttpConfig, HttpTokenExchanger,
//!     HttpUserInfoResolver, UserInfoMapping,
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let configuration = Arc::new(ClientConfiguration::from_env()?);
//!     let http = HttpConfig::from_env()?;
//!     let provider = AuthorizationCodeAuthenticationProvider::new(
//!         Arc::new(HttpTokenExchanger::new(&http)?),
//!         Arc::new(HttpUserInfoResolver::new(&http, UserInfoMapping::default())?),
//!     );
//!
//!     let credential = AuthorizationCodeGrantCredential::new("code-from-redirect", configuration);
//!     let principal = provider.authenticate(credential).await?;
//!     println!("{} {:?}", principal.subject(), principal.authorities());
//!     Ok(())
//! }
//! ```

pub mod authority;
pub mod authorize;
pub mod client;
pub mod config;
pub mod error;
pub mod exchange;
pub mod models;
pub mod provider;
pub mod userinfo;

pub use authority::{AuthorityMapper, IdentityAuthorityMapper, SimpleAuthorityMapper};
pub use authorize::{authorization_request_uri, generate_state};
pub use config::{ClientConfiguration, HttpConfig};
pub use error::{
    AuthenticationServiceError, AuthenticationStage, ConfigurationError, ExchangeError,
    IdentityResolutionError,
};
pub use exchange::{GrantTokenExchanger, HttpTokenExchanger};
pub use models::{
    AuthenticatedPrincipal, AuthorizationCodeGrantCredential, AuthorizationRequestAttributes,
    ClientContext, GrantedAuthority, IntermediateTokenPrincipal, TokenPair,
};
pub use provider::{AuthenticationProvider, AuthorizationCodeAuthenticationProvider};
pub use userinfo::{HttpUserInfoResolver, IdentityResolver, UserInfoMapping};
