//! OAuth2 Authorization-Code Login - Entry Point
//!
//! Prints authorization request URIs and runs the code-for-principal pipeline
//! against a real provider.

use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use oauth2_code_login::authorize::authorization_code_request;
use oauth2_code_login::{
    AuthenticatedPrincipal, AuthenticationProvider, AuthorizationCodeAuthenticationProvider,
    AuthorizationCodeGrantCredential, ClientConfiguration, HttpConfig, HttpTokenExchanger,
    HttpUserInfoResolver, UserInfoMapping, authorization_request_uri, generate_state,
};

#[derive(Parser, Debug)]
#[command(name = "oauth2-code-login")]
#[command(about = "OAuth2 authorization-code login client")]
#[command(version)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "RUST_LOG", global = true)]
    log_level: String,

    /// Output logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(flatten)]
    client: ClientArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct ClientArgs {
    /// Registered client id
    #[arg(long, env = "OAUTH2_CLIENT_ID")]
    client_id: String,

    /// Registered client secret
    #[arg(long, env = "OAUTH2_CLIENT_SECRET", hide_env_values = true)]
    client_secret: String,

    /// Authorization endpoint
    #[arg(long, env = "OAUTH2_AUTHORIZATION_URI")]
    authorization_uri: String,

    /// Token endpoint
    #[arg(long, env = "OAUTH2_TOKEN_URI")]
    token_uri: String,

    /// Redirect URI registered for the client
    #[arg(long, env = "OAUTH2_REDIRECT_URI")]
    redirect_uri: String,

    /// User-info endpoint (required for login)
    #[arg(long, env = "OAUTH2_USER_INFO_URI")]
    user_info_uri: Option<String>,

    /// Requested scope (repeatable; the env var is space-delimited)
    #[arg(long, env = "OAUTH2_SCOPE", value_delimiter = ' ')]
    scope: Vec<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the authorization request URI to send the resource owner to
    AuthorizeUrl {
        /// Opaque state value (generated when omitted)
        #[arg(long)]
        state: Option<String>,
    },
    /// Exchange an authorization code and print the authenticated principal
    Login {
        /// Authorization code returned to the redirect URI
        #[arg(long)]
        code: String,

        /// User-info attribute holding the subject
        #[arg(long, default_value = "sub")]
        subject_attribute: String,

        /// User-info attribute holding raw authorities
        #[arg(long)]
        authorities_attribute: Option<String>,
    },
}

impl ClientArgs {
    fn into_configuration(self) -> anyhow::Result<ClientConfiguration> {
        let mut builder = ClientConfiguration::builder()
            .client_id(self.client_id)
            .client_secret(self.client_secret)
            .authorization_uri(self.authorization_uri)
            .token_uri(self.token_uri)
            .redirect_uri(self.redirect_uri)
            .scope(self.scope.into_iter().filter(|s| !s.is_empty()));
        if let Some(uri) = self.user_info_uri {
            builder = builder.user_info_uri(uri);
        }
        Ok(builder.build()?)
    }
}

fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer().compact().with_writer(std::io::stderr))
            .init();
    }
}

/// Principal as JSON, with token values replaced.
fn principal_json(principal: &AuthenticatedPrincipal) -> serde_json::Value {
    let access_token = principal.access_token();
    json!({
        "subject": principal.subject(),
        "authorities": principal.authorities(),
        "attributes": principal.attributes(),
        "client": principal.configuration(),
        "authorizationRequest": principal.authorization_request(),
        "accessToken": {
            "tokenType": access_token.token_type().as_str(),
            "value": "[redacted]",
            "expiresIn": access_token.expires_in(),
            "expiresAt": access_token.expires_at(),
            "scope": access_token.scope(),
        },
        "refreshToken": principal.refresh_token().map(|_| "[redacted]"),
        "details": principal.details(),
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.json_logs);

    let configuration = Arc::new(cli.client.into_configuration()?);

    match cli.command {
        Command::AuthorizeUrl { state } => {
            let state = state.unwrap_or_else(generate_state);
            let request = authorization_code_request(&configuration, Some(state))?;
            let uri = authorization_request_uri(&configuration, &request)?;
            println!("{uri}");
        }
        Command::Login { code, subject_attribute, authorities_attribute } => {
            let mut mapping = UserInfoMapping::with_subject_attribute(subject_attribute);
            if let Some(attribute) = authorities_attribute {
                mapping = mapping.authorities_from(attribute);
            }

            let http = HttpConfig::from_env()?;
            let provider = AuthorizationCodeAuthenticationProvider::new(
                Arc::new(HttpTokenExchanger::new(&http)?),
                Arc::new(HttpUserInfoResolver::new(&http, mapping)?),
            );

            tracing::info!(
                version = env!("CARGO_PKG_VERSION"),
                client_id = %configuration.client_id(),
                "Starting authorization code login"
            );

            let credential = AuthorizationCodeGrantCredential::new(code, configuration);
            let principal = match provider.authenticate(credential).await {
                Ok(principal) => principal,
                Err(e) => {
                    tracing::error!(stage = %e.stage(), error = %e, "Login failed");
                    return Err(e.into());
                }
            };

            println!("{}", serde_json::to_string_pretty(&principal_json(&principal))?);
        }
    }

    Ok(())
}
