//! Authenticator implementation
//!
//! Handles applying authentication to requests and managing token refresh.

use super::types::{AuthConfig, CachedToken};
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Header carrying the scoped token on every service request
pub const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";

/// Header the identity service returns the issued token in
pub const SUBJECT_TOKEN_HEADER: &str = "X-Subject-Token";

/// Authenticator handles applying authentication to HTTP requests
pub struct Authenticator {
    /// Auth configuration
    config: AuthConfig,
    /// Cached token for password auth
    cached_token: Arc<RwLock<Option<CachedToken>>>,
    /// HTTP client for token requests
    http_client: Client,
}

impl Authenticator {
    /// Create a new authenticator with the given config
    pub fn new(config: AuthConfig) -> Self {
        Self {
            config,
            cached_token: Arc::new(RwLock::new(None)),
            http_client: Client::new(),
        }
    }

    /// Create an authenticator with a custom HTTP client
    pub fn with_client(config: AuthConfig, http_client: Client) -> Self {
        Self {
            config,
            cached_token: Arc::new(RwLock::new(None)),
            http_client,
        }
    }

    /// Apply authentication to a request builder
    pub async fn apply(&self, req: RequestBuilder) -> Result<RequestBuilder> {
        match &self.config {
            AuthConfig::None => Ok(req),

            AuthConfig::Token { token } => Ok(req.header(AUTH_TOKEN_HEADER, token.as_str())),

            AuthConfig::Bearer { token } => Ok(req.bearer_auth(token)),

            AuthConfig::Basic { username, password } => {
                Ok(req.basic_auth(username, Some(password)))
            }

            AuthConfig::Password { .. } => {
                let token = self.get_or_refresh_token().await?;
                Ok(req.header(AUTH_TOKEN_HEADER, token))
            }
        }
    }

    /// Get a valid token, refreshing if necessary
    async fn get_or_refresh_token(&self) -> Result<String> {
        {
            let cached = self.cached_token.read().await;
            if let Some(token) = cached.as_ref() {
                if !token.is_expired() {
                    return Ok(token.token.clone());
                }
            }
        }

        let mut cached = self.cached_token.write().await;

        // Another task may have refreshed while we waited for the write lock
        if let Some(token) = cached.as_ref() {
            if !token.is_expired() {
                return Ok(token.token.clone());
            }
        }

        let new_token = self.fetch_new_token().await?;
        let token_str = new_token.token.clone();
        *cached = Some(new_token);

        Ok(token_str)
    }

    /// Fetch a new token based on auth type
    async fn fetch_new_token(&self) -> Result<CachedToken> {
        match &self.config {
            AuthConfig::Password {
                identity_url,
                username,
                password,
                user_domain,
                project_name,
                project_domain,
            } => {
                let request = PasswordAuthRequest::new(
                    username,
                    password,
                    user_domain,
                    project_name,
                    project_domain,
                );
                self.fetch_password_token(identity_url, &request).await
            }
            _ => Err(Error::auth("Token refresh not supported for this auth type")),
        }
    }

    /// Exchange username and password for a project-scoped token
    async fn fetch_password_token(
        &self,
        identity_url: &str,
        request: &PasswordAuthRequest<'_>,
    ) -> Result<CachedToken> {
        let url = format!("{}/auth/tokens", identity_url.trim_end_matches('/'));
        debug!("Requesting token from {url}");

        let response = self
            .http_client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(Error::Http)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Auth {
                message: format!("Token request failed with status {status}: {body}"),
            });
        }

        let token = response
            .headers()
            .get(SUBJECT_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(String::from)
            .ok_or_else(|| Error::auth(format!("Response is missing {SUBJECT_TOKEN_HEADER}")))?;

        let body: TokenResponse = response.json().await.map_err(Error::Http)?;
        Ok(CachedToken::new(token, body.token.expires_at))
    }

    /// Clear the cached token (forces a new token on the next request)
    pub async fn clear_cache(&self) {
        let mut cached = self.cached_token.write().await;
        *cached = None;
    }

    /// Get the current auth config
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }
}

/// Identity v3 password authentication body
#[derive(Debug, Serialize)]
struct PasswordAuthRequest<'a> {
    auth: AuthBody<'a>,
}

#[derive(Debug, Serialize)]
struct AuthBody<'a> {
    identity: Identity<'a>,
    scope: Scope<'a>,
}

#[derive(Debug, Serialize)]
struct Identity<'a> {
    methods: [&'static str; 1],
    password: PasswordMethod<'a>,
}

#[derive(Debug, Serialize)]
struct PasswordMethod<'a> {
    user: User<'a>,
}

#[derive(Debug, Serialize)]
struct User<'a> {
    name: &'a str,
    domain: Named<'a>,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct Scope<'a> {
    project: Project<'a>,
}

#[derive(Debug, Serialize)]
struct Project<'a> {
    name: &'a str,
    domain: Named<'a>,
}

#[derive(Debug, Serialize)]
struct Named<'a> {
    name: &'a str,
}

impl<'a> PasswordAuthRequest<'a> {
    fn new(
        username: &'a str,
        password: &'a str,
        user_domain: &'a str,
        project_name: &'a str,
        project_domain: &'a str,
    ) -> Self {
        Self {
            auth: AuthBody {
                identity: Identity {
                    methods: ["password"],
                    password: PasswordMethod {
                        user: User {
                            name: username,
                            domain: Named { name: user_domain },
                            password,
                        },
                    },
                },
                scope: Scope {
                    project: Project {
                        name: project_name,
                        domain: Named {
                            name: project_domain,
                        },
                    },
                },
            },
        }
    }
}

/// Identity token response body
#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: TokenBody,
}

#[derive(Debug, Deserialize)]
struct TokenBody {
    #[serde(default)]
    expires_at: Option<DateTime<Utc>>,
}
