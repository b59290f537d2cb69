//! Cloud configuration
//!
//! Connection settings come from a `clouds.yaml`-style file holding named
//! clouds, or from the conventional `OS_*` environment variables:
//!
//! ```yaml
//! clouds:
//!   prod:
//!     region_name: RegionOne
//!     auth:
//!       auth_url: https://identity.example.com/v3
//!       username: demo
//!       password: secret
//!       project_name: demo
//!     endpoints:
//!       network: https://network.example.com:9696/v2.0
//!       database: https://db.example.com/v1.0/1234
//!     http:
//!       timeout_seconds: 60
//!       requests_per_second: 5
//! ```

use crate::auth::AuthConfig;
use crate::client::ServiceClient;
use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpClientConfig, RateLimiterConfig};
use crate::types::OptionStringExt;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Domain used when none is configured
pub const DEFAULT_DOMAIN: &str = "Default";

// ============================================================================
// clouds.yaml
// ============================================================================

/// Parsed `clouds.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CloudsFile {
    /// Clouds by name
    #[serde(default)]
    pub clouds: BTreeMap<String, CloudConfig>,
}

impl CloudsFile {
    /// Load and parse a clouds file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                Error::Io(e)
            }
        })?;
        debug!(path = %path.display(), "Loaded clouds file");
        Self::parse(&content)
    }

    /// Parse clouds from YAML text
    pub fn parse(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Look up a cloud by name
    pub fn cloud(&self, name: &str) -> Result<&CloudConfig> {
        self.clouds.get(name).ok_or_else(|| {
            let known: Vec<&str> = self.clouds.keys().map(String::as_str).collect();
            Error::config(format!(
                "cloud '{name}' not found (available: {})",
                if known.is_empty() {
                    "none".to_string()
                } else {
                    known.join(", ")
                }
            ))
        })
    }
}

// ============================================================================
// Cloud
// ============================================================================

/// Everything needed to talk to one cloud
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CloudConfig {
    #[serde(default)]
    pub auth: CloudAuth,

    #[serde(default)]
    pub region_name: Option<String>,

    /// Service endpoints
    #[serde(default)]
    pub endpoints: Endpoints,

    #[serde(default)]
    pub http: HttpSettings,
}

/// Credentials for a cloud
///
/// A token takes precedence over username/password.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CloudAuth {
    #[serde(default)]
    pub auth_url: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default)]
    pub user_domain_name: Option<String>,
    #[serde(default)]
    pub project_domain_name: Option<String>,
}

/// Base URLs of the services used
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Endpoints {
    /// Network service, e.g. `https://network.example.com:9696/v2.0`
    #[serde(default)]
    pub network: Option<String>,

    /// Database service including the tenant, e.g. `https://db.example.com/v1.0/1234`
    #[serde(default)]
    pub database: Option<String>,
}

/// HTTP client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpSettings {
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Retries for idempotent requests
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Client-side rate limit; `0` disables it
    #[serde(default)]
    pub requests_per_second: Option<u32>,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            max_retries: default_max_retries(),
            requests_per_second: None,
        }
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

impl CloudAuth {
    /// Resolve the credentials into an [`AuthConfig`]
    ///
    /// Password auth needs `auth_url`, `username`, `password` and
    /// `project_name`; domains default to `Default`.
    pub fn to_auth_config(&self) -> Result<AuthConfig> {
        if let Some(token) = self.token.clone().none_if_empty() {
            return Ok(AuthConfig::token(token));
        }

        let Some(username) = self.username.clone().none_if_empty() else {
            return Ok(AuthConfig::None);
        };

        let require = |value: &Option<String>, field: &str| {
            value
                .clone()
                .none_if_empty()
                .ok_or_else(|| Error::missing_field(format!("auth.{field}")))
        };

        Ok(AuthConfig::Password {
            identity_url: require(&self.auth_url, "auth_url")?,
            username,
            password: require(&self.password, "password")?,
            user_domain: self
                .user_domain_name
                .clone()
                .none_if_empty()
                .unwrap_or_else(|| DEFAULT_DOMAIN.to_string()),
            project_name: require(&self.project_name, "project_name")?,
            project_domain: self
                .project_domain_name
                .clone()
                .none_if_empty()
                .unwrap_or_else(|| DEFAULT_DOMAIN.to_string()),
        })
    }
}

impl CloudConfig {
    /// Read `OS_*` variables from the process environment
    pub fn from_env() -> Self {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Read `OS_*` variables through `lookup`; empty values count as unset
    pub fn from_env_with<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).none_if_empty();

        Self {
            auth: CloudAuth {
                auth_url: var("OS_AUTH_URL"),
                token: var("OS_TOKEN"),
                username: var("OS_USERNAME"),
                password: var("OS_PASSWORD"),
                project_name: var("OS_PROJECT_NAME"),
                user_domain_name: var("OS_USER_DOMAIN_NAME"),
                project_domain_name: var("OS_PROJECT_DOMAIN_NAME"),
            },
            region_name: var("OS_REGION_NAME"),
            endpoints: Endpoints {
                network: var("OS_NETWORK_ENDPOINT"),
                database: var("OS_DATABASE_ENDPOINT"),
            },
            http: HttpSettings::default(),
        }
    }

    /// HTTP client configuration for this cloud
    pub fn http_client_config(&self) -> HttpClientConfig {
        let builder = HttpClientConfig::builder()
            .timeout(Duration::from_secs(self.http.timeout_seconds))
            .max_retries(self.http.max_retries);

        match self.http.requests_per_second {
            Some(0) => builder.no_rate_limit().build(),
            Some(rps) => builder.rate_limit(RateLimiterConfig::per_second(rps)).build(),
            None => builder.build(),
        }
    }

    /// Build the authenticated HTTP client shared by all services
    pub fn http_client(&self) -> Result<HttpClient> {
        HttpClient::with_auth(self.http_client_config(), self.auth.to_auth_config()?)
    }

    /// Client for the network service
    pub fn network_client(&self) -> Result<ServiceClient> {
        self.service_client(Arc::new(self.http_client()?), Service::Network)
    }

    /// Client for the database service
    pub fn database_client(&self) -> Result<ServiceClient> {
        self.service_client(Arc::new(self.http_client()?), Service::Database)
    }

    /// Bind an existing HTTP client to one of this cloud's services
    pub fn service_client(&self, http: Arc<HttpClient>, service: Service) -> Result<ServiceClient> {
        let (endpoint, field) = match service {
            Service::Network => (&self.endpoints.network, "endpoints.network"),
            Service::Database => (&self.endpoints.database, "endpoints.database"),
        };
        let endpoint = endpoint
            .as_deref()
            .filter(|e| !e.is_empty())
            .ok_or_else(|| Error::missing_field(field))?;

        debug!(service = ?service, endpoint, region = ?self.region_name, "Binding service client");
        ServiceClient::new(http, endpoint)
    }
}

/// Services with a configurable endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    Network,
    Database,
}
