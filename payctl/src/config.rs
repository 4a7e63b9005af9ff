//! Application configuration management.
//!
//! Configuration is loaded from a YAML file with environment variable overrides. The configuration
//! file path defaults to `config.yaml` but can be specified via `-f` flag or `PAYCTL_CONFIG`
//! environment variable.
//!
//! ## Loading Priority
//!
//! Configuration sources are merged in the following order (later sources override earlier ones):
//!
//! 1. **YAML config file** - Base configuration (default: `config.yaml`)
//! 2. **Environment variables** - Variables prefixed with `PAYCTL_` override YAML values
//! 3. **BACKEND_URL** - Special case: overrides `backend.base_url` if set
//!
//! For nested config values, use double underscores in environment variables. For example,
//! `PAYCTL_SESSION__COOKIE_NAME=sid` sets the `session.cookie_name` field.
//!
//! ## Usage
//!
//! ```no_run
//! use clap::Parser;
//! use payctl::config::{Args, Config};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Parse CLI arguments
//! let args = Args::parse();
//!
//! // Load configuration from file and environment
//! let config = Config::load(&args)?;
//!
//! println!("Server will bind to {}:{}", config.host, config.port);
//! # Ok(())
//! # }
//! ```
//!
//! ## Environment Variable Examples
//!
//! ```bash
//! # Override server port
//! PAYCTL_PORT=8080
//!
//! # Point at the payment backend (preferred method)
//! BACKEND_URL="http://payments.internal:8000"
//!
//! # Relay backend error statuses instead of collapsing them to 500
//! PAYCTL_PROXY__PASSTHROUGH_STATUS=true
//! ```

use clap::Parser;
use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, time::Duration};
use url::Url;

use crate::errors::Error;

/// Simple CLI args - just for specifying config file
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file
    #[arg(short = 'f', long, env = "PAYCTL_CONFIG", default_value = "config.yaml")]
    pub config: String,

    /// Validate configuration and exit without starting the server.
    /// Useful for CI/CD pipelines to catch config errors before deployment.
    #[arg(long)]
    pub validate: bool,
}

/// Main application configuration.
///
/// This is the root configuration structure loaded from YAML and environment variables.
/// All fields have sensible defaults defined in the `Default` implementation.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// HTTP server host to bind to (e.g., "0.0.0.0" for all interfaces)
    pub host: String,
    /// HTTP server port to bind to
    pub port: u16,
    /// Payment backend the gateway proxies to
    pub backend: BackendConfig,
    /// Session cookie settings
    pub session: SessionConfig,
    /// Page route guard settings
    pub guard: GuardConfig,
    /// Proxy error handling behaviour
    pub proxy: ProxyConfig,
    /// Query cache sizing
    pub cache: CacheConfig,
    /// CORS settings for the browser-facing API
    pub cors: CorsConfig,
}

/// Location of the external payment backend and the handful of
/// non-RESTful paths the gateway needs to know about.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct BackendConfig {
    /// Base URL of the backend REST API
    pub base_url: Url,
    /// Path the gateway POSTs credentials to on login
    pub login_path: String,
    /// Path the gateway POSTs to on logout (token revocation)
    pub logout_path: String,
    /// Path that resolves the session token to the current user
    pub me_path: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse("http://localhost:8000").expect("default backend URL is valid"),
            login_path: "/api/accounts/auth/login/".to_string(),
            logout_path: "/api/accounts/auth/logout/".to_string(),
            me_path: "/api/accounts/users/me/".to_string(),
        }
    }
}

/// Session cookie configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Name of the cookie carrying the backend session token
    pub cookie_name: String,
    /// Set the Secure attribute on the session cookie
    pub cookie_secure: bool,
    /// SameSite attribute for the session cookie
    pub cookie_same_site: String,
    /// Cookie lifetime (Max-Age)
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: "token".to_string(),
            cookie_secure: true,
            cookie_same_site: "Lax".to_string(),
            timeout: Duration::from_secs(24 * 60 * 60),
        }
    }
}

/// Route guard configuration for protected dashboard pages.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct GuardConfig {
    /// Where unauthenticated users are redirected
    pub login_path: String,
    /// Where authenticated-but-unauthorized users are redirected
    pub unauthorized_path: String,
    /// Permission codenames required per page path prefix, e.g.
    /// `{"/users": ["view_users"]}`. Pages not listed only require a
    /// valid session.
    pub required_permissions: HashMap<String, Vec<String>>,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            login_path: "/login".to_string(),
            unauthorized_path: "/unauthorized".to_string(),
            required_permissions: HashMap::new(),
        }
    }
}

/// Proxy error handling configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProxyConfig {
    /// When false (the default), every backend failure is collapsed into a
    /// `{"error": ...}` envelope with HTTP 500, discarding the backend's
    /// status code and body. When true, the backend status and body are
    /// relayed to the caller instead.
    pub passthrough_status: bool,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self { passthrough_status: false }
    }
}

/// Query cache sizing.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
    /// Maximum number of cached responses
    pub max_entries: u64,
    /// Time-to-live for cached responses. Invalidation works by bumping a
    /// per-resource generation; the TTL bounds how long orphaned
    /// generations linger.
    #[serde(with = "humantime_serde")]
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 1024,
            ttl: Duration::from_secs(30),
        }
    }
}

/// CORS configuration for the browser-facing API.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct CorsConfig {
    /// Allowed origins; "*" for any
    pub allowed_origins: Vec<CorsOrigin>,
    /// Allow credentialed (cookie-bearing) cross-origin requests
    pub allow_credentials: bool,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![CorsOrigin::Wildcard],
            allow_credentials: false,
        }
    }
}

/// CORS origin specification.
///
/// Can be either a wildcard (`*`) to allow all origins, or a specific URL.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum CorsOrigin {
    /// Allow all origins (`*`)
    #[serde(deserialize_with = "parse_wildcard")]
    Wildcard,
    /// Specific origin URL (e.g., `https://app.example.com`)
    #[serde(deserialize_with = "parse_url")]
    Url(Url),
}

fn parse_wildcard<'de, D>(deserializer: D) -> Result<(), D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: String = Deserialize::deserialize(deserializer)?;
    if s == "*" {
        Ok(())
    } else {
        Err(serde::de::Error::custom("Expected '*'"))
    }
}

fn parse_url<'de, D>(deserializer: D) -> Result<Url, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: String = Deserialize::deserialize(deserializer)?;
    Url::parse(&s).map_err(serde::de::Error::custom)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            backend: BackendConfig::default(),
            session: SessionConfig::default(),
            guard: GuardConfig::default(),
            proxy: ProxyConfig::default(),
            cache: CacheConfig::default(),
            cors: CorsConfig::default(),
        }
    }
}

impl Config {
    #[allow(clippy::result_large_err)]
    pub fn load(args: &Args) -> Result<Self, figment::Error> {
        let config: Self = Self::figment(args).extract()?;
        config.validate().map_err(|e| figment::Error::from(e.to_string()))?;
        Ok(config)
    }

    /// Validate the configuration for consistency and required fields
    pub fn validate(&self) -> Result<(), Error> {
        match self.backend.base_url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(Error::Internal {
                    operation: format!("Config validation: backend.base_url must be http or https, got '{other}'"),
                });
            }
        }

        if self.session.cookie_name.is_empty() {
            return Err(Error::Internal {
                operation: "Config validation: session.cookie_name cannot be empty".to_string(),
            });
        }

        match self.session.cookie_same_site.as_str() {
            "Strict" | "Lax" | "None" => {}
            other => {
                return Err(Error::Internal {
                    operation: format!("Config validation: session.cookie_same_site must be Strict, Lax or None, got '{other}'"),
                });
            }
        }

        for path in [&self.guard.login_path, &self.guard.unauthorized_path] {
            if !path.starts_with('/') {
                return Err(Error::Internal {
                    operation: format!("Config validation: guard paths must start with '/', got '{path}'"),
                });
            }
        }

        for prefix in self.guard.required_permissions.keys() {
            if !prefix.starts_with('/') {
                return Err(Error::Internal {
                    operation: format!("Config validation: guard.required_permissions keys must start with '/', got '{prefix}'"),
                });
            }
        }

        if self.cache.max_entries == 0 {
            return Err(Error::Internal {
                operation: "Config validation: cache.max_entries cannot be 0".to_string(),
            });
        }

        if self.cors.allowed_origins.is_empty() {
            return Err(Error::Internal {
                operation: "Config validation: CORS allowed_origins cannot be empty. Add at least one allowed origin.".to_string(),
            });
        }

        // Validate that wildcard is not used with credentials
        let has_wildcard = self.cors.allowed_origins.iter().any(|origin| matches!(origin, CorsOrigin::Wildcard));
        if has_wildcard && self.cors.allow_credentials {
            return Err(Error::Internal {
                operation: "Config validation: CORS cannot use wildcard origin '*' with allow_credentials=true. Specify explicit origins."
                    .to_string(),
            });
        }

        Ok(())
    }

    pub fn figment(args: &Args) -> Figment {
        Figment::new()
            // Load base config file
            .merge(Yaml::file(&args.config))
            // Environment variables can still override specific values
            .merge(Env::prefixed("PAYCTL_").split("__"))
            // Common BACKEND_URL pattern for container deployments
            .merge(Env::raw().only(&["BACKEND_URL"]).map(|_| "backend.base_url".into()))
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
