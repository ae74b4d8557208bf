use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::marketplace::{SessionUser, StaticTokenSessions};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub auth: AuthConfig,
    pub store: StoreConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let session_tokens = match env::var("APP_SESSION_TOKENS") {
            Ok(raw) => parse_session_tokens(&raw)?,
            Err(_) => Vec::new(),
        };

        let brand_seed = env::var("APP_BRAND_SEED")
            .ok()
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            auth: AuthConfig { session_tokens },
            store: StoreConfig { brand_seed },
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Bearer tokens accepted as signed-in sessions.
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    pub session_tokens: Vec<(String, SessionUser)>,
}

impl AuthConfig {
    pub fn sessions(&self) -> StaticTokenSessions {
        self.session_tokens.iter().cloned().collect()
    }
}

/// Document store bootstrap settings.
#[derive(Debug, Clone, Default)]
pub struct StoreConfig {
    /// JSON array of brands loaded at startup.
    pub brand_seed: Option<PathBuf>,
}

/// Parses `token:userId[:email]` entries separated by commas.
fn parse_session_tokens(raw: &str) -> Result<Vec<(String, SessionUser)>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let mut parts = entry.splitn(3, ':').map(str::trim);
            let token = parts.next().unwrap_or_default();
            let user_id = parts.next().unwrap_or_default();
            let email = parts.next().filter(|email| !email.is_empty());

            if token.is_empty() || user_id.is_empty() {
                return Err(ConfigError::InvalidSessionToken {
                    entry: entry.to_string(),
                });
            }

            Ok((
                token.to_string(),
                SessionUser {
                    id: user_id.to_string(),
                    email: email.map(str::to_string),
                },
            ))
        })
        .collect()
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidSessionToken { entry: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidSessionToken { entry } => write!(
                f,
                "APP_SESSION_TOKENS entry '{entry}' must look like token:userId[:email]"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidSessionToken { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("APP_HOST");
        env::remove_var("APP_PORT");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("APP_SESSION_TOKENS");
        env::remove_var("APP_BRAND_SEED");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert!(config.auth.session_tokens.is_empty());
        assert!(config.store.brand_seed.is_none());
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn parses_session_tokens_and_seed_path() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var(
            "APP_SESSION_TOKENS",
            "tok-a:user_a:a@example.com, tok-b:user_b",
        );
        env::set_var("APP_BRAND_SEED", "data/brands.json");

        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.auth.session_tokens.len(), 2);
        assert_eq!(config.auth.session_tokens[0].0, "tok-a");
        assert_eq!(
            config.auth.session_tokens[0].1.email.as_deref(),
            Some("a@example.com")
        );
        assert_eq!(config.auth.session_tokens[1].1.id, "user_b");
        assert_eq!(config.auth.sessions().len(), 2);
        assert_eq!(
            config.store.brand_seed,
            Some(PathBuf::from("data/brands.json"))
        );
        reset_env();
    }

    #[test]
    fn rejects_session_token_without_user() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_SESSION_TOKENS", "tok-a");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidSessionToken { .. })
        ));
        reset_env();
    }
}
