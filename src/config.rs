use anyhow::{Context, Result};
use std::env;
use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub server: ServerConfig,

    pub database: DatabaseConfig,

    pub admin: AdminConfig,

    pub smtp: SmtpConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,

    pub log_level: String,

    /// Number of tokio worker threads (default: 0)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            log_level: "info".to_string(),
            worker_threads: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,

    /// Maximum database connections (default: 5)
    pub max_connections: u32,

    /// Minimum database connections (default: 1)
    pub min_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:data/shala.db".to_string(),
            max_connections: 5,
            min_connections: 1,
        }
    }
}

/// Credentials used to seed the admin account on first boot.
///
/// When `default_password` is unset the bootstrap step falls back to a
/// well-known development password and logs a warning.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    pub default_username: String,

    pub default_password: Option<String>,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            default_username: "admin".to_string(),
            default_password: None,
        }
    }
}

/// Outbound mail settings. Leaving host/username/password unset disables
/// all sends (they become trivial no-op successes).
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: Option<String>,

    pub port: u16,

    pub username: Option<String>,

    pub password: Option<String>,

    /// Sender address; falls back to `username` when unset.
    pub from: Option<String>,

    /// Address that receives the per-signup admin notice.
    pub notification_email: Option<String>,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: None,
            port: 587,
            username: None,
            password: None,
            from: None,
            notification_email: None,
        }
    }
}

impl SmtpConfig {
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.host.is_some() && self.username.is_some() && self.password.is_some()
    }
}

impl Config {
    /// Load configuration from the environment, reading a `.env` file first
    /// when one is present.
    pub fn load() -> Result<Self> {
        match dotenvy::dotenv() {
            Ok(path) => info!("Loaded environment from {}", path.display()),
            Err(_) => info!("No .env file found, using process environment"),
        }

        let defaults = Self::default();

        let port = match env::var("PORT") {
            Ok(raw) => raw.parse().context("Invalid PORT value")?,
            Err(_) => defaults.server.port,
        };

        let smtp_port = match env::var("SMTP_PORT") {
            Ok(raw) => raw.parse().unwrap_or(defaults.smtp.port),
            Err(_) => defaults.smtp.port,
        };

        Ok(Self {
            server: ServerConfig {
                port,
                log_level: env_or("LOG_LEVEL", &defaults.server.log_level),
                worker_threads: match env::var("WORKER_THREADS") {
                    Ok(raw) => raw.parse().context("Invalid WORKER_THREADS value")?,
                    Err(_) => defaults.server.worker_threads,
                },
            },
            database: DatabaseConfig {
                url: env_or("DATABASE_URL", &defaults.database.url),
                max_connections: defaults.database.max_connections,
                min_connections: defaults.database.min_connections,
            },
            admin: AdminConfig {
                default_username: env_or("DEFAULT_ADMIN_USERNAME", &defaults.admin.default_username),
                default_password: env_opt("DEFAULT_ADMIN_PASSWORD"),
            },
            smtp: SmtpConfig {
                host: env_opt("SMTP_HOST"),
                port: smtp_port,
                username: env_opt("SMTP_USERNAME"),
                password: env_opt("SMTP_PASSWORD"),
                from: env_opt("SMTP_FROM"),
                notification_email: env_opt("NOTIFICATION_EMAIL"),
            },
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    env_opt(key).unwrap_or_else(|| default.to_string())
}

/// Empty values count as unset, matching how operators comment out
/// entries in a `.env` file by blanking them.
fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}
