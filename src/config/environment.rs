use std::env;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl Environment {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "test" => Self::Test,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

const DEV_JWT_SECRET: &str = "geosme-development-secret-change-me";

/// Environment configuration
/// Loads and validates environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub environment: Environment,
    pub host: String,
    pub port: u16,
    /// Honour `X-Forwarded-For`/`X-Real-IP`; set only behind a reverse proxy.
    pub trust_proxy: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = env::var("APP_ENV")
            .or_else(|_| env::var("NODE_ENV"))
            .map(|v| Environment::parse(&v))
            .unwrap_or(Environment::Development);

        let database_url = match env::var("DATABASE_URL") {
            Ok(url) if !url.trim().is_empty() => url,
            _ => database_url_from_parts()?,
        };

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            _ if environment.is_production() => return Err(ConfigError::Missing("JWT_SECRET")),
            _ => {
                tracing::warn!("JWT_SECRET not set, using development secret");
                DEV_JWT_SECRET.to_string()
            }
        };

        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port = match env::var("PORT") {
            Ok(raw) => raw.parse::<u16>().map_err(|e| ConfigError::Invalid {
                name: "PORT",
                reason: e.to_string(),
            })?,
            Err(_) => 3000,
        };

        let trust_proxy = env::var("TRUST_PROXY").map(|v| parse_flag(&v)).unwrap_or(false);

        Ok(Self {
            database_url,
            jwt_secret,
            environment,
            host,
            port,
            trust_proxy,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

/// Builds a connection string from `DB_HOST`, `DB_PORT`, `DB_NAME`,
/// `DB_USER` and `DB_PASSWORD` when `DATABASE_URL` is absent.
fn database_url_from_parts() -> Result<String, ConfigError> {
    let host = env::var("DB_HOST").map_err(|_| ConfigError::Missing("DATABASE_URL or DB_HOST"))?;
    let port = env::var("DB_PORT").unwrap_or_else(|_| "5432".to_string());
    let name = env::var("DB_NAME").map_err(|_| ConfigError::Missing("DB_NAME"))?;
    let user = env::var("DB_USER").map_err(|_| ConfigError::Missing("DB_USER"))?;
    let password = env::var("DB_PASSWORD").unwrap_or_default();

    port.parse::<u16>().map_err(|e| ConfigError::Invalid {
        name: "DB_PORT",
        reason: e.to_string(),
    })?;

    Ok(build_database_url(&host, &port, &name, &user, &password))
}

pub fn build_database_url(host: &str, port: &str, name: &str, user: &str, password: &str) -> String {
    if password.is_empty() {
        format!("postgres://{}@{}:{}/{}", user, host, port, name)
    } else {
        format!("postgres://{}:{}@{}:{}/{}", user, password, host, port, name)
    }
}
