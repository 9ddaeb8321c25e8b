use std::net::IpAddr;

#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres connection string. Without it the service runs on the
    /// in-memory store and loses all data on exit.
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub jwt_secret: String,
    pub jwt_ttl_minutes: i64,
    pub host: IpAddr,
    pub port: u16,
    pub max_body_size: usize,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());
        let jwt_secret = env_required("JWT_SECRET")?;
        if jwt_secret.len() < 32 {
            return Err("JWT_SECRET must be at least 32 characters".to_string());
        }

        let db_max_connections: u32 = env_or("EDIFICE_DB_MAX_CONNECTIONS", "10")
            .parse()
            .map_err(|e| format!("Invalid EDIFICE_DB_MAX_CONNECTIONS: {e}"))?;

        let jwt_ttl_minutes: i64 = env_or("EDIFICE_JWT_TTL_MINUTES", "1440")
            .parse()
            .map_err(|e| format!("Invalid EDIFICE_JWT_TTL_MINUTES: {e}"))?;
        if jwt_ttl_minutes <= 0 {
            return Err("EDIFICE_JWT_TTL_MINUTES must be positive".to_string());
        }

        let host: IpAddr = env_or("EDIFICE_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid EDIFICE_HOST: {e}"))?;

        let port: u16 = env_or("EDIFICE_PORT", "8080")
            .parse()
            .map_err(|e| format!("Invalid EDIFICE_PORT: {e}"))?;

        let max_body_size: usize = env_or("EDIFICE_MAX_BODY_SIZE", "1048576")
            .parse()
            .map_err(|e| format!("Invalid EDIFICE_MAX_BODY_SIZE: {e}"))?;

        let log_level = env_or("EDIFICE_LOG_LEVEL", "info");

        Ok(Config {
            database_url,
            db_max_connections,
            jwt_secret,
            jwt_ttl_minutes,
            host,
            port,
            max_body_size,
            log_level,
        })
    }
}

fn env_required(key: &str) -> Result<String, String> {
    std::env::var(key).map_err(|_| format!("Missing required environment variable: {key}"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
