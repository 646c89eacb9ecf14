use std::net::IpAddr;

/// One year.
pub const MAX_JWT_EXPIRATION_MINUTES: i64 = 525_600;

#[derive(Debug, Clone)]
pub struct Config {
    pub storage: StorageBackend,
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub jwt_expiration_minutes: i64,
    pub host: IpAddr,
    pub port: u16,
    pub max_body_size: usize,
    pub log_level: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key/value source. `from_env` is this over
    /// the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let storage = match env_or("TODO_STORAGE", "postgres").to_lowercase().as_str() {
            "postgres" => StorageBackend::Postgres,
            "memory" => StorageBackend::Memory,
            other => {
                return Err(format!(
                    "Invalid TODO_STORAGE: {other} (expected postgres or memory)"
                ));
            }
        };

        let database_url = lookup("DATABASE_URL");
        if storage == StorageBackend::Postgres && database_url.is_none() {
            return Err("Missing required environment variable: DATABASE_URL".to_string());
        }

        let jwt_secret = lookup("JWT_SECRET")
            .ok_or_else(|| "Missing required environment variable: JWT_SECRET".to_string())?;

        let jwt_expiration_minutes: i64 = env_or("TODO_JWT_EXPIRATION_MINUTES", "60")
            .parse()
            .map_err(|e| format!("Invalid TODO_JWT_EXPIRATION_MINUTES: {e}"))?;
        if !(1..=MAX_JWT_EXPIRATION_MINUTES).contains(&jwt_expiration_minutes) {
            return Err(format!(
                "Invalid TODO_JWT_EXPIRATION_MINUTES: must be in 1..={MAX_JWT_EXPIRATION_MINUTES}"
            ));
        }

        let host: IpAddr = env_or("TODO_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid TODO_HOST: {e}"))?;

        let port: u16 = env_or("TODO_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid TODO_PORT: {e}"))?;

        let max_body_size: usize = env_or("TODO_MAX_BODY_SIZE", "1048576")
            .parse()
            .map_err(|e| format!("Invalid TODO_MAX_BODY_SIZE: {e}"))?;

        let log_level = env_or("TODO_LOG_LEVEL", "info");

        Ok(Config {
            storage,
            database_url,
            jwt_secret,
            jwt_expiration_minutes,
            host,
            port,
            max_body_size,
            log_level,
        })
    }

    /// Token lifetime, clamped to the range `from_lookup` accepts.
    pub fn jwt_ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.jwt_expiration_minutes.clamp(1, MAX_JWT_EXPIRATION_MINUTES))
    }
}
