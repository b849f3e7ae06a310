use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

/// Argon2 cost parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct HashConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HashConfig {
    fn default() -> Self {
        Self {
            memory_kib: argon2::Params::DEFAULT_M_COST,
            iterations: argon2::Params::DEFAULT_T_COST,
            parallelism: argon2::Params::DEFAULT_P_COST,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub host: String,
    pub port: u16,
    pub jwt: JwtConfig,
    pub hashing: HashConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "stockroom".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "stockroom-users".into()),
            ttl_minutes: env_parse("JWT_TTL_MINUTES")?.unwrap_or(60),
        };
        let defaults = HashConfig::default();
        let hashing = HashConfig {
            memory_kib: env_parse("HASH_MEMORY_KIB")?.unwrap_or(defaults.memory_kib),
            iterations: env_parse("HASH_ITERATIONS")?.unwrap_or(defaults.iterations),
            parallelism: env_parse("HASH_PARALLELISM")?.unwrap_or(defaults.parallelism),
        };
        let port = match env_parse("APP_PORT")? {
            Some(p) => p,
            None => env_parse("PORT")?.unwrap_or(3000),
        };
        Ok(Self {
            database_url,
            max_connections: env_parse("DB_MAX_CONNECTIONS")?.unwrap_or(10),
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port,
            jwt,
            hashing,
        })
    }
}

/// Reads an optional variable; present but unparseable is an error.
fn env_parse<T>(key: &str) -> anyhow::Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| anyhow::anyhow!("{key}: {e}")),
        Err(_) => Ok(None),
    }
}
