use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Environment variable names - single source of truth
pub mod env_vars {
    pub const PORT: &str = "PORT";
    pub const BIND_ADDRESS: &str = "BIND_ADDRESS";
    pub const DATABASE_URL: &str = "DATABASE_URL";
    pub const STATIC_DIR: &str = "STATIC_DIR";
    /// Sliding lifetime of a login session, in hours.
    pub const SESSION_TTL_HOURS: &str = "SESSION_TTL_HOURS";
    /// Set to "false" or "0" to skip seeding sample notes for the default account.
    /// The default account itself is always ensured.
    pub const SEED_SAMPLE_NOTES: &str = "SEED_SAMPLE_NOTES";
    pub const DB_POOL_SIZE: &str = "DB_POOL_SIZE";
}

/// Default values
pub mod defaults {
    pub const PORT: u16 = 8080;
    pub const BIND_ADDRESS: &str = "0.0.0.0";
    pub const DATABASE_URL: &str = "./.db/notes.db";
    /// Relative to the crate directory, see [`super::backend_dir`]
    pub const STATIC_DIR: &str = "static";
    pub const SESSION_TTL_HOURS: i64 = 24;
    /// Longest accepted session lifetime: one year
    pub const MAX_SESSION_TTL_HOURS: i64 = 24 * 366;
    pub const SEED_SAMPLE_NOTES: bool = true;
    pub const DB_POOL_SIZE: u32 = 8;
}

/// Absolute path of the notes-backend crate directory
pub fn backend_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

fn default_static_dir() -> String {
    backend_dir()
        .join(defaults::STATIC_DIR)
        .to_string_lossy()
        .to_string()
}

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub bind_address: String,
    pub database_url: String,
    pub static_dir: String,
    pub session_ttl_hours: i64,
    pub seed_sample_notes: bool,
    pub db_pool_size: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: defaults::PORT,
            bind_address: defaults::BIND_ADDRESS.to_string(),
            database_url: defaults::DATABASE_URL.to_string(),
            static_dir: default_static_dir(),
            session_ttl_hours: defaults::SESSION_TTL_HOURS,
            seed_sample_notes: defaults::SEED_SAMPLE_NOTES,
            db_pool_size: defaults::DB_POOL_SIZE,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup (the process environment in production).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let session_ttl_hours = parse_or_default(
            env_vars::SESSION_TTL_HOURS,
            lookup(env_vars::SESSION_TTL_HOURS),
            defaults::SESSION_TTL_HOURS,
        );
        let db_pool_size = parse_or_default(
            env_vars::DB_POOL_SIZE,
            lookup(env_vars::DB_POOL_SIZE),
            defaults::DB_POOL_SIZE,
        );

        Self {
            port: parse_or_default(env_vars::PORT, lookup(env_vars::PORT), defaults::PORT),
            bind_address: lookup(env_vars::BIND_ADDRESS)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| defaults::BIND_ADDRESS.to_string()),
            database_url: lookup(env_vars::DATABASE_URL)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| defaults::DATABASE_URL.to_string()),
            static_dir: lookup(env_vars::STATIC_DIR)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(default_static_dir),
            session_ttl_hours: if (1..=defaults::MAX_SESSION_TTL_HOURS)
                .contains(&session_ttl_hours)
            {
                session_ttl_hours
            } else {
                log::warn!(
                    "{} must be between 1 and {}, using default {}",
                    env_vars::SESSION_TTL_HOURS,
                    defaults::MAX_SESSION_TTL_HOURS,
                    defaults::SESSION_TTL_HOURS
                );
                defaults::SESSION_TTL_HOURS
            },
            seed_sample_notes: lookup(env_vars::SEED_SAMPLE_NOTES)
                .map(|v| parse_flag(&v))
                .unwrap_or(defaults::SEED_SAMPLE_NOTES),
            db_pool_size: db_pool_size.max(1),
        }
    }

    /// Session lifetime as a chrono duration
    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.session_ttl_hours)
    }
}

/// "false", "0", "no" and "off" disable a flag; anything else enables it.
fn parse_flag(value: &str) -> bool {
    !matches!(
        value.trim().to_lowercase().as_str(),
        "false" | "0" | "no" | "off"
    )
}

fn parse_or_default<T>(key: &str, raw: Option<String>, default: T) -> T
where
    T: FromStr + std::fmt::Display,
{
    match raw {
        Some(value) => match value.trim().parse() {
            Ok(parsed) => parsed,
            Err(_) => {
                log::warn!("Invalid value {:?} for {}, using default {}", value, key, default);
                default
            }
        },
        None => default,
    }
}
