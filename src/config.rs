//! Environment-driven configuration, loaded once at startup.

use anyhow::Context;

use crate::db::FilterMode;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    /// How the restaurant three-flag filter treats an absent flag.
    pub filter_mode: FilterMode,
    /// When set, an empty envelope becomes a 404 instead of a 200 with
    /// an empty collection.
    pub empty_as_not_found: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url =
            std::env::var("DATABASE_URL").with_context(|| "DATABASE_URL env not found")?;
        let bind_addr =
            std::env::var("BIND_ADDR").unwrap_or_else(|_| String::from("127.0.0.1:3000"));

        let filter_mode = match env_flag("STRICT_FLAG_FILTER")? {
            Some(false) => FilterMode::Lenient,
            _ => FilterMode::Strict,
        };
        let empty_as_not_found = env_flag("EMPTY_AS_NOT_FOUND")?.unwrap_or(false);

        Ok(Self {
            database_url,
            bind_addr,
            filter_mode,
            empty_as_not_found,
        })
    }
}

fn env_flag(key: &str) -> anyhow::Result<Option<bool>> {
    match std::env::var(key) {
        Err(_) => Ok(None),
        Ok(raw) => {
            let value = raw
                .parse::<bool>()
                .with_context(|| format!("{key} must be true or false, got {raw:?}"))?;
            Ok(Some(value))
        }
    }
}
