use std::path::PathBuf;

use anyhow::{Context, Result};
use messagely_crypto::WorkFactor;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub work_factor: WorkFactor,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Unset keys take their defaults; set but
    /// unparsable numbers are an error.
    pub fn from_vars<F>(var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = WorkFactor::default();

        Ok(Self {
            host: var("MESSAGELY_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: parse_or(&var, "MESSAGELY_PORT", 3000)?,
            db_path: var("MESSAGELY_DB_PATH")
                .unwrap_or_else(|| "messagely.db".into())
                .into(),
            work_factor: WorkFactor {
                memory_kib: parse_or(&var, "MESSAGELY_HASH_MEMORY_KIB", defaults.memory_kib)?,
                iterations: parse_or(&var, "MESSAGELY_HASH_ITERATIONS", defaults.iterations)?,
                parallelism: parse_or(&var, "MESSAGELY_HASH_PARALLELISM", defaults.parallelism)?,
            },
        })
    }
}

fn parse_or<F, T>(var: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match var(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} must be a number, got '{}'", key, raw)),
        None => Ok(default),
    }
}
