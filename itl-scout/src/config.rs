//! Configuration resolution for itl-scout
//!
//! Each value is resolved with CLI → ENV → TOML → default priority.

use crate::client::{ClientConfig, DEFAULT_MAX_GAMES, DEFAULT_REQUEST_TIMEOUT};
use crate::enricher::DEFAULT_MAX_CONCURRENCY;
use itl_common::config::TomlConfig;
use itl_common::{Error, Result};
use std::num::NonZeroU32;
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

pub const ENV_CHAMPIONS_HASH: &str = "SHA_C";
pub const ENV_MATCHUPS_HASH: &str = "SHA_M";
pub const ENV_MAX_GAMES: &str = "ITL_MAX_GAMES";
pub const ENV_MAX_CONCURRENCY: &str = "ITL_MAX_CONCURRENCY";

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub champions_hash: Option<String>,
    pub matchups_hash: Option<String>,
    pub max_games: Option<u32>,
    pub max_concurrency: Option<usize>,
}

/// Fully resolved scout settings
#[derive(Debug, Clone)]
pub struct ScoutConfig {
    pub client: ClientConfig,
    pub max_concurrency: usize,
    pub task_timeout: Option<Duration>,
}

impl ScoutConfig {
    pub fn resolve(overrides: &Overrides, toml_config: &TomlConfig) -> Result<Self> {
        let section = &toml_config.scout;

        let champions_hash = resolve_hash(
            overrides.champions_hash.clone(),
            ENV_CHAMPIONS_HASH,
            section.champions_hash.clone(),
            "champions_hash",
        )?;
        let matchups_hash = resolve_hash(
            overrides.matchups_hash.clone(),
            ENV_MATCHUPS_HASH,
            section.matchups_hash.clone(),
            "matchups_hash",
        )?;

        let max_games = resolve_value(overrides.max_games, ENV_MAX_GAMES, section.max_games)?
            .unwrap_or(DEFAULT_MAX_GAMES);
        let max_concurrency =
            resolve_value(overrides.max_concurrency, ENV_MAX_CONCURRENCY, section.max_concurrency)?
                .unwrap_or(DEFAULT_MAX_CONCURRENCY);
        if max_concurrency == 0 {
            return Err(Error::Config("max_concurrency must be at least 1".to_string()));
        }

        let request_timeout = section
            .request_timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT);

        Ok(Self {
            client: ClientConfig {
                champions_hash,
                matchups_hash,
                max_games,
                request_timeout,
                requests_per_second: section.requests_per_second.and_then(NonZeroU32::new),
            },
            max_concurrency,
            task_timeout: section.task_timeout_secs.map(Duration::from_secs),
        })
    }
}

/// Persisted-query hashes are hex SHA-256 digests
pub fn is_valid_hash(hash: &str) -> bool {
    hash.len() == 64 && hash.chars().all(|c| c.is_ascii_hexdigit())
}

fn resolve_hash(
    cli: Option<String>,
    env_name: &str,
    toml_value: Option<String>,
    key: &str,
) -> Result<String> {
    let env_value = std::env::var(env_name).ok();

    let candidates = [
        ("command line", cli),
        ("environment", env_value),
        ("TOML", toml_value),
    ];

    for (source, value) in candidates {
        let Some(value) = value else { continue };
        let value = value.trim().to_string();
        if is_valid_hash(&value) {
            info!("{} loaded from {}", key, source);
            return Ok(value);
        }
        warn!("Ignoring invalid {} from {} (expected 64 hex digits)", key, source);
    }

    Err(Error::Config(format!(
        "{key} not configured. Please configure using one of:\n\
         1. Command line: --{flag} <hash>\n\
         2. Environment: {env_name}=<hash>\n\
         3. TOML config: [scout] {key} = \"<hash>\"",
        key = key,
        flag = key.replace('_', "-"),
        env_name = env_name,
    )))
}

fn resolve_value<T>(cli: Option<T>, env_name: &str, toml_value: Option<T>) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    if cli.is_some() {
        return Ok(cli);
    }

    if let Ok(raw) = std::env::var(env_name) {
        return raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| Error::Config(format!("Invalid {}='{}': {}", env_name, raw, e)));
    }

    Ok(toml_value)
}
