use anyhow::{Context, Result};
use std::str::FromStr;

use super::config_model::{BackendServer, Database, DotEnvyConfig, Membership};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_BODY_LIMIT_MB: u64 = 10;
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_TRIAL_PERIOD_MONTHS: u32 = 1;

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    load_from(|key| std::env::var(key).ok())
}

/// Builds the config from any key lookup. Blank values count as unset.
pub fn load_from<F>(lookup: F) -> Result<DotEnvyConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    let backend_server = BackendServer {
        port: parse_or(&get, "SERVER_PORT_BACKEND", DEFAULT_PORT)?,
        body_limit: parse_or(&get, "SERVER_BODY_LIMIT", DEFAULT_BODY_LIMIT_MB)?,
        timeout: parse_or(&get, "SERVER_TIMEOUT", DEFAULT_TIMEOUT_SECS)?,
    };

    let database = match get("DATABASE_URL") {
        Some(url) => Some(Database {
            url,
            max_connections: parse_or(&get, "DATABASE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?,
        }),
        None => None,
    };

    let membership = Membership {
        trial_period_months: parse_or(&get, "TRIAL_PERIOD_MONTHS", DEFAULT_TRIAL_PERIOD_MONTHS)?,
        voucher_seed_path: get("VOUCHER_SEED_PATH"),
    };

    Ok(DotEnvyConfig {
        backend_server,
        database,
        membership,
    })
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("{key} is invalid (value: {raw})")),
        None => Ok(default),
    }
}
