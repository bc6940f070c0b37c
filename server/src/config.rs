//! Server configuration parsed from environment variables.
//!
//! `main` loads `.env` through `dotenvy` first, so every value here may come
//! from the process environment or a local `.env` file.

use std::path::PathBuf;

use crate::services::guard::DEFAULT_PROTECTED_PREFIXES;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_SITE_DIR: &str = "./site";
pub const DEFAULT_BACKEND_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    /// Base URL of the REST backend, without trailing slash.
    pub backend_url: String,
    pub site_dir: PathBuf,
    pub cookie_secure: bool,
    /// Ordered protected prefixes. Each must follow the `/dashboard-<role>` form.
    pub protected_prefixes: Vec<String>,
    pub backend_timeout_secs: u64,
}

impl ServerConfig {
    /// Build config from the process environment.
    ///
    /// Required:
    /// - `BACKEND_URL`
    ///
    /// Optional:
    /// - `PORT`: default 3000
    /// - `SITE_DIR`: default `./site`
    /// - `COOKIE_SECURE`: `true`/`false` words, default false
    /// - `PROTECTED_PREFIXES`: comma separated, default the four dashboards
    /// - `BACKEND_TIMEOUT_SECS`: default 30
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a required variable is missing or a value
    /// cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup. Used by [`Self::from_env`]
    /// and by tests that must not touch the shared process environment.
    ///
    /// # Errors
    ///
    /// Same as [`Self::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend_url = lookup("BACKEND_URL")
            .map(|raw| raw.trim().trim_end_matches('/').to_owned())
            .filter(|url| !url.is_empty())
            .ok_or(ConfigError::Missing("BACKEND_URL"))?;

        let port = parse_or("PORT", lookup("PORT"), DEFAULT_PORT)?;
        let backend_timeout_secs =
            parse_or("BACKEND_TIMEOUT_SECS", lookup("BACKEND_TIMEOUT_SECS"), DEFAULT_BACKEND_TIMEOUT_SECS)?;

        let cookie_secure = match lookup("COOKIE_SECURE") {
            None => false,
            Some(raw) => {
                parse_bool(&raw).ok_or(ConfigError::Invalid { var: "COOKIE_SECURE", value: raw })?
            }
        };

        let site_dir = lookup("SITE_DIR").map_or_else(|| PathBuf::from(DEFAULT_SITE_DIR), PathBuf::from);

        let protected_prefixes = lookup("PROTECTED_PREFIXES")
            .map(|raw| split_list(&raw))
            .filter(|list| !list.is_empty())
            .unwrap_or_else(|| DEFAULT_PROTECTED_PREFIXES.iter().map(|p| (*p).to_owned()).collect());

        Ok(Self { port, backend_url, site_dir, cookie_secure, protected_prefixes, backend_timeout_secs })
    }
}

pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_or<T>(var: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
{
    match raw {
        None => Ok(default),
        Some(value) => value.trim().parse::<T>().map_err(|_| ConfigError::Invalid { var, value }),
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
