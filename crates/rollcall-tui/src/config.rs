//! Configuration — TOML file plus `ROLLCALL_*` environment overlay.
//!
//! Resolution order (later wins): built-in defaults, the config file,
//! the environment. The `--url` CLI flag overrides all of these in
//! `main`.

use std::path::PathBuf;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

/// Client configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Sign-up service base URL.
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_server_url() -> String {
    "http://localhost:8000".into()
}
fn default_timeout() -> u64 {
    30
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("", "", "rollcall").map_or_else(
        || {
            let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
            p.push(".config");
            p.push("rollcall");
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Load the full Config from file + environment.
pub fn load() -> Result<Config, ConfigError> {
    let config: Config = figment().merge(Toml::file(config_path())).extract()?;
    Ok(config)
}

/// Load config, falling back to defaults on any error.
pub fn load_or_default() -> Config {
    load().unwrap_or_default()
}

fn figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Env::prefixed("ROLLCALL_"))
}
