use crate::error::AppError;
use config::{Config as Cfg, File};
use serde::Deserialize;
use std::env;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    8080
}

impl Config {
    pub fn load() -> Result<Self, AppError> {
        load_env();

        let config = Cfg::builder()
            .add_source(File::with_name("configuration").required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

/// Load `.env` into the process environment.
///
/// Call before anything reads `ENVIRONMENT` or other settings. Variables
/// already set in the process win over the file.
pub fn load_env() {
    dotenvy::dotenv().ok();
}

/// Load a specific env file, returning whether it was read.
pub fn load_env_from(path: &Path) -> bool {
    dotenvy::from_path(path).is_ok()
}

/// Deployment environment name, `development` when `ENVIRONMENT` is unset.
pub fn environment() -> String {
    env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string())
}

pub fn is_production() -> bool {
    matches!(environment().as_str(), "prod" | "production")
}

/// Read an environment variable.
///
/// In production every variable must be set explicitly; elsewhere `default`
/// is used when present.
pub fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}

/// Read the first of `keys` that is set, so a setting can keep a legacy name.
pub fn get_env_any(keys: &[&str], default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    if let Some(val) = keys.iter().find_map(|key| env::var(key).ok()) {
        return Ok(val);
    }
    let names = keys.join(" or ");
    get_env(&names, default, is_prod)
}

/// Like [`get_env`], parsing the value.
///
/// A value that does not parse is an error in production; elsewhere it falls
/// back to `default`.
pub fn get_env_parsed<T>(key: &str, default: T, is_prod: bool) -> Result<T, AppError>
where
    T: std::str::FromStr + ToString,
{
    let raw = get_env(key, Some(&default.to_string()), is_prod)?;
    match raw.trim().parse() {
        Ok(value) => Ok(value),
        Err(_) if is_prod => Err(AppError::ConfigError(anyhow::anyhow!(
            "{} has an invalid value: {:?}",
            key,
            raw
        ))),
        Err(_) => {
            tracing::warn!(key, value = %raw, "Invalid value, using default");
            Ok(default)
        }
    }
}
