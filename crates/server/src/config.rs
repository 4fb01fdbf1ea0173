use std::path::Path;

use anyhow::Context;
use client_core::{parse_service_url, DEFAULT_CALCULATION_SERVICE_URL};
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "carbon.toml";
const ENV_PREFIX: &str = "APP";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub server_bind: String,
    pub calculation_service_url: String,
    /// JSON file shaped like `GET /api/actions`; the built-in catalog is used
    /// when unset.
    #[serde(default)]
    pub catalog_path: Option<String>,
    pub max_request_bytes: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:3000".into(),
            calculation_service_url: DEFAULT_CALCULATION_SERVICE_URL.into(),
            catalog_path: None,
            max_request_bytes: 64 * 1024,
        }
    }
}

/// Defaults, then `carbon.toml`, then `APP__*` variables, then the plain
/// `SERVER_BIND` / `CALCULATION_SERVICE_URL` variables.
pub fn load_settings() -> anyhow::Result<Settings> {
    let settings = layered_settings(Path::new(DEFAULT_CONFIG_FILE), ENV_PREFIX)?;
    finalize(apply_plain_overrides(settings, |key| std::env::var(key).ok()))
}

fn apply_plain_overrides(
    mut settings: Settings,
    lookup: impl Fn(&str) -> Option<String>,
) -> Settings {
    if let Some(v) = lookup("SERVER_BIND") {
        settings.server_bind = v;
    }
    if let Some(v) = lookup("CALCULATION_SERVICE_URL") {
        settings.calculation_service_url = v;
    }
    settings
}

fn layered_settings(path: &Path, env_prefix: &str) -> anyhow::Result<Settings> {
    let defaults = Settings::default();
    let config = Config::builder()
        .set_default("server_bind", defaults.server_bind)?
        .set_default("calculation_service_url", defaults.calculation_service_url)?
        .set_default("max_request_bytes", defaults.max_request_bytes as i64)?
        .add_source(File::from(path).format(FileFormat::Toml).required(false))
        .add_source(
            Environment::with_prefix(env_prefix)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .with_context(|| format!("failed to load settings from {}", path.display()))?;

    config
        .try_deserialize()
        .context("invalid server settings")
}

fn finalize(mut settings: Settings) -> anyhow::Result<Settings> {
    settings.calculation_service_url = normalize_service_url(&settings.calculation_service_url)?;
    settings.catalog_path = settings
        .catalog_path
        .map(|path| path.trim().to_string())
        .filter(|path| !path.is_empty());
    if settings.max_request_bytes == 0 {
        settings.max_request_bytes = Settings::default().max_request_bytes;
    }
    Ok(settings)
}

fn normalize_service_url(raw: &str) -> anyhow::Result<String> {
    if raw.trim().is_empty() {
        return Ok(Settings::default().calculation_service_url);
    }
    let url = parse_service_url(raw)?;
    Ok(url.as_str().trim_end_matches('/').to_string())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
