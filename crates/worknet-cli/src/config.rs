//! Planner configuration: working window, country time zones, country groups.
//!
//! The bundled `config/default.toml` is always loaded first. A user file, if
//! one is found, is layered on top of it.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use meeting_engine::{CountryDirectory, WorkingWindow};
use serde::Deserialize;
use tracing::{debug, info};

const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");
const CONFIG_ENV_VAR: &str = "WORKNET_CONFIG";
const CONFIG_FILE_NAME: &str = "config.toml";
const CONFIG_DIR_NAME: &str = "worknet";

/// On-disk shape. Every section is optional so user files can be partial.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    window: Option<WorkingWindow>,
    #[serde(default)]
    countries: BTreeMap<String, String>,
    #[serde(default)]
    groups: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone)]
pub struct PlannerConfig {
    pub window: WorkingWindow,
    pub directory: CountryDirectory,
    pub loaded_from: Option<PathBuf>,
}

impl PlannerConfig {
    /// Load the bundled defaults, then the first user file found among:
    /// `path_override`, `$WORKNET_CONFIG`, `<config dir>/worknet/config.toml`.
    ///
    /// An explicitly named file (flag or env var) must exist; the per-user file
    /// is optional.
    #[tracing::instrument]
    pub fn load(path_override: Option<&Path>) -> Result<Self> {
        let mut raw = parse(DEFAULT_CONFIG).context("bundled default config is invalid")?;

        let user_path = resolve_config_path(path_override)?;
        if let Some(path) = &user_path {
            info!(config = %path.display(), "loading config file");
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            let user = parse(&text)
                .with_context(|| format!("Invalid config file: {}", path.display()))?;
            raw.overlay(user);
        } else {
            debug!("no user config found, using bundled defaults");
        }

        let mut cfg = Self::from_raw(raw)?;
        cfg.loaded_from = user_path;
        Ok(cfg)
    }

    /// Build a config from TOML text alone, without the bundled defaults.
    #[cfg(test)]
    fn from_toml(text: &str) -> Result<Self> {
        Self::from_raw(parse(text)?)
    }

    fn from_raw(raw: RawConfig) -> Result<Self> {
        let window = raw.window.unwrap_or_default();
        let directory = CountryDirectory::new(raw.countries, raw.groups)
            .context("config [countries] contains an unknown time zone")?;
        Ok(Self {
            window,
            directory,
            loaded_from: None,
        })
    }
}

impl RawConfig {
    fn overlay(&mut self, user: RawConfig) {
        if user.window.is_some() {
            self.window = user.window;
        }
        self.countries.extend(user.countries);
        self.groups.extend(user.groups);
    }
}

fn parse(text: &str) -> Result<RawConfig> {
    toml::from_str(text).context("failed to parse TOML config")
}

fn resolve_config_path(path_override: Option<&Path>) -> Result<Option<PathBuf>> {
    if let Some(path) = path_override {
        anyhow::ensure!(path.exists(), "Config file not found: {}", path.display());
        return Ok(Some(path.to_path_buf()));
    }

    if let Ok(raw) = std::env::var(CONFIG_ENV_VAR) {
        let path = PathBuf::from(raw);
        anyhow::ensure!(
            path.exists(),
            "Config file from ${} not found: {}",
            CONFIG_ENV_VAR,
            path.display()
        );
        return Ok(Some(path));
    }

    let candidate = dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME));
    Ok(candidate.filter(|path| path.exists()))
}
