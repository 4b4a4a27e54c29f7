use std::path::{Path, PathBuf};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use crate::error::{FudgeError, Result};

pub const CONFIG_ENV: &str = "FUDGE_CONFIG";
pub const BACKEND_ENV: &str = "FUDGE_BACKEND";

/// User-level settings, read from `config.toml` in the fudge config directory.
#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub backend: BackendConfig,
}

/// How the backend package manager is invoked.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct BackendConfig {
    /// Executable name or path.
    pub program: String,
    /// Arguments that list locally installed packages in `name|version` form.
    pub list_args: Vec<String>,
    /// Bootstrap script used when the backend is missing.
    pub install_script_url: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            program: String::from("choco"),
            list_args: vec![String::from("list"), String::from("--limit-output")],
            install_script_url: String::from("https://community.chocolatey.org/install.ps1"),
        }
    }
}

impl Config {
    /// Loads the config from `FUDGE_CONFIG` or the default location.
    ///
    /// A missing file yields the defaults. `FUDGE_BACKEND` overrides the backend program.
    pub fn load() -> Result<Config> {
        let path = match std::env::var_os(CONFIG_ENV) {
            Some(path) => Some(PathBuf::from(path)),
            None => default_config_path(),
        };
        let mut config = match path {
            Some(path) => Config::load_from(&path)?,
            None => Config::default(),
        };
        if let Ok(program) = std::env::var(BACKEND_ENV) {
            if !program.trim().is_empty() {
                config.backend.program = program;
            }
        }
        Ok(config)
    }

    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Config> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!("no config at {}, using defaults", path.display());
            return Ok(Config::default());
        }
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|source| FudgeError::Config {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// `<config dir>/config.toml`, if the platform has a config directory.
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("org", "fudge", "fudge").map(|dirs| dirs.config_dir().join("config.toml"))
}
