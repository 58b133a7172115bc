use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use essay_service::{AtomicFileWriter, PersistError, ServiceSettings};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::logging::LogDestination;

pub const DEFAULT_CONFIG_FILE: &str = "./essay_wizard.ron";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WizardConfig {
    pub api_base_url: String,
    pub output_dir: PathBuf,
    pub log_destination: LogDestination,
    /// Unset means remote calls may take as long as they need.
    pub request_timeout_secs: Option<u64>,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            api_base_url: ServiceSettings::default().base_url,
            output_dir: PathBuf::from("."),
            log_destination: LogDestination::default(),
            request_timeout_secs: None,
        }
    }
}

impl WizardConfig {
    pub fn service_settings(&self) -> ServiceSettings {
        ServiceSettings {
            base_url: self.api_base_url.clone(),
            request_timeout: self.request_timeout_secs.map(Duration::from_secs),
            ..ServiceSettings::default()
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config: {0}")]
    Read(#[from] std::io::Error),
    #[error("could not parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("could not serialize config: {0}")]
    Serialize(#[from] ron::Error),
    #[error("could not write config: {0}")]
    Write(#[from] PersistError),
}

/// Load the config file. A missing file yields the defaults.
pub fn load(path: &Path) -> Result<WizardConfig, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(WizardConfig::default());
        }
        Err(err) => return Err(err.into()),
    };
    Ok(ron::from_str(&content)?)
}

/// Save `config`, refusing to replace an existing file that cannot be loaded.
pub fn save_over_valid(path: &Path, config: &WizardConfig) -> Result<PathBuf, ConfigError> {
    load(path)?;
    save(path, config)
}

pub fn save(path: &Path, config: &WizardConfig) -> Result<PathBuf, ConfigError> {
    let pretty = ron::ser::PrettyConfig::new();
    let content = ron::ser::to_string_pretty(config, pretty)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| DEFAULT_CONFIG_FILE.trim_start_matches("./").to_string());

    let writer = AtomicFileWriter::new(dir);
    Ok(writer.write(&filename, content.as_bytes())?)
}
