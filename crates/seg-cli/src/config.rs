//! Configuration loading and management.

use std::fmt;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use seg_core::ExportSettings;
use seg_upload::{DEFAULT_ENDPOINT, DEFAULT_FILE_NAME, UploadTarget};
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Field separator for CSV exports.
    pub csv_delimiter: String,

    /// Timestamp pattern kept for compatibility with existing settings.
    pub timestamp_format: String,

    /// Where `seg upload` publishes the Turtle export.
    pub upload: UploadConfig,
}

/// Upload destination and credential.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    pub endpoint: String,
    pub owner: String,
    pub dataset: String,
    pub file_name: String,

    /// Bearer token (`SEG_UPLOAD__TOKEN`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("csv_delimiter", &self.csv_delimiter)
            .field("timestamp_format", &self.timestamp_format)
            .field("upload", &self.upload)
            .finish()
    }
}

impl fmt::Debug for UploadConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadConfig")
            .field("endpoint", &self.endpoint)
            .field("owner", &self.owner)
            .field("dataset", &self.dataset)
            .field("file_name", &self.file_name)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        let export = ExportSettings::default();
        Self {
            csv_delimiter: export.csv_delimiter,
            timestamp_format: export.timestamp_format,
            upload: UploadConfig::default(),
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            owner: String::new(),
            dataset: String::new(),
            file_name: DEFAULT_FILE_NAME.to_string(),
            token: None,
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (SEG_*, nested keys split on "__")
        figment = figment.merge(Env::prefixed("SEG_").split("__"));

        figment.extract()
    }

    /// Export options for the exporter.
    pub fn export_settings(&self) -> ExportSettings {
        ExportSettings {
            csv_delimiter: self.csv_delimiter.clone(),
            timestamp_format: self.timestamp_format.clone(),
        }
    }
}

impl UploadConfig {
    /// The configured destination.
    pub fn target(&self) -> UploadTarget {
        UploadTarget {
            endpoint: self.endpoint.clone(),
            owner: self.owner.clone(),
            dataset: self.dataset.clone(),
            file_name: self.file_name.clone(),
        }
    }

    /// The token, if set to something other than whitespace.
    pub fn token(&self) -> Option<&str> {
        self.token
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }
}

/// Returns the platform-specific config directory for seg.
///
/// On Linux: `~/.config/seg`
pub fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("seg"))
}
