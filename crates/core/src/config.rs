//! Startup configuration.
//!
//! The configuration file lives in the user's home directory. On first run it is created from
//! the bundled template. It is read once at startup, its paths are resolved (a leading `~`
//! expands to the home directory) and the resulting [`ExplorerConfig`] is passed to the
//! stores. Nothing in this module reads environment variables; the binary resolves those and
//! hands the values in.

use crate::constants::{
    APP_LOG_FILENAME, BUNDLED_CONFIG, CONFIG_FILENAME, ERROR_LOG_FILENAME, LOGO_IMAGES_DIR_NAME,
};
use crate::repositories::helpers::ensure_dir;
use crate::repositories::settings::Settings;
use crate::{ExplorerError, ExplorerResult};
use serde::Deserialize;
use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// On-disk shape of `config.json`.
#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(rename = "ICD10_FILE")]
    icd10_file: String,
    #[serde(rename = "USER_DB_FILE")]
    user_db_file: String,
    #[serde(rename = "SETTINGS_FILE")]
    settings_file: String,
    #[serde(rename = "CPT_FILE")]
    cpt_file: String,
    #[serde(rename = "SETTINGS_DIR")]
    settings_dir: String,
    #[serde(rename = "DEFAULT_SETTINGS", default)]
    default_settings: Settings,
    #[serde(rename = "ERROR_LOG_FILE", default)]
    error_log_file: Option<String>,
    #[serde(rename = "LOG_FILE", default)]
    log_file: Option<String>,
}

/// Configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct ExplorerConfig {
    config_path: PathBuf,
    home_dir: PathBuf,
    icd10_file: PathBuf,
    cpt_file: PathBuf,
    user_db_file: PathBuf,
    settings_file: PathBuf,
    settings_dir: PathBuf,
    error_log_file: PathBuf,
    log_file: PathBuf,
    default_settings: Settings,
}

impl ExplorerConfig {
    /// Reads and resolves the configuration at `config_path`.
    ///
    /// # Errors
    ///
    /// - [`ExplorerError::ConfigMissing`] if the file does not exist
    /// - [`ExplorerError::ConfigMalformed`] if it is not valid JSON or a required key is missing
    pub fn load(config_path: &Path, home_dir: &Path) -> ExplorerResult<Self> {
        let contents = match fs::read_to_string(config_path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(ExplorerError::ConfigMissing(config_path.to_path_buf()))
            }
            Err(source) => {
                return Err(ExplorerError::FileRead {
                    path: config_path.to_path_buf(),
                    source,
                })
            }
        };
        Self::from_json(&contents, config_path, home_dir)
    }

    /// Parses configuration text; `config_path` is only used for error reporting.
    pub fn from_json(contents: &str, config_path: &Path, home_dir: &Path) -> ExplorerResult<Self> {
        let raw: RawConfig =
            serde_json::from_str(contents).map_err(|source| ExplorerError::ConfigMalformed {
                path: config_path.to_path_buf(),
                source,
            })?;

        let settings_dir = expand_tilde(&raw.settings_dir, home_dir);
        let error_log_file = match raw.error_log_file.as_deref() {
            Some(path) => expand_tilde(path, home_dir),
            None => settings_dir.join(ERROR_LOG_FILENAME),
        };
        let log_file = match raw.log_file.as_deref() {
            Some(path) => expand_tilde(path, home_dir),
            None => settings_dir.join(APP_LOG_FILENAME),
        };

        Ok(Self {
            config_path: config_path.to_path_buf(),
            home_dir: home_dir.to_path_buf(),
            icd10_file: expand_tilde(&raw.icd10_file, home_dir),
            cpt_file: expand_tilde(&raw.cpt_file, home_dir),
            user_db_file: expand_tilde(&raw.user_db_file, home_dir),
            settings_file: expand_tilde(&raw.settings_file, home_dir),
            settings_dir,
            error_log_file,
            log_file,
            default_settings: raw.default_settings,
        })
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn icd10_file(&self) -> &Path {
        &self.icd10_file
    }

    pub fn cpt_file(&self) -> &Path {
        &self.cpt_file
    }

    pub fn user_db_file(&self) -> &Path {
        &self.user_db_file
    }

    pub fn settings_file(&self) -> &Path {
        &self.settings_file
    }

    pub fn settings_dir(&self) -> &Path {
        &self.settings_dir
    }

    pub fn error_log_file(&self) -> &Path {
        &self.error_log_file
    }

    pub fn log_file(&self) -> &Path {
        &self.log_file
    }

    pub fn default_settings(&self) -> &Settings {
        &self.default_settings
    }

    /// Where imported logo images are copied.
    pub fn images_dir(&self) -> PathBuf {
        self.home_dir.join(LOGO_IMAGES_DIR_NAME)
    }
}

/// `~/config.json`.
pub fn default_config_path(home_dir: &Path) -> PathBuf {
    home_dir.join(CONFIG_FILENAME)
}

/// Picks the home directory from the first non-empty candidate (typically `HOME`, then
/// `USERPROFILE`).
pub fn resolve_home_dir(
    candidates: impl IntoIterator<Item = Option<OsString>>,
) -> ExplorerResult<PathBuf> {
    candidates
        .into_iter()
        .flatten()
        .find(|value| !value.is_empty())
        .map(PathBuf::from)
        .ok_or(ExplorerError::HomeDirUnknown)
}

/// Copies the bundled configuration to `config_path` if nothing is there yet.
///
/// Returns `true` when the file was created.
pub fn bootstrap_config(config_path: &Path) -> ExplorerResult<bool> {
    if config_path.exists() {
        return Ok(false);
    }

    if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir(parent)?;
    }
    fs::write(config_path, BUNDLED_CONFIG).map_err(|source| ExplorerError::FileWrite {
        path: config_path.to_path_buf(),
        source,
    })?;
    tracing::info!("copied bundled config.json to {}", config_path.display());
    Ok(true)
}

/// Expands a leading `~` to `home_dir`. Other paths are returned unchanged.
pub fn expand_tilde(value: &str, home_dir: &Path) -> PathBuf {
    if value == "~" {
        return home_dir.to_path_buf();
    }
    match value.strip_prefix("~/") {
        Some(rest) => home_dir.join(rest),
        None => PathBuf::from(value),
    }
}
