//! Settings document.
//!
//! A flat JSON object of display options. Recognised keys have hard-coded defaults that
//! apply whenever the key is missing; unknown keys are carried through untouched. A settings
//! file that cannot be parsed is replaced with the configured defaults rather than treated
//! as fatal.

use super::helpers::{ensure_dir, parse, read_optional, write_json};
use crate::constants::{
    DEFAULT_LOGIN_TITLE, DEFAULT_THEME, DEFAULT_WINDOW_SIZE, LOGO_EXTENSIONS,
};
use crate::{ExplorerError, ExplorerResult};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// `[width, height]` of the main window.
    #[serde(default = "default_window_size")]
    pub window_size: [u32; 2],
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_login_title")]
    pub login_title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg_image_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clinic_image_path: Option<PathBuf>,
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_json::Value>,
}

fn default_window_size() -> [u32; 2] {
    DEFAULT_WINDOW_SIZE
}

fn default_theme() -> String {
    DEFAULT_THEME.to_owned()
}

fn default_login_title() -> String {
    DEFAULT_LOGIN_TITLE.to_owned()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_size: default_window_size(),
            theme: default_theme(),
            login_title: default_login_title(),
            bg_image_path: None,
            clinic_image_path: None,
            extra: IndexMap::new(),
        }
    }
}

/// Which logo an imported image replaces.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogoKind {
    /// Shown on the login screen; stored under `bg_image_path`.
    Login,
    /// Stored under `clinic_image_path`.
    Clinic,
}

#[derive(Clone, Debug)]
pub struct SettingsStore {
    dir: PathBuf,
    path: PathBuf,
    defaults: Settings,
}

impl SettingsStore {
    /// `defaults` is what gets written when the file is missing or corrupt.
    pub fn new(dir: impl Into<PathBuf>, path: impl Into<PathBuf>, defaults: Settings) -> Self {
        Self {
            dir: dir.into(),
            path: path.into(),
            defaults,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the settings directory, and the settings file with defaults if it is missing.
    pub fn ensure(&self) -> ExplorerResult<()> {
        ensure_dir(&self.dir)?;
        if !self.path.exists() {
            write_json(&self.path, &self.defaults)?;
            tracing::info!("created default settings file at {}", self.path.display());
        }
        Ok(())
    }

    /// Loads the settings, resetting the file to defaults if it is missing or unparsable.
    pub fn load(&self) -> ExplorerResult<Settings> {
        let parsed = match read_optional(&self.path)? {
            Some(contents) => parse::<Settings>(&self.path, &contents),
            None => Err(ExplorerError::FileRead {
                path: self.path.clone(),
                source: std::io::ErrorKind::NotFound.into(),
            }),
        };

        match parsed {
            Ok(settings) => Ok(settings),
            Err(e) => {
                tracing::error!("error loading settings: {e}");
                ensure_dir(&self.dir)?;
                write_json(&self.path, &self.defaults)?;
                Ok(self.defaults.clone())
            }
        }
    }

    pub fn save(&self, settings: &Settings) -> ExplorerResult<()> {
        write_json(&self.path, settings)?;
        tracing::info!("settings saved to {}", self.path.display());
        Ok(())
    }

    /// Sets one key and saves.
    ///
    /// The update is rejected, and nothing is written, if the result no longer has the
    /// settings shape (for example a `window_size` that is not a `[width, height]` pair).
    pub fn update(&self, key: &str, value: serde_json::Value) -> ExplorerResult<Settings> {
        let key = key.trim();
        if key.is_empty() {
            return Err(ExplorerError::InvalidSetting {
                key: key.to_owned(),
                reason: "key cannot be empty".into(),
            });
        }

        let current = self.load()?;
        let mut raw = serde_json::to_value(&current).map_err(ExplorerError::Serialization)?;
        if let Some(object) = raw.as_object_mut() {
            object.insert(key.to_owned(), value);
        }
        let updated: Settings =
            serde_json::from_value(raw).map_err(|e| ExplorerError::InvalidSetting {
                key: key.to_owned(),
                reason: e.to_string(),
            })?;

        self.save(&updated)?;
        Ok(updated)
    }

    /// Stores a new login title. An empty title keeps the current one; the file is saved
    /// either way.
    pub fn set_login_title(&self, title: &str) -> ExplorerResult<Settings> {
        let mut settings = self.load()?;
        let title = title.trim();
        if !title.is_empty() {
            settings.login_title = title.to_owned();
        }
        self.save(&settings)?;
        Ok(settings)
    }

    /// Copies an image into `images_dir` and points the logo setting at the copy.
    ///
    /// Only the file extension is checked; the image is not decoded.
    pub fn import_logo(
        &self,
        kind: LogoKind,
        source: &Path,
        images_dir: &Path,
    ) -> ExplorerResult<Settings> {
        let supported = source
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| LOGO_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
            .unwrap_or(false);
        let Some(file_name) = source.file_name().filter(|_| supported) else {
            return Err(ExplorerError::UnsupportedLogo(source.to_path_buf()));
        };

        ensure_dir(images_dir)?;
        let dest = images_dir.join(file_name);
        fs::copy(source, &dest).map_err(|e| ExplorerError::FileCopy {
            from: source.to_path_buf(),
            to: dest.clone(),
            source: e,
        })?;

        let mut settings = self.load()?;
        match kind {
            LogoKind::Login => settings.bg_image_path = Some(dest),
            LogoKind::Clinic => settings.clinic_image_path = Some(dest),
        }
        self.save(&settings)?;
        Ok(settings)
    }
}
