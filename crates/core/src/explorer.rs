//! Application state shared by every command.
//!
//! [`Explorer`] owns the resolved configuration, the three data stores, the settings and
//! the login session. It is built once at startup and handed by reference to whatever
//! front end drives it. Access rules live here: code and user management need a logged-in
//! user, settings changes and the error log need the admin login, and account creation
//! needs nothing.

use std::path::Path;

use crate::config::ExplorerConfig;
use crate::documents::CodeSystem;
use crate::repositories::cpt::CptRepository;
use crate::repositories::error_log::{ErrorEntry, ErrorLog};
use crate::repositories::helpers::ensure_dir;
use crate::repositories::icd10::Icd10Repository;
use crate::repositories::settings::{LogoKind, Settings, SettingsStore};
use crate::repositories::users::{NewUser, UserProfile, UserStore};
use crate::repositories::CodeRepository;
use crate::session::Session;
use crate::{ExplorerError, ExplorerResult};

pub struct Explorer {
    config: ExplorerConfig,
    settings_store: SettingsStore,
    settings: Settings,
    icd10: Icd10Repository,
    cpt: CptRepository,
    users: UserStore,
    error_log: ErrorLog,
    session: Session,
}

impl Explorer {
    /// Prepares the settings file and loads every data file named by `config`.
    ///
    /// Missing data files are treated as empty documents; their parent directories are
    /// created so the first save succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory cannot be created or a data file exists but does
    /// not hold a document of the expected shape.
    pub fn open(config: ExplorerConfig) -> ExplorerResult<Self> {
        let settings_store = SettingsStore::new(
            config.settings_dir(),
            config.settings_file(),
            config.default_settings().clone(),
        );
        settings_store.ensure()?;
        let settings = settings_store.load()?;

        for file in [config.icd10_file(), config.cpt_file(), config.user_db_file()] {
            if let Some(parent) = file.parent().filter(|p| !p.as_os_str().is_empty()) {
                ensure_dir(parent)?;
            }
        }

        let icd10 = Icd10Repository::open(config.icd10_file())?;
        let cpt = CptRepository::open(config.cpt_file())?;
        let users = UserStore::open(config.user_db_file())?;
        let error_log = ErrorLog::new(config.error_log_file());

        tracing::info!(
            "loaded {} ICD-10 categories, {} CPT categories, {} users",
            icd10.categories().len(),
            cpt.categories().len(),
            users.len()
        );

        Ok(Self {
            config,
            settings_store,
            settings,
            icd10,
            cpt,
            users,
            error_log,
            session: Session::new(),
        })
    }

    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    /// Settings as of the last load or change.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn login(&mut self, username: &str, password: &str) -> ExplorerResult<&UserProfile> {
        self.session.login(&self.users, username, password)
    }

    pub fn admin_login(&mut self, username: &str, password: &str) -> ExplorerResult<()> {
        self.session.admin_login(username, password)
    }

    pub fn repository(&self, system: CodeSystem) -> ExplorerResult<&dyn CodeRepository> {
        self.session.require_user()?;
        let repo: &dyn CodeRepository = match system {
            CodeSystem::Icd10 => &self.icd10,
            CodeSystem::Cpt => &self.cpt,
        };
        Ok(repo)
    }

    pub fn repository_mut(
        &mut self,
        system: CodeSystem,
    ) -> ExplorerResult<&mut dyn CodeRepository> {
        self.session.require_user()?;
        let repo: &mut dyn CodeRepository = match system {
            CodeSystem::Icd10 => &mut self.icd10,
            CodeSystem::Cpt => &mut self.cpt,
        };
        Ok(repo)
    }

    /// Account creation from the login screen; no login needed.
    pub fn create_account(&mut self, new_user: NewUser<'_>) -> ExplorerResult<UserProfile> {
        let profile = self.users.create_user(new_user)?;
        tracing::info!("created account {}", profile.username);
        Ok(profile)
    }

    pub fn list_users(&self) -> ExplorerResult<Vec<UserProfile>> {
        self.session.require_user()?;
        Ok(self.users.list_users())
    }

    pub fn remove_user(&mut self, username: &str) -> ExplorerResult<()> {
        self.session.require_user()?;
        self.users.remove_user(username)
    }

    pub fn change_password(&mut self, username: &str, new_password: &str) -> ExplorerResult<()> {
        self.session.require_user()?;
        self.users.change_password(username, new_password)
    }

    pub fn update_setting(&mut self, key: &str, value: serde_json::Value) -> ExplorerResult<()> {
        self.session.require_admin()?;
        self.settings = self.settings_store.update(key, value)?;
        Ok(())
    }

    pub fn set_login_title(&mut self, title: &str) -> ExplorerResult<()> {
        self.session.require_admin()?;
        self.settings = self.settings_store.set_login_title(title)?;
        Ok(())
    }

    pub fn import_logo(&mut self, kind: LogoKind, source: &Path) -> ExplorerResult<()> {
        self.session.require_admin()?;
        let images_dir = self.config.images_dir();
        self.settings = self.settings_store.import_logo(kind, source, &images_dir)?;
        Ok(())
    }

    pub fn error_entries(&self) -> ExplorerResult<Vec<ErrorEntry>> {
        self.session.require_admin()?;
        self.error_log.entries()
    }

    /// Logs a failed action.
    ///
    /// Validation failures only go to the application log. Anything else is also appended
    /// to the JSON error log; if that append fails too, the failure is logged and dropped.
    pub fn record_failure(&self, action: &str, err: &ExplorerError) {
        if err.is_validation() {
            tracing::warn!("{action}: {err}");
            return;
        }

        tracing::error!("{action} failed: {err}");
        let message = format!("{action} failed: {err}");
        if let Err(log_err) = self.error_log.append(&message, err.solution()) {
            tracing::warn!(
                "could not write to error log {}: {log_err}",
                self.error_log.path().display()
            );
        }
    }

    /// Runs one user action, recording its failure before handing the result back.
    pub fn run<T>(
        &mut self,
        action: &str,
        f: impl FnOnce(&mut Self) -> ExplorerResult<T>,
    ) -> ExplorerResult<T> {
        let result = f(self);
        if let Err(err) = &result {
            self.record_failure(action, err);
        }
        result
    }
}
