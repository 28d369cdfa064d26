//! User database.
//!
//! Users are stored as a JSON object keyed by username:
//!
//! ```text
//! {
//!     "jdoe": {
//!         "password": "<sha-256 hex digest>",
//!         "first_name": "Jane",
//!         "last_name": "Doe",
//!         "provider_type": "MD"
//!     }
//! }
//! ```
//!
//! Passwords are stored as an unsalted SHA-256 digest so that existing user files keep
//! working. Usernames are case-sensitive and only checked for uniqueness at creation.

use super::helpers::{load_or_default, write_json};
use crate::{ExplorerError, ExplorerResult, NonEmptyText};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// Provider types offered when creating an account.
///
/// The stored field is free text; this list is what the front end offers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProviderType {
    Md,
    Pa,
    Np,
}

impl ProviderType {
    pub const ALL: [ProviderType; 3] = [ProviderType::Md, ProviderType::Pa, ProviderType::Np];

    pub fn as_str(self) -> &'static str {
        match self {
            ProviderType::Md => "MD",
            ProviderType::Pa => "PA",
            ProviderType::Np => "NP",
        }
    }
}

/// Stored user entry.
///
/// Older files may lack the profile fields; they load as empty strings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Hex digest of the password.
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub provider_type: String,
}

/// Profile view of a user, without the password digest.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserProfile {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub provider_type: String,
}

impl UserProfile {
    fn from_record(username: &str, record: &UserRecord) -> Self {
        Self {
            username: username.to_owned(),
            first_name: record.first_name.clone(),
            last_name: record.last_name.clone(),
            provider_type: record.provider_type.clone(),
        }
    }
}

/// Fields required to create an account.
#[derive(Clone, Debug)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub password: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub provider_type: &'a str,
}

/// Lowercase hex SHA-256 digest of `password`.
pub fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

#[derive(Clone, Debug)]
pub struct UserStore {
    path: PathBuf,
    users: IndexMap<String, UserRecord>,
}

impl UserStore {
    pub fn open(path: impl Into<PathBuf>) -> ExplorerResult<Self> {
        let path = path.into();
        let users = Self::load(&path)?;
        Ok(Self { path, users })
    }

    pub fn load(path: &Path) -> ExplorerResult<IndexMap<String, UserRecord>> {
        load_or_default(path)
    }

    pub fn save(&self) -> ExplorerResult<()> {
        write_json(&self.path, &self.users)?;
        tracing::info!("user database saved to {}", self.path.display());
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, username: &str) -> Option<&UserRecord> {
        self.users.get(username)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Checks `password` against the stored digest for `username`.
    ///
    /// Both inputs are trimmed first, matching how the login form reads them.
    pub fn authenticate(&self, username: &str, password: &str) -> ExplorerResult<UserProfile> {
        let username = username.trim();
        match self.users.get(username) {
            Some(record) if record.password == hash_password(password.trim()) => {
                Ok(UserProfile::from_record(username, record))
            }
            _ => Err(ExplorerError::InvalidCredentials),
        }
    }

    /// Creates an account. Every field is required and the username must be unused.
    pub fn create_user(&mut self, new_user: NewUser<'_>) -> ExplorerResult<UserProfile> {
        let username = NonEmptyText::for_field("username", new_user.username)?;
        let first_name = NonEmptyText::for_field("first name", new_user.first_name)?;
        let last_name = NonEmptyText::for_field("last name", new_user.last_name)?;
        let provider_type = NonEmptyText::for_field("provider type", new_user.provider_type)?;
        let password = NonEmptyText::for_field("password", new_user.password)?;

        if self.users.contains_key(username.as_str()) {
            return Err(ExplorerError::UserExists(username.into_inner()));
        }

        let record = UserRecord {
            password: hash_password(password.as_str()),
            first_name: first_name.into_inner(),
            last_name: last_name.into_inner(),
            provider_type: provider_type.into_inner(),
        };
        let profile = UserProfile::from_record(username.as_str(), &record);
        self.users.insert(username.into_inner(), record);
        self.save()?;
        Ok(profile)
    }

    /// Replaces the stored digest; the old password stops working.
    pub fn change_password(&mut self, username: &str, new_password: &str) -> ExplorerResult<()> {
        let password = NonEmptyText::for_field("password", new_password)?;
        let username = username.trim();
        let Some(record) = self.users.get_mut(username) else {
            return Err(ExplorerError::UserNotFound(username.to_owned()));
        };
        record.password = hash_password(password.as_str());
        self.save()
    }

    pub fn remove_user(&mut self, username: &str) -> ExplorerResult<()> {
        let username = username.trim();
        if self.users.shift_remove(username).is_none() {
            return Err(ExplorerError::UserNotFound(username.to_owned()));
        }
        self.save()
    }

    /// All users in stored order, without password digests.
    pub fn list_users(&self) -> Vec<UserProfile> {
        self.users
            .iter()
            .map(|(username, record)| UserProfile::from_record(username, record))
            .collect()
    }
}
