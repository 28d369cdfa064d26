//! Login state.
//!
//! A successful login is nothing more than a populated "current user" field; there are no
//! tokens, no expiry and no lockout. Admin access is a separate flag gained with the fixed
//! admin credential pair and does not involve the user store.

use crate::constants::{ADMIN_PASSWORD, ADMIN_USERNAME};
use crate::repositories::users::{UserProfile, UserStore};
use crate::{ExplorerError, ExplorerResult};

#[derive(Clone, Debug, Default)]
pub struct Session {
    user: Option<UserProfile>,
    admin: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Authenticates against `users` and, on success, records the current user.
    ///
    /// A failed attempt leaves any existing login untouched.
    pub fn login(
        &mut self,
        users: &UserStore,
        username: &str,
        password: &str,
    ) -> ExplorerResult<&UserProfile> {
        let profile = users.authenticate(username, password)?;
        tracing::info!("user {} logged in", profile.username);
        Ok(&*self.user.insert(profile))
    }

    /// Literal comparison against the fixed admin credentials.
    pub fn admin_login(&mut self, username: &str, password: &str) -> ExplorerResult<()> {
        if username.trim() == ADMIN_USERNAME && password.trim() == ADMIN_PASSWORD {
            self.admin = true;
            tracing::info!("admin logged in");
            Ok(())
        } else {
            Err(ExplorerError::InvalidAdminCredentials)
        }
    }

    pub fn current_user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    pub fn is_admin(&self) -> bool {
        self.admin
    }

    pub fn require_user(&self) -> ExplorerResult<&UserProfile> {
        self.user.as_ref().ok_or(ExplorerError::NotLoggedIn)
    }

    pub fn require_admin(&self) -> ExplorerResult<()> {
        if self.admin {
            Ok(())
        } else {
            Err(ExplorerError::AdminRequired)
        }
    }

    /// `Logged in as: <username> (<provider type>)`, when someone is logged in.
    pub fn status_line(&self) -> Option<String> {
        self.user
            .as_ref()
            .map(|u| format!("Logged in as: {} ({})", u.username, u.provider_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::users::NewUser;
    use tempfile::TempDir;

    fn store_with_user(temp_dir: &TempDir) -> UserStore {
        let mut users =
            UserStore::open(temp_dir.path().join("user_db.json")).expect("open should succeed");
        users
            .create_user(NewUser {
                username: "jdoe",
                password: "s3cret",
                first_name: "Jane",
                last_name: "Doe",
                provider_type: "PA",
            })
            .expect("create should succeed");
        users
    }

    #[test]
    fn test_login_sets_current_user() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let users = store_with_user(&temp_dir);
        let mut session = Session::new();

        session
            .login(&users, "jdoe", "s3cret")
            .expect("login should succeed");

        assert_eq!(
            session.status_line().as_deref(),
            Some("Logged in as: jdoe (PA)")
        );
        assert!(session.require_user().is_ok());
        assert!(!session.is_admin());
    }

    #[test]
    fn test_failed_login_keeps_session_empty() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let users = store_with_user(&temp_dir);
        let mut session = Session::new();

        let err = session
            .login(&users, "jdoe", "nope")
            .expect_err("bad password should fail");

        assert!(matches!(err, ExplorerError::InvalidCredentials));
        assert!(session.current_user().is_none());
        assert!(matches!(
            session.require_user(),
            Err(ExplorerError::NotLoggedIn)
        ));
    }

    #[test]
    fn test_admin_login_is_independent_of_user_store() {
        let mut session = Session::new();

        assert!(matches!(
            session.admin_login("admin", "admin"),
            Err(ExplorerError::InvalidAdminCredentials)
        ));
        session.admin_login("1", "1").expect("fixed pair should work");

        assert!(session.require_admin().is_ok());
        assert!(session.current_user().is_none());
    }

    #[test]
    fn test_failed_login_keeps_previous_user() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let users = store_with_user(&temp_dir);
        let mut session = Session::new();
        session
            .login(&users, "jdoe", "s3cret")
            .expect("login should succeed");

        assert!(session.login(&users, "jdoe", "wrong").is_err());

        assert_eq!(
            session.current_user().map(|u| u.username.as_str()),
            Some("jdoe")
        );
    }
}
