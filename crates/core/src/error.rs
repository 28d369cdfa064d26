use std::path::PathBuf;

use crate::documents::CodeSystem;

#[derive(Debug, thiserror::Error)]
pub enum ExplorerError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] explorer_types::TextError),
    #[error("selected category does not exist: {0}")]
    CategoryNotFound(String),
    #[error("category already exists: {0}")]
    CategoryExists(String),
    #[error("{system} code not found: {code}")]
    CodeNotFound { system: CodeSystem, code: String },
    #[error("username already exists: {0}")]
    UserExists(String),
    #[error("user not found: {0}")]
    UserNotFound(String),
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("invalid admin credentials")]
    InvalidAdminCredentials,
    #[error("login required")]
    NotLoggedIn,
    #[error("admin login required")]
    AdminRequired,
    #[error("invalid setting {key}: {reason}")]
    InvalidSetting { key: String, reason: String },
    #[error("unsupported logo image (expected jpg, jpeg, png or gif): {}", .0.display())]
    UnsupportedLogo(PathBuf),

    #[error("configuration file not found: {}", .0.display())]
    ConfigMissing(PathBuf),
    #[error("configuration file is not properly formatted ({}): {source}", path.display())]
    ConfigMalformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("could not determine the home directory")]
    HomeDirUnknown,

    #[error("failed to create directory {}: {source}", path.display())]
    DirCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read {}: {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {}: {source}", path.display())]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to copy {} to {}: {source}", from.display(), to.display())]
    FileCopy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize JSON: {0}")]
    Serialization(serde_json::Error),
    #[error("{} does not contain a valid document: {source}", path.display())]
    Deserialization {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type ExplorerResult<T> = std::result::Result<T, ExplorerError>;

impl ExplorerError {
    /// Returns `true` for errors caused by user input rather than the environment.
    ///
    /// Validation errors are reported to the user and leave state unchanged; they are not
    /// written to the JSON error log.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ExplorerError::InvalidInput(_)
                | ExplorerError::CategoryNotFound(_)
                | ExplorerError::CategoryExists(_)
                | ExplorerError::CodeNotFound { .. }
                | ExplorerError::UserExists(_)
                | ExplorerError::UserNotFound(_)
                | ExplorerError::InvalidCredentials
                | ExplorerError::InvalidAdminCredentials
                | ExplorerError::NotLoggedIn
                | ExplorerError::AdminRequired
                | ExplorerError::InvalidSetting { .. }
                | ExplorerError::UnsupportedLogo(_)
        )
    }

    /// Suggested remedy recorded next to the message in the error log.
    pub fn solution(&self) -> &'static str {
        match self {
            ExplorerError::ConfigMissing(_) | ExplorerError::ConfigMalformed { .. } => {
                "Check the configuration and ensure all necessary files are present."
            }
            ExplorerError::HomeDirUnknown => "Set the HOME environment variable.",
            ExplorerError::DirCreation { .. } | ExplorerError::FileWrite { .. } => {
                "Check that the data directory exists and is writable."
            }
            ExplorerError::FileRead { .. } | ExplorerError::FileCopy { .. } => {
                "Check that the file exists and is readable."
            }
            ExplorerError::Deserialization { .. } => {
                "Restore the data file from a backup or fix its JSON structure."
            }
            ExplorerError::Serialization(_) => "Report this as a bug.",
            _ => "Correct the input and try again.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use explorer_types::TextError;

    #[test]
    fn test_validation_errors_are_classified() {
        let err = ExplorerError::from(TextError::Empty { field: "code" });
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "invalid input: code cannot be empty");
        assert!(ExplorerError::CategoryExists("Endocrine".into()).is_validation());
    }

    #[test]
    fn test_io_errors_are_not_validation() {
        let err = ExplorerError::FileWrite {
            path: PathBuf::from("/nowhere/icd10_codes.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(!err.is_validation());
        assert_eq!(
            err.solution(),
            "Check that the data directory exists and is writable."
        );
    }

    #[test]
    fn test_code_not_found_names_system() {
        let err = ExplorerError::CodeNotFound {
            system: CodeSystem::Cpt,
            code: "99213".into(),
        };
        assert_eq!(err.to_string(), "CPT code not found: 99213");
    }
}
