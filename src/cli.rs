use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use explorer_core::constants::DEFAULT_PROVIDER_TYPE;
use explorer_core::repositories::settings::LogoKind;
use explorer_core::repositories::users::ProviderType;

#[derive(Parser)]
#[command(name = "icd10-explorer", version)]
#[command(about = "ICD-10 and CPT code reference and editor")]
pub struct Cli {
    /// Configuration file (default: ~/config.json)
    #[arg(long, global = true, env = "ICD10_EXPLORER_CONFIG")]
    pub config: Option<PathBuf>,
    /// Username to log in with
    #[arg(long, short = 'u', global = true, env = "ICD10_USER")]
    pub user: Option<String>,
    /// Password to log in with
    #[arg(
        long,
        short = 'p',
        global = true,
        env = "ICD10_PASSWORD",
        hide_env_values = true
    )]
    pub password: Option<String>,
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn credentials(&self) -> (&str, &str) {
        (
            self.user.as_deref().unwrap_or_default(),
            self.password.as_deref().unwrap_or_default(),
        )
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the configuration and settings files if missing and show where data lives
    Init,
    /// Check credentials and show the login status line
    Login,
    /// Work with ICD-10 codes
    Icd10 {
        #[command(subcommand)]
        action: CodeCommand,
    },
    /// Work with CPT codes
    Cpt {
        #[command(subcommand)]
        action: CodeCommand,
    },
    /// Manage user accounts
    User {
        #[command(subcommand)]
        action: UserCommand,
    },
    /// Application settings and the error log (admin login)
    Admin {
        #[command(subcommand)]
        action: AdminCommand,
    },
}

#[derive(Subcommand)]
pub enum CodeCommand {
    /// Show every category and code
    List,
    /// Show codes whose code or description contains the query
    Search { query: String },
    /// Show details for one code
    Show { code: String },
    /// Add a code to an existing category
    Add {
        category: String,
        code: String,
        description: String,
    },
    /// Create a new category
    AddCategory {
        name: String,
        /// First code to put in the new category
        #[arg(long, requires = "description")]
        code: Option<String>,
        /// Description of the first code
        #[arg(long, requires = "code")]
        description: Option<String>,
    },
    /// Replace a code and its description
    Edit {
        code: String,
        new_code: String,
        new_description: String,
    },
    /// Delete the first occurrence of a code
    Delete { code: String },
    /// Delete a category and all of its codes
    DeleteCategory { name: String },
}

#[derive(Subcommand)]
pub enum UserCommand {
    /// Create an account from --user and --password; no login needed
    Create {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long, default_value = DEFAULT_PROVIDER_TYPE, value_parser = ProviderType::ALL.map(ProviderType::as_str))]
        provider_type: String,
    },
    /// List accounts
    List,
    /// Remove an account
    Remove { username: String },
    /// Set a new password for an account
    Passwd {
        username: String,
        new_password: String,
    },
}

#[derive(Subcommand)]
pub enum AdminCommand {
    /// Print the current settings
    Show,
    /// Change the title shown on the login screen
    SetTitle { title: String },
    /// Set one settings key; the value is parsed as JSON, or taken as a string
    Set { key: String, value: String },
    /// Copy an image in as the login or clinic logo
    ImportLogo {
        #[arg(value_enum)]
        target: LogoTarget,
        path: PathBuf,
    },
    /// Print the error log
    Errors,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogoTarget {
    Login,
    Clinic,
}

impl From<LogoTarget> for LogoKind {
    fn from(target: LogoTarget) -> Self {
        match target {
            LogoTarget::Login => LogoKind::Login,
            LogoTarget::Clinic => LogoKind::Clinic,
        }
    }
}
