//! Constants used throughout the explorer core crate.
//!
//! This module contains file names, default values and fixed credentials so that
//! every store agrees on them.

/// Filename of the user-home configuration file.
pub const CONFIG_FILENAME: &str = "config.json";

/// Bundled configuration copied to the user's home directory on first run.
pub const BUNDLED_CONFIG: &str = include_str!("../templates/config.json");

/// Filename of the JSON error log when `ERROR_LOG_FILE` is not configured.
pub const ERROR_LOG_FILENAME: &str = "error_log.json";

/// Filename of the application log when `LOG_FILE` is not configured.
pub const APP_LOG_FILENAME: &str = "icd10_explorer.log";

/// Directory (under the home directory) that imported logo images are copied into.
pub const LOGO_IMAGES_DIR_NAME: &str = "icd10_explorer_images";

/// Image extensions accepted by logo import.
pub const LOGO_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "gif"];

/// Indentation used for every JSON document written to disk.
pub const JSON_INDENT: &[u8] = b"    ";

pub const DEFAULT_WINDOW_SIZE: [u32; 2] = [800, 600];
pub const DEFAULT_THEME: &str = "light";
pub const DEFAULT_LOGIN_TITLE: &str = "ICD-10 and CPT Codes Reference Guide";

/// Provider type preselected when an account is created.
pub const DEFAULT_PROVIDER_TYPE: &str = "MD";

/// Fixed admin credentials, checked independently of the user store.
pub const ADMIN_USERNAME: &str = "1";
pub const ADMIN_PASSWORD: &str = "1";

/// Documentation tips shown with code details.
pub const DOCUMENTATION_TIPS: [&str; 3] = [
    "Document diagnosis with specificity.",
    "Include relevant medical history.",
    "Link diagnosis to treatment provided.",
];
