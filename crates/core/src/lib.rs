//! # Explorer Core
//!
//! Data handling for the ICD-10 / CPT code explorer.
//!
//! This crate owns everything that touches disk:
//! - startup configuration and first-run bootstrap ([`config`])
//! - the ICD-10 and CPT code documents and their repositories ([`repositories`])
//! - the user database, settings file and JSON error log
//! - login state and access rules ([`session`], [`explorer`])
//!
//! **No presentation concerns**: rendering and argument parsing belong in the binary.

pub mod config;
pub mod constants;
pub mod documents;
pub mod error;
pub mod explorer;
pub mod repositories;
pub mod session;

pub use config::ExplorerConfig;
pub use documents::{CodeDocument, CodeEntry, CodeSystem, TreeNode};
pub use error::{ExplorerError, ExplorerResult};
pub use explorer::Explorer;
pub use explorer_types::{NonEmptyText, TextError};
pub use repositories::CodeRepository;
