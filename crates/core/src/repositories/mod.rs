//! Stores backed by flat JSON files.
//!
//! Each store owns its in-memory document, loads it once when opened and rewrites the whole
//! file after every mutation. A failed write is returned to the caller; the in-memory change
//! is kept, so memory may be ahead of disk until the next successful save.

pub mod cpt;
pub mod error_log;
pub(crate) mod helpers;
pub mod icd10;
pub mod settings;
pub mod users;

use crate::documents::{filter_tree, CodeDocument, TreeNode};
use crate::ExplorerResult;

/// Operations shared by the ICD-10 and CPT repositories.
///
/// Inputs are trimmed, and empty values are rejected before anything is changed.
pub trait CodeRepository {
    /// A snapshot of the current in-memory document.
    fn document(&self) -> CodeDocument;

    /// Category names in display order.
    fn categories(&self) -> Vec<String>;

    /// Writes the in-memory document to disk.
    fn save(&self) -> ExplorerResult<()>;

    /// Adds a code to an existing category and persists.
    fn add_code(&mut self, category: &str, code: &str, description: &str) -> ExplorerResult<()>;

    /// Creates a category, optionally seeded with one code, in a single save.
    ///
    /// Rejects empty or existing names. The seed is inserted only when both code and
    /// description are non-empty; an incomplete seed is skipped.
    fn add_category_with_code(
        &mut self,
        name: &str,
        seed: Option<(&str, &str)>,
    ) -> ExplorerResult<()>;

    /// Creates an empty category and persists.
    fn add_category(&mut self, name: &str) -> ExplorerResult<()> {
        self.add_category_with_code(name, None)
    }

    /// Removes the first occurrence of `code`, scanning categories in order.
    ///
    /// Returns the category the code was removed from.
    fn delete_code(&mut self, code: &str) -> ExplorerResult<String>;

    /// Removes a category with all of its codes.
    fn delete_category(&mut self, name: &str) -> ExplorerResult<()>;

    /// Replaces `code` with `new_code` / `new_description` in every category holding it.
    ///
    /// Returns the affected categories in document order.
    fn edit_code(
        &mut self,
        code: &str,
        new_code: &str,
        new_description: &str,
    ) -> ExplorerResult<Vec<String>>;

    /// First `(category, description)` holding `code`.
    fn lookup(&self, code: &str) -> Option<(String, String)>;

    /// Rendering model for the whole document.
    fn tree(&self) -> Vec<TreeNode> {
        self.document().tree()
    }

    /// Categories with at least one entry whose code or description contains `query`.
    fn search(&self, query: &str) -> Vec<TreeNode> {
        filter_tree(self.tree(), query)
    }
}
