//! ICD-10 code repository.
//!
//! ## Storage Layout
//!
//! ```text
//! {
//!     "Endocrine": {
//!         "E10": "Type 1 diabetes",
//!         "E11": "Type 2 diabetes"
//!     }
//! }
//! ```
//!
//! Adding a code that already exists in the category overwrites its description in place.

use super::helpers::{load_or_default, write_json};
use super::CodeRepository;
use crate::documents::{CodeDocument, CodeSystem, Icd10Document};
use crate::{ExplorerError, ExplorerResult, NonEmptyText};
use indexmap::IndexMap;
use std::path::{Path, PathBuf};

/// Repository owning the ICD-10 document for the lifetime of the process.
#[derive(Clone, Debug)]
pub struct Icd10Repository {
    path: PathBuf,
    doc: Icd10Document,
}

impl Icd10Repository {
    /// Opens the repository, loading `path` (an absent file yields an empty document).
    pub fn open(path: impl Into<PathBuf>) -> ExplorerResult<Self> {
        let path = path.into();
        let doc = Self::load(&path)?;
        Ok(Self { path, doc })
    }

    /// Reads the document at `path`; an absent file yields an empty document.
    pub fn load(path: &Path) -> ExplorerResult<Icd10Document> {
        load_or_default(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn icd10_document(&self) -> &Icd10Document {
        &self.doc
    }

    /// Replaces the whole document and persists it.
    pub fn save_document(&mut self, doc: Icd10Document) -> ExplorerResult<()> {
        self.doc = doc;
        self.save()
    }
}

impl CodeRepository for Icd10Repository {
    fn document(&self) -> CodeDocument {
        CodeDocument::Icd10(self.doc.clone())
    }

    fn categories(&self) -> Vec<String> {
        self.doc.0.keys().cloned().collect()
    }

    fn save(&self) -> ExplorerResult<()> {
        write_json(&self.path, &self.doc)?;
        tracing::info!("ICD-10 codes saved to {}", self.path.display());
        Ok(())
    }

    fn add_code(&mut self, category: &str, code: &str, description: &str) -> ExplorerResult<()> {
        let code = NonEmptyText::for_field("code", code)?;
        let description = NonEmptyText::for_field("description", description)?;

        let Some(codes) = self.doc.0.get_mut(category.trim()) else {
            return Err(ExplorerError::CategoryNotFound(category.trim().to_owned()));
        };
        codes.insert(code.into_inner(), description.into_inner());
        self.save()
    }

    fn add_category_with_code(
        &mut self,
        name: &str,
        seed: Option<(&str, &str)>,
    ) -> ExplorerResult<()> {
        let name = NonEmptyText::for_field("category name", name)?;
        if self.doc.0.contains_key(name.as_str()) {
            return Err(ExplorerError::CategoryExists(name.into_inner()));
        }

        let mut codes = IndexMap::new();
        if let Some((code, description)) = seed {
            let (code, description) = (code.trim(), description.trim());
            if !code.is_empty() && !description.is_empty() {
                codes.insert(code.to_owned(), description.to_owned());
            }
        }
        self.doc.0.insert(name.into_inner(), codes);
        self.save()
    }

    fn delete_code(&mut self, code: &str) -> ExplorerResult<String> {
        let code = code.trim();
        let found = self
            .doc
            .0
            .iter_mut()
            .find_map(|(category, codes)| codes.shift_remove(code).map(|_| category.clone()));

        let Some(category) = found else {
            return Err(ExplorerError::CodeNotFound {
                system: CodeSystem::Icd10,
                code: code.to_owned(),
            });
        };
        self.save()?;
        Ok(category)
    }

    fn delete_category(&mut self, name: &str) -> ExplorerResult<()> {
        let name = name.trim();
        if self.doc.0.shift_remove(name).is_none() {
            return Err(ExplorerError::CategoryNotFound(name.to_owned()));
        }
        self.save()
    }

    fn edit_code(
        &mut self,
        code: &str,
        new_code: &str,
        new_description: &str,
    ) -> ExplorerResult<Vec<String>> {
        let new_code = NonEmptyText::for_field("code", new_code)?;
        let new_description = NonEmptyText::for_field("description", new_description)?;
        let code = code.trim();

        // The edited entry moves to the end of each category that held it.
        let mut edited = Vec::new();
        for (category, codes) in self.doc.0.iter_mut() {
            if codes.shift_remove(code).is_some() {
                codes.insert(new_code.as_str().to_owned(), new_description.as_str().to_owned());
                edited.push(category.clone());
            }
        }

        if edited.is_empty() {
            return Err(ExplorerError::CodeNotFound {
                system: CodeSystem::Icd10,
                code: code.to_owned(),
            });
        }
        self.save()?;
        Ok(edited)
    }

    fn lookup(&self, code: &str) -> Option<(String, String)> {
        let code = code.trim();
        self.doc.0.iter().find_map(|(category, codes)| {
            codes
                .get(code)
                .map(|description| (category.clone(), description.clone()))
        })
    }
}
