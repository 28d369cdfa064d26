//! CPT code repository.
//!
//! Categories hold ordered lists of `{code, description}` records. No uniqueness is enforced:
//! adding a code always appends.

use super::helpers::{load_or_default, write_json};
use super::CodeRepository;
use crate::documents::{CodeDocument, CodeSystem, CptDocument, CptRecord};
use crate::{ExplorerError, ExplorerResult, NonEmptyText};
use std::path::{Path, PathBuf};

#[derive(Clone, Debug)]
pub struct CptRepository {
    path: PathBuf,
    doc: CptDocument,
}

impl CptRepository {
    pub fn open(path: impl Into<PathBuf>) -> ExplorerResult<Self> {
        let path = path.into();
        let doc = Self::load(&path)?;
        Ok(Self { path, doc })
    }

    /// Reads the document at `path`; an absent file yields an empty document.
    pub fn load(path: &Path) -> ExplorerResult<CptDocument> {
        load_or_default(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn cpt_document(&self) -> &CptDocument {
        &self.doc
    }

    pub fn save_document(&mut self, doc: CptDocument) -> ExplorerResult<()> {
        self.doc = doc;
        self.save()
    }

    fn not_found(code: &str) -> ExplorerError {
        ExplorerError::CodeNotFound {
            system: CodeSystem::Cpt,
            code: code.to_owned(),
        }
    }

    /// Position of the first record with `code`, scanning categories in order.
    fn locate(&self, code: &str) -> Option<(usize, usize)> {
        self.doc
            .0
            .values()
            .enumerate()
            .find_map(|(ci, records)| records.iter().position(|r| r.code == code).map(|ri| (ci, ri)))
    }
}

impl CodeRepository for CptRepository {
    fn document(&self) -> CodeDocument {
        CodeDocument::Cpt(self.doc.clone())
    }

    fn categories(&self) -> Vec<String> {
        self.doc.0.keys().cloned().collect()
    }

    fn save(&self) -> ExplorerResult<()> {
        write_json(&self.path, &self.doc)?;
        tracing::info!("CPT codes saved to {}", self.path.display());
        Ok(())
    }

    fn add_code(&mut self, category: &str, code: &str, description: &str) -> ExplorerResult<()> {
        let code = NonEmptyText::for_field("code", code)?;
        let description = NonEmptyText::for_field("description", description)?;

        let Some(records) = self.doc.0.get_mut(category.trim()) else {
            return Err(ExplorerError::CategoryNotFound(category.trim().to_owned()));
        };
        records.push(CptRecord {
            code: code.into_inner(),
            description: description.into_inner(),
        });
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

        let records = seed
            .map(|(code, description)| (code.trim(), description.trim()))
            .filter(|(code, description)| !code.is_empty() && !description.is_empty())
            .map(|(code, description)| CptRecord {
                code: code.to_owned(),
                description: description.to_owned(),
            })
            .into_iter()
            .collect();
        self.doc.0.insert(name.into_inner(), records);
        self.save()
    }

    fn delete_code(&mut self, code: &str) -> ExplorerResult<String> {
        let code = code.trim();
        let Some((ci, ri)) = self.locate(code) else {
            return Err(Self::not_found(code));
        };
        let Some((category, records)) = self.doc.0.get_index_mut(ci) else {
            return Err(Self::not_found(code));
        };
        records.remove(ri);
        let category = category.clone();
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

        let mut edited = Vec::new();
        for (category, records) in self.doc.0.iter_mut() {
            let mut hit = false;
            for record in records.iter_mut().filter(|r| r.code == code) {
                record.code = new_code.as_str().to_owned();
                record.description = new_description.as_str().to_owned();
                hit = true;
            }
            if hit {
                edited.push(category.clone());
            }
        }

        if edited.is_empty() {
            return Err(Self::not_found(code));
        }
        self.save()?;
        Ok(edited)
    }

    fn lookup(&self, code: &str) -> Option<(String, String)> {
        let code = code.trim();
        self.doc.0.iter().find_map(|(category, records)| {
            records
                .iter()
                .find(|r| r.code == code)
                .map(|r| (category.clone(), r.description.clone()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn evaluation_repo(temp_dir: &TempDir) -> CptRepository {
        let path = temp_dir.path().join("cpt_codes.json");
        fs::write(
            &path,
            r#"{"Evaluation": [{"code": "99213", "description": "Office visit, established"}]}"#,
        )
        .expect("should write fixture");
        CptRepository::open(path).expect("open should succeed")
    }

    fn record(code: &str, description: &str) -> CptRecord {
        CptRecord {
            code: code.to_string(),
            description: description.to_string(),
        }
    }

    #[test]
    fn test_add_code_appends_duplicates() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut repo = evaluation_repo(&temp_dir);

        repo.add_code("Evaluation", "99213", "Office visit, established")
            .expect("duplicate add should succeed");

        let reloaded = CptRepository::load(repo.path()).expect("load should succeed");
        assert_eq!(
            reloaded.0["Evaluation"],
            vec![
                record("99213", "Office visit, established"),
                record("99213", "Office visit, established")
            ]
        );
    }

    #[test]
    fn test_add_code_rejects_empty_description() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut repo = evaluation_repo(&temp_dir);

        let err = repo
            .add_code("Evaluation", "99214", "   ")
            .expect_err("empty description should fail");

        assert!(err.is_validation());
        assert_eq!(repo.cpt_document().0["Evaluation"].len(), 1);
    }

    #[test]
    fn test_add_code_rejects_unknown_category() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut repo = evaluation_repo(&temp_dir);

        let err = repo
            .add_code("Surgery", "10060", "Drainage of abscess")
            .expect_err("unknown category should fail");
        assert!(matches!(err, ExplorerError::CategoryNotFound(_)));
    }

    #[test]
    fn test_add_category_creates_empty_list_once() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut repo = evaluation_repo(&temp_dir);

        repo.add_category("Surgery").expect("should create category");
        let err = repo
            .add_category("Surgery")
            .expect_err("duplicate category should fail");

        assert!(matches!(err, ExplorerError::CategoryExists(_)));
        let on_disk = fs::read_to_string(repo.path()).expect("should read file");
        assert!(on_disk.contains("\"Surgery\": []"));
    }

    #[test]
    fn test_delete_code_removes_first_record_across_categories() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut repo = evaluation_repo(&temp_dir);
        repo.add_category("Repeat").expect("should create category");
        repo.add_code("Repeat", "99213", "Second copy")
            .expect("add should succeed");

        let category = repo.delete_code("99213").expect("delete should succeed");

        assert_eq!(category, "Evaluation");
        assert!(repo.cpt_document().0["Evaluation"].is_empty());
        assert_eq!(repo.cpt_document().0["Repeat"], vec![record("99213", "Second copy")]);
    }

    #[test]
    fn test_delete_code_reports_missing_code() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut repo = evaluation_repo(&temp_dir);

        let err = repo.delete_code("00000").expect_err("missing code should fail");
        assert_eq!(err.to_string(), "CPT code not found: 00000");
    }

    #[test]
    fn test_delete_category_removes_records() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut repo = evaluation_repo(&temp_dir);

        repo.delete_category("Evaluation")
            .expect("delete_category should succeed");

        assert!(CptRepository::load(repo.path()).unwrap().0.is_empty());
        assert!(matches!(
            repo.delete_category("Evaluation"),
            Err(ExplorerError::CategoryNotFound(_))
        ));
    }

    #[test]
    fn test_edit_code_updates_record_in_place() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut repo = evaluation_repo(&temp_dir);
        repo.add_code("Evaluation", "99214", "Office visit, moderate")
            .expect("add should succeed");

        repo.edit_code("99213", "99212", "Office visit, straightforward")
            .expect("edit should succeed");

        assert_eq!(
            repo.cpt_document().0["Evaluation"],
            vec![
                record("99212", "Office visit, straightforward"),
                record("99214", "Office visit, moderate")
            ]
        );
    }

    #[test]
    fn test_add_category_with_code_writes_seed_once() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut repo = evaluation_repo(&temp_dir);

        repo.add_category_with_code("Surgery", Some(("10060", "Drainage of abscess")))
            .expect("should create seeded category");
        repo.add_category_with_code("Radiology", Some((" ", "Chest x-ray")))
            .expect("incomplete seed is skipped");

        let reloaded = CptRepository::load(repo.path()).expect("load should succeed");
        assert_eq!(reloaded.0["Surgery"], vec![record("10060", "Drainage of abscess")]);
        assert!(reloaded.0["Radiology"].is_empty());
    }

    #[test]
    fn test_add_category_with_code_rejects_existing_name_without_writing() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut repo = evaluation_repo(&temp_dir);
        let before = fs::read_to_string(repo.path()).expect("should read file");

        let err = repo
            .add_category_with_code("Evaluation", Some(("99215", "Office visit, high")))
            .expect_err("existing category should fail");

        assert!(matches!(err, ExplorerError::CategoryExists(_)));
        assert_eq!(fs::read_to_string(repo.path()).expect("should read file"), before);
    }

    #[test]
    fn test_edit_code_updates_every_matching_record() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut repo = evaluation_repo(&temp_dir);
        repo.add_category_with_code("Repeat", Some(("99213", "Second copy")))
            .expect("should create category");
        repo.add_category("Untouched").expect("should create category");

        let categories = repo
            .edit_code("99213", "99212", "Office visit, straightforward")
            .expect("edit should succeed");

        assert_eq!(categories, vec!["Evaluation", "Repeat"]);
        let reloaded = CptRepository::load(repo.path()).expect("load should succeed");
        assert_eq!(
            reloaded.0["Repeat"],
            vec![record("99212", "Office visit, straightforward")]
        );
        assert_eq!(
            reloaded.0["Evaluation"],
            vec![record("99212", "Office visit, straightforward")]
        );
        assert!(reloaded.0["Untouched"].is_empty());
    }

    #[test]
    fn test_search_and_lookup() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let repo = evaluation_repo(&temp_dir);

        let hits = repo.search("OFFICE");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].entries[0].code, "99213");
        assert_eq!(
            repo.lookup("99213"),
            Some((
                "Evaluation".to_string(),
                "Office visit, established".to_string()
            ))
        );
        assert_eq!(repo.lookup("12345"), None);
    }
}
