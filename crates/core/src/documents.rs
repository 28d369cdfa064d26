//! Typed code documents.
//!
//! The two code files have different shapes on disk:
//!
//! ```text
//! ICD-10: { "<category>": { "<code>": "<description>", ... }, ... }
//! CPT:    { "<category>": [ { "code": "<code>", "description": "<description>" }, ... ], ... }
//! ```
//!
//! Both are deserialized into explicit types so that a file with the wrong shape is rejected
//! when it is loaded, not when some later operation walks it. Key order is preserved in both
//! directions; insertion order is display order.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::constants::DOCUMENTATION_TIPS;

/// Which coding standard a document or repository holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CodeSystem {
    Icd10,
    Cpt,
}

impl CodeSystem {
    pub fn label(self) -> &'static str {
        match self {
            CodeSystem::Icd10 => "ICD-10",
            CodeSystem::Cpt => "CPT",
        }
    }
}

impl std::fmt::Display for CodeSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// ICD-10 document: category → (code → description).
///
/// Codes are unique within a category only.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Icd10Document(pub IndexMap<String, IndexMap<String, String>>);

/// One CPT entry. Duplicates are permitted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CptRecord {
    pub code: String,
    pub description: String,
}

/// CPT document: category → ordered list of records.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CptDocument(pub IndexMap<String, Vec<CptRecord>>);

/// Either code document, tagged by its shape.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CodeDocument {
    Icd10(Icd10Document),
    Cpt(CptDocument),
}

impl CodeDocument {
    /// Parses `raw` as the document shape used by `system`.
    pub fn parse(system: CodeSystem, raw: &str) -> Result<Self, serde_json::Error> {
        Ok(match system {
            CodeSystem::Icd10 => CodeDocument::Icd10(serde_json::from_str(raw)?),
            CodeSystem::Cpt => CodeDocument::Cpt(serde_json::from_str(raw)?),
        })
    }

    pub fn system(&self) -> CodeSystem {
        match self {
            CodeDocument::Icd10(_) => CodeSystem::Icd10,
            CodeDocument::Cpt(_) => CodeSystem::Cpt,
        }
    }

    /// Rendering model: one node per category, entries in document order.
    pub fn tree(&self) -> Vec<TreeNode> {
        match self {
            CodeDocument::Icd10(doc) => doc.tree(),
            CodeDocument::Cpt(doc) => doc.tree(),
        }
    }
}

/// A single `code: description` line under a category.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodeEntry {
    pub code: String,
    pub description: String,
}

impl CodeEntry {
    fn new(code: &str, description: &str) -> Self {
        Self {
            code: code.to_owned(),
            description: description.to_owned(),
        }
    }

    fn matches(&self, needle: &str) -> bool {
        self.code.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
    }
}

impl std::fmt::Display for CodeEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.description)
    }
}

/// A category and its entries, as shown in the tree view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeNode {
    pub category: String,
    pub entries: Vec<CodeEntry>,
}

impl Icd10Document {
    pub fn tree(&self) -> Vec<TreeNode> {
        self.0
            .iter()
            .map(|(category, codes)| TreeNode {
                category: category.clone(),
                entries: codes
                    .iter()
                    .map(|(code, description)| CodeEntry::new(code, description))
                    .collect(),
            })
            .collect()
    }
}

impl CptDocument {
    pub fn tree(&self) -> Vec<TreeNode> {
        self.0
            .iter()
            .map(|(category, records)| TreeNode {
                category: category.clone(),
                entries: records
                    .iter()
                    .map(|r| CodeEntry::new(&r.code, &r.description))
                    .collect(),
            })
            .collect()
    }
}

/// Keeps the categories with at least one entry whose code or description contains `query`,
/// ignoring case. Non-matching entries are dropped from the kept categories.
pub fn filter_tree(tree: Vec<TreeNode>, query: &str) -> Vec<TreeNode> {
    let needle = query.to_lowercase();
    tree.into_iter()
        .filter_map(|node| {
            let entries: Vec<CodeEntry> = node
                .entries
                .into_iter()
                .filter(|entry| entry.matches(&needle))
                .collect();
            (!entries.is_empty()).then_some(TreeNode {
                category: node.category,
                entries,
            })
        })
        .collect()
}

/// Detail text shown when a code is opened.
pub fn code_details(system: CodeSystem, code: &str, description: &str) -> String {
    let mut details = format!(
        "{} Code: {code}\nDescription: {description}\n\nDocumentation Tips:",
        system.label()
    );
    for tip in DOCUMENTATION_TIPS {
        details.push_str("\n- ");
        details.push_str(tip);
    }
    details
}

#[cfg(test)]
mod tests {
    use super::*;

    const ICD10_SAMPLE: &str = r#"{
        "Endocrine": {"E10": "Type 1 diabetes", "E11": "Type 2 diabetes"},
        "Circulatory": {"I10": "Essential hypertension"}
    }"#;

    const CPT_SAMPLE: &str = r#"{
        "Evaluation": [
            {"code": "99213", "description": "Office visit, established patient"},
            {"code": "99213", "description": "Office visit, established patient"}
        ]
    }"#;

    #[test]
    fn test_parse_preserves_category_and_code_order() {
        let doc = CodeDocument::parse(CodeSystem::Icd10, ICD10_SAMPLE).expect("should parse");
        let tree = doc.tree();

        assert_eq!(tree[0].category, "Endocrine");
        assert_eq!(tree[1].category, "Circulatory");
        assert_eq!(tree[0].entries[0].to_string(), "E10: Type 1 diabetes");
        assert_eq!(tree[0].entries[1].to_string(), "E11: Type 2 diabetes");
    }

    #[test]
    fn test_parse_keeps_cpt_duplicates() {
        let doc = CodeDocument::parse(CodeSystem::Cpt, CPT_SAMPLE).expect("should parse");
        assert_eq!(doc.system(), CodeSystem::Cpt);
        assert_eq!(doc.tree()[0].entries.len(), 2);
    }

    #[test]
    fn test_parse_rejects_mismatched_shape() {
        assert!(CodeDocument::parse(CodeSystem::Icd10, CPT_SAMPLE).is_err());
        assert!(CodeDocument::parse(CodeSystem::Cpt, ICD10_SAMPLE).is_err());
    }

    #[test]
    fn test_filter_tree_is_case_insensitive_and_drops_empty_categories() {
        let doc = CodeDocument::parse(CodeSystem::Icd10, ICD10_SAMPLE).expect("should parse");

        let hits = filter_tree(doc.tree(), "TYPE 2");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].category, "Endocrine");
        assert_eq!(hits[0].entries, vec![CodeEntry::new("E11", "Type 2 diabetes")]);

        let by_code = filter_tree(doc.tree(), "i1");
        assert_eq!(by_code.len(), 1);
        assert_eq!(by_code[0].category, "Circulatory");
    }

    #[test]
    fn test_code_details_lists_tips() {
        let details = code_details(CodeSystem::Icd10, "E11", "Type 2 diabetes");
        assert!(details.starts_with("ICD-10 Code: E11\nDescription: Type 2 diabetes"));
        assert!(details.ends_with("- Link diagnosis to treatment provided."));
    }
}
