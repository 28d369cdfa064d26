//! Plain-text rendering of documents, users, settings and the error log.

use explorer_core::documents::code_details;
use explorer_core::repositories::error_log::ErrorEntry;
use explorer_core::repositories::settings::Settings;
use explorer_core::repositories::users::UserProfile;
use explorer_core::{CodeSystem, ExplorerResult, TreeNode};

pub fn tree(system: CodeSystem, nodes: &[TreeNode]) -> String {
    let mut out = format!("{} Codes\n", system.label());
    if nodes.is_empty() {
        out.push_str("  (no codes)\n");
        return out;
    }
    for node in nodes {
        out.push_str(&node.category);
        out.push('\n');
        for entry in &node.entries {
            out.push_str("  ");
            out.push_str(&entry.to_string());
            out.push('\n');
        }
    }
    out
}

pub fn details(system: CodeSystem, category: &str, code: &str, description: &str) -> String {
    format!(
        "Category: {category}\n{}\n",
        code_details(system, code, description)
    )
}

pub fn users(users: &[UserProfile]) -> String {
    if users.is_empty() {
        return "No users.\n".to_owned();
    }
    users
        .iter()
        .map(|u| {
            format!(
                "{}: {} {} ({})\n",
                u.username, u.first_name, u.last_name, u.provider_type
            )
        })
        .collect()
}

pub fn settings(settings: &Settings) -> ExplorerResult<String> {
    let mut out = serde_json::to_string_pretty(settings)
        .map_err(explorer_core::ExplorerError::Serialization)?;
    out.push('\n');
    Ok(out)
}

pub fn errors(entries: &[ErrorEntry]) -> String {
    if entries.is_empty() {
        return "The error log is empty.\n".to_owned();
    }
    entries
        .iter()
        .map(|e| {
            format!(
                "[{}] {}\n    solution: {}\n",
                e.timestamp, e.error_message, e.solution
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use explorer_core::CodeEntry;

    #[test]
    fn test_tree_indents_entries_under_category() {
        let nodes = vec![TreeNode {
            category: "Endocrine".into(),
            entries: vec![CodeEntry {
                code: "E10".into(),
                description: "Type 1 diabetes".into(),
            }],
        }];

        assert_eq!(
            tree(CodeSystem::Icd10, &nodes),
            "ICD-10 Codes\nEndocrine\n  E10: Type 1 diabetes\n"
        );
    }

    #[test]
    fn test_tree_marks_empty_document() {
        assert_eq!(tree(CodeSystem::Cpt, &[]), "CPT Codes\n  (no codes)\n");
    }

    #[test]
    fn test_details_include_category_and_tips() {
        let text = details(CodeSystem::Cpt, "Evaluation", "99213", "Office visit");

        assert!(text.starts_with("Category: Evaluation\nCPT Code: 99213\n"));
        assert!(text.contains("Documentation Tips:"));
    }

    #[test]
    fn test_users_lists_profiles() {
        let profiles = vec![UserProfile {
            username: "jdoe".into(),
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            provider_type: "PA".into(),
        }];
        assert_eq!(users(&profiles), "jdoe: Jane Doe (PA)\n");
        assert_eq!(users(&[]), "No users.\n");
    }
}
